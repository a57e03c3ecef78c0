// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Frame driver tying the tracking bridge, settings watcher and controller
//! together.

use tracing::{info, warn};

use crate::config::{SettingsEvent, SettingsWatcher};
use crate::error::PlayerError;
use crate::media::SyncSignal;
use crate::player::{PlaybackController, PlayerCommand, PlayerView};
use crate::tracking::TrackingBridge;

/// Per-frame work
pub struct App {
    bridge: TrackingBridge,
    controller: PlaybackController,
    watcher: Option<SettingsWatcher>,
    frames: u64,
}

impl App {
    pub fn new(bridge: TrackingBridge, controller: PlaybackController) -> Self {
        Self {
            bridge,
            controller,
            watcher: None,
            frames: 0,
        }
    }

    /// Hot-reload settings from `watcher` between frames
    pub fn with_watcher(mut self, watcher: SettingsWatcher) -> Self {
        self.watcher = Some(watcher);
        self
    }

    /// Run one frame.
    ///
    /// Order: pending tracking event, settings reloads, then the controller
    /// tick.
    pub fn frame(&mut self, dt: f64) -> Option<SyncSignal> {
        self.frames += 1;
        self.bridge.drain(&mut self.controller);
        self.apply_settings_events();
        self.controller.tick(dt)
    }

    fn apply_settings_events(&mut self) {
        let Some(watcher) = self.watcher.as_ref() else {
            return;
        };
        for event in watcher.recv_all() {
            match event {
                SettingsEvent::Reloaded(settings) => {
                    info!("Reloaded {:?}", watcher.watched_path());
                    self.controller.apply_settings(&settings);
                }
                SettingsEvent::Error(message) => {
                    warn!("Keeping previous settings: {}", message);
                }
            }
        }
    }

    /// Forward a user command; refusals are also reflected in the view
    pub fn command(&mut self, command: PlayerCommand) -> Result<(), PlayerError> {
        self.controller.dispatch(command)
    }

    pub fn view(&self) -> PlayerView {
        self.controller.view()
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn bridge(&self) -> &TrackingBridge {
        &self.bridge
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
