// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Mutable playback session.
//!
//! Written only by the controller. The playhead itself is not stored here:
//! it lives in the backends, with the vocal stream as master.

use crate::media::PlaybackMode;

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    /// No marker tracked; content hidden, commands refused
    #[default]
    Inactive,
    /// Marker tracked and streams running
    Playing,
    /// Marker tracked, streams paused by the user
    Paused,
}

impl PlayerState {
    pub fn is_active(self) -> bool {
        self != PlayerState::Inactive
    }
}

/// Session fields mutated by commands and tracking events
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    /// Current catalog index
    pub index: usize,
    /// Catalog index currently loaded into the engine
    pub loaded: Option<usize>,
    pub mode: PlaybackMode,
    pub muted: bool,
    /// Preferred volume (0.0 - 1.0), kept while muted
    pub volume: f64,
    /// Position saved when tracking was lost
    pub resume_position: Option<f64>,
}

impl PlaybackSession {
    pub fn new(volume: f64) -> Self {
        Self {
            index: 0,
            loaded: None,
            mode: PlaybackMode::Vocal,
            muted: false,
            volume: volume.clamp(0.0, 1.0),
            resume_position: None,
        }
    }

    /// Whether the current index is the one loaded
    pub fn is_current_loaded(&self) -> bool {
        self.loaded == Some(self.index)
    }

    /// Volume as shown on the slider label
    pub fn volume_percent(&self) -> u32 {
        (self.volume * 100.0).round() as u32
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new(1.0)
    }
}
