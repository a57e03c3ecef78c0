// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playback controller.
//!
//! State machine over `Inactive`, `Playing` and `Paused`. Tracking events
//! arrive through [`TrackingListener`], user commands through
//! [`PlaybackController::dispatch`]. The controller is the only writer of
//! the session and the only caller of the sync engine.

use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Song};
use crate::config::PlayerSettings;
use crate::effects::{DiscSpin, PulseEffect};
use crate::error::PlayerError;
use crate::media::{MediaSyncEngine, SyncSignal};
use crate::stage::{CharacterSlot, Stage};
use crate::tracking::TrackingListener;

use super::command::PlayerCommand;
use super::session::{PlaybackSession, PlayerState};
use super::view::{format_time, PlayerView};

/// Owns the catalog, the session and the media engine
pub struct PlaybackController {
    catalog: Catalog,
    session: PlaybackSession,
    state: PlayerState,
    engine: MediaSyncEngine,
    stage: Box<dyn Stage>,
    character: CharacterSlot,
    resume_enabled: bool,
    notice: Option<String>,
    pulse: PulseEffect,
    disc: DiscSpin,
}

impl PlaybackController {
    /// Create an inactive controller; nothing is loaded until the marker is found
    pub fn new(
        catalog: Catalog,
        mut engine: MediaSyncEngine,
        mut stage: Box<dyn Stage>,
        settings: &PlayerSettings,
    ) -> Self {
        let session = PlaybackSession::new(settings.initial_volume);
        engine.set_tuning(settings.tuning());
        engine.set_volume(session.volume);
        engine.set_mute(session.muted);
        engine.set_mode(session.mode);
        stage.set_content_visible(false);

        Self {
            catalog,
            session,
            state: PlayerState::Inactive,
            engine,
            stage,
            character: CharacterSlot::new(),
            resume_enabled: settings.resume_from_last_position,
            notice: None,
            pulse: PulseEffect::default(),
            disc: DiscSpin::default(),
        }
    }

    /// Apply reloaded settings.
    ///
    /// `initial_volume` only matters at startup and is ignored here.
    pub fn apply_settings(&mut self, settings: &PlayerSettings) {
        self.resume_enabled = settings.resume_from_last_position;
        self.engine.set_tuning(settings.tuning());
        info!(
            "Settings applied (resume: {}, drift tolerance: {:.3}s, end margin: {:.3}s)",
            settings.resume_from_last_position, settings.drift_tolerance, settings.end_margin
        );
    }

    /// Run a user command.
    ///
    /// Advisory refusals set the view notice; any success clears it.
    pub fn dispatch(&mut self, command: PlayerCommand) -> Result<(), PlayerError> {
        let result = self.execute(command.clone());
        match &result {
            Ok(()) => {
                if command.is_navigation() {
                    info!("{:?} -> {}", command, self.current_song_name());
                } else if command.is_transport() {
                    debug!("{:?} at {}", command, format_time(self.engine.position()));
                }
                self.notice = None;
            }
            Err(e) => {
                debug!("Command {:?} refused: {}", command, e);
                if e.is_advisory() {
                    self.notice = Some(e.to_string());
                }
            }
        }
        result
    }

    fn execute(&mut self, command: PlayerCommand) -> Result<(), PlayerError> {
        if command.requires_tracking() && !self.state.is_active() {
            return Err(PlayerError::NotTracked);
        }

        match command {
            PlayerCommand::SelectSong(index) => {
                self.load_song(index, true);
                Ok(())
            }
            PlayerCommand::Next => {
                self.next_song();
                Ok(())
            }
            PlayerCommand::Previous => {
                self.previous_song();
                Ok(())
            }
            PlayerCommand::TogglePlayPause => {
                self.toggle_play_pause();
                Ok(())
            }
            PlayerCommand::SeekFraction(fraction) => {
                let applied = self.engine.seek_fraction(fraction)?;
                debug!("Seeked to {:.2}s", applied);
                Ok(())
            }
            PlayerCommand::SeekPointerDown => {
                if !self.engine.has_clip() {
                    return Err(PlayerError::NoActiveClip);
                }
                self.engine.begin_seek();
                Ok(())
            }
            PlayerCommand::SeekPointerUp(fraction) => {
                // A song change or marker loss cancelled the gesture
                if !self.engine.is_seeking() {
                    debug!("Dropping release of a cancelled scrub");
                    return Ok(());
                }
                self.engine.end_seek();
                let applied = self.engine.seek_fraction(fraction)?;
                debug!("Scrub released at {:.2}s", applied);
                Ok(())
            }
            PlayerCommand::SetVolume(volume) => {
                if !volume.is_finite() {
                    debug!("Ignoring non-finite volume {}", volume);
                    return Ok(());
                }
                self.session.volume = volume.clamp(0.0, 1.0);
                self.engine.set_volume(self.session.volume);
                Ok(())
            }
            PlayerCommand::ToggleMute => {
                self.session.muted = !self.session.muted;
                self.engine.set_mute(self.session.muted);
                debug!("Muted: {}", self.session.muted);
                Ok(())
            }
            PlayerCommand::ToggleMode => {
                self.session.mode = self.session.mode.toggled();
                self.engine.set_mode(self.session.mode);
                info!("Mode: {:?}", self.session.mode);
                Ok(())
            }
        }
    }

    fn toggle_play_pause(&mut self) {
        match self.state {
            PlayerState::Playing => {
                self.engine.pause();
                self.state = PlayerState::Paused;
                info!("Paused at {}", format_time(self.engine.position()));
            }
            PlayerState::Paused => {
                self.engine.play();
                self.state = PlayerState::Playing;
                info!("Resumed at {}", format_time(self.engine.position()));
            }
            PlayerState::Inactive => {}
        }
    }

    fn next_song(&mut self) {
        let index = self.catalog.next_index(self.session.index);
        self.load_song(index, true);
    }

    fn previous_song(&mut self) {
        let index = self.catalog.previous_index(self.session.index);
        self.load_song(index, true);
    }

    /// Load a catalog entry into the engine, replacing the character.
    ///
    /// Indices past the end wrap around. Any saved resume position is
    /// discarded.
    fn load_song(&mut self, index: usize, autoplay: bool) {
        self.engine.cancel_seek();

        let (index, song) = self.catalog.wrapped(index);
        let song: Song = song.clone();

        let animator = self.character.replace(self.stage.as_mut(), song.character.as_ref());
        if let Some(background) = song.background.as_ref() {
            self.stage.set_background(background);
        }

        for problem in self.engine.load(&song, animator) {
            warn!("'{}': {}", song.name, problem);
        }

        self.session.index = index;
        self.session.loaded = Some(index);
        self.session.resume_position = None;
        info!("Loaded song {}: {}", index + 1, song.name);

        if autoplay {
            self.engine.play();
            if self.state.is_active() {
                self.state = PlayerState::Playing;
            }
        }
    }

    /// Per-frame update: drift correction, song end and effects
    pub fn tick(&mut self, dt: f64) -> Option<SyncSignal> {
        let signal = self.engine.tick(dt);
        if signal == Some(SyncSignal::SongEnded) && self.state == PlayerState::Playing {
            info!("Song ended, advancing");
            self.next_song();
        }

        self.pulse.tick(dt);
        self.disc.tick(dt, self.state == PlayerState::Playing);
        signal
    }

    fn current_song_name(&self) -> String {
        self.catalog
            .get(self.session.index)
            .map(|song| song.name.clone())
            .unwrap_or_default()
    }

    /// Snapshot for the UI
    pub fn view(&self) -> PlayerView {
        let active = self.state.is_active();
        let len = self.catalog.len();
        let index = self.session.index;
        let name = self.current_song_name();

        PlayerView {
            current_song_name: name,
            is_playing: self.state == PlayerState::Playing,
            is_vocal_mode: self.session.mode.is_vocal(),
            volume_percent: self.session.volume_percent(),
            is_muted: self.session.muted,
            current_time: format_time(self.engine.position()),
            total_time: format_time(self.engine.duration()),
            progress_fraction: self.engine.progress().unwrap_or(0.0),
            can_go_next: active && index + 1 < len,
            can_go_previous: active && index > 0,
            is_tracking_active: active,
            notice: self.notice.clone(),
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn engine(&self) -> &MediaSyncEngine {
        &self.engine
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn resume_enabled(&self) -> bool {
        self.resume_enabled
    }

    /// Current scale of the marker pulse
    pub fn pulse_scale(&self) -> f64 {
        self.pulse.scale()
    }

    /// Current rotation of the record disc in degrees
    pub fn disc_angle(&self) -> f64 {
        self.disc.angle()
    }
}

impl TrackingListener for PlaybackController {
    fn on_found(&mut self) {
        if self.state.is_active() {
            return;
        }

        self.stage.set_content_visible(true);
        if !self.session.is_current_loaded() {
            self.load_song(self.session.index, false);
        }

        self.engine.cancel_seek();
        let start = if self.resume_enabled {
            self.session.resume_position.unwrap_or(0.0)
        } else {
            0.0
        };
        if let Err(e) = self.engine.seek(start) {
            debug!("Nothing to rewind: {}", e);
        }

        self.engine.play();
        self.state = PlayerState::Playing;
        self.notice = None;
        self.pulse.trigger();
        info!("Marker found, playing from {}", format_time(self.engine.position()));
    }

    fn on_lost(&mut self) {
        if !self.state.is_active() {
            return;
        }

        let position = self.engine.position();
        self.session.resume_position = Some(position);
        self.engine.cancel_seek();
        self.engine.pause();
        self.stage.set_content_visible(false);
        self.state = PlayerState::Inactive;
        info!("Marker lost at {}", format_time(position));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{AssetRef, PlaybackMode, SimulatedMedia, StreamControl, StreamKind};
    use crate::stage::SimulatedStage;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct Rig {
        controller: PlaybackController,
        media: SimulatedMedia,
        vocal: StreamControl,
        accompaniment: StreamControl,
        video: StreamControl,
        stage: SimulatedStage,
    }

    impl Rig {
        fn advance(&mut self, dt: f64) {
            self.media.advance(dt);
            self.controller.tick(dt);
        }
    }

    fn song(name: &str) -> Song {
        let key = name.to_lowercase();
        Song::new(name)
            .with_vocal(format!("{}-vocal", key))
            .with_accompaniment(format!("{}-acc", key))
            .with_video(format!("{}-video", key))
            .with_character(format!("{}-dancer", key))
            .with_animation("dance")
    }

    fn rig_with(settings: PlayerSettings) -> Rig {
        let mut library = HashMap::new();
        for (key, length) in [("a", 180.0), ("b", 200.0), ("c", 90.0)] {
            library.insert(AssetRef::new(format!("{}-vocal", key)), length);
            library.insert(AssetRef::new(format!("{}-acc", key)), length);
            library.insert(AssetRef::new(format!("{}-video", key)), length);
        }
        let (engine, media) = SimulatedMedia::engine(Arc::new(library));
        let stage = SimulatedStage::new();
        let catalog = Catalog::new(vec![song("A"), song("B"), song("C")]).unwrap();
        let controller =
            PlaybackController::new(catalog, engine, Box::new(stage.clone()), &settings);

        Rig {
            controller,
            vocal: media.vocal.clone(),
            accompaniment: media.accompaniment.clone(),
            video: media.video.clone(),
            media,
            stage,
        }
    }

    fn rig() -> Rig {
        rig_with(PlayerSettings::default())
    }

    #[test]
    fn test_starts_inactive_and_hidden() {
        let rig = rig();
        assert_eq!(rig.controller.state(), PlayerState::Inactive);
        assert!(!rig.stage.is_visible());
        assert!(!rig.controller.engine().has_clip());
        assert_eq!(rig.controller.session().volume_percent(), 70);
    }

    #[test]
    fn test_found_loads_and_plays() {
        let mut rig = rig();
        rig.controller.on_found();

        assert_eq!(rig.controller.state(), PlayerState::Playing);
        assert!(rig.stage.is_visible());
        assert_eq!(rig.vocal.clip(), Some(AssetRef::new("a-vocal")));
        assert!(rig.vocal.is_playing());
        assert_eq!(rig.controller.engine().position(), 0.0);
        assert_eq!(rig.stage.live_model(), Some(AssetRef::new("a-dancer")));
        assert_eq!(rig.stage.current_animator().unwrap().speed(), 1.0);
    }

    #[test]
    fn test_lost_saves_position_and_hides() {
        let mut rig = rig();
        rig.controller.on_found();
        rig.advance(45.0);
        rig.controller.on_lost();

        assert_eq!(rig.controller.state(), PlayerState::Inactive);
        assert!(!rig.stage.is_visible());
        assert!(!rig.vocal.is_playing());
        assert!((rig.controller.session().resume_position.unwrap() - 45.0).abs() < 1e-9);

        rig.controller.on_found();
        assert!((rig.controller.engine().position() - 45.0).abs() < 1e-9);
        assert!(rig.vocal.is_playing());
    }

    #[test]
    fn test_resume_disabled_restarts() {
        let settings = PlayerSettings {
            resume_from_last_position: false,
            ..PlayerSettings::default()
        };
        let mut rig = rig_with(settings);
        rig.controller.on_found();
        rig.advance(45.0);
        rig.controller.on_lost();
        rig.controller.on_found();
        assert_eq!(rig.controller.engine().position(), 0.0);
    }

    #[test]
    fn test_repeated_found_is_ignored() {
        let mut rig = rig();
        rig.controller.on_found();
        rig.advance(10.0);
        rig.controller.on_found();
        assert!((rig.controller.engine().position() - 10.0).abs() < 1e-9);
        assert_eq!(rig.stage.spawn_count(), 1);
    }

    #[test]
    fn test_inactive_commands_refused() {
        let mut rig = rig();
        let result = rig.controller.dispatch(PlayerCommand::TogglePlayPause);
        assert_eq!(result, Err(PlayerError::NotTracked));
        assert_eq!(rig.controller.state(), PlayerState::Inactive);

        let view = rig.controller.view();
        assert!(!view.is_playing);
        assert_eq!(view.notice.as_deref(), Some("Scan the marker first"));

        assert_eq!(rig.controller.dispatch(PlayerCommand::Next), Err(PlayerError::NotTracked));
        assert_eq!(rig.controller.session().index, 0);
    }

    #[test]
    fn test_volume_allowed_while_inactive() {
        let mut rig = rig();
        rig.controller.dispatch(PlayerCommand::SetVolume(0.25)).unwrap();
        assert_eq!(rig.controller.view().volume_percent, 25);

        rig.controller.on_found();
        assert!((rig.vocal.volume() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_toggle_play_pause() {
        let mut rig = rig();
        rig.controller.on_found();

        rig.controller.dispatch(PlayerCommand::TogglePlayPause).unwrap();
        assert_eq!(rig.controller.state(), PlayerState::Paused);
        assert!(!rig.vocal.is_playing());
        assert_eq!(rig.stage.current_animator().unwrap().speed(), 0.0);

        rig.controller.dispatch(PlayerCommand::TogglePlayPause).unwrap();
        assert_eq!(rig.controller.state(), PlayerState::Playing);
        assert!(rig.vocal.is_playing());
    }

    #[test]
    fn test_navigation_wraps() {
        let mut rig = rig();
        rig.controller.on_found();

        rig.controller.dispatch(PlayerCommand::Previous).unwrap();
        assert_eq!(rig.controller.session().index, 2);
        assert_eq!(rig.vocal.clip(), Some(AssetRef::new("c-vocal")));

        rig.controller.dispatch(PlayerCommand::Next).unwrap();
        assert_eq!(rig.controller.session().index, 0);

        rig.controller.dispatch(PlayerCommand::SelectSong(4)).unwrap();
        assert_eq!(rig.controller.session().index, 1);
        assert_eq!(rig.stage.live_characters(), 1);
        assert_eq!(rig.stage.max_live_characters(), 1);
    }

    #[test]
    fn test_navigation_from_paused_plays() {
        let mut rig = rig();
        rig.controller.on_found();
        rig.controller.dispatch(PlayerCommand::TogglePlayPause).unwrap();
        rig.controller.dispatch(PlayerCommand::Next).unwrap();
        assert_eq!(rig.controller.state(), PlayerState::Playing);
        assert!(rig.vocal.is_playing());
        assert_eq!(rig.controller.engine().position(), 0.0);
    }

    #[test]
    fn test_song_change_clears_resume() {
        let mut rig = rig();
        rig.controller.on_found();
        rig.advance(30.0);
        rig.controller.on_lost();
        rig.controller.on_found();
        rig.controller.dispatch(PlayerCommand::Next).unwrap();
        assert_eq!(rig.controller.session().resume_position, None);
    }

    #[test]
    fn test_song_end_advances() {
        let mut rig = rig();
        rig.controller.on_found();
        rig.advance(179.95);

        assert_eq!(rig.controller.session().index, 1);
        assert_eq!(rig.vocal.clip(), Some(AssetRef::new("b-vocal")));
        assert_eq!(rig.controller.engine().position(), 0.0);
        assert_eq!(rig.controller.state(), PlayerState::Playing);
        assert!(rig.vocal.is_playing());
    }

    #[test]
    fn test_mode_toggle_keeps_positions() {
        let mut rig = rig();
        rig.controller.on_found();
        rig.advance(12.0);

        rig.controller.dispatch(PlayerCommand::ToggleMode).unwrap();
        assert_eq!(rig.controller.session().mode, PlaybackMode::Accompaniment);
        assert_eq!(rig.vocal.volume(), 0.0);
        assert!((rig.accompaniment.volume() - 0.7).abs() < 1e-9);

        let engine = rig.controller.engine();
        let vocal = engine.stream_position(StreamKind::Vocal).unwrap();
        assert!((vocal - 12.0).abs() < 1e-9);
        assert!((engine.stream_position(StreamKind::Accompaniment).unwrap() - vocal).abs() < 1e-9);
        assert!((engine.stream_position(StreamKind::Video).unwrap() - vocal).abs() < 1e-9);
        assert_eq!(rig.video.volume(), 0.0);
    }

    #[test]
    fn test_mute_remembers_volume() {
        let mut rig = rig();
        rig.controller.on_found();
        rig.controller.dispatch(PlayerCommand::ToggleMute).unwrap();
        assert_eq!(rig.vocal.volume(), 0.0);

        rig.controller.dispatch(PlayerCommand::SetVolume(0.5)).unwrap();
        assert_eq!(rig.vocal.volume(), 0.0);

        rig.controller.dispatch(PlayerCommand::ToggleMute).unwrap();
        assert!((rig.vocal.volume() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_seek_gesture() {
        let mut rig = rig();
        rig.controller.on_found();

        rig.controller.dispatch(PlayerCommand::SeekPointerDown).unwrap();
        assert!(rig.controller.engine().is_seeking());
        rig.controller.dispatch(PlayerCommand::SeekFraction(0.25)).unwrap();
        assert!((rig.controller.engine().position() - 45.0).abs() < 1e-9);

        rig.controller.dispatch(PlayerCommand::SeekPointerUp(0.5)).unwrap();
        assert!(!rig.controller.engine().is_seeking());
        assert!((rig.controller.engine().position() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_release_after_song_change_is_dropped() {
        let mut rig = rig();
        rig.controller.on_found();
        rig.controller.dispatch(PlayerCommand::SeekPointerDown).unwrap();
        rig.controller.dispatch(PlayerCommand::SeekFraction(0.5)).unwrap();
        rig.controller.dispatch(PlayerCommand::Next).unwrap();

        rig.controller.dispatch(PlayerCommand::SeekPointerUp(0.5)).unwrap();
        assert_eq!(rig.vocal.clip(), Some(AssetRef::new("b-vocal")));
        assert_eq!(rig.controller.engine().position(), 0.0);
        assert!(!rig.controller.engine().is_seeking());
    }

    #[test]
    fn test_release_after_marker_loss_is_dropped() {
        let mut rig = rig();
        rig.controller.on_found();
        rig.advance(20.0);
        rig.controller.dispatch(PlayerCommand::SeekPointerDown).unwrap();
        rig.controller.on_lost();
        rig.controller.on_found();

        rig.controller.dispatch(PlayerCommand::SeekPointerUp(0.9)).unwrap();
        assert!((rig.controller.engine().position() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_volume_ignored() {
        let mut rig = rig();
        rig.controller.dispatch(PlayerCommand::SetVolume(0.4)).unwrap();
        rig.controller.dispatch(PlayerCommand::SetVolume(f64::NAN)).unwrap();
        rig.controller.dispatch(PlayerCommand::SetVolume(f64::NEG_INFINITY)).unwrap();
        assert_eq!(rig.controller.session().volume, 0.4);

        rig.controller.on_found();
        assert!((rig.vocal.volume() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_lost_cancels_seek() {
        let mut rig = rig();
        rig.controller.on_found();
        rig.controller.dispatch(PlayerCommand::SeekPointerDown).unwrap();
        rig.controller.on_lost();
        assert!(!rig.controller.engine().is_seeking());
    }

    #[test]
    fn test_view_buttons() {
        let mut rig = rig();
        let view = rig.controller.view();
        assert!(!view.can_go_next);
        assert!(!view.can_go_previous);
        assert!(!view.is_tracking_active);

        rig.controller.on_found();
        let view = rig.controller.view();
        assert_eq!(view.current_song_name, "A");
        assert!(view.can_go_next);
        assert!(!view.can_go_previous);
        assert_eq!(view.total_time, "03:00");
        assert_eq!(view.play_pause_label(), "Pause");

        rig.controller.dispatch(PlayerCommand::SelectSong(2)).unwrap();
        let view = rig.controller.view();
        assert!(!view.can_go_next);
        assert!(view.can_go_previous);
        assert_eq!(view.total_time, "01:30");
    }

    #[test]
    fn test_success_clears_notice() {
        let mut rig = rig();
        let _ = rig.controller.dispatch(PlayerCommand::ToggleMode);
        assert!(rig.controller.view().notice.is_some());
        rig.controller.on_found();
        assert!(rig.controller.view().notice.is_none());
    }

    #[test]
    fn test_effects_follow_state() {
        let mut rig = rig();
        rig.controller.on_found();
        rig.advance(0.3);
        assert!((rig.controller.pulse_scale() - 1.2).abs() < 1e-9);
        assert!((rig.controller.disc_angle() - 9.0).abs() < 1e-9);

        rig.controller.on_lost();
        rig.advance(1.0);
        assert_eq!(rig.controller.pulse_scale(), 1.0);
        assert!((rig.controller.disc_angle() - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_apply_settings() {
        let mut rig = rig();
        let settings = PlayerSettings {
            resume_from_last_position: false,
            drift_tolerance: 0.25,
            ..PlayerSettings::default()
        };
        rig.controller.apply_settings(&settings);
        assert!(!rig.controller.resume_enabled());
        assert_eq!(rig.controller.engine().tuning().drift_tolerance, 0.25);
        assert_eq!(rig.controller.session().volume_percent(), 70);
    }
}
