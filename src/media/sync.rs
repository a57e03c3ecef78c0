// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Synchronized playback of vocal, accompaniment, video and animation.
//!
//! The vocal stream is the master clock. Accompaniment and video are
//! slaved to it: every tick the engine reads the vocal position and snaps
//! any slave that has drifted past the tolerance. The engine never moves
//! a playhead forward on its own.

use tracing::{debug, warn};

use crate::catalog::Song;
use crate::error::PlayerError;

use super::{AnimationHandle, PlaybackHandle, StreamKind};

/// Default maximum slave drift before correction, in seconds
pub const DEFAULT_DRIFT_TOLERANCE: f64 = 0.1;

/// Default distance from the end at which a song counts as finished
pub const DEFAULT_END_MARGIN: f64 = 0.1;

/// Animator parameter raised while a character is dancing
pub const DANCING_PARAMETER: &str = "IsDancing";

/// Audio routing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackMode {
    /// Vocal track audible, accompaniment silent
    #[default]
    Vocal,
    /// Accompaniment audible, vocal silent
    Accompaniment,
}

impl PlaybackMode {
    pub fn toggled(self) -> Self {
        match self {
            PlaybackMode::Vocal => PlaybackMode::Accompaniment,
            PlaybackMode::Accompaniment => PlaybackMode::Vocal,
        }
    }

    pub fn is_vocal(self) -> bool {
        self == PlaybackMode::Vocal
    }
}

/// Signals raised by [`MediaSyncEngine::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncSignal {
    /// The master clock reached the end of the song while playing
    SongEnded,
}

/// Tunable thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncTuning {
    pub drift_tolerance: f64,
    pub end_margin: f64,
}

impl Default for SyncTuning {
    fn default() -> Self {
        Self {
            drift_tolerance: DEFAULT_DRIFT_TOLERANCE,
            end_margin: DEFAULT_END_MARGIN,
        }
    }
}

/// A backend plus whether it currently holds a clip
struct Channel {
    kind: StreamKind,
    handle: Box<dyn PlaybackHandle>,
    loaded: bool,
}

impl Channel {
    fn new(kind: StreamKind, handle: Box<dyn PlaybackHandle>) -> Self {
        Self {
            kind,
            handle,
            loaded: false,
        }
    }
}

/// Volume routing state
#[derive(Debug, Clone, Copy, PartialEq)]
struct Routing {
    mode: PlaybackMode,
    /// Preferred volume; kept while muted so unmute can restore it
    volume: f64,
    muted: bool,
}

impl Routing {
    fn effective(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    /// (vocal, accompaniment) volumes
    fn split(&self) -> (f64, f64) {
        let level = self.effective();
        match self.mode {
            PlaybackMode::Vocal => (level, 0.0),
            PlaybackMode::Accompaniment => (0.0, level),
        }
    }
}

/// Keeps the streams of one song in lockstep
pub struct MediaSyncEngine {
    vocal: Channel,
    accompaniment: Channel,
    video: Channel,
    animation: Option<Box<dyn AnimationHandle>>,
    routing: Routing,
    tuning: SyncTuning,
    playing: bool,
    seeking: bool,
    corrections: u64,
}

impl MediaSyncEngine {
    /// Create an engine over the three playback backends
    pub fn new(
        vocal: Box<dyn PlaybackHandle>,
        accompaniment: Box<dyn PlaybackHandle>,
        video: Box<dyn PlaybackHandle>,
    ) -> Self {
        let mut engine = Self {
            vocal: Channel::new(StreamKind::Vocal, vocal),
            accompaniment: Channel::new(StreamKind::Accompaniment, accompaniment),
            video: Channel::new(StreamKind::Video, video),
            animation: None,
            routing: Routing {
                mode: PlaybackMode::Vocal,
                volume: 1.0,
                muted: false,
            },
            tuning: SyncTuning::default(),
            playing: false,
            seeking: false,
            corrections: 0,
        };
        engine.apply_routing();
        engine
    }

    pub fn set_tuning(&mut self, tuning: SyncTuning) {
        self.tuning = tuning;
    }

    pub fn tuning(&self) -> SyncTuning {
        self.tuning
    }

    fn channels_mut(&mut self) -> [&mut Channel; 3] {
        [&mut self.vocal, &mut self.accompaniment, &mut self.video]
    }

    /// Load a song's clips and take over its animator.
    ///
    /// All streams are stopped and rewound to zero. Streams whose asset is
    /// absent (or rejected by the backend) are left empty and skipped by
    /// later transport calls; each one is reported in the returned list.
    pub fn load(
        &mut self,
        song: &Song,
        animation: Option<Box<dyn AnimationHandle>>,
    ) -> Vec<PlayerError> {
        self.unload();
        let mut problems = Vec::new();

        for channel in self.channels_mut() {
            let asset = song.asset(channel.kind);
            channel.loaded = match channel.handle.load(asset) {
                Ok(true) => true,
                Ok(false) => {
                    problems.push(PlayerError::MissingAsset { stream: channel.kind });
                    false
                }
                Err(e) => {
                    warn!("Failed to load {} stream for '{}': {}", channel.kind, song.name, e);
                    problems.push(e);
                    false
                }
            };
            if channel.loaded {
                channel.handle.set_position(0.0);
            }
        }

        for problem in &problems {
            if let PlayerError::MissingAsset { stream } = problem {
                warn!("Song '{}' has no {} clip; stream skipped", song.name, stream);
            }
        }

        self.animation = animation;
        if let Some(anim) = self.animation.as_mut() {
            anim.set_bool(DANCING_PARAMETER, true);
            if let Some(clip) = song.animation.as_deref() {
                anim.play(clip);
            }
            anim.set_speed(0.0);
        }

        self.apply_routing();
        debug!("Loaded '{}' ({:.1}s)", song.name, self.duration());
        problems
    }

    /// Clear every stream and drop the animator
    pub fn unload(&mut self) {
        self.cancel_seek();
        self.playing = false;
        for channel in self.channels_mut() {
            channel.handle.stop();
            if let Err(e) = channel.handle.load(None) {
                warn!("Failed to clear {} stream: {}", channel.kind, e);
            }
            channel.loaded = false;
        }
        self.animation = None;
    }

    /// Start every loaded stream and the animation
    pub fn play(&mut self) {
        self.playing = true;
        for channel in self.channels_mut() {
            if channel.loaded {
                channel.handle.play();
            }
        }
        if let Some(anim) = self.animation.as_mut() {
            anim.set_speed(1.0);
        }
    }

    /// Pause every loaded stream and freeze the animation
    pub fn pause(&mut self) {
        self.playing = false;
        for channel in self.channels_mut() {
            if channel.loaded {
                channel.handle.pause();
            }
        }
        if let Some(anim) = self.animation.as_mut() {
            anim.set_speed(0.0);
        }
    }

    /// Stop and rewind every loaded stream
    pub fn stop(&mut self) {
        self.cancel_seek();
        self.playing = false;
        for channel in self.channels_mut() {
            if channel.loaded {
                channel.handle.stop();
            }
        }
        if let Some(anim) = self.animation.as_mut() {
            anim.set_speed(0.0);
        }
    }

    /// Move every loaded stream to `clamp(seconds, 0, duration)`.
    ///
    /// Returns the position actually applied.
    pub fn seek(&mut self, seconds: f64) -> Result<f64, PlayerError> {
        if !self.vocal.loaded {
            return Err(PlayerError::NoActiveClip);
        }
        let target = if seconds.is_finite() {
            seconds.clamp(0.0, self.duration())
        } else {
            0.0
        };
        for channel in self.channels_mut() {
            if channel.loaded {
                channel.handle.set_position(target);
            }
        }
        Ok(target)
    }

    /// Seek to a fraction (0..1) of the song
    pub fn seek_fraction(&mut self, fraction: f64) -> Result<f64, PlayerError> {
        if !self.vocal.loaded {
            return Err(PlayerError::NoActiveClip);
        }
        let duration = self.duration();
        self.seek(fraction.clamp(0.0, 1.0) * duration)
    }

    /// Mark a user scrub as in progress; drift correction is suspended
    pub fn begin_seek(&mut self) {
        self.seeking = true;
    }

    /// Finish a user scrub
    pub fn end_seek(&mut self) {
        self.seeking = false;
    }

    /// Abort an in-flight scrub without applying anything
    pub fn cancel_seek(&mut self) {
        if self.seeking {
            debug!("In-flight seek cancelled");
        }
        self.seeking = false;
    }

    pub fn is_seeking(&self) -> bool {
        self.seeking
    }

    /// Route volume between vocal and accompaniment; positions untouched
    pub fn set_mode(&mut self, mode: PlaybackMode) {
        self.routing.mode = mode;
        self.apply_routing();
    }

    /// Set the preferred volume (0..1). While muted only the remembered
    /// level changes. Non-finite values are ignored.
    pub fn set_volume(&mut self, volume: f64) {
        if !volume.is_finite() {
            debug!("Ignoring non-finite volume {}", volume);
            return;
        }
        self.routing.volume = volume.clamp(0.0, 1.0);
        self.apply_routing();
    }

    pub fn set_mute(&mut self, muted: bool) {
        self.routing.muted = muted;
        self.apply_routing();
    }

    fn apply_routing(&mut self) {
        let (vocal, accompaniment) = self.routing.split();
        self.vocal.handle.set_volume(vocal);
        self.accompaniment.handle.set_volume(accompaniment);
        // Video audio is routed through the two audio tracks
        self.video.handle.set_volume(0.0);
    }

    /// Per-frame update: re-align slaves and detect the end of the song
    pub fn tick(&mut self, _dt: f64) -> Option<SyncSignal> {
        if !self.playing || !self.vocal.loaded {
            return None;
        }

        let master = self.vocal.handle.position();

        if !self.seeking {
            let tolerance = self.tuning.drift_tolerance;
            let mut corrected = 0;
            for channel in [&mut self.accompaniment, &mut self.video] {
                if !channel.loaded {
                    continue;
                }
                let drift = channel.handle.position() - master;
                if drift.abs() > tolerance {
                    debug!("{} drifted {:+.3}s, snapping to {:.3}s", channel.kind, drift, master);
                    channel.handle.set_position(master);
                    corrected += 1;
                }
            }
            self.corrections += corrected;
        }

        let duration = self.duration();
        if duration > 0.0 && master >= duration - self.tuning.end_margin {
            return Some(SyncSignal::SongEnded);
        }

        None
    }

    /// Master clock position in seconds
    pub fn position(&self) -> f64 {
        if self.vocal.loaded {
            self.vocal.handle.position()
        } else {
            0.0
        }
    }

    /// Master clip duration in seconds
    pub fn duration(&self) -> f64 {
        if self.vocal.loaded {
            self.vocal.handle.duration()
        } else {
            0.0
        }
    }

    /// Position as a fraction of duration
    pub fn progress(&self) -> Result<f64, PlayerError> {
        let duration = self.duration();
        if !self.vocal.loaded || duration <= 0.0 {
            return Err(PlayerError::NoActiveClip);
        }
        Ok((self.position() / duration).clamp(0.0, 1.0))
    }

    /// Position of a single stream, `None` if it holds no clip
    pub fn stream_position(&self, kind: StreamKind) -> Option<f64> {
        let channel = match kind {
            StreamKind::Vocal => &self.vocal,
            StreamKind::Accompaniment => &self.accompaniment,
            StreamKind::Video => &self.video,
        };
        channel.loaded.then(|| channel.handle.position())
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether the master clip is loaded
    pub fn has_clip(&self) -> bool {
        self.vocal.loaded
    }

    pub fn mode(&self) -> PlaybackMode {
        self.routing.mode
    }

    pub fn volume(&self) -> f64 {
        self.routing.volume
    }

    pub fn is_muted(&self) -> bool {
        self.routing.muted
    }

    /// Number of drift corrections applied so far
    pub fn corrections(&self) -> u64 {
        self.corrections
    }
}
