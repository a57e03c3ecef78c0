// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playback backend abstraction and synchronization.
//!
//! This module provides a trait-based abstraction over the audio, video and
//! animation players supplied by the host engine, plus the sync engine that
//! keeps them in lockstep.

pub mod simulated;
pub mod sync;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PlayerError;

pub use simulated::{SimulatedAnimation, SimulatedMedia, SimulatedStream, StreamControl};
pub use sync::{MediaSyncEngine, PlaybackMode, SyncSignal, SyncTuning};

/// Opaque reference to a host asset (clip, model, material)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(pub String);

impl AssetRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three synchronized streams of a song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Vocal,
    Accompaniment,
    Video,
}

impl StreamKind {
    pub const ALL: [StreamKind; 3] = [
        StreamKind::Vocal,
        StreamKind::Accompaniment,
        StreamKind::Video,
    ];
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamKind::Vocal => "vocal",
            StreamKind::Accompaniment => "accompaniment",
            StreamKind::Video => "video",
        };
        f.write_str(name)
    }
}

/// Trait for a single audio or video player.
///
/// Positions and durations are in seconds. Implementations own the
/// playhead; the sync engine only reads and sets it.
pub trait PlaybackHandle: Send {
    /// Load a clip, or clear the player when `asset` is `None`.
    ///
    /// # Returns
    /// * `Ok(true)` if a clip is now loaded
    /// * `Ok(false)` if the player was cleared
    /// * `Err` if the backend rejected the asset
    fn load(&mut self, asset: Option<&AssetRef>) -> Result<bool, PlayerError>;

    fn play(&mut self);

    fn pause(&mut self);

    /// Stop playback and rewind
    fn stop(&mut self);

    fn position(&self) -> f64;

    fn set_position(&mut self, seconds: f64);

    /// Clip length, 0.0 when nothing is loaded
    fn duration(&self) -> f64;

    fn volume(&self) -> f64;

    fn set_volume(&mut self, volume: f64);
}

/// Trait for the character animator
pub trait AnimationHandle: Send {
    /// Start a named clip
    fn play(&mut self, clip: &str);

    /// Playback speed multiplier, 0.0 freezes the pose
    fn set_speed(&mut self, speed: f64);

    fn set_bool(&mut self, parameter: &str, value: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_ref_display() {
        let asset = AssetRef::new("clips/vocal_a.ogg");
        assert_eq!(asset.to_string(), "clips/vocal_a.ogg");
        assert_eq!(asset.as_str(), "clips/vocal_a.ogg");
    }

    #[test]
    fn test_asset_ref_yaml_is_plain_string() {
        let asset: AssetRef = serde_yaml::from_str("\"dance.mp4\"").unwrap();
        assert_eq!(asset, AssetRef::new("dance.mp4"));
    }

    #[test]
    fn test_stream_kind_names() {
        let names: Vec<String> = StreamKind::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["vocal", "accompaniment", "video"]);
    }
}
