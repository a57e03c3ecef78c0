// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! ARCD - marker-triggered karaoke playback core.
//!
//! When the camera recognizes the record marker, the current song starts:
//! vocal and accompaniment audio, a dance video and an animated character,
//! all kept in lockstep. Losing the marker pauses everything and remembers
//! where to resume.

pub mod app;
pub mod catalog;
pub mod config;
pub mod effects;
pub mod error;
pub mod media;
pub mod player;
pub mod stage;
pub mod tracking;

pub use app::App;
pub use catalog::{Catalog, Song};
pub use config::{CatalogFile, PlayerSettings};
pub use error::PlayerError;
pub use media::{MediaSyncEngine, PlaybackMode};
pub use player::{PlaybackController, PlayerCommand, PlayerState, PlayerView};
pub use tracking::{TargetStatus, TrackingBridge, TrackingEvent, TrackingListener};
