// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for the playback core.
//!
//! None of these are fatal. The controller absorbs every one of them,
//! logs it, and degrades to skipping the affected feature.

use thiserror::Error;

use crate::media::StreamKind;

/// Player error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayerError {
    /// A song references an absent clip for this stream
    #[error("No asset loaded for {stream} stream")]
    MissingAsset { stream: StreamKind },

    /// Catalog index out of bounds
    #[error("Song index {index} out of range for catalog of {len}")]
    InvalidIndex { index: usize, len: usize },

    /// Command issued while no marker is tracked
    #[error("Scan the marker first")]
    NotTracked,

    /// Seek or progress query with no loaded clip
    #[error("No clip loaded")]
    NoActiveClip,

    /// Catalog must contain at least one song
    #[error("Catalog is empty")]
    EmptyCatalog,

    /// Playback backend reported a failure
    #[error("Backend error: {0}")]
    Backend(String),
}

impl PlayerError {
    /// Whether the error is a user-facing advisory rather than a fault
    pub fn is_advisory(&self) -> bool {
        matches!(self, PlayerError::NotTracked)
    }
}
