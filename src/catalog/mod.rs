// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song catalog.
//!
//! A catalog is an ordered, never-empty list of songs. It is built once at
//! startup and never changes afterwards.

use crate::error::PlayerError;
use crate::media::{AssetRef, StreamKind};

/// A catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    /// Display name
    pub name: String,
    /// Vocal audio clip (master clock)
    pub vocal: Option<AssetRef>,
    /// Accompaniment audio clip
    pub accompaniment: Option<AssetRef>,
    /// Dance video clip
    pub video: Option<AssetRef>,
    /// Character model to spawn
    pub character: Option<AssetRef>,
    /// Dance animation clip name on the character's animator
    pub animation: Option<String>,
    /// Material applied to the video surface
    pub background: Option<AssetRef>,
}

impl Song {
    /// Create a song with no assets
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vocal: None,
            accompaniment: None,
            video: None,
            character: None,
            animation: None,
            background: None,
        }
    }

    pub fn with_vocal(mut self, asset: impl Into<String>) -> Self {
        self.vocal = Some(AssetRef::new(asset));
        self
    }

    pub fn with_accompaniment(mut self, asset: impl Into<String>) -> Self {
        self.accompaniment = Some(AssetRef::new(asset));
        self
    }

    pub fn with_video(mut self, asset: impl Into<String>) -> Self {
        self.video = Some(AssetRef::new(asset));
        self
    }

    pub fn with_character(mut self, asset: impl Into<String>) -> Self {
        self.character = Some(AssetRef::new(asset));
        self
    }

    pub fn with_animation(mut self, clip: impl Into<String>) -> Self {
        self.animation = Some(clip.into());
        self
    }

    pub fn with_background(mut self, asset: impl Into<String>) -> Self {
        self.background = Some(AssetRef::new(asset));
        self
    }

    /// Clip for one of the synchronized streams
    pub fn asset(&self, stream: StreamKind) -> Option<&AssetRef> {
        match stream {
            StreamKind::Vocal => self.vocal.as_ref(),
            StreamKind::Accompaniment => self.accompaniment.as_ref(),
            StreamKind::Video => self.video.as_ref(),
        }
    }
}

/// Ordered, non-empty list of songs
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    songs: Vec<Song>,
}

impl Catalog {
    /// Build a catalog; fails if `songs` is empty
    pub fn new(songs: Vec<Song>) -> Result<Self, PlayerError> {
        if songs.is_empty() {
            return Err(PlayerError::EmptyCatalog);
        }
        Ok(Self { songs })
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    /// Song at `index` wrapped into range
    pub fn wrapped(&self, index: usize) -> (usize, &Song) {
        let index = index % self.songs.len();
        (index, &self.songs[index])
    }

    /// Index after `index`, wrapping to the first song
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.songs.len()
    }

    /// Index before `index`, wrapping to the last song
    pub fn previous_index(&self, index: usize) -> usize {
        let len = self.songs.len();
        (index % len + len - 1) % len
    }

    /// Check an index, reporting it as `InvalidIndex` when out of range
    pub fn check_index(&self, index: usize) -> Result<usize, PlayerError> {
        if index < self.songs.len() {
            Ok(index)
        } else {
            Err(PlayerError::InvalidIndex {
                index,
                len: self.songs.len(),
            })
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Song> {
        self.songs.iter()
    }

    /// Numbered labels for a song list, e.g. "1. Song A"
    pub fn labels(&self) -> Vec<String> {
        self.songs
            .iter()
            .enumerate()
            .map(|(i, song)| format!("{}. {}", i + 1, song.name))
            .collect()
    }
}
