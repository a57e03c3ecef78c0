// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for ARCD.
//!
//! This module provides data structures for loading the song catalog
//! (`catalog.yaml`) and the player settings (`player.toml`).

pub mod watcher;

pub use watcher::{validate_settings_file, SettingsEvent, SettingsWatcher};

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Song};
use crate::media::{AssetRef, SyncTuning};

/// Root of a catalog file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CatalogFile {
    /// Songs in display order
    #[serde(default)]
    pub songs: Vec<SongEntry>,
}

impl CatalogFile {
    /// Load a catalog from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read catalog file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse a catalog from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse catalog YAML")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize catalog to YAML")
    }

    /// Save the catalog to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write catalog file: {:?}", path.as_ref()))
    }

    /// Clip lengths for the simulated backends.
    ///
    /// Every clip a song references gets that song's `length`, or
    /// `default_length` when none is given.
    pub fn clip_lengths(&self, default_length: f64) -> HashMap<AssetRef, f64> {
        let mut lengths = HashMap::new();
        for entry in &self.songs {
            let length = entry.length.unwrap_or(default_length);
            for clip in [&entry.vocal, &entry.accompaniment, &entry.video].into_iter().flatten() {
                lengths.insert(clip.clone(), length);
            }
        }
        lengths
    }

    /// Build the runtime catalog
    pub fn into_catalog(self) -> Result<Catalog> {
        let songs = self.songs.into_iter().map(Song::from).collect();
        Catalog::new(songs).context("Catalog file lists no songs")
    }
}

/// One song in the catalog file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongEntry {
    /// Song name
    pub name: String,
    /// Vocal audio clip
    #[serde(default)]
    pub vocal: Option<AssetRef>,
    /// Accompaniment audio clip
    #[serde(default)]
    pub accompaniment: Option<AssetRef>,
    /// Dance video clip
    #[serde(default)]
    pub video: Option<AssetRef>,
    /// Character model
    #[serde(default)]
    pub character: Option<AssetRef>,
    /// Dance animation clip name
    #[serde(default)]
    pub animation: Option<String>,
    /// Background material for the video surface
    #[serde(default)]
    pub background: Option<AssetRef>,
    /// Clip length in seconds; only used by the simulated backends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
}

impl From<SongEntry> for Song {
    fn from(entry: SongEntry) -> Self {
        Song {
            name: entry.name,
            vocal: entry.vocal,
            accompaniment: entry.accompaniment,
            video: entry.video,
            character: entry.character,
            animation: entry.animation,
            background: entry.background,
        }
    }
}

/// Player behaviour settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerSettings {
    /// Resume at the position where tracking was lost
    #[serde(default = "default_resume")]
    pub resume_from_last_position: bool,
    /// Volume slider position at startup (0.0 - 1.0)
    #[serde(default = "default_volume")]
    pub initial_volume: f64,
    /// Maximum slave drift before correction, in seconds
    #[serde(default = "default_drift_tolerance")]
    pub drift_tolerance: f64,
    /// Distance from the end at which a song counts as finished
    #[serde(default = "default_end_margin")]
    pub end_margin: f64,
    /// Frame loop rate in Hz
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

fn default_resume() -> bool {
    true
}
fn default_volume() -> f64 {
    0.7
}
fn default_drift_tolerance() -> f64 {
    0.1
}
fn default_end_margin() -> f64 {
    0.1
}
fn default_frame_rate() -> u32 {
    60
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            resume_from_last_position: default_resume(),
            initial_volume: default_volume(),
            drift_tolerance: default_drift_tolerance(),
            end_margin: default_end_margin(),
            frame_rate: default_frame_rate(),
        }
    }
}

impl PlayerSettings {
    /// Load settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read settings file: {:?}", path.as_ref()))?;
        Self::from_toml(&contents)
    }

    /// Parse and validate settings from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text).context("Failed to parse settings TOML")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize settings to TOML")
    }

    /// Save settings to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = self.to_toml()?;
        fs::write(path.as_ref(), text)
            .with_context(|| format!("Failed to write settings file: {:?}", path.as_ref()))
    }

    /// Reject values the player cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.initial_volume) {
            bail!("initial_volume must be within 0.0 - 1.0, got {}", self.initial_volume);
        }
        if !(self.drift_tolerance > 0.0 && self.drift_tolerance.is_finite()) {
            bail!("drift_tolerance must be positive, got {}", self.drift_tolerance);
        }
        if !(self.end_margin >= 0.0 && self.end_margin.is_finite()) {
            bail!("end_margin must not be negative, got {}", self.end_margin);
        }
        if self.frame_rate == 0 || self.frame_rate > 240 {
            bail!("frame_rate must be within 1 - 240, got {}", self.frame_rate);
        }
        Ok(())
    }

    /// Thresholds for the sync engine
    pub fn tuning(&self) -> SyncTuning {
        SyncTuning {
            drift_tolerance: self.drift_tolerance,
            end_margin: self.end_margin,
        }
    }
}
