// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Commands issued by the catalog UI.

/// Action requested by the user
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    // Catalog
    /// Load a song by catalog index and play it
    SelectSong(usize),
    /// Load the next song (wraps)
    Next,
    /// Load the previous song (wraps)
    Previous,

    // Transport
    /// Toggle play/pause
    TogglePlayPause,
    /// Seek to a fraction (0.0 - 1.0) of the song
    SeekFraction(f64),
    /// Progress slider grabbed
    SeekPointerDown,
    /// Progress slider released at a fraction
    SeekPointerUp(f64),

    // Mix
    /// Set volume (0.0 - 1.0)
    SetVolume(f64),
    /// Toggle mute
    ToggleMute,
    /// Switch between vocal and accompaniment emphasis
    ToggleMode,
}

impl PlayerCommand {
    /// Check if this command changes the loaded song
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            PlayerCommand::SelectSong(_) | PlayerCommand::Next | PlayerCommand::Previous
        )
    }

    /// Check if this is a transport command
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            PlayerCommand::TogglePlayPause
                | PlayerCommand::SeekFraction(_)
                | PlayerCommand::SeekPointerDown
                | PlayerCommand::SeekPointerUp(_)
        )
    }

    /// Whether the command is refused while no marker is tracked.
    ///
    /// Only the volume slider stays live; its value is applied on the next
    /// activation.
    pub fn requires_tracking(&self) -> bool {
        !matches!(self, PlayerCommand::SetVolume(_))
    }
}
