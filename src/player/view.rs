// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Display state pushed to the catalog UI.

/// Snapshot of everything the UI shows
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub current_song_name: String,
    pub is_playing: bool,
    pub is_vocal_mode: bool,
    pub volume_percent: u32,
    pub is_muted: bool,
    /// Playhead as mm:ss
    pub current_time: String,
    /// Song length as mm:ss
    pub total_time: String,
    pub progress_fraction: f64,
    pub can_go_next: bool,
    pub can_go_previous: bool,
    pub is_tracking_active: bool,
    /// Advisory for the user, e.g. after a refused command
    pub notice: Option<String>,
}

impl PlayerView {
    /// Label for the play/pause button
    pub fn play_pause_label(&self) -> &'static str {
        if self.is_playing {
            "Pause"
        } else {
            "Play"
        }
    }

    /// Label for the mode indicator
    pub fn mode_label(&self) -> &'static str {
        if self.is_vocal_mode {
            "Vocal"
        } else {
            "Accompaniment"
        }
    }

    pub fn mute_label(&self) -> &'static str {
        if self.is_muted {
            "Unmute"
        } else {
            "Mute"
        }
    }
}

/// Format seconds as mm:ss, flooring to whole seconds
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(45.9), "00:45");
        assert_eq!(format_time(180.0), "03:00");
        assert_eq!(format_time(3725.0), "62:05");
        assert_eq!(format_time(-2.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
    }

    #[test]
    fn test_labels() {
        let mut view = PlayerView {
            current_song_name: "A".to_string(),
            is_playing: true,
            is_vocal_mode: true,
            volume_percent: 70,
            is_muted: false,
            current_time: format_time(0.0),
            total_time: format_time(180.0),
            progress_fraction: 0.0,
            can_go_next: true,
            can_go_previous: false,
            is_tracking_active: true,
            notice: None,
        };
        assert_eq!(view.play_pause_label(), "Pause");
        assert_eq!(view.mode_label(), "Vocal");
        assert_eq!(view.mute_label(), "Mute");

        view.is_playing = false;
        view.is_vocal_mode = false;
        view.is_muted = true;
        assert_eq!(view.play_pause_label(), "Play");
        assert_eq!(view.mode_label(), "Accompaniment");
        assert_eq!(view.mute_label(), "Unmute");
    }
}
