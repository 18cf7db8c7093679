//! Player preferences
//!
//! Kept for the lifetime of the page only; nothing is persisted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Sound effects on/off (the sound toggle button)
    pub sound_enabled: bool,
    /// Effects volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            volume: 0.8,
        }
    }
}

impl Settings {
    /// Flip the sound toggle, returning the new state
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        log::info!(
            "Sound {}",
            if self.sound_enabled { "enabled" } else { "muted" }
        );
        self.sound_enabled
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Volume actually applied to effects (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.sound_enabled { self.volume } else { 0.0 }
    }

    /// Label for the sound toggle button
    pub fn sound_label(&self) -> &'static str {
        if self.sound_enabled { "Sound: on" } else { "Sound: off" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_mutes() {
        let mut settings = Settings::default();
        assert!(settings.effective_volume() > 0.0);
        assert!(!settings.toggle_sound());
        assert_eq!(settings.effective_volume(), 0.0);
        assert_eq!(settings.sound_label(), "Sound: off");
        assert!(settings.toggle_sound());
    }

    #[test]
    fn test_volume_clamped() {
        let mut settings = Settings::default();
        settings.set_volume(3.0);
        assert_eq!(settings.volume, 1.0);
        settings.set_volume(-1.0);
        assert_eq!(settings.volume, 0.0);
    }
}
