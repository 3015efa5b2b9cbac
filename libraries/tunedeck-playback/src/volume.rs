//! Volume control
//!
//! Browser media elements take a linear volume in [0, 1]; the embedded video
//! player wants an integer percentage. Mute is tracked separately so the level
//! survives a mute/unmute cycle.

/// Volume controller
#[derive(Debug, Clone)]
pub struct Volume {
    /// Volume level in [0, 1]
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller
    pub fn new(level: f32, muted: bool) -> Self {
        let mut volume = Self { level: 1.0, muted };
        volume.set_level(level);
        volume
    }

    /// Set volume level, clamped to [0, 1]
    ///
    /// Returns `false` (and leaves the level alone) for NaN input.
    pub fn set_level(&mut self, level: f32) -> bool {
        if level.is_nan() {
            return false;
        }
        self.level = level.clamp(0.0, 1.0);
        true
    }

    /// Get current volume level
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Mute audio (preserves volume level)
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Unmute audio (restores previous volume)
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Effective linear gain (0 when muted)
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }

    /// Level as a 0-100 percentage for the embedded video player
    pub fn percent(&self) -> u8 {
        (self.level * 100.0).round() as u8
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_volume() {
        let vol = Volume::new(0.8, false);
        assert_eq!(vol.level(), 0.8);
        assert!(!vol.is_muted());
    }

    #[test]
    fn set_volume_level_clamps() {
        let mut vol = Volume::default();

        assert!(vol.set_level(-0.3));
        assert_eq!(vol.level(), 0.0);

        assert!(vol.set_level(1.7));
        assert_eq!(vol.level(), 1.0);

        assert!(vol.set_level(0.25));
        assert_eq!(vol.level(), 0.25);
    }

    #[test]
    fn nan_is_ignored() {
        let mut vol = Volume::new(0.4, false);
        assert!(!vol.set_level(f32::NAN));
        assert_eq!(vol.level(), 0.4);
    }

    #[test]
    fn infinities_clamp() {
        let mut vol = Volume::default();
        vol.set_level(f32::INFINITY);
        assert_eq!(vol.level(), 1.0);
        vol.set_level(f32::NEG_INFINITY);
        assert_eq!(vol.level(), 0.0);
    }

    #[test]
    fn mute_preserves_level() {
        let mut vol = Volume::new(0.8, false);

        vol.mute();
        assert!(vol.is_muted());
        assert_eq!(vol.level(), 0.8);
        assert_eq!(vol.gain(), 0.0);

        vol.unmute();
        assert_eq!(vol.gain(), 0.8);
    }

    #[test]
    fn toggle_mute() {
        let mut vol = Volume::default();

        vol.toggle_mute();
        assert!(vol.is_muted());

        vol.toggle_mute();
        assert!(!vol.is_muted());
    }

    #[test]
    fn percent_rounds() {
        assert_eq!(Volume::new(0.0, false).percent(), 0);
        assert_eq!(Volume::new(0.333, false).percent(), 33);
        assert_eq!(Volume::new(0.995, false).percent(), 100);
        assert_eq!(Volume::new(1.0, true).percent(), 100);
    }
}
