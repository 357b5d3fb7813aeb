//! Volume level
//!
//! The media backend takes a linear volume in 0.0..=1.0; this keeps the cached
//! value inside that range no matter what the caller passes.

/// Volume level (0.0-1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    level: f32,
}

impl Volume {
    /// Create new volume level
    ///
    /// Out-of-range values are clamped, NaN becomes full volume
    pub fn new(level: f32) -> Self {
        let mut volume = Self { level: 1.0 };
        volume.set_level(level);
        volume
    }

    /// Set volume level
    ///
    /// Out-of-range values are clamped; NaN leaves the level unchanged
    pub fn set_level(&mut self, level: f32) {
        if !level.is_nan() {
            self.level = level.clamp(0.0, 1.0);
        }
    }

    /// Current level
    pub fn level(&self) -> f32 {
        self.level
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_into_range() {
        assert_eq!(Volume::new(1.7).level(), 1.0);
        assert_eq!(Volume::new(-0.2).level(), 0.0);
        assert_eq!(Volume::new(0.35).level(), 0.35);
    }

    #[test]
    fn nan_is_ignored() {
        let mut volume = Volume::new(0.4);
        volume.set_level(f32::NAN);
        assert_eq!(volume.level(), 0.4);
        assert_eq!(Volume::new(f32::NAN).level(), 1.0);
    }
}
