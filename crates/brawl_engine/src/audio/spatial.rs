//! Spatial audio
//!
//! Turns a world position into gain and stereo pan relative to a listener pose.

use crate::foundation::math::{horizontal, try_direction, Quat, Vec3};

/// Attenuation curve
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialConfig {
    /// Distance past which nothing is heard
    pub max_distance: f32,
    /// Full gain up to this distance
    pub reference_distance: f32,
    /// Shape of the falloff between the two (1 linear, 2 quadratic)
    pub falloff_exponent: f32,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            max_distance: 60.0,
            reference_distance: 4.0,
            falloff_exponent: 1.0,
        }
    }
}

/// How one sound reaches the listener
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emission {
    /// 0 (silent) to 1
    pub gain: f32,
    /// -1 hard left to 1 hard right
    pub pan: f32,
}

impl Emission {
    /// Whether the sound is heard at all
    pub fn is_audible(&self) -> bool {
        self.gain > 0.0
    }
}

/// Listener pose plus the attenuation curve
#[derive(Debug, Clone)]
pub struct SpatialAudio {
    config: SpatialConfig,
    position: Vec3,
    orientation: Quat,
}

impl SpatialAudio {
    /// Listener at the origin facing -Z
    pub fn new(config: SpatialConfig) -> Self {
        Self {
            config,
            position: Vec3::zeros(),
            orientation: Quat::identity(),
        }
    }

    /// Move the listener, normally to the active camera's pose
    pub fn set_listener(&mut self, position: Vec3, orientation: Quat) {
        self.position = position;
        self.orientation = orientation;
    }

    /// Listener position
    pub fn listener_position(&self) -> Vec3 {
        self.position
    }

    /// Distance gain for a sound at `position`
    pub fn gain(&self, position: Vec3) -> f32 {
        let SpatialConfig {
            max_distance,
            reference_distance,
            falloff_exponent,
        } = self.config;
        let distance = (position - self.position).norm();

        if distance > max_distance {
            0.0
        } else if distance <= reference_distance {
            1.0
        } else {
            let t = (distance - reference_distance) / (max_distance - reference_distance);
            (1.0 - t.powf(falloff_exponent)).max(0.0)
        }
    }

    /// Gain and pan for a sound at `position`
    pub fn emission(&self, position: Vec3) -> Emission {
        let right = self.orientation * Vec3::x();
        // Sounds on top of the listener or straight above are centred
        let pan = try_direction(horizontal(position - self.position)).map_or(0.0, |dir| dir.dot(&right));
        Emission {
            gain: self.gain(position),
            pan: pan.clamp(-1.0, 1.0),
        }
    }
}

impl Default for SpatialAudio {
    fn default() -> Self {
        Self::new(SpatialConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::yaw_rotation;
    use approx::assert_relative_eq;

    #[test]
    fn test_gain_curve() {
        let spatial = SpatialAudio::default();
        assert_eq!(spatial.gain(Vec3::new(0.0, 4.0, 0.0)), 1.0);
        assert_relative_eq!(spatial.gain(Vec3::new(32.0, 0.0, 0.0)), 0.5);
        assert_eq!(spatial.gain(Vec3::new(0.0, 0.0, -100.0)), 0.0);
    }

    #[test]
    fn test_gain_follows_listener() {
        let mut spatial = SpatialAudio::default();
        spatial.set_listener(Vec3::new(100.0, 0.0, 0.0), Quat::identity());
        assert_eq!(spatial.gain(Vec3::new(101.0, 0.0, 0.0)), 1.0);
        assert!(!spatial.emission(Vec3::zeros()).is_audible());
    }

    #[test]
    fn test_pan_turns_with_listener() {
        let mut spatial = SpatialAudio::default();
        assert_relative_eq!(spatial.emission(Vec3::new(5.0, 0.0, 0.0)).pan, 1.0, epsilon = 1.0e-6);
        assert_relative_eq!(spatial.emission(Vec3::new(0.0, 0.0, -5.0)).pan, 0.0, epsilon = 1.0e-6);
        assert_eq!(spatial.emission(Vec3::new(0.0, 9.0, 0.0)).pan, 0.0);

        // Turned left, a sound straight ahead in world space is now on the right
        spatial.set_listener(Vec3::zeros(), yaw_rotation(std::f32::consts::FRAC_PI_2));
        assert_relative_eq!(spatial.emission(Vec3::new(0.0, 0.0, -5.0)).pan, 1.0, epsilon = 1.0e-6);
    }
}
