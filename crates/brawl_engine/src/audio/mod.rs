//! Audio seam
//!
//! Gameplay never talks to a sound library. It asks an [`AudioBackend`] to play a
//! [`SoundGroup`] at a world position; footsteps and jumps reach the backend
//! through the [`SoundCues`] observer subscribed to an entity.

pub mod cues;
pub mod spatial;

pub use cues::SoundCues;
pub use spatial::{Emission, SpatialAudio, SpatialConfig};

use crate::foundation::math::{Quat, Vec3};

/// Categories of one-shot sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundGroup {
    /// A grounded step
    Footstep,
    /// Ground or air jump
    Jump,
    /// Explosion ability
    Explosion,
    /// Projectile launch
    Projectile,
}

/// Sound output consumed by the engine
pub trait AudioBackend {
    /// Play one sound of `group` at `position`
    fn play(&mut self, group: SoundGroup, position: Vec3);

    /// Move the listener; backends without spatialisation ignore it
    fn set_listener(&mut self, _position: Vec3, _orientation: Quat) {}
}

/// Backend that discards every sound
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn play(&mut self, _group: SoundGroup, _position: Vec3) {}
}

/// Backend that logs each sound with its gain and pan
#[derive(Debug, Clone, Default)]
pub struct LogAudio {
    spatial: SpatialAudio,
}

impl LogAudio {
    /// Create a logging backend with the given attenuation model
    pub fn new(spatial: SpatialAudio) -> Self {
        Self { spatial }
    }
}

impl AudioBackend for LogAudio {
    fn play(&mut self, group: SoundGroup, position: Vec3) {
        let emission = self.spatial.emission(position);
        if emission.is_audible() {
            log::info!("Sound {:?} (gain {:.2}, pan {:+.2})", group, emission.gain, emission.pan);
        } else {
            log::trace!("Sound {:?} out of range", group);
        }
    }

    fn set_listener(&mut self, position: Vec3, orientation: Quat) {
        self.spatial.set_listener(position, orientation);
    }
}

/// Backend that keeps every request, for tests and replay tooling
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    played: Vec<(SoundGroup, Vec3)>,
}

impl RecordingAudio {
    /// Every sound played so far, oldest first
    pub fn played(&self) -> &[(SoundGroup, Vec3)] {
        &self.played
    }

    /// How many sounds of `group` were played
    pub fn count(&self, group: SoundGroup) -> usize {
        self.played.iter().filter(|(played, _)| *played == group).count()
    }
}

impl AudioBackend for RecordingAudio {
    fn play(&mut self, group: SoundGroup, position: Vec3) {
        self.played.push((group, position));
    }
}
