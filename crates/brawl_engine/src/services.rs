//! Shared engine services
//!
//! Built once by the engine and handed to every tick by reference. Nothing in
//! here is global.

use crate::assets::AssetManager;
use crate::audio::{AudioBackend, NullAudio, SoundCues, SoundGroup};
use crate::ecs::GameObject;
use crate::foundation::math::{Quat, Vec3};
use std::cell::RefCell;
use std::rc::Rc;

/// Audio, sound cues and assets
pub struct Services {
    audio: Rc<RefCell<dyn AudioBackend>>,
    sound_cues: Rc<RefCell<SoundCues>>,
    assets: RefCell<AssetManager>,
}

impl Services {
    /// Services around the given audio backend and asset manager
    pub fn new(audio: Rc<RefCell<dyn AudioBackend>>, assets: AssetManager) -> Self {
        let sound_cues = Rc::new(RefCell::new(SoundCues::new(Rc::clone(&audio))));
        Self {
            audio,
            sound_cues,
            assets: RefCell::new(assets),
        }
    }

    /// Silent audio and built-in assets
    pub fn headless() -> Self {
        Self::new(Rc::new(RefCell::new(NullAudio)), AssetManager::default())
    }

    /// Shared audio backend
    pub fn audio(&self) -> &Rc<RefCell<dyn AudioBackend>> {
        &self.audio
    }

    /// Play one sound; dropped with a warning if the backend is busy
    pub fn play(&self, group: SoundGroup, position: Vec3) {
        match self.audio.try_borrow_mut() {
            Ok(mut audio) => audio.play(group, position),
            Err(_) => log::warn!("Audio backend busy, dropped {:?}", group),
        }
    }

    /// Move the audio listener
    pub fn set_listener(&self, position: Vec3, orientation: Quat) {
        if let Ok(mut audio) = self.audio.try_borrow_mut() {
            audio.set_listener(position, orientation);
        }
    }

    /// Make footsteps and jumps of `entity` audible
    pub fn listen_for_cues(&self, entity: &mut GameObject) {
        entity.add_observer(&self.sound_cues);
    }

    /// The shared sound-cue observer
    pub fn sound_cues(&self) -> &Rc<RefCell<SoundCues>> {
        &self.sound_cues
    }

    /// Asset manager
    pub fn assets(&self) -> std::cell::RefMut<'_, AssetManager> {
        self.assets.borrow_mut()
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::headless()
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
