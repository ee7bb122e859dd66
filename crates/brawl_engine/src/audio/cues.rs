//! Entity events turned into sounds

use super::{AudioBackend, SoundGroup};
use crate::ecs::GameObject;
use crate::events::{Event, Observer};
use std::cell::RefCell;
use std::rc::Rc;

/// Observer playing footstep and jump sounds at the notifying entity
///
/// One instance is shared by every entity that should be heard; each entity
/// holds it only weakly through its event channel.
pub struct SoundCues {
    audio: Rc<RefCell<dyn AudioBackend>>,
}

impl SoundCues {
    /// Create cues feeding `audio`
    pub fn new(audio: Rc<RefCell<dyn AudioBackend>>) -> Self {
        Self { audio }
    }

    fn group_for(event: Event) -> Option<SoundGroup> {
        match event {
            Event::FootstepOccurred => Some(SoundGroup::Footstep),
            Event::JumpOccurred => Some(SoundGroup::Jump),
            Event::SceneAttached | Event::Scaled | Event::Nothing => None,
        }
    }
}

impl Observer for SoundCues {
    fn on_notify(&mut self, entity: &mut GameObject, event: Event) {
        let Some(group) = Self::group_for(event) else {
            return;
        };
        match self.audio.try_borrow_mut() {
            Ok(mut audio) => audio.play(group, entity.position()),
            Err(_) => log::warn!("Audio backend busy, dropped {:?} of {:?}", group, entity.id()),
        }
    }
}

impl std::fmt::Debug for SoundCues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundCues").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use crate::ecs::EntityId;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_footsteps_and_jumps_are_played_at_entity() {
        let audio = Rc::new(RefCell::new(RecordingAudio::default()));
        let cues = Rc::new(RefCell::new(SoundCues::new(audio.clone())));
        let mut entity = GameObject::new(EntityId::default());
        entity.set_position(Vec3::new(1.0, 0.0, 2.0));
        entity.add_observer(&cues);

        entity.notify(Event::FootstepOccurred);
        entity.notify(Event::Scaled);
        entity.notify(Event::JumpOccurred);

        let audio = audio.borrow();
        assert_eq!(audio.played().len(), 2);
        assert_eq!(audio.played()[0], (SoundGroup::Footstep, Vec3::new(1.0, 0.0, 2.0)));
        assert_eq!(audio.count(SoundGroup::Jump), 1);
    }
}
