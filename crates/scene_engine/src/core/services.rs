//! Shared per-engine services handed to every game object

use crate::audio::AudioManager;
use crate::events::EventBus;
use std::fmt;
use std::rc::Rc;

/// Context objects components reach through their hook context
///
/// Cloning shares the same bus and audio manager.
#[derive(Clone)]
pub struct Services {
    /// Named-event bus
    pub events: Rc<EventBus>,
    /// Audio listener and sound cache
    pub audio: Rc<AudioManager>,
}

impl Services {
    /// Bundle existing services
    pub fn new(events: Rc<EventBus>, audio: Rc<AudioManager>) -> Self {
        Self { events, audio }
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("events", &self.events)
            .field("listener", &self.audio.listener())
            .finish()
    }
}
