//! Plays a sound from its owner's position
//!
//! The sound is requested from the shared [`AudioManager`](crate::audio::AudioManager)
//! in `on_start` and becomes playable once the manager flushes its queue;
//! scene loading flushes before the first frame. A sound that fails to load
//! is reported once and the owner keeps running.

use super::{parse_params, ScriptError, ScriptParams};
use crate::audio::{AudioClip, ClipState};
use crate::input::InputManager;
use crate::object::{Component, ComponentContext, Hooks};
use serde::Deserialize;

/// Registry name
pub const NAME: &str = "audio-source";

/// A positional sound emitter
#[derive(Debug, Clone, Deserialize)]
pub struct AudioSource {
    /// Sound locator
    #[serde(default)]
    pub src: Option<String>,
    /// Start playing as soon as the sound is loaded
    #[serde(default)]
    pub autoplay: bool,
    /// Repeat when finished
    #[serde(default, rename = "loop")]
    pub looping: bool,
    /// Gain, 1.0 is unchanged
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(skip)]
    clip: Option<AudioClip>,
    #[serde(skip)]
    settled: bool,
    #[serde(skip)]
    playing: bool,
}

fn default_volume() -> f32 {
    1.0
}

pub(crate) fn create(params: &ScriptParams) -> Result<Box<dyn Component>, ScriptError> {
    Ok(Box::new(parse_params::<AudioSource>(NAME, params)?))
}

impl AudioSource {
    /// The requested sound, once `on_start` has run with a listener present
    pub fn clip(&self) -> Option<&AudioClip> {
        self.clip.as_ref()
    }

    /// Whether the sound is currently playing
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start playback if the sound is loaded
    pub fn play(&mut self) {
        let ready = self.clip.as_ref().and_then(AudioClip::buffer).is_some();
        if ready && !self.playing {
            self.playing = true;
            log::debug!(
                "AudioSource playing {} (loop: {}, volume: {})",
                self.src.as_deref().unwrap_or_default(),
                self.looping,
                self.volume
            );
        }
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Stop playback
    pub fn stop(&mut self) {
        self.playing = false;
    }

    fn settle(&mut self, owner: &str) {
        let Some(clip) = &self.clip else {
            return;
        };
        match clip.state() {
            ClipState::Loading => {}
            ClipState::Ready(_) => {
                self.settled = true;
                if self.autoplay {
                    self.play();
                }
            }
            ClipState::Failed(e) => {
                self.settled = true;
                log::error!("AudioSource on \"{}\" failed to set up audio: {}", owner, e);
            }
        }
    }
}

impl Component for AudioSource {
    fn hooks(&self) -> Hooks {
        Hooks::START | Hooks::UPDATE | Hooks::DESTROY
    }

    fn on_start(&mut self, ctx: &mut ComponentContext<'_>) {
        let Some(src) = self.src.as_deref() else {
            log::warn!("AudioSource on \"{}\" has no 'src' specified.", ctx.name());
            return;
        };
        let Some(audio) = ctx.audio() else {
            log::error!("AudioSource on \"{}\" has no audio manager to load from.", ctx.name());
            return;
        };
        if audio.listener().is_none() {
            log::error!("AudioSource requires an AudioListener in the scene. Please add one to the camera.");
            return;
        }
        self.clip = Some(audio.request(src));
        self.settle(ctx.name());
    }

    fn update(&mut self, ctx: &mut ComponentContext<'_>, _delta_time: f32, _input: &InputManager) {
        if !self.settled {
            self.settle(ctx.name());
        }
    }

    fn on_destroy(&mut self, _ctx: &mut ComponentContext<'_>) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetLoader, MemoryAssets};
    use crate::audio::AudioManager;
    use crate::core::Services;
    use crate::events::EventBus;
    use crate::object::GameObject;
    use crate::scene::{NodeKind, SceneGraph};
    use serde_json::json;
    use std::rc::Rc;

    fn source(params: serde_json::Value) -> AudioSource {
        let serde_json::Value::Object(params) = params else {
            panic!("params must be an object");
        };
        parse_params(NAME, &params).unwrap()
    }

    /// Services over `assets`, with the listener bound when `listener` is set
    fn services(graph: &mut SceneGraph, assets: MemoryAssets, listener: bool) -> Services {
        let audio = AudioManager::new(AssetLoader::new(Rc::new(assets)));
        if listener {
            audio.init(graph.create("MainCamera", NodeKind::Group));
        }
        Services::new(Rc::new(EventBus::new()), Rc::new(audio))
    }

    fn emitter(graph: &mut SceneGraph, services: &Services, params: serde_json::Value) -> GameObject {
        let mut object = GameObject::new("speaker", graph);
        object.set_services(services.clone());
        object.add(source(params));
        object
    }

    #[test]
    fn test_params() {
        let audio = source(json!({ "src": "sfx/hum.wav", "loop": true }));
        assert_eq!(audio.src.as_deref(), Some("sfx/hum.wav"));
        assert!(audio.looping);
        assert!(!audio.autoplay);
        assert_eq!(audio.volume, 1.0);
        assert!(parse_params::<AudioSource>(NAME, &ScriptParams::new()).unwrap().src.is_none());
    }

    #[tokio::test]
    async fn test_autoplays_once_loaded() {
        let assets = MemoryAssets::new();
        assets.insert("sfx/hum.wav", vec![1, 2]);
        let mut graph = SceneGraph::new();
        let services = services(&mut graph, assets, true);
        let mut object = emitter(&mut graph, &services, json!({ "src": "sfx/hum.wav", "autoplay": true, "volume": 0.5 }));
        let input = InputManager::new();

        object.on_start(&mut graph);
        assert!(!object.get_component::<AudioSource>().unwrap().is_playing());

        assert_eq!(services.audio.flush().await, 1);
        object.update(0.016, &mut graph, &input);
        assert!(object.get_component::<AudioSource>().unwrap().is_playing());

        object.destroy(&mut graph);
        assert!(!object.get_component::<AudioSource>().unwrap().is_playing());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_owner_alive() {
        let mut graph = SceneGraph::new();
        let services = services(&mut graph, MemoryAssets::new(), true);
        let mut object = emitter(&mut graph, &services, json!({ "src": "sfx/none.wav", "autoplay": true }));
        let input = InputManager::new();

        object.on_start(&mut graph);
        services.audio.flush().await;
        object.update(0.016, &mut graph, &input);
        object.update(0.016, &mut graph, &input);

        let audio = object.get_component::<AudioSource>().unwrap();
        assert!(matches!(audio.clip().unwrap().state(), ClipState::Failed(_)));
        assert!(!audio.is_playing());
        assert!(!object.is_destroyed());
    }

    #[test]
    fn test_no_listener_or_src_requests_nothing() {
        let mut graph = SceneGraph::new();
        let services = services(&mut graph, MemoryAssets::new(), false);

        let mut deaf = emitter(&mut graph, &services, json!({ "src": "sfx/hum.wav" }));
        deaf.on_start(&mut graph);
        assert!(deaf.get_component::<AudioSource>().unwrap().clip().is_none());

        let mut silent = emitter(&mut graph, &services, json!({ "autoplay": true }));
        silent.on_start(&mut graph);
        assert!(silent.get_component::<AudioSource>().unwrap().clip().is_none());

        assert!(!services.audio.has_pending());
        assert!(!deaf.is_destroyed());
    }
}
