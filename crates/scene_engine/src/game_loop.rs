//! Per-frame orchestration
//!
//! One call to [`GameLoop::frame`] per displayed frame, in a fixed order:
//! advance the clock, pick up a finished reload, poll system keys on their
//! pressed edge, update every live object while playing, sync debug helpers,
//! compact destroyed objects, and finally commit input edges.

use crate::audio::AudioManager;
use crate::core::KeyBindings;
use crate::debug::DebugManager;
use crate::events::EventBus;
use crate::foundation::time::TimeManager;
use crate::input::InputManager;
use crate::render::Renderer;
use crate::scene::{LoadedScene, SceneError, SceneManager};
use std::rc::Rc;
use tokio::sync::oneshot;

/// Frame driver owning the clock, input, debug and audio state
pub struct GameLoop {
    scenes: Rc<SceneManager>,
    time: TimeManager,
    input: InputManager,
    debug: DebugManager,
    audio: Rc<AudioManager>,
    events: Rc<EventBus>,
    keys: KeyBindings,
    reloads: Vec<oneshot::Receiver<Result<(), SceneError>>>,
}

impl GameLoop {
    /// Loop over whatever scene `scenes` has active, sharing the services of
    /// its loader
    pub fn new(scenes: Rc<SceneManager>, keys: KeyBindings) -> Self {
        let services = scenes.loader().services().clone();
        Self {
            scenes,
            time: TimeManager::new(),
            input: InputManager::new(),
            debug: DebugManager::new(),
            audio: services.audio,
            events: services.events,
            keys,
            reloads: Vec::new(),
        }
    }

    /// Scene registry
    pub fn scenes(&self) -> &Rc<SceneManager> {
        &self.scenes
    }

    /// Simulation clock
    pub fn time(&self) -> &TimeManager {
        &self.time
    }

    /// Input state
    pub fn input(&self) -> &InputManager {
        &self.input
    }

    /// Input state, for feeding window events
    pub fn input_mut(&mut self) -> &mut InputManager {
        &mut self.input
    }

    /// Debug helpers
    pub fn debug(&self) -> &DebugManager {
        &self.debug
    }

    /// Audio listener and cache
    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    /// Shared event bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Whether a reload is waiting to complete
    pub fn is_reloading(&self) -> bool {
        !self.reloads.is_empty()
    }

    /// Bind scene-dependent state to the active scene and start the clock
    pub fn start(&mut self) {
        match self.scenes.active_scene().and_then(|scene| scene.camera()) {
            Some(camera) => self.audio.init(camera),
            None => log::error!("Scene loaded, but no camera was found. Audio will not function correctly."),
        }
        self.debug.scene_changed();
        self.time.play();
    }

    /// Run one frame at `timestamp` milliseconds.
    ///
    /// A reload key press spawns the reload with `spawn_local`, so frames
    /// must run inside a `tokio::task::LocalSet`.
    pub fn frame(&mut self, timestamp: f64) {
        self.time.update(timestamp);
        self.poll_reloads();

        let scenes = Rc::clone(&self.scenes);
        let Some(mut scene) = scenes.active_scene_mut() else {
            self.input.update();
            return;
        };
        let name = scene.name().to_string();
        let Some(loaded) = scene.loaded_mut() else {
            self.input.update();
            return;
        };

        if self.input.is_key_pressed(self.keys.debug_toggle) {
            self.debug.toggle(Some(&mut *loaded));
        }
        if self.input.is_key_pressed(self.keys.pause) {
            self.time.toggle_pause();
        }
        if self.input.is_key_pressed(self.keys.reload) {
            log::info!("Reloading scene...");
            self.time.stop();
            self.spawn_reload(name);
        }

        if self.time.is_playing() {
            self.simulate(loaded);
        }

        self.input.update();
    }

    /// Present the active scene, if any
    pub fn render(&self, renderer: &mut dyn Renderer) -> bool {
        let Some(scene) = self.scenes.active_scene() else {
            return false;
        };
        match scene.loaded() {
            Some(loaded) => {
                renderer.render(&loaded.graph, loaded.camera);
                true
            }
            None => false,
        }
    }

    fn simulate(&mut self, loaded: &mut LoadedScene) {
        let delta_time = self.time.delta_time();
        let LoadedScene { graph, game_objects, .. } = &mut *loaded;
        for object in game_objects.iter_mut() {
            if !object.is_destroyed() {
                object.update(delta_time, graph, &self.input);
            }
        }
        self.debug.update(Some(&mut *loaded));
        let removed = loaded.compact();
        if removed > 0 {
            log::debug!("Compacted {} destroyed objects", removed);
        }
    }

    fn spawn_reload(&mut self, name: String) {
        let (tx, rx) = oneshot::channel();
        let scenes = Rc::clone(&self.scenes);
        tokio::task::spawn_local(async move {
            let result = scenes.load_scene(&name).await;
            // the loop may be gone by now
            let _ = tx.send(result);
        });
        self.reloads.push(rx);
    }

    fn poll_reloads(&mut self) {
        let mut finished = Vec::new();
        self.reloads.retain_mut(|rx| match rx.try_recv() {
            Ok(result) => {
                finished.push(result);
                false
            }
            Err(oneshot::error::TryRecvError::Empty) => true,
            Err(oneshot::error::TryRecvError::Closed) => {
                log::error!("Scene reload task ended without a result");
                false
            }
        });
        for result in finished {
            match result {
                Ok(()) => self.start(),
                Err(SceneError::AlreadyLoading(name)) => {
                    log::warn!("Reload of \"{}\" dropped: another load is in flight", name);
                }
                Err(e) => {
                    self.debug.scene_changed();
                    log::error!("Scene reload failed: {}", e);
                }
            }
        }
    }
}
