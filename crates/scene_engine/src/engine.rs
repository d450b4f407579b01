//! Engine driver
//!
//! Wires the asset source, script registry, scene manager and game loop
//! together from an [`EngineConfig`], loads the initial scene, and then
//! drives frames at the configured rate on a single-threaded tokio runtime.
//! Everything runs inside a [`LocalSet`] so reloads spawned by the loop make
//! progress between frames.

use crate::assets::{AssetLoader, AssetSource};
use crate::config::ConfigError;
use crate::core::EngineConfig;
use crate::game_loop::GameLoop;
use crate::input::InputManager;
use crate::render::Renderer;
use crate::scene::{SceneError, SceneLoader, SceneManager};
use crate::scripts::ScriptRegistry;
use std::rc::Rc;
use thiserror::Error;
use tokio::task::LocalSet;
use tokio::time::{Instant, MissedTickBehavior};

/// Top-level engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Engine setup failed
    #[error("Engine initialization failed: {0}")]
    InitializationFailed(String),

    /// The initial scene could not be loaded
    #[error("Scene load failed: {0}")]
    SceneLoad(#[from] SceneError),

    /// Engine configuration could not be read
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Owns the frame loop and the configuration it was built from
pub struct Engine {
    config: EngineConfig,
    game: GameLoop,
}

impl Engine {
    /// Build the engine and register every configured scene.
    ///
    /// No asset is read until [`Engine::load_initial_scene`].
    pub fn new(
        config: EngineConfig,
        registry: ScriptRegistry,
        source: Rc<dyn AssetSource>,
    ) -> Result<Self, EngineError> {
        log::info!("Initializing engine...");
        config.validate().map_err(EngineError::InitializationFailed)?;

        let assets = AssetLoader::new(source);
        let loader = SceneLoader::new(
            assets,
            Rc::new(registry),
            config.window.aspect_ratio(),
        );
        let scenes = Rc::new(SceneManager::new(loader));
        for entry in &config.scenes {
            scenes.register_scene(entry.name.clone(), entry.source.clone());
        }

        let game = GameLoop::new(scenes, config.keys);
        log::info!(
            "Engine initialized: {} scene(s) registered, {} fps target",
            config.scenes.len(),
            config.target_fps
        );
        Ok(Self { config, game })
    }

    /// Configuration the engine was built from
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The frame loop
    pub fn game(&self) -> &GameLoop {
        &self.game
    }

    /// The frame loop, mutably
    pub fn game_mut(&mut self) -> &mut GameLoop {
        &mut self.game
    }

    /// Load the configured initial scene and start the clock.
    ///
    /// On failure nothing is started; the caller must not enter the run loop.
    pub async fn load_initial_scene(&mut self) -> Result<(), EngineError> {
        let name = self.config.initial_scene.clone();
        self.game.scenes().load_scene(&name).await?;
        self.game.start();
        Ok(())
    }

    /// Drive frames until `max_frames` have run, or forever when `None`.
    ///
    /// `before_frame` sees the frame index and the input state ahead of each
    /// frame, standing in for a windowing event pump. Returns the number of
    /// frames run. Must be awaited inside a [`LocalSet`].
    pub async fn drive<F>(
        &mut self,
        renderer: &mut dyn Renderer,
        max_frames: Option<u64>,
        mut before_frame: F,
    ) -> u64
    where
        F: FnMut(u64, &mut InputManager),
    {
        let mut ticker = tokio::time::interval(self.config.frame_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let origin = Instant::now();

        let mut frames = 0;
        while max_frames.map_or(true, |max| frames < max) {
            // yields to the LocalSet, letting in-flight loads progress
            ticker.tick().await;
            before_frame(frames, self.game.input_mut());
            let timestamp = origin.elapsed().as_secs_f64() * 1000.0;
            self.game.frame(timestamp);
            if self.game.audio().has_pending() {
                self.game.audio().flush().await;
            }
            self.game.render(renderer);
            frames += 1;
        }
        frames
    }

    /// Build, load and run with no frame limit
    pub fn run(
        config: EngineConfig,
        registry: ScriptRegistry,
        renderer: &mut dyn Renderer,
        source: Rc<dyn AssetSource>,
    ) -> Result<(), EngineError> {
        Self::run_with(config, registry, renderer, source, None, |_, _| {}).map(|_| ())
    }

    /// Build, load and run on a fresh current-thread runtime.
    ///
    /// Returns [`EngineError::SceneLoad`] before any frame runs when the
    /// initial scene fails to load.
    pub fn run_with<F>(
        config: EngineConfig,
        registry: ScriptRegistry,
        renderer: &mut dyn Renderer,
        source: Rc<dyn AssetSource>,
        max_frames: Option<u64>,
        before_frame: F,
    ) -> Result<u64, EngineError>
    where
        F: FnMut(u64, &mut InputManager),
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| EngineError::InitializationFailed(format!("Failed to build runtime: {}", e)))?;
        let local = LocalSet::new();

        local.block_on(&runtime, async move {
            let mut engine = Self::new(config, registry, source)?;
            engine.load_initial_scene().await?;
            log::info!("Entering run loop");
            let frames = engine.drive(renderer, max_frames, before_frame).await;
            log::info!("Engine shutdown complete after {} frames", frames);
            Ok(frames)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::input::KeyCode;
    use crate::render::HeadlessRenderer;
    use crate::testing;

    fn config() -> EngineConfig {
        EngineConfig::new()
            .with_target_fps(1000)
            .with_scene("level-1", testing::LEVEL_ONE)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = config().with_initial_scene("missing");
        let result = Engine::new(config, ScriptRegistry::with_builtins(), Rc::new(MemoryAssets::new()));
        assert!(matches!(result, Err(EngineError::InitializationFailed(_))));
    }

    #[test]
    fn test_new_registers_scenes_without_loading() {
        let engine = Engine::new(
            config().with_scene("level-2", "scenes/level-2.json"),
            ScriptRegistry::with_builtins(),
            Rc::new(MemoryAssets::new()),
        )
        .unwrap();
        let scenes = engine.game().scenes();
        assert!(scenes.is_registered("level-1"));
        assert!(scenes.is_registered("level-2"));
        assert!(scenes.active_scene_name().is_none());
    }

    #[test]
    fn test_run_with_drives_bounded_frames() {
        let mut renderer = HeadlessRenderer::new();
        let frames = Engine::run_with(
            config(),
            ScriptRegistry::with_builtins(),
            &mut renderer,
            Rc::new(testing::level_one_assets()),
            Some(5),
            |_, _| {},
        )
        .unwrap();
        assert_eq!(frames, 5);
        assert_eq!(renderer.frames(), 5);
    }

    #[test]
    fn test_initial_load_failure_runs_no_frames() {
        let mut renderer = HeadlessRenderer::new();
        let mut hook_calls = 0;
        let result = Engine::run_with(
            config(),
            ScriptRegistry::with_builtins(),
            &mut renderer,
            Rc::new(MemoryAssets::new()),
            Some(5),
            |_, _| hook_calls += 1,
        );
        assert!(matches!(
            result,
            Err(EngineError::SceneLoad(SceneError::ConfigFetch { .. }))
        ));
        assert_eq!(hook_calls, 0);
        assert_eq!(renderer.frames(), 0);
    }

    #[tokio::test]
    async fn test_drive_feeds_input_before_each_frame() {
        let mut engine = Engine::new(
            config(),
            ScriptRegistry::with_builtins(),
            Rc::new(testing::level_one_assets()),
        )
        .unwrap();
        let mut renderer = HeadlessRenderer::new();

        LocalSet::new()
            .run_until(async {
                engine.load_initial_scene().await.unwrap();
                engine
                    .drive(&mut renderer, Some(3), |frame, input| {
                        input.handle_key_input(KeyCode::Backquote, frame == 1);
                    })
                    .await;
            })
            .await;

        assert!(engine.game().debug().is_enabled());
        assert_eq!(renderer.frames(), 3);
    }
}
