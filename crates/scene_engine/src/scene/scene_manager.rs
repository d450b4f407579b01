//! Scene registry and transition protocol
//!
//! At most one scene is loaded at a time and at most one load is in flight.
//! A load unloads the active scene before fetching the next document, so a
//! failed load leaves no scene active rather than a half-built one.

use super::{LoadedScene, Scene, SceneError, SceneLoader};
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::HashMap;

/// Registry of named scenes plus the active pointer
pub struct SceneManager {
    scenes: RefCell<HashMap<String, Scene>>,
    active: RefCell<Option<String>>,
    loading: Cell<bool>,
    loader: SceneLoader,
}

/// Clears the loading flag however the load ends
struct LoadingGuard<'a>(&'a Cell<bool>);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl SceneManager {
    /// Empty registry building scenes with `loader`
    pub fn new(loader: SceneLoader) -> Self {
        Self {
            scenes: RefCell::new(HashMap::new()),
            active: RefCell::new(None),
            loading: Cell::new(false),
            loader,
        }
    }

    /// The loader scenes are built with
    pub fn loader(&self) -> &SceneLoader {
        &self.loader
    }

    /// Register `name` as loadable from `source`; no I/O happens here.
    ///
    /// Re-registering a name points it at the new source for its next load.
    pub fn register_scene(&self, name: impl Into<String>, source: impl Into<String>) {
        let name = name.into();
        let source = source.into();
        let mut scenes = self.scenes.borrow_mut();
        if let Some(scene) = scenes.get_mut(&name) {
            log::debug!("SceneManager: scene \"{}\" now loads from {}", name, source);
            scene.set_source(source);
        } else {
            scenes.insert(name.clone(), Scene::new(name, source));
        }
    }

    /// Whether `name` is registered
    pub fn is_registered(&self, name: &str) -> bool {
        self.scenes.borrow().contains_key(name)
    }

    /// Whether a load is in flight
    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    /// Name of the active scene
    pub fn active_scene_name(&self) -> Option<String> {
        self.active.borrow().clone()
    }

    /// The active scene; never one that is not loaded
    pub fn active_scene(&self) -> Option<Ref<'_, Scene>> {
        let active = self.active.borrow();
        let name = active.as_deref()?;
        Ref::filter_map(self.scenes.borrow(), |scenes| scenes.get(name).filter(|s| s.is_loaded())).ok()
    }

    /// The active scene, mutable
    pub fn active_scene_mut(&self) -> Option<RefMut<'_, Scene>> {
        let active = self.active.borrow();
        let name = active.as_deref()?;
        RefMut::filter_map(self.scenes.borrow_mut(), |scenes| {
            scenes.get_mut(name).filter(|s| s.is_loaded())
        })
        .ok()
    }

    /// A registered scene, loaded or not
    pub fn scene(&self, name: &str) -> Option<Ref<'_, Scene>> {
        Ref::filter_map(self.scenes.borrow(), |scenes| scenes.get(name)).ok()
    }

    /// Unload the active scene, if any, and clear the active pointer
    pub fn unload_active(&self) {
        let Some(name) = self.active.borrow_mut().take() else {
            return;
        };
        if let Some(scene) = self.scenes.borrow_mut().get_mut(&name) {
            scene.unload();
        }
    }

    /// Unload the active scene, then load `name` and make it active.
    ///
    /// Rejected with [`SceneError::AlreadyLoading`] and no state change while
    /// another load is in flight.
    pub async fn load_scene(&self, name: &str) -> Result<(), SceneError> {
        let source = self
            .scenes
            .borrow()
            .get(name)
            .map(|scene| scene.source().to_string())
            .ok_or_else(|| SceneError::NotRegistered(name.to_string()))?;
        if self.loading.get() {
            log::warn!("SceneManager: Already loading a scene; \"{}\" rejected.", name);
            return Err(SceneError::AlreadyLoading(name.to_string()));
        }
        self.loading.set(true);
        let _guard = LoadingGuard(&self.loading);

        log::info!("Loading scene: {}", name);
        self.unload_active();

        let built: Result<LoadedScene, SceneError> = async {
            let document = self.loader.fetch(&source).await?;
            self.loader.load(&document).await
        }
        .await;

        match built {
            Ok(payload) => {
                let mut scenes = self.scenes.borrow_mut();
                let scene = scenes
                    .get_mut(name)
                    .ok_or_else(|| SceneError::NotRegistered(name.to_string()))?;
                scene.attach(payload);
                *self.active.borrow_mut() = Some(name.to_string());
                log::info!("Scene \"{}\" loaded successfully.", name);
                Ok(())
            }
            Err(e) => {
                log::error!("SceneManager: Failed to load scene \"{}\": {}", name, e);
                *self.active.borrow_mut() = None;
                Err(e)
            }
        }
    }
}
