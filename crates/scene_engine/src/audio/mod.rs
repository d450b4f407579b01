//! Audio bindings
//!
//! Playback is left to a backend. The engine keeps the single listener tied
//! to the active camera, a per-locator cache of loaded sound data, and a
//! queue of clips requested from synchronous hooks that [`AudioManager::flush`]
//! resolves.

use crate::assets::{AssetError, AssetLoader};
use crate::scene::NodeKey;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// The scene's ear, riding on the camera node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioListener {
    /// Camera node the listener follows
    pub camera: NodeKey,
}

/// Raw sound data fetched through the asset pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    /// Locator the data came from
    pub source: String,
    /// Encoded bytes
    pub bytes: Vec<u8>,
}

/// Where a requested clip is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipState {
    /// Queued, waiting for the next flush
    Loading,
    /// Sound data available
    Ready(Rc<AudioBuffer>),
    /// The load failed; the message is the asset error
    Failed(String),
}

/// Handle to a sound requested with [`AudioManager::request`]
#[derive(Debug, Clone)]
pub struct AudioClip {
    src: String,
    state: Rc<RefCell<ClipState>>,
}

impl AudioClip {
    /// Locator the clip was requested from
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Current state
    pub fn state(&self) -> ClipState {
        self.state.borrow().clone()
    }

    /// Sound data, once ready
    pub fn buffer(&self) -> Option<Rc<AudioBuffer>> {
        match &*self.state.borrow() {
            ClipState::Ready(buffer) => Some(Rc::clone(buffer)),
            _ => None,
        }
    }
}

/// Listener binding, sound cache and request queue
pub struct AudioManager {
    assets: AssetLoader,
    listener: Cell<Option<AudioListener>>,
    cache: RefCell<HashMap<String, Rc<AudioBuffer>>>,
    pending: RefCell<Vec<AudioClip>>,
}

impl AudioManager {
    /// Manager reading sounds through `assets`
    pub fn new(assets: AssetLoader) -> Self {
        Self {
            assets,
            listener: Cell::new(None),
            cache: RefCell::new(HashMap::new()),
            pending: RefCell::new(Vec::new()),
        }
    }

    /// Bind the listener to `camera`; binding the same camera again is a no-op
    pub fn init(&self, camera: NodeKey) {
        match self.listener.get() {
            Some(listener) if listener.camera == camera => {}
            Some(_) => {
                self.listener.set(Some(AudioListener { camera }));
                log::info!("AudioListener moved to camera {:?}.", camera);
            }
            None => {
                self.listener.set(Some(AudioListener { camera }));
                log::info!("AudioListener created and attached to camera.");
            }
        }
    }

    /// The listener, once `init` has run
    pub fn listener(&self) -> Option<AudioListener> {
        self.listener.get()
    }

    /// Fetch a sound, or return the cached copy
    pub async fn load(&self, src: &str) -> Result<Rc<AudioBuffer>, AssetError> {
        if let Some(buffer) = self.cache.borrow().get(src) {
            return Ok(Rc::clone(buffer));
        }
        let bytes = self.assets.load_bytes(src).await.map_err(|e| {
            log::error!("AudioManager: Failed to load audio from {}: {}", src, e);
            e
        })?;
        let buffer = Rc::new(AudioBuffer {
            source: src.to_string(),
            bytes,
        });
        self.cache
            .borrow_mut()
            .insert(src.to_string(), Rc::clone(&buffer));
        Ok(buffer)
    }

    /// Ask for a sound from a synchronous hook.
    ///
    /// A cached sound is ready at once; anything else stays
    /// [`ClipState::Loading`] until the next [`AudioManager::flush`].
    pub fn request(&self, src: &str) -> AudioClip {
        let state = match self.cache.borrow().get(src) {
            Some(buffer) => ClipState::Ready(Rc::clone(buffer)),
            None => ClipState::Loading,
        };
        let clip = AudioClip {
            src: src.to_string(),
            state: Rc::new(RefCell::new(state)),
        };
        if matches!(*clip.state.borrow(), ClipState::Loading) {
            self.pending.borrow_mut().push(clip.clone());
        }
        clip
    }

    /// Whether requested clips are waiting for a flush
    pub fn has_pending(&self) -> bool {
        !self.pending.borrow().is_empty()
    }

    /// Load every queued clip. Returns how many were resolved, failures included.
    pub async fn flush(&self) -> usize {
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        let resolved = pending.len();
        for clip in pending {
            let state = match self.load(&clip.src).await {
                Ok(buffer) => ClipState::Ready(buffer),
                Err(e) => ClipState::Failed(e.to_string()),
            };
            *clip.state.borrow_mut() = state;
        }
        resolved
    }

    /// Whether `src` is in the cache
    pub fn is_cached(&self, src: &str) -> bool {
        self.cache.borrow().contains_key(src)
    }
}
