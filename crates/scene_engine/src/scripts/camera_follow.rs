//! Smoothly trails a named target while looking at it

use super::{parse_params, ScriptError, ScriptParams};
use crate::foundation::math::utils::{lerp_vec3, look_rotation};
use crate::foundation::math::Vec3;
use crate::input::InputManager;
use crate::object::{Component, ComponentContext, Hooks};
use crate::scene::NodeKey;
use serde::Deserialize;

/// Registry name
pub const NAME: &str = "camera-follow";

/// Keeps the offset it started with to a target object
#[derive(Debug, Clone, Deserialize)]
pub struct CameraFollow {
    /// Name of the object to follow
    #[serde(rename = "target", default)]
    pub target_name: Option<String>,
    /// Fraction of the remaining distance covered each update
    #[serde(default = "default_smooth_speed")]
    pub smooth_speed: f32,
    #[serde(skip)]
    target: Option<NodeKey>,
    #[serde(skip)]
    offset: Vec3,
}

fn default_smooth_speed() -> f32 {
    0.125
}

impl CameraFollow {
    /// Follow the object named `target`
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target_name: Some(target.into()),
            smooth_speed: default_smooth_speed(),
            target: None,
            offset: Vec3::zeros(),
        }
    }

    /// Node currently followed
    pub fn target(&self) -> Option<NodeKey> {
        self.target
    }

    /// Look the target up by name and capture the current offset to it
    fn acquire(&mut self, ctx: &ComponentContext<'_>) -> bool {
        let Some(name) = self.target_name.as_deref() else {
            return false;
        };
        let graph = ctx.graph();
        let Some(target) = graph.find_by_name(name) else {
            return false;
        };
        let (Some(own), Some(target_position)) = (ctx.transform(), graph.get(target).map(|n| n.transform.position))
        else {
            return false;
        };
        self.offset = own.position - target_position;
        self.target = Some(target);
        true
    }
}

pub(crate) fn create(params: &ScriptParams) -> Result<Box<dyn Component>, ScriptError> {
    let follow = parse_params::<CameraFollow>(NAME, params)?;
    if follow.target_name.is_none() {
        log::warn!("CameraFollow: no 'target' given; nothing will be followed");
    }
    Ok(Box::new(follow))
}

impl Component for CameraFollow {
    fn hooks(&self) -> Hooks {
        Hooks::START | Hooks::UPDATE
    }

    fn on_start(&mut self, ctx: &mut ComponentContext<'_>) {
        if !self.acquire(ctx) {
            log::warn!(
                "CameraFollow on \"{}\": Target object \"{}\" not found in scene.",
                ctx.name(),
                self.target_name.as_deref().unwrap_or_default()
            );
        }
    }

    fn update(&mut self, ctx: &mut ComponentContext<'_>, _delta_time: f32, _input: &InputManager) {
        if !self.target.is_some_and(|key| ctx.graph().is_attached(key)) {
            if self.target.is_some() {
                // swapped or removed; keep the offset and resolve the name again
                self.target = self.target_name.as_deref().and_then(|name| ctx.graph().find_by_name(name));
            } else {
                self.acquire(ctx);
            }
        }
        let Some(target) = self.target else {
            return;
        };
        let Some(target_position) = ctx.graph().get(target).map(|n| n.transform.position) else {
            return;
        };
        let desired = target_position + self.offset;
        let smooth = self.smooth_speed;
        if let Some(transform) = ctx.transform_mut() {
            transform.position = lerp_vec3(&transform.position, &desired, smooth);
            if let Some(rotation) = look_rotation(&transform.position, &target_position) {
                transform.rotation = rotation;
            }
        }
    }
}
