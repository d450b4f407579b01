//! Spins its owner about the Y axis

use super::{parse_params, ScriptError, ScriptParams};
use crate::foundation::math::{Quat, Vec3};
use crate::input::InputManager;
use crate::object::{Component, ComponentContext, Hooks};
use serde::Deserialize;

/// Registry name
pub const NAME: &str = "rotator";

/// Constant angular velocity about Y
#[derive(Debug, Clone, Deserialize)]
pub struct Rotator {
    /// Radians per second
    #[serde(default = "default_speed")]
    pub speed: f32,
}

fn default_speed() -> f32 {
    1.0
}

impl Default for Rotator {
    fn default() -> Self {
        Self { speed: default_speed() }
    }
}

pub(crate) fn create(params: &ScriptParams) -> Result<Box<dyn Component>, ScriptError> {
    Ok(Box::new(parse_params::<Rotator>(NAME, params)?))
}

impl Component for Rotator {
    fn hooks(&self) -> Hooks {
        Hooks::START | Hooks::UPDATE
    }

    fn on_start(&mut self, ctx: &mut ComponentContext<'_>) {
        log::info!("Rotator script started on \"{}\"", ctx.name());
    }

    fn update(&mut self, ctx: &mut ComponentContext<'_>, delta_time: f32, _input: &InputManager) {
        if let Some(transform) = ctx.transform_mut() {
            let step = Quat::from_axis_angle(&Vec3::y_axis(), self.speed * delta_time);
            transform.rotation = step * transform.rotation;
        }
    }
}
