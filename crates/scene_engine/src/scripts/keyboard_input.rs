//! Arrow-key movement on the ground plane

use super::{parse_params, ScriptError, ScriptParams};
use crate::input::InputManager;
use crate::object::{Component, ComponentContext, Hooks};
use serde::Deserialize;

/// Registry name
pub const NAME: &str = "keyboard-input";

/// Moves the owner on X/Z while arrow keys are held
#[derive(Debug, Clone, Deserialize)]
pub struct KeyboardInput {
    /// Units per second
    #[serde(default = "default_speed")]
    pub speed: f32,
}

fn default_speed() -> f32 {
    2.0
}

impl Default for KeyboardInput {
    fn default() -> Self {
        Self { speed: default_speed() }
    }
}

pub(crate) fn create(params: &ScriptParams) -> Result<Box<dyn Component>, ScriptError> {
    Ok(Box::new(parse_params::<KeyboardInput>(NAME, params)?))
}

impl Component for KeyboardInput {
    fn hooks(&self) -> Hooks {
        Hooks::UPDATE
    }

    fn update(&mut self, ctx: &mut ComponentContext<'_>, delta_time: f32, input: &InputManager) {
        let step = input.arrow_axis() * self.speed * delta_time;
        if let Some(transform) = ctx.transform_mut() {
            transform.position += step;
        }
    }
}
