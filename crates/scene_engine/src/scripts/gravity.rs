//! Falls under constant acceleration and comes to rest on the floor

use super::{parse_params, ScriptError, ScriptParams};
use crate::input::InputManager;
use crate::object::{Component, ComponentContext, Hooks};
use crate::scene::NodeKey;
use serde::Deserialize;

/// Registry name
pub const NAME: &str = "gravity";

/// Name of the object gravity comes to rest on
pub const FLOOR_NAME: &str = "floor";

/// Vertical free fall
#[derive(Debug, Clone, Deserialize)]
pub struct Gravity {
    /// Acceleration along Y
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    /// Current vertical speed
    #[serde(default)]
    pub velocity: f32,
    #[serde(skip)]
    grounded: bool,
}

fn default_gravity() -> f32 {
    -9.8
}

impl Default for Gravity {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            velocity: 0.0,
            grounded: false,
        }
    }
}

impl Gravity {
    /// Whether the last update left the owner resting on the floor
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }
}

pub(crate) fn create(params: &ScriptParams) -> Result<Box<dyn Component>, ScriptError> {
    Ok(Box::new(parse_params::<Gravity>(NAME, params)?))
}

/// Height the owner's origin must stay above so its bounds sit on the floor
fn rest_height(ctx: &ComponentContext<'_>, floor: NodeKey) -> Option<f32> {
    let graph = ctx.graph();
    let floor_top = graph.world_bounds(floor)?.max.y;
    let own = ctx.transform_key();
    let position = graph.world_transform(own)?.position.y;
    let offset = graph.world_bounds(own).map_or(0.0, |b| position - b.min.y);
    Some(floor_top + offset)
}

impl Component for Gravity {
    fn hooks(&self) -> Hooks {
        Hooks::UPDATE
    }

    fn update(&mut self, ctx: &mut ComponentContext<'_>, delta_time: f32, _input: &InputManager) {
        self.velocity += self.gravity * delta_time;
        let own = ctx.transform_key();
        let rest = {
            let ctx: &ComponentContext<'_> = ctx;
            ctx.graph()
                .find_by_name(FLOOR_NAME)
                .filter(|floor| *floor != own)
                .and_then(|floor| rest_height(ctx, floor))
        };
        let velocity = self.velocity;
        let Some(transform) = ctx.transform_mut() else {
            return;
        };
        transform.position.y += velocity * delta_time;
        self.grounded = false;
        if let Some(rest) = rest {
            if transform.position.y < rest {
                transform.position.y = rest;
                self.velocity = 0.0;
                self.grounded = true;
            }
        }
    }
}
