//! Simulation clock
//!
//! `TimeManager` is the single source of `delta_time` for gameplay code. It is
//! a small state machine:
//!
//! ```text
//!   STOPPED ──play──▶ PLAYING ──pause──▶ PAUSED
//!      ▲                 ▲ ◀────play─────── │
//!      └──────stop───────┴──────stop────────┘
//! ```
//!
//! `update` must run at the very start of every frame, before anything reads
//! `delta_time`, so a pause takes effect within one frame.

use std::fmt;

/// Clock state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    /// Initial state; simulation is not running
    #[default]
    Stopped,
    /// Simulation advances every frame
    Playing,
    /// Simulation frozen, resumable
    Paused,
}

impl fmt::Display for PlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayState::Stopped => "STOPPED",
            PlayState::Playing => "PLAYING",
            PlayState::Paused => "PAUSED",
        };
        f.write_str(name)
    }
}

/// Global simulation clock
#[derive(Debug, Default)]
pub struct TimeManager {
    state: PlayState,
    /// Timestamp of the previous `update`, in milliseconds
    last_time: Option<f64>,
    /// Seconds elapsed since the previous frame; 0 unless playing
    delta_time: f32,
}

impl TimeManager {
    /// Create a stopped clock
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock to `current_time` (milliseconds, monotonic).
    pub fn update(&mut self, current_time: f64) {
        self.delta_time = match self.state {
            PlayState::Playing => {
                let previous = self.last_time.unwrap_or(current_time);
                // a clock running backwards must never produce negative time
                (((current_time - previous) * 0.001).max(0.0)) as f32
            }
            PlayState::Stopped | PlayState::Paused => 0.0,
        };
        self.last_time = Some(current_time);
    }

    /// STOPPED | PAUSED → PLAYING
    ///
    /// Starting from STOPPED always begins with a zero delta, even if frames
    /// ticked while stopped.
    pub fn play(&mut self) {
        match self.state {
            PlayState::Playing => {}
            PlayState::Stopped => {
                self.last_time = None;
                self.transition(PlayState::Playing);
            }
            PlayState::Paused => self.transition(PlayState::Playing),
        }
    }

    /// PLAYING → PAUSED
    pub fn pause(&mut self) {
        if self.state == PlayState::Playing {
            self.transition(PlayState::Paused);
        }
    }

    /// Flip between PLAYING and PAUSED; does nothing while stopped.
    pub fn toggle_pause(&mut self) {
        match self.state {
            PlayState::Playing => self.pause(),
            PlayState::Paused => self.play(),
            PlayState::Stopped => {}
        }
    }

    /// Force STOPPED from any state.
    ///
    /// Forgets the previous timestamp so the first tick after the next `play`
    /// yields a zero delta.
    pub fn stop(&mut self) {
        self.last_time = None;
        self.delta_time = 0.0;
        if self.state != PlayState::Stopped {
            self.transition(PlayState::Stopped);
        }
    }

    fn transition(&mut self, next: PlayState) {
        self.state = next;
        log::info!("TimeManager: State changed to {}.", next);
    }

    /// Current state
    pub fn state(&self) -> PlayState {
        self.state
    }

    /// Whether the simulation is advancing
    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    /// Seconds since the previous frame (0 unless playing)
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Timestamp recorded by the last `update`
    pub fn last_time(&self) -> Option<f64> {
        self.last_time
    }
}
