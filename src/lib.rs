//! Hordefall - top-down wave-survival simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (map, actors, weapons, waves, tick)
//! - `config`: Data-driven game balance tables
//!
//! Rendering, audio playback, menus and input-device polling live outside this
//! crate. The embedding process feeds decoded [`sim::TickInput`] intents in,
//! reads a [`sim::FrameSnapshot`] out after each tick, and drains the
//! [`sim::GameEvent`] queue to trigger sound/visual feedback.

pub mod config;
pub mod sim;

pub use config::Config;
pub use sim::{FrameSnapshot, GameEvent, GameState, TickInput};

/// Fixed simulation constants
pub mod consts {
    /// Simulation tick rate (Hz)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep (seconds)
    pub const SIM_DT: f64 = 1.0 / TICK_RATE as f64;
    /// Milliseconds per tick; all in-sim timers compare against a clock
    /// derived from the tick counter, never a wall clock
    pub const MS_PER_TICK: f64 = 1000.0 / TICK_RATE as f64;
}

/// Convert a tick count to the simulation clock in milliseconds
#[inline]
pub fn ticks_to_ms(ticks: u64) -> f64 {
    ticks as f64 * consts::MS_PER_TICK
}
