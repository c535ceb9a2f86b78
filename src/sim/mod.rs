//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Single writer: the tick owns all mutable state; external readers get
//!   snapshots
//! - No rendering or platform dependencies

pub mod map;
pub mod motion;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod wave;
pub mod weapon;

pub use map::{TileKind, TileMap};
pub use snapshot::FrameSnapshot;
pub use state::{
    Enemy, EnemyKind, GameEvent, GameState, Inventory, Item, Pickup, PickupKind, Player,
    Projectile, ProjectileKind, ReloadState,
};
pub use tick::{TickInput, tick};
pub use wave::{WaveDirector, WavePhase};
pub use weapon::Weapon;
