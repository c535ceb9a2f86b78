//! Read-only frame snapshots for the renderer and HUD
//!
//! The simulation is the sole writer of [`super::state::GameState`];
//! external readers get a [`FrameSnapshot`] captured after the tick
//! completes. Snapshots are plain owned data, safe to hand across the
//! render boundary or serialize for replay inspection.

use glam::DVec2;
use serde::Serialize;

use super::state::{EnemyKind, GameState, Item, PickupKind, ProjectileKind};

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: DVec2,
    pub health: f64,
    pub max_health: f64,
    pub weapon_name: String,
    pub ammo: u32,
    pub max_ammo: u32,
    pub reloading: bool,
    pub score: u64,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: DVec2,
    pub health: f64,
    pub max_health: f64,
    /// Render feedback: briefly true after the enemy takes a hit
    pub hit_flash: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileView {
    pub id: u32,
    pub pos: DVec2,
    pub is_grenade: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PickupView {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: DVec2,
    pub remaining_ticks: u32,
}

/// Everything the presentation layer needs to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub pickups: Vec<PickupView>,
    pub wave: u32,
    pub game_over: bool,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let player = &state.player;
        let (weapon_name, max_ammo) = match player.weapons.get(player.current_weapon) {
            Some(weapon) => (weapon.spec.name.clone(), weapon.spec.max_ammo),
            None => (String::new(), 0),
        };
        let ammo = player.ammo.get(player.current_weapon).copied().unwrap_or(0);

        Self {
            tick: state.time_ticks,
            player: PlayerView {
                pos: player.pos,
                health: player.health,
                max_health: player.max_health,
                weapon_name,
                ammo,
                max_ammo,
                reloading: player.is_reloading(),
                score: player.score,
                items: player.inventory.items().to_vec(),
            },
            enemies: state
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    kind: e.kind,
                    pos: e.pos,
                    health: e.health,
                    max_health: e.max_health,
                    hit_flash: e.hit_flash_ticks > 0,
                })
                .collect(),
            projectiles: state
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    id: p.id,
                    pos: p.pos,
                    is_grenade: matches!(p.kind, ProjectileKind::Grenade { .. }),
                })
                .collect(),
            pickups: state
                .pickups
                .iter()
                .map(|p| PickupView {
                    id: p.id,
                    kind: p.kind,
                    pos: p.pos,
                    remaining_ticks: p.remaining_ticks,
                })
                .collect(),
            wave: state.wave.current_wave,
            game_over: state.game_over,
        }
    }
}
