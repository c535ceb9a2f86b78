//! Wave progression and spawn admission control
//!
//! One spawn attempt at a time, gated by a fixed-tick timer, so a wave's
//! population trickles in instead of appearing at once. A wave completes
//! only when its full target has been spawned AND every enemy is dead.

use glam::DVec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::map::TileMap;
use super::state::{Enemy, EnemyKind, GameEvent};
use crate::config::{Config, SpawnConfig};

/// Where a wave is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavePhase {
    /// Still spawning toward the target population
    Filling,
    /// Target fully spawned, enemies still alive
    Active,
    /// Target met and field clear; the next tick advances the wave
    Complete,
}

/// Tracks wave number, spawn budget and the admission timer
#[derive(Debug, Clone)]
pub struct WaveDirector {
    pub current_wave: u32,
    pub target_population: u32,
    pub spawned_this_wave: u32,
    pub spawn_delay_ticks: u32,
    spawn_timer: u32,
}

impl WaveDirector {
    pub fn new(cfg: &SpawnConfig) -> Self {
        Self {
            current_wave: 1,
            target_population: cfg.initial_wave_target,
            spawned_this_wave: 0,
            spawn_delay_ticks: cfg.initial_delay_ticks,
            spawn_timer: cfg.initial_delay_ticks,
        }
    }

    pub fn phase(&self, enemies_alive: usize) -> WavePhase {
        if self.spawned_this_wave < self.target_population {
            WavePhase::Filling
        } else if enemies_alive > 0 {
            WavePhase::Active
        } else {
            WavePhase::Complete
        }
    }

    /// Advance the director by one tick: admit at most one spawn, or roll
    /// over to the next wave when the current one is complete.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        cfg: &Config,
        map: &TileMap,
        player_pos: DVec2,
        enemies: &mut Vec<Enemy>,
        rng: &mut Pcg32,
        next_id: &mut u32,
        events: &mut Vec<GameEvent>,
    ) {
        match self.phase(enemies.len()) {
            WavePhase::Filling => {
                if self.spawn_timer > 0 {
                    self.spawn_timer -= 1;
                    return;
                }
                self.spawn_timer = self.spawn_delay_ticks;

                let kind = self.roll_kind(rng);
                let pos = place_spawn(&cfg.spawn, map, player_pos, kind, cfg, rng);
                let id = *next_id;
                *next_id += 1;
                enemies.push(Enemy::spawn(cfg, kind, id, pos));
                self.spawned_this_wave += 1;
            }
            WavePhase::Active => {}
            WavePhase::Complete => {
                self.current_wave += 1;
                self.target_population =
                    (self.target_population as f64 * cfg.spawn.wave_growth).floor() as u32;
                self.spawn_delay_ticks = self
                    .spawn_delay_ticks
                    .saturating_sub(cfg.spawn.delay_step_ticks)
                    .max(cfg.spawn.min_delay_ticks);
                self.spawned_this_wave = 0;
                self.spawn_timer = self.spawn_delay_ticks;
                events.push(GameEvent::WaveStart);
                log::info!(
                    "Wave {} starting: target {}, spawn delay {} ticks",
                    self.current_wave,
                    self.target_population,
                    self.spawn_delay_ticks
                );
            }
        }
    }

    /// Wave-dependent weighted enemy kind choice
    fn roll_kind(&self, rng: &mut Pcg32) -> EnemyKind {
        let roll: f64 = rng.random();
        match self.current_wave {
            0..=2 => EnemyKind::Regular,
            3..=4 => {
                if roll < 0.7 {
                    EnemyKind::Regular
                } else {
                    EnemyKind::Fast
                }
            }
            _ => {
                if roll < 0.5 {
                    EnemyKind::Regular
                } else if roll < 0.8 {
                    EnemyKind::Fast
                } else {
                    EnemyKind::Tank
                }
            }
        }
    }
}

/// Find a spawn position: random ring sample around the player, clamped into
/// map bounds, validity-checked; falls back to a fixed offset after the
/// attempt cap so spawning never stalls.
fn place_spawn(
    spawn: &SpawnConfig,
    map: &TileMap,
    player_pos: DVec2,
    kind: EnemyKind,
    cfg: &Config,
    rng: &mut Pcg32,
) -> DVec2 {
    let radius = match kind {
        EnemyKind::Regular => cfg.regular.radius,
        EnemyKind::Fast => cfg.fast.radius,
        EnemyKind::Tank => cfg.tank.radius,
    };
    let lo = spawn.edge_margin;
    let hi = map.world_size() - spawn.edge_margin;

    for _ in 0..spawn.max_placement_attempts {
        let angle = rng.random_range(0.0..std::f64::consts::TAU);
        let dist = rng.random_range(spawn.min_distance..=spawn.max_distance);
        let cand = (player_pos + DVec2::from_angle(angle) * dist)
            .clamp(DVec2::splat(lo), DVec2::splat(hi));
        if map.is_passable(cand.x, cand.y) && !map.check_collision(cand.x, cand.y, radius) {
            return cand;
        }
    }

    // Deterministic fallback so a cramped map cannot stall the wave
    let fallback = (player_pos + DVec2::new(spawn.min_distance, 0.0))
        .clamp(DVec2::splat(lo), DVec2::splat(hi));
    log::debug!(
        "Spawn placement exhausted {} attempts, using fallback {:?}",
        spawn.max_placement_attempts,
        fallback
    );
    fallback
}
