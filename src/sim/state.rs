//! Game state and core simulation types
//!
//! The simulation tick is the sole writer of everything in here. External
//! readers consume a [`crate::sim::FrameSnapshot`] built after the tick and
//! drain the event queue; they never mutate state directly.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::map::TileMap;
use super::wave::WaveDirector;
use super::weapon::Weapon;
use crate::config::Config;

/// Collision radius of a bullet (half the sprite width)
pub const BULLET_RADIUS: f64 = 4.0;
/// Collision radius of a grenade
pub const GRENADE_RADIUS: f64 = 8.0;

/// Discrete event tags emitted during a tick, at most once per triggering
/// occurrence, order-preserving. Drained lazily by the audio/FX layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Shoot,
    Reload,
    WeaponSwitch,
    PlayerHurt,
    ZombieDeath,
    BulletImpact,
    Pickup,
    WaveStart,
    GameOver,
}

/// Enemy archetypes; stats are fixed per kind at spawn from the config table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Regular,
    Fast,
    Tank,
}

/// Player reload state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReloadState {
    Idle,
    /// Reloading until the simulation clock reaches `until_ms`
    Reloading { until_ms: f64 },
}

/// Consumable item held in the player inventory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Health(f64),
    Ammo(u32),
}

/// Player inventory with an explicit, bounds-checked selection
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    items: Vec<Item>,
    selected: Option<usize>,
}

impl Inventory {
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<Item> {
        self.selected.and_then(|i| self.items.get(i).copied())
    }

    pub fn add(&mut self, item: Item) {
        self.items.push(item);
        if self.selected.is_none() {
            self.selected = Some(self.items.len() - 1);
        }
    }

    /// Select by index; out-of-range selections are rejected, state unchanged
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Remove and return the selected item, repairing the selection
    pub fn take_selected(&mut self) -> Option<Item> {
        let index = self.selected?;
        if index >= self.items.len() {
            self.selected = None;
            return None;
        }
        let item = self.items.remove(index);
        self.selected = if self.items.is_empty() {
            None
        } else {
            Some(index.min(self.items.len() - 1))
        };
        Some(item)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The player actor
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: DVec2,
    pub radius: f64,
    pub health: f64,
    pub max_health: f64,
    pub speed: f64,
    /// Ammo pool per weapon, indexed like `weapons`
    pub ammo: Vec<u32>,
    pub weapons: Vec<Weapon>,
    pub current_weapon: usize,
    pub reload: ReloadState,
    /// Simulation clock value until which incoming damage is ignored
    pub invulnerable_until_ms: f64,
    pub score: u64,
    pub inventory: Inventory,
}

impl Player {
    pub fn new(cfg: &Config, pos: DVec2) -> Self {
        Self {
            pos,
            radius: cfg.player_radius,
            health: cfg.player_max_health,
            max_health: cfg.player_max_health,
            speed: cfg.player_speed,
            ammo: cfg.weapons.iter().map(|w| w.max_ammo).collect(),
            weapons: cfg.weapons.iter().cloned().map(Weapon::new).collect(),
            current_weapon: 0,
            reload: ReloadState::Idle,
            invulnerable_until_ms: f64::NEG_INFINITY,
            score: 0,
            inventory: Inventory::default(),
        }
    }

    /// Apply damage unless inside the invulnerability window. Returns true
    /// if damage landed; arms a fresh window when it does.
    pub fn take_damage(&mut self, amount: f64, now_ms: f64, invuln_ms: f64) -> bool {
        if now_ms < self.invulnerable_until_ms {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        self.invulnerable_until_ms = now_ms + invuln_ms;
        true
    }

    pub fn heal(&mut self, amount: f64) {
        self.health = (self.health + amount).min(self.max_health);
    }

    pub fn is_reloading(&self) -> bool {
        matches!(self.reload, ReloadState::Reloading { .. })
    }
}

/// An enemy actor, owned by the active-enemy collection
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: DVec2,
    pub radius: f64,
    pub health: f64,
    pub max_health: f64,
    pub speed: f64,
    pub contact_damage: f64,
    pub score_value: u64,
    /// Offset added to the chase target so paths are not perfectly straight
    pub wander_offset: DVec2,
    /// Ticks until the wander offset is re-rolled
    pub path_timer: u32,
    /// Ticks remaining on the hit flash (renderer feedback)
    pub hit_flash_ticks: u32,
}

impl Enemy {
    pub fn spawn(cfg: &Config, kind: EnemyKind, id: u32, pos: DVec2) -> Self {
        let spec = match kind {
            EnemyKind::Regular => &cfg.regular,
            EnemyKind::Fast => &cfg.fast,
            EnemyKind::Tank => &cfg.tank,
        };
        Self {
            id,
            kind,
            pos,
            radius: spec.radius,
            health: spec.max_health,
            max_health: spec.max_health,
            speed: spec.speed,
            contact_damage: spec.contact_damage,
            score_value: spec.score_value,
            wander_offset: DVec2::ZERO,
            path_timer: 0,
            hit_flash_ticks: 0,
        }
    }

    /// Apply damage; returns true if this killed the enemy
    pub fn take_damage(&mut self, amount: f64) -> bool {
        self.health = (self.health - amount).max(0.0);
        self.hit_flash_ticks = 6;
        self.health <= 0.0
    }
}

/// Distinguishes straight bullets from timed area-effect grenades
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileKind {
    Bullet { penetrating: bool },
    Grenade {
        explosion_radius: f64,
        remaining_lifetime: u32,
    },
}

/// A projectile in flight, owned by the active-projectile collection
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub pos: DVec2,
    pub vel: DVec2,
    pub damage: f64,
    pub kind: ProjectileKind,
}

impl Projectile {
    pub fn radius(&self) -> f64 {
        match self.kind {
            ProjectileKind::Bullet { .. } => BULLET_RADIUS,
            ProjectileKind::Grenade { .. } => GRENADE_RADIUS,
        }
    }
}

/// Pickup variants dropped by dead enemies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Health,
    Ammo,
}

/// A timed pickup entity lying on the ground
#[derive(Debug, Clone)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: DVec2,
    pub radius: f64,
    pub remaining_ticks: u32,
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: Config,
    pub map: TileMap,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter; the per-tick clock derives from this
    pub time_ticks: u64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub wave: WaveDirector,
    pub game_over: bool,
    pub(super) events: Vec<GameEvent>,
    pub(super) next_id: u32,
}

impl GameState {
    /// Create a session: generates the map once and places the player at the
    /// map centre.
    pub fn new(config: Config, seed: u64) -> Self {
        let map = TileMap::generate(&config.map, seed);
        let center = DVec2::splat(map.world_size() / 2.0);
        let player = Player::new(&config, center);
        let wave = WaveDirector::new(&config.spawn);
        let mut state = Self {
            config,
            map,
            seed,
            rng: Pcg32::seed_from_u64(seed.wrapping_add(1)),
            time_ticks: 0,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            wave,
            game_over: false,
            events: Vec::new(),
            next_id: 1,
        };
        state.push_event(GameEvent::WaveStart);
        state
    }

    /// Reset for a fresh run on the same map and config
    pub fn reset(&mut self) {
        let center = DVec2::splat(self.map.world_size() / 2.0);
        self.player = Player::new(&self.config, center);
        self.enemies.clear();
        self.projectiles.clear();
        self.pickups.clear();
        self.wave = WaveDirector::new(&self.config.spawn);
        self.game_over = false;
        self.events.clear();
        self.time_ticks = 0;
        self.next_id = 1;
        self.push_event(GameEvent::WaveStart);
        log::info!("Session reset (seed {})", self.seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Simulation clock in milliseconds, derived from the tick counter.
    /// Sourced once per tick so every timer comparison in a frame agrees.
    pub fn now_ms(&self) -> f64 {
        crate::ticks_to_ms(self.time_ticks)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain queued events in emission order
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }
}
