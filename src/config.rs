//! Data-driven game balance tables
//!
//! Everything here is plain data loaded once at session start. The simulation
//! never hard-codes a balance number; it reads these tables. `Default` carries
//! the shipping balance, and a JSON override can be loaded on top for tuning.

use serde::{Deserialize, Serialize};

/// How a weapon turns one trigger pull into projectiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FirePattern {
    /// One projectile along the (spread-perturbed) aim ray
    Single,
    /// `pellets` projectiles, each additionally perturbed by `uniform(-arc, arc)`
    Spread { pellets: u32, arc: f64 },
    /// One area-effect grenade aimed at the target point
    Area,
}

/// Immutable per-weapon template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub name: String,
    /// Minimum milliseconds between successful fires
    pub fire_rate_ms: f64,
    pub damage: f64,
    /// Angular perturbation applied to every projectile (radians)
    pub spread: f64,
    pub max_ammo: u32,
    pub pattern: FirePattern,
    /// Multiplier on the base projectile speed
    pub projectile_speed_mult: f64,
    /// Projectile survives hits and may damage several enemies in one flight
    pub penetrating: bool,
}

/// Immutable per-enemy-kind stats
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemySpec {
    /// Movement speed (world units per second)
    pub speed: f64,
    pub max_health: f64,
    /// Contact damage dealt to the player per (non-invulnerable) overlap
    pub contact_damage: f64,
    pub radius: f64,
    pub score_value: u64,
}

/// Map generation parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MapConfig {
    /// Map edge length in world units (square map)
    pub size: f64,
    /// Tile edge length in world units
    pub tile_size: f64,
    /// Width of the impassable border ring, in tiles
    pub border_width: usize,
    /// Probability of an interior grass tile becoming a wall
    pub wall_probability: f64,
}

/// Spawn admission and placement parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Minimum spawn distance from the player (world units)
    pub min_distance: f64,
    /// Maximum spawn distance from the player
    pub max_distance: f64,
    /// Ticks between spawn attempts on wave 1
    pub initial_delay_ticks: u32,
    /// Delay reduction per wave, in ticks
    pub delay_step_ticks: u32,
    /// Hard floor on the spawn delay
    pub min_delay_ticks: u32,
    /// Wave 1 target population
    pub initial_wave_target: u32,
    /// Target population multiplier per wave
    pub wave_growth: f64,
    /// Randomised placement attempts before the deterministic fallback
    pub max_placement_attempts: u32,
    /// Margin kept from the map edge when clamping spawn positions
    pub edge_margin: f64,
}

/// Complete session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub map: MapConfig,
    pub spawn: SpawnConfig,

    pub player_speed: f64,
    pub player_radius: f64,
    pub player_max_health: f64,
    /// Post-hit invulnerability window (milliseconds)
    pub invulnerability_ms: f64,
    /// Knockback distance applied to the player on enemy contact
    pub contact_knockback: f64,

    pub regular: EnemySpec,
    pub fast: EnemySpec,
    pub tank: EnemySpec,

    pub weapons: Vec<WeaponSpec>,
    /// Reload duration (milliseconds), shared by all weapons
    pub reload_ms: f64,
    /// Base projectile speed (world units per second)
    pub projectile_speed: f64,
    pub grenade_speed: f64,
    pub grenade_lifetime_ticks: u32,
    pub grenade_explosion_radius: f64,

    /// Chance a dead enemy drops a pickup
    pub pickup_chance: f64,
    pub pickup_radius: f64,
    pub pickup_lifetime_ticks: u32,
    pub pickup_health_value: f64,
    pub pickup_ammo_value: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            map: MapConfig {
                size: 2048.0,
                tile_size: 64.0,
                border_width: 3,
                wall_probability: 0.08,
            },
            spawn: SpawnConfig {
                min_distance: 400.0,
                max_distance: 700.0,
                initial_delay_ticks: 180,
                delay_step_ticks: 12,
                min_delay_ticks: 10,
                initial_wave_target: 5,
                wave_growth: 1.5,
                max_placement_attempts: 20,
                edge_margin: 64.0,
            },

            player_speed: 300.0,
            player_radius: 16.0,
            player_max_health: 100.0,
            invulnerability_ms: 500.0,
            contact_knockback: 20.0,

            regular: EnemySpec {
                speed: 120.0,
                max_health: 100.0,
                contact_damage: 5.0,
                radius: 12.0,
                score_value: 100,
            },
            fast: EnemySpec {
                speed: 210.0,
                max_health: 60.0,
                contact_damage: 3.0,
                radius: 10.0,
                score_value: 150,
            },
            tank: EnemySpec {
                speed: 70.0,
                max_health: 250.0,
                contact_damage: 12.0,
                radius: 18.0,
                score_value: 300,
            },

            weapons: default_weapons(),
            reload_ms: 2000.0,
            projectile_speed: 900.0,
            grenade_speed: 300.0,
            grenade_lifetime_ticks: 120,
            grenade_explosion_radius: 50.0,

            pickup_chance: 0.2,
            pickup_radius: 15.0,
            pickup_lifetime_ticks: 600,
            pickup_health_value: 30.0,
            pickup_ammo_value: 20,
        }
    }
}

fn default_weapons() -> Vec<WeaponSpec> {
    vec![
        WeaponSpec {
            name: "Pistol".into(),
            fire_rate_ms: 500.0,
            damage: 25.0,
            spread: 0.05,
            max_ammo: 30,
            pattern: FirePattern::Single,
            projectile_speed_mult: 1.0,
            penetrating: false,
        },
        WeaponSpec {
            name: "Shotgun".into(),
            fire_rate_ms: 1000.0,
            damage: 8.0,
            spread: 0.2,
            max_ammo: 8,
            pattern: FirePattern::Spread {
                pellets: 7,
                arc: 0.3,
            },
            projectile_speed_mult: 1.0,
            penetrating: false,
        },
        WeaponSpec {
            name: "Assault Rifle".into(),
            fire_rate_ms: 150.0,
            damage: 15.0,
            spread: 0.03,
            max_ammo: 100,
            pattern: FirePattern::Single,
            projectile_speed_mult: 0.7,
            penetrating: false,
        },
        WeaponSpec {
            name: "Sniper Rifle".into(),
            fire_rate_ms: 1500.0,
            damage: 100.0,
            spread: 0.01,
            max_ammo: 10,
            pattern: FirePattern::Single,
            projectile_speed_mult: 2.0,
            penetrating: true,
        },
        WeaponSpec {
            name: "Submachine Gun".into(),
            fire_rate_ms: 100.0,
            damage: 10.0,
            spread: 0.08,
            max_ammo: 150,
            pattern: FirePattern::Single,
            projectile_speed_mult: 0.5,
            penetrating: false,
        },
        WeaponSpec {
            name: "Grenade Launcher".into(),
            fire_rate_ms: 2000.0,
            damage: 50.0,
            spread: 0.1,
            max_ammo: 5,
            pattern: FirePattern::Area,
            projectile_speed_mult: 1.0,
            penetrating: false,
        },
    ]
}

impl Config {
    /// Load a config from JSON, e.g. a tuning override file
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Grid edge length in tiles
    pub fn grid_size(&self) -> usize {
        (self.map.size / self.map.tile_size) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_json() {
        let cfg = Config::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back = Config::from_json(&json).unwrap();
        assert_eq!(back.weapons.len(), cfg.weapons.len());
        assert_eq!(back.map.border_width, cfg.map.border_width);
    }

    #[test]
    fn test_weapon_table_matches_loadout() {
        let cfg = Config::default();
        assert_eq!(cfg.weapons.len(), 6);
        assert!(matches!(
            cfg.weapons[1].pattern,
            FirePattern::Spread { pellets: 7, .. }
        ));
        assert!(matches!(cfg.weapons[5].pattern, FirePattern::Area));
    }
}
