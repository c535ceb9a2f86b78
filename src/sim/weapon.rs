//! Weapon firing and reload state machines
//!
//! Weapons are data: one [`Weapon`] per [`WeaponSpec`] row, and a single
//! `fire` routine that branches on the spec's [`FirePattern`]. There is no
//! per-weapon dispatch beyond that closed set.

use glam::DVec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Player, Projectile, ProjectileKind, ReloadState};
use crate::config::{Config, FirePattern, WeaponSpec};

/// A weapon instance: immutable spec plus the fire-rate cooldown stamp
#[derive(Debug, Clone)]
pub struct Weapon {
    pub spec: WeaponSpec,
    pub last_fired_ms: f64,
}

impl Weapon {
    pub fn new(spec: WeaponSpec) -> Self {
        Self {
            spec,
            last_fired_ms: f64::NEG_INFINITY,
        }
    }

    /// Whether the fire-rate cooldown has elapsed
    pub fn ready(&self, now_ms: f64) -> bool {
        now_ms - self.last_fired_ms >= self.spec.fire_rate_ms
    }
}

/// Attempt to fire the player's current weapon toward `aim`.
///
/// Fails silently (false, no state change) while the weapon is cooling down,
/// the ammo pool is empty, or the player is reloading. On success the whole
/// volley costs exactly one ammo unit and `out` receives the new
/// projectiles.
pub fn fire(
    player: &mut Player,
    cfg: &Config,
    aim: DVec2,
    now_ms: f64,
    rng: &mut Pcg32,
    next_id: &mut u32,
    out: &mut Vec<Projectile>,
) -> bool {
    if player.is_reloading() {
        return false;
    }
    let index = player.current_weapon;
    let Some(weapon) = player.weapons.get(index) else {
        return false;
    };
    if !weapon.ready(now_ms) {
        return false;
    }
    if player.ammo.get(index).copied().unwrap_or(0) == 0 {
        return false;
    }

    let origin = player.pos;
    let spec = weapon.spec.clone();
    let base_angle = (aim.y - origin.y).atan2(aim.x - origin.x);
    let speed = cfg.projectile_speed * spec.projectile_speed_mult;

    let mut alloc = || {
        let id = *next_id;
        *next_id += 1;
        id
    };

    match spec.pattern {
        FirePattern::Single => {
            let angle = base_angle + rng.random_range(-spec.spread..=spec.spread);
            out.push(Projectile {
                id: alloc(),
                pos: origin,
                vel: DVec2::from_angle(angle) * speed,
                damage: spec.damage,
                kind: ProjectileKind::Bullet {
                    penetrating: spec.penetrating,
                },
            });
        }
        FirePattern::Spread { pellets, arc } => {
            for _ in 0..pellets {
                let angle = base_angle
                    + rng.random_range(-spec.spread..=spec.spread)
                    + rng.random_range(-arc..=arc);
                out.push(Projectile {
                    id: alloc(),
                    pos: origin,
                    vel: DVec2::from_angle(angle) * speed,
                    damage: spec.damage,
                    kind: ProjectileKind::Bullet {
                        penetrating: spec.penetrating,
                    },
                });
            }
        }
        FirePattern::Area => {
            // Grenades fly straight at the target point, no spread
            let dir = (aim - origin).normalize_or_zero();
            let dir = if dir == DVec2::ZERO { DVec2::X } else { dir };
            out.push(Projectile {
                id: alloc(),
                pos: origin,
                vel: dir * cfg.grenade_speed,
                damage: spec.damage,
                kind: ProjectileKind::Grenade {
                    explosion_radius: cfg.grenade_explosion_radius,
                    remaining_lifetime: cfg.grenade_lifetime_ticks,
                },
            });
        }
    }

    player.weapons[index].last_fired_ms = now_ms;
    player.ammo[index] -= 1;
    true
}

impl Player {
    /// Begin reloading the current weapon. No-op (false) if already
    /// reloading or the pool is full.
    pub fn start_reload(&mut self, now_ms: f64, reload_ms: f64) -> bool {
        if self.is_reloading() {
            return false;
        }
        let index = self.current_weapon;
        let (Some(weapon), Some(&ammo)) = (self.weapons.get(index), self.ammo.get(index)) else {
            return false;
        };
        if ammo >= weapon.spec.max_ammo {
            return false;
        }
        self.reload = ReloadState::Reloading {
            until_ms: now_ms + reload_ms,
        };
        true
    }

    /// Complete an elapsed reload: refill the current weapon's pool.
    ///
    /// A reload persists across weapon switches, so the pool refilled is
    /// whichever weapon is current when the timer expires.
    pub fn update_reload(&mut self, now_ms: f64) {
        if let ReloadState::Reloading { until_ms } = self.reload
            && now_ms >= until_ms
        {
            let index = self.current_weapon;
            if let (Some(weapon), Some(ammo)) =
                (self.weapons.get(index), self.ammo.get_mut(index))
            {
                *ammo = weapon.spec.max_ammo;
            }
            self.reload = ReloadState::Idle;
        }
    }

    /// Switch to the weapon at `index`. Out-of-range indices are rejected
    /// with no state change. Switching into an empty pool tops it up to max
    /// (reference behaviour, kept for product sign-off).
    pub fn switch_weapon(&mut self, index: usize) -> bool {
        let Some(weapon) = self.weapons.get(index) else {
            return false;
        };
        self.current_weapon = index;
        if self.ammo.get(index).copied().unwrap_or(0) == 0 {
            self.ammo[index] = weapon.spec.max_ammo;
        }
        true
    }
}
