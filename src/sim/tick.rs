//! Per-frame simulation orchestration
//!
//! One call to [`tick`] advances the whole world by exactly one fixed step.
//! The pass order is load-bearing: input and fire before spawning, enemy
//! contact before projectile resolution, sweeps last. Every timer comparison
//! in a frame uses the clock value sourced at the top of the tick.

use glam::DVec2;
use rand::Rng;

use super::motion;
use super::state::{GameEvent, GameState, Item, Pickup, PickupKind, ProjectileKind};
use super::weapon;
use crate::consts::SIM_DT;

/// Knockback applied to enemies caught in a grenade blast, scaled by the
/// same distance factor as the damage.
const EXPLOSION_KNOCKBACK: f64 = 30.0;

/// Decoded input intent for one tick, produced by the platform layer
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Movement axes in [-1, 1]
    pub move_x: f64,
    pub move_y: f64,
    /// Aim point in world space
    pub aim: DVec2,
    pub fire: bool,
    pub reload: bool,
    pub weapon_switch: Option<usize>,
    /// Select the inventory slot at this index
    pub select_item: Option<usize>,
    /// Consume the currently selected inventory item
    pub use_item: bool,
}

/// Advance the simulation by one fixed step. No-op once the session is over.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.game_over {
        return;
    }
    state.time_ticks += 1;
    let now_ms = state.now_ms();
    let tick_no = state.time_ticks;

    let GameState {
        config,
        map,
        rng,
        player,
        enemies,
        projectiles,
        pickups,
        wave,
        events,
        next_id,
        game_over,
        ..
    } = state;

    // 1. Input intent: switch, reload, item use, motion
    if let Some(index) = input.weapon_switch
        && index != player.current_weapon
        && player.switch_weapon(index)
    {
        events.push(GameEvent::WeaponSwitch);
    }
    if input.reload && player.start_reload(now_ms, config.reload_ms) {
        events.push(GameEvent::Reload);
    }
    player.update_reload(now_ms);

    if let Some(index) = input.select_item {
        player.inventory.select(index);
    }
    if input.use_item
        && let Some(item) = player.inventory.take_selected()
    {
        match item {
            Item::Health(amount) => player.heal(amount),
            Item::Ammo(amount) => {
                let index = player.current_weapon;
                if let Some(ammo) = player.ammo.get_mut(index) {
                    *ammo += amount;
                }
            }
        }
        events.push(GameEvent::Pickup);
    }

    let dir = motion::normalize_input(input.move_x, input.move_y);
    player.pos = motion::resolve_move(map, player.pos, player.radius, dir * player.speed * SIM_DT);

    // 2. Fire request
    if input.fire && weapon::fire(player, config, input.aim, now_ms, rng, next_id, projectiles) {
        events.push(GameEvent::Shoot);
    }

    // 3. Wave director may admit a spawn or roll the wave over
    wave.update(config, map, player.pos, enemies, rng, next_id, events);

    // 4. Enemy motion and contact damage. Contact never removes the enemy;
    // the invulnerability window is what meters the damage rate.
    for enemy in enemies.iter_mut() {
        motion::steer_enemy(enemy, player.pos, map, SIM_DT, rng);
        if enemy.hit_flash_ticks > 0 {
            enemy.hit_flash_ticks -= 1;
        }
        if enemy.pos.distance(player.pos) < enemy.radius + player.radius
            && player.take_damage(enemy.contact_damage, now_ms, config.invulnerability_ms)
        {
            motion::apply_knockback(
                map,
                &mut player.pos,
                player.radius,
                enemy.pos,
                config.contact_knockback,
            );
            events.push(GameEvent::PlayerHurt);
        }
    }

    // 5. Advance projectiles; a grenade whose fuse runs out this tick
    // detonates after all projectiles have moved.
    let mut keep = vec![true; projectiles.len()];
    let mut detonations: Vec<(DVec2, f64, f64)> = Vec::new();
    for (i, proj) in projectiles.iter_mut().enumerate() {
        proj.pos += proj.vel * SIM_DT;
        if let ProjectileKind::Grenade {
            explosion_radius,
            remaining_lifetime,
        } = &mut proj.kind
        {
            *remaining_lifetime = remaining_lifetime.saturating_sub(1);
            if *remaining_lifetime == 0 {
                detonations.push((proj.pos, proj.damage, *explosion_radius));
                keep[i] = false;
            }
        }
    }
    for (pos, damage, radius) in detonations {
        for enemy in enemies.iter_mut() {
            let distance = enemy.pos.distance(pos);
            if distance < radius {
                let factor = 1.0 - distance / radius;
                enemy.take_damage(damage * factor);
                motion::apply_knockback(
                    map,
                    &mut enemy.pos,
                    enemy.radius,
                    pos,
                    EXPLOSION_KNOCKBACK * factor,
                );
            }
        }
        events.push(GameEvent::BulletImpact);
    }

    // 6. Projectile collision: bounds, then walls, then enemies. A
    // non-penetrating projectile stops at its first enemy hit.
    for (i, proj) in projectiles.iter().enumerate() {
        if !keep[i] {
            continue;
        }
        if !map.in_bounds(proj.pos.x, proj.pos.y) {
            keep[i] = false;
            continue;
        }
        if map.check_collision(proj.pos.x, proj.pos.y, proj.radius()) {
            keep[i] = false;
            events.push(GameEvent::BulletImpact);
            continue;
        }
        let penetrating = matches!(proj.kind, ProjectileKind::Bullet { penetrating: true });
        for enemy in enemies.iter_mut() {
            if enemy.health <= 0.0 {
                continue;
            }
            if enemy.pos.distance(proj.pos) < enemy.radius + proj.radius() {
                enemy.take_damage(proj.damage);
                events.push(GameEvent::BulletImpact);
                if !penetrating {
                    keep[i] = false;
                    break;
                }
            }
        }
    }
    let mut index = 0;
    projectiles.retain(|_| {
        let kept = keep[index];
        index += 1;
        kept
    });

    // 7. Enemy sweep: score, death events, pickup drops
    enemies.retain(|enemy| {
        if enemy.health > 0.0 {
            return true;
        }
        player.score += enemy.score_value;
        events.push(GameEvent::ZombieDeath);
        if rng.random::<f64>() < config.pickup_chance {
            let kind = if rng.random::<bool>() {
                PickupKind::Health
            } else {
                PickupKind::Ammo
            };
            let id = *next_id;
            *next_id += 1;
            pickups.push(Pickup {
                id,
                kind,
                pos: enemy.pos,
                radius: config.pickup_radius,
                remaining_ticks: config.pickup_lifetime_ticks,
            });
        }
        false
    });

    // Pickups age out or are collected on contact; effects apply immediately
    pickups.retain_mut(|pickup| {
        if pickup.remaining_ticks == 0 {
            return false;
        }
        pickup.remaining_ticks -= 1;
        if pickup.pos.distance(player.pos) < pickup.radius + player.radius {
            match pickup.kind {
                PickupKind::Health => player.heal(config.pickup_health_value),
                PickupKind::Ammo => {
                    let index = player.current_weapon;
                    if let Some(ammo) = player.ammo.get_mut(index) {
                        *ammo += config.pickup_ammo_value;
                    }
                }
            }
            events.push(GameEvent::Pickup);
            return false;
        }
        true
    });

    // 8. Player sweep: the tick only raises the flag; session transitions
    // belong to the owner of the game state.
    if player.health <= 0.0 {
        *game_over = true;
        events.push(GameEvent::GameOver);
        log::info!(
            "Game over at tick {}: wave {}, score {}",
            tick_no,
            wave.current_wave,
            player.score
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sim::state::{Enemy, EnemyKind, Projectile};

    fn open_state(seed: u64) -> GameState {
        let mut cfg = Config::default();
        cfg.map.wall_probability = 0.0;
        // No spawns for the duration of these tests
        cfg.spawn.initial_delay_ticks = 100_000;
        GameState::new(cfg, seed)
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_fire_input_spawns_projectile_and_event() {
        let mut state = open_state(5);
        state.drain_events();
        let input = TickInput {
            fire: true,
            aim: state.player.pos + DVec2::new(100.0, 0.0),
            ..idle()
        };
        tick(&mut state, &input);
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.pending_events().contains(&GameEvent::Shoot));
        assert_eq!(state.player.ammo[0], 29);
    }

    #[test]
    fn test_movement_respects_speed_and_dt() {
        let mut state = open_state(5);
        let start = state.player.pos;
        tick(&mut state, &TickInput { move_x: 1.0, ..idle() });
        let expected = state.player.speed * SIM_DT;
        assert!((state.player.pos.x - start.x - expected).abs() < 1e-9);
        assert_eq!(state.player.pos.y, start.y);
    }

    #[test]
    fn test_contact_damage_and_knockback() {
        let mut state = open_state(5);
        let enemy_pos = state.player.pos + DVec2::new(10.0, 0.0);
        let enemy = Enemy::spawn(&state.config, EnemyKind::Regular, 99, enemy_pos);
        state.enemies.push(enemy);
        state.drain_events();

        let health_before = state.player.health;
        let x_before = state.player.pos.x;
        tick(&mut state, &idle());

        let contact = state.config.regular.contact_damage;
        assert_eq!(state.player.health, health_before - contact);
        assert!(state.pending_events().contains(&GameEvent::PlayerHurt));
        // Knocked away from the enemy, which sits to the player's right
        assert!(state.player.pos.x < x_before);
        // Enemy persists; the invulnerability window blocks the next hit
        assert_eq!(state.enemies.len(), 1);
        tick(&mut state, &idle());
        assert_eq!(state.player.health, health_before - contact);
    }

    #[test]
    fn test_bullet_kills_enemy_and_scores() {
        let mut state = open_state(5);
        let pos = state.player.pos + DVec2::new(200.0, 0.0);
        let mut enemy = Enemy::spawn(&state.config, EnemyKind::Regular, 99, pos);
        enemy.health = 10.0;
        state.enemies.push(enemy);
        state.projectiles.push(Projectile {
            id: 100,
            pos,
            vel: DVec2::ZERO,
            damage: 25.0,
            kind: ProjectileKind::Bullet { penetrating: false },
        });
        state.drain_events();

        tick(&mut state, &idle());
        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.player.score, state.config.regular.score_value);
        let events = state.pending_events();
        assert!(events.contains(&GameEvent::BulletImpact));
        assert!(events.contains(&GameEvent::ZombieDeath));
    }

    #[test]
    fn test_non_penetrating_bullet_hits_one_enemy() {
        let mut state = open_state(5);
        let pos = state.player.pos + DVec2::new(200.0, 0.0);
        for id in [50, 51] {
            state
                .enemies
                .push(Enemy::spawn(&state.config, EnemyKind::Regular, id, pos));
        }
        state.projectiles.push(Projectile {
            id: 100,
            pos,
            vel: DVec2::ZERO,
            damage: 25.0,
            kind: ProjectileKind::Bullet { penetrating: false },
        });

        tick(&mut state, &idle());
        let total: f64 = state.enemies.iter().map(|e| e.health).sum();
        assert_eq!(total, 2.0 * state.config.regular.max_health - 25.0);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_penetrating_bullet_hits_all_overlapping_enemies() {
        let mut state = open_state(5);
        let pos = state.player.pos + DVec2::new(200.0, 0.0);
        for id in [50, 51] {
            state
                .enemies
                .push(Enemy::spawn(&state.config, EnemyKind::Regular, id, pos));
        }
        state.projectiles.push(Projectile {
            id: 100,
            pos,
            vel: DVec2::ZERO,
            damage: 25.0,
            kind: ProjectileKind::Bullet { penetrating: true },
        });

        tick(&mut state, &idle());
        for enemy in &state.enemies {
            assert!(enemy.health < state.config.regular.max_health);
        }
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_grenade_detonates_when_fuse_runs_out() {
        let mut state = open_state(5);
        let pos = state.player.pos + DVec2::new(300.0, 0.0);
        state
            .enemies
            .push(Enemy::spawn(&state.config, EnemyKind::Tank, 99, pos));
        // Close enough for the blast, far enough that the grenade never
        // contacts the enemy directly (direct contact is a plain hit)
        state.projectiles.push(Projectile {
            id: 100,
            pos: pos + DVec2::new(30.0, 0.0),
            vel: DVec2::ZERO,
            damage: 50.0,
            kind: ProjectileKind::Grenade {
                explosion_radius: state.config.grenade_explosion_radius,
                remaining_lifetime: 3,
            },
        });

        tick(&mut state, &idle());
        tick(&mut state, &idle());
        assert_eq!(state.projectiles.len(), 1);
        tick(&mut state, &idle());
        // Fuse expired on the third tick: projectile gone, enemy damaged
        assert!(state.projectiles.is_empty());
        assert!(state.enemies[0].health < state.config.tank.max_health);
    }

    #[test]
    fn test_projectile_removed_on_wall_hit() {
        let mut state = open_state(5);
        // Heading straight into the left border wall
        state.projectiles.push(Projectile {
            id: 100,
            pos: DVec2::new(200.0, state.player.pos.y),
            vel: DVec2::new(-900.0, 0.0),
            damage: 25.0,
            kind: ProjectileKind::Bullet { penetrating: false },
        });
        state.drain_events();

        for _ in 0..10 {
            tick(&mut state, &idle());
        }
        assert!(state.projectiles.is_empty());
        assert!(state.pending_events().contains(&GameEvent::BulletImpact));
    }

    #[test]
    fn test_pickup_collected_on_contact() {
        let mut state = open_state(5);
        state.player.health = 50.0;
        state.pickups.push(Pickup {
            id: 100,
            kind: PickupKind::Health,
            pos: state.player.pos,
            radius: state.config.pickup_radius,
            remaining_ticks: 100,
        });
        state.drain_events();

        tick(&mut state, &idle());
        assert!(state.pickups.is_empty());
        assert_eq!(
            state.player.health,
            50.0 + state.config.pickup_health_value
        );
        assert!(state.pending_events().contains(&GameEvent::Pickup));
    }

    #[test]
    fn test_pickup_expires_without_event() {
        let mut state = open_state(5);
        state.pickups.push(Pickup {
            id: 100,
            kind: PickupKind::Ammo,
            pos: state.player.pos + DVec2::new(500.0, 0.0),
            radius: state.config.pickup_radius,
            remaining_ticks: 1,
        });
        state.drain_events();

        tick(&mut state, &idle());
        tick(&mut state, &idle());
        assert!(state.pickups.is_empty());
        assert!(!state.pending_events().contains(&GameEvent::Pickup));
    }

    #[test]
    fn test_inventory_item_use() {
        let mut state = open_state(5);
        state.player.health = 40.0;
        state.player.inventory.add(Item::Health(30.0));
        tick(&mut state, &TickInput { use_item: true, ..idle() });
        assert_eq!(state.player.health, 70.0);
        assert!(state.player.inventory.is_empty());
    }

    #[test]
    fn test_game_over_raised_once_then_frozen() {
        let mut state = open_state(5);
        state.player.health = 1.0;
        state
            .enemies
            .push(Enemy::spawn(&state.config, EnemyKind::Tank, 99, state.player.pos));
        state.drain_events();

        tick(&mut state, &idle());
        assert!(state.game_over);
        let overs = state
            .pending_events()
            .iter()
            .filter(|e| **e == GameEvent::GameOver)
            .count();
        assert_eq!(overs, 1);

        // Further ticks are no-ops
        let ticks = state.time_ticks;
        tick(&mut state, &idle());
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_simulation_is_deterministic() {
        let run = || {
            let mut cfg = Config::default();
            cfg.map.wall_probability = 0.0;
            cfg.spawn.initial_delay_ticks = 30;
            let mut state = GameState::new(cfg, 1234);
            for i in 0..600u64 {
                let input = TickInput {
                    move_x: if i % 120 < 60 { 1.0 } else { -1.0 },
                    move_y: 0.5,
                    aim: state.player.pos + DVec2::new(50.0, 20.0),
                    fire: i % 7 == 0,
                    reload: i % 200 == 0,
                    ..TickInput::default()
                };
                tick(&mut state, &input);
            }
            let enemy_state: Vec<_> = state
                .enemies
                .iter()
                .map(|e| (e.id, e.pos.x, e.pos.y, e.health))
                .collect();
            (
                state.player.pos,
                state.player.health,
                state.player.score,
                enemy_state,
                state.projectiles.len(),
                state.wave.current_wave,
            )
        };
        assert_eq!(run(), run());
    }
}
