//! Per-frame simulation update
//!
//! One `tick` call advances the whole field by `dt` seconds and runs to
//! completion: timers, motion, every collision pair, level progression and
//! the win/lose transitions. Entity removal is mark-and-compact; nothing is
//! erased while a scan is still iterating.

use crate::consts::ROTATION_SPEED;
use crate::sim::state::{Asteroid, GamePhase, GameState, kill_award};
use crate::sim::torus::torus_distance;

/// The drawn ship triangle is larger than what feels fair to get hit by,
/// so player collision checks shrink the radius by this factor.
const PLAYER_HITBOX_FACTOR: f32 = 0.6;

/// Held-key state for one player during one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub thrust: bool,
    pub fire: bool,
}

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub players: [PlayerInput; 2],
    /// Pause toggle (edge, not level)
    pub pause: bool,
}

/// Advance the simulation by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.elapsed += dt;

    let rules = state.rules.clone();

    // Players: timers, steering, shooting, drift, projectile flight.
    // Each player is independent of the others here.
    for (idx, player) in state.players.iter_mut().enumerate() {
        if !player.is_alive() {
            continue;
        }
        player.update_timers(dt);

        let keys = input.players[idx];
        if keys.left {
            player.rotate(-ROTATION_SPEED * dt);
        }
        if keys.right {
            player.rotate(ROTATION_SPEED * dt);
        }
        if keys.thrust {
            player.accelerate(dt);
        }
        if keys.fire && player.can_shoot() {
            player.shoot(&rules);
        }

        player.advance(dt);
        for proj in &mut player.projectiles {
            proj.body.advance(dt);
        }
        player.projectiles.retain_mut(|proj| !proj.age(dt));
    }

    for asteroid in &mut state.asteroids {
        asteroid.body.advance(dt);
    }

    // Player vs asteroid. Several asteroids may overlap one ship in the same
    // frame; `hit` is idempotent inside the invincibility window.
    for a_idx in 0..state.asteroids.len() {
        let (a_pos, a_radius) = {
            let a = &state.asteroids[a_idx].body;
            (a.pos, a.radius)
        };
        for player in &mut state.players {
            if !player.is_alive() {
                continue;
            }
            if torus_distance(a_pos, player.pos)
                <= a_radius + player.radius * PLAYER_HITBOX_FACTOR
            {
                player.hit(&rules);
            }
        }
    }

    // Player vs its own projectile (rule is configurable; inconsistent in
    // the original's revisions)
    if rules.self_hit {
        for player in &mut state.players {
            if !player.is_alive() {
                continue;
            }
            let overlap = player.projectiles.iter().position(|proj| {
                torus_distance(proj.body.pos, player.pos)
                    <= proj.body.radius + player.radius * PLAYER_HITBOX_FACTOR
            });
            if let Some(p_idx) = overlap {
                player.projectiles.remove(p_idx);
                player.hit(&rules);
            }
        }
    }

    // Projectile vs asteroid: insertion order across players then shots,
    // one kill per projectile per frame, children deferred to a queue.
    let level = state.level;
    let asteroids = &state.asteroids;
    let mut dead = vec![false; asteroids.len()];
    let mut children: Vec<Asteroid> = Vec::new();

    for player in &mut state.players {
        let mut surviving = Vec::with_capacity(player.projectiles.len());
        for proj in player.projectiles.drain(..) {
            let mut consumed = false;
            for (a_idx, asteroid) in asteroids.iter().enumerate() {
                if dead[a_idx] {
                    continue;
                }
                let reach = asteroid.body.radius + proj.body.radius;
                if torus_distance(proj.body.pos, asteroid.body.pos) <= reach {
                    dead[a_idx] = true;
                    player.score +=
                        kill_award(asteroid.size_class, asteroid.speed_class, level);
                    if asteroid.size_class.smaller().is_some() {
                        children.push(Asteroid::split_child(asteroid, false));
                        children.push(Asteroid::split_child(asteroid, true));
                    }
                    consumed = true;
                    break;
                }
            }
            if !consumed {
                surviving.push(proj);
            }
        }
        player.projectiles = surviving;
    }

    let mut keep = dead.iter().map(|d| !d);
    state.asteroids.retain(|_| keep.next().unwrap_or(true));
    state.asteroids.extend(children);

    if state.asteroids.is_empty() {
        if state.last_level() {
            state.finish_win();
        } else {
            state.next_level();
        }
        return;
    }

    if state.all_players_out() {
        state.finish_lose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Rules;
    use crate::sim::state::{Body, GameMode, Projectile, SizeClass, SpeedClass};
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn started(mode: GameMode) -> GameState {
        let mut state = GameState::new(Rules::default(), 42);
        state.start_game(mode);
        state
    }

    /// An asteroid parked at a known spot, not drawn from the RNG
    fn asteroid_at(pos: Vec2, speed_class: SpeedClass, size_class: SizeClass) -> Asteroid {
        Asteroid {
            body: Body {
                pos,
                heading: 0.0,
                speed: 0.0,
                radius: size_class.radius(),
            },
            speed_class,
            size_class,
        }
    }

    #[test]
    fn test_pause_toggle() {
        let mut state = started(GameMode::Single);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Paused);

        // Paused frames freeze the clock
        let before = state.elapsed;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.elapsed, before);

        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_destroying_a_big_asteroid_splits_and_scores() {
        let mut state = started(GameMode::Single);
        let target_pos = Vec2::new(100.0, 100.0);
        state.asteroids = vec![asteroid_at(target_pos, SpeedClass::Slow, SizeClass::Big)];

        // A shot already overlapping the target
        let player = &mut state.players[0];
        player.projectiles.push(Projectile {
            body: Body {
                pos: target_pos,
                heading: 0.0,
                speed: 0.0,
                radius: PROJECTILE_RADIUS,
            },
            ttl: PROJECTILE_LIFETIME,
        });

        tick(&mut state, &TickInput::default(), DT);

        // One destroyed, two Normal children at the parent's position: net +1
        assert_eq!(state.asteroids.len(), 2);
        assert!(state
            .asteroids
            .iter()
            .all(|a| a.size_class == SizeClass::Normal && a.speed_class == SpeedClass::Slow));
        assert!(state
            .asteroids
            .iter()
            .all(|a| a.body.pos == target_pos));
        assert_eq!(
            state.players[0].score,
            kill_award(SizeClass::Big, SpeedClass::Slow, 0)
        );
        assert!(state.players[0].projectiles.is_empty());
    }

    #[test]
    fn test_small_asteroid_leaves_no_children() {
        let mut state = started(GameMode::Single);
        let target_pos = Vec2::new(100.0, 100.0);
        state.asteroids = vec![
            asteroid_at(target_pos, SpeedClass::Fast, SizeClass::Small),
            asteroid_at(Vec2::new(600.0, 600.0), SpeedClass::Slow, SizeClass::Big),
        ];
        state.players[0].projectiles.push(Projectile {
            body: Body {
                pos: target_pos,
                heading: 0.0,
                speed: 0.0,
                radius: PROJECTILE_RADIUS,
            },
            ttl: PROJECTILE_LIFETIME,
        });

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.asteroids.len(), 1);
        assert_eq!(state.asteroids[0].size_class, SizeClass::Big);
    }

    #[test]
    fn test_one_kill_per_projectile_per_frame() {
        let mut state = started(GameMode::Single);
        let spot = Vec2::new(100.0, 100.0);
        // Two stacked asteroids, one shot: only the first scanned dies
        state.asteroids = vec![
            asteroid_at(spot, SpeedClass::Slow, SizeClass::Small),
            asteroid_at(spot, SpeedClass::Slow, SizeClass::Small),
        ];
        state.players[0].projectiles.push(Projectile {
            body: Body {
                pos: spot,
                heading: 0.0,
                speed: 0.0,
                radius: PROJECTILE_RADIUS,
            },
            ttl: PROJECTILE_LIFETIME,
        });

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.asteroids.len(), 1);
        assert_eq!(
            state.players[0].score,
            kill_award(SizeClass::Small, SpeedClass::Slow, 0)
        );
    }

    #[test]
    fn test_invincibility_gates_life_loss() {
        let mut state = started(GameMode::Single);
        let spawn = state.players[0].spawn_point;
        state.asteroids = vec![asteroid_at(spawn, SpeedClass::Slow, SizeClass::Big)];
        state.players[0].invincible = 0.0;

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.players[0].lives, START_LIVES - 1);

        // The asteroid still sits on the spawn point, but the grace window
        // is running: colliding twice costs exactly one life
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.players[0].lives, START_LIVES - 1);
    }

    #[test]
    fn test_self_hit_rule_is_configurable() {
        for (enabled, expected_lives) in [(true, START_LIVES - 1), (false, START_LIVES)] {
            let mut rules = Rules::default();
            rules.self_hit = enabled;
            let mut state = GameState::new(rules, 42);
            state.start_game(GameMode::Single);
            state.players[0].invincible = 0.0;
            let pos = state.players[0].pos;
            state.players[0].projectiles.push(Projectile {
                body: Body {
                    pos,
                    heading: 0.0,
                    speed: 0.0,
                    radius: PROJECTILE_RADIUS,
                },
                ttl: PROJECTILE_LIFETIME,
            });

            tick(&mut state, &TickInput::default(), DT);
            assert_eq!(state.players[0].lives, expected_lives);
        }
    }

    #[test]
    fn test_score_never_decreases() {
        let mut state = started(GameMode::Single);
        let fire_all = TickInput {
            players: [
                PlayerInput {
                    thrust: true,
                    fire: true,
                    right: true,
                    ..Default::default()
                },
                PlayerInput::default(),
            ],
            pause: false,
        };
        let mut last = 0;
        for _ in 0..600 {
            tick(&mut state, &fire_all, DT);
            let score = state.players[0].score;
            assert!(score >= last);
            last = score;
            if state.phase != GamePhase::Playing {
                break;
            }
        }
    }

    #[test]
    fn test_clearing_a_level_advances_and_resets_ships() {
        let mut state = started(GameMode::Single);
        state.players[0].score = 77;
        state.players[0].lives = 2;
        state.players[0].pos = Vec2::new(1.0, 1.0);
        state.asteroids.clear();

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.level, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        // Level 1 composition is {3, 2, 1} Big asteroids
        assert_eq!(state.asteroids.len(), 6);
        // Kinematics reset, lives and score preserved
        assert_eq!(state.players[0].pos, state.players[0].spawn_point);
        assert_eq!(state.players[0].score, 77);
        assert_eq!(state.players[0].lives, 2);
    }

    #[test]
    fn test_clearing_the_last_level_wins() {
        let mut rules = Rules::default();
        rules.level_table = vec![[1, 0, 0]];
        let mut state = GameState::new(rules, 42);
        state.start_game(GameMode::Single);
        state.players[0].score = 10;
        state.asteroids.clear();

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::GameWin);
        // Score plus full-lives and time bonuses banked once
        assert!(state.final_score > 10);
        assert_eq!(state.high_score, state.final_score);
    }

    #[test]
    fn test_last_life_lost_ends_the_round() {
        let mut state = started(GameMode::Single);
        state.players[0].lives = 1;
        state.players[0].invincible = 0.0;
        state.players[0].score = 9;
        let spawn = state.players[0].spawn_point;
        state.asteroids = vec![asteroid_at(spawn, SpeedClass::Slow, SizeClass::Big)];

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.players[0].lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.final_score, 9);
        assert_eq!(state.high_score, 9);
        assert!(state.asteroids.is_empty());
    }

    #[test]
    fn test_duo_pools_scores_on_game_over() {
        let mut state = started(GameMode::Duo);
        state.players[0].score = 30;
        state.players[1].score = 12;
        for player in &mut state.players {
            player.lives = 1;
            player.invincible = 0.0;
        }
        let spawns: Vec<Vec2> = state.players.iter().map(|p| p.spawn_point).collect();
        state.asteroids = spawns
            .into_iter()
            .map(|s| asteroid_at(s, SpeedClass::Slow, SizeClass::Big))
            .collect();

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.final_score, 42);
    }

    #[test]
    fn test_projectiles_expire() {
        let mut state = started(GameMode::Single);
        state.players[0].cooldown = 0.0;
        let fire = TickInput {
            players: [
                PlayerInput {
                    fire: true,
                    ..Default::default()
                },
                PlayerInput::default(),
            ],
            pause: false,
        };
        tick(&mut state, &fire, DT);
        assert_eq!(state.players[0].projectiles.len(), 1);

        // Outlive the TTL without firing again
        for _ in 0..((PROJECTILE_LIFETIME / DT) as usize + 2) {
            tick(&mut state, &TickInput::default(), DT);
            if state.phase != GamePhase::Playing {
                return;
            }
        }
        assert!(state.players[0].projectiles.is_empty());
    }
}
