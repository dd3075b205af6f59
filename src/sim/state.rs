//! Game state and core simulation types
//!
//! Everything the per-frame update mutates lives here. The simulation is
//! strictly single-threaded: the manager owns players and asteroids, each
//! player owns its projectiles, and asteroid splits are value copies.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_6, TAU};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::torus::{torus_distance, wrap_position};
use crate::consts::*;
use crate::settings::Rules;
use crate::{heading_vec, normalize_angle};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for mode selection
    MainMenu,
    /// Active gameplay
    Playing,
    /// Gameplay frozen, field still drawn
    Paused,
    /// All lives spent
    GameOver,
    /// Last level cleared
    GameWin,
}

/// One or two local players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Single,
    Duo,
}

impl GameMode {
    pub fn player_count(&self) -> usize {
        match self {
            GameMode::Single => 1,
            GameMode::Duo => 2,
        }
    }

    /// Fixed respawn point for a player slot. In duo mode the arrow-key
    /// player holds the right half, the letter-key player the left.
    pub fn spawn_point(&self, index: usize) -> Vec2 {
        match (self, index) {
            (GameMode::Single, _) => Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0),
            (GameMode::Duo, 0) => Vec2::new(2.0 * FIELD_WIDTH / 3.0, FIELD_HEIGHT / 2.0),
            (GameMode::Duo, _) => Vec2::new(FIELD_WIDTH / 3.0, FIELD_HEIGHT / 2.0),
        }
    }
}

/// Asteroid speed category; fixes base scalar speed and display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedClass {
    Slow,
    Medium,
    Fast,
}

impl SpeedClass {
    pub const ALL: [SpeedClass; 3] = [SpeedClass::Slow, SpeedClass::Medium, SpeedClass::Fast];

    pub fn base_speed(&self) -> f32 {
        match self {
            SpeedClass::Slow => 40.0,
            SpeedClass::Medium => 60.0,
            SpeedClass::Fast => 100.0,
        }
    }

    pub fn index(&self) -> u32 {
        match self {
            SpeedClass::Slow => 0,
            SpeedClass::Medium => 1,
            SpeedClass::Fast => 2,
        }
    }
}

/// Asteroid size category; fixes radius and split eligibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeClass {
    Small,
    Normal,
    Big,
}

impl SizeClass {
    pub fn radius(&self) -> f32 {
        match self {
            SizeClass::Small => 20.0,
            SizeClass::Normal => 27.0,
            SizeClass::Big => 35.0,
        }
    }

    pub fn index(&self) -> u32 {
        match self {
            SizeClass::Small => 0,
            SizeClass::Normal => 1,
            SizeClass::Big => 2,
        }
    }

    /// Size one step down; Small cannot split further
    pub fn smaller(&self) -> Option<SizeClass> {
        match self {
            SizeClass::Small => None,
            SizeClass::Normal => Some(SizeClass::Small),
            SizeClass::Big => Some(SizeClass::Normal),
        }
    }
}

/// Shared kinematic state for scalar-speed entities
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    /// Heading in radians, normalized to [0, 2π)
    pub heading: f32,
    pub speed: f32,
    pub radius: f32,
}

impl Body {
    /// Integrate motion with wrap-around at both field edges
    pub fn advance(&mut self, dt: f32) {
        self.pos = wrap_position(self.pos + heading_vec(self.heading) * self.speed * dt);
    }

    pub fn rotate(&mut self, delta: f32) {
        self.heading = normalize_angle(self.heading + delta);
    }
}

/// A short-lived shot owned by the player that fired it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Body,
    /// Remaining lifetime in seconds; removed at zero
    pub ttl: f32,
}

impl Projectile {
    /// Spawn just off the firer's nose, inheriting its velocity
    pub fn fired_by(player: &Player) -> Self {
        let muzzle = player.pos
            + heading_vec(player.heading) * (player.radius + PROJECTILE_RADIUS);
        let vel = player.vel + heading_vec(player.heading) * PROJECTILE_SPEED;
        Self {
            body: Body {
                pos: wrap_position(muzzle),
                heading: normalize_angle(vel.y.atan2(vel.x)),
                speed: vel.length(),
                radius: PROJECTILE_RADIUS,
            },
            ttl: PROJECTILE_LIFETIME,
        }
    }

    /// Count down the lifetime; returns true once expired
    pub fn age(&mut self, dt: f32) -> bool {
        self.ttl = (self.ttl - dt).max(0.0);
        self.ttl <= 0.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub body: Body,
    pub speed_class: SpeedClass,
    pub size_class: SizeClass,
}

impl Asteroid {
    /// Fresh "seed" asteroid: random heading, random position outside the
    /// no-spawn radius around every player spawn point
    pub fn seed(
        speed_class: SpeedClass,
        size_class: SizeClass,
        spawn_points: &[Vec2],
        rng: &mut Pcg32,
    ) -> Self {
        let heading = rng.random_range(0.0..TAU);
        let mut pos = Vec2::ZERO;
        for _ in 0..1024 {
            pos = Vec2::new(
                rng.random_range(0.0..FIELD_WIDTH),
                rng.random_range(0.0..FIELD_HEIGHT),
            );
            if spawn_points
                .iter()
                .all(|&sp| torus_distance(pos, sp) >= NO_SPAWN_RADIUS)
            {
                break;
            }
        }
        Self {
            body: Body {
                pos,
                heading,
                speed: speed_class.base_speed(),
                radius: size_class.radius(),
            },
            speed_class,
            size_class,
        }
    }

    /// One of the two children of a destroyed non-Small asteroid.
    ///
    /// Children keep the parent's speed class and position, drop one size
    /// step, scale speed by 2/√3 and veer ±π/6 off the parent's heading.
    pub fn split_child(parent: &Asteroid, side: bool) -> Self {
        let size_class = parent
            .size_class
            .smaller()
            .expect("splitting a Small asteroid is a spawn/scoring bug");
        let veer = if side { FRAC_PI_6 } else { -FRAC_PI_6 };
        Self {
            body: Body {
                pos: parent.body.pos,
                heading: normalize_angle(parent.body.heading + veer),
                speed: parent.body.speed * 2.0 / 3.0f32.sqrt(),
                radius: size_class.radius(),
            },
            speed_class: parent.speed_class,
            size_class,
        }
    }
}

/// A player ship.
///
/// Velocity is stored as x/y components rather than speed+heading because
/// thrust accumulates directionally while the ship rotates freely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub heading: f32,
    pub vel: Vec2,
    pub radius: f32,
    pub lives: u32,
    pub score: u64,
    /// Seconds until the next shot is allowed
    pub cooldown: f32,
    /// Seconds of post-respawn collision grace remaining
    pub invincible: f32,
    pub spawn_point: Vec2,
    pub projectiles: Vec<Projectile>,
}

impl Player {
    pub fn spawn(mode: GameMode, index: usize, rules: &Rules) -> Self {
        let spawn_point = mode.spawn_point(index);
        Self {
            pos: spawn_point,
            heading: normalize_angle(-FRAC_PI_2),
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            lives: rules.lives,
            score: 0,
            cooldown: 0.0,
            invincible: rules.invincible_time,
            spawn_point,
            projectiles: Vec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    /// Integrate drift motion with wrap-around
    pub fn advance(&mut self, dt: f32) {
        self.pos = wrap_position(self.pos + self.vel * dt);
    }

    pub fn rotate(&mut self, delta: f32) {
        self.heading = normalize_angle(self.heading + delta);
    }

    /// Thrust along the current heading, clamped to MAX_SPEED.
    ///
    /// The candidate velocity is rescaled to exactly MAX_SPEED when it would
    /// exceed it, so repeated thrust approaches the ceiling asymptotically
    /// without ever crossing it.
    pub fn accelerate(&mut self, dt: f32) {
        let candidate = self.vel + heading_vec(self.heading) * ACCELERATION * dt;
        let magnitude = candidate.length();
        if magnitude > MAX_SPEED {
            self.vel = candidate * (MAX_SPEED / magnitude);
        } else {
            self.vel = candidate;
        }
    }

    pub fn can_shoot(&self) -> bool {
        self.cooldown <= 0.0
    }

    /// Fire a projectile and start the cooldown. Caller checks `can_shoot`.
    pub fn shoot(&mut self, rules: &Rules) {
        self.projectiles.push(Projectile::fired_by(self));
        self.cooldown = rules.shoot_cooldown;
    }

    /// Resolve a collision against this ship.
    ///
    /// Loses a life only when the invincibility window has lapsed; always
    /// resets kinematics to spawn defaults, restarts the window and clears
    /// the ship's live projectiles. Safe to call repeatedly within a frame.
    pub fn hit(&mut self, rules: &Rules) {
        if self.invincible <= 0.0 && self.lives > 0 {
            self.lives -= 1;
        }
        self.invincible = rules.invincible_time;
        self.reset_kinematics();
    }

    /// Back to the spawn point, at rest, with no projectiles in flight
    pub fn reset_kinematics(&mut self) {
        self.pos = self.spawn_point;
        self.vel = Vec2::ZERO;
        self.heading = normalize_angle(-FRAC_PI_2);
        self.projectiles.clear();
    }

    /// Count both timers down toward zero, never below
    pub fn update_timers(&mut self, dt: f32) {
        self.cooldown = (self.cooldown - dt).max(0.0);
        self.invincible = (self.invincible - dt).max(0.0);
    }
}

/// Points awarded for destroying an asteroid.
///
/// Smaller sizes and faster classes are worth strictly more, scaled by the
/// one-based level number.
pub fn kill_award(size: SizeClass, speed: SpeedClass, level: usize) -> u64 {
    let base = (3 - size.index()) as u64;
    let class_mult = 10u64.pow(speed.index());
    base * class_mult * (level as u64 + 1)
}

/// The whole simulation: players, asteroids, level progression, timers
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub mode: GameMode,
    pub rules: Rules,
    /// Zero-based level index into the composition table
    pub level: usize,
    pub players: Vec<Player>,
    pub asteroids: Vec<Asteroid>,
    /// Seconds of play since the round started
    pub elapsed: f32,
    /// Combined score of the finished round (win or lose)
    pub final_score: u64,
    /// Best combined round score this session
    pub high_score: u64,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
}

impl GameState {
    /// Fresh session at the main menu
    pub fn new(rules: Rules, seed: u64) -> Self {
        Self {
            phase: GamePhase::MainMenu,
            mode: GameMode::Single,
            rules,
            level: 0,
            players: Vec::new(),
            asteroids: Vec::new(),
            elapsed: 0.0,
            final_score: 0,
            high_score: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Begin a round in the given mode; the session high score survives
    pub fn start_game(&mut self, mode: GameMode) {
        self.mode = mode;
        self.level = 0;
        self.elapsed = 0.0;
        self.final_score = 0;
        self.players = (0..mode.player_count())
            .map(|i| Player::spawn(mode, i, &self.rules))
            .collect();
        self.asteroids.clear();
        self.spawn_level_asteroids();
        self.phase = GamePhase::Playing;
        log::info!("round started: {:?}, level 1", mode);
    }

    /// Populate the field from the level composition table
    pub fn spawn_level_asteroids(&mut self) {
        let counts = *self
            .rules
            .level_table
            .get(self.level)
            .expect("level index outside the composition table");
        let spawn_points: Vec<Vec2> = self.players.iter().map(|p| p.spawn_point).collect();
        for (class_idx, &count) in counts.iter().enumerate() {
            let speed_class = SpeedClass::ALL[class_idx];
            for _ in 0..count {
                self.asteroids.push(Asteroid::seed(
                    speed_class,
                    SizeClass::Big,
                    &spawn_points,
                    &mut self.rng,
                ));
            }
        }
    }

    pub fn last_level(&self) -> bool {
        self.level + 1 >= self.rules.level_table.len()
    }

    /// Advance to the next level: players re-centered with projectiles and
    /// cooldowns cleared, lives and scores untouched
    pub fn next_level(&mut self) {
        assert!(self.asteroids.is_empty(), "level advanced with asteroids left");
        self.level += 1;
        for player in &mut self.players {
            player.reset_kinematics();
            player.cooldown = 0.0;
            player.invincible = self.rules.invincible_time;
        }
        self.spawn_level_asteroids();
        log::info!("level {} started", self.level + 1);
    }

    /// True when no player has lives remaining
    pub fn all_players_out(&self) -> bool {
        self.players.iter().all(|p| !p.is_alive())
    }

    /// Clear the field, bank every player's score plus win bonuses, update
    /// the high score and end the round in the win state
    pub fn finish_win(&mut self) {
        let mut total: u64 = self
            .players
            .iter()
            .map(|p| p.score + self.rules.life_bonus * p.lives as u64)
            .sum();
        let elapsed_secs = self.elapsed as u64;
        if elapsed_secs < self.rules.time_budget_secs as u64 {
            total += (self.rules.time_budget_secs as u64 - elapsed_secs)
                * self.rules.bonus_per_second;
        }
        self.end_round(total, GamePhase::GameWin);
    }

    /// Clear the field, bank the scores and end the round in the lose state
    pub fn finish_lose(&mut self) {
        let total = self.players.iter().map(|p| p.score).sum();
        self.end_round(total, GamePhase::GameOver);
    }

    fn end_round(&mut self, total: u64, phase: GamePhase) {
        self.asteroids.clear();
        for player in &mut self.players {
            player.projectiles.clear();
        }
        self.final_score = total;
        if total > self.high_score {
            self.high_score = total;
        }
        self.phase = phase;
        log::info!("round over: {:?}, score {}, best {}", phase, total, self.high_score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn test_state(mode: GameMode) -> GameState {
        let mut state = GameState::new(Rules::default(), 7);
        state.start_game(mode);
        state
    }

    #[test]
    fn test_accelerate_clamps_at_max_speed() {
        let rules = Rules::default();
        let mut player = Player::spawn(GameMode::Single, 0, &rules);
        player.heading = 0.0;
        for _ in 0..1000 {
            player.accelerate(1.0 / 60.0);
            assert!(player.vel.length() <= MAX_SPEED + 1e-3);
        }
        // Asymptotically pinned to the ceiling
        assert!((player.vel.length() - MAX_SPEED).abs() < 1e-2);
        assert!(player.vel.x > 0.0 && player.vel.y.abs() < 1e-3);
    }

    #[test]
    fn test_player_wraps_across_right_edge() {
        let rules = Rules::default();
        let mut player = Player::spawn(GameMode::Single, 0, &rules);
        player.pos = Vec2::new(FIELD_WIDTH - 1.0, 50.0);
        player.vel = Vec2::new(10.0, 0.0);
        player.advance(1.0);
        assert!((player.pos.x - 9.0).abs() < 1e-3);
        assert!((player.pos.y - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_hit_consumes_one_life_per_window() {
        let rules = Rules::default();
        let mut player = Player::spawn(GameMode::Single, 0, &rules);
        player.invincible = 0.0;
        player.hit(&rules);
        assert_eq!(player.lives, START_LIVES - 1);
        assert_eq!(player.invincible, rules.invincible_time);
        // Second collision inside the window: state reset, no life lost
        player.hit(&rules);
        assert_eq!(player.lives, START_LIVES - 1);
    }

    #[test]
    fn test_hit_resets_kinematics_and_projectiles() {
        let rules = Rules::default();
        let mut player = Player::spawn(GameMode::Single, 0, &rules);
        player.shoot(&rules);
        player.pos = Vec2::new(3.0, 3.0);
        player.vel = Vec2::new(50.0, 0.0);
        player.hit(&rules);
        assert_eq!(player.pos, player.spawn_point);
        assert_eq!(player.vel, Vec2::ZERO);
        assert!(player.projectiles.is_empty());
    }

    #[test]
    fn test_projectile_spawns_off_the_nose() {
        let rules = Rules::default();
        let mut player = Player::spawn(GameMode::Single, 0, &rules);
        player.heading = 0.0;
        player.vel = Vec2::new(30.0, 0.0);
        let proj = Projectile::fired_by(&player);
        let expected_x = player.pos.x + PLAYER_RADIUS + PROJECTILE_RADIUS;
        assert!((proj.body.pos.x - expected_x).abs() < 1e-3);
        // Firer's velocity adds to the muzzle speed
        assert!((proj.body.speed - (PROJECTILE_SPEED + 30.0)).abs() < 1e-3);
        assert!(proj.body.heading.abs() < 1e-4);
    }

    #[test]
    fn test_split_child_geometry() {
        let mut rng = Pcg32::seed_from_u64(1);
        let parent = Asteroid::seed(SpeedClass::Slow, SizeClass::Big, &[], &mut rng);
        let left = Asteroid::split_child(&parent, false);
        let right = Asteroid::split_child(&parent, true);

        assert_eq!(left.size_class, SizeClass::Normal);
        assert_eq!(right.size_class, SizeClass::Normal);
        assert_eq!(left.speed_class, SpeedClass::Slow);
        assert_eq!(left.body.pos, parent.body.pos);
        assert_eq!(right.body.pos, parent.body.pos);

        let expected_speed = parent.body.speed * 2.0 / 3.0f32.sqrt();
        assert!((left.body.speed - expected_speed).abs() < 1e-3);

        // Headings straddle the parent's by π/6 each, π/3 total
        let spread = normalize_angle(right.body.heading - left.body.heading);
        assert!((spread - PI / 3.0).abs() < 1e-4);
    }

    #[test]
    #[should_panic(expected = "Small")]
    fn test_split_small_asserts() {
        let mut rng = Pcg32::seed_from_u64(1);
        let small = Asteroid::seed(SpeedClass::Fast, SizeClass::Small, &[], &mut rng);
        let _ = Asteroid::split_child(&small, true);
    }

    #[test]
    fn test_seed_asteroids_respect_no_spawn_radius() {
        let state = test_state(GameMode::Duo);
        for asteroid in &state.asteroids {
            for player in &state.players {
                assert!(
                    torus_distance(asteroid.body.pos, player.spawn_point) >= NO_SPAWN_RADIUS
                );
            }
        }
    }

    #[test]
    fn test_level_table_population() {
        let state = test_state(GameMode::Single);
        // Level 0 composition is {5 slow, 1 medium, 0 fast}, all Big
        assert_eq!(state.asteroids.len(), 6);
        assert!(state.asteroids.iter().all(|a| a.size_class == SizeClass::Big));
        let slow = state
            .asteroids
            .iter()
            .filter(|a| a.speed_class == SpeedClass::Slow)
            .count();
        assert_eq!(slow, 5);
    }

    #[test]
    fn test_kill_award_ordering() {
        // Smaller sizes are worth strictly more
        assert!(
            kill_award(SizeClass::Small, SpeedClass::Slow, 0)
                > kill_award(SizeClass::Normal, SpeedClass::Slow, 0)
        );
        // Faster classes are worth strictly more
        assert!(
            kill_award(SizeClass::Big, SpeedClass::Fast, 0)
                > kill_award(SizeClass::Big, SpeedClass::Medium, 0)
        );
        // Level scales linearly
        assert_eq!(
            kill_award(SizeClass::Big, SpeedClass::Slow, 3),
            4 * kill_award(SizeClass::Big, SpeedClass::Slow, 0)
        );
    }

    #[test]
    fn test_win_banks_bonuses_once() {
        let mut state = test_state(GameMode::Duo);
        state.players[0].score = 100;
        state.players[1].score = 50;
        state.players[0].lives = 2;
        state.players[1].lives = 1;
        state.elapsed = 998.0;
        state.finish_win();

        let rules = Rules::default();
        let lives_bonus = rules.life_bonus * 3;
        let time_bonus = 2 * rules.bonus_per_second;
        assert_eq!(state.final_score, 150 + lives_bonus + time_bonus);
        assert_eq!(state.phase, GamePhase::GameWin);
        assert_eq!(state.high_score, state.final_score);
        assert!(state.asteroids.is_empty());
    }

    #[test]
    fn test_lose_keeps_previous_high_score() {
        let mut state = test_state(GameMode::Single);
        state.high_score = 10_000;
        state.players[0].score = 42;
        state.finish_lose();
        assert_eq!(state.final_score, 42);
        assert_eq!(state.high_score, 10_000);
        assert_eq!(state.phase, GamePhase::GameOver);
    }
}
