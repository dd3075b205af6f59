//! Game rules and balance
//!
//! Constants the original revisions disagreed on (self-damage, bonuses,
//! level composition) live here as data rather than as hardcoded contract.
//! A rules file is optional; absence falls back to defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable gameplay rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Whether a player's own projectile can damage its firer
    pub self_hit: bool,
    /// Lives at round start
    pub lives: u32,
    /// Minimum seconds between a player's consecutive shots
    pub shoot_cooldown: f32,
    /// Seconds of collision grace after a respawn
    pub invincible_time: f32,
    /// Win bonus per remaining life, same constant for every player
    pub life_bonus: u64,
    /// Finish under this many seconds to earn a time bonus
    pub time_budget_secs: u32,
    /// Time bonus per second under the budget
    pub bonus_per_second: u64,
    /// Per-level counts of Big asteroids, indexed [slow, medium, fast]
    pub level_table: Vec<[u32; 3]>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            self_hit: true,
            lives: START_LIVES,
            shoot_cooldown: SHOOT_COOLDOWN,
            invincible_time: INVINCIBLE_TIME,
            life_bonus: LIFE_BONUS,
            time_budget_secs: TIME_BUDGET_SECS,
            bonus_per_second: BONUS_PER_SECOND,
            level_table: vec![[5, 1, 0], [3, 2, 1], [1, 3, 2], [1, 1, 4]],
        }
    }
}

impl Rules {
    /// Load rules from a JSON file, falling back to defaults when the file
    /// is missing or malformed
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(rules) => {
                    log::info!("loaded rules from {}", path.display());
                    rules
                }
                Err(err) => {
                    log::warn!("ignoring malformed rules file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no rules file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }
}
