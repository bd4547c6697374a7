//! Attacker spawning and the difficulty ramp
//!
//! Attackers arrive on a shrinking interval, get faster with game time, and
//! are increasingly likely to be two columns wide.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Attacker;
use crate::config::GameConfig;
use crate::consts::ATTACKER_MIN_SPEED;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnDirector {
    /// Session time of the last spawn (ms)
    pub last_spawn: f64,
}

impl SpawnDirector {
    pub fn new(now: f64) -> Self {
        Self { last_spawn: now }
    }

    /// Base speed for the current game time
    pub fn base_speed(config: &GameConfig, game_time: f64) -> f32 {
        (config.initial_base_speed + game_time as f32 * config.base_speed_increase_rate)
            .min(config.max_base_speed)
    }

    /// Chance that the next attacker is two columns wide
    pub fn two_column_chance(config: &GameConfig, game_time: f64) -> f64 {
        (game_time / config.max_time_for_two_columns).clamp(0.0, 1.0)
    }

    /// Spawn an attacker if the interval has elapsed.
    ///
    /// Every spawn ratchets `config.spawn_interval` down toward the minimum.
    pub fn maybe_spawn<R: Rng>(
        &mut self,
        now: f64,
        config: &mut GameConfig,
        game_time: f64,
        rng: &mut R,
        next_id: impl FnOnce() -> u32,
    ) -> Option<Attacker> {
        if now - self.last_spawn < config.spawn_interval * config.spawn_interval_scale {
            return None;
        }

        let base_speed = Self::base_speed(config, game_time);
        let columns = if rng.random::<f64>() < Self::two_column_chance(config, game_time) {
            2
        } else {
            1
        };
        let height = config.wall_height * (rng.random::<f32>() * 2.5 + 0.5);
        let jitter = rng.random::<f32>() * 2.0 - 1.0;
        let speed = (base_speed + jitter)
            .min(config.max_base_speed)
            .max(ATTACKER_MIN_SPEED);

        config.spawn_interval =
            (config.spawn_interval * config.spawn_decrease_rate).max(config.min_spawn_interval);
        self.last_spawn = now;

        let id = next_id();
        log::debug!(
            "Spawned attacker {} ({} col, h={:.0}, v={:.2}), next in {:.0}ms",
            id,
            columns,
            height,
            speed,
            config.spawn_interval
        );

        Some(Attacker::new(
            id,
            config.arena_width,
            speed,
            columns,
            height,
            config.arena_height,
        ))
    }
}
