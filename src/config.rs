//! Session tunables
//!
//! One `GameConfig` lives for the length of a session. Input, the spawn
//! director and the modifier system mutate it; everything else reads it.
//! A fresh session always starts from a clone of the base config.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors loading a config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Mutable per-session tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    pub wall_width: f32,
    pub wall_height: f32,
    /// Added to ball vertical velocity every frame (negative pulls upward)
    pub gravity: f32,

    // === Cannon ===
    pub cannon_x: f32,
    pub cannon_y: f32,
    pub cannon_length: f32,
    /// Starting barrel angle (degrees)
    pub start_angle: f32,
    pub min_angle: f32,
    pub max_angle: f32,
    /// Degrees per frame while aiming
    pub cannon_angle_speed: f32,
    pub min_power: f32,
    pub max_power: f32,
    /// Power gained per frame while charging
    pub power_increment: f32,
    /// Cooldown between shots (ms)
    pub reload_time: f64,
    /// Balls per volley, each 5 degrees below the previous
    pub cannon_balls: u32,
    /// Identical copies launched per ball
    pub pierce: u32,
    pub ball_radius: f32,

    // === Spawning ===
    /// Current time between attackers (ms), ratchets down every spawn
    pub spawn_interval: f64,
    pub min_spawn_interval: f64,
    pub spawn_decrease_rate: f64,
    /// Temporary multiplier on the spawn interval (special events)
    pub spawn_interval_scale: f64,
    pub initial_base_speed: f32,
    pub max_base_speed: f32,
    /// Base speed gained per ms of game time
    pub base_speed_increase_rate: f32,
    /// Game time (ms) at which every attacker is two columns wide
    pub max_time_for_two_columns: f64,

    // === Modifiers ===
    /// Time between power-up grants (ms, <= 0 disables)
    pub power_up_period: f64,
    /// Time between special events (ms, <= 0 disables)
    pub special_event_period: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            wall_width: WALL_WIDTH,
            wall_height: WALL_HEIGHT,
            gravity: 0.4,

            cannon_x: CANNON_X,
            cannon_y: CANNON_Y,
            cannon_length: CANNON_LENGTH,
            start_angle: 45.0,
            min_angle: -45.0,
            max_angle: 80.0,
            cannon_angle_speed: 2.0,
            min_power: 3.0,
            max_power: 30.0,
            power_increment: 0.3,
            reload_time: 500.0,
            cannon_balls: 1,
            pierce: 1,
            ball_radius: BALL_RADIUS,

            spawn_interval: 3000.0,
            min_spawn_interval: 400.0,
            spawn_decrease_rate: 0.99,
            spawn_interval_scale: 1.0,
            initial_base_speed: 0.5,
            max_base_speed: 5.0,
            base_speed_increase_rate: 0.0001,
            max_time_for_two_columns: 180_000.0,

            power_up_period: 60_000.0,
            special_event_period: 60_000.0,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config.sanitized())
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject values clamping cannot repair
    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("wall_width", self.wall_width),
            ("wall_height", self.wall_height),
            ("gravity", self.gravity),
            ("cannon_x", self.cannon_x),
            ("cannon_y", self.cannon_y),
            ("cannon_length", self.cannon_length),
            ("start_angle", self.start_angle),
            ("min_angle", self.min_angle),
            ("max_angle", self.max_angle),
            ("cannon_angle_speed", self.cannon_angle_speed),
            ("min_power", self.min_power),
            ("max_power", self.max_power),
            ("power_increment", self.power_increment),
            ("ball_radius", self.ball_radius),
            ("initial_base_speed", self.initial_base_speed),
            ("max_base_speed", self.max_base_speed),
            ("base_speed_increase_rate", self.base_speed_increase_rate),
        ];
        if let Some((name, _)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be finite")));
        }

        // Spawn interval and periods may be infinite (never), but not NaN
        let times = [
            ("reload_time", self.reload_time),
            ("spawn_interval", self.spawn_interval),
            ("min_spawn_interval", self.min_spawn_interval),
            ("spawn_decrease_rate", self.spawn_decrease_rate),
            ("spawn_interval_scale", self.spawn_interval_scale),
            ("max_time_for_two_columns", self.max_time_for_two_columns),
            ("power_up_period", self.power_up_period),
            ("special_event_period", self.special_event_period),
        ];
        if let Some((name, _)) = times.iter().find(|(_, v)| v.is_nan()) {
            return Err(ConfigError::Invalid(format!("{name} must be a number")));
        }
        Ok(())
    }

    /// Clamp out-of-range values into a playable config
    pub fn sanitized(mut self) -> Self {
        self.repair_non_finite();

        if self.min_angle > self.max_angle {
            log::warn!(
                "min_angle {} above max_angle {}, swapping",
                self.min_angle,
                self.max_angle
            );
            std::mem::swap(&mut self.min_angle, &mut self.max_angle);
        }
        self.start_angle = self.start_angle.clamp(self.min_angle, self.max_angle);

        self.max_power = self.max_power.max(0.0);
        self.min_power = self.min_power.clamp(0.0, self.max_power);
        self.power_increment = self.power_increment.max(0.0);
        self.cannon_angle_speed = self.cannon_angle_speed.max(0.0);
        self.reload_time = self.reload_time.max(0.0);

        self.cannon_balls = self.cannon_balls.max(1);
        self.pierce = self.pierce.max(1);
        self.ball_radius = self.ball_radius.max(0.0);

        self.arena_width = self.arena_width.max(1.0);
        self.arena_height = self.arena_height.max(1.0);
        self.wall_width = self.wall_width.clamp(0.0, self.arena_width);
        self.wall_height = self.wall_height.clamp(0.0, self.arena_height);

        if !(self.spawn_decrease_rate > 0.0 && self.spawn_decrease_rate <= 1.0) {
            log::warn!(
                "spawn_decrease_rate {} outside (0, 1], using 1.0",
                self.spawn_decrease_rate
            );
            self.spawn_decrease_rate = 1.0;
        }
        self.min_spawn_interval = self.min_spawn_interval.max(0.0);
        self.spawn_interval = self.spawn_interval.max(self.min_spawn_interval);
        if !(self.spawn_interval_scale > 0.0) {
            self.spawn_interval_scale = 1.0;
        }

        self.max_base_speed = self.max_base_speed.max(ATTACKER_MIN_SPEED);
        self.max_time_for_two_columns = self.max_time_for_two_columns.max(f64::MIN_POSITIVE);

        raise_period("power_up_period", &mut self.power_up_period);
        raise_period("special_event_period", &mut self.special_event_period);
        self
    }

    /// Replace values `validate` would reject with their defaults
    fn repair_non_finite(&mut self) {
        let d = Self::default();
        let floats = [
            ("arena_width", &mut self.arena_width, d.arena_width),
            ("arena_height", &mut self.arena_height, d.arena_height),
            ("wall_width", &mut self.wall_width, d.wall_width),
            ("wall_height", &mut self.wall_height, d.wall_height),
            ("gravity", &mut self.gravity, d.gravity),
            ("cannon_x", &mut self.cannon_x, d.cannon_x),
            ("cannon_y", &mut self.cannon_y, d.cannon_y),
            ("cannon_length", &mut self.cannon_length, d.cannon_length),
            ("start_angle", &mut self.start_angle, d.start_angle),
            ("min_angle", &mut self.min_angle, d.min_angle),
            ("max_angle", &mut self.max_angle, d.max_angle),
            ("cannon_angle_speed", &mut self.cannon_angle_speed, d.cannon_angle_speed),
            ("min_power", &mut self.min_power, d.min_power),
            ("max_power", &mut self.max_power, d.max_power),
            ("power_increment", &mut self.power_increment, d.power_increment),
            ("ball_radius", &mut self.ball_radius, d.ball_radius),
            ("initial_base_speed", &mut self.initial_base_speed, d.initial_base_speed),
            ("max_base_speed", &mut self.max_base_speed, d.max_base_speed),
            (
                "base_speed_increase_rate",
                &mut self.base_speed_increase_rate,
                d.base_speed_increase_rate,
            ),
        ];
        for (name, value, default) in floats {
            if !value.is_finite() {
                log::warn!("{} is {}, using {}", name, value, default);
                *value = default;
            }
        }

        let times = [
            ("reload_time", &mut self.reload_time, d.reload_time),
            ("spawn_interval", &mut self.spawn_interval, d.spawn_interval),
            ("min_spawn_interval", &mut self.min_spawn_interval, d.min_spawn_interval),
            ("spawn_decrease_rate", &mut self.spawn_decrease_rate, d.spawn_decrease_rate),
            ("spawn_interval_scale", &mut self.spawn_interval_scale, d.spawn_interval_scale),
            (
                "max_time_for_two_columns",
                &mut self.max_time_for_two_columns,
                d.max_time_for_two_columns,
            ),
            ("power_up_period", &mut self.power_up_period, d.power_up_period),
            ("special_event_period", &mut self.special_event_period, d.special_event_period),
        ];
        for (name, value, default) in times {
            if value.is_nan() {
                log::warn!("{} is NaN, using {}", name, default);
                *value = default;
            }
        }
    }
}

/// Enabled periods shorter than a frame would fire many times per frame
fn raise_period(name: &str, period: &mut f64) {
    if *period > 0.0 && *period < FRAME_MS {
        log::warn!("{} {}ms below one frame, using {}ms", name, period, FRAME_MS);
        *period = FRAME_MS;
    }
}
