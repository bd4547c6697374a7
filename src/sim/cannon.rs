//! Cannon aiming and charge-and-release firing

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::CannonBall;
use crate::config::GameConfig;
use crate::consts::VOLLEY_SPREAD_DEG;
use crate::launch_vector;

/// Firing state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireState {
    Idle,
    /// Fire held, power building
    Charging,
}

/// The player's cannon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cannon {
    /// Pivot point
    pub pos: Vec2,
    pub length: f32,
    /// Barrel angle (degrees, counter-clockwise from +x)
    pub angle: f32,
    /// Accumulated charge
    pub power: f32,
    pub state: FireState,
    /// Session time of the last shot (ms)
    pub last_shot: Option<f64>,
}

impl Cannon {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pos: Vec2::new(config.cannon_x, config.cannon_y),
            length: config.cannon_length,
            angle: config.start_angle.clamp(config.min_angle, config.max_angle),
            power: 0.0,
            state: FireState::Idle,
            last_shot: None,
        }
    }

    /// Rotate while aim controls are held, clamped to the configured bounds
    pub fn aim(&mut self, up: bool, down: bool, steps: f32, config: &GameConfig) {
        if up {
            self.angle += config.cannon_angle_speed * steps;
        }
        if down {
            self.angle -= config.cannon_angle_speed * steps;
        }
        self.angle = self.angle.clamp(config.min_angle, config.max_angle);
    }

    pub fn begin_charge(&mut self) {
        self.state = FireState::Charging;
    }

    /// Build power while charging
    pub fn charge(&mut self, steps: f32, config: &GameConfig) {
        if self.state == FireState::Charging {
            self.power = (self.power + config.power_increment * steps).min(config.max_power);
        }
    }

    /// Release the trigger.
    ///
    /// Returns the power to fire with, or `None` if the charge was too weak or
    /// the cannon is still reloading. Power always drops back to the minimum.
    pub fn release(&mut self, now: f64, config: &GameConfig) -> Option<f32> {
        if self.state != FireState::Charging {
            return None;
        }
        self.state = FireState::Idle;

        let reloaded = self
            .last_shot
            .is_none_or(|t| now - t >= config.reload_time);
        let shot = if self.power >= config.min_power && reloaded {
            self.last_shot = Some(now);
            Some(self.power)
        } else {
            None
        };

        self.power = config.min_power.min(config.max_power);
        shot
    }

    /// Barrel tip for a given angle
    pub fn muzzle(&self, angle_deg: f32) -> Vec2 {
        self.pos + launch_vector(angle_deg, self.length)
    }

    pub fn is_charging(&self) -> bool {
        self.state == FireState::Charging
    }
}

/// Upper bound on preallocation for one shot
const VOLLEY_CAPACITY_HINT: usize = 256;

/// Number of balls one shot launches
pub fn volley_len(config: &GameConfig) -> usize {
    (config.cannon_balls as usize).saturating_mul(config.pierce.max(1) as usize)
}

/// Build the balls for one shot.
///
/// `cannon_balls` balls fan downward 5 degrees apart; each is launched
/// `pierce` times from the same muzzle point with the same velocity.
pub fn volley(
    cannon: &Cannon,
    config: &GameConfig,
    power: f32,
    mut next_id: impl FnMut() -> u32,
) -> Vec<CannonBall> {
    let copies = config.pierce.max(1);
    let mut balls = Vec::with_capacity(volley_len(config).min(VOLLEY_CAPACITY_HINT));

    for i in 0..config.cannon_balls {
        let angle = cannon.angle - i as f32 * VOLLEY_SPREAD_DEG;
        let muzzle = cannon.muzzle(angle);
        for _ in 0..copies {
            balls.push(CannonBall::new(
                next_id(),
                muzzle,
                angle,
                power,
                config.ball_radius,
            ));
        }
    }

    balls
}
