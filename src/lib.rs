//! Cannon Siege - a wall-defence artillery arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, modifiers)
//! - `session`: Session lifecycle and the start/end collaborator interface
//! - `config`: Mutable per-session tunables
//! - `platform`: Input boundary (key edges to aiming/firing intent)
//! - `renderer`: Vertex and label generation from a frame snapshot

pub mod config;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use session::{Session, SessionObserver, SessionResult};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation frame length in milliseconds (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Maximum frames run for a single real-time update
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions (pixels, y grows downward)
    pub const ARENA_WIDTH: f32 = 1200.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Defended wall at the left edge
    pub const WALL_WIDTH: f32 = 50.0;
    pub const WALL_HEIGHT: f32 = 100.0;

    /// Cannon pivot and barrel
    pub const CANNON_X: f32 = 50.0;
    pub const CANNON_Y: f32 = 500.0;
    pub const CANNON_LENGTH: f32 = 50.0;
    /// Angle step between balls of a multi-ball volley (degrees)
    pub const VOLLEY_SPREAD_DEG: f32 = 5.0;

    /// Cannonball radius
    pub const BALL_RADIUS: f32 = 5.0;

    /// Width of one attacker column
    pub const ATTACKER_UNIT_WIDTH: f32 = 20.0;
    /// Attackers slower than this are never spawned
    pub const ATTACKER_MIN_SPEED: f32 = 0.5;

    /// Explosion sprite size and lifetime
    pub const EXPLOSION_SIZE: f32 = 30.0;
    pub const EXPLOSION_FRAMES: u32 = 10;

    /// Points per destroyed attacker
    pub const ATTACKER_SCORE: u64 = 10;

    /// How long a granted power-up or a new special event is announced
    pub const FLASH_DURATION_MS: f64 = 3000.0;
    /// How long a special event stays in effect
    pub const SPECIAL_EVENT_DURATION_MS: f64 = 10_000.0;
}

/// Velocity (or offset) for a barrel angle in degrees.
///
/// Angles are measured counter-clockwise on screen, so the y component is
/// negated against the downward-growing screen axis.
#[inline]
pub fn launch_vector(angle_deg: f32, magnitude: f32) -> Vec2 {
    let rad = (-angle_deg).to_radians();
    Vec2::new(magnitude * rad.cos(), magnitude * rad.sin())
}
