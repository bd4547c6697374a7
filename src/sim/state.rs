//! Game state and entity types
//!
//! Entities are plain data plus their own update/geometry rules. Anything an
//! update needs from the session (gravity, arena size, wall) is passed in.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cannon::Cannon;
use super::clock::Clock;
use super::modifiers::ModifierSystem;
use super::spawn::SpawnDirector;
use crate::config::GameConfig;
use crate::consts::*;
use crate::launch_vector;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Frames advance
    Running,
    /// An attacker reached the wall; nothing advances any more
    Ended,
}

/// A fired projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CannonBall {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl CannonBall {
    /// Launch from `pos` with `power` along `angle_deg`
    pub fn new(id: u32, pos: Vec2, angle_deg: f32, power: f32, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel: launch_vector(angle_deg, power),
            radius,
        }
    }

    /// Apply gravity then move, `steps` frames at once
    pub fn update(&mut self, steps: f32, gravity: f32) {
        self.vel.y += gravity * steps;
        self.pos += self.vel * steps;
    }

    /// Left the arena rectangle
    pub fn is_off_screen(&self, width: f32, height: f32) -> bool {
        self.pos.x < 0.0 || self.pos.x > width || self.pos.y < 0.0 || self.pos.y > height
    }
}

/// An advancing bar, one or two columns wide, resting on the arena floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attacker {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Distance per frame
    pub speed: f32,
    pub columns: u8,
    /// Hits taken since the last halving (two-column attackers only)
    pub hit_counter: u32,
}

impl Attacker {
    /// Spawn at the given x, bottom-aligned to the floor
    pub fn new(id: u32, x: f32, speed: f32, columns: u8, height: f32, arena_height: f32) -> Self {
        let columns = columns.clamp(1, 2);
        Self {
            id,
            pos: Vec2::new(x, arena_height - height),
            width: ATTACKER_UNIT_WIDTH * columns as f32,
            height,
            speed,
            columns,
            hit_counter: 0,
        }
    }

    pub fn update(&mut self, steps: f32) {
        self.pos.x -= self.speed * steps;
    }

    /// Leading edge has reached the wall
    pub fn is_at_wall(&self, wall_width: f32) -> bool {
        self.pos.x <= wall_width
    }

    /// Halve (floored) and drop back onto the floor
    pub fn reduce_height(&mut self, arena_height: f32) {
        self.height = (self.height / 2.0).floor();
        self.pos.y = arena_height - self.height;
    }

    /// Register one qualifying hit. Returns true if the height was halved.
    pub fn take_hit(&mut self, arena_height: f32) -> bool {
        if self.columns >= 2 {
            self.hit_counter += 1;
            if self.hit_counter < 2 {
                return false;
            }
            self.hit_counter = 0;
        }
        self.reduce_height(arena_height);
        true
    }

    pub fn is_destroyed(&self, wall_height: f32) -> bool {
        self.height < 0.5 * wall_height
    }
}

/// Cosmetic hit marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub size: f32,
    pub frame: u32,
}

impl Explosion {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: EXPLOSION_SIZE,
            frame: 0,
        }
    }

    pub fn update(&mut self) {
        self.frame += 1;
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= EXPLOSION_FRAMES
    }
}

/// Per-session counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u64,
    pub elapsed_seconds: u64,
    /// Accumulated frame time driving difficulty (ms)
    pub game_time: f64,
}

/// Monotonic entity ID source
#[derive(Debug, Clone)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub clock: Clock,
    pub session: SessionState,
    pub cannon: Cannon,
    /// Active projectiles (in firing order)
    pub cannonballs: Vec<CannonBall>,
    /// Active attackers (in spawn order)
    pub attackers: Vec<Attacker>,
    pub explosions: Vec<Explosion>,
    pub spawner: SpawnDirector,
    pub modifiers: ModifierSystem,
    pub(crate) ids: EntityIds,
}

impl GameState {
    /// Create a running session with the given seed
    pub fn new(seed: u64, config: &GameConfig) -> Self {
        let clock = Clock::new();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Running,
            session: SessionState::default(),
            cannon: Cannon::new(config),
            cannonballs: Vec::new(),
            attackers: Vec::new(),
            explosions: Vec::new(),
            spawner: SpawnDirector::new(clock.now()),
            modifiers: ModifierSystem::new(clock.now(), config),
            clock,
            ids: EntityIds::default(),
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.next_id()
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Place an attacker at `x` (tests and scripted scenarios)
    pub fn push_attacker(
        &mut self,
        config: &GameConfig,
        x: f32,
        speed: f32,
        columns: u8,
        height: f32,
    ) -> u32 {
        let id = self.next_entity_id();
        self.attackers
            .push(Attacker::new(id, x, speed, columns, height, config.arena_height));
        id
    }
}
