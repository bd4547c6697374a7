//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable storage order (firing order for balls, spawn order for attackers);
//!   collisions scan both newest first
//! - No rendering or platform dependencies

pub mod cannon;
pub mod clock;
pub mod collision;
pub mod modifiers;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use cannon::{Cannon, FireState, volley, volley_len};
pub use clock::Clock;
pub use collision::{CollisionOutcome, ball_overlaps_attacker, resolve};
pub use modifiers::{Flash, ModifierSystem, POWER_UPS, PowerUp, SPECIAL_EVENTS, SpecialEvent};
pub use snapshot::{ArenaView, CannonView, Snapshot};
pub use spawn::SpawnDirector;
pub use state::{Attacker, CannonBall, Explosion, GamePhase, GameState, SessionState};
pub use tick::{FireEdge, SessionResult, TickInput, TickOutcome, tick};
