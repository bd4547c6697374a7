//! Read-only view of one frame, for the renderer and HUD

use glam::Vec2;
use serde::Serialize;

use super::modifiers::Flash;
use super::state::{Attacker, CannonBall, Explosion, GamePhase, GameState};
use crate::config::GameConfig;

#[derive(Debug, Clone, Serialize)]
pub struct CannonView {
    pub pos: Vec2,
    pub length: f32,
    pub angle: f32,
    pub power: f32,
    pub max_power: f32,
    pub charging: bool,
}

/// Arena geometry the renderer needs
#[derive(Debug, Clone, Serialize)]
pub struct ArenaView {
    pub width: f32,
    pub height: f32,
    pub wall_width: f32,
    pub wall_height: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    /// Session time (ms)
    pub now: f64,
    pub phase: GamePhase,
    pub score: u64,
    pub elapsed_seconds: u64,
    pub arena: ArenaView,
    pub cannon: CannonView,
    pub cannonballs: &'a [CannonBall],
    pub attackers: &'a [Attacker],
    pub explosions: &'a [Explosion],
    pub active_power_ups: &'a [&'static str],
    pub power_up_flash: Option<&'a Flash>,
    pub special_event: Option<&'static str>,
    pub special_event_flash: Option<&'a Flash>,
    /// Time left on the special event announcement (ms, 0 when hidden)
    pub special_event_flash_remaining: f64,
}

impl<'a> Snapshot<'a> {
    pub fn capture(state: &'a GameState, config: &GameConfig) -> Self {
        let now = state.clock.now();
        let special_event_flash = state.modifiers.event_flash();
        Self {
            now,
            phase: state.phase,
            score: state.session.score,
            elapsed_seconds: state.session.elapsed_seconds,
            arena: ArenaView {
                width: config.arena_width,
                height: config.arena_height,
                wall_width: config.wall_width,
                wall_height: config.wall_height,
            },
            cannon: CannonView {
                pos: state.cannon.pos,
                length: state.cannon.length,
                angle: state.cannon.angle,
                power: state.cannon.power,
                max_power: config.max_power,
                charging: state.cannon.is_charging(),
            },
            cannonballs: &state.cannonballs,
            attackers: &state.attackers,
            explosions: &state.explosions,
            active_power_ups: state.modifiers.active_power_ups(),
            power_up_flash: state.modifiers.power_up_flash(),
            special_event: state.modifiers.active_event(),
            special_event_flash,
            special_event_flash_remaining: special_event_flash
                .map_or(0.0, |f| f.remaining(now)),
        }
    }
}
