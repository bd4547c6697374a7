//! Fixed timestep simulation frame
//!
//! One call advances the session by exactly one frame, in a fixed order:
//! time (and elapsed seconds), scheduled modifiers, input, spawning,
//! projectiles, attackers (and the wall check), collisions, explosions.

use serde::{Deserialize, Serialize};

use super::cannon::volley;
use super::collision::resolve;
use super::state::{GamePhase, GameState};
use crate::config::GameConfig;

/// Frame units advanced per tick
const FRAME_STEPS: f32 = 1.0;

/// Fire trigger edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireEdge {
    Press,
    Release,
}

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Aim-up held
    pub aim_up: bool,
    /// Aim-down held
    pub aim_down: bool,
    /// Fire edges since the last frame, oldest first
    pub fire_edges: Vec<FireEdge>,
}

/// Final tally for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub score: u64,
    pub elapsed_seconds: u64,
}

/// Observable changes produced by one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Set only on the frame the session ended
    pub ended: Option<SessionResult>,
    pub elapsed_changed: Option<u64>,
    pub score_changed: Option<u64>,
    /// Balls launched this frame
    pub fired: usize,
}

/// Advance the session by one fixed frame. Does nothing once ended.
pub fn tick(state: &mut GameState, config: &mut GameConfig, input: &TickInput) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    if state.phase == GamePhase::Ended {
        return outcome;
    }

    // Time
    let dt = state.clock.advance_frame();
    let now = state.clock.now();
    state.session.game_time += dt;
    let previous_elapsed = state.session.elapsed_seconds;
    state.session.elapsed_seconds = state.clock.elapsed_seconds();
    if state.session.elapsed_seconds != previous_elapsed {
        outcome.elapsed_changed = Some(state.session.elapsed_seconds);
    }

    // Power-up grants, special events, flash expiry and reverts
    state.modifiers.update(now, config, &mut state.rng);

    // Aim and fire
    state
        .cannon
        .aim(input.aim_up, input.aim_down, FRAME_STEPS, config);
    for edge in &input.fire_edges {
        match edge {
            FireEdge::Press => state.cannon.begin_charge(),
            FireEdge::Release => {
                if let Some(power) = state.cannon.release(now, config) {
                    let balls = volley(&state.cannon, config, power, || state.ids.next_id());
                    log::debug!(
                        "Fired {} balls at {:.0} deg, power {:.1}",
                        balls.len(),
                        state.cannon.angle,
                        power
                    );
                    outcome.fired += balls.len();
                    state.cannonballs.extend(balls);
                }
            }
        }
    }
    state.cannon.charge(FRAME_STEPS, config);

    // Spawn
    let game_time = state.session.game_time;
    if let Some(attacker) =
        state
            .spawner
            .maybe_spawn(now, config, game_time, &mut state.rng, || state.ids.next_id())
    {
        state.attackers.push(attacker);
    }

    // Projectiles
    for ball in &mut state.cannonballs {
        ball.update(FRAME_STEPS, config.gravity);
    }
    state
        .cannonballs
        .retain(|b| !b.is_off_screen(config.arena_width, config.arena_height));

    // Attackers and the terminal condition
    for attacker in &mut state.attackers {
        attacker.update(FRAME_STEPS);
    }
    if state
        .attackers
        .iter()
        .any(|a| a.is_at_wall(config.wall_width))
    {
        let result = SessionResult {
            score: state.session.score,
            elapsed_seconds: state.session.elapsed_seconds,
        };
        state.phase = GamePhase::Ended;
        state.modifiers.cancel_all();
        log::info!(
            "Wall breached after {}s with score {}",
            result.elapsed_seconds,
            result.score
        );
        outcome.ended = Some(result);
        return outcome;
    }

    // Collisions
    let hits = resolve(
        &mut state.cannonballs,
        &mut state.attackers,
        config.arena_height,
        config.wall_height,
    );
    if hits.score_delta > 0 {
        state.session.score += hits.score_delta;
        outcome.score_changed = Some(state.session.score);
    }
    state.explosions.extend(hits.explosions);

    // Explosions
    for explosion in &mut state.explosions {
        explosion.update();
    }
    state.explosions.retain(|e| !e.is_finished());

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::FireState;

    /// No spawning, no modifiers
    fn scripted_config() -> GameConfig {
        GameConfig {
            spawn_interval: f64::INFINITY,
            power_up_period: 0.0,
            special_event_period: 0.0,
            ..Default::default()
        }
    }

    fn fire_now() -> TickInput {
        TickInput {
            fire_edges: vec![FireEdge::Press, FireEdge::Release],
            ..Default::default()
        }
    }

    #[test]
    fn test_attacker_reaches_wall_after_exact_frames() {
        let mut config = scripted_config();
        let mut state = GameState::new(1, &config);
        state.push_attacker(&config, 1200.0, 10.0, 1, 100.0);

        let input = TickInput::default();
        let mut frames = 0;
        let result = loop {
            frames += 1;
            if let Some(result) = tick(&mut state, &mut config, &input).ended {
                break result;
            }
            assert!(frames < 1000, "never ended");
        };

        assert_eq!(frames, 115);
        assert_eq!(result.score, 0);
        assert_eq!(state.phase, GamePhase::Ended);
    }

    #[test]
    fn test_ended_session_is_frozen() {
        let mut config = scripted_config();
        let mut state = GameState::new(1, &config);
        state.push_attacker(&config, WALL_WIDTH + 1.0, 5.0, 1, 100.0);

        assert!(tick(&mut state, &mut config, &TickInput::default()).ended.is_some());
        let frames = state.clock.frames();
        let config_before = config.clone();

        let outcome = tick(&mut state, &mut config, &fire_now());
        assert_eq!(outcome, TickOutcome::default());
        assert_eq!(state.clock.frames(), frames);
        assert!(state.cannonballs.is_empty());
        assert_eq!(config, config_before);
        assert_eq!(state.modifiers.pending(), 0);
    }

    #[test]
    fn test_pierce_duplicates_both_land_same_frame() {
        let mut config = GameConfig {
            pierce: 2,
            cannon_balls: 1,
            start_angle: 0.0,
            ..scripted_config()
        };
        let mut state = GameState::new(1, &config);
        // Muzzle at (100, 500); first step carries the balls to x = 110
        state.push_attacker(&config, 110.0, 0.5, 1, 400.0);
        state.cannon.power = 10.0;

        let outcome = tick(&mut state, &mut config, &fire_now());

        assert_eq!(outcome.fired, 2);
        assert!(state.cannonballs.is_empty());
        assert_eq!(state.attackers.len(), 1);
        // Both duplicates resolved in one pass: 400 -> 200 -> 100
        assert_eq!(state.attackers[0].height, 100.0);
        assert_eq!(state.explosions.len(), 2);
        assert_eq!(state.session.score, 0);
    }

    #[test]
    fn test_destroying_attacker_scores() {
        let mut config = GameConfig {
            start_angle: 0.0,
            ..scripted_config()
        };
        let mut state = GameState::new(1, &config);
        state.push_attacker(&config, 110.0, 0.5, 1, 99.0);
        state.cannon.power = 10.0;

        let outcome = tick(&mut state, &mut config, &fire_now());
        assert_eq!(outcome.score_changed, Some(ATTACKER_SCORE));
        assert!(state.attackers.is_empty());
    }

    #[test]
    fn test_hold_charges_then_release_fires() {
        let mut config = scripted_config();
        let mut state = GameState::new(1, &config);

        let press = TickInput {
            fire_edges: vec![FireEdge::Press],
            ..Default::default()
        };
        tick(&mut state, &mut config, &press);
        assert_eq!(state.cannon.state, FireState::Charging);
        for _ in 0..19 {
            tick(&mut state, &mut config, &TickInput::default());
        }
        assert!((state.cannon.power - 20.0 * config.power_increment).abs() < 1e-4);

        let release = TickInput {
            fire_edges: vec![FireEdge::Release],
            ..Default::default()
        };
        let outcome = tick(&mut state, &mut config, &release);
        assert_eq!(outcome.fired, 1);
        assert_eq!(state.cannon.power, config.min_power);
        assert_eq!(state.cannon.state, FireState::Idle);
    }

    #[test]
    fn test_quick_tap_below_min_power_does_not_fire() {
        let mut config = scripted_config();
        let mut state = GameState::new(1, &config);
        let outcome = tick(&mut state, &mut config, &fire_now());
        assert_eq!(outcome.fired, 0);
        // After the first release the charge starts from min power
        let outcome = tick(&mut state, &mut config, &fire_now());
        assert_eq!(outcome.fired, 1);
    }

    #[test]
    fn test_aim_applies_per_frame() {
        let mut config = scripted_config();
        let mut state = GameState::new(1, &config);
        let input = TickInput {
            aim_up: true,
            ..Default::default()
        };
        tick(&mut state, &mut config, &input);
        assert_eq!(state.cannon.angle, config.start_angle + config.cannon_angle_speed);
    }

    #[test]
    fn test_first_spawn_after_interval() {
        let mut config = GameConfig {
            power_up_period: 0.0,
            special_event_period: 0.0,
            ..Default::default()
        };
        let mut state = GameState::new(1, &config);
        // 3000ms = 180 frames
        for _ in 0..179 {
            tick(&mut state, &mut config, &TickInput::default());
        }
        assert!(state.attackers.is_empty());
        tick(&mut state, &mut config, &TickInput::default());
        assert_eq!(state.attackers.len(), 1);
    }

    #[test]
    fn test_elapsed_seconds_reported_on_change() {
        let mut config = scripted_config();
        let mut state = GameState::new(1, &config);
        let mut changes = Vec::new();
        for _ in 0..130 {
            if let Some(s) = tick(&mut state, &mut config, &TickInput::default()).elapsed_changed
            {
                changes.push(s);
            }
        }
        assert_eq!(changes, vec![1, 2]);
    }

    #[test]
    fn test_terminal_frame_reports_elapsed_change() {
        let mut config = scripted_config();
        let mut state = GameState::new(1, &config);
        let input = TickInput::default();

        // Stop one frame short of the first whole second
        loop {
            let mut lookahead = state.clone();
            let mut lookahead_config = config.clone();
            if tick(&mut lookahead, &mut lookahead_config, &input)
                .elapsed_changed
                .is_some()
            {
                break;
            }
            tick(&mut state, &mut config, &input);
        }

        state.push_attacker(&config, WALL_WIDTH + 1.0, 5.0, 1, 100.0);
        let outcome = tick(&mut state, &mut config, &input);
        assert_eq!(outcome.elapsed_changed, Some(1));
        assert_eq!(
            outcome.ended,
            Some(SessionResult {
                score: 0,
                elapsed_seconds: 1
            })
        );
    }

    #[test]
    fn test_modifiers_run_inside_frames() {
        let mut config = GameConfig {
            spawn_interval: f64::INFINITY,
            power_up_period: 1000.0,
            special_event_period: 0.0,
            ..Default::default()
        };
        let mut state = GameState::new(3, &config);
        for _ in 0..60 {
            tick(&mut state, &mut config, &TickInput::default());
        }
        assert_eq!(state.modifiers.active_power_ups().len(), 1);
        assert!(state.modifiers.power_up_flash().is_some());
    }

    #[test]
    fn test_determinism() {
        let base = GameConfig {
            power_up_period: 5000.0,
            special_event_period: 7000.0,
            ..Default::default()
        };
        let mut config1 = base.clone();
        let mut config2 = base;
        let mut state1 = GameState::new(99999, &config1);
        let mut state2 = GameState::new(99999, &config2);

        for i in 0..2000 {
            let input = if i % 40 == 0 {
                fire_now()
            } else {
                TickInput {
                    aim_up: i % 7 == 0,
                    ..Default::default()
                }
            };
            tick(&mut state1, &mut config1, &input);
            tick(&mut state2, &mut config2, &input);
        }

        assert_eq!(state1.attackers, state2.attackers);
        assert_eq!(state1.cannonballs, state2.cannonballs);
        assert_eq!(state1.session, state2.session);
        assert_eq!(config1, config2);
    }
}
