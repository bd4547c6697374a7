//! Session lifecycle
//!
//! A `Session` owns everything one game needs: the mutable config, the
//! simulation state and the pending input. Collaborators (score boards,
//! menus, analytics) hook in through `SessionObserver`.

use crate::config::GameConfig;
use crate::platform::{InputController, KeyEvent};
use crate::sim::{GameState, Snapshot, TickOutcome, tick};

pub use crate::sim::SessionResult;

/// Receives session lifecycle notifications
pub trait SessionObserver {
    fn on_session_start(&mut self) {}

    /// Whole seconds played changed
    fn on_elapsed_seconds(&mut self, _elapsed_seconds: u64) {}

    /// Called once per session, after the wall was reached
    fn on_session_end(&mut self, score: u64, elapsed_seconds: u64);
}

/// Observer that ignores everything
impl SessionObserver for () {
    fn on_session_end(&mut self, _score: u64, _elapsed_seconds: u64) {}
}

pub struct Session<O: SessionObserver> {
    /// Config every new session starts from
    base_config: GameConfig,
    /// Live config, mutated by power-ups, events and the spawn ramp
    config: GameConfig,
    state: GameState,
    input: InputController,
    observer: O,
    result: Option<SessionResult>,
}

impl<O: SessionObserver> Session<O> {
    /// Begin a session. The config is sanitized before use.
    pub fn start(config: GameConfig, seed: u64, observer: O) -> Self {
        let base_config = config.sanitized();
        let config = base_config.clone();
        let state = GameState::new(seed, &config);
        let mut session = Self {
            base_config,
            config,
            state,
            input: InputController::new(),
            observer,
            result: None,
        };
        log::info!("Session started (seed {})", seed);
        session.observer.on_session_start();
        session
    }

    /// Throw the current session away and start a fresh one from the base config
    pub fn restart(&mut self, seed: u64) {
        self.config = self.base_config.clone();
        self.state = GameState::new(seed, &self.config);
        self.input.reset();
        self.result = None;
        log::info!("Session restarted (seed {})", seed);
        self.observer.on_session_start();
    }

    /// Run exactly one frame
    pub fn step(&mut self) -> TickOutcome {
        if self.result.is_some() {
            return TickOutcome::default();
        }
        let input = self.input.take_frame();
        let outcome = tick(&mut self.state, &mut self.config, &input);
        self.notify(&outcome);
        outcome
    }

    /// Run the frames due after `real_dt_ms` of wall-clock time.
    ///
    /// Returns the number of frames run.
    pub fn advance(&mut self, real_dt_ms: f64) -> u32 {
        if self.result.is_some() {
            return 0;
        }
        let due = self.state.clock.accumulate(real_dt_ms);
        let mut ran = 0;
        for _ in 0..due {
            self.step();
            ran += 1;
            if self.result.is_some() {
                break;
            }
        }
        ran
    }

    fn notify(&mut self, outcome: &TickOutcome) {
        if let Some(elapsed) = outcome.elapsed_changed {
            self.observer.on_elapsed_seconds(elapsed);
        }
        if self.result.is_some() {
            return;
        }
        if let Some(result) = outcome.ended {
            self.result = Some(result);
            self.observer
                .on_session_end(result.score, result.elapsed_seconds);
        }
    }

    pub fn handle_key(&mut self, event: KeyEvent) {
        self.input.handle(event);
    }

    pub fn input_mut(&mut self) -> &mut InputController {
        &mut self.input
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::capture(&self.state, &self.config)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn base_config(&self) -> &GameConfig {
        &self.base_config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Scripted setups (tests, demos)
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn is_running(&self) -> bool {
        self.result.is_none()
    }

    /// Final tally, once the session has ended
    pub fn result(&self) -> Option<SessionResult> {
        self.result
    }
}
