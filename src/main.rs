//! Cannon Siege entry point
//!
//! Runs a headless session driven by a simple autopilot and prints the
//! result. Usage: `cannon-siege [config.json] [seed]`

use std::error::Error;

use cannon_siege::platform::Control;
use cannon_siege::renderer::build_frame;
use cannon_siege::{GameConfig, Session, SessionObserver};

/// Ten minutes of play at 60 Hz
const FRAME_CAP: u64 = 60 * 60 * 10;
/// Frames the autopilot holds fire before releasing
const CHARGE_FRAMES: u32 = 30;

struct LogObserver;

impl SessionObserver for LogObserver {
    fn on_session_start(&mut self) {
        log::info!("Session start");
    }

    fn on_elapsed_seconds(&mut self, elapsed_seconds: u64) {
        if elapsed_seconds % 30 == 0 {
            log::info!("{}s played", elapsed_seconds);
        }
    }

    fn on_session_end(&mut self, score: u64, elapsed_seconds: u64) {
        log::info!("Session end: score {} after {}s", score, elapsed_seconds);
    }
}

/// Sweeps the barrel between two angles and fires on a fixed cadence
struct Autopilot {
    low: f32,
    high: f32,
    rising: bool,
    charging_for: u32,
}

impl Autopilot {
    fn new() -> Self {
        Self {
            low: 10.0,
            high: 40.0,
            rising: true,
            charging_for: 0,
        }
    }

    fn drive(&mut self, session: &mut Session<LogObserver>) {
        let angle = session.state().cannon.angle;
        if angle >= self.high {
            self.rising = false;
        } else if angle <= self.low {
            self.rising = true;
        }

        let input = session.input_mut();
        if self.rising {
            input.release(Control::AimDown);
            input.press(Control::AimUp);
        } else {
            input.release(Control::AimUp);
            input.press(Control::AimDown);
        }

        if self.charging_for == 0 {
            input.press(Control::Fire);
        }
        self.charging_for += 1;
        if self.charging_for >= CHARGE_FRAMES {
            input.release(Control::Fire);
            self.charging_for = 0;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    config.validate()?;
    let seed = match args.next() {
        Some(s) => s.parse::<u64>()?,
        None => 42,
    };

    log::info!("Cannon Siege (headless) starting, seed {}", seed);

    let mut session = Session::start(config, seed, LogObserver);
    let mut autopilot = Autopilot::new();
    let mut frames = 0;
    while session.is_running() && frames < FRAME_CAP {
        autopilot.drive(&mut session);
        session.step();
        frames += 1;
    }

    match session.result() {
        Some(result) => println!(
            "Game over after {} frames: score {}, {}s",
            frames, result.score, result.elapsed_seconds
        ),
        None => println!(
            "Still holding after {} frames: score {}",
            frames,
            session.state().session.score
        ),
    }

    let snapshot = session.snapshot();
    let frame = build_frame(&snapshot);
    log::debug!(
        "Final frame: {} vertices, {} labels",
        frame.vertices.len(),
        frame.labels.len()
    );
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
