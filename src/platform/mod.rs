//! Platform abstraction layer
//!
//! Adapters between whatever delivers raw events (browser, terminal, test
//! harness) and the simulation:
//! - Input events (key press/release to aiming/firing intent)

pub mod input;

pub use input::{Control, InputController, KeyEdge, KeyEvent};
