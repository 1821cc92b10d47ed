// Library surface for headless/integration tests and reuse.
// The binary in main.rs only wires these together with a terminal.
pub mod app_dirs;
pub mod config;
pub mod engine;
pub mod game;
pub mod gesture;
pub mod hand_source;
pub mod landmarks;
pub mod logging;
pub mod runtime;
pub mod ui;

pub use engine::{RenderModel, RoundEngine, RoundPhase};
pub use game::Outcome;
pub use gesture::{classify, Move};
pub use landmarks::{HandLandmarks, LandmarkPoint};
