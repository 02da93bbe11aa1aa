// Library surface for headless/integration tests and reuse.
// Terminal rendering lives in the binary; keep this free of ratatui types.
pub mod board;
pub mod config;
pub mod game;
pub mod node;
pub mod runtime;
pub mod telemetry;
pub mod timer;

pub use board::BoardSize;
pub use game::{ClickOutcome, Game, GameConfig, GameError, GameSnapshot, Phase};
pub use node::{Node, Position};
