//! Combat types, engine transitions, and demon AI.

pub mod ai;
pub mod logic;
pub mod types;

pub use ai::{choose_action, AiContext};
pub use logic::*;
pub use types::*;
