//! Game controller and session state.

mod controller;
mod session;

pub use controller::{GameController, GameEvent, GamePhase, InvalidTransition};
pub use session::{AnswerRecord, Feedback, GameSession};
