//! Turn dispatch and the session loop that drivers (terminal UI, headless
//! runner) build on.

pub mod dispatcher;
pub mod input;
mod runner;

pub use dispatcher::{Poll, TurnDispatcher, TurnState};
pub use input::{InputSender, QueuedInput};
pub use runner::{Session, Step};
