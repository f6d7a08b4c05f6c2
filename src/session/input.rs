use std::sync::mpsc::{self, Receiver, Sender};

use crate::ai::{InputEvent, MoveProvider};
use crate::game::GameState;

/// Human-backed provider fed through an [`InputSender`]. Events are handed out
/// in the order they were sent, one per `read`.
pub struct QueuedInput {
    rx: Receiver<InputEvent>,
}

/// Sending half of a [`QueuedInput`]. Cheap to clone; events sent after the
/// provider is dropped are discarded.
#[derive(Clone)]
pub struct InputSender {
    tx: Sender<InputEvent>,
}

impl QueuedInput {
    pub fn new() -> (Self, InputSender) {
        let (tx, rx) = mpsc::channel();
        (QueuedInput { rx }, InputSender { tx })
    }
}

impl InputSender {
    /// Queue an event. Returns `false` if the provider no longer exists.
    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

impl MoveProvider for QueuedInput {
    fn read(&mut self, _state: &GameState) -> Option<InputEvent> {
        self.rx.try_recv().ok()
    }

    fn clear_queue(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }
}
