use std::sync::Mutex;
use std::sync::mpsc::{Receiver, Sender, channel};

use crate::models::IndexChanged;

/// Coarse-grained publish/subscribe fanout for index changes. Subscribers get
/// "index changed for key K" and decide for themselves what to re-read; no
/// callbacks run inside the index lock.
#[derive(Debug, Default)]
pub struct ChangeBus {
    subscribers: Mutex<Vec<Sender<IndexChanged>>>,
}

impl ChangeBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<IndexChanged> {
        let (sender, receiver) = channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(sender);
        }
        receiver
    }

    /// Delivers to every live subscriber; dropped receivers are pruned here.
    pub fn publish(&self, event: &IndexChanged) {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.retain(|sender| sender.send(event.clone()).is_ok());
        }
    }
}
