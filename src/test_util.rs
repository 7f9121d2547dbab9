// Shared test doubles

use std::collections::VecDeque;

use crate::edca_backoff::BackoffSource;

/// Backoff source that replays a fixed script of counters, for pinning the
/// exact slot-by-slot behavior of a round without fishing for RNG seeds.
pub(crate) struct ScriptedBackoff {
    draws: VecDeque<u32>,
    last_window: Option<u32>,
}

impl ScriptedBackoff {
    pub(crate) fn new(draws: impl IntoIterator<Item = u32>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            last_window: None,
        }
    }

    /// Window the most recent draw was asked for.
    pub(crate) fn last_window(&self) -> Option<u32> {
        self.last_window
    }
}

impl BackoffSource for ScriptedBackoff {
    fn draw(&mut self, cw: u32) -> u32 {
        self.last_window = Some(cw);
        let value = self.draws.pop_front().expect("backoff script exhausted");
        assert!(value <= cw, "scripted draw {} exceeds window {}", value, cw);
        value
    }
}
