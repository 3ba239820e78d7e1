//! Generation-counted debounce for search inputs.
//!
//! Each keystroke bumps the generation and schedules a wake-up after the
//! window; only the wake-up carrying the latest generation is acted on.

use std::time::Duration;

pub const DEFAULT_WINDOW: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    generation: u64,
    window: Duration,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            generation: 0,
            window,
        }
    }

    /// Start a new window, superseding any pending one.
    pub fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
