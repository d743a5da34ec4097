//! Draw sources
//!
//! The engine never calls `rand` directly; it asks a `NumberSource` for the
//! next draw so tests can script outcomes.

use std::collections::VecDeque;

use parking_lot::Mutex;
use rand::Rng;

use super::odds::DRAW_RANGE;

/// Produces draws in `0..DRAW_RANGE`
pub trait NumberSource: Send + Sync {
    fn draw(&self) -> u32;
}

// ============================================================================
// THREAD RNG
// ============================================================================

/// Uniform draws from the thread-local CSPRNG
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl NumberSource for ThreadRngSource {
    fn draw(&self) -> u32 {
        rand::thread_rng().gen_range(0..DRAW_RANGE)
    }
}

// ============================================================================
// SCRIPTED
// ============================================================================

/// Replays a fixed list of draws, then keeps repeating the last one.
///
/// Used by tests and local demos where outcomes must be known in advance.
#[derive(Debug)]
pub struct ScriptedSource {
    queue: Mutex<VecDeque<u32>>,
    last: Mutex<u32>,
}

impl ScriptedSource {
    pub fn new(draws: impl IntoIterator<Item = u32>) -> Self {
        let queue: VecDeque<u32> = draws.into_iter().map(|d| d % DRAW_RANGE).collect();
        let last = queue.back().copied().unwrap_or(0);
        Self {
            queue: Mutex::new(queue),
            last: Mutex::new(last),
        }
    }

    /// Always draw the same number
    pub fn fixed(number: u32) -> Self {
        Self::new([number])
    }
}

impl NumberSource for ScriptedSource {
    fn draw(&self) -> u32 {
        match self.queue.lock().pop_front() {
            Some(n) => {
                *self.last.lock() = n;
                n
            }
            None => *self.last.lock(),
        }
    }
}
