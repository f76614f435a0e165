// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debug/warning channel (§4.15, §7).
//!
//! The core has no I/O and no logging framework dependency, so recoverable
//! coercions and backend refusals are reported the same way the rest of the
//! system models state: a bounded ring buffer a host can drain and forward
//! to its own logger (`log`, `tracing`, or otherwise). Nothing here assumes
//! a subscriber exists; an application that never calls [`DebugChannel::drain`]
//! just accumulates (and quietly drops the oldest) events.

use alloc::collections::VecDeque;
use alloc::string::String;

/// Default ring-buffer capacity. Arbitrary but generous for a single
/// frame's worth of coercion warnings.
pub const DEFAULT_CAPACITY: usize = 64;

/// A single diagnostic emitted by a recoverable-coercion or backend-failure
/// path.
#[derive(Clone, Debug, PartialEq)]
pub enum DebugEvent {
    /// A `scaleX`/`scaleY` of exactly zero was coerced to
    /// [`canvas2d_geom::MIN_SCALE`] (§3.1, §4.15).
    ScaleCoerced { node: u32 },
    /// An `alpha` assignment outside `[0,1]` was clamped (§3.1).
    AlphaClamped { node: u32, requested: f64 },
    /// A style unit failed to resolve and fell back to `0` (§3.3, §7).
    UnitUnresolved { node: u32 },
    /// The host paint backend refused `getImageData` (e.g. cross-origin);
    /// pixel-perfect hit testing is disabled for the remainder of the
    /// scene's lifetime and the geometric fallback takes over (§7).
    HitBufferReadRefused,
    /// A [`crate::scene::Scene`] was dropped without an explicit `destroy()`
    /// call (§4.15: "reported via a debug-mode warning channel; not fatal").
    SceneDroppedWithoutDestroy,
    /// A user event-handler callback panicked/aborted and was skipped; the
    /// remaining handlers in the same `emit` still ran (§7 propagation
    /// policy).
    HandlerFailed { channel: String },
}

/// Bounded FIFO of [`DebugEvent`]s; pushes drop the oldest entry once full.
#[derive(Debug)]
pub struct DebugChannel {
    capacity: usize,
    events: VecDeque<DebugEvent>,
}

impl DebugChannel {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            events: VecDeque::new(),
        }
    }

    pub fn push(&mut self, event: DebugEvent) {
        if self.events.len() >= self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Removes and returns every buffered event, oldest first.
    pub fn drain(&mut self) -> alloc::vec::Vec<DebugEvent> {
        self.events.drain(..).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for DebugChannel {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_oldest_when_full() {
        let mut ch = DebugChannel::new(2);
        ch.push(DebugEvent::ScaleCoerced { node: 1 });
        ch.push(DebugEvent::ScaleCoerced { node: 2 });
        ch.push(DebugEvent::ScaleCoerced { node: 3 });
        let drained = ch.drain();
        assert_eq!(
            drained,
            alloc::vec![
                DebugEvent::ScaleCoerced { node: 2 },
                DebugEvent::ScaleCoerced { node: 3 },
            ]
        );
    }

    #[test]
    fn drain_empties_the_channel() {
        let mut ch = DebugChannel::default();
        ch.push(DebugEvent::HitBufferReadRefused);
        assert!(!ch.is_empty());
        let _ = ch.drain();
        assert!(ch.is_empty());
    }
}
