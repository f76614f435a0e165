// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click synthesis: `click` fires on `pointerup` iff the hit target is the
//! same node that received `pointerdown` (§4.10). `dblclick` is not
//! synthesized here; it comes from the host surface's native
//! double-click event.

/// Tracks the node that received the most recent unmatched `pointerdown`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClickState<K> {
    pending: Option<K>,
}

impl<K: Copy + Eq> ClickState<K> {
    #[must_use]
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Records the `pointerdown` target.
    pub fn on_down(&mut self, node: K) {
        self.pending = Some(node);
    }

    /// Resolves a `pointerup` target against the pending `pointerdown`
    /// target. Returns the node a `click` should fire on, if any, and
    /// always clears pending state (a `pointerup` always ends the press,
    /// matched or not).
    pub fn on_up(&mut self, node: K) -> Option<K> {
        let pending = self.pending.take();
        pending.filter(|&p| p == node)
    }

    /// Discards a pending `pointerdown` without synthesizing a click, e.g.
    /// when the pointer stream is canceled or a drag starts instead
    /// (§4.12: past the drag threshold, the original target never
    /// receives `click`).
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_down_and_up_fires_click() {
        let mut clicks: ClickState<u32> = ClickState::new();
        clicks.on_down(42);
        assert_eq!(clicks.on_up(42), Some(42));
    }

    #[test]
    fn mismatched_target_does_not_fire_click() {
        let mut clicks: ClickState<u32> = ClickState::new();
        clicks.on_down(42);
        assert_eq!(clicks.on_up(7), None);
    }

    #[test]
    fn up_without_down_does_not_fire_click() {
        let mut clicks: ClickState<u32> = ClickState::new();
        assert_eq!(clicks.on_up(42), None);
    }

    #[test]
    fn up_clears_pending_state_even_on_mismatch() {
        let mut clicks: ClickState<u32> = ClickState::new();
        clicks.on_down(42);
        clicks.on_up(7);
        assert_eq!(clicks.on_up(42), None);
    }

    #[test]
    fn cancel_suppresses_subsequent_click() {
        let mut clicks: ClickState<u32> = ClickState::new();
        clicks.on_down(42);
        clicks.cancel();
        assert_eq!(clicks.on_up(42), None);
    }
}
