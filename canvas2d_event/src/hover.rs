// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover state helper: compute `pointerenter`/`pointerleave` transitions as
//! the hit target changes (§4.10).
//!
//! Unlike pointer events that bubble, enter/leave fire only on the affected
//! node, but "affected" still means every node whose hover membership
//! actually changed — e.g. moving the pointer from a nested child to its
//! sibling leaves the child (and any ancestors the new target doesn't
//! share) and enters the sibling (and any new ancestors). The caller emits
//! one `pointerleave`/`pointerenter` per transition this returns; neither
//! event bubbles.
//!
//! ## Minimal example
//! ```
//! use canvas2d_event::hover::{HoverState, HoverEvent};
//! let mut hover = HoverState::new();
//!
//! // Pointer enters a nested element: root → parent → child.
//! let events = hover.update_path(&[1, 2, 3]);
//! assert_eq!(events, vec![HoverEvent::Enter(1), HoverEvent::Enter(2), HoverEvent::Enter(3)]);
//!
//! // Pointer moves to a sibling under the same parent.
//! let events = hover.update_path(&[1, 2, 4]);
//! assert_eq!(events, vec![HoverEvent::Leave(3), HoverEvent::Enter(4)]);
//!
//! // Pointer leaves the scene entirely.
//! let events = hover.update_path(&[]);
//! assert_eq!(events, vec![HoverEvent::Leave(4), HoverEvent::Leave(2), HoverEvent::Leave(1)]);
//! ```

use alloc::vec::Vec;

/// A hover transition event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    Enter(K),
    Leave(K),
}

/// Tracks the currently hovered root→target path and computes the minimal
/// enter/leave transitions when it changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoverState<K: Copy + Eq> {
    current: Vec<K>,
}

impl<K: Copy + Eq> HoverState<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
        }
    }

    #[must_use]
    pub fn current_path(&self) -> &[K] {
        &self.current
    }

    /// Clears the hovered path (pointer left the surface entirely),
    /// returning leave events inner→outer.
    pub fn clear(&mut self) -> Vec<HoverEvent<K>> {
        self.update_path(&[])
    }

    /// Updates the hovered path to `new_path`, returning the enter/leave
    /// transitions needed to get there: leaves inner→outer past the shared
    /// prefix, then enters outer→inner for the new tail.
    pub fn update_path(&mut self, new_path: &[K]) -> Vec<HoverEvent<K>> {
        let mut lca = 0;
        while lca < self.current.len() && lca < new_path.len() && self.current[lca] == new_path[lca]
        {
            lca += 1;
        }

        let mut out = Vec::new();
        for &k in self.current[lca..].iter().rev() {
            out.push(HoverEvent::Leave(k));
        }
        for &k in &new_path[lca..] {
            out.push(HoverEvent::Enter(k));
        }
        self.current.clear();
        self.current.extend_from_slice(new_path);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn fresh_path_enters_outer_to_inner() {
        let mut h: HoverState<u32> = HoverState::new();
        let events = h.update_path(&[1, 2, 3]);
        assert_eq!(
            events,
            vec![
                HoverEvent::Enter(1),
                HoverEvent::Enter(2),
                HoverEvent::Enter(3)
            ]
        );
    }

    #[test]
    fn sibling_move_leaves_and_enters_only_the_diverging_tail() {
        let mut h: HoverState<u32> = HoverState::new();
        h.update_path(&[1, 2, 3]);
        let events = h.update_path(&[1, 2, 4]);
        assert_eq!(events, vec![HoverEvent::Leave(3), HoverEvent::Enter(4)]);
    }

    #[test]
    fn clearing_leaves_inner_to_outer() {
        let mut h: HoverState<u32> = HoverState::new();
        h.update_path(&[1, 2]);
        let events = h.clear();
        assert_eq!(events, vec![HoverEvent::Leave(2), HoverEvent::Leave(1)]);
        assert!(h.current_path().is_empty());
    }

    #[test]
    fn repeated_path_has_no_transitions() {
        let mut h: HoverState<u32> = HoverState::new();
        h.update_path(&[1, 2]);
        let events = h.update_path(&[1, 2]);
        assert!(events.is_empty());
    }
}
