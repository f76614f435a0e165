// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tab order (§4.11).
//!
//! A [`FocusSpace`] is a depth-first pre-order listing of the focusable
//! nodes in a tree (or a scope within one), built by the host from whatever
//! tree type it owns. [`DefaultPolicy`] walks that listing forward or
//! backward, wrapping at either end.
//!
//! `no_std` + `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use kurbo::Rect;

/// Per-node focus properties a host attaches to nodes it wants in the tab
/// order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusProps {
    /// Whether the node currently accepts focus. A disabled node is
    /// excluded from the tab order even if `focusable` is set on it.
    pub enabled: bool,
    /// Explicit tab-order override; nodes are otherwise ordered by tree
    /// position. Ties keep tree order.
    pub order: i32,
    /// Opaque grouping key for hosts that scope tab order (e.g. per
    /// modal/panel). Unused by [`DefaultPolicy`], which always walks the
    /// full space it is given.
    pub group: u32,
}

impl Default for FocusProps {
    fn default() -> Self {
        Self {
            enabled: true,
            order: 0,
            group: 0,
        }
    }
}

/// A single candidate in a [`FocusSpace`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusEntry<K> {
    pub id: K,
    /// World-space bounds, kept for hosts that want to render a focus ring.
    pub rect: Rect,
    pub order: i32,
    pub group: u32,
    pub enabled: bool,
    /// Depth relative to the scope root the space was built for.
    pub scope_depth: u8,
}

/// An ordered, borrowed list of focus candidates.
///
/// Hosts build this by walking their tree in depth-first pre-order,
/// collecting nodes that are `visible && focusable && enabled`. Construction
/// is intentionally left to the host: this crate only walks the resulting
/// list.
#[derive(Clone, Copy, Debug)]
pub struct FocusSpace<'a, K> {
    pub nodes: &'a [FocusEntry<K>],
}

impl<'a, K: Copy + Eq> FocusSpace<'a, K> {
    fn position_of(&self, id: K) -> Option<usize> {
        self.nodes.iter().position(|entry| entry.id == id)
    }
}

/// Which direction to move in the tab order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Next,
    Prev,
}

/// Implemented by tab-order strategies.
pub trait FocusPolicy<K> {
    /// Given the currently focused node (or `None` if nothing is focused)
    /// and a direction, returns the next node to focus, if any.
    fn next(&self, current: Option<K>, nav: Navigation, space: &FocusSpace<'_, K>) -> Option<K>;
}

/// Depth-first pre-order tab cycling with wraparound (§4.11).
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultPolicy;

impl<K: Copy + Eq> FocusPolicy<K> for DefaultPolicy {
    fn next(&self, current: Option<K>, nav: Navigation, space: &FocusSpace<'_, K>) -> Option<K> {
        if space.nodes.is_empty() {
            return None;
        }

        let Some(current) = current else {
            return match nav {
                Navigation::Next => space.nodes.first().map(|e| e.id),
                Navigation::Prev => space.nodes.last().map(|e| e.id),
            };
        };

        let Some(idx) = space.position_of(current) else {
            return match nav {
                Navigation::Next => space.nodes.first().map(|e| e.id),
                Navigation::Prev => space.nodes.last().map(|e| e.id),
            };
        };

        let len = space.nodes.len();
        let next_idx = match nav {
            Navigation::Next => (idx + 1) % len,
            Navigation::Prev => (idx + len - 1) % len,
        };
        Some(space.nodes[next_idx].id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32) -> FocusEntry<u32> {
        FocusEntry {
            id,
            rect: Rect::ZERO,
            order: 0,
            group: 0,
            enabled: true,
            scope_depth: 0,
        }
    }

    #[test]
    fn tab_next_wraps_at_end() {
        let nodes = [entry(1), entry(2), entry(3)];
        let space = FocusSpace { nodes: &nodes };
        let policy = DefaultPolicy;

        assert_eq!(policy.next(Some(1), Navigation::Next, &space), Some(2));
        assert_eq!(policy.next(Some(3), Navigation::Next, &space), Some(1));
    }

    #[test]
    fn tab_prev_wraps_at_start() {
        let nodes = [entry(1), entry(2), entry(3)];
        let space = FocusSpace { nodes: &nodes };
        let policy = DefaultPolicy;

        assert_eq!(policy.next(Some(1), Navigation::Prev, &space), Some(3));
        assert_eq!(policy.next(Some(2), Navigation::Prev, &space), Some(1));
    }

    #[test]
    fn no_current_focus_picks_an_end() {
        let nodes = [entry(1), entry(2)];
        let space = FocusSpace { nodes: &nodes };
        let policy = DefaultPolicy;

        assert_eq!(policy.next(None, Navigation::Next, &space), Some(1));
        assert_eq!(policy.next(None, Navigation::Prev, &space), Some(2));
    }

    #[test]
    fn empty_space_has_no_candidates() {
        let nodes: [FocusEntry<u32>; 0] = [];
        let space = FocusSpace { nodes: &nodes };
        let policy = DefaultPolicy;

        assert_eq!(policy.next(None, Navigation::Next, &space), None);
    }

    #[test]
    fn current_not_in_space_falls_back_to_an_end() {
        let nodes = [entry(1), entry(2)];
        let space = FocusSpace { nodes: &nodes };
        let policy = DefaultPolicy;

        assert_eq!(policy.next(Some(99), Navigation::Next, &space), Some(1));
    }
}
