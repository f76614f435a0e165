// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-node dirty bitmask (§4.1) and the small set of pure helpers every
//! mutation setter and cascade/bubble walk in `canvas2d_scene` is built on.
//!
//! The five bits model exactly what spec.md's dirty-flag pipeline calls for:
//! a fixed per-node mask with hand-specified mutation/cascade/bubble rules,
//! not a generic dependency graph. Tree traversal (cascading `Transform` to
//! descendants, bubbling `Visual` up to a `cacheAsBitmap` ancestor) needs the
//! parent/child arena and therefore lives in `canvas2d_scene`; this crate
//! only owns the bit vocabulary and the short-circuit test that makes those
//! walks cheap.
//!
//! `no_std`, no `alloc` dependency.

#![no_std]

use bitflags::bitflags;

bitflags! {
    /// Which per-node caches are stale (§4.1).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        /// Local/world matrix is stale and must be recomposed (§4.1 step 2).
        const TRANSFORM = 0b0000_0001;
        /// Pixels are stale; repaint (and bubble to a `cacheAsBitmap`
        /// ancestor, §4.4) is required.
        const VISUAL = 0b0000_0010;
        /// Geometry (measured/arranged box) is stale; the layout resolver
        /// must revisit this node (§4.5).
        const LAYOUT = 0b0000_0100;
        /// World AABB used for broad-phase hit testing is stale (§4.8).
        const SPATIAL = 0b0000_1000;
        /// Sibling `(zIndex, uid)` order is stale (§4.2).
        const ORDER = 0b0001_0000;
    }
}

impl Default for DirtyFlags {
    /// A freshly constructed node starts fully dirty (§3.1: "Initial value
    /// at construction = all bits set").
    fn default() -> Self {
        Self::all()
    }
}

/// Sets `add` on `flags` and reports whether any bit was newly set.
///
/// Cascades and bubbles that visit a tree should stop descending/ascending
/// as soon as this returns `false`: every node further along the walk is
/// already at least as dirty, so repeating the walk does no further work.
/// This mirrors the early-exit every per-node dirty tracker in this family
/// relies on to keep mutation cascades `O(depth)` instead of `O(subtree)`
/// in the common case of a few scattered mutations per frame.
#[inline]
#[must_use]
pub fn mark(flags: &mut DirtyFlags, add: DirtyFlags) -> bool {
    let before = *flags;
    *flags |= add;
    *flags != before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fully_dirty() {
        assert_eq!(DirtyFlags::default(), DirtyFlags::all());
    }

    #[test]
    fn mark_reports_whether_new_bits_were_set() {
        let mut flags = DirtyFlags::empty();
        assert!(mark(&mut flags, DirtyFlags::TRANSFORM));
        assert_eq!(flags, DirtyFlags::TRANSFORM);

        // Marking the same bit again is a no-op and reports no change.
        assert!(!mark(&mut flags, DirtyFlags::TRANSFORM));

        // Marking a new bit alongside an already-set one still reports
        // a change.
        assert!(mark(&mut flags, DirtyFlags::TRANSFORM | DirtyFlags::VISUAL));
        assert_eq!(flags, DirtyFlags::TRANSFORM | DirtyFlags::VISUAL);
    }

    #[test]
    fn equal_value_assignment_sets_no_bits() {
        // Regression guard for the property-setter contract ("Setting a
        // value equal to current does not set any bit."): the dirty crate
        // itself doesn't know about node properties, but `mark` must behave
        // as a pure OR so callers can implement that contract by simply not
        // calling `mark` when old == new.
        let mut flags = DirtyFlags::empty();
        let old = 1.0_f64;
        let new = 1.0_f64;
        if (old - new).abs() > f64::EPSILON {
            mark(&mut flags, DirtyFlags::TRANSFORM);
        }
        assert!(flags.is_empty());
    }
}
