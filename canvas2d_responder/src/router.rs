// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build capture → target → bubble sequences from a resolved root→target
//! path (§4.10, §4.11).
//!
//! Hit resolution (picking the single target out of overlapping
//! candidates) happens upstream of this module. By the time a path reaches
//! here there is exactly one target; this module only expands it into the
//! propagation order.

use alloc::vec;
use alloc::vec::Vec;

use crate::types::{Dispatch, Phase};

/// Builds a capture → target → bubble sequence for `path` (ordered
/// root → target, inclusive). Pointer, keyboard, and focus dispatch (§4.10,
/// §4.11) all use this; the empty path produces an empty sequence.
#[must_use]
pub fn dispatch_for_path<K: Copy, P>(path: &[K]) -> Vec<Dispatch<K, P>> {
    let Some((&target, ancestors)) = path.split_last() else {
        return Vec::new();
    };

    let mut seq = Vec::with_capacity(path.len() * 2 - 1);
    for &node in ancestors {
        seq.push(Dispatch::capture(node));
    }
    seq.push(Dispatch::target(target));
    for &node in ancestors.iter().rev() {
        seq.push(Dispatch::bubble(node));
    }
    seq
}

/// Builds a target-only sequence, for events that never bubble
/// (`pointerenter`/`pointerleave`, §4.10).
#[must_use]
pub fn dispatch_target_only<K: Copy, P>(node: K) -> Vec<Dispatch<K, P>> {
    vec![Dispatch::target(node)]
}

/// Recovers the target node from a dispatch sequence built by this module.
#[must_use]
pub fn target_of<K: Copy, P>(seq: &[Dispatch<K, P>]) -> Option<K> {
    seq.iter()
        .find(|d| d.phase == Phase::Target)
        .map(|d| d.node)
}
