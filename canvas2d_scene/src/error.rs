// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for invariant-violation-class failures (§7).
//!
//! Recoverable coercions (unit resolution, scale-zero, alpha clamp) never
//! appear here; they clamp silently and push a [`crate::debug::DebugEvent`]
//! instead. These types are only for operations §7 classifies as
//! "invariant violation": the caller asked for something the state machine
//! cannot satisfy without corrupting itself.

use core::fmt;

/// Errors from [`crate::tree::Tree`] node/container operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// The referenced node id is stale or was never valid.
    UnknownNode,
    /// An operation that requires a container target was given a leaf, or
    /// vice versa where that distinction matters.
    NotAContainer,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::UnknownNode => "node id is stale or unknown",
            Self::NotAContainer => "node is not a container",
        };
        f.write_str(msg)
    }
}

/// Errors from [`crate::scene::Scene`]-level operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneError {
    /// `addView`/`addLayer` with an id already in use.
    DuplicateId,
    /// Lookup or removal by an id that does not exist.
    UnknownId,
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::DuplicateId => "id already exists",
            Self::UnknownId => "no entry with that id",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
mod std_error {
    extern crate std;

    use super::{SceneError, TreeError};

    impl std::error::Error for TreeError {}
    impl std::error::Error for SceneError {}
}
