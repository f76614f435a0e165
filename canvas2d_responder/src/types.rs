// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared types for the responder chain: phases, outcomes, and dispatch
//! entries.

/// Which leg of the capture → target → bubble walk a [`Dispatch`] belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Root → target, excluding the target itself.
    Capture,
    /// The hit/focused node itself.
    Target,
    /// Target → root, excluding the target itself.
    Bubble,
}

/// What a handler tells the dispatcher to do next (§4.10).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep walking the sequence.
    Continue,
    /// Abort propagation immediately; no further phases run.
    Stop,
    /// Abort propagation immediately and report the event as consumed.
    StopAndConsume,
}

/// One entry in a responder sequence: a node paired with the phase it is
/// being visited in, and an optional per-entry payload (e.g. the pointer
/// position localized into that node's local space).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dispatch<K, P = ()> {
    pub node: K,
    pub phase: Phase,
    pub payload: Option<P>,
}

impl<K, P> Dispatch<K, P> {
    #[must_use]
    pub fn capture(node: K) -> Self {
        Self {
            node,
            phase: Phase::Capture,
            payload: None,
        }
    }

    #[must_use]
    pub fn target(node: K) -> Self {
        Self {
            node,
            phase: Phase::Target,
            payload: None,
        }
    }

    #[must_use]
    pub fn bubble(node: K) -> Self {
        Self {
            node,
            phase: Phase::Bubble,
            payload: None,
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: P) -> Self {
        self.payload = Some(payload);
        self
    }
}
