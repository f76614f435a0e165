// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small, focused state machines for pointer interaction (§4.10, §4.12,
//! §4.13). Each module handles one pattern:
//!
//! - [`hover`]: enter/leave transitions as the hit target changes
//! - [`click`]: same-target click synthesis on `pointerup`
//! - [`drag`]: movement deltas and total offset since a drag started
//!
//! None of these assume a particular tree structure, event router, or node
//! type — they accept pre-resolved paths/positions and return transitions
//! or deltas. The drag/drop state machine itself (idle → armed → dragging,
//! §4.12) and scroll-container inertia (§4.13) are composed from these
//! primitives at the scene level, where the drag threshold, constraints,
//! and drop-target hit testing are all known.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod click;
pub mod drag;
pub mod hover;
