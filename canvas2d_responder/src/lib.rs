// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A deterministic, `no_std` router for scene events (§4.10, §4.11).
//!
//! ## Overview
//!
//! This crate builds the responder sequence — capture → target → bubble —
//! from an already-resolved root→target path. It does not perform hit
//! testing or picking; that happens upstream (broad/narrow-phase hit
//! testing, §4.9, or tab-order focus resolution, §4.11) and hands this
//! crate a single target to expand into a traversal order.
//!
//! ## Workflow
//!
//! 1. Resolve a single target (pointer hit test, focused node, ...).
//! 2. Build its root→target path.
//! 3. [`router::dispatch_for_path`] expands that path into a
//!    [`types::Dispatch`] sequence, or [`router::dispatch_target_only`] for
//!    events that never bubble (`pointerenter`/`pointerleave`, §4.10).
//! 4. [`dispatcher::run`] walks the sequence, calling your handler and
//!    honoring [`types::Outcome::Stop`]/[`types::Outcome::StopAndConsume`].
//!
//! ```
//! use canvas2d_responder::{dispatcher, router};
//! use canvas2d_responder::types::{Dispatch, Outcome, Phase};
//!
//! #[derive(Copy, Clone, Debug)]
//! struct Node(u32);
//!
//! let path = [Node(1), Node(2), Node(3)];
//! let seq: Vec<Dispatch<Node>> = router::dispatch_for_path(&path);
//!
//! let mut default_prevented = false;
//! let consumed = dispatcher::run(&seq, &mut default_prevented, |d, flag| {
//!     if matches!(d.phase, Phase::Target) {
//!         *flag = true;
//!     }
//!     Outcome::Continue
//! });
//! assert!(!consumed);
//! assert!(default_prevented);
//! ```
//!
//! ## Focus
//!
//! [`focus::FocusState`] tracks the currently focused root→target path and
//! computes the minimal enter/leave transitions when it changes, pairing
//! naturally with a tab-order policy (see `canvas2d_focus`) that picks the
//! next node to focus.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod dispatcher;
pub mod focus;
pub mod router;
pub mod types;
