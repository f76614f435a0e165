// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit buffer (Module I) and geometric precise hit testing (§4.9).
//!
//! Two complementary narrow-phase strategies live here:
//!
//! - [`buffer::HitBuffer`]: an offscreen UID-color raster sampled for
//!   pixel-perfect picking (§4.7). This is the primary narrow phase.
//! - [`PreciseHitTest`]: a small trait geometry collaborators (§6) implement
//!   for the geometric fallback used when pixel sampling is unavailable
//!   (backend `getImageData` refusal, §7) or during AABB-mode hit testing
//!   (drag, §4.9 `hitTestAABB`).
//!
//! `no_std` + `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod buffer;
pub mod stroke;

use kurbo::Point;

pub use buffer::{HitBuffer, decode_uid, encode_uid};

/// Tolerance and other tunables for geometric precise hit testing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitParams {
    /// Extra slack added to a stroke's half-width (local units) before a
    /// point is considered a hit. Lets thin strokes remain pickable.
    pub stroke_tolerance: f64,
}

impl Default for HitParams {
    fn default() -> Self {
        Self {
            stroke_tolerance: 2.0,
        }
    }
}

/// Which part of a shape a [`HitScore`] matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitKind {
    /// Hit the shape's filled interior.
    Fill,
    /// Hit within stroke tolerance of an outline.
    Stroke,
}

/// The result of a successful geometric hit test: how close, and to what.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitScore {
    /// Distance from the query point to the matched geometry, in local
    /// units. Used to disambiguate between multiple overlapping
    /// geometric-fallback candidates (closer wins).
    pub distance: f64,
    pub kind: HitKind,
}

/// Implemented by geometry collaborators (§6 `containsPoint`) that want to
/// participate in the geometric narrow-phase fallback.
pub trait PreciseHitTest {
    /// Tests a point already transformed into the shape's local space.
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore>;
}
