// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 2D viewport and view primitives (§3.5, §4.6).
//!
//! [`Viewport2D`] is a headless camera: pan + uniform zoom over a
//! rectangular device-space region, with coordinate conversion, fitting,
//! and optional clamping against world bounds. It owns no scene graph or
//! rendering backend.
//!
//! [`View`] builds on it for the scene's actual rendering/interaction
//! endpoints (§3.5): device-pixel-ratio, named layers (each a separate
//! raster the host backend renders into), and source→dest projections.
//!
//! This crate is `no_std` and uses `alloc`.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use canvas2d_view::Viewport2D;
//!
//! // Device/view rect: 800x600 window.
//! let view_rect = Rect::new(0.0, 0.0, 800.0, 600.0);
//! let mut view = Viewport2D::new(view_rect);
//!
//! // Optional world bounds for fitting/clamping.
//! view.set_world_bounds(Some(Rect::new(-100.0, -100.0, 100.0, 100.0)));
//! view.fit_world();
//!
//! // Convert a device-space point into world space (for hit testing, etc.).
//! let device_pt = Point::new(400.0, 300.0);
//! let world_pt = view.view_to_world_point(device_pt);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod modes;
mod view;
mod viewport2d;

pub use modes::{ClampMode, FitMode};
pub use view::{Layer, Projection, View, ViewError};
pub use viewport2d::{Viewport2D, Viewport2DDebugInfo};
