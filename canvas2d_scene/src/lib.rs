// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained-mode 2D scene graph (§3–§4): a generational node/container
//! arena with per-node dirty bits, two-pass flex/anchor layout, paint
//! orchestration through a host-supplied backend, pixel-perfect hit
//! testing, and a unified pointer/keyboard/drag/scroll interaction
//! manager.
//!
//! [`scene::Scene`] is the type application code constructs: one [`tree::Tree`],
//! a shared [`canvas2d_hit::HitBuffer`], a [`frame::FrameDriver`], and one or
//! more named [`view::SceneView`]s attached to host paint surfaces.
//! [`scene::Scene::tick`] runs the whole per-frame pipeline — throttled
//! update, layout resolve, paint, hit-buffer refresh, hover refresh — in one
//! call.
//!
//! This crate is `no_std` and uses `alloc`; a host backend supplies the
//! actual rasterizer through [`paint::PaintCtx`].
//!
//! ## Minimal example
//!
//! ```rust
//! use canvas2d_scene::scene::Scene;
//! use canvas2d_scene::paint::{CacheId, PaintCtx, TextMetrics};
//! use canvas2d_scene::view::SceneView;
//! use kurbo::{Affine, Rect};
//!
//! struct NullBackend;
//! impl PaintCtx for NullBackend {
//!     fn save(&mut self) {}
//!     fn restore(&mut self) {}
//!     fn set_transform(&mut self, _t: Affine) {}
//!     fn set_global_alpha(&mut self, _a: f64) {}
//!     fn set_blend_mode(&mut self, _m: &str) {}
//!     fn clear_rect(&mut self, _r: Rect) {}
//!     fn fill_rect(&mut self, _r: Rect) {}
//!     fn stroke_rect(&mut self, _r: Rect) {}
//!     fn push_clip_rect(&mut self, _r: Rect) {}
//!     fn pop_clip(&mut self) {}
//!     fn measure_text(&mut self, _t: &str) -> TextMetrics { TextMetrics::default() }
//!     fn fill_text(&mut self, _t: &str, _x: f64, _y: f64) {}
//!     fn get_image_data(&mut self, _r: Rect) -> Option<Vec<u8>> { None }
//!     fn cache_is_valid(&self, _c: CacheId) -> bool { false }
//!     fn begin_cache(&mut self, _c: CacheId, _b: Rect) {}
//!     fn end_cache(&mut self, _c: CacheId) {}
//!     fn draw_cache(&mut self, _c: CacheId, _b: Rect) {}
//!     fn free_cache(&mut self, _c: CacheId) {}
//! }
//!
//! let mut scene: Scene<NullBackend> = Scene::new(800, 600);
//! let root = scene.root();
//! let child = scene.tree_mut().create_node();
//! scene.tree_mut().add_child(root, child).unwrap();
//!
//! scene
//!     .add_view("main", SceneView::new(Rect::new(0.0, 0.0, 800.0, 600.0), 1.0))
//!     .unwrap();
//!
//! scene.tick(0.0, "default");
//! scene.destroy();
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod debug;
pub mod drag;
pub mod emitter;
pub mod error;
pub mod event;
pub mod focus;
pub mod frame;
pub mod hit;
pub mod interaction;
pub mod layout;
pub mod node;
pub mod paint;
pub mod scene;
pub mod scroll;
pub mod tree;
pub mod view;

pub use debug::{DebugChannel, DebugEvent};
pub use error::{SceneError, TreeError};
pub use event::{Event, EventKind};
pub use frame::{FrameDriver, Tickable, TickableId};
pub use node::{Display, DragConstraint, DragHitTestMode, NodeContent, NodeId};
pub use scene::Scene;
pub use tree::Tree;
pub use view::SceneView;
