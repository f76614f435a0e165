// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node data (§3.1) and its container extension (§3.2).
//!
//! `Node` itself is a plain data record; every field that participates in
//! the dirty pipeline (§4.1) is mutated exclusively through
//! [`crate::tree::Tree`]'s setters, never directly, so that dirty-bit and
//! cache-bubble bookkeeping can't be skipped by reaching around them.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use canvas2d_dirty::DirtyFlags;
use canvas2d_index::EntryId;
use canvas2d_layout::style::Style;
use kurbo::{Affine, Rect};

/// A generational handle identifying a node inside a [`crate::tree::Tree`].
///
/// Generational so a handle retained across a `destroy()`/slot-reuse cannot
/// silently alias an unrelated later node (§4.15 "GC'd Scene..." and the
/// general arena discipline used throughout this workspace).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: usize, generation: u32) -> Self {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "node indices are intentionally 32-bit"
        )]
        Self(idx as u32, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// `display` (§3.1): independent of `visible`/layout, only gates paint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Display {
    Visible,
    Hidden,
}

impl Default for Display {
    fn default() -> Self {
        Self::Visible
    }
}

/// Axis a drag is constrained to (§3.1 `dragConstraint`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragConstraint {
    None,
    X,
    Y,
}

impl Default for DragConstraint {
    fn default() -> Self {
        Self::None
    }
}

/// Strategy the drag manager's drop-target search uses for this node's own
/// bounds test (§3.1 `dragHitTestMode`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragHitTestMode {
    Aabb,
    Quad,
}

impl Default for DragHitTestMode {
    fn default() -> Self {
        Self::Aabb
    }
}

/// A geometry/text/image collaborator a node defers to for the operations
/// §6 describes: content-driven intrinsic sizing, precise containment, and
/// its own paint. Generic nodes (no content) behave as if every method
/// returned its default.
pub trait NodeContent {
    /// §6 `getMinContentWidth()`, consulted when style `width` is `auto`.
    fn min_content_width(&self) -> f64 {
        0.0
    }
    /// §6 `getMaxContentWidth()`.
    fn max_content_width(&self) -> f64 {
        0.0
    }
    /// Intrinsic size reported to the layout resolver for a leaf whose
    /// `width`/`height` are both `auto` (§4.5 pass 1).
    fn intrinsic_size(&self) -> kurbo::Size {
        kurbo::Size::ZERO
    }
    /// §6 `containsPoint(localX, localY)`, used by the geometric
    /// narrow-phase fallback (§4.9) in place of the default rectangle test.
    fn contains_point(&self, local_x: f64, local_y: f64) -> bool {
        let _ = (local_x, local_y);
        false
    }
    /// §6 `paint(ctx)`.
    fn paint(&mut self, ctx: &mut dyn crate::paint::PaintCtx);
}

/// A single scene-graph participant (§3.1) plus, when it owns children, the
/// container extension (§3.2). Every node is a potential container: an
/// empty `children` list is simply a leaf.
pub struct Node {
    pub(crate) id: Option<String>,
    pub(crate) uid: u32,

    // Transform (§3.1).
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) rotation: f64,
    pub(crate) scale_x: f64,
    pub(crate) scale_y: f64,
    pub(crate) skew_x: f64,
    pub(crate) skew_y: f64,
    pub(crate) pivot_x: f64,
    pub(crate) pivot_y: f64,

    // Size and local bounds.
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) local_bounds: Rect,
    /// `true` while `local_bounds` tracks `(0,0,width,height)` automatically;
    /// cleared by an explicit `set_local_bounds` override (§3.1: "default
    /// `(0,0,width,height)`; geometry-bearing subclasses override").
    pub(crate) local_bounds_auto: bool,

    // Visual state.
    pub(crate) visible: bool,
    pub(crate) display: Display,
    pub(crate) alpha: f64,
    pub(crate) z_index: i32,
    pub(crate) blend_mode: &'static str,
    pub(crate) cache_as_bitmap: bool,

    // Computed caches.
    pub(crate) local_matrix: Affine,
    pub(crate) world_matrix: Affine,
    pub(crate) world_bounds: Rect,

    // Interaction (§3.1).
    pub(crate) interactive: bool,
    pub(crate) focusable: bool,
    pub(crate) draggable: bool,
    pub(crate) drag_constraint: DragConstraint,
    pub(crate) drag_hit_test_mode: DragHitTestMode,
    pub(crate) cursor: &'static str,

    // Layout style (§3.3).
    pub(crate) style: Style,

    // Container extension (§3.2).
    pub(crate) clip_content: bool,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,

    // Scroll container state, present only on nodes `make_scroll_container`
    // has been called on (§4.13).
    pub(crate) scroll: Option<crate::scroll::ScrollState>,

    pub(crate) dirty: DirtyFlags,
    pub(crate) spatial_entry: Option<EntryId>,

    pub(crate) content: Option<Box<dyn NodeContent>>,
    pub(crate) emitter: crate::emitter::Emitter,
}

impl Node {
    pub(crate) fn new(uid: u32) -> Self {
        Self {
            id: None,
            uid,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            skew_x: 0.0,
            skew_y: 0.0,
            pivot_x: 0.0,
            pivot_y: 0.0,
            width: 0.0,
            height: 0.0,
            local_bounds: Rect::ZERO,
            local_bounds_auto: true,
            visible: true,
            display: Display::default(),
            alpha: 1.0,
            z_index: 0,
            blend_mode: "source-over",
            cache_as_bitmap: false,
            local_matrix: Affine::IDENTITY,
            world_matrix: Affine::IDENTITY,
            world_bounds: Rect::ZERO,
            interactive: true,
            focusable: false,
            draggable: false,
            drag_constraint: DragConstraint::default(),
            drag_hit_test_mode: DragHitTestMode::default(),
            cursor: "default",
            style: Style::default(),
            clip_content: false,
            children: Vec::new(),
            parent: None,
            scroll: None,
            // Initial value at construction = all bits set (§3.1).
            dirty: DirtyFlags::all(),
            spatial_entry: None,
            content: None,
            emitter: crate::emitter::Emitter::new(),
        }
    }

    #[must_use]
    pub fn uid(&self) -> u32 {
        self.uid
    }

    #[must_use]
    pub fn string_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn world_matrix(&self) -> Affine {
        self.world_matrix
    }

    #[must_use]
    pub fn world_bounds(&self) -> Rect {
        self.world_bounds
    }

    #[must_use]
    pub fn local_bounds(&self) -> Rect {
        self.local_bounds
    }

    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn display(&self) -> Display {
        self.display
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[must_use]
    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    #[must_use]
    pub fn interactive(&self) -> bool {
        self.interactive
    }

    #[must_use]
    pub fn focusable(&self) -> bool {
        self.focusable
    }

    #[must_use]
    pub fn draggable(&self) -> bool {
        self.draggable
    }

    #[must_use]
    pub fn cursor(&self) -> &'static str {
        self.cursor
    }

    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    #[must_use]
    pub fn clip_content(&self) -> bool {
        self.clip_content
    }

    #[must_use]
    pub fn cache_as_bitmap(&self) -> bool {
        self.cache_as_bitmap
    }

    /// The paint/hit-visibility test shared by §4.6 step 1 and hover/click
    /// gating: a node that fails this never paints and never receives a
    /// hit regardless of interactivity.
    #[must_use]
    pub fn is_effectively_visible(&self) -> bool {
        self.visible && self.alpha > 0.0 && matches!(self.display, Display::Visible)
    }
}
