// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint orchestration (§4.6) and the host-surface contract it paints
//! through (§6).
//!
//! [`PaintCtx`] is the dyn-safe trait a host paint backend implements; it is
//! acquired per-view per-layer by the host (§3.5, §6) and this crate never
//! instantiates one. [`paint_view`] walks the tree once per view, applying
//! visibility/frustum culling, the `DPR · Zoom · Pan · worldMatrix`
//! transform, effective alpha, blend mode, `clipContent`, and the
//! `cacheAsBitmap` shortcut, then recurses into children in their resolved
//! `(zIndex, uid)` order.

use alloc::vec::Vec;

use kurbo::{Affine, Rect};

use crate::error::TreeError;
use crate::node::NodeId;
use crate::tree::Tree;

/// Identifies a `cacheAsBitmap` container's offscreen raster to the backend.
/// Derived from the node's `uid`, which is stable for the node's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheId(pub u32);

/// Result of [`PaintCtx::measure_text`] (§6 `measureText`).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    pub font_bounding_box_ascent: Option<f64>,
    pub font_bounding_box_descent: Option<f64>,
}

/// The host-surface backend the paint orchestrator and [`crate::node::NodeContent::paint`]
/// implementations draw through (§6).
///
/// Path-building primitives (`beginPath`/`rect`/`arc`/...) are host-surface
/// concerns a `NodeContent` implementation reaches for directly through its
/// own richer handle on the same backend; the orchestrator itself only ever
/// needs the axis-aligned and state-stack operations below, plus the
/// cache-as-bitmap extension (§4.4) layered on top of the raw `save/restore`
/// contract.
pub trait PaintCtx {
    fn save(&mut self);
    fn restore(&mut self);
    /// Replaces the current transform outright (§6 `setTransform`).
    fn set_transform(&mut self, transform: Affine);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_blend_mode(&mut self, mode: &str);

    fn clear_rect(&mut self, rect: Rect);
    fn fill_rect(&mut self, rect: Rect);
    fn stroke_rect(&mut self, rect: Rect);

    /// Clips subsequent painting (until the matching [`Self::pop_clip`]) to
    /// `rect` in the current transform's space (§4.6 step 6).
    fn push_clip_rect(&mut self, rect: Rect);
    fn pop_clip(&mut self);

    fn measure_text(&mut self, text: &str) -> TextMetrics;
    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    /// Reads back pixels for hit-buffer sampling (§6, §4.7). `None` signals
    /// a backend refusal (e.g. cross-origin), which disables pixel-perfect
    /// hit testing for the remainder of the scene (§7, §4.15).
    fn get_image_data(&mut self, rect: Rect) -> Option<Vec<u8>>;

    /// Whether `cache` currently holds a usable raster (§4.4: "cache is
    /// valid"). A backend that has never built the cache, or has freed it,
    /// answers `false`.
    fn cache_is_valid(&self, cache: CacheId) -> bool;
    /// Redirects subsequent painting into `cache`'s offscreen raster, sized
    /// to `bounds` in the node's local space.
    fn begin_cache(&mut self, cache: CacheId, bounds: Rect);
    /// Stops redirecting into `cache` and marks its raster valid.
    fn end_cache(&mut self, cache: CacheId);
    /// Draws `cache`'s raster at `bounds` under the context's current
    /// transform/alpha/blend mode.
    fn draw_cache(&mut self, cache: CacheId, bounds: Rect);
    /// Releases `cache`'s raster (§5: "freed on `destroy`").
    fn free_cache(&mut self, cache: CacheId);
}

fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}

/// Paints one view of `tree` into `ctx` (§4.6). `device_transform` is the
/// view's `DPR · Zoom · Pan` (see [`canvas2d_view::View::device_transform`]);
/// `scene_view_rect` is that view's visible rectangle in scene space, used
/// for frustum culling.
pub fn paint_view(
    tree: &mut Tree,
    ctx: &mut dyn PaintCtx,
    device_transform: Affine,
    scene_view_rect: Rect,
) -> Result<(), TreeError> {
    paint_node(tree, tree.root(), ctx, device_transform, scene_view_rect, 1.0)
}

fn paint_node(
    tree: &mut Tree,
    id: NodeId,
    ctx: &mut dyn PaintCtx,
    device_transform: Affine,
    view_rect: Rect,
    parent_alpha: f64,
) -> Result<(), TreeError> {
    let node = tree.get(id)?;
    // 1. Visibility gate.
    if !node.is_effectively_visible() {
        return Ok(());
    }

    let is_leaf = node.children.is_empty();
    let world_bounds = node.world_bounds;
    // 2. Frustum cull: leaves always; containers only when `clipContent`
    // guarantees no child extends past them (§4.6 step 2).
    if (is_leaf || node.clip_content) && !rects_overlap(world_bounds, view_rect) {
        return Ok(());
    }

    let alpha = parent_alpha * node.alpha;
    let world = node.world_matrix;
    let blend_mode = node.blend_mode;
    let cache_as_bitmap = node.cache_as_bitmap;
    let local_bounds = node.local_bounds;
    let clip_content = node.clip_content;
    let cache = CacheId(node.uid);

    // 3. Save state, set transform/alpha/blend mode.
    ctx.save();
    ctx.set_transform(device_transform * world);
    ctx.set_global_alpha(alpha);
    ctx.set_blend_mode(blend_mode);

    // 4. Cache-as-bitmap shortcut: valid cache paints only the raster.
    if cache_as_bitmap && !tree.is_visual_dirty(id)? && ctx.cache_is_valid(cache) {
        ctx.draw_cache(cache, local_bounds);
        ctx.restore();
        return Ok(());
    }

    if cache_as_bitmap {
        ctx.begin_cache(cache, local_bounds);
    }

    // 5. This node's own content.
    tree.paint_content(id, ctx)?;

    // 6. Children, clipped if `clipContent`, in resolved (zIndex, uid) order.
    if !is_leaf {
        if clip_content {
            ctx.push_clip_rect(local_bounds);
        }
        let children = tree.get(id)?.children.clone();
        for child in children {
            paint_node(tree, child, ctx, device_transform, view_rect, alpha)?;
        }
        if clip_content {
            ctx.pop_clip();
        }
    }

    if cache_as_bitmap {
        ctx.end_cache(cache);
        ctx.draw_cache(cache, local_bounds);
    }
    tree.clear_visual_dirty(id)?;

    // 7. Restore state.
    ctx.restore();
    Ok(())
}

/// Frees a node's cache-as-bitmap raster, if it has one. Called by
/// [`crate::tree::Tree::destroy`]'s caller (the [`crate::scene::Scene`])
/// since the raster is backend-owned and the tree itself holds no backend
/// handle (§5: "freed on `destroy`").
pub fn free_node_cache(ctx: &mut dyn PaintCtx, uid: u32) {
    ctx.free_cache(CacheId(uid));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeContent;
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec;
    use core::cell::RefCell;

    struct RecordingBackend {
        log: RefCell<Vec<String>>,
        cache_valid: RefCell<alloc::collections::BTreeMap<u32, bool>>,
    }

    impl RecordingBackend {
        fn new() -> Self {
            Self {
                log: RefCell::new(Vec::new()),
                cache_valid: RefCell::new(alloc::collections::BTreeMap::new()),
            }
        }
    }

    impl PaintCtx for RecordingBackend {
        fn save(&mut self) {
            self.log.borrow_mut().push(String::from("save"));
        }
        fn restore(&mut self) {
            self.log.borrow_mut().push(String::from("restore"));
        }
        fn set_transform(&mut self, _transform: Affine) {}
        fn set_global_alpha(&mut self, _alpha: f64) {}
        fn set_blend_mode(&mut self, _mode: &str) {}
        fn clear_rect(&mut self, _rect: Rect) {}
        fn fill_rect(&mut self, _rect: Rect) {}
        fn stroke_rect(&mut self, _rect: Rect) {}
        fn push_clip_rect(&mut self, _rect: Rect) {
            self.log.borrow_mut().push(String::from("clip"));
        }
        fn pop_clip(&mut self) {
            self.log.borrow_mut().push(String::from("unclip"));
        }
        fn measure_text(&mut self, _text: &str) -> TextMetrics {
            TextMetrics::default()
        }
        fn fill_text(&mut self, _text: &str, _x: f64, _y: f64) {}
        fn get_image_data(&mut self, _rect: Rect) -> Option<Vec<u8>> {
            None
        }
        fn cache_is_valid(&self, cache: CacheId) -> bool {
            *self.cache_valid.borrow().get(&cache.0).unwrap_or(&false)
        }
        fn begin_cache(&mut self, _cache: CacheId, _bounds: Rect) {}
        fn end_cache(&mut self, cache: CacheId) {
            self.cache_valid.borrow_mut().insert(cache.0, true);
        }
        fn draw_cache(&mut self, _cache: CacheId, _bounds: Rect) {
            self.log.borrow_mut().push(String::from("draw_cache"));
        }
        fn free_cache(&mut self, cache: CacheId) {
            self.cache_valid.borrow_mut().remove(&cache.0);
        }
    }

    struct RecordingContent(alloc::rc::Rc<RefCell<u32>>);

    impl NodeContent for RecordingContent {
        fn paint(&mut self, _ctx: &mut dyn PaintCtx) {
            *self.0.borrow_mut() += 1;
        }
    }

    #[test]
    fn invisible_node_paints_nothing() {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.set_visible(root, false).unwrap();
        let mut backend = RecordingBackend::new();
        paint_view(&mut tree, &mut backend, Affine::IDENTITY, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        assert!(backend.log.borrow().is_empty());
    }

    #[test]
    fn leaf_outside_view_rect_is_culled() {
        let mut tree = Tree::new();
        let root = tree.root();
        let far = tree.create_node();
        tree.add_child(root, far).unwrap();
        tree.set_x(far, 10_000.0).unwrap();
        tree.set_width(far, 10.0).unwrap();
        tree.set_height(far, 10.0).unwrap();
        tree.resolve_frame().unwrap();

        let mut backend = RecordingBackend::new();
        paint_view(&mut tree, &mut backend, Affine::IDENTITY, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        // Root still saves/restores; the culled child contributes nothing.
        assert_eq!(backend.log.borrow().len(), 2);
    }

    #[test]
    fn cache_as_bitmap_paints_content_once_then_reuses_the_raster() {
        let mut tree = Tree::new();
        let root = tree.root();
        let cached = tree.create_node();
        tree.add_child(root, cached).unwrap();
        tree.set_cache_as_bitmap(cached, true).unwrap();
        let calls = alloc::rc::Rc::new(RefCell::new(0));
        tree.set_content(cached, Box::new(RecordingContent(calls.clone()))).unwrap();
        tree.resolve_frame().unwrap();

        let mut backend = RecordingBackend::new();
        let rect = Rect::new(0.0, 0.0, 200.0, 200.0);
        paint_view(&mut tree, &mut backend, Affine::IDENTITY, rect).unwrap();
        assert_eq!(*calls.borrow(), 1);

        paint_view(&mut tree, &mut backend, Affine::IDENTITY, rect).unwrap();
        assert_eq!(*calls.borrow(), 1, "second paint reuses the now-valid cache");
        assert!(backend.log.borrow().iter().any(|e| e == "draw_cache"));
    }

    #[test]
    fn invalidating_cache_repaints_content() {
        let mut tree = Tree::new();
        let root = tree.root();
        let cached = tree.create_node();
        tree.add_child(root, cached).unwrap();
        tree.set_cache_as_bitmap(cached, true).unwrap();
        let calls = alloc::rc::Rc::new(RefCell::new(0));
        tree.set_content(cached, Box::new(RecordingContent(calls.clone()))).unwrap();
        tree.resolve_frame().unwrap();

        let mut backend = RecordingBackend::new();
        let rect = Rect::new(0.0, 0.0, 200.0, 200.0);
        paint_view(&mut tree, &mut backend, Affine::IDENTITY, rect).unwrap();
        assert_eq!(*calls.borrow(), 1);

        tree.set_alpha(cached, 0.5, &mut crate::debug::DebugChannel::default()).unwrap();
        paint_view(&mut tree, &mut backend, Affine::IDENTITY, rect).unwrap();
        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    fn clip_content_pushes_and_pops_a_clip_around_children() {
        let mut tree = Tree::new();
        let root = tree.root();
        let container = tree.create_node();
        let child = tree.create_node();
        tree.add_child(root, container).unwrap();
        tree.add_child(container, child).unwrap();
        tree.set_clip_content(container, true).unwrap();
        tree.resolve_frame().unwrap();

        let mut backend = RecordingBackend::new();
        paint_view(&mut tree, &mut backend, Affine::IDENTITY, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        let log = backend.log.borrow();
        assert!(log.iter().any(|e| e == "clip"));
        assert!(log.iter().any(|e| e == "unclip"));
    }
}
