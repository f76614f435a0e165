// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The node/container arena (§3.1, §3.2): generational slot storage, every
//! mutation setter in §4.1's dirty table, container operations (§4.2), and
//! the top-down frame-resolution walk (§4.1) that recomposes transforms and
//! refreshes the spatial index.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use canvas2d_dirty::{DirtyFlags, mark};
use canvas2d_geom::{compose_local, transform_aabb};
use canvas2d_index::{Aabb, SpatialGrid};
use canvas2d_layout::style::Style;
use hashbrown::HashMap;
use kurbo::{Affine, Rect};

use crate::debug::{DebugChannel, DebugEvent};
use crate::error::TreeError;
use crate::node::{DragConstraint, DragHitTestMode, Display, Node, NodeContent, NodeId};

struct Slot {
    generation: u32,
    node: Node,
}

fn node_aabb(owner: NodeId, rect: Rect) -> (NodeId, Aabb) {
    (owner, Aabb::new(rect.x0, rect.y0, rect.x1, rect.y1))
}

/// Generates a simple transform-field setter: no-op on an unchanged value,
/// otherwise stores it and runs the self-mark/cascade/cache-bubble sequence
/// shared by every decomposed transform property (§4.1).
macro_rules! transform_setter {
    ($name:ident, $field:ident) => {
        pub fn $name(&mut self, id: NodeId, value: f64) -> Result<(), TreeError> {
            let node = self.get_mut(id)?;
            if (node.$field - value).abs() <= f64::EPSILON {
                return Ok(());
            }
            node.$field = value;
            self.mark_transform_self_and_cascade(id)
        }
    };
}

/// The node/container arena plus the per-frame transform/spatial pipeline.
///
/// One tree backs one scene; a root container is created on construction and
/// never destroyed through the public API (§3.2: "the root is always a
/// container and is never itself removed").
pub struct Tree {
    slots: Vec<Option<Slot>>,
    free_list: Vec<usize>,
    next_uid: u32,
    root: NodeId,
    string_ids: HashMap<String, NodeId>,
    spatial: SpatialGrid<NodeId>,
}

impl Tree {
    #[must_use]
    pub fn new() -> Self {
        let mut slots = Vec::new();
        slots.push(Some(Slot {
            generation: 1,
            node: Node::new(1),
        }));
        Self {
            slots,
            free_list: Vec::new(),
            next_uid: 2,
            root: NodeId::new(0, 1),
            string_ids: HashMap::new(),
            spatial: SpatialGrid::new(canvas2d_index::DEFAULT_CELL_SIZE),
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn slot(&self, id: NodeId) -> Result<&Slot, TreeError> {
        self.slots
            .get(id.idx())
            .and_then(Option::as_ref)
            .filter(|s| s.generation == id.generation())
            .ok_or(TreeError::UnknownNode)
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut Slot, TreeError> {
        self.slots
            .get_mut(id.idx())
            .and_then(Option::as_mut)
            .filter(|s| s.generation == id.generation())
            .ok_or(TreeError::UnknownNode)
    }

    pub fn get(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.slot(id).map(|s| &s.node)
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.slot_mut(id).map(|s| &mut s.node)
    }

    /// Looks up a node by its optional string `id` (§3.4 `getElementById`).
    #[must_use]
    pub fn find_by_string_id(&self, id: &str) -> Option<NodeId> {
        self.string_ids.get(id).copied()
    }

    /// Sets (or clears, with `None`) a node's string `id`.
    pub fn set_string_id(&mut self, id: NodeId, new_id: Option<String>) -> Result<(), TreeError> {
        let old = self.get(id)?.id.clone();
        if let Some(old) = old {
            self.string_ids.remove(&old);
        }
        if let Some(ref new_id) = new_id {
            self.string_ids.insert(new_id.clone(), id);
        }
        self.get_mut(id)?.id = new_id;
        Ok(())
    }

    /// Creates a detached node (no parent), returning its handle.
    pub fn create_node(&mut self) -> NodeId {
        let uid = self.next_uid;
        self.next_uid += 1;
        let slot_idx = if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            self.slots.push(None);
            self.slots.len() - 1
        };
        let generation = self.slots[slot_idx]
            .as_ref()
            .map_or(1, |s| s.generation.wrapping_add(1).max(1));
        self.slots[slot_idx] = Some(Slot {
            generation,
            node: Node::new(uid),
        });
        NodeId::new(slot_idx, generation)
    }

    /// Attaches a [`NodeContent`] implementation to an existing node.
    pub fn set_content(&mut self, id: NodeId, content: Box<dyn NodeContent>) -> Result<(), TreeError> {
        self.get_mut(id)?.content = Some(content);
        Ok(())
    }

    // ---- Container operations (§4.2) ----

    /// Appends `child` as the last child of `parent`. If `child` is already
    /// a child of `parent`, moves it to the end instead of duplicating it
    /// (§4.2: "re-adding to the same parent moves position, never
    /// duplicates").
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.add_child_at(parent, child, self.get(parent)?.children.len())
    }

    /// Inserts `child` at `index` among `parent`'s children, detaching it
    /// from any previous parent first. If `child` is already a child of
    /// `parent`, this repositions it rather than duplicating it (§4.2).
    pub fn add_child_at(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<(), TreeError> {
        self.get(parent)?;
        self.get(child)?;
        self.detach(child)?;
        let parent_node = self.get_mut(parent)?;
        let index = index.min(parent_node.children.len());
        parent_node.children.insert(index, child);
        self.get_mut(child)?.parent = Some(parent);
        self.mark_order(parent)?;
        self.mark_transform_self_and_cascade(child)?;
        Ok(())
    }

    fn detach(&mut self, child: NodeId) -> Result<(), TreeError> {
        if let Some(old_parent) = self.get(child)?.parent {
            if let Ok(p) = self.get_mut(old_parent) {
                p.children.retain(|&c| c != child);
            }
            self.mark_order(old_parent)?;
        }
        self.get_mut(child)?.parent = None;
        Ok(())
    }

    /// Removes `child` from `parent`'s children (and destroys its subtree).
    /// A no-op if `child` is not currently a child of `parent` (§4.15:
    /// "`removeChild` on a node that is not a child: silent no-op").
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let is_child = self.get(parent)?.children.contains(&child);
        if !is_child {
            return Ok(());
        }
        self.get_mut(parent)?.children.retain(|&c| c != child);
        self.mark_order(parent)?;
        self.destroy(child)
    }

    /// Destroys every child of `parent`, leaving it empty.
    pub fn remove_all_children(&mut self, parent: NodeId) -> Result<(), TreeError> {
        let children = self.get(parent)?.children.clone();
        for child in children {
            self.destroy(child)?;
        }
        self.get_mut(parent)?.children.clear();
        self.mark_order(parent)?;
        Ok(())
    }

    /// Finds an immediate child by string id, `None` if absent (§4.2
    /// `getChildById`).
    #[must_use]
    pub fn get_child_by_id(&self, parent: NodeId, id: &str) -> Option<NodeId> {
        let node = self.get(parent).ok()?;
        node.children
            .iter()
            .copied()
            .find(|&c| self.get(c).is_ok_and(|n| n.id.as_deref() == Some(id)))
    }

    /// Destroys `id` and its entire subtree: frees every slot, removes
    /// spatial-index entries, detaches from its parent, and drops string-id
    /// registrations. Destroying an already-destroyed/unknown handle is a
    /// no-op (§4.15).
    pub fn destroy(&mut self, id: NodeId) -> Result<(), TreeError> {
        let Ok(node) = self.get(id) else {
            return Ok(());
        };
        let children = node.children.clone();
        let spatial_entry = node.spatial_entry;
        let string_id = node.id.clone();
        let parent = node.parent;

        for child in children {
            self.destroy(child)?;
        }
        if let Some(entry) = spatial_entry {
            self.spatial.remove(entry);
        }
        if let Some(string_id) = string_id {
            self.string_ids.remove(&string_id);
        }
        if let Some(parent) = parent {
            if let Ok(p) = self.get_mut(parent) {
                p.children.retain(|&c| c != id);
            }
        }
        self.slots[id.idx()] = None;
        self.free_list.push(id.idx());
        Ok(())
    }

    // ---- Dirty-bit mutation table (§4.1) ----

    fn mark_self(&mut self, id: NodeId, bits: DirtyFlags) -> Result<bool, TreeError> {
        let node = self.get_mut(id)?;
        Ok(mark(&mut node.dirty, bits))
    }

    /// Sets `bits` on `id` directly, without any of the setter-specific
    /// cascade/bubble rules. Used by [`crate::scene::Scene::resize`] to mark
    /// the root `Layout + Transform` dirty after a viewport size change
    /// (§6 `resize`).
    pub fn mark_dirty(&mut self, id: NodeId, bits: DirtyFlags) -> Result<(), TreeError> {
        self.mark_self(id, bits)?;
        Ok(())
    }

    fn mark_order(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.mark_self(id, DirtyFlags::ORDER)?;
        Ok(())
    }

    fn mark_parent_layout(&mut self, id: NodeId) -> Result<(), TreeError> {
        if let Some(parent) = self.get(id)?.parent {
            self.mark_self(parent, DirtyFlags::LAYOUT)?;
        }
        Ok(())
    }

    fn mark_parent_order(&mut self, id: NodeId) -> Result<(), TreeError> {
        if let Some(parent) = self.get(id)?.parent {
            self.mark_self(parent, DirtyFlags::ORDER)?;
        }
        Ok(())
    }

    /// Walks up from `id` to the nearest `cacheAsBitmap` ancestor and marks
    /// it `Visual` (§4.4): "the only cross-component action performed by a
    /// mutation setter".
    fn bubble_cache_visual(&mut self, id: NodeId) -> Result<(), TreeError> {
        let mut current = self.get(id)?.parent;
        while let Some(pid) = current {
            let node = self.get(pid)?;
            if node.cache_as_bitmap {
                self.mark_self(pid, DirtyFlags::VISUAL)?;
                break;
            }
            current = node.parent;
        }
        Ok(())
    }

    /// Sets `Transform` on `id` and cascades it to every descendant not
    /// already marked, maintaining the invariant "if `Transform` is set on a
    /// node, it is also set on every descendant" continuously rather than
    /// only at frame-resolution time (§4.1).
    fn mark_transform_self_and_cascade(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.mark_self(id, DirtyFlags::TRANSFORM)?;
        self.cascade_transform_to_descendants(id)?;
        self.bubble_cache_visual(id)?;
        Ok(())
    }

    fn cascade_transform_to_descendants(&mut self, id: NodeId) -> Result<(), TreeError> {
        let children = self.get(id)?.children.clone();
        for child in children {
            if self.mark_self(child, DirtyFlags::TRANSFORM)? {
                self.cascade_transform_to_descendants(child)?;
            }
        }
        Ok(())
    }

    transform_setter!(set_x, x);
    transform_setter!(set_y, y);
    transform_setter!(set_rotation, rotation);
    transform_setter!(set_skew_x, skew_x);
    transform_setter!(set_skew_y, skew_y);
    transform_setter!(set_pivot_x, pivot_x);
    transform_setter!(set_pivot_y, pivot_y);

    /// `scaleX`: zero is coerced to [`canvas2d_geom::MIN_SCALE`] on read
    /// (§3.1), recorded here via a debug event when the caller's literal
    /// request was exactly zero.
    pub fn set_scale_x(&mut self, id: NodeId, value: f64, debug: &mut DebugChannel) -> Result<(), TreeError> {
        self.set_scale_component(id, value, true, debug)
    }

    pub fn set_scale_y(&mut self, id: NodeId, value: f64, debug: &mut DebugChannel) -> Result<(), TreeError> {
        self.set_scale_component(id, value, false, debug)
    }

    fn set_scale_component(
        &mut self,
        id: NodeId,
        value: f64,
        is_x: bool,
        debug: &mut DebugChannel,
    ) -> Result<(), TreeError> {
        let uid = self.get(id)?.uid;
        let node = self.get_mut(id)?;
        let old = if is_x { node.scale_x } else { node.scale_y };
        if (old - value).abs() <= f64::EPSILON {
            return Ok(());
        }
        if is_x {
            node.scale_x = value;
        } else {
            node.scale_y = value;
        }
        if value == 0.0 {
            debug.push(DebugEvent::ScaleCoerced { node: uid });
        }
        self.mark_transform_self_and_cascade(id)
    }

    /// `width`/`height`: marks `Visual` on self and `Layout` on the parent
    /// (§4.1), and updates `local_bounds` while it's still in automatic mode.
    pub fn set_width(&mut self, id: NodeId, value: f64) -> Result<(), TreeError> {
        self.set_size(id, Some(value), None)
    }

    pub fn set_height(&mut self, id: NodeId, value: f64) -> Result<(), TreeError> {
        self.set_size(id, None, Some(value))
    }

    fn set_size(&mut self, id: NodeId, width: Option<f64>, height: Option<f64>) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        let new_width = width.unwrap_or(node.width);
        let new_height = height.unwrap_or(node.height);
        if (node.width - new_width).abs() <= f64::EPSILON && (node.height - new_height).abs() <= f64::EPSILON {
            return Ok(());
        }
        node.width = new_width;
        node.height = new_height;
        if node.local_bounds_auto {
            node.local_bounds = Rect::new(0.0, 0.0, node.width.max(0.0), node.height.max(0.0));
        }
        self.mark_self(id, DirtyFlags::VISUAL | DirtyFlags::SPATIAL)?;
        self.bubble_cache_visual(id)?;
        self.mark_parent_layout(id)
    }

    /// Overrides `local_bounds` explicitly, taking it out of automatic
    /// `(0,0,width,height)` tracking (§3.1).
    pub fn set_local_bounds(&mut self, id: NodeId, bounds: Rect) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        node.local_bounds = bounds;
        node.local_bounds_auto = false;
        self.mark_self(id, DirtyFlags::VISUAL | DirtyFlags::SPATIAL)?;
        self.bubble_cache_visual(id)
    }

    /// `visible`: marks `Visual` on self and `Layout` on the parent (§4.1).
    pub fn set_visible(&mut self, id: NodeId, value: bool) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        if node.visible == value {
            return Ok(());
        }
        node.visible = value;
        self.mark_self(id, DirtyFlags::VISUAL)?;
        self.bubble_cache_visual(id)?;
        self.mark_parent_layout(id)
    }

    /// `display`: marks `Visual` only (§4.1: "independent of layout").
    pub fn set_display(&mut self, id: NodeId, value: Display) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        if node.display == value {
            return Ok(());
        }
        node.display = value;
        self.mark_self(id, DirtyFlags::VISUAL)?;
        self.bubble_cache_visual(id)
    }

    /// `alpha`: clamped to `[0,1]`, marks `Visual` (§4.1, §4.15: clamped
    /// assignments outside range never error, recorded via debug event).
    pub fn set_alpha(&mut self, id: NodeId, value: f64, debug: &mut DebugChannel) -> Result<(), TreeError> {
        let uid = self.get(id)?.uid;
        let clamped = value.clamp(0.0, 1.0);
        let node = self.get_mut(id)?;
        if (node.alpha - clamped).abs() <= f64::EPSILON {
            return Ok(());
        }
        node.alpha = clamped;
        if (clamped - value).abs() > f64::EPSILON {
            debug.push(DebugEvent::AlphaClamped { node: uid, requested: value });
        }
        self.mark_self(id, DirtyFlags::VISUAL)?;
        self.bubble_cache_visual(id)
    }

    /// `blendMode`: marks `Visual` (§4.1).
    pub fn set_blend_mode(&mut self, id: NodeId, value: &'static str) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        if node.blend_mode == value {
            return Ok(());
        }
        node.blend_mode = value;
        self.mark_self(id, DirtyFlags::VISUAL)?;
        self.bubble_cache_visual(id)
    }

    /// `cacheAsBitmap`: marks `Visual` (§4.1, §4.4).
    pub fn set_cache_as_bitmap(&mut self, id: NodeId, value: bool) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        if node.cache_as_bitmap == value {
            return Ok(());
        }
        node.cache_as_bitmap = value;
        self.mark_self(id, DirtyFlags::VISUAL)?;
        self.bubble_cache_visual(id)
    }

    /// `zIndex`: marks `Visual` on self and `Order` on the parent (§4.1).
    pub fn set_z_index(&mut self, id: NodeId, value: i32) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        if node.z_index == value {
            return Ok(());
        }
        node.z_index = value;
        self.mark_self(id, DirtyFlags::VISUAL)?;
        self.bubble_cache_visual(id)?;
        self.mark_parent_order(id)
    }

    /// Any style field: marks `Layout` on self only (§4.1).
    pub fn set_style(&mut self, id: NodeId, style: Style) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        node.style = style;
        self.mark_self(id, DirtyFlags::LAYOUT)?;
        Ok(())
    }

    pub fn set_clip_content(&mut self, id: NodeId, value: bool) -> Result<(), TreeError> {
        self.get_mut(id)?.clip_content = value;
        Ok(())
    }

    pub fn set_interactive(&mut self, id: NodeId, value: bool) -> Result<(), TreeError> {
        self.get_mut(id)?.interactive = value;
        Ok(())
    }

    pub fn set_focusable(&mut self, id: NodeId, value: bool) -> Result<(), TreeError> {
        self.get_mut(id)?.focusable = value;
        Ok(())
    }

    pub fn set_draggable(&mut self, id: NodeId, value: bool) -> Result<(), TreeError> {
        self.get_mut(id)?.draggable = value;
        Ok(())
    }

    pub fn set_drag_constraint(&mut self, id: NodeId, value: DragConstraint) -> Result<(), TreeError> {
        self.get_mut(id)?.drag_constraint = value;
        Ok(())
    }

    pub fn set_drag_hit_test_mode(&mut self, id: NodeId, value: DragHitTestMode) -> Result<(), TreeError> {
        self.get_mut(id)?.drag_hit_test_mode = value;
        Ok(())
    }

    pub fn set_cursor(&mut self, id: NodeId, value: &'static str) -> Result<(), TreeError> {
        self.get_mut(id)?.cursor = value;
        Ok(())
    }

    /// Turns `id` into a scroll container, giving it fresh [`crate::scroll::ScrollState`].
    pub fn make_scroll_container(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.get_mut(id)?.scroll = Some(crate::scroll::ScrollState::new());
        Ok(())
    }

    pub fn scroll_state(&self, id: NodeId) -> Result<Option<&crate::scroll::ScrollState>, TreeError> {
        Ok(self.get(id)?.scroll.as_ref())
    }

    pub fn scroll_state_mut(&mut self, id: NodeId) -> Result<Option<&mut crate::scroll::ScrollState>, TreeError> {
        Ok(self.get_mut(id)?.scroll.as_mut())
    }

    /// Scrolling a container displaces its children's effective world
    /// position; mark them `Transform`-dirty whenever the offset changes
    /// (§4.13: `worldMatrixForChildren = worldMatrix · T(-scrollX,-scrollY)`).
    pub fn mark_scroll_children_dirty(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.mark_self(id, DirtyFlags::TRANSFORM)?;
        self.cascade_transform_to_descendants(id)
    }

    /// Root→`id` path, inclusive of both ends (§4.10, §4.11: the sequence
    /// the responder router expands into capture/target/bubble).
    pub fn path_to_root(&self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            path.push(node_id);
            current = self.get(node_id)?.parent;
        }
        path.reverse();
        Ok(path)
    }

    /// Fires every listener `id` has registered on `channel` (§4.10).
    pub fn emit(&mut self, id: NodeId, channel: &str, event: &mut crate::event::Event) -> Result<(), TreeError> {
        self.get_mut(id)?.emitter.emit(channel, event);
        Ok(())
    }

    /// Registers a persistent listener on `id`'s `channel` (§4.10).
    pub fn on(
        &mut self,
        id: NodeId,
        channel: &str,
        handler: impl FnMut(&mut crate::event::Event) + 'static,
    ) -> Result<crate::emitter::ListenerId, TreeError> {
        Ok(self.get_mut(id)?.emitter.on(channel, handler))
    }

    /// Registers a listener that removes itself after its first invocation
    /// (§4.10 `once`).
    pub fn once(
        &mut self,
        id: NodeId,
        channel: &str,
        handler: impl FnMut(&mut crate::event::Event) + 'static,
    ) -> Result<crate::emitter::ListenerId, TreeError> {
        Ok(self.get_mut(id)?.emitter.once(channel, handler))
    }

    /// Unregisters a listener (§4.10 `off`, idempotent for a missing handle).
    pub fn off(&mut self, id: NodeId, channel: &str, listener: crate::emitter::ListenerId) -> Result<(), TreeError> {
        self.get_mut(id)?.emitter.off(channel, listener);
        Ok(())
    }

    // ---- Paint support (§4.4, §4.6) ----

    /// Whether `id`'s `Visual` bit is still set — for a `cacheAsBitmap`
    /// container this is exactly "cache invalid" (§4.1: "Other bits
    /// (Visual, ...) are consumed by their respective orchestrators").
    pub fn is_visual_dirty(&self, id: NodeId) -> Result<bool, TreeError> {
        Ok(self.get(id)?.dirty.contains(DirtyFlags::VISUAL))
    }

    /// Consumes `id`'s `Visual` bit once the paint orchestrator has repainted
    /// it (or rebuilt its cache).
    pub(crate) fn clear_visual_dirty(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.get_mut(id)?.dirty.remove(DirtyFlags::VISUAL);
        Ok(())
    }

    /// Consumes `id`'s `Layout` bit once the layout resolver has measured
    /// and arranged it (§4.1, §4.5).
    pub(crate) fn clear_layout_dirty(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.get_mut(id)?.dirty.remove(DirtyFlags::LAYOUT);
        Ok(())
    }

    /// Runs `id`'s attached [`NodeContent::paint`], temporarily taking the
    /// content out of the slot so the call can borrow `ctx` without aliasing
    /// `self` (mirrors [`crate::emitter::Emitter::emit`]'s take-then-replace
    /// pattern). A no-op for content-less nodes.
    pub(crate) fn paint_content(&mut self, id: NodeId, ctx: &mut dyn crate::paint::PaintCtx) -> Result<(), TreeError> {
        let mut content = self.get_mut(id)?.content.take();
        if let Some(c) = content.as_mut() {
            c.paint(ctx);
        }
        self.get_mut(id)?.content = content;
        Ok(())
    }

    // ---- Frame resolution (§4.1) ----

    /// Runs the top-down resolution pass rooted at [`Self::root`]: sorts
    /// dirty-`Order` containers, recomposes dirty-`Transform` matrices, and
    /// refreshes the spatial index for nodes whose world bounds moved.
    pub fn resolve_frame(&mut self) -> Result<(), TreeError> {
        self.resolve_node(self.root, Affine::IDENTITY)
    }

    fn resolve_node(&mut self, id: NodeId, parent_world: Affine) -> Result<(), TreeError> {
        // 1. Order: stable sort by (zIndex, uid), clear Order.
        if self.get(id)?.dirty.contains(DirtyFlags::ORDER) {
            let children = self.get(id)?.children.clone();
            let mut with_keys: Vec<(i32, u32, NodeId)> = Vec::with_capacity(children.len());
            for child in children {
                let c = self.get(child)?;
                with_keys.push((c.z_index, c.uid, child));
            }
            with_keys.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
            let node = self.get_mut(id)?;
            node.children = with_keys.into_iter().map(|(_, _, c)| c).collect();
            node.dirty.remove(DirtyFlags::ORDER);
        }

        // 2. Transform: recompose local/world matrix, clear Transform.
        let world = if self.get(id)?.dirty.contains(DirtyFlags::TRANSFORM) {
            let node = self.get(id)?;
            let local = compose_local(
                node.x, node.y, node.rotation, node.scale_x, node.scale_y, node.skew_x, node.skew_y, node.pivot_x,
                node.pivot_y,
            );
            let world = parent_world * local;
            let node = self.get_mut(id)?;
            node.local_matrix = local;
            node.world_matrix = world;
            node.dirty.remove(DirtyFlags::TRANSFORM);
            node.dirty.insert(DirtyFlags::SPATIAL);
            world
        } else {
            self.get(id)?.world_matrix
        };

        // Spatial: refresh world bounds + broad-phase index entry.
        if self.get(id)?.dirty.contains(DirtyFlags::SPATIAL) {
            let node = self.get(id)?;
            let bounds = transform_aabb(world, node.local_bounds);
            let interactive_leaf = node.interactive && node.is_effectively_visible();
            let spatial_entry = node.spatial_entry;
            self.get_mut(id)?.world_bounds = bounds;
            if interactive_leaf {
                let (owner, aabb) = node_aabb(id, bounds);
                if let Some(entry) = spatial_entry {
                    self.spatial.update(entry, aabb);
                } else {
                    let entry = self.spatial.insert(owner, aabb);
                    self.get_mut(id)?.spatial_entry = Some(entry);
                }
            } else if let Some(entry) = spatial_entry {
                self.spatial.remove(entry);
                self.get_mut(id)?.spatial_entry = None;
            }
            self.get_mut(id)?.dirty.remove(DirtyFlags::SPATIAL);
        }

        // 3. Recurse unconditionally.
        let children = self.get(id)?.children.clone();
        let world_for_children = self.world_for_children(id, world)?;
        for child in children {
            self.resolve_node(child, world_for_children)?;
        }
        Ok(())
    }

    /// The matrix a node's children compose their own world matrix against:
    /// ordinarily just the node's own `world_matrix`, but offset by
    /// `-scroll` for a scroll container (§4.13).
    fn world_for_children(&self, id: NodeId, world: Affine) -> Result<Affine, TreeError> {
        let node = self.get(id)?;
        Ok(match &node.scroll {
            Some(scroll) => world * Affine::translate((-scroll.scroll_x, -scroll.scroll_y)),
            None => world,
        })
    }

    /// Broad-phase point query (§4.8, §4.9): every interactive node whose
    /// world AABB contains `(x, y)`.
    pub fn query_point(&self, x: f64, y: f64, out: &mut Vec<NodeId>) {
        self.spatial.query_point(x, y, out);
    }

    /// Broad-phase rect query, used by AABB-mode hit testing during drag
    /// (§4.9 `hitTestAABB`).
    pub fn query_aabb(&self, rect: Rect, out: &mut Vec<NodeId>) {
        self.spatial
            .query_aabb(Aabb::new(rect.x0, rect.y0, rect.x1, rect.y1), out);
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_tree_has_a_root_container() {
        let tree = Tree::new();
        assert!(tree.get(tree.root()).is_ok());
    }

    #[test]
    fn add_child_sets_parent_and_order_dirty() {
        let mut tree = Tree::new();
        let root = tree.root();
        let child = tree.create_node();
        tree.add_child(root, child).unwrap();
        assert_eq!(tree.get(child).unwrap().parent(), Some(root));
        assert!(tree.get(root).unwrap().children().contains(&child));
    }

    #[test]
    fn add_child_is_idempotent() {
        let mut tree = Tree::new();
        let root = tree.root();
        let child = tree.create_node();
        tree.add_child(root, child).unwrap();
        tree.add_child(root, child).unwrap();
        assert_eq!(tree.get(root).unwrap().children().len(), 1);
    }

    #[test]
    fn re_adding_to_same_parent_reorders_instead_of_duplicating() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.create_node();
        let b = tree.create_node();
        let c = tree.create_node();
        tree.add_child(root, a).unwrap();
        tree.add_child(root, b).unwrap();
        tree.add_child(root, c).unwrap();
        assert_eq!(tree.get(root).unwrap().children(), &[a, b, c]);

        // Moving `a` to index 2 (between b and c) must reposition, not duplicate.
        tree.add_child_at(root, a, 2).unwrap();
        assert_eq!(tree.get(root).unwrap().children(), &[b, c, a]);
        assert_eq!(tree.get(root).unwrap().children().len(), 3);

        // Re-adding `b` via `add_child` moves it to the end.
        tree.add_child(root, b).unwrap();
        assert_eq!(tree.get(root).unwrap().children(), &[c, a, b]);
        assert_eq!(tree.get(root).unwrap().children().len(), 3);
    }

    #[test]
    fn remove_child_on_non_child_is_a_silent_no_op() {
        let mut tree = Tree::new();
        let root = tree.root();
        let stray = tree.create_node();
        tree.remove_child(root, stray).unwrap();
    }

    #[test]
    fn destroy_frees_the_handle_so_it_becomes_unknown() {
        let mut tree = Tree::new();
        let root = tree.root();
        let child = tree.create_node();
        tree.add_child(root, child).unwrap();
        tree.destroy(child).unwrap();
        assert!(matches!(tree.get(child), Err(TreeError::UnknownNode)));
        assert!(!tree.get(root).unwrap().children().contains(&child));
    }

    #[test]
    fn setting_x_marks_transform_and_cascades_to_children() {
        let mut tree = Tree::new();
        let root = tree.root();
        let parent = tree.create_node();
        let child = tree.create_node();
        tree.add_child(root, parent).unwrap();
        tree.add_child(parent, child).unwrap();
        tree.resolve_frame().unwrap();
        assert!(!tree.get(child).unwrap().dirty.contains(DirtyFlags::TRANSFORM));

        tree.set_x(parent, 10.0).unwrap();
        assert!(tree.get(parent).unwrap().dirty.contains(DirtyFlags::TRANSFORM));
        assert!(tree.get(child).unwrap().dirty.contains(DirtyFlags::TRANSFORM));
    }

    #[test]
    fn resolve_frame_composes_world_matrix_from_parent() {
        let mut tree = Tree::new();
        let root = tree.root();
        let parent = tree.create_node();
        let child = tree.create_node();
        tree.add_child(root, parent).unwrap();
        tree.add_child(parent, child).unwrap();
        tree.set_x(parent, 10.0).unwrap();
        tree.set_x(child, 5.0).unwrap();
        tree.resolve_frame().unwrap();
        let world = tree.get(child).unwrap().world_matrix();
        let p = world * kurbo::Point::ORIGIN;
        assert!((p.x - 15.0).abs() < 1e-9);
    }

    #[test]
    fn setting_zero_scale_coerces_and_logs_debug_event() {
        let mut tree = Tree::new();
        let root = tree.root();
        let mut debug = DebugChannel::default();
        tree.set_scale_x(root, 0.0, &mut debug).unwrap();
        assert_eq!(debug.len(), 1);
    }

    #[test]
    fn alpha_outside_range_clamps_and_logs_debug_event() {
        let mut tree = Tree::new();
        let root = tree.root();
        let mut debug = DebugChannel::default();
        tree.set_alpha(root, 2.5, &mut debug).unwrap();
        assert_eq!(tree.get(root).unwrap().alpha(), 1.0);
        assert_eq!(debug.len(), 1);
    }

    #[test]
    fn cache_as_bitmap_ancestor_receives_visual_bubble_from_descendant_transform() {
        let mut tree = Tree::new();
        let root = tree.root();
        let cached = tree.create_node();
        let child = tree.create_node();
        tree.add_child(root, cached).unwrap();
        tree.add_child(cached, child).unwrap();
        tree.set_cache_as_bitmap(cached, true).unwrap();
        tree.resolve_frame().unwrap();
        assert!(!tree.get(cached).unwrap().dirty.contains(DirtyFlags::VISUAL));

        tree.set_x(child, 3.0).unwrap();
        assert!(tree.get(cached).unwrap().dirty.contains(DirtyFlags::VISUAL));
    }

    #[test]
    fn z_index_marks_visual_on_self_and_order_on_parent() {
        let mut tree = Tree::new();
        let root = tree.root();
        let child = tree.create_node();
        tree.add_child(root, child).unwrap();
        tree.resolve_frame().unwrap();

        tree.set_z_index(child, 5).unwrap();
        assert!(tree.get(child).unwrap().dirty.contains(DirtyFlags::VISUAL));
        assert!(tree.get(root).unwrap().dirty.contains(DirtyFlags::ORDER));
    }

    #[test]
    fn order_dirty_sorts_children_by_z_index_then_uid() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.create_node();
        let b = tree.create_node();
        let c = tree.create_node();
        tree.add_child(root, a).unwrap();
        tree.add_child(root, b).unwrap();
        tree.add_child(root, c).unwrap();
        tree.set_z_index(b, -1).unwrap();
        tree.resolve_frame().unwrap();
        assert_eq!(tree.get(root).unwrap().children(), &[b, a, c]);
    }

    #[test]
    fn width_change_marks_visual_self_and_layout_parent() {
        let mut tree = Tree::new();
        let root = tree.root();
        let child = tree.create_node();
        tree.add_child(root, child).unwrap();
        tree.resolve_frame().unwrap();

        tree.set_width(child, 40.0).unwrap();
        assert!(tree.get(child).unwrap().dirty.contains(DirtyFlags::VISUAL));
        assert!(tree.get(root).unwrap().dirty.contains(DirtyFlags::LAYOUT));
        assert_eq!(tree.get(child).unwrap().local_bounds().width(), 40.0);
    }

    #[test]
    fn style_update_marks_layout_on_self_only() {
        let mut tree = Tree::new();
        let root = tree.root();
        let child = tree.create_node();
        tree.add_child(root, child).unwrap();
        tree.resolve_frame().unwrap();

        tree.set_style(child, Style { gap: 4.0, ..Style::default() }).unwrap();
        assert!(tree.get(child).unwrap().dirty.contains(DirtyFlags::LAYOUT));
        assert!(!tree.get(child).unwrap().dirty.contains(DirtyFlags::VISUAL));
        assert!(!tree.get(root).unwrap().dirty.contains(DirtyFlags::LAYOUT));
    }
}
