// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-view interaction manager (§4.10, §4.12, §4.13): ties hit testing,
//! hover, click, drag, scroll, and focus together and dispatches events
//! through the capture/target/bubble walk.

use alloc::vec::Vec;

use canvas2d_event::click::ClickState;
use canvas2d_event::hover::{HoverEvent, HoverState};
use canvas2d_hit::HitBuffer;
use canvas2d_responder::router::dispatch_for_path;

use crate::drag::DragManager;
use crate::error::TreeError;
use crate::event::{Event, EventKind};
use crate::focus::FocusManager;
use crate::hit::hit_test_point;
use crate::node::NodeId;
use crate::scroll::ReleaseOutcome;
use crate::tree::Tree;

/// Alpha threshold a sampled hit-buffer pixel must clear to count as a hit
/// (§4.7; implementation constant, the spec leaves the exact value to the
/// host).
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 1;

/// Owns one view's pointer/keyboard interaction state. A [`crate::scene::Scene`]
/// holds one per view, since hover/drag/focus are each inherently
/// per-viewport.
#[derive(Debug, Default)]
pub struct InteractionManager {
    hover: HoverState<NodeId>,
    click: ClickState<NodeId>,
    drag: DragManager,
    focus: FocusManager,
    scroll_target: Option<NodeId>,
    last_pointer_pos: Option<(f64, f64)>,
}

impl InteractionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn focus(&self) -> &FocusManager {
        &self.focus
    }

    pub fn focus_mut(&mut self) -> &mut FocusManager {
        &mut self.focus
    }

    /// `pointerdown` (§4.10, §4.12, §4.13): dispatches `pointerdown`,
    /// records the click-candidate target, arms a drag, and begins a
    /// scroll-container gesture if the target sits inside one.
    pub fn pointer_down(
        &mut self,
        tree: &mut Tree,
        buffer: &HitBuffer,
        pixel_buffer_available: bool,
        x: f64,
        y: f64,
    ) -> Result<(), TreeError> {
        let Some(hit) = hit_test_point(tree, buffer, pixel_buffer_available, x, y, DEFAULT_ALPHA_THRESHOLD, None)
        else {
            return Ok(());
        };
        let target = hit.node;

        self.click.on_down(target);
        self.drag.pointer_down(tree, target, kurbo::Point::new(x, y));

        self.scroll_target = nearest_scroll_container(tree, target)?;
        if let Some(container) = self.scroll_target {
            if let Some(state) = tree.scroll_state_mut(container)? {
                state.begin_gesture(kurbo::Point::new(x, y));
            }
        }

        let mut event = Event::new(EventKind::PointerDown, Some(target));
        event.scene_x = x;
        event.scene_y = y;
        dispatch(tree, target, "pointerdown", &mut event)
    }

    /// `pointermove` (§4.10, §4.12, §4.13): updates hover transitions,
    /// advances the drag or scroll gesture in progress (mutually exclusive:
    /// a pointer stream is either dragging a node or scrolling a
    /// container), and dispatches `pointermove` to the current target.
    pub fn pointer_move(
        &mut self,
        tree: &mut Tree,
        buffer: &HitBuffer,
        pixel_buffer_available: bool,
        x: f64,
        y: f64,
        dt_ms: f64,
    ) -> Result<(), TreeError> {
        if self.drag.is_dragging() {
            self.drag.pointer_move(tree, kurbo::Point::new(x, y))?;
        } else if let Some(container) = self.scroll_target {
            if let Some(state) = tree.scroll_state_mut(container)? {
                if let Some((dx, dy)) = state.update_gesture(kurbo::Point::new(x, y), dt_ms) {
                    state.set_scroll(dx, dy);
                    state.set_velocity(dx, dy);
                }
            }
            tree.mark_scroll_children_dirty(container)?;
        } else {
            self.drag.pointer_move(tree, kurbo::Point::new(x, y))?;
        }

        self.last_pointer_pos = Some((x, y));
        let hit = self.refresh_hover_at(tree, buffer, pixel_buffer_available, x, y)?;

        if let Some(result) = hit {
            let mut event = Event::new(EventKind::PointerMove, Some(result.node));
            event.scene_x = x;
            event.scene_y = y;
            dispatch(tree, result.node, "pointermove", &mut event)?;
        }
        Ok(())
    }

    /// Re-evaluates hover at the last known pointer position without new
    /// input (§4.14 post-paint step: elements that moved under a
    /// stationary cursor still generate enter/leave). A no-op if the
    /// pointer has never moved over this view.
    pub fn refresh_hover(
        &mut self,
        tree: &mut Tree,
        buffer: &HitBuffer,
        pixel_buffer_available: bool,
    ) -> Result<(), TreeError> {
        let Some((x, y)) = self.last_pointer_pos else {
            return Ok(());
        };
        self.refresh_hover_at(tree, buffer, pixel_buffer_available, x, y)?;
        Ok(())
    }

    fn refresh_hover_at(
        &mut self,
        tree: &mut Tree,
        buffer: &HitBuffer,
        pixel_buffer_available: bool,
        x: f64,
        y: f64,
    ) -> Result<Option<crate::hit::HitResult>, TreeError> {
        let hit = hit_test_point(tree, buffer, pixel_buffer_available, x, y, DEFAULT_ALPHA_THRESHOLD, None);
        let path = match hit {
            Some(result) => tree.path_to_root(result.node)?,
            None => Vec::new(),
        };
        for transition in self.hover.update_path(&path) {
            let (id, kind) = match transition {
                HoverEvent::Enter(id) => (id, EventKind::PointerEnter),
                HoverEvent::Leave(id) => (id, EventKind::PointerLeave),
            };
            let mut event = Event::new(kind, Some(id));
            event.scene_x = x;
            event.scene_y = y;
            tree.emit(id, kind.channel(), &mut event)?;
        }
        Ok(hit)
    }

    /// `pointerup` (§4.10, §4.12, §4.13): ends the drag or scroll gesture,
    /// resolves same-target clicks, and dispatches `pointerup`.
    pub fn pointer_up(
        &mut self,
        tree: &mut Tree,
        buffer: &HitBuffer,
        pixel_buffer_available: bool,
        x: f64,
        y: f64,
    ) -> Result<(), TreeError> {
        let was_dragging = self.drag.is_dragging();
        if was_dragging {
            self.drag.pointer_up(tree)?;
        }

        if let Some(container) = self.scroll_target.take() {
            if let Some(state) = tree.scroll_state_mut(container)? {
                if state.end_gesture() == ReleaseOutcome::NoClick {
                    self.click.cancel();
                }
            }
        }

        let hit = hit_test_point(tree, buffer, pixel_buffer_available, x, y, DEFAULT_ALPHA_THRESHOLD, None);

        if was_dragging {
            self.click.cancel();
        } else if let Some(result) = hit {
            if let Some(clicked) = self.click.on_up(result.node) {
                let mut event = Event::new(EventKind::Click, Some(clicked));
                event.scene_x = x;
                event.scene_y = y;
                dispatch(tree, clicked, "click", &mut event)?;
            }
        } else {
            self.click.cancel();
        }

        if let Some(result) = hit {
            let mut event = Event::new(EventKind::PointerUp, Some(result.node));
            event.scene_x = x;
            event.scene_y = y;
            dispatch(tree, result.node, "pointerup", &mut event)?;
        }
        Ok(())
    }

    /// `wheel` (§4.13): applies the delta directly to the nearest scroll
    /// container ancestor of the hit target, if any.
    pub fn wheel(
        &mut self,
        tree: &mut Tree,
        buffer: &HitBuffer,
        pixel_buffer_available: bool,
        x: f64,
        y: f64,
        delta_x: f64,
        delta_y: f64,
    ) -> Result<(), TreeError> {
        let Some(hit) = hit_test_point(tree, buffer, pixel_buffer_available, x, y, DEFAULT_ALPHA_THRESHOLD, None)
        else {
            return Ok(());
        };
        let Some(container) = nearest_scroll_container(tree, hit.node)? else {
            return Ok(());
        };
        if let Some(state) = tree.scroll_state_mut(container)? {
            state.apply_wheel(delta_x, delta_y);
        }
        tree.mark_scroll_children_dirty(container)?;

        let mut event = Event::new(EventKind::Wheel, Some(hit.node));
        event.scene_x = x;
        event.scene_y = y;
        event.delta_x = delta_x;
        event.delta_y = delta_y;
        dispatch(tree, hit.node, "wheel", &mut event)
    }

    /// `keydown` (§4.11, §4.12): `Tab`/`Shift+Tab` move focus; `Escape`
    /// cancels an in-progress drag. Other keys dispatch `keydown` to the
    /// focused node, if any.
    pub fn key_down(&mut self, tree: &mut Tree, key: &'static str, shift: bool) -> Result<(), TreeError> {
        match key {
            "Tab" if shift => return self.focus.tab_prev(tree),
            "Tab" => return self.focus.tab_next(tree),
            "Escape" => return self.drag.cancel(tree),
            _ => {}
        }
        let Some(target) = self.focus.focused() else {
            return Ok(());
        };
        let mut event = Event::new(EventKind::KeyDown, Some(target));
        event.key = Some(key);
        dispatch(tree, target, "keydown", &mut event)
    }
}

fn nearest_scroll_container(tree: &Tree, id: NodeId) -> Result<Option<NodeId>, TreeError> {
    let mut current = Some(id);
    while let Some(node_id) = current {
        let node = tree.get(node_id)?;
        if node.scroll.is_some() {
            return Ok(Some(node_id));
        }
        current = node.parent();
    }
    Ok(None)
}

/// Expands `target`'s root path into a capture → target → bubble sequence
/// (§4.10) and emits `channel` along it, honoring
/// [`Event::stop_propagation`].
fn dispatch(tree: &mut Tree, target: NodeId, channel: &str, event: &mut Event) -> Result<(), TreeError> {
    if !event.kind.bubbles() {
        tree.emit(target, channel, event)?;
        return Ok(());
    }
    let path = tree.path_to_root(target)?;
    let seq: Vec<canvas2d_responder::types::Dispatch<NodeId>> = dispatch_for_path(&path);
    for entry in &seq {
        tree.emit(entry.node, channel, event)?;
        if event.is_propagation_stopped() {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_tree() -> (Tree, NodeId) {
        let mut tree = Tree::new();
        let root = tree.root();
        let child = tree.create_node();
        tree.add_child(root, child).unwrap();
        tree.set_width(child, 10.0).unwrap();
        tree.set_height(child, 10.0).unwrap();
        tree.resolve_frame().unwrap();
        (tree, child)
    }

    #[test]
    fn click_fires_on_matching_down_and_up() {
        let (mut tree, child) = leaf_tree();
        let clicked = alloc::rc::Rc::new(core::cell::RefCell::new(false));
        let c = clicked.clone();
        tree.on(child, "click", move |_| *c.borrow_mut() = true).unwrap();

        let buffer = HitBuffer::new(20, 20);
        let mut im = InteractionManager::new();
        im.pointer_down(&mut tree, &buffer, false, 5.0, 5.0).unwrap();
        im.pointer_up(&mut tree, &buffer, false, 5.0, 5.0).unwrap();
        assert!(*clicked.borrow());
    }

    #[test]
    fn dragging_past_threshold_suppresses_click() {
        let (mut tree, child) = leaf_tree();
        tree.set_draggable(child, true).unwrap();
        let clicked = alloc::rc::Rc::new(core::cell::RefCell::new(false));
        let c = clicked.clone();
        tree.on(child, "click", move |_| *c.borrow_mut() = true).unwrap();

        let buffer = HitBuffer::new(20, 20);
        let mut im = InteractionManager::new();
        im.pointer_down(&mut tree, &buffer, false, 5.0, 5.0).unwrap();
        im.pointer_move(&mut tree, &buffer, false, 9.0, 9.0, 16.0).unwrap();
        im.pointer_up(&mut tree, &buffer, false, 9.0, 9.0).unwrap();
        assert!(!*clicked.borrow());
    }

    #[test]
    fn hover_enters_on_move_into_target() {
        let (mut tree, child) = leaf_tree();
        let entered = alloc::rc::Rc::new(core::cell::RefCell::new(false));
        let e = entered.clone();
        tree.on(child, "pointerenter", move |_| *e.borrow_mut() = true).unwrap();

        let buffer = HitBuffer::new(20, 20);
        let mut im = InteractionManager::new();
        im.pointer_move(&mut tree, &buffer, false, 5.0, 5.0, 16.0).unwrap();
        assert!(*entered.borrow());
    }

    #[test]
    fn tab_moves_focus_to_first_focusable_node() {
        let (mut tree, child) = leaf_tree();
        tree.set_focusable(child, true).unwrap();
        let mut im = InteractionManager::new();
        im.key_down(&mut tree, "Tab", false).unwrap();
        assert_eq!(im.focus().focused(), Some(child));
    }
}
