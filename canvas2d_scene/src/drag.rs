// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag state machine (§4.12): idle → armed → dragging, built on top of
//! [`canvas2d_event::drag::DragState`]'s raw position tracking.

use kurbo::Vec2;

use canvas2d_event::drag::DragState;

use crate::error::TreeError;
use crate::event::{Event, EventKind};
use crate::node::{DragConstraint, NodeId};
use crate::scroll::DRAG_THRESHOLD;
use crate::tree::Tree;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Idle,
    Armed,
    Dragging,
}

/// Per-pointer-stream drag tracker (§4.12). One instance per pointer the
/// host surface reports (typically one, for mouse-only hosts).
#[derive(Debug, Default)]
pub struct DragManager {
    phase: Phase,
    node: Option<NodeId>,
    drag: DragState,
    drop_target: Option<NodeId>,
}

impl DragManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.phase == Phase::Dragging
    }

    #[must_use]
    pub fn dragged_node(&self) -> Option<NodeId> {
        self.node
    }

    /// `pointerdown`: arms a drag if `hit` (or one of its ancestors) is
    /// `draggable` (§4.12).
    pub fn pointer_down(&mut self, tree: &Tree, hit: NodeId, pos: kurbo::Point) {
        let Some(node) = nearest_draggable_ancestor(tree, hit) else {
            return;
        };
        self.phase = Phase::Armed;
        self.node = Some(node);
        self.drop_target = None;
        self.drag.start(pos);
    }

    /// `pointermove`: while armed, checks the 5-unit arm threshold and
    /// transitions to dragging (emitting `dragstart`); while dragging,
    /// applies the constrained delta and emits `dragmove` plus any
    /// drop-target enter/leave (§4.12).
    pub fn pointer_move(&mut self, tree: &mut Tree, pos: kurbo::Point) -> Result<(), TreeError> {
        match self.phase {
            Phase::Idle => Ok(()),
            Phase::Armed => {
                let Some(node) = self.node else { return Ok(()) };
                let traveled = self.drag.total_offset(pos).unwrap_or(Vec2::ZERO).hypot();
                if traveled < DRAG_THRESHOLD {
                    return Ok(());
                }
                self.phase = Phase::Dragging;
                if let Some(delta) = self.drag.update(pos) {
                    apply_constrained_delta(tree, node, delta)?;
                }
                let mut event = Event::new(EventKind::DragStart, Some(node));
                event.dragged = Some(node);
                tree.emit(node, "dragstart", &mut event)?;
                self.update_drop_target(tree, node)?;
                Ok(())
            }
            Phase::Dragging => {
                let Some(node) = self.node else { return Ok(()) };
                if let Some(delta) = self.drag.update(pos) {
                    apply_constrained_delta(tree, node, delta)?;
                }
                let mut event = Event::new(EventKind::DragMove, Some(node));
                event.dragged = Some(node);
                event.scene_x = pos.x;
                event.scene_y = pos.y;
                tree.emit(node, "dragmove", &mut event)?;
                self.update_drop_target(tree, node)
            }
        }
    }

    /// `pointerup`: while dragging, emits `dragend` then `drop` on the
    /// current drop target, if any; while merely armed, the gesture never
    /// became a drag and nothing fires. Either way returns to idle (§4.12).
    pub fn pointer_up(&mut self, tree: &mut Tree) -> Result<(), TreeError> {
        if self.phase == Phase::Dragging {
            if let Some(node) = self.node {
                let mut end_event = Event::new(EventKind::DragEnd, Some(node));
                end_event.dragged = Some(node);
                tree.emit(node, "dragend", &mut end_event)?;
                if let Some(target) = self.drop_target {
                    let mut drop_event = Event::new(EventKind::Drop, Some(target));
                    drop_event.dragged = Some(node);
                    tree.emit(target, "drop", &mut drop_event)?;
                }
            }
        }
        self.reset();
        Ok(())
    }

    /// Cancels an in-progress drag (Escape key, or the dragged node having
    /// been destroyed out from under this manager) without delivering
    /// `drop` (§5 "Cancellation").
    pub fn cancel(&mut self, tree: &mut Tree) -> Result<(), TreeError> {
        if self.phase == Phase::Dragging {
            if let Some(node) = self.node {
                if tree.get(node).is_ok() {
                    let mut event = Event::new(EventKind::DragEnd, Some(node));
                    event.dragged = Some(node);
                    tree.emit(node, "dragend", &mut event)?;
                }
            }
        }
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.node = None;
        self.drop_target = None;
        self.drag.end();
    }

    fn update_drop_target(&mut self, tree: &mut Tree, dragged: NodeId) -> Result<(), TreeError> {
        let world_aabb = tree.get(dragged)?.world_bounds();
        let candidates = crate::hit::hit_test_aabb_drop_targets(tree, world_aabb, Some(dragged));
        let new_target = candidates.first().copied();
        if new_target == self.drop_target {
            return Ok(());
        }
        if let Some(old) = self.drop_target {
            let mut event = Event::new(EventKind::DragLeave, Some(old));
            event.dragged = Some(dragged);
            tree.emit(old, "dragleave", &mut event)?;
        }
        if let Some(new) = new_target {
            let mut event = Event::new(EventKind::DragEnter, Some(new));
            event.dragged = Some(dragged);
            tree.emit(new, "dragenter", &mut event)?;
        }
        self.drop_target = new_target;
        Ok(())
    }
}

fn nearest_draggable_ancestor(tree: &Tree, id: NodeId) -> Option<NodeId> {
    let mut current = Some(id);
    while let Some(node_id) = current {
        let node = tree.get(node_id).ok()?;
        if node.draggable() {
            return Some(node_id);
        }
        current = node.parent();
    }
    None
}

fn apply_constrained_delta(tree: &mut Tree, node: NodeId, delta: Vec2) -> Result<(), TreeError> {
    let (x, y, constraint) = {
        let n = tree.get(node)?;
        (n.x, n.y, n.drag_constraint)
    };
    match constraint {
        DragConstraint::None => {
            tree.set_x(node, x + delta.x)?;
            tree.set_y(node, y + delta.y)?;
        }
        DragConstraint::X => tree.set_x(node, x + delta.x)?,
        DragConstraint::Y => tree.set_y(node, y + delta.y)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn pointer_down_on_non_draggable_node_never_arms() {
        let mut tree = Tree::new();
        let node = tree.create_node();
        tree.add_child(tree.root(), node).unwrap();
        let mut drag = DragManager::new();
        drag.pointer_down(&tree, node, Point::new(0.0, 0.0));
        assert_eq!(drag.dragged_node(), None);
    }

    #[test]
    fn small_movement_stays_armed_without_dragstart() {
        let mut tree = Tree::new();
        let node = tree.create_node();
        tree.add_child(tree.root(), node).unwrap();
        tree.set_draggable(node, true).unwrap();
        tree.resolve_frame().unwrap();

        let fired = alloc::rc::Rc::new(core::cell::RefCell::new(false));
        let f = fired.clone();
        tree.on(node, "dragstart", move |_| *f.borrow_mut() = true).unwrap();

        let mut drag = DragManager::new();
        drag.pointer_down(&tree, node, Point::new(0.0, 0.0));
        drag.pointer_move(&mut tree, Point::new(1.0, 0.0)).unwrap();
        assert!(!drag.is_dragging());
        assert!(!*fired.borrow());
    }

    #[test]
    fn movement_past_threshold_starts_dragging_and_moves_the_node() {
        let mut tree = Tree::new();
        let node = tree.create_node();
        tree.add_child(tree.root(), node).unwrap();
        tree.set_draggable(node, true).unwrap();
        tree.resolve_frame().unwrap();

        let mut drag = DragManager::new();
        drag.pointer_down(&tree, node, Point::new(0.0, 0.0));
        drag.pointer_move(&mut tree, Point::new(10.0, 0.0)).unwrap();
        assert!(drag.is_dragging());
        assert_eq!(tree.get(node).unwrap().x, 10.0);

        drag.pointer_move(&mut tree, Point::new(15.0, 0.0)).unwrap();
        assert_eq!(tree.get(node).unwrap().x, 15.0);
    }

    #[test]
    fn x_constraint_ignores_vertical_movement() {
        let mut tree = Tree::new();
        let node = tree.create_node();
        tree.add_child(tree.root(), node).unwrap();
        tree.set_draggable(node, true).unwrap();
        tree.set_drag_constraint(node, DragConstraint::X).unwrap();
        tree.resolve_frame().unwrap();

        let mut drag = DragManager::new();
        drag.pointer_down(&tree, node, Point::new(0.0, 0.0));
        drag.pointer_move(&mut tree, Point::new(10.0, 10.0)).unwrap();
        assert_eq!(tree.get(node).unwrap().x, 10.0);
        assert_eq!(tree.get(node).unwrap().y, 0.0);
    }

    #[test]
    fn pointer_up_while_dragging_emits_dragend() {
        let mut tree = Tree::new();
        let node = tree.create_node();
        tree.add_child(tree.root(), node).unwrap();
        tree.set_draggable(node, true).unwrap();
        tree.resolve_frame().unwrap();

        let ended = alloc::rc::Rc::new(core::cell::RefCell::new(false));
        let e = ended.clone();
        tree.on(node, "dragend", move |_| *e.borrow_mut() = true).unwrap();

        let mut drag = DragManager::new();
        drag.pointer_down(&tree, node, Point::new(0.0, 0.0));
        drag.pointer_move(&mut tree, Point::new(10.0, 0.0)).unwrap();
        drag.pointer_up(&mut tree).unwrap();
        assert!(*ended.borrow());
        assert!(!drag.is_dragging());
        assert_eq!(drag.dragged_node(), None);
    }
}
