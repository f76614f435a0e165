// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tab order and keyboard focus (§4.11).
//!
//! [`FocusManager`] builds the tab-order listing from the tree on demand
//! (depth-first pre-order, `visible && focusable`, per §4.11), hands it to
//! [`canvas2d_focus::DefaultPolicy`] for `tabNext`/`tabPrev`, and uses
//! [`canvas2d_responder::focus::FocusState`] to compute the `focus`/`blur`
//! transitions a path change implies.

use alloc::vec::Vec;

use canvas2d_focus::{DefaultPolicy, FocusEntry, FocusPolicy, FocusSpace, Navigation};
use canvas2d_responder::focus::{FocusEvent, FocusState};

use crate::error::TreeError;
use crate::event::{Event, EventKind};
use crate::node::NodeId;
use crate::tree::Tree;

/// Owns the currently focused node and dispatches `focus`/`blur` as it
/// changes (§4.11).
#[derive(Debug, Default)]
pub struct FocusManager {
    state: FocusState<NodeId>,
    focused: Option<NodeId>,
}

impl FocusManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: FocusState::new(),
            focused: None,
        }
    }

    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// `setFocus(node | null)` (§4.11): blurs the previous focus and, if
    /// `node` is `Some` and not currently focusable/visible, silently does
    /// nothing (an explicit request to focus an ineligible node neither
    /// errors nor blurs the existing focus).
    pub fn set_focus(&mut self, tree: &mut Tree, node: Option<NodeId>) -> Result<(), TreeError> {
        if let Some(id) = node {
            let eligible = tree.get(id).is_ok_and(|n| n.focusable() && n.is_effectively_visible());
            if !eligible {
                return Ok(());
            }
        }
        let path = match node {
            Some(id) => tree.path_to_root(id)?,
            None => Vec::new(),
        };
        let events = self.state.update_path(&path);
        self.focused = node;
        self.dispatch(tree, events)
    }

    /// Moves focus to the next/previous node in tab order, wrapping
    /// around; a no-op if the tree has no focusable node.
    pub fn tab_next(&mut self, tree: &mut Tree) -> Result<(), TreeError> {
        self.tab(tree, Navigation::Next)
    }

    pub fn tab_prev(&mut self, tree: &mut Tree) -> Result<(), TreeError> {
        self.tab(tree, Navigation::Prev)
    }

    fn tab(&mut self, tree: &mut Tree, nav: Navigation) -> Result<(), TreeError> {
        let entries = build_tab_order(tree)?;
        let space = FocusSpace { nodes: &entries };
        let next = DefaultPolicy.next(self.focused, nav, &space);
        self.set_focus(tree, next)
    }

    fn dispatch(&mut self, tree: &mut Tree, events: Vec<FocusEvent<NodeId>>) -> Result<(), TreeError> {
        for transition in events {
            let (id, kind) = match transition {
                FocusEvent::Enter(id) => (id, EventKind::Focus),
                FocusEvent::Leave(id) => (id, EventKind::Blur),
            };
            let mut event = Event::new(kind, Some(id));
            tree.emit(id, kind.channel(), &mut event)?;
        }
        Ok(())
    }
}

/// Depth-first pre-order listing of `visible && focusable` nodes (§4.11).
fn build_tab_order(tree: &Tree) -> Result<Vec<FocusEntry<NodeId>>, TreeError> {
    let mut out = Vec::new();
    collect_tab_order(tree, tree.root(), 0, &mut out)?;
    Ok(out)
}

fn collect_tab_order(tree: &Tree, id: NodeId, depth: u8, out: &mut Vec<FocusEntry<NodeId>>) -> Result<(), TreeError> {
    let node = tree.get(id)?;
    if node.focusable() && node.is_effectively_visible() {
        out.push(FocusEntry {
            id,
            rect: node.world_bounds(),
            order: 0,
            group: 0,
            enabled: true,
            scope_depth: depth,
        });
    }
    for &child in node.children() {
        collect_tab_order(tree, child, depth.saturating_add(1), out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_focus_on_ineligible_node_is_a_no_op() {
        let mut tree = Tree::new();
        let node = tree.create_node();
        tree.add_child(tree.root(), node).unwrap();
        let mut fm = FocusManager::new();
        fm.set_focus(&mut tree, Some(node)).unwrap();
        assert_eq!(fm.focused(), None);
    }

    #[test]
    fn set_focus_on_focusable_node_succeeds_and_fires_focus() {
        let mut tree = Tree::new();
        let node = tree.create_node();
        tree.add_child(tree.root(), node).unwrap();
        tree.set_focusable(node, true).unwrap();
        let fired = alloc::rc::Rc::new(core::cell::RefCell::new(false));
        let f = fired.clone();
        tree.on(node, "focus", move |_| *f.borrow_mut() = true).unwrap();

        let mut fm = FocusManager::new();
        fm.set_focus(&mut tree, Some(node)).unwrap();
        assert_eq!(fm.focused(), Some(node));
        assert!(*fired.borrow());
    }

    #[test]
    fn tab_next_cycles_focusable_nodes_in_tree_order() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.create_node();
        let b = tree.create_node();
        tree.add_child(root, a).unwrap();
        tree.add_child(root, b).unwrap();
        tree.set_focusable(a, true).unwrap();
        tree.set_focusable(b, true).unwrap();

        let mut fm = FocusManager::new();
        fm.tab_next(&mut tree).unwrap();
        assert_eq!(fm.focused(), Some(a));
        fm.tab_next(&mut tree).unwrap();
        assert_eq!(fm.focused(), Some(b));
        fm.tab_next(&mut tree).unwrap();
        assert_eq!(fm.focused(), Some(a));
    }

    #[test]
    fn tab_prev_wraps_backward() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.create_node();
        let b = tree.create_node();
        tree.add_child(root, a).unwrap();
        tree.add_child(root, b).unwrap();
        tree.set_focusable(a, true).unwrap();
        tree.set_focusable(b, true).unwrap();

        let mut fm = FocusManager::new();
        fm.tab_prev(&mut tree).unwrap();
        assert_eq!(fm.focused(), Some(b));
    }
}
