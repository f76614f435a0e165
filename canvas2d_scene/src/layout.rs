// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bridges [`Tree`] into [`canvas2d_layout`]'s two-pass flex/anchor
//! resolver (§4.5). The resolver owns no node storage of its own; this
//! module is the [`LayoutTree`] adapter plus the dirty-bit-gated entry
//! point the frame driver calls.

use alloc::vec::Vec;

use canvas2d_dirty::DirtyFlags;
use canvas2d_layout::style::Style;
use canvas2d_layout::{resolve, LayoutTree};
use kurbo::{Rect, Size};

use crate::node::NodeId;
use crate::tree::Tree;

impl LayoutTree for Tree {
    type NodeId = NodeId;

    fn style(&self, node: NodeId) -> Style {
        self.get(node).map(|n| *n.style()).unwrap_or_default()
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.get(node).map(|n| n.children().to_vec()).unwrap_or_default()
    }

    fn intrinsic_content_size(&self, node: NodeId) -> Size {
        self.get(node)
            .ok()
            .and_then(|n| n.content.as_ref())
            .map(|c| c.intrinsic_size())
            .unwrap_or(Size::ZERO)
    }

    fn computed_rect(&self, node: NodeId) -> Rect {
        self.get(node)
            .map(|n| Rect::new(n.x, n.y, n.x + n.width, n.y + n.height))
            .unwrap_or(Rect::ZERO)
    }

    fn set_computed_rect(&mut self, node: NodeId, rect: Rect) {
        let _ = self.set_x(node, rect.x0);
        let _ = self.set_y(node, rect.y0);
        let _ = self.set_width(node, rect.width());
        let _ = self.set_height(node, rect.height());
    }
}

impl Tree {
    /// Whether any node in the tree still carries a `Layout` dirty bit
    /// (§4.14 step 4: "Layout resolve (if any Layout bit present in the
    /// tree)").
    #[must_use]
    pub fn has_layout_dirty(&self) -> bool {
        self.has_dirty(DirtyFlags::LAYOUT)
    }

    /// Whether any node in the tree still carries any of `flags`. Used by
    /// [`Self::has_layout_dirty`] and by [`crate::scene::Scene`] to decide
    /// whether the hit buffer needs repainting after a frame resolve
    /// (§4.7: "keyed to the Spatial bit").
    #[must_use]
    pub(crate) fn has_dirty(&self, flags: DirtyFlags) -> bool {
        self.any_dirty_in_subtree(self.root(), flags)
    }

    fn any_dirty_in_subtree(&self, id: NodeId, flags: DirtyFlags) -> bool {
        let Ok(node) = self.get(id) else { return false };
        if node.dirty.contains(flags) {
            return true;
        }
        node.children().iter().any(|&child| self.any_dirty_in_subtree(child, flags))
    }

    /// Runs the flex/anchor layout resolver over the whole tree, writing
    /// each participating node's final `(x, y, width, height)` back through
    /// the normal setters so dirty-bit and cache-bubble bookkeeping stays
    /// correct (§4.5). A no-op unless [`Self::has_layout_dirty`] would have
    /// returned `true`; callers should still gate on that to skip the
    /// traversal entirely when nothing needs it.
    pub fn resolve_layout(&mut self) {
        let root = self.root();
        resolve(self, root);
        self.clear_layout_dirty_subtree(root);
    }

    fn clear_layout_dirty_subtree(&mut self, id: NodeId) {
        let _ = self.clear_layout_dirty(id);
        let Some(children) = self.get(id).ok().map(|n| n.children().to_vec()) else {
            return;
        };
        for child in children {
            self.clear_layout_dirty_subtree(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas2d_layout::style::{Display, FlexDirection, Unit};

    #[test]
    fn flex_row_lays_out_children_left_to_right() {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.set_width(root, 200.0).unwrap();
        tree.set_height(root, 50.0).unwrap();
        tree.set_style(
            root,
            Style {
                display: Display::Flex,
                flex_direction: FlexDirection::Row,
                width: Unit::Px(200.0),
                height: Unit::Px(50.0),
                ..Style::default()
            },
        )
        .unwrap();

        let a = tree.create_node();
        let b = tree.create_node();
        tree.add_child(root, a).unwrap();
        tree.add_child(root, b).unwrap();
        tree.set_style(a, Style { width: Unit::Px(50.0), height: Unit::Px(50.0), ..Style::default() })
            .unwrap();
        tree.set_style(b, Style { width: Unit::Px(50.0), height: Unit::Px(50.0), ..Style::default() })
            .unwrap();

        assert!(tree.has_layout_dirty());
        tree.resolve_layout();
        assert_eq!(tree.get(a).unwrap().x, 0.0);
        assert_eq!(tree.get(b).unwrap().x, 50.0);
    }
}
