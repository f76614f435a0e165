// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-pass flex/anchor layout resolver (§4.5).
//!
//! [`resolve`] walks a tree once bottom-up to measure intrinsic sizes, then
//! once top-down to assign each flex/anchor child its final `(x, y, width,
//! height)`. It has no opinion on what a node actually *is* — callers
//! implement [`LayoutTree`] over their own arena and get final rectangles
//! written back through [`LayoutTree::set_computed_rect`].
//!
//! This is a from-scratch resolver, not an adapter over an external flex
//! engine: the one-pass (non-redistributing) grow/shrink distribution,
//! `space-between`/`space-around` math, and percentage-resolution rules
//! here are specific enough that bridging a general-purpose engine would
//! cost more code than this does.
//!
//! This crate is `no_std` and uses `alloc`.
//!
//! ## Minimal example
//!
//! ```rust
//! extern crate alloc;
//! use alloc::collections::BTreeMap;
//! use alloc::vec::Vec;
//! use kurbo::{Rect, Size};
//! use canvas2d_layout::{resolve, style::{Display, FlexDirection, Style, Unit}, LayoutTree};
//!
//! #[derive(Clone, Copy, PartialEq, Eq, Hash)]
//! struct NodeId(u32);
//!
//! struct Tree {
//!     styles: BTreeMap<u32, Style>,
//!     children: BTreeMap<u32, Vec<NodeId>>,
//!     rects: BTreeMap<u32, Rect>,
//! }
//!
//! impl LayoutTree for Tree {
//!     type NodeId = NodeId;
//!     fn style(&self, node: NodeId) -> Style { self.styles[&node.0] }
//!     fn children(&self, node: NodeId) -> Vec<NodeId> {
//!         self.children.get(&node.0).cloned().unwrap_or_default()
//!     }
//!     fn intrinsic_content_size(&self, _node: NodeId) -> Size { Size::new(0.0, 0.0) }
//!     fn computed_rect(&self, node: NodeId) -> Rect { self.rects[&node.0] }
//!     fn set_computed_rect(&mut self, node: NodeId, rect: Rect) { self.rects.insert(node.0, rect); }
//! }
//!
//! let mut tree = Tree { styles: BTreeMap::new(), children: BTreeMap::new(), rects: BTreeMap::new() };
//! tree.styles.insert(0, Style { display: Display::Flex, flex_direction: FlexDirection::Row, width: Unit::Px(200.0), height: Unit::Px(50.0), ..Style::default() });
//! tree.children.insert(0, alloc::vec![NodeId(1), NodeId(2)]);
//! tree.styles.insert(1, Style { width: Unit::Px(50.0), height: Unit::Px(50.0), ..Style::default() });
//! tree.styles.insert(2, Style { width: Unit::Px(50.0), height: Unit::Px(50.0), ..Style::default() });
//! tree.rects.insert(0, Rect::new(0.0, 0.0, 200.0, 50.0));
//!
//! resolve(&mut tree, NodeId(0));
//! assert_eq!(tree.rects[&1].x0, 0.0);
//! assert_eq!(tree.rects[&2].x0, 50.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod anchor;
mod flex;
mod measure;
pub mod style;

use hashbrown::HashMap;
use kurbo::{Rect, Size};

use style::{Display, FlexDirection, Style};

/// A host tree the resolver can measure and arrange.
///
/// Implementors own the actual node storage; this crate never holds node
/// data, only `NodeId`s.
pub trait LayoutTree {
    type NodeId: Copy + Eq + core::hash::Hash;

    /// The node's layout-relevant style fields.
    fn style(&self, node: Self::NodeId) -> Style;

    /// The node's children, in sibling order.
    fn children(&self, node: Self::NodeId) -> alloc::vec::Vec<Self::NodeId>;

    /// The node's content-reported size when its own `width`/`height` are
    /// `auto` and it has no children to size from (§4.5: "0 for generic
    /// nodes; content-reported for text/image collaborators").
    fn intrinsic_content_size(&self, node: Self::NodeId) -> Size;

    /// The node's current rectangle, used as the content box handed to
    /// `manual` subtrees (whose own position the resolver never touches)
    /// and as the root's own containing rect.
    fn computed_rect(&self, node: Self::NodeId) -> Rect;

    /// Writes back a node's final `(x, y, width, height)`.
    fn set_computed_rect(&mut self, node: Self::NodeId, rect: Rect);
}

/// Runs the two-pass resolver rooted at `root`.
///
/// Pass 1 measures every node's intrinsic size bottom-up; pass 2 assigns
/// final rectangles top-down, starting from `root`'s own current rect as
/// the outermost containing block.
pub fn resolve<T: LayoutTree>(tree: &mut T, root: T::NodeId) {
    let mut cache: HashMap<T::NodeId, Size> = HashMap::new();
    let root_rect = tree.computed_rect(root);
    measure::measure(tree, root, Some(root_rect.width()), Some(root_rect.height()), &mut cache);
    arrange(tree, root, root_rect, &cache);
}

/// Arranges `node`'s children within `content` according to `node`'s own
/// `display` mode, then recurses. Coordinates are snapped to integers on
/// the way out (round-half-away-from-zero, chosen once and applied
/// consistently per §4.5's "documented and consistent" requirement).
fn arrange<T: LayoutTree>(tree: &mut T, node: T::NodeId, content: Rect, cache: &HashMap<T::NodeId, Size>) {
    let style = tree.style(node);
    let children = tree.children(node);
    if children.is_empty() {
        return;
    }
    match style.display {
        Display::Manual => {
            for &child in &children {
                let rect = tree.computed_rect(child);
                arrange(tree, child, rect, cache);
            }
        }
        Display::Flex => flex::arrange_flex(tree, &style, &children, content, cache),
        Display::Anchor => anchor::arrange_anchor(tree, &children, content, cache),
    }
}

/// Splits a style's padding box into `(main_start, main_end, cross_start,
/// cross_end)` lengths for the given flex direction. Padding is stored as
/// `[top, right, bottom, left]` (§3.3).
fn axis_padding(padding: [f64; 4], direction: FlexDirection) -> (f64, f64, f64, f64) {
    let [top, right, bottom, left] = padding;
    match direction {
        FlexDirection::Row => (left, right, top, bottom),
        FlexDirection::Column => (top, bottom, left, right),
    }
}

/// Rounds a rectangle's edges to integers, round-half-away-from-zero.
pub(crate) fn snap_rect(rect: Rect) -> Rect {
    Rect::new(rect.x0.round(), rect.y0.round(), rect.x1.round(), rect.y1.round())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_padding_maps_row_main_to_left_right() {
        let (main_start, main_end, cross_start, cross_end) = axis_padding([1.0, 2.0, 3.0, 4.0], FlexDirection::Row);
        assert_eq!((main_start, main_end, cross_start, cross_end), (4.0, 2.0, 1.0, 3.0));
    }

    #[test]
    fn axis_padding_maps_column_main_to_top_bottom() {
        let (main_start, main_end, cross_start, cross_end) = axis_padding([1.0, 2.0, 3.0, 4.0], FlexDirection::Column);
        assert_eq!((main_start, main_end, cross_start, cross_end), (1.0, 3.0, 4.0, 2.0));
    }

    #[test]
    fn snap_rect_rounds_each_edge() {
        let r = snap_rect(Rect::new(1.4, 1.5, 10.49, 10.5));
        assert_eq!((r.x0, r.y0, r.x1, r.y1), (1.0, 2.0, 10.0, 11.0));
    }

    #[test]
    fn arrange_on_a_leaf_is_a_no_op() {
        struct Leaf;
        impl LayoutTree for Leaf {
            type NodeId = u32;
            fn style(&self, _node: u32) -> Style {
                Style::default()
            }
            fn children(&self, _node: u32) -> alloc::vec::Vec<u32> {
                alloc::vec::Vec::new()
            }
            fn intrinsic_content_size(&self, _node: u32) -> Size {
                Size::new(0.0, 0.0)
            }
            fn computed_rect(&self, _node: u32) -> Rect {
                Rect::ZERO
            }
            fn set_computed_rect(&mut self, _node: u32, _rect: Rect) {
                panic!("leaves have no children to arrange");
            }
        }
        let mut leaf = Leaf;
        resolve(&mut leaf, 0);
    }
}
