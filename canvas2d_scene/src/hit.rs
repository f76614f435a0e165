// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing (§4.9) and the hit buffer that backs its primary narrow
//! phase (§4.7).
//!
//! [`refresh_hit_buffer`] repaints every interactive, effectively-visible
//! node's shape into a [`HitBuffer`] in `(zIndex, uid)` order, keyed to the
//! `Spatial` bit so it is only redone when something actually moved. The
//! buffer read can be refused by the backend (§7); when it is,
//! [`hit_test_point`] falls back straight to the geometric narrow phase.

use alloc::vec::Vec;

use canvas2d_geom::{invert_checked, rect_contains_point};
use canvas2d_hit::{HitBuffer, HitParams, PreciseHitTest};
use kurbo::{Point, Rect};

use crate::error::TreeError;
use crate::node::NodeId;
use crate::paint::PaintCtx;
use crate::tree::Tree;

/// Repaints `buffer` for every interactive, effectively-visible node in
/// `tree`, back-to-front so later (topmost) paints win ties (§4.7).
/// Call this whenever the scene observed a `Spatial` dirty bit, an
/// add/remove, or a resize.
pub fn refresh_hit_buffer(tree: &Tree, buffer: &mut HitBuffer) -> Result<(), TreeError> {
    buffer.clear();
    paint_hit_subtree(tree, tree.root(), buffer)
}

fn paint_hit_subtree(tree: &Tree, id: NodeId, buffer: &mut HitBuffer) -> Result<(), TreeError> {
    let node = tree.get(id)?;
    if node.interactive() && node.is_effectively_visible() {
        buffer.paint_uid_rect(node.local_bounds(), node.world_matrix(), node.uid());
    }
    for &child in node.children() {
        paint_hit_subtree(tree, child, buffer)?;
    }
    Ok(())
}

/// Attempts to read a pixel out of the host paint backend's hit-buffer
/// surface (§6 `getImageData`, §4.7). A `None` return means the backend
/// refused the read; the caller should fall back to the geometric narrow
/// phase and stop trying the pixel buffer for the rest of the scene's
/// lifetime (§7, §4.15).
pub fn sample_backend_pixel(ctx: &mut dyn PaintCtx, x: f64, y: f64) -> Option<[u8; 4]> {
    let data = ctx.get_image_data(Rect::new(x, y, x + 1.0, y + 1.0))?;
    if data.len() < 4 {
        return None;
    }
    Some([data[0], data[1], data[2], data[3]])
}

/// Result of a resolved hit test: the node plus, for the geometric
/// fallback, the score that won.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitResult {
    pub node: NodeId,
    pub via_pixel_buffer: bool,
}

/// Point-mode hit test (§4.9): pixel-perfect sampling first (skipped once
/// `pixel_buffer_available` is `false`), geometric back-to-front fallback
/// otherwise. `exclude` removes a subtree from the candidate set (used by
/// drag to ignore the dragged node itself).
pub fn hit_test_point(
    tree: &Tree,
    buffer: &HitBuffer,
    pixel_buffer_available: bool,
    scene_x: f64,
    scene_y: f64,
    alpha_threshold: u8,
    exclude: Option<NodeId>,
) -> Option<HitResult> {
    if pixel_buffer_available {
        let uid = buffer.sample(scene_x.floor() as i32, scene_y.floor() as i32, alpha_threshold);
        if uid != 0 {
            if let Some(node) = find_by_uid(tree, tree.root(), uid) {
                if exclude != Some(node) {
                    return Some(HitResult { node, via_pixel_buffer: true });
                }
            }
        }
        // A zero sample is a real "nothing here" answer for an opaque
        // buffer: don't also run the geometric fallback, since the pixel
        // buffer already covers every interactive node. The fallback only
        // matters when the buffer itself is unavailable (§4.15, §7).
        return None;
    }

    let mut candidates = Vec::new();
    tree.query_point(scene_x, scene_y, &mut candidates);
    geometric_fallback(tree, &candidates, scene_x, scene_y, exclude)
}

fn find_by_uid(tree: &Tree, id: NodeId, uid: u32) -> Option<NodeId> {
    let node = tree.get(id).ok()?;
    if node.uid() == uid {
        return Some(id);
    }
    for &child in node.children() {
        if let Some(found) = find_by_uid(tree, child, uid) {
            return Some(found);
        }
    }
    None
}

/// Iterates `candidates` back-to-front and returns the first whose local
/// bounds (or `contains_point`, via a geometry collaborator the caller
/// consults separately) contains the query point (§4.9 fallback: "running
/// product of depth-scaled zIndex" is approximated here by painter's-order
/// iteration of the broad-phase candidate set, since candidates already
/// come from the spatial index rather than a full tree walk).
fn geometric_fallback(
    tree: &Tree,
    candidates: &[NodeId],
    scene_x: f64,
    scene_y: f64,
    exclude: Option<NodeId>,
) -> Option<HitResult> {
    for &id in candidates.iter().rev() {
        if Some(id) == exclude {
            continue;
        }
        let Ok(node) = tree.get(id) else { continue };
        if !node.interactive() || !node.is_effectively_visible() {
            continue;
        }
        let Some(inverse) = invert_checked(node.world_matrix()) else {
            continue;
        };
        let local = inverse * Point::new(scene_x, scene_y);
        let contains = match &node.content {
            // A content-bearing node answers its own `containsPoint`; a
            // plain node (no content) falls back to its rectangular local
            // bounds (§6, §4.9).
            Some(content) => content.contains_point(local.x, local.y),
            None => rect_contains_point(node.local_bounds(), local),
        };
        if contains {
            return Some(HitResult { node: id, via_pixel_buffer: false });
        }
    }
    None
}

/// A geometry collaborator's precise test, used in place of the plain
/// rectangle check above when the node's content implements
/// [`PreciseHitTest`] (§6 `containsPoint`).
#[must_use]
pub fn precise_contains(content: &dyn PreciseHitTest, local_pt: Point, params: &HitParams) -> bool {
    content.hit_test_local(local_pt, params).is_some()
}

/// AABB-variant hit test used during drag (§4.9 `hitTestAABB`): broad-phase
/// `queryAABB`, narrow phase is AABB-vs-AABB (no pixel read), filtered to
/// nodes whose emitter has at least one `dragenter` or `drop` listener
/// (§4.12).
pub fn hit_test_aabb_drop_targets(tree: &Tree, world_aabb: Rect, exclude: Option<NodeId>) -> Vec<NodeId> {
    let mut candidates = Vec::new();
    tree.query_aabb(world_aabb, &mut candidates);
    candidates
        .into_iter()
        .filter(|&id| Some(id) != exclude)
        .filter(|&id| {
            tree.get(id).is_ok_and(|n| {
                n.interactive()
                    && n.is_effectively_visible()
                    && (n.emitter.has_listener("dragenter") || n.emitter.has_listener("drop"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_buffer_paints_only_interactive_visible_nodes() {
        let mut tree = Tree::new();
        let root = tree.root();
        let visible = tree.create_node();
        let hidden = tree.create_node();
        tree.add_child(root, visible).unwrap();
        tree.add_child(root, hidden).unwrap();
        tree.set_width(visible, 10.0).unwrap();
        tree.set_height(visible, 10.0).unwrap();
        tree.set_width(hidden, 10.0).unwrap();
        tree.set_height(hidden, 10.0).unwrap();
        tree.set_visible(hidden, false).unwrap();
        tree.resolve_frame().unwrap();

        let mut buffer = HitBuffer::new(20, 20);
        refresh_hit_buffer(&tree, &mut buffer).unwrap();
        let visible_uid = tree.get(visible).unwrap().uid();
        assert_eq!(buffer.sample(2, 2, 10), visible_uid);
    }

    #[test]
    fn point_hit_test_prefers_pixel_buffer_result() {
        let mut tree = Tree::new();
        let root = tree.root();
        let child = tree.create_node();
        tree.add_child(root, child).unwrap();
        tree.set_width(child, 10.0).unwrap();
        tree.set_height(child, 10.0).unwrap();
        tree.resolve_frame().unwrap();

        let mut buffer = HitBuffer::new(20, 20);
        refresh_hit_buffer(&tree, &mut buffer).unwrap();
        let hit = hit_test_point(&tree, &buffer, true, 2.0, 2.0, 10, None).unwrap();
        assert_eq!(hit.node, child);
        assert!(hit.via_pixel_buffer);
    }

    #[test]
    fn point_hit_test_falls_back_geometrically_when_buffer_unavailable() {
        let mut tree = Tree::new();
        let root = tree.root();
        let child = tree.create_node();
        tree.add_child(root, child).unwrap();
        tree.set_width(child, 10.0).unwrap();
        tree.set_height(child, 10.0).unwrap();
        tree.resolve_frame().unwrap();

        let buffer = HitBuffer::new(20, 20);
        let hit = hit_test_point(&tree, &buffer, false, 2.0, 2.0, 10, None).unwrap();
        assert_eq!(hit.node, child);
        assert!(!hit.via_pixel_buffer);
    }

    #[test]
    fn excluded_node_never_matches() {
        let mut tree = Tree::new();
        let root = tree.root();
        let child = tree.create_node();
        tree.add_child(root, child).unwrap();
        tree.set_width(child, 10.0).unwrap();
        tree.set_height(child, 10.0).unwrap();
        tree.resolve_frame().unwrap();

        let buffer = HitBuffer::new(20, 20);
        assert!(hit_test_point(&tree, &buffer, false, 2.0, 2.0, 10, Some(child)).is_none());
    }
}
