// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pass 2, anchor branch: `top/left/right/bottom` resolution against the
//! container's content box (§4.5).

use hashbrown::HashMap;
use kurbo::{Rect, Size};

use crate::style::{Display, Style};
use crate::{arrange, LayoutTree};

pub(crate) fn arrange_anchor<T: LayoutTree>(
    tree: &mut T,
    children: &[T::NodeId],
    content: Rect,
    cache: &HashMap<T::NodeId, Size>,
) {
    for &child in children {
        let cstyle = tree.style(child);
        if cstyle.display == Display::Manual {
            let rect = tree.computed_rect(child);
            arrange(tree, child, rect, cache);
            continue;
        }

        let content_w = content.width();
        let content_h = content.height();
        let natural = cache.get(&child).copied().unwrap_or(Size::new(0.0, 0.0));

        let left = cstyle.left.and_then(|u| u.resolve(Some(content_w)));
        let right = cstyle.right.and_then(|u| u.resolve(Some(content_w)));
        let top = cstyle.top.and_then(|u| u.resolve(Some(content_h)));
        let bottom = cstyle.bottom.and_then(|u| u.resolve(Some(content_h)));

        let own_width = cstyle.width.resolve(Some(content_w)).unwrap_or(natural.width);
        let own_height = cstyle.height.resolve(Some(content_h)).unwrap_or(natural.height);

        let (x, width) = resolve_axis(left, right, own_width, content_w, cstyle.margin[3], cstyle.margin[1]);
        let (y, height) = resolve_axis(top, bottom, own_height, content_h, cstyle.margin[0], cstyle.margin[2]);

        let rect = crate::snap_rect(Rect::new(
            content.x0 + x,
            content.y0 + y,
            content.x0 + x + width.max(0.0),
            content.y0 + y + height.max(0.0),
        ));
        tree.set_computed_rect(child, rect);
        arrange(tree, child, rect, cache);
    }
}

/// Resolves one axis of an anchor child's position/size. `start`/`end` are
/// the near/far anchors already resolved to pixels (e.g. `left`/`right`),
/// `own` the child's own size along this axis when unanchored on one side,
/// `content` the container's content-axis extent, `margin_start`/
/// `margin_end` the inset on each side.
fn resolve_axis(
    start: Option<f64>,
    end: Option<f64>,
    own: f64,
    content: f64,
    margin_start: f64,
    margin_end: f64,
) -> (f64, f64) {
    match (start, end) {
        (Some(s), Some(e)) => {
            let size = (content - s - e - margin_start - margin_end).max(0.0);
            (s + margin_start, size)
        }
        (Some(s), None) => (s + margin_start, own),
        (None, Some(e)) => (content - e - margin_end - own, own),
        (None, None) => (margin_start, own),
    }
}
