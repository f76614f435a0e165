// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pass 1 — bottom-up intrinsic sizing (§4.5).

use hashbrown::HashMap;
use kurbo::Size;

use crate::style::{Display, FlexDirection};
use crate::{axis_padding, LayoutTree};

/// Measures `node` given the (possibly unknown) size of its containing
/// block, caching every visited node's natural size along the way so
/// `arrange` doesn't need to re-derive it.
pub(crate) fn measure<T: LayoutTree>(
    tree: &T,
    node: T::NodeId,
    avail_w: Option<f64>,
    avail_h: Option<f64>,
    cache: &mut HashMap<T::NodeId, Size>,
) -> Size {
    let style = tree.style(node);
    let resolved_w = style.width.resolve(avail_w);
    let resolved_h = style.height.resolve(avail_h);
    let children = tree.children(node);

    let size = if children.is_empty() {
        let intrinsic = tree.intrinsic_content_size(node);
        Size::new(
            resolved_w.unwrap_or(intrinsic.width),
            resolved_h.unwrap_or(intrinsic.height),
        )
    } else if style.display == Display::Flex {
        let is_row = style.flex_direction == FlexDirection::Row;
        let (main_start, main_end, cross_start, cross_end) =
            axis_padding(style.padding, style.flex_direction);

        let mut main_sum = 0.0_f64;
        let mut cross_max = 0.0_f64;
        let mut first = true;
        for &child in &children {
            let child_size = measure(tree, child, resolved_w, resolved_h, cache);
            let cstyle = tree.style(child);
            let (natural_main, natural_cross) = if is_row {
                (child_size.width, child_size.height)
            } else {
                (child_size.height, child_size.width)
            };
            let main_unit = if is_row { cstyle.width } else { cstyle.height };
            let main_avail = if is_row { resolved_w } else { resolved_h };
            let basis = cstyle
                .flex_basis
                .resolve(main_avail)
                .or_else(|| main_unit.resolve(main_avail))
                .unwrap_or(natural_main);
            if !first {
                main_sum += style.gap;
            }
            first = false;
            main_sum += basis;
            cross_max = cross_max.max(natural_cross);
        }
        main_sum += main_start + main_end;
        cross_max += cross_start + cross_end;

        let (auto_w, auto_h) = if is_row {
            (main_sum, cross_max)
        } else {
            (cross_max, main_sum)
        };
        Size::new(resolved_w.unwrap_or(auto_w), resolved_h.unwrap_or(auto_h))
    } else {
        // Manual and anchor containers: recurse for caching purposes, but an
        // auto size on the container itself falls back to its own intrinsic
        // content size rather than summarizing children, mirroring the
        // leaf rule — §4.5 only spells out auto-sizing formulas for flex.
        for &child in &children {
            measure(tree, child, resolved_w, resolved_h, cache);
        }
        let intrinsic = tree.intrinsic_content_size(node);
        Size::new(
            resolved_w.unwrap_or(intrinsic.width),
            resolved_h.unwrap_or(intrinsic.height),
        )
    };

    cache.insert(node, size);
    size
}
