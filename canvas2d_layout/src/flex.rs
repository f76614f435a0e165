// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pass 2, flex branch: one-pass grow/shrink distribution, wrap, justify,
//! align (§4.5).

use alloc::vec;
use alloc::vec::Vec;
use hashbrown::HashMap;
use kurbo::{Rect, Size};

use crate::style::{AlignItems, Display, FlexDirection, FlexWrap, JustifyContent, Style};
use crate::{arrange, axis_padding, LayoutTree};

#[derive(Clone, Copy)]
struct Item<K> {
    id: K,
    basis: f64,
    cross: f64,
    grow: f64,
    shrink: f64,
    min_main: Option<f64>,
    max_main: Option<f64>,
    align_self: Option<AlignItems>,
}

pub(crate) fn arrange_flex<T: LayoutTree>(
    tree: &mut T,
    style: &Style,
    children: &[T::NodeId],
    content: Rect,
    cache: &HashMap<T::NodeId, Size>,
) {
    let is_row = style.flex_direction == FlexDirection::Row;
    let (main_start, main_end, cross_start, cross_end) = axis_padding(style.padding, style.flex_direction);
    let main_size = ((if is_row { content.width() } else { content.height() }) - main_start - main_end).max(0.0);
    let cross_size = ((if is_row { content.height() } else { content.width() }) - cross_start - cross_end).max(0.0);

    let mut items: Vec<Item<T::NodeId>> = Vec::new();
    for &child in children {
        let cstyle = tree.style(child);
        if cstyle.display == Display::Manual {
            let rect = tree.computed_rect(child);
            arrange(tree, child, rect, cache);
            continue;
        }
        let natural = cache.get(&child).copied().unwrap_or(Size::new(0.0, 0.0));
        let (natural_main, natural_cross) = if is_row {
            (natural.width, natural.height)
        } else {
            (natural.height, natural.width)
        };
        let main_unit = if is_row { cstyle.width } else { cstyle.height };
        let cross_unit = if is_row { cstyle.height } else { cstyle.width };
        let basis = cstyle
            .flex_basis
            .resolve(Some(main_size))
            .or_else(|| main_unit.resolve(Some(main_size)))
            .unwrap_or(natural_main);
        let cross = cross_unit.resolve(Some(cross_size)).unwrap_or(natural_cross);

        let (min_width, max_width, min_height, max_height) = (
            cstyle.min_width.and_then(|u| u.resolve(Some(if is_row { main_size } else { cross_size }))),
            cstyle.max_width.and_then(|u| u.resolve(Some(if is_row { main_size } else { cross_size }))),
            cstyle.min_height.and_then(|u| u.resolve(Some(if is_row { cross_size } else { main_size }))),
            cstyle.max_height.and_then(|u| u.resolve(Some(if is_row { cross_size } else { main_size }))),
        );
        let (min_main, max_main) = if is_row { (min_width, max_width) } else { (min_height, max_height) };

        items.push(Item {
            id: child,
            basis,
            cross,
            grow: cstyle.flex_grow.max(0.0),
            shrink: cstyle.flex_shrink.max(0.0),
            min_main,
            max_main,
            align_self: cstyle.align_self,
        });
    }

    let lines = group_lines(&items, main_size, style.flex_wrap, style.gap);

    let mut cross_cursor = cross_start;
    for line in &lines {
        let line_cross = if style.flex_wrap == FlexWrap::Wrap {
            line.iter().map(|it| it.cross).fold(0.0_f64, f64::max)
        } else {
            cross_size
        };
        place_line(tree, style, line, content, is_row, main_start, main_size, cross_cursor, line_cross, cache);
        cross_cursor += line_cross;
    }
}

fn group_lines<K: Copy>(items: &[Item<K>], main_size: f64, wrap: FlexWrap, gap: f64) -> Vec<Vec<Item<K>>> {
    if items.is_empty() {
        return Vec::new();
    }
    if wrap == FlexWrap::NoWrap {
        return vec![items.to_vec()];
    }
    let mut lines: Vec<Vec<Item<K>>> = Vec::new();
    let mut current: Vec<Item<K>> = Vec::new();
    let mut cursor = 0.0_f64;
    for item in items {
        let would_be = if current.is_empty() { item.basis } else { cursor + gap + item.basis };
        if !current.is_empty() && would_be > main_size {
            lines.push(current);
            current = Vec::new();
            cursor = item.basis;
        } else {
            cursor = would_be;
        }
        current.push(*item);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[allow(clippy::too_many_arguments)]
fn place_line<T: LayoutTree>(
    tree: &mut T,
    style: &Style,
    line: &[Item<T::NodeId>],
    content: Rect,
    is_row: bool,
    main_start: f64,
    main_size: f64,
    cross_cursor: f64,
    line_cross: f64,
    cache: &HashMap<T::NodeId, Size>,
) {
    if line.is_empty() {
        return;
    }
    let n = line.len();
    let total_basis: f64 = line.iter().map(|it| it.basis).sum::<f64>() + style.gap * (n as f64 - 1.0).max(0.0);
    let free = main_size - total_basis;

    let mut finals: Vec<f64> = line.iter().map(|it| it.basis).collect();
    if free > 0.0 {
        let total_grow: f64 = line.iter().map(|it| it.grow).sum();
        if total_grow > 0.0 {
            for (i, it) in line.iter().enumerate() {
                finals[i] += free * (it.grow / total_grow);
            }
        }
    } else if free < 0.0 {
        let total_weight: f64 = line.iter().map(|it| it.shrink * it.basis).sum();
        if total_weight > 0.0 {
            for (i, it) in line.iter().enumerate() {
                finals[i] += free * (it.shrink * it.basis / total_weight);
            }
        }
    }
    for (i, it) in line.iter().enumerate() {
        if let Some(min) = it.min_main {
            finals[i] = finals[i].max(min);
        }
        if let Some(max) = it.max_main {
            finals[i] = finals[i].min(max);
        }
        finals[i] = finals[i].max(0.0);
    }

    let sum_final: f64 = finals.iter().sum::<f64>() + style.gap * (n as f64 - 1.0).max(0.0);
    let residual = main_size - sum_final;

    let (leading, between) = match style.justify_content {
        JustifyContent::Start => (0.0, 0.0),
        JustifyContent::Center => (residual / 2.0, 0.0),
        JustifyContent::End => (residual, 0.0),
        JustifyContent::SpaceBetween => {
            if n > 1 {
                (0.0, residual / (n as f64 - 1.0))
            } else {
                (0.0, 0.0)
            }
        }
        JustifyContent::SpaceAround => {
            let space = residual / n as f64;
            (space / 2.0, space)
        }
    };

    let mut cursor = main_start + leading;
    for (i, it) in line.iter().enumerate() {
        let final_main = finals[i];
        let align = it.align_self.unwrap_or(style.align_items);
        let (cross_size, cross_offset) = match align {
            AlignItems::Stretch => (line_cross, cross_cursor),
            AlignItems::Start => (it.cross, cross_cursor),
            AlignItems::Center => (it.cross, cross_cursor + (line_cross - it.cross) / 2.0),
            AlignItems::End => (it.cross, cross_cursor + (line_cross - it.cross)),
        };

        let rect = if is_row {
            Rect::new(
                content.x0 + cursor,
                content.y0 + cross_offset,
                content.x0 + cursor + final_main,
                content.y0 + cross_offset + cross_size,
            )
        } else {
            Rect::new(
                content.x0 + cross_offset,
                content.y0 + cursor,
                content.x0 + cross_offset + cross_size,
                content.y0 + cursor + final_main,
            )
        };
        let rect = crate::snap_rect(rect);
        tree.set_computed_rect(it.id, rect);
        arrange(tree, it.id, rect, cache);

        cursor += final_main + style.gap + between;
    }
}
