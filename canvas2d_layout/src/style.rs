// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style fields the resolver reads (§3.3).

/// A style length: a concrete pixel value, a percentage of the containing
/// block's content-axis size, or `auto` (defer to content/distribution).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Unit {
    Px(f64),
    Percent(f64),
    Auto,
}

impl Default for Unit {
    fn default() -> Self {
        Self::Auto
    }
}

impl Unit {
    /// Resolves against a containing-axis size, if known. `Auto` never
    /// resolves; `Percent` only resolves when `containing` is `Some`.
    #[must_use]
    pub fn resolve(&self, containing: Option<f64>) -> Option<f64> {
        match *self {
            Self::Px(v) => Some(v),
            Self::Percent(p) => containing.map(|c| c * p / 100.0),
            Self::Auto => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Display {
    Manual,
    Flex,
    Anchor,
}

impl Default for Display {
    fn default() -> Self {
        Self::Manual
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlexDirection {
    Row,
    Column,
}

impl Default for FlexDirection {
    fn default() -> Self {
        Self::Row
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JustifyContent {
    Start,
    Center,
    End,
    SpaceBetween,
    SpaceAround,
}

impl Default for JustifyContent {
    fn default() -> Self {
        Self::Start
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlignItems {
    Start,
    Center,
    End,
    Stretch,
}

impl Default for AlignItems {
    fn default() -> Self {
        Self::Stretch
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlexWrap {
    NoWrap,
    Wrap,
}

impl Default for FlexWrap {
    fn default() -> Self {
        Self::NoWrap
    }
}

/// Inset box in `(top, right, bottom, left)` order, matching CSS-family
/// shorthand ordering (§3.3).
pub type EdgeInsets = [f64; 4];

/// A node's layout-relevant style fields (§3.3). Fields outside this set
/// (paint, transform, visibility) live on the node itself, not here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    pub display: Display,

    pub flex_direction: FlexDirection,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    pub flex_wrap: FlexWrap,
    pub gap: f64,

    pub flex_grow: f64,
    pub flex_shrink: f64,
    pub flex_basis: Unit,
    /// Per-child override of the parent's `alignItems` ("an `alignSelf`-
    /// equivalent field", §4.5 pass 2).
    pub align_self: Option<AlignItems>,

    pub width: Unit,
    pub height: Unit,
    pub min_width: Option<Unit>,
    pub max_width: Option<Unit>,
    pub min_height: Option<Unit>,
    pub max_height: Option<Unit>,

    pub padding: EdgeInsets,
    pub margin: EdgeInsets,

    pub top: Option<Unit>,
    pub left: Option<Unit>,
    pub right: Option<Unit>,
    pub bottom: Option<Unit>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            display: Display::default(),
            flex_direction: FlexDirection::default(),
            justify_content: JustifyContent::default(),
            align_items: AlignItems::default(),
            flex_wrap: FlexWrap::default(),
            gap: 0.0,
            flex_grow: 0.0,
            flex_shrink: 1.0,
            flex_basis: Unit::Auto,
            align_self: None,
            width: Unit::Auto,
            height: Unit::Auto,
            min_width: None,
            max_width: None,
            min_height: None,
            max_height: None,
            padding: [0.0; 4],
            margin: [0.0; 4],
            top: None,
            left: None,
            right: None,
            bottom: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_percent_defers_without_containing_size() {
        assert_eq!(Unit::Percent(50.0).resolve(None), None);
    }

    #[test]
    fn unit_percent_resolves_against_containing_size() {
        assert_eq!(Unit::Percent(50.0).resolve(Some(200.0)), Some(100.0));
    }

    #[test]
    fn unit_auto_never_resolves() {
        assert_eq!(Unit::Auto.resolve(Some(200.0)), None);
    }

    #[test]
    fn style_default_has_manual_display_and_shrink_one() {
        let style = Style::default();
        assert_eq!(style.display, Display::Manual);
        assert_eq!(style.flex_shrink, 1.0);
        assert_eq!(style.flex_grow, 0.0);
    }
}
