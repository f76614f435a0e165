// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Affine composition, AABB transform, and point containment helpers.
//!
//! This is the leaf geometry layer the rest of `canvas2d` builds on: node
//! transform composition (translate/rotate/skew/scale/pivot), AABB
//! propagation through a world matrix, and the point-in-quad test used by
//! the geometric narrow-phase hit-test fallback.
//!
//! Matrices are [`kurbo::Affine`] values throughout; this crate only adds
//! the domain-specific composition order and the checked inverse the rest
//! of the system needs (kurbo's own `Affine::inverse` does not signal
//! singularity).
//!
//! This crate is `no_std` and uses `alloc` through `kurbo`'s own feature
//! gating.

#![cfg_attr(not(feature = "std"), no_std)]

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Smallest positive value a scale component is coerced to when it would
/// otherwise be zero (`scale = 0` would make the local matrix singular).
pub const MIN_SCALE: f64 = f64::MIN_POSITIVE;

/// Determinant magnitude below which a matrix is treated as singular for
/// inversion purposes (spec §4.3, §4.15).
pub const SINGULAR_DET_EPSILON: f64 = 1e-10;

/// Coerces a scale factor away from zero, per §3.1: "`scaleX, scaleY` (zero
/// coerced to smallest positive representable float on use)".
#[inline]
#[must_use]
pub fn coerce_scale(scale: f64) -> f64 {
    if scale == 0.0 { MIN_SCALE } else { scale }
}

/// Composes a node's local matrix from its decomposed transform properties.
///
/// Order (outermost to innermost, per §4.1 step 2):
/// `T(x,y) · R(rotation) · Sk(skewX,skewY) · S(scaleX,scaleY) · T(-pivotX,-pivotY)`
///
/// `rotation`, `skew_x`, and `skew_y` are radians. Zero scale components are
/// coerced away from zero before composing, so the result is singular only
/// in degenerate skew configurations (not from a bare `scale = 0`).
#[must_use]
pub fn compose_local(
    x: f64,
    y: f64,
    rotation: f64,
    scale_x: f64,
    scale_y: f64,
    skew_x: f64,
    skew_y: f64,
    pivot_x: f64,
    pivot_y: f64,
) -> Affine {
    let sx = coerce_scale(scale_x);
    let sy = coerce_scale(scale_y);
    let translate = Affine::translate(Vec2::new(x, y));
    let rotate = Affine::rotate(rotation);
    let skew = skew_matrix(skew_x, skew_y);
    let scale = Affine::scale_non_uniform(sx, sy);
    let pivot = Affine::translate(Vec2::new(-pivot_x, -pivot_y));
    translate * rotate * skew * scale * pivot
}

/// Builds a shear matrix from skew angles (radians), CSS-`transform:
/// skew()`-style: `x' = x + tan(skewX) * y`, `y' = tan(skewY) * x + y`.
#[must_use]
pub fn skew_matrix(skew_x: f64, skew_y: f64) -> Affine {
    if skew_x == 0.0 && skew_y == 0.0 {
        return Affine::IDENTITY;
    }
    Affine::new([1.0, skew_y.tan(), skew_x.tan(), 1.0, 0.0, 0.0])
}

/// Inverts a matrix, returning `None` when `|det| < `[`SINGULAR_DET_EPSILON`]
/// rather than propagating the NaN/Inf that kurbo's unchecked inverse would
/// produce (§4.3, §4.15: "Invert of singular matrix returns null").
#[must_use]
pub fn invert_checked(m: Affine) -> Option<Affine> {
    let c = m.as_coeffs();
    let det = c[0] * c[3] - c[1] * c[2];
    if det.abs() < SINGULAR_DET_EPSILON {
        None
    } else {
        Some(m.inverse())
    }
}

/// Transforms the four corners of `local` by `m` and returns their
/// axis-aligned bounding box in the destination space (§4.3).
#[must_use]
pub fn transform_aabb(m: Affine, local: Rect) -> Rect {
    let corners = [
        Point::new(local.x0, local.y0),
        Point::new(local.x1, local.y0),
        Point::new(local.x1, local.y1),
        Point::new(local.x0, local.y1),
    ];
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for corner in corners {
        let p = m * corner;
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Rect::new(min_x, min_y, max_x, max_y)
}

/// Returns the four corners of `local` transformed by `m`, in order
/// top-left, top-right, bottom-right, bottom-left. Used by the geometric
/// narrow-phase (§4.9) when a node's local bounds are an arbitrary
/// quadrilateral in world space.
#[must_use]
pub fn transformed_quad(m: Affine, local: Rect) -> [Point; 4] {
    [
        m * Point::new(local.x0, local.y0),
        m * Point::new(local.x1, local.y0),
        m * Point::new(local.x1, local.y1),
        m * Point::new(local.x0, local.y1),
    ]
}

/// Point-in-convex-polygon test via the cross-product sign method.
///
/// `quad` must be wound consistently (all corners from [`transformed_quad`]
/// are, since an affine map preserves winding order up to a global sign
/// flip for reflections, which this function tolerates by comparing against
/// the sign of the first non-degenerate edge).
#[must_use]
pub fn point_in_quad(quad: [Point; 4], pt: Point) -> bool {
    let mut sign = 0.0_f64;
    for i in 0..4 {
        let a = quad[i];
        let b = quad[(i + 1) % 4];
        let edge = Vec2::new(b.x - a.x, b.y - a.y);
        let to_pt = Vec2::new(pt.x - a.x, pt.y - a.y);
        let cross = edge.x * to_pt.y - edge.y * to_pt.x;
        if cross == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

/// Axis-aligned containment test, used by AABB-variant hit testing (§4.9
/// `hitTestAABB`) and by drop-target detection (§4.12).
#[must_use]
pub fn rect_contains_point(rect: Rect, pt: Point) -> bool {
    pt.x >= rect.x0 && pt.x <= rect.x1 && pt.y >= rect.y0 && pt.y <= rect.y1
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_4, PI};

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn matrix_composition_is_associative() {
        let a = Affine::translate((3.0, -2.0)) * Affine::rotate(0.4);
        let b = Affine::scale_non_uniform(1.5, 0.7);
        let c = Affine::translate((-1.0, 4.0));

        let left = (a * b) * c;
        let right = a * (b * c);

        let lc = left.as_coeffs();
        let rc = right.as_coeffs();
        for i in 0..6 {
            assert!(approx_eq(lc[i], rc[i], 1e-6), "coefficient {i} mismatched");
        }
    }

    #[test]
    fn invert_recovers_identity() {
        let m = Affine::translate((10.0, 5.0)) * Affine::rotate(0.9) * Affine::scale(2.0);
        let inv = invert_checked(m).expect("non-singular");
        let round_trip = inv * m;
        let c = round_trip.as_coeffs();
        let identity = Affine::IDENTITY.as_coeffs();
        for i in 0..6 {
            assert!(approx_eq(c[i], identity[i], 1e-6));
        }
    }

    #[test]
    fn invert_rejects_singular_matrix() {
        // Zero scale on both axes collapses the matrix to rank 0.
        let singular = Affine::scale_non_uniform(0.0, 0.0);
        assert!(invert_checked(singular).is_none());
    }

    #[test]
    fn aabb_of_rotated_square_matches_diagonal() {
        // 100x100 rect rotated 45 degrees around its top-left corner (the
        // origin, since the rect starts at (0,0)).
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let m = Affine::rotate(FRAC_PI_4);
        let aabb = transform_aabb(m, rect);
        let expected = 100.0 * core::f64::consts::SQRT_2;
        assert!(approx_eq(aabb.width(), expected, 1e-3));
        assert!(approx_eq(aabb.height(), expected, 1e-3));
    }

    #[test]
    fn coerce_scale_avoids_zero() {
        assert_eq!(coerce_scale(0.0), MIN_SCALE);
        assert_eq!(coerce_scale(2.0), 2.0);
        assert_eq!(coerce_scale(-3.0), -3.0);
    }

    #[test]
    fn point_in_quad_basic() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let quad = transformed_quad(Affine::IDENTITY, rect);
        assert!(point_in_quad(quad, Point::new(5.0, 5.0)));
        assert!(!point_in_quad(quad, Point::new(15.0, 5.0)));
    }

    #[test]
    fn point_in_quad_rotated() {
        let rect = Rect::new(-5.0, -5.0, 5.0, 5.0);
        let m = Affine::rotate(PI / 4.0);
        let quad = transformed_quad(m, rect);
        // Center stays inside after rotation about the origin.
        assert!(point_in_quad(quad, Point::new(0.0, 0.0)));
        // A point well outside the rotated bounding diamond.
        assert!(!point_in_quad(quad, Point::new(6.0, 6.0)));
    }
}
