// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke-oriented helper for precise hit testing.
//!
//! This is intentionally a small building block rather than a full stroke
//! model: joins, caps, and variable-width strokes are left to whatever
//! geometry collaborator (§6) owns the node's actual shape.

use kurbo::{Line, ParamCurveNearest, Point};

use crate::{HitKind, HitParams, HitScore, PreciseHitTest};

/// A stroked line segment (centerline + half-width) in local coordinates.
#[derive(Clone, Copy, Debug)]
pub struct StrokedLine {
    /// The centerline segment, in local coordinates.
    pub line: Line,
    /// Half of the stroke width, in local units.
    pub half_width: f64,
}

impl PreciseHitTest for StrokedLine {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        let dist = self.line.nearest(pt, 0.0).distance_sq.sqrt();
        let limit = self.half_width + params.stroke_tolerance;
        if dist <= limit {
            Some(HitScore {
                distance: dist,
                kind: HitKind::Stroke,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroked_line_hit_and_miss() {
        let line = Line::new((0.0, 0.0), (10.0, 0.0));
        let stroked = StrokedLine {
            line,
            half_width: 1.0,
        };

        let center = Point::new(5.0, 0.0);
        let near = Point::new(5.0, 0.5);
        let outside = Point::new(5.0, 5.0);

        let params = HitParams::default();

        assert!(stroked.hit_test_local(center, &params).is_some());
        assert!(stroked.hit_test_local(near, &params).is_some());
        assert!(stroked.hit_test_local(outside, &params).is_none());
    }
}
