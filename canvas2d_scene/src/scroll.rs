// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll container state machine (§4.13): clamped scroll offset, wheel
//! input, click-deferral, and inertia decay.

use kurbo::Point;

/// Travel distance past which a pointer-down-then-move on a scroll
/// container commits to scrolling rather than a potential click (§4.13,
/// shared with the drag arm threshold in §4.12).
pub const DRAG_THRESHOLD: f64 = 5.0;

/// Default per-frame velocity decay factor (§4.13).
pub const DEFAULT_FRICTION: f64 = 0.95;

/// Default click-deferral window in milliseconds (§4.13).
pub const DEFAULT_DEFERRAL_MS: f64 = 250.0;

/// Velocity magnitude below which inertia stops (implementation constant;
/// spec names no exact value, only "falls below threshold").
pub const VELOCITY_EPSILON: f64 = 0.01;

struct Gesture {
    start: Point,
    elapsed_ms: f64,
    past_threshold: bool,
}

/// Outcome of releasing the pointer after a click-deferral gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Travel stayed under the threshold and within the deferral window:
    /// deliver `click` to the original target.
    DeliverClick,
    /// Travel exceeded the threshold (or the gesture never started): no
    /// click, the container kept scrolling.
    NoClick,
}

/// Per-scroll-container runtime state (§4.13).
#[derive(Debug)]
pub struct ScrollState {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub max_scroll_x: f64,
    pub max_scroll_y: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub friction: f64,
    pub click_deferral_ms: f64,
    gesture: Option<Gesture>,
}

impl ScrollState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            max_scroll_x: 0.0,
            max_scroll_y: 0.0,
            velocity_x: 0.0,
            velocity_y: 0.0,
            friction: DEFAULT_FRICTION,
            click_deferral_ms: DEFAULT_DEFERRAL_MS,
            gesture: None,
        }
    }

    /// Sets the scrollable extent: `max_scroll = max(0, content - viewport)`
    /// on each axis, re-clamping the current offset.
    pub fn set_content_extent(&mut self, content_w: f64, content_h: f64, viewport_w: f64, viewport_h: f64) {
        self.max_scroll_x = (content_w - viewport_w).max(0.0);
        self.max_scroll_y = (content_h - viewport_h).max(0.0);
        self.clamp();
    }

    fn clamp(&mut self) {
        self.scroll_x = self.scroll_x.clamp(0.0, self.max_scroll_x);
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll_y);
    }

    /// Directly sets the scroll offset, clamped to `[0, max]` (§4.13, §8:
    /// "Setting `scrollX` above `contentWidth - width` clamps to the max;
    /// below 0 clamps to 0").
    pub fn set_scroll(&mut self, x: f64, y: f64) {
        self.scroll_x = x;
        self.scroll_y = y;
        self.clamp();
    }

    /// Wheel input: adds `(delta_x, delta_y)` to scroll, clamped (§4.13).
    pub fn apply_wheel(&mut self, delta_x: f64, delta_y: f64) {
        self.scroll_x += delta_x;
        self.scroll_y += delta_y;
        self.clamp();
    }

    /// Arms the click-deferral timer on pointer-down over the container.
    pub fn begin_gesture(&mut self, start: Point) {
        self.gesture = Some(Gesture {
            start,
            elapsed_ms: 0.0,
            past_threshold: false,
        });
        self.velocity_x = 0.0;
        self.velocity_y = 0.0;
    }

    /// Advances the gesture clock and records pointer travel. Returns the
    /// move delta to apply as scroll once travel has passed the threshold
    /// (the caller applies it and also records it for inertia), or `None`
    /// while still within the potential-click window.
    pub fn update_gesture(&mut self, pos: Point, dt_ms: f64) -> Option<(f64, f64)> {
        let Some(gesture) = self.gesture.as_mut() else {
            return None;
        };
        gesture.elapsed_ms += dt_ms;
        let traveled = (pos - gesture.start).hypot();
        if !gesture.past_threshold && traveled >= DRAG_THRESHOLD {
            gesture.past_threshold = true;
        }
        if gesture.past_threshold {
            let delta = pos - gesture.start;
            Some((delta.x, delta.y))
        } else {
            None
        }
    }

    /// Whether the armed gesture has crossed the scroll threshold.
    #[must_use]
    pub fn is_scrolling_gesture(&self) -> bool {
        self.gesture.as_ref().is_some_and(|g| g.past_threshold)
    }

    /// Releases the pointer, ending the gesture and deciding whether the
    /// deferred child should receive `click` (§8: "pointerdown → pointerup
    /// within threshold and within 5 units of travel ⇒ child receives
    /// click; beyond 5 units of travel ⇒ child does not receive click").
    pub fn end_gesture(&mut self) -> ReleaseOutcome {
        let Some(gesture) = self.gesture.take() else {
            return ReleaseOutcome::NoClick;
        };
        if !gesture.past_threshold && gesture.elapsed_ms <= self.click_deferral_ms {
            ReleaseOutcome::DeliverClick
        } else {
            ReleaseOutcome::NoClick
        }
    }

    /// Cancels an in-progress gesture (e.g. a new pointerdown supersedes
    /// inertia, §5 "Cancellation").
    pub fn cancel_gesture(&mut self) {
        self.gesture = None;
    }

    /// Sets the instantaneous velocity used to seed inertia on release
    /// (§4.13: "computed as last per-move delta").
    pub fn set_velocity(&mut self, vx: f64, vy: f64) {
        self.velocity_x = vx;
        self.velocity_y = vy;
    }

    /// Advances one frame of inertial decay: `velocity *= friction^(dt*60)`,
    /// scroll advanced by the resulting velocity. Returns `false` once
    /// velocity has fallen below [`VELOCITY_EPSILON`] on both axes (decay
    /// complete).
    pub fn tick_inertia(&mut self, dt_seconds: f64) -> bool {
        let decay = self.friction.powf(dt_seconds * 60.0);
        self.velocity_x *= decay;
        self.velocity_y *= decay;
        self.scroll_x += self.velocity_x;
        self.scroll_y += self.velocity_y;
        self.clamp();
        self.velocity_x.abs() > VELOCITY_EPSILON || self.velocity_y.abs() > VELOCITY_EPSILON
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}
