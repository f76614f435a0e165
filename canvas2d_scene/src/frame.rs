// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-timestep frame driver (§4.14): dt computation, FPS throttling,
//! and the registered-tickable update phase. Layout/paint/hit-buffer/hover
//! are orchestrated by [`crate::scene::Scene`], which calls
//! [`FrameDriver::tick`] first and runs the rest of the pipeline only when
//! it returns `Some`.

use alloc::boxed::Box;
use alloc::vec::Vec;

/// Default clamp on a single tick's `dt`, in seconds (§4.14).
pub const DEFAULT_MAX_DELTA_TIME: f64 = 0.1;

/// A registered per-frame updatable (§4.14 step 3: "for each registered
/// tickable, call `update(dt)`"). Animation/tween engines are external
/// collaborators that implement this; the frame driver only calls them in
/// order.
pub trait Tickable {
    fn update(&mut self, dt: f64);
}

/// A handle returned by [`FrameDriver::register`], usable with
/// [`FrameDriver::unregister`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickableId(usize);

/// Computes each tick's `deltaTime`, throttles to `globalFPS`, and runs the
/// update phase (§4.14).
pub struct FrameDriver {
    last_time: Option<f64>,
    accumulator: f64,
    global_fps: f64,
    max_delta_time: f64,
    tickables: Vec<Option<Box<dyn Tickable>>>,
}

impl FrameDriver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_time: None,
            accumulator: 0.0,
            global_fps: f64::INFINITY,
            max_delta_time: DEFAULT_MAX_DELTA_TIME,
            tickables: Vec::new(),
        }
    }

    #[must_use]
    pub fn global_fps(&self) -> f64 {
        self.global_fps
    }

    /// `0` pauses the driver entirely (no update phase runs); `∞` (the
    /// default) bypasses throttling and runs every tick (§4.14).
    pub fn set_global_fps(&mut self, fps: f64) {
        self.global_fps = fps.max(0.0);
    }

    #[must_use]
    pub fn max_delta_time(&self) -> f64 {
        self.max_delta_time
    }

    pub fn set_max_delta_time(&mut self, value: f64) {
        self.max_delta_time = value.max(0.0);
    }

    /// Registers a tickable to receive `update(dt)` every tick this driver
    /// runs its body (§4.14 step 3).
    pub fn register(&mut self, tickable: Box<dyn Tickable>) -> TickableId {
        self.tickables.push(Some(tickable));
        TickableId(self.tickables.len() - 1)
    }

    /// Removes a previously registered tickable. A no-op for an already-
    /// removed or out-of-range id.
    pub fn unregister(&mut self, id: TickableId) {
        if let Some(slot) = self.tickables.get_mut(id.0) {
            *slot = None;
        }
    }

    /// Stops the driver: the next [`Self::tick`] call only re-seeds
    /// `lastTime` (as if freshly constructed) instead of computing a `dt`
    /// from the gap since the last tick (§8: "`stop()` then `start()`
    /// followed by a 5-second gap before first tick produces `dt = 0` on
    /// the init tick, no spike").
    pub fn stop(&mut self) {
        self.last_time = None;
        self.accumulator = 0.0;
    }

    /// Restarts the driver after [`Self::stop`]. Ticking resumes
    /// immediately; this only exists to make the start/stop symmetry
    /// explicit at call sites, since [`Self::tick`] already re-seeds on the
    /// first call after a stop.
    pub fn start(&mut self) {
        self.last_time = None;
        self.accumulator = 0.0;
    }

    /// Advances the driver to `now` (seconds, monotonic). Returns the `dt`
    /// actually consumed by the update phase this tick, or `None` if the
    /// tick was skipped: the very first call (which only seeds
    /// `lastTime`), a paused driver (`globalFPS == 0`), or a throttled tick
    /// that hasn't accumulated enough time yet (§4.14 steps 1-3).
    ///
    /// When `Some` is returned every registered tickable has already run.
    pub fn tick(&mut self, now: f64) -> Option<f64> {
        let Some(last) = self.last_time else {
            self.last_time = Some(now);
            return None;
        };
        let raw_dt = (now - last).max(0.0);
        self.last_time = Some(now);

        if self.global_fps == 0.0 {
            return None;
        }

        let dt = if self.global_fps.is_finite() {
            self.accumulator += raw_dt;
            let period = 1.0 / self.global_fps;
            if self.accumulator < period {
                return None;
            }
            let dt = self.accumulator.min(self.max_delta_time);
            self.accumulator -= period;
            dt
        } else {
            raw_dt.min(self.max_delta_time)
        };

        for tickable in self.tickables.iter_mut().flatten() {
            tickable.update(dt);
        }
        Some(dt)
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for FrameDriver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameDriver")
            .field("last_time", &self.last_time)
            .field("accumulator", &self.accumulator)
            .field("global_fps", &self.global_fps)
            .field("max_delta_time", &self.max_delta_time)
            .field("tickables", &self.tickables.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::RefCell;

    struct Counter(Rc<RefCell<f64>>);
    impl Tickable for Counter {
        fn update(&mut self, dt: f64) {
            *self.0.borrow_mut() += dt;
        }
    }

    #[test]
    fn first_tick_only_seeds_last_time() {
        let mut driver = FrameDriver::new();
        assert_eq!(driver.tick(0.0), None);
    }

    #[test]
    fn unthrottled_driver_runs_every_tick_clamped_to_max_delta() {
        let mut driver = FrameDriver::new();
        driver.set_max_delta_time(0.1);
        driver.tick(0.0);
        assert_eq!(driver.tick(1.0), Some(0.1));
    }

    #[test]
    fn zero_fps_pauses_the_driver() {
        let mut driver = FrameDriver::new();
        driver.set_global_fps(0.0);
        driver.tick(0.0);
        assert_eq!(driver.tick(1.0), None);
    }

    #[test]
    fn throttled_driver_waits_for_the_accumulator_to_fill() {
        let mut driver = FrameDriver::new();
        driver.set_global_fps(10.0); // period = 0.1s
        driver.tick(0.0);
        assert_eq!(driver.tick(0.05), None);
        assert!(driver.tick(0.11).is_some());
    }

    #[test]
    fn registered_tickables_accumulate_dt() {
        let mut driver = FrameDriver::new();
        let total = Rc::new(RefCell::new(0.0));
        driver.register(Box::new(Counter(total.clone())));
        driver.tick(0.0);
        driver.tick(1.0);
        assert_eq!(*total.borrow(), 0.1);
    }

    #[test]
    fn stop_then_start_after_a_gap_does_not_spike_the_init_tick() {
        let mut driver = FrameDriver::new();
        driver.tick(0.0);
        driver.tick(1.0);
        driver.stop();
        driver.start();
        // A 5-second gap elapses while stopped; the first tick after
        // restart must only re-seed, not report a 5-second dt.
        assert_eq!(driver.tick(6.0), None);
        assert_eq!(driver.tick(6.1), Some(0.1));
    }

    #[test]
    fn unregistered_tickable_no_longer_runs() {
        let mut driver = FrameDriver::new();
        let total = Rc::new(RefCell::new(0.0));
        let id = driver.register(Box::new(Counter(total.clone())));
        driver.unregister(id);
        driver.tick(0.0);
        driver.tick(1.0);
        assert_eq!(*total.borrow(), 0.0);
    }
}
