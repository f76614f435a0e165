// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering/interaction endpoints bound to a host surface (§3.5, §4.6).
//!
//! A [`View`] owns pan/zoom (delegated to [`crate::Viewport2D`]), a device
//! pixel ratio, an ordered set of named layers (each a separate raster
//! surface), and optional source→destination projections of the scene. A
//! scene may have zero or more views, each rendering the same scene with
//! its own pan/zoom.
//!
//! The host-surface backend itself (§6) is acquired per-view per-layer by
//! the host; this crate only tracks the slot, not its contents.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Affine, Rect};

use crate::Viewport2D;

/// Errors from view operations that are programmer errors rather than
/// recoverable conditions (§7 "Invariant violation").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// `addLayer` with an id that already exists.
    DuplicateLayer,
    /// `removeLayer`/layer lookup with an id that does not exist.
    InvalidLayerId,
    /// A projection's destination rectangle has zero width or height and
    /// cannot support an invertible transform.
    SingularTransform,
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::DuplicateLayer => "layer id already exists",
            Self::InvalidLayerId => "no layer with that id",
            Self::SingularTransform => "projection destination rect is degenerate",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
mod std_error {
    extern crate std;

    use super::ViewError;

    impl std::error::Error for ViewError {}
}

/// A single named raster surface within a [`View`].
///
/// The backend itself (the host's paint-context handle, §6) is acquired
/// lazily by the host and stored here; this crate never instantiates one.
pub struct Layer<B> {
    id: String,
    backend: Option<B>,
}

impl<B> Layer<B> {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    #[must_use]
    pub fn backend_mut(&mut self) -> Option<&mut B> {
        self.backend.as_mut()
    }

    pub fn set_backend(&mut self, backend: B) {
        self.backend = Some(backend);
    }

    pub fn take_backend(&mut self) -> Option<B> {
        self.backend.take()
    }
}

impl<B: fmt::Debug> fmt::Debug for Layer<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("id", &self.id)
            .field("backend", &self.backend)
            .finish()
    }
}

/// A source-rect → dest-rect remapping of the scene within a view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub source: Rect,
    pub dest: Rect,
}

/// A rendering and interaction endpoint bound to a host surface container
/// (§3.5).
pub struct View<B> {
    viewport: Viewport2D,
    dpr: f64,
    layers: Vec<Layer<B>>,
    projections: Vec<Projection>,
}

impl<B> View<B> {
    /// Creates a view covering `view_rect` in device-independent units,
    /// with a single `"default"` layer and device-pixel-ratio `dpr`.
    #[must_use]
    pub fn new(view_rect: Rect, dpr: f64) -> Self {
        Self {
            viewport: Viewport2D::new(view_rect),
            dpr: dpr.max(f64::MIN_POSITIVE),
            layers: alloc::vec![Layer {
                id: String::from("default"),
                backend: None,
            }],
            projections: Vec::new(),
        }
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport2D {
        &self.viewport
    }

    #[must_use]
    pub fn viewport_mut(&mut self) -> &mut Viewport2D {
        &mut self.viewport
    }

    #[must_use]
    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    pub fn set_dpr(&mut self, dpr: f64) {
        self.dpr = dpr.max(f64::MIN_POSITIVE);
    }

    /// The `DPR · Zoom · Pan` portion of the paint transform (§4.6 step 3);
    /// the orchestrator composes this with each painted node's world
    /// matrix.
    #[must_use]
    pub fn device_transform(&self) -> Affine {
        Affine::scale(self.dpr) * self.viewport.world_to_view_affine()
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer<B>] {
        &self.layers
    }

    pub fn layer(&self, id: &str) -> Option<&Layer<B>> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: &str) -> Option<&mut Layer<B>> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Every layer, mutably. Used by teardown paths that need to reach each
    /// layer's backend without knowing its id in advance.
    pub fn layers_mut(&mut self) -> &mut [Layer<B>] {
        &mut self.layers
    }

    /// Appends a new, empty layer. Errors if `id` is already in use.
    pub fn add_layer(&mut self, id: &str) -> Result<(), ViewError> {
        if self.layers.iter().any(|l| l.id == id) {
            return Err(ViewError::DuplicateLayer);
        }
        self.layers.push(Layer {
            id: String::from(id),
            backend: None,
        });
        Ok(())
    }

    /// Removes a layer by id. Errors if no such layer exists.
    pub fn remove_layer(&mut self, id: &str) -> Result<(), ViewError> {
        let before = self.layers.len();
        self.layers.retain(|l| l.id != id);
        if self.layers.len() == before {
            return Err(ViewError::InvalidLayerId);
        }
        Ok(())
    }

    #[must_use]
    pub fn projections(&self) -> &[Projection] {
        &self.projections
    }

    /// Adds a source→dest remapping. Errors if `dest` is degenerate (zero
    /// width or height), since such a remapping cannot be inverted for hit
    /// testing.
    pub fn add_projection(&mut self, source: Rect, dest: Rect) -> Result<(), ViewError> {
        if dest.width() <= 0.0 || dest.height() <= 0.0 {
            return Err(ViewError::SingularTransform);
        }
        self.projections.push(Projection { source, dest });
        Ok(())
    }

    pub fn clear_projections(&mut self) {
        self.projections.clear();
    }
}

impl<B: fmt::Debug> fmt::Debug for View<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("dpr", &self.dpr)
            .field("layers", &self.layers)
            .field("projections", &self.projections)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_view_has_a_default_layer() {
        let view: View<()> = View::new(Rect::new(0.0, 0.0, 800.0, 600.0), 1.0);
        assert_eq!(view.layers().len(), 1);
        assert_eq!(view.layer("default").unwrap().id(), "default");
    }

    #[test]
    fn adding_duplicate_layer_id_errors() {
        let mut view: View<()> = View::new(Rect::new(0.0, 0.0, 100.0, 100.0), 1.0);
        assert_eq!(view.add_layer("default"), Err(ViewError::DuplicateLayer));
    }

    #[test]
    fn removing_unknown_layer_errors() {
        let mut view: View<()> = View::new(Rect::new(0.0, 0.0, 100.0, 100.0), 1.0);
        assert_eq!(view.remove_layer("missing"), Err(ViewError::InvalidLayerId));
    }

    #[test]
    fn add_then_remove_layer_round_trips() {
        let mut view: View<()> = View::new(Rect::new(0.0, 0.0, 100.0, 100.0), 1.0);
        view.add_layer("overlay").unwrap();
        assert_eq!(view.layers().len(), 2);
        view.remove_layer("overlay").unwrap();
        assert_eq!(view.layers().len(), 1);
    }

    #[test]
    fn degenerate_projection_dest_is_rejected() {
        let mut view: View<()> = View::new(Rect::new(0.0, 0.0, 100.0, 100.0), 1.0);
        let source = Rect::new(0.0, 0.0, 10.0, 10.0);
        let dest = Rect::new(0.0, 0.0, 0.0, 10.0);
        assert_eq!(
            view.add_projection(source, dest),
            Err(ViewError::SingularTransform)
        );
    }

    #[test]
    fn device_transform_applies_dpr_on_top_of_pan_zoom() {
        let mut view: View<()> = View::new(Rect::new(0.0, 0.0, 100.0, 100.0), 2.0);
        view.viewport_mut().set_zoom(1.0);
        let t = view.device_transform();
        let p = t * kurbo::Point::new(10.0, 0.0);
        assert!((p.x - 20.0).abs() < 1e-9);
    }

    #[test]
    fn dpr_is_floored_above_zero() {
        let mut view: View<()> = View::new(Rect::new(0.0, 0.0, 100.0, 100.0), 1.0);
        view.set_dpr(0.0);
        assert!(view.dpr() > 0.0);
    }
}
