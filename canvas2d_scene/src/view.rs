// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A rendering/interaction endpoint bound to a host surface (§3.5):
//! [`canvas2d_view::View`] plus the per-view [`InteractionManager`] that
//! converts device-space pointer input into scene-space hit tests.

use canvas2d_view::View;
use kurbo::Point;

use crate::error::TreeError;
use crate::interaction::InteractionManager;
use crate::paint::{paint_view, PaintCtx};
use crate::tree::Tree;

/// One attached view (§3.5): pan/zoom/layers plus this view's independent
/// hover/drag/focus/scroll state.
pub struct SceneView<B> {
    view: View<B>,
    interaction: InteractionManager,
}

impl<B> SceneView<B> {
    #[must_use]
    pub fn new(view_rect: kurbo::Rect, dpr: f64) -> Self {
        Self {
            view: View::new(view_rect, dpr),
            interaction: InteractionManager::new(),
        }
    }

    #[must_use]
    pub fn view(&self) -> &View<B> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View<B> {
        &mut self.view
    }

    #[must_use]
    pub fn interaction(&self) -> &InteractionManager {
        &self.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut InteractionManager {
        &mut self.interaction
    }

    fn to_scene(&self, device_pt: Point) -> Point {
        self.view.viewport().view_to_world_point(device_pt)
    }

    /// `pointerdown` at a device-space position.
    pub fn pointer_down(
        &mut self,
        tree: &mut Tree,
        buffer: &canvas2d_hit::HitBuffer,
        pixel_buffer_available: bool,
        device_pt: Point,
    ) -> Result<(), TreeError> {
        let p = self.to_scene(device_pt);
        self.interaction.pointer_down(tree, buffer, pixel_buffer_available, p.x, p.y)
    }

    /// `pointermove` at a device-space position.
    pub fn pointer_move(
        &mut self,
        tree: &mut Tree,
        buffer: &canvas2d_hit::HitBuffer,
        pixel_buffer_available: bool,
        device_pt: Point,
        dt_ms: f64,
    ) -> Result<(), TreeError> {
        let p = self.to_scene(device_pt);
        self.interaction
            .pointer_move(tree, buffer, pixel_buffer_available, p.x, p.y, dt_ms)
    }

    /// `pointerup` at a device-space position.
    pub fn pointer_up(
        &mut self,
        tree: &mut Tree,
        buffer: &canvas2d_hit::HitBuffer,
        pixel_buffer_available: bool,
        device_pt: Point,
    ) -> Result<(), TreeError> {
        let p = self.to_scene(device_pt);
        self.interaction.pointer_up(tree, buffer, pixel_buffer_available, p.x, p.y)
    }

    /// `wheel` at a device-space position.
    pub fn wheel(
        &mut self,
        tree: &mut Tree,
        buffer: &canvas2d_hit::HitBuffer,
        pixel_buffer_available: bool,
        device_pt: Point,
        delta_x: f64,
        delta_y: f64,
    ) -> Result<(), TreeError> {
        let p = self.to_scene(device_pt);
        self.interaction
            .wheel(tree, buffer, pixel_buffer_available, p.x, p.y, delta_x, delta_y)
    }

    /// Re-evaluates hover at the last known pointer position without a new
    /// input event (§4.14 post-paint step).
    pub fn refresh_hover(
        &mut self,
        tree: &mut Tree,
        buffer: &canvas2d_hit::HitBuffer,
        pixel_buffer_available: bool,
    ) -> Result<(), TreeError> {
        self.interaction.refresh_hover(tree, buffer, pixel_buffer_available)
    }

    /// Paints the tree into `layer_id`'s backend (§4.6), using this view's
    /// device transform and visible-world rect.
    pub fn paint(&mut self, tree: &Tree, layer_id: &str) -> Result<(), TreeError>
    where
        B: PaintCtx,
    {
        let device_transform = self.view.device_transform();
        let scene_view_rect = self.view.viewport().visible_world_rect();
        let Some(layer) = self.view.layer_mut(layer_id) else {
            return Ok(());
        };
        let Some(backend) = layer.backend_mut() else {
            return Ok(());
        };
        paint_view(tree, backend, device_transform, scene_view_rect)
    }
}
