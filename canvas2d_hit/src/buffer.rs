// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene-resolution hit buffer (Module I, §4.7).
//!
//! An offscreen RGBA8 raster, one pixel per scene unit at scene resolution,
//! color-coded by element `uid`. Interactive elements paint their shape
//! into it in a flat color derived from `uid`; sampling decodes the color
//! back into a node lookup. `rgb(0,0,0)` (alpha 0) means "no element"
//! because `uid` starts at 1.

use alloc::vec::Vec;

use canvas2d_geom::{Affine, Rect, point_in_quad, transformed_quad};

/// Splits a `uid` into the RGB triple the hit buffer encodes it as (§4.7):
/// `R = (uid >> 16) & 0xFF`, `G = (uid >> 8) & 0xFF`, `B = uid & 0xFF`.
#[must_use]
pub fn encode_uid(uid: u32) -> (u8, u8, u8) {
    (
        ((uid >> 16) & 0xFF) as u8,
        ((uid >> 8) & 0xFF) as u8,
        (uid & 0xFF) as u8,
    )
}

/// Recombines an RGB triple back into a `uid`.
#[must_use]
pub fn decode_uid(r: u8, g: u8, b: u8) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// An offscreen UID-color raster at scene resolution.
#[derive(Clone, Debug)]
pub struct HitBuffer {
    width: u32,
    height: u32,
    // RGBA8, row-major, origin top-left.
    pixels: Vec<[u8; 4]>,
}

impl HitBuffer {
    /// Creates a buffer of `width x height` scene pixels, fully transparent
    /// (no element) everywhere.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: alloc::vec![[0, 0, 0, 0]; count],
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resizes the buffer, clearing it (§6 `Scene::resize`).
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        let count = (width as usize) * (height as usize);
        self.pixels = alloc::vec![[0, 0, 0, 0]; count];
    }

    /// Clears the entire buffer back to "no element".
    pub fn clear(&mut self) {
        for px in &mut self.pixels {
            *px = [0, 0, 0, 0];
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Paints `local_bounds` transformed by `world` in `uid`'s flat color,
    /// painter's-algorithm style (later calls win ties). Pixels whose
    /// center falls outside the transformed quad are left untouched, which
    /// gives pixel-accurate coverage for rotated/skewed nodes, not just
    /// their AABB.
    pub fn paint_uid_rect(&mut self, local_bounds: Rect, world: Affine, uid: u32) {
        let (r, g, b) = encode_uid(uid);
        let quad = transformed_quad(world, local_bounds);
        let aabb = canvas2d_geom::transform_aabb(world, local_bounds);

        let x0 = aabb.x0.floor().max(0.0) as i64;
        let y0 = aabb.y0.floor().max(0.0) as i64;
        let x1 = aabb.x1.ceil().min(f64::from(self.width)) as i64;
        let y1 = aabb.y1.ceil().min(f64::from(self.height)) as i64;

        for py in y0.max(0)..y1.max(0) {
            for px in x0.max(0)..x1.max(0) {
                let cx = px as f64 + 0.5;
                let cy = py as f64 + 0.5;
                if point_in_quad(quad, kurbo::Point::new(cx, cy)) {
                    let idx = self.index(px as u32, py as u32);
                    self.pixels[idx] = [r, g, b, 255];
                }
            }
        }
    }

    /// Samples the buffer at an integer scene-space pixel.
    ///
    /// Returns `0` ("no element") when out of bounds or when the sampled
    /// alpha is below `alpha_threshold` (§4.7).
    #[must_use]
    pub fn sample(&self, x: i32, y: i32, alpha_threshold: u8) -> u32 {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return 0;
        }
        let idx = self.index(x as u32, y as u32);
        let [r, g, b, a] = self.pixels[idx];
        if a < alpha_threshold {
            return 0;
        }
        decode_uid(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas2d_geom::Affine;

    #[test]
    fn encode_decode_roundtrip() {
        let uid = 0x00AB_CDEF & 0x00FF_FFFF;
        let (r, g, b) = encode_uid(uid);
        assert_eq!(decode_uid(r, g, b), uid);
    }

    #[test]
    fn overlapping_rects_topmost_wins() {
        let mut buf = HitBuffer::new(20, 20);
        buf.paint_uid_rect(Rect::new(0.0, 0.0, 15.0, 15.0), Affine::IDENTITY, 1);
        buf.paint_uid_rect(Rect::new(5.0, 5.0, 20.0, 20.0), Affine::IDENTITY, 2);

        // Overlap region: painted last (uid 2) wins.
        assert_eq!(buf.sample(10, 10, 10), 2);
        // Region only under uid 1.
        assert_eq!(buf.sample(2, 2, 10), 1);
    }

    #[test]
    fn transparent_region_samples_zero() {
        let mut buf = HitBuffer::new(10, 10);
        buf.paint_uid_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Affine::IDENTITY, 5);
        assert_eq!(buf.sample(8, 8, 10), 0);
    }

    #[test]
    fn out_of_bounds_samples_zero() {
        let buf = HitBuffer::new(10, 10);
        assert_eq!(buf.sample(-1, 0, 10), 0);
        assert_eq!(buf.sample(0, -1, 10), 0);
        assert_eq!(buf.sample(10, 0, 10), 0);
        assert_eq!(buf.sample(0, 10, 10), 0);
    }

    #[test]
    fn resize_clears_buffer() {
        let mut buf = HitBuffer::new(4, 4);
        buf.paint_uid_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Affine::IDENTITY, 3);
        assert_eq!(buf.sample(1, 1, 10), 3);
        buf.resize(8, 8);
        assert_eq!(buf.sample(1, 1, 10), 0);
        assert_eq!(buf.width(), 8);
    }
}
