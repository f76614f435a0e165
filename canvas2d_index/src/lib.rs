// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform-grid spatial index (Module E, §4.8).
//!
//! Buckets axis-aligned entries into fixed-size grid cells and answers
//! point/rect queries by touching only the cells the query overlaps. This
//! is the broad-phase half of hit testing (§4.9): entries are the subset of
//! nodes that are `visible && interactive`, and queries return
//! caller-reusable buffers rather than allocating a fresh `Vec` per call.
//!
//! `no_std` + `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

/// Default grid cell size in scene units (§4.8: "default cell 128
/// scene-units").
pub const DEFAULT_CELL_SIZE: f64 = 128.0;

/// Axis-aligned bounding box in scene space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Aabb {
    #[must_use]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    #[must_use]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.min_x <= x && x <= self.max_x && self.min_y <= y && y <= self.max_y
    }

    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }
}

/// A generational handle identifying an entry inserted into a [`SpatialGrid`].
///
/// Generational so that removing an entry and reusing its slot for a later
/// insert cannot make a stale handle alias unrelated data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntryId(u32, u32);

impl EntryId {
    const fn new(idx: usize, generation: u32) -> Self {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "entry indices are intentionally 32-bit"
        )]
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Maps a scalar coordinate to a grid cell index, flooring and saturating
/// at the `i32` range so extreme scene coordinates never panic or wrap.
#[inline]
fn cell_coord(value: f64, origin: f64, cell_size: f64) -> i32 {
    debug_assert!(cell_size > 0.0, "cell_size must be strictly positive");
    let t = (value - origin) / cell_size;
    if t >= f64::from(i32::MAX) {
        i32::MAX
    } else if t <= f64::from(i32::MIN) {
        i32::MIN
    } else {
        let coord = t as i32;
        // `as i32` truncates toward zero; correct to floor for negatives.
        if t < 0.0 && f64::from(coord) > t {
            coord.saturating_sub(1)
        } else {
            coord
        }
    }
}

#[derive(Clone, Debug)]
struct Slot<O> {
    generation: u32,
    owner: O,
    aabb: Aabb,
    cells: SmallVec<[(i32, i32); 4]>,
}

#[derive(Default)]
struct Cell {
    slots: SmallVec<[usize; 8]>,
}

/// Uniform-grid 2D index over owner values of type `O` (typically a node
/// identifier).
pub struct SpatialGrid<O> {
    cell_size: f64,
    cells: HashMap<(i32, i32), Cell>,
    slots: Vec<Option<Slot<O>>>,
    free_list: Vec<usize>,
}

impl<O> fmt::Debug for SpatialGrid<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let live = self.slots.iter().filter(|s| s.is_some()).count();
        f.debug_struct("SpatialGrid")
            .field("cell_size", &self.cell_size)
            .field("live_entries", &live)
            .field("cells", &self.cells.len())
            .finish_non_exhaustive()
    }
}

impl<O: Copy> SpatialGrid<O> {
    /// Creates an empty grid with the given cell size.
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    fn covered_cells(&self, aabb: &Aabb) -> SmallVec<[(i32, i32); 4]> {
        let (ix0, ix1) = {
            let a = cell_coord(aabb.min_x, 0.0, self.cell_size);
            let b = cell_coord(aabb.max_x, 0.0, self.cell_size);
            if a <= b { (a, b) } else { (b, a) }
        };
        let (iy0, iy1) = {
            let a = cell_coord(aabb.min_y, 0.0, self.cell_size);
            let b = cell_coord(aabb.max_y, 0.0, self.cell_size);
            if a <= b { (a, b) } else { (b, a) }
        };
        let mut out = SmallVec::new();
        for ix in ix0..=ix1 {
            for iy in iy0..=iy1 {
                out.push((ix, iy));
            }
        }
        out
    }

    fn remove_from_cells(&mut self, slot_idx: usize, cells: &[(i32, i32)]) {
        for &key in cells {
            if let Some(cell) = self.cells.get_mut(&key) {
                if let Some(pos) = cell.slots.iter().position(|&s| s == slot_idx) {
                    cell.slots.swap_remove(pos);
                }
                if cell.slots.is_empty() {
                    self.cells.remove(&key);
                }
            }
        }
    }

    /// Inserts a new entry. If the same owner is already present under a
    /// different handle the caller is responsible for removing it first
    /// (§4.8: "`insert(entry)`: if already present, remove first, then add
    /// to overlapping cells" describes the node-level API in
    /// `canvas2d_scene`; this index only tracks handles it issued itself).
    pub fn insert(&mut self, owner: O, aabb: Aabb) -> EntryId {
        let cells = self.covered_cells(&aabb);
        let slot_idx = if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            self.slots.push(None);
            self.slots.len() - 1
        };
        let generation = self.slots[slot_idx]
            .as_ref()
            .map_or(1, |s: &Slot<O>| s.generation.wrapping_add(1).max(1));
        for &key in &cells {
            self.cells.entry(key).or_default().slots.push(slot_idx);
        }
        self.slots[slot_idx] = Some(Slot {
            generation,
            owner,
            aabb,
            cells,
        });
        EntryId::new(slot_idx, generation)
    }

    /// Updates the AABB for an existing entry, moving it between grid cells
    /// as needed. A no-op if `id` is stale.
    pub fn update(&mut self, id: EntryId, aabb: Aabb) {
        let idx = id.idx();
        let Some(slot) = self.slots.get(idx).and_then(Option::as_ref) else {
            return;
        };
        if slot.generation != id.1 {
            return;
        }
        if slot.aabb == aabb {
            return;
        }
        let old_cells = slot.cells.clone();
        self.remove_from_cells(idx, &old_cells);
        let new_cells = self.covered_cells(&aabb);
        for &key in &new_cells {
            self.cells.entry(key).or_default().slots.push(idx);
        }
        if let Some(slot) = self.slots[idx].as_mut() {
            slot.aabb = aabb;
            slot.cells = new_cells;
        }
    }

    /// Removes an entry. A no-op if `id` is stale or already removed
    /// (§4.8: "`remove(entry)`: remove from each tracked cell; drop cell if
    /// empty").
    pub fn remove(&mut self, id: EntryId) {
        let idx = id.idx();
        let Some(slot) = self.slots.get(idx).and_then(Option::as_ref) else {
            return;
        };
        if slot.generation != id.1 {
            return;
        }
        let cells = slot.cells.clone();
        self.remove_from_cells(idx, &cells);
        self.slots[idx] = None;
        self.free_list.push(idx);
    }

    /// Appends every owner whose AABB contains `(x, y)` to `out`.
    ///
    /// `out` is cleared by the caller beforehand if a fresh result is
    /// wanted; this crate never clears it, so call sites can reuse one
    /// buffer across frames (§4.8: "Returns a caller-reusable buffer").
    pub fn query_point(&self, x: f64, y: f64, out: &mut Vec<O>) {
        let key = (
            cell_coord(x, 0.0, self.cell_size),
            cell_coord(y, 0.0, self.cell_size),
        );
        let Some(cell) = self.cells.get(&key) else {
            return;
        };
        for &slot_idx in &cell.slots {
            if let Some(slot) = self.slots[slot_idx].as_ref() {
                if slot.aabb.contains_point(x, y) {
                    out.push(slot.owner);
                }
            }
        }
    }

    /// Appends every owner whose AABB overlaps `rect` to `out`, deduplicated
    /// (§4.8: "union of entries in overlapping cells, deduplicated").
    pub fn query_aabb(&self, rect: Aabb, out: &mut Vec<O>) {
        let (ix0, ix1) = {
            let a = cell_coord(rect.min_x, 0.0, self.cell_size);
            let b = cell_coord(rect.max_x, 0.0, self.cell_size);
            if a <= b { (a, b) } else { (b, a) }
        };
        let (iy0, iy1) = {
            let a = cell_coord(rect.min_y, 0.0, self.cell_size);
            let b = cell_coord(rect.max_y, 0.0, self.cell_size);
            if a <= b { (a, b) } else { (b, a) }
        };
        let mut seen: HashSet<usize> = HashSet::new();
        for ix in ix0..=ix1 {
            for iy in iy0..=iy1 {
                let Some(cell) = self.cells.get(&(ix, iy)) else {
                    continue;
                };
                for &slot_idx in &cell.slots {
                    if !seen.insert(slot_idx) {
                        continue;
                    }
                    if let Some(slot) = self.slots[slot_idx].as_ref() {
                        if slot.aabb.overlaps(&rect) {
                            out.push(slot.owner);
                        }
                    }
                }
            }
        }
    }

    /// Removes every entry, freeing all slots. Used when a scene signals a
    /// structural change large enough to warrant a full rebuild (§4.8).
    pub fn clear(&mut self) {
        self.cells.clear();
        self.slots.clear();
        self.free_list.clear();
    }

    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }
}

impl<O: Copy> Default for SpatialGrid<O> {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}
