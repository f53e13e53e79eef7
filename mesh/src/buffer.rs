/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::vertex::*;

///
/// The accumulated GPU geometry for one shape
///
/// Geometry arrives in three primitive streams: a single running triangle strip
/// (trapezoids and filler rectangles, stitched together with degenerate triangles), a
/// line list (complex coverage scans, one line per run) and an indexed triangle list
/// (waffled output and the indexed fast paths).
///
pub struct MeshBuffers<TVertex> {
    pub(crate) strip: Vec<TVertex>,
    pub(crate) lines: Vec<TVertex>,
    pub(crate) triangles: Vec<TVertex>,
    pub(crate) indices: Vec<u16>,
}

impl<TVertex: StripVertex> MeshBuffers<TVertex> {
    pub fn new() -> MeshBuffers<TVertex> {
        MeshBuffers {
            strip: vec![],
            lines: vec![],
            triangles: vec![],
            indices: vec![],
        }
    }

    ///
    /// Discards all geometry, keeping the allocations
    ///
    pub fn clear(&mut self) {
        self.strip.clear();
        self.lines.clear();
        self.triangles.clear();
        self.indices.clear();
    }

    ///
    /// True if no primitive stream holds any geometry
    ///
    pub fn is_empty(&self) -> bool {
        self.strip.is_empty() && self.lines.is_empty() && self.indices.is_empty()
    }

    /// The running triangle strip
    #[inline]
    pub fn strip(&self) -> &[TVertex] {
        &self.strip
    }

    /// The line list (two vertices per line)
    #[inline]
    pub fn lines(&self) -> &[TVertex] {
        &self.lines
    }

    /// Vertices of the indexed triangle list
    #[inline]
    pub fn triangle_vertices(&self) -> &[TVertex] {
        &self.triangles
    }

    /// Indices of the indexed triangle list (three per triangle)
    #[inline]
    pub fn triangle_indices(&self) -> &[u16] {
        &self.indices
    }

    ///
    /// Appends `count` vertices to the strip and returns them for filling in
    ///
    pub(crate) fn strip_vertices(&mut self, count: usize) -> &mut [TVertex] {
        let start = self.strip.len();
        self.strip.resize(start + count, TVertex::default());
        &mut self.strip[start..]
    }

    ///
    /// Adds a horizontal line as a one-pixel-tall quad on the triangle strip
    ///
    /// Lines drawn within the first pixel row of the viewport are clipped against a
    /// viewport that only includes half of that row, so near the top they are emitted
    /// as triangles instead.
    ///
    pub(crate) fn add_line_as_triangle_strip(&mut self, begin: &TVertex, end: &TVertex) {
        let (x0, y) = begin.position();
        let (x1, _) = end.position();
        let diffuse = begin.diffuse();

        debug_assert!(begin.position().1 == end.position().1, "lines must be horizontal");
        debug_assert!(begin.diffuse() == end.diffuse());

        // The line covers pixel centers from x0 to one short of x1; the quad covers
        // the same pixels with its corners
        let x0 = x0 - 0.5;
        let x1 = x1 - 0.5;

        let vertices = self.strip_vertices(6);
        let corners = [
            (x0, y - 0.5),
            (x0, y - 0.5),
            (x0, y + 0.5),
            (x1, y - 0.5),
            (x1, y + 0.5),
            (x1, y + 0.5),
        ];

        for (vertex, (x, y)) in vertices.iter_mut().zip(corners.iter()) {
            vertex.set_position(*x, *y);
            vertex.set_diffuse(diffuse);
        }
    }
}

impl<TVertex: StripVertex> Default for MeshBuffers<TVertex> {
    fn default() -> MeshBuffers<TVertex> {
        MeshBuffers::new()
    }
}
