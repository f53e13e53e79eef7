/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::buffer::*;
use super::vertex::*;
use super::waffle::*;

use strata_raster::geometry::*;
use strata_raster::{CoverageScan, Error, GeometrySink, RasterOptions, Result, Trapezoid};

use smallvec::*;

// Vertex indices are 16 bit, bounding the indexed triangle list
const MAX_INDEXED_VERTICES: usize = 1 << 16;

///
/// Builds GPU mesh buffers from rasterizer output
///
/// Trapezoids become runs on a single triangle strip: the anti-alias expansion puts a
/// zero-coverage rail half a pixel (widened by the slope) outside each slanted edge
/// and a full-coverage rail the same distance inside, so the GPU's interpolation of
/// the diffuse channel produces the edge ramp. Complex scans become one line per
/// coverage run. Consecutive primitives are stitched with duplicated (degenerate)
/// vertices.
///
/// In outside mode the builder additionally tracks strata: it closes each trapezoid
/// row with filler geometry out to the bounds, fills gaps between strata with
/// zero-coverage rectangles, and `end_building` closes the final stratum down to the
/// bottom of the bounds.
///
pub struct MeshBuilder<TVertex: StripVertex> {
    buffers: MeshBuffers<TVertex>,

    /// Top of the viewport this mesh will be drawn into (for the first-row line fix up)
    viewport_top: i32,

    /// Maps positions to texture coordinates, when the format carries them
    texture_transform: Option<Transform2D>,

    /// Partition families for waffling (empty when not waffling)
    waffle_families: SmallVec<[WafflePartition; 2]>,

    /// Outside bounds when emitting outside geometry
    outside: Option<PixelRect>,

    /// False when fully covered interior geometry should be skipped
    need_inside: bool,

    /// Top of the open trapezoid stratum, or f32::MAX when none is open
    stratum_top: f32,

    /// Bottom of the last stratum, or f32::MIN before any geometry
    stratum_bottom: f32,

    /// Right edge of the last trapezoid added to the open stratum
    last_trapezoid_right: f32,

    /// Scratch for waffled triangles
    waffle_scratch: Vec<[WafflePoint; 3]>,
}

impl<TVertex: StripVertex> MeshBuilder<TVertex> {
    ///
    /// Creates a builder for geometry that will be drawn into a viewport
    ///
    pub fn new(viewport: PixelRect) -> MeshBuilder<TVertex> {
        MeshBuilder {
            buffers: MeshBuffers::new(),
            viewport_top: viewport.top,
            texture_transform: None,
            waffle_families: smallvec![],
            outside: None,
            need_inside: true,
            stratum_top: f32::MAX,
            stratum_bottom: f32::MIN,
            last_trapezoid_right: f32::MIN,
            waffle_scratch: vec![],
        }
    }

    ///
    /// Sets the transform from device positions to texture coordinates
    ///
    /// Texture formats get their UVs from this transform, and its unit partitions
    /// become the waffle families (subject to the minimum partition width). Waffling
    /// cannot be combined with outside mode.
    ///
    pub fn set_texture_transform(&mut self, transform: Option<&Transform2D>) {
        self.texture_transform = transform.cloned();
        self.waffle_families = match transform {
            Some(transform) => WafflePartition::families_from_transform(transform),
            None => smallvec![],
        };
    }

    ///
    /// The geometry built so far
    ///
    pub fn buffers(&self) -> &MeshBuffers<TVertex> {
        &self.buffers
    }

    ///
    /// Finishes building and takes the geometry
    ///
    pub fn into_buffers(self) -> MeshBuffers<TVertex> {
        self.buffers
    }

    #[inline]
    fn are_waffling(&self) -> bool {
        !self.waffle_families.is_empty()
    }

    fn make_vertex(&self, x: f32, y: f32, diffuse: u32) -> TVertex {
        let mut vertex = TVertex::default();
        vertex.set_position(x, y);
        vertex.set_diffuse(diffuse);

        if TVertex::TEXTURE_UV_SETS > 0 {
            if let Some(transform) = &self.texture_transform {
                let uv = transform.transform_point(Point::new(x, y));

                for set in 0..TVertex::TEXTURE_UV_SETS {
                    vertex.set_texture_uv(set, uv.x, uv.y);
                }
            }
        }

        vertex
    }

    fn fill_strip(&mut self, sequence: &[(f32, f32, u32)]) {
        for (x, y, diffuse) in sequence.iter() {
            let vertex = self.make_vertex(*x, *y, *diffuse);
            self.buffers.strip_vertices(1)[0] = vertex;
        }
    }

    ///
    /// True if a run with this coverage produces geometry under the current modes
    ///
    /// Fully covered runs are skipped when the interior isn't wanted; zero runs are
    /// skipped unless the outside is.
    ///
    #[inline]
    fn need_coverage_geometry(&self, coverage: i32) -> bool {
        (self.need_inside || coverage != COVERAGE_FULL)
            && (self.outside.is_some() || coverage != 0)
    }

    ///
    /// Emits a horizontal line, via the triangle-strip workaround when it sits within
    /// the first pixel row of the viewport (where real lines get clipped)
    ///
    fn emit_line(&mut self, x_begin: f32, x_end: f32, y_center: f32, diffuse: u32) {
        let begin = self.make_vertex(x_begin, y_center, diffuse);
        let end = self.make_vertex(x_end, y_center, diffuse);

        if y_center < (self.viewport_top + 1) as f32 {
            self.buffers.add_line_as_triangle_strip(&begin, &end);
        } else {
            self.buffers.lines.push(begin);
            self.buffers.lines.push(end);
        }
    }

    fn push_indexed_vertex(&mut self, x: f32, y: f32, diffuse: u32) -> Result<u16> {
        if self.buffers.triangles.len() >= MAX_INDEXED_VERTICES {
            return Err(Error::OutOfMemory);
        }

        let idx = self.buffers.triangles.len() as u16;
        let vertex = self.make_vertex(x, y, diffuse);
        self.buffers.triangles.push(vertex);
        Ok(idx)
    }

    fn push_waffled_triangles(&mut self) -> Result<()> {
        let triangles = std::mem::take(&mut self.waffle_scratch);

        for triangle in triangles.iter() {
            for point in triangle.iter() {
                let idx =
                    self.push_indexed_vertex(point.x, point.y, diffuse_from_coverage(point.alpha))?;
                self.buffers.indices.push(idx);
            }
        }

        self.waffle_scratch = triangles;
        self.waffle_scratch.clear();
        Ok(())
    }

    fn add_trapezoid_waffle(&mut self, trapezoid: &Trapezoid) -> Result<()> {
        let &Trapezoid {
            y_top,
            y_bottom,
            top_left_x,
            top_right_x,
            bottom_left_x,
            bottom_right_x,
            left_expand,
            right_expand,
        } = trapezoid;

        // The same eight rail vertices as the strip form, as a fan source
        let rails = [
            WafflePoint::new(top_left_x - left_expand, y_top, 0.0),
            WafflePoint::new(bottom_left_x - left_expand, y_bottom, 0.0),
            WafflePoint::new(top_left_x + left_expand, y_top, 1.0),
            WafflePoint::new(bottom_left_x + left_expand, y_bottom, 1.0),
            WafflePoint::new(top_right_x - right_expand, y_top, 1.0),
            WafflePoint::new(bottom_right_x - right_expand, y_bottom, 1.0),
            WafflePoint::new(top_right_x + right_expand, y_top, 0.0),
            WafflePoint::new(bottom_right_x + right_expand, y_bottom, 0.0),
        ];

        let scratch = &mut self.waffle_scratch;
        for idx in 0..6 {
            waffle_triangle(
                &self.waffle_families,
                [rails[idx + 1], rails[idx], rails[idx + 2]],
                &mut |triangle| scratch.push(triangle),
            );
        }

        self.push_waffled_triangles()
    }

    ///
    /// Starts a new stratum, producing the outside-mode filler geometry
    ///
    /// No-op unless outside geometry was requested. Closes the open trapezoid row
    /// with a right-hand filler, fills any vertical gap since the last stratum with a
    /// full-width zero-coverage rectangle, and opens a trapezoid row with a left-hand
    /// filler.
    ///
    fn prepare_stratum(
        &mut self,
        top: f32,
        bottom: f32,
        trapezoid: bool,
        trapezoid_left: f32,
        trapezoid_right: f32,
    ) -> Result<()> {
        let outside = match self.outside {
            Some(bounds) => bounds,
            None => return Ok(()),
        };

        debug_assert!(top <= bottom);

        let outside_top = outside.top as f32;
        let outside_bottom = outside.bottom as f32;
        let outside_left = outside.left as f32;
        let outside_right = outside.right as f32;

        // The one call where a stratum may go 'backwards' is the closing call from
        // end_building
        let ending = top == outside_bottom && bottom == outside_bottom;
        debug_assert!(ending || bottom >= self.stratum_bottom);
        debug_assert!(!ending || !trapezoid);

        if ending || bottom != self.stratum_bottom {
            if self.stratum_top != f32::MAX {
                // Close the open trapezoid row. Trapezoids are not clipped, so the
                // row may extend past the right of the bounds.
                let right = outside_right.max(self.last_trapezoid_right);

                self.fill_strip(&[
                    (right, self.stratum_top, DIFFUSE_ZERO),
                    (right, self.stratum_bottom, DIFFUSE_ZERO),
                    (right, self.stratum_bottom, DIFFUSE_ZERO),
                ]);
            }

            // Fill any horizontal band with no generated geometry
            if top > self.stratum_bottom {
                let rect_top = if self.stratum_bottom == f32::MIN {
                    outside_top
                } else {
                    self.stratum_bottom
                };

                self.fill_strip(&[
                    (outside_left, rect_top, DIFFUSE_ZERO),
                    (outside_left, rect_top, DIFFUSE_ZERO),
                    (outside_left, top, DIFFUSE_ZERO),
                    (outside_right, rect_top, DIFFUSE_ZERO),
                    (outside_right, top, DIFFUSE_ZERO),
                    (outside_right, top, DIFFUSE_ZERO),
                ]);
            }

            if trapezoid {
                // Open the new trapezoid row from the left of the bounds
                let left = outside_left.min(trapezoid_left);

                self.fill_strip(&[
                    (left, top, DIFFUSE_ZERO),
                    (left, top, DIFFUSE_ZERO),
                    (left, bottom, DIFFUSE_ZERO),
                ]);
            }
        }

        if trapezoid {
            self.last_trapezoid_right = trapezoid_right;
        }

        self.stratum_top = if trapezoid { top } else { f32::MAX };
        self.stratum_bottom = bottom;

        Ok(())
    }
}

impl<TVertex: StripVertex> GeometrySink for MeshBuilder<TVertex> {
    fn begin_building(&mut self, options: &RasterOptions) -> Result<()> {
        // Waffling and outside geometry are mutually exclusive
        debug_assert!(!(self.are_waffling() && options.emit_outside.is_some()));

        self.buffers.clear();
        self.outside = options.emit_outside;
        self.need_inside = options.need_inside;
        self.stratum_top = f32::MAX;
        self.stratum_bottom = f32::MIN;
        self.last_trapezoid_right = f32::MIN;

        Ok(())
    }

    fn add_trapezoid(&mut self, trapezoid: &Trapezoid) -> Result<()> {
        if self.are_waffling() {
            return self.add_trapezoid_waffle(trapezoid);
        }

        self.prepare_stratum(
            trapezoid.y_top,
            trapezoid.y_bottom,
            true,
            trapezoid.top_left_x.min(trapezoid.bottom_left_x),
            trapezoid.top_right_x.max(trapezoid.bottom_right_x),
        )?;

        let &Trapezoid {
            y_top,
            y_bottom,
            top_left_x,
            top_right_x,
            bottom_left_x,
            bottom_right_x,
            left_expand,
            right_expand,
        } = trapezoid;

        let mut sequence: SmallVec<[(f32, f32, u32); 12]> = smallvec![];

        let outside = self.outside.is_some();

        if !outside {
            // Stitch to the previous strip run
            sequence.push((top_left_x - left_expand, y_top, DIFFUSE_ZERO));
        }

        sequence.push((top_left_x - left_expand, y_top, DIFFUSE_ZERO));
        sequence.push((bottom_left_x - left_expand, y_bottom, DIFFUSE_ZERO));
        sequence.push((top_left_x + left_expand, y_top, DIFFUSE_ONE));
        sequence.push((bottom_left_x + left_expand, y_bottom, DIFFUSE_ONE));

        if !self.need_inside {
            // Skip the interior with a degenerate jump
            sequence.push((bottom_left_x + left_expand, y_bottom, DIFFUSE_ONE));
            sequence.push((top_right_x - right_expand, y_top, DIFFUSE_ONE));
        }

        sequence.push((top_right_x - right_expand, y_top, DIFFUSE_ONE));
        sequence.push((bottom_right_x - right_expand, y_bottom, DIFFUSE_ONE));
        sequence.push((top_right_x + right_expand, y_top, DIFFUSE_ZERO));
        sequence.push((bottom_right_x + right_expand, y_bottom, DIFFUSE_ZERO));

        if !outside {
            sequence.push((bottom_right_x + right_expand, y_bottom, DIFFUSE_ZERO));
        }

        self.fill_strip(&sequence);
        Ok(())
    }

    fn add_complex_scan(&mut self, pixel_y: i32, scan: CoverageScan<'_>) -> Result<()> {
        self.prepare_stratum(pixel_y as f32, (pixel_y + 1) as f32, false, 0.0, 0.0)?;

        let y_center = pixel_y as f32 + 0.5;

        for run in scan.runs() {
            if !self.need_coverage_geometry(run.coverage) {
                continue;
            }

            let (mut begin, mut end) = (run.x_start, run.x_end);

            if let Some(bounds) = self.outside {
                // Clamp the sentinel-extended runs to the bounds; runs entirely
                // outside collapse to empty
                begin = begin.max(end.min(bounds.left));
                end = end.min(begin.max(bounds.right));
            }

            if begin >= end {
                continue;
            }

            let coverage = run.coverage as f32 / COVERAGE_FULL as f32;
            let diffuse = diffuse_from_coverage(coverage);

            // Lines run from the first pixel center to one past the last, matching
            // the convention that the last pixel of a line is not lit
            let x_begin = begin as f32 + 0.5;
            let x_end = end as f32 + 0.5;

            if self.are_waffling() {
                let line = [
                    WafflePoint::new(x_begin, y_center, coverage),
                    WafflePoint::new(x_end, y_center, coverage),
                ];

                let mut segments: SmallVec<[[WafflePoint; 2]; 8]> = smallvec![];
                waffle_line(&self.waffle_families, line, &mut |segment| {
                    segments.push(segment)
                });

                for [begin, end] in segments {
                    self.emit_line(begin.x, end.x, y_center, diffuse);
                }
            } else {
                self.emit_line(x_begin, x_end, y_center, diffuse);
            }
        }

        Ok(())
    }

    fn add_parallelogram(&mut self, corners: &[Point; 4]) -> Result<()> {
        if self.are_waffling() {
            let points = [
                WafflePoint::new(corners[0].x, corners[0].y, 1.0),
                WafflePoint::new(corners[1].x, corners[1].y, 1.0),
                WafflePoint::new(corners[2].x, corners[2].y, 1.0),
                WafflePoint::new(corners[3].x, corners[3].y, 1.0),
            ];

            let scratch = &mut self.waffle_scratch;
            waffle_triangle(&self.waffle_families, [points[0], points[1], points[3]], &mut |t| {
                scratch.push(t)
            });
            waffle_triangle(&self.waffle_families, [points[3], points[1], points[2]], &mut |t| {
                scratch.push(t)
            });

            return self.push_waffled_triangles();
        }

        self.fill_strip(&[
            (corners[0].x, corners[0].y, DIFFUSE_ONE),
            (corners[0].x, corners[0].y, DIFFUSE_ONE),
            (corners[1].x, corners[1].y, DIFFUSE_ONE),
            (corners[3].x, corners[3].y, DIFFUSE_ONE),
            (corners[2].x, corners[2].y, DIFFUSE_ONE),
            (corners[2].x, corners[2].y, DIFFUSE_ONE),
        ]);

        Ok(())
    }

    fn add_vertex(&mut self, position: Point) -> Result<u16> {
        debug_assert!(self.outside.is_none());

        self.push_indexed_vertex(position.x, position.y, DIFFUSE_ONE)
    }

    fn add_triangle(&mut self, v0: u16, v1: u16, v2: u16) -> Result<()> {
        debug_assert!(self.outside.is_none());

        let count = self.buffers.triangles.len();
        if [v0, v1, v2].iter().any(|idx| *idx as usize >= count) {
            return Err(Error::InvalidArg);
        }

        if self.are_waffling() {
            let triangle = {
                let corner = |idx: u16| {
                    let (x, y) = self.buffers.triangles[idx as usize].position();
                    WafflePoint::new(x, y, 1.0)
                };
                [corner(v0), corner(v1), corner(v2)]
            };

            let scratch = &mut self.waffle_scratch;
            waffle_triangle(&self.waffle_families, triangle, &mut |t| scratch.push(t));

            return self.push_waffled_triangles();
        }

        self.buffers.indices.extend_from_slice(&[v0, v1, v2]);
        Ok(())
    }

    fn add_indexed_vertices(&mut self, vertices: &[(Point, u32)], indices: &[u16]) -> Result<()> {
        if self.are_waffling() {
            // Precomputed vertices can't be re-waffled
            return Err(Error::NotImplemented);
        }

        if self.buffers.triangles.len() + vertices.len() > MAX_INDEXED_VERTICES {
            return Err(Error::OutOfMemory);
        }

        if indices.iter().any(|idx| *idx as usize >= vertices.len()) {
            return Err(Error::InvalidArg);
        }

        let base = self.buffers.triangles.len() as u16;

        for (position, diffuse) in vertices.iter() {
            let vertex = self.make_vertex(position.x, position.y, *diffuse);
            self.buffers.triangles.push(vertex);
        }

        self.buffers
            .indices
            .extend(indices.iter().map(|idx| base + idx));

        Ok(())
    }

    fn end_building(&mut self) -> Result<()> {
        if let Some(bounds) = self.outside {
            let bottom = bounds.bottom as f32;
            self.prepare_stratum(bottom, bottom, false, 0.0, 0.0)?;
        }

        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}
