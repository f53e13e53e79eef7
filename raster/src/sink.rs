/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::error::*;
use crate::geometry::*;
use crate::sweep::*;

///
/// Options for a rasterize call
///
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RasterOptions {
    /// When set, pixels inside this rectangle but outside the filled shape are also
    /// emitted, with zero coverage
    pub emit_outside: Option<PixelRect>,

    /// When false, fully covered interior geometry is skipped (only the anti-aliased
    /// boundary, and the outside when `emit_outside` is set, is produced)
    pub need_inside: bool,
}

impl Default for RasterOptions {
    fn default() -> RasterOptions {
        RasterOptions {
            emit_outside: None,
            need_inside: true,
        }
    }
}

///
/// An anti-aliased trapezoid: two horizontal rails joined by slanted left and right
/// edges, with expand radii describing how far the anti-alias ramp extends on each
/// side
///
/// All coordinates are in device pixels. The filled region at full coverage runs from
/// `left + expand` to `right - expand` on each rail; the coverage ramps to zero at
/// `left - expand` and `right + expand`.
///
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Trapezoid {
    pub y_top: f32,
    pub y_bottom: f32,
    pub top_left_x: f32,
    pub top_right_x: f32,
    pub bottom_left_x: f32,
    pub bottom_right_x: f32,
    pub left_expand: f32,
    pub right_expand: f32,
}

///
/// Consumer of the rasterizer's output primitives
///
/// The rasterizer drives a sink strictly top to bottom in device y, left to right
/// within a row. A sink may fail any call; the rasterizer stops immediately and
/// propagates the error without emitting anything further.
///
pub trait GeometrySink {
    ///
    /// Starts a new shape's geometry
    ///
    fn begin_building(&mut self, options: &RasterOptions) -> Result<()>;

    ///
    /// Adds one anti-aliased trapezoid
    ///
    fn add_trapezoid(&mut self, trapezoid: &Trapezoid) -> Result<()>;

    ///
    /// Adds one pixel row of run-length-encoded coverage
    ///
    fn add_complex_scan(&mut self, pixel_y: i32, scan: CoverageScan<'_>) -> Result<()>;

    ///
    /// Adds a filled parallelogram at full coverage (the axis-aligned fast path)
    ///
    /// The corners must be supplied in winding order.
    ///
    fn add_parallelogram(&mut self, corners: &[Point; 4]) -> Result<()>;

    ///
    /// Adds a vertex at full coverage to the sink's indexed triangle list, returning
    /// its index
    ///
    fn add_vertex(&mut self, position: Point) -> Result<u16> {
        let _ = position;
        Err(Error::NotImplemented)
    }

    ///
    /// Adds a triangle over previously added vertex indices
    ///
    fn add_triangle(&mut self, v0: u16, v1: u16, v2: u16) -> Result<()> {
        let _ = (v0, v1, v2);
        Err(Error::NotImplemented)
    }

    ///
    /// Adds fully computed vertices (position plus diffuse bits) and the triangle
    /// list indexing them
    ///
    fn add_indexed_vertices(&mut self, vertices: &[(Point, u32)], indices: &[u16]) -> Result<()> {
        let _ = (vertices, indices);
        Err(Error::NotImplemented)
    }

    ///
    /// Finishes the shape's geometry
    ///
    fn end_building(&mut self) -> Result<()>;

    ///
    /// True if no geometry has been produced
    ///
    fn is_empty(&self) -> bool;
}
