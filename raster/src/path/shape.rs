/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::fill_rule::*;
use super::path::*;
use crate::geometry::*;

///
/// A filled 2D shape that the rasterizer can consume
///
/// A shape is a set of figures, each starting at a point and continuing through line
/// and cubic bezier segments. Figures are treated as closed when filling whether or
/// not they were explicitly closed.
///
pub trait Shape {
    ///
    /// The rule deciding which regions of this shape are filled
    ///
    fn fill_rule(&self) -> FillRule;

    ///
    /// The number of figures in this shape
    ///
    fn figure_count(&self) -> usize;

    ///
    /// Retrieves a figure by index
    ///
    fn figure(&self, idx: usize) -> Figure<'_>;

    ///
    /// If this shape is exactly an axis-aligned rectangle, its min and max corners
    ///
    /// Shapes that can answer this cheaply enable a fast path that bypasses scan
    /// conversion entirely.
    ///
    fn as_axis_aligned_rect(&self) -> Option<(Point, Point)> {
        None
    }

    ///
    /// A conservative bounding box for this shape, if one is known
    ///
    fn bounds(&self) -> Option<(Point, Point)> {
        None
    }
}
