/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::fill_rule::*;
use super::shape::*;
use crate::geometry::*;

///
/// A segment within a figure
///
/// Segments are relative to the preceding point: a `Line` continues from wherever the
/// previous segment (or the figure start) ended.
///
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PathOp {
    /// A straight line to a point
    Line(Point),

    /// A cubic bezier section: two control points, then the end point
    Cubic(Point, Point, Point),
}

///
/// One figure of a path: a start point and the segments that follow it
///
#[derive(Clone, PartialEq, Debug)]
pub(crate) struct FigureData {
    pub(crate) start: Point,
    pub(crate) ops: Vec<PathOp>,
    pub(crate) closed: bool,
}

///
/// A borrowed view of one figure of a shape
///
#[derive(Clone, Copy)]
pub struct Figure<'a> {
    start: Point,
    ops: &'a [PathOp],
    closed: bool,
}

impl<'a> Figure<'a> {
    #[inline]
    pub fn new(start: Point, ops: &'a [PathOp], closed: bool) -> Figure<'a> {
        Figure { start, ops, closed }
    }

    /// The first point of this figure
    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    /// The segments that follow the start point
    #[inline]
    pub fn ops(&self) -> &'a [PathOp] {
        self.ops
    }

    /// True if the figure was explicitly closed back to its start point
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

///
/// An immutable filled path: figures plus a fill rule
///
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Path {
    pub(crate) figures: Vec<FigureData>,
    pub(crate) fill_rule: FillRule,
}

impl Shape for Path {
    #[inline]
    fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    #[inline]
    fn figure_count(&self) -> usize {
        self.figures.len()
    }

    #[inline]
    fn figure(&self, idx: usize) -> Figure<'_> {
        let figure = &self.figures[idx];
        Figure::new(figure.start, &figure.ops, figure.closed)
    }

    fn as_axis_aligned_rect(&self) -> Option<(Point, Point)> {
        // A single closed figure of four line segments tracing an axis-aligned loop
        if self.figures.len() != 1 {
            return None;
        }

        let figure = &self.figures[0];
        let mut corners = vec![figure.start];

        for op in figure.ops.iter() {
            match op {
                PathOp::Line(point) => corners.push(*point),
                PathOp::Cubic(_, _, _) => return None,
            }
        }

        // Tolerate an explicit return to the start point
        if corners.len() == 5 && corners[4] == corners[0] {
            corners.pop();
        }

        if corners.len() != 4 {
            return None;
        }

        for idx in 0..4 {
            let from = corners[idx];
            let to = corners[(idx + 1) % 4];

            if from.x != to.x && from.y != to.y {
                return None;
            }
        }

        let min = Point::new(
            corners.iter().map(|p| p.x).fold(f32::MAX, f32::min),
            corners.iter().map(|p| p.y).fold(f32::MAX, f32::min),
        );
        let max = Point::new(
            corners.iter().map(|p| p.x).fold(f32::MIN, f32::max),
            corners.iter().map(|p| p.y).fold(f32::MIN, f32::max),
        );

        if min.x < max.x && min.y < max.y {
            Some((min, max))
        } else {
            None
        }
    }

    fn bounds(&self) -> Option<(Point, Point)> {
        let mut min = Point::new(f32::MAX, f32::MAX);
        let mut max = Point::new(f32::MIN, f32::MIN);
        let mut any = false;

        let mut extend = |point: &Point| {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
            any = true;
        };

        for figure in self.figures.iter() {
            extend(&figure.start);

            for op in figure.ops.iter() {
                match op {
                    PathOp::Line(point) => extend(point),
                    PathOp::Cubic(cp1, cp2, end) => {
                        // Control points bound the curve, so this is conservative
                        extend(cp1);
                        extend(cp2);
                        extend(end);
                    }
                }
            }
        }

        if any {
            Some((min, max))
        } else {
            None
        }
    }
}

///
/// Builds a `Path` from move/line/curve operations
///
/// A `line_to` or `curve_to` before any `move_to` treats its starting point as the
/// figure start, matching the usual behavior of path languages where the first
/// operation establishes the current point.
///
#[derive(Clone, Default)]
pub struct PathBuilder {
    figures: Vec<FigureData>,
    fill_rule: FillRule,
    initial_point: Option<Point>,
    in_figure: bool,
}

impl PathBuilder {
    pub fn new() -> PathBuilder {
        PathBuilder {
            figures: vec![],
            fill_rule: FillRule::EvenOdd,
            initial_point: None,
            in_figure: false,
        }
    }

    ///
    /// Sets the fill rule for the whole path (the default is even-odd)
    ///
    pub fn fill_rule(&mut self, fill_rule: FillRule) -> &mut Self {
        self.fill_rule = fill_rule;
        self
    }

    ///
    /// Begins a new figure at a point
    ///
    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.in_figure = false;
        self.initial_point = Some(Point::new(x, y));
        self
    }

    ///
    /// Adds a line from the current point
    ///
    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        let point = Point::new(x, y);

        match self.initial_point {
            Some(initial) => {
                self.begin_figure(initial);
                self.current_figure().ops.push(PathOp::Line(point));
            }

            None => {
                self.initial_point = Some(point);
            }
        }

        self
    }

    ///
    /// Adds a cubic bezier section from the current point
    ///
    pub fn curve_to(&mut self, cp1: (f32, f32), cp2: (f32, f32), end: (f32, f32)) -> &mut Self {
        let initial = self.initial_point.unwrap_or(Point::new(cp1.0, cp1.1));
        self.begin_figure(initial);
        self.initial_point = Some(initial);

        self.current_figure().ops.push(PathOp::Cubic(
            Point::new(cp1.0, cp1.1),
            Point::new(cp2.0, cp2.1),
            Point::new(end.0, end.1),
        ));
        self
    }

    ///
    /// Adds a quadratic bezier section from the current point, degree-elevated to a cubic
    ///
    pub fn quad_to(&mut self, cp: (f32, f32), end: (f32, f32)) -> &mut Self {
        let from = self.initial_point.unwrap_or(Point::new(cp.0, cp.1));
        let from = if self.in_figure {
            self.last_point()
        } else {
            from
        };

        let cp1 = (
            from.x + (2.0 / 3.0) * (cp.0 - from.x),
            from.y + (2.0 / 3.0) * (cp.1 - from.y),
        );
        let cp2 = (
            end.0 + (2.0 / 3.0) * (cp.0 - end.0),
            end.1 + (2.0 / 3.0) * (cp.1 - end.1),
        );

        self.curve_to(cp1, cp2, end)
    }

    ///
    /// Closes the current figure back to its start point
    ///
    pub fn close(&mut self) -> &mut Self {
        if self.in_figure {
            self.current_figure().closed = true;
        }

        self.in_figure = false;
        self.initial_point = None;
        self
    }

    ///
    /// Finishes building and returns the path
    ///
    pub fn build(&mut self) -> Path {
        use std::mem;

        Path {
            figures: mem::take(&mut self.figures),
            fill_rule: self.fill_rule,
        }
    }

    fn begin_figure(&mut self, start: Point) {
        if !self.in_figure {
            self.figures.push(FigureData {
                start,
                ops: vec![],
                closed: false,
            });
            self.in_figure = true;
        }
    }

    fn current_figure(&mut self) -> &mut FigureData {
        self.figures.last_mut().unwrap()
    }

    fn last_point(&self) -> Point {
        let figure = self.figures.last().unwrap();

        match figure.ops.last() {
            Some(PathOp::Line(point)) => *point,
            Some(PathOp::Cubic(_, _, end)) => *end,
            None => figure.start,
        }
    }
}
