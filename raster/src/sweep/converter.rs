/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::active::*;
use super::coverage::*;
use crate::edges::*;
use crate::error::*;
use crate::geometry::*;
use crate::path::*;
use crate::sink::*;

use itertools::Itertools;
use smallvec::*;

// Clip rectangles are bounded well inside the fixed-point range so that subpixel
// conversions of their bounds cannot overflow
const MAX_CLIP_MAGNITUDE: i32 = 1 << 24;

///
/// Scan converter for filled shapes
///
/// A rasterizer owns the transient state of a sweep (the edge arena, the active edge
/// list, the coverage run pool) and can be reused across calls: buffers are cleared
/// on entry but their allocations are retained.
///
pub struct Rasterizer {
    store: EdgeStore,
    active: ActiveEdgeList,
    coverage: CoverageBuffer,
    pairs: Vec<(EdgeIndex, EdgeIndex)>,
    fill_rule: FillRule,
}

impl Rasterizer {
    pub fn new() -> Rasterizer {
        Rasterizer {
            store: EdgeStore::new(),
            active: ActiveEdgeList::new(),
            coverage: CoverageBuffer::new(),
            pairs: vec![],
            fill_rule: FillRule::EvenOdd,
        }
    }

    ///
    /// Rasterizes a filled shape, driving the sink with trapezoids and coverage scans
    ///
    /// The shape's figures are transformed by `transform`, clipped to `clip` and
    /// swept top to bottom. Strata arrive at the sink in strictly non-decreasing y
    /// order, and each pixel row is either part of a trapezoid run or a single
    /// complex scan. A sink error aborts the sweep immediately.
    ///
    pub fn rasterize(
        &mut self,
        shape: &dyn Shape,
        transform: &Transform2D,
        clip: PixelRect,
        options: &RasterOptions,
        sink: &mut dyn GeometrySink,
    ) -> Result<()> {
        if clip.is_empty()
            || clip.left.abs() > MAX_CLIP_MAGNITUDE
            || clip.right.abs() > MAX_CLIP_MAGNITUDE
            || clip.top.abs() > MAX_CLIP_MAGNITUDE
            || clip.bottom.abs() > MAX_CLIP_MAGNITUDE
        {
            return Err(Error::InvalidArg);
        }

        sink.begin_building(options)?;

        // A rectangle covering the whole clip under an axis-preserving transform
        // skips scan conversion entirely: every clipped edge would be vertical and
        // on the clip boundary, so the fill is exactly the clip rectangle.
        if options.emit_outside.is_none() && transform.is_axis_preserving() {
            if let Some((min, max)) = shape.as_axis_aligned_rect() {
                if Self::covers_clip(transform, &clip, min, max) {
                    let (left, top) = (clip.left as f32, clip.top as f32);
                    let (right, bottom) = (clip.right as f32, clip.bottom as f32);

                    sink.add_parallelogram(&[
                        Point::new(left, top),
                        Point::new(right, top),
                        Point::new(right, bottom),
                        Point::new(left, bottom),
                    ])?;
                    return sink.end_building();
                }
            }
        }

        self.fill_rule = shape.fill_rule();
        self.store.clear();
        self.active.clear();
        self.coverage.reset();

        build_edges(shape, transform, &clip, &mut self.store)?;
        self.store.sort_by_top();

        self.sweep(&clip, sink)?;

        sink.end_building()
    }

    ///
    /// The main sweep: processes subrows from the first edge downwards, classifying
    /// each pixel row as a trapezoid run or a complex scan
    ///
    fn sweep(&mut self, clip: &PixelRect, sink: &mut dyn GeometrySink) -> Result<()> {
        let clip_x0 = clip.left * SUBPIXEL_SCALE;
        let clip_x1 = clip.right * SUBPIXEL_SCALE;

        let mut cursor = 0;
        let mut subrow = 0;

        loop {
            if self.active.is_empty() {
                match self.next_start(cursor) {
                    Some(y) => subrow = y,
                    None => break,
                }
            }

            self.insert_starting(&mut cursor, subrow);

            let row = pixel_row(subrow);
            let row_end = row_start(subrow) + SUBPIXEL_SCALE;

            if subrow == row_start(subrow) {
                if let Some(run_end) = self.trapezoid_run_end(cursor, subrow) {
                    self.emit_trapezoids(subrow, run_end, clip, sink)?;
                    self.active
                        .advance_by(self.store.edges_mut(), run_end - subrow, run_end);
                    subrow = run_end;
                    continue;
                }
            }

            // Complex row: accumulate the remaining subrows of this pixel row
            loop {
                self.insert_starting(&mut cursor, subrow);

                if self.active.is_empty() {
                    match self.next_start(cursor) {
                        Some(y) if y < row_end => {
                            subrow = y;
                            continue;
                        }
                        _ => break,
                    }
                }

                self.accumulate_coverage(clip_x0, clip_x1);
                self.active.advance(self.store.edges_mut(), subrow + 1);
                subrow += 1;

                if subrow >= row_end {
                    break;
                }
            }

            if !self.coverage.is_blank() {
                sink.add_complex_scan(row, self.coverage.scan())?;
            }
            self.coverage.reset();
        }

        Ok(())
    }

    ///
    /// The top subrow of the next edge not yet taken from the store
    ///
    #[inline]
    fn next_start(&self, cursor: usize) -> Option<i32> {
        if cursor < self.store.len() {
            Some(self.store.edges()[self.store.ordered(cursor) as usize].y_top)
        } else {
            None
        }
    }

    ///
    /// Moves edges whose top subrow has been reached into the active list
    ///
    fn insert_starting(&mut self, cursor: &mut usize, subrow: i32) {
        while *cursor < self.store.len() {
            let idx = self.store.ordered(*cursor);
            let top = self.store.edges()[idx as usize].y_top;

            debug_assert!(top >= subrow, "edge skipped by the sweep");

            if top != subrow {
                break;
            }

            self.active.insert(self.store.edges_mut(), idx);
            *cursor += 1;
        }
    }

    ///
    /// Decides whether a trapezoid run can start at `subrow`, returning the subrow it
    /// would extend to
    ///
    /// A run qualifies when it covers at least one whole pixel row during which no
    /// edge starts or stops, the active edges keep their order throughout, and the
    /// fill rule pairs them into inside intervals. The pairs are left ready for
    /// `emit_trapezoids`.
    ///
    fn trapezoid_run_end(&mut self, cursor: usize, subrow: i32) -> Option<i32> {
        let edges = self.store.edges();

        let next_start = self.next_start(cursor).unwrap_or(i32::MAX);
        let min_bottom = self.active.min_y_bottom(edges);
        let run_end = row_start(next_start.min(min_bottom));

        if run_end <= subrow {
            return None;
        }

        // Edges may not cross anywhere in the run: since x is linear in y it is
        // enough that the order at the end matches the order at the start
        let rows = run_end - subrow;
        let mut last_x = f64::MIN;

        for idx in self.active.iter(edges) {
            let x_end = edges[idx as usize].x_after(rows);

            if x_end < last_x {
                return None;
            }
            last_x = x_end;
        }

        if !self.fill_pairs() {
            return None;
        }

        Some(run_end)
    }

    ///
    /// Pairs the active edges into inside intervals under the fill rule
    ///
    /// Returns false if the crossings don't balance (which sends the row down the
    /// complex path where partial pairings are harmless).
    ///
    fn fill_pairs(&mut self) -> bool {
        let edges = self.store.edges();
        self.pairs.clear();

        match self.fill_rule {
            FillRule::EvenOdd => {
                self.pairs
                    .extend(self.active.iter(edges).tuples::<(_, _)>());
                self.active.len() % 2 == 0
            }

            FillRule::NonZero => {
                let mut winding = 0;
                let mut open = EDGE_NONE;

                for idx in self.active.iter(edges) {
                    let previous = winding;
                    winding += edges[idx as usize].winding;

                    if previous == 0 && winding != 0 {
                        open = idx;
                    } else if previous != 0 && winding == 0 {
                        self.pairs.push((open, idx));
                        open = EDGE_NONE;
                    }
                }

                winding == 0
            }
        }
    }

    ///
    /// Emits one trapezoid per inside interval for the run `subrow..run_end`
    ///
    fn emit_trapezoids(
        &self,
        subrow: i32,
        run_end: i32,
        clip: &PixelRect,
        sink: &mut dyn GeometrySink,
    ) -> Result<()> {
        let edges = self.store.edges();
        let rows = run_end - subrow;

        let y_top = from_subpixel(subrow);
        let y_bottom = from_subpixel(run_end);
        let height = y_bottom - y_top;

        let clip_left = clip.left as f32;
        let clip_right = clip.right as f32;
        let clamp = |x: f64| (x as f32 / SUBPIXEL_SCALE as f32).max(clip_left).min(clip_right);

        for (left, right) in self.pairs.iter() {
            let left = &edges[*left as usize];
            let right = &edges[*right as usize];

            let top_left_x = clamp(left.x_exact());
            let bottom_left_x = clamp(left.x_after(rows));
            let top_right_x = clamp(right.x_exact()).max(top_left_x);
            let bottom_right_x = clamp(right.x_after(rows)).max(bottom_left_x);

            // Suppress intervals that collapsed to nothing (including those clamped
            // entirely to one side of the clip rectangle)
            if top_right_x <= top_left_x && bottom_right_x <= bottom_left_x {
                continue;
            }

            // Half a pixel of anti-alias expansion, widened by the slope so the ramp
            // still covers a full pixel measured horizontally
            let left_expand = 0.5 + 0.5 * ((bottom_left_x - top_left_x) / height).abs();
            let right_expand = 0.5 + 0.5 * ((bottom_right_x - top_right_x) / height).abs();

            sink.add_trapezoid(&Trapezoid {
                y_top,
                y_bottom,
                top_left_x,
                top_right_x,
                bottom_left_x,
                bottom_right_x,
                left_expand,
                right_expand,
            })?;
        }

        Ok(())
    }

    ///
    /// Adds the current subrow's inside intervals to the coverage buffer
    ///
    fn accumulate_coverage(&mut self, clip_x0: i32, clip_x1: i32) {
        self.fill_pairs();

        let edges = self.store.edges();
        let intervals = self
            .pairs
            .iter()
            .map(|(left, right)| {
                let x0 = edges[*left as usize].x.max(clip_x0).min(clip_x1);
                let x1 = edges[*right as usize].x.max(clip_x0).min(clip_x1);
                (x0, x1)
            })
            .collect::<SmallVec<[_; 8]>>();

        for (x0, x1) in intervals {
            self.coverage.add_interval(x0, x1);
        }
    }

    ///
    /// True if the transformed rectangle covers the entire clip rectangle
    ///
    fn covers_clip(transform: &Transform2D, clip: &PixelRect, min: Point, max: Point) -> bool {
        let a = transform.transform_point(min);
        let b = transform.transform_point(max);

        a.x.min(b.x) <= clip.left as f32
            && a.y.min(b.y) <= clip.top as f32
            && a.x.max(b.x) >= clip.right as f32
            && a.y.max(b.y) >= clip.bottom as f32
    }
}

impl Default for Rasterizer {
    fn default() -> Rasterizer {
        Rasterizer::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    ///
    /// Sink that records every call for inspection
    ///
    #[derive(Default)]
    pub struct RecordingSink {
        pub trapezoids: Vec<Trapezoid>,
        pub scans: Vec<(i32, Vec<CoverageRun>)>,
        pub parallelograms: Vec<[Point; 4]>,
        pub emitted_y: Vec<f32>,
        pub began: bool,
        pub ended: bool,
        pub fail_after: Option<usize>,
    }

    impl RecordingSink {
        fn calls(&self) -> usize {
            self.trapezoids.len() + self.scans.len() + self.parallelograms.len()
        }

        fn check_fail(&self) -> Result<()> {
            match self.fail_after {
                Some(limit) if self.calls() >= limit => Err(Error::OutOfMemory),
                _ => Ok(()),
            }
        }
    }

    impl GeometrySink for RecordingSink {
        fn begin_building(&mut self, _options: &RasterOptions) -> Result<()> {
            self.began = true;
            Ok(())
        }

        fn add_trapezoid(&mut self, trapezoid: &Trapezoid) -> Result<()> {
            self.check_fail()?;
            self.emitted_y.push(trapezoid.y_top);
            self.trapezoids.push(*trapezoid);
            Ok(())
        }

        fn add_complex_scan(&mut self, pixel_y: i32, scan: CoverageScan<'_>) -> Result<()> {
            self.check_fail()?;
            self.emitted_y.push(pixel_y as f32);
            self.scans.push((pixel_y, scan.runs().collect()));
            Ok(())
        }

        fn add_parallelogram(&mut self, corners: &[Point; 4]) -> Result<()> {
            self.check_fail()?;
            self.parallelograms.push(*corners);
            Ok(())
        }

        fn end_building(&mut self) -> Result<()> {
            self.ended = true;
            Ok(())
        }

        fn is_empty(&self) -> bool {
            self.calls() == 0
        }
    }

    fn rasterize(path: &Path, clip: PixelRect) -> RecordingSink {
        let mut sink = RecordingSink::default();
        let mut rasterizer = Rasterizer::new();
        rasterizer
            .rasterize(
                path,
                &Transform2D::identity(),
                clip,
                &RasterOptions::default(),
                &mut sink,
            )
            .unwrap();
        sink
    }

    fn square(left: f32, top: f32, right: f32, bottom: f32) -> Path {
        let mut builder = PathBuilder::new();
        builder
            .move_to(left, top)
            .line_to(right, top)
            .line_to(right, bottom)
            .line_to(left, bottom)
            .close();
        builder.build()
    }

    #[test]
    fn rectangle_covering_the_clip_is_the_parallelogram_fast_path() {
        let sink = rasterize(&square(0.0, 0.0, 100.0, 100.0), PixelRect::new(0, 0, 100, 100));

        assert_eq!(sink.parallelograms.len(), 1);
        assert_eq!(
            sink.parallelograms[0],
            [
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(100.0, 100.0),
                Point::new(0.0, 100.0),
            ]
        );
        assert!(sink.trapezoids.is_empty());
        assert!(sink.began && sink.ended);
    }

    #[test]
    fn square_is_a_single_trapezoid() {
        let sink = rasterize(&square(10.0, 10.0, 30.0, 30.0), PixelRect::new(0, 0, 100, 100));

        assert_eq!(sink.trapezoids.len(), 1);
        assert!(sink.scans.is_empty());
        assert!(sink.parallelograms.is_empty());

        let trapezoid = &sink.trapezoids[0];
        assert_eq!(trapezoid.y_top, 10.0);
        assert_eq!(trapezoid.y_bottom, 30.0);
        assert_eq!(trapezoid.top_left_x, 10.0);
        assert_eq!(trapezoid.top_right_x, 30.0);
        assert_eq!(trapezoid.bottom_left_x, 10.0);
        assert_eq!(trapezoid.bottom_right_x, 30.0);
        assert_eq!(trapezoid.left_expand, 0.5);
        assert_eq!(trapezoid.right_expand, 0.5);
    }

    #[test]
    fn fractional_rows_become_complex_scans() {
        // Top and bottom are halfway into their pixel rows
        let sink = rasterize(
            &square(10.0, 10.5, 30.0, 29.5),
            PixelRect::new(0, 0, 100, 100),
        );

        // One partial row at the top, one at the bottom, a trapezoid between
        assert_eq!(sink.trapezoids.len(), 1);
        assert_eq!(sink.scans.len(), 2);
        assert_eq!(sink.scans[0].0, 10);
        assert_eq!(sink.scans[1].0, 29);

        let half_runs = sink.scans[0]
            .1
            .iter()
            .filter(|run| run.coverage != 0)
            .collect::<Vec<_>>();
        assert_eq!(half_runs.len(), 1);
        assert_eq!(half_runs[0].x_start, 10);
        assert_eq!(half_runs[0].x_end, 30);
        assert_eq!(half_runs[0].coverage, COVERAGE_FULL / 2);
    }

    #[test]
    fn strata_arrive_in_non_decreasing_y_order() {
        let mut builder = PathBuilder::new();
        builder
            .move_to(10.0, 10.0)
            .line_to(40.0, 10.0)
            .line_to(10.0, 40.0)
            .line_to(40.0, 40.0)
            .close();
        let sink = rasterize(&builder.build(), PixelRect::new(0, 0, 100, 100));

        assert!(!sink.emitted_y.is_empty());

        let mut sorted = sink.emitted_y.clone();
        sorted.sort_by(f32::total_cmp);
        assert_eq!(sink.emitted_y, sorted);
    }

    #[test]
    fn sink_errors_abort_the_sweep() {
        let mut sink = RecordingSink {
            fail_after: Some(0),
            ..RecordingSink::default()
        };
        let mut rasterizer = Rasterizer::new();

        let result = rasterizer.rasterize(
            &square(10.0, 10.0, 30.0, 30.0),
            &Transform2D::identity(),
            PixelRect::new(0, 0, 100, 100),
            &RasterOptions::default(),
            &mut sink,
        );

        assert_eq!(result, Err(Error::OutOfMemory));
    }

    #[test]
    fn empty_clip_is_an_invalid_argument() {
        let mut sink = RecordingSink::default();
        let mut rasterizer = Rasterizer::new();

        let result = rasterizer.rasterize(
            &square(10.0, 10.0, 30.0, 30.0),
            &Transform2D::identity(),
            PixelRect::new(50, 50, 50, 100),
            &RasterOptions::default(),
            &mut sink,
        );

        assert_eq!(result, Err(Error::InvalidArg));
        assert!(!sink.began);
    }

    #[test]
    fn empty_shape_still_opens_and_closes_the_sink() {
        let sink = rasterize(&Path::default(), PixelRect::new(0, 0, 100, 100));

        assert!(sink.began);
        assert!(sink.ended);
        assert!(sink.is_empty());
    }
}
