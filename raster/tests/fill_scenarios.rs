/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//!
//! End-to-end fills of known shapes, checked against their analytic areas
//!

use strata_raster::geometry::COVERAGE_FULL;
use strata_raster::*;

///
/// Sink that records primitives and can integrate their total coverage area
///
#[derive(Default)]
struct RecordingSink {
    trapezoids: Vec<Trapezoid>,
    scans: Vec<(i32, Vec<CoverageRun>)>,
    parallelograms: Vec<[Point; 4]>,
}

impl GeometrySink for RecordingSink {
    fn begin_building(&mut self, _options: &RasterOptions) -> Result<()> {
        Ok(())
    }

    fn add_trapezoid(&mut self, trapezoid: &Trapezoid) -> Result<()> {
        self.trapezoids.push(*trapezoid);
        Ok(())
    }

    fn add_complex_scan(&mut self, pixel_y: i32, scan: CoverageScan<'_>) -> Result<()> {
        self.scans.push((pixel_y, scan.runs().collect()));
        Ok(())
    }

    fn add_parallelogram(&mut self, corners: &[Point; 4]) -> Result<()> {
        self.parallelograms.push(*corners);
        Ok(())
    }

    fn end_building(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.trapezoids.is_empty() && self.scans.is_empty() && self.parallelograms.is_empty()
    }
}

impl RecordingSink {
    ///
    /// Total area covered, weighting complex runs by their coverage
    ///
    fn coverage_area(&self) -> f64 {
        let trapezoid_area = self
            .trapezoids
            .iter()
            .map(|t| {
                let top = (t.top_right_x - t.top_left_x) as f64;
                let bottom = (t.bottom_right_x - t.bottom_left_x) as f64;
                0.5 * (top + bottom) * (t.y_bottom - t.y_top) as f64
            })
            .sum::<f64>();

        let scan_area = self
            .scans
            .iter()
            .flat_map(|(_, runs)| runs.iter())
            .filter(|run| run.coverage != 0)
            .map(|run| (run.x_end - run.x_start) as f64 * run.coverage as f64 / COVERAGE_FULL as f64)
            .sum::<f64>();

        trapezoid_area + scan_area
    }

    fn check_trapezoid_invariants(&self) {
        for t in self.trapezoids.iter() {
            assert!(t.y_top < t.y_bottom, "flat trapezoid: {:?}", t);
            assert!(t.top_left_x <= t.top_right_x, "crossed top rail: {:?}", t);
            assert!(t.bottom_left_x <= t.bottom_right_x, "crossed bottom rail: {:?}", t);
            assert!(t.left_expand >= 0.5 && t.right_expand >= 0.5);
        }
    }
}

fn rasterize(path: &Path, clip: PixelRect) -> RecordingSink {
    let mut sink = RecordingSink::default();
    Rasterizer::new()
        .rasterize(
            path,
            &Transform2D::identity(),
            clip,
            &RasterOptions::default(),
            &mut sink,
        )
        .unwrap();

    sink.check_trapezoid_invariants();
    sink
}

fn clip() -> PixelRect {
    PixelRect::new(0, 0, 100, 100)
}

#[test]
fn unit_square_is_one_exact_trapezoid() {
    let mut builder = PathBuilder::new();
    builder
        .move_to(10.0, 10.0)
        .line_to(30.0, 10.0)
        .line_to(30.0, 30.0)
        .line_to(10.0, 30.0)
        .close();
    let sink = rasterize(&builder.build(), clip());

    assert_eq!(sink.trapezoids.len(), 1);
    assert!(sink.scans.is_empty());

    let t = &sink.trapezoids[0];
    assert_eq!((t.y_top, t.y_bottom), (10.0, 30.0));
    assert_eq!((t.top_left_x, t.top_right_x), (10.0, 30.0));
    assert_eq!((t.bottom_left_x, t.bottom_right_x), (10.0, 30.0));
    assert_eq!((t.left_expand, t.right_expand), (0.5, 0.5));
    assert!((sink.coverage_area() - 400.0).abs() < 1e-3);
}

#[test]
fn reversed_orientation_fills_identically() {
    let mut builder = PathBuilder::new();
    builder
        .move_to(10.0, 10.0)
        .line_to(10.0, 30.0)
        .line_to(30.0, 30.0)
        .line_to(30.0, 10.0)
        .close();
    let reversed = rasterize(&builder.build(), clip());

    let mut builder = PathBuilder::new();
    builder
        .move_to(10.0, 10.0)
        .line_to(30.0, 10.0)
        .line_to(30.0, 30.0)
        .line_to(10.0, 30.0)
        .close();
    let forward = rasterize(&builder.build(), clip());

    assert_eq!(forward.trapezoids, reversed.trapezoids);
    assert_eq!(forward.scans, reversed.scans);
}

#[test]
fn degenerate_quad_with_stray_vertex_still_fills() {
    // A reversed-order quad with a stray collinear vertex partway up the left edge:
    // the fill must come out as if the stray vertex wasn't there
    let mut builder = PathBuilder::new();
    builder
        .move_to(10.0, 10.0)
        .line_to(10.0, 30.0)
        .line_to(30.0, 30.0)
        .line_to(30.0, 10.0)
        .close();
    let plain = rasterize(&builder.build(), clip());

    let mut builder = PathBuilder::new();
    builder
        .move_to(10.0, 10.0)
        .line_to(10.0, 30.0)
        .line_to(30.0, 30.0)
        .line_to(30.0, 10.0)
        .line_to(10.0, 10.0)
        .line_to(10.0, 28.0)
        .line_to(10.0, 10.0)
        .close();
    let degenerate = rasterize(&builder.build(), clip());

    assert!((plain.coverage_area() - 400.0).abs() < 1e-3);
    assert!((degenerate.coverage_area() - 400.0).abs() < 1e-3);
}

#[test]
fn quarter_circle_mixes_trapezoids_and_scans() {
    // Quarter disc of radius 15 centered at (10, 25): one cubic for the arc, then a
    // radial edge back to the center
    let radius = 15.0;
    let kappa = 0.5522848 * radius;

    let mut builder = PathBuilder::new();
    builder
        .move_to(10.0 + radius, 25.0)
        .curve_to(
            (10.0 + radius, 25.0 - kappa),
            (10.0 + kappa, 25.0 - radius),
            (10.0, 25.0 - radius),
        )
        .line_to(10.0, 25.0)
        .close();
    let sink = rasterize(&builder.build(), clip());

    // Steep interior rows come out as trapezoids, the shallow rows near the top of
    // the arc as complex scans
    assert!(!sink.trapezoids.is_empty(), "no trapezoid rows");
    assert!(!sink.scans.is_empty(), "no complex rows");

    let expected = std::f64::consts::PI * (radius as f64) * (radius as f64) / 4.0;
    assert!(
        (sink.coverage_area() - expected).abs() < 1.0,
        "area {} vs {}",
        sink.coverage_area(),
        expected
    );
}

#[test]
fn clipped_triangle_stays_inside_the_clip() {
    let clip = PixelRect::new(0, 0, 40, 40);

    let mut builder = PathBuilder::new();
    builder
        .move_to(-20.0, 10.0)
        .line_to(50.0, 10.0)
        .line_to(50.0, 60.0)
        .close();
    let path = builder.build();

    let mut sink = RecordingSink::default();
    Rasterizer::new()
        .rasterize(
            &path,
            &Transform2D::identity(),
            clip,
            &RasterOptions::default(),
            &mut sink,
        )
        .unwrap();

    assert!(!sink.is_empty());

    for t in sink.trapezoids.iter() {
        for x in [t.top_left_x, t.top_right_x, t.bottom_left_x, t.bottom_right_x] {
            assert!(x >= 0.0 && x <= 40.0, "trapezoid rail outside the clip: {:?}", t);
        }
        assert!(t.y_top >= 0.0 && t.y_bottom <= 40.0);
    }

    for (y, runs) in sink.scans.iter() {
        assert!(*y >= 0 && *y < 40);

        for run in runs.iter().filter(|run| run.coverage != 0) {
            assert!(run.x_start >= 0 && run.x_end <= 40);
        }
    }
}

#[test]
fn overlap_fills_under_non_zero_and_hollows_under_even_odd() {
    let squares = |fill_rule| {
        let mut builder = PathBuilder::new();
        builder
            .fill_rule(fill_rule)
            .move_to(10.0, 10.0)
            .line_to(30.0, 10.0)
            .line_to(30.0, 30.0)
            .line_to(10.0, 30.0)
            .close()
            .move_to(20.0, 20.0)
            .line_to(40.0, 20.0)
            .line_to(40.0, 40.0)
            .line_to(20.0, 40.0)
            .close();
        builder.build()
    };

    // Two 20x20 squares overlapping in a 10x10 region
    let non_zero = rasterize(&squares(FillRule::NonZero), clip());
    let even_odd = rasterize(&squares(FillRule::EvenOdd), clip());

    assert!((non_zero.coverage_area() - 700.0).abs() < 1e-3);
    assert!((even_odd.coverage_area() - 600.0).abs() < 1e-3);
}

#[test]
fn shape_identical_to_the_clip_is_one_parallelogram() {
    let clip = PixelRect::new(0, 0, 100, 100);

    let mut builder = PathBuilder::new();
    builder
        .move_to(0.0, 0.0)
        .line_to(100.0, 0.0)
        .line_to(100.0, 100.0)
        .line_to(0.0, 100.0)
        .close();
    let sink = rasterize(&builder.build(), clip);

    assert_eq!(sink.parallelograms.len(), 1);
    assert!(sink.trapezoids.is_empty());
    assert!(sink.scans.is_empty());
}

#[test]
fn complex_row_coverage_matches_the_row_area() {
    // A triangle placed off the pixel grid so its first and last rows rasterize as
    // complex scans: each scan's integrated coverage must match the geometric area
    // of the triangle slice on that row
    let mut builder = PathBuilder::new();
    builder
        .move_to(10.25, 10.25)
        .line_to(41.75, 10.25)
        .line_to(10.25, 41.75)
        .close();
    let sink = rasterize(&builder.build(), clip());

    assert!(!sink.scans.is_empty());

    for (row, runs) in sink.scans.iter() {
        // Width of the slice at height y: from x=10.25 to the hypotenuse x+y=52
        let width = |y: f64| (41.75 - y).max(0.0);

        let top = (*row as f64).max(10.25);
        let bottom = (*row as f64 + 1.0).min(41.75);
        let expected = if top < bottom {
            0.5 * (width(top) + width(bottom)) * (bottom - top)
        } else {
            0.0
        };

        let measured = runs
            .iter()
            .filter(|run| run.coverage != 0)
            .map(|run| (run.x_end - run.x_start) as f64 * run.coverage as f64 / 64.0)
            .sum::<f64>();

        assert!(
            (measured - expected).abs() <= 0.5,
            "row {}: measured {} expected {}",
            row,
            measured,
            expected
        );
    }
}
