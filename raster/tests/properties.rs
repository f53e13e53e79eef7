/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//!
//! Output invariants that must hold for arbitrary inputs
//!

use strata_raster::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Default, PartialEq, Debug)]
struct Output {
    trapezoids: Vec<Trapezoid>,
    scans: Vec<(i32, Vec<CoverageRun>)>,
    emitted_y: Vec<f32>,
}

impl GeometrySink for Output {
    fn begin_building(&mut self, _options: &RasterOptions) -> Result<()> {
        Ok(())
    }

    fn add_trapezoid(&mut self, trapezoid: &Trapezoid) -> Result<()> {
        self.emitted_y.push(trapezoid.y_top);
        self.trapezoids.push(*trapezoid);
        Ok(())
    }

    fn add_complex_scan(&mut self, pixel_y: i32, scan: CoverageScan<'_>) -> Result<()> {
        self.emitted_y.push(pixel_y as f32);
        self.scans.push((pixel_y, scan.runs().collect()));
        Ok(())
    }

    fn add_parallelogram(&mut self, _corners: &[Point; 4]) -> Result<()> {
        Ok(())
    }

    fn end_building(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.trapezoids.is_empty() && self.scans.is_empty()
    }
}

fn rasterize(path: &Path) -> Output {
    let mut output = Output::default();
    Rasterizer::new()
        .rasterize(
            path,
            &Transform2D::identity(),
            PixelRect::new(0, 0, 128, 128),
            &RasterOptions::default(),
            &mut output,
        )
        .unwrap();
    output
}

fn polygon_path(points: &[(f32, f32)], fill_rule: FillRule) -> Path {
    let mut builder = PathBuilder::new();
    builder.fill_rule(fill_rule);
    builder.move_to(points[0].0, points[0].1);

    for (x, y) in points.iter().skip(1) {
        builder.line_to(*x, *y);
    }

    builder.close();
    builder.build()
}

fn random_polygon(rng: &mut StdRng, corners: usize) -> Vec<(f32, f32)> {
    (0..corners)
        .map(|_| (rng.gen_range(5.0..120.0), rng.gen_range(5.0..120.0)))
        .collect()
}

#[test]
fn reversing_orientation_never_changes_the_output() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for corners in [3, 4, 5, 8, 13] {
        let points = random_polygon(&mut rng, corners);

        let mut reversed = points.clone();
        reversed.reverse();

        for fill_rule in [FillRule::NonZero, FillRule::EvenOdd] {
            let forward = rasterize(&polygon_path(&points, fill_rule));
            let backward = rasterize(&polygon_path(&reversed, fill_rule));

            assert_eq!(forward, backward, "polygon {:?} under {:?}", points, fill_rule);
        }
    }
}

#[test]
fn zero_length_segments_never_change_the_output() {
    let mut rng = StdRng::seed_from_u64(0xacc);

    for _ in 0..8 {
        let points = random_polygon(&mut rng, 6);

        // The same polygon with every vertex doubled
        let mut doubled = vec![];
        for point in points.iter() {
            doubled.push(*point);
            doubled.push(*point);
        }

        let plain = rasterize(&polygon_path(&points, FillRule::NonZero));
        let degenerate = rasterize(&polygon_path(&doubled, FillRule::NonZero));

        assert_eq!(plain, degenerate);
    }
}

#[test]
fn random_polygons_satisfy_the_output_invariants() {
    let mut rng = StdRng::seed_from_u64(0xf111);

    for _ in 0..16 {
        let corners = rng.gen_range(3..10);
        let points = random_polygon(&mut rng, corners);
        let output = rasterize(&polygon_path(&points, FillRule::EvenOdd));

        for trapezoid in output.trapezoids.iter() {
            assert!(trapezoid.y_top < trapezoid.y_bottom);
            assert!(trapezoid.top_left_x <= trapezoid.top_right_x);
            assert!(trapezoid.bottom_left_x <= trapezoid.bottom_right_x);
        }

        // Emission order is monotone in y across both primitive kinds
        for window in output.emitted_y.windows(2) {
            assert!(window[0] <= window[1], "strata went backwards");
        }

        // Runs are maximal and inside the coverage range
        for (_, runs) in output.scans.iter() {
            for window in runs.windows(2) {
                assert_ne!(
                    window[0].coverage, window[1].coverage,
                    "adjacent runs must have distinct coverage"
                );
                assert_eq!(window[0].x_end, window[1].x_start, "runs must abut");
            }

            for run in runs.iter() {
                assert!(run.coverage >= 0 && run.coverage <= 64);
                assert!(run.x_start < run.x_end);
            }
        }
    }
}

#[test]
fn oversized_coordinates_are_a_geometry_error() {
    let mut builder = PathBuilder::new();
    builder
        .move_to(0.0, 0.0)
        .line_to(8.872974e16, 0.0)
        .line_to(10.0, 10.0);
    let path = builder.build();

    let mut output = Output::default();
    let result = Rasterizer::new().rasterize(
        &path,
        &Transform2D::identity(),
        PixelRect::new(0, 0, 128, 128),
        &RasterOptions::default(),
        &mut output,
    );

    assert_eq!(result, Err(Error::GeometryTooLarge));
    assert!(output.is_empty());
}

#[test]
fn a_scaling_transform_is_applied_to_the_figures() {
    let mut builder = PathBuilder::new();
    builder
        .move_to(5.0, 5.0)
        .line_to(15.0, 5.0)
        .line_to(15.0, 15.0)
        .line_to(5.0, 15.0)
        .close();
    let path = builder.build();

    let mut output = Output::default();
    Rasterizer::new()
        .rasterize(
            &path,
            &Transform2D::scale(2.0, 2.0),
            PixelRect::new(0, 0, 128, 128),
            &RasterOptions::default(),
            &mut output,
        )
        .unwrap();

    assert_eq!(output.trapezoids.len(), 1);
    assert_eq!(output.trapezoids[0].y_top, 10.0);
    assert_eq!(output.trapezoids[0].y_bottom, 30.0);
    assert_eq!(output.trapezoids[0].top_left_x, 10.0);
    assert_eq!(output.trapezoids[0].top_right_x, 30.0);
}
