/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::geometry::*;

/// Maximum deviation of the flattened polyline from the true curve, in device pixels
pub const FLATTEN_TOLERANCE: f32 = 0.25;

// Upper bound on subdivision so that flattening always halts, even for curves far
// larger than any real device
const MAX_STEPS: u32 = 1 << 16;

///
/// Flattens a cubic bezier section into a polyline using forward differencing
///
/// The step count is chosen adaptively: it doubles until the second difference of the
/// cubic at that step is small enough in both axes that no emitted chord deviates from
/// the curve by more than `tolerance`. Vertices are produced in parameter order, the
/// start point is not emitted, and consecutive coincident vertices are suppressed.
///
/// The flattener holds no state between calls, so each curve of a figure can be
/// flattened independently.
///
pub fn flatten_cubic(
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    tolerance: f32,
    emit: &mut impl FnMut(Point),
) {
    // Power-basis coefficients per axis, in f64 so the difference engine doesn't drift
    let (ax, bx, cx, dx) = power_basis(p0.x as f64, p1.x as f64, p2.x as f64, p3.x as f64);
    let (ay, by, cy, dy) = power_basis(p0.y as f64, p1.y as f64, p2.y as f64, p3.y as f64);

    // The second difference at step h is h^2*(6*a*t + 6*a*h + 2*b), and a chord over a
    // step deviates from the curve by at most an eighth of it. Double the step count
    // until that bound is inside half the tolerance for both axes, leaving headroom
    // for the subpixel quantization of the emitted vertices.
    let threshold = 4.0 * (tolerance as f64);
    let bound_x = 12.0 * ax.abs() + 2.0 * bx.abs();
    let bound_y = 12.0 * ay.abs() + 2.0 * by.abs();

    let mut steps = 1u32;
    let mut h = 1.0f64;

    while (bound_x * h * h > threshold || bound_y * h * h > threshold) && steps < MAX_STEPS {
        steps *= 2;
        h *= 0.5;
    }

    // Forward differences at the chosen step
    let mut fx = ForwardDifferences::new(ax, bx, cx, dx, h);
    let mut fy = ForwardDifferences::new(ay, by, cy, dy, h);

    let mut last = p0;

    for step in 1..=steps {
        let point = if step == steps {
            // Land exactly on the end point rather than on the accumulated value
            p3
        } else {
            Point::new(fx.step() as f32, fy.step() as f32)
        };

        if point != last {
            emit(point);
            last = point;
        }
    }
}

///
/// One axis of the cubic difference engine
///
struct ForwardDifferences {
    value: f64,
    d1: f64,
    d2: f64,
    d3: f64,
}

impl ForwardDifferences {
    #[inline]
    fn new(a: f64, b: f64, c: f64, d: f64, h: f64) -> ForwardDifferences {
        let h2 = h * h;
        let h3 = h2 * h;

        ForwardDifferences {
            value: d,
            d1: a * h3 + b * h2 + c * h,
            d2: 6.0 * a * h3 + 2.0 * b * h2,
            d3: 6.0 * a * h3,
        }
    }

    #[inline]
    fn step(&mut self) -> f64 {
        self.value += self.d1;
        self.d1 += self.d2;
        self.d2 += self.d3;
        self.value
    }
}

#[inline]
fn power_basis(w0: f64, w1: f64, w2: f64, w3: f64) -> (f64, f64, f64, f64) {
    let a = -w0 + 3.0 * w1 - 3.0 * w2 + w3;
    let b = 3.0 * w0 - 6.0 * w1 + 3.0 * w2;
    let c = -3.0 * w0 + 3.0 * w1;

    (a, b, c, w0)
}
