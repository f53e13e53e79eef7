/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use smallvec::*;
use strata_raster::Transform2D;

///
/// Waffling stops when the partition spacing drops below this many pixels: tiles that
/// small generate excessive triangles for no visual effect
///
pub const MIN_WAFFLE_WIDTH_PIXELS: f32 = 0.25;

///
/// One family of parallel partition lines `a*x + b*y + c = k` for every integer `k`
///
/// Waffling subdivides triangles along these lines so that integer texture
/// coordinates become explicit polygon vertices and textured fills tile correctly.
///
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct WafflePartition {
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl WafflePartition {
    ///
    /// The partition families induced by a texture transform
    ///
    /// Each row of the transform (the u and the v coefficients) partitions the plane
    /// into unit strips of texture parameter. A family whose strips are narrower than
    /// `MIN_WAFFLE_WIDTH_PIXELS` on screen is skipped: the spacing of the lines
    /// `a*x + b*y + c = k` is `1/sqrt(a*a + b*b)`.
    ///
    pub fn families_from_transform(transform: &Transform2D) -> SmallVec<[WafflePartition; 2]> {
        let max_magnitude = 1.0 / (MIN_WAFFLE_WIDTH_PIXELS * MIN_WAFFLE_WIDTH_PIXELS);
        let Transform2D(rows) = transform;

        let mut families = smallvec![];

        for [a, b, c] in rows.iter() {
            let magnitude = a * a + b * b;

            if magnitude > 0.0 && magnitude < max_magnitude {
                families.push(WafflePartition {
                    a: *a,
                    b: *b,
                    c: *c,
                });
            }
        }

        families
    }

    #[inline]
    fn value(&self, point: &WafflePoint) -> f32 {
        self.a * point.x + self.b * point.y + self.c
    }
}

///
/// A point in the waffling pipeline: position plus interpolated coverage
///
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct WafflePoint {
    pub x: f32,
    pub y: f32,
    pub alpha: f32,
}

impl WafflePoint {
    #[inline]
    pub fn new(x: f32, y: f32, alpha: f32) -> WafflePoint {
        WafflePoint { x, y, alpha }
    }

    #[inline]
    fn lerp(&self, other: &WafflePoint, t: f32) -> WafflePoint {
        WafflePoint {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            alpha: self.alpha + (other.alpha - self.alpha) * t,
        }
    }
}

///
/// Splits a triangle along every integer level of every partition family, emitting
/// the resulting sub-triangles
///
pub fn waffle_triangle(
    families: &[WafflePartition],
    triangle: [WafflePoint; 3],
    emit: &mut impl FnMut([WafflePoint; 3]),
) {
    let (family, rest) = match families.split_first() {
        Some(split) => split,
        None => {
            emit(triangle);
            return;
        }
    };

    let values = [
        family.value(&triangle[0]),
        family.value(&triangle[1]),
        family.value(&triangle[2]),
    ];
    let min_level = values.iter().cloned().fold(f32::MAX, f32::min).floor() as i32;
    let max_level = values.iter().cloned().fold(f32::MIN, f32::max).ceil() as i32;

    let mut polygon: SmallVec<[WafflePoint; 8]> = smallvec![];
    let mut clipped: SmallVec<[WafflePoint; 8]> = smallvec![];

    for level in min_level..max_level {
        // Clip the triangle to the strip between this level and the next
        polygon.clear();
        polygon.extend(triangle.iter().cloned());

        clip_to_half_plane(&mut polygon, &mut clipped, |p| family.value(p) - level as f32);
        clip_to_half_plane(&mut polygon, &mut clipped, |p| (level + 1) as f32 - family.value(p));

        if polygon.len() < 3 {
            continue;
        }

        // Fan-triangulate the strip polygon and waffle against the remaining families
        for idx in 1..polygon.len() - 1 {
            waffle_triangle(rest, [polygon[0], polygon[idx], polygon[idx + 1]], emit);
        }
    }
}

///
/// Splits a line segment at every integer level of every partition family, emitting
/// the resulting sub-segments in order
///
pub fn waffle_line(
    families: &[WafflePartition],
    line: [WafflePoint; 2],
    emit: &mut impl FnMut([WafflePoint; 2]),
) {
    let (family, rest) = match families.split_first() {
        Some(split) => split,
        None => {
            emit(line);
            return;
        }
    };

    let v0 = family.value(&line[0]);
    let v1 = family.value(&line[1]);

    // Parameter values where the segment crosses an integer level, in segment order
    let mut cuts: SmallVec<[f32; 8]> = smallvec![];
    let (low, high) = (v0.min(v1), v0.max(v1));

    let mut level = low.floor() + 1.0;
    while level < high {
        cuts.push((level - v0) / (v1 - v0));
        level += 1.0;
    }

    if v1 < v0 {
        cuts.reverse();
    }

    let mut start = line[0];
    for cut in cuts {
        let point = line[0].lerp(&line[1], cut);

        if point != start {
            waffle_line(rest, [start, point], emit);
        }
        start = point;
    }

    if start != line[1] {
        waffle_line(rest, [start, line[1]], emit);
    }
}

///
/// Sutherland-Hodgman clip of a polygon against `distance(p) >= 0`
///
fn clip_to_half_plane(
    polygon: &mut SmallVec<[WafflePoint; 8]>,
    scratch: &mut SmallVec<[WafflePoint; 8]>,
    distance: impl Fn(&WafflePoint) -> f32,
) {
    scratch.clear();

    for idx in 0..polygon.len() {
        let cur = polygon[idx];
        let next = polygon[(idx + 1) % polygon.len()];

        let d_cur = distance(&cur);
        let d_next = distance(&next);

        if d_cur >= 0.0 {
            scratch.push(cur);
        }

        if (d_cur < 0.0) != (d_next < 0.0) {
            let t = d_cur / (d_cur - d_next);
            scratch.push(cur.lerp(&next, t));
        }
    }

    std::mem::swap(polygon, scratch);
}
