/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::flatten::*;
use super::store::*;
use crate::error::*;
use crate::geometry::*;
use crate::path::*;

///
/// Walks a shape's figures and enters their edges into a store
///
/// Points are transformed into device space and quantized onto the subpixel grid;
/// cubic sections are flattened after transformation so the tolerance is measured in
/// device pixels. Every figure is closed back to its start point whether or not it
/// was closed explicitly.
///
pub fn build_edges(
    shape: &dyn Shape,
    transform: &Transform2D,
    clip: &PixelRect,
    store: &mut EdgeStore,
) -> Result<()> {
    let clip_top = clip.top * SUBPIXEL_SCALE;
    let clip_bottom = clip.bottom * SUBPIXEL_SCALE;

    for figure_idx in 0..shape.figure_count() {
        let figure = shape.figure(figure_idx);

        let start_device = transform.transform_point(figure.start());
        let start = checked_quantize(start_device)?;

        let mut prev_device = start_device;
        let mut prev = start;

        for op in figure.ops().iter() {
            match op {
                PathOp::Line(point) => {
                    let device = transform.transform_point(*point);
                    let next = checked_quantize(device)?;

                    store.add_segment(prev, next, clip_top, clip_bottom);
                    prev_device = device;
                    prev = next;
                }

                PathOp::Cubic(cp1, cp2, end) => {
                    let cp1 = transform.transform_point(*cp1);
                    let cp2 = transform.transform_point(*cp2);
                    let end = transform.transform_point(*end);

                    // Validating the control points covers every flattened vertex,
                    // since the curve stays inside their convex hull
                    checked_quantize(cp1)?;
                    checked_quantize(cp2)?;
                    let end_quantized = checked_quantize(end)?;

                    flatten_cubic(prev_device, cp1, cp2, end, FLATTEN_TOLERANCE, &mut |point| {
                        let next = quantize(point);
                        store.add_segment(prev, next, clip_top, clip_bottom);
                        prev = next;
                    });

                    // The flattener always lands on the end point, but its output was
                    // quantized along the way; resynchronize on the exact values
                    store.add_segment(prev, end_quantized, clip_top, clip_bottom);
                    prev_device = end;
                    prev = end_quantized;
                }
            }
        }

        store.add_segment(prev, start, clip_top, clip_bottom);
    }

    Ok(())
}

#[inline]
fn checked_quantize(point: Point) -> Result<(i32, i32)> {
    Ok((to_subpixel(point.x)?, to_subpixel(point.y)?))
}

#[inline]
fn quantize(point: Point) -> (i32, i32) {
    (
        (point.x * SUBPIXEL_SCALE as f32).round() as i32,
        (point.y * SUBPIXEL_SCALE as f32).round() as i32,
    )
}
