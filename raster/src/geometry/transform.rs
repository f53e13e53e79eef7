/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::point::*;

///
/// A 3x2 affine transform, stored as two rows of `[a, b, c]` where a point maps as
/// `x' = a*x + b*y + c`
///
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Transform2D(pub [[f32; 3]; 2]);

impl Default for Transform2D {
    #[inline]
    fn default() -> Transform2D {
        Transform2D::identity()
    }
}

impl Transform2D {
    ///
    /// The transform that leaves points unchanged
    ///
    #[inline]
    pub fn identity() -> Transform2D {
        Transform2D([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
    }

    ///
    /// A transform that moves points by an offset
    ///
    #[inline]
    pub fn translate(dx: f32, dy: f32) -> Transform2D {
        Transform2D([[1.0, 0.0, dx], [0.0, 1.0, dy]])
    }

    ///
    /// A transform that scales points around the origin
    ///
    #[inline]
    pub fn scale(sx: f32, sy: f32) -> Transform2D {
        Transform2D([[sx, 0.0, 0.0], [0.0, sy, 0.0]])
    }

    ///
    /// Applies this transform to a point
    ///
    #[inline]
    pub fn transform_point(&self, point: Point) -> Point {
        let Transform2D([[a, b, c], [d, e, f]]) = self;

        Point {
            x: a * point.x + b * point.y + c,
            y: d * point.x + e * point.y + f,
        }
    }

    ///
    /// The transform equivalent to applying `other` then `self`
    ///
    pub fn then(&self, other: &Transform2D) -> Transform2D {
        let Transform2D([[a1, b1, c1], [d1, e1, f1]]) = self;
        let Transform2D([[a2, b2, c2], [d2, e2, f2]]) = other;

        Transform2D([
            [a1 * a2 + b1 * d2, a1 * b2 + b1 * e2, a1 * c2 + b1 * f2 + c1],
            [d1 * a2 + e1 * d2, d1 * b2 + e1 * e2, d1 * c2 + e1 * f2 + f1],
        ])
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Transform2D::identity()
    }

    ///
    /// True if this transform maps axis-aligned rectangles to axis-aligned rectangles
    ///
    #[inline]
    pub fn is_axis_preserving(&self) -> bool {
        let Transform2D([[_, b, _], [d, _, _]]) = self;

        *b == 0.0 && *d == 0.0
    }
}
