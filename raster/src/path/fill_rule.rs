/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

///
/// How edge crossings decide whether a point is inside a filled shape
///
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FillRule {
    /// A point is inside if a ray from it crosses an odd number of edges
    EvenOdd,

    /// A point is inside if the signed crossing count of a ray from it is non-zero
    NonZero,
}

impl Default for FillRule {
    #[inline]
    fn default() -> FillRule {
        FillRule::EvenOdd
    }
}
