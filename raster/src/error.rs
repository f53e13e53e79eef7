/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

///
/// Errors that can occur while rasterizing a shape or building its output geometry
///
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Error {
    /// An argument failed validation before any work was done (eg, an empty clip rectangle)
    InvalidArg,

    /// A buffer limit was exceeded (eg, more indexed vertices than the index format can address)
    OutOfMemory,

    /// A coordinate overflowed the fixed-point range after scaling to the subpixel grid
    GeometryTooLarge,

    /// The sink cannot produce the requested geometry
    NotImplemented,
}

/// Result type used throughout the rasterizer
pub type Result<T> = std::result::Result<T, Error>;
