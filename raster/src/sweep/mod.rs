/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//!
//! # Sweep
//!
//! The scanline sweep over a shape's edges. The active edge list tracks which edges
//! straddle the current subrow, the coverage buffer accumulates subpixel coverage for
//! one pixel row at a time, and the converter drives both to classify every pixel row
//! as either a trapezoid run or a complex coverage scan.
//!

mod active;
mod converter;
mod coverage;

pub use self::active::*;
pub use self::converter::*;
pub use self::coverage::*;
