/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//!
//! # Paths
//!
//! The figure model consumed by the rasterizer: a shape is a set of figures, each a
//! start point followed by line and cubic bezier segments, filled under an even-odd
//! or non-zero winding rule. `Path` and `PathBuilder` are the concrete containers;
//! anything else can participate by implementing the `Shape` trait.
//!

mod fill_rule;
mod path;
mod shape;

pub use self::fill_rule::*;
pub use self::path::*;
pub use self::shape::*;
