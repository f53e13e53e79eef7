/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//!
//! # strata_raster
//!
//! Anti-aliased scan conversion for filled 2D paths. A path (polylines and cubic
//! bezier sections, under an even-odd or non-zero fill rule) is swept on an 8x8
//! subpixel grid and emitted as a stream of alpha-weighted primitives: trapezoids
//! where two edges cross a run of pixel rows cleanly, and run-length-encoded
//! coverage scans everywhere else. Drawn with straight alpha blending, the stream
//! reproduces a high-quality anti-aliased fill of the path.
//!
//! The consumer of the stream implements [`GeometrySink`]; `strata_mesh` provides a
//! sink that builds GPU triangle strips.
//!
//! ```
//! use strata_raster::*;
//!
//! let mut builder = PathBuilder::new();
//! builder
//!     .move_to(10.0, 10.5)
//!     .line_to(30.0, 10.5)
//!     .line_to(30.0, 29.5)
//!     .line_to(10.0, 29.5)
//!     .close();
//! let path = builder.build();
//!
//! # struct CountingSink(usize);
//! # impl GeometrySink for CountingSink {
//! #     fn begin_building(&mut self, _: &RasterOptions) -> Result<()> { Ok(()) }
//! #     fn add_trapezoid(&mut self, _: &Trapezoid) -> Result<()> { self.0 += 1; Ok(()) }
//! #     fn add_complex_scan(&mut self, _: i32, _: CoverageScan<'_>) -> Result<()> { self.0 += 1; Ok(()) }
//! #     fn add_parallelogram(&mut self, _: &[Point; 4]) -> Result<()> { self.0 += 1; Ok(()) }
//! #     fn end_building(&mut self) -> Result<()> { Ok(()) }
//! #     fn is_empty(&self) -> bool { self.0 == 0 }
//! # }
//! # let mut sink = CountingSink(0);
//! let mut rasterizer = Rasterizer::new();
//! rasterizer.rasterize(
//!     &path,
//!     &Transform2D::identity(),
//!     PixelRect::new(0, 0, 100, 100),
//!     &RasterOptions::default(),
//!     &mut sink,
//! ).unwrap();
//!
//! assert!(!sink.is_empty());
//! ```
//!

/// Fixed-point, point, rectangle and transform primitives
pub mod geometry;

/// The figure model: paths, fill rules and the `Shape` trait
pub mod path;

/// Flattening, clipping and storage of monotone edges
pub mod edges;

/// The scanline sweep: active edges, coverage accumulation and row classification
pub mod sweep;

mod error;
mod sink;

pub use self::error::*;
pub use self::geometry::{PixelRect, Point, Transform2D};
pub use self::path::{FillRule, Path, PathBuilder, Shape};
pub use self::sink::*;
pub use self::sweep::{CoverageRun, CoverageScan, Rasterizer};
