/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//!
//! # strata_mesh
//!
//! Turns `strata_raster` output into GPU-ready mesh buffers. The [`MeshBuilder`]
//! sink accumulates a triangle strip for trapezoids (with half-pixel anti-alias
//! expansion rails), a line list for complex coverage scans, and an indexed triangle
//! list for waffled and precomputed geometry. Coverage rides in each vertex's
//! diffuse channel as the bit pattern of a float in `0.0..=1.0`.
//!
//! ```
//! use strata_mesh::*;
//! use strata_raster::{PathBuilder, PixelRect};
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
//! let mesh = fill_path::<CoverageVertex>(&path, PixelRect::new(0, 0, 100, 100), None, true)
//!     .unwrap();
//!
//! assert!(!mesh.is_empty());
//! ```
//!

mod buffer;
mod builder;
mod vertex;
mod waffle;

pub use self::buffer::*;
pub use self::builder::*;
pub use self::vertex::*;
pub use self::waffle::*;

use strata_raster::*;

///
/// Fills a path into mesh buffers in one call
///
/// When `outside` is set, the clip is intersected with it and every pixel of the
/// intersection outside the shape is emitted with zero coverage; `need_inside`
/// controls whether the fully covered interior is emitted at all. An empty
/// intersection produces empty buffers.
///
pub fn fill_path<TVertex: StripVertex>(
    path: &Path,
    clip: PixelRect,
    outside: Option<PixelRect>,
    need_inside: bool,
) -> Result<MeshBuffers<TVertex>> {
    let (clip, options) = match outside {
        Some(bounds) => {
            let merged = clip.intersect(&bounds);

            if merged.is_empty() {
                return Ok(MeshBuffers::new());
            }

            (
                merged,
                RasterOptions {
                    emit_outside: Some(merged),
                    need_inside,
                },
            )
        }

        None => (
            clip,
            RasterOptions {
                emit_outside: None,
                need_inside,
            },
        ),
    };

    let mut builder: MeshBuilder<TVertex> = MeshBuilder::new(clip);
    let mut rasterizer = Rasterizer::new();

    rasterizer.rasterize(path, &Transform2D::identity(), clip, &options, &mut builder)?;

    Ok(builder.into_buffers())
}
