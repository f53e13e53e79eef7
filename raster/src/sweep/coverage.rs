/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::geometry::*;

const INTERVAL_NONE: u32 = u32::MAX;

///
/// One run of a scanline's coverage: the coverage value applies from this run's pixel
/// up to (but not including) the next run's pixel
///
#[derive(Clone, Copy, Debug)]
pub(crate) struct CoverageInterval {
    pixel_x: i32,
    coverage: i32,
    next: u32,
}

///
/// Accumulates subpixel coverage for one pixel row as a sparse, sorted run list
///
/// The list is sentinelled at both ends: a run at `i32::MIN` with zero coverage and a
/// terminator at `i32::MAX`. Each subrow adds the number of subpixel columns an inside
/// interval covers within each pixel, so after the row's eight subrows a fully
/// covered pixel holds `COVERAGE_FULL`.
///
/// Runs live in an index-addressed pool that is retained between scanlines.
///
pub struct CoverageBuffer {
    pool: Vec<CoverageInterval>,
    head: u32,
    blank: bool,
}

impl CoverageBuffer {
    pub fn new() -> CoverageBuffer {
        let mut buffer = CoverageBuffer {
            pool: vec![],
            head: 0,
            blank: true,
        };
        buffer.reset();
        buffer
    }

    ///
    /// Empties the buffer for the next pixel row, keeping the pool's allocation
    ///
    pub fn reset(&mut self) {
        self.pool.clear();
        self.blank = true;

        let tail = self.alloc(i32::MAX, 0, INTERVAL_NONE);
        self.head = self.alloc(i32::MIN, 0, tail);
    }

    ///
    /// True if nothing has been accumulated since the last reset
    ///
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.blank
    }

    ///
    /// A read-only view of the accumulated runs
    ///
    #[inline]
    pub fn scan(&self) -> CoverageScan<'_> {
        CoverageScan {
            pool: &self.pool,
            head: self.head,
        }
    }

    ///
    /// Adds one subrow's inside interval, in subpixel x coordinates
    ///
    /// The endpoints clip fractionally: the partial pixels at either end receive only
    /// the subpixel columns the interval actually covers.
    ///
    pub fn add_interval(&mut self, sub_x0: i32, sub_x1: i32) {
        if sub_x0 >= sub_x1 {
            return;
        }

        self.blank = false;

        let px0 = sub_x0 >> SUBPIXEL_SHIFT;
        let rem0 = sub_x0 & SUBPIXEL_MASK;
        let px1 = sub_x1 >> SUBPIXEL_SHIFT;
        let rem1 = sub_x1 & SUBPIXEL_MASK;

        if px0 == px1 {
            self.add_run(px0, px0 + 1, sub_x1 - sub_x0);
            return;
        }

        let mut interior_start = px0;

        if rem0 > 0 {
            self.add_run(px0, px0 + 1, SUBPIXEL_SCALE - rem0);
            interior_start += 1;
        }

        if interior_start < px1 {
            self.add_run(interior_start, px1, SUBPIXEL_SCALE);
        }

        if rem1 > 0 {
            self.add_run(px1, px1 + 1, rem1);
        }
    }

    ///
    /// Adds `delta` coverage to every pixel in `px_start..px_end`, splitting runs at
    /// the boundaries as needed
    ///
    fn add_run(&mut self, px_start: i32, px_end: i32, delta: i32) {
        // Find the run containing px_start
        let mut cur = self.head;

        while self.pool[self.pool[cur as usize].next as usize].pixel_x <= px_start {
            cur = self.pool[cur as usize].next;
        }

        // Split so a run boundary sits exactly at px_start
        if self.pool[cur as usize].pixel_x < px_start {
            let split = self.alloc(
                px_start,
                self.pool[cur as usize].coverage,
                self.pool[cur as usize].next,
            );
            self.pool[cur as usize].next = split;
            cur = split;
        }

        // Walk the runs inside the range, adding coverage; split the final run if it
        // extends past px_end
        while self.pool[cur as usize].pixel_x < px_end {
            let next = self.pool[cur as usize].next;

            if self.pool[next as usize].pixel_x > px_end {
                let split = self.alloc(px_end, self.pool[cur as usize].coverage, next);
                self.pool[cur as usize].next = split;
            }

            self.pool[cur as usize].coverage += delta;
            cur = self.pool[cur as usize].next;
        }
    }

    #[inline]
    fn alloc(&mut self, pixel_x: i32, coverage: i32, next: u32) -> u32 {
        let idx = self.pool.len() as u32;
        self.pool.push(CoverageInterval {
            pixel_x,
            coverage,
            next,
        });
        idx
    }
}

impl Default for CoverageBuffer {
    fn default() -> CoverageBuffer {
        CoverageBuffer::new()
    }
}

///
/// A borrowed view of one pixel row's coverage runs
///
#[derive(Clone, Copy)]
pub struct CoverageScan<'a> {
    pool: &'a [CoverageInterval],
    head: u32,
}

impl<'a> CoverageScan<'a> {
    ///
    /// Iterates the runs left to right
    ///
    /// Runs are maximal: adjacent runs always have distinct coverage values. The
    /// leading and trailing zero-coverage runs extend to `i32::MIN` and `i32::MAX`.
    ///
    #[inline]
    pub fn runs(&self) -> CoverageRuns<'a> {
        CoverageRuns {
            pool: self.pool,
            cur: self.head,
        }
    }
}

///
/// One maximal run of equal coverage on a pixel row
///
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CoverageRun {
    /// First pixel of the run
    pub x_start: i32,

    /// Pixel after the last pixel of the run
    pub x_end: i32,

    /// Coverage in `0..=COVERAGE_FULL`
    pub coverage: i32,
}

///
/// Iterator over the maximal coverage runs of a scanline
///
pub struct CoverageRuns<'a> {
    pool: &'a [CoverageInterval],
    cur: u32,
}

impl<'a> Iterator for CoverageRuns<'a> {
    type Item = CoverageRun;

    fn next(&mut self) -> Option<CoverageRun> {
        if self.cur == INTERVAL_NONE || self.pool[self.cur as usize].next == INTERVAL_NONE {
            return None;
        }

        let start = &self.pool[self.cur as usize];
        let coverage = start.coverage;
        let x_start = start.pixel_x;

        // Merge neighbors with equal coverage so the runs are maximal
        let mut next = start.next;
        while self.pool[next as usize].next != INTERVAL_NONE
            && self.pool[next as usize].coverage == coverage
        {
            next = self.pool[next as usize].next;
        }

        self.cur = next;

        Some(CoverageRun {
            x_start,
            x_end: self.pool[next as usize].pixel_x,
            coverage: coverage.min(COVERAGE_FULL),
        })
    }
}
