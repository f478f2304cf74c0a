// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Time interpolation and iteration over radio-telescope calibration solution
tables.

A calibration solver writes per-antenna, per-spectral-window solutions indexed
by time. Applying those solutions to visibility data means answering "what is
the calibration at time T?" over and over, in time order, for every
antenna/spw stream. This crate provides the machinery for that:

- [`locate`]: bisection search over a sorted time axis, with a buffered
  variant that answers repeated nearby queries in O(1);
- [`table`]: the solution-table data model, column-name resolution and
  sorting;
- [`iterate`]: a cursor that partitions a solution table into "solution
  iterations" (maximal groups sharing the chosen index columns);
- [`interp`]: the per-stream interpolation engine, with nearest/linear/cubic
  kernels, flat boundary extrapolation, flag propagation and phase
  unwrapping for phase-delay corrections.
 */

pub mod error;
pub mod interp;
pub mod iterate;
pub mod locate;
pub mod table;

// Re-exports.
pub use error::CaltimeError;
pub use interp::{InterpMethod, TimeInterp};
pub use iterate::SolutionIter;
pub use locate::{BufferedBisectionLocator, Locator};
pub use table::{ColumnKey, SolutionRow, SolutionTable, SortOption, SortOrder};

/// A shorthand for a complex number comprised of two double-precision floats.
#[allow(non_camel_case_types)]
pub type c64 = num_complex::Complex<f64>;
