// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Time interpolation of calibration solutions for one antenna/spw stream.
//!
//! [`TimeInterp`] is built once from a solution sub-table (e.g. one group
//! from a [`crate::iterate::SolutionIter`]) and then queried repeatedly as
//! visibility data streams through in time order. Construction does all the
//! table reading: it orders the rows by time, builds the domain (seconds
//! since the first timestamp, for numerical stability) and the parameter /
//! flag cubes, and accumulates the 2π wrap counts that phase-delay
//! corrections need. Queries never allocate; results land in internally
//! owned buffers exposed through [`TimeInterp::result`] and
//! [`TimeInterp::rflag`].
//!
//! Query semantics:
//!
//! - the last query is memoized: asking for the same time again recomputes
//!   nothing and returns `false`;
//! - a query matching a row's timestamp exactly takes that row's values and
//!   flags verbatim, whatever the interpolation method;
//! - a query outside the time domain clamps to the boundary row (flat
//!   extrapolation) rather than extending the curve;
//! - anything else goes to the interpolation kernel, and the result flags
//!   are the element-wise OR of every sample the kernel read.

mod error;
pub(crate) mod kernel;

pub use error::InterpError;
pub use kernel::InterpMethod;

use std::f64::consts::{PI, TAU};

use hifitime::Epoch;
use log::{debug, trace};
use ndarray::prelude::*;
use vec1::Vec1;

use crate::locate::BufferedBisectionLocator;
use crate::table::SolutionRow;

/// The memo-cache key: the last query answered.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Query {
    time: Epoch,
    freq: Option<f64>,
}

/// Interpolates the solutions of one antenna/spw sub-table to arbitrary
/// query times.
#[derive(Debug)]
pub struct TimeInterp {
    /// The first timestamp. The domain is expressed relative to this so the
    /// bisection and kernels work on small offsets.
    time_ref: Epoch,

    /// The row timestamps, ascending.
    times: Vec1<Epoch>,

    /// Seconds since `time_ref`, strictly ascending.
    domain: Vec<f64>,

    /// Solution parameters with dimensions (num_params, num_chans,
    /// num_times).
    params: Array3<f64>,

    /// Flags matching `params` (true = flagged).
    flags: Array3<bool>,

    /// Accumulated 2π wrap counts per (param, chan, time); integer-valued.
    /// `params + TAU * cycles` is continuous along the time axis, which is
    /// what phase-delay corrections interpolate.
    cycles: Array3<f64>,

    method: InterpMethod,

    /// Reference frequency for phase-delay scaling \[Hz\]. Without one,
    /// frequency-dependent queries unwrap but don't scale.
    ref_freq: Option<f64>,

    locator: BufferedBisectionLocator<'static>,

    curr: Option<Query>,
    result: Array2<f64>,
    rflag: Array2<bool>,
}

impl TimeInterp {
    /// Build an interpolator over `rows`, which need not arrive time-sorted
    /// but must have unique timestamps, identical parameter/flag dimensions
    /// and at least one unflagged element.
    pub fn new(rows: &[SolutionRow], method: InterpMethod) -> Result<TimeInterp, InterpError> {
        let first = rows.first().ok_or(InterpError::NoRows)?;
        let (npar, nchan) = first.params.dim();
        for (i, row) in rows.iter().enumerate() {
            if row.params.dim() != (npar, nchan) || row.flags.dim() != (npar, nchan) {
                return Err(InterpError::ShapeMismatch { row: i });
            }
        }
        if rows.iter().all(|row| row.flags.iter().all(|&f| f)) {
            return Err(InterpError::AllFlagged);
        }

        let mut order: Vec<usize> = (0..rows.len()).collect();
        order.sort_unstable_by(|&a, &b| {
            rows[a]
                .time
                .to_gpst_seconds()
                .total_cmp(&rows[b].time.to_gpst_seconds())
        });

        let time_ref = rows[order[0]].time;
        let times = Vec1::try_from_vec(order.iter().map(|&i| rows[i].time).collect())
            .map_err(|_| InterpError::NoRows)?;

        let ntime = rows.len();
        let mut domain = vec![0.0; ntime];
        let mut params = Array3::zeros((npar, nchan, ntime));
        let mut flags = Array3::from_elem((npar, nchan, ntime), false);
        for (k, &i) in order.iter().enumerate() {
            let row = &rows[i];
            domain[k] = (row.time - time_ref).to_seconds();
            params.slice_mut(s![.., .., k]).assign(&row.params);
            flags.slice_mut(s![.., .., k]).assign(&row.flags);
        }
        for k in 1..ntime {
            if domain[k] <= domain[k - 1] {
                return Err(InterpError::DuplicateTime {
                    gpst: times[k].to_gpst_seconds(),
                });
            }
        }

        let cycles = accumulate_cycles(&params);
        let locator = BufferedBisectionLocator::from_owned(domain.clone())?;

        Ok(TimeInterp {
            time_ref,
            times,
            domain,
            params,
            flags,
            cycles,
            method,
            ref_freq: None,
            locator,
            curr: None,
            result: Array2::zeros((npar, nchan)),
            rflag: Array2::from_elem((npar, nchan), false),
        })
    }

    /// The interpolated parameters from the last query, with dimensions
    /// (num_params, num_chans).
    pub fn result(&self) -> ArrayView2<f64> {
        self.result.view()
    }

    /// The validity flags from the last query (true = invalid).
    pub fn rflag(&self) -> ArrayView2<bool> {
        self.rflag.view()
    }

    pub fn method(&self) -> InterpMethod {
        self.method
    }

    pub fn time_ref(&self) -> Epoch {
        self.time_ref
    }

    pub fn times(&self) -> &Vec1<Epoch> {
        &self.times
    }

    pub fn num_times(&self) -> usize {
        self.domain.len()
    }

    /// Switch the interpolation method. Any cached result was computed with
    /// the old kernel, so the memo cache is dropped.
    pub fn set_method(&mut self, method: InterpMethod) {
        self.method = method;
        self.curr = None;
    }

    /// Switch the interpolation method by name (e.g. "nearest", "linear",
    /// "cubic").
    pub fn set_interp_type(&mut self, name: &str) -> Result<(), InterpError> {
        let method = name.parse().map_err(|_| InterpError::UnknownInterpType {
            got: name.to_string(),
        })?;
        self.set_method(method);
        Ok(())
    }

    /// Set the reference frequency \[Hz\] used to scale phase-delay
    /// corrections. Affects frequency-dependent queries only.
    pub fn set_ref_freq(&mut self, ref_freq: Option<f64>) {
        self.ref_freq = ref_freq;
        self.curr = None;
    }

    /// Interpolate the solutions to `time`. Returns `true` if the result
    /// buffers changed, `false` if the query was answered from the memo
    /// cache; callers can use this to skip redundant downstream work.
    pub fn interpolate(&mut self, time: Epoch) -> bool {
        self.interp_inner(time, None)
    }

    /// As [`TimeInterp::interpolate`], but additionally applies a
    /// phase-delay correction for `freq` \[Hz\]: the kernel runs over
    /// unwrapped values (`value + 2π * cycles`), and if a reference
    /// frequency is set the result is scaled by `freq / ref_freq`. The
    /// output is left unwrapped so that it varies continuously across what
    /// was a 2π discontinuity in the stored values; phases are modulo 2π to
    /// downstream consumers anyway.
    pub fn interpolate_at_freq(&mut self, time: Epoch, freq: f64) -> bool {
        self.interp_inner(time, Some(freq))
    }

    fn interp_inner(&mut self, time: Epoch, freq: Option<f64>) -> bool {
        let query = Query { time, freq };
        if self.curr == Some(query) {
            trace!("Memoized result for t = {}", time.to_gpst_seconds());
            return false;
        }

        let t = (time - self.time_ref).to_seconds();
        let unwrap = freq.is_some();
        let last = self.domain.len() - 1;

        if t <= self.domain[0] {
            // At or before the first solution: flat extrapolation.
            self.select_row(0, unwrap);
        } else if t >= self.domain[last] {
            self.select_row(last, unwrap);
        } else {
            let j = self.locator.locate(t);
            debug_assert!(j >= 1 && j <= last);
            if self.domain[j] == t {
                // Exactly on a solution; no interpolation needed.
                self.select_row(j, unwrap);
            } else {
                self.blend(j, t, unwrap);
            }
        }

        if let (Some(freq), Some(ref_freq)) = (freq, self.ref_freq) {
            if ref_freq > 0.0 {
                let scale = freq / ref_freq;
                self.result.mapv_inplace(|v| v * scale);
            }
        }

        self.curr = Some(query);
        true
    }

    /// Copy row `k` into the result buffers, with its own flags.
    fn select_row(&mut self, k: usize, unwrap: bool) {
        self.result.assign(&self.params.slice(s![.., .., k]));
        if unwrap {
            self.result
                .zip_mut_with(&self.cycles.slice(s![.., .., k]), |r, &c| *r += TAU * c);
        }
        self.rflag.assign(&self.flags.slice(s![.., .., k]));
    }

    /// Run the kernel for every lane; `j` brackets `t` strictly.
    fn blend(&mut self, j: usize, t: f64, unwrap: bool) {
        let (npar, nchan, _) = self.params.dim();
        let method = self.method;
        for p in 0..npar {
            for c in 0..nchan {
                let value = if unwrap {
                    method.evaluate(
                        &self.domain,
                        |k| self.params[[p, c, k]] + TAU * self.cycles[[p, c, k]],
                        j,
                        t,
                    )
                } else {
                    method.evaluate(&self.domain, |k| self.params[[p, c, k]], j, t)
                };
                self.result[[p, c]] = value;
            }
        }

        let touched = method.samples(&self.domain, j, t);
        for p in 0..npar {
            for c in 0..nchan {
                self.rflag[[p, c]] = touched.clone().any(|k| self.flags[[p, c, k]]);
            }
        }
    }

    /// Log a diagnostic dump of this interpolator's state.
    pub fn state(&self, verbose: bool) {
        let (npar, nchan, ntime) = self.params.dim();
        debug!(
            "TimeInterp: {ntime} solutions spanning {:.3} s, {npar} params x {nchan} chans, method {}",
            self.domain[self.domain.len() - 1] - self.domain[0],
            self.method
        );
        if verbose {
            debug!(
                "  time_ref: GPST {:.3} s, ref_freq: {:?}",
                self.time_ref.to_gpst_seconds(),
                self.ref_freq
            );
            debug!("  domain (s): {:?}", self.domain);
            match &self.curr {
                Some(query) => debug!(
                    "  cached query: t = GPST {:.3} s, freq = {:?}",
                    query.time.to_gpst_seconds(),
                    query.freq
                ),
                None => debug!("  no cached result"),
            }
            trace!("  flags: {:?}", self.flags);
        }
    }
}

/// Accumulate integer 2π wrap counts along the time axis: whenever the jump
/// between adjacent samples exceeds π in magnitude, every later sample gains
/// (or loses) a cycle. Meaningful for phase-like lanes; harmless elsewhere,
/// since the counts are only consulted by frequency-dependent queries.
fn accumulate_cycles(params: &Array3<f64>) -> Array3<f64> {
    let (npar, nchan, ntime) = params.dim();
    let mut cycles = Array3::zeros((npar, nchan, ntime));
    for p in 0..npar {
        for c in 0..nchan {
            let mut acc = 0.0;
            for k in 1..ntime {
                let jump = params[[p, c, k]] - params[[p, c, k - 1]];
                if jump > PI {
                    acc -= 1.0;
                } else if jump < -PI {
                    acc += 1.0;
                }
                cycles[[p, c, k]] = acc;
            }
        }
    }
    cycles
}
