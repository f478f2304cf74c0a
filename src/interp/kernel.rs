// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pluggable interpolation kernels over a 1-D time domain.
//!
//! A kernel evaluates one parameter/channel lane at a time. The engine hands
//! it the domain, a `sample` accessor for the lane values, the bracketing
//! index `j` from a locate() call (so `domain[j - 1] < t < domain[j]`) and
//! the query time; exact matches and out-of-domain queries never reach a
//! kernel.

use std::ops::Range;

use itertools::Itertools;
use lazy_static::lazy_static;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

lazy_static! {
    pub(crate) static ref INTERP_METHODS: String = InterpMethod::iter().join(", ");
}

/// Supported interpolation methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum InterpMethod {
    /// The value of the closer bracketing sample (the earlier one on an
    /// exact tie).
    #[strum(serialize = "nearest")]
    Nearest,

    /// The standard two-point form.
    #[strum(serialize = "linear")]
    Linear,

    /// Four-point Catmull-Rom cubic, with one-sided stencils at the domain
    /// edges. Also answers to "spline".
    #[strum(serialize = "spline", to_string = "cubic")]
    Cubic,
}

impl InterpMethod {
    /// Evaluate this method at `t` for one lane. `j` is the insertion index
    /// from a locate() call and must satisfy `1 <= j < domain.len()`.
    pub(crate) fn evaluate<F: Fn(usize) -> f64>(
        self,
        domain: &[f64],
        sample: F,
        j: usize,
        t: f64,
    ) -> f64 {
        let (t0, t1) = (domain[j - 1], domain[j]);
        match self {
            InterpMethod::Nearest => {
                if t - t0 <= t1 - t {
                    sample(j - 1)
                } else {
                    sample(j)
                }
            }
            InterpMethod::Linear => {
                let frac = (t - t0) / (t1 - t0);
                let (y0, y1) = (sample(j - 1), sample(j));
                y0 + frac * (y1 - y0)
            }
            InterpMethod::Cubic => catmull_rom(domain, &sample, j, t),
        }
    }

    /// The samples this method reads for a query bracketed at `j`; the
    /// engine ORs flags over this range. Nearest reads a single sample, so
    /// only that sample's flag matters.
    pub(crate) fn samples(self, domain: &[f64], j: usize, t: f64) -> Range<usize> {
        match self {
            InterpMethod::Nearest => {
                let chosen = if t - domain[j - 1] <= domain[j] - t {
                    j - 1
                } else {
                    j
                };
                chosen..chosen + 1
            }
            InterpMethod::Linear => (j - 1)..(j + 1),
            InterpMethod::Cubic => j.saturating_sub(2)..(j + 2).min(domain.len()),
        }
    }
}

/// Cubic Hermite through the two bracketing samples, with tangents from
/// three-point finite differences (the Catmull-Rom choice, generalized to
/// non-uniform spacing). Edge stencils fall back to one-sided differences.
fn catmull_rom<F: Fn(usize) -> f64>(domain: &[f64], sample: &F, j: usize, t: f64) -> f64 {
    let n = domain.len();
    let i0 = if j >= 2 { j - 2 } else { j - 1 };
    let i3 = if j + 1 < n { j + 1 } else { j };

    let (t1, t2) = (domain[j - 1], domain[j]);
    let h = t2 - t1;
    let u = (t - t1) / h;

    let (p0, p1, p2, p3) = (sample(i0), sample(j - 1), sample(j), sample(i3));
    // With a clamped stencil the central difference degenerates to the
    // one-sided secant; the denominator stays non-zero because the domain is
    // strictly monotonic.
    let m1 = (p2 - p0) / (t2 - domain[i0]) * h;
    let m2 = (p3 - p1) / (domain[i3] - t1) * h;

    let u2 = u * u;
    let u3 = u2 * u;
    let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
    let h10 = u3 - 2.0 * u2 + u;
    let h01 = -2.0 * u3 + 3.0 * u2;
    let h11 = u3 - u2;
    h00 * p1 + h10 * m1 + h01 * p2 + h11 * m2
}
