// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Bisection search over sorted, duplicate-free sequences.
//!
//! [`Locator`] answers "where would `x` land in this sequence?" with
//! `partition_point` semantics: for ascending data, `locate(x)` is the
//! smallest `j` such that `x[j - 1] < x <= x[j]` (the mirror image for
//! descending data). `0` means at-or-before the first element and `n` means
//! beyond the last; callers decide the extrapolation policy for both.
//!
//! [`BufferedBisectionLocator`] caches the last returned index. When queries
//! sweep monotonically through the sequence (the usual access pattern when
//! applying calibration in time order) almost every call is answered in O(1)
//! from the cached bracket; anything else falls back to a full bisection.

mod error;

pub use error::LocateError;

use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Ascending,
    Descending,
}

/// Bisection search over a strictly-monotonic sequence. The direction is
/// detected from the endpoints at construction.
#[derive(Debug, Clone)]
pub struct Locator<'a> {
    values: Cow<'a, [f64]>,
    direction: Direction,
}

impl<'a> Locator<'a> {
    /// Create a locator borrowing `values`, which must be strictly monotonic
    /// (ascending or descending; sequences shorter than 2 are degenerate but
    /// allowed). The caller must keep the buffer alive and unmutated for the
    /// locator's lifetime; to copy into internally owned storage instead,
    /// use [`Locator::from_owned`].
    pub fn new(values: &'a [f64]) -> Result<Locator<'a>, LocateError> {
        let direction = detect_direction(values)?;
        Ok(Locator {
            values: Cow::Borrowed(values),
            direction,
        })
    }

    /// Create a locator that owns its storage.
    pub fn from_owned(values: Vec<f64>) -> Result<Locator<'static>, LocateError> {
        let direction = detect_direction(&values)?;
        Ok(Locator {
            values: Cow::Owned(values),
            direction,
        })
    }

    /// Install a new sequence to search, replacing the current one.
    pub fn set(&mut self, values: &'a [f64]) -> Result<(), LocateError> {
        *self = Locator::new(values)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_ascending(&self) -> bool {
        self.direction == Direction::Ascending
    }

    /// Find the smallest `j` such that `x[j - 1] < x <= x[j]` for ascending
    /// data (`x[j - 1] > x >= x[j]` for descending data). Equivalently, the
    /// number of elements ordered strictly before `x`. `0` and `len()` signal
    /// at-or-before-first and beyond-last respectively.
    pub fn locate(&self, x: f64) -> usize {
        self.bisection(x, 0, self.values.len())
    }

    /// Classic bisection restricted to the index range `[left, right)`. The
    /// caller must know that the answer lies within the range; `locate` uses
    /// the full range.
    pub(crate) fn bisection(&self, x: f64, left: usize, right: usize) -> usize {
        let sub = &self.values[left..right];
        let i = match self.direction {
            Direction::Ascending => sub.partition_point(|&v| v < x),
            Direction::Descending => sub.partition_point(|&v| v > x),
        };
        left + i
    }

    /// Would a full bisection for `x` return `j`? i.e. does `j` bracket `x`.
    fn brackets(&self, x: f64, j: usize) -> bool {
        let v = &self.values;
        let n = v.len();
        if j > n {
            return false;
        }
        match self.direction {
            Direction::Ascending => (j == 0 || v[j - 1] < x) && (j == n || x <= v[j]),
            Direction::Descending => (j == 0 || v[j - 1] > x) && (j == n || x >= v[j]),
        }
    }
}

/// A [`Locator`] that remembers where the last query landed.
///
/// Each call first checks whether `x` still falls in the previously returned
/// bracket, then probes the brackets immediately either side of it, and only
/// then falls back to a full bisection. The result is identical to
/// [`Locator::locate`] for every input, regardless of call history; only the
/// cost changes.
#[derive(Debug, Clone)]
pub struct BufferedBisectionLocator<'a> {
    inner: Locator<'a>,
    prev: usize,
}

impl<'a> BufferedBisectionLocator<'a> {
    pub fn new(values: &'a [f64]) -> Result<BufferedBisectionLocator<'a>, LocateError> {
        Ok(BufferedBisectionLocator {
            inner: Locator::new(values)?,
            prev: 0,
        })
    }

    pub fn from_owned(values: Vec<f64>) -> Result<BufferedBisectionLocator<'static>, LocateError> {
        Ok(BufferedBisectionLocator {
            inner: Locator::from_owned(values)?,
            prev: 0,
        })
    }

    /// Install a new sequence to search. The cached bracket is reset.
    pub fn set(&mut self, values: &'a [f64]) -> Result<(), LocateError> {
        self.inner.set(values)?;
        self.prev = 0;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_ascending(&self) -> bool {
        self.inner.is_ascending()
    }

    /// As [`Locator::locate`], but amortized O(1) when consecutive queries
    /// land in the same or an adjacent bracket.
    pub fn locate(&mut self, x: f64) -> usize {
        let n = self.inner.len();
        if n == 0 {
            return 0;
        }

        if !self.inner.brackets(x, self.prev) {
            // A monotonic sweep usually advances one bracket at a time, so
            // probe the neighbours before searching everything.
            if self.prev < n && self.inner.brackets(x, self.prev + 1) {
                self.prev += 1;
            } else if self.prev > 0 && self.inner.brackets(x, self.prev - 1) {
                self.prev -= 1;
            } else {
                self.prev = self.inner.bisection(x, 0, n);
            }
        }
        self.prev
    }
}

fn detect_direction(values: &[f64]) -> Result<Direction, LocateError> {
    if values.len() < 2 {
        return Ok(Direction::Ascending);
    }

    let ascending = values[values.len() - 1] > values[0];
    let strictly_monotonic = if ascending {
        values.windows(2).all(|w| w[0] < w[1])
    } else {
        values.windows(2).all(|w| w[0] > w[1])
    };
    if !strictly_monotonic {
        return Err(LocateError::NotMonotonic);
    }

    Ok(if ascending {
        Direction::Ascending
    } else {
        Direction::Descending
    })
}
