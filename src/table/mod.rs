// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The calibration solution table data model.
//!
//! A [`SolutionTable`] is a bag of [`SolutionRow`]s: one row per antenna,
//! spectral window and timestamp, carrying real-valued parameter lanes and
//! matching flags. The columnar store that real tables live in is external to
//! this crate; only the operations the interpolation core needs are modelled
//! here: row iteration, shape validation, name-based column resolution and
//! keyed sorting.

mod error;
#[cfg(test)]
mod tests;

pub use error::TableError;

use std::cmp::Ordering;

use hifitime::Epoch;
use itertools::Itertools;
use lazy_static::lazy_static;
use ndarray::prelude::*;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::c64;

lazy_static! {
    pub(crate) static ref KNOWN_COLUMNS: String = ColumnKey::iter().join(", ");
}

/// The indexing columns that sorting and iteration may key on. The string
/// forms match the calibration-table column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
pub enum ColumnKey {
    #[strum(serialize = "TIME")]
    Time,

    #[strum(serialize = "ANTENNA1")]
    Antenna1,

    #[strum(serialize = "SPECTRAL_WINDOW_ID")]
    SpectralWindow,

    #[strum(serialize = "FIELD_ID")]
    Field,

    #[strum(serialize = "OBSERVATION_ID")]
    Observation,
}

impl ColumnKey {
    /// Resolve an iteration-index name to a column.
    pub fn resolve(name: &str) -> Result<ColumnKey, TableError> {
        name.parse().map_err(|_| TableError::UnknownColumn {
            name: name.to_string(),
        })
    }
}

/// The sense of a keyed sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Which sort algorithm to run. This never changes the keyed order of the
/// result, only how rows that compare equal are arranged (and how fast the
/// sort is).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    /// Rows that compare equal keep their original relative order.
    #[default]
    Stable,
    Unstable,
}

/// One calibration solution: the parameters solved for one antenna, one
/// spectral window and one timestamp.
#[derive(Debug, Clone)]
pub struct SolutionRow {
    /// The centroid timestamp of the solution interval.
    pub time: Epoch,

    /// Zero-indexed antenna number.
    pub antenna1: u32,

    /// Zero-indexed spectral window.
    pub spw: u32,

    /// Zero-indexed field ID.
    pub field: u32,

    /// Zero-indexed observation ID.
    pub obs: u32,

    /// Real-valued solution parameters with dimensions (num_params,
    /// num_chans). Complex gains are carried as amplitude and phase lanes;
    /// see [`amp_phase_params`].
    pub params: Array2<f64>,

    /// Per-element flags with the same dimensions as `params` (true =
    /// flagged/invalid).
    pub flags: Array2<bool>,
}

/// Compare two rows on the given keys, first key most significant.
pub(crate) fn compare_rows(a: &SolutionRow, b: &SolutionRow, keys: &[ColumnKey]) -> Ordering {
    keys.iter().fold(Ordering::Equal, |ord, &key| {
        ord.then_with(|| match key {
            ColumnKey::Time => a
                .time
                .to_gpst_seconds()
                .total_cmp(&b.time.to_gpst_seconds()),
            ColumnKey::Antenna1 => a.antenna1.cmp(&b.antenna1),
            ColumnKey::SpectralWindow => a.spw.cmp(&b.spw),
            ColumnKey::Field => a.field.cmp(&b.field),
            ColumnKey::Observation => a.obs.cmp(&b.obs),
        })
    })
}

/// Expand complex gains into real parameter lanes: input lane `i` becomes
/// amplitude lane `2i` and phase lane `2i + 1` \[radians\].
pub fn amp_phase_params(cparams: ArrayView2<c64>) -> Array2<f64> {
    let (npar, nchan) = cparams.dim();
    let mut out = Array2::zeros((2 * npar, nchan));
    for ((i, j), g) in cparams.indexed_iter() {
        out[[2 * i, j]] = g.norm();
        out[[2 * i + 1, j]] = g.arg();
    }
    out
}

/// A logical table of calibration solutions. All rows have the same
/// parameter/flag dimensions; this is enforced at construction.
#[derive(Debug, Clone, Default)]
pub struct SolutionTable {
    rows: Vec<SolutionRow>,
}

impl SolutionTable {
    pub fn new(rows: Vec<SolutionRow>) -> Result<SolutionTable, TableError> {
        if let Some(first) = rows.first() {
            let expected = first.params.dim();
            for (i, row) in rows.iter().enumerate() {
                if row.params.dim() != expected || row.flags.dim() != expected {
                    return Err(TableError::ShapeMismatch {
                        row: i,
                        expected,
                        params: row.params.dim(),
                        flags: row.flags.dim(),
                    });
                }
            }
        }
        Ok(SolutionTable { rows })
    }

    pub fn rows(&self) -> &[SolutionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sort the rows by the columns named in `index_names` (resolved via
    /// [`ColumnKey::resolve`]), returning the resolved keys.
    pub fn sort(
        &mut self,
        index_names: &[&str],
        order: SortOrder,
        option: SortOption,
    ) -> Result<Vec<ColumnKey>, TableError> {
        let keys = index_names
            .iter()
            .map(|name| ColumnKey::resolve(name))
            .collect::<Result<Vec<_>, _>>()?;
        self.sort_by_keys(&keys, order, option);
        Ok(keys)
    }

    pub fn sort_by_keys(&mut self, keys: &[ColumnKey], order: SortOrder, option: SortOption) {
        let compare = |a: &SolutionRow, b: &SolutionRow| {
            let ord = compare_rows(a, b, keys);
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        };
        match option {
            SortOption::Stable => self.rows.sort_by(compare),
            SortOption::Unstable => self.rows.sort_unstable_by(compare),
        }
    }
}
