// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A cursor over a calibration solution table partitioned into "solution
//! iterations".
//!
//! A solution iteration is a maximal run of rows sharing the same values on
//! the chosen index columns (e.g. one iteration per antenna + spectral
//! window). [`SolutionIter`] is a three-state cursor over those iterations:
//! it starts before the first group, `origin` positions it on the first one,
//! `next_group` advances until it is exhausted, and `sub_table` borrows the
//! rows of the current group. Calling `sub_table` when the cursor isn't on a
//! group is an error, never a crash.
//!
//! Grouping happens once, at construction: [`SolutionIter::with_sort`] sorts
//! the table by the named index columns (stably, so pre-existing time order
//! survives within each group) and partitions it into contiguous runs.
//! [`SolutionIter::new`] keeps the table as-is and yields it as one group.

mod error;
#[cfg(test)]
mod tests;

pub use error::IterError;

use std::cmp::Ordering;
use std::ops::Range;

use log::trace;

use crate::table::{compare_rows, ColumnKey, SolutionRow, SolutionTable, SortOption, SortOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    BeforeStart,
    OnGroup(usize),
    Exhausted,
}

/// A cursor over the solution iterations of a [`SolutionTable`].
#[derive(Debug)]
pub struct SolutionIter {
    table: SolutionTable,
    groups: Vec<Range<usize>>,
    state: CursorState,
}

impl SolutionIter {
    /// Wrap `table` as-is: no sort, and the whole table is a single solution
    /// iteration.
    pub fn new(table: SolutionTable) -> SolutionIter {
        let groups = if table.is_empty() {
            vec![]
        } else {
            vec![0..table.len()]
        };
        SolutionIter {
            table,
            groups,
            state: CursorState::BeforeStart,
        }
    }

    /// Sort `table` by the columns named in `index_names` and partition it
    /// into one solution iteration per distinct combination of their values.
    ///
    /// The sort is keyed only on the index columns, so with
    /// [`SortOption::Stable`] the rows within each group keep their incoming
    /// (typically time) order.
    pub fn with_sort(
        mut table: SolutionTable,
        index_names: &[&str],
        order: SortOrder,
        option: SortOption,
    ) -> Result<SolutionIter, IterError> {
        let keys = table.sort(index_names, order, option)?;
        let groups = partition(table.rows(), &keys);
        trace!(
            "Partitioned {} solution rows into {} iterations on {index_names:?}",
            table.len(),
            groups.len()
        );
        Ok(SolutionIter {
            table,
            groups,
            state: CursorState::BeforeStart,
        })
    }

    /// The number of solution iterations this cursor will yield.
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// (Re-)position the cursor on the first solution iteration.
    pub fn origin(&mut self) {
        self.state = if self.groups.is_empty() {
            CursorState::Exhausted
        } else {
            CursorState::OnGroup(0)
        };
    }

    /// Advance to the next solution iteration. Advancing a cursor that was
    /// never positioned starts it from the origin; advancing past the last
    /// group exhausts it, a terminal state.
    pub fn next_group(&mut self) {
        self.state = match self.state {
            CursorState::BeforeStart if !self.groups.is_empty() => CursorState::OnGroup(0),
            CursorState::OnGroup(k) if k + 1 < self.groups.len() => CursorState::OnGroup(k + 1),
            _ => CursorState::Exhausted,
        };
    }

    /// Is the cursor positioned on a solution iteration?
    pub fn more(&self) -> bool {
        matches!(self.state, CursorState::OnGroup(_))
    }

    /// Borrow the rows of the current solution iteration.
    pub fn sub_table(&self) -> Result<&[SolutionRow], IterError> {
        match self.state {
            CursorState::BeforeStart => Err(IterError::NotStarted),
            CursorState::Exhausted => Err(IterError::Exhausted),
            CursorState::OnGroup(k) => Ok(&self.table.rows()[self.groups[k].clone()]),
        }
    }
}

/// Split sorted rows into maximal runs that compare equal on `keys`.
fn partition(rows: &[SolutionRow], keys: &[ColumnKey]) -> Vec<Range<usize>> {
    if rows.is_empty() {
        return vec![];
    }
    if keys.is_empty() {
        return vec![0..rows.len()];
    }

    let mut groups = vec![];
    let mut start = 0;
    for i in 1..rows.len() {
        if compare_rows(&rows[i - 1], &rows[i], keys) != Ordering::Equal {
            groups.push(start..i);
            start = i;
        }
    }
    groups.push(start..rows.len());
    groups
}
