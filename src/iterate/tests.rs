// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use hifitime::Epoch;
use ndarray::Array2;

use super::*;

fn test_row(time_s: f64, antenna1: u32, spw: u32) -> SolutionRow {
    SolutionRow {
        time: Epoch::from_gpst_seconds(time_s),
        antenna1,
        spw,
        field: 0,
        obs: 0,
        params: Array2::from_elem((1, 1), time_s),
        flags: Array2::from_elem((1, 1), false),
    }
}

/// Rows for 2 antennas x 2 spws, 3 timestamps each, interleaved in time
/// order like a real calibration table.
fn test_table() -> SolutionTable {
    let mut rows = vec![];
    for t in 0..3 {
        for ant in 0..2 {
            for spw in 0..2 {
                rows.push(test_row(100.0 + t as f64, ant, spw));
            }
        }
    }
    SolutionTable::new(rows).unwrap()
}

#[test]
fn test_single_group_cursor() {
    let table = test_table();
    let num_rows = table.len();
    let mut iter = SolutionIter::new(table);
    assert_eq!(iter.num_groups(), 1);

    // Not yet positioned.
    assert!(!iter.more());
    assert!(matches!(iter.sub_table(), Err(IterError::NotStarted)));

    iter.origin();
    assert!(iter.more());
    assert_eq!(iter.sub_table().unwrap().len(), num_rows);

    iter.next_group();
    assert!(!iter.more());
    assert!(matches!(iter.sub_table(), Err(IterError::Exhausted)));

    // Exhaustion is terminal until the cursor is rewound.
    iter.next_group();
    assert!(!iter.more());
    iter.origin();
    assert!(iter.more());
}

#[test]
fn test_per_antenna_spw_iteration() {
    let mut iter = SolutionIter::with_sort(
        test_table(),
        &["ANTENNA1", "SPECTRAL_WINDOW_ID"],
        SortOrder::Ascending,
        SortOption::Stable,
    )
    .unwrap();
    assert_eq!(iter.num_groups(), 4);

    let mut seen = vec![];
    iter.origin();
    while iter.more() {
        let rows = iter.sub_table().unwrap();
        assert_eq!(rows.len(), 3);
        // Every row in the group shares the index-column values.
        let key = (rows[0].antenna1, rows[0].spw);
        assert!(rows.iter().all(|r| (r.antenna1, r.spw) == key));
        // The stable sort preserved time order within the group.
        assert!(rows.windows(2).all(|pair| pair[0].time < pair[1].time));
        seen.push(key);
        iter.next_group();
    }
    assert_eq!(seen, [(0, 0), (0, 1), (1, 0), (1, 1)]);
}

#[test]
fn test_descending_iteration_order() {
    let mut iter = SolutionIter::with_sort(
        test_table(),
        &["ANTENNA1", "SPECTRAL_WINDOW_ID"],
        SortOrder::Descending,
        SortOption::Stable,
    )
    .unwrap();

    let mut seen = vec![];
    iter.origin();
    while iter.more() {
        let rows = iter.sub_table().unwrap();
        seen.push((rows[0].antenna1, rows[0].spw));
        iter.next_group();
    }
    assert_eq!(seen, [(1, 1), (1, 0), (0, 1), (0, 0)]);
}

#[test]
fn test_next_group_from_before_start() {
    let mut iter = SolutionIter::with_sort(
        test_table(),
        &["ANTENNA1"],
        SortOrder::Ascending,
        SortOption::Stable,
    )
    .unwrap();
    assert_eq!(iter.num_groups(), 2);

    // Advancing an unpositioned cursor starts it from the origin.
    iter.next_group();
    assert!(iter.more());
    assert_eq!(iter.sub_table().unwrap()[0].antenna1, 0);
}

#[test]
fn test_unknown_index_column() {
    let result = SolutionIter::with_sort(
        test_table(),
        &["ANTENNA1", "CAL_DESC_ID"],
        SortOrder::Ascending,
        SortOption::Stable,
    );
    assert!(matches!(
        result,
        Err(IterError::Table(
            crate::table::TableError::UnknownColumn { .. }
        ))
    ));
}

#[test]
fn test_empty_table() {
    let mut iter = SolutionIter::new(SolutionTable::default());
    assert_eq!(iter.num_groups(), 0);
    iter.origin();
    assert!(!iter.more());
    assert!(matches!(iter.sub_table(), Err(IterError::Exhausted)));
}
