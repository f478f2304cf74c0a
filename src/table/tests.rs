// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;

use super::*;

fn test_row(time_s: f64, antenna1: u32, spw: u32, value: f64) -> SolutionRow {
    SolutionRow {
        time: Epoch::from_gpst_seconds(time_s),
        antenna1,
        spw,
        field: 0,
        obs: 0,
        params: Array2::from_elem((1, 1), value),
        flags: Array2::from_elem((1, 1), false),
    }
}

#[test]
fn test_resolve_column_names() {
    assert_eq!(ColumnKey::resolve("TIME").unwrap(), ColumnKey::Time);
    assert_eq!(ColumnKey::resolve("ANTENNA1").unwrap(), ColumnKey::Antenna1);
    assert_eq!(
        ColumnKey::resolve("SPECTRAL_WINDOW_ID").unwrap(),
        ColumnKey::SpectralWindow
    );
    assert_eq!(ColumnKey::resolve("FIELD_ID").unwrap(), ColumnKey::Field);
    assert_eq!(
        ColumnKey::resolve("OBSERVATION_ID").unwrap(),
        ColumnKey::Observation
    );

    let err = ColumnKey::resolve("CAL_DESC_ID").unwrap_err();
    assert!(matches!(&err, TableError::UnknownColumn { name } if name == "CAL_DESC_ID"));
    // The error message should tell the caller what *is* resolvable.
    assert!(err.to_string().contains("ANTENNA1"));
}

#[test]
fn test_shape_validation() {
    let good = vec![test_row(1.0, 0, 0, 1.0), test_row(2.0, 0, 0, 2.0)];
    assert!(SolutionTable::new(good).is_ok());

    let mut bad_row = test_row(3.0, 0, 0, 3.0);
    bad_row.params = Array2::zeros((2, 4));
    bad_row.flags = Array2::from_elem((2, 4), false);
    let bad = vec![test_row(1.0, 0, 0, 1.0), bad_row];
    assert!(matches!(
        SolutionTable::new(bad),
        Err(TableError::ShapeMismatch { row: 1, .. })
    ));

    // Flags must match params too.
    let mut bad_flags = test_row(3.0, 0, 0, 3.0);
    bad_flags.flags = Array2::from_elem((1, 2), false);
    assert!(matches!(
        SolutionTable::new(vec![bad_flags]),
        Err(TableError::ShapeMismatch { row: 0, .. })
    ));
}

#[test]
fn test_sort_groups_rows() {
    // Rows arrive time-ordered but interleaved in antenna and spw.
    let rows = vec![
        test_row(1.0, 1, 0, 0.0),
        test_row(1.0, 0, 1, 1.0),
        test_row(2.0, 0, 0, 2.0),
        test_row(2.0, 1, 1, 3.0),
        test_row(3.0, 1, 0, 4.0),
        test_row(3.0, 0, 0, 5.0),
    ];
    let mut table = SolutionTable::new(rows.clone()).unwrap();
    let keys = table
        .sort(
            &["ANTENNA1", "SPECTRAL_WINDOW_ID"],
            SortOrder::Ascending,
            SortOption::Stable,
        )
        .unwrap();
    assert_eq!(keys, [ColumnKey::Antenna1, ColumnKey::SpectralWindow]);

    // Non-decreasing (antenna1, spw) tuples.
    for pair in table.rows().windows(2) {
        assert!((pair[0].antenna1, pair[0].spw) <= (pair[1].antenna1, pair[1].spw));
    }
    // The sort is stable, so times remain ascending within each group.
    for pair in table.rows().windows(2) {
        if (pair[0].antenna1, pair[0].spw) == (pair[1].antenna1, pair[1].spw) {
            assert!(pair[0].time < pair[1].time);
        }
    }
    // Sorting must not gain or lose rows.
    let mut sorted_values: Vec<f64> = table.rows().iter().map(|r| r.params[[0, 0]]).collect();
    sorted_values.sort_by(f64::total_cmp);
    assert_eq!(sorted_values, [0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);

    // Descending reverses the keyed order.
    table.sort_by_keys(
        &[ColumnKey::Antenna1, ColumnKey::SpectralWindow],
        SortOrder::Descending,
        SortOption::Stable,
    );
    for pair in table.rows().windows(2) {
        assert!((pair[0].antenna1, pair[0].spw) >= (pair[1].antenna1, pair[1].spw));
    }
}

#[test]
fn test_sort_option_does_not_change_keyed_order() {
    let rows: Vec<SolutionRow> = (0..20)
        .map(|i| test_row(i as f64, (i * 7 % 5) as u32, (i % 3) as u32, i as f64))
        .collect();

    let mut stable = SolutionTable::new(rows.clone()).unwrap();
    stable.sort_by_keys(
        &[ColumnKey::Antenna1, ColumnKey::SpectralWindow],
        SortOrder::Ascending,
        SortOption::Stable,
    );
    let mut unstable = SolutionTable::new(rows).unwrap();
    unstable.sort_by_keys(
        &[ColumnKey::Antenna1, ColumnKey::SpectralWindow],
        SortOrder::Ascending,
        SortOption::Unstable,
    );

    for (a, b) in stable.rows().iter().zip(unstable.rows().iter()) {
        assert_eq!((a.antenna1, a.spw), (b.antenna1, b.spw));
    }
}

#[test]
fn test_sort_by_time() {
    let rows = vec![
        test_row(3.0, 0, 0, 3.0),
        test_row(1.0, 0, 0, 1.0),
        test_row(2.0, 0, 0, 2.0),
    ];
    let mut table = SolutionTable::new(rows).unwrap();
    table
        .sort(&["TIME"], SortOrder::Ascending, SortOption::Unstable)
        .unwrap();
    let times: Vec<f64> = table
        .rows()
        .iter()
        .map(|r| r.time.to_gpst_seconds())
        .collect();
    assert_eq!(times, [1.0, 2.0, 3.0]);
}

#[test]
fn test_amp_phase_params() {
    use crate::c64;

    let gains = ndarray::arr2(&[
        [c64::new(3.0, 4.0), c64::new(0.0, 2.0)],
        [c64::new(-1.0, 0.0), c64::new(1.0, 1.0)],
    ]);
    let lanes = amp_phase_params(gains.view());
    assert_eq!(lanes.dim(), (4, 2));

    // Lane 0/1: amplitude/phase of input lane 0.
    assert_abs_diff_eq!(lanes[[0, 0]], 5.0);
    assert_abs_diff_eq!(lanes[[1, 0]], (4.0f64 / 3.0).atan(), epsilon = 1e-12);
    assert_abs_diff_eq!(lanes[[0, 1]], 2.0);
    assert_abs_diff_eq!(lanes[[1, 1]], std::f64::consts::FRAC_PI_2);
    // Lane 2/3: amplitude/phase of input lane 1.
    assert_abs_diff_eq!(lanes[[2, 0]], 1.0);
    assert_abs_diff_eq!(lanes[[3, 0]], std::f64::consts::PI, epsilon = 1e-12);
    assert_abs_diff_eq!(lanes[[2, 1]], std::f64::consts::SQRT_2, epsilon = 1e-12);
    assert_abs_diff_eq!(lanes[[3, 1]], std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
}
