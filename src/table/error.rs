// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("'{name}' is not a known indexing column; known columns are: {known}", known = &**crate::table::KNOWN_COLUMNS)]
    UnknownColumn { name: String },

    #[error("Row {row} has parameter/flag dimensions {params:?}/{flags:?}; expected {expected:?} like the first row")]
    ShapeMismatch {
        row: usize,
        expected: (usize, usize),
        params: (usize, usize),
        flags: (usize, usize),
    },
}
