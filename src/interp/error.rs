// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InterpError {
    #[error("No solution rows were supplied; an empty sub-table can't be interpolated")]
    NoRows,

    #[error("Every supplied solution element is flagged; there is nothing to interpolate")]
    AllFlagged,

    #[error("Duplicate solution timestamp at GPST {gpst} s; timestamps must be unique within a sub-table")]
    DuplicateTime { gpst: f64 },

    #[error("Row {row} has parameter/flag dimensions different to the first row's")]
    ShapeMismatch { row: usize },

    #[error("'{got}' is not a known interpolation method; known methods are: {known}", known = &**crate::interp::kernel::INTERP_METHODS)]
    UnknownInterpType { got: String },

    #[error(transparent)]
    Locate(#[from] crate::locate::LocateError),
}
