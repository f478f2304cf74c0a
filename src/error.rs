// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all caltime-related errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaltimeError {
    #[error("{0}")]
    Locate(#[from] crate::locate::LocateError),

    #[error("{0}")]
    Table(#[from] crate::table::TableError),

    #[error("{0}")]
    Iter(#[from] crate::iterate::IterError),

    #[error("{0}")]
    Interp(#[from] crate::interp::InterpError),
}
