// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IterError {
    #[error("The iterator hasn't been positioned; call origin() before sub_table()")]
    NotStarted,

    #[error("The iterator is exhausted; no sub-table is available")]
    Exhausted,

    #[error(transparent)]
    Table(#[from] crate::table::TableError),
}
