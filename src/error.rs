// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Corrupt transaction row {id}: {reason}")]
    CorruptRow { id: i64, reason: String },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Transaction store unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Forbidden: you don't have permission to {0}")]
    Forbidden(&'static str),

    #[error("Unknown user '{0}'")]
    UnknownUser(String),

    #[error("No user selected; pass --user <name> or run `config set default_user <name>`")]
    NoIdentity,
}
