// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for translation
//!
//! Only conditions that make a whole run meaningless are errors here. Problems
//! with individual objects are reported as diagnostics instead.

use idf_lite_model::WorkspaceError;
use thiserror::Error;

/// Translation result type
pub type Result<T> = std::result::Result<T, TranslateError>;

/// Fatal translation errors
#[derive(Error, Debug)]
pub enum TranslateError {
    /// The cancel flag was raised between objects
    #[error("Translation cancelled")]
    Cancelled,

    /// A registry the run depends on has no schemas at all
    #[error("Schema registry is empty: {0}")]
    MissingSchema(&'static str),

    /// Store invariant violated while writing output
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
}

impl TranslateError {
    /// Whether the run stopped because the caller asked it to
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TranslateError::Cancelled)
    }
}
