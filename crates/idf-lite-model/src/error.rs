// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for workspace and codec operations

use crate::{FieldKind, Handle, IddObjectType};
use thiserror::Error;

/// Result type alias for workspace operations
pub type Result<T> = std::result::Result<T, WorkspaceError>;

/// Errors that can occur while mutating a workspace or reading IDF text
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Value kind does not match the field descriptor
    #[error("Schema mismatch on {object_type} field {index}: expected {expected}, got {actual}")]
    SchemaMismatch {
        object_type: IddObjectType,
        index: usize,
        expected: FieldKind,
        actual: String,
    },

    /// Object type has no schema in the registry
    #[error("Unknown object type: {0}")]
    UnknownType(String),

    /// Handle does not belong to the store
    #[error("Object {0} not found")]
    ObjectNotFound(Handle),

    /// Field index beyond the schema (and no extensible group to absorb it)
    #[error("Field {index} out of range for {object_type}")]
    FieldOutOfRange {
        object_type: IddObjectType,
        index: usize,
    },

    /// Extensible group index out of range
    #[error("Extensible group {group} out of range for {object_type}")]
    GroupOutOfRange {
        object_type: IddObjectType,
        group: usize,
    },

    /// Name or text value that would not survive the IDF text form
    #[error("Invalid text in {object_type} {field}: {value:?}")]
    InvalidText {
        object_type: IddObjectType,
        field: String,
        value: String,
    },

    /// Holder does not reference the given target
    #[error("Object {holder} does not reference {target}")]
    InvalidReference { holder: Handle, target: Handle },

    /// Malformed IDF text
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkspaceError {
    /// Create a new parse error
    pub fn parse(line: usize, msg: impl Into<String>) -> Self {
        WorkspaceError::Parse {
            line,
            message: msg.into(),
        }
    }

    /// Create a new unknown type error
    pub fn unknown_type(object_type: &IddObjectType) -> Self {
        WorkspaceError::UnknownType(object_type.name().to_string())
    }

    /// Create a new invalid text error
    pub fn invalid_text(object_type: &IddObjectType, field: &str, value: &str) -> Self {
        WorkspaceError::InvalidText {
            object_type: object_type.clone(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Create a new out of range error
    pub fn out_of_range(object_type: &IddObjectType, index: usize) -> Self {
        WorkspaceError::FieldOutOfRange {
            object_type: object_type.clone(),
            index,
        }
    }
}
