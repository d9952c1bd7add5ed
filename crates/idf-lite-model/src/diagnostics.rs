// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recoverable findings reported by the codec and the translators

use crate::{Handle, IddObjectType};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// Category of a diagnostic
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Type name absent from the registry
    UnknownType,
    /// Known type with no translation handler
    UntranslatableType,
    /// Reference that resolves to nothing, or to an object that was dropped
    BrokenReference,
    /// Name reference matching several objects
    AmbiguousReference,
    /// Output name could not be made unique
    NameCollision,
    /// Object whose owner is unset, so it has no place in the output
    OrphanObject,
    /// Run stopped by the cancel flag
    Cancelled,
}

/// One recoverable finding, optionally tied to an object
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub handle: Option<Handle>,
    pub object_type: Option<IddObjectType>,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            handle: None,
            object_type: None,
            message: message.into(),
        }
    }

    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            ..Self::warning(kind, message)
        }
    }

    /// Attach the object the finding is about
    pub fn for_object(mut self, handle: Handle, object_type: &IddObjectType) -> Self {
        self.handle = Some(handle);
        self.object_type = Some(object_type.clone());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Emit through the `log` facade at the matching level
    pub fn log(&self) {
        match self.severity {
            Severity::Warning => log::warn!("{}", self),
            Severity::Error => log::error!("{}", self),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.object_type {
            Some(ty) => write!(f, "[{:?}] {}: {}", self.kind, ty, self.message),
            None => write!(f, "[{:?}] {}", self.kind, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_builders() {
        let handle = Handle::new();
        let d = Diagnostic::error(DiagnosticKind::BrokenReference, "dangling layer")
            .for_object(handle, &IddObjectType::OsConstruction);
        assert!(d.is_error());
        assert_eq!(d.handle, Some(handle));
        assert_eq!(
            d.to_string(),
            "[BrokenReference] OS:Construction: dangling layer"
        );
        assert!(!Diagnostic::warning(DiagnosticKind::OrphanObject, "x").is_error());
    }
}
