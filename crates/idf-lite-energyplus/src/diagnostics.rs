// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Diagnostic collection for one translation run

use idf_lite_model::{Diagnostic, Severity};

/// Accumulates diagnostics in the order they were raised
#[derive(Clone, Debug, Default)]
pub struct DiagnosticSink {
    entries: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and log a diagnostic
    pub fn push(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.push(diagnostic);
        }
    }

    pub fn errors(&self) -> Vec<Diagnostic> {
        self.by_severity(Severity::Error)
    }

    pub fn warnings(&self) -> Vec<Diagnostic> {
        self.by_severity(Severity::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Split into (errors, warnings)
    pub fn into_parts(self) -> (Vec<Diagnostic>, Vec<Diagnostic>) {
        self.entries.into_iter().partition(|d| d.is_error())
    }

    fn by_severity(&self, severity: Severity) -> Vec<Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == severity)
            .cloned()
            .collect()
    }
}

/// Output of a translation run with its findings
#[derive(Clone, Debug)]
pub struct Translation<T> {
    pub output: T,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl<T> Translation<T> {
    pub fn new(output: T, sink: DiagnosticSink) -> Self {
        let (errors, warnings) = sink.into_parts();
        Self {
            output,
            errors,
            warnings,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_output(self) -> T {
        self.output
    }
}
