// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IDF-Lite EnergyPlus - Typed building model and translators
//!
//! A [`Model`] wraps a workspace of `OS:` objects behind typed façades.
//! The [`ForwardTranslator`] turns a model into an EnergyPlus workspace,
//! resolving default constructions, merging spaces into zones and mangling
//! names; the [`ReverseTranslator`] goes the other way. Both report problems
//! with individual objects as diagnostics instead of failing the run.
//!
//! # Example
//!
//! ```ignore
//! use idf_lite_energyplus::model::{Construction, Model, StandardOpaqueMaterial};
//! use idf_lite_energyplus::ForwardTranslator;
//!
//! let mut model = Model::new();
//! let brick = StandardOpaqueMaterial::new(&mut model)?;
//! Construction::with_layers(&mut model, &[brick.into()])?;
//!
//! let mut translator = ForwardTranslator::with_default_handlers();
//! let translation = translator.translate_model(&model)?;
//! for error in &translation.errors {
//!     eprintln!("{}", error.message);
//! }
//! std::fs::write("in.idf", translation.output.to_idf_string())?;
//! ```

pub mod diagnostics;
pub mod error;
pub mod forward;
mod mapping;
pub mod model;
pub mod options;
pub mod reverse;

pub use diagnostics::{DiagnosticSink, Translation};
pub use error::{Result, TranslateError};
pub use forward::{ForwardContext, ForwardHandler, ForwardTranslator, ProgressCallback};
pub use mapping::{Link, Translated};
pub use model::Model;
pub use options::{ForwardTranslatorOptions, ReverseTranslatorOptions};
pub use reverse::{ReverseContext, ReverseHandler, ReverseTranslator};

// Re-export the lower layers for convenience
pub use idf_lite_model;
pub use idf_lite_workspace;
