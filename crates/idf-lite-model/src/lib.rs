// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IDF-Lite Model - Shared types, schema registry and traits for IDF workspaces
//!
//! This crate provides the core abstractions shared by the object store, the
//! text codec and the translators. It does not own any storage itself; the
//! `idf-lite-workspace` crate implements the traits defined here.
//!
//! # Architecture
//!
//! - [`SchemaRegistry`] - Per-type field layout, kinds, defaults and flags
//! - [`WorkspaceObject`] / [`IdfObject`] - Attached and detached object records
//! - [`ObjectResolver`] - Object lookup and reference resolution
//! - [`UnitConverter`] - Unit conversion between schema-declared units
//! - [`Diagnostic`] - Recoverable translation findings
//!
//! # Example
//!
//! ```ignore
//! use idf_lite_model::{IddObjectType, ObjectResolver, SchemaRegistry};
//!
//! let registry = SchemaRegistry::model();
//! let material = registry.schema(&IddObjectType::OsMaterial).unwrap();
//! assert!(material.is_resource);
//!
//! // Any store implementing ObjectResolver can resolve references
//! fn layers(store: &dyn ObjectResolver, construction: idf_lite_model::Handle) -> usize {
//!     store.get(construction).map(|c| c.num_groups()).unwrap_or(0)
//! }
//! ```

pub mod diagnostics;
pub mod error;
pub mod idd;
pub mod object;
pub mod resolver;
pub mod schema;
pub mod types;
pub mod units;

// Re-export all public types
pub use diagnostics::*;
pub use error::*;
pub use object::*;
pub use resolver::*;
pub use schema::*;
pub use types::*;
pub use units::*;
