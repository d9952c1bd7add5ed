// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IDF-Lite Workspace - Object store and IDF text codec
//!
//! Implements the `idf-lite-model` traits over a schema-validated, insertion
//! ordered object store, together with the resource sharing engine, output
//! name mangling and an IDF reader/writer.
//!
//! # Example
//!
//! ```ignore
//! use idf_lite_model::{IddObjectType, SchemaRegistry};
//! use idf_lite_workspace::Workspace;
//! use std::sync::Arc;
//!
//! let (ws, diagnostics) = Workspace::from_idf(text, Arc::new(SchemaRegistry::energyplus()))?;
//! for material in ws.handles_by_type(&IddObjectType::Material) {
//!     println!("{} holders", ws.inbound_reference_count(material));
//! }
//! let text = ws.to_idf_string();
//! ```

pub mod decoder;
pub mod idf_file;
pub mod naming;
pub mod resource;
pub mod scanner;
pub mod serializer;
pub mod tokenizer;
pub mod workspace;

pub use idf_file::IdfFile;
pub use naming::{is_idf_text, mangle_name, sanitize_name, NameClaim, NameRegistry};
pub use resource::{direct_users, find_equivalent, structurally_equal, InboundEdge};
pub use scanner::{ObjectScanner, RawObject};
pub use workspace::Workspace;

// Re-export the shared types for convenience
pub use idf_lite_model;
