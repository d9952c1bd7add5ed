// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pieces shared by both translation directions

use crate::diagnostics::DiagnosticSink;
use idf_lite_model::{
    Diagnostic, DiagnosticKind, FieldDescriptor, FieldValue, Handle, IdfObject, ObjectResolver,
    ObjectSchema, ReferenceResolution, UnitConverter, WorkspaceObject,
};

/// What a handler made of one source object
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Translated {
    /// Emitted as this output object
    Object(Handle),
    /// Legitimately has no output object of its own
    NoCounterpart,
    /// Left out of the output; a diagnostic says why
    Dropped,
}

impl Translated {
    pub fn handle(&self) -> Option<Handle> {
        match self {
            Translated::Object(h) => Some(*h),
            _ => None,
        }
    }
}

/// State of one reference field in the source
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Link {
    /// Field left empty
    Unset,
    /// Resolves to this object
    Found(Handle),
    /// Holds a value that resolves to nothing
    Broken,
}

/// Display name of a field for messages
pub(crate) fn field_name(store: &dyn ObjectResolver, object: &WorkspaceObject, index: usize) -> String {
    store
        .schema()
        .schema(&object.object_type)
        .and_then(|s| s.descriptor(index))
        .map(|d| d.name.clone())
        .unwrap_or_else(|| format!("field {}", index))
}

/// Resolve a reference field; ambiguity picks the first candidate in store
/// order and records a warning
pub(crate) fn resolve_link(
    store: &dyn ObjectResolver,
    object: &WorkspaceObject,
    index: usize,
    sink: &mut DiagnosticSink,
) -> Link {
    match object.get(index) {
        None => return Link::Unset,
        Some(value) if value.is_null() => return Link::Unset,
        Some(_) => {}
    }
    match store.resolve_field(object.handle, index) {
        ReferenceResolution::Resolved(target) => Link::Found(target),
        ReferenceResolution::Ambiguous(candidates) => {
            sink.push(
                Diagnostic::warning(
                    DiagnosticKind::AmbiguousReference,
                    format!(
                        "'{}' of '{}' matches {} objects, using the first",
                        field_name(store, object, index),
                        object.name_str(),
                        candidates.len()
                    ),
                )
                .for_object(object.handle, &object.object_type),
            );
            candidates.first().map_or(Link::Broken, |first| Link::Found(*first))
        }
        ReferenceResolution::Missing => Link::Broken,
    }
}

/// Broken-reference error on the dependent object
pub(crate) fn broken_reference(object: &WorkspaceObject, what: &str) -> Diagnostic {
    Diagnostic::error(
        DiagnosticKind::BrokenReference,
        format!("'{}' dropped: {}", object.name_str(), what),
    )
    .for_object(object.handle, &object.object_type)
}

/// Carry a value across schemas, converting reals between declared units
///
/// Values whose units cannot be converted pass through unchanged.
pub(crate) fn convert_value(
    units: &dyn UnitConverter,
    value: &FieldValue,
    from: &FieldDescriptor,
    to: &FieldDescriptor,
) -> FieldValue {
    let (Some(x), Some(from_unit), Some(to_unit)) = (value.as_double(), from.unit.as_deref(), to.unit.as_deref())
    else {
        return value.clone();
    };
    if from_unit == to_unit {
        return value.clone();
    }
    match units.convert(x, from_unit, to_unit) {
        Some(converted) => FieldValue::Double(converted),
        None => {
            log::warn!("No conversion from {} to {} for '{}'", from_unit, to_unit, from.name);
            value.clone()
        }
    }
}

/// Copy fixed fields by (source index, target index) pairs
pub(crate) fn copy_fields(
    units: &dyn UnitConverter,
    source: &WorkspaceObject,
    source_schema: &ObjectSchema,
    target: &mut IdfObject,
    target_schema: &ObjectSchema,
    pairs: &[(usize, usize)],
) {
    for &(from, to) in pairs {
        let (Some(value), Some(from_desc), Some(to_desc)) = (
            source.field(from),
            source_schema.fields.get(from),
            target_schema.fields.get(to),
        ) else {
            continue;
        };
        if !value.is_null() {
            target.set_field(to, convert_value(units, value, from_desc, to_desc));
        }
    }
}

/// Copy every field of two identically laid out types
pub(crate) fn copy_all_fields(
    units: &dyn UnitConverter,
    source: &WorkspaceObject,
    source_schema: &ObjectSchema,
    target: &mut IdfObject,
    target_schema: &ObjectSchema,
) {
    let count = source_schema.fields.len().min(target_schema.fields.len());
    let pairs: Vec<(usize, usize)> = (0..count).map(|i| (i, i)).collect();
    copy_fields(units, source, source_schema, target, target_schema, &pairs);
}

/// Copy extensible groups of literal values (vertices and the like)
pub(crate) fn copy_value_groups(
    units: &dyn UnitConverter,
    source: &WorkspaceObject,
    source_schema: &ObjectSchema,
    target: &mut IdfObject,
    target_schema: &ObjectSchema,
) {
    for group in &source.groups {
        let converted = group
            .iter()
            .zip(source_schema.extensible.iter().zip(&target_schema.extensible))
            .map(|(value, (from, to))| convert_value(units, value, from, to))
            .collect();
        target.groups.push(converted);
    }
}
