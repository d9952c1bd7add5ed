// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Schema registry
//!
//! Per-type field layout: ordered descriptors for the fixed fields, an
//! optional repeating extensible group, and the object-level flags (named,
//! resource, unique, parent field) the store and translators consult.

use crate::{FieldKind, FieldValue, IddObjectType};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Descriptor for one field of an object type
///
/// The object name is not a field; indices start at the first field after it.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub index: usize,
    pub kind: FieldKind,
    pub is_extensible: bool,
    pub default: Option<FieldValue>,
    /// Canonical unit of real fields ("m", "W", "deg", ...)
    pub unit: Option<String>,
    pub required: bool,
    /// Types a reference field may point at
    pub object_list: Vec<IddObjectType>,
}

impl FieldDescriptor {
    fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            index: 0,
            kind,
            is_extensible: false,
            default: None,
            unit: None,
            required: false,
            object_list: Vec::new(),
        }
    }

    pub fn int(name: &str) -> Self {
        Self::new(name, FieldKind::Int)
    }

    pub fn double(name: &str) -> Self {
        Self::new(name, FieldKind::Double)
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn url(name: &str) -> Self {
        Self::new(name, FieldKind::Url)
    }

    pub fn reference(name: &str, targets: &[IddObjectType]) -> Self {
        let mut descriptor = Self::new(name, FieldKind::Reference);
        descriptor.object_list = targets.to_vec();
        descriptor
    }

    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Default value, or Null
    pub fn default_value(&self) -> FieldValue {
        self.default.clone().unwrap_or_default()
    }

    /// Check whether a reference through this field may land on `object_type`
    pub fn accepts(&self, object_type: &IddObjectType) -> bool {
        self.object_list.is_empty() || self.object_list.contains(object_type)
    }
}

/// Schema of one object type
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectSchema {
    pub object_type: IddObjectType,
    pub has_name: bool,
    /// Resources may be shared by many holders and are deduplicated on clone
    pub is_resource: bool,
    /// At most one instance per model
    pub is_unique: bool,
    /// Field naming the owning object, if any
    pub parent_field: Option<usize>,
    /// Namespace for translated-name uniqueness; defaults to the type name
    pub name_group: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    pub extensible: Vec<FieldDescriptor>,
}

impl ObjectSchema {
    /// Create an empty schema for a named object type
    pub fn new(object_type: IddObjectType) -> Self {
        Self {
            object_type,
            has_name: true,
            is_resource: false,
            is_unique: false,
            parent_field: None,
            name_group: None,
            fields: Vec::new(),
            extensible: Vec::new(),
        }
    }

    pub fn unnamed(mut self) -> Self {
        self.has_name = false;
        self
    }

    pub fn resource(mut self) -> Self {
        self.is_resource = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn in_name_group(mut self, group: &str) -> Self {
        self.name_group = Some(group.to_string());
        self
    }

    /// Append a fixed field
    pub fn field(mut self, mut descriptor: FieldDescriptor) -> Self {
        descriptor.index = self.fields.len();
        descriptor.is_extensible = false;
        self.fields.push(descriptor);
        self
    }

    /// Append a fixed field and mark it as the parent link
    pub fn parent(mut self, descriptor: FieldDescriptor) -> Self {
        self.parent_field = Some(self.fields.len());
        self.field(descriptor)
    }

    /// Append a field to the extensible group
    ///
    /// Extensible indices are relative to the start of the group.
    pub fn extensible_field(mut self, mut descriptor: FieldDescriptor) -> Self {
        descriptor.index = self.extensible.len();
        descriptor.is_extensible = true;
        self.extensible.push(descriptor);
        self
    }

    /// Number of values in one extensible group (0 when not extensible)
    pub fn group_size(&self) -> usize {
        self.extensible.len()
    }

    pub fn is_extensible(&self) -> bool {
        !self.extensible.is_empty()
    }

    /// Effective name group
    pub fn name_group(&self) -> &str {
        self.name_group
            .as_deref()
            .unwrap_or_else(|| self.object_type.name())
    }

    /// Find a fixed field by name (case-insensitive)
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Descriptor for a flattened field index
    ///
    /// Fixed fields come first, then the extensible groups back to back.
    pub fn descriptor(&self, index: usize) -> Option<&FieldDescriptor> {
        if index < self.fields.len() {
            return self.fields.get(index);
        }
        let group_size = self.group_size();
        if group_size == 0 {
            return None;
        }
        self.extensible.get((index - self.fields.len()) % group_size)
    }

    /// Default values for the fixed fields
    pub fn default_fields(&self) -> Vec<FieldValue> {
        self.fields.iter().map(|f| f.default_value()).collect()
    }

    /// Default values for one extensible group
    pub fn default_group(&self) -> Vec<FieldValue> {
        self.extensible.iter().map(|f| f.default_value()).collect()
    }
}

/// Registry of object schemas
///
/// Built once and shared (`Arc`) by every store created against it.
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    schemas: FxHashMap<IddObjectType, Arc<ObjectSchema>>,
    order: Vec<IddObjectType>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema (builder form)
    pub fn register(mut self, schema: ObjectSchema) -> Self {
        self.insert(schema);
        self
    }

    /// Register or replace a schema
    pub fn insert(&mut self, schema: ObjectSchema) {
        let object_type = schema.object_type.clone();
        if !self.schemas.contains_key(&object_type) {
            self.order.push(object_type.clone());
        }
        self.schemas.insert(object_type, Arc::new(schema));
    }

    pub fn schema(&self, object_type: &IddObjectType) -> Option<&ObjectSchema> {
        self.schemas.get(object_type).map(|s| s.as_ref())
    }

    pub fn contains(&self, object_type: &IddObjectType) -> bool {
        self.schemas.contains_key(object_type)
    }

    /// Fixed field descriptors; empty for unknown types
    pub fn descriptors(&self, object_type: &IddObjectType) -> &[FieldDescriptor] {
        self.schema(object_type)
            .map(|s| s.fields.as_slice())
            .unwrap_or(&[])
    }

    /// Extensible group descriptors; empty when the type is not extensible
    pub fn extensible_descriptors(&self, object_type: &IddObjectType) -> &[FieldDescriptor] {
        self.schema(object_type)
            .map(|s| s.extensible.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_resource_type(&self, object_type: &IddObjectType) -> bool {
        self.schema(object_type).is_some_and(|s| s.is_resource)
    }

    pub fn is_unique_type(&self, object_type: &IddObjectType) -> bool {
        self.schema(object_type).is_some_and(|s| s.is_unique)
    }

    /// Registered types in registration order
    pub fn types(&self) -> &[IddObjectType] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polyline() -> ObjectSchema {
        ObjectSchema::new(IddObjectType::Unknown("Test:Polyline".into()))
            .field(FieldDescriptor::string("Style").with_default("Solid"))
            .field(FieldDescriptor::double("Width").with_unit("m"))
            .extensible_field(FieldDescriptor::double("X"))
            .extensible_field(FieldDescriptor::double("Y"))
    }

    #[test]
    fn test_flattened_descriptor_lookup() {
        let schema = polyline();
        assert_eq!(schema.descriptor(0).unwrap().name, "Style");
        assert_eq!(schema.descriptor(2).unwrap().name, "X");
        assert_eq!(schema.descriptor(5).unwrap().name, "Y");
        assert!(schema.descriptor(5).unwrap().is_extensible);
        assert_eq!(schema.field_index("width"), Some(1));
        assert_eq!(schema.default_fields()[0], FieldValue::from("Solid"));
    }

    #[test]
    fn test_registry_lookups() {
        let registry = SchemaRegistry::new().register(polyline());
        let ty = IddObjectType::parse("Test:Polyline");
        assert_eq!(registry.descriptors(&ty).len(), 2);
        assert_eq!(registry.extensible_descriptors(&ty).len(), 2);
        assert!(registry.descriptors(&IddObjectType::Zone).is_empty());
        assert!(!registry.is_resource_type(&ty));
        assert_eq!(registry.types(), &[ty]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut registry = SchemaRegistry::new().register(polyline());
        registry.insert(polyline().resource());
        assert_eq!(registry.len(), 1);
        assert!(registry.is_resource_type(&IddObjectType::parse("Test:Polyline")));
    }
}
