// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object records
//!
//! [`WorkspaceObject`] is an object owned by a store and carries a handle.
//! [`IdfObject`] is the detached form used for construction, cloning and text
//! I/O; it acquires a handle when added to a store.

use crate::{FieldValue, Handle, IddObjectType, Reference};

/// Normalize a name for lookup: trimmed, whitespace-collapsed, lowercase
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Detached object, not yet owned by a store
#[derive(Clone, Debug, PartialEq, Default)]
pub struct IdfObject {
    pub object_type: IddObjectType,
    pub name: Option<String>,
    /// Fixed fields; trailing fields may be omitted and are padded with defaults
    pub fields: Vec<FieldValue>,
    pub groups: Vec<Vec<FieldValue>>,
}

impl IdfObject {
    pub fn new(object_type: IddObjectType) -> Self {
        Self {
            object_type,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Append the next fixed field
    pub fn with_field(mut self, value: impl Into<FieldValue>) -> Self {
        self.fields.push(value.into());
        self
    }

    /// Set a fixed field, growing the field list with Null as needed
    pub fn set_field(&mut self, index: usize, value: impl Into<FieldValue>) {
        if self.fields.len() <= index {
            self.fields.resize(index + 1, FieldValue::Null);
        }
        self.fields[index] = value.into();
    }

    pub fn with_group(mut self, group: Vec<FieldValue>) -> Self {
        self.groups.push(group);
        self
    }
}

/// Object owned by a store
///
/// Fields are addressed either directly or by flattened index: fixed fields
/// first, then extensible groups back to back.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkspaceObject {
    pub handle: Handle,
    pub object_type: IddObjectType,
    pub name: Option<String>,
    pub fields: Vec<FieldValue>,
    pub groups: Vec<Vec<FieldValue>>,
}

impl WorkspaceObject {
    /// Name, or empty string when unnamed
    pub fn name_str(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Get a fixed field
    pub fn field(&self, index: usize) -> Option<&FieldValue> {
        self.fields.get(index)
    }

    /// Get a field by flattened index
    pub fn get(&self, index: usize) -> Option<&FieldValue> {
        if index < self.fields.len() {
            return self.fields.get(index);
        }
        let group_size = self.groups.first().map(|g| g.len()).unwrap_or(0);
        if group_size == 0 {
            return None;
        }
        let offset = index - self.fields.len();
        self.groups
            .get(offset / group_size)
            .and_then(|g| g.get(offset % group_size))
    }

    /// Mutable access by flattened index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut FieldValue> {
        let fixed = self.fields.len();
        if index < fixed {
            return self.fields.get_mut(index);
        }
        let group_size = self.groups.first().map(|g| g.len()).unwrap_or(0);
        if group_size == 0 {
            return None;
        }
        let offset = index - fixed;
        self.groups
            .get_mut(offset / group_size)
            .and_then(|g| g.get_mut(offset % group_size))
    }

    /// Get a real field
    pub fn get_double(&self, index: usize) -> Option<f64> {
        self.field(index).and_then(|v| v.as_double())
    }

    /// Get an integer field
    pub fn get_int(&self, index: usize) -> Option<i64> {
        self.field(index).and_then(|v| v.as_int())
    }

    /// Get an alpha field
    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.field(index).and_then(|v| v.as_str())
    }

    /// Get a reference field
    pub fn get_reference(&self, index: usize) -> Option<&Reference> {
        self.field(index).and_then(|v| v.as_reference())
    }

    /// Get one extensible group
    pub fn group(&self, index: usize) -> Option<&[FieldValue]> {
        self.groups.get(index).map(|g| g.as_slice())
    }

    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Total field count including extensible groups
    pub fn num_fields(&self) -> usize {
        self.fields.len() + self.groups.iter().map(|g| g.len()).sum::<usize>()
    }

    /// All values in flattened order
    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.fields.iter().chain(self.groups.iter().flatten())
    }

    /// Reference values with their flattened index
    pub fn references(&self) -> impl Iterator<Item = (usize, &Reference)> {
        self.values()
            .enumerate()
            .filter_map(|(i, v)| v.as_reference().map(|r| (i, r)))
    }

    /// Detached copy (handle dropped)
    pub fn to_idf_object(&self) -> IdfObject {
        IdfObject {
            object_type: self.object_type.clone(),
            name: self.name.clone(),
            fields: self.fields.clone(),
            groups: self.groups.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> WorkspaceObject {
        WorkspaceObject {
            handle: Handle::new(),
            object_type: IddObjectType::OsSurface,
            name: Some("Wall 1".into()),
            fields: vec![
                "Wall".into(),
                FieldValue::Null,
                FieldValue::Reference(Reference::ByName("Space 1".into())),
            ],
            groups: vec![
                vec![FieldValue::Double(0.0), FieldValue::Double(0.0), FieldValue::Double(3.0)],
                vec![FieldValue::Double(1.0), FieldValue::Double(0.0), FieldValue::Double(3.0)],
            ],
        }
    }

    #[test]
    fn test_flattened_access() {
        let obj = surface();
        assert_eq!(obj.get(0).and_then(|v| v.as_str()), Some("Wall"));
        assert_eq!(obj.get(5).and_then(|v| v.as_double()), Some(3.0));
        assert_eq!(obj.get(6).and_then(|v| v.as_double()), Some(1.0));
        assert!(obj.get(9).is_none());
        assert_eq!(obj.num_fields(), 9);
        assert_eq!(obj.references().count(), 1);
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Brick   Wall "), "brick wall");
        assert_eq!(normalize_name("BRICK\tWALL"), "brick wall");
    }

    #[test]
    fn test_set_field_grows() {
        let mut obj = IdfObject::new(IddObjectType::OsSite).with_name("Site");
        obj.set_field(4, "City");
        assert_eq!(obj.fields.len(), 5);
        assert!(obj.fields[0].is_null());
    }
}
