// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Schema-validated object store
//!
//! Objects are kept in insertion order and indexed by type and by normalized
//! name. Every write is checked against the [`SchemaRegistry`] the store was
//! created with. Removing an object leaves references to it dangling; they
//! resolve to nothing afterwards.

use crate::naming::is_idf_text;
use crate::resource;
use idf_lite_model::{
    normalize_name, FieldDescriptor, FieldValue, Handle, IddObjectType, IdfObject, ObjectResolver,
    ObjectResolverExt, ObjectSchema, Reference, Result, SchemaRegistry, WorkspaceError,
    WorkspaceObject,
};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use std::sync::Arc;

type ObjectMap = IndexMap<Handle, WorkspaceObject, FxBuildHasher>;

/// Object store for one schema
#[derive(Clone, Debug)]
pub struct Workspace {
    schema: Arc<SchemaRegistry>,
    objects: ObjectMap,
    type_index: FxHashMap<IddObjectType, Vec<Handle>>,
    name_index: FxHashMap<(IddObjectType, String), Vec<Handle>>,
}

/// Trimmed name, `None` when blank; rejects text the IDF form cannot carry
fn check_name(object_type: &IddObjectType, name: Option<&str>) -> Result<Option<String>> {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    if !is_idf_text(name) {
        return Err(WorkspaceError::invalid_text(object_type, "Name", name));
    }
    Ok(Some(name.to_string()))
}

/// Trim text values (blank becomes null) and reject IDF delimiters in them
fn check_text(
    object_type: &IddObjectType,
    descriptor: &FieldDescriptor,
    mut value: FieldValue,
) -> Result<FieldValue> {
    if let FieldValue::String(text)
    | FieldValue::Url(text)
    | FieldValue::Reference(Reference::ByName(text)) = &mut value
    {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(FieldValue::Null);
        }
        if !is_idf_text(trimmed) {
            return Err(WorkspaceError::invalid_text(object_type, &descriptor.name, trimmed));
        }
        if trimmed.len() != text.len() {
            *text = trimmed.to_string();
        }
    }
    Ok(value)
}

impl Workspace {
    /// Create an empty store validating against `schema`
    pub fn new(schema: Arc<SchemaRegistry>) -> Self {
        Self {
            schema,
            objects: ObjectMap::default(),
            type_index: FxHashMap::default(),
            name_index: FxHashMap::default(),
        }
    }

    /// Shared handle to the registry
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Add an object from a type, optional name and leading fields
    ///
    /// Fields past the fixed fields are split into extensible groups.
    pub fn add_object(
        &mut self,
        object_type: IddObjectType,
        name: Option<&str>,
        fields: Vec<FieldValue>,
    ) -> Result<Handle> {
        self.add_idf_object(IdfObject {
            object_type,
            name: name.map(str::to_string),
            fields,
            groups: Vec::new(),
        })
    }

    /// Attach a detached object, assigning a fresh handle
    ///
    /// Missing trailing fields are padded with the schema defaults.
    pub fn add_idf_object(&mut self, object: IdfObject) -> Result<Handle> {
        let registry = Arc::clone(&self.schema);
        let schema = registry
            .schema(&object.object_type)
            .ok_or_else(|| WorkspaceError::unknown_type(&object.object_type))?;

        let name = if schema.has_name {
            check_name(&schema.object_type, object.name.as_deref())?
        } else {
            None
        };
        let (fields, groups) = self.prepare(schema, object)?;

        let handle = Handle::new();
        log::trace!("Adding {} {:?} as {}", schema.object_type, name, handle);
        self.insert(WorkspaceObject {
            handle,
            object_type: schema.object_type.clone(),
            name,
            fields,
            groups,
        });
        Ok(handle)
    }

    fn insert(&mut self, object: WorkspaceObject) {
        self.type_index
            .entry(object.object_type.clone())
            .or_default()
            .push(object.handle);
        if let Some(name) = object.name.as_deref() {
            self.name_index
                .entry((object.object_type.clone(), normalize_name(name)))
                .or_default()
                .push(object.handle);
        }
        self.objects.insert(object.handle, object);
    }

    fn unindex_name(&mut self, object_type: &IddObjectType, name: &str, handle: Handle) {
        let key = (object_type.clone(), normalize_name(name));
        if let Some(handles) = self.name_index.get_mut(&key) {
            handles.retain(|h| *h != handle);
            if handles.is_empty() {
                self.name_index.remove(&key);
            }
        }
    }

    /// Split, coerce and pad incoming values
    fn prepare(
        &self,
        schema: &ObjectSchema,
        object: IdfObject,
    ) -> Result<(Vec<FieldValue>, Vec<Vec<FieldValue>>)> {
        let fixed = schema.fields.len();
        let mut fields = Vec::with_capacity(fixed);
        let mut overflow = Vec::new();

        for (index, value) in object.fields.into_iter().enumerate() {
            if index < fixed {
                fields.push(self.check_value(schema, &schema.fields[index], index, value)?);
            } else {
                overflow.push(value);
            }
        }
        fields.extend(schema.fields[fields.len()..].iter().map(|d| d.default_value()));

        let mut raw_groups = Vec::new();
        if !overflow.is_empty() {
            let group_size = schema.group_size();
            if group_size == 0 {
                return Err(WorkspaceError::out_of_range(&schema.object_type, fixed));
            }
            raw_groups.extend(overflow.chunks(group_size).map(|c| c.to_vec()));
        }
        raw_groups.extend(object.groups);

        let groups = raw_groups
            .into_iter()
            .enumerate()
            .map(|(group, values)| self.prepare_group(schema, group, values))
            .collect::<Result<Vec<_>>>()?;

        Ok((fields, groups))
    }

    fn prepare_group(
        &self,
        schema: &ObjectSchema,
        group: usize,
        values: Vec<FieldValue>,
    ) -> Result<Vec<FieldValue>> {
        let group_size = schema.group_size();
        if group_size == 0 || values.len() > group_size {
            return Err(WorkspaceError::GroupOutOfRange {
                object_type: schema.object_type.clone(),
                group,
            });
        }
        let base = schema.fields.len() + group * group_size;
        let mut prepared = Vec::with_capacity(group_size);
        for (offset, value) in values.into_iter().enumerate() {
            prepared.push(self.check_value(schema, &schema.extensible[offset], base + offset, value)?);
        }
        prepared.extend(schema.extensible[prepared.len()..].iter().map(|d| d.default_value()));
        Ok(prepared)
    }

    /// Coerce a value to the descriptor's kind and check handle targets
    fn check_value(
        &self,
        schema: &ObjectSchema,
        descriptor: &FieldDescriptor,
        index: usize,
        value: FieldValue,
    ) -> Result<FieldValue> {
        let value = value
            .coerce(descriptor.kind)
            .map_err(|actual| WorkspaceError::SchemaMismatch {
                object_type: schema.object_type.clone(),
                index,
                expected: descriptor.kind,
                actual: actual.describe(),
            })?;
        let value = check_text(&schema.object_type, descriptor, value)?;

        if let FieldValue::Reference(Reference::ByHandle(target)) = &value {
            if let Some(obj) = self.objects.get(target) {
                if !descriptor.accepts(&obj.object_type) {
                    return Err(WorkspaceError::SchemaMismatch {
                        object_type: schema.object_type.clone(),
                        index,
                        expected: descriptor.kind,
                        actual: obj.object_type.to_string(),
                    });
                }
            }
        }
        Ok(value)
    }

    fn schema_of(&self, handle: Handle) -> Result<(&WorkspaceObject, &ObjectSchema)> {
        let object = self.get_or_err(handle)?;
        let schema = self
            .schema
            .schema(&object.object_type)
            .ok_or_else(|| WorkspaceError::unknown_type(&object.object_type))?;
        Ok((object, schema))
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn get_object(&self, handle: Handle) -> Option<&WorkspaceObject> {
        self.objects.get(&handle)
    }

    /// All objects in insertion order
    pub fn objects(&self) -> impl Iterator<Item = &WorkspaceObject> {
        self.objects.values()
    }

    pub fn handles_by_type(&self, object_type: &IddObjectType) -> Vec<Handle> {
        self.type_index.get(object_type).cloned().unwrap_or_default()
    }

    /// Field by flattened index
    pub fn get_field(&self, handle: Handle, index: usize) -> Option<&FieldValue> {
        self.objects.get(&handle).and_then(|o| o.get(index))
    }

    /// Detached snapshot of an object
    pub fn idf_object(&self, handle: Handle) -> Option<IdfObject> {
        self.objects.get(&handle).map(|o| o.to_idf_object())
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Rename an object; duplicate names are allowed, use
    /// [`Workspace::make_unique_name`] to avoid them
    pub fn set_name(&mut self, handle: Handle, name: Option<&str>) -> Result<()> {
        let (object, schema) = self.schema_of(handle)?;
        if !schema.has_name {
            return Err(WorkspaceError::out_of_range(&schema.object_type, 0));
        }
        let object_type = object.object_type.clone();
        let old = object.name.clone();
        let new = check_name(&object_type, name)?;

        if let Some(old) = old.as_deref() {
            self.unindex_name(&object_type, old, handle);
        }
        if let Some(new) = new.as_deref() {
            self.name_index
                .entry((object_type, normalize_name(new)))
                .or_default()
                .push(handle);
        }
        if let Some(object) = self.objects.get_mut(&handle) {
            object.name = new;
        }
        Ok(())
    }

    /// `base`, or `base` with the first free " N" suffix within the type
    pub fn make_unique_name(&self, object_type: &IddObjectType, base: &str) -> String {
        let base = base.trim();
        if self.object_by_name(object_type, base).is_none() {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{} {}", base, n))
            .find(|candidate| self.object_by_name(object_type, candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }

    /// Set a field by flattened index
    pub fn set_field(&mut self, handle: Handle, index: usize, value: impl Into<FieldValue>) -> Result<()> {
        let (_, schema) = self.schema_of(handle)?;
        let descriptor = schema
            .descriptor(index)
            .ok_or_else(|| WorkspaceError::out_of_range(&schema.object_type, index))?;
        let value = self.check_value(schema, descriptor, index, value.into())?;
        let object_type = schema.object_type.clone();

        let slot = self
            .objects
            .get_mut(&handle)
            .and_then(|o| o.get_mut(index))
            .ok_or_else(|| WorkspaceError::out_of_range(&object_type, index))?;
        *slot = value;
        Ok(())
    }

    /// Set a field inside an extensible group
    pub fn set_extensible_field(
        &mut self,
        handle: Handle,
        group: usize,
        offset: usize,
        value: impl Into<FieldValue>,
    ) -> Result<()> {
        let (object, schema) = self.schema_of(handle)?;
        if group >= object.num_groups() || offset >= schema.group_size() {
            return Err(WorkspaceError::GroupOutOfRange {
                object_type: schema.object_type.clone(),
                group,
            });
        }
        let index = schema.fields.len() + group * schema.group_size() + offset;
        self.set_field(handle, index, value)
    }

    pub fn num_extensible_groups(&self, handle: Handle) -> usize {
        self.objects.get(&handle).map(|o| o.num_groups()).unwrap_or(0)
    }

    /// Append an extensible group, returning its index
    pub fn push_extensible_group(&mut self, handle: Handle, values: Vec<FieldValue>) -> Result<usize> {
        let at = self.num_extensible_groups(handle);
        self.insert_extensible_group(handle, at, values)?;
        Ok(at)
    }

    /// Insert an extensible group before `at`; short groups are padded
    pub fn insert_extensible_group(
        &mut self,
        handle: Handle,
        at: usize,
        values: Vec<FieldValue>,
    ) -> Result<()> {
        let (object, schema) = self.schema_of(handle)?;
        if at > object.num_groups() {
            return Err(WorkspaceError::GroupOutOfRange {
                object_type: schema.object_type.clone(),
                group: at,
            });
        }
        let prepared = self.prepare_group(schema, at, values)?;
        if let Some(object) = self.objects.get_mut(&handle) {
            object.groups.insert(at, prepared);
        }
        Ok(())
    }

    /// Remove one extensible group, returning its values
    pub fn erase_extensible_group(&mut self, handle: Handle, at: usize) -> Result<Vec<FieldValue>> {
        let object = self
            .objects
            .get_mut(&handle)
            .ok_or(WorkspaceError::ObjectNotFound(handle))?;
        if at >= object.groups.len() {
            return Err(WorkspaceError::GroupOutOfRange {
                object_type: object.object_type.clone(),
                group: at,
            });
        }
        Ok(object.groups.remove(at))
    }

    pub fn clear_extensible_groups(&mut self, handle: Handle) -> Result<Vec<Vec<FieldValue>>> {
        let object = self
            .objects
            .get_mut(&handle)
            .ok_or(WorkspaceError::ObjectNotFound(handle))?;
        Ok(std::mem::take(&mut object.groups))
    }

    /// Remove an object; references to it are left dangling
    pub fn remove_object(&mut self, handle: Handle) -> Option<WorkspaceObject> {
        let object = self.objects.shift_remove(&handle)?;
        if let Some(handles) = self.type_index.get_mut(&object.object_type) {
            handles.retain(|h| *h != handle);
        }
        if let Some(name) = object.name.as_deref() {
            self.unindex_name(&object.object_type, name, handle);
        }
        log::trace!("Removed {} {}", object.object_type, handle);
        Some(object)
    }

    // ========================================================================
    // Cloning
    // ========================================================================

    /// Clone an object within this store
    ///
    /// Referenced resources are shared with the original; owned children are
    /// cloned and re-parented onto the copy.
    pub fn clone_object(&mut self, handle: Handle) -> Result<Handle> {
        let mut copy = self
            .idf_object(handle)
            .ok_or(WorkspaceError::ObjectNotFound(handle))?;
        if let Some(name) = copy.name.as_deref() {
            copy.name = Some(self.make_unique_name(&copy.object_type, name));
        }
        let children = self.children(handle);
        let new = self.add_idf_object(copy)?;
        for child in children {
            let child_copy = self.clone_object(child)?;
            self.reparent(child_copy, new)?;
        }
        Ok(new)
    }

    /// Deep-copy an object into another store
    ///
    /// Resources it references are reused when a structurally equal object
    /// already exists in `into`, otherwise copied. Non-resource references are
    /// written by name and resolve against `into`. Owned children are copied.
    pub fn clone_into(&self, handle: Handle, into: &mut Workspace) -> Result<Handle> {
        let mut mapping = FxHashMap::default();
        self.clone_tree(handle, into, &mut mapping)
    }

    fn clone_tree(
        &self,
        handle: Handle,
        into: &mut Workspace,
        mapping: &mut FxHashMap<Handle, Handle>,
    ) -> Result<Handle> {
        if let Some(existing) = mapping.get(&handle) {
            return Ok(*existing);
        }
        let (source, schema) = self.schema_of(handle)?;
        let mut copy = source.clone();

        let reference_indices: Vec<usize> = source.references().map(|(i, _)| i).collect();
        for index in reference_indices {
            let rewritten = match self.resolve_field(handle, index).handle() {
                Some(target) if Some(index) != schema.parent_field && self.is_resource(target) => {
                    let mapped = match mapping.get(&target) {
                        Some(mapped) => *mapped,
                        None => match resource::find_equivalent(&*into, self, target) {
                            Some(equivalent) => equivalent,
                            None => self.clone_tree(target, into, mapping)?,
                        },
                    };
                    FieldValue::from(mapped)
                }
                Some(target) => match self.get_or_err(target)?.name.as_deref() {
                    Some(name) => FieldValue::Reference(Reference::ByName(name.to_string())),
                    None => FieldValue::Null,
                },
                None => match copy.get(index) {
                    Some(FieldValue::Reference(Reference::ByName(name))) => {
                        FieldValue::Reference(Reference::ByName(name.clone()))
                    }
                    _ => FieldValue::Null,
                },
            };
            if let Some(slot) = copy.get_mut(index) {
                *slot = rewritten;
            }
        }

        let mut detached = copy.to_idf_object();
        if let Some(name) = detached.name.as_deref() {
            detached.name = Some(into.make_unique_name(&detached.object_type, name));
        }
        let new = into.add_idf_object(detached)?;
        mapping.insert(handle, new);

        for child in self.children(handle) {
            let child_copy = self.clone_tree(child, into, mapping)?;
            into.reparent(child_copy, new)?;
        }
        Ok(new)
    }

    fn is_resource(&self, handle: Handle) -> bool {
        self.objects
            .get(&handle)
            .is_some_and(|o| self.schema.is_resource_type(&o.object_type))
    }

    fn reparent(&mut self, child: Handle, parent: Handle) -> Result<()> {
        let (_, schema) = self.schema_of(child)?;
        match schema.parent_field {
            Some(index) => self.set_field(child, index, parent),
            None => Ok(()),
        }
    }
}

impl ObjectResolver for Workspace {
    fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    fn get(&self, handle: Handle) -> Option<&WorkspaceObject> {
        self.objects.get(&handle)
    }

    fn objects_by_type(&self, object_type: &IddObjectType) -> Vec<&WorkspaceObject> {
        self.type_index
            .get(object_type)
            .map(|handles| handles.iter().filter_map(|h| self.objects.get(h)).collect())
            .unwrap_or_default()
    }

    fn objects_by_name(&self, object_type: &IddObjectType, name: &str) -> Vec<&WorkspaceObject> {
        self.name_index
            .get(&(object_type.clone(), normalize_name(name)))
            .map(|handles| handles.iter().filter_map(|h| self.objects.get(h)).collect())
            .unwrap_or_default()
    }

    fn handles(&self) -> Vec<Handle> {
        self.objects.keys().copied().collect()
    }

    fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn position(&self, handle: Handle) -> Option<usize> {
        self.objects.get_index_of(&handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idf_lite_model::idd::fields;
    use idf_lite_model::{FieldKind, ReferenceResolution};

    fn model_workspace() -> Workspace {
        Workspace::new(Arc::new(SchemaRegistry::model()))
    }

    #[test]
    fn test_add_pads_defaults() {
        let mut ws = model_workspace();
        let h = ws
            .add_object(IddObjectType::OsMaterial, Some("Brick"), vec!["Rough".into()])
            .unwrap();
        let obj = ws.get_object(h).unwrap();
        assert_eq!(obj.fields.len(), 8);
        assert_eq!(obj.get_string(fields::material::ROUGHNESS), Some("Rough"));
        assert_eq!(obj.get_double(fields::material::SPECIFIC_HEAT), Some(1400.0));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let mut ws = model_workspace();
        let err = ws
            .add_object(IddObjectType::Zone, Some("Zone 1"), vec![])
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::UnknownType(_)));
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let mut ws = model_workspace();
        let h = ws.add_object(IddObjectType::OsMaterial, Some("Brick"), vec![]).unwrap();
        let err = ws
            .set_field(h, fields::material::THICKNESS, "thick")
            .unwrap_err();
        match err {
            WorkspaceError::SchemaMismatch { expected, index, .. } => {
                assert_eq!(expected, FieldKind::Double);
                assert_eq!(index, fields::material::THICKNESS);
            }
            other => panic!("unexpected error {other:?}"),
        }
        // Integers widen to reals
        ws.set_field(h, fields::material::THICKNESS, 2_i64).unwrap();
        assert_eq!(ws.get_object(h).unwrap().get_double(fields::material::THICKNESS), Some(2.0));
    }

    #[test]
    fn test_idf_delimiters_rejected_in_text() {
        let mut ws = model_workspace();
        let err = ws
            .add_object(IddObjectType::OsMaterial, Some("Brick, red"), vec![])
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::InvalidText { ref field, .. } if field == "Name"));
        assert!(ws.is_empty());

        let h = ws.add_object(IddObjectType::OsMaterial, Some("Brick"), vec![]).unwrap();
        assert!(ws.set_name(h, Some("Brick;")).is_err());
        assert!(ws.set_name(h, Some("two\nlines")).is_err());
        assert_eq!(ws.get_object(h).unwrap().name_str(), "Brick");

        let err = ws
            .set_field(h, fields::material::ROUGHNESS, "Rough !- old")
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::InvalidText { .. }));
        assert_eq!(ws.get_object(h).unwrap().get_string(fields::material::ROUGHNESS), Some("Smooth"));
    }

    #[test]
    fn test_text_values_trimmed() {
        let mut ws = model_workspace();
        let h = ws
            .add_object(IddObjectType::OsMaterial, Some("  事务所 "), vec!["  Rough ".into()])
            .unwrap();
        let obj = ws.get_object(h).unwrap();
        assert_eq!(obj.name_str(), "事务所");
        assert_eq!(obj.get_string(fields::material::ROUGHNESS), Some("Rough"));
        ws.set_field(h, fields::material::ROUGHNESS, "   ").unwrap();
        assert!(ws.get_object(h).unwrap().field(fields::material::ROUGHNESS).unwrap().is_null());
    }

    #[test]
    fn test_reference_target_type_checked() {
        let mut ws = model_workspace();
        let zone = ws.add_object(IddObjectType::OsThermalZone, Some("Zone"), vec![]).unwrap();
        let space = ws.add_object(IddObjectType::OsSpace, Some("Space"), vec![]).unwrap();
        assert!(ws.set_field(space, fields::space::SPACE_TYPE, zone).is_err());
        ws.set_field(space, fields::space::THERMAL_ZONE, zone).unwrap();
        assert_eq!(
            ws.resolve_field(space, fields::space::THERMAL_ZONE),
            ReferenceResolution::Resolved(zone)
        );
    }

    #[test]
    fn test_name_lookup_and_ambiguity() {
        let mut ws = model_workspace();
        let a = ws.add_object(IddObjectType::OsMaterial, Some("Brick"), vec![]).unwrap();
        let b = ws.add_object(IddObjectType::OsMaterial, Some("  BRICK "), vec![]).unwrap();
        assert_eq!(ws.object_by_name(&IddObjectType::OsMaterial, "brick").unwrap().handle, a);
        assert_eq!(
            ws.resolve(
                &Reference::ByName("Brick".into()),
                &[IddObjectType::OsMaterial]
            ),
            ReferenceResolution::Ambiguous(vec![a, b])
        );
        assert_eq!(ws.make_unique_name(&IddObjectType::OsMaterial, "Brick"), "Brick 1");
    }

    #[test]
    fn test_extensible_groups() {
        let mut ws = model_workspace();
        let m1 = ws.add_object(IddObjectType::OsMaterial, Some("M1"), vec![]).unwrap();
        let m2 = ws.add_object(IddObjectType::OsMaterial, Some("M2"), vec![]).unwrap();
        let c = ws.add_object(IddObjectType::OsConstruction, Some("C"), vec![]).unwrap();

        assert_eq!(ws.push_extensible_group(c, vec![m2.into()]).unwrap(), 0);
        ws.insert_extensible_group(c, 0, vec![m1.into()]).unwrap();
        assert_eq!(ws.num_extensible_groups(c), 2);
        assert_eq!(ws.resolve_field(c, 0).handle(), Some(m1));
        assert_eq!(ws.resolve_field(c, 1).handle(), Some(m2));

        let erased = ws.erase_extensible_group(c, 0).unwrap();
        assert_eq!(erased, vec![FieldValue::from(m1)]);
        assert!(ws.erase_extensible_group(c, 5).is_err());
        assert!(ws.insert_extensible_group(c, 3, vec![]).is_err());
    }

    #[test]
    fn test_overflow_fields_become_groups() {
        let mut ws = model_workspace();
        let space = ws.add_object(IddObjectType::OsSpace, Some("S"), vec![]).unwrap();
        let values: Vec<FieldValue> = vec![
            "Floor".into(),
            FieldValue::Null,
            space.into(),
            "Ground".into(),
            FieldValue::Double(0.0),
            FieldValue::Double(0.0),
            FieldValue::Double(0.0),
            FieldValue::Double(1.0),
        ];
        let surface = ws.add_object(IddObjectType::OsSurface, Some("F"), values).unwrap();
        let obj = ws.get_object(surface).unwrap();
        assert_eq!(obj.num_groups(), 2);
        // Short trailing group is padded with Null
        assert!(obj.group(1).unwrap()[1].is_null());
    }

    #[test]
    fn test_remove_leaves_dangling_reference() {
        let mut ws = model_workspace();
        let zone = ws.add_object(IddObjectType::OsThermalZone, Some("Z"), vec![]).unwrap();
        let space = ws
            .add_object(
                IddObjectType::OsSpace,
                Some("S"),
                vec![FieldValue::Null, FieldValue::Null, zone.into()],
            )
            .unwrap();
        assert!(ws.remove_object(zone).is_some());
        assert!(ws.get_field(space, fields::space::THERMAL_ZONE).unwrap().as_handle().is_some());
        assert!(ws.resolve_field(space, fields::space::THERMAL_ZONE).is_missing());
        assert!(ws.object_by_name(&IddObjectType::OsThermalZone, "Z").is_none());
    }

    #[test]
    fn test_insertion_order_survives_removal() {
        let mut ws = model_workspace();
        let a = ws.add_object(IddObjectType::OsThermalZone, Some("A"), vec![]).unwrap();
        let b = ws.add_object(IddObjectType::OsThermalZone, Some("B"), vec![]).unwrap();
        let c = ws.add_object(IddObjectType::OsThermalZone, Some("C"), vec![]).unwrap();
        ws.remove_object(b);
        let order: Vec<Handle> = ws.objects().map(|o| o.handle).collect();
        assert_eq!(order, vec![a, c]);
        assert_eq!(ws.handles_by_type(&IddObjectType::OsThermalZone), vec![a, c]);
    }

    #[test]
    fn test_clone_object_copies_children() {
        let mut ws = model_workspace();
        let space = ws.add_object(IddObjectType::OsSpace, Some("Space"), vec![]).unwrap();
        let mut wall = IdfObject::new(IddObjectType::OsSurface).with_name("Wall");
        wall.set_field(fields::surface::SPACE, space);
        ws.add_idf_object(wall).unwrap();

        let copy = ws.clone_object(space).unwrap();
        assert_eq!(ws.get_object(copy).unwrap().name_str(), "Space 1");
        let copied_children = ws.children(copy);
        assert_eq!(copied_children.len(), 1);
        assert_eq!(ws.children(space).len(), 1);
        assert_eq!(ws.get_object(copied_children[0]).unwrap().name_str(), "Wall 1");
    }

    #[test]
    fn test_clone_into_reuses_equal_resources() {
        let mut source = model_workspace();
        let m = source.add_object(IddObjectType::OsMaterial, Some("Brick"), vec![]).unwrap();
        let c = source.add_object(IddObjectType::OsConstruction, Some("Wall"), vec![]).unwrap();
        source.push_extensible_group(c, vec![m.into()]).unwrap();

        let mut target = model_workspace();
        let existing = target
            .add_object(IddObjectType::OsMaterial, Some("Other Brick"), vec![])
            .unwrap();

        let copied = source.clone_into(c, &mut target).unwrap();
        assert_eq!(target.resolve_field(copied, 0).handle(), Some(existing));
        assert_eq!(target.objects_by_type(&IddObjectType::OsMaterial).len(), 1);

        // A second clone reuses the construction's layers again
        source.clone_into(c, &mut target).unwrap();
        assert_eq!(target.objects_by_type(&IddObjectType::OsMaterial).len(), 1);
        assert_eq!(target.objects_by_type(&IddObjectType::OsConstruction).len(), 2);
    }
}
