// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed building model
//!
//! A [`Model`] owns a [`Workspace`] validated against the `OS:` schemas.
//! Typed façades such as [`Construction`] or [`Surface`] are `Copy` handles
//! into that store; they hold no data of their own and compare by handle.
//! Every accessor takes the model explicitly.
//!
//! # Example
//!
//! ```ignore
//! use idf_lite_energyplus::model::{Construction, Model, StandardOpaqueMaterial};
//!
//! let mut model = Model::new();
//! let brick = StandardOpaqueMaterial::new(&mut model)?;
//! let wall = Construction::new(&mut model)?;
//! wall.set_layers(&mut model, &[brick.into()])?;
//! assert_eq!(wall.num_layers(&model), 1);
//! ```

use idf_lite_model::{
    FieldValue, Handle, IddObjectType, IdfObject, ObjectResolver, ObjectResolverExt, Result,
    SchemaRegistry, WorkspaceError, WorkspaceObject,
};
use idf_lite_workspace::Workspace;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// Declare a single-type façade
macro_rules! model_object {
    ($(#[$meta:meta])* $name:ident => $object_type:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        pub struct $name(idf_lite_model::Handle);

        impl $crate::model::ModelObject for $name {
            fn from_object(object: &idf_lite_model::WorkspaceObject) -> Option<Self> {
                (object.object_type == idf_lite_model::IddObjectType::$object_type)
                    .then_some(Self(object.handle))
            }

            fn handle(&self) -> idf_lite_model::Handle {
                self.0
            }
        }

        impl $crate::model::ConcreteModelObject for $name {
            const OBJECT_TYPE: idf_lite_model::IddObjectType =
                idf_lite_model::IddObjectType::$object_type;
        }
    };
}

mod defaults;
mod loads;
mod resources;
mod spaces;

pub use defaults::{default_construction, default_construction_sets};
pub use loads::{EnergyManagementSystemActuator, GasEquipment, GasEquipmentDefinition};
pub use resources::{
    AirGap, Construction, DefaultConstructionSet, DefaultSubSurfaceConstructions,
    DefaultSurfaceConstructions, MasslessOpaqueMaterial, Material, RenderingColor,
    StandardOpaqueMaterial,
};
pub use spaces::{Building, Site, Space, SpaceType, SubSurface, Surface, ThermalZone, Vertex};

// ============================================================================
// Façade traits
// ============================================================================

/// Typed view of one object in a [`Model`]
pub trait ModelObject: Copy + Eq + Hash + Debug {
    /// View `object` through this façade if its type fits
    fn from_object(object: &WorkspaceObject) -> Option<Self>;

    fn handle(&self) -> Handle;

    fn name(&self, model: &Model) -> Option<String> {
        model
            .workspace()
            .get_object(self.handle())
            .and_then(|o| o.name.clone())
    }

    /// Rename, returning the name actually assigned
    fn set_name(&self, model: &mut Model, name: &str) -> Result<String> {
        model.set_object_name(self.handle(), name)
    }

    fn object_type(&self, model: &Model) -> Option<IddObjectType> {
        model
            .workspace()
            .get_object(self.handle())
            .map(|o| o.object_type.clone())
    }
}

/// Façade over exactly one object type
pub trait ConcreteModelObject: ModelObject {
    const OBJECT_TYPE: IddObjectType;
}

/// Façade over a type with at most one instance per model
pub trait UniqueModelObject: ConcreteModelObject {}

// ============================================================================
// Model
// ============================================================================

/// Typed building model over a schema-validated store
#[derive(Clone, Debug)]
pub struct Model {
    workspace: Workspace,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Empty model over the built-in `OS:` schemas
    pub fn new() -> Self {
        Self::with_schema(Arc::new(SchemaRegistry::model()))
    }

    pub fn with_schema(schema: Arc<SchemaRegistry>) -> Self {
        Self {
            workspace: Workspace::new(schema),
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Direct store access; writes bypass model-level name uniqueness
    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    pub fn into_workspace(self) -> Workspace {
        self.workspace
    }

    pub fn len(&self) -> usize {
        self.workspace.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workspace.is_empty()
    }

    // ========================================================================
    // Typed lookup
    // ========================================================================

    /// Checked cast of a handle to a façade
    pub fn get<T: ModelObject>(&self, handle: Handle) -> Option<T> {
        self.workspace.get_object(handle).and_then(T::from_object)
    }

    /// Every object the façade accepts, in store order
    pub fn objects<T: ModelObject>(&self) -> Vec<T> {
        self.workspace.objects().filter_map(T::from_object).collect()
    }

    pub fn object_by_name<T: ConcreteModelObject>(&self, name: &str) -> Option<T> {
        self.workspace
            .object_by_name(&T::OBJECT_TYPE, name)
            .and_then(T::from_object)
    }

    /// The singleton of `T`, created with defaults if absent
    pub fn unique<T: UniqueModelObject>(&mut self) -> Result<T> {
        if let Some(existing) = self.optional_unique::<T>() {
            return Ok(existing);
        }
        let handle = self.create(T::OBJECT_TYPE, None)?;
        self.get(handle)
            .ok_or(WorkspaceError::ObjectNotFound(handle))
    }

    /// The singleton of `T` if one exists
    pub fn optional_unique<T: UniqueModelObject>(&self) -> Option<T> {
        self.workspace
            .objects_by_type(&T::OBJECT_TYPE)
            .into_iter()
            .next()
            .and_then(T::from_object)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create an object with schema defaults
    ///
    /// Without a name the object gets "<Type> N" with the lowest free N.
    pub(crate) fn create(&mut self, object_type: IddObjectType, name: Option<&str>) -> Result<Handle> {
        let has_name = self
            .workspace
            .registry()
            .schema(&object_type)
            .is_some_and(|s| s.has_name);
        let mut object = IdfObject::new(object_type);
        if has_name {
            let name = match name {
                Some(name) => self.workspace.make_unique_name(&object.object_type, name),
                None => self.default_name(&object.object_type),
            };
            object.name = Some(name);
        }
        self.workspace.add_idf_object(object)
    }

    fn default_name(&self, object_type: &IddObjectType) -> String {
        let base = object_type.short_name();
        (1..)
            .map(|n| format!("{} {}", base, n))
            .find(|candidate| self.workspace.object_by_name(object_type, candidate).is_none())
            .unwrap_or(base)
    }

    /// Add a detached object, reusing a structurally equal resource
    pub fn add_resource(&mut self, object: IdfObject) -> Result<Handle> {
        self.workspace.add_resource(object)
    }

    /// Rename, keeping names unique within the type
    pub(crate) fn set_object_name(&mut self, handle: Handle, name: &str) -> Result<String> {
        let object = self.workspace.get_or_err(handle)?;
        let object_type = object.object_type.clone();
        let unchanged = object
            .name
            .as_deref()
            .is_some_and(|current| current.trim() == name.trim());
        let assigned = if unchanged {
            name.trim().to_string()
        } else {
            self.workspace.make_unique_name(&object_type, name)
        };
        self.workspace.set_name(handle, Some(&assigned))?;
        Ok(assigned)
    }

    /// Remove an object and, recursively, the children it owns
    ///
    /// References held by other objects are left dangling. Returns every
    /// removed handle, parents first.
    pub fn remove(&mut self, handle: Handle) -> Vec<Handle> {
        let mut removed = Vec::new();
        let mut pending = vec![handle];
        while let Some(next) = pending.pop() {
            let children = self.workspace.children(next);
            if self.workspace.remove_object(next).is_some() {
                removed.push(next);
                pending.extend(children.into_iter().rev());
            }
        }
        removed
    }

    /// Remove unreferenced resources of a type; returns how many went
    pub fn purge_unused_resource_objects(&mut self, object_type: &IddObjectType) -> usize {
        self.workspace.purge_unused_resource_objects(object_type).len()
    }

    // ========================================================================
    // Field helpers for façades
    // ========================================================================

    pub(crate) fn double(&self, handle: Handle, index: usize) -> Option<f64> {
        self.workspace.get_field(handle, index).and_then(|v| v.as_double())
    }

    pub(crate) fn int(&self, handle: Handle, index: usize) -> Option<i64> {
        self.workspace.get_field(handle, index).and_then(|v| v.as_int())
    }

    pub(crate) fn string(&self, handle: Handle, index: usize) -> Option<String> {
        self.workspace
            .get_field(handle, index)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }

    /// Resolved target of a reference field, viewed as `T`
    pub(crate) fn target<T: ModelObject>(&self, handle: Handle, index: usize) -> Option<T> {
        self.workspace
            .resolve_field(handle, index)
            .handle()
            .and_then(|target| self.get(target))
    }

    pub(crate) fn set(&mut self, handle: Handle, index: usize, value: impl Into<FieldValue>) -> Result<()> {
        self.workspace.set_field(handle, index, value)
    }

    /// Point a reference field at `target`, or clear it
    pub(crate) fn set_target<T: ModelObject>(
        &mut self,
        handle: Handle,
        index: usize,
        target: Option<T>,
    ) -> Result<()> {
        let value = match target {
            Some(target) => FieldValue::from(target.handle()),
            None => FieldValue::Null,
        };
        self.workspace.set_field(handle, index, value)
    }

    /// Objects of `T` whose reference field `index` resolves to `target`
    pub(crate) fn referencing<T: ConcreteModelObject>(&self, index: usize, target: Handle) -> Vec<T> {
        self.workspace
            .handles_by_type(&T::OBJECT_TYPE)
            .into_iter()
            .filter(|h| self.workspace.resolve_field(*h, index).handle() == Some(target))
            .filter_map(|h| self.get(h))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names_count_up() {
        let mut model = Model::new();
        let a = StandardOpaqueMaterial::new(&mut model).unwrap();
        let b = StandardOpaqueMaterial::new(&mut model).unwrap();
        assert_eq!(a.name(&model).as_deref(), Some("Material 1"));
        assert_eq!(b.name(&model).as_deref(), Some("Material 2"));
    }

    #[test]
    fn test_set_name_stays_unique() {
        let mut model = Model::new();
        let a = StandardOpaqueMaterial::new(&mut model).unwrap();
        let b = StandardOpaqueMaterial::new(&mut model).unwrap();
        assert_eq!(a.set_name(&mut model, "Brick").unwrap(), "Brick");
        assert_eq!(b.set_name(&mut model, "brick").unwrap(), "brick 1");
        assert_eq!(a.set_name(&mut model, "Brick").unwrap(), "Brick");
        assert_eq!(model.object_by_name::<StandardOpaqueMaterial>("BRICK"), Some(a));
    }

    #[test]
    fn test_checked_cast() {
        let mut model = Model::new();
        let zone = ThermalZone::new(&mut model).unwrap();
        assert_eq!(model.get::<ThermalZone>(zone.handle()), Some(zone));
        assert!(model.get::<Space>(zone.handle()).is_none());
        assert!(model.get::<ThermalZone>(Handle::new()).is_none());
    }

    #[test]
    fn test_unique_is_get_or_create() {
        let mut model = Model::new();
        assert!(model.optional_unique::<Building>().is_none());
        let first = model.unique::<Building>().unwrap();
        let second = model.unique::<Building>().unwrap();
        assert_eq!(first, second);
        assert_eq!(model.objects::<Building>().len(), 1);
    }

    #[test]
    fn test_remove_takes_children_and_leaves_references() {
        let mut model = Model::new();
        let space = Space::new(&mut model).unwrap();
        let surface = Surface::new(&mut model, space).unwrap();
        let window = SubSurface::new(&mut model, surface).unwrap();
        let other = Space::new(&mut model).unwrap();
        let zone = ThermalZone::new(&mut model).unwrap();
        space.set_thermal_zone(&mut model, Some(zone)).unwrap();
        other.set_thermal_zone(&mut model, Some(zone)).unwrap();

        let removed = model.remove(space.handle());
        assert_eq!(removed, vec![space.handle(), surface.handle(), window.handle()]);

        let removed = model.remove(zone.handle());
        assert_eq!(removed.len(), 1);
        assert!(other.thermal_zone(&model).is_none());
        assert!(model
            .workspace()
            .get_field(other.handle(), idf_lite_model::idd::fields::space::THERMAL_ZONE)
            .is_some_and(|v| !v.is_null()));
    }
}
