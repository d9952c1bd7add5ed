// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Envelope resources: materials, constructions and default sets

use super::{ConcreteModelObject, Model, ModelObject, Surface, SubSurface};
use idf_lite_model::idd::fields;
use idf_lite_model::{FieldValue, Handle, IddObjectType, Result, WorkspaceObject};

// ============================================================================
// Materials
// ============================================================================

model_object! {
    /// Opaque material with mass (`OS:Material`)
    StandardOpaqueMaterial => OsMaterial
}

model_object! {
    /// Opaque material described by its resistance only
    MasslessOpaqueMaterial => OsMaterialNoMass
}

model_object! {
    AirGap => OsMaterialAirGap
}

impl StandardOpaqueMaterial {
    pub fn new(model: &mut Model) -> Result<Self> {
        model.create(Self::OBJECT_TYPE, None).map(Self)
    }

    pub fn roughness(&self, model: &Model) -> Option<String> {
        model.string(self.0, fields::material::ROUGHNESS)
    }

    pub fn set_roughness(&self, model: &mut Model, roughness: &str) -> Result<()> {
        model.set(self.0, fields::material::ROUGHNESS, roughness)
    }

    /// Thickness in m
    pub fn thickness(&self, model: &Model) -> Option<f64> {
        model.double(self.0, fields::material::THICKNESS)
    }

    pub fn set_thickness(&self, model: &mut Model, thickness: f64) -> Result<()> {
        model.set(self.0, fields::material::THICKNESS, thickness)
    }

    /// Conductivity in W/m-K
    pub fn conductivity(&self, model: &Model) -> Option<f64> {
        model.double(self.0, fields::material::CONDUCTIVITY)
    }

    pub fn set_conductivity(&self, model: &mut Model, conductivity: f64) -> Result<()> {
        model.set(self.0, fields::material::CONDUCTIVITY, conductivity)
    }

    pub fn density(&self, model: &Model) -> Option<f64> {
        model.double(self.0, fields::material::DENSITY)
    }

    pub fn set_density(&self, model: &mut Model, density: f64) -> Result<()> {
        model.set(self.0, fields::material::DENSITY, density)
    }

    pub fn specific_heat(&self, model: &Model) -> Option<f64> {
        model.double(self.0, fields::material::SPECIFIC_HEAT)
    }

    pub fn set_specific_heat(&self, model: &mut Model, specific_heat: f64) -> Result<()> {
        model.set(self.0, fields::material::SPECIFIC_HEAT, specific_heat)
    }
}

impl MasslessOpaqueMaterial {
    pub fn new(model: &mut Model) -> Result<Self> {
        model.create(Self::OBJECT_TYPE, None).map(Self)
    }

    /// Thermal resistance in m2-K/W
    pub fn thermal_resistance(&self, model: &Model) -> Option<f64> {
        model.double(self.0, fields::material_no_mass::THERMAL_RESISTANCE)
    }

    pub fn set_thermal_resistance(&self, model: &mut Model, resistance: f64) -> Result<()> {
        model.set(self.0, fields::material_no_mass::THERMAL_RESISTANCE, resistance)
    }
}

impl AirGap {
    pub fn new(model: &mut Model) -> Result<Self> {
        model.create(Self::OBJECT_TYPE, None).map(Self)
    }

    pub fn thermal_resistance(&self, model: &Model) -> Option<f64> {
        model.double(self.0, fields::material_air_gap::THERMAL_RESISTANCE)
    }

    pub fn set_thermal_resistance(&self, model: &mut Model, resistance: f64) -> Result<()> {
        model.set(self.0, fields::material_air_gap::THERMAL_RESISTANCE, resistance)
    }
}

/// Any construction layer material
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Material {
    StandardOpaque(StandardOpaqueMaterial),
    MasslessOpaque(MasslessOpaqueMaterial),
    AirGap(AirGap),
}

impl ModelObject for Material {
    fn from_object(object: &WorkspaceObject) -> Option<Self> {
        StandardOpaqueMaterial::from_object(object)
            .map(Material::StandardOpaque)
            .or_else(|| MasslessOpaqueMaterial::from_object(object).map(Material::MasslessOpaque))
            .or_else(|| AirGap::from_object(object).map(Material::AirGap))
    }

    fn handle(&self) -> Handle {
        match self {
            Material::StandardOpaque(m) => m.handle(),
            Material::MasslessOpaque(m) => m.handle(),
            Material::AirGap(m) => m.handle(),
        }
    }
}

impl From<StandardOpaqueMaterial> for Material {
    fn from(material: StandardOpaqueMaterial) -> Self {
        Material::StandardOpaque(material)
    }
}

impl From<MasslessOpaqueMaterial> for Material {
    fn from(material: MasslessOpaqueMaterial) -> Self {
        Material::MasslessOpaque(material)
    }
}

impl From<AirGap> for Material {
    fn from(material: AirGap) -> Self {
        Material::AirGap(material)
    }
}

// ============================================================================
// Construction
// ============================================================================

model_object! {
    /// Ordered stack of material layers, outside first
    Construction => OsConstruction
}

impl Construction {
    pub fn new(model: &mut Model) -> Result<Self> {
        model.create(Self::OBJECT_TYPE, None).map(Self)
    }

    /// Construction with the given layers
    pub fn with_layers(model: &mut Model, layers: &[Material]) -> Result<Self> {
        let construction = Self::new(model)?;
        construction.set_layers(model, layers)?;
        Ok(construction)
    }

    pub fn num_layers(&self, model: &Model) -> usize {
        model.workspace().num_extensible_groups(self.0)
    }

    /// Layers whose reference resolves, outside first
    pub fn layers(&self, model: &Model) -> Vec<Material> {
        (0..self.num_layers(model))
            .filter_map(|layer| self.layer(model, layer))
            .collect()
    }

    pub fn layer(&self, model: &Model, layer: usize) -> Option<Material> {
        model.target(self.0, self.layer_index(layer))
    }

    /// Replace every layer
    pub fn set_layers(&self, model: &mut Model, layers: &[Material]) -> Result<()> {
        model.workspace_mut().clear_extensible_groups(self.0)?;
        for material in layers {
            model
                .workspace_mut()
                .push_extensible_group(self.0, vec![FieldValue::from(material.handle())])?;
        }
        Ok(())
    }

    /// Insert a layer before position `layer`
    pub fn insert_layer(&self, model: &mut Model, layer: usize, material: Material) -> Result<()> {
        model
            .workspace_mut()
            .insert_extensible_group(self.0, layer, vec![FieldValue::from(material.handle())])
    }

    /// Remove a layer, returning the material it pointed at
    pub fn erase_layer(&self, model: &mut Model, layer: usize) -> Result<Option<Material>> {
        let material = self.layer(model, layer);
        model.workspace_mut().erase_extensible_group(self.0, layer)?;
        Ok(material)
    }

    /// Give this construction its own copy of every layer material shared
    /// with another holder
    pub fn ensure_unique_layers(&self, model: &mut Model) -> Result<Vec<Material>> {
        let handles = model.workspace_mut().ensure_unique_extensible_targets(self.0)?;
        Ok(handles.into_iter().filter_map(|h| model.get(h)).collect())
    }

    /// Surfaces that point at this construction directly
    pub fn direct_surface_users(&self, model: &Model) -> Vec<Surface> {
        model.referencing(fields::surface::CONSTRUCTION, self.0)
    }

    fn layer_index(&self, layer: usize) -> usize {
        // OS:Construction has no fixed fields and a one-field group
        layer + fields::construction::LAYER
    }
}

// ============================================================================
// Default construction sets
// ============================================================================

model_object! {
    /// Floor, wall and roof/ceiling defaults for one boundary category
    DefaultSurfaceConstructions => OsDefaultSurfaceConstructions
}

model_object! {
    DefaultSubSurfaceConstructions => OsDefaultSubSurfaceConstructions
}

model_object! {
    /// Default constructions per boundary category
    ///
    /// Attached to a space, space type or the building, it supplies the
    /// construction of any surface that does not name one itself.
    DefaultConstructionSet => OsDefaultConstructionSet
}

model_object! {
    RenderingColor => OsRenderingColor
}

impl DefaultSurfaceConstructions {
    pub fn new(model: &mut Model) -> Result<Self> {
        model.create(Self::OBJECT_TYPE, None).map(Self)
    }

    pub fn floor_construction(&self, model: &Model) -> Option<Construction> {
        model.target(self.0, fields::default_surface_constructions::FLOOR)
    }

    pub fn set_floor_construction(&self, model: &mut Model, construction: Option<Construction>) -> Result<()> {
        model.set_target(self.0, fields::default_surface_constructions::FLOOR, construction)
    }

    pub fn wall_construction(&self, model: &Model) -> Option<Construction> {
        model.target(self.0, fields::default_surface_constructions::WALL)
    }

    pub fn set_wall_construction(&self, model: &mut Model, construction: Option<Construction>) -> Result<()> {
        model.set_target(self.0, fields::default_surface_constructions::WALL, construction)
    }

    pub fn roof_ceiling_construction(&self, model: &Model) -> Option<Construction> {
        model.target(self.0, fields::default_surface_constructions::ROOF_CEILING)
    }

    pub fn set_roof_ceiling_construction(
        &self,
        model: &mut Model,
        construction: Option<Construction>,
    ) -> Result<()> {
        model.set_target(self.0, fields::default_surface_constructions::ROOF_CEILING, construction)
    }

    /// Slot for a surface type (`Floor`, `Wall`, `RoofCeiling`)
    pub fn construction_for(&self, model: &Model, surface_type: &str) -> Option<Construction> {
        let surface_type = surface_type.trim();
        if surface_type.eq_ignore_ascii_case("Floor") {
            self.floor_construction(model)
        } else if surface_type.eq_ignore_ascii_case("Wall") {
            self.wall_construction(model)
        } else if surface_type.eq_ignore_ascii_case("RoofCeiling") {
            self.roof_ceiling_construction(model)
        } else {
            None
        }
    }
}

impl DefaultSubSurfaceConstructions {
    pub fn new(model: &mut Model) -> Result<Self> {
        model.create(Self::OBJECT_TYPE, None).map(Self)
    }

    pub fn fixed_window_construction(&self, model: &Model) -> Option<Construction> {
        model.target(self.0, fields::default_sub_surface_constructions::FIXED_WINDOW)
    }

    pub fn set_fixed_window_construction(
        &self,
        model: &mut Model,
        construction: Option<Construction>,
    ) -> Result<()> {
        model.set_target(self.0, fields::default_sub_surface_constructions::FIXED_WINDOW, construction)
    }

    pub fn operable_window_construction(&self, model: &Model) -> Option<Construction> {
        model.target(self.0, fields::default_sub_surface_constructions::OPERABLE_WINDOW)
    }

    pub fn set_operable_window_construction(
        &self,
        model: &mut Model,
        construction: Option<Construction>,
    ) -> Result<()> {
        model.set_target(
            self.0,
            fields::default_sub_surface_constructions::OPERABLE_WINDOW,
            construction,
        )
    }

    pub fn door_construction(&self, model: &Model) -> Option<Construction> {
        model.target(self.0, fields::default_sub_surface_constructions::DOOR)
    }

    pub fn set_door_construction(&self, model: &mut Model, construction: Option<Construction>) -> Result<()> {
        model.set_target(self.0, fields::default_sub_surface_constructions::DOOR, construction)
    }

    /// Slot for a sub-surface type (`FixedWindow`, `OperableWindow`, `Door`)
    pub fn construction_for(&self, model: &Model, sub_surface_type: &str) -> Option<Construction> {
        let sub_surface_type = sub_surface_type.trim();
        if sub_surface_type.eq_ignore_ascii_case("FixedWindow") {
            self.fixed_window_construction(model)
        } else if sub_surface_type.eq_ignore_ascii_case("OperableWindow") {
            self.operable_window_construction(model)
        } else if sub_surface_type.eq_ignore_ascii_case("Door") {
            self.door_construction(model)
        } else {
            None
        }
    }
}

/// Which defaults a boundary condition draws from
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Boundary {
    Exterior,
    Interior,
    GroundContact,
}

fn boundary(outside_boundary_condition: &str) -> Option<Boundary> {
    let condition = outside_boundary_condition.trim().to_ascii_lowercase();
    match condition.as_str() {
        "outdoors" => Some(Boundary::Exterior),
        "surface" => Some(Boundary::Interior),
        "ground" => Some(Boundary::GroundContact),
        c if c.starts_with("groundslabpreprocessor") || c.starts_with("groundbasementpreprocessor") => {
            Some(Boundary::GroundContact)
        }
        // Adiabatic, GroundFCfactorMethod and other-side models have no defaults
        _ => None,
    }
}

impl DefaultConstructionSet {
    pub fn new(model: &mut Model) -> Result<Self> {
        model.create(Self::OBJECT_TYPE, None).map(Self)
    }

    pub fn exterior_surface_constructions(&self, model: &Model) -> Option<DefaultSurfaceConstructions> {
        model.target(self.0, fields::default_construction_set::EXTERIOR_SURFACE)
    }

    pub fn set_exterior_surface_constructions(
        &self,
        model: &mut Model,
        defaults: Option<DefaultSurfaceConstructions>,
    ) -> Result<()> {
        model.set_target(self.0, fields::default_construction_set::EXTERIOR_SURFACE, defaults)
    }

    pub fn interior_surface_constructions(&self, model: &Model) -> Option<DefaultSurfaceConstructions> {
        model.target(self.0, fields::default_construction_set::INTERIOR_SURFACE)
    }

    pub fn set_interior_surface_constructions(
        &self,
        model: &mut Model,
        defaults: Option<DefaultSurfaceConstructions>,
    ) -> Result<()> {
        model.set_target(self.0, fields::default_construction_set::INTERIOR_SURFACE, defaults)
    }

    pub fn ground_contact_surface_constructions(
        &self,
        model: &Model,
    ) -> Option<DefaultSurfaceConstructions> {
        model.target(self.0, fields::default_construction_set::GROUND_CONTACT_SURFACE)
    }

    pub fn set_ground_contact_surface_constructions(
        &self,
        model: &mut Model,
        defaults: Option<DefaultSurfaceConstructions>,
    ) -> Result<()> {
        model.set_target(self.0, fields::default_construction_set::GROUND_CONTACT_SURFACE, defaults)
    }

    pub fn exterior_sub_surface_constructions(
        &self,
        model: &Model,
    ) -> Option<DefaultSubSurfaceConstructions> {
        model.target(self.0, fields::default_construction_set::EXTERIOR_SUB_SURFACE)
    }

    pub fn set_exterior_sub_surface_constructions(
        &self,
        model: &mut Model,
        defaults: Option<DefaultSubSurfaceConstructions>,
    ) -> Result<()> {
        model.set_target(self.0, fields::default_construction_set::EXTERIOR_SUB_SURFACE, defaults)
    }

    pub fn interior_sub_surface_constructions(
        &self,
        model: &Model,
    ) -> Option<DefaultSubSurfaceConstructions> {
        model.target(self.0, fields::default_construction_set::INTERIOR_SUB_SURFACE)
    }

    pub fn set_interior_sub_surface_constructions(
        &self,
        model: &mut Model,
        defaults: Option<DefaultSubSurfaceConstructions>,
    ) -> Result<()> {
        model.set_target(self.0, fields::default_construction_set::INTERIOR_SUB_SURFACE, defaults)
    }

    /// Default construction this set supplies for a surface
    pub fn construction_for_surface(&self, model: &Model, surface: Surface) -> Option<Construction> {
        let defaults = match boundary(&surface.outside_boundary_condition(model)?)? {
            Boundary::Exterior => self.exterior_surface_constructions(model),
            Boundary::Interior => self.interior_surface_constructions(model),
            Boundary::GroundContact => self.ground_contact_surface_constructions(model),
        }?;
        defaults.construction_for(model, &surface.surface_type(model)?)
    }

    /// Default construction this set supplies for a sub-surface
    ///
    /// Only exterior and interior host surfaces have sub-surface defaults.
    pub fn construction_for_sub_surface(
        &self,
        model: &Model,
        sub_surface: SubSurface,
    ) -> Option<Construction> {
        let host = sub_surface.surface(model)?;
        let defaults = match boundary(&host.outside_boundary_condition(model)?)? {
            Boundary::Exterior => self.exterior_sub_surface_constructions(model),
            Boundary::Interior => self.interior_sub_surface_constructions(model),
            Boundary::GroundContact => None,
        }?;
        defaults.construction_for(model, &sub_surface.sub_surface_type(model)?)
    }
}

impl RenderingColor {
    pub fn new(model: &mut Model) -> Result<Self> {
        model.create(Self::OBJECT_TYPE, None).map(Self)
    }

    /// Red, green and blue components
    pub fn rgb(&self, model: &Model) -> Option<(i64, i64, i64)> {
        Some((
            model.int(self.0, fields::rendering_color::RED)?,
            model.int(self.0, fields::rendering_color::GREEN)?,
            model.int(self.0, fields::rendering_color::BLUE)?,
        ))
    }

    pub fn set_rgb(&self, model: &mut Model, red: i64, green: i64, blue: i64) -> Result<()> {
        model.set(self.0, fields::rendering_color::RED, red)?;
        model.set(self.0, fields::rendering_color::GREEN, green)?;
        model.set(self.0, fields::rendering_color::BLUE, blue)
    }
}

/// Whether an object type is one of the layer material types
pub(crate) fn is_material_type(object_type: &IddObjectType) -> bool {
    matches!(
        object_type,
        IddObjectType::OsMaterial | IddObjectType::OsMaterialNoMass | IddObjectType::OsMaterialAirGap
    )
}
