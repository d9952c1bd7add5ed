// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Built-in reverse handlers

use super::{ReverseContext, ReverseHandler};
use crate::error::Result;
use crate::mapping::{self, Translated};
use crate::model::{
    Building, GasEquipment, GasEquipmentDefinition, ModelObject, Site, Space, ThermalZone,
};
use idf_lite_model::idd::fields;
use idf_lite_model::{FieldValue, IddObjectType, WorkspaceObject};

type T = IddObjectType;

/// Space standing in for the zone a surface or load references
fn space_in_zone(
    ctx: &mut ReverseContext<'_>,
    object: &WorkspaceObject,
    index: usize,
) -> Result<Option<Space>> {
    let Some(zone) = ctx.translate_required(object, index)? else {
        return Ok(None);
    };
    Ok(ctx.zone_space(zone))
}

// ============================================================================
// Site and building
// ============================================================================

/// `Building` onto the model's unique building; terrain moves to the site
pub struct BuildingHandler;

impl ReverseHandler for BuildingHandler {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ReverseContext<'_>) -> Result<Translated> {
        let model = ctx.model_mut();
        let building = model.unique::<Building>()?;
        if let Some(name) = object.name.as_deref() {
            building.set_name(model, name)?;
        }
        if let Some(north_axis) = object.get_double(fields::ep_building::NORTH_AXIS) {
            building.set_north_axis(model, north_axis)?;
        }
        if let Some(terrain) = object.get_string(fields::ep_building::TERRAIN) {
            model.unique::<Site>()?.set_terrain(model, terrain)?;
        }
        Ok(Translated::Object(building.handle()))
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::Building]
    }
}

/// `Site:Location` onto the model's unique site
pub struct SiteLocationHandler;

impl ReverseHandler for SiteLocationHandler {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ReverseContext<'_>) -> Result<Translated> {
        let model = ctx.model_mut();
        let site = model.unique::<Site>()?;
        if let Some(name) = object.name.as_deref() {
            site.set_name(model, name)?;
        }
        let values = [0, 1, 2, 3].map(|i| object.get_double(i));
        if let Some(latitude) = values[0] {
            site.set_latitude(model, latitude)?;
        }
        if let Some(longitude) = values[1] {
            site.set_longitude(model, longitude)?;
        }
        if let Some(time_zone) = values[2] {
            site.set_time_zone(model, time_zone)?;
        }
        if let Some(elevation) = values[3] {
            site.set_elevation(model, elevation)?;
        }
        Ok(Translated::Object(site.handle()))
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::SiteLocation]
    }
}

// ============================================================================
// Envelope resources
// ============================================================================

pub struct MaterialHandler;

impl MaterialHandler {
    fn model_type(object_type: &IddObjectType) -> Option<IddObjectType> {
        match object_type {
            T::Material => Some(T::OsMaterial),
            T::MaterialNoMass => Some(T::OsMaterialNoMass),
            T::MaterialAirGap => Some(T::OsMaterialAirGap),
            _ => None,
        }
    }
}

impl ReverseHandler for MaterialHandler {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ReverseContext<'_>) -> Result<Translated> {
        let Some(model_type) = Self::model_type(&object.object_type) else {
            return Ok(Translated::Dropped);
        };
        let target_schema = ctx.model_schema(&model_type)?;
        let mut material = ctx.new_model_object(object, model_type);
        if let Some(schema) = ctx.workspace().registry().schema(&object.object_type) {
            mapping::copy_all_fields(ctx.units(), object, schema, &mut material, &target_schema);
        }
        Ok(Translated::Object(ctx.add(material)?))
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::Material, T::MaterialNoMass, T::MaterialAirGap]
    }
}

/// Layered construction; a layer without a model material drops it
pub struct ConstructionHandler;

impl ReverseHandler for ConstructionHandler {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ReverseContext<'_>) -> Result<Translated> {
        let fixed = ctx
            .workspace()
            .registry()
            .schema(&object.object_type)
            .map_or(0, |s| s.fields.len());
        let mut layers = Vec::with_capacity(object.num_groups());
        for layer in 0..object.num_groups() {
            match ctx.translate_required(object, fixed + layer)? {
                Some(material) => layers.push(material),
                None => return Ok(Translated::Dropped),
            }
        }
        let mut construction = ctx.new_model_object(object, T::OsConstruction);
        construction.groups = layers.into_iter().map(|m| vec![FieldValue::from(m)]).collect();
        Ok(Translated::Object(ctx.add(construction)?))
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::Construction]
    }
}

/// Synthesized objects such as the always-on schedule
pub struct ScheduleHandler;

impl ReverseHandler for ScheduleHandler {
    fn translate(&self, _object: &WorkspaceObject, _ctx: &mut ReverseContext<'_>) -> Result<Translated> {
        Ok(Translated::NoCounterpart)
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::ScheduleConstant]
    }
}

// ============================================================================
// Zones and geometry
// ============================================================================

/// `Zone` to a thermal zone holding one space of the same name
pub struct ZoneHandler;

impl ReverseHandler for ZoneHandler {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ReverseContext<'_>) -> Result<Translated> {
        let zone_object = ctx.new_model_object(object, T::OsThermalZone);
        let space_name = format!("{} Space", zone_object.name.as_deref().unwrap_or_default());
        let space_name = ctx.model_name(object, &space_name, &T::OsSpace);
        let zone_handle = ctx.add(zone_object)?;

        let model = ctx.model_mut();
        let space_handle = model.create(T::OsSpace, Some(&space_name))?;
        let (Some(zone), Some(space)) = (
            model.get::<ThermalZone>(zone_handle),
            model.get::<Space>(space_handle),
        ) else {
            return Ok(Translated::Dropped);
        };
        if let Some(multiplier) = object.get_int(fields::zone::MULTIPLIER) {
            zone.set_multiplier(model, multiplier)?;
        }
        space.set_thermal_zone(model, Some(zone))?;
        ctx.set_zone_space(zone_handle, space);
        Ok(Translated::Object(zone_handle))
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::Zone]
    }
}

/// `BuildingSurface:Detailed` to a surface in the zone's space
pub struct SurfaceHandler;

impl SurfaceHandler {
    fn surface_type(surface_type: Option<&str>) -> &str {
        match surface_type {
            Some(t) if t.eq_ignore_ascii_case("roof") || t.eq_ignore_ascii_case("ceiling") => {
                "RoofCeiling"
            }
            Some(t) => t,
            None => "Wall",
        }
    }
}

impl ReverseHandler for SurfaceHandler {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ReverseContext<'_>) -> Result<Translated> {
        let Some(space) = space_in_zone(ctx, object, fields::building_surface::ZONE)? else {
            return Ok(Translated::Dropped);
        };
        let construction = ctx.translate_optional(object, fields::building_surface::CONSTRUCTION)?;

        let target_schema = ctx.model_schema(&T::OsSurface)?;
        let mut surface = ctx.new_model_object(object, T::OsSurface);
        surface.set_field(
            fields::surface::SURFACE_TYPE,
            Self::surface_type(object.get_string(fields::building_surface::SURFACE_TYPE)),
        );
        if let Some(construction) = construction {
            surface.set_field(fields::surface::CONSTRUCTION, construction);
        }
        surface.set_field(fields::surface::SPACE, space.handle());
        if let Some(condition) = object.get_string(fields::building_surface::OUTSIDE_BOUNDARY_CONDITION) {
            surface.set_field(fields::surface::OUTSIDE_BOUNDARY_CONDITION, condition);
        }
        if let Some(schema) = ctx.workspace().registry().schema(&object.object_type) {
            mapping::copy_value_groups(ctx.units(), object, schema, &mut surface, &target_schema);
        }
        Ok(Translated::Object(ctx.add(surface)?))
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::BuildingSurfaceDetailed]
    }
}

/// `FenestrationSurface:Detailed` to a sub-surface of the host surface
pub struct FenestrationSurfaceHandler;

impl ReverseHandler for FenestrationSurfaceHandler {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ReverseContext<'_>) -> Result<Translated> {
        let Some(host) = ctx.translate_required(object, fields::fenestration_surface::BUILDING_SURFACE)? else {
            return Ok(Translated::Dropped);
        };
        let construction = ctx.translate_optional(object, fields::fenestration_surface::CONSTRUCTION)?;

        let sub_surface_type = match object.get_string(fields::fenestration_surface::SURFACE_TYPE) {
            Some(t) if t.eq_ignore_ascii_case("window") => "FixedWindow",
            Some(t) => t,
            None => "FixedWindow",
        };
        let target_schema = ctx.model_schema(&T::OsSubSurface)?;
        let mut sub_surface = ctx.new_model_object(object, T::OsSubSurface);
        sub_surface.set_field(fields::sub_surface::SUB_SURFACE_TYPE, sub_surface_type);
        if let Some(construction) = construction {
            sub_surface.set_field(fields::sub_surface::CONSTRUCTION, construction);
        }
        sub_surface.set_field(fields::sub_surface::SURFACE, host);
        if let Some(multiplier) = object.get_double(fields::fenestration_surface::MULTIPLIER) {
            sub_surface.set_field(fields::sub_surface::MULTIPLIER, multiplier);
        }
        if let Some(schema) = ctx.workspace().registry().schema(&object.object_type) {
            mapping::copy_value_groups(ctx.units(), object, schema, &mut sub_surface, &target_schema);
        }
        Ok(Translated::Object(ctx.add(sub_surface)?))
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::FenestrationSurfaceDetailed]
    }
}

// ============================================================================
// Loads and controls
// ============================================================================

/// `GasEquipment` to a definition carrying the design level plus an
/// instance in the zone's space
pub struct GasEquipmentHandler;

impl ReverseHandler for GasEquipmentHandler {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ReverseContext<'_>) -> Result<Translated> {
        let Some(space) = space_in_zone(ctx, object, fields::ep_gas_equipment::ZONE)? else {
            return Ok(Translated::Dropped);
        };
        let definition_name = format!("{} Definition", object.name_str());
        let definition_name = ctx.model_name(object, &definition_name, &T::OsGasEquipmentDefinition);
        let equipment_name = ctx.model_name(object, object.name_str(), &T::OsGasEquipment);
        let design_level = object.get_double(fields::ep_gas_equipment::DESIGN_LEVEL);

        let model = ctx.model_mut();
        let definition = GasEquipmentDefinition::new(model)?;
        definition.set_name(model, &definition_name)?;
        if let Some(watts) = design_level {
            definition.set_design_level(model, watts)?;
        }
        let equipment = GasEquipment::new(model, definition)?;
        equipment.set_name(model, &equipment_name)?;
        equipment.set_space(model, space)?;
        Ok(Translated::Object(equipment.handle()))
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::GasEquipment]
    }
}

pub struct ActuatorHandler;

impl ReverseHandler for ActuatorHandler {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ReverseContext<'_>) -> Result<Translated> {
        let Some(component) = ctx.translate_required(object, fields::actuator::ACTUATED_COMPONENT)? else {
            return Ok(Translated::Dropped);
        };
        let mut actuator = ctx.new_model_object(object, T::OsEnergyManagementSystemActuator);
        actuator.set_field(fields::actuator::ACTUATED_COMPONENT, component);
        for index in [fields::actuator::COMPONENT_TYPE, fields::actuator::CONTROL_TYPE] {
            if let Some(value) = object.get_string(index) {
                actuator.set_field(index, value);
            }
        }
        Ok(Translated::Object(ctx.add(actuator)?))
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::EnergyManagementSystemActuator]
    }
}
