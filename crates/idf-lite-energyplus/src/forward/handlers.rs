// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Built-in forward handlers, one per model type family

use super::{ForwardContext, ForwardHandler};
use crate::error::Result;
use crate::mapping::{self, Link, Translated};
use crate::model::{
    Construction, GasEquipment, Model, ModelObject, Site, Space, SubSurface, Surface, ThermalZone,
};
use idf_lite_model::idd::fields;
use idf_lite_model::{
    Diagnostic, DiagnosticKind, FieldValue, Handle, IddObjectType, ObjectSchema, WorkspaceObject,
};

type T = IddObjectType;

fn source_schema<'m>(model: &'m Model, object: &WorkspaceObject) -> Option<&'m ObjectSchema> {
    model.workspace().registry().schema(&object.object_type)
}

/// Output zone of the thermal zone `space` belongs to
///
/// Visits the space first so an orphaned space is reported once.
fn zone_of_space(ctx: &mut ForwardContext<'_>, space: Space) -> Result<Option<Handle>> {
    let model = ctx.model();
    ctx.translate_and_map(space.handle())?;
    match space.thermal_zone(model) {
        Some(zone) => ctx.translate_and_map(zone.handle()),
        None => Ok(None),
    }
}

/// Output object of the effective construction; a dangling direct
/// construction is reported and the default chain is used instead
fn effective_construction(
    ctx: &mut ForwardContext<'_>,
    object: &WorkspaceObject,
    index: usize,
    construction: Option<Construction>,
) -> Result<Option<Handle>> {
    if ctx.link(object, index) == Link::Broken {
        ctx.report_left_empty(object, index);
    }
    match construction {
        Some(construction) => {
            let mapped = ctx.translate_and_map(construction.handle())?;
            if mapped.is_none() {
                ctx.report_left_empty(object, index);
            }
            Ok(mapped)
        }
        None => Ok(None),
    }
}

fn is_outdoors(condition: Option<&str>) -> bool {
    condition.is_some_and(|c| c.eq_ignore_ascii_case("outdoors"))
}

// ============================================================================
// Site and building
// ============================================================================

/// `OS:Building` to `Building`; terrain comes from the site
pub struct BuildingHandler;

impl ForwardHandler for BuildingHandler {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ForwardContext<'_>) -> Result<Translated> {
        let model = ctx.model();
        let mut building = ctx.new_output(object, T::Building);
        if let Some(north_axis) = object.get_double(fields::building::NORTH_AXIS) {
            building.set_field(fields::ep_building::NORTH_AXIS, north_axis);
        }
        if let Some(terrain) = model.optional_unique::<Site>().and_then(|s| s.terrain(model)) {
            building.set_field(fields::ep_building::TERRAIN, terrain);
        }
        Ok(Translated::Object(ctx.add(building)?))
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::OsBuilding]
    }
}

/// `OS:Site` to `Site:Location`
pub struct SiteHandler;

impl ForwardHandler for SiteHandler {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ForwardContext<'_>) -> Result<Translated> {
        let target_schema = ctx.output_schema(&T::SiteLocation)?;
        let mut location = ctx.new_output(object, T::SiteLocation);
        if let Some(schema) = source_schema(ctx.model(), object) {
            mapping::copy_fields(
                ctx.units(),
                object,
                schema,
                &mut location,
                &target_schema,
                &[
                    (fields::site::LATITUDE, 0),
                    (fields::site::LONGITUDE, 1),
                    (fields::site::TIME_ZONE, 2),
                    (fields::site::ELEVATION, 3),
                ],
            );
        }
        Ok(Translated::Object(ctx.add(location)?))
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::OsSite]
    }
}

// ============================================================================
// Envelope resources
// ============================================================================

/// Materials map one to one
pub struct MaterialHandler;

impl MaterialHandler {
    fn output_type(object_type: &IddObjectType) -> Option<IddObjectType> {
        match object_type {
            T::OsMaterial => Some(T::Material),
            T::OsMaterialNoMass => Some(T::MaterialNoMass),
            T::OsMaterialAirGap => Some(T::MaterialAirGap),
            _ => None,
        }
    }
}

impl ForwardHandler for MaterialHandler {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ForwardContext<'_>) -> Result<Translated> {
        let Some(output_type) = Self::output_type(&object.object_type) else {
            return Ok(Translated::Dropped);
        };
        let target_schema = ctx.output_schema(&output_type)?;
        let mut material = ctx.new_output(object, output_type);
        if let Some(schema) = source_schema(ctx.model(), object) {
            mapping::copy_all_fields(ctx.units(), object, schema, &mut material, &target_schema);
        }
        Ok(Translated::Object(ctx.add(material)?))
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::OsMaterial, T::OsMaterialNoMass, T::OsMaterialAirGap]
    }
}

/// Layered construction; every layer must translate or the construction is
/// dropped
pub struct ConstructionHandler;

impl ForwardHandler for ConstructionHandler {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ForwardContext<'_>) -> Result<Translated> {
        let fixed = source_schema(ctx.model(), object).map_or(0, |s| s.fields.len());
        let mut layers = Vec::with_capacity(object.num_groups());
        let mut complete = true;
        for layer in 0..object.num_groups() {
            match ctx.translate_required(object, fixed + layer)? {
                Some(material) => layers.push(material),
                None => complete = false,
            }
        }
        if !complete {
            return Ok(Translated::Dropped);
        }

        let mut construction = ctx.new_output(object, T::Construction);
        construction.groups = layers.into_iter().map(|m| vec![FieldValue::from(m)]).collect();
        Ok(Translated::Object(ctx.add(construction)?))
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::OsConstruction]
    }
}

/// Model-only concepts that are folded into the objects using them
pub struct NoCounterpartHandler;

impl ForwardHandler for NoCounterpartHandler {
    fn translate(&self, _object: &WorkspaceObject, _ctx: &mut ForwardContext<'_>) -> Result<Translated> {
        Ok(Translated::NoCounterpart)
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![
            T::OsDefaultSurfaceConstructions,
            T::OsDefaultSubSurfaceConstructions,
            T::OsDefaultConstructionSet,
            T::OsSpaceType,
            T::OsGasEquipmentDefinition,
        ]
    }
}

// ============================================================================
// Zones and geometry
// ============================================================================

pub struct ThermalZoneHandler;

impl ForwardHandler for ThermalZoneHandler {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ForwardContext<'_>) -> Result<Translated> {
        let mut zone = ctx.new_output(object, T::Zone);
        if let Some(multiplier) = object.get_int(fields::thermal_zone::MULTIPLIER) {
            zone.set_field(fields::zone::MULTIPLIER, multiplier);
        }
        Ok(Translated::Object(ctx.add(zone)?))
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::OsThermalZone]
    }
}

/// Spaces merge into their thermal zone
pub struct SpaceHandler;

impl ForwardHandler for SpaceHandler {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ForwardContext<'_>) -> Result<Translated> {
        match ctx.link(object, fields::space::THERMAL_ZONE) {
            Link::Found(zone) => {
                ctx.translate_and_map(zone)?;
                Ok(Translated::NoCounterpart)
            }
            Link::Unset | Link::Broken => {
                ctx.report(
                    Diagnostic::warning(
                        DiagnosticKind::OrphanObject,
                        format!("space '{}' is not in a thermal zone", object.name_str()),
                    )
                    .for_object(object.handle, &object.object_type),
                );
                Ok(Translated::Dropped)
            }
        }
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::OsSpace]
    }
}

/// `OS:Surface` to `BuildingSurface:Detailed` in the space's zone
pub struct SurfaceHandler;

impl SurfaceHandler {
    fn surface_type(surface_type: Option<&str>, outdoors: bool) -> String {
        match surface_type {
            Some(t) if t.eq_ignore_ascii_case("roofceiling") => {
                let mapped = if outdoors { "Roof" } else { "Ceiling" };
                mapped.to_string()
            }
            Some(t) => t.to_string(),
            None => "Wall".to_string(),
        }
    }
}

impl ForwardHandler for SurfaceHandler {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ForwardContext<'_>) -> Result<Translated> {
        let model = ctx.model();
        let Some(surface) = Surface::from_object(object) else {
            return Ok(Translated::Dropped);
        };
        let zone = match surface.space(model) {
            Some(space) => zone_of_space(ctx, space)?,
            None => None,
        };
        let Some(zone) = zone else {
            ctx.report(mapping::broken_reference(object, "its space is not in a thermal zone"));
            return Ok(Translated::Dropped);
        };
        let construction = effective_construction(
            ctx,
            object,
            fields::surface::CONSTRUCTION,
            surface.construction(model),
        )?;

        let condition = object.get_string(fields::surface::OUTSIDE_BOUNDARY_CONDITION);
        let outdoors = is_outdoors(condition);
        let target_schema = ctx.output_schema(&T::BuildingSurfaceDetailed)?;
        let mut output = ctx.new_output(object, T::BuildingSurfaceDetailed);
        output.set_field(
            fields::building_surface::SURFACE_TYPE,
            Self::surface_type(object.get_string(fields::surface::SURFACE_TYPE), outdoors),
        );
        if let Some(construction) = construction {
            output.set_field(fields::building_surface::CONSTRUCTION, construction);
        }
        output.set_field(fields::building_surface::ZONE, zone);
        output.set_field(
            fields::building_surface::OUTSIDE_BOUNDARY_CONDITION,
            condition.unwrap_or("Outdoors"),
        );
        output.set_field(
            fields::building_surface::SUN_EXPOSURE,
            if outdoors { "SunExposed" } else { "NoSun" },
        );
        output.set_field(
            fields::building_surface::WIND_EXPOSURE,
            if outdoors { "WindExposed" } else { "NoWind" },
        );
        if let Some(schema) = source_schema(model, object) {
            mapping::copy_value_groups(ctx.units(), object, schema, &mut output, &target_schema);
        }
        Ok(Translated::Object(ctx.add(output)?))
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::OsSurface]
    }
}

/// `OS:SubSurface` to `FenestrationSurface:Detailed` on the host surface
pub struct SubSurfaceHandler;

impl ForwardHandler for SubSurfaceHandler {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ForwardContext<'_>) -> Result<Translated> {
        let model = ctx.model();
        let Some(sub_surface) = SubSurface::from_object(object) else {
            return Ok(Translated::Dropped);
        };
        let Some(host) = ctx.translate_required(object, fields::sub_surface::SURFACE)? else {
            return Ok(Translated::Dropped);
        };
        let construction = effective_construction(
            ctx,
            object,
            fields::sub_surface::CONSTRUCTION,
            sub_surface.construction(model),
        )?;

        let sub_surface_type = match object.get_string(fields::sub_surface::SUB_SURFACE_TYPE) {
            Some(t) if t.eq_ignore_ascii_case("fixedwindow") || t.eq_ignore_ascii_case("operablewindow") => {
                "Window"
            }
            Some(t) => t,
            None => "Window",
        };
        let target_schema = ctx.output_schema(&T::FenestrationSurfaceDetailed)?;
        let mut output = ctx.new_output(object, T::FenestrationSurfaceDetailed);
        output.set_field(fields::fenestration_surface::SURFACE_TYPE, sub_surface_type);
        if let Some(construction) = construction {
            output.set_field(fields::fenestration_surface::CONSTRUCTION, construction);
        }
        output.set_field(fields::fenestration_surface::BUILDING_SURFACE, host);
        if let Some(multiplier) = sub_surface.multiplier(model) {
            output.set_field(fields::fenestration_surface::MULTIPLIER, multiplier);
        }
        if let Some(schema) = source_schema(model, object) {
            mapping::copy_value_groups(ctx.units(), object, schema, &mut output, &target_schema);
        }
        Ok(Translated::Object(ctx.add(output)?))
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::OsSubSurface]
    }
}

// ============================================================================
// Loads and controls
// ============================================================================

/// Gas equipment instance to a zone-level `GasEquipment` running always on
pub struct GasEquipmentHandler;

impl GasEquipmentHandler {
    /// Zone the equipment lands in; `None` once a diagnostic is recorded
    fn placement_zone(
        ctx: &mut ForwardContext<'_>,
        object: &WorkspaceObject,
        equipment: GasEquipment,
    ) -> Result<Option<Handle>> {
        let model = ctx.model();
        let space = if let Some(space) = equipment.space(model) {
            space
        } else if let Some(space_type) = equipment.space_type(model) {
            let spaces = space_type.spaces(model);
            match spaces.as_slice() {
                [] => {
                    ctx.report(
                        Diagnostic::warning(
                            DiagnosticKind::OrphanObject,
                            format!("'{}' is on a space type no space uses", object.name_str()),
                        )
                        .for_object(object.handle, &object.object_type),
                    );
                    return Ok(None);
                }
                [only] => *only,
                [first, ..] => {
                    ctx.report(
                        Diagnostic::warning(
                            DiagnosticKind::AmbiguousReference,
                            format!(
                                "'{}' is on a space type used by {} spaces, placed in the first",
                                object.name_str(),
                                spaces.len()
                            ),
                        )
                        .for_object(object.handle, &object.object_type),
                    );
                    *first
                }
            }
        } else {
            ctx.report(
                Diagnostic::warning(
                    DiagnosticKind::OrphanObject,
                    format!("'{}' is not placed in a space or space type", object.name_str()),
                )
                .for_object(object.handle, &object.object_type),
            );
            return Ok(None);
        };

        let zone = zone_of_space(ctx, space)?;
        if zone.is_none() {
            ctx.report(mapping::broken_reference(object, "its space is not in a thermal zone"));
        }
        Ok(zone)
    }
}

impl ForwardHandler for GasEquipmentHandler {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ForwardContext<'_>) -> Result<Translated> {
        let model = ctx.model();
        let Some(equipment) = GasEquipment::from_object(object) else {
            return Ok(Translated::Dropped);
        };
        let Some(definition) = equipment.definition(model) else {
            let field = mapping::field_name(model.workspace(), object, fields::gas_equipment::DEFINITION);
            ctx.report(mapping::broken_reference(object, &format!("'{}' does not resolve", field)));
            return Ok(Translated::Dropped);
        };
        ctx.translate_and_map(definition.handle())?;
        let Some(zone) = Self::placement_zone(ctx, object, equipment)? else {
            return Ok(Translated::Dropped);
        };

        let schedule = ctx.always_on_schedule()?;
        let mut output = ctx.new_output(object, T::GasEquipment);
        output.set_field(fields::ep_gas_equipment::ZONE, zone);
        output.set_field(fields::ep_gas_equipment::SCHEDULE, schedule);
        output.set_field(fields::ep_gas_equipment::CALCULATION_METHOD, "EquipmentLevel");
        output.set_field(
            fields::ep_gas_equipment::DESIGN_LEVEL,
            equipment.design_level(model).unwrap_or(0.0),
        );
        Ok(Translated::Object(ctx.add(output)?))
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::OsGasEquipment]
    }
}

/// EMS actuator; the actuated component must survive translation
pub struct ActuatorHandler;

impl ForwardHandler for ActuatorHandler {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ForwardContext<'_>) -> Result<Translated> {
        let model = ctx.model();
        let component = match ctx.link(object, fields::actuator::ACTUATED_COMPONENT) {
            // A space is actuated through the zone it merged into
            Link::Found(target) => match model.get::<Space>(target) {
                Some(space) => zone_of_space(ctx, space)?,
                None => ctx.translate_and_map(target)?,
            },
            Link::Unset | Link::Broken => None,
        };
        let Some(component) = component else {
            ctx.report(mapping::broken_reference(
                object,
                "the actuated component is missing from the output",
            ));
            return Ok(Translated::Dropped);
        };

        let mut output = ctx.new_output(object, T::EnergyManagementSystemActuator);
        output.set_field(fields::actuator::ACTUATED_COMPONENT, component);
        for index in [fields::actuator::COMPONENT_TYPE, fields::actuator::CONTROL_TYPE] {
            if let Some(value) = object.get_string(index) {
                output.set_field(index, value);
            }
        }
        Ok(Translated::Object(ctx.add(output)?))
    }

    fn supported_types(&self) -> Vec<IddObjectType> {
        vec![T::OsEnergyManagementSystemActuator]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forward::ForwardTranslator;
    use crate::model::{
        Building, DefaultConstructionSet, DefaultSurfaceConstructions,
        EnergyManagementSystemActuator, GasEquipmentDefinition, SpaceType, StandardOpaqueMaterial,
    };
    use approx::assert_relative_eq;
    use idf_lite_model::{ObjectResolver, Severity};
    use idf_lite_workspace::Workspace;

    fn zoned_space(model: &mut Model) -> (ThermalZone, Space) {
        let zone = ThermalZone::new(model).unwrap();
        let space = Space::new(model).unwrap();
        space.set_thermal_zone(model, Some(zone)).unwrap();
        (zone, space)
    }

    fn only(output: &Workspace, object_type: IddObjectType) -> &WorkspaceObject {
        let handles = output.handles_by_type(&object_type);
        assert_eq!(handles.len(), 1, "expected one {}", object_type);
        output.get_object(handles[0]).unwrap()
    }

    #[test]
    fn test_building_takes_site_terrain() {
        let mut model = Model::new();
        let building = model.unique::<Building>().unwrap();
        building.set_north_axis(&mut model, 30.0).unwrap();
        let site = model.unique::<Site>().unwrap();
        site.set_terrain(&mut model, "City").unwrap();
        site.set_latitude(&mut model, 40.0).unwrap();

        let result = ForwardTranslator::with_default_handlers().translate_model(&model).unwrap();
        let output = &result.output;
        let ep_building = only(output, T::Building);
        assert_relative_eq!(ep_building.get_double(fields::ep_building::NORTH_AXIS).unwrap(), 30.0);
        assert_eq!(ep_building.get_string(fields::ep_building::TERRAIN), Some("City"));
        let location = only(output, T::SiteLocation);
        assert_relative_eq!(location.get_double(0).unwrap(), 40.0);
    }

    #[test]
    fn test_surface_maps_roof_and_exposure() {
        let mut model = Model::new();
        let (_, space) = zoned_space(&mut model);
        let roof = Surface::new(&mut model, space).unwrap();
        roof.set_surface_type(&mut model, "RoofCeiling").unwrap();
        roof.set_vertices(&mut model, &[[0.0, 0.0, 3.0], [1.0, 0.0, 3.0], [1.0, 1.0, 3.0]])
            .unwrap();
        let ceiling = Surface::new(&mut model, space).unwrap();
        ceiling.set_surface_type(&mut model, "RoofCeiling").unwrap();
        ceiling.set_outside_boundary_condition(&mut model, "Adiabatic").unwrap();

        let result = ForwardTranslator::with_default_handlers().translate_model(&model).unwrap();
        assert!(result.errors.is_empty());
        let output = &result.output;
        let surfaces: Vec<&WorkspaceObject> = output.objects_by_type(&T::BuildingSurfaceDetailed);
        assert_eq!(surfaces.len(), 2);
        let ty = |o: &WorkspaceObject| o.get_string(fields::building_surface::SURFACE_TYPE).map(str::to_string);
        assert_eq!(ty(surfaces[0]).as_deref(), Some("Roof"));
        assert_eq!(ty(surfaces[1]).as_deref(), Some("Ceiling"));
        assert_eq!(
            surfaces[1].get_string(fields::building_surface::SUN_EXPOSURE),
            Some("NoSun")
        );
        assert_eq!(surfaces[0].num_groups(), 3);
        let zone = only(output, T::Zone).handle;
        assert_eq!(
            output.resolve_field(surfaces[0].handle, fields::building_surface::ZONE).handle(),
            Some(zone)
        );
    }

    #[test]
    fn test_surface_without_zone_is_dropped() {
        let mut model = Model::new();
        let space = Space::new(&mut model).unwrap();
        Surface::new(&mut model, space).unwrap();

        let result = ForwardTranslator::with_default_handlers().translate_model(&model).unwrap();
        assert!(result.output.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, DiagnosticKind::BrokenReference);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.kind == DiagnosticKind::OrphanObject));
    }

    #[test]
    fn test_defaulted_construction_is_written() {
        let mut model = Model::new();
        let brick = StandardOpaqueMaterial::new(&mut model).unwrap();
        let wall = Construction::with_layers(&mut model, &[brick.into()]).unwrap();
        let surfaces = DefaultSurfaceConstructions::new(&mut model).unwrap();
        surfaces.set_wall_construction(&mut model, Some(wall)).unwrap();
        let set = DefaultConstructionSet::new(&mut model).unwrap();
        set.set_exterior_surface_constructions(&mut model, Some(surfaces)).unwrap();
        let office = SpaceType::new(&mut model).unwrap();
        office.set_default_construction_set(&mut model, Some(set)).unwrap();
        let (_, space) = zoned_space(&mut model);
        space.set_space_type(&mut model, Some(office)).unwrap();
        Surface::new(&mut model, space).unwrap();

        let result = ForwardTranslator::with_default_handlers().translate_model(&model).unwrap();
        let output = &result.output;
        let surface = only(output, T::BuildingSurfaceDetailed);
        let construction = only(output, T::Construction).handle;
        assert_eq!(
            output.resolve_field(surface.handle, fields::building_surface::CONSTRUCTION).handle(),
            Some(construction)
        );
    }

    #[test]
    fn test_sub_surface_type_and_host() {
        let mut model = Model::new();
        let (_, space) = zoned_space(&mut model);
        let wall = Surface::new(&mut model, space).unwrap();
        let window = SubSurface::new(&mut model, wall).unwrap();
        window.set_sub_surface_type(&mut model, "OperableWindow").unwrap();
        window.set_multiplier(&mut model, 2.0).unwrap();

        let result = ForwardTranslator::with_default_handlers().translate_model(&model).unwrap();
        let output = &result.output;
        let host = only(output, T::BuildingSurfaceDetailed).handle;
        let fenestration = only(output, T::FenestrationSurfaceDetailed);
        assert_eq!(
            fenestration.get_string(fields::fenestration_surface::SURFACE_TYPE),
            Some("Window")
        );
        assert_relative_eq!(
            fenestration.get_double(fields::fenestration_surface::MULTIPLIER).unwrap(),
            2.0
        );
        assert_eq!(
            output
                .resolve_field(fenestration.handle, fields::fenestration_surface::BUILDING_SURFACE)
                .handle(),
            Some(host)
        );
    }

    #[test]
    fn test_gas_equipment_on_space_type() {
        let mut model = Model::new();
        let kitchen = SpaceType::new(&mut model).unwrap();
        let (_, first) = zoned_space(&mut model);
        let (_, second) = zoned_space(&mut model);
        first.set_space_type(&mut model, Some(kitchen)).unwrap();
        second.set_space_type(&mut model, Some(kitchen)).unwrap();
        let definition = GasEquipmentDefinition::new(&mut model).unwrap();
        definition.set_design_level(&mut model, 500.0).unwrap();
        let stove = GasEquipment::new(&mut model, definition).unwrap();
        stove.set_space_type(&mut model, kitchen).unwrap();
        stove.set_multiplier(&mut model, 3.0).unwrap();

        let result = ForwardTranslator::with_default_handlers().translate_model(&model).unwrap();
        assert!(result.errors.is_empty());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.kind == DiagnosticKind::AmbiguousReference));
        let output = &result.output;
        let gas = only(output, T::GasEquipment);
        assert_relative_eq!(gas.get_double(fields::ep_gas_equipment::DESIGN_LEVEL).unwrap(), 1500.0);
        let schedule = only(output, T::ScheduleConstant);
        assert_eq!(schedule.name.as_deref(), Some("Always On"));
        assert_eq!(
            output.resolve_field(gas.handle, fields::ep_gas_equipment::SCHEDULE).handle(),
            Some(schedule.handle)
        );
    }

    #[test]
    fn test_actuator_on_space_targets_zone() {
        let mut model = Model::new();
        let (_, space) = zoned_space(&mut model);
        EnergyManagementSystemActuator::new(&mut model, space, "Zone", "Temperature").unwrap();

        let result = ForwardTranslator::with_default_handlers().translate_model(&model).unwrap();
        let output = &result.output;
        let zone = only(output, T::Zone).handle;
        let actuator = only(output, T::EnergyManagementSystemActuator);
        assert_eq!(
            output.resolve_field(actuator.handle, fields::actuator::ACTUATED_COMPONENT).handle(),
            Some(zone)
        );
        assert_eq!(actuator.get_string(fields::actuator::CONTROL_TYPE), Some("Temperature"));
    }

    #[test]
    fn test_construction_with_dangling_layer_is_dropped() {
        let mut model = Model::new();
        let brick = StandardOpaqueMaterial::new(&mut model).unwrap();
        let gone = StandardOpaqueMaterial::new(&mut model).unwrap();
        Construction::with_layers(&mut model, &[brick.into(), gone.into()]).unwrap();
        model.remove(gone.handle());

        let result = ForwardTranslator::with_default_handlers().translate_model(&model).unwrap();
        assert!(result.output.handles_by_type(&T::Construction).is_empty());
        assert_eq!(result.output.handles_by_type(&T::Material).len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].severity, Severity::Error);
    }
}
