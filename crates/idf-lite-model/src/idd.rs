// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Built-in schemas
//!
//! [`SchemaRegistry::model`] describes the `OS:` object types of the typed
//! building model; [`SchemaRegistry::energyplus`] describes the simulation
//! input types. Field index constants live in [`fields`].

use crate::{FieldDescriptor as F, IddObjectType as T, ObjectSchema, SchemaRegistry};

const MATERIALS: [T; 3] = [T::OsMaterial, T::OsMaterialNoMass, T::OsMaterialAirGap];
const EP_MATERIALS: [T; 3] = [T::Material, T::MaterialNoMass, T::MaterialAirGap];

/// Field indices (name excluded) for the built-in types
pub mod fields {
    pub mod building {
        pub const NORTH_AXIS: usize = 0;
        pub const SPACE_TYPE: usize = 1;
        pub const DEFAULT_CONSTRUCTION_SET: usize = 2;
    }

    pub mod site {
        pub const LATITUDE: usize = 0;
        pub const LONGITUDE: usize = 1;
        pub const TIME_ZONE: usize = 2;
        pub const ELEVATION: usize = 3;
        pub const TERRAIN: usize = 4;
    }

    /// Shared by OS:Material and Material
    pub mod material {
        pub const ROUGHNESS: usize = 0;
        pub const THICKNESS: usize = 1;
        pub const CONDUCTIVITY: usize = 2;
        pub const DENSITY: usize = 3;
        pub const SPECIFIC_HEAT: usize = 4;
        pub const THERMAL_ABSORPTANCE: usize = 5;
        pub const SOLAR_ABSORPTANCE: usize = 6;
        pub const VISIBLE_ABSORPTANCE: usize = 7;
    }

    /// Shared by OS:Material:NoMass and Material:NoMass
    pub mod material_no_mass {
        pub const ROUGHNESS: usize = 0;
        pub const THERMAL_RESISTANCE: usize = 1;
        pub const THERMAL_ABSORPTANCE: usize = 2;
        pub const SOLAR_ABSORPTANCE: usize = 3;
        pub const VISIBLE_ABSORPTANCE: usize = 4;
    }

    pub mod material_air_gap {
        pub const THERMAL_RESISTANCE: usize = 0;
    }

    /// Extensible group index of the layer reference
    pub mod construction {
        pub const LAYER: usize = 0;
    }

    pub mod default_surface_constructions {
        pub const FLOOR: usize = 0;
        pub const WALL: usize = 1;
        pub const ROOF_CEILING: usize = 2;
    }

    pub mod default_sub_surface_constructions {
        pub const FIXED_WINDOW: usize = 0;
        pub const OPERABLE_WINDOW: usize = 1;
        pub const DOOR: usize = 2;
    }

    pub mod default_construction_set {
        pub const EXTERIOR_SURFACE: usize = 0;
        pub const INTERIOR_SURFACE: usize = 1;
        pub const GROUND_CONTACT_SURFACE: usize = 2;
        pub const EXTERIOR_SUB_SURFACE: usize = 3;
        pub const INTERIOR_SUB_SURFACE: usize = 4;
    }

    pub mod space_type {
        pub const DEFAULT_CONSTRUCTION_SET: usize = 0;
    }

    pub mod thermal_zone {
        pub const MULTIPLIER: usize = 0;
    }

    pub mod space {
        pub const SPACE_TYPE: usize = 0;
        pub const DEFAULT_CONSTRUCTION_SET: usize = 1;
        pub const THERMAL_ZONE: usize = 2;
    }

    pub mod surface {
        pub const SURFACE_TYPE: usize = 0;
        pub const CONSTRUCTION: usize = 1;
        pub const SPACE: usize = 2;
        pub const OUTSIDE_BOUNDARY_CONDITION: usize = 3;
    }

    pub mod sub_surface {
        pub const SUB_SURFACE_TYPE: usize = 0;
        pub const CONSTRUCTION: usize = 1;
        pub const SURFACE: usize = 2;
        pub const MULTIPLIER: usize = 3;
    }

    /// Extensible vertex group shared by all planar surfaces
    pub mod vertex {
        pub const X: usize = 0;
        pub const Y: usize = 1;
        pub const Z: usize = 2;
    }

    pub mod gas_equipment_definition {
        pub const DESIGN_LEVEL: usize = 0;
    }

    pub mod gas_equipment {
        pub const DEFINITION: usize = 0;
        pub const SPACE_OR_SPACE_TYPE: usize = 1;
        pub const MULTIPLIER: usize = 2;
    }

    /// Shared by both actuator types
    pub mod actuator {
        pub const ACTUATED_COMPONENT: usize = 0;
        pub const COMPONENT_TYPE: usize = 1;
        pub const CONTROL_TYPE: usize = 2;
    }

    pub mod rendering_color {
        pub const RED: usize = 0;
        pub const GREEN: usize = 1;
        pub const BLUE: usize = 2;
    }

    pub mod ep_building {
        pub const NORTH_AXIS: usize = 0;
        pub const TERRAIN: usize = 1;
        pub const LOADS_CONVERGENCE_TOLERANCE: usize = 2;
        pub const TEMPERATURE_CONVERGENCE_TOLERANCE: usize = 3;
        pub const SOLAR_DISTRIBUTION: usize = 4;
        pub const MAXIMUM_WARMUP_DAYS: usize = 5;
        pub const MINIMUM_WARMUP_DAYS: usize = 6;
    }

    pub mod zone {
        pub const RELATIVE_NORTH: usize = 0;
        pub const X_ORIGIN: usize = 1;
        pub const Y_ORIGIN: usize = 2;
        pub const Z_ORIGIN: usize = 3;
        pub const TYPE: usize = 4;
        pub const MULTIPLIER: usize = 5;
    }

    pub mod building_surface {
        pub const SURFACE_TYPE: usize = 0;
        pub const CONSTRUCTION: usize = 1;
        pub const ZONE: usize = 2;
        pub const OUTSIDE_BOUNDARY_CONDITION: usize = 3;
        pub const OUTSIDE_BOUNDARY_CONDITION_OBJECT: usize = 4;
        pub const SUN_EXPOSURE: usize = 5;
        pub const WIND_EXPOSURE: usize = 6;
        pub const VIEW_FACTOR_TO_GROUND: usize = 7;
        pub const NUMBER_OF_VERTICES: usize = 8;
    }

    pub mod fenestration_surface {
        pub const SURFACE_TYPE: usize = 0;
        pub const CONSTRUCTION: usize = 1;
        pub const BUILDING_SURFACE: usize = 2;
        pub const OUTSIDE_BOUNDARY_CONDITION_OBJECT: usize = 3;
        pub const VIEW_FACTOR_TO_GROUND: usize = 4;
        pub const MULTIPLIER: usize = 5;
        pub const NUMBER_OF_VERTICES: usize = 6;
    }

    pub mod schedule_constant {
        pub const TYPE_LIMITS: usize = 0;
        pub const HOURLY_VALUE: usize = 1;
    }

    pub mod ep_gas_equipment {
        pub const ZONE: usize = 0;
        pub const SCHEDULE: usize = 1;
        pub const CALCULATION_METHOD: usize = 2;
        pub const DESIGN_LEVEL: usize = 3;
    }
}

// ============================================================================
// Shared field groups
// ============================================================================

fn opaque_material(object_type: T) -> ObjectSchema {
    ObjectSchema::new(object_type)
        .resource()
        .in_name_group("MaterialName")
        .field(F::string("Roughness").with_default("Smooth"))
        .field(F::double("Thickness").with_unit("m").with_default(0.1))
        .field(F::double("Conductivity").with_unit("W/m-K").with_default(0.1))
        .field(F::double("Density").with_unit("kg/m3").with_default(0.1))
        .field(F::double("Specific Heat").with_unit("J/kg-K").with_default(1400.0))
        .field(F::double("Thermal Absorptance").with_default(0.9))
        .field(F::double("Solar Absorptance").with_default(0.7))
        .field(F::double("Visible Absorptance").with_default(0.7))
}

fn no_mass_material(object_type: T) -> ObjectSchema {
    ObjectSchema::new(object_type)
        .resource()
        .in_name_group("MaterialName")
        .field(F::string("Roughness").with_default("Smooth"))
        .field(F::double("Thermal Resistance").with_unit("m2-K/W").with_default(0.1))
        .field(F::double("Thermal Absorptance").with_default(0.9))
        .field(F::double("Solar Absorptance").with_default(0.7))
        .field(F::double("Visible Absorptance").with_default(0.7))
}

fn air_gap_material(object_type: T) -> ObjectSchema {
    ObjectSchema::new(object_type)
        .resource()
        .in_name_group("MaterialName")
        .field(F::double("Thermal Resistance").with_unit("m2-K/W").with_default(0.1))
}

fn with_vertices(schema: ObjectSchema) -> ObjectSchema {
    schema
        .extensible_field(F::double("Vertex X-coordinate").with_unit("m"))
        .extensible_field(F::double("Vertex Y-coordinate").with_unit("m"))
        .extensible_field(F::double("Vertex Z-coordinate").with_unit("m"))
}

fn actuator(object_type: T, components: &[T]) -> ObjectSchema {
    ObjectSchema::new(object_type)
        .field(F::reference("Actuated Component Name", components).required())
        .field(F::string("Actuated Component Type"))
        .field(F::string("Actuated Component Control Type"))
}

impl SchemaRegistry {
    /// Schemas of the typed building model
    pub fn model() -> Self {
        SchemaRegistry::new()
            .register(
                ObjectSchema::new(T::OsBuilding)
                    .unique()
                    .field(F::double("North Axis").with_unit("deg").with_default(0.0))
                    .field(F::reference("Space Type Name", &[T::OsSpaceType]))
                    .field(F::reference(
                        "Default Construction Set Name",
                        &[T::OsDefaultConstructionSet],
                    )),
            )
            .register(
                ObjectSchema::new(T::OsSite)
                    .unique()
                    .field(F::double("Latitude").with_unit("deg").with_default(0.0))
                    .field(F::double("Longitude").with_unit("deg").with_default(0.0))
                    .field(F::double("Time Zone").with_unit("hr").with_default(0.0))
                    .field(F::double("Elevation").with_unit("m").with_default(0.0))
                    .field(F::string("Terrain").with_default("Suburbs")),
            )
            .register(opaque_material(T::OsMaterial))
            .register(no_mass_material(T::OsMaterialNoMass))
            .register(air_gap_material(T::OsMaterialAirGap))
            .register(
                ObjectSchema::new(T::OsConstruction)
                    .resource()
                    .in_name_group("ConstructionName")
                    .extensible_field(F::reference("Layer", &MATERIALS).required()),
            )
            .register(
                ObjectSchema::new(T::OsDefaultSurfaceConstructions)
                    .resource()
                    .field(F::reference("Floor Construction Name", &[T::OsConstruction]))
                    .field(F::reference("Wall Construction Name", &[T::OsConstruction]))
                    .field(F::reference("Roof Ceiling Construction Name", &[T::OsConstruction])),
            )
            .register(
                ObjectSchema::new(T::OsDefaultSubSurfaceConstructions)
                    .resource()
                    .field(F::reference("Fixed Window Construction Name", &[T::OsConstruction]))
                    .field(F::reference(
                        "Operable Window Construction Name",
                        &[T::OsConstruction],
                    ))
                    .field(F::reference("Door Construction Name", &[T::OsConstruction])),
            )
            .register(
                ObjectSchema::new(T::OsDefaultConstructionSet)
                    .resource()
                    .field(F::reference(
                        "Default Exterior Surface Constructions Name",
                        &[T::OsDefaultSurfaceConstructions],
                    ))
                    .field(F::reference(
                        "Default Interior Surface Constructions Name",
                        &[T::OsDefaultSurfaceConstructions],
                    ))
                    .field(F::reference(
                        "Default Ground Contact Surface Constructions Name",
                        &[T::OsDefaultSurfaceConstructions],
                    ))
                    .field(F::reference(
                        "Default Exterior SubSurface Constructions Name",
                        &[T::OsDefaultSubSurfaceConstructions],
                    ))
                    .field(F::reference(
                        "Default Interior SubSurface Constructions Name",
                        &[T::OsDefaultSubSurfaceConstructions],
                    )),
            )
            .register(
                ObjectSchema::new(T::OsRenderingColor)
                    .resource()
                    .field(F::int("Rendering Red Value").with_default(255_i64))
                    .field(F::int("Rendering Green Value").with_default(255_i64))
                    .field(F::int("Rendering Blue Value").with_default(255_i64)),
            )
            .register(
                ObjectSchema::new(T::OsSpaceType).resource().field(F::reference(
                    "Default Construction Set Name",
                    &[T::OsDefaultConstructionSet],
                )),
            )
            .register(
                ObjectSchema::new(T::OsThermalZone).field(F::int("Multiplier").with_default(1_i64)),
            )
            .register(
                ObjectSchema::new(T::OsSpace)
                    .field(F::reference("Space Type Name", &[T::OsSpaceType]))
                    .field(F::reference(
                        "Default Construction Set Name",
                        &[T::OsDefaultConstructionSet],
                    ))
                    .field(F::reference("Thermal Zone Name", &[T::OsThermalZone])),
            )
            .register(with_vertices(
                ObjectSchema::new(T::OsSurface)
                    .field(F::string("Surface Type").with_default("Wall"))
                    .field(F::reference("Construction Name", &[T::OsConstruction]))
                    .parent(F::reference("Space Name", &[T::OsSpace]).required())
                    .field(F::string("Outside Boundary Condition").with_default("Outdoors")),
            ))
            .register(with_vertices(
                ObjectSchema::new(T::OsSubSurface)
                    .field(F::string("Sub Surface Type").with_default("FixedWindow"))
                    .field(F::reference("Construction Name", &[T::OsConstruction]))
                    .parent(F::reference("Surface Name", &[T::OsSurface]).required())
                    .field(F::double("Multiplier").with_default(1.0)),
            ))
            .register(
                ObjectSchema::new(T::OsGasEquipmentDefinition)
                    .resource()
                    .field(F::double("Design Level").with_unit("W").with_default(0.0)),
            )
            .register(
                ObjectSchema::new(T::OsGasEquipment)
                    .field(
                        F::reference("Gas Equipment Definition Name", &[T::OsGasEquipmentDefinition])
                            .required(),
                    )
                    .parent(
                        F::reference("Space or SpaceType Name", &[T::OsSpace, T::OsSpaceType])
                            .required(),
                    )
                    .field(F::double("Multiplier").with_default(1.0)),
            )
            .register(actuator(
                T::OsEnergyManagementSystemActuator,
                &[T::OsGasEquipment, T::OsSpace, T::OsThermalZone, T::OsSurface],
            ))
    }

    /// Schemas of the simulation input
    pub fn energyplus() -> Self {
        SchemaRegistry::new()
            .register(
                ObjectSchema::new(T::Building)
                    .unique()
                    .field(F::double("North Axis").with_unit("deg").with_default(0.0))
                    .field(F::string("Terrain").with_default("Suburbs"))
                    .field(
                        F::double("Loads Convergence Tolerance Value")
                            .with_unit("W")
                            .with_default(0.04),
                    )
                    .field(
                        F::double("Temperature Convergence Tolerance Value")
                            .with_unit("deltaC")
                            .with_default(0.4),
                    )
                    .field(F::string("Solar Distribution").with_default("FullExterior"))
                    .field(F::int("Maximum Number of Warmup Days").with_default(25_i64))
                    .field(F::int("Minimum Number of Warmup Days").with_default(6_i64)),
            )
            .register(
                ObjectSchema::new(T::SiteLocation)
                    .unique()
                    .field(F::double("Latitude").with_unit("deg").with_default(0.0))
                    .field(F::double("Longitude").with_unit("deg").with_default(0.0))
                    .field(F::double("Time Zone").with_unit("hr").with_default(0.0))
                    .field(F::double("Elevation").with_unit("m").with_default(0.0)),
            )
            .register(opaque_material(T::Material))
            .register(no_mass_material(T::MaterialNoMass))
            .register(air_gap_material(T::MaterialAirGap))
            .register(
                ObjectSchema::new(T::Construction)
                    .resource()
                    .in_name_group("ConstructionName")
                    .extensible_field(F::reference("Layer", &EP_MATERIALS).required()),
            )
            .register(
                ObjectSchema::new(T::Zone)
                    .field(F::double("Direction of Relative North").with_unit("deg").with_default(0.0))
                    .field(F::double("X Origin").with_unit("m").with_default(0.0))
                    .field(F::double("Y Origin").with_unit("m").with_default(0.0))
                    .field(F::double("Z Origin").with_unit("m").with_default(0.0))
                    .field(F::int("Type").with_default(1_i64))
                    .field(F::int("Multiplier").with_default(1_i64)),
            )
            .register(with_vertices(
                ObjectSchema::new(T::BuildingSurfaceDetailed)
                    .in_name_group("SurfaceNames")
                    .field(F::string("Surface Type"))
                    .field(F::reference("Construction Name", &[T::Construction]))
                    .parent(F::reference("Zone Name", &[T::Zone]).required())
                    .field(F::string("Outside Boundary Condition").with_default("Outdoors"))
                    .field(F::string("Outside Boundary Condition Object"))
                    .field(F::string("Sun Exposure").with_default("SunExposed"))
                    .field(F::string("Wind Exposure").with_default("WindExposed"))
                    .field(F::string("View Factor to Ground").with_default("AutoCalculate"))
                    .field(F::string("Number of Vertices").with_default("AutoCalculate")),
            ))
            .register(with_vertices(
                ObjectSchema::new(T::FenestrationSurfaceDetailed)
                    .in_name_group("SurfaceNames")
                    .field(F::string("Surface Type").with_default("Window"))
                    .field(F::reference("Construction Name", &[T::Construction]))
                    .parent(
                        F::reference("Building Surface Name", &[T::BuildingSurfaceDetailed])
                            .required(),
                    )
                    .field(F::string("Outside Boundary Condition Object"))
                    .field(F::string("View Factor to Ground").with_default("AutoCalculate"))
                    .field(F::double("Multiplier").with_default(1.0))
                    .field(F::string("Number of Vertices").with_default("AutoCalculate")),
            ))
            .register(
                ObjectSchema::new(T::ScheduleConstant)
                    .resource()
                    .field(F::string("Schedule Type Limits Name"))
                    .field(F::double("Hourly Value").with_default(0.0)),
            )
            .register(
                ObjectSchema::new(T::GasEquipment)
                    .parent(F::reference("Zone or ZoneList Name", &[T::Zone]).required())
                    .field(F::reference("Schedule Name", &[T::ScheduleConstant]))
                    .field(F::string("Design Level Calculation Method").with_default("EquipmentLevel"))
                    .field(F::double("Design Level").with_unit("W").with_default(0.0)),
            )
            .register(actuator(
                T::EnergyManagementSystemActuator,
                &[T::GasEquipment, T::Zone, T::BuildingSurfaceDetailed],
            ))
    }
}
