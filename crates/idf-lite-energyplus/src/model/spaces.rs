// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Site, building, zones, spaces and their surfaces

use super::defaults::default_construction;
use super::{
    ConcreteModelObject, Construction, DefaultConstructionSet, GasEquipment, Model,
    UniqueModelObject,
};
use idf_lite_model::idd::fields;
use idf_lite_model::{FieldValue, Result};

/// Surface vertex (x, y, z) in m
pub type Vertex = [f64; 3];

model_object! {
    /// The building; at most one per model
    Building => OsBuilding
}

model_object! {
    /// Site location and terrain; at most one per model
    Site => OsSite
}

model_object! {
    SpaceType => OsSpaceType
}

model_object! {
    /// Group of spaces simulated as one air volume
    ThermalZone => OsThermalZone
}

model_object! {
    Space => OsSpace
}

model_object! {
    /// Planar heat transfer surface owned by a space
    Surface => OsSurface
}

model_object! {
    /// Window or door hosted by a surface
    SubSurface => OsSubSurface
}

impl UniqueModelObject for Building {}
impl UniqueModelObject for Site {}

// ============================================================================
// Building and site
// ============================================================================

impl Building {
    /// North axis in degrees
    pub fn north_axis(&self, model: &Model) -> Option<f64> {
        model.double(self.0, fields::building::NORTH_AXIS)
    }

    pub fn set_north_axis(&self, model: &mut Model, degrees: f64) -> Result<()> {
        model.set(self.0, fields::building::NORTH_AXIS, degrees)
    }

    /// Space type applied to spaces that do not set their own
    pub fn space_type(&self, model: &Model) -> Option<SpaceType> {
        model.target(self.0, fields::building::SPACE_TYPE)
    }

    pub fn set_space_type(&self, model: &mut Model, space_type: Option<SpaceType>) -> Result<()> {
        model.set_target(self.0, fields::building::SPACE_TYPE, space_type)
    }

    pub fn default_construction_set(&self, model: &Model) -> Option<DefaultConstructionSet> {
        model.target(self.0, fields::building::DEFAULT_CONSTRUCTION_SET)
    }

    pub fn set_default_construction_set(
        &self,
        model: &mut Model,
        set: Option<DefaultConstructionSet>,
    ) -> Result<()> {
        model.set_target(self.0, fields::building::DEFAULT_CONSTRUCTION_SET, set)
    }

    /// Every space in the model
    pub fn spaces(&self, model: &Model) -> Vec<Space> {
        model.objects()
    }
}

impl Site {
    pub fn latitude(&self, model: &Model) -> Option<f64> {
        model.double(self.0, fields::site::LATITUDE)
    }

    pub fn set_latitude(&self, model: &mut Model, degrees: f64) -> Result<()> {
        model.set(self.0, fields::site::LATITUDE, degrees)
    }

    pub fn longitude(&self, model: &Model) -> Option<f64> {
        model.double(self.0, fields::site::LONGITUDE)
    }

    pub fn set_longitude(&self, model: &mut Model, degrees: f64) -> Result<()> {
        model.set(self.0, fields::site::LONGITUDE, degrees)
    }

    /// Hours from GMT
    pub fn time_zone(&self, model: &Model) -> Option<f64> {
        model.double(self.0, fields::site::TIME_ZONE)
    }

    pub fn set_time_zone(&self, model: &mut Model, hours: f64) -> Result<()> {
        model.set(self.0, fields::site::TIME_ZONE, hours)
    }

    pub fn elevation(&self, model: &Model) -> Option<f64> {
        model.double(self.0, fields::site::ELEVATION)
    }

    pub fn set_elevation(&self, model: &mut Model, meters: f64) -> Result<()> {
        model.set(self.0, fields::site::ELEVATION, meters)
    }

    pub fn terrain(&self, model: &Model) -> Option<String> {
        model.string(self.0, fields::site::TERRAIN)
    }

    pub fn set_terrain(&self, model: &mut Model, terrain: &str) -> Result<()> {
        model.set(self.0, fields::site::TERRAIN, terrain)
    }
}

// ============================================================================
// Space types, zones and spaces
// ============================================================================

impl SpaceType {
    pub fn new(model: &mut Model) -> Result<Self> {
        model.create(Self::OBJECT_TYPE, None).map(Self)
    }

    pub fn default_construction_set(&self, model: &Model) -> Option<DefaultConstructionSet> {
        model.target(self.0, fields::space_type::DEFAULT_CONSTRUCTION_SET)
    }

    pub fn set_default_construction_set(
        &self,
        model: &mut Model,
        set: Option<DefaultConstructionSet>,
    ) -> Result<()> {
        model.set_target(self.0, fields::space_type::DEFAULT_CONSTRUCTION_SET, set)
    }

    /// Spaces that name this space type directly
    pub fn spaces(&self, model: &Model) -> Vec<Space> {
        model.referencing(fields::space::SPACE_TYPE, self.0)
    }
}

impl ThermalZone {
    pub fn new(model: &mut Model) -> Result<Self> {
        model.create(Self::OBJECT_TYPE, None).map(Self)
    }

    pub fn multiplier(&self, model: &Model) -> Option<i64> {
        model.int(self.0, fields::thermal_zone::MULTIPLIER)
    }

    pub fn set_multiplier(&self, model: &mut Model, multiplier: i64) -> Result<()> {
        model.set(self.0, fields::thermal_zone::MULTIPLIER, multiplier)
    }

    pub fn spaces(&self, model: &Model) -> Vec<Space> {
        model.referencing(fields::space::THERMAL_ZONE, self.0)
    }
}

impl Space {
    pub fn new(model: &mut Model) -> Result<Self> {
        model.create(Self::OBJECT_TYPE, None).map(Self)
    }

    pub fn space_type(&self, model: &Model) -> Option<SpaceType> {
        model.target(self.0, fields::space::SPACE_TYPE)
    }

    pub fn set_space_type(&self, model: &mut Model, space_type: Option<SpaceType>) -> Result<()> {
        model.set_target(self.0, fields::space::SPACE_TYPE, space_type)
    }

    pub fn default_construction_set(&self, model: &Model) -> Option<DefaultConstructionSet> {
        model.target(self.0, fields::space::DEFAULT_CONSTRUCTION_SET)
    }

    pub fn set_default_construction_set(
        &self,
        model: &mut Model,
        set: Option<DefaultConstructionSet>,
    ) -> Result<()> {
        model.set_target(self.0, fields::space::DEFAULT_CONSTRUCTION_SET, set)
    }

    pub fn thermal_zone(&self, model: &Model) -> Option<ThermalZone> {
        model.target(self.0, fields::space::THERMAL_ZONE)
    }

    pub fn set_thermal_zone(&self, model: &mut Model, zone: Option<ThermalZone>) -> Result<()> {
        model.set_target(self.0, fields::space::THERMAL_ZONE, zone)
    }

    pub fn surfaces(&self, model: &Model) -> Vec<Surface> {
        model.referencing(fields::surface::SPACE, self.0)
    }

    /// Gas equipment placed in this space directly
    pub fn gas_equipment(&self, model: &Model) -> Vec<GasEquipment> {
        model.referencing(fields::gas_equipment::SPACE_OR_SPACE_TYPE, self.0)
    }
}

// ============================================================================
// Surfaces
// ============================================================================

fn vertices(model: &Model, handle: idf_lite_model::Handle) -> Vec<Vertex> {
    let Some(object) = model.workspace().get_object(handle) else {
        return Vec::new();
    };
    object
        .groups
        .iter()
        .filter_map(|group| {
            Some([
                group.get(fields::vertex::X)?.as_double()?,
                group.get(fields::vertex::Y)?.as_double()?,
                group.get(fields::vertex::Z)?.as_double()?,
            ])
        })
        .collect()
}

fn set_vertices(model: &mut Model, handle: idf_lite_model::Handle, points: &[Vertex]) -> Result<()> {
    let workspace = model.workspace_mut();
    workspace.clear_extensible_groups(handle)?;
    for point in points {
        workspace.push_extensible_group(handle, point.iter().map(|c| FieldValue::Double(*c)).collect())?;
    }
    Ok(())
}

impl Surface {
    /// New wall in `space`, facing outdoors
    pub fn new(model: &mut Model, space: Space) -> Result<Self> {
        let surface = model.create(Self::OBJECT_TYPE, None).map(Self)?;
        surface.set_space(model, space)?;
        Ok(surface)
    }

    /// `Floor`, `Wall` or `RoofCeiling`
    pub fn surface_type(&self, model: &Model) -> Option<String> {
        model.string(self.0, fields::surface::SURFACE_TYPE)
    }

    pub fn set_surface_type(&self, model: &mut Model, surface_type: &str) -> Result<()> {
        model.set(self.0, fields::surface::SURFACE_TYPE, surface_type)
    }

    pub fn outside_boundary_condition(&self, model: &Model) -> Option<String> {
        model.string(self.0, fields::surface::OUTSIDE_BOUNDARY_CONDITION)
    }

    pub fn set_outside_boundary_condition(&self, model: &mut Model, condition: &str) -> Result<()> {
        model.set(self.0, fields::surface::OUTSIDE_BOUNDARY_CONDITION, condition)
    }

    pub fn space(&self, model: &Model) -> Option<Space> {
        model.target(self.0, fields::surface::SPACE)
    }

    pub fn set_space(&self, model: &mut Model, space: Space) -> Result<()> {
        model.set_target(self.0, fields::surface::SPACE, Some(space))
    }

    /// Construction named by the surface itself
    pub fn direct_construction(&self, model: &Model) -> Option<Construction> {
        model.target(self.0, fields::surface::CONSTRUCTION)
    }

    pub fn set_construction(&self, model: &mut Model, construction: Option<Construction>) -> Result<()> {
        model.set_target(self.0, fields::surface::CONSTRUCTION, construction)
    }

    /// Effective construction, own or defaulted
    pub fn construction(&self, model: &Model) -> Option<Construction> {
        self.construction_with_search_distance(model).map(|(c, _)| c)
    }

    /// Effective construction and how far up the default chain it was found
    ///
    /// Distance 0 is the surface itself, then 1 the space's default set,
    /// 2 the space type's, 3 the building's and 4 the building space type's.
    pub fn construction_with_search_distance(&self, model: &Model) -> Option<(Construction, usize)> {
        if let Some(construction) = self.direct_construction(model) {
            return Some((construction, 0));
        }
        let space = self.space(model)?;
        default_construction(model, space, |set| set.construction_for_surface(model, *self))
    }

    pub fn is_construction_defaulted(&self, model: &Model) -> bool {
        self.direct_construction(model).is_none()
    }

    pub fn vertices(&self, model: &Model) -> Vec<Vertex> {
        vertices(model, self.0)
    }

    pub fn set_vertices(&self, model: &mut Model, points: &[Vertex]) -> Result<()> {
        set_vertices(model, self.0, points)
    }

    pub fn sub_surfaces(&self, model: &Model) -> Vec<SubSurface> {
        model.referencing(fields::sub_surface::SURFACE, self.0)
    }
}

impl SubSurface {
    /// New fixed window in `surface`
    pub fn new(model: &mut Model, surface: Surface) -> Result<Self> {
        let sub_surface = model.create(Self::OBJECT_TYPE, None).map(Self)?;
        sub_surface.set_surface(model, surface)?;
        Ok(sub_surface)
    }

    /// `FixedWindow`, `OperableWindow` or `Door`
    pub fn sub_surface_type(&self, model: &Model) -> Option<String> {
        model.string(self.0, fields::sub_surface::SUB_SURFACE_TYPE)
    }

    pub fn set_sub_surface_type(&self, model: &mut Model, sub_surface_type: &str) -> Result<()> {
        model.set(self.0, fields::sub_surface::SUB_SURFACE_TYPE, sub_surface_type)
    }

    pub fn surface(&self, model: &Model) -> Option<Surface> {
        model.target(self.0, fields::sub_surface::SURFACE)
    }

    pub fn set_surface(&self, model: &mut Model, surface: Surface) -> Result<()> {
        model.set_target(self.0, fields::sub_surface::SURFACE, Some(surface))
    }

    pub fn multiplier(&self, model: &Model) -> Option<f64> {
        model.double(self.0, fields::sub_surface::MULTIPLIER)
    }

    pub fn set_multiplier(&self, model: &mut Model, multiplier: f64) -> Result<()> {
        model.set(self.0, fields::sub_surface::MULTIPLIER, multiplier)
    }

    pub fn direct_construction(&self, model: &Model) -> Option<Construction> {
        model.target(self.0, fields::sub_surface::CONSTRUCTION)
    }

    pub fn set_construction(&self, model: &mut Model, construction: Option<Construction>) -> Result<()> {
        model.set_target(self.0, fields::sub_surface::CONSTRUCTION, construction)
    }

    pub fn construction(&self, model: &Model) -> Option<Construction> {
        self.construction_with_search_distance(model).map(|(c, _)| c)
    }

    /// Same search as [`Surface::construction_with_search_distance`],
    /// starting from the host surface's space
    pub fn construction_with_search_distance(&self, model: &Model) -> Option<(Construction, usize)> {
        if let Some(construction) = self.direct_construction(model) {
            return Some((construction, 0));
        }
        let space = self.surface(model)?.space(model)?;
        default_construction(model, space, |set| set.construction_for_sub_surface(model, *self))
    }

    pub fn vertices(&self, model: &Model) -> Vec<Vertex> {
        vertices(model, self.0)
    }

    pub fn set_vertices(&self, model: &mut Model, points: &[Vertex]) -> Result<()> {
        set_vertices(model, self.0, points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_space_relations() {
        let mut model = Model::new();
        let zone = ThermalZone::new(&mut model).unwrap();
        let office = SpaceType::new(&mut model).unwrap();
        let a = Space::new(&mut model).unwrap();
        let b = Space::new(&mut model).unwrap();
        a.set_thermal_zone(&mut model, Some(zone)).unwrap();
        b.set_thermal_zone(&mut model, Some(zone)).unwrap();
        b.set_space_type(&mut model, Some(office)).unwrap();

        assert_eq!(zone.spaces(&model), vec![a, b]);
        assert_eq!(office.spaces(&model), vec![b]);
        assert_eq!(b.space_type(&model), Some(office));

        b.set_space_type(&mut model, None).unwrap();
        assert!(office.spaces(&model).is_empty());
    }

    #[test]
    fn test_surface_defaults_and_vertices() {
        let mut model = Model::new();
        let space = Space::new(&mut model).unwrap();
        let wall = Surface::new(&mut model, space).unwrap();
        assert_eq!(wall.surface_type(&model).as_deref(), Some("Wall"));
        assert_eq!(wall.outside_boundary_condition(&model).as_deref(), Some("Outdoors"));
        assert_eq!(wall.space(&model), Some(space));
        assert_eq!(space.surfaces(&model), vec![wall]);

        let points = [[0.0, 0.0, 3.0], [0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [10.0, 0.0, 3.0]];
        wall.set_vertices(&mut model, &points).unwrap();
        let read = wall.vertices(&model);
        assert_eq!(read.len(), 4);
        assert_relative_eq!(read[2][0], 10.0);

        let window = SubSurface::new(&mut model, wall).unwrap();
        assert_eq!(wall.sub_surfaces(&model), vec![window]);
        assert_eq!(window.sub_surface_type(&model).as_deref(), Some("FixedWindow"));
    }

    #[test]
    fn test_direct_construction_wins() {
        let mut model = Model::new();
        let space = Space::new(&mut model).unwrap();
        let wall = Surface::new(&mut model, space).unwrap();
        assert!(wall.construction(&model).is_none());
        assert!(wall.is_construction_defaulted(&model));

        let construction = Construction::new(&mut model).unwrap();
        wall.set_construction(&mut model, Some(construction)).unwrap();
        assert_eq!(wall.construction_with_search_distance(&model), Some((construction, 0)));
    }

    #[test]
    fn test_site_terrain() {
        let mut model = Model::new();
        let site = model.unique::<Site>().unwrap();
        assert_eq!(site.terrain(&model).as_deref(), Some("Suburbs"));
        site.set_terrain(&mut model, "City").unwrap();
        site.set_latitude(&mut model, 40.0).unwrap();
        assert_eq!(model.unique::<Site>().unwrap().terrain(&model).as_deref(), Some("City"));
        assert_relative_eq!(site.latitude(&model).unwrap(), 40.0);
    }
}
