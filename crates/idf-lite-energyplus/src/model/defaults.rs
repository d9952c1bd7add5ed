// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Default construction chain

use super::{Building, Construction, DefaultConstructionSet, Model, Space};

/// Default construction sets that apply to surfaces of `space`, nearest
/// first, with their search distance
///
/// The order is the space's own set (1), its space type's (2), the
/// building's (3) and the building space type's (4). Unset links are
/// skipped.
pub fn default_construction_sets(model: &Model, space: Space) -> Vec<(DefaultConstructionSet, usize)> {
    let building = model.optional_unique::<Building>();
    [
        space.default_construction_set(model),
        space
            .space_type(model)
            .and_then(|t| t.default_construction_set(model)),
        building.and_then(|b| b.default_construction_set(model)),
        building
            .and_then(|b| b.space_type(model))
            .and_then(|t| t.default_construction_set(model)),
    ]
    .into_iter()
    .enumerate()
    .filter_map(|(i, set)| set.map(|set| (set, i + 1)))
    .collect()
}

/// First construction `pick` finds walking up the chain from `space`
pub fn default_construction(
    model: &Model,
    space: Space,
    pick: impl Fn(DefaultConstructionSet) -> Option<Construction>,
) -> Option<(Construction, usize)> {
    default_construction_sets(model, space)
        .into_iter()
        .find_map(|(set, distance)| pick(set).map(|c| (c, distance)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        DefaultSubSurfaceConstructions, DefaultSurfaceConstructions, SpaceType, SubSurface, Surface,
    };

    fn set_with_exterior_wall(model: &mut Model, wall: Construction) -> DefaultConstructionSet {
        let surfaces = DefaultSurfaceConstructions::new(model).unwrap();
        surfaces.set_wall_construction(model, Some(wall)).unwrap();
        let set = DefaultConstructionSet::new(model).unwrap();
        set.set_exterior_surface_constructions(model, Some(surfaces)).unwrap();
        set
    }

    #[test]
    fn test_nearest_set_wins() {
        let mut model = Model::new();
        let building_wall = Construction::new(&mut model).unwrap();
        let space_wall = Construction::new(&mut model).unwrap();
        let building_set = set_with_exterior_wall(&mut model, building_wall);
        let space_set = set_with_exterior_wall(&mut model, space_wall);

        let building = model.unique::<Building>().unwrap();
        building.set_default_construction_set(&mut model, Some(building_set)).unwrap();
        let space = Space::new(&mut model).unwrap();
        let wall = Surface::new(&mut model, space).unwrap();
        assert_eq!(wall.construction_with_search_distance(&model), Some((building_wall, 3)));

        space.set_default_construction_set(&mut model, Some(space_set)).unwrap();
        assert_eq!(wall.construction_with_search_distance(&model), Some((space_wall, 1)));
        assert_eq!(default_construction_sets(&model, space).len(), 2);
    }

    #[test]
    fn test_chain_skips_sets_without_the_slot() {
        let mut model = Model::new();
        let wall_construction = Construction::new(&mut model).unwrap();
        let type_set = set_with_exterior_wall(&mut model, wall_construction);
        let empty_set = DefaultConstructionSet::new(&mut model).unwrap();
        let office = SpaceType::new(&mut model).unwrap();
        office.set_default_construction_set(&mut model, Some(type_set)).unwrap();

        let building = model.unique::<Building>().unwrap();
        building.set_space_type(&mut model, Some(office)).unwrap();
        let space = Space::new(&mut model).unwrap();
        space.set_default_construction_set(&mut model, Some(empty_set)).unwrap();
        let wall = Surface::new(&mut model, space).unwrap();

        assert_eq!(wall.construction_with_search_distance(&model), Some((wall_construction, 4)));

        // A floor or an interior wall has no slot anywhere in the chain
        wall.set_surface_type(&mut model, "Floor").unwrap();
        assert!(wall.construction(&model).is_none());
        wall.set_surface_type(&mut model, "Wall").unwrap();
        wall.set_outside_boundary_condition(&mut model, "Surface").unwrap();
        assert!(wall.construction(&model).is_none());
    }

    #[test]
    fn test_sub_surface_uses_host_boundary() {
        let mut model = Model::new();
        let glazing = Construction::new(&mut model).unwrap();
        let door = Construction::new(&mut model).unwrap();
        let sub_defaults = DefaultSubSurfaceConstructions::new(&mut model).unwrap();
        sub_defaults.set_fixed_window_construction(&mut model, Some(glazing)).unwrap();
        sub_defaults.set_door_construction(&mut model, Some(door)).unwrap();
        let set = DefaultConstructionSet::new(&mut model).unwrap();
        set.set_exterior_sub_surface_constructions(&mut model, Some(sub_defaults)).unwrap();

        let space = Space::new(&mut model).unwrap();
        space.set_default_construction_set(&mut model, Some(set)).unwrap();
        let wall = Surface::new(&mut model, space).unwrap();
        let window = SubSurface::new(&mut model, wall).unwrap();
        assert_eq!(window.construction_with_search_distance(&model), Some((glazing, 1)));

        window.set_sub_surface_type(&mut model, "Door").unwrap();
        assert_eq!(window.construction(&model), Some(door));

        wall.set_outside_boundary_condition(&mut model, "Ground").unwrap();
        assert!(window.construction(&model).is_none());
    }
}
