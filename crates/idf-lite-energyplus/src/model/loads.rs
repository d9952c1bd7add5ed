// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Internal loads and EMS controls

use super::{ConcreteModelObject, Model, ModelObject, Space, SpaceType};
use idf_lite_model::idd::fields;
use idf_lite_model::{FieldValue, Handle, ObjectResolver, Result};

model_object! {
    /// Shared gas equipment parameters; instances scale it by their multiplier
    GasEquipmentDefinition => OsGasEquipmentDefinition
}

model_object! {
    /// Gas equipment placed in a space or in every space of a space type
    GasEquipment => OsGasEquipment
}

model_object! {
    /// EMS actuator on a component
    EnergyManagementSystemActuator => OsEnergyManagementSystemActuator
}

impl GasEquipmentDefinition {
    pub fn new(model: &mut Model) -> Result<Self> {
        model.create(Self::OBJECT_TYPE, None).map(Self)
    }

    /// Design level in W
    pub fn design_level(&self, model: &Model) -> Option<f64> {
        model.double(self.0, fields::gas_equipment_definition::DESIGN_LEVEL)
    }

    pub fn set_design_level(&self, model: &mut Model, watts: f64) -> Result<()> {
        model.set(self.0, fields::gas_equipment_definition::DESIGN_LEVEL, watts)
    }

    pub fn instances(&self, model: &Model) -> Vec<GasEquipment> {
        model.referencing(fields::gas_equipment::DEFINITION, self.0)
    }
}

impl GasEquipment {
    pub fn new(model: &mut Model, definition: GasEquipmentDefinition) -> Result<Self> {
        let equipment = model.create(Self::OBJECT_TYPE, None).map(Self)?;
        equipment.set_definition(model, definition)?;
        Ok(equipment)
    }

    pub fn definition(&self, model: &Model) -> Option<GasEquipmentDefinition> {
        model.target(self.0, fields::gas_equipment::DEFINITION)
    }

    pub fn set_definition(&self, model: &mut Model, definition: GasEquipmentDefinition) -> Result<()> {
        model.set_target(self.0, fields::gas_equipment::DEFINITION, Some(definition))
    }

    /// Space the equipment is placed in, when placed in a space
    pub fn space(&self, model: &Model) -> Option<Space> {
        model.target(self.0, fields::gas_equipment::SPACE_OR_SPACE_TYPE)
    }

    /// Space type the equipment is placed in, when placed in a space type
    pub fn space_type(&self, model: &Model) -> Option<SpaceType> {
        model.target(self.0, fields::gas_equipment::SPACE_OR_SPACE_TYPE)
    }

    pub fn set_space(&self, model: &mut Model, space: Space) -> Result<()> {
        model.set_target(self.0, fields::gas_equipment::SPACE_OR_SPACE_TYPE, Some(space))
    }

    pub fn set_space_type(&self, model: &mut Model, space_type: SpaceType) -> Result<()> {
        model.set_target(self.0, fields::gas_equipment::SPACE_OR_SPACE_TYPE, Some(space_type))
    }

    pub fn multiplier(&self, model: &Model) -> Option<f64> {
        model.double(self.0, fields::gas_equipment::MULTIPLIER)
    }

    pub fn set_multiplier(&self, model: &mut Model, multiplier: f64) -> Result<()> {
        model.set(self.0, fields::gas_equipment::MULTIPLIER, multiplier)
    }

    /// Definition design level scaled by the multiplier
    pub fn design_level(&self, model: &Model) -> Option<f64> {
        let level = self.definition(model)?.design_level(model)?;
        Some(level * self.multiplier(model).unwrap_or(1.0))
    }
}

impl EnergyManagementSystemActuator {
    pub fn new<T: ModelObject>(
        model: &mut Model,
        component: T,
        component_type: &str,
        control_type: &str,
    ) -> Result<Self> {
        let actuator = model.create(Self::OBJECT_TYPE, None).map(Self)?;
        if let Err(e) = actuator.set_actuated_component(model, component) {
            model.remove(actuator.0);
            return Err(e);
        }
        model.set(actuator.0, fields::actuator::COMPONENT_TYPE, component_type)?;
        model.set(actuator.0, fields::actuator::CONTROL_TYPE, control_type)?;
        Ok(actuator)
    }

    /// Handle of the actuated component while it exists
    pub fn actuated_component(&self, model: &Model) -> Option<Handle> {
        model
            .workspace()
            .resolve_field(self.0, fields::actuator::ACTUATED_COMPONENT)
            .handle()
    }

    pub fn set_actuated_component<T: ModelObject>(&self, model: &mut Model, component: T) -> Result<()> {
        model.set(
            self.0,
            fields::actuator::ACTUATED_COMPONENT,
            FieldValue::from(component.handle()),
        )
    }

    pub fn component_type(&self, model: &Model) -> Option<String> {
        model.string(self.0, fields::actuator::COMPONENT_TYPE)
    }

    pub fn control_type(&self, model: &Model) -> Option<String> {
        model.string(self.0, fields::actuator::CONTROL_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_design_level_scales() {
        let mut model = Model::new();
        let definition = GasEquipmentDefinition::new(&mut model).unwrap();
        definition.set_design_level(&mut model, 1500.0).unwrap();
        let equipment = GasEquipment::new(&mut model, definition).unwrap();
        equipment.set_multiplier(&mut model, 2.0).unwrap();
        assert_relative_eq!(equipment.design_level(&model).unwrap(), 3000.0);
        assert_eq!(definition.instances(&model), vec![equipment]);
    }

    #[test]
    fn test_space_or_space_type() {
        let mut model = Model::new();
        let definition = GasEquipmentDefinition::new(&mut model).unwrap();
        let equipment = GasEquipment::new(&mut model, definition).unwrap();
        let space = Space::new(&mut model).unwrap();
        let kitchen = SpaceType::new(&mut model).unwrap();

        equipment.set_space(&mut model, space).unwrap();
        assert_eq!(equipment.space(&model), Some(space));
        assert!(equipment.space_type(&model).is_none());
        assert_eq!(space.gas_equipment(&model), vec![equipment]);

        equipment.set_space_type(&mut model, kitchen).unwrap();
        assert!(equipment.space(&model).is_none());
        assert_eq!(equipment.space_type(&model), Some(kitchen));
    }

    #[test]
    fn test_actuator_dangles_after_removal() {
        let mut model = Model::new();
        let definition = GasEquipmentDefinition::new(&mut model).unwrap();
        let equipment = GasEquipment::new(&mut model, definition).unwrap();
        let actuator =
            EnergyManagementSystemActuator::new(&mut model, equipment, "GasEquipment", "Gas Power Level")
                .unwrap();
        assert_eq!(actuator.actuated_component(&model), Some(equipment.handle()));
        assert_eq!(actuator.control_type(&model).as_deref(), Some("Gas Power Level"));

        model.remove(equipment.handle());
        assert!(actuator.actuated_component(&model).is_none());
        assert!(model.get::<EnergyManagementSystemActuator>(actuator.handle()).is_some());
    }

    #[test]
    fn test_actuator_rejects_unlisted_component() {
        let mut model = Model::new();
        let definition = GasEquipmentDefinition::new(&mut model).unwrap();
        assert!(EnergyManagementSystemActuator::new(&mut model, definition, "x", "y").is_err());
        assert!(model.objects::<EnergyManagementSystemActuator>().is_empty());
    }
}
