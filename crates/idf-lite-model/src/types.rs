// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for IDF data representation
//!
//! This module defines the identity, type and value types used throughout the
//! workspace, codec and translator crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable object identity
///
/// Assigned when an object is inserted into a store and never reused. Handles
/// survive renames and field edits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Handle(Uuid);

impl Handle {
    /// Generate a fresh random handle
    pub fn new() -> Self {
        Handle(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0)
    }
}

impl From<Uuid> for Handle {
    fn from(id: Uuid) -> Self {
        Handle(id)
    }
}

impl From<Handle> for Uuid {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

/// IDD object type enumeration
///
/// Covers both the model-side (`OS:` prefixed) and the EnergyPlus-side types the
/// built-in registries know. Unknown types are captured with their original
/// string representation.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum IddObjectType {
    // ========================================================================
    // Model side: site and building
    // ========================================================================
    OsBuilding,
    OsSite,

    // ========================================================================
    // Model side: envelope resources
    // ========================================================================
    OsMaterial,
    OsMaterialNoMass,
    OsMaterialAirGap,
    OsConstruction,
    OsDefaultSurfaceConstructions,
    OsDefaultSubSurfaceConstructions,
    OsDefaultConstructionSet,
    OsRenderingColor,

    // ========================================================================
    // Model side: spaces and geometry
    // ========================================================================
    OsSpaceType,
    OsThermalZone,
    OsSpace,
    OsSurface,
    OsSubSurface,

    // ========================================================================
    // Model side: loads and controls
    // ========================================================================
    OsGasEquipmentDefinition,
    OsGasEquipment,
    OsEnergyManagementSystemActuator,

    // ========================================================================
    // EnergyPlus side
    // ========================================================================
    Building,
    SiteLocation,
    Material,
    MaterialNoMass,
    MaterialAirGap,
    Construction,
    Zone,
    BuildingSurfaceDetailed,
    FenestrationSurfaceDetailed,
    ScheduleConstant,
    GasEquipment,
    EnergyManagementSystemActuator,

    /// Unknown type - stores the original type name string
    Unknown(String),
}

impl FromStr for IddObjectType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl IddObjectType {
    /// Parse a type name string into an IddObjectType
    ///
    /// IDF type names are case-insensitive.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "os:building" => IddObjectType::OsBuilding,
            "os:site" => IddObjectType::OsSite,
            "os:material" => IddObjectType::OsMaterial,
            "os:material:nomass" => IddObjectType::OsMaterialNoMass,
            "os:material:airgap" => IddObjectType::OsMaterialAirGap,
            "os:construction" => IddObjectType::OsConstruction,
            "os:defaultsurfaceconstructions" => IddObjectType::OsDefaultSurfaceConstructions,
            "os:defaultsubsurfaceconstructions" => IddObjectType::OsDefaultSubSurfaceConstructions,
            "os:defaultconstructionset" => IddObjectType::OsDefaultConstructionSet,
            "os:rendering:color" => IddObjectType::OsRenderingColor,
            "os:spacetype" => IddObjectType::OsSpaceType,
            "os:thermalzone" => IddObjectType::OsThermalZone,
            "os:space" => IddObjectType::OsSpace,
            "os:surface" => IddObjectType::OsSurface,
            "os:subsurface" => IddObjectType::OsSubSurface,
            "os:gasequipment:definition" => IddObjectType::OsGasEquipmentDefinition,
            "os:gasequipment" => IddObjectType::OsGasEquipment,
            "os:energymanagementsystem:actuator" => IddObjectType::OsEnergyManagementSystemActuator,

            "building" => IddObjectType::Building,
            "site:location" => IddObjectType::SiteLocation,
            "material" => IddObjectType::Material,
            "material:nomass" => IddObjectType::MaterialNoMass,
            "material:airgap" => IddObjectType::MaterialAirGap,
            "construction" => IddObjectType::Construction,
            "zone" => IddObjectType::Zone,
            "buildingsurface:detailed" => IddObjectType::BuildingSurfaceDetailed,
            "fenestrationsurface:detailed" => IddObjectType::FenestrationSurfaceDetailed,
            "schedule:constant" => IddObjectType::ScheduleConstant,
            "gasequipment" => IddObjectType::GasEquipment,
            "energymanagementsystem:actuator" => IddObjectType::EnergyManagementSystemActuator,

            _ => IddObjectType::Unknown(trimmed.to_string()),
        }
    }

    /// Get the canonical type name as written in IDF text
    pub fn name(&self) -> &str {
        match self {
            IddObjectType::OsBuilding => "OS:Building",
            IddObjectType::OsSite => "OS:Site",
            IddObjectType::OsMaterial => "OS:Material",
            IddObjectType::OsMaterialNoMass => "OS:Material:NoMass",
            IddObjectType::OsMaterialAirGap => "OS:Material:AirGap",
            IddObjectType::OsConstruction => "OS:Construction",
            IddObjectType::OsDefaultSurfaceConstructions => "OS:DefaultSurfaceConstructions",
            IddObjectType::OsDefaultSubSurfaceConstructions => "OS:DefaultSubSurfaceConstructions",
            IddObjectType::OsDefaultConstructionSet => "OS:DefaultConstructionSet",
            IddObjectType::OsRenderingColor => "OS:Rendering:Color",
            IddObjectType::OsSpaceType => "OS:SpaceType",
            IddObjectType::OsThermalZone => "OS:ThermalZone",
            IddObjectType::OsSpace => "OS:Space",
            IddObjectType::OsSurface => "OS:Surface",
            IddObjectType::OsSubSurface => "OS:SubSurface",
            IddObjectType::OsGasEquipmentDefinition => "OS:GasEquipment:Definition",
            IddObjectType::OsGasEquipment => "OS:GasEquipment",
            IddObjectType::OsEnergyManagementSystemActuator => "OS:EnergyManagementSystem:Actuator",
            IddObjectType::Building => "Building",
            IddObjectType::SiteLocation => "Site:Location",
            IddObjectType::Material => "Material",
            IddObjectType::MaterialNoMass => "Material:NoMass",
            IddObjectType::MaterialAirGap => "Material:AirGap",
            IddObjectType::Construction => "Construction",
            IddObjectType::Zone => "Zone",
            IddObjectType::BuildingSurfaceDetailed => "BuildingSurface:Detailed",
            IddObjectType::FenestrationSurfaceDetailed => "FenestrationSurface:Detailed",
            IddObjectType::ScheduleConstant => "Schedule:Constant",
            IddObjectType::GasEquipment => "GasEquipment",
            IddObjectType::EnergyManagementSystemActuator => "EnergyManagementSystem:Actuator",
            IddObjectType::Unknown(s) => s,
        }
    }

    /// Short display name used for default object names ("OS:Material:NoMass" -> "Material NoMass")
    pub fn short_name(&self) -> String {
        let name = self.name();
        let name = name.strip_prefix("OS:").unwrap_or(name);
        name.replace(':', " ")
    }

    /// Check if this is a model-side type
    pub fn is_model_type(&self) -> bool {
        self.name().starts_with("OS:")
    }

    /// Check if this type is unknown to the built-in registries
    pub fn is_unknown(&self) -> bool {
        matches!(self, IddObjectType::Unknown(_))
    }
}

impl Default for IddObjectType {
    fn default() -> Self {
        IddObjectType::Unknown(String::new())
    }
}

impl fmt::Display for IddObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Kind of value a field may hold
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum FieldKind {
    Int,
    Double,
    String,
    Reference,
    Url,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Int => "integer",
            FieldKind::Double => "real",
            FieldKind::String => "alpha",
            FieldKind::Reference => "object-list",
            FieldKind::Url => "url",
        };
        write!(f, "{}", name)
    }
}

/// A reference to another object
///
/// References are handle-based once attached; name references are kept for
/// text input and resolved lazily against the store.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Reference {
    ByHandle(Handle),
    ByName(String),
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::ByHandle(handle) => write!(f, "{}", handle),
            Reference::ByName(name) => write!(f, "{}", name),
        }
    }
}

/// Field value
///
/// Represents any value that can appear in an object's field list.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub enum FieldValue {
    /// Unset field
    #[default]
    Null,
    /// Integer value
    Int(i64),
    /// Real value
    Double(f64),
    /// Alpha value (choice keys, free text)
    String(String),
    /// Object reference
    Reference(Reference),
    /// File path or URL
    Url(String),
}

impl FieldValue {
    /// Kind of the stored value, `None` for Null
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            FieldValue::Null => None,
            FieldValue::Int(_) => Some(FieldKind::Int),
            FieldValue::Double(_) => Some(FieldKind::Double),
            FieldValue::String(_) => Some(FieldKind::String),
            FieldValue::Reference(_) => Some(FieldKind::Reference),
            FieldValue::Url(_) => Some(FieldKind::Url),
        }
    }

    /// Convert into a value of the given kind
    ///
    /// Integers widen to reals, strings become name references or URLs, and
    /// URLs read as strings. Returns the original value on mismatch.
    pub fn coerce(self, kind: FieldKind) -> std::result::Result<FieldValue, FieldValue> {
        match (self, kind) {
            (FieldValue::Null, _) => Ok(FieldValue::Null),
            (FieldValue::Int(i), FieldKind::Int) => Ok(FieldValue::Int(i)),
            (FieldValue::Int(i), FieldKind::Double) => Ok(FieldValue::Double(i as f64)),
            (FieldValue::Double(d), FieldKind::Double) => Ok(FieldValue::Double(d)),
            (FieldValue::String(s), FieldKind::String) => Ok(FieldValue::String(s)),
            (FieldValue::String(s), FieldKind::Url) => Ok(FieldValue::Url(s)),
            (FieldValue::String(s), FieldKind::Reference) => {
                if s.trim().is_empty() {
                    Ok(FieldValue::Null)
                } else {
                    Ok(FieldValue::Reference(Reference::ByName(s)))
                }
            }
            (FieldValue::Url(s), FieldKind::Url) => Ok(FieldValue::Url(s)),
            (FieldValue::Url(s), FieldKind::String) => Ok(FieldValue::String(s)),
            (FieldValue::Reference(r), FieldKind::Reference) => Ok(FieldValue::Reference(r)),
            (other, _) => Err(other),
        }
    }

    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self.kind() {
            Some(kind) => kind.to_string(),
            None => "null".to_string(),
        }
    }

    /// Try to get as real
    pub fn as_double(&self) -> Option<f64> {
        match self {
            FieldValue::Double(d) => Some(*d),
            FieldValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) | FieldValue::Url(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as reference
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            FieldValue::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// Try to get as a handle reference
    pub fn as_handle(&self) -> Option<Handle> {
        match self {
            FieldValue::Reference(Reference::ByHandle(h)) => Some(*h),
            _ => None,
        }
    }

    /// Check if this is an unset value
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Double(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<Handle> for FieldValue {
    fn from(handle: Handle) -> Self {
        FieldValue::Reference(Reference::ByHandle(handle))
    }
}

impl From<Reference> for FieldValue {
    fn from(reference: Reference) -> Self {
        FieldValue::Reference(reference)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_parse_is_case_insensitive() {
        assert_eq!(IddObjectType::parse("os:material"), IddObjectType::OsMaterial);
        assert_eq!(
            IddObjectType::parse("  BuildingSurface:Detailed "),
            IddObjectType::BuildingSurfaceDetailed
        );
        assert_eq!(
            IddObjectType::parse("Output:Variable"),
            IddObjectType::Unknown("Output:Variable".to_string())
        );
    }

    #[test]
    fn test_type_name_round_trip() {
        for ty in [
            IddObjectType::OsGasEquipmentDefinition,
            IddObjectType::FenestrationSurfaceDetailed,
            IddObjectType::EnergyManagementSystemActuator,
        ] {
            assert_eq!(IddObjectType::parse(ty.name()), ty);
        }
        assert_eq!(IddObjectType::OsMaterialNoMass.short_name(), "Material NoMass");
        assert!(IddObjectType::OsSpace.is_model_type());
        assert!(!IddObjectType::Zone.is_model_type());
    }

    #[test]
    fn test_coerce_widening() {
        assert_eq!(
            FieldValue::Int(3).coerce(FieldKind::Double),
            Ok(FieldValue::Double(3.0))
        );
        assert_eq!(
            FieldValue::from("Brick").coerce(FieldKind::Reference),
            Ok(FieldValue::Reference(Reference::ByName("Brick".to_string())))
        );
        assert_eq!(
            FieldValue::from("").coerce(FieldKind::Reference),
            Ok(FieldValue::Null)
        );
        assert_eq!(
            FieldValue::Double(1.5).coerce(FieldKind::Int),
            Err(FieldValue::Double(1.5))
        );
    }

    #[test]
    fn test_handles_are_unique() {
        let a = Handle::new();
        let b = Handle::new();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with('{'));
    }
}
