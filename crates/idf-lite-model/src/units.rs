// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit conversion between schema-declared field units

/// Converts real values between unit strings
///
/// Returns `None` when either unit is unknown or the dimensions differ.
pub trait UnitConverter: Send + Sync {
    fn convert(&self, value: f64, from: &str, to: &str) -> Option<f64>;
}

/// Dimension of a unit; conversion is only defined within one dimension
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Dimension {
    Length,
    Area,
    Power,
    Angle,
    Temperature,
    TemperatureDifference,
    Time,
    Conductivity,
    Resistance,
    Density,
    SpecificHeat,
}

/// Table-driven SI/IP converter
///
/// Each unit maps to SI as `si = value * scale + offset`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SiUnitConverter;

impl SiUnitConverter {
    pub fn new() -> Self {
        Self
    }

    fn lookup(unit: &str) -> Option<(Dimension, f64, f64)> {
        use Dimension::*;
        let entry = match unit.trim() {
            "m" => (Length, 1.0, 0.0),
            "cm" => (Length, 0.01, 0.0),
            "mm" => (Length, 0.001, 0.0),
            "km" => (Length, 1000.0, 0.0),
            "ft" => (Length, 0.3048, 0.0),
            "in" => (Length, 0.0254, 0.0),
            "m2" => (Area, 1.0, 0.0),
            "ft2" => (Area, 0.092_903_04, 0.0),
            "W" => (Power, 1.0, 0.0),
            "kW" => (Power, 1000.0, 0.0),
            "Btu/h" => (Power, 0.293_071_07, 0.0),
            "deg" => (Angle, 1.0, 0.0),
            "rad" => (Angle, 180.0 / std::f64::consts::PI, 0.0),
            "C" => (Temperature, 1.0, 0.0),
            "K" => (Temperature, 1.0, -273.15),
            "F" => (Temperature, 5.0 / 9.0, -32.0 * 5.0 / 9.0),
            "deltaC" => (TemperatureDifference, 1.0, 0.0),
            "deltaF" => (TemperatureDifference, 5.0 / 9.0, 0.0),
            "hr" => (Time, 1.0, 0.0),
            "min" => (Time, 1.0 / 60.0, 0.0),
            "W/m-K" => (Conductivity, 1.0, 0.0),
            "Btu-in/h-ft2-F" => (Conductivity, 0.144_227_9, 0.0),
            "m2-K/W" => (Resistance, 1.0, 0.0),
            "ft2-F-hr/Btu" => (Resistance, 0.176_110_2, 0.0),
            "kg/m3" => (Density, 1.0, 0.0),
            "lb/ft3" => (Density, 16.018_46, 0.0),
            "J/kg-K" => (SpecificHeat, 1.0, 0.0),
            "Btu/lb-F" => (SpecificHeat, 4186.8, 0.0),
            _ => return None,
        };
        Some(entry)
    }
}

impl UnitConverter for SiUnitConverter {
    fn convert(&self, value: f64, from: &str, to: &str) -> Option<f64> {
        if from.trim() == to.trim() {
            return Some(value);
        }
        let (from_dim, from_scale, from_offset) = Self::lookup(from)?;
        let (to_dim, to_scale, to_offset) = Self::lookup(to)?;
        if from_dim != to_dim {
            return None;
        }
        let si = value * from_scale + from_offset;
        Some((si - to_offset) / to_scale)
    }
}
