//! Vehicle profile collected for CO2 estimation.
//!
//! The form keeps every value as the raw string the user typed and hands the
//! whole profile to the caller on submit. [`VehicleProfile::parse`] is the
//! separate, typed view that enforces the input hints of each field.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::VehicleProfileError;
use crate::number::parse_decimal;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct VehicleProfile {
    #[serde(rename = "Make")]
    pub make: String,
    #[serde(rename = "Vehicle_Class")]
    pub vehicle_class: String,
    #[serde(rename = "Engine_Size")]
    pub engine_size: String,
    #[serde(rename = "Cylinders")]
    pub cylinders: String,
    #[serde(rename = "Transmission")]
    pub transmission: String,
    #[serde(rename = "Fuel_Type")]
    pub fuel_type: String,
    #[serde(rename = "Fuel_Consumption_City")]
    pub fuel_consumption_city: String,
    #[serde(rename = "Fuel_Consumption_Hwy")]
    pub fuel_consumption_hwy: String,
    #[serde(rename = "Fuel_Consumption_Comb")]
    pub fuel_consumption_comb: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum VehicleField {
    Make,
    VehicleClass,
    EngineSize,
    Cylinders,
    Transmission,
    FuelType,
    FuelConsumptionCity,
    FuelConsumptionHwy,
    FuelConsumptionComb,
}

/// Numeric input hints of a field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumericHint {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl VehicleField {
    pub const ALL: [VehicleField; 9] = [
        VehicleField::Make,
        VehicleField::VehicleClass,
        VehicleField::EngineSize,
        VehicleField::Cylinders,
        VehicleField::Transmission,
        VehicleField::FuelType,
        VehicleField::FuelConsumptionCity,
        VehicleField::FuelConsumptionHwy,
        VehicleField::FuelConsumptionComb,
    ];

    /// Field name as used by the form host and the submission payload.
    pub fn name(&self) -> &'static str {
        match self {
            VehicleField::Make => "Make",
            VehicleField::VehicleClass => "Vehicle_Class",
            VehicleField::EngineSize => "Engine_Size",
            VehicleField::Cylinders => "Cylinders",
            VehicleField::Transmission => "Transmission",
            VehicleField::FuelType => "Fuel_Type",
            VehicleField::FuelConsumptionCity => "Fuel_Consumption_City",
            VehicleField::FuelConsumptionHwy => "Fuel_Consumption_Hwy",
            VehicleField::FuelConsumptionComb => "Fuel_Consumption_Comb",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    pub fn label(&self) -> &'static str {
        match self {
            VehicleField::Make => "Make",
            VehicleField::VehicleClass => "Vehicle Class",
            VehicleField::EngineSize => "Engine Size (L)",
            VehicleField::Cylinders => "Cylinders",
            VehicleField::Transmission => "Transmission",
            VehicleField::FuelType => "Fuel Type",
            VehicleField::FuelConsumptionCity => "Fuel Consumption City (L/100km)",
            VehicleField::FuelConsumptionHwy => "Fuel Consumption Highway (L/100km)",
            VehicleField::FuelConsumptionComb => "Fuel Consumption Combined (L/100km)",
        }
    }

    pub fn numeric_hint(&self) -> Option<NumericHint> {
        let consumption = NumericHint {
            min: 1.0,
            max: 30.0,
            step: 0.1,
        };
        match self {
            VehicleField::EngineSize => Some(NumericHint {
                min: 0.5,
                max: 10.0,
                step: 0.1,
            }),
            VehicleField::Cylinders => Some(NumericHint {
                min: 3.0,
                max: 12.0,
                step: 1.0,
            }),
            VehicleField::FuelConsumptionCity
            | VehicleField::FuelConsumptionHwy
            | VehicleField::FuelConsumptionComb => Some(consumption),
            _ => None,
        }
    }
}

impl fmt::Display for VehicleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
pub enum VehicleClass {
    Suv,
    Compact,
    MidSize,
    FullSize,
    PickupTruck,
    Minivan,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 6] = [
        VehicleClass::Suv,
        VehicleClass::Compact,
        VehicleClass::MidSize,
        VehicleClass::FullSize,
        VehicleClass::PickupTruck,
        VehicleClass::Minivan,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            VehicleClass::Suv => "SUV",
            VehicleClass::Compact => "COMPACT",
            VehicleClass::MidSize => "MID-SIZE",
            VehicleClass::FullSize => "FULL-SIZE",
            VehicleClass::PickupTruck => "PICKUP TRUCK",
            VehicleClass::Minivan => "MINIVAN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VehicleClass::Suv => "SUV",
            VehicleClass::Compact => "Compact",
            VehicleClass::MidSize => "Mid-Size",
            VehicleClass::FullSize => "Full-Size",
            VehicleClass::PickupTruck => "Pickup Truck",
            VehicleClass::Minivan => "Minivan",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
pub enum Transmission {
    Automatic,
    Manual,
    AutomatedManual,
    ContinuouslyVariable,
}

impl Transmission {
    pub const ALL: [Transmission; 4] = [
        Transmission::Automatic,
        Transmission::Manual,
        Transmission::AutomatedManual,
        Transmission::ContinuouslyVariable,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Transmission::Automatic => "A",
            Transmission::Manual => "M",
            Transmission::AutomatedManual => "AM",
            Transmission::ContinuouslyVariable => "CVT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Transmission::Automatic => "Automatic",
            Transmission::Manual => "Manual",
            Transmission::AutomatedManual => "Automated Manual",
            Transmission::ContinuouslyVariable => "Continuously Variable",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
pub enum FuelType {
    RegularGasoline,
    PremiumGasoline,
    Diesel,
    Ethanol,
}

impl FuelType {
    pub const ALL: [FuelType; 4] = [
        FuelType::RegularGasoline,
        FuelType::PremiumGasoline,
        FuelType::Diesel,
        FuelType::Ethanol,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            FuelType::RegularGasoline => "X",
            FuelType::PremiumGasoline => "Z",
            FuelType::Diesel => "D",
            FuelType::Ethanol => "E",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FuelType::RegularGasoline => "Regular Gasoline",
            FuelType::PremiumGasoline => "Premium Gasoline",
            FuelType::Diesel => "Diesel",
            FuelType::Ethanol => "Ethanol",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.code() == code)
    }
}

/// Typed view of a [`VehicleProfile`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, uniffi::Record)]
pub struct VehicleSpec {
    pub make: String,
    pub vehicle_class: VehicleClass,
    pub engine_size_l: f64,
    pub cylinders: u8,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    pub fuel_consumption_city: f64,
    pub fuel_consumption_hwy: f64,
    pub fuel_consumption_comb: f64,
}

impl VehicleProfile {
    pub fn get(&self, field: VehicleField) -> &str {
        match field {
            VehicleField::Make => &self.make,
            VehicleField::VehicleClass => &self.vehicle_class,
            VehicleField::EngineSize => &self.engine_size,
            VehicleField::Cylinders => &self.cylinders,
            VehicleField::Transmission => &self.transmission,
            VehicleField::FuelType => &self.fuel_type,
            VehicleField::FuelConsumptionCity => &self.fuel_consumption_city,
            VehicleField::FuelConsumptionHwy => &self.fuel_consumption_hwy,
            VehicleField::FuelConsumptionComb => &self.fuel_consumption_comb,
        }
    }

    pub fn set(&mut self, field: VehicleField, value: impl Into<String>) {
        let slot = match field {
            VehicleField::Make => &mut self.make,
            VehicleField::VehicleClass => &mut self.vehicle_class,
            VehicleField::EngineSize => &mut self.engine_size,
            VehicleField::Cylinders => &mut self.cylinders,
            VehicleField::Transmission => &mut self.transmission,
            VehicleField::FuelType => &mut self.fuel_type,
            VehicleField::FuelConsumptionCity => &mut self.fuel_consumption_city,
            VehicleField::FuelConsumptionHwy => &mut self.fuel_consumption_hwy,
            VehicleField::FuelConsumptionComb => &mut self.fuel_consumption_comb,
        };
        *slot = value.into();
    }

    /// Convert to typed values, checking required values, option codes and
    /// the numeric hints of each field. Fields are checked in form order and
    /// the first failure is returned.
    pub fn parse(&self) -> Result<VehicleSpec, VehicleProfileError> {
        let make = self.required(VehicleField::Make)?.to_string();
        let vehicle_class = self.option(VehicleField::VehicleClass, VehicleClass::from_code)?;
        let engine_size_l = self.number(VehicleField::EngineSize)?;
        let cylinders = self.number(VehicleField::Cylinders)?;
        if cylinders.fract() != 0.0 {
            return Err(VehicleProfileError::NotAnInteger {
                field: VehicleField::Cylinders,
                value: cylinders,
            });
        }
        let transmission = self.option(VehicleField::Transmission, Transmission::from_code)?;
        let fuel_type = self.option(VehicleField::FuelType, FuelType::from_code)?;

        Ok(VehicleSpec {
            make,
            vehicle_class,
            engine_size_l,
            cylinders: cylinders as u8,
            transmission,
            fuel_type,
            fuel_consumption_city: self.number(VehicleField::FuelConsumptionCity)?,
            fuel_consumption_hwy: self.number(VehicleField::FuelConsumptionHwy)?,
            fuel_consumption_comb: self.number(VehicleField::FuelConsumptionComb)?,
        })
    }

    fn required(&self, field: VehicleField) -> Result<&str, VehicleProfileError> {
        let value = self.get(field).trim();
        if value.is_empty() {
            return Err(VehicleProfileError::MissingValue { field });
        }
        Ok(value)
    }

    fn option<T>(
        &self,
        field: VehicleField,
        from_code: fn(&str) -> Option<T>,
    ) -> Result<T, VehicleProfileError> {
        let value = self.required(field)?;
        from_code(value).ok_or_else(|| VehicleProfileError::UnknownOption {
            field,
            value: value.to_string(),
        })
    }

    fn number(&self, field: VehicleField) -> Result<f64, VehicleProfileError> {
        let raw = self.required(field)?;
        let value = parse_decimal(raw).ok_or_else(|| VehicleProfileError::NotANumber {
            field,
            value: raw.to_string(),
        })?;
        if let Some(hint) = field.numeric_hint() {
            if !(hint.min..=hint.max).contains(&value) {
                return Err(VehicleProfileError::OutOfRange {
                    field,
                    value,
                    min: hint.min,
                    max: hint.max,
                });
            }
        }
        Ok(value)
    }
}

pub const SUBMIT_LABEL: &str = "Calculate CO2 Emissions";
pub const SUBMIT_LABEL_LOADING: &str = "Calculating...";

/// Form state behind the vehicle profile inputs.
#[derive(Clone, Debug, Default)]
pub struct VehicleForm {
    profile: VehicleProfile,
    loading: bool,
}

impl VehicleForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self) -> &VehicleProfile {
        &self.profile
    }

    pub fn set_field(&mut self, field: VehicleField, value: impl Into<String>) {
        self.profile.set(field, value);
    }

    /// Update a field addressed by its host name (`"Engine_Size"`, ...).
    pub fn set_field_by_name(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), VehicleProfileError> {
        let field = VehicleField::from_name(name).ok_or_else(|| {
            VehicleProfileError::UnknownField {
                name: name.to_string(),
            }
        })?;
        self.set_field(field, value);
        Ok(())
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_submit_enabled(&self) -> bool {
        !self.loading
    }

    pub fn submit_label(&self) -> &'static str {
        if self.loading {
            SUBMIT_LABEL_LOADING
        } else {
            SUBMIT_LABEL
        }
    }

    /// Hand the current values, unparsed, to `on_submit`. Returns `false`
    /// without calling it while a previous submission is loading.
    pub fn submit<F>(&self, on_submit: F) -> bool
    where
        F: FnOnce(VehicleProfile),
    {
        if self.loading {
            tracing::debug!("vehicle form submit ignored while loading");
            return false;
        }
        on_submit(self.profile.clone());
        true
    }

    pub fn reset(&mut self) {
        self.profile = VehicleProfile::default();
    }
}
