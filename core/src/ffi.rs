//! Functions exported to host bindings.

use crate::error::VehicleProfileError;
use crate::metrics;
use crate::number::coerce_quantity;
use crate::vehicle::{VehicleProfile, VehicleSpec};

#[uniffi::export]
pub fn parse_vehicle_profile(profile: VehicleProfile) -> Result<VehicleSpec, VehicleProfileError> {
    profile.parse()
}

/// Value of an impact field as typed by the user.
#[uniffi::export]
pub fn coerce_impact_quantity(input: String) -> f64 {
    coerce_quantity(&input)
}

/// Impact total as shown on the dashboard, e.g. `"3.8"`.
#[uniffi::export]
pub fn format_one_decimal(value: f64) -> String {
    metrics::format_one_decimal(value)
}
