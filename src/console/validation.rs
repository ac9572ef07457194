//! Pre-calculation consistency checks. Rules run in a fixed order and the
//! first violation aborts the run; its message is what the command surface
//! returns verbatim (behind the `Error: ` prefix).

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::flowsheet::{Flowsheet, ObjectKind};

const VALID_THERMO_PACKAGES: [&str; 3] = ["Peng-Robinson", "NRTL", "UNIQUAC"];

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    InvalidThermodynamicPackage {
        current: String,
    },
    NonPositiveRefluxRatio {
        column: String,
    },
    UnachievableHeating {
        heater: String,
        outlet_temperature: f64,
        inlet_temperature: f64,
        duty: f64,
    },
    UnachievableCooling {
        heater: String,
        outlet_temperature: f64,
        inlet_temperature: f64,
        duty: f64,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidThermodynamicPackage { current } => write!(
                f,
                "Calculation failed. Invalid or missing thermodynamic package. \
                 Current: '{current}'. Please set a valid package (e.g., Peng-Robinson, NRTL)."
            ),
            Self::NonPositiveRefluxRatio { column } => {
                write!(
                    f,
                    "Calculation failed. Reflux ratio for '{column}' must be positive."
                )
            }
            Self::UnachievableHeating {
                heater,
                outlet_temperature,
                inlet_temperature,
                duty,
            } => write!(
                f,
                "Calculation failed. Unachievable condition in heater '{heater}'. \
                 Outlet temperature ({outlet_temperature} C) cannot be less than or equal to \
                 inlet temperature ({inlet_temperature} C) with a positive duty ({duty} kW)."
            ),
            Self::UnachievableCooling {
                heater,
                outlet_temperature,
                inlet_temperature,
                duty,
            } => write!(
                f,
                "Calculation failed. Unachievable condition in cooler '{heater}'. \
                 Outlet temperature ({outlet_temperature} C) cannot be greater than \
                 inlet temperature ({inlet_temperature} C) with a negative duty ({duty} kW)."
            ),
        }
    }
}

impl Error for ValidationError {}

/// Runs all checks against the store: thermodynamic package first, then
/// reflux ratios, then heater duty consistency.
pub fn validate_calculation(flowsheet: &Flowsheet) -> Result<(), ValidationError> {
    check_thermodynamic_package(flowsheet)?;
    check_reflux_ratios(flowsheet)?;
    check_heater_consistency(flowsheet)?;
    Ok(())
}

fn check_thermodynamic_package(flowsheet: &Flowsheet) -> Result<(), ValidationError> {
    let current = flowsheet
        .settings()
        .and_then(|settings| settings.text_property("Thermodynamic Package"))
        .filter(|package| !package.is_empty());
    if current.is_some_and(|package| VALID_THERMO_PACKAGES.contains(&package)) {
        return Ok(());
    }
    Err(ValidationError::InvalidThermodynamicPackage {
        current: current.unwrap_or("None").to_string(),
    })
}

fn check_reflux_ratios(flowsheet: &Flowsheet) -> Result<(), ValidationError> {
    for column in flowsheet
        .objects()
        .iter()
        .filter(|object| object.kind() == ObjectKind::DistillationColumn)
    {
        if let Some(ratio) = column.number_property("Reflux Ratio")
            && ratio <= 0.0
        {
            return Err(ValidationError::NonPositiveRefluxRatio {
                column: column.name().to_string(),
            });
        }
    }
    Ok(())
}

/// A heater is only checked when its inlet, outlet and duty are fully
/// configured and both endpoints resolve to streams with numeric
/// temperatures; anything else is treated as not-yet-specified and skipped.
fn check_heater_consistency(flowsheet: &Flowsheet) -> Result<(), ValidationError> {
    for heater in flowsheet
        .objects()
        .iter()
        .filter(|object| object.kind() == ObjectKind::Heater)
    {
        let (Some(inlet_name), Some(outlet_name), Some(duty)) = (
            heater.text_property("Inlet"),
            heater.text_property("Outlet"),
            heater.number_property("Duty"),
        ) else {
            continue;
        };
        let (Some(inlet), Some(outlet)) = (
            flowsheet.stream(inlet_name),
            flowsheet.stream(outlet_name),
        ) else {
            continue;
        };
        let (Some(inlet_temperature), Some(outlet_temperature)) = (
            inlet.number_property("Temperature"),
            outlet.number_property("Temperature"),
        ) else {
            continue;
        };

        if outlet_temperature <= inlet_temperature && duty > 0.0 {
            return Err(ValidationError::UnachievableHeating {
                heater: heater.name().to_string(),
                outlet_temperature,
                inlet_temperature,
                duty,
            });
        }
        if outlet_temperature > inlet_temperature && duty < 0.0 {
            return Err(ValidationError::UnachievableCooling {
                heater: heater.name().to_string(),
                outlet_temperature,
                inlet_temperature,
                duty,
            });
        }
    }
    Ok(())
}
