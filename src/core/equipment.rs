use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};
use strum_macros::{Display, EnumIter};

/// Default maximum output temperature for dispatchable units, deg C.
pub const DEFAULT_MAX_OUTPUT_TEMP: f64 = 60.;
/// Default stagnation limit for solar collectors, deg C.
pub const DEFAULT_SOLAR_MAX_OUTPUT_TEMP: f64 = 80.;
/// Default conversion efficiency of an electric storage heater element.
pub const DEFAULT_ELECTRIC_TANK_EFFICIENCY: f64 = 0.98;
/// Fallback combustion efficiency in the dispatch conversion path.
/// The general default used for configured units elsewhere is 0.85; the
/// dispatch fallback has always been 0.88 and is kept as the literal
/// value (see DESIGN.md).
pub const DEFAULT_GAS_EFFICIENCY: f64 = 0.88;
/// Floor on the temperature-corrected heat pump COP.
pub const MIN_COP: f64 = 1.5;

const COP_AMBIENT_DERATE_PER_K: f64 = 0.03;
const COP_TARGET_DERATE_PER_K: f64 = 0.015;

/// Dispatch order for auxiliary heating within one hour. Earlier units
/// see the tank before later units have raised it.
pub const DISPATCH_PRIORITY: [EquipmentKind; 4] = [
    EquipmentKind::HeatPump,
    EquipmentKind::ElectricTank,
    EquipmentKind::Boiler,
    EquipmentKind::Heater,
];

#[derive(Clone, Copy, Debug, Display, EnumIter, Eq, Hash, PartialEq)]
pub enum EquipmentKind {
    #[strum(serialize = "HP")]
    HeatPump,
    #[strum(serialize = "ELECTRIC_TANK")]
    ElectricTank,
    #[strum(serialize = "BOILER")]
    Boiler,
    #[strum(serialize = "HEATER")]
    Heater,
    #[strum(serialize = "SOLAR")]
    Solar,
}

/// A heating/production unit of a system configuration.
///
/// A closed set of five kinds with kind-specific parameters; adding a
/// kind is a compile-checked change to every exhaustive match below.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", deny_unknown_fields, rename_all_fields = "camelCase")]
pub enum Equipment {
    #[serde(rename = "HP")]
    HeatPump {
        name: String,
        /// Thermal output, kW.
        power: f64,
        /// Nominal coefficient of performance at rating conditions.
        cop: f64,
        max_output_temp: Option<f64>,
    },
    #[serde(rename = "ELECTRIC_TANK")]
    ElectricTank {
        name: String,
        power: f64,
        efficiency: Option<f64>,
        max_output_temp: Option<f64>,
    },
    #[serde(rename = "BOILER")]
    Boiler {
        name: String,
        power: f64,
        efficiency: Option<f64>,
        max_output_temp: Option<f64>,
    },
    #[serde(rename = "HEATER")]
    Heater {
        name: String,
        power: f64,
        efficiency: Option<f64>,
        max_output_temp: Option<f64>,
    },
    #[serde(rename = "SOLAR")]
    Solar {
        name: String,
        /// Collector aperture area, m2.
        area: f64,
        optical_efficiency: f64,
        max_output_temp: Option<f64>,
    },
}

impl Equipment {
    pub fn name(&self) -> &str {
        match self {
            Equipment::HeatPump { name, .. }
            | Equipment::ElectricTank { name, .. }
            | Equipment::Boiler { name, .. }
            | Equipment::Heater { name, .. }
            | Equipment::Solar { name, .. } => name,
        }
    }

    pub fn kind(&self) -> EquipmentKind {
        match self {
            Equipment::HeatPump { .. } => EquipmentKind::HeatPump,
            Equipment::ElectricTank { .. } => EquipmentKind::ElectricTank,
            Equipment::Boiler { .. } => EquipmentKind::Boiler,
            Equipment::Heater { .. } => EquipmentKind::Heater,
            Equipment::Solar { .. } => EquipmentKind::Solar,
        }
    }

    /// Thermal output available in one hour, in kWh. Solar units do not
    /// dispatch; their yield is the engine's solar-gain term.
    pub fn power(&self) -> f64 {
        match self {
            Equipment::HeatPump { power, .. }
            | Equipment::ElectricTank { power, .. }
            | Equipment::Boiler { power, .. }
            | Equipment::Heater { power, .. } => *power,
            Equipment::Solar { .. } => 0.,
        }
    }

    /// Maximum temperature the unit can usefully serve, with the
    /// kind-specific default applied.
    pub fn max_output_temp(&self) -> f64 {
        match self {
            Equipment::HeatPump {
                max_output_temp, ..
            }
            | Equipment::ElectricTank {
                max_output_temp, ..
            }
            | Equipment::Boiler {
                max_output_temp, ..
            }
            | Equipment::Heater {
                max_output_temp, ..
            } => max_output_temp.unwrap_or(DEFAULT_MAX_OUTPUT_TEMP),
            Equipment::Solar {
                max_output_temp, ..
            } => max_output_temp.unwrap_or(DEFAULT_SOLAR_MAX_OUTPUT_TEMP),
        }
    }

    /// Position in the fixed dispatch order; None for solar, which is
    /// never dispatched.
    pub fn dispatch_priority(&self) -> Option<usize> {
        DISPATCH_PRIORITY.iter().position(|kind| *kind == self.kind())
    }

    /// Fuel drawn to deliver `heat_kwh` of useful heat towards
    /// `target_temp` with outdoor air at `ambient_temp`.
    pub fn fuel_use(&self, heat_kwh: f64, target_temp: f64, ambient_temp: f64) -> FuelUse {
        match self {
            Equipment::HeatPump { cop, .. } => FuelUse {
                electricity: heat_kwh / dynamic_cop(*cop, ambient_temp, target_temp),
                gas: 0.,
            },
            Equipment::ElectricTank { efficiency, .. } => FuelUse {
                electricity: heat_kwh / efficiency.unwrap_or(DEFAULT_ELECTRIC_TANK_EFFICIENCY),
                gas: 0.,
            },
            Equipment::Boiler { efficiency, .. } | Equipment::Heater { efficiency, .. } => {
                FuelUse {
                    electricity: 0.,
                    gas: heat_kwh / efficiency.unwrap_or(DEFAULT_GAS_EFFICIENCY),
                }
            }
            Equipment::Solar { .. } => FuelUse::default(),
        }
    }
}

/// De-rate a heat pump's nominal COP for the hour's outdoor temperature
/// and the effective target temperature, floored at [`MIN_COP`].
pub fn dynamic_cop(nominal_cop: f64, ambient_temp: f64, target_temp: f64) -> f64 {
    let corrected = nominal_cop
        * (1. + (ambient_temp - 20.) * COP_AMBIENT_DERATE_PER_K)
        * (1. - (target_temp - 45.) * COP_TARGET_DERATE_PER_K);
    corrected.max(MIN_COP)
}

/// Electricity and gas drawn over some span, in kWh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FuelUse {
    pub electricity: f64,
    pub gas: f64,
}

impl Add for FuelUse {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            electricity: self.electricity + other.electricity,
            gas: self.gas + other.gas,
        }
    }
}

impl AddAssign for FuelUse {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}
