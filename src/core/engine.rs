use crate::core::climate::{ClimateTable, MonthlyClimate};
use crate::core::equipment::{Equipment, FuelUse};
use crate::core::water_demand::{demand_for_hour, HourlyDemand};
use crate::core::water_properties::WATER;
use crate::input::{Activity, EnergyPrices, System};
use crate::simulation_time::{SimulationHour, SimulationTime};
use itertools::Itertools;
use serde::Serialize;
use std::f64::consts::PI;
use tracing::debug;

/// Mains cold water temperature, deg C. Delivery below this counts as
/// no heating at all.
pub const COLD_WATER_TEMP: f64 = 15.;
/// Tank/delivery temperature at the start of a run, deg C.
pub const INITIAL_TANK_TEMP: f64 = 45.;
/// Bounds the buffered tank temperature is clamped to after each hour.
pub const TANK_TEMP_MIN: f64 = 15.;
pub const TANK_TEMP_MAX: f64 = 95.;
/// Sum of the half-sine hourly availability factors over one day;
/// dividing a daily radiation total by it makes the hourly gains add
/// back up to the daily total.
pub const SOLAR_DAILY_TO_HOURLY: f64 = 7.63;
/// How far below the required temperature a unit may top out and still
/// qualify for instantaneous dispatch, in K.
const INSTANT_DISPATCH_TOLERANCE: f64 = 2.;

/// One emitted record per hour of the modeled year. Never mutated after
/// creation; downstream aggregation and reporting read it as-is.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HourlyResult {
    pub hour: usize,
    pub day_of_week: u32,
    /// Terminal demand, litres.
    pub demand_litres: f64,
    /// Energy content of the terminal demand above cold water, kWh.
    pub demand_kwh: f64,
    pub temp_required: f64,
    pub temp_delivered: f64,
    /// Tank temperature (storage mode) or delivery temperature
    /// (instantaneous mode) at the end of the hour.
    pub temp_tank: f64,
    pub electricity_kwh: f64,
    pub gas_kwh: f64,
    pub solar_kwh: f64,
    pub cost: f64,
}

/// How the hour-to-hour state scalar is interpreted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OperatingMode {
    /// Buffered tank: `mass` litres of thermal mass with a static loss
    /// coefficient in W/K.
    Storage { mass: f64, loss_factor: f64 },
    /// Tankless production sized against each hour's draw; the state
    /// scalar is just the last delivery temperature.
    Instantaneous,
}

impl OperatingMode {
    fn for_system(system: &System) -> Self {
        if system.has_storage {
            let storage = system.storage.unwrap_or_default();
            OperatingMode::Storage {
                // zero or absent volume would make the thermal mass
                // degenerate; 1 litre keeps the balance defined
                mass: if storage.volume > 0. { storage.volume } else { 1. },
                loss_factor: storage.loss_factor,
            }
        } else {
            OperatingMode::Instantaneous
        }
    }
}

/// The hourly thermal/economic balance for one system configuration.
///
/// A run is a fold of 8,760 steps over a single temperature scalar;
/// each step depends on the previous hour's ending state, so the loop
/// is inherently sequential. Running two configurations concurrently is
/// fine - each run owns its own state.
#[derive(Debug)]
pub struct HourlyBalance<'a> {
    activities: &'a [Activity],
    climate: &'a ClimateTable,
    prices: EnergyPrices,
    system: &'a System,
    mode: OperatingMode,
}

impl<'a> HourlyBalance<'a> {
    pub fn new(
        activities: &'a [Activity],
        climate: &'a ClimateTable,
        prices: EnergyPrices,
        system: &'a System,
    ) -> Self {
        Self {
            activities,
            climate,
            prices,
            system,
            mode: OperatingMode::for_system(system),
        }
    }

    pub fn operating_mode(&self) -> OperatingMode {
        self.mode
    }

    /// Run the full year and emit the ordered hourly sequence.
    pub fn run(&self) -> Vec<HourlyResult> {
        let mut tank_temp = INITIAL_TANK_TEMP;
        let results: Vec<HourlyResult> = SimulationTime::whole_year()
            .iter()
            .map(|hour| self.step(&mut tank_temp, hour))
            .collect();
        debug!(
            system = %self.system.name,
            final_tank_temp = tank_temp,
            "completed annual balance run"
        );
        results
    }

    fn step(&self, tank_temp: &mut f64, hour: SimulationHour) -> HourlyResult {
        let climate = self.climate.month(hour.month());
        let demand = demand_for_hour(self.activities, hour.day_of_week(), hour.hour_of_day());

        let (fuel, solar_kwh, temp_delivered) = match self.mode {
            OperatingMode::Instantaneous => self.instantaneous_hour(tank_temp, &demand, &climate),
            OperatingMode::Storage { mass, loss_factor } => {
                self.storage_hour(tank_temp, mass, loss_factor, &demand, &climate, hour)
            }
        };

        HourlyResult {
            hour: hour.index,
            day_of_week: hour.day_of_week(),
            demand_litres: demand.volume,
            demand_kwh: WATER
                .heating_energy_kwh(demand.volume, demand.temp_required - COLD_WATER_TEMP)
                .max(0.),
            temp_required: demand.temp_required,
            temp_delivered,
            temp_tank: *tank_temp,
            electricity_kwh: fuel.electricity,
            gas_kwh: fuel.gas,
            solar_kwh,
            cost: fuel.electricity * self.prices.electricity_price
                + fuel.gas * self.prices.gas_price,
        }
    }

    /// Equipment in fixed dispatch order (HP, electric tank, boiler,
    /// heater); solar is excluded. Configuration order breaks ties.
    fn dispatchable(&self) -> impl Iterator<Item = &Equipment> {
        self.system
            .equipments
            .iter()
            .filter(|equipment| equipment.dispatch_priority().is_some())
            .sorted_by_key(|equipment| equipment.dispatch_priority())
    }

    /// Tankless production: size the hour's output against the draw
    /// itself and overwrite the state scalar with the delivery
    /// temperature.
    fn instantaneous_hour(
        &self,
        tank_temp: &mut f64,
        demand: &HourlyDemand,
        climate: &MonthlyClimate,
    ) -> (FuelUse, f64, f64) {
        let (fuel, temp_delivered) = if demand.volume > 0. {
            let energy_required =
                WATER.heating_energy_kwh(demand.volume, demand.temp_required - COLD_WATER_TEMP);

            // sequential fold: each unit sees what earlier units already provided
            let (provided, fuel) = self.dispatchable().fold(
                (0., FuelUse::default()),
                |(provided, fuel), equipment| {
                    let remaining = energy_required - provided;
                    if remaining <= 0.
                        || equipment.max_output_temp()
                            < demand.temp_required - INSTANT_DISPATCH_TOLERANCE
                    {
                        return (provided, fuel);
                    }
                    let contribution = equipment.power().min(remaining);
                    (
                        provided + contribution,
                        fuel + equipment.fuel_use(
                            contribution,
                            demand.temp_required,
                            climate.temp,
                        ),
                    )
                },
            );

            let mut temp_delivered =
                COLD_WATER_TEMP + WATER.temperature_rise(demand.volume, provided);
            if self.system.has_mixing_valve {
                temp_delivered = temp_delivered.min(demand.temp_required);
            }
            (fuel, temp_delivered)
        } else {
            (FuelUse::default(), COLD_WATER_TEMP)
        };

        *tank_temp = temp_delivered;
        (fuel, 0., temp_delivered)
    }

    /// Buffered tank: auxiliary heating towards the safety setpoint,
    /// then solar gain, static losses, extraction and clamping.
    fn storage_hour(
        &self,
        tank_temp: &mut f64,
        mass: f64,
        loss_factor: f64,
        demand: &HourlyDemand,
        climate: &MonthlyClimate,
        hour: SimulationHour,
    ) -> (FuelUse, f64, f64) {
        let solar_kwh = self.solar_gain(*tank_temp, mass, hour.hour_of_day(), climate.radiation);

        // the setpoint carries a margin over the required temperature
        // and a floor that keeps the tank out of the legionella range
        let setpoint = if self.system.has_mixing_valve {
            (demand.temp_required + 2.).max(55.)
        } else {
            (demand.temp_required + 1.).max(45.)
        };

        // sequential fold: each unit sees the tank already raised by
        // the units dispatched before it this hour
        let (mut temp, fuel) = self.dispatchable().fold(
            (*tank_temp, FuelUse::default()),
            |(temp, fuel), equipment| {
                let max_temp = equipment.max_output_temp();
                if temp >= max_temp || temp >= setpoint {
                    return (temp, fuel);
                }
                let target = setpoint.min(max_temp);
                let contribution = equipment
                    .power()
                    .min(WATER.heating_energy_kwh(mass, target - temp));
                if contribution <= 0. {
                    return (temp, fuel);
                }
                (
                    temp + WATER.temperature_rise(mass, contribution),
                    fuel + equipment.fuel_use(contribution, target, climate.temp),
                )
            },
        );

        // solar raises the tank after auxiliary dispatch
        temp += WATER.temperature_rise(mass, solar_kwh);

        // static standing loss towards ambient
        let loss_kwh = loss_factor * (temp - climate.temp).max(0.) / 1000.;
        temp -= WATER.temperature_rise(mass, loss_kwh);

        // extraction at the delivered temperature
        let temp_delivered = if self.system.has_mixing_valve {
            temp.min(demand.temp_required)
        } else {
            temp
        };
        let extracted_kwh = WATER.heating_energy_kwh(
            demand.volume,
            temp_delivered.max(COLD_WATER_TEMP) - COLD_WATER_TEMP,
        );
        temp -= WATER.temperature_rise(mass, extracted_kwh);

        *tank_temp = temp.clamp(TANK_TEMP_MIN, TANK_TEMP_MAX);
        (fuel, solar_kwh, temp_delivered)
    }

    /// Solar yield for the hour: the daily radiation total shaped by a
    /// half-sine daylight profile (zero before 06:00 and after 18:00,
    /// peak at noon), clamped so the gain cannot push the tank past the
    /// collector's stagnation limit.
    fn solar_gain(&self, tank_temp: f64, mass: f64, hour_of_day: u32, radiation: f64) -> f64 {
        let Some((area, optical_efficiency, max_temp)) =
            self.system.equipments.iter().find_map(|equipment| match equipment {
                Equipment::Solar {
                    area,
                    optical_efficiency,
                    ..
                } => Some((*area, *optical_efficiency, equipment.max_output_temp())),
                _ => None,
            })
        else {
            return 0.;
        };

        if tank_temp >= max_temp {
            return 0.;
        }

        let availability = ((hour_of_day as f64 - 6.) * PI / 12.).sin().max(0.);
        let gain = availability * radiation * area * optical_efficiency / SOLAR_DAILY_TO_HOURLY;
        let capacity_to_max = WATER.heating_energy_kwh(mass, max_temp - tank_temp);
        gain.min(capacity_to_max)
    }
}
