use crate::core::climate::{self, ClimateError, ClimateTable, MonthlyClimate};
use crate::core::equipment::Equipment;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Read};

/// Parse a project document from JSON and check its climate selection.
pub fn ingest_project(json: impl Read) -> anyhow::Result<Project> {
    let project: Project = serde_json::from_reader(BufReader::new(json))
        .context("project document could not be parsed")?;
    project
        .climate
        .resolve()
        .context("project climate configuration is invalid")?;
    Ok(project)
}

/// A project document: everything the surrounding application captures
/// that the simulation consumes. Immutable for the duration of a run.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub activities: Vec<Activity>,
    pub climate: ClimateChoice,
    pub energy: EnergyPrices,
    pub existing_system: System,
    pub proposed_system: System,
}

/// A scheduled water-use event. `volume` is the daily draw in litres,
/// distributed evenly over the listed hours of day on each active day.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Activity {
    #[serde(default)]
    pub name: String,
    pub volume: f64,
    pub temp_required: f64,
    #[serde(default)]
    pub hours: Vec<u32>,
    /// Days of week (0-6) the activity draws; absent means every day.
    #[serde(default)]
    pub active_days: Option<Vec<u32>>,
}

impl Activity {
    pub(crate) fn is_active_on(&self, day_of_week: u32) -> bool {
        self.active_days
            .as_ref()
            .map_or(true, |days| days.contains(&day_of_week))
    }
}

/// Per-unit energy tariffs, in currency per kWh.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct EnergyPrices {
    pub electricity_price: f64,
    pub gas_price: f64,
}

/// One of the two production system configurations of a project.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct System {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub equipments: Vec<Equipment>,
    #[serde(default)]
    pub storage: Option<StorageConfig>,
    /// When false the system produces instantaneously and `storage` is
    /// ignored.
    #[serde(default = "default_true")]
    pub has_storage: bool,
    /// Caps the delivered temperature at the requested temperature.
    #[serde(default)]
    pub has_mixing_valve: bool,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct StorageConfig {
    /// Tank volume in litres.
    pub volume: f64,
    /// Static loss coefficient in W/K.
    #[serde(default)]
    pub loss_factor: f64,
}

/// Climate source selection: a built-in district key or an inline
/// 12-row monthly table, exactly one of the two.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ClimateChoice {
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub custom_climate: Option<Vec<MonthlyClimate>>,
}

impl ClimateChoice {
    pub fn resolve(&self) -> Result<ClimateTable, ClimateError> {
        match (&self.district, &self.custom_climate) {
            (Some(key), None) => climate::district(key).cloned(),
            (None, Some(rows)) => ClimateTable::from_monthly_rows(rows.clone()),
            _ => Err(ClimateError::AmbiguousSource),
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::equipment::EquipmentKind;
    use pretty_assertions::assert_eq;
    use rstest::*;

    pub(crate) const PROJECT_JSON: &str = r#"{
        "activities": [
            {
                "name": "morning showers",
                "volume": 120.0,
                "tempRequired": 40.0,
                "hours": [7, 8],
                "activeDays": [0, 1, 2, 3, 4]
            },
            {
                "name": "kitchen",
                "volume": 30.0,
                "tempRequired": 50.0,
                "hours": [13, 20, 21]
            }
        ],
        "climate": { "district": "continental" },
        "energy": { "electricityPrice": 0.25, "gasPrice": 0.09 },
        "existingSystem": {
            "name": "gas boiler + tank",
            "equipments": [
                { "type": "BOILER", "name": "boiler", "power": 24.0, "efficiency": 0.85 }
            ],
            "storage": { "volume": 150.0, "lossFactor": 2.1 }
        },
        "proposedSystem": {
            "name": "heat pump + solar",
            "equipments": [
                { "type": "SOLAR", "name": "collectors", "area": 4.0, "opticalEfficiency": 0.72 },
                { "type": "HP", "name": "heat pump", "power": 3.0, "cop": 3.4, "maxOutputTemp": 55.0 }
            ],
            "storage": { "volume": 300.0, "lossFactor": 1.8 },
            "hasMixingValve": true
        }
    }"#;

    #[fixture]
    pub(crate) fn project() -> Project {
        ingest_project(PROJECT_JSON.as_bytes()).unwrap()
    }

    #[rstest]
    fn should_ingest_a_full_project_document(project: Project) {
        assert_eq!(project.activities.len(), 2);
        assert_eq!(project.activities[0].hours, vec![7, 8]);
        assert_eq!(project.energy.gas_price, 0.09);
        assert_eq!(project.existing_system.equipments.len(), 1);
        assert_eq!(
            project.proposed_system.equipments[1].kind(),
            EquipmentKind::HeatPump
        );
        assert_eq!(project.proposed_system.storage.unwrap().volume, 300.);
    }

    #[rstest]
    fn should_default_omitted_flags(project: Project) {
        // hasStorage defaults on, hasMixingValve defaults off
        assert!(project.existing_system.has_storage);
        assert!(!project.existing_system.has_mixing_valve);
        assert!(project.proposed_system.has_mixing_valve);
    }

    #[rstest]
    fn activity_without_active_days_runs_every_day(project: Project) {
        for day in 0..7 {
            assert!(project.activities[1].is_active_on(day));
        }
        assert!(!project.activities[0].is_active_on(5));
    }

    #[rstest]
    fn should_resolve_district_climate(project: Project) {
        let table = project.climate.resolve().unwrap();
        assert_eq!(table.month(0).temp, 3.1);
    }

    #[rstest]
    fn should_reject_climate_without_a_source() {
        let choice = ClimateChoice::default();
        assert_eq!(choice.resolve(), Err(ClimateError::AmbiguousSource));
    }

    #[rstest]
    fn should_reject_unknown_fields() {
        let json = r#"{ "volume": 10.0, "tempRequired": 40.0, "litresPerUse": 5.0 }"#;
        assert!(serde_json::from_str::<Activity>(json).is_err());
    }
}
