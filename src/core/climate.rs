use crate::core::units::MONTHS_PER_YEAR;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

/// Monthly averaged outdoor conditions the engine samples once per hour.
///
/// `radiation` is the mean daily solar radiation on the collector plane
/// in kWh/m2; the engine spreads it over daylight hours itself.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MonthlyClimate {
    pub temp: f64,
    pub radiation: f64,
}

/// A 12-entry monthly climate table, January first.
#[derive(Clone, Debug, PartialEq)]
pub struct ClimateTable {
    months: [MonthlyClimate; MONTHS_PER_YEAR],
}

impl ClimateTable {
    pub fn new(months: [MonthlyClimate; MONTHS_PER_YEAR]) -> Self {
        Self { months }
    }

    pub fn from_monthly_rows(rows: Vec<MonthlyClimate>) -> Result<Self, ClimateError> {
        let row_count = rows.len();
        let months: [MonthlyClimate; MONTHS_PER_YEAR] = rows
            .try_into()
            .map_err(|_| ClimateError::WrongTableLength(row_count))?;
        Ok(Self { months })
    }

    pub fn month(&self, month_index: usize) -> MonthlyClimate {
        self.months[month_index.min(MONTHS_PER_YEAR - 1)]
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ClimateError {
    #[error("unknown climate district '{0}'")]
    UnknownDistrict(String),
    #[error("a custom climate table must have 12 monthly rows, got {0}")]
    WrongTableLength(usize),
    #[error("exactly one of a climate district or a custom climate table must be configured")]
    AmbiguousSource,
}

/// Look up one of the built-in district tables by key.
pub fn district(key: &str) -> Result<&'static ClimateTable, ClimateError> {
    DISTRICTS
        .get(key)
        .ok_or_else(|| ClimateError::UnknownDistrict(key.to_string()))
}

pub fn district_keys() -> impl Iterator<Item = &'static str> {
    DISTRICTS.keys().copied()
}

macro_rules! climate_table {
    ($(($temp:expr, $radiation:expr)),+ $(,)?) => {
        ClimateTable::new([
            $(MonthlyClimate { temp: $temp, radiation: $radiation }),+
        ])
    };
}

/// Climate tables shipped with the application for sites without a
/// measured monthly series. Temperatures are monthly mean outdoor air
/// temperatures in deg C, radiation in kWh/m2 per day on the collector
/// plane.
pub static DISTRICTS: LazyLock<IndexMap<&'static str, ClimateTable>> = LazyLock::new(|| {
    IndexMap::from([
        (
            "oceanic",
            climate_table![
                (8.6, 1.1),
                (8.8, 1.8),
                (10.5, 2.9),
                (11.9, 4.0),
                (14.5, 4.9),
                (17.0, 5.4),
                (19.0, 5.5),
                (19.4, 4.8),
                (18.0, 3.7),
                (15.3, 2.3),
                (11.6, 1.3),
                (9.3, 0.9),
            ],
        ),
        (
            "continental",
            climate_table![
                (3.1, 1.6),
                (4.8, 2.5),
                (8.1, 3.9),
                (10.7, 4.8),
                (14.8, 5.8),
                (19.5, 6.6),
                (22.8, 7.0),
                (22.4, 6.2),
                (18.6, 4.8),
                (13.0, 3.0),
                (7.2, 1.9),
                (4.0, 1.4),
            ],
        ),
        (
            "mediterranean",
            climate_table![
                (9.9, 2.4),
                (10.8, 3.2),
                (12.7, 4.5),
                (14.6, 5.4),
                (18.1, 6.4),
                (22.0, 7.1),
                (24.9, 7.4),
                (25.2, 6.5),
                (22.4, 5.1),
                (18.2, 3.7),
                (13.6, 2.6),
                (10.6, 2.1),
            ],
        ),
        (
            "mountain",
            climate_table![
                (-0.6, 1.9),
                (0.5, 2.8),
                (3.8, 4.2),
                (6.2, 5.0),
                (10.5, 5.9),
                (14.9, 6.7),
                (17.8, 7.2),
                (17.5, 6.3),
                (13.9, 5.0),
                (9.0, 3.3),
                (3.7, 2.2),
                (0.3, 1.7),
            ],
        ),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn should_look_up_known_districts() {
        for key in ["oceanic", "continental", "mediterranean", "mountain"] {
            assert!(district(key).is_ok(), "district {key} should exist");
        }
        assert_eq!(district("continental").unwrap().month(6).temp, 22.8);
    }

    #[rstest]
    fn should_reject_unknown_district() {
        assert_eq!(
            district("tropical"),
            Err(ClimateError::UnknownDistrict("tropical".to_string()))
        );
    }

    #[rstest]
    fn should_reject_short_custom_table() {
        let rows = vec![
            MonthlyClimate {
                temp: 10.,
                radiation: 3.,
            };
            7
        ];
        assert_eq!(
            ClimateTable::from_monthly_rows(rows),
            Err(ClimateError::WrongTableLength(7))
        );
    }

    #[rstest]
    fn month_lookup_is_clamped() {
        let table = district("oceanic").unwrap();
        assert_eq!(table.month(27), table.month(11));
    }
}
