use crate::core::engine::HourlyResult;
use serde::Serialize;
use std::iter::Sum;
use std::ops::Add;

/// Annual totals over a sequence of hourly records.
///
/// A pure summation: associative and commutative, so totals over two
/// slices of a run add up to the totals over the whole run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct AnnualTotals {
    pub electricity_kwh: f64,
    pub gas_kwh: f64,
    pub solar_kwh: f64,
    pub demand_kwh: f64,
    pub cost: f64,
}

impl From<&HourlyResult> for AnnualTotals {
    fn from(result: &HourlyResult) -> Self {
        Self {
            electricity_kwh: result.electricity_kwh,
            gas_kwh: result.gas_kwh,
            solar_kwh: result.solar_kwh,
            demand_kwh: result.demand_kwh,
            cost: result.cost,
        }
    }
}

impl Add for AnnualTotals {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            electricity_kwh: self.electricity_kwh + other.electricity_kwh,
            gas_kwh: self.gas_kwh + other.gas_kwh,
            solar_kwh: self.solar_kwh + other.solar_kwh,
            demand_kwh: self.demand_kwh + other.demand_kwh,
            cost: self.cost + other.cost,
        }
    }
}

impl Sum for AnnualTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Reduce an ordered sequence of hourly records to annual totals.
pub fn annual_totals(results: &[HourlyResult]) -> AnnualTotals {
    results.iter().map(AnnualTotals::from).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn result_with(hour: usize, electricity: f64, gas: f64, cost: f64) -> HourlyResult {
        HourlyResult {
            hour,
            day_of_week: (hour / 24 % 7) as u32,
            demand_litres: 10.,
            demand_kwh: 0.25,
            temp_required: 45.,
            temp_delivered: 45.,
            temp_tank: 46.,
            electricity_kwh: electricity,
            gas_kwh: gas,
            solar_kwh: 0.5,
            cost,
        }
    }

    #[fixture]
    fn results() -> Vec<HourlyResult> {
        (0..240)
            .map(|hour| {
                result_with(
                    hour,
                    0.125 * (hour % 4) as f64,
                    0.25 * (hour % 3) as f64,
                    0.0625 * (hour % 5) as f64,
                )
            })
            .collect()
    }

    #[rstest]
    fn should_sum_every_vector(results: Vec<HourlyResult>) {
        let totals = annual_totals(&results);
        // 240 hours: electricity cycles 0,.125,.25,.375; gas 0,.25,.5
        assert_relative_eq!(totals.electricity_kwh, 60. * 0.75);
        assert_relative_eq!(totals.gas_kwh, 80. * 0.75);
        assert_relative_eq!(totals.solar_kwh, 120.);
        assert_relative_eq!(totals.demand_kwh, 60.);
        assert_relative_eq!(totals.cost, 48. * 0.625);
    }

    #[rstest]
    fn empty_sequence_sums_to_zero() {
        assert_eq!(annual_totals(&[]), AnnualTotals::default());
    }

    #[rstest]
    #[case(1)]
    #[case(120)]
    #[case(239)]
    fn totals_are_additive_at_any_split(results: Vec<HourlyResult>, #[case] split: usize) {
        let whole = annual_totals(&results);
        let (head, tail) = results.split_at(split);
        let recombined = annual_totals(head) + annual_totals(tail);
        assert_relative_eq!(whole.electricity_kwh, recombined.electricity_kwh);
        assert_relative_eq!(whole.gas_kwh, recombined.gas_kwh);
        assert_relative_eq!(whole.solar_kwh, recombined.solar_kwh);
        assert_relative_eq!(whole.demand_kwh, recombined.demand_kwh);
        assert_relative_eq!(whole.cost, recombined.cost);
    }
}
