use crate::core::engine::HourlyResult;
use std::fmt::Debug;
use std::fs::File;
use std::io;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Provides writers for the per-system result files of a run.
pub trait Output: Debug {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl Write>;
    /// Whether this output can be considered a no-op and therefore that any code that only writes to the output can be skipped.
    fn is_noop(&self) -> bool {
        false
    }
}

#[derive(Debug)]
pub struct FileOutput {
    directory_path: PathBuf,
    file_stem: String,
}

impl FileOutput {
    pub fn new(directory_path: PathBuf, file_stem: String) -> Self {
        Self {
            directory_path,
            file_stem,
        }
    }
}

impl Output for FileOutput {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl Write> {
        Ok(BufWriter::new(File::create(self.directory_path.join(
            format!("{}_{location_key}.csv", self.file_stem),
        ))?))
    }
}

impl Output for &FileOutput {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl Write> {
        <FileOutput as Output>::writer_for_location_key(self, location_key)
    }
}

/// An output that goes to nowhere/ a "sink"/ /dev/null.
#[derive(Debug, Default)]
pub struct SinkOutput;

impl Output for SinkOutput {
    fn writer_for_location_key(&self, _location_key: &str) -> anyhow::Result<impl Write> {
        Ok(io::sink())
    }

    fn is_noop(&self) -> bool {
        true
    }
}

const HEADINGS: [&str; 11] = [
    "Hour",
    "Day of week",
    "Hot water demand",
    "Hot water energy demand",
    "Required temp",
    "Delivered temp",
    "Tank temp",
    "Electricity consumed",
    "Gas consumed",
    "Solar gain",
    "Cost",
];

const UNITS_ROW: [&str; 11] = [
    "[count]",
    "[0-6]",
    "[litres]",
    "[kWh]",
    "[deg C]",
    "[deg C]",
    "[deg C]",
    "[kWh]",
    "[kWh]",
    "[kWh]",
    "[currency]",
];

/// Write the hourly sequence for one system as CSV: a headings row, a
/// units row, then one row per hour.
pub fn write_hourly_results(
    output: &impl Output,
    location_key: &str,
    results: &[HourlyResult],
) -> anyhow::Result<()> {
    if output.is_noop() {
        return Ok(());
    }
    let writer = output.writer_for_location_key(location_key)?;
    write_hourly_results_to(writer, results)
}

fn write_hourly_results_to(writer: impl Write, results: &[HourlyResult]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(HEADINGS)?;
    writer.write_record(UNITS_ROW)?;

    for result in results {
        writer.write_record([
            result.hour.to_string(),
            result.day_of_week.to_string(),
            result.demand_litres.to_string(),
            result.demand_kwh.to_string(),
            result.temp_required.to_string(),
            result.temp_delivered.to_string(),
            result.temp_tank.to_string(),
            result.electricity_kwh.to_string(),
            result.gas_kwh.to_string(),
            result.solar_kwh.to_string(),
            result.cost.to_string(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn results() -> Vec<HourlyResult> {
        vec![
            HourlyResult {
                hour: 0,
                day_of_week: 0,
                demand_litres: 0.,
                demand_kwh: 0.,
                temp_required: 0.,
                temp_delivered: 15.,
                temp_tank: 45.,
                electricity_kwh: 0.,
                gas_kwh: 0.,
                solar_kwh: 0.,
                cost: 0.,
            },
            HourlyResult {
                hour: 1,
                day_of_week: 0,
                demand_litres: 60.,
                demand_kwh: 1.745,
                temp_required: 40.,
                temp_delivered: 40.,
                temp_tank: 52.5,
                electricity_kwh: 0.5,
                gas_kwh: 0.25,
                solar_kwh: 0.1,
                cost: 0.1475,
            },
        ]
    }

    #[rstest]
    fn should_write_headings_units_and_one_row_per_hour(results: Vec<HourlyResult>) {
        let mut buffer = Vec::new();
        write_hourly_results_to(&mut buffer, &results).unwrap();
        let written = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = written.trim_end().lines().collect();
        assert_eq!(lines.len(), 2 + results.len());
        assert!(lines[0].starts_with("Hour,Day of week,Hot water demand"));
        assert_eq!(lines[1].split(',').count(), HEADINGS.len());
        assert!(lines[3].starts_with("1,0,60,1.745,40,40,52.5,0.5,0.25,0.1,"));
    }

    #[rstest]
    fn sink_output_skips_writing(results: Vec<HourlyResult>) {
        assert!(write_hourly_results(&SinkOutput, "existing", &results).is_ok());
    }
}
