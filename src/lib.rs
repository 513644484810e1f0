pub mod core;
pub mod input;
pub mod output;
pub mod simulation_time;

pub use crate::core::aggregate::{annual_totals, AnnualTotals};
pub use crate::core::engine::{HourlyBalance, HourlyResult, OperatingMode};
pub use crate::core::water_demand::{demand_for_hour, HourlyDemand};
pub use crate::input::{ingest_project, Project, System};
pub use crate::output::{FileOutput, Output, SinkOutput};

use crate::core::climate::ClimateTable;
use crate::output::write_hourly_results;
use std::io::Read;
use tracing::info;

/// One simulated system configuration: the ordered hourly sequence and
/// its annual reduction.
#[derive(Clone, Debug)]
pub struct SystemRun {
    pub hourly: Vec<HourlyResult>,
    pub annual: AnnualTotals,
}

/// Both runs of a project, compared downstream on annual cost.
#[derive(Clone, Debug)]
pub struct ProjectResults {
    pub existing: SystemRun,
    pub proposed: SystemRun,
}

impl ProjectResults {
    /// Annual saving of the proposed configuration over the existing
    /// one; negative when the proposal costs more to run.
    pub fn annual_cost_saving(&self) -> f64 {
        self.existing.annual.cost - self.proposed.annual.cost
    }
}

/// Parse a project document, simulate the existing and proposed systems
/// over a whole year each, write the per-system hourly CSVs and return
/// both result sets.
pub fn run_project(input: impl Read, output: impl Output) -> anyhow::Result<ProjectResults> {
    let project = ingest_project(input)?;
    let climate = project.climate.resolve()?;

    let existing = run_system(&project, &climate, &project.existing_system);
    let proposed = run_system(&project, &climate, &project.proposed_system);

    write_hourly_results(&output, "existing", &existing.hourly)?;
    write_hourly_results(&output, "proposed", &proposed.hourly)?;

    info!(
        existing_cost = existing.annual.cost,
        proposed_cost = proposed.annual.cost,
        "completed project run"
    );

    Ok(ProjectResults { existing, proposed })
}

/// Simulate one system configuration of a project.
pub fn run_system(project: &Project, climate: &ClimateTable, system: &System) -> SystemRun {
    let hourly = HourlyBalance::new(&project.activities, climate, project.energy, system).run();
    let annual = annual_totals(&hourly);
    SystemRun { hourly, annual }
}
