extern crate dhwsim;

use clap::Parser;
use dhwsim::{run_project, FileOutput, ProjectResults};
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct DhwSimArgs {
    /// Project document (JSON)
    input_file: String,
    /// Directory the per-system CSV files are written to; defaults to
    /// the input file's directory
    #[arg(long, short)]
    output_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let args = DhwSimArgs::parse();

    let input_file = args.input_file.as_str();
    let input_path = Path::new(input_file);
    let input_file_ext = input_path.extension().and_then(OsStr::to_str);
    let input_file_stem = match input_file_ext {
        Some(ext) => &input_file[..(input_file.len() - ext.len() - 1)],
        None => input_file,
    };
    let output_dir = args.output_dir.unwrap_or_else(|| {
        input_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    });
    let file_stem = Path::new(input_file_stem)
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or("results")
        .to_string();

    let output = FileOutput::new(output_dir, file_stem);
    let results = run_project(BufReader::new(File::open(input_path)?), output)?;

    print_annual_comparison(&results);

    Ok(())
}

fn print_annual_comparison(results: &ProjectResults) {
    println!("                          existing      proposed");
    for (label, existing, proposed) in [
        (
            "electricity [kWh]",
            results.existing.annual.electricity_kwh,
            results.proposed.annual.electricity_kwh,
        ),
        (
            "gas [kWh]",
            results.existing.annual.gas_kwh,
            results.proposed.annual.gas_kwh,
        ),
        (
            "solar gain [kWh]",
            results.existing.annual.solar_kwh,
            results.proposed.annual.solar_kwh,
        ),
        (
            "demand [kWh]",
            results.existing.annual.demand_kwh,
            results.proposed.annual.demand_kwh,
        ),
        (
            "cost [currency]",
            results.existing.annual.cost,
            results.proposed.annual.cost,
        ),
    ] {
        println!("{label:<22} {existing:>12.1} {proposed:>12.1}");
    }
    println!("annual cost saving: {:.2}", results.annual_cost_saving());
}
