//! PV lifecycle calculator entry point: CLI wiring and scenario loading.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser};
use indexmap::IndexMap;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use pv_lifecycle::config::ScenarioConfig;
use pv_lifecycle::io::export::{export_series_csv, write_json};
use pv_lifecycle::io::profile::load_profiles;
use pv_lifecycle::model::{
    BuildingProfiles, EconomicParameters, MultiUserAllocator, calculate_lifecycle,
};
use pv_lifecycle::profiles::synthetic_year;

/// Lifecycle economics (LCOE, NPV) of a rooftop PV system.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct CliArgs {
    #[command(flatten)]
    source: ScenarioSource,

    /// Hourly consumption/generation CSV, overriding the scenario's data path.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Writes the per-year series as CSV (single-building runs).
    #[arg(long)]
    series_out: Option<PathBuf>,

    /// Prints results as JSON instead of a text report.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Increases log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Args, Clone, Default, Debug)]
#[group(required = false, multiple = false)]
struct ScenarioSource {
    /// Loads the scenario from a TOML file.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Uses a built-in preset (residential, commercial, shared).
    #[arg(long)]
    preset: Option<String>,
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn load_scenario(source: &ScenarioSource) -> anyhow::Result<ScenarioConfig> {
    let scenario = match (&source.scenario, &source.preset) {
        (Some(path), _) => ScenarioConfig::from_toml_file(path)?,
        (None, Some(name)) => ScenarioConfig::from_preset(name)?,
        (None, None) => ScenarioConfig::residential(),
    };

    let errors = scenario.validate();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("{}", messages.join("\n"));
    }
    Ok(scenario)
}

fn load_input(
    scenario: &ScenarioConfig,
    params: &EconomicParameters,
    data_override: Option<PathBuf>,
) -> anyhow::Result<BuildingProfiles> {
    let data = &scenario.data;
    match data_override.or_else(|| data.path.clone()) {
        Some(path) => load_profiles(&path, &data.columns())
            .with_context(|| format!("failed to load hourly data from {}", path.display())),
        None => {
            info!(seed = data.seed, "no data file given, using synthetic profiles");
            Ok(synthetic_year(params.capacity_kw, data.base_load_kw, data.seed))
        }
    }
}

fn run_single(
    params: &EconomicParameters,
    profiles: &BuildingProfiles,
    args: &CliArgs,
) -> anyhow::Result<()> {
    let result = calculate_lifecycle(params, &profiles.consumption, &profiles.generation)
        .context("lifecycle calculation failed")?;

    if args.json {
        write_json(&result, io::stdout().lock())?;
    } else {
        println!("{result}");
    }

    if let Some(path) = &args.series_out {
        export_series_csv(&result.years, path)
            .with_context(|| format!("failed to write series to {}", path.display()))?;
        eprintln!("Series written to {}", path.display());
    }
    Ok(())
}

fn run_shared(
    scenario: &ScenarioConfig,
    params: &EconomicParameters,
    profiles: &BuildingProfiles,
    args: &CliArgs,
) -> anyhow::Result<()> {
    if args.series_out.is_some() {
        bail!("--series-out is only available for single-building scenarios");
    }

    let allocator = MultiUserAllocator::new(params, &profiles.consumption, &profiles.generation);
    let results = allocator
        .allocate(scenario.users.iter().map(|u| (u.id.as_str(), u.share())))
        .context("multi-user allocation failed")?;

    if args.json {
        let mut out = IndexMap::new();
        for (id, outcome) in &results {
            let value = match outcome {
                Ok(r) => serde_json::to_value(r)?,
                Err(e) => serde_json::json!({ "error": e.to_string() }),
            };
            out.insert(id.as_str(), value);
        }
        write_json(&out, io::stdout().lock())?;
    } else {
        for (id, outcome) in &results {
            match outcome {
                Ok(r) => println!("User {id}\n{r}\n"),
                Err(e) => println!("User {id}\nerror: {e}\n"),
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(args.verbose))
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting tracing subscriber failed")?;

    let scenario = load_scenario(&args.source)?;
    let params = scenario.parameters()?;
    let profiles = load_input(&scenario, &params, args.data.clone())?;

    if scenario.is_shared() {
        run_shared(&scenario, &params, &profiles, &args)
    } else {
        run_single(&params, &profiles, &args)
    }
}
