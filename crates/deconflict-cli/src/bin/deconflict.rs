//! Detect, and optionally resolve, conflicts between a primary mission and
//! the surrounding traffic.
//!
//! Usage:
//!   cargo run -p deconflict-cli --bin deconflict -- --case mission_data/test_case1 --reroute
//!   cargo run -p deconflict-cli --bin deconflict -- --scenario crossing --reroute --output updated_paths.txt

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use deconflict_cli::sim::{
    create_converging_scenario, create_crossing_scenario, create_parallel_scenario,
};
use deconflict_cli::Config;
use deconflict_core::mission::{load_fleet, load_test_case, load_trajectory};
use deconflict_core::report::{format_conflict, write_updated_paths};
use deconflict_core::{
    Comparison, Conflict, DeconflictConfig, Deconflictor, Fleet, MissionStatus, TimeMode,
    Trajectory, UnresolvedWaypoint,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Built-in demo missions
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScenarioType {
    /// One drone crossing the primary's path
    Crossing,
    /// Two drones flying parallel paths
    Parallel,
    /// Four drones converging on the center
    Converging,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ComparisonArg {
    /// distance < threshold is a conflict
    Strict,
    /// distance <= threshold is a conflict
    Inclusive,
}

/// UAV strategic deconfliction
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Test-case directory with primary_mission.json, droneA.json and droneB.json
    #[arg(long, conflicts_with_all = ["primary", "scenario"])]
    case: Option<PathBuf>,

    /// Primary mission file
    #[arg(long, conflicts_with = "scenario")]
    primary: Option<PathBuf>,

    /// Other vehicle as NAME=FILE (repeatable)
    #[arg(long = "drone", value_parser = parse_drone, requires = "primary")]
    drones: Vec<(String, PathBuf)>,

    /// Fleet document holding several vehicles
    #[arg(long, requires = "primary")]
    fleet: Option<PathBuf>,

    /// Built-in demo scenario
    #[arg(long, value_enum)]
    scenario: Option<ScenarioType>,

    /// Frames sampled from a built-in scenario (default: until every path ends)
    #[arg(long, requires = "scenario")]
    steps: Option<usize>,

    /// Pair waypoints by their time field instead of their index
    #[arg(long)]
    stamped: bool,

    /// Minimum separation distance
    #[arg(long)]
    threshold: Option<f64>,

    /// Threshold comparison (default depends on the time mode)
    #[arg(long, value_enum)]
    comparison: Option<ComparisonArg>,

    /// Perturbation step size
    #[arg(long)]
    step: Option<f64>,

    /// Perturbation attempts per waypoint
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Reroute rounds
    #[arg(long)]
    max_retries: Option<u32>,

    /// Random seed for rerouting
    #[arg(long)]
    seed: Option<u64>,

    /// Try to reroute the other vehicles out of conflict
    #[arg(long)]
    reroute: bool,

    /// Write the (possibly rerouted) paths to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print a JSON summary instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct RerouteSummary<'a> {
    resolved: bool,
    rounds: u32,
    unresolved_waypoints: &'a [UnresolvedWaypoint],
}

#[derive(Debug, Serialize)]
struct Summary<'a> {
    status: MissionStatus,
    conflicts: &'a [Conflict],
    #[serde(skip_serializing_if = "Option::is_none")]
    reroute: Option<RerouteSummary<'a>>,
    fleet: &'a Fleet,
}

fn parse_drone(value: &str) -> std::result::Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected NAME=FILE, got '{}'", value)),
    }
}

fn build_rules(args: &Args, env: Config) -> DeconflictConfig {
    let mut env = env;
    if args.stamped {
        env.time_mode = TimeMode::Stamped;
    }
    if args.threshold.is_some() {
        env.threshold = args.threshold;
    }
    env.max_attempts = args.max_attempts.unwrap_or(env.max_attempts);
    env.max_retries = args.max_retries.unwrap_or(env.max_retries);
    env.seed = args.seed.unwrap_or(env.seed);

    let mut rules = env.rules();
    match args.comparison {
        Some(ComparisonArg::Strict) => rules.comparison = Comparison::Strict,
        Some(ComparisonArg::Inclusive) => rules.comparison = Comparison::Inclusive,
        None => {}
    }
    if let Some(step) = args.step {
        rules.step = step;
    }
    rules
}

fn load_mission(args: &Args) -> Result<(Trajectory, Fleet)> {
    if let Some(dir) = &args.case {
        return load_test_case(dir)
            .with_context(|| format!("Failed to load test case {}", dir.display()));
    }

    if let Some(kind) = args.scenario {
        let scenario = match kind {
            ScenarioType::Crossing => create_crossing_scenario(),
            ScenarioType::Parallel => create_parallel_scenario(),
            ScenarioType::Converging => create_converging_scenario(),
        };
        let steps = args.steps.unwrap_or_else(|| scenario.default_steps());
        tracing::info!("Scenario {} sampled over {} steps", scenario.name, steps);
        return Ok(scenario.sample(steps));
    }

    let Some(primary_path) = &args.primary else {
        bail!("No mission given: use --case, --scenario or --primary");
    };
    let primary = load_trajectory(primary_path)
        .with_context(|| format!("Failed to load primary mission {}", primary_path.display()))?;

    let mut fleet = match &args.fleet {
        Some(path) => load_fleet(path)
            .with_context(|| format!("Failed to load fleet {}", path.display()))?,
        None => Fleet::new(),
    };
    for (name, path) in &args.drones {
        let trajectory = load_trajectory(path)
            .with_context(|| format!("Failed to load {} from {}", name, path.display()))?;
        if fleet.insert(name.clone(), trajectory).is_some() {
            bail!("Vehicle {} given more than once", name);
        }
    }
    Ok((primary, fleet))
}

fn print_conflicts(session: &Deconflictor) {
    println!("{}", session.status());
    for conflict in session.conflicts() {
        println!("  {}", format_conflict(conflict));
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("deconflict=info".parse()?)
                .add_directive("deconflict_core=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let rules = build_rules(&args, Config::from_env());
    rules.validate()?;

    let (primary, fleet) = load_mission(&args)?;
    let mut session = Deconflictor::new(rules, primary, fleet)?;
    tracing::info!(
        "Mission loaded: {} vehicle(s), {} time step(s)",
        session.fleet().len(),
        session.max_frames()
    );

    if !args.json {
        print_conflicts(&session);
    }

    let outcome = if args.reroute {
        let mut rng = StdRng::seed_from_u64(session.config().seed);
        let outcome = session.reroute(&mut rng)?;
        if !args.json {
            if outcome.resolved {
                println!("\nConflict-free paths generated after {} round(s).", outcome.rounds);
            } else {
                println!(
                    "\nCould not generate conflict-free paths after {} round(s).",
                    outcome.rounds
                );
            }
            print_conflicts(&session);
        }
        Some(outcome)
    } else {
        None
    };

    if args.json {
        let summary = Summary {
            status: session.status(),
            conflicts: session.conflicts(),
            reroute: outcome.as_ref().map(|o| RerouteSummary {
                resolved: o.resolved,
                rounds: o.rounds,
                unresolved_waypoints: &o.unresolved_waypoints,
            }),
            fleet: session.fleet(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    if let Some(path) = &args.output {
        write_updated_paths(path, session.fleet())
            .with_context(|| format!("Failed to save updated paths to {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_drone_splits_name_and_path() {
        let (name, path) = parse_drone("DroneA=missions/a.json").unwrap();
        assert_eq!(name, "DroneA");
        assert_eq!(path, PathBuf::from("missions/a.json"));
        assert!(parse_drone("DroneA").is_err());
        assert!(parse_drone("=a.json").is_err());
    }

    #[test]
    fn flags_override_environment() {
        let args = Args::parse_from([
            "deconflict",
            "--scenario",
            "crossing",
            "--stamped",
            "--comparison",
            "strict",
            "--max-retries",
            "3",
        ]);
        let rules = build_rules(&args, Config::from_lookup(|_| None));
        assert_eq!(rules.time_mode, TimeMode::Stamped);
        assert_eq!(rules.threshold, 10.0);
        assert_eq!(rules.comparison, Comparison::Strict);
        assert_eq!(rules.max_retries, 3);
        assert_eq!(rules.max_attempts, 30);
    }

    #[test]
    fn case_conflicts_with_scenario() {
        let result = Args::try_parse_from(["deconflict", "--case", "x", "--scenario", "parallel"]);
        assert!(result.is_err());
    }
}
