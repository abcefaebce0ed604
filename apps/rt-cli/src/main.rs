use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

mod case;
mod error;
mod run;

use case::CaseFile;
use error::CliResult;
use run::{RunOverrides, run_case, validate_case};
use rt_trim::TrimRegistry;

#[derive(Parser)]
#[command(name = "rt-cli")]
#[command(about = "RotorTrim CLI - Actuator-disk rotor trim driver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a case file and its trim dictionary
    Validate {
        /// Path to the case YAML file
        case_path: PathBuf,
    },
    /// List the registered trim strategies
    Strategies,
    /// Step the trim strategy of a case
    Run {
        /// Path to the case YAML file
        case_path: PathBuf,
        /// Number of steps (overrides the case)
        #[arg(long)]
        steps: Option<u64>,
        /// Number of partitions (overrides the case)
        #[arg(long)]
        partitions: Option<usize>,
        /// Print a JSON summary including all trim events
        #[arg(long)]
        json: bool,
    },
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Strategies => cmd_strategies(),
        Commands::Run {
            case_path,
            steps,
            partitions,
            json,
        } => cmd_run(
            &case_path,
            RunOverrides {
                steps,
                partitions,
                record: json,
            },
        ),
    }
}

fn cmd_validate(case_path: &Path) -> CliResult<()> {
    println!("Validating case: {}", case_path.display());
    let case = CaseFile::load(case_path)?;
    let (strategy, cells) = validate_case(&case)?;
    println!("✓ Case is valid ({strategy}, {cells} disk cells)");
    Ok(())
}

fn cmd_strategies() -> CliResult<()> {
    println!("Registered trim strategies:");
    for name in TrimRegistry::global().names() {
        println!("  {name}");
    }
    Ok(())
}

fn cmd_run(case_path: &Path, overrides: RunOverrides) -> CliResult<()> {
    let case = CaseFile::load(case_path)?;
    let summary = run_case(&case, overrides)?;

    if overrides.record {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "✓ {} steps of {} on {} partition(s), {} disk cells",
        summary.steps, summary.strategy, summary.partitions, summary.disk_cells
    );
    println!(
        "  pitch angles [deg]: theta0 = {:.6}, theta1c = {:.6}, theta1s = {:.6}",
        summary.pitch_deg[0], summary.pitch_deg[1], summary.pitch_deg[2]
    );
    println!("  disk thrust: {:.6}", summary.thrust);
    Ok(())
}
