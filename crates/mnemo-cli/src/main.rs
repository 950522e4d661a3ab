//! mnemo command-line interface.
//!
//! ```text
//!   mnemo plan     lay out a time-resolved tomography batch
//!   mnemo analyze  extract snapshots from a batch result and compute D_RHP
//!   mnemo version
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{analyze, plan, version};

/// mnemo - non-Markovianity from time-resolved process tomography
#[derive(Parser)]
#[command(name = "mnemo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute intermediate maps and the RHP measure of a tomography batch
    Analyze {
        /// Batch result file (JSON)
        #[arg(short, long)]
        input: String,

        /// Analysis config (YAML or JSON); defaults to ~/.mnemo/config.yaml
        #[arg(short, long)]
        config: Option<String>,

        /// Duration of one base-circuit repetition
        #[arg(long)]
        base_circuit_time: Option<f64>,

        /// Require M·M† to be diagonalizable when taking trace norms
        #[arg(long, conflicts_with = "relaxed")]
        strict: bool,

        /// Take trace norms as plain singular-value sums
        #[arg(long)]
        relaxed: bool,

        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        export: Option<String>,
    },

    /// Lay out tomography experiments over a device's qubits
    Plan {
        /// Physical qubits on the device
        #[arg(long)]
        total_qubits: u32,

        /// Qubits the channel acts on
        #[arg(long, default_value = "1")]
        qubits_per_experiment: u32,

        /// Number of snapshots (one experiment per qubit partition)
        #[arg(long = "partitions")]
        snapshots: usize,

        /// Reuse every qubit partition twice
        #[arg(long)]
        repeat: bool,

        /// Upper bound on experiments per parallel group
        #[arg(long, default_value_t = mnemo_tomo::plan::DEFAULT_MAX_PARALLEL)]
        max_parallel: usize,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Analyze {
            input,
            config,
            base_circuit_time,
            strict,
            relaxed,
            export,
        } => analyze::execute(&analyze::AnalyzeArgs {
            input: &input,
            config: config.as_deref(),
            base_circuit_time,
            strict,
            relaxed,
            export: export.as_deref(),
        }),

        Commands::Plan {
            total_qubits,
            qubits_per_experiment,
            snapshots,
            repeat,
            max_parallel,
        } => plan::execute(total_qubits, qubits_per_experiment, snapshots, repeat, max_parallel),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
