//! plan-compare - side-by-side diff of execution plan element properties.
//!
//! # Usage
//!
//! ```bash
//! # Compare two plan operators
//! plan-compare diff --top seek.json --bottom scan.json
//!
//! # Sort alphabetically and emit JSON rows
//! plan-compare diff --top seek.json --bottom scan.json --sort alphabetical --format json
//!
//! # List sort policies
//! plan-compare policies
//! ```

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use plan_compare::SortPolicy;
use plan_compare_cli::{commands, output, OutputFormat};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "plan-compare")]
#[command(about = "Compare the properties of two execution plan elements", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (human, json, plain)
    #[arg(long, global = true, default_value = "human")]
    format: OutputFormatArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
    Plain,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Plain => OutputFormat::Plain,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show merged properties of two plan elements side by side
    #[command(group(ArgGroup::new("input").required(true).multiple(true).args(["top", "bottom"])))]
    Diff {
        /// JSON file with the top plan element
        #[arg(long)]
        top: Option<PathBuf>,

        /// JSON file with the bottom plan element
        #[arg(long)]
        bottom: Option<PathBuf>,

        /// Sort policy for sibling properties
        #[arg(short, long, env = "PLAN_COMPARE_SORT", default_value = "display-order", value_parser = parse_sort_policy)]
        sort: SortPolicy,
    },

    /// List available sort policies
    Policies,
}

fn parse_sort_policy(s: &str) -> plan_compare::Result<SortPolicy> {
    s.parse()
}

fn main() {
    if let Err(e) = run() {
        output::error(format!("{:#}", e));
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let format = OutputFormat::from(cli.format);

    match cli.command {
        Commands::Diff { top, bottom, sort } => {
            commands::diff(top.as_deref(), bottom.as_deref(), sort, format)
        }
        Commands::Policies => commands::policies(format),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("plan_compare=debug,plan_compare_cli=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("plan_compare=info,plan_compare_cli=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
