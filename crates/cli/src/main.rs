//! NPMM CLI
//!
//! Command-line interface for scoring model answers to NP-hard graph
//! problems.

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use npmm_application::ApplicationError;
use npmm_cli::commands::{self, evaluate::EvaluateOptions, CommandContext};
use npmm_cli::output::OutputFormat;
use npmm_common::AppConfig;

/// Output format for CLI commands
#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum CliOutputFormat {
    /// JSON output
    Json,
    /// Table output (default)
    #[default]
    Table,
    /// Plain text output
    Plain,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Table => OutputFormat::Table,
            CliOutputFormat::Plain => OutputFormat::Plain,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "npmm")]
#[command(author, version, about = "NPMM answer verification and scoring")]
#[command(long_about = "Verifies model answers to NP-hard graph problems and scores them.\n\n\
    Evaluate whole batches into success and approximation rates, or check a single answer.")]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(short = 'o', long, global = true, value_enum, default_value = "table")]
    format: CliOutputFormat,

    /// Configuration file layered over the standard locations
    #[arg(short, long, global = true, env = "NPMM_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a batch of evaluation records
    #[command(alias = "e", alias = "eval")]
    Evaluate {
        /// Input file (JSON array or JSON lines)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Number of blocking workers (overrides config)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Directory for report artifacts (overrides config)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Do not write report artifacts
        #[arg(long)]
        no_write: bool,
    },

    /// Validate a single answer against a graph
    #[command(alias = "v")]
    Validate {
        /// Task name or label, e.g. NpTsp or npmm-NpTsp
        #[arg(short, long)]
        task: String,

        /// Graph file (JSON)
        #[arg(short, long, value_name = "FILE")]
        graph: PathBuf,

        /// Answer text, or @FILE to read it from a file
        #[arg(short, long)]
        answer: String,
    },

    /// List handled tasks and categories
    Tasks,

    /// Show the effective configuration
    Config,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        let code = e
            .downcast_ref::<ApplicationError>()
            .map_or(1, ApplicationError::exit_code);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Completions need no configuration
    if let Commands::Completions { shell } = cli.command {
        generate_completions(shell);
        return Ok(());
    }

    let config = AppConfig::load_from(cli.config.as_deref())?;

    let log_level = if cli.verbose {
        "debug"
    } else {
        config.telemetry.log_level.as_str()
    };
    npmm_common::init_tracing(
        &config.telemetry.service_name,
        config.telemetry.json_logging,
        log_level,
    )?;

    let ctx = CommandContext::new(config, cli.format.into());

    match cli.command {
        Commands::Evaluate {
            input,
            workers,
            output_dir,
            no_write,
        } => {
            let options = EvaluateOptions {
                input,
                workers,
                output_dir,
                no_write,
            };
            commands::evaluate::run(&ctx, options).await
        }
        Commands::Validate {
            task,
            graph,
            answer,
        } => commands::validate::run(&ctx, &task, &graph, &answer),
        Commands::Tasks => commands::tasks::run(&ctx),
        Commands::Config => commands::config::show(&ctx),
        Commands::Completions { .. } => Ok(()),
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "npmm", &mut std::io::stdout());
}
