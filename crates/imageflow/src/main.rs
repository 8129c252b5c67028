mod args;
mod commands;

use args::ImportArgs;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "image-import")]
#[command(about = "Plan Compute Engine image imports as labeled workflows", long_about = None)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the flags and print the annotated import workflow
    Plan(ImportArgs),
    /// Print the workflow variables for the flags
    Vars(ImportArgs),
    /// Annotate a workflow file and print it
    Annotate {
        /// Workflow file (JSON)
        #[arg(short, long)]
        workflow: PathBuf,
        /// Build ID attached to every created resource
        #[arg(long, env = "BUILD_ID")]
        build_id: Option<String>,
        /// Labels for created resources (key1=value1,key2=value2)
        #[arg(long)]
        labels: Option<String>,
        /// Remove external IPs from created instances
        #[arg(long)]
        no_external_ip: bool,
    },
    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    // stdout は JSON 出力専用、ログは stderr へ
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{}", "✗ image import failed".red().bold());
        eprintln!("  {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Version => {
            println!("imageflow {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Plan(args) => {
            let settings = imageflow_config::load_settings()?;
            commands::plan::handle(&args, &settings)?;
        }
        Commands::Vars(args) => {
            let settings = imageflow_config::load_settings()?;
            commands::vars::handle(&args, &settings)?;
        }
        Commands::Annotate {
            workflow,
            build_id,
            labels,
            no_external_ip,
        } => {
            commands::annotate::handle(
                &workflow,
                build_id.as_deref(),
                labels.as_deref(),
                no_external_ip,
            )?;
        }
    }

    Ok(())
}
