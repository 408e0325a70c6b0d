use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tfadopt::commands::AdoptCommand;
use tfadopt::config::AdoptConfig;
use tfadopt::context::Context;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tfadopt")]
#[command(about = "Adopt existing CloudWatch metric alarms into Terraform", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command
#[derive(Args)]
struct SourceArgs {
    /// Output of `aws cloudwatch describe-alarms` ("-" reads stdin)
    #[arg(short, long, env = "TFADOPT_INPUT")]
    input: Option<PathBuf>,

    /// Seed for reproducible resource names
    #[arg(long, env = "TFADOPT_SEED")]
    seed: Option<u64>,

    /// Config file (defaults to .tfadopt.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the Terraform configuration for the alarms
    Tf {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the Terraform state file for the alarms
    Tfstate {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Write both the configuration and the state file to a directory
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// Directory to write into (defaults to the current directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tfadopt=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(ctx: &Context, source: SourceArgs, output_dir: Option<PathBuf>) -> Result<AdoptConfig> {
    let config = AdoptConfig::load(&*ctx.fs, source.config.as_deref())?;
    Ok(config.with_overrides(source.input, output_dir, source.seed))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = Context::new();
    let stdout = std::io::stdout();

    match cli.command {
        Commands::Tf { source } => {
            let config = load_config(&ctx, source, None)?;
            AdoptCommand::execute_tf(&ctx, &config, &mut stdout.lock())?;
        }
        Commands::Tfstate { source } => {
            let config = load_config(&ctx, source, None)?;
            AdoptCommand::execute_tfstate(&ctx, &config, &mut stdout.lock())?;
        }
        Commands::Export {
            source,
            output_dir,
            force,
        } => {
            let config = load_config(&ctx, source, output_dir)?;
            AdoptCommand::execute_export(&ctx, &config, force)?;
        }
    }

    Ok(())
}
