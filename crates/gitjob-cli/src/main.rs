//! gitjob CLI tool.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "gitjob")]
#[command(about = "Launch Kubernetes Jobs for new git commits", long_about = None)]
struct Cli {
    /// Operator configuration file (KDL)
    #[arg(long, global = true, env = "GITJOB_CONFIG")]
    config: Option<PathBuf>,

    /// Default namespace for Jobs
    #[arg(long, global = true, env = "GITJOB_NAMESPACE")]
    namespace: Option<String>,

    /// kubectl binary used to apply resources directories
    #[arg(long, global = true, env = "GITJOB_KUBECTL")]
    kubectl: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "text", env = "GITJOB_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch a Job for a commit if none is running or done for it
    Launch {
        /// Repository name
        #[arg(long)]
        repo: String,
        /// Namespace override for this repository
        #[arg(long, default_value = "")]
        repo_namespace: String,
        /// Commit SHA
        #[arg(long)]
        sha: String,
        /// Checked out repository directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Do not apply the resources directory next to the Job template
        #[arg(long)]
        no_resource_apply: bool,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        output: OutputFormat,
    },
    /// Check a checkout's Job template
    Validate {
        /// Checked out repository directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Print the Job name used for a repository and commit
    Name {
        /// Repository name
        #[arg(long)]
        repo: String,
        /// Commit SHA
        #[arg(long)]
        sha: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Commands::Launch {
            repo,
            repo_namespace,
            sha,
            dir,
            no_resource_apply,
            output,
        } => {
            let settings = commands::Settings::load(
                cli.config.as_deref(),
                cli.namespace,
                cli.kubectl,
            )
            .await?;
            let args = commands::launch::LaunchArgs {
                repo,
                repo_namespace,
                sha,
                dir,
                no_resource_apply,
                output,
            };
            commands::launch::run(settings, args).await?;
        }
        Commands::Validate { dir } => {
            commands::validate(&dir).await?;
        }
        Commands::Name { repo, sha } => {
            commands::name(&repo, &sha);
        }
    }

    Ok(())
}
