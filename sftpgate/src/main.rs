mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::logging::init_logging;

#[derive(clap::Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub(crate) struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(long, short, default_value = "sftpgate.yaml", env = "SFTPGATE_CONFIG_FILE")]
    config: PathBuf,

    #[clap(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

#[derive(clap::Subcommand)]
pub(crate) enum Commands {
    /// Run the HTTP gateway
    Run,
    /// Validate config file
    Check,
    /// List a directory on a remote host using the configured policy
    TestHost {
        #[clap(long)]
        host: String,
        #[clap(long)]
        username: String,
        #[clap(long, default_value = "/")]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_format);

    match &cli.command {
        Commands::Run => crate::commands::run::command(&cli).await,
        Commands::Check => crate::commands::check::command(&cli).await,
        Commands::TestHost {
            host,
            username,
            path,
        } => crate::commands::test_host::command(&cli, host, username, path).await,
    }
}
