use anyhow::Result;
use sftpgate_protocol_sftp::unsupported_algorithms;
use tracing::*;

use crate::config::load_config;

pub(crate) async fn command(cli: &crate::Cli) -> Result<()> {
    let config = load_config(&cli.config, true)?;

    let unsupported = unsupported_algorithms(&config.store.sftp.security);
    for algorithm in &unsupported {
        warn!(
            category = algorithm.category,
            name = %algorithm.name,
            "Algorithm is not supported and will be skipped"
        );
    }

    if unsupported.is_empty() {
        info!("No problems found");
    } else {
        info!("Config is valid, {} algorithm(s) will be skipped", unsupported.len());
    }
    Ok(())
}
