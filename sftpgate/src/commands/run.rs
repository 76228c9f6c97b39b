use std::sync::Arc;

use anyhow::Result;
use sftpgate_protocol_http::{HTTPProtocolServer, Services};
use sftpgate_protocol_sftp::{unsupported_algorithms, RusshConnector};
use tracing::*;

use crate::config::load_config;

pub(crate) async fn command(cli: &crate::Cli) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    info!(%version, "sftpgate");

    let config = load_config(&cli.config, true)?;
    for algorithm in unsupported_algorithms(&config.store.sftp.security) {
        warn!(
            category = algorithm.category,
            name = %algorithm.name,
            "Algorithm is not supported and will be skipped"
        );
    }

    let address = *config.store.http.listen;
    let connector = Arc::new(RusshConnector::new(&config.store.sftp));
    let services = Services::new(config, connector);

    if console::user_attended() {
        info!("--------------------------------------------");
        info!("sftpgate is now running.");
        info!("Accepting HTTP connections on {address}");
        info!("--------------------------------------------");
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Exiting");
        }
        result = HTTPProtocolServer::new(&services).run(address) => {
            if let Err(error) = result {
                error!(?error, "HTTP server error");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
