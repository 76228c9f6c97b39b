use russh::keys::{HashAlg, PublicKey};
use tracing::*;

use crate::DiagnosticSink;

pub struct ClientHandler {
    pub sink: DiagnosticSink,
}

impl russh::client::Handler for ClientHandler {
    type Error = russh::Error;

    // Host keys are not pinned; the fingerprint goes to the diagnostic log.
    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        self.sink.emit(format_args!(
            "Server host key {} {}",
            server_public_key.algorithm().as_str(),
            server_public_key.fingerprint(HashAlg::Sha256)
        ));
        Ok(true)
    }
}

impl Drop for ClientHandler {
    fn drop(&mut self) {
        debug!(session=%self.sink.session(), "Dropped");
    }
}
