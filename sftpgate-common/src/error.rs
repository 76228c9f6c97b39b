#[derive(thiserror::Error, Debug)]
pub enum SftpgateError {
    #[error("security policy offers no {0} algorithms")]
    EmptyAlgorithmList(&'static str),
    #[error("timeout `{0}` must be greater than zero")]
    ZeroTimeout(&'static str),
    #[error("failed to resolve {address} into a TCP endpoint: {reason}")]
    InvalidListenAddress { address: String, reason: String },
}
