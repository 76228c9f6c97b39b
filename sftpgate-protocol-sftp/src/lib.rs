mod client;
mod diagnostics;
mod envelope;
mod operations;
mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
mod transport;
mod types;

pub use client::*;
pub use diagnostics::DiagnosticSink;
pub use envelope::*;
pub use operations::*;
pub use session::*;
pub use transport::*;
pub use types::*;
