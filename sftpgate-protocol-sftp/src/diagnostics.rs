use std::fmt::Display;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::*;
use uuid::Uuid;

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Connection-level trace output for a single session.
///
/// Every line is prefixed with a local wall-clock timestamp and emitted as a
/// `tracing` event tagged with the session id. Emitting never fails.
#[derive(Debug, Clone)]
pub struct DiagnosticSink {
    session: Uuid,
}

impl DiagnosticSink {
    pub fn new(session: Uuid) -> Self {
        Self { session }
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    pub fn emit<M: Display>(&self, message: M) {
        let line = format_line(local_now(), message);
        info!(target: "sftpgate::transport", session=%self.session, "{line}");
    }
}

fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

pub(crate) fn format_line<M: Display>(at: OffsetDateTime, message: M) -> String {
    let timestamp = at.format(TIMESTAMP_FORMAT).unwrap_or_default();
    format!("{timestamp} - {message}")
}
