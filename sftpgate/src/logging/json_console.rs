use std::io::{self, Write};

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use super::values::{RecordVisitor, SerializedRecordValues};

const TARGET_PREFIX: &str = "sftpgate";

#[derive(Serialize)]
struct JsonLogEntry {
    timestamp: String,
    level: &'static str,
    target: String,
    message: String,
    #[serde(flatten)]
    fields: SerializedRecordValues,
}

impl JsonLogEntry {
    fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            json!({
                "timestamp": self.timestamp,
                "level": self.level,
                "target": self.target,
                "message": self.message,
                "_serialization_error": true
            })
            .to_string()
        })
    }
}

/// Writes one JSON object per event to stdout, with the fields of every
/// enclosing span merged in.
pub struct JsonConsoleLayer;

impl<S> Layer<S> for JsonConsoleLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with(TARGET_PREFIX) {
            return;
        }

        let mut values = SerializedRecordValues::new();

        let current = ctx.current_span();
        let parent_id = event.parent().or_else(|| current.id());
        if let Some(parent_id) = parent_id {
            if let Some(span) = ctx.span(parent_id) {
                for span in span.scope().from_root() {
                    if let Some(other_values) = span.extensions().get::<SerializedRecordValues>() {
                        values.extend(other_values.iter().map(|(k, v)| (*k, v.clone())));
                    }
                }
            }
        }

        event.record(&mut RecordVisitor::new(&mut values));

        let message = values.take_text("message").unwrap_or_default();

        let entry = JsonLogEntry {
            timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            level: level_to_str(event.metadata().level()),
            target: event.metadata().target().to_string(),
            message,
            fields: values,
        };

        let _ = writeln!(io::stdout(), "{}", entry.to_line());
    }

    fn on_new_span(
        &self,
        attrs: &tracing_core::span::Attributes<'_>,
        id: &tracing_core::span::Id,
        ctx: Context<'_, S>,
    ) {
        let Some(span) = ctx.span(id) else { return };
        if !span.metadata().target().starts_with(TARGET_PREFIX) {
            return;
        }

        let mut values = SerializedRecordValues::new();
        attrs.record(&mut RecordVisitor::new(&mut values));
        span.extensions_mut().replace(values);
    }
}

fn level_to_str(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "trace",
        Level::DEBUG => "debug",
        Level::INFO => "info",
        Level::WARN => "warn",
        Level::ERROR => "error",
    }
}
