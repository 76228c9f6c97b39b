mod json_console;
mod values;

use std::sync::Arc;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::UtcOffset;
use tracing_subscriber::filter::dynamic_filter_fn;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use self::json_console::JsonConsoleLayer;
use crate::LogFormat;

const DEFAULT_FILTER: &str = "sftpgate=info";

const FULL_TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[day].[month].[year] [hour]:[minute]:[second]");
const COMPACT_TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");

pub fn init_logging(format: LogFormat) {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);

    let env_filter = Arc::new(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    );
    let enable_colors = console::user_attended();
    let text = format == LogFormat::Text;

    let json_layer = (format == LogFormat::Json).then(|| {
        let env_filter = env_filter.clone();
        JsonConsoleLayer.with_filter(dynamic_filter_fn(move |m, c| {
            env_filter.enabled(m, c.clone())
        }))
    });

    let full_fmt_layer = (text && !console::user_attended()).then(|| {
        let env_filter = env_filter.clone();
        tracing_subscriber::fmt::layer()
            .with_ansi(enable_colors)
            .with_timer(OffsetTime::new(offset, FULL_TIMESTAMP))
            .with_filter(dynamic_filter_fn(move |m, c| {
                env_filter.enabled(m, c.clone())
            }))
    });

    let compact_fmt_layer = (text && console::user_attended()).then(|| {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_ansi(enable_colors)
            .with_target(false)
            .with_timer(OffsetTime::new(offset, COMPACT_TIMESTAMP))
            .with_filter(dynamic_filter_fn(move |m, c| {
                env_filter.enabled(m, c.clone())
            }))
    });

    tracing_subscriber::registry()
        .with(json_layer)
        .with(full_fmt_layer)
        .with(compact_fmt_layer)
        .init();
}
