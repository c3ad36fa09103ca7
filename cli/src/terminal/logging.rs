use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use colored::*;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::{EnvFilter, LevelFilter, filter_fn};
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{self as fmt_layer, FmtContext, FormatEvent};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

use crate::terminal::progress::ProgressWriter;

/// Target of events that carry console output rather than log records.
pub const PRINT_TARGET: &str = "pinger::print";

pub struct PingerFormatter;

impl<S, N> FormatEvent<S, N> for PingerFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        if meta.target() != PRINT_TARGET {
            let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) = match *meta.level() {
                Level::TRACE => ("[ ]", |s| s.dimmed()),
                Level::DEBUG => ("[?]", |s| s.blue()),
                Level::INFO => ("[+]", |s| s.green().bold()),
                Level::WARN => ("[*]", |s| s.yellow().bold()),
                Level::ERROR => ("[-]", |s| s.red().bold()),
            };

            write!(writer, "{} ", color_func(symbol.into()))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Level filter of the console layer.
///
/// `RUST_LOG` narrows log records only; the print target stays at `info` so
/// results and the summary are shown whatever the log level.
fn console_filter(directives: Option<String>) -> EnvFilter {
    let base: String = directives
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| "info".to_string());

    EnvFilter::try_new(format!("{base},{PRINT_TARGET}=info"))
        .unwrap_or_else(|_| EnvFilter::new(format!("info,{PRINT_TARGET}=info")))
}

/// Installs the console layer and, when `log_file` is given, a plain-text
/// debug log appended to that file.
///
/// The console layer is always installed. An error only means the log file
/// could not be opened.
pub fn init_logging(log_file: Option<&Path>) -> std::io::Result<()> {
    let console_filter = console_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let console_layer = fmt_layer::layer()
        .event_format(PingerFormatter)
        .with_writer(|| ProgressWriter)
        .with_filter(console_filter);

    let file = log_file.map(|path| OpenOptions::new().create(true).append(true).open(path));
    let (file_layer, file_error) = match file {
        Some(Ok(file)) => {
            let layer = fmt_layer::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(LevelFilter::DEBUG)
                .with_filter(filter_fn(|meta| meta.target() != PRINT_TARGET));
            (Some(layer), None)
        }
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    match file_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
