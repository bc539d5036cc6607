//! Tracing layer writing priority-prefixed logfmt lines

use crate::logfmt::push_pair;
use jtdrpc_core::LogLevel;
use std::io::Write;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

const PREFIX_DEBUG: &str = "<7>";
const PREFIX_INFO: &str = "<6>";
const PREFIX_WARN: &str = "<4>";
const PREFIX_ERROR: &str = "<3>";

/// Tracing layer emitting one syslog-priority-prefixed logfmt line per event.
///
/// ```text
/// <6>level=info target=jtdrpc msg="Generated client" bytes=812
/// ```
///
/// journald and similar collectors read the `<N>` prefix as the record's
/// priority.
pub struct PriorityLayer<W = fn() -> std::io::Stderr> {
    make_writer: W,
}

impl PriorityLayer {
    /// Create a layer writing to stderr
    pub fn new() -> Self {
        Self {
            make_writer: std::io::stderr,
        }
    }
}

impl Default for PriorityLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> PriorityLayer<W> {
    /// Replace the destination lines are written to
    pub fn with_writer<W2>(self, make_writer: W2) -> PriorityLayer<W2>
    where
        W2: for<'w> MakeWriter<'w> + 'static,
    {
        PriorityLayer { make_writer }
    }
}

/// Syslog priority prefix for a tracing level
fn priority_prefix(level: &Level) -> &'static str {
    match *level {
        Level::TRACE | Level::DEBUG => PREFIX_DEBUG,
        Level::INFO => PREFIX_INFO,
        Level::WARN => PREFIX_WARN,
        Level::ERROR => PREFIX_ERROR,
    }
}

fn format_event(event: &Event<'_>) -> String {
    let metadata = event.metadata();

    let mut visitor = FieldVisitor::default();
    event.record(&mut visitor);

    let mut body = String::new();
    push_pair(&mut body, "level", &metadata.level().as_str().to_ascii_lowercase());
    push_pair(&mut body, "target", metadata.target());
    if let Some(message) = &visitor.message {
        push_pair(&mut body, "msg", message);
    }
    for (key, value) in &visitor.fields {
        push_pair(&mut body, key, value);
    }

    format!("{}{}\n", priority_prefix(metadata.level()), body)
}

impl<S, W> Layer<S> for PriorityLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let line = format_event(event);

        let mut writer = self.make_writer.make_writer_for(event.metadata());
        // A failed log write has nowhere to be reported
        let _ = writer.write_all(line.as_bytes());
    }
}

/// Collects the message and remaining fields of an event in record order
#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<(&'static str, String)>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.fields.push((field.name(), format!("{:?}", value)));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push((field.name(), value.to_string()));
        }
    }
}

/// Convert LogLevel to tracing LevelFilter
fn convert_level_to_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Trace => LevelFilter::TRACE,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Off => LevelFilter::OFF,
    }
}

/// Build the event filter: `RUST_LOG` when set and valid, otherwise `level`
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(convert_level_to_filter(level).into())
        .from_env_lossy()
}

/// Initialize logging to stderr at the given level.
///
/// `RUST_LOG` directives take precedence over `level`. Calling this more
/// than once keeps the first subscriber.
pub fn init_logging(level: LogLevel) {
    use tracing_subscriber::prelude::*;

    let subscriber = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(PriorityLayer::new());

    // Already set by an earlier call or by the host application
    let _ = tracing::subscriber::set_global_default(subscriber);
}
