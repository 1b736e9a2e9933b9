//! Logger for the `log` crate used by the `blockbar` binary.
//!
//! Level names are colored with the same markup the generator emits and
//! resolved through [`crate::markup`], so the logger doubles as a small
//! consumer of the renderer.
//!
//! Optional tracing integration is available via `BarTracingLayer` when the
//! `tracing` feature is enabled.

use std::io::{self, Write};
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use time::{OffsetDateTime, format_description::OwnedFormatItem};

use crate::markup;
use crate::sync::lock_recover;

const DEFAULT_TIME_FORMAT: &str = "[hour]:[minute]:[second]";

/// `log::Log` implementation writing one line per record.
///
/// # Thread Safety
///
/// The sink and the last-printed timestamp are behind mutexes with poison
/// recovery, so records from several threads never interleave within a line.
pub struct BarLogger {
    sink: Mutex<Box<dyn Write + Send>>,
    level: LevelFilter,
    show_time: bool,
    omit_repeated_times: bool,
    show_level: bool,
    show_target: bool,
    color: bool,
    time_format: OwnedFormatItem,
    last_time: Mutex<Option<String>>,
}

impl std::fmt::Debug for BarLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BarLogger")
            .field("level", &self.level)
            .field("show_time", &self.show_time)
            .field("show_level", &self.show_level)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

impl Default for BarLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl BarLogger {
    /// Logger writing to stderr at `Info` with timestamps and colors.
    #[must_use]
    pub fn new() -> Self {
        let time_format = time::format_description::parse_owned::<2>(DEFAULT_TIME_FORMAT)
            .unwrap_or_else(|_| OwnedFormatItem::Literal(Vec::<u8>::new().into_boxed_slice()));
        Self {
            sink: Mutex::new(Box::new(io::stderr())),
            level: LevelFilter::Info,
            show_time: true,
            omit_repeated_times: true,
            show_level: true,
            show_target: false,
            color: true,
            time_format,
            last_time: Mutex::new(None),
        }
    }

    /// Set the minimum log level.
    #[must_use]
    pub fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Enable or disable timestamps.
    #[must_use]
    pub fn show_time(mut self, show: bool) -> Self {
        self.show_time = show;
        self
    }

    /// Blank out a timestamp equal to the previous one.
    #[must_use]
    pub fn omit_repeated_times(mut self, omit: bool) -> Self {
        self.omit_repeated_times = omit;
        self
    }

    /// Enable or disable log levels.
    #[must_use]
    pub fn show_level(mut self, show: bool) -> Self {
        self.show_level = show;
        self
    }

    /// Append the record target, e.g. `blockbar::generator`.
    #[must_use]
    pub fn show_target(mut self, show: bool) -> Self {
        self.show_target = show;
        self
    }

    /// Emit truecolor escapes for level names.
    #[must_use]
    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Override time format; an unparsable description keeps the current one.
    #[must_use]
    pub fn time_format(mut self, format: &str) -> Self {
        if let Ok(parsed) = time::format_description::parse_owned::<2>(format) {
            self.time_format = parsed;
        }
        self
    }

    /// Write to `sink` instead of stderr.
    #[must_use]
    pub fn writer<W: Write + Send + 'static>(mut self, sink: W) -> Self {
        self.sink = Mutex::new(Box::new(sink));
        self
    }

    /// Install as the global logger.
    ///
    /// # Errors
    ///
    /// Fails if a global logger is already installed.
    pub fn init(self) -> Result<(), SetLoggerError> {
        log::set_max_level(self.level);
        log::set_boxed_logger(Box::new(self))
    }

    fn format_time(&self) -> String {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        now.format(&self.time_format)
            .unwrap_or_else(|_| now.to_string())
    }

    fn level_color(level: Level) -> &'static str {
        match level {
            Level::Trace => "#808080",
            Level::Debug => "#5f87d7",
            Level::Info => "#5fd75f",
            Level::Warn => "#d7d75f",
            Level::Error => "#ff5f5f",
        }
    }

    fn format_record(&self, record: &Record<'_>) -> String {
        let mut head = String::new();

        if self.show_time {
            let time_str = self.format_time();
            let display = if self.omit_repeated_times {
                let mut last = lock_recover(&self.last_time);
                if last.as_ref() == Some(&time_str) {
                    " ".repeat(time_str.len())
                } else {
                    *last = Some(time_str.clone());
                    time_str
                }
            } else {
                time_str
            };
            head.push_str(&display);
            head.push(' ');
        }

        if self.show_level {
            let level = record.level();
            head.push_str(&format!(
                "[color={}]{:<5}[/color] ",
                Self::level_color(level),
                level.to_string()
            ));
        }

        // Only the head is markup; messages are written as they are.
        let mut line = if self.color {
            markup::render(&head)
        } else {
            markup::plain(&head)
        };
        line.push_str(&record.args().to_string());

        if self.show_target && !record.target().is_empty() {
            line.push_str(" (");
            line.push_str(record.target());
            line.push(')');
        }
        line
    }
}

impl Log for BarLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format_record(record);
        let mut sink = lock_recover(&self.sink);
        let _ = writeln!(sink, "{line}");
    }

    fn flush(&self) {
        let _ = lock_recover(&self.sink).flush();
    }
}

#[cfg(feature = "tracing")]
mod tracing_integration {
    use std::fmt::{Debug, Write as _};

    use log::{Level, Log};
    use tracing::field::{Field, Visit};
    use tracing::{Event, Subscriber};
    use tracing_subscriber::{Layer, layer::Context};

    use super::BarLogger;

    /// `tracing` layer that writes events in the [`BarLogger`] line format.
    ///
    /// Event fields other than `message` are appended as `key=value`.
    #[derive(Debug, Default)]
    pub struct BarTracingLayer {
        logger: BarLogger,
    }

    impl BarTracingLayer {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        #[must_use]
        pub fn with_logger(logger: BarLogger) -> Self {
            Self { logger }
        }

        /// Install a registry with only this layer as the global subscriber.
        ///
        /// # Errors
        ///
        /// Fails if a global subscriber is already set.
        pub fn init(self) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
            use tracing_subscriber::prelude::*;

            tracing::subscriber::set_global_default(tracing_subscriber::registry().with(self))
        }
    }

    /// Collects an event into one line of text.
    #[derive(Default)]
    struct LineVisitor {
        message: String,
        fields: String,
    }

    impl LineVisitor {
        fn push(&mut self, field: &Field, value: &dyn std::fmt::Display) {
            if field.name() == "message" {
                let _ = write!(self.message, "{value}");
            } else {
                let _ = write!(self.fields, " {}={value}", field.name());
            }
        }

        fn finish(self) -> String {
            let line = self.message + &self.fields;
            match line.strip_prefix(' ') {
                Some(rest) => rest.to_string(),
                None => line,
            }
        }
    }

    impl Visit for LineVisitor {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.push(field, &value);
        }

        fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
            self.push(field, &format_args!("{value:?}"));
        }
    }

    impl<S: Subscriber> Layer<S> for BarTracingLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let metadata = event.metadata();
            let mut visitor = LineVisitor::default();
            event.record(&mut visitor);
            let line = visitor.finish();

            self.logger.log(
                &log::Record::builder()
                    .args(format_args!("{line}"))
                    .level(log_level(metadata.level()))
                    .target(metadata.target())
                    .module_path(metadata.module_path())
                    .file(metadata.file())
                    .line(metadata.line())
                    .build(),
            );
        }
    }

    /// Both crates name their levels `TRACE` through `ERROR`.
    fn log_level(level: &tracing::Level) -> Level {
        level.as_str().parse().unwrap_or(Level::Trace)
    }

}

#[cfg(feature = "tracing")]
pub use tracing_integration::BarTracingLayer;
