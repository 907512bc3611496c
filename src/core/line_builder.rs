//! Log line construction
//!
//! A record is rendered to one terminated line of text exactly once, then
//! fanned out verbatim to every matching sink. The rendering strategy is a
//! [`LineBuilder`] injected at [`Logger`](crate::core::logger::Logger)
//! construction: [`DefaultLineBuilder`] produces the plain-text wire format,
//! `ColorLineBuilder` (feature `console`) colors the level tag for terminal
//! output.
//!
//! Line format:
//!
//! ```text
//! LEVEL_TAG 2024-03-05 10:05:00 [main.rs:42] [LogId:req-7] message text
//! ```
//!
//! The `[key:value]` segment is omitted when no context is supplied.

use std::collections::BTreeMap;
use std::panic::Location;
use std::path::Path;

use chrono::Local;

use super::level::LogLevel;
use super::timestamp::TimestampFormat;

/// Resolved call site of a log statement.
///
/// Public logging entry points are `#[track_caller]`, so the captured
/// location is the user's call site rather than a frame inside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
}

impl CallSite {
    /// Sentinel rendered as `[???:0]` when no call site is available.
    pub const UNKNOWN: CallSite = CallSite { file: "???", line: 0 };

    /// Capture the nearest caller outside the `#[track_caller]` chain.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self {
            file: location.file(),
            line: location.line(),
        }
    }

    /// Base name of the source file, `???` when it has none.
    fn base_name(&self) -> &str {
        Path::new(self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("???")
    }
}

/// Context tags attached to a line, iterated in key order.
pub type ContextMap = BTreeMap<String, String>;

/// Strategy for assembling one terminated log line.
pub trait LineBuilder: Send + Sync {
    fn build_line(
        &self,
        level: LogLevel,
        call_site: CallSite,
        message: &str,
        context: Option<&ContextMap>,
    ) -> String;
}

/// Replace embedded line breaks so a record occupies one physical line.
fn collapse_newlines(message: &str) -> String {
    message.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Render the common line shape with an already-decorated level tag.
fn render_line(
    tag: &str,
    timestamp_format: &TimestampFormat,
    call_site: CallSite,
    message: &str,
    context: Option<&ContextMap>,
) -> String {
    let timestamp = timestamp_format.format(&Local::now());

    let context_tags = match context {
        Some(map) if !map.is_empty() => {
            let tags: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("[{}:{}]", key, value))
                .collect();
            format!(" {}", tags.join(" "))
        }
        _ => String::new(),
    };

    format!(
        "{} {} [{}:{}]{} {}\n",
        tag,
        timestamp,
        call_site.base_name(),
        call_site.line,
        context_tags,
        collapse_newlines(message),
    )
}

/// Default plain-text line builder.
#[derive(Debug, Clone, Default)]
pub struct DefaultLineBuilder {
    timestamp_format: TimestampFormat,
}

impl DefaultLineBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timestamp format for this builder
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }
}

impl LineBuilder for DefaultLineBuilder {
    fn build_line(
        &self,
        level: LogLevel,
        call_site: CallSite,
        message: &str,
        context: Option<&ContextMap>,
    ) -> String {
        render_line(level.tag(), &self.timestamp_format, call_site, message, context)
    }
}

/// Line builder with ANSI-colored level tags for terminal sinks.
///
/// NOTICE renders blue, WARNING yellow, FATAL red; the other tags stay
/// plain. Everything after the tag matches [`DefaultLineBuilder`].
#[cfg(feature = "console")]
#[derive(Debug, Clone, Default)]
pub struct ColorLineBuilder {
    timestamp_format: TimestampFormat,
}

#[cfg(feature = "console")]
impl ColorLineBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timestamp format for this builder
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn colored_tag(level: LogLevel) -> String {
        use colored::Colorize;

        match level {
            LogLevel::Notice => level.tag().blue().to_string(),
            LogLevel::Warning => level.tag().yellow().to_string(),
            LogLevel::Fatal => level.tag().red().to_string(),
            _ => level.tag().to_string(),
        }
    }
}

#[cfg(feature = "console")]
impl LineBuilder for ColorLineBuilder {
    fn build_line(
        &self,
        level: LogLevel,
        call_site: CallSite,
        message: &str,
        context: Option<&ContextMap>,
    ) -> String {
        render_line(
            &Self::colored_tag(level),
            &self.timestamp_format,
            call_site,
            message,
            context,
        )
    }
}
