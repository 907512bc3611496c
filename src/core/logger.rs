//! The dispatcher: fans formatted lines out to registered sinks
//!
//! A [`Logger`] owns an ordered collection of [`Sink`]s and the injected
//! [`LineBuilder`]. Every write builds the line once and enqueues it on each
//! sink whose level mask matches, in registration order. Each sink has its
//! own queue and consumer, so a slow sink delays delivery to the others only
//! by the time of its own enqueue attempt.
//!
//! Sinks are registered through [`LoggerBuilder`] before [`Logger::start`];
//! there is no dynamic add/remove while running.
//!
//! # Example
//!
//! ```no_run
//! use fanlog::prelude::*;
//!
//! let mut logger = Logger::builder()
//!     .sink(Sink::console(LevelMask::ALL))
//!     .sink(Sink::file("./logs", "app.log", LevelMask::NORMAL, true)?)
//!     .build();
//! logger.start()?;
//!
//! logger.info("service ready");
//!
//! logger.stop();
//! # Ok::<(), fanlog::LoggerError>(())
//! ```

use std::path::Path;

use super::context::ContextLogger;
use super::error::Result;
use super::level::{LevelMask, LogLevel};
use super::line_builder::{CallSite, ContextMap, DefaultLineBuilder, LineBuilder};
use crate::sinks::Sink;

pub struct Logger {
    sinks: Vec<Sink>,
    line_builder: Box<dyn LineBuilder>,
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// The reference wiring: a console sink accepting every level, a
    /// "normal" file `{file_name}` for DEBUG/INFO/TRACE/NOTICE, and a
    /// warning/fatal file `{file_name}.wf`, both rotating hourly.
    ///
    /// The logger is returned unstarted; call [`Logger::start`].
    ///
    /// # Errors
    ///
    /// Fails when either log file cannot be opened.
    pub fn standard(dir: impl AsRef<Path>, file_name: &str) -> Result<Logger> {
        let dir = dir.as_ref();
        Ok(Logger::builder()
            .sink(Sink::console(LevelMask::ALL))
            .sink(Sink::file(dir, file_name, LevelMask::NORMAL, true)?)
            .sink(Sink::file(
                dir,
                &format!("{}.wf", file_name),
                LevelMask::WARN_FATAL,
                true,
            )?)
            .build())
    }

    /// Start every sink, in registration order.
    ///
    /// # Errors
    ///
    /// Propagates the first sink start failure; earlier sinks stay running.
    pub fn start(&mut self) -> Result<()> {
        for sink in &mut self.sinks {
            sink.start()?;
        }
        Ok(())
    }

    /// Stop every sink, in registration order, draining each queue and
    /// closing each destination. Blocks until all consumers have exited.
    pub fn stop(&mut self) {
        for sink in &mut self.sinks {
            sink.stop();
        }
    }

    /// Signal every sink to rotate. Sinks without rotation ignore it.
    pub fn rotate(&self) {
        for sink in &self.sinks {
            sink.signal_rotate();
        }
    }

    /// Registered sinks, in registration order.
    #[must_use]
    pub fn sinks(&self) -> &[Sink] {
        &self.sinks
    }

    /// Fan an already formatted line out to every sink whose mask matches
    /// `level`, in registration order.
    pub fn write(&self, level: LogLevel, line: &str) {
        for sink in &self.sinks {
            if sink.accepts(level) {
                sink.enqueue(line.to_string());
            }
        }
    }

    /// Decorator that stamps `[key:value]` tags onto every line it logs.
    #[must_use]
    pub fn context(&self) -> ContextLogger<'_> {
        ContextLogger::new(self)
    }

    /// Build a line via the injected strategy and dispatch it.
    pub(crate) fn dispatch(
        &self,
        level: LogLevel,
        call_site: CallSite,
        message: &str,
        context: Option<&ContextMap>,
    ) {
        let line = self
            .line_builder
            .build_line(level, call_site, message, context);
        self.write(level, &line);
    }

    /// Format and dispatch one record at `level`.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        self.dispatch(level, CallSite::caller(), message.as_ref(), None);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Trace, message);
    }

    #[inline]
    #[track_caller]
    pub fn notice(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Notice, message);
    }

    #[inline]
    #[track_caller]
    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warning, message);
    }

    #[inline]
    #[track_caller]
    pub fn fatal(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Fatal, message);
    }
}

/// Builder for constructing a Logger with a fluent API
///
/// # Example
///
/// ```
/// use fanlog::prelude::*;
///
/// let logger = Logger::builder()
///     .sink(Sink::console(LevelMask::WARN_FATAL))
///     .line_builder(DefaultLineBuilder::new())
///     .build();
/// ```
pub struct LoggerBuilder {
    sinks: Vec<Sink>,
    line_builder: Box<dyn LineBuilder>,
}

impl LoggerBuilder {
    /// Create a new builder with the default line builder and no sinks
    #[must_use]
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            line_builder: Box::new(DefaultLineBuilder::new()),
        }
    }

    /// Register a sink; registration order is dispatch order.
    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: Sink) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Replace the line-building strategy.
    #[must_use = "builder methods return a new value"]
    pub fn line_builder<B: LineBuilder + 'static>(mut self, builder: B) -> Self {
        self.line_builder = Box::new(builder);
        self
    }

    /// Build the Logger. Sinks stay idle until [`Logger::start`].
    #[must_use]
    pub fn build(self) -> Logger {
        Logger {
            sinks: self.sinks,
            line_builder: self.line_builder,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
