//! Context-decorated logging
//!
//! A [`ContextLogger`] wraps a [`Logger`] and prepends caller-supplied
//! `[key:value]` tags (a request id, a job name) to every line it logs.
//! Formatting goes through the logger's injected line builder and dispatch
//! through the same sinks; the decorator adds no queuing of its own.
//!
//! Keys render in sorted order, so tag order is deterministic across runs.
//!
//! # Example
//!
//! ```
//! use fanlog::prelude::*;
//!
//! let logger = Logger::builder().build();
//! let request = logger.context().with("LogId", "req-42").with("model", "billing");
//! request.info("charge accepted");
//! ```

use super::level::LogLevel;
use super::line_builder::{CallSite, ContextMap};
use super::logger::Logger;

pub struct ContextLogger<'a> {
    logger: &'a Logger,
    fields: ContextMap,
}

impl<'a> ContextLogger<'a> {
    pub(crate) fn new(logger: &'a Logger) -> Self {
        Self {
            logger,
            fields: ContextMap::new(),
        }
    }

    /// Add one context tag.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.fields.insert(key.into(), value.to_string());
        self
    }

    /// The accumulated tags, in render order.
    #[must_use]
    pub fn fields(&self) -> &ContextMap {
        &self.fields
    }

    /// Format and dispatch one record at `level` with this context.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        self.logger
            .dispatch(level, CallSite::caller(), message.as_ref(), Some(&self.fields));
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
