//! # Fanlog
//!
//! A multi-sink logging facility: leveled records fan out to independent
//! sinks (console, a "normal" log file, a warning/fatal log file), each with
//! its own bounded buffer, level bitmask filter, dedicated consumer thread,
//! and optional hourly file rotation.
//!
//! ## Features
//!
//! - **Per-sink buffering**: a bounded queue and one consumer thread per
//!   sink; producers see back-pressure instead of lost lines
//! - **Level masks**: each sink selects severities with a bitmask, so one
//!   record can land in several destinations
//! - **Hourly rotation**: live files archive to `{name}.{YYYYMMDDHH}` with
//!   collision-safe numeric suffixes, and rotation failures never stop
//!   ingestion
//! - **Clean shutdown**: stopping a sink drains its queue completely before
//!   the destination is closed
//!
//! ## Quick start
//!
//! ```no_run
//! use fanlog::prelude::*;
//!
//! let mut logger = Logger::standard("./logs", "app.log")?;
//! logger.start()?;
//!
//! logger.info("service ready");
//! logger.warning("routed to app.log.wf as well as the console");
//!
//! logger.stop();
//! # Ok::<(), fanlog::LoggerError>(())
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::core::ColorLineBuilder;
    pub use crate::core::{
        CallSite, ContextLogger, ContextMap, DefaultLineBuilder, LevelMask, LineBuilder, Logger,
        LoggerBuilder, LoggerError, LogLevel, Result, SinkMetrics, TimestampFormat,
    };
    pub use crate::sinks::{RotationTarget, Sink, SinkOutput, DEFAULT_QUEUE_CAPACITY};
}

#[cfg(feature = "console")]
pub use crate::core::ColorLineBuilder;
pub use crate::core::{
    CallSite, ContextLogger, ContextMap, DefaultLineBuilder, LevelMask, LineBuilder, Logger,
    LoggerBuilder, LoggerError, LogLevel, Result, SinkMetrics, TimestampFormat,
};
pub use crate::sinks::{RotationTarget, Sink, SinkOutput, DEFAULT_QUEUE_CAPACITY};
