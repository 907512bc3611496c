//! Core logger types and traits

pub mod context;
pub mod error;
pub mod level;
pub mod line_builder;
pub mod logger;
pub mod metrics;
pub mod timestamp;

pub use context::ContextLogger;
pub use error::{LoggerError, Result};
pub use level::{LevelMask, LogLevel, ALL_LEVELS};
#[cfg(feature = "console")]
pub use line_builder::ColorLineBuilder;
pub use line_builder::{CallSite, ContextMap, DefaultLineBuilder, LineBuilder};
pub use logger::{Logger, LoggerBuilder};
pub use metrics::SinkMetrics;
pub use timestamp::TimestampFormat;
