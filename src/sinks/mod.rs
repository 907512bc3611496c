//! Sink implementations: destinations, consumer loops, rotation

pub mod rotation;
pub mod sink;

pub use rotation::{RotationTarget, MAX_SUFFIX_PROBES};
pub use sink::{Sink, SinkOutput, DEFAULT_QUEUE_CAPACITY};
