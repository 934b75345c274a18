//! Error handling for sumoq.
//!
//! A single [`SumoqError`] type covers configuration, I/O and background
//! producer failures. Producer failures are caught where the producer runs
//! and are only ever logged; nothing here reaches the interactive prompt.

pub mod kinds;

pub use kinds::{ConfigError, ProducerError, Result, SumoqError};
