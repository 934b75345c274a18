//! sumoq Library
//!
//! Context-sensitive completion for Sumo Logic queries, plus the interactive
//! prompt built on it.
//!
//! # Modules
//!
//! - `cache`: Candidate cache shared with the background producers
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `producers`: Background tasks filling the candidate cache
//! - `repl`: Line editor and the completion engine
//! - `session`: Owner of the cache, classifier and producer tasks
//!
//! # Example
//!
//! ```no_run
//! use sumoq::{config::Config, session::Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let session = Session::start(&config, None).await?;
//!
//!     let (start, candidates) = session.completion_engine().complete("_sourceCat", 10);
//!     for candidate in candidates {
//!         println!("{start}: {}", candidate.replacement);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod producers;
pub mod repl;
pub mod session;

// Re-export commonly used types
pub use cache::{CandidateCache, CandidateCategory, ProducerStatus};
pub use config::Config;
pub use error::{Result, SumoqError};
pub use repl::completion::{Classifier, CompletionContext, CompletionEngine, CompletionPair};
pub use repl::ReplEngine;
pub use session::Session;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
