//! Completion system for the sumoq prompt
//!
//! Completion is context-sensitive: the text before the cursor decides which
//! candidate set is offered and how every candidate is written into the query.
//!
//! # Architecture
//!
//! - **Classifier**: ordered rule table mapping the pre-cursor text to a context
//! - **Context**: what to complete and in which render mode
//! - **Catalog**: the static candidate lists
//! - **Render**: formats raw candidates for a context (quoting, `=` suffix)
//! - **Fuzzy**: filters and ranks rendered candidates by the typed word
//! - **Engine**: orchestrates the entire completion flow
//!
//! # Examples
//!
//! ```no_run
//! use sumoq::cache::CandidateCache;
//! use sumoq::repl::completion::CompletionEngine;
//!
//! let (cache, _writers) = CandidateCache::create();
//! let engine = CompletionEngine::new(cache);
//!
//! // Complete "_index=" with the cursor at the end
//! let (start, candidates) = engine.complete("_index=", 7);
//! ```

pub mod catalog;
pub mod classifier;
pub mod context;
mod engine;
pub mod fuzzy;
pub mod render;

pub use classifier::Classifier;
pub use context::{CompletionContext, RenderMode};
pub use engine::{CompletionEngine, CompletionPair};
