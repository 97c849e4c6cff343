//! Word-level n-gram model and its input pipeline.
//!
//! Learning runs text through three stages:
//! - `WordReader` splits a UTF-8 stream into words
//! - `NGramReader` slides a fixed-size window over those words
//! - `Model` stores every n-gram as prefix → continuation
//!
//! Generation walks the same table back out (`Model::generate`).

/// Word tokenizer over buffered streams.
pub mod words;

/// N-gram value type and sliding-window extractor.
pub mod ngram;

/// Continuation list of a single prefix.
///
/// Not exposed publicly.
mod state;

/// Shared, lock-protected frequency table and generation.
pub mod trigrams;
