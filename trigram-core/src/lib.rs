//! Word-level n-gram text generation library.
//!
//! This crate provides the in-memory core of a trigram-style text generator:
//! - A word tokenizer over UTF-8 streams with a configurable keep set
//! - A sliding-window n-gram extractor
//! - A concurrent prefix → continuations frequency table (`Model`)
//! - Random walk generation weighted by observed frequency
//!
//! Transport, configuration and persistence are left to the caller.

/// Core n-gram model, tokenizer and extractor.
pub mod model;

/// Error types shared by the whole crate.
pub mod error;

/// I/O utilities (character decoding, corpus file helpers).
pub mod io;

pub use error::{Error, LearnError, Result};
pub use model::ngram::NGram;
pub use model::trigrams::{Model, Stats, BATCH_SIZE};
