use std::io;

use thiserror::Error;

/// Errors reported by the n-gram model.
///
/// Premature exhaustion of the input or of the table during generation is
/// never an error: it only shortens the result.
#[derive(Debug, Error)]
pub enum Error {
	/// The model order is below 2.
	#[error("n-gram order must be >= 2, got {0}")]
	InvalidOrder(usize),

	/// An n-gram whose length does not match the model order.
	#[error("malformed n-gram: expected {expected} words, got {found}")]
	Arity { expected: usize, found: usize },

	/// Nothing to start generation from.
	#[error("no data")]
	NoData,

	/// A generation seed that is not a prefix of the model order.
	#[error("seed must contain {expected} words, got {found}")]
	InvalidSeed { expected: usize, found: usize },

	/// The text stream failed while being read.
	#[error("stream read failed: {0}")]
	Io(#[from] io::Error),

	/// A thread panicked while holding the table lock.
	#[error("model lock poisoned")]
	LockPoisoned,
}

/// A learn pass that stopped before consuming its whole input.
///
/// Batches committed before the failure stay in the table; `learned` counts
/// the n-grams they contained.
#[derive(Debug, Error)]
#[error("learning aborted after {learned} n-grams: {source}")]
pub struct LearnError {
	pub learned: usize,
	#[source]
	pub source: Error,
}

impl LearnError {
	pub(crate) fn new(learned: usize, source: impl Into<Error>) -> Self {
		Self { learned, source: source.into() }
	}
}

pub type Result<T> = std::result::Result<T, Error>;
