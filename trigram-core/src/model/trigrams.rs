use std::collections::{BTreeMap, HashMap};
use std::io::BufRead;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::Rng;
use rand::seq::IteratorRandom;

use serde::{Deserialize, Serialize};

use super::ngram::{NGram, NGramReader};
use super::state::State;
use super::words::WordReader;
use crate::error::{Error, LearnError, Result};
use crate::io::open_text;

/// Number of n-grams inserted per write lock in `learn_text`.
pub const BATCH_SIZE: usize = 100;

/// Represents a word-level n-gram model.
///
/// The `Model` maps every prefix of `n-1` words to the list of words seen
/// right after it, and generates text by randomly walking that table.
///
/// # Responsibilities
/// - Tokenize text and extract n-grams from it (`learn_text`)
/// - Append continuations under their prefix key (`learn`)
/// - Generate text weighted by observed frequency (`generate`)
/// - Report table size and contents for inspection
///
/// # Concurrency
/// The table sits behind a reader/writer lock. Generations share it, each
/// learn batch takes it exclusively. Tokenization happens outside the lock,
/// and caller code never runs while it is held.
///
/// # Invariants
/// - `n` is always >= 2
/// - Every key splits on `' '` into exactly `n-1` words
/// - Entries are never removed and continuation lists only grow
#[derive(Debug)]
pub struct Model {
	/// The order of the model (number of words in an n-gram)
	n: usize,

	/// Mapping from a prefix key to its observed continuations
	table: RwLock<HashMap<String, State>>,
}

/// Size of the frequency table.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
	/// Distinct prefix keys.
	pub prefixes: usize,
	/// Stored continuations, duplicates included.
	pub continuations: usize,
}

impl Stats {
	/// Average number of continuations per prefix (0 for an empty table).
	pub fn ratio(&self) -> f64 {
		if self.prefixes == 0 {
			return 0.0;
		}
		self.continuations as f64 / self.prefixes as f64
	}
}

impl Model {
	/// Creates an empty model of order `n`.
	///
	/// # Panics
	/// Panics if `n < 2`. Use `try_new` to get an error instead.
	pub fn new(n: usize) -> Self {
		match Self::try_new(n) {
			Ok(model) => model,
			Err(e) => panic!("{e}"),
		}
	}

	/// Creates an empty model of order `n`.
	///
	/// # Errors
	/// Returns `Error::InvalidOrder` if `n < 2`.
	pub fn try_new(n: usize) -> Result<Self> {
		if n < 2 {
			return Err(Error::InvalidOrder(n));
		}
		Ok(Self { n, table: RwLock::new(HashMap::new()) })
	}

	/// Returns the order `n` of the model.
	pub fn order(&self) -> usize {
		self.n
	}

	fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, State>>> {
		self.table.read().map_err(|_| Error::LockPoisoned)
	}

	fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, State>>> {
		self.table.write().map_err(|_| Error::LockPoisoned)
	}

	/// Adds a batch of n-grams to the table under a single write lock.
	///
	/// The input is collected before the lock is taken.
	///
	/// # Errors
	/// Fails with `Error::Arity` on the first n-gram whose length is not `n`.
	/// N-grams before it stay in the table and are counted in
	/// `LearnError::learned`; the rest of the batch is dropped.
	pub fn learn<I>(&self, ngrams: I) -> std::result::Result<usize, LearnError>
	where
		I: IntoIterator<Item = NGram>,
	{
		let batch: Vec<NGram> = ngrams.into_iter().collect();
		let mut table = self.write().map_err(|e| LearnError::new(0, e))?;

		let mut learned = 0;
		for ngram in batch {
			let found = ngram.len();
			match ngram.into_parts() {
				Some((key, continuation)) if found == self.n => {
					table.entry(key).or_default().add_transition(continuation);
					learned += 1;
				}
				_ => {
					return Err(LearnError::new(learned, Error::Arity { expected: self.n, found }));
				}
			}
		}

		Ok(learned)
	}

	/// Tokenizes a stream and learns every n-gram in it.
	///
	/// `keep` lists the non-letter characters kept inside words. N-grams are
	/// committed in batches of `BATCH_SIZE`; batching does not change the
	/// resulting table.
	///
	/// # Errors
	/// A read failure aborts the pass with `Error::Io`. Batches committed
	/// before it stay in the table and are counted in `LearnError::learned`.
	pub fn learn_text<R: BufRead>(&self, reader: R, keep: &str) -> std::result::Result<usize, LearnError> {
		let ngrams = NGramReader::new(WordReader::new(reader, keep), self.n);

		let mut batch = Vec::with_capacity(BATCH_SIZE);
		let mut learned = 0;
		for ngram in ngrams {
			match ngram {
				Ok(ngram) => batch.push(ngram),
				Err(e) => {
					log::warn!("learn pass aborted after {learned} n-grams: {e}");
					return Err(LearnError::new(learned, e));
				}
			}
			if batch.len() == BATCH_SIZE {
				learned += self.commit(&mut batch, learned)?;
			}
		}
		if !batch.is_empty() {
			learned += self.commit(&mut batch, learned)?;
		}

		log::info!("learned {learned} {}-grams", self.n);
		Ok(learned)
	}

	/// Learns the n-grams of an in-memory string.
	pub fn learn_str(&self, text: &str, keep: &str) -> std::result::Result<usize, LearnError> {
		self.learn_text(text.as_bytes(), keep)
	}

	/// Learns the n-grams of a text file.
	pub fn learn_file<P: AsRef<Path>>(&self, path: P, keep: &str) -> std::result::Result<usize, LearnError> {
		let reader = open_text(&path).map_err(|e| LearnError::new(0, e))?;
		log::debug!("learning from {}", path.as_ref().display());
		self.learn_text(reader, keep)
	}

	/// Inserts and clears `batch`, returning how many n-grams went in.
	fn commit(&self, batch: &mut Vec<NGram>, learned: usize) -> std::result::Result<usize, LearnError> {
		let count = self
			.learn(batch.drain(..))
			.map_err(|e| LearnError::new(learned + e.learned, e.source))?;
		log::debug!("committed batch of {count} n-grams ({} so far)", learned + count);
		Ok(count)
	}

	/// Generates text with the thread-local random generator.
	///
	/// See `generate_with`.
	pub fn generate(&self, seed: &str, length: usize) -> Result<String> {
		self.generate_with(seed, length, &mut rand::rng())
	}

	/// Generates up to `length` words after a seed prefix.
	///
	/// # Parameters
	/// - `seed`: `n-1` whitespace-separated words, or empty to start from a
	///   random prefix of the table (uniform over distinct prefixes).
	/// - `length`: maximum number of words added after the seed.
	/// - `rng`: random source used for every draw.
	///
	/// # Returns
	/// The seed words followed by the generated words, joined by single
	/// spaces. Generation stops early, without error, at the first prefix
	/// that has no continuation; a seed absent from the table comes back
	/// unchanged.
	///
	/// # Errors
	/// - `Error::NoData` if the seed is empty and the table is empty.
	/// - `Error::InvalidSeed` if the seed does not have `n-1` words.
	pub fn generate_with<R: Rng + ?Sized>(&self, seed: &str, length: usize, rng: &mut R) -> Result<String> {
		let prefix_len = self.n - 1;
		let table = self.read()?;

		let mut output: Vec<String> = seed.split_whitespace().map(str::to_owned).collect();
		if output.is_empty() {
			let key = table.keys().choose(rng).ok_or(Error::NoData)?;
			output = key.split(' ').map(str::to_owned).collect();
		} else if output.len() != prefix_len {
			return Err(Error::InvalidSeed { expected: prefix_len, found: output.len() });
		}

		for _ in 0..length {
			let key = output[output.len() - prefix_len..].join(" ");
			let Some(word) = table.get(&key).and_then(|state| state.predict(rng)) else {
				break;
			};
			output.push(word.to_owned());
		}

		Ok(output.join(" "))
	}

	/// Returns the number of prefixes and stored continuations.
	pub fn stats(&self) -> Result<Stats> {
		let table = self.read()?;
		Ok(Stats {
			prefixes: table.len(),
			continuations: table.values().map(State::len).sum(),
		})
	}

	/// Returns the continuations recorded for `prefix`, in insertion order.
	///
	/// Whitespace in `prefix` is normalized to single spaces. Unknown
	/// prefixes give an empty list.
	pub fn lookup(&self, prefix: &str) -> Result<Vec<String>> {
		let key = prefix.split_whitespace().collect::<Vec<_>>().join(" ");
		let table = self.read()?;
		Ok(table
			.get(&key)
			.map(|state| state.continuations().to_vec())
			.unwrap_or_default())
	}

	/// Returns a sorted copy of the whole table.
	pub fn grams(&self) -> Result<BTreeMap<String, Vec<String>>> {
		let table = self.read()?;
		Ok(table
			.iter()
			.map(|(key, state)| (key.clone(), state.continuations().to_vec()))
			.collect())
	}

	pub fn is_empty(&self) -> Result<bool> {
		Ok(self.read()?.is_empty())
	}
}
