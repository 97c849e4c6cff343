use std::collections::VecDeque;
use std::fmt;
use std::io;

/// An ordered tuple of consecutive words.
///
/// The first `len() - 1` words are the prefix, the last one is the
/// continuation. The arity is not checked here: the model validates it
/// against its own order on insertion.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NGram {
	words: Vec<String>,
}

impl NGram {
	pub fn new<I, S>(words: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { words: words.into_iter().map(Into::into).collect() }
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	pub fn words(&self) -> &[String] {
		&self.words
	}

	/// All words but the last one.
	pub fn prefix(&self) -> &[String] {
		match self.words.split_last() {
			Some((_, prefix)) => prefix,
			None => &[],
		}
	}

	/// Lookup key of the prefix: its words joined by a single space.
	pub fn prefix_key(&self) -> String {
		self.prefix().join(" ")
	}

	pub fn continuation(&self) -> Option<&str> {
		self.words.last().map(String::as_str)
	}

	/// Splits into `(prefix_key, continuation)`.
	pub(crate) fn into_parts(mut self) -> Option<(String, String)> {
		let continuation = self.words.pop()?;
		Some((self.words.join(" "), continuation))
	}
}

impl fmt::Display for NGram {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.words.join(" "))
	}
}

impl From<Vec<String>> for NGram {
	fn from(words: Vec<String>) -> Self {
		Self { words }
	}
}

impl<const N: usize> From<[&str; N]> for NGram {
	fn from(words: [&str; N]) -> Self {
		Self::new(words)
	}
}

/// Pulls successive n-grams out of a word stream.
///
/// Keeps the last `n - 1` words and emits one n-gram per new word. Input
/// shorter than `n` words yields nothing, and trailing words that cannot
/// complete a window are dropped.
#[derive(Debug)]
pub struct NGramReader<I> {
	words: I,
	n: usize,
	window: VecDeque<String>,
	started: bool,
	done: bool,
}

impl<I> NGramReader<I>
where
	I: Iterator<Item = io::Result<String>>,
{
	/// # Panics
	/// Panics if `n < 2`.
	pub fn new(words: I, n: usize) -> Self {
		assert!(n >= 2, "n-gram order must be >= 2, got {n}");
		Self { words, n, window: VecDeque::with_capacity(n - 1), started: false, done: false }
	}

	/// Reads the next n-gram, or `Ok(None)` once the words run out.
	///
	/// End of stream is permanent, and so is a read error.
	pub fn read_ngram(&mut self) -> io::Result<Option<NGram>> {
		if self.done {
			return Ok(None);
		}

		if !self.started {
			self.started = true;
			while self.window.len() < self.n - 1 {
				match self.next_word()? {
					Some(word) => self.window.push_back(word),
					None => return Ok(None),
				}
			}
		}

		let Some(word) = self.next_word()? else {
			return Ok(None);
		};

		let mut words = Vec::with_capacity(self.n);
		words.extend(self.window.iter().cloned());
		words.push(word.clone());

		self.window.pop_front();
		self.window.push_back(word);

		Ok(Some(NGram { words }))
	}

	fn next_word(&mut self) -> io::Result<Option<String>> {
		match self.words.next() {
			Some(Ok(word)) => Ok(Some(word)),
			Some(Err(e)) => {
				self.done = true;
				Err(e)
			}
			None => {
				self.done = true;
				Ok(None)
			}
		}
	}
}

impl<I> Iterator for NGramReader<I>
where
	I: Iterator<Item = io::Result<String>>,
{
	type Item = io::Result<NGram>;

	fn next(&mut self) -> Option<Self::Item> {
		self.read_ngram().transpose()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn fake_words(words: &[&str]) -> std::vec::IntoIter<io::Result<String>> {
		words.iter().map(|w| Ok(w.to_string())).collect::<Vec<_>>().into_iter()
	}

	#[test]
	fn prefix_of_four_gram() {
		let ngram = NGram::from(["a", "b", "c", "d"]);
		assert_eq!(ngram.prefix_key(), "a b c");
		assert_eq!(ngram.continuation(), Some("d"));
		assert_eq!(ngram.to_string(), "a b c d");
	}

	#[test]
	fn into_parts_splits_key() {
		let ngram = NGram::from(["one", "two", "three"]);
		assert_eq!(ngram.into_parts(), Some(("one two".to_owned(), "three".to_owned())));
		assert_eq!(NGram::new(Vec::<String>::new()).into_parts(), None);
	}

	#[test]
	fn empty_ngram_has_empty_prefix() {
		let ngram = NGram::new(Vec::<String>::new());
		assert!(ngram.is_empty());
		assert!(ngram.prefix().is_empty());
		assert_eq!(ngram.continuation(), None);
	}

	#[test]
	fn reads_trigrams() {
		let mut reader = NGramReader::new(fake_words(&["1", "2", "3", "4", "5", "6"]), 3);
		assert_eq!(reader.read_ngram().unwrap().unwrap().to_string(), "1 2 3");
		assert_eq!(reader.read_ngram().unwrap().unwrap().to_string(), "2 3 4");
	}

	#[test]
	fn reads_four_grams() {
		let re: Vec<String> = NGramReader::new(fake_words(&["1", "2", "3", "4", "5", "6"]), 4)
			.map(|ngram| ngram.unwrap().to_string())
			.collect();
		assert_eq!(re, ["1 2 3 4", "2 3 4 5", "3 4 5 6"]);
	}

	#[test]
	fn short_input_yields_nothing() {
		let mut reader = NGramReader::new(fake_words(&["1", "2"]), 3);
		assert!(reader.read_ngram().unwrap().is_none());
		assert!(reader.read_ngram().unwrap().is_none());
	}

	#[test]
	fn empty_input_yields_nothing() {
		let mut reader = NGramReader::new(fake_words(&[]), 3);
		assert!(reader.read_ngram().unwrap().is_none());
	}

	#[test]
	fn exact_window_yields_one() {
		let re: Vec<_> = NGramReader::new(fake_words(&["a", "b", "c"]), 3).collect();
		assert_eq!(re.len(), 1);
	}

	#[test]
	fn read_error_is_propagated_and_final() {
		let words = vec![Ok("a".to_owned()), Ok("b".to_owned()), Ok("c".to_owned()), Err(io::Error::other("boom"))];
		let mut reader = NGramReader::new(words.into_iter(), 3);
		assert_eq!(reader.read_ngram().unwrap().unwrap().to_string(), "a b c");
		assert!(reader.read_ngram().is_err());
		assert!(reader.read_ngram().unwrap().is_none());
	}

	#[test]
	#[should_panic]
	fn order_below_two_panics() {
		NGramReader::new(fake_words(&["a"]), 1);
	}
}
