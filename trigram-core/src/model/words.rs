use std::io::{self, BufRead};

use crate::io::read_char;

/// Splits a character stream into words.
///
/// A word is a non-empty run of ASCII letters (case preserved) and
/// characters from the keep set. Every other character is a boundary and
/// is discarded. Reading stops for good once the stream is exhausted.
///
/// ```
/// use trigram_core::model::words::WordReader;
///
/// let words: Vec<String> = WordReader::new("don't stop!".as_bytes(), "'")
/// 	.collect::<Result<_, _>>()
/// 	.unwrap();
/// assert_eq!(words, ["don't", "stop"]);
/// ```
#[derive(Debug)]
pub struct WordReader<R> {
	reader: R,
	keep: String,
	finished: bool,
}

impl<R: BufRead> WordReader<R> {
	/// Whitespace in `keep` is ignored: words never contain a separator.
	pub fn new(reader: R, keep: &str) -> Self {
		let keep = keep.chars().filter(|c| !c.is_whitespace()).collect();
		Self { reader, keep, finished: false }
	}

	/// Reads the next word.
	///
	/// Returns `Ok(None)` once the stream is exhausted and no partial word
	/// remains. A read error discards the word being accumulated.
	pub fn read_word(&mut self) -> io::Result<Option<String>> {
		if self.finished {
			return Ok(None);
		}

		let mut word = String::new();
		loop {
			match read_char(&mut self.reader)? {
				Some(c) if self.is_word_char(c) => word.push(c),
				Some(_) if word.is_empty() => continue,
				Some(_) => return Ok(Some(word)),
				None => {
					self.finished = true;
					return Ok((!word.is_empty()).then_some(word));
				}
			}
		}
	}

	fn is_word_char(&self, c: char) -> bool {
		c.is_ascii_alphabetic() || self.keep.contains(c)
	}
}

impl<R: BufRead> Iterator for WordReader<R> {
	type Item = io::Result<String>;

	fn next(&mut self) -> Option<Self::Item> {
		self.read_word().transpose()
	}
}
