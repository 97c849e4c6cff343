use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::{env, fs};

/// Decodes the next UTF-8 character from a buffered stream.
///
/// Returns `Ok(None)` at end of stream. Malformed input decodes as
/// `char::REPLACEMENT_CHARACTER`; a byte that cannot continue the current
/// sequence is left for the next call. Only read failures are errors.
pub fn read_char<R: BufRead + ?Sized>(reader: &mut R) -> io::Result<Option<char>> {
	let Some(first) = peek_byte(reader)? else {
		return Ok(None);
	};
	reader.consume(1);

	let Some(width) = utf8_width(first) else {
		return Ok(Some(char::REPLACEMENT_CHARACTER));
	};

	let mut buf = [first, 0, 0, 0];
	for slot in buf.iter_mut().take(width).skip(1) {
		match peek_byte(reader)? {
			Some(byte) if byte & 0xC0 == 0x80 => {
				*slot = byte;
				reader.consume(1);
			}
			_ => return Ok(Some(char::REPLACEMENT_CHARACTER)),
		}
	}

	Ok(std::str::from_utf8(&buf[..width])
		.ok()
		.and_then(|decoded| decoded.chars().next())
		.or(Some(char::REPLACEMENT_CHARACTER)))
}

/// Looks at the next byte without consuming it.
fn peek_byte<R: BufRead + ?Sized>(reader: &mut R) -> io::Result<Option<u8>> {
	loop {
		match reader.fill_buf() {
			Ok(buf) => return Ok(buf.first().copied()),
			Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
			Err(e) => return Err(e),
		}
	}
}

/// Length of a UTF-8 sequence given its first byte.
fn utf8_width(first: u8) -> Option<usize> {
	match first {
		0x00..=0x7F => Some(1),
		0xC2..=0xDF => Some(2),
		0xE0..=0xEF => Some(3),
		0xF0..=0xF4 => Some(4),
		_ => None,
	}
}

/// Opens a corpus file for buffered reading.
pub fn open_text<P: AsRef<Path>>(filename: P) -> io::Result<BufReader<File>> {
	Ok(BufReader::new(File::open(filename)?))
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists all files with a given extension in a directory, sorted by path.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<PathBuf>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			files.push(path);
		}
	}

	files.sort();
	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn decode_all(bytes: &[u8]) -> io::Result<String> {
		let mut reader = bytes;
		let mut out = String::new();
		while let Some(c) = read_char(&mut reader)? {
			out.push(c);
		}
		Ok(out)
	}

	#[test]
	fn decodes_ascii_and_multibyte() {
		let text = "a é ✓ 🦀 z";
		assert_eq!(decode_all(text.as_bytes()).unwrap(), text);
	}

	#[test]
	fn empty_stream_is_end() {
		let mut reader: &[u8] = b"";
		assert!(read_char(&mut reader).unwrap().is_none());
	}

	#[test]
	fn invalid_leading_byte_is_replaced() {
		assert_eq!(decode_all(&[b'a', 0xFF, b'b']).unwrap(), "a\u{FFFD}b");
		// lone continuation byte
		assert_eq!(decode_all(&[0x80, b'x']).unwrap(), "\u{FFFD}x");
	}

	#[test]
	fn truncated_sequence_is_replaced() {
		// first two bytes of a three byte sequence
		assert_eq!(decode_all(&[0xE2, 0x9C]).unwrap(), "\u{FFFD}");
	}

	#[test]
	fn latin1_byte_does_not_swallow_next_char() {
		assert_eq!(decode_all(b"caf\xE9 cr").unwrap(), "caf\u{FFFD} cr");
	}

	#[test]
	fn overlong_sequence_is_replaced() {
		assert_eq!(decode_all(&[0xE0, 0x80, 0x80, b'z']).unwrap(), "\u{FFFD}z");
	}

	#[test]
	fn read_failure_is_an_error() {
		struct Broken;

		impl io::Read for Broken {
			fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
				Err(io::Error::new(io::ErrorKind::ConnectionReset, "gone"))
			}
		}

		let mut reader = BufReader::new(Broken);
		let err = read_char(&mut reader).unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
	}

	#[test]
	fn lists_files_by_extension() {
		let dir = env::temp_dir().join(format!("trigram-io-{}", std::process::id()));
		fs::create_dir_all(&dir).unwrap();
		fs::write(dir.join("b.txt"), "b").unwrap();
		fs::write(dir.join("a.txt"), "a").unwrap();
		fs::write(dir.join("c.bin"), "c").unwrap();

		let files = list_files(&dir, "txt").unwrap();
		let names: Vec<_> = files
			.iter()
			.map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
			.collect();
		assert_eq!(names, vec!["a.txt", "b.txt"]);

		fs::remove_dir_all(&dir).unwrap();
	}
}
