use std::path::PathBuf;

use clap::Parser;

/// Command line configuration of the server.
///
/// Every option can also be set through its `TRIGRAM_*` environment variable.
#[derive(Parser, Debug, Clone)]
#[command(name = "trigram-server", version, about = "Learns text over HTTP and generates more of it")]
pub struct Config {
	/// Address to listen on
	#[arg(long, env = "TRIGRAM_BIND", default_value = "0.0.0.0:8080")]
	pub bind: String,

	/// Number of words per n-gram (>= 2)
	#[arg(short = 'n', long, env = "TRIGRAM_ORDER", default_value_t = 3, value_parser = parse_order)]
	pub order: usize,

	/// Non-letter characters kept inside words
	#[arg(long, env = "TRIGRAM_KEEP", default_value = "'.,", value_parser = parse_keep)]
	pub keep: String,

	/// Words generated when `length` is missing or not a number
	#[arg(long, env = "TRIGRAM_DEFAULT_LENGTH", default_value_t = 100)]
	pub default_length: usize,

	/// Upper bound on `length` for `/generate`
	#[arg(long, env = "TRIGRAM_MAX_LENGTH", default_value_t = 10_000, value_parser = parse_max_length)]
	pub max_length: usize,

	/// Largest accepted `/learn` body, in bytes
	#[arg(long, env = "TRIGRAM_MAX_BODY", default_value_t = 8 * 1024 * 1024)]
	pub max_body: usize,

	/// HTTP worker threads (defaults to the number of CPUs)
	#[arg(long, env = "TRIGRAM_WORKERS")]
	pub workers: Option<usize>,

	/// Text files learned before the server starts
	#[arg(long = "corpus", value_name = "FILE")]
	pub corpus: Vec<PathBuf>,
}

impl Config {
	pub fn workers(&self) -> usize {
		self.workers.unwrap_or_else(num_cpus::get).max(1)
	}
}

fn parse_order(value: &str) -> Result<usize, String> {
	let n: usize = value.parse().map_err(|_| format!("`{value}` is not a number"))?;
	if n < 2 {
		return Err(format!("order must be >= 2, got {n}"));
	}
	Ok(n)
}

fn parse_keep(value: &str) -> Result<String, String> {
	if value.chars().any(char::is_whitespace) {
		return Err("keep set must not contain whitespace".to_owned());
	}
	Ok(value.to_owned())
}

fn parse_max_length(value: &str) -> Result<usize, String> {
	let n: usize = value.parse().map_err(|_| format!("`{value}` is not a number"))?;
	if n < 2 {
		return Err(format!("max length must be >= 2, got {n}"));
	}
	Ok(n)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let config = Config::try_parse_from(["trigram-server"]).unwrap();
		assert_eq!(config.order, 3);
		assert_eq!(config.keep, "'.,");
		assert_eq!(config.default_length, 100);
		assert_eq!(config.max_length, 10_000);
		assert!(config.corpus.is_empty());
		assert!(config.workers() >= 1);
	}

	#[test]
	fn explicit_values() {
		let config = Config::try_parse_from([
			"trigram-server",
			"--bind",
			"127.0.0.1:9000",
			"-n",
			"4",
			"--keep",
			"'",
			"--workers",
			"2",
			"--corpus",
			"a.txt",
			"--corpus",
			"b.txt",
		])
		.unwrap();
		assert_eq!(config.bind, "127.0.0.1:9000");
		assert_eq!(config.order, 4);
		assert_eq!(config.keep, "'");
		assert_eq!(config.workers(), 2);
		assert_eq!(config.corpus, [PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
	}

	#[test]
	fn rejects_small_order() {
		assert!(Config::try_parse_from(["trigram-server", "--order", "1"]).is_err());
		assert!(Config::try_parse_from(["trigram-server", "--order", "three"]).is_err());
	}

	#[test]
	fn rejects_whitespace_in_keep_set() {
		assert!(Config::try_parse_from(["trigram-server", "--keep", "' "]).is_err());
		assert!(Config::try_parse_from(["trigram-server", "--keep", "\n"]).is_err());
		assert!(Config::try_parse_from(["trigram-server", "--keep", "'-"]).is_ok());
	}

	#[test]
	fn max_length_is_validated() {
		let config = Config::try_parse_from(["trigram-server", "--max-length", "500"]).unwrap();
		assert_eq!(config.max_length, 500);
		assert!(Config::try_parse_from(["trigram-server", "--max-length", "1"]).is_err());
	}
}
