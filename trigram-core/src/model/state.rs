use rand::Rng;
use rand::seq::IndexedRandom;

/// Observed continuations of a single prefix.
///
/// Continuations are kept in insertion order with duplicates: a word seen
/// five times appears five times, which is how its weight is encoded.
///
/// ## Invariants
/// - The list only grows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct State {
	continuations: Vec<String>,
}

impl State {
	/// Records one occurrence of `word` after this prefix.
	pub(crate) fn add_transition(&mut self, word: String) {
		self.continuations.push(word);
	}

	pub(crate) fn len(&self) -> usize {
		self.continuations.len()
	}

	pub(crate) fn continuations(&self) -> &[String] {
		&self.continuations
	}

	/// Picks a continuation uniformly over occurrences.
	///
	/// Returns `None` if the state has no transitions.
	pub(crate) fn predict<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		self.continuations.choose(rng).map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn empty_state_predicts_nothing() {
		let state = State::default();
		assert_eq!(state.predict(&mut StdRng::seed_from_u64(1)), None);
	}

	#[test]
	fn keeps_duplicates_in_order() {
		let mut state = State::default();
		for word in ["x", "y", "x"] {
			state.add_transition(word.to_owned());
		}
		assert_eq!(state.len(), 3);
		assert_eq!(state.continuations(), ["x", "y", "x"]);
	}

	#[test]
	fn single_transition_is_always_predicted() {
		let mut state = State::default();
		state.add_transition("only".to_owned());
		let mut rng = StdRng::seed_from_u64(42);
		for _ in 0..10 {
			assert_eq!(state.predict(&mut rng), Some("only"));
		}
	}
}
