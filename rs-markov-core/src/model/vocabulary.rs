use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Set of distinct characters seen in a corpus, each with a dense index.
///
/// Indices follow code-point order, so the same corpus always yields the
/// same vocabulary.
///
/// # Invariants
/// - `chars` is strictly increasing (sorted, no duplicates)
/// - `index[chars[i]] == i` for every `i in 0..chars.len()`
///
/// Only `chars` is serialized; `index` is rebuilt on deserialization.
/// A deserialized vocabulary must be checked with `is_strictly_sorted`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(from = "Vec<char>", into = "Vec<char>")]
pub struct Vocabulary {
	/// index → character (`decode`)
	chars: Vec<char>,
	/// character → index (`encode`)
	index: HashMap<char, usize>,
}

impl Vocabulary {
	/// Extracts the vocabulary of `corpus`.
	pub fn from_corpus(corpus: &str) -> Self {
		let distinct: BTreeSet<char> = corpus.chars().collect();
		Self::from_sorted(distinct.into_iter().collect())
	}

	/// Builds the vocabulary from characters already sorted and unique.
	fn from_sorted(chars: Vec<char>) -> Self {
		let index = chars.iter().enumerate().map(|(i, c)| (*c, i)).collect();
		Self { chars, index }
	}

	/// Number of distinct characters.
	pub fn len(&self) -> usize {
		self.chars.len()
	}

	/// `true` if no character was learned.
	pub fn is_empty(&self) -> bool {
		self.chars.is_empty()
	}

	/// Index of `c`, or `None` if the character was never seen.
	pub fn encode(&self, c: char) -> Option<usize> {
		self.index.get(&c).copied()
	}

	/// Character stored at `index`, or `None` if out of range.
	pub fn decode(&self, index: usize) -> Option<char> {
		self.chars.get(index).copied()
	}

	/// `true` if `c` was seen in the corpus.
	pub fn contains(&self, c: char) -> bool {
		self.index.contains_key(&c)
	}

	/// All characters in index order.
	pub fn chars(&self) -> &[char] {
		&self.chars
	}

	/// `true` when the characters are in code-point order without duplicates.
	pub fn is_strictly_sorted(&self) -> bool {
		self.chars.windows(2).all(|pair| pair[0] < pair[1])
	}
}

/// Rebuilds the index without checking the order; see `is_strictly_sorted`.
impl From<Vec<char>> for Vocabulary {
	fn from(chars: Vec<char>) -> Self {
		Self::from_sorted(chars)
	}
}

impl From<Vocabulary> for Vec<char> {
	fn from(vocabulary: Vocabulary) -> Self {
		vocabulary.chars
	}
}
