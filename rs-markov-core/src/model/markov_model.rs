use std::io::Write;
use std::path::Path;

use rand::Rng;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{MarkovError, MarkovResult};
use crate::io::{build_output_path, read_corpus};
use super::generation_input::{validate_max_length, validate_prompt, validate_temperature, GenerationInput};
use super::transition::TransitionMatrix;
use super::vocabulary::Vocabulary;

/// Everything learned from one corpus.
///
/// Built as a whole and swapped into a `MarkovModel` only once complete, so a
/// failed training never leaves half a model behind.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
struct TrainedState {
	vocabulary: Vocabulary,
	transitions: TransitionMatrix,
}

impl TrainedState {
	fn build(corpus: &str) -> MarkovResult<Self> {
		if corpus.is_empty() {
			return Err(MarkovError::EmptyCorpus);
		}

		let vocabulary = Vocabulary::from_corpus(corpus);
		// Every corpus character is in the vocabulary by construction.
		let sequence: Vec<usize> = corpus
			.chars()
			.filter_map(|c| vocabulary.encode(c))
			.collect();
		let transitions = TransitionMatrix::from_sequence(&sequence, vocabulary.len());

		Ok(Self { vocabulary, transitions })
	}

	/// Checks the invariants a deserialized state cannot guarantee by itself.
	fn validate(&self) -> MarkovResult<()> {
		if self.vocabulary.is_empty() {
			return Err(MarkovError::corrupt_snapshot("empty vocabulary"));
		}
		if !self.vocabulary.is_strictly_sorted() {
			return Err(MarkovError::corrupt_snapshot("vocabulary is not strictly sorted"));
		}
		if self.transitions.size() != self.vocabulary.len() || !self.transitions.is_consistent() {
			return Err(MarkovError::corrupt_snapshot(format!(
				"transition matrix does not match a vocabulary of {} characters",
				self.vocabulary.len()
			)));
		}
		if !self.transitions.row_totals_fit() {
			return Err(MarkovError::corrupt_snapshot("transition row total overflows u64"));
		}
		Ok(())
	}

	fn check_index(&self, index: usize) -> MarkovResult<()> {
		if index < self.vocabulary.len() {
			Ok(())
		} else {
			Err(MarkovError::UnknownIndex { index, vocab_size: self.vocabulary.len() })
		}
	}
}

/// First-order (bigram) character Markov model.
///
/// The model learns, for every character of a corpus, how often each other
/// character immediately follows it, then produces new text by repeatedly
/// sampling a successor of the last character.
///
/// Two states only:
/// - untrained (`new`, `default`): `generate` fails with `NotTrained`
/// - trained: after a successful `train`; retraining replaces everything
///
/// Generation never mutates the model, so one trained model can serve any
/// number of calls (see `SharedModel` for concurrent use).
#[derive(Clone, Debug, Default)]
pub struct MarkovModel {
	state: Option<TrainedState>,
}

impl MarkovModel {
	/// Returns an untrained model.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds and trains a model from `corpus`.
	pub fn from_corpus(corpus: &str) -> MarkovResult<Self> {
		let mut model = Self::new();
		model.train(corpus)?;
		Ok(model)
	}

	/// Reads `filepath` as UTF-8 and trains a model on its content.
	///
	/// # Errors
	/// - `CorpusUnavailable` if the file cannot be read
	/// - `EmptyCorpus` if it is empty
	pub fn from_file<P: AsRef<Path>>(filepath: P) -> MarkovResult<Self> {
		let corpus = read_corpus(filepath)?;
		Self::from_corpus(&corpus)
	}

	/// Loads a model from a binary snapshot if one exists next to the corpus,
	/// otherwise trains from the text file and writes the snapshot.
	///
	/// - `filepath` is the corpus, e.g. `data/ci.txt`
	/// - the snapshot is `data/ci.bin`
	///
	/// A stale snapshot is not detected; delete it after editing the corpus.
	pub fn from_file_cached<P: AsRef<Path>>(filepath: P) -> MarkovResult<Self> {
		let binary_data_path = build_output_path(&filepath, "bin")?;
		if binary_data_path.exists() {
			log::info!("Loading model snapshot {}", binary_data_path.display());
			return Self::load(binary_data_path);
		}

		let model = Self::from_file(&filepath)?;
		model.save(&binary_data_path)?;
		Ok(model)
	}

	/// Trains the model on `corpus`.
	///
	/// # Behavior
	/// - Vocabulary: distinct characters sorted by code point.
	/// - Counts every adjacent pair `(corpus[i], corpus[i + 1])`.
	/// - Replaces any previous training on success.
	///
	/// # Errors
	/// Returns `EmptyCorpus` if `corpus` is empty. The model is left as it was.
	pub fn train(&mut self, corpus: &str) -> MarkovResult<()> {
		log::info!("Training model on {} bytes", corpus.len());
		let state = TrainedState::build(corpus)?;
		log::info!("Training done, vocabulary size: {}", state.vocabulary.len());
		self.state = Some(state);
		Ok(())
	}

	/// Reads `filepath` and retrains on it. See `train`.
	pub fn train_from_file<P: AsRef<Path>>(&mut self, filepath: P) -> MarkovResult<()> {
		let corpus = read_corpus(filepath)?;
		self.train(&corpus)
	}

	/// `true` once a training or a snapshot load has succeeded.
	pub fn is_trained(&self) -> bool {
		self.state.is_some()
	}

	fn trained(&self) -> MarkovResult<&TrainedState> {
		self.state.as_ref().ok_or(MarkovError::NotTrained)
	}

	/// Number of distinct characters learned (0 when untrained).
	pub fn vocab_size(&self) -> usize {
		self.state.as_ref().map_or(0, |state| state.vocabulary.len())
	}

	/// The learned vocabulary.
	pub fn vocabulary(&self) -> MarkovResult<&Vocabulary> {
		Ok(&self.trained()?.vocabulary)
	}

	/// The learned transition counts.
	pub fn transitions(&self) -> MarkovResult<&TransitionMatrix> {
		Ok(&self.trained()?.transitions)
	}

	/// Index of `c`, or `None` if it was never seen.
	pub fn encode_char(&self, c: char) -> MarkovResult<Option<usize>> {
		Ok(self.trained()?.vocabulary.encode(c))
	}

	/// Character stored at `index`.
	///
	/// # Errors
	/// `NotTrained`, or `UnknownIndex` if `index >= vocab_size()`.
	pub fn decode_index(&self, index: usize) -> MarkovResult<char> {
		let vocabulary = &self.trained()?.vocabulary;
		vocabulary.decode(index).ok_or(MarkovError::UnknownIndex {
			index,
			vocab_size: vocabulary.len(),
		})
	}

	/// Number of times index `to` followed index `from` in the corpus.
	///
	/// # Errors
	/// `NotTrained`, or `UnknownIndex` for the first index out of range.
	pub fn transition_count(&self, from: usize, to: usize) -> MarkovResult<u64> {
		let state = self.trained()?;
		state.check_index(from)?;
		state.check_index(to)?;
		Ok(state.transitions.count(from, to))
	}

	/// Raw successor counts of index `from`, in vocabulary order.
	pub fn row(&self, from: usize) -> MarkovResult<&[u64]> {
		let state = self.trained()?;
		state.check_index(from)?;
		Ok(state.transitions.row(from))
	}

	/// Characters of `text` absent from the vocabulary, in order of appearance
	/// and without duplicates. Empty when untrained.
	pub fn unknown_chars(&self, text: &str) -> Vec<char> {
		let Some(state) = &self.state else {
			return Vec::new();
		};
		let mut unknown: Vec<char> = Vec::new();
		for c in text.chars() {
			if !state.vocabulary.contains(c) && !unknown.contains(&c) {
				unknown.push(c);
			}
		}
		unknown
	}

	/// Converts `text` to vocabulary indices.
	///
	/// A character never seen during training is replaced by a uniformly random
	/// valid index drawn from `rng`; the output is therefore only reproducible
	/// for in-vocabulary text.
	pub fn encode<R: Rng>(&self, text: &str, rng: &mut R) -> MarkovResult<Vec<usize>> {
		let vocabulary = &self.trained()?.vocabulary;
		Ok(text
			.chars()
			.map(|c| match vocabulary.encode(c) {
				Some(index) => index,
				None => rng.random_range(0..vocabulary.len()),
			})
			.collect())
	}

	/// Converts vocabulary indices back to text.
	///
	/// # Errors
	/// `UnknownIndex` if an index is outside the vocabulary.
	pub fn decode(&self, indices: &[usize]) -> MarkovResult<String> {
		indices.iter().map(|&index| self.decode_index(index)).collect()
	}

	/// Generates text starting with `prompt`.
	///
	/// # Parameters
	/// - `prompt`: non-empty seed text; kept as the output prefix.
	/// - `max_length`: characters to produce including the prompt-seeded one;
	///   the output holds `prompt.chars().count() + max_length - 1` characters.
	/// - `temperature`: > 0; below 1 favours frequent transitions, above 1
	///   flattens toward uniform (advisory range 0.1–1.0).
	/// - `rng`: random source, seedable for reproducible output.
	///
	/// # Behavior
	/// - Unknown prompt characters are replaced by random vocabulary entries
	///   (and reported with a warning), so they appear substituted in the output.
	/// - A character with no observed successor continues uniformly at random.
	///
	/// # Errors
	/// `NotTrained`, `InvalidPrompt`, `InvalidLength`, `InvalidTemperature`,
	/// checked in that order.
	pub fn generate<R: Rng>(
		&self,
		prompt: &str,
		max_length: usize,
		temperature: f64,
		rng: &mut R,
	) -> MarkovResult<String> {
		let state = self.trained()?;
		validate_prompt(prompt)?;
		validate_max_length(max_length)?;
		validate_temperature(temperature)?;

		let unknown = self.unknown_chars(prompt);
		if !unknown.is_empty() {
			log::warn!(
				"Characters not in the training data, replaced by random ones: {}",
				unknown.iter().map(char::to_string).collect::<Vec<_>>().join(", ")
			);
		}
		log::debug!("Generating {} characters from prompt {:?}", max_length - 1, prompt);

		let mut sequence = self.encode(prompt, rng)?;
		for _ in 1..max_length {
			// Non-empty: the prompt is non-empty.
			let current = sequence[sequence.len() - 1];
			let next = state.transitions.sample_next(current, temperature, rng);
			sequence.push(next);
		}

		self.decode(&sequence)
	}

	/// Same as `generate`, with parameters taken from a `GenerationInput`.
	pub fn generate_with<R: Rng>(&self, input: &GenerationInput, rng: &mut R) -> MarkovResult<String> {
		self.generate(input.prompt(), input.max_length(), input.temperature(), rng)
	}

	/// Writes the trained model to `path` with `postcard`.
	///
	/// The file is written to a temporary sibling first and moved into place,
	/// so readers never see a partial snapshot.
	///
	/// # Errors
	/// `NotTrained` if there is nothing to save, `Snapshot`/`Io` on failure.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> MarkovResult<()> {
		let path = path.as_ref();
		let state = self.trained()?;
		let bytes = postcard::to_stdvec(state)?;

		let parent = match path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent,
			_ => Path::new("."),
		};
		let mut temp_file = NamedTempFile::new_in(parent)?;
		temp_file.write_all(&bytes)?;
		temp_file.persist(path).map_err(|e| e.error)?;

		log::debug!("Saved model snapshot {} ({} bytes)", path.display(), bytes.len());
		Ok(())
	}

	/// Reads a model written by `save`.
	///
	/// # Errors
	/// `Io` if the file cannot be read, `Snapshot` if it cannot be decoded,
	/// `CorruptSnapshot` if it decodes to an inconsistent model.
	pub fn load<P: AsRef<Path>>(path: P) -> MarkovResult<Self> {
		let bytes = std::fs::read(path)?;
		let state: TrainedState = postcard::from_bytes(&bytes)?;
		state.validate()?;
		Ok(Self { state: Some(state) })
	}
}
