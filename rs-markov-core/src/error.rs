//! Error type shared by every public operation of the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for Markov model operations.
#[derive(Error, Debug)]
pub enum MarkovError {
	/// The corpus could not be read by the I/O step.
	#[error("Corpus unavailable at {}: {source}", .path.display())]
	CorpusUnavailable {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The corpus was read but contains no character.
	#[error("Corpus is empty")]
	EmptyCorpus,

	/// Generation requested before any successful training.
	#[error("Model is not trained")]
	NotTrained,

	/// Empty generation prompt.
	#[error("Prompt must not be empty")]
	InvalidPrompt,

	/// `max_length` must be at least 1.
	#[error("max_length must be >= 1, got {0}")]
	InvalidLength(usize),

	/// Temperature must be a finite value strictly greater than zero.
	#[error("temperature must be finite and > 0.0, got {0}")]
	InvalidTemperature(f64),

	/// Decoding met an index outside the vocabulary.
	#[error("Index {index} is outside the vocabulary (size {vocab_size})")]
	UnknownIndex { index: usize, vocab_size: usize },

	/// Snapshot (de)serialization failed.
	#[error("Snapshot error: {0}")]
	Snapshot(#[from] postcard::Error),

	/// A decoded snapshot does not describe a consistent model.
	#[error("Corrupt snapshot: {0}")]
	CorruptSnapshot(String),

	/// IO error outside corpus loading (snapshot files).
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// A thread panicked while holding the shared model lock.
	#[error("Model lock poisoned")]
	LockPoisoned,
}

/// Result type for Markov model operations.
pub type MarkovResult<T> = Result<T, MarkovError>;

impl MarkovError {
	/// Create a corpus-unavailable error for `path`.
	pub fn corpus_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::CorpusUnavailable { path: path.into(), source }
	}

	/// Create a corrupt-snapshot error
	pub fn corrupt_snapshot(msg: impl Into<String>) -> Self {
		Self::CorruptSnapshot(msg.into())
	}
}
