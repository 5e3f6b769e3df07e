use std::sync::{Arc, RwLock};

use rand::Rng;

use crate::error::{MarkovError, MarkovResult};
use super::markov_model::MarkovModel;

/// Thread-safe handle on a `MarkovModel`.
///
/// Readers-writer discipline: any number of `generate` calls run together
/// under the read lock, `train` takes the write lock. The new state is built
/// before the write lock is taken, so generations are only blocked for the
/// swap itself.
///
/// Cloning the handle shares the same model.
#[derive(Clone, Debug, Default)]
pub struct SharedModel {
	model: Arc<RwLock<MarkovModel>>,
}

impl SharedModel {
	/// Wraps `model` for shared use.
	pub fn new(model: MarkovModel) -> Self {
		Self { model: Arc::new(RwLock::new(model)) }
	}

	/// Retrains the shared model on `corpus`.
	///
	/// # Errors
	/// `EmptyCorpus` (model untouched) or `LockPoisoned`.
	pub fn train(&self, corpus: &str) -> MarkovResult<()> {
		let trained = MarkovModel::from_corpus(corpus)?;
		let mut model = self.model.write().map_err(|_| MarkovError::LockPoisoned)?;
		*model = trained;
		Ok(())
	}

	/// See `MarkovModel::generate`.
	pub fn generate<R: Rng>(
		&self,
		prompt: &str,
		max_length: usize,
		temperature: f64,
		rng: &mut R,
	) -> MarkovResult<String> {
		let model = self.model.read().map_err(|_| MarkovError::LockPoisoned)?;
		model.generate(prompt, max_length, temperature, rng)
	}

	/// `true` if the wrapped model is trained.
	pub fn is_trained(&self) -> MarkovResult<bool> {
		let model = self.model.read().map_err(|_| MarkovError::LockPoisoned)?;
		Ok(model.is_trained())
	}

	/// Copy of the current model.
	pub fn snapshot(&self) -> MarkovResult<MarkovModel> {
		let model = self.model.read().map_err(|_| MarkovError::LockPoisoned)?;
		Ok(model.clone())
	}
}

impl From<MarkovModel> for SharedModel {
	fn from(model: MarkovModel) -> Self {
		Self::new(model)
	}
}
