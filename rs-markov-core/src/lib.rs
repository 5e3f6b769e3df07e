//! Character-level Markov text generation library.
//!
//! This crate provides a first-order (bigram) Markov chain generator:
//! - Vocabulary construction from a text corpus
//! - Transition-count training
//! - Temperature-controlled sampling with an explicit random source
//! - Corpus loading and binary model snapshots
//!
//! ```no_run
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use rs_markov_core::model::markov_model::MarkovModel;
//!
//! let model = MarkovModel::from_corpus("明月几时有，把酒问青天。")?;
//! let mut rng = StdRng::seed_from_u64(7);
//! println!("{}", model.generate("明", 20, 0.8, &mut rng)?);
//! # Ok::<(), rs_markov_core::error::MarkovError>(())
//! ```

/// Markov model, vocabulary and generation logic.
pub mod model;

/// Error type and result alias.
pub mod error;

/// I/O utilities (corpus loading, path helpers).
pub mod io;

pub use error::{MarkovError, MarkovResult};
pub use model::generation_input::GenerationInput;
pub use model::markov_model::MarkovModel;
pub use model::shared::SharedModel;
