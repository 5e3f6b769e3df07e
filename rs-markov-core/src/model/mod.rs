//! Top-level module for the Markov text generator.
//!
//! This module provides a first-order character model, including:
//! - Vocabulary extraction (`Vocabulary`)
//! - Transition counting and sampling (`TransitionMatrix`)
//! - Training and generation (`MarkovModel`)
//! - Generation parameters (`GenerationInput`)
//! - A readers-writer handle for concurrent use (`SharedModel`)

/// Trained model: training, text generation and snapshots.
///
/// Owns the vocabulary and the transition matrix of one corpus.
pub mod markov_model;

/// Distinct corpus characters with a stable, code-point ordered index.
pub mod vocabulary;

/// Dense first-order transition counts.
///
/// Handles pair counting (sequential or chunked over threads),
/// temperature scaling and weighted sampling of the next index.
pub mod transition;

/// Validated generation parameters (prompt, length, temperature).
pub mod generation_input;

/// `Arc<RwLock<MarkovModel>>` wrapper.
pub mod shared;
