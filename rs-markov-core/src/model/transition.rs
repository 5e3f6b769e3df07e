use std::collections::HashMap;
use std::panic;
use std::thread;

use rand::Rng;

use serde::{Deserialize, Serialize};

/// Below this many adjacent pairs the counting stays on the calling thread.
pub const PARALLEL_THRESHOLD: usize = 1 << 16;

/// Number of chunks per CPU when counting in parallel.
const CHUNK_FACTOR: usize = 8;

/// First-order transition counts between vocabulary indices.
///
/// Conceptually a Markov chain where the edge `i -> j` is weighted by the
/// number of times index `j` immediately followed index `i` in the corpus.
/// Stored as a dense row-major `size × size` table, so memory grows as
/// `8 × size²` bytes: about 200 MB for a 5 000-character vocabulary.
///
/// ## Responsibilities:
/// - Accumulate pair occurrences during training (sequentially or in chunks)
/// - Sample the next index from a row, with temperature scaling
///
/// ## Invariants
/// - `counts.len() == size * size`
/// - every row total fits in a `u64`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TransitionMatrix {
	size: usize,
	counts: Vec<u64>,
}

impl TransitionMatrix {
	/// Creates a zero-initialised `size × size` matrix.
	pub fn new(size: usize) -> Self {
		Self { size, counts: vec![0; size * size] }
	}

	/// Counts every adjacent pair of `sequence`.
	///
	/// Every value of `sequence` must be `< size`. Large sequences are split
	/// into chunks counted on worker threads; the result is identical to the
	/// sequential count.
	pub fn from_sequence(sequence: &[usize], size: usize) -> Self {
		if sequence.len().saturating_sub(1) < PARALLEL_THRESHOLD {
			Self::count_sequential(sequence, size)
		} else {
			Self::count_parallel(sequence, size, num_cpus::get() * CHUNK_FACTOR)
		}
	}

	fn count_sequential(sequence: &[usize], size: usize) -> Self {
		let mut matrix = Self::new(size);
		for pair in sequence.windows(2) {
			matrix.add_transition(pair[0], pair[1]);
		}
		matrix
	}

	/// Splits the pairs of `sequence` into `chunks` slices, counts each one into
	/// a sparse `(from, to) -> count` map on a scoped thread and sums the maps.
	///
	/// Consecutive slices overlap by one element so the pair straddling a
	/// boundary is counted exactly once.
	fn count_parallel(sequence: &[usize], size: usize, chunks: usize) -> Self {
		let pairs = sequence.len().saturating_sub(1);
		let mut matrix = Self::new(size);
		if pairs == 0 {
			return matrix;
		}
		let chunk_size = pairs.div_ceil(chunks.max(1));

		let partials: Vec<HashMap<(usize, usize), u64>> = thread::scope(|scope| {
			let handles: Vec<_> = (0..pairs)
				.step_by(chunk_size)
				.map(|start| {
					let end = (start + chunk_size).min(pairs);
					let window = &sequence[start..=end];
					scope.spawn(move || {
						let mut partial = HashMap::new();
						for pair in window.windows(2) {
							*partial.entry((pair[0], pair[1])).or_insert(0) += 1;
						}
						partial
					})
				})
				.collect();
			handles
				.into_iter()
				.map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
				.collect()
		});

		for partial in partials {
			for ((from, to), occurrence) in partial {
				matrix.counts[from * size + to] += occurrence;
			}
		}
		matrix
	}

	/// Dimension of the (square) matrix.
	pub fn size(&self) -> usize {
		self.size
	}

	/// Records one occurrence of `to` following `from`.
	pub fn add_transition(&mut self, from: usize, to: usize) {
		self.counts[from * self.size + to] += 1;
	}

	/// Number of times `to` followed `from`.
	pub fn count(&self, from: usize, to: usize) -> u64 {
		self.counts[from * self.size + to]
	}

	/// Raw counts from `from` to every index.
	pub fn row(&self, from: usize) -> &[u64] {
		&self.counts[from * self.size..(from + 1) * self.size]
	}

	/// Total number of observed successors of `from`, or `None` if it
	/// overflows a `u64`.
	pub fn checked_row_total(&self, from: usize) -> Option<u64> {
		self.row(from).iter().try_fold(0u64, |acc, &count| acc.checked_add(count))
	}

	/// Total number of observed successors of `from`.
	///
	/// Saturates at `u64::MAX`; a trained or validated matrix never reaches it.
	pub fn row_total(&self, from: usize) -> u64 {
		self.checked_row_total(from).unwrap_or(u64::MAX)
	}

	/// `true` when `counts` matches the declared dimension.
	pub(crate) fn is_consistent(&self) -> bool {
		self.size.checked_mul(self.size) == Some(self.counts.len())
	}

	/// `true` when every row total fits in a `u64`.
	pub(crate) fn row_totals_fit(&self) -> bool {
		(0..self.size).all(|from| self.checked_row_total(from).is_some())
	}

	/// Samples the index following `from`.
	///
	/// - A row without any observation falls back to a uniform draw over the
	///   whole vocabulary.
	/// - Otherwise the row is normalised, every probability raised to
	///   `1 / temperature`, renormalised, and sampled.
	///
	/// `temperature` must be finite and > 0 and the matrix non-empty; callers
	/// validate both.
	pub fn sample_next<R: Rng>(&self, from: usize, temperature: f64, rng: &mut R) -> usize {
		let row = self.row(from);
		let total = self.row_total(from);
		if total == 0 {
			return rng.random_range(0..self.size);
		}

		let weights = temperature_weights(row, total, temperature);
		sample_weighted(&weights, rng)
	}
}

/// Turns a row of counts into the temperature-adjusted distribution.
///
/// `p_j^(1/T) / Σ p_k^(1/T)` is computed as `(c_j / c_max)^(1/T)` renormalised:
/// the common factor cancels and the largest weight stays at 1.0, so small
/// temperatures cannot underflow every weight to zero.
fn temperature_weights(row: &[u64], total: u64, temperature: f64) -> Vec<f64> {
	if temperature == 1.0 {
		return row.iter().map(|&count| count as f64 / total as f64).collect();
	}

	let exponent = 1.0 / temperature;
	let max = row.iter().copied().max().unwrap_or(0) as f64;
	let weights: Vec<f64> = row
		.iter()
		.map(|&count| if count == 0 { 0.0 } else { (count as f64 / max).powf(exponent) })
		.collect();
	let sum: f64 = weights.iter().sum();
	weights.into_iter().map(|weight| weight / sum).collect()
}

/// Draws an index with probability proportional to its weight.
///
/// Cumulative subtraction over the weights; zero weights are never chosen.
fn sample_weighted<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
	let total: f64 = weights.iter().sum();
	let mut r = rng.random::<f64>() * total;

	let mut fallback = 0;
	for (index, &weight) in weights.iter().enumerate() {
		if weight <= 0.0 {
			continue;
		}
		if r < weight {
			return index;
		}
		r -= weight;
		fallback = index;
	}

	// Rounding can leave `r` marginally above the last bucket.
	fallback
}
