use crate::error::{MarkovError, MarkovResult};

/// Default number of characters produced, prompt included.
pub const DEFAULT_MAX_LENGTH: usize = 50;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.8;

/// Advisory temperature range. Values outside it are accepted.
pub const ADVISED_TEMPERATURE: std::ops::RangeInclusive<f64> = 0.1..=1.0;

/// Input parameters for a generation call.
///
/// Bundles the prompt, the requested length and the temperature so a host
/// program can validate them once (e.g. when read from user input) and reuse
/// them for many calls.
///
/// # Invariants
/// - `prompt` is non-empty
/// - `max_length >= 1`
/// - `temperature` is finite and > 0
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationInput {
	/// Seed text, kept as the prefix of the output.
	prompt: String,

	/// Number of characters to produce, including prompt-seeded ones.
	/// The output holds `prompt.chars().count() + max_length - 1` characters.
	max_length: usize,

	/// Sampling sharpness (lower = more stable).
	temperature: f64,
}

impl GenerationInput {
	/// Creates an input with the default length and temperature.
	///
	/// # Errors
	/// Returns `InvalidPrompt` if `prompt` is empty.
	pub fn new(prompt: impl Into<String>) -> MarkovResult<Self> {
		let prompt = prompt.into();
		validate_prompt(&prompt)?;
		Ok(Self {
			prompt,
			max_length: DEFAULT_MAX_LENGTH,
			temperature: DEFAULT_TEMPERATURE,
		})
	}

	/// Seed text, never empty.
	pub fn prompt(&self) -> &str {
		&self.prompt
	}

	/// Characters to produce, including the prompt-seeded one.
	pub fn max_length(&self) -> usize {
		self.max_length
	}

	/// Sampling temperature, finite and > 0.
	pub fn temperature(&self) -> f64 {
		self.temperature
	}

	/// `true` if the temperature lies in the advisory 0.1–1.0 range.
	pub fn is_temperature_advised(&self) -> bool {
		ADVISED_TEMPERATURE.contains(&self.temperature)
	}

	/// Replaces the prompt.
	///
	/// # Errors
	/// Returns `InvalidPrompt` if `prompt` is empty; the input is left unchanged.
	pub fn set_prompt(&mut self, prompt: impl Into<String>) -> MarkovResult<()> {
		let prompt = prompt.into();
		validate_prompt(&prompt)?;
		self.prompt = prompt;
		Ok(())
	}

	/// Sets the number of characters to produce.
	///
	/// # Errors
	/// Returns `InvalidLength` if `max_length` is 0.
	pub fn set_max_length(&mut self, max_length: usize) -> MarkovResult<()> {
		validate_max_length(max_length)?;
		self.max_length = max_length;
		Ok(())
	}

	/// Sets the sampling temperature.
	///
	/// # Errors
	/// Returns `InvalidTemperature` if the value is not finite or not > 0.
	pub fn set_temperature(&mut self, temperature: f64) -> MarkovResult<()> {
		validate_temperature(temperature)?;
		self.temperature = temperature;
		Ok(())
	}
}

pub(crate) fn validate_prompt(prompt: &str) -> MarkovResult<()> {
	if prompt.is_empty() {
		return Err(MarkovError::InvalidPrompt);
	}
	Ok(())
}

pub(crate) fn validate_max_length(max_length: usize) -> MarkovResult<()> {
	if max_length == 0 {
		return Err(MarkovError::InvalidLength(max_length));
	}
	Ok(())
}

pub(crate) fn validate_temperature(temperature: f64) -> MarkovResult<()> {
	// NaN fails the comparison as well
	if !(temperature.is_finite() && temperature > 0.0) {
		return Err(MarkovError::InvalidTemperature(temperature));
	}
	Ok(())
}
