//! Demo configuration
//!
//! Defaults overridden by `MARKOV_*` environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use rs_markov_core::model::generation_input::{DEFAULT_MAX_LENGTH, DEFAULT_TEMPERATURE};

/// Demo configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Training text (UTF-8)
    pub corpus: PathBuf,
    /// Seed text of every generation
    pub prompt: String,
    /// Characters to produce, prompt-seeded one included
    pub max_length: usize,
    /// Sampling temperature
    pub temperature: f64,
    /// Fixed RNG seed, random when unset
    pub seed: Option<u64>,
    /// Number of texts to print
    pub samples: usize,
    /// Reuse / write the `.bin` snapshot next to the corpus
    pub use_snapshot: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus: PathBuf::from("data/ci.txt"),
            prompt: "明月".to_owned(),
            max_length: DEFAULT_MAX_LENGTH,
            temperature: DEFAULT_TEMPERATURE,
            seed: None,
            samples: 5,
            use_snapshot: true,
        }
    }
}

impl Config {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create config from any key/value source.
    ///
    /// Unparsable values are ignored (with a warning) and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(corpus) = lookup("MARKOV_CORPUS") {
            config.corpus = PathBuf::from(corpus);
        }

        if let Some(prompt) = lookup("MARKOV_PROMPT") {
            config.prompt = prompt;
        }

        if let Some(max_length) = parse(&lookup, "MARKOV_MAX_LENGTH") {
            config.max_length = max_length;
        }

        if let Some(temperature) = parse(&lookup, "MARKOV_TEMPERATURE") {
            config.temperature = temperature;
        }

        config.seed = parse(&lookup, "MARKOV_SEED");

        if let Some(samples) = parse(&lookup, "MARKOV_SAMPLES") {
            config.samples = samples;
        }

        if let Some(value) = lookup("MARKOV_SNAPSHOT") {
            config.use_snapshot = !(value == "0" || value.eq_ignore_ascii_case("false"));
        }

        config
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {key}={raw:?}: not a valid value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(config_from(&[]), Config::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = config_from(&[
            ("MARKOV_CORPUS", "poems.txt"),
            ("MARKOV_PROMPT", "春"),
            ("MARKOV_MAX_LENGTH", "30"),
            ("MARKOV_TEMPERATURE", "0.5"),
            ("MARKOV_SEED", "42"),
            ("MARKOV_SAMPLES", "2"),
            ("MARKOV_SNAPSHOT", "false"),
        ]);
        assert_eq!(config.corpus, PathBuf::from("poems.txt"));
        assert_eq!(config.prompt, "春");
        assert_eq!(config.max_length, 30);
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.samples, 2);
        assert!(!config.use_snapshot);
    }

    #[test]
    fn invalid_numbers_keep_defaults() {
        let config = config_from(&[("MARKOV_MAX_LENGTH", "many"), ("MARKOV_SEED", "-1")]);
        assert_eq!(config.max_length, DEFAULT_MAX_LENGTH);
        assert_eq!(config.seed, None);
    }
}
