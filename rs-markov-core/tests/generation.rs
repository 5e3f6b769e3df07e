//! End-to-end generation behaviour: error cases, length contract,
//! temperature effect and fallbacks.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rs_markov_core::{MarkovError, MarkovModel};

fn rng(seed: u64) -> StdRng {
	StdRng::seed_from_u64(seed)
}

#[test]
fn empty_corpus_fails_training() {
	let mut model = MarkovModel::new();
	assert!(matches!(model.train(""), Err(MarkovError::EmptyCorpus)));
	assert!(!model.is_trained());
}

#[test]
fn untrained_model_cannot_generate() {
	let model = MarkovModel::new();
	let err = model.generate("x", 10, 0.5, &mut rng(0)).unwrap_err();
	assert!(matches!(err, MarkovError::NotTrained));
}

#[test]
fn invalid_parameters_are_rejected() {
	let model = MarkovModel::from_corpus("ababab").unwrap();
	assert!(matches!(model.generate("", 10, 0.5, &mut rng(0)), Err(MarkovError::InvalidPrompt)));
	assert!(matches!(model.generate("a", 0, 0.5, &mut rng(0)), Err(MarkovError::InvalidLength(0))));
	assert!(matches!(
		model.generate("a", 10, 0.0, &mut rng(0)),
		Err(MarkovError::InvalidTemperature(_))
	));
	assert!(matches!(
		model.generate("a", 10, -1.0, &mut rng(0)),
		Err(MarkovError::InvalidTemperature(_))
	));
}

#[test]
fn output_length_is_prompt_plus_max_length_minus_one() {
	let model = MarkovModel::from_corpus("ababab").unwrap();
	let text = model.generate("a", 5, 0.8, &mut rng(1)).unwrap();
	assert_eq!(text.chars().count(), 5);
	assert!(text.starts_with('a'));

	let text = model.generate("abba", 7, 0.8, &mut rng(2)).unwrap();
	assert_eq!(text.chars().count(), 4 + 7 - 1);
	assert!(text.starts_with("abba"));
}

#[test]
fn alternating_corpus_alternates() {
	// "ababab": a -> b always, b -> a always, final b has a successor too.
	let model = MarkovModel::from_corpus("ababab").unwrap();
	let text = model.generate("a", 9, 0.5, &mut rng(3)).unwrap();
	assert_eq!(text, "ababababa");
}

#[test]
fn multibyte_corpus_counts_characters_not_bytes() {
	let model = MarkovModel::from_corpus("明月几时有，把酒问青天。不知天上宫阙，今夕是何年。").unwrap();
	let text = model.generate("明月", 12, 0.7, &mut rng(4)).unwrap();
	assert_eq!(text.chars().count(), 13);
	assert!(text.starts_with("明月"));
	let vocabulary = model.vocabulary().unwrap();
	assert!(text.chars().all(|c| vocabulary.contains(c)));
}

#[test]
fn unknown_prompt_character_is_substituted() {
	let model = MarkovModel::from_corpus("abc").unwrap();
	assert_eq!(model.unknown_chars("z"), vec!['z']);
	for seed in 0..20 {
		let text = model.generate("z", 3, 1.0, &mut rng(seed)).unwrap();
		assert_eq!(text.chars().count(), 3);
		assert!(text.chars().all(|c| "abc".contains(c)), "{text}");
	}
}

#[test]
fn substitution_is_uniform_over_the_vocabulary() {
	let model = MarkovModel::from_corpus("abcd").unwrap();
	let mut rng = rng(5);
	let mut seen = [0usize; 4];
	for _ in 0..4_000 {
		let text = model.generate("?", 1, 1.0, &mut rng).unwrap();
		let c = text.chars().next().unwrap();
		seen[(c as u8 - b'a') as usize] += 1;
	}
	assert!(seen.iter().all(|&n| n > 850 && n < 1_150), "{seen:?}");
}

#[test]
fn dead_end_character_continues_uniformly() {
	// 'z' only appears last, so its row is empty.
	let model = MarkovModel::from_corpus("abz").unwrap();
	let z = model.vocabulary().unwrap().encode('z').unwrap();
	assert_eq!(model.transitions().unwrap().row_total(z), 0);

	let mut rng = rng(6);
	let mut seen = [0usize; 3];
	for _ in 0..3_000 {
		let text = model.generate("z", 2, 0.5, &mut rng).unwrap();
		let next = text.chars().nth(1).unwrap();
		let index = model.vocabulary().unwrap().encode(next).unwrap();
		seen[index] += 1;
	}
	assert!(seen.iter().all(|&n| n > 850), "{seen:?}");
}

/// Corpus where 'x' is followed by 'a' nine times and by 'b' once.
fn nine_to_one() -> MarkovModel {
	let corpus = "xaxaxaxaxaxaxaxaxaxb";
	let model = MarkovModel::from_corpus(corpus).unwrap();
	let vocabulary = model.vocabulary().unwrap();
	let x = vocabulary.encode('x').unwrap();
	let transitions = model.transitions().unwrap();
	assert_eq!(transitions.count(x, vocabulary.encode('a').unwrap()), 9);
	assert_eq!(transitions.count(x, vocabulary.encode('b').unwrap()), 1);
	model
}

fn share_of_a(model: &MarkovModel, temperature: f64, trials: usize) -> f64 {
	let mut rng = rng(7);
	let mut hits = 0;
	for _ in 0..trials {
		let text = model.generate("x", 2, temperature, &mut rng).unwrap();
		if text.ends_with('a') {
			hits += 1;
		}
	}
	hits as f64 / trials as f64
}

#[test]
fn low_temperature_converges_to_the_most_frequent_transition() {
	let model = nine_to_one();
	assert!(share_of_a(&model, 0.01, 2_000) > 0.999);
}

#[test]
fn unit_temperature_follows_the_counts() {
	let model = nine_to_one();
	let share = share_of_a(&model, 1.0, 5_000);
	assert!((share - 0.9).abs() < 0.03, "{share}");
}

#[test]
fn high_temperature_flattens_toward_uniform() {
	let model = nine_to_one();
	let share = share_of_a(&model, 100.0, 5_000);
	assert!((share - 0.5).abs() < 0.05, "{share}");
}

#[test]
fn high_temperature_never_picks_unseen_successors() {
	let model = nine_to_one();
	let mut rng = rng(8);
	for _ in 0..1_000 {
		let text = model.generate("x", 2, 100.0, &mut rng).unwrap();
		assert!(!text.ends_with('x'));
	}
}
