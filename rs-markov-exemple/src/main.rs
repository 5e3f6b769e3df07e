mod config;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rs_markov_core::model::generation_input::GenerationInput;
use rs_markov_core::model::markov_model::MarkovModel;

use config::Config;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=info shows training progress, RUST_LOG=debug shows more
    env_logger::init();

    // MARKOV_* variables override the defaults (see config.rs)
    let config = Config::from_env();
    log::info!("Using configuration: {config:?}");

    // Train from the corpus, or load the .bin snapshot written by a previous run
    let model = if config.use_snapshot {
        MarkovModel::from_file_cached(&config.corpus)?
    } else {
        MarkovModel::from_file(&config.corpus)?
    };
    println!("Vocabulary size: {}", model.vocab_size());

    // Prompt, length and temperature are validated once here
    let mut input = GenerationInput::new(config.prompt.clone())?;
    input.set_max_length(config.max_length)?;
    input.set_temperature(config.temperature)?;
    if !input.is_temperature_advised() {
        println!("Temperature {} is outside the advised 0.1-1.0 range", input.temperature());
    }

    // Characters absent from the corpus are replaced by random ones
    let unknown = model.unknown_chars(input.prompt());
    if !unknown.is_empty() {
        println!("Not in the training data, replaced at random: {unknown:?}");
    }

    // Invalid values are rejected, the previous value is kept
    match input.set_temperature(0.0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Temperature 0.0 rejected: {e}"),
    }
    match input.set_max_length(0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Length 0 rejected: {e}"),
    }

    // A fixed seed reproduces the same texts
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    for i in 0..config.samples {
        println!("Generated text {}: {}", i + 1, model.generate_with(&input, &mut rng)?);
    }

    Ok(())
}
