#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::fs;
use std::path::PathBuf;

use flappy_evo::error::ConfigError;
use flappy_evo::evolution::config::{EvolutionConfig, FitnessCriterion};
use flappy_evo::evolution::genome::Genome;
use flappy_evo::simulation::params::Params;
use ndarray::Array1;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("flappy_evo_{}_{}", std::process::id(), name))
}

#[test]
fn test_save_and_load_genome() {
    let config = EvolutionConfig::default();
    let mut genome = Genome::new_random(17, &config.genome);
    genome.fitness = Some(42.5);

    let path = temp_path("winner.json");
    let path_str = path.to_str().expect("utf-8 temp path");
    genome.save_to_file(path_str).expect("Failed to save genome");
    assert!(path.exists(), "Save file was not created");

    let loaded = Genome::load_from_file(path_str).expect("Failed to load genome");
    assert_eq!(loaded.id, 17);
    assert_eq!(loaded.fitness, Some(42.5));
    assert_eq!(loaded.brain, genome.brain);

    // The loaded network flies exactly like the saved one.
    let inputs = Array1::from_vec(vec![350.0, 40.0, 160.0]);
    assert_eq!(loaded.brain.think(&inputs), genome.brain.think(&inputs));

    fs::remove_file(&path).ok();
}

#[test]
fn test_save_and_load_params() {
    let params = Params {
        pipe_gap: 180.0,
        score_cap: 10,
        ..Params::default()
    };

    let path = temp_path("params.json");
    let path_str = path.to_str().expect("utf-8 temp path");
    params.save_to_file(path_str).expect("Failed to save params");

    let loaded = Params::load_from_file(path_str).expect("Failed to load params");
    assert_eq!(loaded.pipe_gap, 180.0);
    assert_eq!(loaded.score_cap, 10);
    assert_eq!(loaded.jump_velocity, -10.5);

    fs::remove_file(&path).ok();
}

#[test]
fn test_partial_params_take_defaults() {
    let path = temp_path("partial_params.json");
    fs::write(&path, r#"{ "pipe_velocity": 7.0, "gap_height_range": [100, 300] }"#)
        .expect("write params");

    let loaded = Params::load_from_file(path.to_str().expect("utf-8 temp path"))
        .expect("Failed to load params");
    assert_eq!(loaded.pipe_velocity, 7.0);
    assert_eq!(loaded.gap_height_range, (100, 300));
    assert_eq!(loaded.ground_y, 730.0);

    fs::remove_file(&path).ok();
}

#[test]
fn test_invalid_params_are_rejected() {
    let path = temp_path("bad_params.json");
    fs::write(&path, r#"{ "gap_height_range": [300, 300] }"#).expect("write params");

    let result = Params::load_from_file(path.to_str().expect("utf-8 temp path"));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));

    fs::remove_file(&path).ok();
}

#[test]
fn test_partial_evolution_config_takes_defaults() {
    let path = temp_path("config.json");
    fs::write(
        &path,
        r#"{
            "neat": { "pop_size": 30, "fitness_criterion": "mean" },
            "genome": { "num_hidden": [4] },
            "reproduction": { "elitism": 1 }
        }"#,
    )
    .expect("write config");

    let config = EvolutionConfig::load_from_file(path.to_str().expect("utf-8 temp path"))
        .expect("Failed to load config");
    assert_eq!(config.neat.pop_size, 30);
    assert_eq!(config.neat.fitness_criterion, FitnessCriterion::Mean);
    assert_eq!(config.neat.fitness_threshold, 100.0);
    assert_eq!(config.genome.layer_sizes(), vec![3, 4, 1]);
    assert_eq!(config.reproduction.elitism, 1);
    assert_eq!(config.stagnation.max_stagnation, 20);

    fs::remove_file(&path).ok();
}

#[test]
fn test_malformed_config_is_an_error() {
    let path = temp_path("malformed.json");
    fs::write(&path, "{ not json").expect("write config");

    let result = EvolutionConfig::load_from_file(path.to_str().expect("utf-8 temp path"));
    assert!(matches!(result, Err(ConfigError::Json(_))));

    fs::remove_file(&path).ok();
}

#[test]
fn test_missing_file_is_an_error() {
    let path = temp_path("does_not_exist.json");
    let result = Genome::load_from_file(path.to_str().expect("utf-8 temp path"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_config_round_trips_through_file() {
    let mut config = EvolutionConfig::default();
    config.neat.pop_size = 12;
    config.stagnation.species_fitness_func = FitnessCriterion::Min;

    let path = temp_path("config_roundtrip.json");
    let path_str = path.to_str().expect("utf-8 temp path");
    config.save_to_file(path_str).expect("Failed to save config");
    let loaded = EvolutionConfig::load_from_file(path_str).expect("Failed to load config");

    assert_eq!(loaded.neat.pop_size, 12);
    assert_eq!(loaded.stagnation.species_fitness_func, FitnessCriterion::Min);

    fs::remove_file(&path).ok();
}
