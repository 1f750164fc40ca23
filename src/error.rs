//! Error types shared by the library.
//!
//! Losing a bird is not an error; these only cover configuration problems and
//! an evolutionary run that cannot continue.

use thiserror::Error;

/// Errors raised while loading or validating configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("config i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid JSON for the expected structure.
    #[error("config is malformed: {0}")]
    Json(#[from] serde_json::Error),
    /// A value is outside the range the simulation can work with.
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Errors raised by the evolutionary search.
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Every species stagnated away and `reset_on_extinction` is off.
    #[error("complete extinction in generation {0}")]
    CompleteExtinction(u32),
    /// The fitness function left a genome without a fitness value.
    #[error("genome {0} was not assigned a fitness")]
    MissingFitness(usize),
    /// A genome's network does not have the configured layer sizes.
    #[error("genome {id} has layers {found:?}, configuration expects {expected:?}")]
    ShapeMismatch {
        /// Offending genome.
        id: usize,
        /// Layer sizes from the configuration.
        expected: Vec<usize>,
        /// Layer sizes of the genome.
        found: Vec<usize>,
    },
    /// `run` was asked for zero generations.
    #[error("no generations were evaluated")]
    NoGenerations,
}
