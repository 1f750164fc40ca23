//! Configuration of the evolutionary search.
//!
//! The file is JSON with one object per concern, mirroring the classic
//! neuro-evolution layout:
//!
//! ```json
//! {
//!   "neat":         { "fitness_criterion": "max", "fitness_threshold": 100.0, "pop_size": 100 },
//!   "genome":       { "num_inputs": 3, "num_hidden": [], "num_outputs": 1 },
//!   "species_set":  { "compatibility_threshold": 1.5 },
//!   "stagnation":   { "species_fitness_func": "max", "max_stagnation": 20, "species_elitism": 2 },
//!   "reproduction": { "elitism": 2, "survival_threshold": 0.2 }
//! }
//! ```
//!
//! Every field has a default, so sections and fields may be omitted.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How a set of fitness values is reduced to one number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitnessCriterion {
    /// Largest value.
    Max,
    /// Smallest value.
    Min,
    /// Arithmetic mean.
    Mean,
}

impl FitnessCriterion {
    /// Reduces `values`; `None` when empty.
    pub fn apply(self, values: &[f32]) -> Option<f32> {
        if values.is_empty() {
            return None;
        }
        let reduced = match self {
            FitnessCriterion::Max => values.iter().copied().fold(f32::NEG_INFINITY, f32::max),
            FitnessCriterion::Min => values.iter().copied().fold(f32::INFINITY, f32::min),
            FitnessCriterion::Mean => values.iter().sum::<f32>() / values.len() as f32,
        };
        Some(reduced)
    }
}

/// Run-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NeatConfig {
    /// Reduction compared against `fitness_threshold`.
    pub fitness_criterion: FitnessCriterion,
    /// The run stops once the population's fitness reaches this value.
    pub fitness_threshold: f32,
    /// Ignore the threshold and always run the requested generations.
    pub no_fitness_termination: bool,
    /// Genomes per generation.
    pub pop_size: usize,
    /// Start over with a random population when every species dies out.
    pub reset_on_extinction: bool,
}

impl Default for NeatConfig {
    fn default() -> Self {
        Self {
            fitness_criterion: FitnessCriterion::Max,
            fitness_threshold: 100.0,
            no_fitness_termination: false,
            pop_size: 100,
            reset_on_extinction: false,
        }
    }
}

/// Network shape and mutation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenomeConfig {
    /// Sensor inputs; the game provides exactly three.
    pub num_inputs: usize,
    /// Hidden layer sizes, empty for a direct input-to-output network.
    pub num_hidden: Vec<usize>,
    /// Outputs; the first one decides the jump.
    pub num_outputs: usize,
    /// Initial weights are drawn from `[-init_scale, init_scale]`.
    pub init_scale: f32,
    /// Probability that a given weight is perturbed by a mutation.
    pub weight_mutate_rate: f32,
    /// Perturbations are drawn from `[-power, power]`.
    pub weight_mutate_power: f32,
    /// Probability that a child blends two parents instead of cloning one.
    pub crossover_rate: f32,
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self {
            num_inputs: 3,
            num_hidden: Vec::new(),
            num_outputs: 1,
            init_scale: 1.0,
            weight_mutate_rate: 0.8,
            weight_mutate_power: 0.5,
            crossover_rate: 0.75,
        }
    }
}

impl GenomeConfig {
    /// Layer sizes from input to output.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.num_hidden.len() + 2);
        sizes.push(self.num_inputs);
        sizes.extend(&self.num_hidden);
        sizes.push(self.num_outputs);
        sizes
    }
}

/// Speciation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesSetConfig {
    /// Genomes closer than this to a representative join its species.
    pub compatibility_threshold: f32,
}

impl Default for SpeciesSetConfig {
    fn default() -> Self {
        Self {
            compatibility_threshold: 1.5,
        }
    }
}

/// Stagnation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StagnationConfig {
    /// Reduction of member fitness into species fitness.
    pub species_fitness_func: FitnessCriterion,
    /// Generations without improvement before a species is removed.
    pub max_stagnation: u32,
    /// Number of best species protected from stagnation.
    pub species_elitism: usize,
}

impl Default for StagnationConfig {
    fn default() -> Self {
        Self {
            species_fitness_func: FitnessCriterion::Max,
            max_stagnation: 20,
            species_elitism: 2,
        }
    }
}

/// Reproduction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReproductionConfig {
    /// Best genomes of each species copied unchanged into the next generation.
    pub elitism: usize,
    /// Fraction of each species allowed to reproduce.
    pub survival_threshold: f32,
    /// Minimum offspring per surviving species.
    pub min_species_size: usize,
}

impl Default for ReproductionConfig {
    fn default() -> Self {
        Self {
            elitism: 2,
            survival_threshold: 0.2,
            min_species_size: 2,
        }
    }
}

/// Complete configuration of the evolutionary search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Run-level settings.
    pub neat: NeatConfig,
    /// Network shape and mutation.
    pub genome: GenomeConfig,
    /// Speciation.
    pub species_set: SpeciesSetConfig,
    /// Stagnation.
    pub stagnation: StagnationConfig,
    /// Reproduction.
    pub reproduction: ReproductionConfig,
}

impl EvolutionConfig {
    /// Loads and validates a configuration file.
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as pretty JSON.
    pub fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Rejects configurations the search cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.neat.pop_size == 0 {
            return Err(ConfigError::Invalid("neat.pop_size must be positive"));
        }
        if self.genome.num_inputs != 3 {
            return Err(ConfigError::Invalid("genome.num_inputs must be 3"));
        }
        if self.genome.num_outputs == 0 {
            return Err(ConfigError::Invalid("genome.num_outputs must be positive"));
        }
        if self.genome.num_hidden.contains(&0) {
            return Err(ConfigError::Invalid("genome.num_hidden layers must not be empty"));
        }
        if self.genome.init_scale <= 0.0 || self.genome.weight_mutate_power <= 0.0 {
            return Err(ConfigError::Invalid(
                "genome.init_scale and genome.weight_mutate_power must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&self.genome.weight_mutate_rate) {
            return Err(ConfigError::Invalid("genome.weight_mutate_rate must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.genome.crossover_rate) {
            return Err(ConfigError::Invalid("genome.crossover_rate must be in [0, 1]"));
        }
        if self.species_set.compatibility_threshold <= 0.0 {
            return Err(ConfigError::Invalid(
                "species_set.compatibility_threshold must be positive",
            ));
        }
        if !(self.reproduction.survival_threshold > 0.0
            && self.reproduction.survival_threshold <= 1.0)
        {
            return Err(ConfigError::Invalid(
                "reproduction.survival_threshold must be in (0, 1]",
            ));
        }
        if self.reproduction.min_species_size == 0 {
            return Err(ConfigError::Invalid(
                "reproduction.min_species_size must be positive",
            ));
        }
        if self.reproduction.elitism > self.neat.pop_size {
            return Err(ConfigError::Invalid(
                "reproduction.elitism must not exceed neat.pop_size",
            ));
        }
        Ok(())
    }
}
