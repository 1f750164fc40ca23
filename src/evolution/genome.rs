//! Genomes: a candidate network plus the fitness the simulation assigns it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::GenomeConfig;
use crate::error::{ConfigError, EvolutionError};
use crate::simulation::brain::Brain;

/// Unique genome identifier within a run.
pub type GenomeId = usize;

/// A candidate controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genome {
    /// Unique identifier.
    pub id: GenomeId,
    /// Network weights.
    pub brain: Brain,
    /// Fitness from the last evaluation; `None` until evaluated.
    pub fitness: Option<f32>,
}

impl Genome {
    /// Creates a genome with random weights.
    pub fn new_random(id: GenomeId, config: &GenomeConfig) -> Self {
        Self {
            id,
            brain: Brain::new(&config.layer_sizes(), config.init_scale),
            fitness: None,
        }
    }

    /// Builds the feed-forward controller this genome encodes.
    ///
    /// Fails when the genome was built for a different network shape, for
    /// example a winner saved under another configuration.
    pub fn network(&self, config: &GenomeConfig) -> Result<Brain, EvolutionError> {
        let expected = config.layer_sizes();
        let found = self.brain.layer_sizes();
        if expected != found {
            return Err(EvolutionError::ShapeMismatch {
                id: self.id,
                expected,
                found,
            });
        }
        Ok(self.brain.clone())
    }

    /// Genetic distance used for speciation.
    pub fn distance(&self, other: &Genome) -> f32 {
        Brain::distance(&self.brain, &other.brain)
    }

    /// Creates a child of two parents.
    ///
    /// With probability `config.crossover_rate` the parents are blended with
    /// a random weight; otherwise, or when both parents are the same genome,
    /// the child is a copy of `parent1`.
    pub fn crossover<R: Rng + ?Sized>(
        id: GenomeId,
        parent1: &Genome,
        parent2: &Genome,
        config: &GenomeConfig,
        rng: &mut R,
    ) -> Self {
        let blend = parent1.id != parent2.id && rng.random::<f32>() < config.crossover_rate;
        let brain = if !blend {
            parent1.brain.clone()
        } else {
            Brain::crossover_weighted(&parent1.brain, &parent2.brain, rng.random::<f32>())
        };
        Self {
            id,
            brain,
            fitness: None,
        }
    }

    /// Perturbs the weights.
    pub fn mutate(&mut self, config: &GenomeConfig) {
        self.brain
            .mutate(config.weight_mutate_power, config.weight_mutate_rate);
    }

    /// Saves the genome as pretty JSON.
    pub fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a genome saved with [`Genome::save_to_file`].
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let genome = serde_json::from_str(&json)?;
        Ok(genome)
    }
}
