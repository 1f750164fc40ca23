//! The population: the generation loop tying evaluation, reproduction and
//! speciation together.

use super::config::EvolutionConfig;
use super::genome::Genome;
use super::reporting::{Reporter, Reporters};
use super::reproduction::Reproduction;
use super::species::SpeciesSet;
use crate::error::{ConfigError, EvolutionError};

/// A generation of genomes and the machinery that breeds the next one.
pub struct Population {
    /// Search configuration.
    pub config: EvolutionConfig,
    /// Genomes of the current generation.
    pub genomes: Vec<Genome>,
    /// Species of the current generation.
    pub species: SpeciesSet,
    /// Current generation number, starting at 0.
    pub generation: u32,
    /// Fittest genome seen so far, with the fitness it was evaluated at.
    pub best_genome: Option<Genome>,
    reproduction: Reproduction,
    reporters: Reporters,
}

impl Population {
    /// Creates a random initial population and speciates it.
    pub fn new(config: EvolutionConfig) -> Result<Self, EvolutionError> {
        config.validate()?;

        let mut reproduction = Reproduction::new();
        let genomes = reproduction.create_new(&config.genome, config.neat.pop_size);
        let mut species = SpeciesSet::new();
        species.speciate(&genomes, &config.species_set, 0);

        Ok(Self {
            config,
            genomes,
            species,
            generation: 0,
            best_genome: None,
            reproduction,
            reporters: Reporters::default(),
        })
    }

    /// Attaches a reporter.
    pub fn add_reporter(&mut self, reporter: Box<dyn Reporter>) {
        self.reporters.add(reporter);
    }

    /// Runs up to `generations` generations, or until the fitness threshold
    /// is met when `generations` is `None`.
    ///
    /// `fitness_fn` is called once per generation and must assign a fitness
    /// to every genome. Returns the fittest genome seen.
    pub fn run<F>(&mut self, mut fitness_fn: F, generations: Option<u32>) -> Result<Genome, EvolutionError>
    where
        F: FnMut(&mut [Genome], &EvolutionConfig) -> Result<(), EvolutionError>,
    {
        if self.config.neat.no_fitness_termination && generations.is_none() {
            return Err(ConfigError::Invalid(
                "neat.no_fitness_termination requires a generation limit",
            )
            .into());
        }
        if generations == Some(0) {
            return Err(EvolutionError::NoGenerations);
        }

        let mut completed = 0;
        while generations.is_none_or(|n| completed < n) {
            completed += 1;

            self.evaluate(&mut fitness_fn)?;
            if self.is_solved() {
                if let Some(best) = &self.best_genome {
                    self.reporters
                        .found_solution(&self.config, self.generation, best);
                }
                break;
            }
            self.advance()?;
        }

        if self.config.neat.no_fitness_termination {
            if let Some(best) = &self.best_genome {
                self.reporters
                    .found_solution(&self.config, self.generation, best);
            }
        }

        self.best_genome.clone().ok_or(EvolutionError::NoGenerations)
    }

    /// Evaluates the current generation.
    ///
    /// Checks that every genome received a fitness, updates the best genome
    /// and notifies reporters.
    pub fn evaluate<F>(&mut self, fitness_fn: F) -> Result<(), EvolutionError>
    where
        F: FnOnce(&mut [Genome], &EvolutionConfig) -> Result<(), EvolutionError>,
    {
        self.reporters.start_generation(self.generation);
        fitness_fn(&mut self.genomes, &self.config)?;

        if let Some(genome) = self.genomes.iter().find(|g| g.fitness.is_none()) {
            return Err(EvolutionError::MissingFitness(genome.id));
        }

        let generation_best = self
            .genomes
            .iter()
            .max_by(|a, b| a.fitness.unwrap_or_default().total_cmp(&b.fitness.unwrap_or_default()));
        if let Some(candidate) = generation_best {
            let improved = self
                .best_genome
                .as_ref()
                .is_none_or(|best| candidate.fitness > best.fitness);
            if improved {
                self.best_genome = Some(candidate.clone());
            }
            self.reporters
                .post_evaluate(&self.config, &self.genomes, &self.species, candidate);
        }
        Ok(())
    }

    /// Returns `true` once the evaluated generation meets the fitness
    /// threshold. Always `false` with `no_fitness_termination`.
    pub fn is_solved(&self) -> bool {
        if self.config.neat.no_fitness_termination {
            return false;
        }
        let values: Vec<f32> = self.genomes.iter().filter_map(|g| g.fitness).collect();
        self.config
            .neat
            .fitness_criterion
            .apply(&values)
            .is_some_and(|fitness| fitness >= self.config.neat.fitness_threshold)
    }

    /// Breeds and speciates the next generation, then advances the
    /// generation counter.
    pub fn advance(&mut self) -> Result<(), EvolutionError> {
        let mut next = self.reproduction.reproduce(
            &self.config,
            &mut self.species,
            &self.genomes,
            self.generation,
            &mut self.reporters,
        );

        if next.is_empty() {
            self.reporters.complete_extinction();
            if !self.config.neat.reset_on_extinction {
                return Err(EvolutionError::CompleteExtinction(self.generation));
            }
            next = self
                .reproduction
                .create_new(&self.config.genome, self.config.neat.pop_size);
        }

        self.genomes = next;
        self.species
            .speciate(&self.genomes, &self.config.species_set, self.generation);
        self.reporters
            .end_generation(&self.config, &self.genomes, &self.species);
        self.generation += 1;
        Ok(())
    }
}
