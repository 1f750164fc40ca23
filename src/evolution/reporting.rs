//! Progress reporting for the evolutionary search.
//!
//! [`Population`](super::population::Population) notifies every registered
//! [`Reporter`] at fixed points of each generation. [`LogReporter`] writes a
//! summary through `tracing`; [`StatisticsReporter`] keeps a fitness history
//! that the stats panel plots.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::config::EvolutionConfig;
use super::genome::Genome;
use super::species::{SpeciesId, SpeciesSet};

/// Receives notifications from a running population.
///
/// Every method has an empty default so reporters only implement what they
/// need.
pub trait Reporter {
    /// A generation is about to be evaluated.
    fn start_generation(&mut self, _generation: u32) {}

    /// Fitness has been assigned to every genome.
    fn post_evaluate(
        &mut self,
        _config: &EvolutionConfig,
        _genomes: &[Genome],
        _species: &SpeciesSet,
        _best: &Genome,
    ) {
    }

    /// The next generation has been bred and speciated.
    fn end_generation(&mut self, _config: &EvolutionConfig, _genomes: &[Genome], _species: &SpeciesSet) {
    }

    /// Every species died out.
    fn complete_extinction(&mut self) {}

    /// The fitness threshold was met, or the run ended.
    fn found_solution(&mut self, _config: &EvolutionConfig, _generation: u32, _best: &Genome) {}

    /// A species was removed for stagnation.
    fn species_stagnant(&mut self, _species: SpeciesId, _size: usize) {}
}

/// The reporters attached to a population.
#[derive(Default)]
pub struct Reporters {
    reporters: Vec<Box<dyn Reporter>>,
}

impl Reporters {
    /// Attaches a reporter.
    pub fn add(&mut self, reporter: Box<dyn Reporter>) {
        self.reporters.push(reporter);
    }

    /// Number of attached reporters.
    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    /// Returns `true` when nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }

    pub(crate) fn start_generation(&mut self, generation: u32) {
        for r in &mut self.reporters {
            r.start_generation(generation);
        }
    }

    pub(crate) fn post_evaluate(
        &mut self,
        config: &EvolutionConfig,
        genomes: &[Genome],
        species: &SpeciesSet,
        best: &Genome,
    ) {
        for r in &mut self.reporters {
            r.post_evaluate(config, genomes, species, best);
        }
    }

    pub(crate) fn end_generation(
        &mut self,
        config: &EvolutionConfig,
        genomes: &[Genome],
        species: &SpeciesSet,
    ) {
        for r in &mut self.reporters {
            r.end_generation(config, genomes, species);
        }
    }

    pub(crate) fn complete_extinction(&mut self) {
        for r in &mut self.reporters {
            r.complete_extinction();
        }
    }

    pub(crate) fn found_solution(&mut self, config: &EvolutionConfig, generation: u32, best: &Genome) {
        for r in &mut self.reporters {
            r.found_solution(config, generation, best);
        }
    }

    pub(crate) fn species_stagnant(&mut self, species: SpeciesId, size: usize) {
        for r in &mut self.reporters {
            r.species_stagnant(species, size);
        }
    }
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f32>() / values.len() as f32
    }
}

fn stdev(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f32>() / values.len() as f32;
    variance.sqrt()
}

fn fitnesses(genomes: &[Genome]) -> Vec<f32> {
    genomes.iter().filter_map(|g| g.fitness).collect()
}

/// Writes a per-generation summary through `tracing`.
pub struct LogReporter {
    show_species_detail: bool,
    generation: u32,
    generation_start: Option<Instant>,
    generation_times: VecDeque<f32>,
}

impl LogReporter {
    /// Creates a reporter; `show_species_detail` adds one line per species.
    pub fn new(show_species_detail: bool) -> Self {
        Self {
            show_species_detail,
            generation: 0,
            generation_start: None,
            generation_times: VecDeque::with_capacity(10),
        }
    }
}

impl Reporter for LogReporter {
    fn start_generation(&mut self, generation: u32) {
        self.generation = generation;
        self.generation_start = Some(Instant::now());
        tracing::info!("running generation {generation}");
    }

    fn post_evaluate(
        &mut self,
        _config: &EvolutionConfig,
        genomes: &[Genome],
        species: &SpeciesSet,
        best: &Genome,
    ) {
        let values = fitnesses(genomes);
        tracing::info!(
            generation = self.generation,
            mean = mean(&values),
            stdev = stdev(&values),
            "population fitness"
        );
        tracing::info!(
            generation = self.generation,
            fitness = best.fitness.unwrap_or_default(),
            genome = best.id,
            species = ?species.species_of(best.id),
            "best genome"
        );
    }

    fn end_generation(&mut self, _config: &EvolutionConfig, genomes: &[Genome], species: &SpeciesSet) {
        tracing::info!(
            generation = self.generation,
            members = genomes.len(),
            species = species.len(),
            "next population"
        );
        if self.show_species_detail {
            for s in species.species.values() {
                tracing::info!(
                    species = s.id,
                    age = self.generation.saturating_sub(s.created),
                    size = s.members.len(),
                    fitness = ?s.fitness,
                    adjusted = ?s.adjusted_fitness,
                    stagnation = self.generation.saturating_sub(s.last_improved),
                    "species"
                );
            }
        }

        if let Some(start) = self.generation_start.take() {
            let elapsed = start.elapsed().as_secs_f32();
            self.generation_times.push_back(elapsed);
            if self.generation_times.len() > 10 {
                self.generation_times.pop_front();
            }
            let average = self.generation_times.iter().sum::<f32>() / self.generation_times.len() as f32;
            tracing::info!("generation time {elapsed:.3}s (average {average:.3}s)");
        }
    }

    fn complete_extinction(&mut self) {
        tracing::warn!(generation = self.generation, "all species extinct");
    }

    fn found_solution(&mut self, _config: &EvolutionConfig, generation: u32, best: &Genome) {
        tracing::info!(
            generation,
            genome = best.id,
            fitness = best.fitness.unwrap_or_default(),
            "best genome of the run"
        );
    }

    fn species_stagnant(&mut self, species: SpeciesId, size: usize) {
        tracing::info!(species, size, "species removed after stagnating");
    }
}

/// Fitness summary of one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number.
    pub generation: u32,
    /// Highest fitness.
    pub best_fitness: f32,
    /// Mean fitness.
    pub mean_fitness: f32,
    /// Standard deviation of fitness.
    pub stdev_fitness: f32,
    /// Member count of every species.
    pub species_sizes: Vec<usize>,
}

/// Fitness history over recent generations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistics {
    /// Oldest first.
    pub generations: VecDeque<GenerationStats>,
    /// Maximum number of generations to keep.
    pub max_history: usize,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            generations: VecDeque::new(),
            max_history: 500,
        }
    }
}

impl Statistics {
    /// Appends a generation's summary.
    pub fn record(&mut self, generation: u32, genomes: &[Genome], species: &SpeciesSet) {
        let values = fitnesses(genomes);
        self.generations.push_back(GenerationStats {
            generation,
            best_fitness: values.iter().copied().fold(f32::NEG_INFINITY, f32::max),
            mean_fitness: mean(&values),
            stdev_fitness: stdev(&values),
            species_sizes: species.sizes(),
        });
        if self.generations.len() > self.max_history {
            self.generations.pop_front();
        }
    }

    /// Best fitness per generation.
    pub fn best_fitness(&self) -> Vec<f32> {
        self.generations.iter().map(|g| g.best_fitness).collect()
    }

    /// Mean fitness per generation.
    pub fn mean_fitness(&self) -> Vec<f32> {
        self.generations.iter().map(|g| g.mean_fitness).collect()
    }

    /// Most recent summary.
    pub fn latest(&self) -> Option<&GenerationStats> {
        self.generations.back()
    }
}

/// Records [`Statistics`] into a shared handle.
#[derive(Clone, Default)]
pub struct StatisticsReporter {
    stats: Arc<Mutex<Statistics>>,
    generation: u32,
}

impl StatisticsReporter {
    /// Creates a reporter with an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the history, readable while the population owns the reporter.
    pub fn handle(&self) -> Arc<Mutex<Statistics>> {
        Arc::clone(&self.stats)
    }
}

impl Reporter for StatisticsReporter {
    fn start_generation(&mut self, generation: u32) {
        self.generation = generation;
    }

    fn post_evaluate(
        &mut self,
        _config: &EvolutionConfig,
        genomes: &[Genome],
        species: &SpeciesSet,
        _best: &Genome,
    ) {
        if let Ok(mut stats) = self.stats.lock() {
            stats.record(self.generation, genomes, species);
        }
    }
}
