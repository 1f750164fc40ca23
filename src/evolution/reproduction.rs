//! Creation of the next generation from the current one.
//!
//! Offspring are allotted to species in proportion to their adjusted
//! fitness. Within a species the best genomes survive unchanged, and the rest
//! of its quota is bred from the top fraction of its members.

use std::collections::HashMap;

use rand::Rng;

use super::config::{EvolutionConfig, GenomeConfig};
use super::genome::{Genome, GenomeId};
use super::reporting::Reporters;
use super::species::{SpeciesId, SpeciesSet};
use super::stagnation;

/// Hands out genome ids and breeds new generations.
#[derive(Debug, Clone, Default)]
pub struct Reproduction {
    next_genome_id: GenomeId,
}

impl Reproduction {
    /// Creates a reproduction scheme whose first genome id is 0.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> GenomeId {
        let id = self.next_genome_id;
        self.next_genome_id += 1;
        id
    }

    /// Creates `count` genomes with random weights.
    pub fn create_new(&mut self, config: &GenomeConfig, count: usize) -> Vec<Genome> {
        (0..count)
            .map(|_| Genome::new_random(self.next_id(), config))
            .collect()
    }

    /// Breeds the next generation.
    ///
    /// Stagnant species are removed first. Returns an empty population when
    /// no species survive; the caller decides how to handle the extinction.
    /// Species membership is cleared and must be rebuilt by speciating the
    /// returned genomes.
    pub fn reproduce(
        &mut self,
        config: &EvolutionConfig,
        species_set: &mut SpeciesSet,
        genomes: &[Genome],
        generation: u32,
        reporters: &mut Reporters,
    ) -> Vec<Genome> {
        let mut remaining: Vec<SpeciesId> = Vec::new();
        let mut all_fitnesses: Vec<f32> = Vec::new();

        for (sid, stagnant) in
            stagnation::update(species_set, genomes, generation, &config.stagnation)
        {
            if stagnant {
                if let Some(species) = species_set.species.remove(&sid) {
                    reporters.species_stagnant(sid, species.members.len());
                }
            } else if let Some(species) = species_set.species.get(&sid) {
                all_fitnesses.extend(species.member_fitnesses(genomes));
                remaining.push(sid);
            }
        }

        if remaining.is_empty() {
            species_set.species.clear();
            return Vec::new();
        }

        // Mean member fitness, shifted and scaled into [0, 1] across species.
        let min_fitness = all_fitnesses.iter().copied().fold(f32::INFINITY, f32::min);
        let max_fitness = all_fitnesses
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max);
        let fitness_range = (max_fitness - min_fitness).max(1.0);

        let mut adjusted = Vec::with_capacity(remaining.len());
        let mut previous_sizes = Vec::with_capacity(remaining.len());
        for sid in &remaining {
            let Some(species) = species_set.species.get_mut(sid) else {
                continue;
            };
            let fitnesses = species.member_fitnesses(genomes);
            let mean = if fitnesses.is_empty() {
                min_fitness
            } else {
                fitnesses.iter().sum::<f32>() / fitnesses.len() as f32
            };
            let af = (mean - min_fitness) / fitness_range;
            species.adjusted_fitness = Some(af);
            adjusted.push(af);
            previous_sizes.push(species.members.len());
        }

        let elitism = config.reproduction.elitism;
        let min_species_size = config.reproduction.min_species_size.max(elitism);
        let spawn_amounts = compute_spawn(
            &adjusted,
            &previous_sizes,
            config.neat.pop_size,
            min_species_size,
        );

        let lookup: HashMap<GenomeId, &Genome> = genomes.iter().map(|g| (g.id, g)).collect();
        let mut rng = rand::rng();
        let mut next_generation = Vec::with_capacity(config.neat.pop_size);

        for (sid, spawn) in remaining.iter().zip(spawn_amounts) {
            let Some(species) = species_set.species.get_mut(sid) else {
                continue;
            };
            let spawn = spawn.max(elitism);

            let mut old_members: Vec<&Genome> = species
                .members
                .iter()
                .filter_map(|id| lookup.get(id).copied())
                .collect();
            species.members.clear();
            old_members.sort_by(|a, b| fitness_of(b).total_cmp(&fitness_of(a)));

            let elites = elitism.min(old_members.len());
            for genome in &old_members[..elites] {
                let mut elite = (*genome).clone();
                elite.fitness = None;
                next_generation.push(elite);
            }

            let offspring = spawn.saturating_sub(elites);
            if offspring == 0 {
                continue;
            }

            let cutoff = (config.reproduction.survival_threshold * old_members.len() as f32).ceil()
                as usize;
            let cutoff = cutoff.max(2).min(old_members.len());
            let parents = &old_members[..cutoff];
            if parents.is_empty() {
                continue;
            }

            for _ in 0..offspring {
                let a = parents[rng.random_range(0..parents.len())];
                let b = parents[rng.random_range(0..parents.len())];
                let (parent1, parent2) = if fitness_of(a) >= fitness_of(b) {
                    (a, b)
                } else {
                    (b, a)
                };

                let id = self.next_id();
                let mut child = Genome::crossover(id, parent1, parent2, &config.genome, &mut rng);
                child.mutate(&config.genome);
                next_generation.push(child);
            }
        }

        next_generation
    }
}

fn fitness_of(genome: &Genome) -> f32 {
    genome.fitness.unwrap_or(f32::NEG_INFINITY)
}

/// Number of offspring per species.
///
/// Each species moves halfway from its previous size towards its share of
/// `pop_size` (at least one step when it differs), then the amounts are
/// rescaled to sum to roughly `pop_size`, never below `min_species_size`.
pub fn compute_spawn(
    adjusted_fitness: &[f32],
    previous_sizes: &[usize],
    pop_size: usize,
    min_species_size: usize,
) -> Vec<usize> {
    let af_sum: f32 = adjusted_fitness.iter().sum();
    let min_size = min_species_size as f32;

    let amounts: Vec<f32> = adjusted_fitness
        .iter()
        .zip(previous_sizes)
        .map(|(&af, &previous)| {
            let target = if af_sum > 0.0 {
                (af / af_sum * pop_size as f32).max(min_size)
            } else {
                min_size
            };
            let previous = previous as f32;
            let d = (target - previous) * 0.5;
            let c = d.round();
            if c.abs() > 0.0 {
                previous + c
            } else if d > 0.0 {
                previous + 1.0
            } else if d < 0.0 {
                previous - 1.0
            } else {
                previous
            }
        })
        .collect();

    let total: f32 = amounts.iter().sum();
    if total <= 0.0 {
        return vec![min_species_size; amounts.len()];
    }
    let norm = pop_size as f32 / total;
    amounts
        .iter()
        .map(|n| ((n * norm).round().max(0.0) as usize).max(min_species_size))
        .collect()
}
