//! Speciation: grouping genomes by genetic distance so that new structures
//! compete mostly within their own niche.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::config::SpeciesSetConfig;
use super::genome::{Genome, GenomeId};

/// Species identifier.
pub type SpeciesId = usize;

/// A group of genetically similar genomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species {
    /// Unique identifier.
    pub id: SpeciesId,
    /// Generation the species appeared in.
    pub created: u32,
    /// Last generation its fitness improved.
    pub last_improved: u32,
    /// Genome new members are compared against.
    pub representative: Genome,
    /// Member genome ids.
    pub members: Vec<GenomeId>,
    /// Species fitness from the last stagnation update.
    pub fitness: Option<f32>,
    /// Fitness normalised across species, set during reproduction.
    pub adjusted_fitness: Option<f32>,
    /// Species fitness per generation.
    pub fitness_history: Vec<f32>,
}

impl Species {
    fn new(id: SpeciesId, generation: u32, representative: Genome) -> Self {
        Self {
            id,
            created: generation,
            last_improved: generation,
            members: vec![representative.id],
            representative,
            fitness: None,
            adjusted_fitness: None,
            fitness_history: Vec::new(),
        }
    }

    /// Fitness values of the members found in `genomes`.
    pub fn member_fitnesses(&self, genomes: &[Genome]) -> Vec<f32> {
        genomes
            .iter()
            .filter(|g| self.members.contains(&g.id))
            .filter_map(|g| g.fitness)
            .collect()
    }
}

/// All species of the current generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeciesSet {
    /// Species by id.
    pub species: BTreeMap<SpeciesId, Species>,
    next_id: SpeciesId,
}

impl SpeciesSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of species.
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Returns `true` when no species exist.
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Species containing `genome_id`, if any.
    pub fn species_of(&self, genome_id: GenomeId) -> Option<SpeciesId> {
        self.species
            .values()
            .find(|s| s.members.contains(&genome_id))
            .map(|s| s.id)
    }

    /// Member counts per species, in id order.
    pub fn sizes(&self) -> Vec<usize> {
        self.species.values().map(|s| s.members.len()).collect()
    }

    /// Partitions `genomes` into species.
    ///
    /// Each existing species first picks the closest genome as its new
    /// representative. Remaining genomes join the species whose
    /// representative is closest if that distance is below the compatibility
    /// threshold; otherwise they found a new species. Species that attract no
    /// genome are dropped.
    pub fn speciate(&mut self, genomes: &[Genome], config: &SpeciesSetConfig, generation: u32) {
        let threshold = config.compatibility_threshold;
        let mut unspeciated: Vec<&Genome> = genomes.iter().collect();

        let mut representatives: BTreeMap<SpeciesId, Genome> = BTreeMap::new();
        for (&sid, species) in &self.species {
            let closest = unspeciated
                .par_iter()
                .enumerate()
                .map(|(idx, genome)| (idx, species.representative.distance(genome)))
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((idx, _)) = closest {
                let genome = unspeciated.swap_remove(idx);
                representatives.insert(sid, genome.clone());
            }
        }

        let mut members: BTreeMap<SpeciesId, Vec<GenomeId>> = representatives
            .iter()
            .map(|(&sid, rep)| (sid, vec![rep.id]))
            .collect();

        for genome in unspeciated {
            let closest = representatives
                .par_iter()
                .map(|(&sid, rep)| (sid, rep.distance(genome)))
                .filter(|&(_, distance)| distance < threshold)
                .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

            match closest {
                Some((sid, _)) => {
                    if let Some(list) = members.get_mut(&sid) {
                        list.push(genome.id);
                    }
                }
                None => {
                    let sid = self.next_id;
                    self.next_id += 1;
                    representatives.insert(sid, genome.clone());
                    members.insert(sid, vec![genome.id]);
                }
            }
        }

        let previous = std::mem::take(&mut self.species);
        for (sid, representative) in representatives {
            let member_ids = members.remove(&sid).unwrap_or_default();
            let species = match previous.get(&sid) {
                Some(old) => Species {
                    representative,
                    members: member_ids,
                    ..old.clone()
                },
                None => Species {
                    members: member_ids,
                    ..Species::new(sid, generation, representative)
                },
            };
            self.species.insert(sid, species);
        }

        tracing::debug!(
            generation,
            species = self.species.len(),
            "speciated {} genomes",
            genomes.len()
        );
    }
}
