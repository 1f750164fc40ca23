//! Detection of species that stopped improving.

use super::config::StagnationConfig;
use super::genome::Genome;
use super::species::{SpeciesId, SpeciesSet};

/// Updates every species' fitness history and reports which species are
/// stagnant.
///
/// Returns `(species id, stagnant)` pairs ordered from the worst to the best
/// species. A species is stagnant once `max_stagnation` generations have
/// passed since its fitness last improved, but the `species_elitism` best
/// species are always kept, and stagnation never removes so many species
/// that fewer than `species_elitism` remain.
pub fn update(
    species_set: &mut SpeciesSet,
    genomes: &[Genome],
    generation: u32,
    config: &StagnationConfig,
) -> Vec<(SpeciesId, bool)> {
    let mut ranked: Vec<(SpeciesId, f32, u32)> = Vec::with_capacity(species_set.len());

    for species in species_set.species.values_mut() {
        let previous_best = species
            .fitness_history
            .iter()
            .copied()
            .fold(None, |best: Option<f32>, f| Some(best.map_or(f, |b| b.max(f))));

        let fitness = config
            .species_fitness_func
            .apply(&species.member_fitnesses(genomes))
            .unwrap_or(f32::NEG_INFINITY);
        species.fitness = Some(fitness);
        species.fitness_history.push(fitness);
        species.adjusted_fitness = None;

        if previous_best.is_none_or(|best| fitness > best) {
            species.last_improved = generation;
        }

        ranked.push((species.id, fitness, species.last_improved));
    }

    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    let total = ranked.len();
    let mut non_stagnant = total;
    ranked
        .into_iter()
        .enumerate()
        .map(|(idx, (sid, _, last_improved))| {
            let stagnant_time = generation.saturating_sub(last_improved);
            let mut stagnant = non_stagnant > config.species_elitism
                && stagnant_time >= config.max_stagnation;
            if total - idx <= config.species_elitism {
                stagnant = false;
            }
            if stagnant {
                non_stagnant -= 1;
            }
            (sid, stagnant)
        })
        .collect()
}
