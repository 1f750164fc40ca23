//! Glue between the evolutionary search and the simulation.
//!
//! Once per generation the population hands its genomes to
//! [`Driver::evaluate`], which flies one bird per genome through a single
//! session and writes each bird's final fitness back into its genome.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::EvolutionError;
use crate::evolution::config::EvolutionConfig;
use crate::evolution::genome::Genome;
use crate::simulation::brain::Brain;
use crate::simulation::controller::Controller;
use crate::simulation::params::Params;
use crate::simulation::session::{Session, StepOutcome};
use crate::simulation::sprites::Sprites;

/// Runs generations of genomes through the simulation.
pub struct Driver<R = StdRng> {
    /// Simulation parameters shared by every session.
    pub params: Params,
    /// Stops a session after this many ticks; `None` runs until every bird is
    /// gone or the score cap is exceeded.
    pub max_ticks: Option<u64>,
    sprites: Arc<Sprites>,
    rng: R,
}

impl Driver<StdRng> {
    /// Creates a driver; a seed makes pipe placement reproducible.
    pub fn new(params: Params, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self::with_rng(params, rng)
    }
}

impl<R: Rng> Driver<R> {
    /// Creates a driver drawing session seeds from `rng`.
    pub fn with_rng(params: Params, rng: R) -> Self {
        let sprites = Arc::new(Sprites::new(&params));
        Self {
            params,
            max_ticks: None,
            sprites,
            rng,
        }
    }

    /// Collision masks shared by every session.
    pub fn sprites(&self) -> &Arc<Sprites> {
        &self.sprites
    }

    /// Zeroes every genome's fitness and starts a session with one bird per
    /// genome.
    ///
    /// The visual mode steps the returned session itself and calls
    /// [`apply_fitness`] when it ends.
    pub fn session(
        &mut self,
        genomes: &mut [Genome],
        config: &EvolutionConfig,
        generation: u32,
    ) -> Result<Session<Brain>, EvolutionError> {
        let mut controllers = Vec::with_capacity(genomes.len());
        for genome in genomes.iter_mut() {
            controllers.push((genome.id, genome.network(&config.genome)?));
            genome.fitness = Some(0.0);
        }

        let rng = StdRng::from_rng(&mut self.rng);
        Ok(Session::new(
            controllers,
            self.params.clone(),
            Arc::clone(&self.sprites),
            rng,
            generation,
        ))
    }

    /// Evaluates one generation headless.
    ///
    /// Every genome's fitness is overwritten with the fitness its bird
    /// finished the session with.
    pub fn evaluate(
        &mut self,
        genomes: &mut [Genome],
        config: &EvolutionConfig,
        generation: u32,
    ) -> Result<StepOutcome, EvolutionError> {
        let mut session = self.session(genomes, config, generation)?;
        let outcome = session.run_to_end(self.max_ticks);
        apply_fitness(&session, genomes);

        tracing::info!(
            generation,
            score = session.score,
            ticks = session.tick,
            ?outcome,
            "generation flown"
        );
        Ok(outcome)
    }
}

/// Copies each bird's fitness into the genome with the same id.
pub fn apply_fitness<C: Controller, R: Rng>(session: &Session<C, R>, genomes: &mut [Genome]) {
    for (id, fitness) in session.fitness() {
        if let Some(genome) = genomes.iter_mut().find(|g| g.id == id) {
            genome.fitness = Some(fitness);
        }
    }
}
