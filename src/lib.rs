//! # Flappy Evo - Neuro-evolved Flappy Bird
//!
//! A side-scrolling flappy bird game whose birds are flown by small neural
//! networks, trained generation by generation through an evolutionary search.
//!
//! ## Features
//!
//! - Deterministic, headless simulation step (rendering is an observer)
//! - Pixel-accurate collision between rotated birds and pipes
//! - Feed-forward network controllers (tanh activation)
//! - Speciated evolution with stagnation, elitism and crossover
//! - Real-time visualization with macroquad and an egui stats panel
//! - JSON configuration and winner persistence
//!
//! ## Core Modules
//!
//! - [`simulation::session`] - One generation's flight, tick by tick
//! - [`simulation::bird`] - Bird kinematics
//! - [`simulation::pipe`] - Scrolling obstacles
//! - [`evolution::population`] - The generation loop
//! - [`driver`] - Connects the two

/// Game simulation: physics, collisions and the per-tick step.
pub mod simulation {
    /// Bird kinematics.
    pub mod bird;
    /// Neural network implementation for bird controllers.
    pub mod brain;
    /// The boundary between a bird and whatever decides its jumps.
    pub mod controller;
    /// Recent events for the HUD.
    pub mod event_log;
    /// Traits for things that occupy pixels or scroll.
    pub mod footprint;
    /// Rotated bounds and origin helpers.
    pub mod geometric_utils;
    /// The scrolling ground strip.
    pub mod ground;
    /// Occupied-pixel masks and their overlap test.
    pub mod mask;
    /// Simulation parameters.
    pub mod params;
    /// Pipe obstacles.
    pub mod pipe;
    /// The simulation step.
    pub mod session;
    /// Collision masks of the game sprites.
    pub mod sprites;
}

/// Evolutionary search over bird controllers.
pub mod evolution {
    /// Search configuration.
    pub mod config;
    /// Genomes and their persistence.
    pub mod genome;
    /// The generation loop.
    pub mod population;
    /// Progress reporting.
    pub mod reporting;
    /// Offspring allocation and breeding.
    pub mod reproduction;
    /// Grouping genomes by distance.
    pub mod species;
    /// Removal of species that stopped improving.
    pub mod stagnation;
}

pub mod driver;
pub mod error;
