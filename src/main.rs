use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use flappy_evo::driver::{Driver, apply_fitness};
use flappy_evo::evolution::config::EvolutionConfig;
use flappy_evo::evolution::genome::Genome;
use flappy_evo::evolution::population::Population;
use flappy_evo::evolution::reporting::{LogReporter, Statistics, StatisticsReporter};
use flappy_evo::simulation::params::Params;
use macroquad::prelude::*;
use tracing::{error, info};

mod graphics;
mod ui;

/// Flappy bird flown by neuro-evolved networks.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Evolution configuration (JSON); built-in defaults when omitted.
    #[arg(long)]
    config: Option<String>,
    /// Simulation parameters (JSON); built-in defaults when omitted.
    #[arg(long)]
    params: Option<String>,
    /// Maximum number of generations.
    #[arg(long, default_value_t = 50)]
    generations: u32,
    /// Train without opening a window.
    #[arg(long)]
    headless: bool,
    /// Seed for pipe placement.
    #[arg(long)]
    seed: Option<u64>,
    /// Stop each session after this many ticks.
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Where to save the winning genome; a timestamped file by default.
    #[arg(long)]
    save_winner: Option<String>,
    /// Fly a saved genome instead of training.
    #[arg(long)]
    replay: Option<String>,
    /// Log one line per species after each generation.
    #[arg(long)]
    species_detail: bool,
}

fn window_conf() -> Conf {
    let params = Params::default();
    Conf {
        window_title: "Flappy Evo".to_owned(),
        window_width: params.window_width as i32,
        window_height: params.window_height as i32,
        window_resizable: false,
        ..Default::default()
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EvolutionConfig::load_from_file(path)
            .with_context(|| format!("loading evolution config {path}"))?,
        None => EvolutionConfig::default(),
    };
    let params = match &args.params {
        Some(path) => Params::load_from_file(path)
            .with_context(|| format!("loading simulation params {path}"))?,
        None => Params::default(),
    };

    let mut driver = Driver::new(params, args.seed);
    driver.max_ticks = args.max_ticks;

    if let Some(path) = &args.replay {
        let genome =
            Genome::load_from_file(path).with_context(|| format!("loading genome {path}"))?;
        info!(genome = genome.id, "replaying {path}");
        if args.headless {
            let mut genomes = [genome];
            let outcome = driver.evaluate(&mut genomes, &config, 0)?;
            info!(fitness = genomes[0].fitness.unwrap_or_default(), ?outcome, "replay finished");
        } else {
            macroquad::Window::from_config(window_conf(), replay(driver, config, genome));
        }
        return Ok(());
    }

    let mut population = Population::new(config).context("creating population")?;
    population.add_reporter(Box::new(LogReporter::new(args.species_detail)));
    let statistics = StatisticsReporter::new();
    let stats = statistics.handle();
    population.add_reporter(Box::new(statistics));

    let winner_path = args.save_winner.clone().unwrap_or_else(|| {
        format!(
            "winner-{}.json",
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        )
    });

    if args.headless {
        let mut generation = 0;
        let winner = population.run(
            |genomes, config| {
                driver.evaluate(genomes, config, generation)?;
                generation += 1;
                Ok(())
            },
            Some(args.generations),
        )?;
        save_winner(&winner, &winner_path)?;
    } else {
        macroquad::Window::from_config(
            window_conf(),
            train(population, driver, stats, args.generations, winner_path),
        );
    }

    Ok(())
}

fn save_winner(winner: &Genome, path: &str) -> Result<()> {
    winner
        .save_to_file(path)
        .with_context(|| format!("saving winner to {path}"))?;
    info!(
        genome = winner.id,
        fitness = winner.fitness.unwrap_or_default(),
        "winner saved to {path}"
    );
    Ok(())
}

/// Ends the process as soon as the window asks to close, mid-generation or not.
fn exit_if_quit_requested() {
    if is_quit_requested() {
        info!("quit requested");
        std::process::exit(0);
    }
}

async fn train(
    mut population: Population,
    mut driver: Driver,
    stats: Arc<Mutex<Statistics>>,
    generations: u32,
    winner_path: String,
) {
    prevent_quit();
    let mut ui_state = ui::UIState::new();
    let tick_interval = 1.0 / f64::from(driver.params.ticks_per_second);

    for _ in 0..generations {
        let generation = population.generation;
        let mut session =
            match driver.session(&mut population.genomes, &population.config, generation) {
                Ok(session) => session,
                Err(err) => {
                    error!("cannot start generation {generation}: {err}");
                    return;
                }
            };

        let mut last_tick = get_time();
        while session.finished().is_none() {
            exit_if_quit_requested();
            if is_key_pressed(KeyCode::S) {
                ui_state.show_stats = !ui_state.show_stats;
            }

            if get_time() - last_tick >= tick_interval {
                last_tick = get_time();
                for _ in 0..ui_state.simulation_speed {
                    if driver.max_ticks.is_some_and(|limit| session.tick >= limit) {
                        session.run_to_end(driver.max_ticks);
                        break;
                    }
                    session.step();
                }
            }

            graphics::draw_session(&session);
            if let Ok(stats) = stats.lock() {
                ui::draw_ui(&mut ui_state, &stats);
            }
            ui::process_egui();
            next_frame().await;
        }

        let evaluated = population.evaluate(|genomes, _config| {
            apply_fitness(&session, genomes);
            Ok(())
        });
        if let Err(err) = evaluated {
            error!("generation {generation} failed: {err}");
            return;
        }
        ui_state.species_count = population.species.len();
        ui_state.best_fitness = population.best_genome.as_ref().and_then(|g| g.fitness);
        ui_state.status_message = Some(format!(
            "Generation {generation}: score {} after {} ticks",
            session.score, session.tick
        ));

        if population.is_solved() {
            info!(generation, "fitness threshold reached");
            ui_state.status_message = Some("Fitness threshold reached".to_owned());
            break;
        }
        if let Err(err) = population.advance() {
            error!("{err}");
            break;
        }
    }

    if let Some(winner) = &population.best_genome {
        if let Err(err) = save_winner(winner, &winner_path) {
            error!("{err:#}");
        }
    }
}

async fn replay(mut driver: Driver, config: EvolutionConfig, genome: Genome) {
    prevent_quit();
    let mut ui_state = ui::UIState::new();
    ui_state.show_stats = false;
    let stats = Statistics::default();
    let tick_interval = 1.0 / f64::from(driver.params.ticks_per_second);

    let mut genomes = [genome];
    let mut session = match driver.session(&mut genomes, &config, 0) {
        Ok(session) => session,
        Err(err) => {
            error!("cannot replay genome: {err}");
            return;
        }
    };

    let mut last_tick = get_time();
    loop {
        exit_if_quit_requested();
        if session.finished().is_none() && get_time() - last_tick >= tick_interval {
            last_tick = get_time();
            for _ in 0..ui_state.simulation_speed {
                session.step();
            }
            if let Some(outcome) = session.finished() {
                ui_state.show_stats = true;
                ui_state.status_message =
                    Some(format!("{outcome:?} with score {}, Escape to quit", session.score));
            }
        }
        if is_key_pressed(KeyCode::S) {
            ui_state.show_stats = !ui_state.show_stats;
        }
        if session.finished().is_some() && is_key_pressed(KeyCode::Escape) {
            break;
        }

        graphics::draw_session(&session);
        ui::draw_ui(&mut ui_state, &stats);
        ui::process_egui();
        next_frame().await;
    }

    info!(score = session.score, ticks = session.tick, "replay finished");
}
