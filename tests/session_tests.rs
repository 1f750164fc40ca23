#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::collections::BTreeSet;
use std::sync::Arc;

use flappy_evo::simulation::bird::Bird;
use flappy_evo::simulation::brain::Brain;
use flappy_evo::simulation::controller::Controller;
use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::pipe::Pipe;
use flappy_evo::simulation::session::{Elimination, Session, StepOutcome, sensor_inputs};
use flappy_evo::simulation::sprites::Sprites;
use ndarray::{Array1, array};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn never_jump(_inputs: &Array1<f32>) -> Array1<f32> {
    array![0.0]
}

/// Jumps whenever the bird has sunk below its spawn height.
fn hover(inputs: &Array1<f32>) -> Array1<f32> {
    array![if inputs[0] > 350.0 { 1.0 } else { 0.0 }]
}

fn create_session<C: Controller>(
    controllers: Vec<(usize, C)>,
    params: Params,
) -> Session<C, ChaCha8Rng> {
    let sprites = Arc::new(Sprites::new(&params));
    Session::new(controllers, params, sprites, ChaCha8Rng::seed_from_u64(7), 0)
}

/// Every pipe's gap spans 250..450, which the hovering bird never leaves.
fn hover_params() -> Params {
    Params {
        gap_height_range: (250, 251),
        ..Params::default()
    }
}

#[test]
fn test_empty_session_is_extinct() {
    let mut session = create_session::<fn(&Array1<f32>) -> Array1<f32>>(Vec::new(), Params::default());
    assert_eq!(session.step(), StepOutcome::Extinct);
    assert_eq!(session.tick, 0);
}

#[test]
fn test_new_session_starts_with_one_pipe() {
    let session = create_session(vec![(0, never_jump)], Params::default());
    assert_eq!(session.pipes.len(), 1);
    assert_eq!(session.pipes[0].x, 600.0);
    assert_eq!(session.score, 0);
    assert_eq!(session.alive(), 1);
    assert_eq!(session.agents[0].bird, Bird::new(230.0, 350.0));
}

#[test]
fn test_falling_bird_retires_on_tick_21() {
    let mut session = create_session(vec![(0, never_jump)], Params::default());

    let mut outcome = StepOutcome::Running;
    while outcome == StepOutcome::Running {
        outcome = session.step();
    }

    assert_eq!(outcome, StepOutcome::Extinct);
    assert_eq!(session.retired.len(), 1);
    let retired = &session.retired[0];
    assert_eq!(retired.id, 0);
    assert_eq!(retired.tick, 21);
    assert_eq!(retired.cause, Elimination::OutOfBounds);
    assert!((retired.fitness - 2.1).abs() < 1e-4);
    assert!(session.agents.is_empty());
}

#[test]
fn test_terminal_outcome_is_sticky() {
    let mut session = create_session(vec![(0, never_jump)], Params::default());
    let outcome = session.run_to_end(None);
    assert_eq!(outcome, StepOutcome::Extinct);

    let tick = session.tick;
    let pipes = session.pipes.clone();
    for _ in 0..5 {
        assert_eq!(session.step(), StepOutcome::Extinct);
    }
    assert_eq!(session.tick, tick);
    assert_eq!(session.pipes, pipes);
    assert_eq!(session.finished(), Some(StepOutcome::Extinct));
}

#[test]
fn test_every_bird_is_either_alive_or_retired() {
    let controllers: Vec<(usize, Brain)> = (0..20).map(|id| (id, Brain::new(&[3, 1], 1.0))).collect();
    let mut session = create_session(controllers, Params::default());
    let all_ids: BTreeSet<usize> = (0..20).collect();

    for _ in 0..500 {
        let outcome = session.step();

        let alive: BTreeSet<usize> = session.agents.iter().map(|a| a.id).collect();
        let retired: BTreeSet<usize> = session.retired.iter().map(|r| r.id).collect();
        assert_eq!(alive.len(), session.agents.len());
        assert_eq!(retired.len(), session.retired.len());
        assert!(alive.is_disjoint(&retired));
        assert_eq!(&alive | &retired, all_ids);
        assert_eq!(session.fitness().len(), 20);

        if outcome.is_terminal() {
            break;
        }
    }
}

#[test]
fn test_three_passes_spawn_three_pipes() {
    let mut session = create_session(vec![(0, hover)], hover_params());

    let mut previous_score = 0;
    for _ in 0..185 {
        assert_eq!(session.step(), StepOutcome::Running);

        // Score and spawned pipes move in lockstep.
        assert_eq!(session.score as usize, session.pipes_spawned);
        assert!(session.score - previous_score <= 1);
        previous_score = session.score;

        match session.tick {
            74 => assert_eq!(session.score, 0),
            75 => assert_eq!(session.score, 1),
            130 => assert_eq!(session.score, 2),
            _ => {}
        }
    }

    assert_eq!(session.score, 3);
    assert_eq!(session.pipes_spawned, 3);
    assert_eq!(session.alive(), 1);
    assert!(session.retired.is_empty());

    // 185 ticks alive plus three pass rewards.
    let fitness = session.agents[0].fitness;
    assert!((fitness - (18.5 + 15.0)).abs() < 1e-3, "{fitness}");
}

#[test]
fn test_off_screen_pipes_are_removed() {
    let mut session = create_session(vec![(0, hover)], hover_params());

    for _ in 0..140 {
        session.step();
    }
    assert!(session.pipes.iter().any(|p| p.id == 0));

    session.step();
    assert!(session.pipes.iter().all(|p| p.id != 0));
}

#[test]
fn test_pipe_collision_applies_penalty() {
    let params = Params {
        first_pipe_x: 240.0,
        gap_height_range: (50, 51),
        ..Params::default()
    };
    let mut session = create_session(vec![(3, never_jump)], params);

    let outcome = session.step();
    assert_eq!(outcome, StepOutcome::Running);
    assert!(session.agents.is_empty());

    let retired = &session.retired[0];
    assert_eq!(retired.id, 3);
    assert_eq!(retired.cause, Elimination::Collision);
    assert_eq!(retired.tick, 1);
    assert!((retired.fitness - (0.1 - 1.0)).abs() < 1e-6);

    assert_eq!(session.step(), StepOutcome::Extinct);
}

#[test]
fn test_score_cap_ends_session() {
    let params = Params {
        score_cap: 1,
        ..hover_params()
    };
    let mut session = create_session(vec![(0, hover)], params);

    let outcome = session.run_to_end(None);
    assert_eq!(outcome, StepOutcome::ScoreCapReached);
    assert_eq!(session.score, 2);
    assert_eq!(session.tick, 130);
    assert_eq!(session.alive(), 1);

    assert_eq!(session.step(), StepOutcome::ScoreCapReached);
    assert_eq!(session.tick, 130);
}

#[test]
fn test_run_to_end_respects_tick_limit() {
    let mut session = create_session(vec![(0, hover)], hover_params());

    assert_eq!(session.run_to_end(Some(10)), StepOutcome::TickLimit);
    assert_eq!(session.tick, 10);
    assert_eq!(session.step(), StepOutcome::TickLimit);
}

#[test]
fn test_sensor_inputs() {
    let params = Params::default();
    let bird = Bird::new(230.0, 300.0);
    let pipe = Pipe::with_gap_height(0, 600.0, 250, &params);

    assert_eq!(sensor_inputs(&bird, &pipe), array![300.0_f32, 50.0, 150.0]);
}

#[test]
fn test_sensors_look_at_next_pipe_once_first_is_cleared() {
    let params = Params::default();
    let mut session = create_session(vec![(0, never_jump)], params.clone());
    assert_eq!(session.active_pipe_index(), 0);

    session.pipes.push(Pipe::with_gap_height(1, 500.0, 200, &params));
    assert_eq!(session.active_pipe_index(), 0);

    // Right edge at 204, behind the bird at 230.
    session.pipes[0].x = 100.0;
    assert_eq!(session.active_pipe_index(), 1);
}

#[test]
fn test_controller_output_triggers_jump() {
    let mut session = create_session(
        vec![(0, |_inputs: &Array1<f32>| array![0.9_f32])],
        Params::default(),
    );

    session.step();
    let bird = &session.agents[0].bird;
    assert_eq!(bird.tick_count, 0);
    assert_eq!(bird.velocity, -10.5);
    assert_eq!(bird.y, 353.5);
}

#[test]
fn test_seeded_sessions_are_reproducible() {
    let controllers = || -> Vec<(usize, Brain)> {
        let brain = Brain::new(&[3, 1], 1.0);
        (0..5).map(|id| (id, brain.clone())).collect()
    };
    let brains = controllers();

    let mut a = create_session(brains.clone(), Params::default());
    let mut b = create_session(brains, Params::default());
    let outcome_a = a.run_to_end(Some(2000));
    let outcome_b = b.run_to_end(Some(2000));

    assert_eq!(outcome_a, outcome_b);
    assert_eq!(a.tick, b.tick);
    assert_eq!(a.score, b.score);
    assert_eq!(a.fitness(), b.fitness());
}
