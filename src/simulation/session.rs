//! One simulation session: a population of birds flying until all of them are
//! eliminated or the score cap is reached.
//!
//! Each live bird is a single [`Agent`] record holding its physics, its
//! controller and its fitness, so eliminating a bird removes all three at
//! once. Eliminated birds move to [`Session::retired`] with their final
//! fitness. Rendering is not part of the session; a renderer reads the public
//! state between ticks.

use std::sync::Arc;

use ndarray::Array1;
use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::controller::Controller;
use super::event_log::{EventKind, EventLog};
use super::footprint::Scrolling;
use super::ground::Ground;
use super::params::Params;
use super::pipe::Pipe;
use super::sprites::Sprites;

/// Identifier linking a bird back to the genome that controls it.
pub type AgentId = usize;

/// A live bird together with its controller and fitness.
#[derive(Debug, Clone)]
pub struct Agent<C> {
    /// Stable identifier (the genome id).
    pub id: AgentId,
    /// Physical state.
    pub bird: Bird,
    /// Decides when to jump.
    pub controller: C,
    /// Fitness accumulated so far.
    pub fitness: f32,
}

/// Why a bird left the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Elimination {
    /// Hit a pipe.
    Collision,
    /// Hit the ground or flew off the top.
    OutOfBounds,
}

/// Final record of an eliminated bird.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Retired {
    /// Identifier of the eliminated agent.
    pub id: AgentId,
    /// Fitness at elimination, penalty included.
    pub fitness: f32,
    /// What eliminated it.
    pub cause: Elimination,
    /// Tick of elimination.
    pub tick: u64,
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The session continues.
    Running,
    /// No birds remain.
    Extinct,
    /// The score exceeded the cap.
    ScoreCapReached,
    /// `run_to_end` stopped at its tick limit.
    TickLimit,
}

impl StepOutcome {
    /// Returns `true` for every outcome except [`StepOutcome::Running`].
    pub fn is_terminal(self) -> bool {
        self != StepOutcome::Running
    }
}

/// State of one simulation session.
pub struct Session<C, R = StdRng> {
    /// Live birds in spawn order; the first one is the lead bird.
    pub agents: Vec<Agent<C>>,
    /// Eliminated birds in elimination order.
    pub retired: Vec<Retired>,
    /// Pipes in spawn order.
    pub pipes: Vec<Pipe>,
    /// Scrolling ground.
    pub ground: Ground,
    /// Pipes passed.
    pub score: u32,
    /// Ticks run so far.
    pub tick: u64,
    /// Generation this session evaluates, for display.
    pub generation: u32,
    /// Pipes spawned after the initial one.
    pub pipes_spawned: usize,
    /// Recent events.
    pub event_log: EventLog,
    params: Params,
    sprites: Arc<Sprites>,
    rng: R,
    next_pipe_id: usize,
    finished: Option<StepOutcome>,
}

impl<C: Controller, R: Rng> Session<C, R> {
    /// Starts a session with one bird per controller and the first pipe at
    /// `params.first_pipe_x`.
    pub fn new(
        controllers: impl IntoIterator<Item = (AgentId, C)>,
        params: Params,
        sprites: Arc<Sprites>,
        mut rng: R,
        generation: u32,
    ) -> Self {
        let agents = controllers
            .into_iter()
            .map(|(id, controller)| Agent {
                id,
                bird: Bird::spawn(&params),
                controller,
                fitness: 0.0,
            })
            .collect();

        let first_pipe = Pipe::new(0, params.first_pipe_x, &mut rng, &params);

        Self {
            agents,
            retired: Vec::new(),
            pipes: vec![first_pipe],
            ground: Ground::new(&params),
            score: 0,
            tick: 0,
            generation,
            pipes_spawned: 0,
            event_log: EventLog::default(),
            params,
            sprites,
            rng,
            next_pipe_id: 1,
            finished: None,
        }
    }

    /// Parameters the session runs with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Collision masks the session runs with.
    pub fn sprites(&self) -> &Sprites {
        &self.sprites
    }

    /// Terminal outcome, once reached.
    pub fn finished(&self) -> Option<StepOutcome> {
        self.finished
    }

    /// Index of the pipe the birds' sensors look at: the first pipe, or the
    /// second once the lead bird is past the first one's right edge.
    pub fn active_pipe_index(&self) -> usize {
        match self.agents.first() {
            Some(lead)
                if self.pipes.len() > 1 && lead.bird.x > self.pipes[0].right_edge(&self.params) =>
            {
                1
            }
            _ => 0,
        }
    }

    /// Runs one tick.
    ///
    /// Terminal outcomes are sticky: once reached, further calls return the
    /// same outcome without changing any state.
    pub fn step(&mut self) -> StepOutcome {
        if let Some(outcome) = self.finished {
            return outcome;
        }
        if self.agents.is_empty() {
            return self.finish(StepOutcome::Extinct);
        }
        if self.pipes.is_empty() {
            self.spawn_pipe();
        }

        self.tick += 1;
        let params = &self.params;

        // Birds move and decide.
        let target = &self.pipes[self.active_pipe_index()];
        for agent in &mut self.agents {
            agent.fitness += params.tick_reward;
            agent.bird.advance(params);

            let inputs = sensor_inputs(&agent.bird, target);
            let output = agent.controller.activate(&inputs);
            if output.get(0).is_some_and(|&value| value > params.jump_threshold) {
                agent.bird.jump(params);
            }
        }

        // Pipes move, collide and get passed.
        let mut add_pipe = false;
        let mut off_screen = Vec::new();
        for pipe in &mut self.pipes {
            pipe.advance(params.pipe_velocity);

            let tick = self.tick;
            let sprites = &self.sprites;
            let retired = &mut self.retired;
            let event_log = &mut self.event_log;
            self.agents.retain(|agent| {
                if !pipe.collides_with(&agent.bird, sprites, params) {
                    return true;
                }
                retired.push(Retired {
                    id: agent.id,
                    fitness: agent.fitness - params.collision_penalty,
                    cause: Elimination::Collision,
                    tick,
                });
                event_log.log(
                    tick,
                    format!("bird {} hit pipe {}", agent.id, pipe.id),
                    EventKind::Collision,
                );
                false
            });

            if pipe.is_off_screen(params) {
                off_screen.push(pipe.id);
            }

            // All birds share one x; once none remain the spawn x stands in.
            let pass_x = self
                .agents
                .first()
                .map_or(params.bird_start_x, |lead| lead.bird.x);
            if !pipe.passed && pipe.x < pass_x {
                pipe.passed = true;
                add_pipe = true;
            }
        }

        if add_pipe {
            self.score += 1;
            for agent in &mut self.agents {
                agent.fitness += self.params.pass_reward;
            }
            self.spawn_pipe();
            self.pipes_spawned += 1;
            self.event_log.log(
                self.tick,
                format!("score {}", self.score),
                EventKind::Passed,
            );
        }

        self.pipes.retain(|pipe| !off_screen.contains(&pipe.id));

        // Ground and ceiling.
        let params = &self.params;
        let tick = self.tick;
        let retired = &mut self.retired;
        let event_log = &mut self.event_log;
        self.agents.retain(|agent| {
            if !params.out_of_bounds(&agent.bird) {
                return true;
            }
            retired.push(Retired {
                id: agent.id,
                fitness: agent.fitness,
                cause: Elimination::OutOfBounds,
                tick,
            });
            event_log.log(
                tick,
                format!("bird {} left the screen", agent.id),
                EventKind::OutOfBounds,
            );
            false
        });

        if self.score > self.params.score_cap {
            self.event_log.log(
                self.tick,
                format!("score cap {} exceeded", self.params.score_cap),
                EventKind::ScoreCap,
            );
            return self.finish(StepOutcome::ScoreCapReached);
        }

        self.ground.advance(self.params.pipe_velocity);
        StepOutcome::Running
    }

    /// Steps until a terminal outcome, or until `max_ticks` ticks have run.
    pub fn run_to_end(&mut self, max_ticks: Option<u64>) -> StepOutcome {
        loop {
            if let Some(limit) = max_ticks {
                if self.tick >= limit && self.finished.is_none() {
                    return self.finish(StepOutcome::TickLimit);
                }
            }
            let outcome = self.step();
            if outcome.is_terminal() {
                return outcome;
            }
        }
    }

    /// Final fitness of every bird, live and retired.
    pub fn fitness(&self) -> Vec<(AgentId, f32)> {
        self.agents
            .iter()
            .map(|agent| (agent.id, agent.fitness))
            .chain(self.retired.iter().map(|r| (r.id, r.fitness)))
            .collect()
    }

    /// Number of birds still flying.
    pub fn alive(&self) -> usize {
        self.agents.len()
    }

    fn spawn_pipe(&mut self) {
        let pipe = Pipe::new(
            self.next_pipe_id,
            self.params.pipe_spawn_x,
            &mut self.rng,
            &self.params,
        );
        self.next_pipe_id += 1;
        self.pipes.push(pipe);
    }

    fn finish(&mut self, outcome: StepOutcome) -> StepOutcome {
        tracing::debug!(
            generation = self.generation,
            tick = self.tick,
            score = self.score,
            ?outcome,
            "session finished"
        );
        self.finished = Some(outcome);
        outcome
    }
}

/// Sensor vector for a bird looking at a pipe:
/// `(y, |y - gap top|, |y - gap bottom|)`.
pub fn sensor_inputs(bird: &Bird, pipe: &Pipe) -> Array1<f32> {
    Array1::from_vec(vec![
        bird.y,
        (bird.y - pipe.top).abs(),
        (bird.y - pipe.bottom).abs(),
    ])
}
