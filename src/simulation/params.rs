//! Simulation parameters.
//!
//! Every constant of the game lives here so that a headless run, the visual
//! run and the tests all agree on the same physics. The defaults reproduce the
//! reference game: a 500×800 window, birds spawned at (230, 350) and a ground
//! line at y = 730.

use serde::{Deserialize, Serialize};

use super::bird::Bird;
use crate::error::ConfigError;

/// Simulation parameters that control bird physics, obstacles and scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Visible area width in pixels.
    pub window_width: f32,
    /// Visible area height in pixels.
    pub window_height: f32,
    /// Horizontal spawn position of every bird.
    pub bird_start_x: f32,
    /// Vertical spawn position of every bird.
    pub bird_start_y: f32,
    /// Vertical velocity set by an impulse (negative is upward).
    pub jump_velocity: f32,
    /// Acceleration term `a` in `d = v·t + a·t²`.
    pub gravity: f32,
    /// Upper bound on the per-tick displacement.
    pub max_displacement: f32,
    /// Extra downward displacement added whenever `d` is non-negative.
    pub descent_bias: f32,
    /// Band below the last impulse height in which the bird still counts as climbing.
    pub climb_buffer: f32,
    /// Maximum upward tilt in degrees.
    pub max_rotation: f32,
    /// Tilt decrease per descending tick in degrees.
    pub rotation_velocity: f32,
    /// Tilt floor in degrees.
    pub min_rotation: f32,
    /// Bird sprite width.
    pub bird_width: u32,
    /// Bird sprite height.
    pub bird_height: u32,
    /// Tolerance subtracted from the bird's bottom edge in the ground check.
    pub ground_tolerance: f32,
    /// Birds above this y are out of bounds.
    pub ceiling_limit: f32,
    /// Vertical gap between the top and the bottom pipe.
    pub pipe_gap: f32,
    /// Horizontal scroll speed shared by pipes and ground.
    pub pipe_velocity: f32,
    /// Pipe sprite width.
    pub pipe_width: u32,
    /// Pipe sprite height.
    pub pipe_height: u32,
    /// Half-open range `[min, max)` the gap's upper edge is drawn from.
    pub gap_height_range: (u32, u32),
    /// Horizontal position of the first pipe of a session.
    pub first_pipe_x: f32,
    /// Horizontal position of every pipe spawned after a pass.
    pub pipe_spawn_x: f32,
    /// Ground line.
    pub ground_y: f32,
    /// Width of one ground tile.
    pub ground_width: f32,
    /// A session ends successfully once the score exceeds this value.
    pub score_cap: u32,
    /// Real-time pacing of the visual mode.
    pub ticks_per_second: u32,
    /// Controller output above which the bird jumps.
    pub jump_threshold: f32,
    /// Fitness gained per tick survived.
    pub tick_reward: f32,
    /// Fitness gained by every live bird when a pipe is passed.
    pub pass_reward: f32,
    /// Fitness lost on a pipe collision.
    pub collision_penalty: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            window_width: 500.0,
            window_height: 800.0,
            bird_start_x: 230.0,
            bird_start_y: 350.0,
            jump_velocity: -10.5,
            gravity: 1.5,
            max_displacement: 16.0,
            descent_bias: 2.0,
            climb_buffer: 50.0,
            max_rotation: 25.0,
            rotation_velocity: 20.0,
            min_rotation: -90.0,
            bird_width: 68,
            bird_height: 48,
            ground_tolerance: 10.0,
            ceiling_limit: -50.0,
            pipe_gap: 200.0,
            pipe_velocity: 5.0,
            pipe_width: 104,
            pipe_height: 640,
            gap_height_range: (50, 450),
            first_pipe_x: 600.0,
            pipe_spawn_x: 500.0,
            ground_y: 730.0,
            ground_width: 672.0,
            score_cap: 30,
            ticks_per_second: 30,
            jump_threshold: 0.5,
            tick_reward: 0.1,
            pass_reward: 5.0,
            collision_penalty: 1.0,
        }
    }
}

impl Params {
    /// Returns `true` once the bird's sprite reaches the ground line.
    pub fn hits_ground(&self, bird: &Bird) -> bool {
        bird.y + self.bird_height as f32 - self.ground_tolerance >= self.ground_y
    }

    /// Returns `true` if the bird touched the ground or flew off the top.
    pub fn out_of_bounds(&self, bird: &Bird) -> bool {
        self.hits_ground(bird) || bird.y < self.ceiling_limit
    }

    /// Saves the parameters to a JSON file.
    pub fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads parameters from a JSON file. Missing fields take their defaults.
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }

    /// Rejects parameter sets the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = self.gap_height_range;
        if min >= max {
            return Err(ConfigError::Invalid("gap_height_range must be non-empty"));
        }
        if self.pipe_gap <= 0.0 {
            return Err(ConfigError::Invalid("pipe_gap must be positive"));
        }
        if self.bird_width == 0 || self.bird_height == 0 {
            return Err(ConfigError::Invalid("bird sprite must not be empty"));
        }
        if self.pipe_width == 0 || self.pipe_height == 0 {
            return Err(ConfigError::Invalid("pipe sprite must not be empty"));
        }
        if self.ticks_per_second == 0 {
            return Err(ConfigError::Invalid("ticks_per_second must be positive"));
        }
        Ok(())
    }
}
