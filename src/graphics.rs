use flappy_evo::simulation::bird::Bird;
use flappy_evo::simulation::brain::Brain;
use flappy_evo::simulation::event_log::EventKind;
use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::pipe::Pipe;
use flappy_evo::simulation::session::Session;
use macroquad::prelude::*;

const SKY: Color = Color::new(0.44, 0.77, 0.81, 1.0);
const PIPE_BODY: Color = Color::new(0.45, 0.75, 0.18, 1.0);
const PIPE_EDGE: Color = Color::new(0.33, 0.50, 0.15, 1.0);
const GROUND_TOP: Color = Color::new(0.55, 0.80, 0.27, 1.0);
const GROUND_BODY: Color = Color::new(0.87, 0.85, 0.58, 1.0);
const BIRD_BODY: Color = Color::new(0.98, 0.78, 0.18, 1.0);

/// Ticks each wing frame is shown for.
const ANIMATION_TICKS: u64 = 5;

/// Wing frame for a tick: up, middle, down, middle, repeating. A bird diving
/// steeply holds its wings level.
fn wing_frame(tick: u64, tilt: f32) -> usize {
    if tilt <= -80.0 {
        return 1;
    }
    match (tick / ANIMATION_TICKS) % 4 {
        0 => 0,
        2 => 2,
        _ => 1,
    }
}

/// Draws the whole scene: sky, pipes, ground, birds and HUD.
pub fn draw_session(session: &Session<Brain>) {
    let params = session.params();
    clear_background(SKY);

    for pipe in &session.pipes {
        draw_pipe(pipe, params);
    }

    draw_ground(session, params);

    for agent in &session.agents {
        draw_bird(&agent.bird, session.tick, params);
    }

    draw_hud(session);
}

fn draw_pipe(pipe: &Pipe, params: &Params) {
    let width = params.pipe_width as f32;
    let height = params.pipe_height as f32;
    let lip = (height / 20.0).max(1.0);
    let inset = (width / 26.0).max(1.0);

    // Top pipe, opening at its lower end.
    let top_y = pipe.top_sprite_y(params);
    draw_rectangle(pipe.x + inset, top_y, width - 2.0 * inset, height - lip, PIPE_BODY);
    draw_rectangle(pipe.x, pipe.top - lip, width, lip, PIPE_BODY);
    draw_rectangle_lines(pipe.x, pipe.top - lip, width, lip, 3.0, PIPE_EDGE);

    // Bottom pipe, opening at its upper end.
    draw_rectangle(pipe.x + inset, pipe.bottom + lip, width - 2.0 * inset, height - lip, PIPE_BODY);
    draw_rectangle(pipe.x, pipe.bottom, width, lip, PIPE_BODY);
    draw_rectangle_lines(pipe.x, pipe.bottom, width, lip, 3.0, PIPE_EDGE);
}

fn draw_ground(session: &Session<Brain>, params: &Params) {
    let ground = &session.ground;
    let depth = params.window_height - ground.y;
    for x in [ground.x1, ground.x2] {
        draw_rectangle(x, ground.y, ground.width, depth, GROUND_BODY);
        draw_rectangle(x, ground.y, ground.width, 12.0, GROUND_TOP);
    }
}

fn draw_bird(bird: &Bird, tick: u64, params: &Params) {
    let (cx, cy) = bird.center(params);
    let width = params.bird_width as f32;
    let height = params.bird_height as f32;
    // Positive tilt is nose-up, which is counter-clockwise on screen.
    let rotation = -bird.tilt.to_radians();

    draw_rectangle_ex(
        cx,
        cy,
        width * 0.84,
        height,
        DrawRectangleParams {
            offset: vec2(0.5, 0.5),
            rotation,
            color: BIRD_BODY,
        },
    );

    let (sin, cos) = rotation.sin_cos();
    let to_screen = |dx: f32, dy: f32| vec2(cx + dx * cos - dy * sin, cy + dx * sin + dy * cos);

    // Beak.
    let beak = to_screen(width * 0.38, height * 0.1);
    draw_circle(beak.x, beak.y, height * 0.15, ORANGE);

    // Eye.
    let eye = to_screen(width * 0.2, -height * 0.2);
    draw_circle(eye.x, eye.y, height * 0.12, WHITE);
    draw_circle(eye.x, eye.y, height * 0.05, BLACK);

    // Wing.
    let lift = match wing_frame(tick, bird.tilt) {
        0 => -0.35,
        2 => 0.35,
        _ => 0.0,
    };
    let root = to_screen(-width * 0.1, 0.0);
    let left = to_screen(-width * 0.35, height * lift);
    let right = to_screen(width * 0.05, height * lift);
    draw_triangle(root, left, right, Color::new(0.95, 0.6, 0.1, 1.0));
}

fn draw_hud(session: &Session<Brain>) {
    let params = session.params();
    let font_size = 40.0;

    let score = format!("Score: {}", session.score);
    let score_size = measure_text(&score, None, font_size as u16, 1.0);
    draw_text(
        &score,
        params.window_width - score_size.width - 10.0,
        score_size.height + 10.0,
        font_size,
        WHITE,
    );

    draw_text(
        &format!("Gens: {}", session.generation),
        10.0,
        score_size.height + 10.0,
        font_size,
        WHITE,
    );
    draw_text(
        &format!("Alive: {}", session.alive()),
        10.0,
        2.0 * score_size.height + 20.0,
        font_size,
        WHITE,
    );

    // Recent events, newest first, just above the ground.
    let line_height = 16.0;
    let mut y = params.ground_y - 10.0;
    for event in session.event_log.events().iter().take(5) {
        let color = match event.kind {
            EventKind::Passed => GREEN,
            EventKind::Collision => RED,
            EventKind::OutOfBounds => ORANGE,
            EventKind::ScoreCap => GOLD,
        };
        draw_text(
            &format!("[{}] {}", event.tick, event.description),
            10.0,
            y,
            line_height,
            color,
        );
        y -= line_height;
    }
}
