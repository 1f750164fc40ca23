#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use flappy_evo::simulation::bird::Bird;
use flappy_evo::simulation::footprint::Scrolling;
use flappy_evo::simulation::ground::Ground;
use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::pipe::Pipe;
use flappy_evo::simulation::sprites::Sprites;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn test_gap_height_drawn_from_range() {
    let params = Params::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for id in 0..2000 {
        let pipe = Pipe::new(id, 600.0, &mut rng, &params);
        assert!((50..450).contains(&pipe.gap_height), "{}", pipe.gap_height);
        assert_eq!(pipe.bottom - pipe.top, params.pipe_gap);
        assert!(!pipe.passed);
    }
}

#[test]
fn test_pipe_edges_for_known_gap_height() {
    let params = Params::default();
    let pipe = Pipe::with_gap_height(0, 600.0, 300, &params);

    assert_eq!(pipe.x, 600.0);
    assert_eq!(pipe.top, 300.0);
    assert_eq!(pipe.bottom, 500.0);
    assert_eq!(pipe.top_sprite_y(&params), -340.0);
    assert_eq!(pipe.right_edge(&params), 704.0);
}

#[test]
fn test_pipe_scrolls_off_screen() {
    let params = Params::default();
    let mut pipe = Pipe::with_gap_height(0, 0.0, 300, &params);

    pipe.advance(params.pipe_velocity);
    assert_eq!(pipe.x, -5.0);
    assert!(!pipe.is_off_screen(&params));

    pipe.x = -104.0;
    assert!(!pipe.is_off_screen(&params));
    pipe.advance(params.pipe_velocity);
    assert!(pipe.is_off_screen(&params));
}

#[test]
fn test_bird_in_gap_does_not_collide() {
    let params = Params::default();
    let sprites = Sprites::new(&params);
    let pipe = Pipe::with_gap_height(0, 230.0, 300, &params);
    let bird = Bird::new(230.0, 370.0);

    assert!(!pipe.collides_with(&bird, &sprites, &params));
}

#[test]
fn test_bird_touching_pipe_collides() {
    let params = Params::default();
    let sprites = Sprites::new(&params);
    let pipe = Pipe::with_gap_height(0, 230.0, 300, &params);

    let low = Bird::new(230.0, 480.0);
    assert!(pipe.collides_with(&low, &sprites, &params));

    let high = Bird::new(230.0, 280.0);
    assert!(pipe.collides_with(&high, &sprites, &params));
}

#[test]
fn test_distant_pipe_never_collides() {
    let params = Params::default();
    let sprites = Sprites::new(&params);
    let pipe = Pipe::with_gap_height(0, 600.0, 50, &params);
    let bird = Bird::new(230.0, 600.0);

    assert!(!pipe.collides_with(&bird, &sprites, &params));
}

#[test]
fn test_collision_check_is_idempotent() {
    let params = Params::default();
    let sprites = Sprites::new(&params);
    let pipe = Pipe::with_gap_height(0, 250.0, 300, &params);

    for y in [280.0, 370.0, 480.0] {
        let mut bird = Bird::new(230.0, y);
        bird.tilt = 25.0;
        let (bird_before, pipe_before) = (bird.clone(), pipe.clone());

        let first = pipe.collides_with(&bird, &sprites, &params);
        let second = pipe.collides_with(&bird, &sprites, &params);
        assert_eq!(first, second);
        assert_eq!(bird, bird_before);
        assert_eq!(pipe, pipe_before);
    }
}

#[test]
fn test_ground_tiles_cover_the_screen() {
    let params = Params::default();
    let mut ground = Ground::new(&params);

    for _ in 0..1000 {
        ground.advance(params.pipe_velocity);

        let left = ground.x1.min(ground.x2);
        let right = ground.x1.max(ground.x2) + ground.width;
        assert!(left <= 0.0);
        assert!(right >= params.window_width);
        assert_eq!((ground.x1 - ground.x2).abs(), ground.width);
    }
}
