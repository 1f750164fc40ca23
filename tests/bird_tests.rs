#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use flappy_evo::simulation::bird::Bird;
use flappy_evo::simulation::footprint::Footprint;
use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::sprites::Sprites;

#[test]
fn test_impulse_then_advance_follows_motion_formula() {
    let params = Params::default();
    let mut bird = Bird::spawn(&params);

    // Let it fall a little first so the impulse starts from a moving state.
    for _ in 0..3 {
        bird.advance(&params);
    }

    bird.jump(&params);
    assert_eq!(bird.tick_count, 0);
    assert_eq!(bird.velocity, params.jump_velocity);

    let before = bird.y;
    let d = bird.advance(&params);
    assert_eq!(bird.tick_count, 1);

    // d = v*1 + a*1^2
    let expected = params.jump_velocity + params.gravity;
    assert_eq!(expected, -9.0);
    assert_eq!(d, expected);
    assert_eq!(bird.y - before, expected);
}

#[test]
fn test_unimpulsed_bird_reaches_ground_on_tick_21() {
    let params = Params::default();
    let mut bird = Bird::spawn(&params);
    assert_eq!(bird.y, 350.0);

    let mut positions = Vec::new();
    let mut ground_tick = None;
    for tick in 1..=100 {
        bird.advance(&params);
        positions.push(bird.y);
        if params.hits_ground(&bird) {
            ground_tick = Some(tick);
            break;
        }
    }

    // Quadratic fall for three ticks, then the clamped 16 + 2 per tick.
    assert_eq!(&positions[..4], &[353.5, 361.5, 377.0, 395.0]);
    assert_eq!(positions[19], 683.0);
    assert_eq!(ground_tick, Some(21));
    assert_eq!(bird.y, 701.0);
}

#[test]
fn test_fall_speed_is_clamped() {
    let params = Params::default();
    let mut bird = Bird::new(230.0, 0.0);

    for _ in 0..10 {
        bird.advance(&params);
    }
    let d = bird.advance(&params);
    assert_eq!(d, params.max_displacement + params.descent_bias);
}

#[test]
fn test_tilt_tracks_motion() {
    let params = Params::default();
    let mut bird = Bird::spawn(&params);

    bird.jump(&params);
    bird.advance(&params);
    assert_eq!(bird.tilt, params.max_rotation);

    // A long fall noses down until the floor.
    for _ in 0..30 {
        bird.advance(&params);
        assert!(bird.tilt >= params.min_rotation);
        assert!(bird.tilt <= params.max_rotation);
    }
    assert_eq!(bird.tilt, params.min_rotation);
}

#[test]
fn test_bird_stays_level_near_jump_origin() {
    let params = Params::default();
    let mut bird = Bird::spawn(&params);

    // Falling but still within the climb buffer: nose stays up.
    bird.advance(&params);
    assert!(bird.y < bird.jump_origin_y + params.climb_buffer);
    assert_eq!(bird.tilt, params.max_rotation);
}

#[test]
fn test_level_footprint_sits_on_sprite() {
    let params = Params::default();
    let sprites = Sprites::new(&params);
    let bird = Bird::new(230.0, 350.4);

    let footprint = bird.footprint(&sprites, &params);
    assert_eq!(footprint.len(), 1);
    assert_eq!(footprint[0].origin, (230, 350));
    assert_eq!(footprint[0].mask.width(), params.bird_width);
    assert_eq!(footprint[0].mask.height(), params.bird_height);
}

#[test]
fn test_tilted_footprint_stays_centred() {
    let params = Params::default();
    let sprites = Sprites::new(&params);
    let mut bird = Bird::new(230.0, 350.0);
    bird.tilt = -90.0;

    let footprint = bird.footprint(&sprites, &params);
    let placed = &footprint[0];
    assert_eq!(placed.mask.width(), params.bird_height);
    assert_eq!(placed.mask.height(), params.bird_width);

    let (cx, cy) = bird.center(&params);
    let placed_cx = placed.origin.0 as f32 + placed.mask.width() as f32 / 2.0;
    let placed_cy = placed.origin.1 as f32 + placed.mask.height() as f32 / 2.0;
    assert!((placed_cx - cx).abs() <= 0.5);
    assert!((placed_cy - cy).abs() <= 0.5);
}
