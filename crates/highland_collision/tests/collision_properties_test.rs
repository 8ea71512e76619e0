//! # Collision Property Tests
//!
//! Checks the mask against generated worlds: agreement between instances,
//! closed borders, path sampling, stairs, and concurrent readers.

use std::sync::Arc;
use std::thread;

use highland_collision::mask::{path_sample_count, SHORT_MOVE_FRACTION};
use highland_collision::CollisionMask;
use highland_procedural::{generate_world, WorldSeed};

const TILE: f32 = 32.0;

fn world_mask(seed: u64, width: usize, height: usize) -> CollisionMask {
    let world = generate_world(WorldSeed::new(seed), width, height);
    CollisionMask::from_world(&world, TILE).unwrap()
}

/// Deterministic sweep of world positions, including off-grid ones.
#[allow(clippy::cast_precision_loss)]
fn sweep(width: usize, height: usize) -> Vec<(f32, f32)> {
    let (w, h) = (width as f32 * TILE, height as f32 * TILE);
    let mut points = Vec::new();
    let mut i = 0u32;
    while points.len() < 2_000 {
        // Low-discrepancy walk over [-0.1, 1.1)^2 of the world rectangle
        let fx = (f64::from(i) * 0.618_033_988_75).fract() as f32;
        let fy = (f64::from(i) * 0.754_877_666_25).fract() as f32;
        points.push((fx * w * 1.2 - w * 0.1, fy * h * 1.2 - h * 0.1));
        i += 1;
    }
    points
}

/// Test: Two instances build identical masks.
#[test]
fn test_instances_agree() {
    for seed in [1, 42, 31_337] {
        let server = world_mask(seed, 120, 80);
        let client = world_mask(seed, 120, 80);
        assert_eq!(server, client);
        for (x, y) in sweep(120, 80) {
            assert_eq!(server.is_walkable(x, y), client.is_walkable(x, y));
        }
    }
}

/// Test: Outer ring is solid for every world.
#[test]
fn test_border_is_solid() {
    for seed in [3, 42, 99] {
        let mask = world_mask(seed, 100, 70);
        for x in 0..100 {
            assert!(!mask.is_cell_walkable(x, 0));
            assert!(!mask.is_cell_walkable(x, 69));
        }
        for y in 0..70 {
            assert!(!mask.is_cell_walkable(0, y));
            assert!(!mask.is_cell_walkable(99, y));
        }
        assert!(mask.walkable_count() > 0);
    }
}

/// Test: A zero-length move is exactly a walkability check.
#[test]
fn test_zero_length_moves() {
    let mask = world_mask(42, 100, 100);
    for (x, y) in sweep(100, 100) {
        assert_eq!(mask.can_move(x, y, x, y), mask.is_walkable(x, y));
    }
}

/// Test: Accepted long moves never cross an unwalkable sample.
#[test]
#[allow(clippy::cast_precision_loss)]
fn test_accepted_moves_have_clear_paths() {
    let mask = world_mask(42, 100, 100);
    let points = sweep(100, 100);
    let mut accepted = 0;

    for pair in points.windows(2) {
        let ((fx, fy), (tx, ty)) = (pair[0], pair[1]);
        // Keep moves short enough to be plausible
        let (tx, ty) = (fx + (tx - fx) * 0.05, fy + (ty - fy) * 0.05);
        let (dx, dy) = (tx - fx, ty - fy);
        let length = (dx * dx + dy * dy).sqrt();
        if length < TILE * SHORT_MOVE_FRACTION || !mask.can_move(fx, fy, tx, ty) {
            continue;
        }
        accepted += 1;

        let steps = path_sample_count(length, TILE);
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            assert!(mask.is_walkable(fx + dx * t, fy + dy * t));
        }
    }
    assert!(accepted > 0, "sweep should contain some legal moves");
}

/// Test: Nearest-walkable results are walkable or the world center.
#[test]
fn test_nearest_walkable_lands_on_ground() {
    let mask = world_mask(7, 90, 90);
    for (x, y) in sweep(90, 90).into_iter().take(300) {
        let p = mask.find_nearest_walkable(x, y, TILE * 8.0);
        assert!(mask.is_walkable(p.x, p.y) || p == mask.center());
    }
}

/// Test: Every stair footprint contributes walkable cells.
#[test]
#[allow(clippy::cast_possible_wrap)]
fn test_stairs_are_walkable() {
    for seed in [42, 5, 2024] {
        let world = generate_world(WorldSeed::new(seed), 120, 120);
        let mask = CollisionMask::from_world(&world, TILE).unwrap();
        for placement in world.stairs.placements() {
            let (ax, ay) = (placement.anchor_x as i64, placement.anchor_y as i64);
            let footprint = placement.direction.footprint();
            let any_open = (0..i64::from(footprint.height)).any(|row| {
                (0..i64::from(footprint.width)).any(|col| {
                    mask.is_cell_walkable(
                        ax + i64::from(footprint.offset_x) + col,
                        ay + i64::from(footprint.offset_y) + row,
                    )
                })
            });
            assert!(any_open, "seed {seed}: stair at ({ax}, {ay}) is fully blocked");
        }
    }
}

/// Test: Concurrent readers see the same answers as a single thread.
#[test]
fn test_concurrent_readers() {
    let mask = Arc::new(world_mask(42, 150, 150));
    let points = Arc::new(sweep(150, 150));
    let expected: Vec<bool> = points.iter().map(|&(x, y)| mask.is_walkable(x, y)).collect();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let mask = Arc::clone(&mask);
            let points = Arc::clone(&points);
            thread::spawn(move || {
                points
                    .iter()
                    .map(|&(x, y)| mask.is_walkable(x, y))
                    .collect::<Vec<bool>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

/// Test: Scoped threads can borrow the mask directly.
#[test]
fn test_scoped_readers() {
    let mask = world_mask(9, 80, 80);
    let points = sweep(80, 80);

    let counts: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = points
            .chunks(500)
            .map(|chunk| {
                let mask = &mask;
                scope.spawn(move || chunk.iter().filter(|&&(x, y)| mask.can_move(x, y, x + 4.0, y)).count())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let serial: usize = points.iter().filter(|&&(x, y)| mask.can_move(x, y, x + 4.0, y)).count();
    assert_eq!(counts.iter().sum::<usize>(), serial);
}
