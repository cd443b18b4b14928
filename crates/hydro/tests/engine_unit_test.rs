//! Unit tests for the erosion engine surface.
//!
//! Tests cover:
//! - Construction, field sizing, and the row-major index helper
//! - Input validation on simulate (terrain length, time step sign)
//! - Rain source geometry and flow rate scaling
//! - add_water / total_water_volume / reset bookkeeping

use hydro::{generate_terrain, ErosionEngine, SimulateError, TerrainConfig};

const DT: f32 = 0.016;

/// Helper to build an engine plus a matching flat heightfield
fn engine_with_flat_terrain(
    width: usize,
    height: usize,
    h: f32,
) -> (ErosionEngine, Vec<f32>) {
    (ErosionEngine::new(width, height), vec![h; width * height])
}

// =============================================================================
// CONSTRUCTION AND INDEXING
// =============================================================================

#[test]
fn new_engine_sizes_every_field() {
    let engine = ErosionEngine::new(32, 24);
    let cells = 32 * 24;

    assert_eq!(engine.width, 32);
    assert_eq!(engine.height, 24);
    assert_eq!(engine.water.len(), cells);
    assert_eq!(engine.sediment.len(), cells);
    assert_eq!(engine.flux_left.len(), cells);
    assert_eq!(engine.flux_right.len(), cells);
    assert_eq!(engine.flux_up.len(), cells);
    assert_eq!(engine.flux_down.len(), cells);
    assert_eq!(engine.velocity_x.len(), cells);
    assert_eq!(engine.velocity_y.len(), cells);

    assert!(engine.water.iter().all(|&w| w == 0.0));
    assert!(engine.sediment.iter().all(|&s| s == 0.0));
}

#[test]
fn default_params_are_coherent() {
    let engine = ErosionEngine::new(16, 16);
    let p = &engine.params;

    assert!(p.min_height < p.max_height);
    assert!(p.velocity_damping > 0.0 && p.velocity_damping <= 1.0);
    assert!(p.min_water > 0.0);
    assert!(p.source_rows >= 1);
    assert!(p.source_width > 0.0 && p.source_width <= 1.0);
    assert!(p.drain_rows >= 1);
}

#[test]
fn idx_is_row_major() {
    let engine = ErosionEngine::new(10, 8);

    assert_eq!(engine.idx(0, 0), 0);
    assert_eq!(engine.idx(9, 0), 9);
    assert_eq!(engine.idx(0, 1), 10);
    assert_eq!(engine.idx(5, 3), 35); // 3 * 10 + 5
}

#[test]
#[should_panic(expected = "at least 3x3")]
fn degenerate_grid_is_rejected() {
    let _ = ErosionEngine::new(2, 8);
}

// =============================================================================
// SIMULATE VALIDATION
// =============================================================================

#[test]
fn wrong_terrain_length_is_rejected() {
    let mut engine = ErosionEngine::new(8, 8);
    let mut short_terrain = vec![1.0; 10];

    let result = engine.simulate(&mut short_terrain, DT, 1.0, true, 1.0);

    assert_eq!(
        result,
        Err(SimulateError::TerrainLength {
            expected: 64,
            actual: 10
        })
    );
    // Nothing ran: no rain landed
    assert_eq!(engine.total_water_volume(), 0.0);
}

#[test]
fn negative_dt_is_rejected() {
    let (mut engine, mut terrain) = engine_with_flat_terrain(8, 8, 1.0);

    let result = engine.simulate(&mut terrain, -0.01, 1.0, true, 1.0);

    assert_eq!(result, Err(SimulateError::NegativeDt { dt: -0.01 }));
    assert_eq!(engine.total_water_volume(), 0.0);
    assert!(terrain.iter().all(|&h| h == 1.0), "Terrain was touched");
}

#[test]
fn zero_dt_is_accepted_and_inert() {
    let (mut engine, mut terrain) = engine_with_flat_terrain(16, 16, 1.0);
    engine.add_water(5, 5, 0.3);

    let result = engine.simulate(&mut terrain, 0.0, 1.0, true, 1.0);

    assert_eq!(result, Ok(()));
    assert_eq!(
        engine.water[engine.idx(5, 5)],
        0.3,
        "A zero step must not move or evaporate water"
    );
    assert!(terrain.iter().all(|&h| h == 1.0), "Terrain was touched");
}

// =============================================================================
// RAIN SOURCE GEOMETRY
// =============================================================================

#[test]
fn rain_lands_only_in_the_source_region() {
    let (mut engine, mut terrain) = engine_with_flat_terrain(16, 16, 1.0);

    engine
        .simulate(&mut terrain, DT, 1.0, true, 1.0)
        .unwrap();

    // Default source: middle half of the width (columns 4..12), rows 1..4
    let mut inside = 0.0;
    for y in 1..4 {
        for x in 4..12 {
            inside += engine.water[engine.idx(x, y)];
        }
    }
    let total: f32 = engine.water.iter().sum();

    assert!(total > 0.0, "Rain added no water");
    assert!(
        inside >= 0.9 * total,
        "Source region holds {} of {} total",
        inside,
        total
    );

    // One step of seepage past the region edge is below the trace cutoff
    // and snaps to zero
    assert_eq!(engine.water[engine.idx(3, 2)], 0.0);
    assert_eq!(engine.water[engine.idx(12, 2)], 0.0);
    assert_eq!(engine.water[engine.idx(8, 4)], 0.0);
    assert_eq!(engine.water[engine.idx(8, 10)], 0.0);
}

#[test]
fn rain_volume_scales_with_flow_rate() {
    let (mut slow, mut terrain_a) = engine_with_flat_terrain(16, 16, 1.0);
    let (mut fast, mut terrain_b) = engine_with_flat_terrain(16, 16, 1.0);

    slow.simulate(&mut terrain_a, DT, 1.0, true, 1.0).unwrap();
    fast.simulate(&mut terrain_b, DT, 2.0, true, 1.0).unwrap();

    let ratio = fast.total_water_volume() / slow.total_water_volume();
    assert!(
        (ratio - 2.0).abs() < 1e-3,
        "Doubled flow rate should double one step of rain, ratio = {}",
        ratio
    );
}

#[test]
fn no_rain_when_raining_is_off() {
    let (mut engine, mut terrain) = engine_with_flat_terrain(16, 16, 1.0);

    engine
        .simulate(&mut terrain, DT, 1.0, false, 1.0)
        .unwrap();

    assert_eq!(engine.total_water_volume(), 0.0);
}

// =============================================================================
// BOOKKEEPING
// =============================================================================

#[test]
fn add_water_accumulates_and_floors_at_zero() {
    let mut engine = ErosionEngine::new(16, 16);

    engine.add_water(5, 5, 0.3);
    engine.add_water(5, 5, 0.2);
    assert_eq!(engine.water[engine.idx(5, 5)], 0.5);

    // Removing more than is present floors at zero
    engine.add_water(5, 5, -2.0);
    assert_eq!(engine.water[engine.idx(5, 5)], 0.0);

    // Out of range is a quiet no-op
    engine.add_water(99, 99, 1.0);
    assert_eq!(engine.total_water_volume(), 0.0);
}

#[test]
fn total_water_volume_scales_with_cell_area() {
    let mut engine = ErosionEngine::new(16, 16);
    engine.add_water(4, 4, 0.25);
    engine.add_water(5, 4, 0.25);
    engine.add_water(6, 4, 0.25);

    assert!((engine.total_water_volume() - 0.75).abs() < 1e-6);

    engine.params.cell_area = 2.0;
    assert!((engine.total_water_volume() - 1.5).abs() < 1e-6);
}

#[test]
fn reset_zeroes_every_field() {
    let (mut engine, mut terrain) = engine_with_flat_terrain(16, 16, 1.0);

    for _ in 0..20 {
        engine
            .simulate(&mut terrain, DT, 1.0, true, 1.0)
            .unwrap();
    }
    assert!(engine.total_water_volume() > 0.0);

    engine.reset();

    assert!(engine.water.iter().all(|&v| v == 0.0));
    assert!(engine.sediment.iter().all(|&v| v == 0.0));
    assert!(engine.flux_left.iter().all(|&v| v == 0.0));
    assert!(engine.flux_right.iter().all(|&v| v == 0.0));
    assert!(engine.flux_up.iter().all(|&v| v == 0.0));
    assert!(engine.flux_down.iter().all(|&v| v == 0.0));
    assert!(engine.velocity_x.iter().all(|&v| v == 0.0));
    assert!(engine.velocity_y.iter().all(|&v| v == 0.0));

    // The engine is immediately reusable
    assert_eq!(engine.simulate(&mut terrain, DT, 1.0, true, 1.0), Ok(()));
}

// =============================================================================
// TERRAIN OWNERSHIP
// =============================================================================

#[test]
fn simulate_mutates_the_callers_terrain() {
    let mut engine = ErosionEngine::new(16, 16);
    let mut terrain = generate_terrain(16, 16, &TerrainConfig::default());
    let initial = terrain.clone();

    for _ in 0..100 {
        engine
            .simulate(&mut terrain, DT, 1.0, true, 4.0)
            .unwrap();
    }

    let moved = terrain
        .iter()
        .zip(&initial)
        .any(|(now, before)| (now - before).abs() > 1e-6);
    assert!(moved, "A wet run should have reshaped the heightfield");
}
