//! Erosion channel diagnostic - rains on a procedural valley and watches it drain
//!
//! PASS CRITERIA:
//! 1. Rain water must cross the grid and reach the lower half
//! 2. Flow must suspend sediment somewhere along the run
//! 3. Terrain must stay inside its height clamps
//! 4. Water volume must fall once the rain stops
//!
//! Run with: cargo run --example erosion_diagnostic -p hydro --release

use hydro::{generate_terrain, ErosionEngine, TerrainConfig, Vec2};

fn main() {
    env_logger::init();

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              EROSION CHANNEL DIAGNOSTIC                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let width = 48;
    let height = 48;
    let dt = 1.0 / 120.0;
    let flow_rate = 1.5;
    let rain_frames = 450;
    let total_frames = 700;

    let mut engine = ErosionEngine::new(width, height);
    let mut terrain = generate_terrain(width, height, &TerrainConfig::default());

    let initial_terrain_total: f32 = terrain.iter().sum();
    println!("Grid: {}x{} = {} cells", width, height, width * height);
    println!(
        "Terrain: min={:.3}, max={:.3}, total={:.1}",
        terrain.iter().cloned().fold(f32::MAX, f32::min),
        terrain.iter().cloned().fold(f32::MIN, f32::max),
        initial_terrain_total
    );
    println!(
        "Raining {} of {} frames ({:.1}s of simulation at {:.0} Hz)\n",
        rain_frames,
        total_frames,
        total_frames as f32 * dt,
        1.0 / dt
    );

    // Track metrics over time
    let mut peak_volume = 0.0f32;
    let mut peak_sediment = 0.0f32;
    let mut peak_speed = 0.0f32;
    let mut reached_lower_half = 0.0f32;
    let mut volume_at_rain_stop = 0.0f32;

    println!(
        "{:>6} {:>10} {:>10} {:>9} {:>9} {:>9} {:>9}",
        "Frame", "Volume", "Sediment", "MaxSpeed", "WetCells", "TerrMin", "TerrMax"
    );
    println!("{}", "-".repeat(68));

    for frame in 0..total_frames {
        let raining = frame < rain_frames;
        engine
            .simulate(&mut terrain, dt, flow_rate, raining, 1.0)
            .unwrap();

        let volume = engine.total_water_volume();
        let sediment_total: f32 = engine.sediment.iter().sum();
        let max_speed = engine
            .velocity_x
            .iter()
            .zip(&engine.velocity_y)
            .map(|(&vx, &vy)| Vec2::new(vx, vy).length())
            .fold(0.0f32, f32::max);
        let wet_cells = engine.water.iter().filter(|&&w| w > 0.0).count();
        let lower_half: f32 = engine.water[(height / 2) * width..].iter().sum();

        peak_volume = peak_volume.max(volume);
        peak_sediment = peak_sediment.max(sediment_total);
        peak_speed = peak_speed.max(max_speed);
        reached_lower_half = reached_lower_half.max(lower_half);
        if frame == rain_frames - 1 {
            volume_at_rain_stop = volume;
        }

        if frame % 60 == 0 || frame == total_frames - 1 {
            let terr_min = terrain.iter().cloned().fold(f32::MAX, f32::min);
            let terr_max = terrain.iter().cloned().fold(f32::MIN, f32::max);
            println!(
                "{:>6} {:>10.4} {:>10.5} {:>9.4} {:>9} {:>9.3} {:>9.3}",
                frame, volume, sediment_total, max_speed, wet_cells, terr_min, terr_max
            );
        }
    }

    // Analyze results
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                        RESULTS                               ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("TEST 1: Water crosses into the lower half of the grid");
    println!(
        "  Peak total volume: {:.4}, peak lower-half water: {:.5}",
        peak_volume, reached_lower_half
    );
    if reached_lower_half > 0.0 {
        println!("  ✅ PASS: Rain flowed downslope toward the drain");
    } else {
        println!("  ❌ FAIL: Water never left the source half");
    }

    println!("\nTEST 2: Flow suspends sediment");
    println!(
        "  Peak suspended load: {:.5}, peak flow speed: {:.4}",
        peak_sediment, peak_speed
    );
    if peak_sediment > 0.0 && peak_speed > 0.0 {
        println!("  ✅ PASS: The channel is eroding");
    } else {
        println!("  ❌ FAIL: No erosion developed");
    }

    println!("\nTEST 3: Terrain stays inside its clamps");
    let terr_min = terrain.iter().cloned().fold(f32::MAX, f32::min);
    let terr_max = terrain.iter().cloned().fold(f32::MIN, f32::max);
    let min_ok = terr_min >= engine.params.min_height - 1e-4;
    let max_ok = terr_max <= engine.params.max_height + 1e-4;
    println!(
        "  Final range: [{:.3}, {:.3}] inside [{:.3}, {:.3}]",
        terr_min, terr_max, engine.params.min_height, engine.params.max_height
    );
    if min_ok && max_ok {
        println!("  ✅ PASS: Clamps held");
    } else {
        println!("  ❌ FAIL: Terrain escaped its height limits");
    }

    println!("\nTEST 4: The grid drains once the rain stops");
    let final_volume = engine.total_water_volume();
    println!(
        "  Volume at rain stop: {:.4}, final volume: {:.4}",
        volume_at_rain_stop, final_volume
    );
    if final_volume < volume_at_rain_stop * 0.8 {
        println!("  ✅ PASS: Drain and evaporation are emptying the grid");
    } else {
        println!("  ⚠️  WARN: Water is pooling instead of draining");
    }

    let terrain_total: f32 = terrain.iter().sum();
    println!(
        "\nNet terrain change: {:+.4} ({:.1} -> {:.1})",
        terrain_total - initial_terrain_total,
        initial_terrain_total,
        terrain_total
    );

    // Final verdict
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    let all_pass = reached_lower_half > 0.0 && peak_sediment > 0.0 && min_ok && max_ok;
    if all_pass {
        println!("║                    ✅ ALL TESTS PASSED                       ║");
    } else {
        println!("║                    ❌ TESTS FAILED                           ║");
    }
    println!("╚══════════════════════════════════════════════════════════════╝");

    // Profile down the valley center for a quick visual check
    println!("\n=== Center column profile (terrain / water) ===");
    let x = width / 2;
    for y in (0..height).step_by(6) {
        let idx = engine.idx(x, y);
        println!(
            "  y={:>2}: bed={:.3}  water={:.4}",
            y, terrain[idx], engine.water[idx]
        );
    }
}
