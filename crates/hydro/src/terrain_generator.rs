//! Procedural heightfields for demos and integration tests
//!
//! Builds a shallow valley running from the rain source edge (y = 0)
//! down to the drainage edge, with fbm relief on the slopes, scaled
//! into the solver's height clamps.

use noise::{Fbm, NoiseFn, Perlin};

use crate::constants::{MAX_TERRAIN_HEIGHT, MIN_TERRAIN_HEIGHT};

/// Configuration for terrain generation
pub struct TerrainConfig {
    pub seed: u32,
    pub base_height: f32,
    pub relief: f32,
    pub outflow_drop: f32,
    pub valley_depth: f32,
    pub valley_width: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            base_height: 1.0,  // Mean bed height
            relief: 0.3,       // Peak-to-valley span of the fbm detail
            outflow_drop: 0.25, // Height lost from source edge to drain edge
            valley_depth: 0.15, // Central channel depth
            valley_width: 0.25, // Channel half-width, fraction of grid width
        }
    }
}

/// Generate a `width * height` heightfield, row-major.
pub fn generate_terrain(width: usize, height: usize, config: &TerrainConfig) -> Vec<f32> {
    let relief_noise: Fbm<Perlin> = Fbm::new(config.seed);
    let wander_noise: Fbm<Perlin> = Fbm::new(config.seed + 1);

    let mut terrain = vec![0.0; width * height];
    let center_x = width as f32 / 2.0;

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;

            // 1. Valley center line wanders as it runs toward the drain
            let wander = (y as f32 * 0.2).sin() * width as f32 * 0.05
                + wander_noise.get([y as f64 * 0.03, 0.0]) as f32 * width as f32 * 0.08;
            let valley_x = center_x + wander;

            // 2. Parabolic channel profile: deepest at center
            let dist = (x as f32 - valley_x).abs() / (width as f32 * config.valley_width);
            let valley_factor = dist.min(1.0); // 0 at center, 1 on the banks
            let carve = config.valley_depth * (1.0 - valley_factor * valley_factor);

            // 3. Fbm relief on top of the base height
            let relief = relief_noise.get([x as f64 * 0.08, y as f64 * 0.08]) as f32
                * config.relief
                * 0.5;

            // 4. Overall drop toward the drainage edge
            let drop = config.outflow_drop * y as f32 / (height - 1).max(1) as f32;

            terrain[idx] = (config.base_height + relief - carve - drop)
                .clamp(MIN_TERRAIN_HEIGHT, MAX_TERRAIN_HEIGHT);
        }
    }

    terrain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heights_stay_within_solver_limits() {
        let terrain = generate_terrain(32, 32, &TerrainConfig::default());

        assert_eq!(terrain.len(), 32 * 32);
        for (i, &h) in terrain.iter().enumerate() {
            assert!(
                (MIN_TERRAIN_HEIGHT..=MAX_TERRAIN_HEIGHT).contains(&h),
                "Cell {} out of range: {}",
                i,
                h
            );
        }
    }

    #[test]
    fn same_seed_is_deterministic() {
        let config = TerrainConfig::default();
        let a = generate_terrain(24, 24, &config);
        let b = generate_terrain(24, 24, &config);

        assert_eq!(a, b);
    }

    #[test]
    fn drain_edge_sits_below_source_edge() {
        let terrain = generate_terrain(32, 32, &TerrainConfig::default());

        let row_mean = |y: usize| -> f32 {
            terrain[y * 32..(y + 1) * 32].iter().sum::<f32>() / 32.0
        };

        assert!(
            row_mean(31) < row_mean(0),
            "Drain edge mean {} should sit below source edge mean {}",
            row_mean(31),
            row_mean(0)
        );
    }
}
