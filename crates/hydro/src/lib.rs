//! Grid-Based Hydraulic Erosion
//!
//! A virtual pipe shallow-water solver on a 2D heightfield: rain falls
//! near one edge, flows downhill, carves and deposits terrain, and drains
//! out the far edge. The terrain array stays caller-owned; the engine
//! mutates it in place each step.
//!
//! # Example
//!
//! ```
//! use hydro::ErosionEngine;
//!
//! let mut engine = ErosionEngine::new(32, 32);
//! let mut terrain = vec![1.0_f32; 32 * 32];
//!
//! // Rain for one second of simulated time
//! for _ in 0..60 {
//!     engine
//!         .simulate(&mut terrain, 1.0 / 60.0, 0.5, true, 1.0)
//!         .unwrap();
//! }
//!
//! let wet_cells = engine.water.iter().filter(|&&w| w > 0.0).count();
//! assert!(wet_cells > 0);
//! ```

pub mod constants;
pub mod engine;
pub mod sampler;
pub mod terrain_generator;

pub use engine::{ErosionEngine, ErosionParams, SimulateError};
pub use glam::Vec2;
pub use sampler::sample;
pub use terrain_generator::{generate_terrain, TerrainConfig};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_creation() {
        let engine = ErosionEngine::new(16, 24);
        assert_eq!(engine.width, 16);
        assert_eq!(engine.height, 24);
        assert_eq!(engine.water.len(), 16 * 24);
        assert_eq!(engine.total_water_volume(), 0.0);
    }

    #[test]
    fn test_rain_adds_water() {
        let mut engine = ErosionEngine::new(16, 16);
        let mut terrain = vec![1.0; 16 * 16];

        engine
            .simulate(&mut terrain, 0.016, 1.0, true, 1.0)
            .unwrap();

        assert!(
            engine.total_water_volume() > 0.0,
            "Rain should add water, got volume = {}",
            engine.total_water_volume()
        );
    }

    #[test]
    fn test_reset_clears_state() {
        let mut engine = ErosionEngine::new(16, 16);
        let mut terrain = generate_terrain(16, 16, &TerrainConfig::default());

        for _ in 0..20 {
            engine
                .simulate(&mut terrain, 0.016, 1.0, true, 1.0)
                .unwrap();
        }
        assert!(engine.total_water_volume() > 0.0);

        engine.reset();

        assert_eq!(engine.total_water_volume(), 0.0);
        assert!(engine.sediment.iter().all(|&s| s == 0.0));
        assert!(engine.flux_down.iter().all(|&f| f == 0.0));
        assert!(engine.velocity_x.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_long_run_stays_finite() {
        let mut engine = ErosionEngine::new(24, 24);
        let mut terrain = generate_terrain(24, 24, &TerrainConfig::default());

        for _ in 0..300 {
            engine
                .simulate(&mut terrain, 0.016, 0.8, true, 1.0)
                .unwrap();
        }

        assert!(terrain.iter().all(|h| h.is_finite()));
        assert!(engine.water.iter().all(|w| w.is_finite()));
        assert!(engine.sediment.iter().all(|s| s.is_finite()));
    }
}
