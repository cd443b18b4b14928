//! Pipe-model erosion state and the per-frame step.
//!
//! The engine owns water, sediment, flux, and velocity fields on a fixed
//! grid. The terrain heightfield stays caller-owned and is passed into
//! [`ErosionEngine::simulate`] each step, where it is mutated in place.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    CAPACITY_FACTOR, CAPACITY_SCALE, CELL_AREA, DEPOSIT_RATE, DISSOLVE_RATE, EVAPORATION_RATE,
    GRAVITY, MAX_DEPOSIT_PER_STEP, MAX_EROSION_PER_STEP, MAX_TERRAIN_HEIGHT, MIN_CAPACITY,
    MIN_TERRAIN_HEIGHT, MIN_WATER, PIPE_LENGTH, SMOOTH_RATE, SMOOTH_WET_BOOST, SMOOTH_WET_DEPTH,
    VELOCITY_DAMPING,
};

mod sediment;
mod terrain;
mod water;

/// Erosion solver parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErosionParams {
    /// Gravity acceleration magnitude (m/s^2).
    pub gravity: f32,
    /// Virtual pipe length between neighboring cell centers (grid units).
    pub pipe_length: f32,
    /// Cell footprint area (grid units^2).
    pub cell_area: f32,
    /// Per-step velocity damping factor (0-1, higher keeps more momentum).
    pub velocity_damping: f32,
    /// Sediment capacity coefficient.
    pub capacity_factor: f32,
    /// Scale applied to speed * slope in the capacity formula.
    pub capacity_scale: f32,
    /// Capacity floor (sediment volume).
    pub min_capacity: f32,
    /// Rate at which terrain dissolves into under-capacity flow (1/s).
    pub dissolve_rate: f32,
    /// Rate at which excess sediment settles out of flow (1/s).
    pub deposit_rate: f32,
    /// Evaporation rate (fraction of water depth per second).
    pub evaporation_rate: f32,
    /// Lowest terrain height erosion may carve to.
    pub min_height: f32,
    /// Highest terrain height deposition may build to.
    pub max_height: f32,
    /// Cap on terrain height removed per cell per step.
    pub max_erosion_per_step: f32,
    /// Cap on terrain height added per cell per step.
    pub max_deposit_per_step: f32,
    /// Water depths below this snap to zero.
    pub min_water: f32,
    /// Row count of the rain source region, starting at row 1.
    pub source_rows: usize,
    /// Source region width as a fraction of the grid width (0-1).
    pub source_width: f32,
    /// Scale applied to flow_rate * dt when injecting rain.
    pub source_intensity: f32,
    /// Rows at the far edge drained to zero every step.
    pub drain_rows: usize,
    /// Base terrain smoothing rate toward the 4-neighbor mean (1/s).
    pub smooth_rate: f32,
    /// Additional smoothing rate at full wetness (1/s).
    pub smooth_wet_boost: f32,
    /// Water depth at which the wet smoothing boost saturates.
    pub smooth_wet_depth: f32,
}

impl Default for ErosionParams {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            pipe_length: PIPE_LENGTH,
            cell_area: CELL_AREA,
            velocity_damping: VELOCITY_DAMPING,
            capacity_factor: CAPACITY_FACTOR,
            capacity_scale: CAPACITY_SCALE,
            min_capacity: MIN_CAPACITY,
            dissolve_rate: DISSOLVE_RATE,
            deposit_rate: DEPOSIT_RATE,
            evaporation_rate: EVAPORATION_RATE,
            min_height: MIN_TERRAIN_HEIGHT,
            max_height: MAX_TERRAIN_HEIGHT,
            max_erosion_per_step: MAX_EROSION_PER_STEP,
            max_deposit_per_step: MAX_DEPOSIT_PER_STEP,
            min_water: MIN_WATER,
            source_rows: 3,
            source_width: 0.5, // Middle half of the grid
            source_intensity: 1.0,
            drain_rows: 2,
            smooth_rate: SMOOTH_RATE,
            smooth_wet_boost: SMOOTH_WET_BOOST,
            smooth_wet_depth: SMOOTH_WET_DEPTH,
        }
    }
}

/// Rejected `simulate` input.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum SimulateError {
    /// Terrain slice length does not match the grid.
    #[error("terrain length {actual} does not match grid cell count {expected}")]
    TerrainLength { expected: usize, actual: usize },
    /// Negative time step.
    #[error("negative time step {dt}")]
    NegativeDt { dt: f32 },
}

/// Grid-based hydraulic erosion state.
///
/// All fields are flat row-major arrays of length `width * height`,
/// indexed `y * width + x`. Water and sediment are public so hosts can
/// render the water surface (`terrain[i] + water[i]`) and tint by
/// suspended load; flux and velocity are public for diagnostics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErosionEngine {
    pub width: usize,
    pub height: usize,

    /// Standing water depth per cell.
    pub water: Vec<f32>,
    /// Suspended sediment volume per cell.
    pub sediment: Vec<f32>,

    /// Outgoing flux toward x-1.
    pub flux_left: Vec<f32>,
    /// Outgoing flux toward x+1.
    pub flux_right: Vec<f32>,
    /// Outgoing flux toward y-1.
    pub flux_up: Vec<f32>,
    /// Outgoing flux toward y+1.
    pub flux_down: Vec<f32>,

    /// Flow velocity X component at cell centers.
    pub velocity_x: Vec<f32>,
    /// Flow velocity Y component at cell centers.
    pub velocity_y: Vec<f32>,

    // Working buffers (avoid allocation in the step loop)
    sediment_scratch: Vec<f32>,
    terrain_scratch: Vec<f32>,

    /// Tunable parameters, adjustable between steps.
    pub params: ErosionParams,
}

impl ErosionEngine {
    /// Create an engine for a `width x height` grid with all fields zeroed.
    ///
    /// Panics if either dimension is below 3; the solver needs interior
    /// cells to exist.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            width >= 3 && height >= 3,
            "grid must be at least 3x3, got {}x{}",
            width,
            height
        );
        let cell_count = width * height;

        Self {
            width,
            height,

            water: vec![0.0; cell_count],
            sediment: vec![0.0; cell_count],

            flux_left: vec![0.0; cell_count],
            flux_right: vec![0.0; cell_count],
            flux_up: vec![0.0; cell_count],
            flux_down: vec![0.0; cell_count],

            velocity_x: vec![0.0; cell_count],
            velocity_y: vec![0.0; cell_count],

            sediment_scratch: vec![0.0; cell_count],
            terrain_scratch: vec![0.0; cell_count],

            params: ErosionParams::default(),
        }
    }

    /// Cell index from (x, y) coordinates.
    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Column span `[x0, x1)` of the rain source region, kept off the
    /// boundary columns.
    #[inline]
    fn source_span(&self) -> (usize, usize) {
        let span = ((self.width as f32 * self.params.source_width).round() as usize)
            .clamp(1, self.width - 2);
        let x0 = ((self.width - span) / 2).max(1);
        let x1 = (x0 + span).min(self.width - 1);
        (x0, x1)
    }

    /// First row of the far-edge drainage zone.
    #[inline]
    fn drain_start_row(&self) -> usize {
        self.height - self.params.drain_rows.min(self.height)
    }

    /// Zero every field without reallocating.
    pub fn reset(&mut self) {
        self.water.fill(0.0);
        self.sediment.fill(0.0);
        self.flux_left.fill(0.0);
        self.flux_right.fill(0.0);
        self.flux_up.fill(0.0);
        self.flux_down.fill(0.0);
        self.velocity_x.fill(0.0);
        self.velocity_y.fill(0.0);
        self.sediment_scratch.fill(0.0);
        self.terrain_scratch.fill(0.0);
    }

    /// Advance the simulation by one step, mutating `terrain` in place.
    ///
    /// `terrain` must have length `width * height` and `dt` must be
    /// non-negative; both are checked before any state is touched. The
    /// caller is expected to pre-clamp `dt` to a stability-safe maximum
    /// (50 ms or less). `flow_rate` scales rain injection while `raining`
    /// is set; `erosion_rate_multiplier` scales only the erosion branch
    /// of the sediment exchange (1.0 is nominal).
    pub fn simulate(
        &mut self,
        terrain: &mut [f32],
        dt: f32,
        flow_rate: f32,
        raining: bool,
        erosion_rate_multiplier: f32,
    ) -> Result<(), SimulateError> {
        let expected = self.width * self.height;
        if terrain.len() != expected {
            log::error!(
                "terrain length {} does not match grid cell count {}",
                terrain.len(),
                expected
            );
            return Err(SimulateError::TerrainLength {
                expected,
                actual: terrain.len(),
            });
        }
        if dt < 0.0 {
            log::error!("rejecting negative time step {}", dt);
            return Err(SimulateError::NegativeDt { dt });
        }

        // 1. Rain into the source region
        if raining {
            self.apply_rainfall(dt, flow_rate);
        }

        // 2. Pipe flux from hydrostatic pressure differentials
        self.update_flux(terrain, dt);

        // 3. Water depths and cell velocities from the flux field
        self.update_water_and_velocity(dt);

        // 4. Erode or deposit against the local carrying capacity
        self.erode_and_deposit(terrain, dt, erosion_rate_multiplier);

        // 5. Carry suspended sediment along the flow
        self.advect_sediment(dt);

        // 6. Evaporate standing water
        self.apply_evaporation(dt);

        // 7. Relax erosion spikes toward the neighborhood mean
        self.smooth_terrain(terrain, dt);

        // 8. Drain the open boundary
        self.drain_boundary();

        Ok(())
    }

    /// Add standing water at a cell. Out-of-range coordinates are ignored.
    pub fn add_water(&mut self, x: usize, y: usize, depth: f32) {
        if x < self.width && y < self.height {
            let idx = self.idx(x, y);
            self.water[idx] = (self.water[idx] + depth).max(0.0);
        }
    }

    /// Total water volume across the grid.
    pub fn total_water_volume(&self) -> f32 {
        self.water.iter().sum::<f32>() * self.params.cell_area
    }
}
