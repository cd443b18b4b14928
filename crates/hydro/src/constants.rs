//! Physical constants for the erosion solver.
//!
//! ## Unit Conventions
//!
//! The grid is its own unit system: one cell is one unit of length, so
//! `CELL_AREA` and `PIPE_LENGTH` are 1.0 and terrain/water heights live in
//! the same unit. Rates (`EVAPORATION_RATE`, `SMOOTH_RATE`) are per second
//! and get multiplied by the frame delta; per-step caps
//! (`MAX_EROSION_PER_STEP`, `MAX_DEPOSIT_PER_STEP`) are absolute heights.

/// Gravity acceleration magnitude (m/s^2)
pub const GRAVITY: f32 = 9.81;

// =============================================================================
// PIPE MODEL - flux update and velocity derivation
// =============================================================================

/// Virtual pipe length between neighboring cell centers (grid units)
pub const PIPE_LENGTH: f32 = 1.0;

/// Cell footprint area (grid units^2)
pub const CELL_AREA: f32 = 1.0;

/// Per-step velocity damping factor
pub const VELOCITY_DAMPING: f32 = 0.98;

// =============================================================================
// SEDIMENT TRANSPORT - carrying capacity, erosion, deposition
// =============================================================================

/// Sediment capacity coefficient (dimensionless)
pub const CAPACITY_FACTOR: f32 = 1.0;

/// Scale applied to speed * slope when computing capacity
pub const CAPACITY_SCALE: f32 = 0.1;

/// Capacity floor so slow flow over flat ground still carries a trace
pub const MIN_CAPACITY: f32 = 1e-4;

/// Rate at which terrain dissolves into under-capacity flow (1/s)
pub const DISSOLVE_RATE: f32 = 0.5;

/// Rate at which excess sediment settles out of flow (1/s)
pub const DEPOSIT_RATE: f32 = 0.5;

/// Maximum terrain height removed by erosion in one step
pub const MAX_EROSION_PER_STEP: f32 = 0.01;

/// Maximum terrain height added by deposition in one step
pub const MAX_DEPOSIT_PER_STEP: f32 = 0.01;

// =============================================================================
// WATER BUDGET - evaporation and dry-cell snapping
// =============================================================================

/// Evaporation rate (fraction of depth per second)
pub const EVAPORATION_RATE: f32 = 0.015;

/// Water depths below this snap to zero
pub const MIN_WATER: f32 = 1e-4;

// =============================================================================
// TERRAIN LIMITS - height clamps and smoothing
// =============================================================================

/// Lowest terrain height erosion may carve to
pub const MIN_TERRAIN_HEIGHT: f32 = 0.01;

/// Highest terrain height deposition may build to
pub const MAX_TERRAIN_HEIGHT: f32 = 1.5;

/// Base smoothing rate toward the 4-neighbor mean (1/s)
pub const SMOOTH_RATE: f32 = 1.25;

/// Additional smoothing rate at full wetness (1/s)
pub const SMOOTH_WET_BOOST: f32 = 6.0;

/// Water depth at which the wet smoothing boost saturates
pub const SMOOTH_WET_DEPTH: f32 = 0.1;
