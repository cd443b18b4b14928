//! Sediment exchange with the bed and transport along the flow.

use glam::Vec2;

use super::ErosionEngine;
use crate::sampler;

impl ErosionEngine {
    /// Erode terrain into suspension where flow is under capacity, settle
    /// the excess back onto the bed where it is over.
    ///
    /// Carrying capacity follows speed times bed slope with a small floor,
    /// so slow flow over flat ground still carries a trace. The boundary
    /// margin and the drainage zone never exchange material.
    pub(crate) fn erode_and_deposit(&mut self, terrain: &mut [f32], dt: f32, rate_multiplier: f32) {
        let width = self.width;
        let capacity_factor = self.params.capacity_factor;
        let capacity_scale = self.params.capacity_scale;
        let min_capacity = self.params.min_capacity;
        let dissolve_rate = self.params.dissolve_rate;
        let deposit_rate = self.params.deposit_rate;
        let min_height = self.params.min_height;
        let max_height = self.params.max_height;
        let max_erosion = self.params.max_erosion_per_step;
        let max_deposit = self.params.max_deposit_per_step;

        let y_end = self.drain_start_row().min(self.height - 1);

        for y in 1..y_end {
            for x in 1..width - 1 {
                let idx = y * width + x;

                let speed = Vec2::new(self.velocity_x[idx], self.velocity_y[idx]).length();

                // Bed slope magnitude from central differences
                let slope_x = (terrain[idx + 1] - terrain[idx - 1]) * 0.5;
                let slope_y = (terrain[idx + width] - terrain[idx - width]) * 0.5;
                let slope = (slope_x * slope_x + slope_y * slope_y).sqrt();

                let capacity =
                    (capacity_factor * speed * slope * capacity_scale).max(min_capacity);
                let suspended = self.sediment[idx];

                if capacity > suspended {
                    // Scour the bed, but never below the floor and never
                    // more than one step's cap
                    let eroded = (dissolve_rate * (capacity - suspended) * dt * rate_multiplier)
                        .min(max_erosion)
                        .min(terrain[idx] - min_height)
                        .max(0.0);
                    terrain[idx] -= eroded;
                    self.sediment[idx] = suspended + eroded;
                } else {
                    // Settle the excess, but never above the ceiling and
                    // never more sediment than is actually suspended
                    let settled = (deposit_rate * (suspended - capacity) * dt)
                        .min(max_deposit)
                        .min(suspended)
                        .min(max_height - terrain[idx])
                        .max(0.0);
                    terrain[idx] += settled;
                    self.sediment[idx] = suspended - settled;
                }
            }
        }
    }

    /// Semi-Lagrangian transport: backtrace each interior cell along the
    /// velocity field and sample the pre-step sediment there.
    pub(crate) fn advect_sediment(&mut self, dt: f32) {
        let width = self.width;
        let height = self.height;

        self.sediment_scratch.fill(0.0);

        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let idx = y * width + x;
                let source = Vec2::new(
                    x as f32 - self.velocity_x[idx] * dt,
                    y as f32 - self.velocity_y[idx] * dt,
                );
                self.sediment_scratch[idx] = sampler::sample(&self.sediment, width, height, source);
            }
        }

        std::mem::swap(&mut self.sediment, &mut self.sediment_scratch);
    }
}
