//! Water pipeline: rainfall, pipe flux, depth and velocity update,
//! evaporation.
//!
//! Flow follows the virtual pipe model: each cell stores four outgoing
//! fluxes driven by hydrostatic pressure differentials against its
//! neighbors, rescaled so a cell can never ship more water than it holds.

use super::ErosionEngine;

impl ErosionEngine {
    /// Inject rain volume over the source region near the y = 0 edge.
    pub(crate) fn apply_rainfall(&mut self, dt: f32, flow_rate: f32) {
        let volume = flow_rate * dt * self.params.source_intensity;
        if volume <= 0.0 {
            return;
        }

        let (x0, x1) = self.source_span();
        let y_end = (1 + self.params.source_rows).min(self.height - 1);
        for y in 1..y_end {
            for x in x0..x1 {
                let idx = self.idx(x, y);
                self.water[idx] += volume;
            }
        }
    }

    /// Update the four directional fluxes from pressure differentials,
    /// then rescale each cell's outflow so one step cannot ship more
    /// volume than the cell stores. Boundary cells carry no flux.
    pub(crate) fn update_flux(&mut self, terrain: &[f32], dt: f32) {
        let width = self.width;
        let height = self.height;
        let cell_area = self.params.cell_area;
        // Pipe gain: cross section * gravity / pipe length
        let gain = cell_area * self.params.gravity / self.params.pipe_length;

        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let idx = self.idx(x, y);
                let surface = terrain[idx] + self.water[idx];

                // Only positive heads pump flux; adverse gradients leave
                // the stored flux to be ground down by the volume limit.
                let head_left = (surface - terrain[idx - 1] - self.water[idx - 1]).max(0.0);
                let head_right = (surface - terrain[idx + 1] - self.water[idx + 1]).max(0.0);
                let head_up = (surface - terrain[idx - width] - self.water[idx - width]).max(0.0);
                let head_down = (surface - terrain[idx + width] - self.water[idx + width]).max(0.0);

                let flux_left = (self.flux_left[idx] + dt * gain * head_left).max(0.0);
                let flux_right = (self.flux_right[idx] + dt * gain * head_right).max(0.0);
                let flux_up = (self.flux_up[idx] + dt * gain * head_up).max(0.0);
                let flux_down = (self.flux_down[idx] + dt * gain * head_down).max(0.0);

                // Volume limit: total outflow this step must fit in the cell
                let outflow = (flux_left + flux_right + flux_up + flux_down) * dt;
                let available = self.water[idx] * cell_area;
                let scale = if outflow > available {
                    available / outflow
                } else {
                    1.0
                };

                self.flux_left[idx] = flux_left * scale;
                self.flux_right[idx] = flux_right * scale;
                self.flux_up[idx] = flux_up * scale;
                self.flux_down[idx] = flux_down * scale;
            }
        }

        // Closed outer ring: no flux enters or leaves through the margin
        for x in 0..width {
            let top = self.idx(x, 0);
            let bottom = self.idx(x, height - 1);
            self.flux_left[top] = 0.0;
            self.flux_right[top] = 0.0;
            self.flux_up[top] = 0.0;
            self.flux_down[top] = 0.0;
            self.flux_left[bottom] = 0.0;
            self.flux_right[bottom] = 0.0;
            self.flux_up[bottom] = 0.0;
            self.flux_down[bottom] = 0.0;
        }
        for y in 0..height {
            let left = self.idx(0, y);
            let right = self.idx(width - 1, y);
            self.flux_left[left] = 0.0;
            self.flux_right[left] = 0.0;
            self.flux_up[left] = 0.0;
            self.flux_down[left] = 0.0;
            self.flux_left[right] = 0.0;
            self.flux_right[right] = 0.0;
            self.flux_up[right] = 0.0;
            self.flux_down[right] = 0.0;
        }
    }

    /// Apply net flux to water depths, then derive cell-center velocities
    /// from the mean throughflow on each axis.
    pub(crate) fn update_water_and_velocity(&mut self, dt: f32) {
        let width = self.width;
        let height = self.height;
        let cell_area = self.params.cell_area;
        let damping = self.params.velocity_damping;
        let min_water = self.params.min_water;

        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let idx = self.idx(x, y);
                let left = idx - 1;
                let right = idx + 1;
                let up = idx - width;
                let down = idx + width;

                let inflow = self.flux_right[left]
                    + self.flux_left[right]
                    + self.flux_down[up]
                    + self.flux_up[down];
                let outflow = self.flux_left[idx]
                    + self.flux_right[idx]
                    + self.flux_up[idx]
                    + self.flux_down[idx];

                let depth = (self.water[idx] + dt * (inflow - outflow) / cell_area).max(0.0);
                self.water[idx] = depth;

                // Mean throughflow across the two faces on each axis
                let flow_x = 0.5
                    * (self.flux_right[left] - self.flux_left[idx] + self.flux_right[idx]
                        - self.flux_left[right]);
                let flow_y = 0.5
                    * (self.flux_down[up] - self.flux_up[idx] + self.flux_down[idx]
                        - self.flux_up[down]);

                // Velocity is undefined in a near-dry cell; snap it to rest
                if depth > min_water {
                    self.velocity_x[idx] = damping * flow_x / (cell_area * depth);
                    self.velocity_y[idx] = damping * flow_y / (cell_area * depth);
                } else {
                    self.velocity_x[idx] = 0.0;
                    self.velocity_y[idx] = 0.0;
                }
            }
        }

        // The margin never flows
        for x in 0..width {
            let top = self.idx(x, 0);
            let bottom = self.idx(x, height - 1);
            self.velocity_x[top] = 0.0;
            self.velocity_y[top] = 0.0;
            self.velocity_x[bottom] = 0.0;
            self.velocity_y[bottom] = 0.0;
        }
        for y in 0..height {
            let left = self.idx(0, y);
            let right = self.idx(width - 1, y);
            self.velocity_x[left] = 0.0;
            self.velocity_y[left] = 0.0;
            self.velocity_x[right] = 0.0;
            self.velocity_y[right] = 0.0;
        }
    }

    /// Scale water down by the evaporation rate and snap trace depths
    /// to zero so they cannot linger forever.
    pub(crate) fn apply_evaporation(&mut self, dt: f32) {
        let keep = (1.0 - self.params.evaporation_rate * dt).max(0.0);
        let min_water = self.params.min_water;

        for depth in &mut self.water {
            *depth *= keep;
            if *depth < min_water {
                *depth = 0.0;
            }
        }
    }
}
