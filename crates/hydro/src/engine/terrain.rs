//! Bed relaxation and the open outflow boundary.

use super::ErosionEngine;

impl ErosionEngine {
    /// Diffuse interior terrain toward its 4-neighbor mean, harder where
    /// the bed is under water. Reads a frozen pre-phase snapshot so the
    /// sweep order cannot bias the result.
    pub(crate) fn smooth_terrain(&mut self, terrain: &mut [f32], dt: f32) {
        let width = self.width;
        let height = self.height;
        let min_height = self.params.min_height;
        let max_height = self.params.max_height;
        let wet_depth = self.params.smooth_wet_depth;

        self.terrain_scratch.copy_from_slice(terrain);

        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let idx = y * width + x;

                let mean = 0.25
                    * (self.terrain_scratch[idx - 1]
                        + self.terrain_scratch[idx + 1]
                        + self.terrain_scratch[idx - width]
                        + self.terrain_scratch[idx + width]);

                let wetness = (self.water[idx] / wet_depth).min(1.0);
                // Clamp the blend weight so a large dt cannot overshoot
                // past the mean
                let rate = ((self.params.smooth_rate + self.params.smooth_wet_boost * wetness)
                    * dt)
                    .min(1.0);

                let relaxed = self.terrain_scratch[idx] + rate * (mean - self.terrain_scratch[idx]);
                terrain[idx] = relaxed.clamp(min_height, max_height);
            }
        }
    }

    /// Zero water and sediment along the open outflow rows: the drainage
    /// zone at the far edge, plus the row behind the source so nothing
    /// pools against the closed margin.
    pub(crate) fn drain_boundary(&mut self) {
        let width = self.width;
        let height = self.height;

        for y in self.drain_start_row()..height {
            for x in 0..width {
                let idx = y * width + x;
                self.water[idx] = 0.0;
                self.sediment[idx] = 0.0;
            }
        }

        for x in 0..width {
            self.water[x] = 0.0;
            self.sediment[x] = 0.0;
        }
    }
}
