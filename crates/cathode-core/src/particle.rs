//! The macro-particle record.

/// One simulation macro-particle.
///
/// Positions are cell-relative: `dx, dy, dz` lie in `[-1, 1]` across
/// voxel `i`, with `±1` on the cell faces. Momentum is normalized by
/// `m c`, so the Lorentz factor is `sqrt(1 + u·u)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    /// Offset along x within the cell.
    pub dx: f32,
    /// Offset along y within the cell.
    pub dy: f32,
    /// Offset along z within the cell.
    pub dz: f32,
    /// Voxel index.
    pub i: u32,
    /// Normalized momentum, x.
    pub ux: f32,
    /// Normalized momentum, y.
    pub uy: f32,
    /// Normalized momentum, z.
    pub uz: f32,
    /// Charge carried by the macro-particle.
    pub q: f32,
}

impl Particle {
    /// Cell-relative position as an array.
    pub fn offset(&self) -> [f32; 3] {
        [self.dx, self.dy, self.dz]
    }

    /// Momentum as an array.
    pub fn momentum(&self) -> [f32; 3] {
        [self.ux, self.uy, self.uz]
    }

    /// Lorentz factor `sqrt(1 + u·u)`.
    pub fn gamma(&self) -> f32 {
        (1.0 + self.ux * self.ux + self.uy * self.uy + self.uz * self.uz).sqrt()
    }

    /// Velocity in units of `c`.
    pub fn velocity(&self) -> [f32; 3] {
        let inv = 1.0 / self.gamma();
        [self.ux * inv, self.uy * inv, self.uz * inv]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particle_at_rest_has_unit_gamma() {
        let p = Particle::default();
        assert_eq!(p.gamma(), 1.0);
        assert_eq!(p.velocity(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn velocity_stays_below_light_speed() {
        let p = Particle {
            ux: 100.0,
            ..Default::default()
        };
        let v = p.velocity();
        assert!(v[0] < 1.0 && v[0] > 0.99);
    }
}
