//! Kinetic energy of a particle population.
//!
//! Each particle contributes `q · v² / (1 + sqrt(1 + v²))`, where `v` is
//! its normalized momentum advanced half a step by the local electric
//! field:
//!
//! ```text
//! v = u + (q_m · dt / 2c) · E(x)
//! ```
//!
//! This is `q (γ - 1)` written to avoid cancellation at small `v`. Terms
//! are computed in `f32` and accumulated in `f64` over four interleaved
//! lanes per pipeline, summed in lane order. The process total is the
//! fixed-order fold of the pipeline slots, the global total is the
//! process group's `all_sum`, and the result is `c² · global / q_m`.
//!
//! # Example
//!
//! ```
//! use cathode_core::{Grid, InterpolatorArray, LocalGrid, Particle};
//! use cathode_pipeline::{KineticEnergy, PipelineConfig, Pipelines};
//!
//! let grid = LocalGrid::new([2, 2, 2], [1.0; 3], 0.1).unwrap();
//! let interp = InterpolatorArray::new(grid.cell_count());
//! let particles = vec![Particle {
//!     i: 21,
//!     ux: 1.0,
//!     uy: 1.0,
//!     uz: 1.0,
//!     q: 1.0,
//!     ..Default::default()
//! }];
//!
//! let energy = KineticEnergy::builder()
//!     .particles(&particles)
//!     .q_m(1.0)
//!     .interpolator(&interp)
//!     .grid(&grid)
//!     .build()
//!     .unwrap();
//! let pipelines = Pipelines::new(&PipelineConfig::default()).unwrap();
//! assert_eq!(energy.compute(&pipelines).unwrap(), 1.0);
//! ```

use std::ops::Range;

use cathode_core::{DiagnosticError, Grid, Interpolator, Particle};
use tracing::{instrument, warn};

use crate::dispatch::{PipelineKernel, Pipelines};
use crate::reduce::{finalize_energy, Reduction};

const LANES: usize = 4;

/// A validated kinetic-energy request.
pub struct KineticEnergy<'a> {
    particles: &'a [Particle],
    q_m: f32,
    interpolator: &'a dyn Interpolator,
    grid: &'a dyn Grid,
}

/// Builder for [`KineticEnergy`].
///
/// Required fields: `q_m`, `interpolator`, `grid`. `particles` defaults
/// to empty and `count` to the length of `particles`.
pub struct KineticEnergyBuilder<'a> {
    particles: &'a [Particle],
    count: Option<i64>,
    q_m: Option<f32>,
    interpolator: Option<&'a dyn Interpolator>,
    grid: Option<&'a dyn Grid>,
}

impl<'a> KineticEnergy<'a> {
    /// Create a new builder.
    pub fn builder() -> KineticEnergyBuilder<'a> {
        KineticEnergyBuilder {
            particles: &[],
            count: None,
            q_m: None,
            interpolator: None,
            grid: None,
        }
    }

    /// Particles included in the sum.
    pub fn particles(&self) -> &[Particle] {
        self.particles
    }

    /// Compute the energy over the whole process group.
    ///
    /// Every rank of the grid's collective must call this the same
    /// number of times.
    ///
    /// # Errors
    ///
    /// - [`DiagnosticError::WorkerPanicked`] if a pipeline panicked.
    ///   This is returned before the collective is entered.
    /// - [`DiagnosticError::VoxelOutOfRange`] if particles reference
    ///   voxels the interpolator does not cover. Those particles are
    ///   skipped and the collective still completes, so peer ranks are
    ///   not left blocked.
    #[instrument(skip_all, fields(n = self.particles.len(), q_m = self.q_m))]
    pub fn compute(&self, pipelines: &Pipelines) -> Result<f64, DiagnosticError> {
        let kernel = EnergyKernel {
            particles: self.particles,
            interpolator: self.interpolator,
            qdt_2mc: 0.5 * self.q_m * self.grid.dt() / self.grid.cvac(),
        };
        let partials = pipelines.dispatch(self.particles.len(), &kernel)?;
        let out_of_range: usize = partials.iter().map(|p| p.out_of_range).sum();
        let reduction = Reduction::from_slots(partials.iter().map(|p| p.sum).collect());
        let global = reduction.all_reduce(self.grid.collective());
        if out_of_range > 0 {
            warn!(count = out_of_range, "particles outside interpolator skipped");
            return Err(DiagnosticError::VoxelOutOfRange {
                count: out_of_range,
            });
        }
        Ok(finalize_energy(global, self.grid.cvac(), self.q_m))
    }
}

impl<'a> KineticEnergyBuilder<'a> {
    /// Set the particle array.
    pub fn particles(mut self, particles: &'a [Particle]) -> Self {
        self.particles = particles;
        self
    }

    /// Use only the first `count` particles.
    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    /// Set the species charge-to-mass ratio.
    pub fn q_m(mut self, q_m: f32) -> Self {
        self.q_m = Some(q_m);
        self
    }

    /// Set the field interpolator.
    pub fn interpolator(mut self, interpolator: &'a dyn Interpolator) -> Self {
        self.interpolator = Some(interpolator);
        self
    }

    /// Set the grid.
    pub fn grid(mut self, grid: &'a dyn Grid) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Validate and build the request.
    ///
    /// # Errors
    ///
    /// [`DiagnosticError::InvalidArgument`] for a negative count, a
    /// missing interpolator or grid, a missing, zero or non-finite
    /// `q_m`, or a count larger than the particle array.
    pub fn build(self) -> Result<KineticEnergy<'a>, DiagnosticError> {
        let count = self.count.unwrap_or(self.particles.len() as i64);
        if count < 0 {
            return Err(invalid(format!("bad number of particles: {count}")));
        }
        let interpolator = self.interpolator.ok_or_else(|| invalid("bad interpolator".into()))?;
        let grid = self.grid.ok_or_else(|| invalid("bad grid".into()))?;
        let q_m = self.q_m.ok_or_else(|| invalid("q_m is required".into()))?;
        if q_m == 0.0 || !q_m.is_finite() {
            return Err(invalid(format!("q_m must be finite and nonzero, got {q_m}")));
        }
        let count = count as usize;
        if count > self.particles.len() {
            return Err(invalid(format!(
                "count {count} exceeds {} particles",
                self.particles.len()
            )));
        }
        Ok(KineticEnergy {
            particles: &self.particles[..count],
            q_m,
            interpolator,
            grid,
        })
    }
}

fn invalid(reason: String) -> DiagnosticError {
    DiagnosticError::InvalidArgument { reason }
}

/// `q · v² / (1 + sqrt(1 + v²))` for one particle in field `e`.
fn kinetic_term(p: &Particle, e: [f32; 3], qdt_2mc: f32) -> f32 {
    let vx = p.ux + qdt_2mc * e[0];
    let vy = p.uy + qdt_2mc * e[1];
    let vz = p.uz + qdt_2mc * e[2];
    let v2 = vx * vx + vy * vy + vz * vz;
    p.q * v2 / (1.0 + (1.0 + v2).sqrt())
}

struct Partial {
    sum: f64,
    out_of_range: usize,
}

struct EnergyKernel<'a> {
    particles: &'a [Particle],
    interpolator: &'a dyn Interpolator,
    qdt_2mc: f32,
}

impl PipelineKernel for EnergyKernel<'_> {
    type Output = Partial;

    fn run(&self, _rank: usize, range: Range<usize>) -> Partial {
        let mut lanes = [0.0f64; LANES];
        let mut out_of_range = 0;
        for (k, p) in self.particles[range].iter().enumerate() {
            let Some(f) = self.interpolator.sample(p.i, p.offset()) else {
                out_of_range += 1;
                continue;
            };
            lanes[k % LANES] += f64::from(kinetic_term(p, f.e, self.qdt_2mc));
        }
        Partial {
            sum: lanes.iter().fold(0.0, |acc, &x| acc + x),
            out_of_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use cathode_core::{InterpolatorArray, LocalGrid};
    use cathode_test_utils::fixtures::{at_rest, random_particles};
    use cathode_test_utils::UniformField;

    fn pipelines(workers: usize) -> Pipelines {
        Pipelines::new(&PipelineConfig {
            worker_count: Some(workers),
            quad_width: 4,
        })
        .unwrap()
    }

    fn grid() -> LocalGrid {
        LocalGrid::new([4, 4, 4], [1.0; 3], 0.5).unwrap()
    }

    fn moving(n: usize, q: f32) -> Vec<Particle> {
        vec![
            Particle {
                i: 7,
                ux: 1.0,
                uy: 1.0,
                uz: 1.0,
                q,
                ..Default::default()
            };
            n
        ]
    }

    #[test]
    fn validation_happens_before_dispatch() {
        let g = grid();
        let interp = InterpolatorArray::new(g.cell_count());
        let p = moving(3, 1.0);

        let err = KineticEnergy::builder()
            .particles(&p)
            .count(-1)
            .q_m(1.0)
            .interpolator(&interp)
            .grid(&g)
            .build()
            .err()
            .unwrap();
        assert!(err.to_string().contains("number of particles"));

        let err = KineticEnergy::builder().particles(&p).q_m(1.0).grid(&g).build().err().unwrap();
        assert!(err.to_string().contains("interpolator"));

        let err = KineticEnergy::builder()
            .particles(&p)
            .q_m(1.0)
            .interpolator(&interp)
            .build()
            .err()
            .unwrap();
        assert!(err.to_string().contains("grid"));

        for q_m in [0.0, f32::NAN] {
            assert!(KineticEnergy::builder()
                .q_m(q_m)
                .interpolator(&interp)
                .grid(&g)
                .build()
                .is_err());
        }

        assert!(KineticEnergy::builder()
            .particles(&p)
            .count(4)
            .q_m(1.0)
            .interpolator(&interp)
            .grid(&g)
            .build()
            .is_err());
    }

    #[test]
    fn empty_population_has_zero_energy() {
        let g = grid();
        let interp = InterpolatorArray::new(g.cell_count());
        let p = moving(5, 1.0);
        let e = KineticEnergy::builder()
            .particles(&p)
            .count(0)
            .q_m(1.0)
            .interpolator(&interp)
            .grid(&g)
            .build()
            .unwrap();
        assert_eq!(e.compute(&pipelines(3)).unwrap(), 0.0);
    }

    #[test]
    fn half_step_field_push_is_applied() {
        // qdt_2mc = 0.5 * 2 * 0.5 / 1 = 0.5, so E_x = 2 shifts v_x by 1.
        let g = grid();
        let field = UniformField::new(g.cell_count(), [2.0, 0.0, 0.0]);
        let p = vec![Particle {
            i: 9,
            uy: 1.0,
            uz: 1.0,
            q: 1.0,
            ..Default::default()
        }];
        let e = KineticEnergy::builder()
            .particles(&p)
            .q_m(2.0)
            .interpolator(&field)
            .grid(&g)
            .build()
            .unwrap();
        // v² = 3, term = 3 / (1 + 2) = 1, energy = 1 / q_m.
        assert_eq!(e.compute(&pipelines(2)).unwrap(), 0.5);
    }

    #[test]
    fn every_particle_counts_once_including_tail() {
        let g = grid();
        let interp = InterpolatorArray::new(g.cell_count());
        for n in [1, 3, 4, 5, 17, 63] {
            let p = moving(n, 1.0);
            let e = KineticEnergy::builder()
                .particles(&p)
                .q_m(1.0)
                .interpolator(&interp)
                .grid(&g)
                .build()
                .unwrap();
            assert_eq!(e.compute(&pipelines(4)).unwrap(), n as f64, "n = {n}");
        }
    }

    #[test]
    fn particles_at_rest_contribute_nothing() {
        let g = grid();
        let interp = InterpolatorArray::new(g.cell_count());
        let p = at_rest(10, 7, -1.0);
        let e = KineticEnergy::builder()
            .particles(&p)
            .q_m(-1.0)
            .interpolator(&interp)
            .grid(&g)
            .build()
            .unwrap();
        assert_eq!(e.compute(&pipelines(2)).unwrap(), 0.0);
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let g = grid();
        let field = UniformField::new(g.cell_count(), [0.3, -0.2, 0.1]);
        let p = random_particles(10_001, 42, 0..g.cell_count() as u32, 2.0);
        let e = KineticEnergy::builder()
            .particles(&p)
            .q_m(1.0)
            .interpolator(&field)
            .grid(&g)
            .build()
            .unwrap();
        let pl = pipelines(4);
        let first = e.compute(&pl).unwrap();
        for _ in 0..5 {
            assert_eq!(e.compute(&pl).unwrap().to_bits(), first.to_bits());
        }
        let serial = e.compute(&pipelines(1)).unwrap();
        assert!((first - serial).abs() <= 1e-9 * first.abs());
    }

    #[test]
    fn uncovered_voxels_are_reported() {
        let g = grid();
        let field = UniformField::new(8, [0.0; 3]);
        let mut p = moving(6, 1.0);
        p[2].i = 8;
        p[5].i = 100;
        let e = KineticEnergy::builder()
            .particles(&p)
            .q_m(1.0)
            .interpolator(&field)
            .grid(&g)
            .build()
            .unwrap();
        assert_eq!(
            e.compute(&pipelines(2)).unwrap_err(),
            DiagnosticError::VoxelOutOfRange { count: 2 }
        );
    }
}
