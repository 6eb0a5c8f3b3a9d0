//! Space-charge-limited (Child-Langmuir) emission.
//!
//! There is no threshold: a face emits whenever the normal electric
//! field pulls the species away from the surface, and it emits exactly
//! enough charge to cancel that field at the face (Gauss's law over the
//! face area):
//!
//! ```text
//! Q = sign(q_s) * eps0 * |E_n| * A_face
//! ```
//!
//! `Q` is split evenly over `n_emit_per_face` particles. Only face
//! components carry a well-defined area and normal field; edges, corners
//! and the body are skipped.
//!
//! # Construction
//!
//! ```
//! use cathode_emit::ChildLangmuir;
//!
//! let model = ChildLangmuir::builder()
//!     .n_emit_per_face(8)
//!     .ut_perp(0.01)
//!     .ut_para(0.02)
//!     .build()
//!     .unwrap();
//! assert_eq!(model.n_emit_per_face(), 8);
//! ```

use cathode_core::{ComponentId, ComponentKind, EmissionError};
use tracing::trace;

use crate::context::EmissionContext;
use crate::model::{emit_batch, Emit, EmissionReport, Thermal};
use crate::sampling::Placement;

/// Space-charge-limited emission model.
#[derive(Clone, Debug, PartialEq)]
pub struct ChildLangmuir {
    thermal: Thermal,
}

/// Builder for [`ChildLangmuir`].
///
/// Required field: `n_emit_per_face`. Defaults: `ut_perp = ut_para = 0`.
pub struct ChildLangmuirBuilder {
    n_emit_per_face: Option<u32>,
    ut_perp: f32,
    ut_para: f32,
}

impl ChildLangmuir {
    /// Create a new builder.
    pub fn builder() -> ChildLangmuirBuilder {
        ChildLangmuirBuilder {
            n_emit_per_face: None,
            ut_perp: 0.0,
            ut_para: 0.0,
        }
    }

    /// Particles emitted per firing face.
    pub fn n_emit_per_face(&self) -> u32 {
        self.thermal.n_emit_per_face
    }

    /// Perpendicular normalized thermal momentum.
    pub fn ut_perp(&self) -> f32 {
        self.thermal.ut_perp
    }

    /// Parallel normalized thermal momentum.
    pub fn ut_para(&self) -> f32 {
        self.thermal.ut_para
    }
}

impl ChildLangmuirBuilder {
    /// Set how many particles to emit per face.
    pub fn n_emit_per_face(mut self, n: u32) -> Self {
        self.n_emit_per_face = Some(n);
        self
    }

    /// Set the perpendicular thermal momentum (default 0).
    pub fn ut_perp(mut self, ut: f32) -> Self {
        self.ut_perp = ut;
        self
    }

    /// Set the parallel thermal momentum (default 0).
    pub fn ut_para(mut self, ut: f32) -> Self {
        self.ut_para = ut;
        self
    }

    /// Build the model, validating all parameters.
    ///
    /// # Errors
    ///
    /// [`EmissionError::InvalidParameter`] if `n_emit_per_face` is unset
    /// or zero, or a thermal width is negative or not finite.
    pub fn build(self) -> Result<ChildLangmuir, EmissionError> {
        Ok(ChildLangmuir {
            thermal: Thermal::validate(self.n_emit_per_face, self.ut_perp, self.ut_para)?,
        })
    }
}

impl Emit for ChildLangmuir {
    fn name(&self) -> &'static str {
        "ChildLangmuir"
    }

    fn emit(
        &self,
        components: &[ComponentId],
        ctx: &mut EmissionContext<'_>,
    ) -> Result<EmissionReport, EmissionError> {
        let mut report = EmissionReport::default();
        let q_s = ctx.species().q();
        let eps0 = ctx.grid().eps0();
        let spacing = ctx.grid().spacing();

        for &id in components {
            let ty = id.component_type();
            if ty.kind() != Some(ComponentKind::Face) {
                trace!(component = %id, "child-langmuir skips non-face component");
                continue;
            }
            let Some(normal) = ty.inward_normal() else {
                continue;
            };
            let e_n = ctx.sample_field(id)?.e_along(normal);
            if q_s * e_n <= 0.0 {
                continue;
            }
            let area: f32 = ty.free_axes().iter().map(|a| spacing[a.index()]).product();
            let total = q_s.signum() * eps0 * e_n.abs() * area;
            let q = total / self.thermal.n_emit_per_face as f32;
            trace!(component = %id, e_n, total, "child-langmuir face fires");
            emit_batch(ctx, id, &self.thermal, q, |_| Placement::Uniform, &mut report)?;
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::EmissionRng;
    use cathode_core::{Axis, ComponentType, Grid, InterpolatorArray, LocalGrid, Side};
    use cathode_test_utils::{MockAccumulator, MockChargeField, MockSpecies};
    use rand::SeedableRng;

    fn model(n: u32) -> ChildLangmuir {
        ChildLangmuir::builder()
            .n_emit_per_face(n)
            .ut_perp(0.01)
            .ut_para(0.05)
            .build()
            .unwrap()
    }

    #[test]
    fn builder_rejects_missing_count() {
        assert!(ChildLangmuir::builder().build().is_err());
        assert!(ChildLangmuir::builder()
            .n_emit_per_face(1)
            .ut_para(-1.0)
            .build()
            .is_err());
    }

    #[test]
    fn emits_gauss_law_charge_when_field_pulls_electrons_off() {
        let grid = LocalGrid::new([2, 2, 2], [1.0, 0.5, 0.25], 0.1)
            .unwrap()
            .with_constants(1.0, 2.0)
            .unwrap();
        // +x boundary: inward normal is -x. Electrons (q < 0) are pulled
        // inward when E_x > 0, i.e. q * E.n_in > 0.
        let interp = InterpolatorArray::uniform(grid.cell_count(), [3.0, 0.0, 0.0], [0.0; 3]);
        let faces = grid.boundary_faces(Axis::X, Side::High);
        let mut species = MockSpecies::new("electron", -1.0, 1024);
        let mut field = MockChargeField::new();
        let mut acc = MockAccumulator::new();
        let mut rng = EmissionRng::seed_from_u64(3);
        let mut ctx = EmissionContext::new(
            &mut species,
            &interp,
            &mut field,
            &mut acc,
            &grid,
            &mut rng,
        );

        let report = model(4).emit(&faces, &mut ctx).unwrap();

        assert_eq!(report.components_fired, faces.len());
        assert_eq!(report.emitted, 4 * faces.len());
        // eps0 * |E_n| * dy * dz = 2 * 3 * 0.5 * 0.25 = 0.75 per face.
        let expected = -0.75 * faces.len() as f64;
        assert!((report.charge - expected).abs() < 1e-6);
        assert_eq!(acc.total_charge(), report.charge);
        assert_eq!(species.total_charge(), report.charge);
        assert_eq!(field.total_rhob(), -report.charge);
        for p in species.particles() {
            assert_eq!(p.dx, 1.0);
            assert!(p.ux <= 0.0);
        }
    }

    #[test]
    fn retarding_field_emits_nothing() {
        let grid = LocalGrid::new([1, 1, 1], [1.0; 3], 0.1).unwrap();
        let interp = InterpolatorArray::uniform(grid.cell_count(), [-1.0, 0.0, 0.0], [0.0; 3]);
        let faces = grid.boundary_faces(Axis::X, Side::High);
        let mut species = MockSpecies::new("electron", -1.0, 16);
        let mut field = MockChargeField::new();
        let mut acc = MockAccumulator::new();
        let mut rng = EmissionRng::seed_from_u64(3);
        let mut ctx = EmissionContext::new(
            &mut species,
            &interp,
            &mut field,
            &mut acc,
            &grid,
            &mut rng,
        );
        let report = model(2).emit(&faces, &mut ctx).unwrap();
        assert_eq!(report, EmissionReport::default());
        assert!(species.particles().is_empty());
    }

    #[test]
    fn non_face_components_are_skipped() {
        let grid = LocalGrid::new([1, 1, 1], [1.0; 3], 0.1).unwrap();
        let interp = InterpolatorArray::uniform(grid.cell_count(), [1.0, 1.0, 1.0], [0.0; 3]);
        let cell = grid.voxel(1, 1, 1).unwrap();
        let ids = [
            ComponentId::new(cell, ComponentType::BODY).unwrap(),
            ComponentId::new(cell, ComponentType::from_offsets(1, 1, 0).unwrap()).unwrap(),
        ];
        let mut species = MockSpecies::new("ion", 1.0, 16);
        let mut field = MockChargeField::new();
        let mut acc = MockAccumulator::new();
        let mut rng = EmissionRng::seed_from_u64(3);
        let mut ctx = EmissionContext::new(
            &mut species,
            &interp,
            &mut field,
            &mut acc,
            &grid,
            &mut rng,
        );
        let report = model(2).emit(&ids, &mut ctx).unwrap();
        assert_eq!(report.emitted, 0);
    }
}
