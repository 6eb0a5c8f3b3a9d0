//! Threshold-gated cold emission ("ccube").
//!
//! A component fires when the electric field magnitude at its centre
//! exceeds `thresh_e_norm`. Each firing component emits
//! `n_emit_per_face` unit-weight particles of the species charge, placed
//! uniformly over the component and drawn from the half-Maxwellian of
//! [`sampling`](crate::sampling).

use cathode_core::{ComponentId, EmissionError};
use tracing::trace;

use crate::context::EmissionContext;
use crate::model::{emit_batch, validate_threshold, Emit, EmissionReport, Thermal};
use crate::sampling::Placement;

/// Threshold-gated emission with uniform placement.
#[derive(Clone, Debug, PartialEq)]
pub struct ColdCube {
    thermal: Thermal,
    thresh_e_norm: f32,
}

/// Builder for [`ColdCube`].
///
/// Required fields: `n_emit_per_face`, `thresh_e_norm`.
/// Defaults: `ut_perp = ut_para = 0`.
pub struct ColdCubeBuilder {
    n_emit_per_face: Option<u32>,
    thresh_e_norm: Option<f32>,
    ut_perp: f32,
    ut_para: f32,
}

impl ColdCube {
    /// Create a new builder.
    pub fn builder() -> ColdCubeBuilder {
        ColdCubeBuilder {
            n_emit_per_face: None,
            thresh_e_norm: None,
            ut_perp: 0.0,
            ut_para: 0.0,
        }
    }

    /// Particles emitted per firing component.
    pub fn n_emit_per_face(&self) -> u32 {
        self.thermal.n_emit_per_face
    }

    /// Field magnitude a component must exceed to fire.
    pub fn thresh_e_norm(&self) -> f32 {
        self.thresh_e_norm
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

impl ColdCubeBuilder {
    /// Set how many particles to emit per firing component.
    pub fn n_emit_per_face(mut self, n: u32) -> Self {
        self.n_emit_per_face = Some(n);
        self
    }

    /// Set the field-magnitude threshold.
    pub fn thresh_e_norm(mut self, thresh: f32) -> Self {
        self.thresh_e_norm = Some(thresh);
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
    /// [`EmissionError::InvalidParameter`] if a required field is unset,
    /// `n_emit_per_face` is zero, or a threshold or thermal width is
    /// negative or not finite.
    pub fn build(self) -> Result<ColdCube, EmissionError> {
        let thermal = Thermal::validate(self.n_emit_per_face, self.ut_perp, self.ut_para)?;
        let thresh = self.thresh_e_norm.ok_or_else(|| EmissionError::InvalidParameter {
            reason: "thresh_e_norm is required".into(),
        })?;
        Ok(ColdCube {
            thermal,
            thresh_e_norm: validate_threshold(thresh)?,
        })
    }
}

impl Emit for ColdCube {
    fn name(&self) -> &'static str {
        "ColdCube"
    }

    fn emit(
        &self,
        components: &[ComponentId],
        ctx: &mut EmissionContext<'_>,
    ) -> Result<EmissionReport, EmissionError> {
        let mut report = EmissionReport::default();
        let q = ctx.species().q();
        for &id in components {
            let e_norm = ctx.sample_field(id)?.e_norm();
            if e_norm <= self.thresh_e_norm {
                continue;
            }
            trace!(component = %id, e_norm, "ccube component fires");
            emit_batch(ctx, id, &self.thermal, q, |_| Placement::Uniform, &mut report)?;
        }
        Ok(report)
    }
}
