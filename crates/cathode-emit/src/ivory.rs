//! Threshold-gated emission with stratified placement ("ivory").
//!
//! Gating, charge and momenta match [`ColdCube`](crate::ColdCube). The
//! difference is placement: the `k`-th of the `n` particles a component
//! emits is jittered inside the `k`-th of `n` equal strata along the
//! component's first free axis, which spreads the injected charge evenly
//! over the surface even for small `n`.

use cathode_core::{ComponentId, EmissionError};
use tracing::trace;

use crate::context::EmissionContext;
use crate::model::{emit_batch, validate_threshold, Emit, EmissionReport, Thermal};
use crate::sampling::Placement;

/// Threshold-gated emission with stratified placement.
#[derive(Clone, Debug, PartialEq)]
pub struct Ivory {
    thermal: Thermal,
    thresh_e_norm: f32,
}

/// Builder for [`Ivory`].
///
/// Required fields: `n_emit_per_face`, `thresh_e_norm`.
/// Defaults: `ut_perp = ut_para = 0`.
pub struct IvoryBuilder {
    n_emit_per_face: Option<u32>,
    thresh_e_norm: Option<f32>,
    ut_perp: f32,
    ut_para: f32,
}

impl Ivory {
    /// Create a new builder.
    pub fn builder() -> IvoryBuilder {
        IvoryBuilder {
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
}

impl IvoryBuilder {
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

    /// Build the model.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ColdCubeBuilder::build`](crate::ccube::ColdCubeBuilder::build).
    pub fn build(self) -> Result<Ivory, EmissionError> {
        let thermal = Thermal::validate(self.n_emit_per_face, self.ut_perp, self.ut_para)?;
        let thresh = self.thresh_e_norm.ok_or_else(|| EmissionError::InvalidParameter {
            reason: "thresh_e_norm is required".into(),
        })?;
        Ok(Ivory {
            thermal,
            thresh_e_norm: validate_threshold(thresh)?,
        })
    }
}

impl Emit for Ivory {
    fn name(&self) -> &'static str {
        "Ivory"
    }

    fn emit(
        &self,
        components: &[ComponentId],
        ctx: &mut EmissionContext<'_>,
    ) -> Result<EmissionReport, EmissionError> {
        let mut report = EmissionReport::default();
        let q = ctx.species().q();
        let count = self.thermal.n_emit_per_face;
        for &id in components {
            let e_norm = ctx.sample_field(id)?.e_norm();
            if e_norm <= self.thresh_e_norm {
                continue;
            }
            trace!(component = %id, e_norm, "ivory component fires");
            emit_batch(
                ctx,
                id,
                &self.thermal,
                q,
                |index| Placement::Stratified { index, count },
                &mut report,
            )?;
        }
        Ok(report)
    }
}
