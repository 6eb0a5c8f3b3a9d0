//! The [`Emit`] capability and the closed [`EmissionModel`] variant set.
//!
//! Models are stateless, `&self` operators. Given the same emitter,
//! field snapshot, grid and RNG stream they produce the same particles
//! in the same order, and they never read or write state belonging to
//! another emitter. New models are added by extending
//! [`EmissionModel`], not by widening a callback signature.

use cathode_core::{ComponentId, ComponentType, EmissionError, Particle};

use crate::ccube::ColdCube;
use crate::child_langmuir::ChildLangmuir;
use crate::context::EmissionContext;
use crate::ivory::Ivory;
use crate::sampling::{sample_momentum, sample_offset, Placement};

/// Summary of one or more `emit()` calls.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EmissionReport {
    /// Particles appended to the species.
    pub emitted: usize,
    /// Components whose emission predicate passed.
    pub components_fired: usize,
    /// Total charge of the appended particles, summed in injection order.
    pub charge: f64,
}

impl EmissionReport {
    /// Fold another report into this one.
    pub fn merge(&mut self, other: &EmissionReport) {
        self.emitted += other.emitted;
        self.components_fired += other.components_fired;
        self.charge += other.charge;
    }
}

/// A boundary injection strategy.
///
/// # Contract
///
/// - Components are visited in list order.
/// - Randomness comes only from `ctx.rng()`.
/// - Particles enter only through [`EmissionContext::inject`], so the
///   charge accumulated during the call equals the charge appended.
pub trait Emit {
    /// Human-readable model name for logs and errors.
    fn name(&self) -> &'static str;

    /// Run the model over `components` for one step.
    ///
    /// # Errors
    ///
    /// Propagates [`EmissionError`] from field sampling or the species.
    /// Particles injected before the failure stay injected, with their
    /// charge deposited.
    fn emit(
        &self,
        components: &[ComponentId],
        ctx: &mut EmissionContext<'_>,
    ) -> Result<EmissionReport, EmissionError>;
}

/// The closed set of emission models.
#[derive(Clone, Debug, PartialEq)]
pub enum EmissionModel {
    /// Space-charge-limited emission.
    ChildLangmuir(ChildLangmuir),
    /// Threshold-gated emission, uniform placement.
    ColdCube(ColdCube),
    /// Threshold-gated emission, stratified placement.
    Ivory(Ivory),
}

impl Emit for EmissionModel {
    fn name(&self) -> &'static str {
        match self {
            Self::ChildLangmuir(m) => m.name(),
            Self::ColdCube(m) => m.name(),
            Self::Ivory(m) => m.name(),
        }
    }

    fn emit(
        &self,
        components: &[ComponentId],
        ctx: &mut EmissionContext<'_>,
    ) -> Result<EmissionReport, EmissionError> {
        match self {
            Self::ChildLangmuir(m) => m.emit(components, ctx),
            Self::ColdCube(m) => m.emit(components, ctx),
            Self::Ivory(m) => m.emit(components, ctx),
        }
    }
}

impl From<ChildLangmuir> for EmissionModel {
    fn from(m: ChildLangmuir) -> Self {
        Self::ChildLangmuir(m)
    }
}

impl From<ColdCube> for EmissionModel {
    fn from(m: ColdCube) -> Self {
        Self::ColdCube(m)
    }
}

impl From<Ivory> for EmissionModel {
    fn from(m: Ivory) -> Self {
        Self::Ivory(m)
    }
}

/// Thermal parameters shared by every model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Thermal {
    pub n_emit_per_face: u32,
    pub ut_perp: f32,
    pub ut_para: f32,
}

impl Thermal {
    pub(crate) fn validate(
        n_emit_per_face: Option<u32>,
        ut_perp: f32,
        ut_para: f32,
    ) -> Result<Self, EmissionError> {
        let n_emit_per_face = n_emit_per_face.ok_or_else(|| EmissionError::InvalidParameter {
            reason: "n_emit_per_face is required".into(),
        })?;
        if n_emit_per_face == 0 {
            return Err(EmissionError::InvalidParameter {
                reason: "n_emit_per_face must be at least 1".into(),
            });
        }
        for (name, value) in [("ut_perp", ut_perp), ("ut_para", ut_para)] {
            if !value.is_finite() || value < 0.0 {
                return Err(EmissionError::InvalidParameter {
                    reason: format!("{name} must be finite and >= 0, got {value}"),
                });
            }
        }
        Ok(Self {
            n_emit_per_face,
            ut_perp,
            ut_para,
        })
    }
}

pub(crate) fn validate_threshold(thresh_e_norm: f32) -> Result<f32, EmissionError> {
    if !thresh_e_norm.is_finite() || thresh_e_norm < 0.0 {
        return Err(EmissionError::InvalidParameter {
            reason: format!("thresh_e_norm must be finite and >= 0, got {thresh_e_norm}"),
        });
    }
    Ok(thresh_e_norm)
}

/// Inject `thermal.n_emit_per_face` particles of charge `q` on `component`.
///
/// `placement(k)` chooses the placement of the `k`-th particle.
pub(crate) fn emit_batch(
    ctx: &mut EmissionContext<'_>,
    component: ComponentId,
    thermal: &Thermal,
    q: f32,
    placement: impl Fn(u32) -> Placement,
    report: &mut EmissionReport,
) -> Result<(), EmissionError> {
    let ty: ComponentType = component.component_type();
    for k in 0..thermal.n_emit_per_face {
        let rng = ctx.rng();
        let Some([dx, dy, dz]) = sample_offset(ty, placement(k), rng) else {
            return Err(EmissionError::ComponentOutOfRange { component });
        };
        let [ux, uy, uz] = sample_momentum(ty, thermal.ut_perp, thermal.ut_para, rng);
        ctx.inject(Particle {
            dx,
            dy,
            dz,
            i: component.cell(),
            ux,
            uy,
            uz,
            q,
        })?;
        report.emitted += 1;
        report.charge += f64::from(q);
    }
    report.components_fired += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thermal_requires_particle_count() {
        assert!(Thermal::validate(None, 0.1, 0.1).is_err());
        assert!(Thermal::validate(Some(0), 0.1, 0.1).is_err());
        assert!(Thermal::validate(Some(2), 0.0, 0.0).is_ok());
    }

    #[test]
    fn thermal_rejects_bad_widths() {
        assert!(Thermal::validate(Some(1), -0.1, 0.1).is_err());
        assert!(Thermal::validate(Some(1), 0.1, f32::NAN).is_err());
        assert!(Thermal::validate(Some(1), f32::INFINITY, 0.1).is_err());
    }

    #[test]
    fn threshold_validation() {
        assert_eq!(validate_threshold(0.5), Ok(0.5));
        assert!(validate_threshold(-1.0).is_err());
    }

    #[test]
    fn reports_merge() {
        let mut a = EmissionReport {
            emitted: 2,
            components_fired: 1,
            charge: -2.0,
        };
        a.merge(&EmissionReport {
            emitted: 3,
            components_fired: 1,
            charge: -3.0,
        });
        assert_eq!(a.emitted, 5);
        assert_eq!(a.components_fired, 2);
        assert_eq!(a.charge, -5.0);
    }
}
