//! Position and momentum sampling on cell components.
//!
//! Positions: along every axis where the component has a nonzero offset
//! the coordinate is pinned to that offset (`±1`, on the cell boundary);
//! along the free axes it is drawn from `[-1, 1)`.
//!
//! Momenta: a flux-weighted half-Maxwellian. The component along the
//! inward normal is `ut_para * sqrt(-2 ln U)`, the two transverse
//! components are Gaussian with width `ut_perp`. The body has no normal
//! and gets an isotropic Gaussian of width `ut_perp`.

use cathode_core::ComponentType;
use rand::Rng;

use crate::rng::EmissionRng;

/// How free coordinates of a component are placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Every free coordinate uniform on `[-1, 1)`.
    Uniform,
    /// The first free coordinate jittered within stratum `index` of
    /// `count` equal strata; the rest uniform.
    Stratified {
        /// Stratum of this particle.
        index: u32,
        /// Number of strata.
        count: u32,
    },
}

/// Orthonormal frame of an emitting component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmissionFrame {
    /// Unit normal pointing into the cell.
    pub normal: [f32; 3],
    /// First transverse unit vector.
    pub t1: [f32; 3],
    /// Second transverse unit vector.
    pub t2: [f32; 3],
}

impl EmissionFrame {
    /// Frame of a component; `None` for the body and reserved codes.
    pub fn for_component(ty: ComponentType) -> Option<Self> {
        let normal = ty.inward_normal()?;
        // Helper axis: the one least aligned with the normal.
        let mut helper = [0.0f32; 3];
        let mut best = 0;
        for a in 1..3 {
            if normal[a].abs() < normal[best].abs() {
                best = a;
            }
        }
        helper[best] = 1.0;
        let t1 = normalize(cross(normal, helper));
        let t2 = cross(normal, t1);
        Some(Self { normal, t1, t2 })
    }

    /// Draw one momentum from the flux-weighted half-Maxwellian.
    pub fn sample_momentum(&self, ut_perp: f32, ut_para: f32, rng: &mut EmissionRng) -> [f32; 3] {
        let un = ut_para * flux_normal(rng);
        let u1 = ut_perp * gaussian(rng);
        let u2 = ut_perp * gaussian(rng);
        let mut u = [0.0f32; 3];
        for (k, slot) in u.iter_mut().enumerate() {
            *slot = un * self.normal[k] + u1 * self.t1[k] + u2 * self.t2[k];
        }
        u
    }
}

/// Momentum for a particle leaving `ty`.
pub fn sample_momentum(
    ty: ComponentType,
    ut_perp: f32,
    ut_para: f32,
    rng: &mut EmissionRng,
) -> [f32; 3] {
    match EmissionFrame::for_component(ty) {
        Some(frame) => frame.sample_momentum(ut_perp, ut_para, rng),
        None => [
            ut_perp * gaussian(rng),
            ut_perp * gaussian(rng),
            ut_perp * gaussian(rng),
        ],
    }
}

/// Cell-relative position on `ty`.
///
/// Returns `None` for reserved codes.
pub fn sample_offset(
    ty: ComponentType,
    placement: Placement,
    rng: &mut EmissionRng,
) -> Option<[f32; 3]> {
    let offsets = ty.offsets()?;
    let mut pos = [0.0f32; 3];
    let mut first_free = true;
    for (slot, &off) in pos.iter_mut().zip(offsets.iter()) {
        if off != 0 {
            *slot = f32::from(off);
            continue;
        }
        *slot = match placement {
            Placement::Stratified { index, count } if first_free && count > 0 => {
                let jitter: f32 = rng.random();
                (-1.0 + 2.0 * (index as f32 + jitter) / count as f32).min(1.0)
            }
            _ => uniform_signed(rng),
        };
        first_free = false;
    }
    Some(pos)
}

/// Standard normal deviate via Box-Muller.
pub fn gaussian(rng: &mut EmissionRng) -> f32 {
    let u1: f64 = rng.random::<f64>().max(1e-300); // avoid ln(0)
    let u2: f64 = rng.random();
    ((-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()) as f32
}

/// Speed along the normal for unit thermal width, flux weighted.
pub fn flux_normal(rng: &mut EmissionRng) -> f32 {
    let u: f64 = 1.0 - rng.random::<f64>();
    (-2.0 * u.ln()).sqrt() as f32
}

fn uniform_signed(rng: &mut EmissionRng) -> f32 {
    2.0 * rng.random::<f32>() - 1.0
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let inv = 1.0 / (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    [v[0] * inv, v[1] * inv, v[2] * inv]
}
