//! Fixed-order reduction of pipeline partials.

use cathode_core::Collective;
use tracing::trace;

/// Partial sums of one dispatch, one slot per rank, host last.
#[derive(Clone, Debug, PartialEq)]
pub struct Reduction {
    slots: Vec<f64>,
}

impl Reduction {
    /// Wrap the per-rank partials returned by
    /// [`Pipelines::dispatch`](crate::Pipelines::dispatch).
    pub fn from_slots(slots: Vec<f64>) -> Self {
        Self { slots }
    }

    /// The per-rank partials.
    pub fn slots(&self) -> &[f64] {
        &self.slots
    }

    /// Sum over this process: pipelines `0..P` in order, then the host.
    pub fn local(&self) -> f64 {
        self.slots.iter().fold(0.0, |acc, &x| acc + x)
    }

    /// Sum over the process group.
    ///
    /// Blocks until every rank of `collective` has contributed.
    pub fn all_reduce(&self, collective: &dyn Collective) -> f64 {
        let local = self.local();
        let global = collective.all_sum(local);
        trace!(rank = collective.rank(), local, global, "all-reduce complete");
        global
    }
}

/// Scale a global reduction of `q * v² / (1 + γ)` terms to energy:
/// `c² · global / q_m`.
pub fn finalize_energy(global: f64, cvac: f32, q_m: f32) -> f64 {
    let c = f64::from(cvac);
    c * c * global / f64::from(q_m)
}
