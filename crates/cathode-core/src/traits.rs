//! Collaborator traits.
//!
//! The emission and diagnostic layers never see the field solver, the
//! particle array layout or the message-passing transport directly.
//! They talk to them through these traits, which keeps both layers
//! testable against the mocks in `cathode-test-utils`.

use crate::error::EmissionError;
use crate::id::SpeciesId;
use crate::particle::Particle;

/// Electric field and scaled magnetic field at one point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldSample {
    /// Electric field.
    pub e: [f32; 3],
    /// Magnetic field scaled by `c`.
    pub cb: [f32; 3],
}

impl FieldSample {
    /// Magnitude of the electric field.
    pub fn e_norm(&self) -> f32 {
        (self.e[0] * self.e[0] + self.e[1] * self.e[1] + self.e[2] * self.e[2]).sqrt()
    }

    /// Component of the electric field along `direction`.
    pub fn e_along(&self, direction: [f32; 3]) -> f32 {
        self.e[0] * direction[0] + self.e[1] * direction[1] + self.e[2] * direction[2]
    }
}

/// A blocking, symmetric collective over the process group.
///
/// # Contract
///
/// Every rank in the group must call [`all_sum`](Self::all_sum) the same
/// number of times in the same order. A rank that skips a call leaves the
/// others blocked forever; this is a caller protocol violation and is not
/// detected locally.
pub trait Collective: Sync {
    /// This process's rank in `0..size()`.
    fn rank(&self) -> usize;

    /// Number of processes in the group.
    fn size(&self) -> usize;

    /// Sum `local` over every rank; every rank receives the same total.
    fn all_sum(&self, local: f64) -> f64;
}

/// Local grid topology and the constants the core needs from it.
pub trait Grid: Sync {
    /// Interior cell counts `[nx, ny, nz]`.
    fn dims(&self) -> [u32; 3];

    /// Number of addressable voxels, ghost layer included.
    fn cell_count(&self) -> usize;

    /// Cell size `[dx, dy, dz]`.
    fn spacing(&self) -> [f32; 3];

    /// Timestep.
    fn dt(&self) -> f32;

    /// Characteristic (light) speed.
    fn cvac(&self) -> f32;

    /// Vacuum permittivity.
    fn eps0(&self) -> f32;

    /// The process group this grid is partitioned over.
    fn collective(&self) -> &dyn Collective;
}

/// Read-only field interpolation.
pub trait Interpolator: Sync {
    /// Number of voxels that can be sampled.
    fn len(&self) -> usize;

    /// Whether no voxel can be sampled.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Field at `offset` (each coordinate in `[-1, 1]`) within `voxel`.
    ///
    /// Returns `None` if `voxel` is out of range.
    fn sample(&self, voxel: u32, offset: [f32; 3]) -> Option<FieldSample>;
}

/// Scatter-add buffer for injected current.
pub trait Accumulator {
    /// Add the current of a particle of `charge` moving at `velocity`
    /// (in units of `c`) injected in `voxel`.
    fn scatter(&mut self, voxel: u32, charge: f32, velocity: [f32; 3]);
}

/// The field's bound-charge buffer.
pub trait ChargeField {
    /// Add `charge` to the bound charge of `voxel`.
    fn deposit_rhob(&mut self, voxel: u32, charge: f32);
}

/// A particle species, seen from the emitter side: append only.
pub trait Species {
    /// Species name.
    fn name(&self) -> &str;

    /// Charge of a unit-weight macro-particle.
    fn q(&self) -> f32;

    /// Number of particles currently stored.
    fn len(&self) -> usize;

    /// Whether the species holds no particles.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of particles.
    fn capacity(&self) -> usize;

    /// Append one particle.
    ///
    /// # Errors
    ///
    /// [`EmissionError::SpeciesFull`] when `len() == capacity()`; the
    /// species is left unchanged.
    fn append(&mut self, particle: Particle) -> Result<(), EmissionError>;
}

/// Resolves a [`SpeciesId`] to a mutable species.
pub trait SpeciesSet {
    /// The species with this id, if present.
    fn species_mut(&mut self, id: SpeciesId) -> Option<&mut dyn Species>;
}

impl<S: Species> SpeciesSet for [S] {
    fn species_mut(&mut self, id: SpeciesId) -> Option<&mut dyn Species> {
        self.get_mut(id.0 as usize).map(|s| s as &mut dyn Species)
    }
}

impl<S: Species> SpeciesSet for Vec<S> {
    fn species_mut(&mut self, id: SpeciesId) -> Option<&mut dyn Species> {
        self.as_mut_slice().species_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn e_norm_and_projection() {
        let s = FieldSample {
            e: [3.0, 4.0, 0.0],
            cb: [0.0; 3],
        };
        assert_eq!(s.e_norm(), 5.0);
        assert_eq!(s.e_along([-1.0, 0.0, 0.0]), -3.0);
    }
}
