//! Test utilities and mock collaborators for Cathode development.
//!
//! Provides mock implementations of the core collaborator traits
//! ([`Species`], [`Accumulator`], [`ChargeField`], [`Interpolator`]),
//! a threaded mock process group ([`ThreadGroup`]) and particle
//! fixtures.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod ranks;

pub use ranks::{MockRank, ThreadGroup};

use std::collections::HashMap;

use cathode_core::{
    Accumulator, ChargeField, EmissionError, FieldSample, Interpolator, Particle, Species,
};

/// Mock implementation of [`Species`].
///
/// Backed by a plain `Vec<Particle>` with a hard capacity. Inspect
/// appended particles with [`particles`](MockSpecies::particles).
#[derive(Clone, Debug)]
pub struct MockSpecies {
    name: String,
    q: f32,
    capacity: usize,
    particles: Vec<Particle>,
}

impl MockSpecies {
    pub fn new(name: impl Into<String>, q: f32, capacity: usize) -> Self {
        Self {
            name: name.into(),
            q,
            capacity,
            particles: Vec::new(),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Sum of particle charges in append order.
    pub fn total_charge(&self) -> f64 {
        self.particles.iter().map(|p| f64::from(p.q)).sum()
    }
}

impl Species for MockSpecies {
    fn name(&self) -> &str {
        &self.name
    }

    fn q(&self) -> f32 {
        self.q
    }

    fn len(&self) -> usize {
        self.particles.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn append(&mut self, particle: Particle) -> Result<(), EmissionError> {
        if self.particles.len() >= self.capacity {
            return Err(EmissionError::SpeciesFull {
                species: self.name.clone(),
                capacity: self.capacity,
            });
        }
        self.particles.push(particle);
        Ok(())
    }
}

/// Mock implementation of [`Accumulator`].
///
/// Records per-voxel current (`charge * velocity`) and the running
/// total of scattered charge.
#[derive(Clone, Debug, Default)]
pub struct MockAccumulator {
    current: HashMap<u32, [f32; 3]>,
    total_charge: f64,
    scatters: usize,
}

impl MockAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated current in `voxel`; zero if never touched.
    pub fn current(&self, voxel: u32) -> [f32; 3] {
        self.current.get(&voxel).copied().unwrap_or_default()
    }

    /// Sum of every scattered charge, in scatter order.
    pub fn total_charge(&self) -> f64 {
        self.total_charge
    }

    /// Number of `scatter` calls.
    pub fn scatters(&self) -> usize {
        self.scatters
    }
}

impl Accumulator for MockAccumulator {
    fn scatter(&mut self, voxel: u32, charge: f32, velocity: [f32; 3]) {
        let j = self.current.entry(voxel).or_default();
        for (slot, v) in j.iter_mut().zip(velocity) {
            *slot += charge * v;
        }
        self.total_charge += f64::from(charge);
        self.scatters += 1;
    }
}

/// Mock implementation of [`ChargeField`].
#[derive(Clone, Debug, Default)]
pub struct MockChargeField {
    rhob: HashMap<u32, f32>,
    total: f64,
}

impl MockChargeField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound charge in `voxel`.
    pub fn rhob(&self, voxel: u32) -> f32 {
        self.rhob.get(&voxel).copied().unwrap_or(0.0)
    }

    /// Sum of every deposit, in deposit order.
    pub fn total_rhob(&self) -> f64 {
        self.total
    }
}

impl ChargeField for MockChargeField {
    fn deposit_rhob(&mut self, voxel: u32, charge: f32) {
        *self.rhob.entry(voxel).or_insert(0.0) += charge;
        self.total += f64::from(charge);
    }
}

/// A spatially constant field over `len` voxels.
#[derive(Clone, Copy, Debug)]
pub struct UniformField {
    pub len: usize,
    pub sample: FieldSample,
}

impl UniformField {
    pub fn new(len: usize, e: [f32; 3]) -> Self {
        Self {
            len,
            sample: FieldSample { e, cb: [0.0; 3] },
        }
    }
}

impl Interpolator for UniformField {
    fn len(&self) -> usize {
        self.len
    }

    fn sample(&self, voxel: u32, _offset: [f32; 3]) -> Option<FieldSample> {
        ((voxel as usize) < self.len).then_some(self.sample)
    }
}
