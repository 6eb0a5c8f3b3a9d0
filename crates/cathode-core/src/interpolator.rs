//! Per-voxel field interpolation coefficients.
//!
//! Each voxel stores the electric field and its cross derivatives so
//! that `E` is bilinear in the two transverse offsets of each component,
//! and the magnetic field is linear along its own axis. This is the
//! layout the field solver loads once per step; the core only reads it.

use crate::traits::{FieldSample, Interpolator};

/// Interpolation coefficients for one voxel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[allow(missing_docs)]
pub struct InterpolatorCoeffs {
    pub ex: f32,
    pub dexdy: f32,
    pub dexdz: f32,
    pub d2exdydz: f32,
    pub ey: f32,
    pub deydz: f32,
    pub deydx: f32,
    pub d2eydzdx: f32,
    pub ez: f32,
    pub dezdx: f32,
    pub dezdy: f32,
    pub d2ezdxdy: f32,
    pub cbx: f32,
    pub dcbxdx: f32,
    pub cby: f32,
    pub dcbydy: f32,
    pub cbz: f32,
    pub dcbzdz: f32,
}

impl InterpolatorCoeffs {
    /// Coefficients of a spatially uniform field.
    pub fn uniform(e: [f32; 3], cb: [f32; 3]) -> Self {
        Self {
            ex: e[0],
            ey: e[1],
            ez: e[2],
            cbx: cb[0],
            cby: cb[1],
            cbz: cb[2],
            ..Default::default()
        }
    }

    /// Electric field at a cell-relative offset.
    #[inline]
    pub fn electric(&self, [dx, dy, dz]: [f32; 3]) -> [f32; 3] {
        [
            (self.ex + dy * self.dexdy) + dz * (self.dexdz + dy * self.d2exdydz),
            (self.ey + dz * self.deydz) + dx * (self.deydx + dz * self.d2eydzdx),
            (self.ez + dx * self.dezdx) + dy * (self.dezdy + dx * self.d2ezdxdy),
        ]
    }

    /// Scaled magnetic field at a cell-relative offset.
    #[inline]
    pub fn magnetic(&self, [dx, dy, dz]: [f32; 3]) -> [f32; 3] {
        [
            self.cbx + dx * self.dcbxdx,
            self.cby + dy * self.dcbydy,
            self.cbz + dz * self.dcbzdz,
        ]
    }
}

/// Dense array of coefficients indexed by voxel.
#[derive(Clone, Debug, Default)]
pub struct InterpolatorArray {
    coeffs: Vec<InterpolatorCoeffs>,
}

impl InterpolatorArray {
    /// A zero field over `voxels` voxels.
    pub fn new(voxels: usize) -> Self {
        Self {
            coeffs: vec![InterpolatorCoeffs::default(); voxels],
        }
    }

    /// The same uniform field in every voxel.
    pub fn uniform(voxels: usize, e: [f32; 3], cb: [f32; 3]) -> Self {
        Self {
            coeffs: vec![InterpolatorCoeffs::uniform(e, cb); voxels],
        }
    }

    /// Coefficients of one voxel.
    pub fn get(&self, voxel: u32) -> Option<&InterpolatorCoeffs> {
        self.coeffs.get(voxel as usize)
    }

    /// Mutable coefficients of one voxel.
    pub fn get_mut(&mut self, voxel: u32) -> Option<&mut InterpolatorCoeffs> {
        self.coeffs.get_mut(voxel as usize)
    }
}

impl Interpolator for InterpolatorArray {
    fn len(&self) -> usize {
        self.coeffs.len()
    }

    fn sample(&self, voxel: u32, offset: [f32; 3]) -> Option<FieldSample> {
        let c = self.get(voxel)?;
        Some(FieldSample {
            e: c.electric(offset),
            cb: c.magnetic(offset),
        })
    }
}
