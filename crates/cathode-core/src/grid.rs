//! A reference rectilinear local grid and the single-process collective.
//!
//! Voxels are numbered with one ghost layer on every side:
//!
//! ```text
//! voxel(ix, iy, iz) = ix + (nx + 2) * (iy + (ny + 2) * iz)
//! ```
//!
//! Interior cells have `1 <= ix <= nx` (and likewise for y and z).

use crate::component::{ComponentId, ComponentType, MAX_CELL_INDEX};
use crate::error::GridError;
use crate::traits::{Collective, Grid};

/// A coordinate axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// x.
    X,
    /// y.
    Y,
    /// z.
    Z,
}

impl Axis {
    /// All axes in order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Array index of this axis.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Which end of an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The `-` boundary.
    Low,
    /// The `+` boundary.
    High,
}

/// The trivial process group of one rank.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleProcess;

impl Collective for SingleProcess {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn all_sum(&self, local: f64) -> f64 {
        local
    }
}

/// Uniform rectilinear grid over one process's subdomain.
#[derive(Clone, Debug)]
pub struct LocalGrid<C = SingleProcess> {
    dims: [u32; 3],
    spacing: [f32; 3],
    dt: f32,
    cvac: f32,
    eps0: f32,
    collective: C,
}

impl LocalGrid<SingleProcess> {
    /// Create a single-process grid in normalized units (`cvac = eps0 = 1`).
    ///
    /// # Errors
    ///
    /// - [`GridError::EmptyDimension`] if any dimension is zero.
    /// - [`GridError::TooManyCells`] if the ghost-padded voxel count does
    ///   not fit in a component id.
    /// - [`GridError::InvalidParameter`] for a non-positive spacing or `dt`.
    pub fn new(dims: [u32; 3], spacing: [f32; 3], dt: f32) -> Result<Self, GridError> {
        for (axis, &n) in dims.iter().enumerate() {
            if n == 0 {
                return Err(GridError::EmptyDimension { axis });
            }
        }
        let cells: u64 = dims.iter().map(|&n| u64::from(n) + 2).product();
        if cells > u64::from(MAX_CELL_INDEX) + 1 {
            return Err(GridError::TooManyCells { cells });
        }
        for (name, value) in [("dx", spacing[0]), ("dy", spacing[1]), ("dz", spacing[2])] {
            check_positive(name, value)?;
        }
        check_positive("dt", dt)?;
        Ok(Self {
            dims,
            spacing,
            dt,
            cvac: 1.0,
            eps0: 1.0,
            collective: SingleProcess,
        })
    }
}

impl<C: Collective> LocalGrid<C> {
    /// Override the light speed and permittivity.
    ///
    /// # Errors
    ///
    /// [`GridError::InvalidParameter`] if either is non-positive or not finite.
    pub fn with_constants(mut self, cvac: f32, eps0: f32) -> Result<Self, GridError> {
        check_positive("cvac", cvac)?;
        check_positive("eps0", eps0)?;
        self.cvac = cvac;
        self.eps0 = eps0;
        Ok(self)
    }

    /// Attach this grid to a different process group.
    pub fn with_collective<D: Collective>(self, collective: D) -> LocalGrid<D> {
        LocalGrid {
            dims: self.dims,
            spacing: self.spacing,
            dt: self.dt,
            cvac: self.cvac,
            eps0: self.eps0,
            collective,
        }
    }

    /// Voxel index of `(ix, iy, iz)`, ghosts included, or `None` if
    /// outside the padded grid.
    pub fn voxel(&self, ix: u32, iy: u32, iz: u32) -> Option<u32> {
        let [sx, sy, sz] = self.strides();
        if ix >= sx || iy >= sy || iz >= sz {
            return None;
        }
        Some(ix + sx * (iy + sy * iz))
    }

    /// Inverse of [`voxel`](Self::voxel).
    pub fn voxel_coords(&self, voxel: u32) -> Option<[u32; 3]> {
        if voxel as usize >= self.cell_count() {
            return None;
        }
        let [sx, sy, _] = self.strides();
        Some([voxel % sx, (voxel / sx) % sy, voxel / (sx * sy)])
    }

    /// Whether `voxel` is an interior (non-ghost) cell.
    pub fn is_interior(&self, voxel: u32) -> bool {
        match self.voxel_coords(voxel) {
            Some(c) => c.iter().zip(self.dims).all(|(&i, n)| i >= 1 && i <= n),
            None => false,
        }
    }

    /// Face components covering one boundary of the local domain.
    ///
    /// Returns the outward-facing face of every interior cell adjacent to
    /// the boundary, in ascending voxel order.
    pub fn boundary_faces(&self, axis: Axis, side: Side) -> Vec<ComponentId> {
        let ty = ComponentType::face(axis, side);
        let a = axis.index();
        let layer = match side {
            Side::Low => 1,
            Side::High => self.dims[a],
        };
        let mut lo = [1u32; 3];
        let mut hi = self.dims;
        lo[a] = layer;
        hi[a] = layer;
        let mut faces = Vec::new();
        for iz in lo[2]..=hi[2] {
            for iy in lo[1]..=hi[1] {
                for ix in lo[0]..=hi[0] {
                    let Some(v) = self.voxel(ix, iy, iz) else {
                        continue;
                    };
                    if let Ok(id) = ComponentId::new(v, ty) {
                        faces.push(id);
                    }
                }
            }
        }
        faces
    }

    fn strides(&self) -> [u32; 3] {
        [self.dims[0] + 2, self.dims[1] + 2, self.dims[2] + 2]
    }
}

fn check_positive(name: &'static str, value: f32) -> Result<(), GridError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(GridError::InvalidParameter {
            name,
            value: f64::from(value),
        });
    }
    Ok(())
}

impl<C: Collective> Grid for LocalGrid<C> {
    fn dims(&self) -> [u32; 3] {
        self.dims
    }

    fn cell_count(&self) -> usize {
        self.strides().iter().map(|&s| s as usize).product()
    }

    fn spacing(&self) -> [f32; 3] {
        self.spacing
    }

    fn dt(&self) -> f32 {
        self.dt
    }

    fn cvac(&self) -> f32 {
        self.cvac
    }

    fn eps0(&self) -> f32 {
        self.eps0
    }

    fn collective(&self) -> &dyn Collective {
        &self.collective
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentKind;

    fn grid() -> LocalGrid {
        LocalGrid::new([4, 3, 2], [1.0, 0.5, 0.25], 0.1).unwrap()
    }

    #[test]
    fn padded_cell_count() {
        assert_eq!(grid().cell_count(), 6 * 5 * 4);
    }

    #[test]
    fn voxel_round_trips() {
        let g = grid();
        for v in 0..g.cell_count() as u32 {
            let [x, y, z] = g.voxel_coords(v).unwrap();
            assert_eq!(g.voxel(x, y, z), Some(v));
        }
        assert_eq!(g.voxel_coords(g.cell_count() as u32), None);
        assert_eq!(g.voxel(6, 0, 0), None);
    }

    #[test]
    fn interior_excludes_ghosts() {
        let g = grid();
        assert!(!g.is_interior(0));
        assert!(g.is_interior(g.voxel(1, 1, 1).unwrap()));
        assert!(!g.is_interior(g.voxel(5, 1, 1).unwrap()));
    }

    #[test]
    fn boundary_faces_cover_one_layer() {
        let g = grid();
        let faces = g.boundary_faces(Axis::X, Side::High);
        assert_eq!(faces.len(), 3 * 2);
        for id in &faces {
            assert_eq!(id.component_type().kind(), Some(ComponentKind::Face));
            assert_eq!(id.component_type().offsets(), Some([1, 0, 0]));
            assert_eq!(g.voxel_coords(id.cell()).unwrap()[0], 4);
        }
        let low_z = g.boundary_faces(Axis::Z, Side::Low);
        assert_eq!(low_z.len(), 4 * 3);
        assert!(low_z.windows(2).all(|w| w[0].cell() < w[1].cell()));
    }

    #[test]
    fn rejects_bad_construction() {
        assert_eq!(
            LocalGrid::new([0, 1, 1], [1.0; 3], 1.0).unwrap_err(),
            GridError::EmptyDimension { axis: 0 }
        );
        assert!(LocalGrid::new([1, 1, 1], [1.0, -1.0, 1.0], 1.0).is_err());
        assert!(LocalGrid::new([1, 1, 1], [1.0; 3], f32::NAN).is_err());
        assert!(matches!(
            LocalGrid::new([1 << 10, 1 << 10, 1 << 10], [1.0; 3], 1.0),
            Err(GridError::TooManyCells { .. })
        ));
        assert!(grid().with_constants(0.0, 1.0).is_err());
    }

    #[test]
    fn single_process_sum_is_identity() {
        let g = grid();
        assert_eq!(g.collective().size(), 1);
        assert_eq!(g.collective().all_sum(2.5), 2.5);
    }
}
