//! Benchmark profiles for the Cathode emission and diagnostic core.
//!
//! - [`reference_grid`]: 32x32x32 interior cells, `cvac = eps0 = 1`
//! - [`reference_population`]: seeded particles spread over a grid
//! - [`reference_registry`]: one emitter of each model on three walls

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use cathode_core::{Axis, Grid, LocalGrid, Particle, Side, SpeciesId};
use cathode_emit::{ChildLangmuir, ColdCube, EmitterRegistry, Ivory};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Interior cells per axis of [`reference_grid`].
pub const REFERENCE_CELLS: u32 = 32;

/// Build the reference grid: 32³ interior cells of unit size, `dt = 0.05`.
pub fn reference_grid() -> LocalGrid {
    let n = REFERENCE_CELLS;
    LocalGrid::new([n, n, n], [1.0; 3], 0.05).unwrap()
}

/// `n` particles with momenta up to `0.5` in interior cells of `grid`.
///
/// The same `seed` always yields the same population.
pub fn reference_population(grid: &LocalGrid, n: usize, seed: u64) -> Vec<Particle> {
    let [nx, ny, nz] = grid.dims();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut particles = Vec::with_capacity(n);
    for _ in 0..n {
        let ix = rng.random_range(1..=nx);
        let iy = rng.random_range(1..=ny);
        let iz = rng.random_range(1..=nz);
        let Some(i) = grid.voxel(ix, iy, iz) else {
            continue;
        };
        let mut signed = || 2.0 * rng.random::<f32>() - 1.0;
        particles.push(Particle {
            dx: signed(),
            dy: signed(),
            dz: signed(),
            i,
            ux: 0.5 * signed(),
            uy: 0.5 * signed(),
            uz: 0.5 * signed(),
            q: 1.0,
        });
    }
    particles
}

/// Three emitters covering the `-x`, `+x` and `-z` walls of `grid`.
///
/// `electrons` receives the Child-Langmuir and Ivory emitters, `ions`
/// the ColdCube emitter.
pub fn reference_registry(
    grid: &LocalGrid,
    electrons: SpeciesId,
    ions: SpeciesId,
) -> EmitterRegistry {
    let [nx, ny, nz] = grid.dims();
    let capacity = (nx * ny).max(ny * nz).max(nx * nz) as usize;
    let mut reg = EmitterRegistry::new();
    reg.register(
        "cathode",
        electrons,
        ChildLangmuir::builder()
            .n_emit_per_face(2)
            .ut_perp(0.01)
            .ut_para(0.01)
            .build()
            .unwrap(),
        capacity,
    )
    .unwrap()
    .extend_components(grid.boundary_faces(Axis::X, Side::High))
    .unwrap();
    reg.register(
        "anode",
        ions,
        ColdCube::builder()
            .n_emit_per_face(1)
            .thresh_e_norm(0.1)
            .build()
            .unwrap(),
        capacity,
    )
    .unwrap()
    .extend_components(grid.boundary_faces(Axis::X, Side::Low))
    .unwrap();
    reg.register(
        "wall",
        electrons,
        Ivory::builder()
            .n_emit_per_face(4)
            .thresh_e_norm(0.1)
            .ut_para(0.05)
            .build()
            .unwrap(),
        capacity,
    )
    .unwrap()
    .extend_components(grid.boundary_faces(Axis::Z, Side::Low))
    .unwrap();
    reg
}
