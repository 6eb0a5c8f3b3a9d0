//! Reusable particle fixtures.
//!
//! - [`random_particles`]: seeded particles spread over a voxel range.
//! - [`at_rest`]: particles with zero momentum.

use cathode_core::Particle;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// `n` particles with momenta in `[-u_max, u_max)`, offsets in
/// `[-1, 1)`, voxels in `voxels`, and unit positive charge.
///
/// The same `seed` always yields the same particles.
pub fn random_particles(
    n: usize,
    seed: u64,
    voxels: std::ops::Range<u32>,
    u_max: f32,
) -> Vec<Particle> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let mut signed = || 2.0 * rng.random::<f32>() - 1.0;
            let (dx, dy, dz) = (signed(), signed(), signed());
            let (ux, uy, uz) = (u_max * signed(), u_max * signed(), u_max * signed());
            Particle {
                dx,
                dy,
                dz,
                i: rng.random_range(voxels.clone()),
                ux,
                uy,
                uz,
                q: 1.0,
            }
        })
        .collect()
}

/// `n` particles at rest in `voxel` with charge `q`.
pub fn at_rest(n: usize, voxel: u32, q: f32) -> Vec<Particle> {
    vec![
        Particle {
            i: voxel,
            q,
            ..Default::default()
        };
        n
    ]
}
