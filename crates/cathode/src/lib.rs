//! Cathode: boundary particle emission and deterministic pipeline
//! diagnostics for particle-in-cell codes.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Cathode sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use cathode::prelude::*;
//!
//! struct Electrons(Vec<Particle>);
//!
//! impl Species for Electrons {
//!     fn name(&self) -> &str { "electron" }
//!     fn q(&self) -> f32 { -1.0 }
//!     fn len(&self) -> usize { self.0.len() }
//!     fn capacity(&self) -> usize { 1 << 16 }
//!     fn append(&mut self, p: Particle) -> Result<(), EmissionError> {
//!         self.0.push(p);
//!         Ok(())
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Sink(f64);
//! impl Accumulator for Sink {
//!     fn scatter(&mut self, _voxel: u32, charge: f32, _velocity: [f32; 3]) {
//!         self.0 += f64::from(charge);
//!     }
//! }
//! impl ChargeField for Sink {
//!     fn deposit_rhob(&mut self, _voxel: u32, charge: f32) {
//!         self.0 += f64::from(charge);
//!     }
//! }
//!
//! // A 4x4x4 grid with a uniform field along +x.
//! let grid = LocalGrid::new([4, 4, 4], [1.0; 3], 0.1).unwrap();
//! let interp = InterpolatorArray::uniform(grid.cell_count(), [1.0, 0.0, 0.0], [0.0; 3]);
//!
//! // Space-charge-limited emission from the +x wall.
//! let mut emitters = EmitterRegistry::new();
//! emitters
//!     .register(
//!         "cathode",
//!         SpeciesId(0),
//!         ChildLangmuir::builder().n_emit_per_face(2).build().unwrap(),
//!         64,
//!     )
//!     .unwrap()
//!     .extend_components(grid.boundary_faces(Axis::X, Side::High))
//!     .unwrap();
//!
//! let mut species = vec![Electrons(Vec::new())];
//! let (mut rhob, mut current) = (Sink::default(), Sink::default());
//! let mut streams = RngStreams::new(42, 1);
//! let report = emitters
//!     .emit_all(
//!         &mut species,
//!         &interp,
//!         &mut rhob,
//!         &mut current,
//!         &grid,
//!         streams.stream_mut(0).unwrap(),
//!     )
//!     .unwrap();
//! assert_eq!(report.emitted, 32);
//! assert_eq!(current.0 + rhob.0, 0.0);
//!
//! // Kinetic energy of what was emitted.
//! let pipelines = Pipelines::new(&PipelineConfig::default()).unwrap();
//! let energy = KineticEnergy::builder()
//!     .particles(&species[0].0)
//!     .q_m(-1.0)
//!     .interpolator(&interp)
//!     .grid(&grid)
//!     .build()
//!     .unwrap()
//!     .compute(&pipelines)
//!     .unwrap();
//! assert!(energy.is_finite());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `cathode-core` | Component ids, particles, grid, collaborator traits, errors |
//! | [`emit`] | `cathode-emit` | Emitters, registry, emission models, RNG streams |
//! | [`pipeline`] | `cathode-pipeline` | Pipeline config, dispatch, reduction, kinetic energy |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Component addressing, particles, grid and collaborator traits
/// (`cathode-core`).
pub use cathode_core as types;

/// Emitters, the emitter registry and emission models (`cathode-emit`).
///
/// [`emit::EmitterRegistry`] is the entry point; models are
/// [`emit::ChildLangmuir`], [`emit::ColdCube`] and [`emit::Ivory`].
pub use cathode_emit as emit;

/// Pipeline dispatch, reduction and diagnostics (`cathode-pipeline`).
pub use cathode_pipeline as pipeline;

/// Common imports for typical Cathode usage.
///
/// ```rust
/// use cathode::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use cathode_core::{
        Accumulator, Axis, ChargeField, Collective, ComponentId, ComponentKind, ComponentType,
        FieldSample, Grid, Interpolator, InterpolatorArray, LocalGrid, Particle, Side, Species,
        SpeciesId, SpeciesSet,
    };

    // Errors
    pub use cathode_core::{ComponentError, DiagnosticError, EmissionError, RegistryError};

    // Emission
    pub use cathode_emit::{
        ChildLangmuir, ColdCube, Emit, EmissionModel, EmissionReport, Emitter, EmitterRegistry,
        Ivory, RngStreams,
    };

    // Pipelines
    pub use cathode_pipeline::{KineticEnergy, PipelineConfig, Pipelines};
}
