//! Core types and traits for the Cathode boundary-emission core.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the addressing scheme for cell sub-entities, the particle record,
//! the error taxonomy, and the traits through which the emission and
//! diagnostic layers talk to the rest of a particle-in-cell code
//! (grid, field interpolation, current accumulation, species storage,
//! and the cross-rank collective).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod component;
pub mod error;
pub mod grid;
pub mod id;
pub mod interpolator;
pub mod particle;
pub mod traits;

pub use component::{
    classify, decode, encode, ComponentId, ComponentKind, ComponentType, CELL_BITS,
    MAX_CELL_INDEX, TYPE_BITS, TYPE_MASK, VALID_TYPE_COUNT,
};
pub use error::{ComponentError, DiagnosticError, EmissionError, GridError, RegistryError};
pub use grid::{Axis, LocalGrid, Side, SingleProcess};
pub use id::SpeciesId;
pub use interpolator::{InterpolatorArray, InterpolatorCoeffs};
pub use particle::Particle;
pub use traits::{
    Accumulator, ChargeField, Collective, FieldSample, Grid, Interpolator, Species, SpeciesSet,
};
