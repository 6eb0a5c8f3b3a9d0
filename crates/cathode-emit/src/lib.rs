//! Emitter registry and boundary emission models for Cathode.
//!
//! An [`Emitter`] binds a named list of cell components to a species
//! and an [`EmissionModel`]. Each step, [`EmitterRegistry::emit_all`]
//! walks the emitters in registration order and lets each model decide
//! where, when and how many particles enter the simulation, depositing
//! their current into the accumulator and the matching image charge
//! into the field.
//!
//! Emission is single-threaded per step: emitters may share accumulator
//! cells, so all injection for a step runs on one execution context with
//! one RNG stream from [`RngStreams`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod ccube;
pub mod child_langmuir;
pub mod context;
pub mod emitter;
pub mod ivory;
pub mod model;
pub mod registry;
pub mod rng;
pub mod sampling;

pub use ccube::ColdCube;
pub use child_langmuir::ChildLangmuir;
pub use context::EmissionContext;
pub use emitter::Emitter;
pub use ivory::Ivory;
pub use model::{Emit, EmissionModel, EmissionReport};
pub use registry::EmitterRegistry;
pub use rng::{EmissionRng, RngStreams};
