//! Pipeline dispatch and reduction for Cathode particle diagnostics.
//!
//! A diagnostic over `n` particles is split into contiguous blocks of
//! quads (groups of [`PipelineConfig::quad_width`] particles), one block
//! per pipeline worker, with the host thread computing the ragged tail.
//! Workers run on scoped threads and report through a channel into one
//! slot per rank; the host folds the slots in a fixed order and then
//! sums across the process group.
//!
//! The fixed partition and fold order make every diagnostic a
//! deterministic function of its inputs and the worker count.
//!
//! The one diagnostic shipped here is [`KineticEnergy`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod dispatch;
pub mod energy;
pub mod reduce;

pub use config::{ConfigError, PipelineConfig};
pub use dispatch::{partition, PipelineKernel, Pipelines};
pub use energy::KineticEnergy;
pub use reduce::{finalize_energy, Reduction};
