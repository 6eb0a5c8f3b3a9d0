//! Error types for the Cathode core, organized by subsystem:
//! component addressing, grid construction, emitter registration,
//! emission, and bulk diagnostics.
//!
//! All of these are validation or registration failures. None of them
//! is retried anywhere in the workspace; a caller that receives one has
//! a configuration or programming error to fix.

use std::error::Error;
use std::fmt;

use crate::component::ComponentId;
use crate::id::SpeciesId;

/// Errors from packing or interpreting component ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComponentError {
    /// The type code does not fit in the 5-bit type field.
    TypeCodeOutOfRange {
        /// The rejected code.
        code: u32,
    },
    /// The cell index does not fit in the remaining 27 bits.
    CellIndexOverflow {
        /// The rejected cell index.
        cell_index: u32,
    },
    /// A component offset outside `-1..=1`.
    OffsetOutOfRange {
        /// The rejected offset.
        offset: i8,
    },
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeCodeOutOfRange { code } => {
                write!(f, "invalid argument: type code {code} outside 0..=31")
            }
            Self::CellIndexOverflow { cell_index } => {
                write!(f, "invalid argument: cell index {cell_index} overflows 27 bits")
            }
            Self::OffsetOutOfRange { offset } => {
                write!(f, "invalid argument: component offset {offset} outside -1..=1")
            }
        }
    }
}

impl Error for ComponentError {}

/// Errors from constructing a [`LocalGrid`](crate::LocalGrid).
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// An interior dimension is zero.
    EmptyDimension {
        /// Index of the axis (0 = x).
        axis: usize,
    },
    /// The ghost-padded cell count does not fit a component id.
    TooManyCells {
        /// Padded cell count.
        cells: u64,
    },
    /// A physical parameter is NaN, infinite, zero or negative.
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDimension { axis } => write!(f, "grid axis {axis} has zero cells"),
            Self::TooManyCells { cells } => {
                write!(f, "grid has {cells} cells, more than a component id can address")
            }
            Self::InvalidParameter { name, value } => {
                write!(f, "grid parameter {name} must be finite and positive, got {value}")
            }
        }
    }
}

impl Error for GridError {}

/// Errors from the emitter registry.
///
/// Raised at configuration time. The registry never overwrites or
/// truncates silently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// An emitter with this name is already registered.
    DuplicateName {
        /// The conflicting name.
        name: String,
    },
    /// `max_component` was zero.
    InvalidCapacity {
        /// Emitter being registered.
        name: String,
    },
    /// The emitter's component list is full.
    CapacityExceeded {
        /// Emitter name.
        name: String,
        /// Its fixed capacity.
        max_component: usize,
    },
    /// No emitter with this name.
    NotFound {
        /// The requested name.
        name: String,
    },
    /// A component id appears more than once in one emitter.
    DuplicateComponent {
        /// Emitter name.
        name: String,
        /// The repeated id.
        component: ComponentId,
    },
    /// A component names a reserved type code or a cell outside the grid.
    InvalidComponent {
        /// Emitter name.
        name: String,
        /// The offending id.
        component: ComponentId,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name } => write!(f, "emitter '{name}' already registered"),
            Self::InvalidCapacity { name } => {
                write!(f, "emitter '{name}': max_component must be positive")
            }
            Self::CapacityExceeded {
                name,
                max_component,
            } => write!(
                f,
                "emitter '{name}': component list full ({max_component} components)"
            ),
            Self::NotFound { name } => write!(f, "no emitter named '{name}'"),
            Self::DuplicateComponent { name, component } => {
                write!(f, "emitter '{name}': component {component} listed twice")
            }
            Self::InvalidComponent { name, component } => {
                write!(f, "emitter '{name}': component {component} is not addressable")
            }
        }
    }
}

impl Error for RegistryError {}

/// Errors from running an emission model.
#[derive(Clone, Debug, PartialEq)]
pub enum EmissionError {
    /// A model parameter failed validation at construction.
    InvalidParameter {
        /// Description of the failure.
        reason: String,
    },
    /// The emitter's species is not present in the species set.
    UnknownSpecies {
        /// Emitter name.
        emitter: String,
        /// The missing species.
        species: SpeciesId,
    },
    /// The species particle pool ran out of room mid-emission.
    SpeciesFull {
        /// Species name.
        species: String,
        /// Pool capacity.
        capacity: usize,
    },
    /// A component references a cell the interpolator cannot sample.
    ComponentOutOfRange {
        /// The offending component.
        component: ComponentId,
    },
}

impl fmt::Display for EmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { reason } => write!(f, "invalid model parameter: {reason}"),
            Self::UnknownSpecies { emitter, species } => {
                write!(f, "emitter '{emitter}' references unknown species {species}")
            }
            Self::SpeciesFull { species, capacity } => {
                write!(f, "species '{species}' is full ({capacity} particles)")
            }
            Self::ComponentOutOfRange { component } => {
                write!(f, "component {component} lies outside the interpolator")
            }
        }
    }
}

impl Error for EmissionError {}

/// Errors from bulk per-particle diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub enum DiagnosticError {
    /// Argument validation failed before dispatch.
    InvalidArgument {
        /// Human-readable description of what's wrong.
        reason: String,
    },
    /// Particles reference voxels the interpolator does not cover.
    VoxelOutOfRange {
        /// Number of offending particles.
        count: usize,
    },
    /// A pipeline worker panicked before reporting its partial result.
    WorkerPanicked {
        /// Rank of the failed pipeline.
        rank: usize,
    },
}

impl fmt::Display for DiagnosticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::VoxelOutOfRange { count } => {
                write!(f, "{count} particles reference voxels outside the interpolator")
            }
            Self::WorkerPanicked { rank } => write!(f, "pipeline {rank} panicked"),
        }
    }
}

impl Error for DiagnosticError {}
