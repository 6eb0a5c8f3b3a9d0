//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a species within the caller's species table.
///
/// Emitters hold a `SpeciesId` rather than the species itself; the
/// species is resolved through a [`SpeciesSet`](crate::SpeciesSet) at
/// emission time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpeciesId(pub u32);

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SpeciesId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
