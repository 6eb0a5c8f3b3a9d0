//! Addressing of cell sub-entities ("components").
//!
//! Every local cell has 27 components: 6 faces, 12 edges, 8 corners and
//! the body. A component is named by the offsets `(dx, dy, dz)` of its
//! centre from the cell centre, each in `{-1, 0, 1}`, enumerated in
//! column-major order:
//!
//! ```text
//! type_code = (dx + 1) + 3 * (dy + 1) + 9 * (dz + 1)
//! ```
//!
//! so `13` is the body and e.g. `14` is the `+x` face. Components of the
//! whole local domain are packed as `cell_index * 32 + type_code`. Codes
//! 27..=31 are reserved and never name a component. The packing is shift
//! and mask only, and is kept bit-exact so ids can be persisted.

use std::fmt;

use smallvec::SmallVec;

use crate::error::ComponentError;
use crate::grid::{Axis, Side};

/// Bits reserved for the component type.
pub const TYPE_BITS: u32 = 5;

/// Mask extracting the component type from a packed id.
pub const TYPE_MASK: u32 = (1 << TYPE_BITS) - 1;

/// Bits left for the cell index.
pub const CELL_BITS: u32 = u32::BITS - TYPE_BITS;

/// Largest cell index that can be packed.
pub const MAX_CELL_INDEX: u32 = (1 << CELL_BITS) - 1;

/// Number of type codes that name a component (`0..27`).
pub const VALID_TYPE_COUNT: u8 = 27;

/// Geometric class of a component, by its number of nonzero offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    /// No nonzero offset: the cell interior.
    Body,
    /// One nonzero offset.
    Face,
    /// Two nonzero offsets.
    Edge,
    /// Three nonzero offsets.
    Corner,
}

/// A component type code in `0..=31`.
///
/// Only `0..27` name a component; `27..=31` are reserved and are
/// representable so that any packed id decodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentType(u8);

impl ComponentType {
    /// The cell body, offsets `(0, 0, 0)`.
    pub const BODY: Self = Self(13);

    /// Wrap a raw code.
    ///
    /// # Errors
    ///
    /// [`ComponentError::TypeCodeOutOfRange`] if `code > 31`.
    pub fn new(code: u32) -> Result<Self, ComponentError> {
        if code > TYPE_MASK {
            return Err(ComponentError::TypeCodeOutOfRange { code });
        }
        Ok(Self(code as u8))
    }

    /// Build the type code from offsets.
    ///
    /// # Errors
    ///
    /// [`ComponentError::OffsetOutOfRange`] if any offset is outside `-1..=1`.
    pub fn from_offsets(dx: i8, dy: i8, dz: i8) -> Result<Self, ComponentError> {
        for offset in [dx, dy, dz] {
            if !(-1..=1).contains(&offset) {
                return Err(ComponentError::OffsetOutOfRange { offset });
            }
        }
        let code = (dx + 1) + 3 * (dy + 1) + 9 * (dz + 1);
        Ok(Self(code as u8))
    }

    /// The face of the cell on `side` of `axis`.
    pub fn face(axis: Axis, side: Side) -> Self {
        let stride = [1u8, 3, 9][axis.index()];
        match side {
            Side::Low => Self(Self::BODY.0 - stride),
            Side::High => Self(Self::BODY.0 + stride),
        }
    }

    /// Raw code.
    pub fn code(self) -> u8 {
        self.0
    }

    /// Whether this code is in the reserved range `27..=31`.
    pub fn is_reserved(self) -> bool {
        self.0 >= VALID_TYPE_COUNT
    }

    /// Offsets `(dx, dy, dz)` of the component centre, or `None` for a
    /// reserved code.
    pub fn offsets(self) -> Option<[i8; 3]> {
        if self.is_reserved() {
            return None;
        }
        let c = self.0 as i8;
        Some([c % 3 - 1, (c / 3) % 3 - 1, c / 9 - 1])
    }

    /// Geometric class, or `None` for a reserved code.
    pub fn kind(self) -> Option<ComponentKind> {
        let nonzero = self.offsets()?.iter().filter(|&&o| o != 0).count();
        Some(match nonzero {
            0 => ComponentKind::Body,
            1 => ComponentKind::Face,
            2 => ComponentKind::Edge,
            _ => ComponentKind::Corner,
        })
    }

    /// Axes along which the component extends (offset zero).
    ///
    /// Two for a face, one for an edge, none for a corner, three for the
    /// body. Empty for reserved codes.
    pub fn free_axes(self) -> SmallVec<[Axis; 3]> {
        match self.offsets() {
            Some(o) => Axis::ALL
                .into_iter()
                .zip(o)
                .filter(|&(_, off)| off == 0)
                .map(|(axis, _)| axis)
                .collect(),
            None => SmallVec::new(),
        }
    }

    /// Unit normal pointing from the component back into the cell.
    ///
    /// `None` for the body (no preferred direction) and reserved codes.
    pub fn inward_normal(self) -> Option<[f32; 3]> {
        let o = self.offsets()?;
        let norm_sq: i32 = o.iter().map(|&v| i32::from(v) * i32::from(v)).sum();
        if norm_sq == 0 {
            return None;
        }
        let inv = 1.0 / (norm_sq as f32).sqrt();
        Some([
            -f32::from(o[0]) * inv,
            -f32::from(o[1]) * inv,
            -f32::from(o[2]) * inv,
        ])
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A packed `(cell_index, type_code)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u32);

impl ComponentId {
    /// Pack a cell index and component type.
    ///
    /// # Errors
    ///
    /// [`ComponentError::CellIndexOverflow`] if the cell does not fit in
    /// [`CELL_BITS`] bits.
    pub fn new(cell_index: u32, component_type: ComponentType) -> Result<Self, ComponentError> {
        encode(cell_index, u32::from(component_type.code()))
    }

    /// Reinterpret a raw packed value. Every `u32` is a well-formed id.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The packed value.
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Local cell (voxel) index.
    pub fn cell(self) -> u32 {
        decode(self).0
    }

    /// Component type within the cell.
    pub fn component_type(self) -> ComponentType {
        ComponentType(decode(self).1 as u8)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (cell, ty) = decode(*self);
        write!(f, "{cell}:{ty}")
    }
}

/// Pack `(cell_index, type_code)` into an id.
///
/// # Errors
///
/// - [`ComponentError::TypeCodeOutOfRange`] if `type_code > 31`.
/// - [`ComponentError::CellIndexOverflow`] if `cell_index > MAX_CELL_INDEX`.
pub fn encode(cell_index: u32, type_code: u32) -> Result<ComponentId, ComponentError> {
    if type_code > TYPE_MASK {
        return Err(ComponentError::TypeCodeOutOfRange { code: type_code });
    }
    if cell_index > MAX_CELL_INDEX {
        return Err(ComponentError::CellIndexOverflow { cell_index });
    }
    Ok(ComponentId((cell_index << TYPE_BITS) | type_code))
}

/// Unpack an id into `(cell_index, type_code)`.
pub fn decode(id: ComponentId) -> (u32, u32) {
    (id.0 >> TYPE_BITS, id.0 & TYPE_MASK)
}

/// Classify a type code. Reserved and out-of-range codes yield `None`.
pub fn classify(type_code: u32) -> Option<ComponentKind> {
    ComponentType::new(type_code).ok()?.kind()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn body_of_cell_five_packs_to_173() {
        let id = encode(5, 13).unwrap();
        assert_eq!(id.raw(), 173);
        assert_eq!(decode(ComponentId::from_raw(173)), (5, 13));
        assert_eq!(id.component_type(), ComponentType::BODY);
        assert_eq!(id.to_string(), "5:13");
    }

    #[test]
    fn encode_rejects_wide_type_code() {
        assert_eq!(
            encode(0, 32),
            Err(ComponentError::TypeCodeOutOfRange { code: 32 })
        );
    }

    #[test]
    fn encode_rejects_cell_overflow() {
        assert!(encode(MAX_CELL_INDEX, 26).is_ok());
        assert_eq!(
            encode(MAX_CELL_INDEX + 1, 0),
            Err(ComponentError::CellIndexOverflow {
                cell_index: MAX_CELL_INDEX + 1
            })
        );
    }

    #[test]
    fn reserved_codes_encode_but_never_classify() {
        for code in 27..=31 {
            assert!(encode(7, code).is_ok());
            assert_eq!(classify(code), None);
        }
        assert_eq!(classify(40), None);
    }

    #[test]
    fn classification_partitions_27_codes() {
        let mut counts = [0usize; 4];
        for code in 0..u32::from(VALID_TYPE_COUNT) {
            let idx = match classify(code).unwrap() {
                ComponentKind::Body => 0,
                ComponentKind::Face => 1,
                ComponentKind::Edge => 2,
                ComponentKind::Corner => 3,
            };
            counts[idx] += 1;
        }
        assert_eq!(counts, [1, 6, 12, 8]);
    }

    #[test]
    fn offsets_round_trip_through_type_code() {
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let ty = ComponentType::from_offsets(dx, dy, dz).unwrap();
                    assert_eq!(ty.offsets(), Some([dx, dy, dz]));
                }
            }
        }
        assert!(ComponentType::from_offsets(2, 0, 0).is_err());
    }

    #[test]
    fn face_normal_points_into_cell() {
        let plus_x = ComponentType::from_offsets(1, 0, 0).unwrap();
        assert_eq!(plus_x.code(), 14);
        assert_eq!(ComponentType::face(Axis::X, Side::High), plus_x);
        assert_eq!(
            ComponentType::face(Axis::Z, Side::Low).offsets(),
            Some([0, 0, -1])
        );
        assert_eq!(plus_x.inward_normal(), Some([-1.0, 0.0, 0.0]));
        assert_eq!(plus_x.free_axes().as_slice(), &[Axis::Y, Axis::Z]);
        assert_eq!(ComponentType::BODY.inward_normal(), None);
        assert_eq!(ComponentType::BODY.free_axes().len(), 3);
    }

    #[test]
    fn edge_normal_is_unit_length() {
        let edge = ComponentType::from_offsets(0, -1, 1).unwrap();
        assert_eq!(edge.kind(), Some(ComponentKind::Edge));
        let n = edge.inward_normal().unwrap();
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert!((len - 1.0).abs() < 1e-6);
        assert!(n[1] > 0.0 && n[2] < 0.0);
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(cell in 0..=MAX_CELL_INDEX, code in 0u32..27) {
            let id = encode(cell, code).unwrap();
            prop_assert_eq!(decode(id), (cell, code));
            prop_assert_eq!(id.cell(), cell);
            prop_assert_eq!(u32::from(id.component_type().code()), code);
        }

        #[test]
        fn every_raw_id_reencodes(raw in any::<u32>()) {
            let (cell, code) = decode(ComponentId::from_raw(raw));
            prop_assert_eq!(encode(cell, code).unwrap().raw(), raw);
        }
    }
}
