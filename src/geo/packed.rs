//! Packed geometry input.

use crate::util::Vec3;

/// Prefix of the embed key shared by a packed primitive and its payload.
pub const EMBED_PREFIX: &str = "embed:";

/// An already serialized unit plus its placement.
#[derive(Clone, Debug, PartialEq)]
pub struct PackedUnit {
    pub embed_id: u64,
    /// Complete serialized unit, magic header included.
    pub bgeo: Vec<u8>,
    /// Type label, e.g. `MESH` or `CURVE`.
    pub type_name: String,
    pub name: String,
    pub position: Vec3,
    pub pivot: Vec3,
    /// 3x3 transform, nine floats in storage order.
    pub transform: [f64; 9],
}

impl PackedUnit {
    pub fn new(embed_id: u64, bgeo: Vec<u8>, type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            embed_id,
            bgeo,
            type_name: type_name.into(),
            name: name.into(),
            position: Vec3::ZERO,
            pivot: Vec3::ZERO,
            transform: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_pivot(mut self, pivot: Vec3) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_transform(mut self, transform: [f64; 9]) -> Self {
        self.transform = transform;
        self
    }

    /// `embed:` followed by the id as 16 lowercase hex digits.
    pub fn embed_key(&self) -> String {
        format!("{}{:016x}", EMBED_PREFIX, self.embed_id)
    }
}
