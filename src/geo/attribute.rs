//! Geometry attributes.

use crate::util::{Vec2, Vec3};

use super::string_list::StringList;

/// Interpretation hint stored in an attribute's `options` block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeHint {
    Point,
    Normal,
    TextureCoord,
    Color,
    Matrix,
    String,
}

impl TypeHint {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeHint::Point => "point",
            TypeHint::Normal => "normal",
            TypeHint::TextureCoord => "texturecoord",
            TypeHint::Color => "color",
            TypeHint::Matrix => "matrix",
            TypeHint::String => "string",
        }
    }
}

impl std::fmt::Display for TypeHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute payload. The variant fixes the tuple size of every element.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValues {
    Float(Vec<f32>),
    Vector2(Vec<Vec2>),
    Vector3(Vec<Vec3>),
    /// 3x3 transforms, nine floats per element in storage order.
    Matrix3(Vec<[f32; 9]>),
    String(StringList),
}

impl AttributeValues {
    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            AttributeValues::Float(v) => v.len(),
            AttributeValues::Vector2(v) => v.len(),
            AttributeValues::Vector3(v) => v.len(),
            AttributeValues::Matrix3(v) => v.len(),
            AttributeValues::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Floats per element, `None` for strings.
    pub fn tuple_size(&self) -> Option<usize> {
        match self {
            AttributeValues::Float(_) => Some(1),
            AttributeValues::Vector2(_) => Some(2),
            AttributeValues::Vector3(_) => Some(3),
            AttributeValues::Matrix3(_) => Some(9),
            AttributeValues::String(_) => None,
        }
    }

    /// Attribute type name written to the file.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValues::String(_) => "string",
            _ => "numeric",
        }
    }
}

/// A named attribute on one geometry domain.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub hint: Option<TypeHint>,
    pub values: AttributeValues,
}

impl Attribute {
    pub fn new(name: impl Into<String>, hint: Option<TypeHint>, values: AttributeValues) -> Self {
        Self { name: name.into(), hint, values }
    }

    /// `P` point positions.
    pub fn point() -> Self {
        Self::new("P", Some(TypeHint::Point), AttributeValues::Vector3(Vec::new()))
    }

    /// `N` normals.
    pub fn normal() -> Self {
        Self::new("N", Some(TypeHint::Normal), AttributeValues::Vector3(Vec::new()))
    }

    pub fn color(name: impl Into<String>) -> Self {
        Self::new(name, Some(TypeHint::Color), AttributeValues::Vector3(Vec::new()))
    }

    /// Texture coordinates are stored as 3-tuples (`u`, `v`, `0`).
    pub fn texture_coord(name: impl Into<String>) -> Self {
        Self::new(name, Some(TypeHint::TextureCoord), AttributeValues::Vector3(Vec::new()))
    }

    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(name, None, AttributeValues::Float(Vec::new()))
    }

    pub fn matrix(name: impl Into<String>) -> Self {
        Self::new(name, Some(TypeHint::Matrix), AttributeValues::Matrix3(Vec::new()))
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, Some(TypeHint::String), AttributeValues::String(StringList::new()))
    }

    /// Replace the values, keeping name and hint.
    pub fn with_values(mut self, values: AttributeValues) -> Self {
        self.values = values;
        self
    }

    /// Replace the hint.
    pub fn with_hint(mut self, hint: Option<TypeHint>) -> Self {
        self.hint = hint;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Find an attribute by name.
pub fn find<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attributes.iter().find(|a| a.name == name)
}
