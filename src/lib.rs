//! # bgeo
//!
//! Rust writer for Houdini's binary geometry format (`.bgeo`).
//!
//! The format is a tagged binary analogue of JSON. This crate encodes polygon,
//! curve and skeleton geometry into it byte for byte, including the
//! packed-geometry container used to store many objects in one file.
//!
//! ## Modules
//!
//! - [`util`] - Errors, options, file output, math re-exports
//! - [`json`] - Low-level binary JSON writer
//! - [`geo`] - Geometry model (attributes, curves, skin capture, packed units)
//! - [`convert`] - Geometry serializer
//!
//! ## Example
//!
//! ```ignore
//! use bgeo::prelude::*;
//!
//! let mut unit = GeometryUnit::new();
//! unit.point_attributes.push(
//!     Attribute::point().with_values(AttributeValues::Vector3(vec![Vec3::ZERO, Vec3::X, Vec3::Y])),
//! );
//! unit.push_polygon(&[0, 1, 2]);
//!
//! let bytes = Converter::new().convert(&unit)?;
//! bgeo::write_file("triangle.bgeo", &bytes)?;
//! ```

pub mod util;
pub mod json;
pub mod geo;
pub mod convert;

// Re-export commonly used types
pub use util::{write_file, Error, Result, WriteOptions};
pub use convert::{Converter, GEO_FILE_VERSION};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result, WriteOptions, Mat3, Mat4, Vec2, Vec3};
    pub use crate::json::BinaryJsonWriter;
    pub use crate::geo::*;
    pub use crate::convert::Converter;
}
