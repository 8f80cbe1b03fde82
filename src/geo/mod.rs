//! Geometry model consumed by the serializer.
//!
//! - [`GeometryUnit`] - points, vertices, primitives and their attributes
//! - [`Attribute`] / [`AttributeValues`] - typed attribute payloads
//! - [`StringList`] - per-attribute string table
//! - [`CurvePrimitive`] - Bezier / NURBS curves
//! - [`SkinCapture`] - bone weights
//! - [`PackedUnit`] - serialized units to pack into one file

pub mod attribute;
pub mod capture;
pub mod curve;
pub mod geometry;
pub mod packed;
pub mod string_list;

pub use attribute::{Attribute, AttributeValues, TypeHint};
pub use capture::{CaptureBone, Influences, SkinCapture};
pub use curve::{bezier_knots, nurbs_knots, CurveFamily, CurvePrimitive};
pub use geometry::{EdgeGroup, GeometryUnit, PrimitiveRun, SkeletonBone};
pub use packed::{PackedUnit, EMBED_PREFIX};
pub use string_list::StringList;
