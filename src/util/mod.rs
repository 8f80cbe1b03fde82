//! Utility types shared by the writer and the serializer.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - [`WriteOptions`] - Serializer configuration
//! - [`write_file`] - Writing finished buffers to disk
//! - Math type re-exports from glam

mod error;
mod math;
mod options;
mod output;

pub use error::*;
pub use math::*;
pub use options::*;
pub use output::*;
