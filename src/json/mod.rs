//! Binary JSON encoding used by `.bgeo` files.
//!
//! The format is a tagged, self-describing binary analogue of JSON:
//! - `[` / `]` and `{` / `}` bracket arrays and maps
//! - id strings are interned per stream (`+` definition, `&` reference)
//! - scalars carry a one-byte type tag
//! - uniform arrays (`0x40`) hold homogeneous bulk data

pub mod constants;
mod writer;

pub use constants::{magic_header, MAGIC_SIZE};
pub use writer::{narrow_i16, narrow_i32, BinaryJsonWriter, BlockKind};
