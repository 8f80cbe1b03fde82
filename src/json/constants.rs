//! Byte-level tags of the binary JSON encoding.

/// First byte of every stream.
pub const MAGIC_BYTE: u8 = 0x7f;
/// Little-endian constant following [`MAGIC_BYTE`].
pub const MAGIC_WORD: u32 = 0x624a_534e;
/// Total magic header size in bytes.
pub const MAGIC_SIZE: usize = 5;

pub const BEGIN_ARRAY: u8 = b'[';
pub const END_ARRAY: u8 = b']';
pub const BEGIN_MAP: u8 = b'{';
pub const END_MAP: u8 = b'}';

pub const ID_DEFINITION: u8 = b'+';
pub const ID_REFERENCE: u8 = b'&';
pub const STRING: u8 = b'\'';
pub const TRUE: u8 = b'1';
pub const FALSE: u8 = b'0';

pub const UNIFORM_ARRAY: u8 = 0x40;

pub const TAG_BOOL: u8 = 0x10;
pub const TAG_INT8: u8 = 0x11;
pub const TAG_INT16: u8 = 0x12;
pub const TAG_INT32: u8 = 0x13;
pub const TAG_INT64: u8 = 0x14;
pub const TAG_REAL32: u8 = 0x19;
pub const TAG_REAL64: u8 = 0x1a;
pub const TAG_UINT8: u8 = 0x21;

/// Lengths below this value are stored in a single byte.
pub const LENGTH_INLINE_LIMIT: u64 = 0xf1;
pub const LENGTH_U16: u8 = 0xf2;
pub const LENGTH_U32: u8 = 0xf4;
pub const LENGTH_U64: u8 = 0xf8;

/// Booleans packed per word in bool uniform arrays.
pub const BOOLS_PER_WORD: usize = 32;

/// The 5-byte magic header as it appears on disk.
pub fn magic_header() -> [u8; MAGIC_SIZE] {
    let w = MAGIC_WORD.to_le_bytes();
    [MAGIC_BYTE, w[0], w[1], w[2], w[3]]
}
