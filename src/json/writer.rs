//! Binary JSON writer.
//!
//! Encodes the tagged binary analogue of JSON used by `.bgeo` files into an
//! in-memory buffer. The writer knows nothing about geometry; see
//! [`crate::convert`] for the schema layer built on top of it.

use std::collections::HashMap;

use byteorder::{LittleEndian, WriteBytesExt};

use super::constants::*;
use crate::util::{Error, Result};

/// Kind of an open block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Array,
    Map,
}

impl BlockKind {
    fn name(self) -> &'static str {
        match self {
            BlockKind::Array => "array",
            BlockKind::Map => "map",
        }
    }

    fn close_byte(self) -> u8 {
        match self {
            BlockKind::Array => END_ARRAY,
            BlockKind::Map => END_MAP,
        }
    }
}

/// Byte-buffer-backed binary JSON encoder.
///
/// Every writer owns its own id-string table, so interning indices never leak
/// between two serialized units.
pub struct BinaryJsonWriter {
    buf: Vec<u8>,
    ids: HashMap<String, u64>,
    open_blocks: Vec<BlockKind>,
}

impl Default for BinaryJsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryJsonWriter {
    /// Create a writer whose buffer starts with the magic header.
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(64 * 1024);
        buf.extend_from_slice(&magic_header());
        Self { buf, ids: HashMap::new(), open_blocks: Vec::new() }
    }

    /// Bytes written so far, magic header included.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Current write position, magic header included.
    #[inline]
    pub fn pos(&self) -> usize {
        self.buf.len()
    }

    /// Current block nesting depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.open_blocks.len()
    }

    /// Consume the writer and return the finished buffer.
    ///
    /// Fails if any block is still open.
    pub fn finish(self) -> Result<Vec<u8>> {
        if !self.open_blocks.is_empty() {
            return Err(Error::UnclosedBlocks(self.open_blocks.len()));
        }
        Ok(self.buf)
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    pub fn begin_array(&mut self) {
        self.buf.push(BEGIN_ARRAY);
        self.open_blocks.push(BlockKind::Array);
    }

    pub fn end_array(&mut self) -> Result<()> {
        self.end_block(BlockKind::Array)
    }

    pub fn begin_map(&mut self) {
        self.buf.push(BEGIN_MAP);
        self.open_blocks.push(BlockKind::Map);
    }

    pub fn end_map(&mut self) -> Result<()> {
        self.end_block(BlockKind::Map)
    }

    fn end_block(&mut self, kind: BlockKind) -> Result<()> {
        match self.open_blocks.last().copied() {
            Some(open) if open == kind => {
                self.open_blocks.pop();
                self.buf.push(kind.close_byte());
                Ok(())
            }
            Some(open) => Err(Error::UnbalancedBlock { expected: open.name(), found: kind.name() }),
            None => Err(Error::UnbalancedBlock { expected: "none", found: kind.name() }),
        }
    }

    /// Write `body` inside `[` ... `]`.
    ///
    /// The closing byte is emitted even when `body` fails; the body's error is
    /// returned after the block is closed.
    pub fn array_block<F>(&mut self, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.begin_array();
        let result = body(self);
        let closed = self.end_array();
        result.and(closed)
    }

    /// Write `body` inside `{` ... `}`. Same closing guarantee as [`Self::array_block`].
    pub fn map_block<F>(&mut self, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.begin_map();
        let result = body(self);
        let closed = self.end_map();
        result.and(closed)
    }

    // ========================================================================
    // Lengths and strings
    // ========================================================================

    /// Write a variable-width length.
    pub fn write_length(&mut self, length: u64) -> Result<()> {
        if length < LENGTH_INLINE_LIMIT {
            self.buf.push(length as u8);
        } else if length <= u16::MAX as u64 {
            self.buf.push(LENGTH_U16);
            self.buf.write_u16::<LittleEndian>(length as u16)?;
        } else if length <= u32::MAX as u64 {
            self.buf.push(LENGTH_U32);
            self.buf.write_u32::<LittleEndian>(length as u32)?;
        } else {
            self.buf.push(LENGTH_U64);
            self.buf.write_u64::<LittleEndian>(length)?;
        }
        Ok(())
    }

    /// Write a length coming from signed arithmetic. Negative values are rejected.
    pub fn write_signed_length(&mut self, length: i64) -> Result<()> {
        let length = u64::try_from(length).map_err(|_| Error::NegativeLength(length))?;
        self.write_length(length)
    }

    /// Write an interned id string.
    ///
    /// The first occurrence emits a definition record; every occurrence emits
    /// a reference record.
    pub fn write_id_string(&mut self, s: &str) -> Result<()> {
        let index = match self.ids.get(s) {
            Some(&index) => index,
            None => {
                let index = self.ids.len() as u64;
                self.ids.insert(s.to_string(), index);
                self.write_id_definition(index, s)?;
                index
            }
        };
        self.buf.push(ID_REFERENCE);
        self.write_length(index)
    }

    /// Write a definition + reference pair for an explicit id index.
    ///
    /// The interning table is left untouched.
    pub fn write_id_definition_at(&mut self, index: u64, s: &str) -> Result<()> {
        self.write_id_definition(index, s)?;
        self.buf.push(ID_REFERENCE);
        self.write_length(index)
    }

    fn write_id_definition(&mut self, index: u64, s: &str) -> Result<()> {
        self.buf.push(ID_DEFINITION);
        self.write_length(index)?;
        self.write_length(s.len() as u64)?;
        self.buf.extend_from_slice(s.as_bytes());
        Ok(())
    }

    /// Index assigned to an already interned string.
    pub fn id_index(&self, s: &str) -> Option<u64> {
        self.ids.get(s).copied()
    }

    /// Write a literal, non-interned string.
    pub fn write_string(&mut self, s: &str) -> Result<()> {
        self.buf.push(STRING);
        self.write_length(s.len() as u64)?;
        self.buf.extend_from_slice(s.as_bytes());
        Ok(())
    }

    /// Append pre-encoded bytes verbatim.
    pub fn write_raw(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    // ========================================================================
    // Scalars
    // ========================================================================

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(if value { TRUE } else { FALSE });
    }

    /// Write an integer using the narrowest tag that holds it.
    pub fn write_int(&mut self, value: i64) -> Result<()> {
        if let Ok(v) = i8::try_from(value) {
            self.buf.push(TAG_INT8);
            self.buf.write_i8(v)?;
        } else if let Ok(v) = i16::try_from(value) {
            self.buf.push(TAG_INT16);
            self.buf.write_i16::<LittleEndian>(v)?;
        } else if let Ok(v) = i32::try_from(value) {
            self.buf.push(TAG_INT32);
            self.buf.write_i32::<LittleEndian>(v)?;
        } else {
            self.write_int64(value)?;
        }
        Ok(())
    }

    /// Write an integer that is always tagged as int64.
    pub fn write_int64(&mut self, value: i64) -> Result<()> {
        self.buf.push(TAG_INT64);
        self.buf.write_i64::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_real32(&mut self, value: f32) -> Result<()> {
        self.buf.push(TAG_REAL32);
        self.buf.write_f32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_real64(&mut self, value: f64) -> Result<()> {
        self.buf.push(TAG_REAL64);
        self.buf.write_f64::<LittleEndian>(value)?;
        Ok(())
    }

    // ========================================================================
    // Uniform arrays
    // ========================================================================

    fn write_uniform_header(&mut self, tag: u8, count: usize) -> Result<()> {
        self.buf.push(UNIFORM_ARRAY);
        self.buf.push(tag);
        self.write_length(count as u64)
    }

    /// Bool array, 32 flags per little-endian word.
    pub fn write_bool_uniform_array(&mut self, values: &[bool]) -> Result<()> {
        self.write_uniform_header(TAG_BOOL, values.len())?;
        for chunk in values.chunks(BOOLS_PER_WORD) {
            let word = chunk
                .iter()
                .enumerate()
                .filter(|(_, v)| **v)
                .fold(0u32, |word, (i, _)| word | (1 << i));
            self.buf.write_u32::<LittleEndian>(word)?;
        }
        Ok(())
    }

    pub fn write_int8_uniform_array(&mut self, values: &[i8]) -> Result<()> {
        self.write_uniform_header(TAG_INT8, values.len())?;
        self.buf.extend(values.iter().map(|&v| v as u8));
        Ok(())
    }

    pub fn write_int16_uniform_array(&mut self, values: &[i16]) -> Result<()> {
        self.write_uniform_header(TAG_INT16, values.len())?;
        for &v in values {
            self.buf.write_i16::<LittleEndian>(v)?;
        }
        Ok(())
    }

    pub fn write_int32_uniform_array(&mut self, values: &[i32]) -> Result<()> {
        self.write_uniform_header(TAG_INT32, values.len())?;
        for &v in values {
            self.buf.write_i32::<LittleEndian>(v)?;
        }
        Ok(())
    }

    pub fn write_int64_uniform_array(&mut self, values: &[i64]) -> Result<()> {
        self.write_uniform_header(TAG_INT64, values.len())?;
        for &v in values {
            self.buf.write_i64::<LittleEndian>(v)?;
        }
        Ok(())
    }

    pub fn write_uint8_uniform_array(&mut self, values: &[u8]) -> Result<()> {
        self.write_uniform_header(TAG_UINT8, values.len())?;
        self.buf.extend_from_slice(values);
        Ok(())
    }

    pub fn write_real32_uniform_array(&mut self, values: &[f32]) -> Result<()> {
        self.write_uniform_header(TAG_REAL32, values.len())?;
        for &v in values {
            self.buf.write_f32::<LittleEndian>(v)?;
        }
        Ok(())
    }

    pub fn write_real64_uniform_array(&mut self, values: &[f64]) -> Result<()> {
        self.write_uniform_header(TAG_REAL64, values.len())?;
        for &v in values {
            self.buf.write_f64::<LittleEndian>(v)?;
        }
        Ok(())
    }

    /// Integer array stored with the narrowest element type that holds both
    /// its minimum and maximum. Empty arrays use int8.
    pub fn write_auto_int_uniform_array<T>(&mut self, values: &[T]) -> Result<()>
    where
        T: Copy + Into<i64>,
    {
        let wide: Vec<i64> = values.iter().map(|&v| v.into()).collect();
        let (min, max) = match (wide.iter().min(), wide.iter().max()) {
            (Some(&min), Some(&max)) => (min, max),
            _ => return self.write_int8_uniform_array(&[]),
        };

        if min >= i8::MIN as i64 && max <= i8::MAX as i64 {
            let narrow: Vec<i8> = wide.iter().map(|&v| v as i8).collect();
            self.write_int8_uniform_array(&narrow)
        } else if min >= i16::MIN as i64 && max <= i16::MAX as i64 {
            let narrow: Vec<i16> = wide.iter().map(|&v| v as i16).collect();
            self.write_int16_uniform_array(&narrow)
        } else if min >= i32::MIN as i64 && max <= i32::MAX as i64 {
            let narrow: Vec<i32> = wide.iter().map(|&v| v as i32).collect();
            self.write_int32_uniform_array(&narrow)
        } else {
            self.write_int64_uniform_array(&wide)
        }
    }

    // ========================================================================
    // Attribute header helpers
    // ========================================================================

    /// Write the `scope` / `type` / `name` triple of an attribute definition.
    pub fn write_attribute_info(&mut self, scope: &str, type_name: &str, name: &str) -> Result<()> {
        self.write_id_string("scope")?;
        self.write_id_string(scope)?;

        self.write_id_string("type")?;
        self.write_id_string(type_name)?;

        self.write_id_string("name")?;
        self.write_id_string(name)
    }

    /// Write the `options` map, carrying the type hint when present.
    pub fn write_attribute_options(&mut self, hint: Option<&str>) -> Result<()> {
        self.write_id_string("options")?;
        self.map_block(|w| {
            if let Some(hint) = hint {
                w.write_id_string("type")?;
                w.map_block(|w| {
                    w.write_id_string("type")?;
                    w.write_id_string("string")?;

                    w.write_id_string("value")?;
                    w.write_id_string(hint)
                })?;
            }
            Ok(())
        })
    }

    /// Write the `size` / `storage` pair.
    pub fn write_attribute_size_storage(&mut self, size: i64, storage: &str) -> Result<()> {
        self.write_id_string("size")?;
        self.write_int(size)?;

        self.write_id_string("storage")?;
        self.write_id_string(storage)
    }
}

/// Narrow a wide integer into `i16`, reporting the offending value.
pub fn narrow_i16(value: i64) -> Result<i16> {
    i16::try_from(value).map_err(|_| Error::ValueOutOfRange { value, storage: "int16" })
}

/// Narrow a wide integer into `i32`, reporting the offending value.
pub fn narrow_i32(value: i64) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::ValueOutOfRange { value, storage: "int32" })
}
