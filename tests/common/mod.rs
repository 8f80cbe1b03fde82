//! Test-only token walker for binary JSON streams.

#![allow(dead_code)]

use std::collections::HashMap;

use bgeo::json::constants::*;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    BeginArray,
    EndArray,
    BeginMap,
    EndMap,
    /// Definition record together with the reference that follows it.
    IdDef { index: u64, value: String },
    IdRef(u64),
    Str(String),
    Bool(bool),
    Int { tag: u8, value: i64 },
    Real(f64),
    Array { tag: u8, count: usize, data: Vec<u8> },
}

impl Token {
    pub fn ints(&self) -> Vec<i64> {
        match self {
            Token::Array { tag, data, .. } => match *tag {
                TAG_INT8 => data.iter().map(|&b| b as i8 as i64).collect(),
                TAG_INT16 => data.chunks(2).map(|c| i16::from_le_bytes([c[0], c[1]]) as i64).collect(),
                TAG_INT32 => data.chunks(4).map(|c| i32::from_le_bytes(c.try_into().unwrap()) as i64).collect(),
                TAG_INT64 => data.chunks(8).map(|c| i64::from_le_bytes(c.try_into().unwrap())).collect(),
                TAG_UINT8 => data.iter().map(|&b| b as i64).collect(),
                other => panic!("not an int array: {:#x}", other),
            },
            other => panic!("not an array: {:?}", other),
        }
    }

    pub fn floats(&self) -> Vec<f64> {
        match self {
            Token::Array { tag: TAG_REAL32, data, .. } => {
                data.chunks(4).map(|c| f32::from_le_bytes(c.try_into().unwrap()) as f64).collect()
            }
            Token::Array { tag: TAG_REAL64, data, .. } => {
                data.chunks(8).map(|c| f64::from_le_bytes(c.try_into().unwrap())).collect()
            }
            other => panic!("not a float array: {:?}", other),
        }
    }
}

fn length(data: &[u8], pos: &mut usize) -> u64 {
    let marker = data[*pos];
    *pos += 1;
    let (value, size) = match marker {
        LENGTH_U16 => (u16::from_le_bytes([data[*pos], data[*pos + 1]]) as u64, 2),
        LENGTH_U32 => (u32::from_le_bytes(data[*pos..*pos + 4].try_into().unwrap()) as u64, 4),
        LENGTH_U64 => (u64::from_le_bytes(data[*pos..*pos + 8].try_into().unwrap()), 8),
        b => (b as u64, 0),
    };
    *pos += size;
    value
}

fn take<'a>(data: &'a [u8], pos: &mut usize, n: usize) -> &'a [u8] {
    let out = &data[*pos..*pos + n];
    *pos += n;
    out
}

/// Tokenize a complete stream, magic header included.
pub fn tokenize(bytes: &[u8]) -> Vec<Token> {
    assert_eq!(&bytes[..MAGIC_SIZE], &magic_header(), "missing magic header");
    let data = &bytes[MAGIC_SIZE..];
    let mut pos = 0;
    let mut tokens = Vec::new();

    while pos < data.len() {
        let tag = data[pos];
        pos += 1;
        let token = match tag {
            BEGIN_ARRAY => Token::BeginArray,
            END_ARRAY => Token::EndArray,
            BEGIN_MAP => Token::BeginMap,
            END_MAP => Token::EndMap,
            TRUE => Token::Bool(true),
            FALSE => Token::Bool(false),
            ID_DEFINITION => {
                let index = length(data, &mut pos);
                let n = length(data, &mut pos) as usize;
                let value = String::from_utf8(take(data, &mut pos, n).to_vec()).unwrap();
                // A definition is always followed by its own reference.
                assert_eq!(data[pos], ID_REFERENCE, "definition of {:?} without reference", value);
                pos += 1;
                assert_eq!(length(data, &mut pos), index, "definition of {:?} referenced wrongly", value);
                Token::IdDef { index, value }
            }
            ID_REFERENCE => Token::IdRef(length(data, &mut pos)),
            STRING => {
                let n = length(data, &mut pos) as usize;
                Token::Str(String::from_utf8(take(data, &mut pos, n).to_vec()).unwrap())
            }
            TAG_INT8 => Token::Int { tag, value: take(data, &mut pos, 1)[0] as i8 as i64 },
            TAG_INT16 => {
                let b = take(data, &mut pos, 2);
                Token::Int { tag, value: i16::from_le_bytes([b[0], b[1]]) as i64 }
            }
            TAG_INT32 => {
                let b = take(data, &mut pos, 4);
                Token::Int { tag, value: i32::from_le_bytes(b.try_into().unwrap()) as i64 }
            }
            TAG_INT64 => {
                let b = take(data, &mut pos, 8);
                Token::Int { tag, value: i64::from_le_bytes(b.try_into().unwrap()) }
            }
            TAG_REAL32 => Token::Real(f32::from_le_bytes(take(data, &mut pos, 4).try_into().unwrap()) as f64),
            TAG_REAL64 => Token::Real(f64::from_le_bytes(take(data, &mut pos, 8).try_into().unwrap())),
            UNIFORM_ARRAY => {
                let tag = data[pos];
                pos += 1;
                let count = length(data, &mut pos) as usize;
                let size = match tag {
                    TAG_BOOL => count.div_ceil(BOOLS_PER_WORD) * 4,
                    TAG_INT8 | TAG_UINT8 => count,
                    TAG_INT16 => count * 2,
                    TAG_INT32 | TAG_REAL32 => count * 4,
                    TAG_INT64 | TAG_REAL64 => count * 8,
                    other => panic!("unknown array tag {:#x}", other),
                };
                Token::Array { tag, count, data: take(data, &mut pos, size).to_vec() }
            }
            other => panic!("unknown tag {:#x} at {}", other, pos - 1),
        };
        tokens.push(token);
    }
    tokens
}

/// True if blocks nest properly and every block is closed.
pub fn is_balanced(tokens: &[Token]) -> bool {
    let mut stack = Vec::new();
    for t in tokens {
        match t {
            Token::BeginArray | Token::BeginMap => stack.push(t.clone()),
            Token::EndArray => {
                if stack.pop() != Some(Token::BeginArray) {
                    return false;
                }
            }
            Token::EndMap => {
                if stack.pop() != Some(Token::BeginMap) {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty()
}

/// Interned string index of `value`, from its definition record.
pub fn id_of(tokens: &[Token], value: &str) -> Option<u64> {
    tokens.iter().find_map(|t| match t {
        Token::IdDef { index, value: v } if v == value => Some(*index),
        _ => None,
    })
}

/// Positions of every token following a use of the id key `key`, its
/// defining record included.
///
/// References resolve against the latest definition of their index, so
/// redefinitions and embedded streams are followed.
pub fn all_after_key(tokens: &[Token], key: &str) -> Vec<usize> {
    let mut bound: HashMap<u64, &str> = HashMap::new();
    let mut out = Vec::new();
    for (p, t) in tokens.iter().enumerate() {
        let value = match t {
            Token::IdDef { index, value } => {
                bound.insert(*index, value.as_str());
                Some(value.as_str())
            }
            Token::IdRef(index) => bound.get(index).copied(),
            _ => None,
        };
        if value == Some(key) {
            out.push(p + 1);
        }
    }
    out
}

/// Position of the token following the first use of the id key `key`.
pub fn after_key(tokens: &[Token], key: &str) -> usize {
    all_after_key(tokens, key)
        .first()
        .copied()
        .unwrap_or_else(|| panic!("key {} never written", key))
}
