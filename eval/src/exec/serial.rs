//! Canonical byte encoding of compiled expressions, used as the digest input.
//!
//! # Format
//!
//! - Ordinals, lengths and counts are unsigned LEB128 varints.
//! - Raw value payloads are 8-byte little-endian integers.
//! - A value is the ordinal of its kind followed by its raw payload.
//! - A string is its byte length followed by its UTF-8 bytes.
//! - A block of nodes is the number of nodes followed by the nodes.
//! - A node starts with a tag byte ([`NODE_DIRECTIVE`], [`NODE_BRANCH`] or [`NODE_CALL`]):
//!   - directive: opcode ordinal, operand presence byte and, if present, an operand tag
//!     ([`OPERAND_VALUE`] or [`OPERAND_NAME`]) followed by the value or name;
//!   - branch: condition block, success block, failure presence byte and the optional
//!     failure block;
//!   - call: lowercase function name followed by the arity.
//! - An expression starts with a tag byte ([`EXPR_LITERAL`] or [`EXPR_NODES`]) followed
//!   by a value or by the root branch respectively.

use crate::Value;

pub(crate) const EXPR_LITERAL: u8 = 0;
pub(crate) const EXPR_NODES: u8 = 1;

pub(crate) const NODE_DIRECTIVE: u8 = 0;
pub(crate) const NODE_BRANCH: u8 = 1;
pub(crate) const NODE_CALL: u8 = 2;

pub(crate) const OPERAND_VALUE: u8 = 0;
pub(crate) const OPERAND_NAME: u8 = 1;

/// Writer of the canonical encoding.
#[derive(Debug, Default)]
pub(crate) struct CanonicalWriter {
    bytes: Vec<u8>,
}

impl CanonicalWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn write_u8(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.bytes.push(u8::from(value));
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn write_varint(&mut self, mut value: u64) {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.bytes.push(byte);
                break;
            }
            self.bytes.push(byte | 0x80);
        }
    }

    pub fn write_u64(&mut self, value: u64) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_varint(s.len() as u64);
        self.bytes.extend_from_slice(s.as_bytes());
    }

    pub fn write_value(&mut self, value: Value) {
        self.write_varint(value.kind().ordinal().into());
        self.write_u64(value.raw_bits());
    }
}
