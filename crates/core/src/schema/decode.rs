//! Binary schema decoding. The wire schema travels inside the file as the
//! first chunk: a list of self-describing message/struct/enum definitions
//! that the data chunk is encoded against.

use thiserror::Error;

use super::SchemaError;

/// Primitive field type codes. Non-negative codes index into the
/// definition list instead.
pub const TYPE_BOOL: i32 = -1;
pub const TYPE_BYTE: i32 = -2;
pub const TYPE_INT: i32 = -3;
pub const TYPE_UINT: i32 = -4;
pub const TYPE_FLOAT: i32 = -5;
pub const TYPE_STRING: i32 = -6;
pub const TYPE_INT64: i32 = -7;
pub const TYPE_UINT64: i32 = -8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefKind {
    Enum,
    Struct,
    Message,
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    /// Negative = primitive type code; non-negative = definition index.
    pub type_code: i32,
    pub is_array: bool,
    /// Field id for messages, variant value for enums, unused for structs.
    pub id: u32,
}

#[derive(Debug, Clone)]
pub struct Def {
    pub name: String,
    pub kind: DefKind,
    pub fields: Vec<FieldDef>,
}

/// The decoded, not-yet-compiled schema description.
#[derive(Debug, Clone)]
pub struct SchemaDesc {
    pub defs: Vec<Def>,
}

#[derive(Debug, Error)]
pub enum WireError {
    #[error("unexpected end of input at byte {at}")]
    Eof { at: usize },
    #[error("variable-length integer overflows at byte {at}")]
    VarintOverflow { at: usize },
    #[error("invalid UTF-8 in string at byte {at}")]
    InvalidUtf8 { at: usize },
    #[error("unknown definition kind {kind} at byte {at}")]
    UnknownDefKind { kind: u8, at: usize },
}

/// Byte cursor over one chunk with the wire primitives the format uses:
/// LEB128 varints, zigzag signed varints, rotated 32-bit floats, and
/// NUL-terminated UTF-8 strings.
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn byte(&mut self) -> Result<u8, WireError> {
        let b = *self
            .data
            .get(self.pos)
            .ok_or(WireError::Eof { at: self.pos })?;
        self.pos += 1;
        Ok(b)
    }

    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8], WireError> {
        if self.pos + len > self.data.len() {
            return Err(WireError::Eof { at: self.data.len() });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn var_uint(&mut self) -> Result<u32, WireError> {
        let start = self.pos;
        let mut shift = 0u32;
        let mut value = 0u32;
        loop {
            let b = self.byte()?;
            value |= u32::from(b & 0x7F) << shift;
            if b & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
            if shift >= 35 {
                return Err(WireError::VarintOverflow { at: start });
            }
        }
    }

    pub fn var_int(&mut self) -> Result<i32, WireError> {
        let v = self.var_uint()?;
        Ok(((v >> 1) as i32) ^ -((v & 1) as i32))
    }

    pub fn var_uint64(&mut self) -> Result<u64, WireError> {
        let start = self.pos;
        let mut shift = 0u32;
        let mut value = 0u64;
        loop {
            let b = self.byte()?;
            value |= u64::from(b & 0x7F) << shift;
            if b & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
            if shift >= 70 {
                return Err(WireError::VarintOverflow { at: start });
            }
        }
    }

    pub fn var_int64(&mut self) -> Result<i64, WireError> {
        let v = self.var_uint64()?;
        Ok(((v >> 1) as i64) ^ -((v & 1) as i64))
    }

    /// 32-bit float with the exponent byte rotated to the front so that
    /// zero encodes as a single byte.
    pub fn var_float(&mut self) -> Result<f32, WireError> {
        let first = self.byte()?;
        if first == 0 {
            return Ok(0.0);
        }
        let rest = self.bytes(3)?;
        let bits = u32::from(first)
            | u32::from(rest[0]) << 8
            | u32::from(rest[1]) << 16
            | u32::from(rest[2]) << 24;
        Ok(f32::from_bits(bits.rotate_left(23)))
    }

    /// NUL-terminated UTF-8 string.
    pub fn string(&mut self) -> Result<String, WireError> {
        let start = self.pos;
        loop {
            let b = self.byte()?;
            if b == 0 {
                break;
            }
        }
        let raw = &self.data[start..self.pos - 1];
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|_| WireError::InvalidUtf8 { at: start })
    }

    /// `byte[]` fast path: varuint length followed by raw bytes.
    pub fn byte_array(&mut self) -> Result<&'a [u8], WireError> {
        let len = self.var_uint()? as usize;
        self.bytes(len)
    }
}

/// Decode the binary schema chunk into a schema description.
pub fn decode_schema(bytes: &[u8]) -> Result<SchemaDesc, SchemaError> {
    decode_inner(bytes).map_err(|e| SchemaError::Decode(e.to_string()))
}

fn decode_inner(bytes: &[u8]) -> Result<SchemaDesc, WireError> {
    let mut r = Reader::new(bytes);
    let def_count = r.var_uint()?;
    let mut defs = Vec::with_capacity(def_count.min(1024) as usize);
    for _ in 0..def_count {
        let name = r.string()?;
        let kind = match r.byte()? {
            0 => DefKind::Enum,
            1 => DefKind::Struct,
            2 => DefKind::Message,
            other => {
                return Err(WireError::UnknownDefKind {
                    kind: other,
                    at: r.position() - 1,
                });
            }
        };
        let field_count = r.var_uint()?;
        let mut fields = Vec::with_capacity(field_count.min(1024) as usize);
        for _ in 0..field_count {
            let field_name = r.string()?;
            let type_code = r.var_int()?;
            let is_array = r.byte()? & 1 == 1;
            let id = r.var_uint()?;
            fields.push(FieldDef {
                name: field_name,
                type_code,
                is_array,
                id,
            });
        }
        defs.push(Def { name, kind, fields });
    }
    Ok(SchemaDesc { defs })
}
