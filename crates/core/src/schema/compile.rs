//! Schema compilation: turns a decoded schema description into a callable
//! decoder. Compilation validates every type reference up front so value
//! decoding can dispatch by definition index without re-checking.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;

use super::SchemaError;
use super::decode::{
    Def, DefKind, FieldDef, Reader, SchemaDesc, TYPE_BOOL, TYPE_BYTE, TYPE_FLOAT, TYPE_INT,
    TYPE_INT64, TYPE_STRING, TYPE_UINT, TYPE_UINT64, WireError,
};

const MAX_DEPTH: usize = 64;

#[derive(Debug, Error)]
pub enum ValueDecodeError {
    #[error(transparent)]
    Wire(#[from] WireError),
    #[error("no definition named `{0}`")]
    UnknownDefinition(String),
    #[error("unknown field id {id} in message `{def}`")]
    UnknownField { def: String, id: u32 },
    #[error("value nesting exceeds {0} levels")]
    TooDeep(usize),
}

/// A compiled decoder: definition table plus a name index. Owns its
/// definitions; holds no reference to the schema chunk it came from.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    defs: Vec<Def>,
    by_name: IndexMap<String, usize>,
}

impl CompiledSchema {
    /// Validate a schema description and build the dispatch index.
    pub fn compile(desc: SchemaDesc) -> Result<Self, SchemaError> {
        let mut by_name = IndexMap::with_capacity(desc.defs.len());
        for (index, def) in desc.defs.iter().enumerate() {
            if def.name.is_empty() {
                return Err(SchemaError::Compile(format!(
                    "definition {index} has an empty name"
                )));
            }
            if by_name.insert(def.name.clone(), index).is_some() {
                return Err(SchemaError::Compile(format!(
                    "duplicate definition name `{}`",
                    def.name
                )));
            }
        }
        for def in &desc.defs {
            for field in &def.fields {
                if def.kind != DefKind::Enum {
                    let valid = (TYPE_UINT64..=TYPE_BOOL).contains(&field.type_code)
                        || (field.type_code >= 0
                            && (field.type_code as usize) < desc.defs.len());
                    if !valid {
                        return Err(SchemaError::Compile(format!(
                            "field `{}.{}` references unknown type {}",
                            def.name, field.name, field.type_code
                        )));
                    }
                }
                if def.kind == DefKind::Message && field.id == 0 {
                    return Err(SchemaError::Compile(format!(
                        "message field `{}.{}` uses reserved id 0",
                        def.name, field.name
                    )));
                }
            }
        }
        Ok(Self {
            defs: desc.defs,
            by_name,
        })
    }

    /// Names of all message definitions, in schema order.
    pub fn message_names(&self) -> impl Iterator<Item = &str> {
        self.defs
            .iter()
            .filter(|d| d.kind == DefKind::Message)
            .map(|d| d.name.as_str())
    }

    /// The conventional root entry point: the message named `Message`, or
    /// the first message definition when that name is absent.
    pub fn root_message(&self) -> Option<&str> {
        if let Some(&index) = self.by_name.get("Message")
            && self.defs[index].kind == DefKind::Message
        {
            return Some(self.defs[index].name.as_str());
        }
        self.message_names().next()
    }

    /// Decode one top-level value of the named definition from a data
    /// chunk, producing a generic object graph.
    pub fn decode_value(&self, name: &str, data: &[u8]) -> Result<Value, ValueDecodeError> {
        let &index = self
            .by_name
            .get(name)
            .ok_or_else(|| ValueDecodeError::UnknownDefinition(name.to_string()))?;
        let mut reader = Reader::new(data);
        self.decode_def(index, &mut reader, 0)
    }

    fn decode_def(
        &self,
        index: usize,
        r: &mut Reader<'_>,
        depth: usize,
    ) -> Result<Value, ValueDecodeError> {
        if depth > MAX_DEPTH {
            return Err(ValueDecodeError::TooDeep(MAX_DEPTH));
        }
        let def = &self.defs[index];
        match def.kind {
            DefKind::Enum => {
                let value = r.var_uint()?;
                match def.fields.iter().find(|f| f.id == value) {
                    Some(variant) => Ok(Value::String(variant.name.clone())),
                    None => Ok(Value::Number(value.into())),
                }
            }
            DefKind::Struct => {
                let mut obj = Map::new();
                for field in &def.fields {
                    let value = self.decode_field(field, r, depth)?;
                    obj.insert(field.name.clone(), value);
                }
                Ok(Value::Object(obj))
            }
            DefKind::Message => {
                let mut obj = Map::new();
                loop {
                    let id = r.var_uint()?;
                    if id == 0 {
                        return Ok(Value::Object(obj));
                    }
                    let Some(field) = def.fields.iter().find(|f| f.id == id) else {
                        return Err(ValueDecodeError::UnknownField {
                            def: def.name.clone(),
                            id,
                        });
                    };
                    let value = self.decode_field(field, r, depth)?;
                    obj.insert(field.name.clone(), value);
                }
            }
        }
    }

    fn decode_field(
        &self,
        field: &FieldDef,
        r: &mut Reader<'_>,
        depth: usize,
    ) -> Result<Value, ValueDecodeError> {
        if field.is_array {
            if field.type_code == TYPE_BYTE {
                let bytes = r.byte_array()?;
                return Ok(Value::Array(
                    bytes.iter().map(|&b| Value::Number(b.into())).collect(),
                ));
            }
            let len = r.var_uint()? as usize;
            let mut items = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                items.push(self.decode_scalar(field.type_code, r, depth)?);
            }
            return Ok(Value::Array(items));
        }
        self.decode_scalar(field.type_code, r, depth)
    }

    fn decode_scalar(
        &self,
        type_code: i32,
        r: &mut Reader<'_>,
        depth: usize,
    ) -> Result<Value, ValueDecodeError> {
        match type_code {
            TYPE_BOOL => Ok(Value::Bool(r.byte()? != 0)),
            TYPE_BYTE => Ok(Value::Number(r.byte()?.into())),
            TYPE_INT => Ok(Value::Number(r.var_int()?.into())),
            TYPE_UINT => Ok(Value::Number(r.var_uint()?.into())),
            TYPE_FLOAT => Ok(float_value(r.var_float()?)),
            TYPE_STRING => Ok(Value::String(r.string()?)),
            TYPE_INT64 => Ok(Value::Number(r.var_int64()?.into())),
            TYPE_UINT64 => Ok(Value::Number(r.var_uint64()?.into())),
            index => self.decode_def(index as usize, r, depth + 1),
        }
    }
}

fn float_value(v: f32) -> Value {
    serde_json::Number::from_f64(f64::from(v))
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::decode::decode_schema;

    fn schema_with_message() -> Vec<u8> {
        // enum Phase { CREATED = 1; REMOVED = 2; }
        // message Message { uint count = 1; Phase phase = 2; }
        let mut bytes = vec![0x02];
        bytes.extend_from_slice(b"Phase\0");
        bytes.push(0); // enum
        bytes.push(0x02);
        bytes.extend_from_slice(b"CREATED\0");
        bytes.push(0x00); // type (unused for enums)
        bytes.push(0x00);
        bytes.push(0x01); // value 1
        bytes.extend_from_slice(b"REMOVED\0");
        bytes.push(0x00);
        bytes.push(0x00);
        bytes.push(0x02); // value 2
        bytes.extend_from_slice(b"Message\0");
        bytes.push(2); // message
        bytes.push(0x02);
        bytes.extend_from_slice(b"count\0");
        bytes.push(0x07); // zigzag(-4) = uint
        bytes.push(0x00);
        bytes.push(0x01);
        bytes.extend_from_slice(b"phase\0");
        bytes.push(0x00); // zigzag(0) = definition index 0
        bytes.push(0x00);
        bytes.push(0x02);
        bytes
    }

    fn compiled() -> CompiledSchema {
        CompiledSchema::compile(decode_schema(&schema_with_message()).unwrap()).unwrap()
    }

    #[test]
    fn root_message_prefers_conventional_name() {
        assert_eq!(compiled().root_message(), Some("Message"));
    }

    #[test]
    fn decodes_message_fields_by_id() {
        // count = 5, phase = REMOVED, terminator
        let data = [0x01, 0x05, 0x02, 0x02, 0x00];
        let value = compiled().decode_value("Message", &data).unwrap();
        assert_eq!(value["count"], 5);
        assert_eq!(value["phase"], "REMOVED");
    }

    #[test]
    fn unknown_enum_value_surfaces_as_number() {
        let data = [0x02, 0x09, 0x00];
        let value = compiled().decode_value("Message", &data).unwrap();
        assert_eq!(value["phase"], 9);
    }

    #[test]
    fn unknown_field_id_is_an_error() {
        let data = [0x07, 0x00];
        let err = compiled().decode_value("Message", &data).unwrap_err();
        assert!(matches!(err, ValueDecodeError::UnknownField { id: 7, .. }));
    }

    #[test]
    fn dangling_type_reference_fails_compilation() {
        let desc = decode_schema(&schema_with_message()).unwrap();
        let mut broken = desc;
        broken.defs[1].fields[1].type_code = 40;
        let err = CompiledSchema::compile(broken).unwrap_err();
        assert!(matches!(err, SchemaError::Compile(_)));
    }

    #[test]
    fn reserved_message_field_id_fails_compilation() {
        let mut desc = decode_schema(&schema_with_message()).unwrap();
        desc.defs[1].fields[0].id = 0;
        let err = CompiledSchema::compile(desc).unwrap_err();
        assert!(matches!(err, SchemaError::Compile(_)));
    }
}
