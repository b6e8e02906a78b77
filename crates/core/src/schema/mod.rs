//! Self-describing wire schema: decode the schema chunk into definitions,
//! then compile those into a callable decoder for the data chunk.

pub mod compile;
pub mod decode;

use thiserror::Error;

pub use compile::{CompiledSchema, ValueDecodeError};
pub use decode::{Def, DefKind, FieldDef, SchemaDesc, WireError, decode_schema};

/// Schema-stage failures. Malformed bytes and a well-formed but
/// uncompilable description are reported separately; both carry the
/// underlying cause text.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema bytes malformed: {0}")]
    Decode(String),
    #[error("schema does not compile: {0}")]
    Compile(String),
}

/// Decode and compile the schema chunk in one step.
pub fn compile_schema(bytes: &[u8]) -> Result<CompiledSchema, SchemaError> {
    CompiledSchema::compile(decode_schema(bytes)?)
}
