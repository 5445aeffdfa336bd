//! Encoding primitive values.
//!
//! This is an internal module. It provides the content encoders used by
//! the structural encoder.

use crate::error::ErrorKind;
use crate::schema::{PrimitiveKind, Schema};
use crate::value::Value;


//------------ encode_content ------------------------------------------------

/// Produces the content octets of a primitive value.
///
/// Checks that the value is of the right kind and fulfils the constraints
/// of `schema` before producing anything.
pub fn encode_content(
    kind: PrimitiveKind, schema: &Schema, value: &Value
) -> Result<Vec<u8>, ErrorKind> {
    match (kind, value) {
        (PrimitiveKind::Boolean, &Value::Boolean(value)) => {
            Ok(vec![if value { 0xFF } else { 0 }])
        }
        (
            PrimitiveKind::Integer | PrimitiveKind::Enumerated,
            Value::Integer(value)
        ) => {
            schema.check_range(value)?;
            Ok(value.as_slice().to_vec())
        }
        (PrimitiveKind::BitString, Value::BitString(value)) => {
            schema.check_size(value.bit_len())?;
            let mut res = Vec::with_capacity(value.encoded_len());
            value.append_content(&mut res);
            Ok(res)
        }
        (PrimitiveKind::OctetString, Value::OctetString(value)) => {
            schema.check_size(value.len())?;
            Ok(value.to_vec())
        }
        (PrimitiveKind::Null, Value::Null) => Ok(Vec::new()),
        (PrimitiveKind::Oid, Value::Oid(value)) => {
            Ok(value.as_slice().to_vec())
        }
        (PrimitiveKind::RelativeOid, Value::RelativeOid(value)) => {
            Ok(value.as_slice().to_vec())
        }
        (PrimitiveKind::String(string), Value::Text(value)) => {
            schema.check_size(value.chars().count())?;
            string.check_syntax(value, true).map_err(|err| {
                ErrorKind::mismatch(format!("invalid {}: {}", string, err))
            })?;
            string.encode(value).map_err(|_| {
                ErrorKind::mismatch(format!("invalid characters for {}", string))
            })
        }
        (kind, value) => {
            xerr!(Err(ErrorKind::mismatch(format!(
                "expected {}, got {}", kind, value.kind_name()
            ))))
        }
    }
}


//============ Tests =========================================================
