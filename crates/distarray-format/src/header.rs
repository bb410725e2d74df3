//! Length-prefixed literal headers.
//!
//! A header is a little-endian length field followed by a literal dict,
//! padded with spaces and a closing newline so that whatever follows starts
//! on an alignment boundary measured from the start of the stream.

use std::io::Read;

use distarray_core::{Error, Result, Value};

use crate::io::{read_array, read_bytes};
use crate::literal;

/// Width of the header length field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthField {
    U16,
    U32,
}

impl LengthField {
    pub fn width(self) -> usize {
        match self {
            LengthField::U16 => 2,
            LengthField::U32 => 4,
        }
    }

    fn max(self) -> usize {
        match self {
            LengthField::U16 => u16::MAX as usize,
            LengthField::U32 => u32::MAX as usize,
        }
    }
}

/// Encode `value` as a padded header, length field included.
///
/// `preamble` is the number of bytes already written before the length
/// field; the padding is chosen so that `preamble + returned.len()` is a
/// multiple of `align`.
pub fn encode_header(
    value: &Value,
    preamble: usize,
    align: usize,
    field: LengthField,
) -> Result<Vec<u8>> {
    if !value.is_finite() {
        return Err(Error::format("header holds a NaN or infinite float"));
    }
    let mut text = value.to_string();
    let unpadded = preamble + field.width() + text.len() + 1;
    let pad = (align - unpadded % align) % align;
    text.extend(std::iter::repeat(' ').take(pad));
    text.push('\n');

    if text.len() > field.max() {
        return Err(Error::format(format!(
            "header of {} bytes does not fit a {}-byte length field",
            text.len(),
            field.width()
        )));
    }

    let mut out = Vec::with_capacity(field.width() + text.len());
    match field {
        LengthField::U16 => out.extend_from_slice(&(text.len() as u16).to_le_bytes()),
        LengthField::U32 => out.extend_from_slice(&(text.len() as u32).to_le_bytes()),
    }
    out.extend_from_slice(text.as_bytes());
    Ok(out)
}

/// Read a length field and the literal that follows it.
pub fn read_header<R: Read + ?Sized>(reader: &mut R, field: LengthField) -> Result<Value> {
    let len = match field {
        LengthField::U16 => u16::from_le_bytes(read_array(reader, "array header length")?) as usize,
        LengthField::U32 => u32::from_le_bytes(read_array(reader, "array header length")?) as usize,
    };
    let raw = read_bytes(reader, len, "array header")?;
    let text = std::str::from_utf8(&raw)
        .map_err(|e| Error::format(format!("header is not valid UTF-8: {e}")))?;
    literal::parse(text)
}

/// Require `value` to be a dict whose keys are exactly `keys`.
pub fn expect_keys(value: &Value, keys: &[&str]) -> Result<()> {
    if value.as_dict().is_none() {
        return Err(Error::format(format!("header is not a dictionary: {value}")));
    }

    let mut want: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    want.sort();
    let found = value.keys();
    if found != want {
        return Err(Error::format(format!(
            "header does not contain the correct keys: {found:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        Value::dict([("shape", Value::Tuple(vec![Value::Int(3)]))])
    }

    #[test]
    fn test_padding_aligns_payload() {
        for preamble in [0, 6, 8, 13] {
            for align in [16, 64] {
                let bytes = encode_header(&sample(), preamble, align, LengthField::U16).unwrap();
                assert_eq!((preamble + bytes.len()) % align, 0);
                assert_eq!(*bytes.last().unwrap(), b'\n');
            }
        }
    }

    #[test]
    fn test_round_trip() {
        for field in [LengthField::U16, LengthField::U32] {
            let bytes = encode_header(&sample(), 8, 16, field).unwrap();
            let mut reader = bytes.as_slice();
            assert_eq!(read_header(&mut reader, field).unwrap(), sample());
            assert!(reader.is_empty());
        }
    }

    #[test]
    fn test_truncated_header() {
        let bytes = encode_header(&sample(), 0, 16, LengthField::U16).unwrap();
        let mut reader = &bytes[..bytes.len() - 3];
        assert!(matches!(
            read_header(&mut reader, LengthField::U16),
            Err(Error::EndOfStream {
                what: "array header",
                ..
            })
        ));
    }

    #[test]
    fn test_oversized_header() {
        let big = Value::Str("x".repeat(70_000));
        assert!(encode_header(&big, 0, 16, LengthField::U16).is_err());
        assert!(encode_header(&big, 0, 16, LengthField::U32).is_ok());
    }

    #[test]
    fn test_rejects_non_finite_float() {
        let value = Value::dict([("scale", Value::Float(f64::NAN))]);
        assert!(matches!(
            encode_header(&value, 0, 16, LengthField::U16),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_expect_keys() {
        let value = Value::dict([("b", Value::None), ("a", Value::None)]);
        assert!(expect_keys(&value, &["a", "b"]).is_ok());
        assert!(matches!(expect_keys(&value, &["a"]), Err(Error::Format(_))));
        assert!(expect_keys(&Value::Int(1), &["a"]).is_err());
    }
}
