//! Dense-array payloads in the NPY layout.
//!
//! ```text
//! magic     "\x93NUMPY"                     6 bytes
//! version   major, minor                    2 bytes
//! length    u16 LE (v1.0) or u32 LE (v2.0)
//! header    {'descr': .., 'fortran_order': .., 'shape': (..), }
//! data      C-ordered raw elements
//! ```
//!
//! Version 1.0 is written unless the header outgrows its 16-bit length,
//! in which case 2.0 is used. Both are read.

use std::io::{Read, Write};

use bytes::Bytes;
use distarray_core::{DType, Error, LocalChunk, Result, Value};
use tracing::trace;

use crate::header::{encode_header, expect_keys, read_header, LengthField};
use crate::io::read_array;
use crate::io::read_bytes;

/// NPY magic prefix.
pub const NPY_MAGIC: &[u8; 6] = b"\x93NUMPY";

const NPY_ALIGN: usize = 64;
const NPY_KEYS: [&str; 3] = ["descr", "fortran_order", "shape"];

fn header_value(chunk: &LocalChunk) -> Result<Value> {
    let shape = chunk
        .shape()
        .iter()
        .map(|&n| Value::int(n))
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::dict([
        ("descr", Value::Str(chunk.dtype().descr())),
        ("fortran_order", Value::Bool(false)),
        ("shape", Value::Tuple(shape)),
    ]))
}

/// Write `chunk` as an NPY payload.
pub fn write_npy<W: Write + ?Sized>(writer: &mut W, chunk: &LocalChunk) -> Result<()> {
    let value = header_value(chunk)?;
    let preamble = NPY_MAGIC.len() + 2;
    let (version, header) = match encode_header(&value, preamble, NPY_ALIGN, LengthField::U16) {
        Ok(header) => ([1, 0], header),
        Err(_) => ([2, 0], encode_header(&value, preamble, NPY_ALIGN, LengthField::U32)?),
    };

    writer.write_all(NPY_MAGIC)?;
    writer.write_all(&version)?;
    writer.write_all(&header)?;
    writer.write_all(chunk.bytes())?;

    trace!(
        descr = %chunk.dtype(),
        shape = ?chunk.shape(),
        bytes = chunk.bytes().len(),
        "wrote npy payload"
    );
    Ok(())
}

/// Read an NPY payload.
pub fn read_npy<R: Read + ?Sized>(reader: &mut R) -> Result<LocalChunk> {
    let magic: [u8; 8] = read_array(reader, "npy magic string")?;
    if &magic[..6] != NPY_MAGIC {
        return Err(Error::format(format!(
            "the npy magic string is not correct; got {:?}",
            &magic[..6]
        )));
    }
    let field = match (magic[6], magic[7]) {
        (1, 0) => LengthField::U16,
        (2, 0) => LengthField::U32,
        (major, minor) => {
            return Err(Error::format(format!(
                "unsupported npy version ({major}, {minor})"
            )))
        }
    };

    let header = read_header(reader, field)?;
    expect_keys(&header, &NPY_KEYS)?;

    let descr = header
        .get("descr")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::format("npy 'descr' must be a string"))?;
    let dtype = DType::from_descr(descr)?;

    let shape = header
        .get("shape")
        .and_then(Value::as_seq)
        .and_then(|dims| dims.iter().map(Value::as_usize).collect::<Option<Vec<_>>>())
        .ok_or_else(|| Error::format("npy 'shape' must be a tuple of non-negative ints"))?;

    let fortran = header
        .get("fortran_order")
        .and_then(Value::as_bool)
        .ok_or_else(|| Error::format("npy 'fortran_order' must be a bool"))?;
    if fortran && shape.iter().filter(|&&n| n > 1).count() > 1 {
        return Err(Error::format("fortran-ordered payloads are not supported"));
    }

    let len = shape
        .iter()
        .try_fold(dtype.itemsize, |acc, &n| acc.checked_mul(n))
        .ok_or_else(|| Error::format(format!("npy shape {shape:?} overflows")))?;
    let data = Bytes::from(read_bytes(reader, len, "array data")?);

    trace!(descr, shape = ?shape, bytes = len, "read npy payload");
    LocalChunk::new(dtype, shape, data)
}
