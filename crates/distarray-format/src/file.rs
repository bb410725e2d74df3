//! Reader and writer for `.dnpy` local-array files.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use distarray_core::{Error, ExportRecord, Result, Value};
use tracing::debug;

use crate::header::{encode_header, expect_keys, read_header, LengthField};
use crate::io::read_array;
use crate::npy::{read_npy, write_npy};

/// Magic prefix identifying a `.dnpy` file.
pub const MAGIC_PREFIX: &[u8; 6] = b"\x93DARRY";

/// Magic prefix plus the two version bytes.
pub const MAGIC_LEN: usize = MAGIC_PREFIX.len() + 2;

/// File extension of per-rank files.
pub const EXTENSION: &str = "dnpy";

const HEADER_ALIGN: usize = 16;
const HEADER_KEYS: [&str; 2] = ["__version__", "dim_data"];

/// File format version `(major, minor)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatVersion {
    pub major: u8,
    pub minor: u8,
}

impl FormatVersion {
    /// The only supported version.
    pub const V1_0: FormatVersion = FormatVersion::new(1, 0);

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Magic string for this version.
    pub fn magic(self) -> [u8; MAGIC_LEN] {
        let mut out = [0u8; MAGIC_LEN];
        out[..MAGIC_PREFIX.len()].copy_from_slice(MAGIC_PREFIX);
        out[MAGIC_PREFIX.len()] = self.major;
        out[MAGIC_PREFIX.len() + 1] = self.minor;
        out
    }
}

impl Default for FormatVersion {
    fn default() -> Self {
        Self::V1_0
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.major, self.minor)
    }
}

/// Write `record` to `writer` in format `version`.
///
/// Unsupported versions and inconsistent records fail before any byte is
/// written.
pub fn write_local_array<W: Write + ?Sized>(
    writer: &mut W,
    record: &ExportRecord,
    version: FormatVersion,
) -> Result<()> {
    if version != FormatVersion::V1_0 {
        return Err(Error::configuration(format!(
            "only version {} is supported, not {version}",
            FormatVersion::V1_0
        )));
    }
    record.validate()?;

    let metadata = Value::dict([
        ("__version__", Value::Str(record.version.clone())),
        ("dim_data", record.dim_data_value()?),
    ]);
    let header = encode_header(&metadata, MAGIC_LEN, HEADER_ALIGN, LengthField::U16)?;

    writer.write_all(&version.magic())?;
    writer.write_all(&header)?;
    write_npy(writer, &record.buffer)?;

    debug!(
        version = %record.version,
        ndim = record.dim_data.len(),
        bytes = record.buffer.bytes().len(),
        "wrote local array"
    );
    Ok(())
}

/// Read and check the magic string, returning the file version.
pub fn read_magic<R: Read + ?Sized>(reader: &mut R) -> Result<FormatVersion> {
    let magic: [u8; MAGIC_LEN] = read_array(reader, "magic string")?;
    let (prefix, version) = magic.split_at(MAGIC_PREFIX.len());
    if prefix != MAGIC_PREFIX {
        return Err(Error::format(format!(
            "the magic string is not correct; expected {MAGIC_PREFIX:?}, got {prefix:?}"
        )));
    }
    Ok(FormatVersion::new(version[0], version[1]))
}

/// Read one local array record from `reader`.
pub fn read_local_array<R: Read + ?Sized>(reader: &mut R) -> Result<ExportRecord> {
    let version = read_magic(reader)?;
    if version != FormatVersion::V1_0 {
        return Err(Error::format(format!(
            "only version {} of the file format is supported, not {version}",
            FormatVersion::V1_0
        )));
    }

    let header = read_header(reader, LengthField::U16)?;
    expect_keys(&header, &HEADER_KEYS)?;
    let protocol_version = header
        .get("__version__")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::format("header '__version__' must be a string"))?
        .to_string();
    let dim_data = ExportRecord::parse_dim_data(header.get("dim_data").unwrap_or(&Value::None))?;

    let buffer = read_npy(reader)?;
    let record = ExportRecord {
        version: protocol_version,
        buffer,
        dim_data,
    };
    record.validate()?;

    debug!(
        version = %record.version,
        shape = ?record.buffer.shape(),
        "read local array"
    );
    Ok(record)
}

/// Save `record` to `path` in format version (1, 0).
pub fn save_dnpy<P: AsRef<Path>>(path: P, record: &ExportRecord) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_local_array(&mut writer, record, FormatVersion::V1_0)?;
    writer.flush()?;
    Ok(())
}

/// Load a record from `path`.
pub fn load_dnpy<P: AsRef<Path>>(path: P) -> Result<ExportRecord> {
    let mut reader = BufReader::new(File::open(path.as_ref())?);
    read_local_array(&mut reader)
}

/// Name of `rank`'s file in a per-rank set: `<prefix>_<rank>.dnpy`.
pub fn rank_file_name(prefix: &str, rank: usize) -> String {
    format!("{prefix}_{rank}.{EXTENSION}")
}
