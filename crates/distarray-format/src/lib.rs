//! # Distarray Format
//!
//! The `.dnpy` file format: one exported local chunk per file.
//!
//! ## Layout
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ Magic: "\x93DARRY" (6 bytes)                               │
//! │ Version: major, minor (2 bytes), only (1, 0)               │
//! ├────────────────────────────────────────────────────────────┤
//! │ Header length: u16 LE                                      │
//! │ Header: {'__version__': '0.10.0', 'dim_data': (...)}       │
//! │   padded with spaces and '\n' to a 16-byte boundary        │
//! ├────────────────────────────────────────────────────────────┤
//! │ Payload: NPY array (descr, shape, C-ordered raw bytes)     │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Headers are parsed with a closed literal grammar; nothing in a file is
//! ever evaluated.
//!
//! ## Example
//!
//! ```
//! use distarray_core::{export, DistSpec, Distribution, FixedComm, LocalChunk};
//! use distarray_format::{read_local_array, write_local_array, FormatVersion};
//!
//! let comm = FixedComm::root(2);
//! let dist = Distribution::from_shape(&comm, &[8], &DistSpec::default(), None)?;
//! let chunk = LocalChunk::from_elements(vec![4], &[1.0f64, 2.0, 3.0, 4.0])?;
//! let record = export(&chunk, &dist, 0)?;
//!
//! let mut file = Vec::new();
//! write_local_array(&mut file, &record, FormatVersion::V1_0)?;
//! assert_eq!(read_local_array(&mut file.as_slice())?, record);
//! # Ok::<(), distarray_core::Error>(())
//! ```

pub mod file;
pub mod header;
pub mod io;
pub mod literal;
pub mod npy;

pub use file::{
    load_dnpy, rank_file_name, read_local_array, read_magic, save_dnpy, write_local_array,
    FormatVersion, MAGIC_LEN, MAGIC_PREFIX,
};
pub use io::read_bytes;
pub use npy::{read_npy, write_npy};
