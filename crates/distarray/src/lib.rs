//! # Distarray
//!
//! Partitioned N-dimensional arrays for a fixed group of processes.
//!
//! This crate ties together the distribution model from
//! [`distarray_core`] and the `.dnpy` file format from
//! [`distarray_format`], and adds serializable layout configurations.
//!
//! ## Quick Start
//!
//! ```
//! use distarray::{export, import, DistSpec, Distribution, FixedComm, LocalChunk, Selector};
//!
//! let comm = FixedComm::root(4);
//! let dist = Distribution::from_shape(&comm, &[3, 5], &DistSpec::parse_seq("c,c")?, Some(&[2, 2][..]))?;
//! assert_eq!(dist.owning_ranks(&[2, 4])?, vec![0]);
//!
//! // Fix row 1: only the ranks holding that row remain.
//! let row = dist.slice(&[Selector::Index(1), Selector::Full])?;
//! assert_eq!(row.targets(), &[2, 3]);
//!
//! // Export rank 3's chunk and rebuild the distribution from it.
//! let local = dist.local_shape(3).unwrap_or_default();
//! let chunk = LocalChunk::zeros(distarray::DType::F64, local);
//! let (rebuilt, _) = import(export(&chunk, &dist, 3)?, &comm.with_rank(3)?)?;
//! assert!(rebuilt.is_compatible(&dist));
//! # Ok::<(), distarray::Error>(())
//! ```

pub mod config;

pub use config::{ConfigError, LayoutConfig};

pub use distarray_core::{
    balanced_factors, block_bounds, export, import, ByteOrder, CommContext, DType, DimData,
    DimDistDescriptor, DimLayout, DimOwner, DistKind, DistSpec, DistType, Distribution, Element,
    ElementKind, Error, ExportRecord, FixedComm, LocalChunk, Partition, ProcessGrid, Result,
    Selector, Value, DIM_KEYS, PROTOCOL_VERSION,
};

pub use distarray_format::{
    load_dnpy, rank_file_name, read_local_array, save_dnpy, write_local_array, FormatVersion,
};
