//! # Distarray Core
//!
//! Distribution metadata for N-dimensional arrays partitioned across a
//! fixed group of processes.
//!
//! A [`Distribution`] maps every global index of an array to the process
//! ranks that own it. It is built from one [`DimDistDescriptor`] per global
//! dimension laid over a [`ProcessGrid`], and can be queried, sliced and
//! compared without touching any array data.
//!
//! ## Distribution kinds
//!
//! | Token | Kind          | Owner of index `i` along the axis       |
//! |-------|---------------|-----------------------------------------|
//! | `n`   | none          | every coordinate                        |
//! | `b`   | block         | chunk of `ceil(n / p)` containing `i`   |
//! | `c`   | cyclic        | `i mod p`                               |
//! | `bc`  | block-cyclic  | `(i / k) mod p`                         |
//! | `bp`  | block-padded  | as block, chunks carry halo ghosts      |
//! | `u`   | unstructured  | explicit index sets                     |
//!
//! ## Example
//!
//! ```
//! use distarray_core::{DistSpec, Distribution, FixedComm};
//!
//! let comm = FixedComm::root(4);
//! let dist = Distribution::from_shape(&comm, &[31, 53], &DistSpec::default(), None)?;
//! assert_eq!(dist.grid_shape(), &[4, 1]);
//! assert_eq!(dist.owning_ranks(&[17, 0])?, vec![2]);
//! # Ok::<(), distarray_core::Error>(())
//! ```

pub mod comm;
pub mod dim;
pub mod distribution;
pub mod error;
pub mod grid;
pub mod protocol;
pub mod types;
pub mod value;

pub use comm::{CommContext, FixedComm};
pub use dim::{block_bounds, DimDistDescriptor, DimOwner, Partition};
pub use distribution::{Distribution, Selector};
pub use error::{Error, Result};
pub use grid::{balanced_factors, ProcessGrid};
pub use protocol::{export, import, DimData, DimLayout, ExportRecord, DIM_KEYS, PROTOCOL_VERSION};
pub use types::{ByteOrder, DType, DistKind, DistSpec, DistType, Element, ElementKind, LocalChunk};
pub use value::Value;
