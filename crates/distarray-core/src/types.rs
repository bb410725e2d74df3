//! Core type definitions: distribution kinds, element types and local chunks.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Per-dimension distribution type, as carried in `dimdata`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistType {
    /// Not distributed; replicated along its grid axis.
    #[serde(rename = "n")]
    None,
    /// Contiguous chunks.
    #[serde(rename = "b")]
    Block,
    /// Round-robin single elements.
    #[serde(rename = "c")]
    Cyclic,
    /// Round-robin fixed-size blocks.
    #[serde(rename = "bc")]
    BlockCyclic,
    /// Contiguous chunks with ghost padding.
    #[serde(rename = "bp")]
    BlockPadded,
    /// Explicit index sets.
    #[serde(rename = "u")]
    Unstructured,
}

impl DistType {
    /// Short token for this type.
    pub fn token(self) -> &'static str {
        match self {
            DistType::None => "n",
            DistType::Block => "b",
            DistType::Cyclic => "c",
            DistType::BlockCyclic => "bc",
            DistType::BlockPadded => "bp",
            DistType::Unstructured => "u",
        }
    }

    /// Parse a short token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "n" => Some(DistType::None),
            "b" => Some(DistType::Block),
            "c" => Some(DistType::Cyclic),
            "bc" => Some(DistType::BlockCyclic),
            "bp" => Some(DistType::BlockPadded),
            "u" => Some(DistType::Unstructured),
            _ => None,
        }
    }

    /// Whether data along this dimension is partitioned.
    pub fn is_distributed(self) -> bool {
        !matches!(self, DistType::None)
    }
}

impl fmt::Display for DistType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Construction-time distribution kind for one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistKind {
    /// Replicated.
    #[default]
    None,
    /// Contiguous chunks of `ceil(n / p)` elements.
    Block,
    /// Element `i` lives on grid coordinate `i mod p`.
    Cyclic,
    /// Block `i / block_size` lives on grid coordinate `(i / block_size) mod p`.
    BlockCyclic { block_size: usize },
    /// Block distribution whose local chunks carry `halo` ghost elements.
    BlockPadded {
        halo: usize,
        #[serde(default)]
        periodic: bool,
    },
    /// One explicit index set per grid coordinate.
    Unstructured { indices: Vec<Vec<usize>> },
}

impl DistKind {
    /// The [`DistType`] this kind produces.
    pub fn disttype(&self) -> DistType {
        match self {
            DistKind::None => DistType::None,
            DistKind::Block => DistType::Block,
            DistKind::Cyclic => DistType::Cyclic,
            DistKind::BlockCyclic { .. } => DistType::BlockCyclic,
            DistKind::BlockPadded { .. } => DistType::BlockPadded,
            DistKind::Unstructured { .. } => DistType::Unstructured,
        }
    }

    /// Whether this kind partitions its dimension.
    pub fn is_distributed(&self) -> bool {
        self.disttype().is_distributed()
    }
}

impl FromStr for DistKind {
    type Err = Error;

    /// Accepts `n`, `b`, `c`, `bc:<block_size>`, `bp:<halo>` and
    /// `bp:<halo>:periodic`.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split(':');
        let token = parts.next().unwrap_or_default();
        let arg = parts.next();
        let flag = parts.next();
        if parts.next().is_some() {
            return Err(Error::configuration(format!(
                "too many fields in distribution kind {s:?}"
            )));
        }

        let number = |what: &str| -> Result<usize> {
            let raw = arg.ok_or_else(|| {
                Error::configuration(format!("distribution kind {token:?} requires a {what}"))
            })?;
            raw.parse().map_err(|_| {
                Error::configuration(format!("invalid {what} {raw:?} in {s:?}"))
            })
        };

        let kind = match token {
            "n" => DistKind::None,
            "b" => DistKind::Block,
            "c" => DistKind::Cyclic,
            "bc" => DistKind::BlockCyclic {
                block_size: number("block size")?,
            },
            "bp" => {
                let halo = number("halo width")?;
                let periodic = match flag {
                    None => false,
                    Some("periodic") => true,
                    Some(other) => {
                        return Err(Error::configuration(format!(
                            "unknown block-padded flag {other:?}"
                        )))
                    }
                };
                return Ok(DistKind::BlockPadded { halo, periodic });
            }
            "u" => {
                return Err(Error::configuration(
                    "unstructured distributions need explicit index sets",
                ))
            }
            other => {
                return Err(Error::configuration(format!(
                    "unknown distribution kind {other:?}"
                )))
            }
        };

        if flag.is_some() || (arg.is_some() && !matches!(kind, DistKind::BlockCyclic { .. })) {
            return Err(Error::configuration(format!(
                "unexpected arguments in distribution kind {s:?}"
            )));
        }
        Ok(kind)
    }
}

/// Mapping from dimension index to distribution kind.
///
/// Dimensions that are not mentioned are not distributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistSpec(BTreeMap<usize, DistKind>);

impl DistSpec {
    /// Nothing distributed.
    pub fn none() -> Self {
        Self(BTreeMap::new())
    }

    /// Build from explicit `(dimension, kind)` pairs.
    pub fn from_map(entries: impl IntoIterator<Item = (usize, DistKind)>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Build from one kind per dimension, in dimension order.
    pub fn from_seq(kinds: impl IntoIterator<Item = DistKind>) -> Self {
        Self(kinds.into_iter().enumerate().collect())
    }

    /// Parse comma-separated tokens, one per dimension (`"b,c,n"`).
    pub fn parse_seq(s: &str) -> Result<Self> {
        let kinds = s
            .split(',')
            .filter(|t| !t.trim().is_empty())
            .map(DistKind::from_str)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_seq(kinds))
    }

    /// Kind for `dim`, defaulting to [`DistKind::None`].
    pub fn kind(&self, dim: usize) -> &DistKind {
        static NONE: DistKind = DistKind::None;
        self.0.get(&dim).unwrap_or(&NONE)
    }

    /// Highest dimension mentioned, if any.
    pub fn max_dim(&self) -> Option<usize> {
        self.0.keys().next_back().copied()
    }
}

impl Default for DistSpec {
    fn default() -> Self {
        Self::from_map([(0, DistKind::Block)])
    }
}

/// Element kind of a dense buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Bool,
    Int,
    UInt,
    Float,
    Complex,
}

impl ElementKind {
    fn code(self) -> char {
        match self {
            ElementKind::Bool => 'b',
            ElementKind::Int => 'i',
            ElementKind::UInt => 'u',
            ElementKind::Float => 'f',
            ElementKind::Complex => 'c',
        }
    }
}

/// Byte order of multi-byte elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ByteOrder {
    Little,
    Big,
    /// Single-byte elements.
    NotApplicable,
}

impl ByteOrder {
    /// Byte order of the running machine.
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }
}

/// Element type of a local chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DType {
    pub kind: ElementKind,
    pub itemsize: usize,
    pub order: ByteOrder,
}

impl DType {
    pub const BOOL: DType = DType::new(ElementKind::Bool, 1, ByteOrder::NotApplicable);
    pub const U8: DType = DType::new(ElementKind::UInt, 1, ByteOrder::NotApplicable);
    pub const I32: DType = DType::new(ElementKind::Int, 4, ByteOrder::Little);
    pub const I64: DType = DType::new(ElementKind::Int, 8, ByteOrder::Little);
    pub const F32: DType = DType::new(ElementKind::Float, 4, ByteOrder::Little);
    pub const F64: DType = DType::new(ElementKind::Float, 8, ByteOrder::Little);

    /// Create a dtype. Single-byte types always have no byte order.
    pub const fn new(kind: ElementKind, itemsize: usize, order: ByteOrder) -> Self {
        let order = if itemsize == 1 {
            ByteOrder::NotApplicable
        } else {
            order
        };
        Self {
            kind,
            itemsize,
            order,
        }
    }

    /// NumPy-style type string, e.g. `<f8` or `|u1`.
    pub fn descr(&self) -> String {
        let order = match self.order {
            ByteOrder::Little => '<',
            ByteOrder::Big => '>',
            ByteOrder::NotApplicable => '|',
        };
        format!("{}{}{}", order, self.kind.code(), self.itemsize)
    }

    /// Parse a NumPy-style type string.
    pub fn from_descr(descr: &str) -> Result<Self> {
        let invalid = || Error::format(format!("unsupported dtype descr {descr:?}"));

        let mut chars = descr.chars();
        let order = match chars.next().ok_or_else(invalid)? {
            '<' => ByteOrder::Little,
            '>' => ByteOrder::Big,
            '|' => ByteOrder::NotApplicable,
            '=' => ByteOrder::native(),
            _ => return Err(invalid()),
        };
        let kind = match chars.next().ok_or_else(invalid)? {
            'b' => ElementKind::Bool,
            'i' => ElementKind::Int,
            'u' => ElementKind::UInt,
            'f' => ElementKind::Float,
            'c' => ElementKind::Complex,
            _ => return Err(invalid()),
        };
        let itemsize: usize = chars.as_str().parse().map_err(|_| invalid())?;

        let valid_size = match kind {
            ElementKind::Bool => itemsize == 1,
            ElementKind::Int | ElementKind::UInt => matches!(itemsize, 1 | 2 | 4 | 8),
            ElementKind::Float => matches!(itemsize, 2 | 4 | 8),
            ElementKind::Complex => matches!(itemsize, 8 | 16),
        };
        if !valid_size || (itemsize > 1 && order == ByteOrder::NotApplicable) {
            return Err(invalid());
        }

        Ok(Self::new(kind, itemsize, order))
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descr())
    }
}

/// Primitive element types that can be packed into a [`LocalChunk`].
pub trait Element: Copy {
    /// Little-endian dtype of this element.
    const DTYPE: DType;

    /// Append the little-endian encoding.
    fn write_le(self, out: &mut Vec<u8>);

    /// Decode from exactly `DTYPE.itemsize` little-endian bytes.
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_element {
    ($ty:ty, $dtype:expr) => {
        impl Element for $ty {
            const DTYPE: DType = $dtype;

            fn write_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn read_le(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(bytes);
                <$ty>::from_le_bytes(raw)
            }
        }
    };
}

impl_element!(u8, DType::U8);
impl_element!(i32, DType::I32);
impl_element!(i64, DType::I64);
impl_element!(f32, DType::F32);
impl_element!(f64, DType::F64);

/// One process's local chunk: a dense, C-ordered buffer with shape and dtype.
///
/// Cloning shares the underlying bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalChunk {
    dtype: DType,
    shape: Vec<usize>,
    data: Bytes,
}

impl LocalChunk {
    /// Wrap raw bytes. Fails if the byte count does not match shape and dtype.
    pub fn new(dtype: DType, shape: Vec<usize>, data: impl Into<Bytes>) -> Result<Self> {
        let data = data.into();
        let expected = shape.iter().product::<usize>() * dtype.itemsize;
        if data.len() != expected {
            return Err(Error::protocol(format!(
                "buffer holds {} bytes but shape {:?} of {} needs {}",
                data.len(),
                shape,
                dtype,
                expected
            )));
        }
        Ok(Self { dtype, shape, data })
    }

    /// Pack typed elements.
    pub fn from_elements<T: Element>(shape: Vec<usize>, values: &[T]) -> Result<Self> {
        let mut data = Vec::with_capacity(values.len() * T::DTYPE.itemsize);
        for &v in values {
            v.write_le(&mut data);
        }
        Self::new(T::DTYPE, shape, data)
    }

    /// A zero-filled chunk.
    pub fn zeros(dtype: DType, shape: Vec<usize>) -> Self {
        let len = shape.iter().product::<usize>() * dtype.itemsize;
        Self {
            dtype,
            shape,
            data: Bytes::from(vec![0u8; len]),
        }
    }

    /// Unpack typed elements. The dtype must match exactly.
    pub fn to_elements<T: Element>(&self) -> Result<Vec<T>> {
        if self.dtype != T::DTYPE {
            return Err(Error::protocol(format!(
                "chunk holds {} elements, not {}",
                self.dtype,
                T::DTYPE
            )));
        }
        Ok(self
            .data
            .chunks_exact(self.dtype.itemsize)
            .map(T::read_le)
            .collect())
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}
