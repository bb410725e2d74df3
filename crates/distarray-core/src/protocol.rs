//! Distributed array protocol (DAP): export and import of local chunks.
//!
//! An export record carries the protocol version, the local buffer and one
//! `dimdata` dictionary per global dimension. Every dictionary has exactly
//! these keys:
//!
//! | Key         | Value                                              |
//! |-------------|----------------------------------------------------|
//! | `disttype`  | `None`, `'b'`, `'c'`, `'bc'`, `'bp'` or `'u'`      |
//! | `periodic`  | bool                                               |
//! | `datasize`  | global extent                                      |
//! | `gridrank`  | grid coordinate of the exporting rank              |
//! | `gridsize`  | grid extent along this dimension                   |
//! | `indices`   | `(start, stop, step)`, or an explicit list for `u` |
//! | `blocksize` | chunk length for block kinds, block size for `bc`  |
//! | `padding`   | `(before, after)` ghost counts                     |

use tracing::{debug, warn};

use crate::comm::CommContext;
use crate::dim::{block_bounds, DimDistDescriptor, Partition};
use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::types::{DistKind, DistType, LocalChunk};
use crate::value::Value;

/// Protocol version stamped on every export.
pub const PROTOCOL_VERSION: &str = "0.10.0";

/// The fixed key set of a `dimdata` dictionary.
pub const DIM_KEYS: [&str; 8] = [
    "disttype",
    "periodic",
    "datasize",
    "gridrank",
    "gridsize",
    "indices",
    "blocksize",
    "padding",
];

/// The indices one rank holds along one dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimLayout {
    /// Full extent, `disttype` None.
    Replicated,
    /// Contiguous `[start, stop)`.
    Block { start: usize, stop: usize },
    /// Contiguous `[start, stop)` plus ghost elements.
    BlockPadded {
        start: usize,
        stop: usize,
        padding: (usize, usize),
    },
    /// Every `gridsize`-th index from `start`.
    Cyclic { start: usize },
    /// Blocks of `block_size` dealt round-robin, first block at `start`.
    BlockCyclic { start: usize, block_size: usize },
    /// Explicit sorted index set.
    Unstructured { indices: Vec<usize> },
}

/// Metadata for one dimension of an exported chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimData {
    pub datasize: usize,
    pub gridsize: usize,
    pub gridrank: usize,
    pub periodic: bool,
    pub layout: DimLayout,
}

impl DimData {
    /// Metadata for grid coordinate `coord` of `desc`.
    pub fn from_descriptor(desc: &DimDistDescriptor, coord: usize) -> Result<Self> {
        let gridsize = desc.grid_size();
        if coord >= gridsize {
            return Err(Error::bounds("grid coordinate", coord, gridsize));
        }

        let layout = match desc.partition() {
            Partition::Replicated { .. } => DimLayout::Replicated,
            Partition::Block { bounds } => {
                let (start, stop) = bounds[coord];
                DimLayout::Block { start, stop }
            }
            Partition::BlockPadded { bounds, .. } => {
                let (start, stop) = bounds[coord];
                DimLayout::BlockPadded {
                    start,
                    stop,
                    padding: desc.padding(coord),
                }
            }
            Partition::Cyclic { .. } => DimLayout::Cyclic { start: coord },
            Partition::BlockCyclic { block_size, .. } => DimLayout::BlockCyclic {
                start: coord * block_size,
                block_size: *block_size,
            },
            Partition::Unstructured { indices } => DimLayout::Unstructured {
                indices: indices[coord].clone(),
            },
        };

        Ok(Self {
            datasize: desc.global_size(),
            gridsize,
            gridrank: coord,
            periodic: desc.periodic(),
            layout,
        })
    }

    pub fn disttype(&self) -> DistType {
        match self.layout {
            DimLayout::Replicated => DistType::None,
            DimLayout::Block { .. } => DistType::Block,
            DimLayout::BlockPadded { .. } => DistType::BlockPadded,
            DimLayout::Cyclic { .. } => DistType::Cyclic,
            DimLayout::BlockCyclic { .. } => DistType::BlockCyclic,
            DimLayout::Unstructured { .. } => DistType::Unstructured,
        }
    }

    pub fn blocksize(&self) -> usize {
        match self.layout {
            DimLayout::Block { .. } | DimLayout::BlockPadded { .. } => {
                self.datasize.div_ceil(self.gridsize).max(1)
            }
            DimLayout::BlockCyclic { block_size, .. } => block_size,
            _ => 1,
        }
    }

    pub fn padding(&self) -> (usize, usize) {
        match self.layout {
            DimLayout::BlockPadded { padding, .. } => padding,
            _ => (0, 0),
        }
    }

    /// Local extent described by this metadata, padding included.
    pub fn local_len(&self) -> usize {
        let n = self.datasize;
        match &self.layout {
            DimLayout::Replicated => n,
            DimLayout::Block { start, stop } => stop.saturating_sub(*start),
            DimLayout::BlockPadded {
                start,
                stop,
                padding: (before, after),
            } => match stop.saturating_sub(*start) {
                0 => 0,
                core => core + before + after,
            },
            DimLayout::Cyclic { start } if *start < n => (n - start).div_ceil(self.gridsize),
            DimLayout::Cyclic { .. } => 0,
            DimLayout::BlockCyclic { block_size, .. } => (self.gridrank
                ..n.div_ceil(*block_size))
                .step_by(self.gridsize)
                .map(|k| (*block_size).min(n - k * block_size))
                .sum(),
            DimLayout::Unstructured { indices } => indices.len(),
        }
    }

    /// Bounds of every grid coordinate of a block layout holding
    /// `[start, stop)` at `gridrank`.
    ///
    /// A record only carries its own interval. The canonical chunks are used
    /// when they agree with it; otherwise the indices before and after it are
    /// split over the lower and higher coordinates, as left by slicing.
    fn block_bounds_around(&self, start: usize, stop: usize) -> Result<Vec<(usize, usize)>> {
        let (n, p, r) = (self.datasize, self.gridsize, self.gridrank);
        if start > stop || stop > n || r >= p {
            return Err(Error::protocol(format!(
                "indices ({start}, {stop}) at gridrank {r} of {p} fall outside datasize {n}"
            )));
        }
        let canonical = block_bounds(n, p);
        if canonical.get(r) == Some(&(start, stop)) {
            return Ok(canonical);
        }
        if (r == 0 && start > 0) || (r + 1 == p && stop < n) {
            return Err(Error::protocol(format!(
                "indices ({start}, {stop}) at gridrank {r} of {p} leave part of datasize {n} unowned"
            )));
        }

        let mut bounds = block_bounds(start, r);
        bounds.push((start, stop));
        bounds.extend(
            block_bounds(n - stop, p - r - 1)
                .into_iter()
                .map(|(lo, hi)| (lo + stop, hi + stop)),
        );
        Ok(bounds)
    }

    /// Descriptor that reproduces this dimension. For `u` only the local
    /// index set is known; other coordinates get empty sets.
    fn to_descriptor(&self) -> Result<DimDistDescriptor> {
        let (n, p) = (self.datasize, self.gridsize);
        match &self.layout {
            DimLayout::Replicated => DimDistDescriptor::from_kind(&DistKind::None, n, p),
            DimLayout::Block { start, stop } => DimDistDescriptor::from_bounds(
                &DistKind::Block,
                n,
                self.block_bounds_around(*start, *stop)?,
            ),
            DimLayout::BlockPadded {
                start,
                stop,
                padding,
            } => {
                let kind = DistKind::BlockPadded {
                    halo: padding.0.max(padding.1),
                    periodic: self.periodic,
                };
                let desc =
                    DimDistDescriptor::from_bounds(&kind, n, self.block_bounds_around(*start, *stop)?)?;
                if desc.padding(self.gridrank) != *padding {
                    return Err(Error::protocol(format!(
                        "padding {padding:?} does not fit gridrank {} of {p}",
                        self.gridrank
                    )));
                }
                Ok(desc)
            }
            DimLayout::Cyclic { .. } => DimDistDescriptor::from_kind(&DistKind::Cyclic, n, p),
            DimLayout::BlockCyclic { block_size, .. } => DimDistDescriptor::from_kind(
                &DistKind::BlockCyclic {
                    block_size: *block_size,
                },
                n,
                p,
            ),
            DimLayout::Unstructured { indices } => {
                let mut sets = vec![Vec::new(); p];
                sets[self.gridrank] = indices.clone();
                DimDistDescriptor::from_kind(&DistKind::Unstructured { indices: sets }, n, p)
            }
        }
    }

    /// The `dimdata` dictionary, keys in canonical order.
    ///
    /// Fails only if an extent does not fit a literal integer.
    pub fn to_value(&self) -> Result<Value> {
        let disttype = match self.disttype() {
            DistType::None => Value::None,
            other => Value::Str(other.token().to_string()),
        };
        let range = |start: usize, stop: usize, step: usize| -> Result<Value> {
            Ok(Value::Tuple(vec![
                Value::int(start)?,
                Value::int(stop)?,
                Value::int(step)?,
            ]))
        };
        let indices = match &self.layout {
            DimLayout::Replicated => range(0, self.datasize, 1)?,
            DimLayout::Block { start, stop } | DimLayout::BlockPadded { start, stop, .. } => {
                range(*start, *stop, 1)?
            }
            DimLayout::Cyclic { start } => range(*start, self.datasize, self.gridsize)?,
            DimLayout::BlockCyclic { start, block_size } => {
                range(*start, self.datasize, self.gridsize * block_size)?
            }
            DimLayout::Unstructured { indices } => Value::List(
                indices
                    .iter()
                    .map(|&i| Value::int(i))
                    .collect::<Result<Vec<_>>>()?,
            ),
        };
        let (before, after) = self.padding();

        Ok(Value::dict([
            ("disttype", disttype),
            ("periodic", Value::Bool(self.periodic)),
            ("datasize", Value::int(self.datasize)?),
            ("gridrank", Value::int(self.gridrank)?),
            ("gridsize", Value::int(self.gridsize)?),
            ("indices", indices),
            ("blocksize", Value::int(self.blocksize())?),
            ("padding", Value::Tuple(vec![Value::int(before)?, Value::int(after)?])),
        ]))
    }

    /// Parse and validate a `dimdata` dictionary.
    pub fn from_value(value: &Value) -> Result<Self> {
        let entries = value
            .as_dict()
            .ok_or_else(|| Error::protocol(format!("dimdata must be a dict, got {}", value.kind())))?;

        let mut keys = value.keys();
        let mut expected: Vec<String> = DIM_KEYS.iter().map(|k| k.to_string()).collect();
        expected.sort();
        keys.dedup();
        if keys != expected || entries.len() != DIM_KEYS.len() {
            return Err(Error::protocol(format!(
                "dimdata keys {:?} do not match {:?}",
                value.keys(),
                DIM_KEYS
            )));
        }

        let field = |key: &str| value.get(key).unwrap_or(&Value::None);
        let uint = |key: &str| {
            field(key).as_usize().ok_or_else(|| {
                Error::protocol(format!(
                    "dimdata '{key}' must be a non-negative int, got {}",
                    field(key)
                ))
            })
        };

        let disttype = match field("disttype") {
            Value::None => DistType::None,
            Value::Str(token) => DistType::from_token(token)
                .filter(|t| *t != DistType::None)
                .ok_or_else(|| Error::protocol(format!("unknown disttype '{token}'")))?,
            other => {
                return Err(Error::protocol(format!(
                    "disttype must be None or str, got {}",
                    other.kind()
                )))
            }
        };
        let periodic = field("periodic").as_bool().ok_or_else(|| {
            Error::protocol(format!("dimdata 'periodic' must be a bool, got {}", field("periodic")))
        })?;
        let datasize = uint("datasize")?;
        let gridsize = uint("gridsize")?;
        let gridrank = uint("gridrank")?;
        let blocksize = uint("blocksize")?;

        if gridsize == 0 {
            return Err(Error::protocol("gridsize must be at least 1"));
        }
        if gridrank >= gridsize {
            return Err(Error::protocol(format!(
                "gridrank {gridrank} is outside gridsize {gridsize}"
            )));
        }
        if blocksize == 0 {
            return Err(Error::protocol("blocksize must be at least 1"));
        }

        let padding = match field("padding").as_seq() {
            Some([before, after]) => match (before.as_usize(), after.as_usize()) {
                (Some(b), Some(a)) => (b, a),
                _ => return Err(Error::protocol("padding entries must be non-negative ints")),
            },
            _ => return Err(Error::protocol("padding must be a pair")),
        };
        if disttype != DistType::BlockPadded && padding != (0, 0) {
            return Err(Error::protocol(format!(
                "disttype {disttype} cannot carry padding {padding:?}"
            )));
        }

        let indices = field("indices");
        let layout = if disttype == DistType::Unstructured {
            let items = match indices {
                Value::List(items) => items,
                other => {
                    return Err(Error::protocol(format!(
                        "unstructured indices must be a list, got {}",
                        other.kind()
                    )))
                }
            };
            let indices = items
                .iter()
                .map(|v| v.as_usize().filter(|&i| i < datasize))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| {
                    Error::protocol(format!("unstructured indices must lie in [0, {datasize})"))
                })?;
            if indices.windows(2).any(|w| w[0] >= w[1]) {
                return Err(Error::protocol("unstructured indices must be strictly increasing"));
            }
            DimLayout::Unstructured { indices }
        } else {
            let (start, stop, step) = match indices.as_seq() {
                Some([a, b, c]) => match (a.as_usize(), b.as_usize(), c.as_usize()) {
                    (Some(a), Some(b), Some(c)) => (a, b, c),
                    _ => return Err(Error::protocol("indices must be non-negative ints")),
                },
                _ => return Err(Error::protocol("indices must be a (start, stop, step) triple")),
            };
            if start > stop || stop > datasize {
                return Err(Error::protocol(format!(
                    "indices ({start}, {stop}, {step}) fall outside datasize {datasize}"
                )));
            }

            let expect = |ok: bool| {
                if ok {
                    Ok(())
                } else {
                    Err(Error::protocol(format!(
                        "indices ({start}, {stop}, {step}) do not describe disttype {disttype} \
                         at gridrank {gridrank} of {gridsize}"
                    )))
                }
            };
            match disttype {
                DistType::None => {
                    expect(start == 0 && stop == datasize && step == 1)?;
                    DimLayout::Replicated
                }
                DistType::Block => {
                    expect(step == 1)?;
                    DimLayout::Block { start, stop }
                }
                DistType::BlockPadded => {
                    expect(step == 1)?;
                    DimLayout::BlockPadded {
                        start,
                        stop,
                        padding,
                    }
                }
                DistType::Cyclic => {
                    expect(start == gridrank && stop == datasize && step == gridsize)?;
                    DimLayout::Cyclic { start }
                }
                DistType::BlockCyclic => {
                    expect(
                        start == gridrank * blocksize
                            && stop == datasize
                            && step == gridsize * blocksize,
                    )?;
                    DimLayout::BlockCyclic {
                        start,
                        block_size: blocksize,
                    }
                }
                DistType::Unstructured => {
                    return Err(Error::protocol("unstructured indices must be a list"))
                }
            }
        };

        Ok(Self {
            datasize,
            gridsize,
            gridrank,
            periodic,
            layout,
        })
    }
}

/// A local chunk together with the metadata needed to rebuild its distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRecord {
    pub version: String,
    pub buffer: LocalChunk,
    pub dim_data: Vec<DimData>,
}

impl ExportRecord {
    /// `dim_data` as a tuple of dictionaries.
    pub fn dim_data_value(&self) -> Result<Value> {
        Ok(Value::Tuple(
            self.dim_data
                .iter()
                .map(DimData::to_value)
                .collect::<Result<Vec<_>>>()?,
        ))
    }

    /// Parse a tuple or list of `dimdata` dictionaries.
    pub fn parse_dim_data(value: &Value) -> Result<Vec<DimData>> {
        value
            .as_seq()
            .ok_or_else(|| {
                Error::protocol(format!("dim_data must be a tuple, got {}", value.kind()))
            })?
            .iter()
            .map(DimData::from_value)
            .collect()
    }

    /// Check that the metadata describes the buffer.
    pub fn validate(&self) -> Result<()> {
        if self.dim_data.len() != self.buffer.ndim() {
            return Err(Error::protocol(format!(
                "{} dimdata entries for a {}-d buffer",
                self.dim_data.len(),
                self.buffer.ndim()
            )));
        }
        for (d, (data, &extent)) in self.dim_data.iter().zip(self.buffer.shape()).enumerate() {
            if data.gridrank >= data.gridsize {
                return Err(Error::protocol(format!(
                    "dimension {d}: gridrank {} is outside gridsize {}",
                    data.gridrank, data.gridsize
                )));
            }
            if let DimLayout::Block { start, stop } | DimLayout::BlockPadded { start, stop, .. } =
                &data.layout
            {
                data.block_bounds_around(*start, *stop)?;
            }
            if data.local_len() != extent {
                return Err(Error::protocol(format!(
                    "dimension {d}: dimdata describes {} local elements, buffer has {extent}",
                    data.local_len()
                )));
            }
        }
        Ok(())
    }
}

/// Export `rank`'s chunk of `dist`.
pub fn export(chunk: &LocalChunk, dist: &Distribution, rank: usize) -> Result<ExportRecord> {
    let coord = dist
        .grid_coord(rank)
        .ok_or_else(|| Error::protocol(format!("rank {rank} holds no grid position")))?;
    let expected: Vec<usize> = dist
        .maps()
        .iter()
        .zip(&coord)
        .map(|(m, &c)| m.local_len(c))
        .collect();
    if chunk.shape() != expected.as_slice() {
        return Err(Error::protocol(format!(
            "chunk shape {:?} does not match local shape {expected:?} of rank {rank}",
            chunk.shape()
        )));
    }

    let dim_data = dist
        .maps()
        .iter()
        .zip(&coord)
        .map(|(m, &c)| DimData::from_descriptor(m, c))
        .collect::<Result<Vec<_>>>()?;

    debug!(rank, coord = ?coord, bytes = chunk.bytes().len(), "exported chunk");
    Ok(ExportRecord {
        version: PROTOCOL_VERSION.to_string(),
        buffer: chunk.clone(),
        dim_data,
    })
}

/// Rebuild a distribution and local chunk from `record` over `comm`.
///
/// The chunk shares the record's bytes.
pub fn import<C: CommContext + ?Sized>(
    record: ExportRecord,
    comm: &C,
) -> Result<(Distribution, LocalChunk)> {
    record.validate()?;

    let maps = record
        .dim_data
        .iter()
        .enumerate()
        .map(|(d, data)| {
            data.to_descriptor()
                .map_err(|e| Error::protocol(format!("dimension {d}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let comm_size = comm.size();
    let procs: usize = record.dim_data.iter().map(|d| d.gridsize).product();
    if procs == 0 || comm_size % procs != 0 {
        return Err(Error::protocol(format!(
            "grid of {procs} processes does not fit comm size {comm_size}"
        )));
    }

    let rank_table: Vec<Vec<usize>> = (0..procs).map(|r| vec![r]).collect();
    let dist = Distribution::assemble(comm_size, maps, rank_table)?;

    let coord: Vec<usize> = record.dim_data.iter().map(|d| d.gridrank).collect();
    let placed = dist.grid().coord_to_rank(&coord)?;
    if placed != comm.rank() {
        warn!(
            rank = comm.rank(),
            placed, "imported chunk belongs to a different grid position"
        );
    }

    debug!(
        version = %record.version,
        shape = ?dist.shape(),
        grid = ?dist.grid_shape(),
        "imported chunk"
    );
    Ok((dist, record.buffer))
}
