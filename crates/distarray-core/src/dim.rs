//! Per-dimension distribution descriptors and ownership rules.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{DistKind, DistType};

/// How one dimension is split across its grid axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Partition {
    /// Every grid coordinate holds the full extent.
    Replicated { grid_size: usize },
    /// One half-open interval per grid coordinate.
    Block { bounds: Vec<(usize, usize)> },
    /// Block intervals whose local chunks carry ghost elements.
    BlockPadded {
        bounds: Vec<(usize, usize)>,
        halo: usize,
        periodic: bool,
    },
    /// Index `i` on coordinate `i mod grid_size`.
    Cyclic { grid_size: usize },
    /// Block `i / block_size` on coordinate `(i / block_size) mod grid_size`.
    BlockCyclic { grid_size: usize, block_size: usize },
    /// Sorted explicit index set per coordinate.
    Unstructured { indices: Vec<Vec<usize>> },
}

/// Owner(s) of one global index along one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimOwner {
    /// Replicated: every coordinate along the axis.
    All,
    /// A single grid coordinate.
    Coord(usize),
}

/// Immutable distribution metadata for one global dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimDistDescriptor {
    global_size: usize,
    partition: Partition,
}

/// Canonical block bounds: chunks of `ceil(n / p)`, the last ones possibly short or empty.
pub fn block_bounds(global_size: usize, grid_size: usize) -> Vec<(usize, usize)> {
    let chunk = global_size.div_ceil(grid_size.max(1));
    (0..grid_size)
        .map(|i| {
            let start = (i * chunk).min(global_size);
            let end = ((i + 1) * chunk).min(global_size);
            (start, end)
        })
        .collect()
}

impl DimDistDescriptor {
    /// Build the descriptor for `kind` over `grid_size` coordinates.
    pub fn from_kind(kind: &DistKind, global_size: usize, grid_size: usize) -> Result<Self> {
        if grid_size == 0 {
            return Err(Error::configuration("grid size must be at least 1"));
        }

        let partition = match kind {
            DistKind::None => Partition::Replicated { grid_size },
            DistKind::Block => Partition::Block {
                bounds: block_bounds(global_size, grid_size),
            },
            DistKind::BlockPadded { halo, periodic } => {
                let bounds = block_bounds(global_size, grid_size);
                let smallest = bounds.iter().map(|(s, e)| e - s).min().unwrap_or(0);
                if smallest == 0 {
                    return Err(Error::configuration(format!(
                        "block-padded dimension of size {global_size} leaves empty chunks on {grid_size} processes"
                    )));
                }
                if *halo > smallest {
                    return Err(Error::configuration(format!(
                        "halo {halo} exceeds smallest chunk {smallest}"
                    )));
                }
                Partition::BlockPadded {
                    bounds,
                    halo: *halo,
                    periodic: *periodic,
                }
            }
            DistKind::Cyclic => {
                if global_size < grid_size {
                    return Err(Error::configuration(format!(
                        "cyclic dimension of size {global_size} cannot cover {grid_size} processes"
                    )));
                }
                Partition::Cyclic { grid_size }
            }
            DistKind::BlockCyclic { block_size } => {
                if *block_size == 0 {
                    return Err(Error::configuration("block size must be positive"));
                }
                let blocks = global_size.div_ceil(*block_size);
                if blocks < grid_size {
                    return Err(Error::configuration(format!(
                        "{blocks} blocks of size {block_size} cannot cover {grid_size} processes"
                    )));
                }
                Partition::BlockCyclic {
                    grid_size,
                    block_size: *block_size,
                }
            }
            DistKind::Unstructured { indices } => {
                Partition::Unstructured {
                    indices: validate_index_sets(indices, global_size, grid_size)?,
                }
            }
        };

        Ok(Self {
            global_size,
            partition,
        })
    }

    /// Build a block or block-padded descriptor over explicit `bounds`.
    ///
    /// The bounds must tile `[0, global_size)` in coordinate order; empty
    /// chunks are allowed. Halo limits are not rechecked, since sliced
    /// layouts may have chunks narrower than their halo.
    pub fn from_bounds(
        kind: &DistKind,
        global_size: usize,
        bounds: Vec<(usize, usize)>,
    ) -> Result<Self> {
        if bounds.is_empty() {
            return Err(Error::configuration("grid size must be at least 1"));
        }
        let mut next = 0;
        for &(start, stop) in &bounds {
            if start != next || stop < start {
                return Err(Error::configuration(format!(
                    "bounds {bounds:?} do not tile a dimension of size {global_size}"
                )));
            }
            next = stop;
        }
        if next != global_size {
            return Err(Error::configuration(format!(
                "bounds {bounds:?} do not tile a dimension of size {global_size}"
            )));
        }

        let partition = match kind {
            DistKind::Block => Partition::Block { bounds },
            DistKind::BlockPadded { halo, periodic } => Partition::BlockPadded {
                bounds,
                halo: *halo,
                periodic: *periodic,
            },
            other => {
                return Err(Error::configuration(format!(
                    "explicit bounds need a block kind, not {}",
                    other.disttype()
                )))
            }
        };
        Ok(Self {
            global_size,
            partition,
        })
    }

    /// Global extent of this dimension.
    pub fn global_size(&self) -> usize {
        self.global_size
    }

    /// Underlying partition.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn disttype(&self) -> DistType {
        match self.partition {
            Partition::Replicated { .. } => DistType::None,
            Partition::Block { .. } => DistType::Block,
            Partition::BlockPadded { .. } => DistType::BlockPadded,
            Partition::Cyclic { .. } => DistType::Cyclic,
            Partition::BlockCyclic { .. } => DistType::BlockCyclic,
            Partition::Unstructured { .. } => DistType::Unstructured,
        }
    }

    /// Number of grid coordinates along this dimension.
    pub fn grid_size(&self) -> usize {
        match &self.partition {
            Partition::Replicated { grid_size }
            | Partition::Cyclic { grid_size }
            | Partition::BlockCyclic { grid_size, .. } => *grid_size,
            Partition::Block { bounds } | Partition::BlockPadded { bounds, .. } => bounds.len(),
            Partition::Unstructured { indices } => indices.len(),
        }
    }

    /// Chunk length: `ceil(n / p)` for block kinds, the block size for
    /// block-cyclic, 1 otherwise.
    pub fn block_size(&self) -> usize {
        match &self.partition {
            Partition::Block { .. } | Partition::BlockPadded { .. } => {
                self.global_size.div_ceil(self.grid_size()).max(1)
            }
            Partition::BlockCyclic { block_size, .. } => *block_size,
            _ => 1,
        }
    }

    pub fn periodic(&self) -> bool {
        matches!(self.partition, Partition::BlockPadded { periodic: true, .. })
    }

    /// Per-coordinate half-open bounds for contiguous kinds.
    pub fn bounds(&self) -> Option<Vec<(usize, usize)>> {
        match &self.partition {
            Partition::Replicated { grid_size } => Some(vec![(0, self.global_size); *grid_size]),
            Partition::Block { bounds } | Partition::BlockPadded { bounds, .. } => {
                Some(bounds.clone())
            }
            _ => None,
        }
    }

    /// Ghost padding `(before, after)` of the chunk at `coord`.
    pub fn padding(&self, coord: usize) -> (usize, usize) {
        match &self.partition {
            Partition::BlockPadded {
                bounds,
                halo,
                periodic,
            } => {
                let before = if coord > 0 || *periodic { *halo } else { 0 };
                let after = if coord + 1 < bounds.len() || *periodic {
                    *halo
                } else {
                    0
                };
                (before, after)
            }
            _ => (0, 0),
        }
    }

    /// Number of owned (core) indices at `coord`.
    pub fn core_len(&self, coord: usize) -> usize {
        let n = self.global_size;
        match &self.partition {
            Partition::Replicated { grid_size } if coord < *grid_size => n,
            Partition::Block { bounds } | Partition::BlockPadded { bounds, .. } => bounds
                .get(coord)
                .map(|(s, e)| e - s)
                .unwrap_or(0),
            Partition::Cyclic { grid_size } if coord < *grid_size => {
                (n + grid_size - 1 - coord) / grid_size
            }
            Partition::BlockCyclic {
                grid_size,
                block_size,
            } if coord < *grid_size => (coord..n.div_ceil(*block_size))
                .step_by(*grid_size)
                .map(|k| (*block_size).min(n - k * block_size))
                .sum(),
            Partition::Unstructured { indices } => indices.get(coord).map_or(0, Vec::len),
            _ => 0,
        }
    }

    /// Local extent at `coord`: core indices plus padding. Empty chunks
    /// carry no padding.
    pub fn local_len(&self, coord: usize) -> usize {
        match self.core_len(coord) {
            0 => 0,
            core => {
                let (before, after) = self.padding(coord);
                core + before + after
            }
        }
    }

    /// Global indices owned at `coord`, in ascending order.
    pub fn global_indices(&self, coord: usize) -> Vec<usize> {
        let n = self.global_size;
        match &self.partition {
            Partition::Replicated { grid_size } if coord < *grid_size => (0..n).collect(),
            Partition::Block { bounds } | Partition::BlockPadded { bounds, .. } => bounds
                .get(coord)
                .map(|&(s, e)| (s..e).collect())
                .unwrap_or_default(),
            Partition::Cyclic { grid_size } if coord < *grid_size => {
                (coord..n).step_by(*grid_size).collect()
            }
            Partition::BlockCyclic {
                grid_size,
                block_size,
            } if coord < *grid_size => (0..n)
                .filter(|i| (i / block_size) % grid_size == coord)
                .collect(),
            Partition::Unstructured { indices } => indices.get(coord).cloned().unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Owner of global `index` along this dimension.
    pub fn owner(&self, index: usize) -> Result<DimOwner> {
        if index >= self.global_size {
            return Err(Error::bounds("global index", index, self.global_size));
        }

        let coord = match &self.partition {
            Partition::Replicated { .. } => return Ok(DimOwner::All),
            Partition::Block { bounds } | Partition::BlockPadded { bounds, .. } => {
                bounds.partition_point(|&(_, end)| end <= index)
            }
            Partition::Cyclic { grid_size } => index % grid_size,
            Partition::BlockCyclic {
                grid_size,
                block_size,
            } => (index / block_size) % grid_size,
            Partition::Unstructured { indices } => indices
                .iter()
                .position(|set| set.binary_search(&index).is_ok())
                .ok_or(Error::Lookup { index })?,
        };
        Ok(DimOwner::Coord(coord))
    }

    /// Every grid coordinate holding `index`.
    pub fn owning_coords(&self, index: usize) -> Result<Vec<usize>> {
        Ok(match self.owner(index)? {
            DimOwner::All => (0..self.grid_size()).collect(),
            DimOwner::Coord(c) => vec![c],
        })
    }

    /// Restrict to `[start, stop)` re-based at 0.
    ///
    /// Returns the new descriptor and, for each of its grid coordinates, the
    /// coordinate it came from. Coordinates left without data are dropped.
    pub fn slice_range(&self, start: usize, stop: usize) -> Result<(Self, Vec<usize>)> {
        let stop = stop.min(self.global_size);
        if start >= stop {
            return Err(Error::configuration(format!(
                "empty selection {start}..{stop} of dimension with size {}",
                self.global_size
            )));
        }
        let len = stop - start;

        let clip = |bounds: &[(usize, usize)]| {
            let mut kept = Vec::new();
            let mut origin = Vec::new();
            for (coord, &(lo, hi)) in bounds.iter().enumerate() {
                let (lo, hi) = (lo.max(start), hi.min(stop));
                if lo < hi {
                    kept.push((lo - start, hi - start));
                    origin.push(coord);
                }
            }
            (kept, origin)
        };
        let rotated = |grid_size: usize, first: usize, count: usize| -> Vec<usize> {
            (0..count).map(|k| (first + k) % grid_size).collect()
        };

        let (partition, origin) = match &self.partition {
            Partition::Replicated { grid_size } => (
                Partition::Replicated {
                    grid_size: *grid_size,
                },
                (0..*grid_size).collect(),
            ),
            Partition::Block { bounds } => {
                let (bounds, origin) = clip(bounds);
                (Partition::Block { bounds }, origin)
            }
            Partition::BlockPadded {
                bounds,
                halo,
                periodic,
            } => {
                let whole = start == 0 && stop == self.global_size;
                let (bounds, origin) = clip(bounds);
                (
                    Partition::BlockPadded {
                        bounds,
                        halo: *halo,
                        periodic: *periodic && whole,
                    },
                    origin,
                )
            }
            Partition::Cyclic { grid_size } => {
                let count = (*grid_size).min(len);
                (
                    Partition::Cyclic { grid_size: count },
                    rotated(*grid_size, start % grid_size, count),
                )
            }
            Partition::BlockCyclic {
                grid_size,
                block_size,
            } if start % block_size != 0 => {
                // Blocks no longer line up; keep each coordinate's indices explicitly.
                let mut kept = Vec::new();
                let mut origin = Vec::new();
                for coord in 0..*grid_size {
                    let local: Vec<usize> = self
                        .global_indices(coord)
                        .into_iter()
                        .filter(|&i| i >= start && i < stop)
                        .map(|i| i - start)
                        .collect();
                    if !local.is_empty() {
                        kept.push(local);
                        origin.push(coord);
                    }
                }
                (Partition::Unstructured { indices: kept }, origin)
            }
            Partition::BlockCyclic {
                grid_size,
                block_size,
            } => {
                let count = (*grid_size).min(len.div_ceil(*block_size));
                (
                    Partition::BlockCyclic {
                        grid_size: count,
                        block_size: *block_size,
                    },
                    rotated(*grid_size, (start / block_size) % grid_size, count),
                )
            }
            Partition::Unstructured { indices } => {
                let mut kept = Vec::new();
                let mut origin = Vec::new();
                for (coord, set) in indices.iter().enumerate() {
                    let local: Vec<usize> = set
                        .iter()
                        .filter(|&&i| i >= start && i < stop)
                        .map(|&i| i - start)
                        .collect();
                    if !local.is_empty() {
                        kept.push(local);
                        origin.push(coord);
                    }
                }
                if kept.is_empty() {
                    return Err(Error::configuration(format!(
                        "selection {start}..{stop} holds no owned indices"
                    )));
                }
                (Partition::Unstructured { indices: kept }, origin)
            }
        };

        Ok((
            Self {
                global_size: len,
                partition,
            },
            origin,
        ))
    }
}

fn validate_index_sets(
    sets: &[Vec<usize>],
    global_size: usize,
    grid_size: usize,
) -> Result<Vec<Vec<usize>>> {
    if sets.len() != grid_size {
        return Err(Error::configuration(format!(
            "unstructured dimension needs {grid_size} index sets, got {}",
            sets.len()
        )));
    }

    let mut seen = vec![false; global_size];
    let mut sorted = Vec::with_capacity(sets.len());
    for set in sets {
        let mut set = set.clone();
        set.sort_unstable();
        for &i in &set {
            match seen.get_mut(i) {
                None => return Err(Error::bounds("unstructured index", i, global_size)),
                Some(true) => {
                    return Err(Error::configuration(format!(
                        "index {i} is owned by more than one process"
                    )))
                }
                Some(flag) => *flag = true,
            }
        }
        sorted.push(set);
    }
    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dim(kind: DistKind, n: usize, p: usize) -> DimDistDescriptor {
        DimDistDescriptor::from_kind(&kind, n, p).unwrap()
    }

    #[test]
    fn test_block_bounds() {
        let d = dim(DistKind::Block, 31, 4);
        assert_eq!(
            d.bounds().unwrap(),
            vec![(0, 8), (8, 16), (16, 24), (24, 31)]
        );
        assert_eq!(d.block_size(), 8);
        assert_eq!(d.owner(10).unwrap(), DimOwner::Coord(1));
        assert_eq!(d.owner(30).unwrap(), DimOwner::Coord(3));
    }

    #[test]
    fn test_block_owner_matches_chunk_rule() {
        for (n, p) in [(31, 4), (10, 4), (5, 4), (16, 4), (3, 2)] {
            let d = dim(DistKind::Block, n, p);
            let chunk = n.div_ceil(p);
            for i in 0..n {
                assert_eq!(d.owner(i).unwrap(), DimOwner::Coord(i / chunk), "n={n} p={p} i={i}");
            }
        }
    }

    #[test]
    fn test_block_more_processes_than_elements() {
        let d = dim(DistKind::Block, 5, 4);
        assert_eq!(d.core_len(3), 0);
        assert_eq!(d.local_len(3), 0);
    }

    #[test]
    fn test_cyclic() {
        let d = dim(DistKind::Cyclic, 10, 3);
        assert_eq!(d.owner(7).unwrap(), DimOwner::Coord(1));
        assert_eq!(d.global_indices(1), vec![1, 4, 7]);
        assert_eq!(d.core_len(0), 4);
        assert_eq!(d.core_len(2), 3);
        assert!(d.bounds().is_none());
    }

    #[test]
    fn test_cyclic_too_small() {
        assert!(DimDistDescriptor::from_kind(&DistKind::Cyclic, 2, 3).is_err());
    }

    #[test]
    fn test_block_cyclic() {
        let d = dim(DistKind::BlockCyclic { block_size: 2 }, 9, 2);
        assert_eq!(d.owner(5).unwrap(), DimOwner::Coord(0));
        assert_eq!(d.owner(3).unwrap(), DimOwner::Coord(1));
        assert_eq!(d.global_indices(0), vec![0, 1, 4, 5, 8]);
        assert_eq!(d.core_len(0), 5);
        assert_eq!(d.core_len(1), 4);
        assert_eq!(d.block_size(), 2);
    }

    #[test]
    fn test_block_cyclic_rejects_bad_sizes() {
        assert!(DimDistDescriptor::from_kind(&DistKind::BlockCyclic { block_size: 0 }, 9, 2).is_err());
        assert!(DimDistDescriptor::from_kind(&DistKind::BlockCyclic { block_size: 4 }, 9, 4).is_err());
    }

    #[test]
    fn test_block_padded() {
        let kind = DistKind::BlockPadded {
            halo: 1,
            periodic: false,
        };
        let d = dim(kind, 12, 3);
        assert_eq!(d.padding(0), (0, 1));
        assert_eq!(d.padding(1), (1, 1));
        assert_eq!(d.padding(2), (1, 0));
        assert_eq!(d.local_len(1), 6);
        assert_eq!(d.owner(4).unwrap(), DimOwner::Coord(1));

        let periodic = dim(
            DistKind::BlockPadded {
                halo: 1,
                periodic: true,
            },
            12,
            3,
        );
        assert_eq!(periodic.padding(0), (1, 1));
        assert!(periodic.periodic());
    }

    #[test]
    fn test_block_padded_halo_too_wide() {
        let kind = DistKind::BlockPadded {
            halo: 5,
            periodic: false,
        };
        assert!(DimDistDescriptor::from_kind(&kind, 12, 3).is_err());
    }

    #[test]
    fn test_replicated() {
        let d = dim(DistKind::None, 7, 3);
        assert_eq!(d.owner(2).unwrap(), DimOwner::All);
        assert_eq!(d.owning_coords(2).unwrap(), vec![0, 1, 2]);
        assert_eq!(d.bounds().unwrap(), vec![(0, 7); 3]);
        assert_eq!(d.core_len(2), 7);
    }

    #[test]
    fn test_unstructured_lookup() {
        let d = dim(
            DistKind::Unstructured {
                indices: vec![vec![4, 0], vec![1, 3]],
            },
            6,
            2,
        );
        assert_eq!(d.owner(4).unwrap(), DimOwner::Coord(0));
        assert_eq!(d.owner(3).unwrap(), DimOwner::Coord(1));
        assert!(matches!(d.owner(2), Err(Error::Lookup { index: 2 })));
        assert_eq!(d.global_indices(0), vec![0, 4]);
    }

    #[test]
    fn test_unstructured_validation() {
        let dup = DistKind::Unstructured {
            indices: vec![vec![0, 1], vec![1]],
        };
        assert!(DimDistDescriptor::from_kind(&dup, 4, 2).is_err());

        let out = DistKind::Unstructured {
            indices: vec![vec![0], vec![9]],
        };
        assert!(DimDistDescriptor::from_kind(&out, 4, 2).is_err());

        let wrong_count = DistKind::Unstructured {
            indices: vec![vec![0]],
        };
        assert!(DimDistDescriptor::from_kind(&wrong_count, 4, 2).is_err());
    }

    #[test]
    fn test_index_out_of_bounds() {
        let d = dim(DistKind::Block, 4, 2);
        assert!(matches!(d.owner(4), Err(Error::Bounds { .. })));
    }

    #[test]
    fn test_slice_block() {
        let d = dim(DistKind::Block, 15, 4);
        let (s, origin) = d.slice_range(3, 7).unwrap();
        assert_eq!(s.bounds().unwrap(), vec![(0, 1), (1, 4)]);
        assert_eq!(origin, vec![0, 1]);
        assert_eq!(s.global_size(), 4);
    }

    #[test]
    fn test_slice_cyclic_rotates() {
        let d = dim(DistKind::Cyclic, 10, 3);
        let (s, origin) = d.slice_range(4, 10).unwrap();
        assert_eq!(origin, vec![1, 2, 0]);
        assert_eq!(s.grid_size(), 3);
        // new index 0 is old 4, which lived on old coordinate 1
        assert_eq!(s.owner(0).unwrap(), DimOwner::Coord(0));
        assert_eq!(origin[0], 1);

        let (short, origin) = d.slice_range(5, 7).unwrap();
        assert_eq!(short.grid_size(), 2);
        assert_eq!(origin, vec![2, 0]);
    }

    #[test]
    fn test_slice_block_cyclic_aligned() {
        let d = dim(DistKind::BlockCyclic { block_size: 2 }, 12, 3);
        let (s, origin) = d.slice_range(4, 12).unwrap();
        assert_eq!(s.disttype(), DistType::BlockCyclic);
        assert_eq!(origin, vec![2, 0, 1]);
        for j in 0..s.global_size() {
            let DimOwner::Coord(new) = s.owner(j).unwrap() else {
                panic!("block-cyclic owner must be a single coordinate");
            };
            assert_eq!(d.owner(j + 4).unwrap(), DimOwner::Coord(origin[new]));
        }
    }

    #[test]
    fn test_slice_block_cyclic_unaligned() {
        let d = dim(DistKind::BlockCyclic { block_size: 2 }, 12, 3);
        let (s, origin) = d.slice_range(1, 8).unwrap();
        assert_eq!(s.disttype(), DistType::Unstructured);
        assert_eq!(s.global_size(), 7);
        assert_eq!(origin, vec![0, 1, 2]);
        assert_eq!(s.global_indices(0), vec![0, 5, 6]);
        assert_eq!(s.global_indices(1), vec![1, 2]);
        assert_eq!(s.global_indices(2), vec![3, 4]);
        for j in 0..s.global_size() {
            let DimOwner::Coord(new) = s.owner(j).unwrap() else {
                panic!("sliced owner must be a single coordinate");
            };
            assert_eq!(d.owner(j + 1).unwrap(), DimOwner::Coord(origin[new]));
        }

        // A narrow window can leave coordinates empty; they are dropped.
        let (narrow, origin) = d.slice_range(3, 5).unwrap();
        assert_eq!(origin, vec![1, 2]);
        assert_eq!(narrow.grid_size(), 2);
    }

    #[test]
    fn test_from_bounds() {
        let d = DimDistDescriptor::from_bounds(&DistKind::Block, 4, vec![(0, 1), (1, 4)]).unwrap();
        assert_eq!(d.owner(0).unwrap(), DimOwner::Coord(0));
        assert_eq!(d.owner(1).unwrap(), DimOwner::Coord(1));
        assert_eq!(d.local_len(1), 3);
        assert_eq!(d, dim(DistKind::Block, 15, 4).slice_range(3, 7).unwrap().0);

        assert!(DimDistDescriptor::from_bounds(&DistKind::Block, 4, vec![(0, 1), (2, 4)]).is_err());
        assert!(DimDistDescriptor::from_bounds(&DistKind::Block, 5, vec![(0, 1), (1, 4)]).is_err());
        assert!(DimDistDescriptor::from_bounds(&DistKind::Cyclic, 4, vec![(0, 4)]).is_err());
        assert!(DimDistDescriptor::from_bounds(&DistKind::Block, 0, vec![]).is_err());
    }

    #[test]
    fn test_slice_unstructured() {
        let d = dim(
            DistKind::Unstructured {
                indices: vec![vec![0, 5], vec![1, 2]],
            },
            6,
            2,
        );
        let (s, origin) = d.slice_range(1, 3).unwrap();
        assert_eq!(origin, vec![1]);
        assert_eq!(s.global_indices(0), vec![0, 1]);
    }

    #[test]
    fn test_slice_empty_range() {
        let d = dim(DistKind::Block, 8, 2);
        assert!(d.slice_range(5, 5).is_err());
        assert!(d.slice_range(9, 12).is_err());
    }
}
