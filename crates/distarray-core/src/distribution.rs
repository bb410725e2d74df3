//! Global distributions: per-dimension descriptors over a process grid.

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use tracing::{debug, trace};

use crate::comm::CommContext;
use crate::dim::DimDistDescriptor;
use crate::error::{Error, Result};
use crate::grid::{balanced_factors, ProcessGrid};
use crate::types::{DistSpec, DistType};

/// One entry of a slicing selector tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// Fix the dimension at one index and drop it.
    Index(usize),
    /// Keep the dimension unchanged.
    Full,
    /// Keep `[start, stop)`; `stop` is clamped to the extent.
    Range { start: usize, stop: usize },
}

impl From<usize> for Selector {
    fn from(index: usize) -> Self {
        Selector::Index(index)
    }
}

impl From<RangeFull> for Selector {
    fn from(_: RangeFull) -> Self {
        Selector::Full
    }
}

impl From<Range<usize>> for Selector {
    fn from(r: Range<usize>) -> Self {
        Selector::Range {
            start: r.start,
            stop: r.end,
        }
    }
}

impl From<RangeFrom<usize>> for Selector {
    fn from(r: RangeFrom<usize>) -> Self {
        Selector::Range {
            start: r.start,
            stop: usize::MAX,
        }
    }
}

impl From<RangeTo<usize>> for Selector {
    fn from(r: RangeTo<usize>) -> Self {
        Selector::Range {
            start: 0,
            stop: r.end,
        }
    }
}

/// Partition of an array's global index space across a process grid.
///
/// Each grid position maps to the comm ranks holding that block. A fresh
/// distribution has exactly one rank per position; positions gain several
/// ranks only when a replicated dimension is sliced away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    comm_size: usize,
    maps: Vec<DimDistDescriptor>,
    grid: ProcessGrid,
    rank_table: Vec<Vec<usize>>,
    targets: Vec<usize>,
}

impl Distribution {
    /// Build a distribution for `shape` over the processes of `comm`.
    ///
    /// Dimensions not named in `dist` are replicated. When `grid_shape` is
    /// omitted the comm size is split evenly over the distributed dimensions.
    pub fn from_shape<C: CommContext + ?Sized>(
        comm: &C,
        shape: &[usize],
        dist: &DistSpec,
        grid_shape: Option<&[usize]>,
    ) -> Result<Self> {
        let comm_size = comm.size();
        if comm_size == 0 {
            return Err(Error::configuration("comm has no processes"));
        }
        if shape.is_empty() {
            return Err(Error::configuration("shape must have at least one dimension"));
        }
        if let Some(dim) = shape.iter().position(|&n| n == 0) {
            return Err(Error::configuration(format!(
                "shape {shape:?} has a non-positive extent at dimension {dim}"
            )));
        }
        if let Some(max) = dist.max_dim().filter(|&d| d >= shape.len()) {
            return Err(Error::configuration(format!(
                "distribution names dimension {max} of a {}-d shape",
                shape.len()
            )));
        }

        let grid_shape = match grid_shape {
            Some(grid) => {
                if grid.len() != shape.len() {
                    return Err(Error::configuration(format!(
                        "grid shape {grid:?} does not match {}-d shape",
                        shape.len()
                    )));
                }
                let procs: usize = grid.iter().product();
                if procs == 0 || comm_size % procs != 0 {
                    return Err(Error::configuration(format!(
                        "grid shape {grid:?} does not evenly divide comm size {comm_size}"
                    )));
                }
                grid.to_vec()
            }
            None => infer_grid_shape(shape.len(), dist, comm_size),
        };

        let maps = shape
            .iter()
            .zip(&grid_shape)
            .enumerate()
            .map(|(d, (&n, &p))| DimDistDescriptor::from_kind(dist.kind(d), n, p))
            .collect::<Result<Vec<_>>>()?;

        let procs: usize = grid_shape.iter().product();
        let rank_table: Vec<Vec<usize>> = (0..procs).map(|r| vec![r]).collect();
        let distribution = Self::assemble(comm_size, maps, rank_table)?;

        debug!(
            shape = ?shape,
            dist = ?distribution.dist(),
            grid = ?distribution.grid_shape(),
            comm_size,
            targets = distribution.targets.len(),
            "built distribution"
        );
        Ok(distribution)
    }

    /// Assemble from descriptors and a row-major table of ranks per grid position.
    pub(crate) fn assemble(
        comm_size: usize,
        maps: Vec<DimDistDescriptor>,
        rank_table: Vec<Vec<usize>>,
    ) -> Result<Self> {
        let grid = ProcessGrid::new(maps.iter().map(DimDistDescriptor::grid_size).collect())?;
        if rank_table.len() != grid.size() {
            return Err(Error::configuration(format!(
                "rank table has {} entries for a grid of {}",
                rank_table.len(),
                grid.size()
            )));
        }
        if let Some(&rank) = rank_table.iter().flatten().find(|&&r| r >= comm_size) {
            return Err(Error::bounds("rank", rank, comm_size));
        }

        let mut targets: Vec<usize> = grid
            .coords()
            .zip(&rank_table)
            .filter(|(coord, _)| maps.iter().zip(coord).all(|(m, &c)| m.local_len(c) > 0))
            .flat_map(|(_, ranks)| ranks.iter().copied())
            .collect();
        targets.sort_unstable();
        targets.dedup();

        Ok(Self {
            comm_size,
            maps,
            grid,
            rank_table,
            targets,
        })
    }

    /// Global shape.
    pub fn shape(&self) -> Vec<usize> {
        self.maps.iter().map(DimDistDescriptor::global_size).collect()
    }

    pub fn ndim(&self) -> usize {
        self.maps.len()
    }

    /// Distribution type of every dimension, in order.
    pub fn dist(&self) -> Vec<DistType> {
        self.maps.iter().map(DimDistDescriptor::disttype).collect()
    }

    /// One descriptor per global dimension.
    pub fn maps(&self) -> &[DimDistDescriptor] {
        &self.maps
    }

    /// Indices of the partitioned dimensions.
    pub fn distdims(&self) -> Vec<usize> {
        self.maps
            .iter()
            .enumerate()
            .filter(|(_, m)| m.disttype().is_distributed())
            .map(|(d, _)| d)
            .collect()
    }

    pub fn ndistdim(&self) -> usize {
        self.distdims().len()
    }

    pub fn grid(&self) -> &ProcessGrid {
        &self.grid
    }

    pub fn grid_shape(&self) -> &[usize] {
        self.grid.shape()
    }

    pub fn comm_size(&self) -> usize {
        self.comm_size
    }

    /// Sorted ranks holding any data.
    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    /// Ranks placed at grid coordinate `coord`.
    pub fn ranks_at(&self, coord: &[usize]) -> Result<&[usize]> {
        let pos = self.grid.coord_to_rank(coord)?;
        Ok(&self.rank_table[pos])
    }

    /// Grid coordinate of `rank`, if the rank is placed on the grid.
    pub fn grid_coord(&self, rank: usize) -> Option<Vec<usize>> {
        let pos = self.rank_table.iter().position(|ranks| ranks.contains(&rank))?;
        self.grid.rank_to_coord(pos).ok()
    }

    /// Shape of `rank`'s local chunk, padding included.
    pub fn local_shape(&self, rank: usize) -> Option<Vec<usize>> {
        let coord = self.grid_coord(rank)?;
        Some(
            self.maps
                .iter()
                .zip(&coord)
                .map(|(m, &c)| m.local_len(c))
                .collect(),
        )
    }

    /// Ranks owning the element at `index`, sorted and deduplicated.
    ///
    /// Exactly one rank unless a replicated dimension fans the lookup out.
    pub fn owning_ranks(&self, index: &[usize]) -> Result<Vec<usize>> {
        if index.len() != self.ndim() {
            return Err(Error::bounds("index length", index.len(), self.ndim()));
        }

        let mut positions = vec![0usize];
        for (m, &i) in self.maps.iter().zip(index) {
            let coords = m.owning_coords(i)?;
            let extent = m.grid_size();
            positions = positions
                .iter()
                .flat_map(|&p| coords.iter().map(move |&c| p * extent + c))
                .collect();
        }

        let mut ranks: Vec<usize> = positions
            .into_iter()
            .flat_map(|p| self.rank_table[p].iter().copied())
            .collect();
        ranks.sort_unstable();
        ranks.dedup();
        trace!(index = ?index, ranks = ?ranks, "owning ranks");
        Ok(ranks)
    }

    /// Whether `other` lays its data out the same way: same shape, same
    /// per-dimension types, same grid shape and same comm size. Targets and
    /// padding may differ.
    pub fn is_compatible(&self, other: &Distribution) -> bool {
        self.comm_size == other.comm_size
            && self.grid_shape() == other.grid_shape()
            && self.shape() == other.shape()
            && self.dist() == other.dist()
    }

    /// Derive the distribution of a sub-array.
    ///
    /// `Index` entries drop their dimension, `Full` entries keep it as is and
    /// `Range` entries re-base it at 0. Ranks left without data disappear
    /// from the result.
    pub fn slice(&self, selectors: &[Selector]) -> Result<Self> {
        if selectors.len() != self.ndim() {
            return Err(Error::configuration(format!(
                "selector has {} entries for a {}-d distribution",
                selectors.len(),
                self.ndim()
            )));
        }
        if selectors.iter().all(|s| matches!(s, Selector::Index(_))) {
            return Err(Error::configuration(
                "selecting a single element leaves no dimensions",
            ));
        }

        let mut maps = Vec::new();
        // Old grid coordinates retained per dimension; for kept dimensions
        // the position in this list is the new coordinate.
        let mut retained = Vec::with_capacity(self.ndim());
        let mut kept = Vec::with_capacity(self.ndim());
        for (m, selector) in self.maps.iter().zip(selectors) {
            match *selector {
                Selector::Index(i) => {
                    retained.push(m.owning_coords(i)?);
                    kept.push(false);
                }
                Selector::Full => {
                    maps.push(m.clone());
                    retained.push((0..m.grid_size()).collect());
                    kept.push(true);
                }
                Selector::Range { start, stop } => {
                    let (sliced, origin) = m.slice_range(start, stop)?;
                    maps.push(sliced);
                    retained.push(origin);
                    kept.push(true);
                }
            }
        }

        let new_size: usize = maps.iter().map(DimDistDescriptor::grid_size).product();
        let mut rank_table = vec![Vec::new(); new_size];
        let extents: Vec<usize> = retained.iter().map(Vec::len).collect();
        let mut old_coord = vec![0usize; self.ndim()];
        for_each_index(&extents, |k| {
            let mut new_pos = 0;
            for d in 0..k.len() {
                old_coord[d] = retained[d][k[d]];
                if kept[d] {
                    new_pos = new_pos * extents[d] + k[d];
                }
            }
            if let Ok(old_pos) = self.grid.coord_to_rank(&old_coord) {
                rank_table[new_pos].extend_from_slice(&self.rank_table[old_pos]);
            }
        });
        for ranks in &mut rank_table {
            ranks.sort_unstable();
            ranks.dedup();
        }

        let sliced = Self::assemble(self.comm_size, maps, rank_table)?;
        debug!(
            selectors = ?selectors,
            shape = ?sliced.shape(),
            grid = ?sliced.grid_shape(),
            targets = ?sliced.targets,
            "sliced distribution"
        );
        Ok(sliced)
    }
}

fn infer_grid_shape(ndim: usize, dist: &DistSpec, comm_size: usize) -> Vec<usize> {
    let distributed: Vec<usize> = (0..ndim)
        .filter(|&d| dist.kind(d).is_distributed())
        .collect();

    let mut grid = vec![1; ndim];
    if distributed.is_empty() {
        grid[0] = comm_size;
        return grid;
    }
    for (&d, f) in distributed
        .iter()
        .zip(balanced_factors(comm_size, distributed.len()))
    {
        grid[d] = f;
    }
    grid
}

/// Visit every multi-index below `extents` in row-major order.
fn for_each_index(extents: &[usize], mut f: impl FnMut(&[usize])) {
    if extents.iter().any(|&e| e == 0) {
        return;
    }
    let mut k = vec![0usize; extents.len()];
    loop {
        f(&k);
        let mut d = extents.len();
        loop {
            if d == 0 {
                return;
            }
            d -= 1;
            k[d] += 1;
            if k[d] < extents[d] {
                break;
            }
            k[d] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::FixedComm;
    use crate::types::DistKind;

    fn ctx() -> FixedComm {
        FixedComm::root(4)
    }

    #[test]
    fn test_2d_block_rows() {
        let (nrows, ncols) = (31, 53);
        let spec = DistSpec::from_map([(0, DistKind::Block)]);
        let d = Distribution::from_shape(&ctx(), &[nrows, ncols], &spec, Some(&[4, 1][..])).unwrap();
        let chunk = nrows.div_ceil(4);
        for r in 0..nrows {
            for c in [0, 17, ncols - 1] {
                assert_eq!(d.owning_ranks(&[r, c]).unwrap(), vec![r / chunk]);
            }
        }
        assert_eq!(d.owning_ranks(&[10, 3]).unwrap(), vec![1]);
    }

    #[test]
    fn test_2d_block_block() {
        let spec = DistSpec::parse_seq("b,b").unwrap();
        let d = Distribution::from_shape(&ctx(), &[3, 5], &spec, Some(&[2, 2][..])).unwrap();
        for r in 0..3 {
            for c in 0..5 {
                let rank = (r / 2) * 2 + (c / 3);
                assert_eq!(d.owning_ranks(&[r, c]).unwrap(), vec![rank]);
            }
        }
    }

    #[test]
    fn test_2d_cyclic_cyclic() {
        let spec = DistSpec::parse_seq("c,c").unwrap();
        let d = Distribution::from_shape(&ctx(), &[3, 5], &spec, Some(&[2, 2][..])).unwrap();
        for r in 0..3 {
            for c in 0..5 {
                let rank = (r % 2) * 2 + (c % 2);
                assert_eq!(d.owning_ranks(&[r, c]).unwrap(), vec![rank]);
            }
        }
        assert_eq!(d.owning_ranks(&[2, 4]).unwrap(), vec![0]);
    }

    #[test]
    fn test_replicated_fans_out() {
        let spec = DistSpec::parse_seq("b,n").unwrap();
        let d = Distribution::from_shape(&ctx(), &[8, 6], &spec, Some(&[2, 2][..])).unwrap();
        assert_eq!(d.owning_ranks(&[5, 0]).unwrap(), vec![2, 3]);
        assert_eq!(d.targets(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_nothing_distributed() {
        let d = Distribution::from_shape(&ctx(), &[5, 5], &DistSpec::none(), None).unwrap();
        assert_eq!(d.grid_shape(), &[4, 1]);
        assert_eq!(d.targets(), &[0, 1, 2, 3]);
        assert_eq!(d.owning_ranks(&[1, 1]).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(d.ndistdim(), 0);
    }

    #[test]
    fn test_inferred_grid() {
        let spec = DistSpec::parse_seq("b,c,n").unwrap();
        let d = Distribution::from_shape(&ctx(), &[100, 100, 10], &spec, None).unwrap();
        assert_eq!(d.grid_shape(), &[2, 2, 1]);
        assert_eq!(d.distdims(), vec![0, 1]);

        let d = Distribution::from_shape(&ctx(), &[15], &DistSpec::default(), None).unwrap();
        assert_eq!(d.grid_shape(), &[4]);
    }

    #[test]
    fn test_grid_shape_must_divide_comm() {
        let spec = DistSpec::parse_seq("b,b").unwrap();
        let err = Distribution::from_shape(&ctx(), &[8, 8], &spec, Some(&[3, 1][..])).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(Distribution::from_shape(&ctx(), &[8, 8], &spec, Some(&[4, 2][..])).is_err());
        assert!(Distribution::from_shape(&ctx(), &[8, 8], &spec, Some(&[4][..])).is_err());

        let half = Distribution::from_shape(&ctx(), &[8, 8], &spec, Some(&[2, 1][..])).unwrap();
        assert_eq!(half.targets(), &[0, 1]);
    }

    #[test]
    fn test_bad_shapes() {
        let spec = DistSpec::default();
        assert!(Distribution::from_shape(&ctx(), &[], &spec, None).is_err());
        assert!(Distribution::from_shape(&ctx(), &[4, 0], &spec, None).is_err());
        let spec = DistSpec::from_map([(2, DistKind::Block)]);
        assert!(Distribution::from_shape(&ctx(), &[4, 4], &spec, None).is_err());
    }

    #[test]
    fn test_owning_ranks_bad_index() {
        let d = Distribution::from_shape(&ctx(), &[8], &DistSpec::default(), None).unwrap();
        assert!(d.owning_ranks(&[8]).is_err());
        assert!(d.owning_ranks(&[1, 1]).is_err());
    }

    #[test]
    fn test_unstructured_lookup_error() {
        let spec = DistSpec::from_map([(
            0,
            DistKind::Unstructured {
                indices: vec![vec![0, 3], vec![1], vec![4], vec![5]],
            },
        )]);
        let d = Distribution::from_shape(&ctx(), &[6], &spec, None).unwrap();
        assert_eq!(d.owning_ranks(&[3]).unwrap(), vec![0]);
        assert!(matches!(d.owning_ranks(&[2]), Err(Error::Lookup { index: 2 })));
    }

    #[test]
    fn test_is_compatible() {
        let spec = DistSpec::parse_seq("b,c,n").unwrap();
        let (nr, nc, nd) = (10usize.pow(5), 10usize.pow(6), 10usize.pow(4));
        let d0 = Distribution::from_shape(&ctx(), &[nr, nc, nd], &spec, None).unwrap();
        let d1 = Distribution::from_shape(&ctx(), &[nr, nc, nd], &spec, None).unwrap();
        assert!(d0.is_compatible(&d0));
        assert!(d0.is_compatible(&d1));
        assert!(d1.is_compatible(&d0));

        let d2 = Distribution::from_shape(&ctx(), &[nr - 1, nc - 1, nd - 1], &spec, None).unwrap();
        assert!(!d1.is_compatible(&d2));
        assert!(!d2.is_compatible(&d1));
    }

    #[test]
    fn test_compatibility_is_positional() {
        let bc = DistSpec::parse_seq("b,c").unwrap();
        let cb = DistSpec::parse_seq("c,b").unwrap();
        let d0 = Distribution::from_shape(&ctx(), &[8, 8], &bc, Some(&[2, 2][..])).unwrap();
        let d1 = Distribution::from_shape(&ctx(), &[8, 8], &cb, Some(&[2, 2][..])).unwrap();
        assert!(!d0.is_compatible(&d1));
    }

    #[test]
    fn test_compatibility_ignores_padding() {
        let a = DistSpec::from_seq([DistKind::BlockPadded {
            halo: 1,
            periodic: false,
        }]);
        let b = DistSpec::from_seq([DistKind::BlockPadded {
            halo: 2,
            periodic: true,
        }]);
        let d0 = Distribution::from_shape(&ctx(), &[16], &a, None).unwrap();
        let d1 = Distribution::from_shape(&ctx(), &[16], &b, None).unwrap();
        assert!(d0.is_compatible(&d1));
    }

    #[test]
    fn test_partial_slice_1d() {
        let d0 = Distribution::from_shape(&ctx(), &[15], &DistSpec::default(), None).unwrap();
        let d1 = d0.slice(&[(0..3).into()]).unwrap();
        assert_eq!(d1.maps().len(), d0.maps().len());
        assert_eq!(d1.dist(), d0.dist());
        assert_eq!(d1.targets(), &[0]);
        assert_eq!(d1.shape(), vec![3]);
    }

    #[test]
    fn test_full_slice_is_identity() {
        let d0 = Distribution::from_shape(&ctx(), &[15], &DistSpec::default(), None).unwrap();
        let d1 = d0.slice(&[Selector::Full]).unwrap();
        assert_eq!(d1, d0);

        let d0 = Distribution::from_shape(&ctx(), &[15, 20], &DistSpec::default(), None).unwrap();
        let d1 = d0.slice(&[(..).into(), (..).into()]).unwrap();
        for (m0, m1) in d0.maps().iter().zip(d1.maps()) {
            assert_eq!(m0.bounds(), m1.bounds());
        }
        assert_eq!(d1.targets(), d0.targets());
        assert_eq!(d1, d0);
    }

    #[test]
    fn test_partial_slice_2d() {
        let d0 = Distribution::from_shape(&ctx(), &[15, 20], &DistSpec::default(), None).unwrap();
        let d1 = d0.slice(&[(3..7).into(), Selector::Index(4)]).unwrap();
        assert_eq!(d1.maps().len(), d0.maps().len() - 1);
        assert_eq!(d1.dist(), d0.dist()[..1].to_vec());
        assert_eq!(d1.maps()[0].bounds().unwrap(), vec![(0, 1), (1, 4)]);
        assert_eq!(d1.targets(), &[0, 1]);
    }

    #[test]
    fn test_full_slice_with_int_2d() {
        let d0 = Distribution::from_shape(&ctx(), &[15, 20], &DistSpec::default(), None).unwrap();
        let d1 = d0.slice(&[Selector::Full, Selector::Index(4)]).unwrap();
        assert_eq!(d1.maps().len(), d0.maps().len() - 1);
        assert_eq!(d1.dist(), d0.dist()[..1].to_vec());
        assert_eq!(d1.shape(), vec![15]);
        assert_eq!(d1.targets(), d0.targets());
    }

    #[test]
    fn test_int_slice_on_distributed_dim() {
        let spec = DistSpec::parse_seq("b,b").unwrap();
        let d0 = Distribution::from_shape(&ctx(), &[8, 8], &spec, Some(&[2, 2][..])).unwrap();
        let d1 = d0.slice(&[Selector::Index(5), Selector::Full]).unwrap();
        assert_eq!(d1.shape(), vec![8]);
        assert_eq!(d1.targets(), &[2, 3]);
        assert_eq!(d1.owning_ranks(&[1]).unwrap(), vec![2]);
        assert_eq!(d1.owning_ranks(&[6]).unwrap(), vec![3]);
    }

    #[test]
    fn test_int_slice_on_replicated_dim_keeps_targets() {
        let spec = DistSpec::parse_seq("n,b").unwrap();
        let d0 = Distribution::from_shape(&ctx(), &[6, 8], &spec, Some(&[2, 2][..])).unwrap();
        let d1 = d0.slice(&[Selector::Index(3), Selector::Full]).unwrap();
        assert_eq!(d1.targets(), d0.targets());
        assert_eq!(d1.dist(), vec![DistType::Block]);
        assert_eq!(d1.owning_ranks(&[0]).unwrap(), vec![0, 2]);
    }

    #[test]
    fn test_slice_cyclic_keeps_original_ranks() {
        let spec = DistSpec::parse_seq("c").unwrap();
        let d0 = Distribution::from_shape(&ctx(), &[10], &spec, None).unwrap();
        let d1 = d0.slice(&[(5..7).into()]).unwrap();
        assert_eq!(d1.owning_ranks(&[0]).unwrap(), d0.owning_ranks(&[5]).unwrap());
        assert_eq!(d1.owning_ranks(&[1]).unwrap(), d0.owning_ranks(&[6]).unwrap());
        assert_eq!(d1.targets(), &[1, 2]);
    }

    #[test]
    fn test_slice_errors() {
        let d0 = Distribution::from_shape(&ctx(), &[15, 20], &DistSpec::default(), None).unwrap();
        assert!(d0.slice(&[Selector::Full]).is_err());
        assert!(d0.slice(&[Selector::Index(1), Selector::Index(2)]).is_err());
        assert!(matches!(
            d0.slice(&[Selector::Index(15), Selector::Full]),
            Err(Error::Bounds { .. })
        ));
    }

    #[test]
    fn test_local_shape() {
        let spec = DistSpec::parse_seq("b,n").unwrap();
        let d = Distribution::from_shape(&ctx(), &[15, 20], &spec, None).unwrap();
        assert_eq!(d.local_shape(0), Some(vec![4, 20]));
        assert_eq!(d.local_shape(3), Some(vec![3, 20]));
        assert_eq!(d.grid_coord(2), Some(vec![2, 0]));
        assert_eq!(d.local_shape(9), None);
    }

    #[test]
    fn test_for_each_index_row_major() {
        let mut seen = Vec::new();
        for_each_index(&[2, 3], |k| seen.push(k.to_vec()));
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[0], vec![0, 0]);
        assert_eq!(seen[1], vec![0, 1]);
        assert_eq!(seen[5], vec![1, 2]);
    }
}
