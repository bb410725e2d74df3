//! Logical N-dimensional process grid.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fixed-shape process grid with a row-major rank/coordinate bijection.
///
/// The last dimension varies fastest: in a `(2, 3)` grid rank 4 sits at
/// coordinate `(1, 1)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessGrid {
    shape: Vec<usize>,
}

impl ProcessGrid {
    /// Create a grid. Every extent must be at least 1.
    pub fn new(shape: Vec<usize>) -> Result<Self> {
        if let Some(dim) = shape.iter().position(|&s| s == 0) {
            return Err(Error::configuration(format!(
                "grid shape {shape:?} has an empty axis at dimension {dim}"
            )));
        }
        Ok(Self { shape })
    }

    /// Grid extents.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of grid dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of grid positions.
    pub fn size(&self) -> usize {
        self.shape.iter().product()
    }

    /// Coordinate of grid rank `rank`.
    pub fn rank_to_coord(&self, rank: usize) -> Result<Vec<usize>> {
        let size = self.size();
        if rank >= size {
            return Err(Error::bounds("grid rank", rank, size));
        }

        let mut coord = vec![0; self.shape.len()];
        let mut rest = rank;
        for (c, &extent) in coord.iter_mut().zip(&self.shape).rev() {
            *c = rest % extent;
            rest /= extent;
        }
        Ok(coord)
    }

    /// Grid rank at `coord`.
    pub fn coord_to_rank(&self, coord: &[usize]) -> Result<usize> {
        if coord.len() != self.shape.len() {
            return Err(Error::bounds(
                "grid coordinate length",
                coord.len(),
                self.shape.len(),
            ));
        }

        let mut rank = 0;
        for (&c, &extent) in coord.iter().zip(&self.shape) {
            if c >= extent {
                return Err(Error::bounds("grid coordinate", c, extent));
            }
            rank = rank * extent + c;
        }
        Ok(rank)
    }

    /// Every coordinate, in rank order.
    pub fn coords(&self) -> impl Iterator<Item = Vec<usize>> + '_ {
        (0..self.size()).filter_map(move |rank| self.rank_to_coord(rank).ok())
    }
}

/// Split `total` processes over `parts` axes as evenly as possible.
///
/// Prime factors are handed out largest first to the axis with the smallest
/// product so far; the result is sorted in descending order.
pub fn balanced_factors(total: usize, parts: usize) -> Vec<usize> {
    if parts == 0 {
        return Vec::new();
    }

    let mut factors = prime_factors(total.max(1));
    factors.sort_unstable_by(|a, b| b.cmp(a));

    let mut axes = vec![1usize; parts];
    for f in factors {
        if let Some(smallest) = axes
            .iter_mut()
            .enumerate()
            .min_by_key(|(i, v)| (**v, *i))
            .map(|(_, v)| v)
        {
            *smallest *= f;
        }
    }
    axes.sort_unstable_by(|a, b| b.cmp(a));
    axes
}

fn prime_factors(mut n: usize) -> Vec<usize> {
    let mut factors = Vec::new();
    let mut p = 2;
    while p * p <= n {
        while n % p == 0 {
            factors.push(p);
            n /= p;
        }
        p += 1;
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}
