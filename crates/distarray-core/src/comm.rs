//! Process-group context consumed by the distribution model.
//!
//! The core only ever asks a communicator for the calling process's rank
//! and the group size. Messaging lives elsewhere.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Read-only view of a process group.
pub trait CommContext {
    /// Rank of the calling process within the group.
    fn rank(&self) -> usize;

    /// Number of processes in the group.
    fn size(&self) -> usize;
}

/// A fixed rank/size snapshot of a process group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedComm {
    rank: usize,
    size: usize,
}

impl FixedComm {
    /// Create a snapshot for `rank` in a group of `size` processes.
    pub fn new(rank: usize, size: usize) -> Result<Self> {
        if rank >= size {
            return Err(Error::bounds("rank", rank, size));
        }
        Ok(Self { rank, size })
    }

    /// Snapshot for rank 0 of a group of `size`.
    ///
    /// An empty group is kept as is; building a distribution over it fails.
    pub fn root(size: usize) -> Self {
        Self { rank: 0, size }
    }

    /// Same group, viewed from another rank.
    pub fn with_rank(&self, rank: usize) -> Result<Self> {
        Self::new(rank, self.size)
    }
}

impl CommContext for FixedComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }
}

impl<C: CommContext + ?Sized> CommContext for &C {
    fn rank(&self) -> usize {
        (**self).rank()
    }

    fn size(&self) -> usize {
        (**self).size()
    }
}
