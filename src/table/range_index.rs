//! Ordered range lookup from canister key to subnet.
//!
//! # Design Decisions
//! - Built once per snapshot, validated at construction
//! - Lookup is an approximate lower bound; membership is a separate check
//! - Gaps between ranges are valid and mean "unassigned"

use crate::table::error::{TableError, TableResult};
use crate::table::types::{CanisterKey, SubnetId};

/// Sorted, non-overlapping canister key ranges mapped to subnets.
#[derive(Debug, Clone, Default)]
pub struct SubnetRangeIndex {
    starts: Vec<CanisterKey>,
    ends: Vec<CanisterKey>,
    subnets: Vec<SubnetId>,
}

impl SubnetRangeIndex {
    /// Build the index from the three parallel range columns.
    pub fn build(
        starts: Vec<CanisterKey>,
        ends: Vec<CanisterKey>,
        subnets: Vec<SubnetId>,
    ) -> TableResult<Self> {
        if starts.len() != ends.len() || starts.len() != subnets.len() {
            return Err(TableError::LengthMismatch {
                starts: starts.len(),
                ends: ends.len(),
                subnets: subnets.len(),
            });
        }

        for (i, (start, end)) in starts.iter().zip(&ends).enumerate() {
            if end < start {
                return Err(TableError::InvertedRange {
                    index: i,
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
            if let Some(next) = starts.get(i + 1) {
                if next <= start {
                    return Err(TableError::Unsorted {
                        index: i + 1,
                        key: next.to_string(),
                    });
                }
                if end >= next {
                    return Err(TableError::Overlap {
                        index: i,
                        end: end.to_string(),
                        next_start: next.to_string(),
                    });
                }
            }
        }

        Ok(Self {
            starts,
            ends,
            subnets,
        })
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Candidate range index for `key`.
    ///
    /// Finds the first start `>= key`. An exact match is returned as is,
    /// otherwise the range before it. The result is clamped to
    /// `[0, len - 1]`, and is 0 for an empty index. The candidate does not
    /// necessarily contain the key; see [`SubnetRangeIndex::contains`].
    pub fn lookup(&self, key: &CanisterKey) -> usize {
        let pos = self.starts.partition_point(|start| start < key);
        match self.starts.get(pos) {
            Some(start) if pos > 0 && key < start => pos - 1,
            _ => pos.min(self.len().saturating_sub(1)),
        }
    }

    /// Whether the range at `index` contains `key` (both bounds inclusive).
    pub fn contains(&self, index: usize, key: &CanisterKey) -> bool {
        match (self.starts.get(index), self.ends.get(index)) {
            (Some(start), Some(end)) => start <= key && key <= end,
            _ => false,
        }
    }

    /// Lookup followed by the containment check.
    pub fn find(&self, key: &CanisterKey) -> Option<(usize, &SubnetId)> {
        let index = self.lookup(key);
        if !self.contains(index, key) {
            return None;
        }
        self.subnets.get(index).map(|subnet| (index, subnet))
    }

    /// Subnet ids in range order, one entry per range.
    pub fn subnets(&self) -> &[SubnetId] {
        &self.subnets
    }
}
