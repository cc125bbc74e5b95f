//! Locality-preserving "keep together" balancing.
//!
//! Unlike greedy LPT, this balancer assigns *contiguous runs* of blocks (in
//! original sequence order) to each bin, so a bin's members always form an
//! unbroken index range. Downstream disjoint-column execution exploits that
//! locality; the price is a maximum bin load that may exceed what LPT
//! achieves.
//!
//! The cut points are chosen to minimize the maximum contiguous-run load:
//! binary search over the candidate capacity, with a linear greedy feasibility
//! check per probe (the standard approach to "partition an array into k
//! contiguous groups minimizing the maximum group sum"; a DP would also work
//! for these input sizes but costs O(k n^2)).

use std::ops::Range;

use hamplan_core::{Bin, BlockGroup};

use crate::balance::BalanceError;

/// Compute contiguous run boundaries over `loads` minimizing the maximum run
/// sum.
///
/// Returns at most `n_bins` half-open index ranges covering `0..loads.len()`
/// in order. Every range is non-empty; fewer than `n_bins` ranges come back
/// only when there are fewer blocks than bins.
pub fn contiguous_cuts(loads: &[u64], n_bins: usize) -> Result<Vec<Range<usize>>, BalanceError> {
    if n_bins == 0 {
        return Err(BalanceError::InvalidThreadCount);
    }
    let n = loads.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    let k = n_bins.min(n);
    let total: u64 = loads.iter().sum();
    let max_load = loads.iter().copied().max().unwrap_or(0);

    // Smallest capacity for which the greedy packing needs at most k runs.
    let mut lo = max_load.max(total.div_ceil(k as u64));
    let mut hi = total;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if runs_needed(loads, mid) <= k {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    let capacity = lo;

    // Reconstruct the cuts at that capacity. A cut is forced early when the
    // blocks left are exactly enough to keep the remaining bins non-empty.
    let mut ranges = Vec::with_capacity(k);
    let mut start = 0;
    let mut run_load = 0u64;
    let mut bin = 0;
    for (i, &load) in loads.iter().enumerate() {
        let bins_after = k - 1 - bin;
        if i > start && (run_load + load > capacity || n - i <= bins_after) {
            ranges.push(start..i);
            start = i;
            run_load = 0;
            bin += 1;
        }
        run_load += load;
    }
    ranges.push(start..n);
    Ok(ranges)
}

/// Number of runs a greedy left-to-right packing needs at the given capacity.
fn runs_needed(loads: &[u64], capacity: u64) -> usize {
    let mut runs = 1;
    let mut current = 0u64;
    for &load in loads {
        if current + load > capacity {
            runs += 1;
            current = load;
        } else {
            current += load;
        }
    }
    runs
}

/// Distribute a block group across `n_bins` bins, keeping each bin's blocks
/// contiguous in the original sequence order.
///
/// Bins are non-empty whenever `n_bins` does not exceed the number of blocks;
/// excess bins stay empty. The per-bin index ranges never overlap and their
/// union is the entire block sequence.
pub fn balance_contiguous(group: &BlockGroup, n_bins: usize) -> Result<Vec<Bin>, BalanceError> {
    let ranges = contiguous_cuts(&group.loads(), n_bins)?;

    let mut bins = Vec::with_capacity(n_bins);
    for (index, range) in ranges.iter().enumerate() {
        let blocks = group.blocks()[range.clone()].to_vec();
        bins.push(Bin::new(index, blocks));
    }
    for index in ranges.len()..n_bins {
        bins.push(Bin::empty(index));
    }
    Ok(bins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::group_with_loads;

    fn loads_of(bins: &[Bin]) -> Vec<u64> {
        bins.iter().map(Bin::load).collect()
    }

    #[test]
    fn test_zero_bins_rejected() {
        assert!(matches!(
            contiguous_cuts(&[1, 2], 0),
            Err(BalanceError::InvalidThreadCount)
        ));
    }

    #[test]
    fn test_single_bin() {
        let cuts = contiguous_cuts(&[4, 2, 7], 1).unwrap();
        assert_eq!(cuts, vec![0..3]);
    }

    #[test]
    fn test_uniform_loads_split_evenly() {
        let cuts = contiguous_cuts(&[10; 6], 3).unwrap();
        assert_eq!(cuts, vec![0..2, 2..4, 4..6]);
    }

    #[test]
    fn test_dominant_block_isolated() {
        // one huge block forces the capacity; the rest pack around it
        let cuts = contiguous_cuts(&[5, 1, 1], 3).unwrap();
        assert_eq!(cuts, vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn test_more_bins_than_blocks() {
        let group = group_with_loads(&[7, 3]);
        let bins = balance_contiguous(&group, 5).unwrap();
        assert_eq!(bins.len(), 5);
        assert_eq!(loads_of(&bins), vec![7, 3, 0, 0, 0]);
    }

    #[test]
    fn test_ranges_reconstruct_sequence() {
        let loads = [13, 2, 8, 8, 5, 21, 1, 1, 34, 9, 9, 4];
        for n_bins in 1..=8 {
            let cuts = contiguous_cuts(&loads, n_bins).unwrap();
            // ranges are ordered, non-empty, and tile 0..len exactly
            let mut expected_start = 0;
            for range in &cuts {
                assert_eq!(range.start, expected_start);
                assert!(range.end > range.start);
                expected_start = range.end;
            }
            assert_eq!(expected_start, loads.len());
            assert_eq!(cuts.len(), n_bins.min(loads.len()));
        }
    }

    #[test]
    fn test_load_conservation() {
        let group = group_with_loads(&[13, 2, 8, 8, 5, 21, 1, 1, 34]);
        for n_bins in 1..=9 {
            let bins = balance_contiguous(&group, n_bins).unwrap();
            let total: u64 = bins.iter().map(Bin::load).sum();
            assert_eq!(total, group.total_nnz());
        }
    }

    #[test]
    fn test_bin_blocks_contiguous() {
        let group = group_with_loads(&[6, 6, 1, 9, 2, 2, 8]);
        let bins = balance_contiguous(&group, 3).unwrap();
        let mut next_seq = 0;
        for bin in &bins {
            for seq in bin.seqs() {
                assert_eq!(seq, next_seq);
                next_seq += 1;
            }
        }
        assert_eq!(next_seq, group.len());
    }

    #[test]
    fn test_empty_group() {
        let group = group_with_loads(&[]);
        let bins = balance_contiguous(&group, 3).unwrap();
        assert_eq!(bins.len(), 3);
        assert!(bins.iter().all(Bin::is_empty));
    }

    #[test]
    fn test_determinism() {
        let loads = [13, 2, 8, 8, 5, 21, 1, 1, 34];
        let first = contiguous_cuts(&loads, 4).unwrap();
        for _ in 0..10 {
            assert_eq!(contiguous_cuts(&loads, 4).unwrap(), first);
        }
    }
}
