//! Full-pipeline tests: extraction through schedule emission.

use hamplan_algo::{build_plan, split_coupling, BalanceStrategy};
use hamplan_core::{ScheduleEntry, SparseOperator};
use num_complex::Complex64;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// Deterministic synthetic Hamiltonian: `n_blocks` diagonal blocks of
/// `block_rows` rows each, with a band of couplings above the diagonal.
fn synthetic_system(
    n_blocks: usize,
    block_rows: usize,
) -> (SparseOperator, SparseOperator, Vec<usize>) {
    let n = n_blocks * block_rows;
    let potential = SparseOperator::from_triplets(
        n,
        &(0..n).map(|i| (i, i, c(0.25 * i as f64, 0.0))).collect::<Vec<_>>(),
    )
    .unwrap();

    let mut entries = Vec::new();
    for i in 0..n {
        // block-local couplings: stay within the block's rows, upper triangle
        let block = i / block_rows;
        let block_end = (block + 1) * block_rows;
        for j in (i + 1)..block_end.min(i + 3) {
            entries.push((i, j, c(1.0, 0.5 * (i % 3) as f64)));
        }
        // give later blocks heavier off-block columns to skew the loads
        if block % 2 == 0 && i + block_rows < n {
            entries.push((i, i + block_rows, c(0.1, 0.0)));
        }
    }
    let coupling = SparseOperator::from_triplets(n, &entries).unwrap();
    (potential, coupling, vec![block_rows; n_blocks])
}

#[test]
fn plan_covers_all_roles_once_per_row() {
    let (potential, coupling, sizes) = synthetic_system(8, 4);
    for strategy in [BalanceStrategy::Lpt, BalanceStrategy::Contiguous] {
        let plan = build_plan(&potential, &coupling, &sizes, 4, strategy).unwrap();
        assert_eq!(plan.operators().len(), 20);
        assert!(plan.validate());
        for column in 1..=5u32 {
            let rows: Vec<u32> = plan
                .operators()
                .iter()
                .filter(|s| s.entry.column() == column)
                .map(|s| s.entry.row())
                .collect();
            assert_eq!(rows, vec![1, 2, 3, 4]);
        }
    }
}

#[test]
fn plan_potential_partitions_are_column_disjoint() {
    let (potential, coupling, sizes) = synthetic_system(6, 5);
    let plan = build_plan(&potential, &coupling, &sizes, 4, BalanceStrategy::Lpt).unwrap();

    let mut seen = vec![false; potential.dim()];
    for scheduled in plan.operators().iter().filter(|s| s.entry.column() == 1) {
        for (i, j, _) in scheduled.operator.iter() {
            assert_eq!(i, j);
            assert!(!seen[j]);
            seen[j] = true;
        }
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
fn plan_forward_operators_reconstruct_coupling() {
    let (potential, coupling, sizes) = synthetic_system(8, 4);
    let plan = build_plan(&potential, &coupling, &sizes, 3, BalanceStrategy::Contiguous).unwrap();

    let mut sum = SparseOperator::empty(coupling.dim());
    for scheduled in plan
        .operators()
        .iter()
        .filter(|s| s.entry.column() == 2 || s.entry.column() == 3)
    {
        sum = sum.add(&scheduled.operator).unwrap();
    }
    for (i, j, v) in coupling.iter() {
        assert_eq!(sum.get(i, j), v);
    }
    assert_eq!(sum.nnz(), coupling.nnz());
}

#[test]
fn plan_descriptors_round_trip() {
    let (potential, coupling, sizes) = synthetic_system(5, 3);
    let plan = build_plan(&potential, &coupling, &sizes, 5, BalanceStrategy::Lpt).unwrap();
    for (line, scheduled) in plan.descriptor_lines().iter().zip(plan.operators()) {
        let parsed: ScheduleEntry = line.parse().unwrap();
        assert_eq!(parsed, scheduled.entry);
        assert_eq!(parsed.total_threads(), 5);
    }
}

#[test]
fn group_coverage_has_no_gaps() {
    let (_, coupling, sizes) = synthetic_system(7, 4);
    let (group_a, group_b) = split_coupling(&coupling, &sizes).unwrap();

    let mut ranges: Vec<_> = group_a
        .iter()
        .chain(group_b.iter())
        .map(|b| b.row_range())
        .collect();
    ranges.sort_by_key(|r| r.start);
    let mut expected = 0;
    for range in ranges {
        assert_eq!(range.start, expected);
        expected = range.end;
    }
    assert_eq!(expected, coupling.dim());
}
