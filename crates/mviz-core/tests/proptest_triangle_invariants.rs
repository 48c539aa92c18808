//! Property-based invariant tests for the combinatorial model.
//!
//! ## Invariants
//!
//! 1. Edges are 1 and interior entries follow the Pascal recurrence.
//! 2. Each row sums to 2^r.
//! 3. `step_to_cell` agrees with the forward row-major enumeration.
//! 4. `cell_to_step` is the exact inverse of `step_to_cell`.
//! 5. Out-of-range steps are rejected, never mapped.

use mviz_core::{Cell, RowCount, Triangle, cell_to_step, cells, step_to_cell, total_steps};
use proptest::prelude::*;

fn arb_rows() -> impl Strategy<Value = usize> {
    1usize..=RowCount::MAX_SUPPORTED
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn pascal_identity_holds(n in arb_rows()) {
        let t = Triangle::build(RowCount::new(n).unwrap());
        prop_assert_eq!(t.len(), n);
        for r in 0..n {
            let row = t.row(r).unwrap();
            prop_assert_eq!(row.len(), r + 1);
            prop_assert_eq!(row[0], 1);
            prop_assert_eq!(row[r], 1);
            for c in 1..r {
                let above = t.row(r - 1).unwrap();
                prop_assert_eq!(row[c], above[c - 1] + above[c]);
            }
        }
    }

    #[test]
    fn rows_sum_to_powers_of_two(n in 1usize..=60) {
        let t = Triangle::build(RowCount::new(n).unwrap());
        for (r, row) in t.rows().enumerate() {
            let sum: u128 = row.iter().map(|&v| u128::from(v)).sum();
            prop_assert_eq!(sum, 1u128 << r);
        }
    }

    #[test]
    fn step_mapping_matches_enumeration(n in arb_rows()) {
        for (step, cell) in cells(n).enumerate() {
            prop_assert_eq!(step_to_cell(step, n), Ok(cell));
            prop_assert_eq!(cell_to_step(cell), step);
        }
        prop_assert_eq!(cells(n).count(), total_steps(n));
        prop_assert_eq!(step_to_cell(0, n), Ok(Cell::new(0, 0)));
        prop_assert_eq!(step_to_cell(total_steps(n) - 1, n), Ok(Cell::new(n - 1, n - 1)));
    }

    #[test]
    fn out_of_range_steps_fail(n in arb_rows(), extra in 0usize..1000) {
        let step = total_steps(n) + extra;
        prop_assert!(step_to_cell(step, n).is_err());
    }

    #[test]
    fn addition_matches_parents(n in 3usize..=RowCount::MAX_SUPPORTED, seed in any::<u64>()) {
        let t = Triangle::build(RowCount::new(n).unwrap());
        let row = 2 + (seed as usize) % (n - 2);
        let col = 1 + (seed as usize / 7) % (row - 1);
        let add = t.addition(Cell::new(row, col)).unwrap();
        prop_assert_eq!(add.left + add.right, add.value);
        prop_assert_eq!(Some(add.value), t.get(Cell::new(row, col)));
    }
}
