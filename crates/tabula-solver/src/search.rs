use num_traits::{One, Zero};
use tracing::debug;

use crate::rational::Int;
use crate::tableau::{Basis, Tableau};

/// Looks for an identity already present in the tableau.
///
/// A column qualifies when its reduced cost is zero and its constraint entries
/// are a single `1` with zeros elsewhere; it becomes the basic variable of the
/// row holding the `1`. When two columns claim the same row the lower index
/// wins. Returns `None` unless every constraint row is covered.
pub fn search_starting_basis<I: Int>(tableau: &Tableau<I>) -> Option<Basis> {
    let m = tableau.nr_rows();
    let mut slots: Vec<Option<usize>> = vec![None; m];

    for col in 1..=tableau.nr_columns() {
        if !tableau.reduced_cost(col).is_zero() {
            continue;
        }
        let Some(row) = unit_row(tableau, col) else {
            continue;
        };
        let slot = &mut slots[row - 1];
        if slot.is_none() {
            *slot = Some(col);
        }
    }

    let columns: Option<Vec<usize>> = slots.into_iter().collect();
    match columns {
        Some(columns) => {
            debug!(basis = ?columns, "found starting basis");
            Some(Basis::new(columns))
        }
        None => {
            debug!("no starting basis in tableau");
            None
        }
    }
}

/// Row of the single `1` in a column of zeros, if `col` is a unit column.
fn unit_row<I: Int>(tableau: &Tableau<I>, col: usize) -> Option<usize> {
    let mut found = None;
    for row in 1..=tableau.nr_rows() {
        let entry = tableau.get(row, col);
        if entry.is_zero() {
            continue;
        }
        if !entry.is_one() || found.is_some() {
            return None;
        }
        found = Some(row);
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tableau::tests::tableau;

    #[test]
    fn test_slack_basis() {
        let t = tableau(&[&[0, -4, -5, 0, 0], &[8, 2, 2, 1, 0], &[7, 1, 3, 0, 1]]);
        assert_eq!(search_starting_basis(&t), Some(Basis::new(vec![3, 4])));
    }

    #[test]
    fn test_basis_follows_row_of_unit_entry() {
        let t = tableau(&[&[0, 3, 4, 5, 0, 0], &[-6, -2, -2, -1, 0, 1], &[-5, -1, -2, -3, 1, 0]]);
        let basis = search_starting_basis(&t).unwrap();
        assert_eq!(basis, Basis::new(vec![5, 4]));
        assert!(t.is_canonical(&basis));
    }

    #[test]
    fn test_nonzero_reduced_cost_disqualifies() {
        let t = tableau(&[&[0, 1, 0], &[1, 1, 0], &[1, 0, 1]]);
        assert_eq!(search_starting_basis(&t), None);
    }

    #[test]
    fn test_fractional_entries_disqualify() {
        let t = tableau(&[&[0, 0, 0], &[1, 2, 1]]);
        assert_eq!(search_starting_basis(&t), Some(Basis::new(vec![2])));

        let t = tableau(&[&[0, 0], &[1, 2]]);
        assert_eq!(search_starting_basis(&t), None);
    }

    #[test]
    fn test_duplicate_unit_columns_keep_first() {
        let t = tableau(&[&[0, 0, 0], &[1, 1, 1]]);
        assert_eq!(search_starting_basis(&t), Some(Basis::new(vec![1])));
    }

    #[test]
    fn test_phase_one_problem_has_no_basis() {
        let t = tableau(&[&[0, 1, 1, 10], &[2, 0, 1, 4], &[2, -2, 1, -6]]);
        assert_eq!(search_starting_basis(&t), None);
    }
}
