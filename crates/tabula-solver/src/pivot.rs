use num_traits::Zero;

use crate::rational::{Int, Rational};
use crate::tableau::Tableau;

/// Rows a pivot eliminates the entering column from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eliminate {
    /// Every row other than the pivot row, objective row included.
    All,
    /// Only the given row; used to canonicalize one row at a time.
    Row(usize),
}

/// Gauss-Jordan step on entry `[t, h]`.
///
/// Row `t` is scaled so the pivot element becomes `1`, then `h` is eliminated
/// from the rows selected by `eliminate`. The caller must pick a nonzero pivot
/// element and is responsible for updating the basis.
pub fn pivot<I: Int>(tableau: &mut Tableau<I>, h: usize, t: usize, eliminate: Eliminate) {
    let element = tableau.get(t, h).clone();
    debug_assert!(!element.is_zero(), "pivot on zero element at [{t}, {h}]");

    for entry in tableau.row_mut(t) {
        *entry = &*entry / &element;
    }
    let pivot_row: Vec<Rational<I>> = tableau.row(t).to_vec();
    let last_row = tableau.nr_rows();

    let mut eliminate_from = |row: usize| {
        let factor = tableau.get(row, h).clone();
        if row == t || factor.is_zero() {
            return;
        }
        for (entry, scaled) in tableau.row_mut(row).iter_mut().zip(&pivot_row) {
            *entry = &*entry - &(&factor * scaled);
        }
    };

    match eliminate {
        Eliminate::All => (0..=last_row).for_each(&mut eliminate_from),
        Eliminate::Row(row) => eliminate_from(row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tableau::tests::{r, tableau};

    #[test]
    fn test_full_pivot_makes_unit_column() {
        let mut t = tableau(&[&[0, 3, 4, 5, 0, 0], &[-6, -2, -2, -1, 1, 0], &[-5, -1, -2, -3, 0, 1]]);
        pivot(&mut t, 1, 1, Eliminate::All);

        assert_eq!(*t.get(1, 1), r(1, 1));
        assert_eq!(*t.get(0, 1), r(0, 1));
        assert_eq!(*t.get(2, 1), r(0, 1));
        assert_eq!(t.row(1).to_vec(), vec![r(3, 1), r(1, 1), r(1, 1), r(1, 2), r(-1, 2), r(0, 1)]);
        assert_eq!(t.row(0).to_vec(), vec![r(-9, 1), r(0, 1), r(1, 1), r(7, 2), r(3, 2), r(0, 1)]);
    }

    #[test]
    fn test_single_row_pivot_leaves_other_rows() {
        let mut t = tableau(&[&[0, 0, 1, 1], &[2, 1, 1, 0], &[3, 2, 0, 1]]);
        pivot(&mut t, 2, 1, Eliminate::Row(0));

        assert_eq!(t.row(0).to_vec(), vec![r(-2, 1), r(-1, 1), r(0, 1), r(1, 1)]);
        assert_eq!(t.row(2).to_vec(), vec![r(3, 1), r(2, 1), r(0, 1), r(1, 1)]);
    }

    #[test]
    fn test_single_row_pivot_on_own_row_only_scales() {
        let mut t = tableau(&[&[0, 1, 1], &[4, 2, 1]]);
        pivot(&mut t, 1, 1, Eliminate::Row(1));
        assert_eq!(t.row(1).to_vec(), vec![r(2, 1), r(1, 1), r(1, 2)]);
        assert_eq!(t.row(0).to_vec(), vec![r(0, 1), r(1, 1), r(1, 1)]);
    }

    #[test]
    fn test_repeated_pivot_is_noop_when_canonical() {
        let mut t = tableau(&[&[0, 3, 4, 5, 0, 0], &[-6, -2, -2, -1, 1, 0], &[-5, -1, -2, -3, 0, 1]]);
        pivot(&mut t, 1, 1, Eliminate::All);
        let once = t.clone();
        pivot(&mut t, 1, 1, Eliminate::All);
        assert_eq!(t, once);
    }
}
