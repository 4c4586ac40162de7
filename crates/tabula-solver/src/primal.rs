use tracing::{debug, info};

use crate::pivot::{Eliminate, pivot};
use crate::rational::{Int, Rational};
use crate::tableau::{Basis, Tableau};
use crate::trace::{Event, Observer, Outcome, Stage};

/// Terminal state of the primal or dual simplex method.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimplexStatus {
    Optimal,
    Unbounded,
}

impl From<SimplexStatus> for Outcome {
    fn from(status: SimplexStatus) -> Self {
        match status {
            SimplexStatus::Optimal => Outcome::Optimal,
            SimplexStatus::Unbounded => Outcome::Unbounded,
        }
    }
}

/// Optimality test: the first column with a negative reduced cost enters.
///
/// `None` means the tableau is optimal.
pub fn select_entering_column<I: Int>(tableau: &Tableau<I>) -> Option<usize> {
    (1..=tableau.nr_columns()).find(|&col| tableau.reduced_cost(col).is_negative())
}

/// Ratio test for entering column `h`, ties broken by Bland's rule.
///
/// Only rows with a strictly positive entry in `h` are candidates. Among rows
/// with the minimum ratio, the one whose basic variable has the smallest index
/// wins. `None` means the problem is unbounded along `h`.
pub fn select_pivot_row<I: Int>(tableau: &Tableau<I>, basis: &Basis, h: usize) -> Option<usize> {
    let mut best: Option<(usize, Rational<I>)> = None;

    for row in 1..=tableau.nr_rows() {
        let entry = tableau.get(row, h);
        if !entry.is_positive() {
            continue;
        }

        let ratio = tableau.rhs(row) / entry;
        let better = match &best {
            None => true,
            Some((best_row, min)) => {
                ratio < *min || (ratio == *min && basis.in_row(row) < basis.in_row(*best_row))
            }
        };
        if better {
            best = Some((row, ratio));
        }
    }

    best.map(|(row, _)| row)
}

/// Drives a primal-feasible tableau to optimality.
///
/// `basis` must be canonical for `tableau` and is updated with every pivot.
pub fn primal_simplex<I: Int>(
    tableau: &mut Tableau<I>,
    basis: &mut Basis,
    observer: &mut dyn Observer<I>,
) -> SimplexStatus {
    const STAGE: Stage = Stage::PrimalSimplex;
    observer.on_event(&Event::Started { stage: STAGE });

    let mut iteration = 0;
    let status = loop {
        debug_assert!(tableau.is_canonical(basis));
        observer.on_event(&Event::Iteration {
            stage: STAGE,
            iteration,
            tableau,
            basis,
        });

        let Some(h) = select_entering_column(tableau) else {
            break SimplexStatus::Optimal;
        };
        let Some(t) = select_pivot_row(tableau, basis, h) else {
            break SimplexStatus::Unbounded;
        };

        let leaving = basis.in_row(t);
        debug!(iteration, entering = h, leaving, element = %tableau.get(t, h), "primal pivot");
        observer.on_event(&Event::Pivot {
            stage: STAGE,
            entering: h,
            leaving,
            element: tableau.get(t, h),
        });

        pivot(tableau, h, t, Eliminate::All);
        basis.enter(t, h);
        iteration += 1;
    };

    finish(STAGE, status, tableau, observer);
    status
}

pub(crate) fn finish<I: Int>(
    stage: Stage,
    status: SimplexStatus,
    tableau: &Tableau<I>,
    observer: &mut dyn Observer<I>,
) {
    let objective = match status {
        SimplexStatus::Optimal => Some(tableau.objective_value()),
        SimplexStatus::Unbounded => None,
    };
    match &objective {
        Some(cost) => info!(%stage, %cost, "found an optimal solution"),
        None => info!(%stage, "problem is unbounded"),
    }
    observer.on_event(&Event::Finished {
        stage,
        outcome: status.into(),
        objective,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tableau::tests::{r, tableau};
    use crate::trace::{Recorder, Silent};

    #[test]
    fn test_entering_column_is_first_negative() {
        let t = tableau(&[&[0, 1, -2, -5, 0], &[1, 1, 1, 1, 1]]);
        assert_eq!(select_entering_column(&t), Some(2));

        let t = tableau(&[&[0, 1, 0, 2], &[1, 1, 1, 1]]);
        assert_eq!(select_entering_column(&t), None);
    }

    #[test]
    fn test_pivot_row_minimum_ratio() {
        let t = tableau(&[&[0, -1, 0, 0, 0], &[6, 3, 1, 0, 0], &[4, 1, 0, 1, 0], &[9, -1, 0, 0, 1]]);
        let basis = Basis::new(vec![2, 3, 4]);
        // Ratios 2 and 4; row 3 has a negative entry and is skipped.
        assert_eq!(select_pivot_row(&t, &basis, 1), Some(1));
    }

    #[test]
    fn test_pivot_row_blands_rule_tie_break() {
        let t = tableau(&[&[0, -1, 0, 0], &[2, 1, 1, 0], &[4, 2, 0, 1]]);
        // Both rows have ratio 2; row 2's basic variable has the smaller index.
        assert_eq!(select_pivot_row(&t, &Basis::new(vec![3, 2]), 1), Some(2));
        assert_eq!(select_pivot_row(&t, &Basis::new(vec![2, 3]), 1), Some(1));
    }

    #[test]
    fn test_pivot_row_never_selects_non_positive_entry() {
        let t = tableau(&[&[0, -1, 0, 0], &[0, 0, 1, 0], &[-3, -1, 0, 1]]);
        assert_eq!(select_pivot_row(&t, &Basis::new(vec![2, 3]), 1), None);
    }

    #[test]
    fn test_unbounded() {
        let mut t = tableau(&[&[0, -1, 0], &[1, -1, 1]]);
        let mut basis = Basis::new(vec![2]);
        let mut recorder = Recorder::new();

        assert_eq!(primal_simplex(&mut t, &mut basis, &mut recorder), SimplexStatus::Unbounded);
        assert!(recorder.pivots().is_empty());
        assert_eq!(basis, Basis::new(vec![2]));
    }

    #[test]
    fn test_optimal_integer_vertex() {
        // max 4x + 5y st 2x + 2y <= 8, x + 3y <= 7, 2x + y <= 5
        let mut t = tableau(&[
            &[0, -4, -5, 0, 0, 0],
            &[8, 2, 2, 1, 0, 0],
            &[7, 1, 3, 0, 1, 0],
            &[5, 2, 1, 0, 0, 1],
        ]);
        let mut basis = Basis::new(vec![3, 4, 5]);

        assert_eq!(primal_simplex(&mut t, &mut basis, &mut Silent), SimplexStatus::Optimal);
        assert_eq!(t.objective_value(), r(-77, 5));
        assert_eq!(t.basic_solution(&basis)[..2], [r(8, 5), r(9, 5)]);
        assert!(t.is_canonical(&basis));
    }
}
