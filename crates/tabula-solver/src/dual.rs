use tracing::debug;

use crate::pivot::{Eliminate, pivot};
use crate::primal::{SimplexStatus, finish};
use crate::rational::{Int, Rational};
use crate::tableau::{Basis, Tableau};
use crate::trace::{Event, Observer, Stage};

/// Picks the row with a negative right-hand side whose basic variable has the
/// smallest index. `None` means the tableau is primal feasible, hence optimal.
pub fn select_leaving_row<I: Int>(tableau: &Tableau<I>, basis: &Basis) -> Option<usize> {
    (1..=tableau.nr_rows())
        .filter(|&row| tableau.rhs(row).is_negative())
        .min_by_key(|&row| basis.in_row(row))
}

/// Dual ratio test on row `t`: among negative entries, the column minimizing
/// `|c_j / a_tj|` enters. The first column found wins a tie.
pub fn select_entering_column_dual<I: Int>(tableau: &Tableau<I>, t: usize) -> Option<usize> {
    let mut best: Option<(usize, Rational<I>)> = None;

    for col in 1..=tableau.nr_columns() {
        let entry = tableau.get(t, col);
        if !entry.is_negative() {
            continue;
        }
        let ratio = (tableau.reduced_cost(col) / entry).abs();
        if best.as_ref().is_none_or(|(_, min)| ratio < *min) {
            best = Some((col, ratio));
        }
    }

    best.map(|(col, _)| col)
}

/// Drives a dual-feasible tableau (all reduced costs non-negative) to primal
/// feasibility.
///
/// `Unbounded` means the dual is unbounded, so the primal has no feasible
/// point.
pub fn dual_simplex<I: Int>(
    tableau: &mut Tableau<I>,
    basis: &mut Basis,
    observer: &mut dyn Observer<I>,
) -> SimplexStatus {
    const STAGE: Stage = Stage::DualSimplex;
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

        let Some(t) = select_leaving_row(tableau, basis) else {
            break SimplexStatus::Optimal;
        };
        let Some(h) = select_entering_column_dual(tableau, t) else {
            break SimplexStatus::Unbounded;
        };

        let leaving = basis.in_row(t);
        debug!(iteration, entering = h, leaving, element = %tableau.get(t, h), "dual pivot");
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tableau::tests::{r, tableau};
    use crate::trace::{Record, Recorder};

    fn scenario() -> Tableau {
        tableau(&[&[0, 3, 4, 5, 0, 0], &[-6, -2, -2, -1, 1, 0], &[-5, -1, -2, -3, 0, 1]])
    }

    #[test]
    fn test_leaving_row_smallest_basic_index() {
        let t = scenario();
        assert_eq!(select_leaving_row(&t, &Basis::new(vec![4, 5])), Some(1));
        assert_eq!(select_leaving_row(&t, &Basis::new(vec![5, 4])), Some(2));
    }

    #[test]
    fn test_entering_column_minimum_ratio() {
        let t = scenario();
        // Ratios 3/2, 2 and 5 on row 1.
        assert_eq!(select_entering_column_dual(&t, 1), Some(1));
    }

    #[test]
    fn test_entering_column_first_found_on_tie() {
        let t = tableau(&[&[0, 2, 1, 0], &[-1, -2, -1, 1]]);
        assert_eq!(select_entering_column_dual(&t, 1), Some(1));
    }

    #[test]
    fn test_optimal() {
        let mut t = scenario();
        let mut basis = Basis::new(vec![4, 5]);
        let mut recorder = Recorder::new();

        assert_eq!(dual_simplex(&mut t, &mut basis, &mut recorder), SimplexStatus::Optimal);
        assert_eq!(t.objective_value(), r(11, 1));
        assert_eq!(basis, Basis::new(vec![1, 2]));
        assert_eq!(
            recorder.pivots(),
            vec![(Stage::DualSimplex, 1, 4), (Stage::DualSimplex, 2, 5)]
        );

        let elements: Vec<_> = recorder
            .records
            .iter()
            .filter_map(|record| match record {
                Record::Pivot { element, .. } => Some(element.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(elements, vec![r(-2, 1), r(-1, 1)]);

        assert_eq!(t.row(0).to_vec(), vec![r(-11, 1), r(0, 1), r(0, 1), r(1, 1), r(1, 1), r(1, 1)]);
        assert_eq!(t.row(1).to_vec(), vec![r(1, 1), r(1, 1), r(0, 1), r(-2, 1), r(-1, 1), r(1, 1)]);
        assert_eq!(t.row(2).to_vec(), vec![r(2, 1), r(0, 1), r(1, 1), r(5, 2), r(1, 2), r(-1, 1)]);
    }

    #[test]
    fn test_single_pivot() {
        let mut t = tableau(&[&[0, 2, 1, 0], &[-1, -1, -1, 1]]);
        let mut basis = Basis::new(vec![3]);
        let mut recorder = Recorder::new();

        assert_eq!(dual_simplex(&mut t, &mut basis, &mut recorder), SimplexStatus::Optimal);
        assert_eq!(recorder.pivots(), vec![(Stage::DualSimplex, 2, 3)]);
        assert_eq!(t.objective_value(), r(1, 1));
    }

    #[test]
    fn test_unbounded_dual() {
        let mut t = tableau(&[&[0, 1, 0], &[-1, 1, 1]]);
        let mut basis = Basis::new(vec![2]);
        assert_eq!(
            dual_simplex(&mut t, &mut basis, &mut Recorder::new()),
            SimplexStatus::Unbounded
        );
    }

    #[test]
    fn test_already_feasible_is_optimal() {
        let mut t = tableau(&[&[0, 1, 0], &[3, 1, 1]]);
        let mut basis = Basis::new(vec![2]);
        let mut recorder = Recorder::new();
        assert_eq!(dual_simplex(&mut t, &mut basis, &mut recorder), SimplexStatus::Optimal);
        assert!(recorder.pivots().is_empty());
    }
}
