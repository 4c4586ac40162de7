use num_traits::{One, Zero};
use tracing::{info, warn};

use crate::error::SolveError;
use crate::pivot::{Eliminate, pivot};
use crate::primal::{SimplexStatus, primal_simplex};
use crate::rational::{Int, Rational};
use crate::tableau::{Basis, Tableau};
use crate::trace::{Event, Observer, Outcome, Stage};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feasibility {
    Feasible,
    Infeasible,
}

impl From<Feasibility> for Outcome {
    fn from(feasibility: Feasibility) -> Self {
        match feasibility {
            Feasibility::Feasible => Outcome::Feasible,
            Feasibility::Infeasible => Outcome::Infeasible,
        }
    }
}

/// Finds a feasible basis by minimizing the sum of one artificial variable
/// per constraint row.
///
/// On `Feasible` the constraint rows of `tableau` hold the solved phase-one
/// rows, row 0 is expressed in the nonbasic variables and `basis` is ready for
/// [`primal_simplex`]. On `Infeasible` both are left as they were.
pub fn phase_one<I: Int>(
    tableau: &mut Tableau<I>,
    basis: &mut Basis,
    observer: &mut dyn Observer<I>,
) -> Result<Feasibility, SolveError> {
    const STAGE: Stage = Stage::PhaseOne;
    observer.on_event(&Event::Started { stage: STAGE });

    let n = tableau.nr_columns();
    let m = tableau.nr_rows();
    let mut artificial = artificial_tableau(tableau)?;

    for row in 1..=m {
        pivot(&mut artificial, n + row, row, Eliminate::Row(0));
    }
    let mut artificial_basis = Basis::new((n + 1..=n + m).collect());

    let status = primal_simplex(&mut artificial, &mut artificial_basis, observer);
    let residual = artificial.objective_value();
    if status == SimplexStatus::Unbounded || !residual.is_zero() {
        info!(%residual, "phase one: problem is infeasible");
        observer.on_event(&Event::Finished {
            stage: STAGE,
            outcome: Outcome::Infeasible,
            objective: None,
        });
        return Ok(Feasibility::Infeasible);
    }

    drive_out_artificials(&mut artificial, &mut artificial_basis, n, observer)?;

    for row in 1..=m {
        tableau.row_mut(row).clone_from_slice(&artificial.row(row)[..=n]);
    }
    for row in 1..=m {
        pivot(tableau, artificial_basis.in_row(row), row, Eliminate::Row(0));
    }
    *basis = artificial_basis;

    let objective = tableau.objective_value();
    info!(basis = ?basis.as_slice(), %objective, "phase one: found a feasible basis");
    observer.on_event(&Event::Finished {
        stage: STAGE,
        outcome: Outcome::Feasible,
        objective: Some(objective),
    });
    Ok(Feasibility::Feasible)
}

/// Original rows plus an identity block, with the artificial objective in row 0.
///
/// Rows with a negative right-hand side are negated so the artificial basis
/// starts out feasible.
fn artificial_tableau<I: Int>(tableau: &Tableau<I>) -> Result<Tableau<I>, SolveError> {
    let n = tableau.nr_columns();
    let m = tableau.nr_rows();
    let width = n + m + 1;

    let mut coefficients = Vec::new();
    coefficients
        .try_reserve_exact((m + 1) * width)
        .map_err(|_| SolveError::Allocation { rows: m + 1, cols: width })?;

    coefficients.extend((0..=n).map(|_| Rational::zero()));
    coefficients.extend((0..m).map(|_| Rational::one()));

    for row in 1..=m {
        let flip = tableau.rhs(row).is_negative();
        coefficients.extend(
            tableau
                .row(row)
                .iter()
                .map(|entry| if flip { -entry } else { entry.clone() }),
        );
        coefficients.extend((1..=m).map(|k| if k == row { Rational::one() } else { Rational::zero() }));
    }

    Tableau::new(m + 1, width, coefficients)
}

/// Swaps artificial variables left basic at zero level for original columns.
fn drive_out_artificials<I: Int>(
    artificial: &mut Tableau<I>,
    basis: &mut Basis,
    n: usize,
    observer: &mut dyn Observer<I>,
) -> Result<(), SolveError> {
    for row in 1..=artificial.nr_rows() {
        let basic = basis.in_row(row);
        if basic <= n {
            continue;
        }

        let Some(entering) = (1..=n).find(|&col| !artificial.get(row, col).is_zero()) else {
            warn!(row, "constraint row is linearly dependent on the others");
            return Err(SolveError::NotFullRank { row });
        };

        warn!(row, artificial = basic, entering, "artificial variable basic at zero level");
        observer.on_event(&Event::Degeneracy {
            row,
            artificial: basic,
            entering,
        });
        pivot(artificial, entering, row, Eliminate::All);
        basis.enter(row, entering);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tableau::tests::{r, tableau};
    use crate::trace::{Record, Recorder, Silent};

    #[test]
    fn test_feasible_then_optimal() {
        let mut t = tableau(&[&[0, 1, 1, 10], &[2, 0, 1, 4], &[2, -2, 1, -6]]);
        let mut basis = Basis::default();

        assert_eq!(phase_one(&mut t, &mut basis, &mut Silent), Ok(Feasibility::Feasible));
        assert_eq!(basis, Basis::new(vec![2, 1]));
        assert_eq!(t, tableau(&[&[-2, 0, 0, 1], &[2, 0, 1, 4], &[0, 1, 0, 5]]));
        assert!(t.is_canonical(&basis));

        let mut recorder = Recorder::new();
        assert_eq!(primal_simplex(&mut t, &mut basis, &mut recorder), SimplexStatus::Optimal);
        assert_eq!(t.objective_value(), r(2, 1));
        assert!(recorder.pivots().is_empty());
    }

    #[test]
    fn test_three_rows() {
        let mut t = tableau(&[&[0, 1, 1, 2, 4], &[1, 0, 2, 0, -3], &[0, 1, 0, 0, -1], &[1, -1, 0, 1, 0]]);
        let mut basis = Basis::default();

        assert_eq!(phase_one(&mut t, &mut basis, &mut Silent), Ok(Feasibility::Feasible));
        assert_eq!(basis, Basis::new(vec![2, 1, 3]));

        assert_eq!(primal_simplex(&mut t, &mut basis, &mut Silent), SimplexStatus::Optimal);
        assert_eq!(t.objective_value(), r(5, 2));
    }

    #[test]
    fn test_infeasible_leaves_tableau() {
        let mut t = tableau(&[&[0, 1, 1], &[1, 1, 1], &[2, 1, 1]]);
        let before = t.clone();
        let mut basis = Basis::default();
        let mut recorder = Recorder::new();

        assert_eq!(phase_one(&mut t, &mut basis, &mut recorder), Ok(Feasibility::Infeasible));
        assert_eq!(t, before);
        assert!(basis.is_empty());
        assert_eq!(
            recorder.records.last(),
            Some(&Record::Finished(Stage::PhaseOne, Outcome::Infeasible, None))
        );
    }

    #[test]
    fn test_dependent_row_is_not_full_rank() {
        let mut t = tableau(&[&[0, 1, 1], &[1, 1, 1], &[2, 2, 2]]);
        let mut basis = Basis::default();
        assert_eq!(
            phase_one(&mut t, &mut basis, &mut Silent),
            Err(SolveError::NotFullRank { row: 2 })
        );
    }

    #[test]
    fn test_degenerate_artificial_is_driven_out() {
        let mut t = tableau(&[&[0, 2, 1], &[1, 1, 2], &[2, 2, -1]]);
        let mut basis = Basis::default();
        let mut recorder = Recorder::new();

        assert_eq!(phase_one(&mut t, &mut basis, &mut recorder), Ok(Feasibility::Feasible));
        assert!(recorder.records.contains(&Record::Degeneracy {
            row: 2,
            artificial: 4,
            entering: 2,
        }));
        assert_eq!(basis, Basis::new(vec![1, 2]));
        assert_eq!(t, tableau(&[&[-2, 0, 0], &[1, 1, 0], &[0, 0, 1]]));
    }

    #[test]
    fn test_negative_rhs_row_is_negated() {
        // x1 + x2 = 2 written as -x1 - x2 = -2.
        let mut t = tableau(&[&[0, 1, 2], &[-2, -1, -1]]);
        let mut basis = Basis::default();

        assert_eq!(phase_one(&mut t, &mut basis, &mut Silent), Ok(Feasibility::Feasible));
        assert_eq!(basis, Basis::new(vec![1]));
        assert_eq!(t, tableau(&[&[-2, 0, 1], &[2, 1, 1]]));
    }
}
