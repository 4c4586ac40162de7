use num_traits::One;
use tracing::{debug, info};

use crate::dual::dual_simplex;
use crate::error::SolveError;
use crate::primal::{SimplexStatus, primal_simplex};
use crate::rational::{Int, Rational};
use crate::search::search_starting_basis;
use crate::tableau::{Basis, Tableau};
use crate::trace::{Event, Observer, Outcome, Stage};
use crate::two_phase::{Feasibility, phase_one};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerStatus {
    Optimal,
    Unbounded,
    Infeasible,
}

impl From<IntegerStatus> for Outcome {
    fn from(status: IntegerStatus) -> Self {
        match status {
            IntegerStatus::Optimal => Outcome::Optimal,
            IntegerStatus::Unbounded => Outcome::Unbounded,
            IntegerStatus::Infeasible => Outcome::Infeasible,
        }
    }
}

/// First constraint row whose basic value is fractional.
pub fn check_integrality<I: Int>(tableau: &Tableau<I>) -> Option<usize> {
    (1..=tableau.nr_rows()).find(|&row| !tableau.rhs(row).is_integer())
}

/// Appends the Gomory fractional cut derived from row `source`.
///
/// The new row holds `-fract(a_source_j)` for every old column and a `1` in
/// the new slack column, which becomes its basic variable.
pub fn add_gomory_cut<I: Int>(
    tableau: &mut Tableau<I>,
    basis: &mut Basis,
    source: usize,
) -> Result<(), SolveError> {
    let cut: Vec<Rational<I>> = tableau.row(source).iter().map(|entry| -entry.fract()).collect();

    tableau.augment()?;
    let row = tableau.nr_rows();
    let slack = tableau.nr_columns();
    for (col, value) in cut.into_iter().enumerate() {
        tableau.set(row, col, value);
    }
    tableau.set(row, slack, Rational::one());
    basis.push(slack);
    Ok(())
}

/// Solves the problem in `tableau` over the integers.
///
/// A starting basis is searched for in the tableau, falling back to
/// [`phase_one`]. The LP relaxation is then solved and Gomory cuts are added,
/// each followed by a dual simplex run, until every basic value is integral.
pub fn cutting_plane<I: Int>(
    tableau: &mut Tableau<I>,
    basis: &mut Basis,
    observer: &mut dyn Observer<I>,
) -> Result<IntegerStatus, SolveError> {
    const STAGE: Stage = Stage::CuttingPlane;
    observer.on_event(&Event::Started { stage: STAGE });

    let status = run(tableau, basis, observer)?;
    let objective = match status {
        IntegerStatus::Optimal => Some(tableau.objective_value()),
        _ => None,
    };
    info!(?status, "cutting plane finished");
    observer.on_event(&Event::Finished {
        stage: STAGE,
        outcome: status.into(),
        objective,
    });
    Ok(status)
}

fn run<I: Int>(
    tableau: &mut Tableau<I>,
    basis: &mut Basis,
    observer: &mut dyn Observer<I>,
) -> Result<IntegerStatus, SolveError> {
    match search_starting_basis(tableau) {
        Some(found) => *basis = found,
        None => {
            if phase_one(tableau, basis, observer)? == Feasibility::Infeasible {
                return Ok(IntegerStatus::Infeasible);
            }
        }
    }

    if primal_simplex(tableau, basis, observer) == SimplexStatus::Unbounded {
        return Ok(IntegerStatus::Unbounded);
    }

    let mut round = 0;
    while let Some(source) = check_integrality(tableau) {
        round += 1;
        debug!(round, source, value = %tableau.rhs(source), "adding Gomory cut");
        observer.on_event(&Event::Cut {
            round,
            source_row: source,
        });
        add_gomory_cut(tableau, basis, source)?;

        if dual_simplex(tableau, basis, observer) == SimplexStatus::Unbounded {
            return Ok(IntegerStatus::Infeasible);
        }
    }
    Ok(IntegerStatus::Optimal)
}
