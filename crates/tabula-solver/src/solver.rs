use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::info;

use crate::cutting_plane::{IntegerStatus, cutting_plane};
use crate::dual::dual_simplex;
use crate::error::SolveError;
use crate::primal::{SimplexStatus, primal_simplex};
use crate::rational::Int;
use crate::search::search_starting_basis;
use crate::solution::Solution;
use crate::tableau::{Basis, Tableau};
use crate::trace::{Observer, Silent};
use crate::two_phase::{Feasibility, phase_one};

/// Algorithm run by a [`Solver`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    /// Primal simplex from an identity found in (or supplied for) the tableau
    #[default]
    Simplex,
    /// Phase one for a feasible basis, then primal simplex
    TwoPhase,
    /// Dual simplex from an identity found in (or supplied for) the tableau
    DualSimplex,
    /// Gomory cutting planes for an all-integer optimum
    CuttingPlane,
}

impl Method {
    pub fn code(&self) -> &'static str {
        match self {
            Method::Simplex => "S",
            Method::TwoPhase => "TPS",
            Method::DualSimplex => "DS",
            Method::CuttingPlane => "CP",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown method '{0}' (expected S, TPS, DS or CP)")]
pub struct ParseMethodError(String);

impl FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "simplex" => Ok(Method::Simplex),
            "tps" | "two-phase" | "two_phase" | "twophase" => Ok(Method::TwoPhase),
            "ds" | "dual" | "dual-simplex" | "dual_simplex" => Ok(Method::DualSimplex),
            "cp" | "cutting-plane" | "cutting_plane" | "gomory" => Ok(Method::CuttingPlane),
            _ => Err(ParseMethodError(s.to_string())),
        }
    }
}

/// Runs one of the tableau algorithms and packages the outcome.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    method: Method,
    /// Starting basis for `Simplex` and `DualSimplex`; searched for when absent
    basis: Option<Basis>,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_basis(mut self, basis: Basis) -> Self {
        self.basis = Some(basis);
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Solve the tableau in place
    pub fn solve<I: Int>(&self, tableau: &mut Tableau<I>) -> Result<Solution<I>, SolveError> {
        self.solve_observed(tableau, &mut Silent)
    }

    /// Solve the tableau in place, reporting every step to `observer`
    pub fn solve_observed<I: Int>(
        &self,
        tableau: &mut Tableau<I>,
        observer: &mut dyn Observer<I>,
    ) -> Result<Solution<I>, SolveError> {
        let columns = tableau.nr_columns();
        let rows = tableau.nr_rows();
        info!(method = %self.method, rows, columns, "solving");

        match self.method {
            Method::Simplex => {
                let mut basis = self.starting_basis(tableau)?;
                Ok(simplex_solution(
                    primal_simplex(tableau, &mut basis, observer),
                    tableau,
                    basis,
                    columns,
                ))
            }
            Method::DualSimplex => {
                let mut basis = self.starting_basis(tableau)?;
                match dual_simplex(tableau, &mut basis, observer) {
                    SimplexStatus::Optimal => Ok(Solution::optimal(tableau, basis, columns, 0)),
                    SimplexStatus::Unbounded => Ok(Solution::infeasible(0)),
                }
            }
            Method::TwoPhase => {
                let mut basis = Basis::default();
                if phase_one(tableau, &mut basis, observer)? == Feasibility::Infeasible {
                    return Ok(Solution::infeasible(0));
                }
                Ok(simplex_solution(
                    primal_simplex(tableau, &mut basis, observer),
                    tableau,
                    basis,
                    columns,
                ))
            }
            Method::CuttingPlane => {
                let mut basis = Basis::default();
                let status = cutting_plane(tableau, &mut basis, observer)?;
                let cuts = tableau.nr_rows() - rows;
                Ok(match status {
                    IntegerStatus::Optimal => Solution::optimal(tableau, basis, columns, cuts),
                    IntegerStatus::Unbounded => Solution::unbounded(basis),
                    IntegerStatus::Infeasible => Solution::infeasible(cuts),
                })
            }
        }
    }

    fn starting_basis<I: Int>(&self, tableau: &Tableau<I>) -> Result<Basis, SolveError> {
        match &self.basis {
            Some(basis) => {
                tableau.validate_basis(basis)?;
                Ok(basis.clone())
            }
            None => search_starting_basis(tableau).ok_or(SolveError::NoStartingBasis),
        }
    }
}

fn simplex_solution<I: Int>(
    status: SimplexStatus,
    tableau: &Tableau<I>,
    basis: Basis,
    columns: usize,
) -> Solution<I> {
    match status {
        SimplexStatus::Optimal => Solution::optimal(tableau, basis, columns, 0),
        SimplexStatus::Unbounded => Solution::unbounded(basis),
    }
}
