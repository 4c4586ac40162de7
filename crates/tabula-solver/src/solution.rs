use crate::rational::{Int, Rational};
use crate::tableau::{Basis, Tableau};

/// The result of solving a tableau
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "I: Int + serde::Serialize",
        deserialize = "I: Int + serde::Deserialize<'de>"
    ))
)]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<I: Int = i32> {
    pub status: Status,
    /// Optimal objective value, absent unless optimal
    pub objective_value: Option<Rational<I>>,
    /// Basic variable of each constraint row at termination
    pub basis: Basis,
    /// Value of each structural variable `x_1..x_n` of the input tableau
    pub values: Vec<Rational<I>>,
    /// Gomory cuts added by the cutting-plane method
    pub cuts: usize,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// An optimal solution was found
    Optimal,
    /// The problem has no feasible (or, for integer programs, no integral) point
    Infeasible,
    /// The objective can decrease without limit
    Unbounded,
}

impl<I: Int> Solution<I> {
    /// Reads the optimum off a solved tableau, keeping the first `columns` values.
    pub fn optimal(tableau: &Tableau<I>, basis: Basis, columns: usize, cuts: usize) -> Self {
        let mut values = tableau.basic_solution(&basis);
        values.truncate(columns);
        Self {
            status: Status::Optimal,
            objective_value: Some(tableau.objective_value()),
            basis,
            values,
            cuts,
        }
    }

    pub fn infeasible(cuts: usize) -> Self {
        Self {
            status: Status::Infeasible,
            objective_value: None,
            basis: Basis::default(),
            values: Vec::new(),
            cuts,
        }
    }

    pub fn unbounded(basis: Basis) -> Self {
        Self {
            status: Status::Unbounded,
            objective_value: None,
            basis,
            values: Vec::new(),
            cuts: 0,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == Status::Optimal
    }
}
