mod cutting_plane;
mod dual;
mod error;
mod pivot;
mod primal;
mod rational;
mod search;
mod solution;
mod solver;
mod tableau;
pub mod trace;
mod two_phase;

pub use cutting_plane::{IntegerStatus, add_gomory_cut, check_integrality, cutting_plane};
pub use dual::{dual_simplex, select_entering_column_dual, select_leaving_row};
pub use error::SolveError;
pub use pivot::{Eliminate, pivot};
pub use primal::{SimplexStatus, primal_simplex, select_entering_column, select_pivot_row};
pub use rational::{ArithmeticError, Int, ParseRationalError, Rational};
pub use search::search_starting_basis;
pub use solution::{Solution, Status};
pub use solver::{Method, ParseMethodError, Solver};
pub use tableau::{Basis, Tableau};
pub use trace::{Event, Observer, Outcome, Record, Recorder, Silent, Stage};
pub use two_phase::{Feasibility, phase_one};
