//! JSON problem descriptions.
//!
//! ```json
//! { "A": [[2, 2, 1, 0], [1, 3, 0, 1]], "b": [8, 7], "c": [-4, -5, 0, 0], "mode": "CP" }
//! ```
//!
//! describes `min c·x` subject to `A x = b`, `x >= 0`. Coefficients are
//! integers, `"n/d"` strings or `{"numerator": n, "denominator": d}` objects.
//! `mode` and `basis` are optional.
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tabula_solver::{Basis, Method, ParseMethodError, ParseRationalError, Rational, SolveError, Solver, Tableau};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProblemError {
    #[error("cannot read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid problem JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("coefficient {location}: {source}")]
    Coefficient {
        location: String,
        #[source]
        source: ParseRationalError,
    },
    #[error(transparent)]
    Method(#[from] ParseMethodError),
    #[error(transparent)]
    Shape(#[from] SolveError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coefficient {
    Integer(i32),
    Text(String),
    Fraction(Rational<i32>),
}

impl Coefficient {
    fn to_rational(&self, location: impl FnOnce() -> String) -> Result<Rational<i32>, ProblemError> {
        match self {
            Coefficient::Integer(value) => Ok(Rational::from(*value)),
            Coefficient::Text(text) => text.parse().map_err(|source| ProblemError::Coefficient {
                location: location(),
                source,
            }),
            Coefficient::Fraction(value) => Ok(value.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "A")]
    pub a: Vec<Vec<Coefficient>>,
    pub b: Vec<Coefficient>,
    pub c: Vec<Coefficient>,
    /// Method code or name, see [`Method`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Starting basis, 1-based column per constraint row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis: Option<Vec<usize>>,
}

impl Problem {
    pub fn from_json(source: &str) -> Result<Self, ProblemError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProblemError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ProblemError::File {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&source)
    }

    /// Lays the problem out as a tableau, see [`Tableau::from_standard_form`].
    pub fn tableau(&self) -> Result<Tableau<i32>, ProblemError> {
        let a = self
            .a
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .map(|(j, entry)| entry.to_rational(|| format!("A[{i}][{j}]")))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        let b = rationals(&self.b, "b")?;
        let c = rationals(&self.c, "c")?;

        Ok(Tableau::from_standard_form(&a, &b, &c)?)
    }

    pub fn method(&self) -> Result<Option<Method>, ProblemError> {
        Ok(self.mode.as_deref().map(str::parse).transpose()?)
    }

    pub fn basis(&self) -> Option<Basis> {
        self.basis.clone().map(Basis::from)
    }

    /// Solver configured from `mode` and `basis`.
    pub fn solver(&self) -> Result<Solver, ProblemError> {
        let mut solver = Solver::new().with_method(self.method()?.unwrap_or_default());
        if let Some(basis) = self.basis() {
            solver = solver.with_basis(basis);
        }
        Ok(solver)
    }
}

fn rationals(entries: &[Coefficient], name: &str) -> Result<Vec<Rational<i32>>, ProblemError> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| entry.to_rational(|| format!("{name}[{i}]")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_solver::Status;

    #[test]
    fn test_parse_and_lay_out() {
        let problem = Problem::from_json(
            r#"{"A": [[-2, -2, -1, 1, 0], [-1, -2, -3, 0, 1]], "b": [-6, "-5"], "c": [3, 4, 5, 0, 0],
                "mode": "DS", "basis": [4, 5]}"#,
        )
        .unwrap();

        let tableau = problem.tableau().unwrap();
        assert_eq!(tableau.nr_rows(), 2);
        assert_eq!(tableau.nr_columns(), 5);
        assert_eq!(*tableau.get(2, 0), Rational::from(-5));
        assert_eq!(problem.method().unwrap(), Some(Method::DualSimplex));
        assert_eq!(problem.basis(), Some(Basis::new(vec![4, 5])));

        let mut tableau = tableau;
        let solution = problem.solver().unwrap().solve(&mut tableau).unwrap();
        assert_eq!(solution.status, Status::Optimal);
        assert_eq!(solution.objective_value, Some(Rational::from(11)));
    }

    #[test]
    fn test_fraction_forms() {
        let problem = Problem::from_json(
            r#"{"A": [["1/2", {"numerator": 2, "denominator": -6}]], "b": [1], "c": [0, 0]}"#,
        )
        .unwrap();
        let tableau = problem.tableau().unwrap();
        assert_eq!(*tableau.get(1, 1), Rational::new(1, 2));
        assert_eq!(*tableau.get(1, 2), Rational::new(-1, 3));
        assert_eq!(problem.method().unwrap(), None);
    }

    #[test]
    fn test_bad_coefficient_location() {
        let problem = Problem::from_json(r#"{"A": [[1, "x/2"]], "b": [1], "c": [0, 0]}"#).unwrap();
        let err = problem.tableau().unwrap_err();
        assert!(matches!(&err, ProblemError::Coefficient { location, .. } if location == "A[0][1]"));
    }

    #[test]
    fn test_dimension_mismatch() {
        let problem = Problem::from_json(r#"{"A": [[1, 1]], "b": [1, 2], "c": [0, 0]}"#).unwrap();
        assert!(matches!(
            problem.tableau(),
            Err(ProblemError::Shape(SolveError::Dimension { .. }))
        ));
    }

    #[test]
    fn test_unknown_mode() {
        let problem = Problem::from_json(r#"{"A": [[1]], "b": [1], "c": [0], "mode": "XX"}"#).unwrap();
        assert!(matches!(problem.method(), Err(ProblemError::Method(_))));
    }

    #[test]
    fn test_integer_program() {
        let problem = Problem::from_json(
            r#"{"A": [[2, 2, 1, 0, 0], [1, 3, 0, 1, 0], [2, 1, 0, 0, 1]], "b": [8, 7, 5],
                "c": [-4, -5, 0, 0, 0], "mode": "CP"}"#,
        )
        .unwrap();
        let mut tableau = problem.tableau().unwrap();
        let solution = problem.solver().unwrap().solve(&mut tableau).unwrap();

        assert_eq!(solution.objective_value, Some(Rational::from(-14)));
        assert_eq!(solution.cuts, 2);
        assert_eq!(solution.values[..2], [Rational::from(1), Rational::from(2)]);
    }
}
