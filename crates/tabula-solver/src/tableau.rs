use std::ops::Index;

use num_traits::{One, Zero};

use crate::error::SolveError;
use crate::rational::{Int, Rational};

/// Dense simplex tableau with `m + 1` rows and `n + 1` columns.
///
/// Row 0 holds the negated objective value in column 0 and the reduced costs
/// in columns `1..=n`. Rows `1..=m` hold the right-hand side in column 0 and
/// the constraint coefficients after it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "I: Int + serde::Serialize",
        deserialize = "I: Int + serde::Deserialize<'de>"
    ))
)]
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau<I: Int = i32> {
    /// Structural columns (decision, slack and artificial variables).
    n: usize,
    /// Constraint rows.
    m: usize,
    data: Vec<Rational<I>>,
}

impl<I: Int> Tableau<I> {
    /// Creates a tableau from row-major coefficients, `rows × cols` of them.
    pub fn new(rows: usize, cols: usize, coefficients: Vec<Rational<I>>) -> Result<Self, SolveError> {
        if rows == 0 || cols == 0 {
            return Err(SolveError::Empty);
        }
        if rows.checked_mul(cols) != Some(coefficients.len()) {
            return Err(SolveError::Shape {
                rows,
                cols,
                found: coefficients.len(),
            });
        }
        Ok(Self {
            n: cols - 1,
            m: rows - 1,
            data: coefficients,
        })
    }

    pub fn from_rows(rows: Vec<Vec<Rational<I>>>) -> Result<Self, SolveError> {
        let nr_rows = rows.len();
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if let Some(index) = rows.iter().position(|row| row.len() != cols) {
            return Err(SolveError::RaggedRow {
                row: index,
                expected: cols,
                found: rows[index].len(),
            });
        }
        Self::new(nr_rows, cols, rows.into_iter().flatten().collect())
    }

    /// Lays out `min c·x` subject to `A x = b` as a tableau: row 0 is
    /// `[0, c…]` and row `i` is `[b_i, A_i…]`.
    pub fn from_standard_form(
        a: &[Vec<Rational<I>>],
        b: &[Rational<I>],
        c: &[Rational<I>],
    ) -> Result<Self, SolveError> {
        if a.len() != b.len() {
            return Err(SolveError::Dimension {
                what: "right-hand side",
                expected: a.len(),
                found: b.len(),
            });
        }

        let mut rows = Vec::with_capacity(a.len() + 1);
        rows.push(std::iter::once(Rational::zero()).chain(c.iter().cloned()).collect());
        for (row, rhs) in a.iter().zip(b) {
            if row.len() != c.len() {
                return Err(SolveError::Dimension {
                    what: "constraint row",
                    expected: c.len(),
                    found: row.len(),
                });
            }
            rows.push(std::iter::once(rhs.clone()).chain(row.iter().cloned()).collect());
        }
        Self::from_rows(rows)
    }

    /// Number of structural columns `n`.
    pub fn nr_columns(&self) -> usize {
        self.n
    }

    /// Number of constraint rows `m`.
    pub fn nr_rows(&self) -> usize {
        self.m
    }

    fn width(&self) -> usize {
        self.n + 1
    }

    pub fn get(&self, row: usize, col: usize) -> &Rational<I> {
        &self.data[row * self.width() + col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: Rational<I>) {
        let width = self.width();
        self.data[row * width + col] = value;
    }

    pub fn row(&self, row: usize) -> &[Rational<I>] {
        let width = self.width();
        &self.data[row * width..(row + 1) * width]
    }

    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [Rational<I>] {
        let width = self.width();
        &mut self.data[row * width..(row + 1) * width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Rational<I>]> {
        self.data.chunks(self.width())
    }

    /// Current objective value, the negation of entry `[0, 0]`.
    pub fn objective_value(&self) -> Rational<I> {
        -self.get(0, 0)
    }

    pub fn reduced_cost(&self, col: usize) -> &Rational<I> {
        self.get(0, col)
    }

    pub fn rhs(&self, row: usize) -> &Rational<I> {
        self.get(row, 0)
    }

    /// Values of `x_1..x_n` for the given basis; nonbasic variables are zero.
    pub fn basic_solution(&self, basis: &Basis) -> Vec<Rational<I>> {
        let mut values = vec![Rational::zero(); self.n];
        for (row, &col) in basis.iter().enumerate() {
            values[col - 1] = self.rhs(row + 1).clone();
        }
        values
    }

    /// Grows the tableau by one zero row and one zero column, keeping all entries.
    pub fn augment(&mut self) -> Result<(), SolveError> {
        let (rows, cols) = (self.m + 2, self.n + 2);
        let mut data = Vec::new();
        data.try_reserve_exact(rows * cols).map_err(|error| {
            tracing::warn!(rows, cols, %error, "cannot grow tableau");
            SolveError::Allocation { rows, cols }
        })?;

        for row in self.rows() {
            data.extend(row.iter().cloned());
            data.push(Rational::zero());
        }
        data.resize(rows * cols, Rational::zero());

        self.data = data;
        self.n += 1;
        self.m += 1;
        Ok(())
    }

    /// Whether every basis column is a unit vector in its own row, reduced cost included.
    pub fn is_canonical(&self, basis: &Basis) -> bool {
        basis.len() == self.m
            && basis.iter().enumerate().all(|(index, &col)| {
                (0..=self.m).all(|row| {
                    let entry = self.get(row, col);
                    if row == index + 1 { entry.is_one() } else { entry.is_zero() }
                })
            })
    }

    /// Checks a caller-supplied basis against this tableau.
    pub fn validate_basis(&self, basis: &Basis) -> Result<(), SolveError> {
        if basis.len() != self.m {
            return Err(SolveError::InvalidBasis(format!(
                "expected {} entries, found {}",
                self.m,
                basis.len()
            )));
        }
        for (index, &col) in basis.iter().enumerate() {
            if col == 0 || col > self.n {
                return Err(SolveError::InvalidBasis(format!("column {col} is out of range 1..={}", self.n)));
            }
            if basis.iter().take(index).any(|&other| other == col) {
                return Err(SolveError::InvalidBasis(format!("column {col} appears twice")));
            }
        }
        if !self.is_canonical(basis) {
            return Err(SolveError::InvalidBasis(
                "basis columns do not form an identity in the tableau".to_string(),
            ));
        }
        Ok(())
    }
}

/// Column index (1-based) of the basic variable of each constraint row.
///
/// Entry `i` belongs to tableau row `i + 1`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Basis(Vec<usize>);

impl Basis {
    pub fn new(columns: Vec<usize>) -> Self {
        Self(columns)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Basic variable of tableau row `row` (1-based).
    pub fn in_row(&self, row: usize) -> usize {
        self.0[row - 1]
    }

    /// Makes `col` the basic variable of tableau row `row` (1-based).
    pub fn enter(&mut self, row: usize, col: usize) {
        self.0[row - 1] = col;
    }

    pub fn push(&mut self, col: usize) {
        self.0.push(col);
    }
}

impl From<Vec<usize>> for Basis {
    fn from(columns: Vec<usize>) -> Self {
        Self(columns)
    }
}

impl Index<usize> for Basis {
    type Output = usize;

    fn index(&self, index: usize) -> &usize {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Basis {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
