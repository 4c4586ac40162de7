use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use thiserror::Error;

/// Integer type backing the numerator and denominator of a [`Rational`].
///
/// The fixed-width implementations wrap on overflow instead of checking it, so
/// large intermediate products silently produce wrong values. Use a wider type
/// or the `bigint` feature when that matters. A denominator equal to the
/// type's `MIN` cannot be negated, so it stays negative and such values fall
/// outside the positive-denominator invariant.
pub trait Int: Clone + fmt::Debug + fmt::Display + Integer + Signed + FromStr {
    fn add_unchecked(&self, rhs: &Self) -> Self;
    fn sub_unchecked(&self, rhs: &Self) -> Self;
    fn mul_unchecked(&self, rhs: &Self) -> Self;
    fn neg_unchecked(&self) -> Self;
}

macro_rules! fixed_width {
    ($($t:ty),*) => {$(
        impl Int for $t {
            fn add_unchecked(&self, rhs: &Self) -> Self {
                self.wrapping_add(*rhs)
            }

            fn sub_unchecked(&self, rhs: &Self) -> Self {
                self.wrapping_sub(*rhs)
            }

            fn mul_unchecked(&self, rhs: &Self) -> Self {
                self.wrapping_mul(*rhs)
            }

            fn neg_unchecked(&self) -> Self {
                self.wrapping_neg()
            }
        }
    )*};
}

fixed_width!(i32, i64, i128);

#[cfg(feature = "bigint")]
impl Int for num_bigint::BigInt {
    fn add_unchecked(&self, rhs: &Self) -> Self {
        self + rhs
    }

    fn sub_unchecked(&self, rhs: &Self) -> Self {
        self - rhs
    }

    fn mul_unchecked(&self, rhs: &Self) -> Self {
        self * rhs
    }

    fn neg_unchecked(&self) -> Self {
        -self
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("denominator cannot be zero (numerator {numerator})")]
    ZeroDenominator { numerator: String },
    #[error("division of {dividend} by a zero fraction")]
    DivisionByZero { dividend: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseRationalError {
    #[error("empty fraction")]
    Empty,
    #[error("invalid integer '{0}' in fraction")]
    InvalidInteger(String),
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

/// An exact fraction, always kept fully reduced with a positive denominator.
///
/// Zero is represented as `0/1`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        from = "RawRational<I>",
        bound(
            serialize = "I: Int + serde::Serialize",
            deserialize = "I: Int + serde::Deserialize<'de>"
        )
    )
)]
#[derive(Clone, Debug)]
pub struct Rational<I = i32> {
    numerator: I,
    denominator: I,
}

/// Unnormalized wire form; deserialization goes through [`Rational::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawRational<I> {
    numerator: I,
    denominator: I,
}

#[cfg(feature = "serde")]
impl<I: Int> From<RawRational<I>> for Rational<I> {
    fn from(raw: RawRational<I>) -> Self {
        Rational::new(raw.numerator, raw.denominator)
    }
}

impl<I: Int> Rational<I> {
    /// Builds a reduced fraction.
    ///
    /// A zero denominator is reported and replaced by `0/1`; use
    /// [`Rational::try_new`] to get the error instead.
    pub fn new(numerator: I, denominator: I) -> Self {
        match Self::try_new(numerator, denominator) {
            Ok(value) => value,
            Err(error) => {
                tracing::error!(%error, "substituting 0/1");
                Self::zero()
            }
        }
    }

    pub fn try_new(numerator: I, denominator: I) -> Result<Self, ArithmeticError> {
        if denominator.is_zero() {
            return Err(ArithmeticError::ZeroDenominator {
                numerator: numerator.to_string(),
            });
        }
        Ok(Self::normalize(numerator, denominator))
    }

    fn normalize(mut numerator: I, mut denominator: I) -> Self {
        if denominator.is_negative() {
            numerator = numerator.neg_unchecked();
            denominator = denominator.neg_unchecked();
        }
        if numerator.is_zero() {
            return Self::zero();
        }

        let divisor = numerator.gcd(&denominator);
        Self {
            numerator: numerator / divisor.clone(),
            denominator: denominator / divisor,
        }
    }

    pub fn from_integer(value: I) -> Self {
        Self {
            numerator: value,
            denominator: I::one(),
        }
    }

    pub fn numerator(&self) -> &I {
        &self.numerator
    }

    pub fn denominator(&self) -> &I {
        &self.denominator
    }

    pub fn is_integer(&self) -> bool {
        self.denominator.is_one()
    }

    pub fn is_negative(&self) -> bool {
        self.numerator.is_negative()
    }

    pub fn is_positive(&self) -> bool {
        self.numerator.is_positive()
    }

    pub fn abs(&self) -> Self {
        if self.is_negative() { -self } else { self.clone() }
    }

    /// Greatest integer not above this value.
    pub fn floor(&self) -> Self {
        Self::from_integer(self.numerator.div_floor(&self.denominator))
    }

    /// `self - floor(self)`, always in `[0, 1)`.
    pub fn fract(&self) -> Self {
        self - &self.floor()
    }

    pub fn checked_div(&self, rhs: &Self) -> Result<Self, ArithmeticError> {
        if rhs.numerator.is_zero() {
            return Err(ArithmeticError::DivisionByZero {
                dividend: self.to_string(),
            });
        }
        Ok(Self::new(
            self.numerator.mul_unchecked(&rhs.denominator),
            self.denominator.mul_unchecked(&rhs.numerator),
        ))
    }

    fn cross(&self, other: &Self) -> (I, I) {
        (
            self.numerator.mul_unchecked(&other.denominator),
            other.numerator.mul_unchecked(&self.denominator),
        )
    }
}

impl<I: Int> From<I> for Rational<I> {
    fn from(value: I) -> Self {
        Self::from_integer(value)
    }
}

impl<I: Int> Zero for Rational<I> {
    fn zero() -> Self {
        Self {
            numerator: I::zero(),
            denominator: I::one(),
        }
    }

    fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }
}

impl<I: Int> One for Rational<I> {
    fn one() -> Self {
        Self::from_integer(I::one())
    }
}

impl<I: Int> Default for Rational<I> {
    fn default() -> Self {
        Self::zero()
    }
}

// Comparisons cross-multiply, which relies on both denominators being positive.
impl<I: Int> PartialEq for Rational<I> {
    fn eq(&self, other: &Self) -> bool {
        let (lhs, rhs) = self.cross(other);
        lhs == rhs
    }
}

impl<I: Int> Eq for Rational<I> {}

impl<I: Int> PartialOrd for Rational<I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I: Int> Ord for Rational<I> {
    fn cmp(&self, other: &Self) -> Ordering {
        let (lhs, rhs) = self.cross(other);
        lhs.cmp(&rhs)
    }
}

impl<'a, 'b, I: Int> Add<&'b Rational<I>> for &'a Rational<I> {
    type Output = Rational<I>;

    fn add(self, rhs: &'b Rational<I>) -> Rational<I> {
        let (lhs_scaled, rhs_scaled) = self.cross(rhs);
        Rational::new(
            lhs_scaled.add_unchecked(&rhs_scaled),
            self.denominator.mul_unchecked(&rhs.denominator),
        )
    }
}

impl<'a, 'b, I: Int> Sub<&'b Rational<I>> for &'a Rational<I> {
    type Output = Rational<I>;

    fn sub(self, rhs: &'b Rational<I>) -> Rational<I> {
        let (lhs_scaled, rhs_scaled) = self.cross(rhs);
        Rational::new(
            lhs_scaled.sub_unchecked(&rhs_scaled),
            self.denominator.mul_unchecked(&rhs.denominator),
        )
    }
}

impl<'a, 'b, I: Int> Mul<&'b Rational<I>> for &'a Rational<I> {
    type Output = Rational<I>;

    fn mul(self, rhs: &'b Rational<I>) -> Rational<I> {
        Rational::new(
            self.numerator.mul_unchecked(&rhs.numerator),
            self.denominator.mul_unchecked(&rhs.denominator),
        )
    }
}

impl<'a, 'b, I: Int> Div<&'b Rational<I>> for &'a Rational<I> {
    type Output = Rational<I>;

    /// Dividing by zero is reported and yields `0/1`.
    fn div(self, rhs: &'b Rational<I>) -> Rational<I> {
        match self.checked_div(rhs) {
            Ok(value) => value,
            Err(error) => {
                tracing::error!(%error, "substituting 0/1");
                Rational::zero()
            }
        }
    }
}

macro_rules! forward_owned {
    ($($imp:ident :: $method:ident),*) => {$(
        impl<I: Int> $imp<Rational<I>> for Rational<I> {
            type Output = Rational<I>;

            fn $method(self, rhs: Rational<I>) -> Rational<I> {
                (&self).$method(&rhs)
            }
        }

        impl<'b, I: Int> $imp<&'b Rational<I>> for Rational<I> {
            type Output = Rational<I>;

            fn $method(self, rhs: &'b Rational<I>) -> Rational<I> {
                (&self).$method(rhs)
            }
        }
    )*};
}

forward_owned!(Add::add, Sub::sub, Mul::mul, Div::div);

impl<I: Int> Neg for &Rational<I> {
    type Output = Rational<I>;

    fn neg(self) -> Rational<I> {
        Rational {
            numerator: self.numerator.neg_unchecked(),
            denominator: self.denominator.clone(),
        }
    }
}

impl<I: Int> Neg for Rational<I> {
    type Output = Rational<I>;

    fn neg(self) -> Rational<I> {
        -&self
    }
}

impl<I: Int> fmt::Display for Rational<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = if self.is_integer() {
            self.numerator.to_string()
        } else {
            format!("{}/{}", self.numerator, self.denominator)
        };
        // Route through `pad` so width and alignment flags apply to the whole fraction.
        f.pad(&text)
    }
}

impl<I: Int> FromStr for Rational<I> {
    type Err = ParseRationalError;

    /// Parses `"n"` or `"n/d"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseRationalError::Empty);
        }

        let parse = |part: &str| {
            part.trim()
                .parse::<I>()
                .map_err(|_| ParseRationalError::InvalidInteger(part.trim().to_string()))
        };

        match s.split_once('/') {
            Some((numerator, denominator)) => Ok(Self::try_new(parse(numerator)?, parse(denominator)?)?),
            None => Ok(Self::from_integer(parse(s)?)),
        }
    }
}
