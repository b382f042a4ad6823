//! Dense polynomials over GF(929).

use crate::field;

/// A polynomial with coefficients stored high-to-low degree.
///
/// Leading zeros are trimmed on construction; the zero polynomial is the
/// singleton `[0]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poly {
    coefficients: Vec<u16>,
}

impl Poly {
    /// Build from high-to-low coefficients, trimming leading zeros.
    pub fn new(coefficients: Vec<u16>) -> Self {
        let first_non_zero = coefficients.iter().position(|&c| c != 0);
        match first_non_zero {
            None => Self::zero(),
            Some(0) => Self { coefficients },
            Some(i) => Self {
                coefficients: coefficients[i..].to_vec(),
            },
        }
    }

    /// `coefficient * x^degree`.
    pub fn monomial(degree: usize, coefficient: u16) -> Self {
        if coefficient == 0 {
            return Self::zero();
        }
        let mut coefficients = vec![0; degree + 1];
        coefficients[0] = coefficient;
        Self { coefficients }
    }

    pub fn zero() -> Self {
        Self {
            coefficients: vec![0],
        }
    }

    pub fn one() -> Self {
        Self {
            coefficients: vec![1],
        }
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coefficients[0] == 0
    }

    /// Coefficient of the `degree` term, zero when above this polynomial.
    pub fn coefficient(&self, degree: usize) -> u16 {
        match self.degree().checked_sub(degree) {
            Some(i) => self.coefficients[i],
            None => 0,
        }
    }

    #[inline]
    pub fn leading_coefficient(&self) -> u16 {
        self.coefficients[0]
    }

    /// Coefficient of the x^0 term.
    #[inline]
    pub fn constant_term(&self) -> u16 {
        self.coefficients[self.degree()]
    }

    /// Horner evaluation, with fast paths for x = 0 and x = 1.
    pub fn evaluate_at(&self, x: u16) -> u16 {
        if x == 0 {
            return self.constant_term();
        }
        if x == 1 {
            return self
                .coefficients
                .iter()
                .fold(0, |acc, &c| field::add(acc, c));
        }
        let mut result = self.coefficients[0];
        for &c in &self.coefficients[1..] {
            result = field::add(field::multiply(x, result), c);
        }
        result
    }

    pub fn negated(&self) -> Self {
        Self::new(self.coefficients.iter().map(|&c| field::negate(c)).collect())
    }

    pub fn add(&self, other: &Self) -> Self {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        let (smaller, larger) = if self.coefficients.len() > other.coefficients.len() {
            (&other.coefficients, &self.coefficients)
        } else {
            (&self.coefficients, &other.coefficients)
        };
        let delta = larger.len() - smaller.len();
        let mut result = larger.clone();
        for (i, &c) in smaller.iter().enumerate() {
            result[delta + i] = field::add(c, larger[delta + i]);
        }
        Self::new(result)
    }

    pub fn subtract(&self, other: &Self) -> Self {
        if other.is_zero() {
            return self.clone();
        }
        self.add(&other.negated())
    }

    pub fn multiply(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let mut result = vec![0u16; self.coefficients.len() + other.coefficients.len() - 1];
        for (i, &a) in self.coefficients.iter().enumerate() {
            for (j, &b) in other.coefficients.iter().enumerate() {
                result[i + j] = field::add(result[i + j], field::multiply(a, b));
            }
        }
        Self::new(result)
    }

    pub fn multiply_by_constant(&self, constant: u16) -> Self {
        if constant == 0 {
            return Self::zero();
        }
        if constant == 1 {
            return self.clone();
        }
        Self::new(
            self.coefficients
                .iter()
                .map(|&c| field::multiply(c, constant))
                .collect(),
        )
    }

    /// Multiply by `constant * x^degree`.
    pub fn multiply_by_monomial(&self, degree: usize, constant: u16) -> Self {
        if constant == 0 {
            return Self::zero();
        }
        let mut result = vec![0u16; self.coefficients.len() + degree];
        for (i, &c) in self.coefficients.iter().enumerate() {
            result[i] = field::multiply(c, constant);
        }
        Self::new(result)
    }
}
