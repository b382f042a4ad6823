//! Reed-Solomon decoding over GF(929).
//!
//! Syndrome computation, the Euclidean algorithm for the error locator and
//! evaluator, Chien root search, and Forney magnitude correction.

use crate::field;
use crate::poly::Poly;

/// Why a codeword block could not be corrected.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectError {
    /// The error locator could not be resolved: the Euclidean remainder ran
    /// to zero, sigma(0) vanished, or the locator has fewer roots than its
    /// degree.
    #[error("error locator unresolvable, too many corrupted codewords")]
    Unrecoverable,
    /// A Chien root maps outside the codeword block.
    #[error("error position outside the codeword block")]
    PositionOutOfRange,
}

/// Correct up to `error_correction_length / 2` corrupted codewords in place.
///
/// Returns the number of corrected codewords; zero means the syndromes were
/// already clean.
pub fn correct_errors(
    codewords: &mut [u16],
    error_correction_length: usize,
) -> Result<usize, CorrectError> {
    let received = Poly::new(codewords.to_vec());

    let mut syndromes = vec![0u16; error_correction_length];
    let mut any_error = false;
    for i in (1..=error_correction_length).rev() {
        let value = received.evaluate_at(field::exp(i));
        syndromes[error_correction_length - i] = value;
        if value != 0 {
            any_error = true;
        }
    }
    if !any_error {
        return Ok(0);
    }

    let (locator, evaluator) = euclidean(error_correction_length, Poly::new(syndromes))?;
    let roots = find_error_roots(&locator)?;
    let derivative = formal_derivative(&locator);

    for &root in &roots {
        let distance = field::log(field::invert(root)) as usize;
        let position = codewords
            .len()
            .checked_sub(1 + distance)
            .ok_or(CorrectError::PositionOutOfRange)?;
        let magnitude = field::divide(
            field::negate(evaluator.evaluate_at(root)),
            derivative.evaluate_at(root),
        );
        codewords[position] = field::subtract(codewords[position], magnitude);
    }

    Ok(roots.len())
}

/// Run the Euclidean algorithm until the remainder degree drops below R/2;
/// returns the normalized (error locator, error evaluator) pair.
fn euclidean(
    error_correction_length: usize,
    syndromes: Poly,
) -> Result<(Poly, Poly), CorrectError> {
    let mut r_last = Poly::monomial(error_correction_length, 1);
    let mut r = syndromes;
    let mut t_last = Poly::zero();
    let mut t = Poly::one();

    while r.degree() >= error_correction_length / 2 {
        let r_last_last = r_last;
        let t_last_last = t_last;
        r_last = r;
        t_last = t;

        if r_last.is_zero() {
            return Err(CorrectError::Unrecoverable);
        }

        // Divide r_last_last by r_last; quotient drives the t recurrence.
        r = r_last_last;
        let mut quotient = Poly::zero();
        let leading_inverse = field::invert(r_last.leading_coefficient());

        while r.degree() >= r_last.degree() && !r.is_zero() {
            let scale = field::multiply(r.leading_coefficient(), leading_inverse);
            let degree_diff = r.degree() - r_last.degree();
            quotient = quotient.add(&Poly::monomial(degree_diff, scale));
            r = r.subtract(&r_last.multiply_by_monomial(degree_diff, scale));
        }

        t = quotient.multiply(&t_last).subtract(&t_last_last).negated();
    }

    let sigma_at_zero = t.constant_term();
    if sigma_at_zero == 0 {
        return Err(CorrectError::Unrecoverable);
    }

    let inverse = field::invert(sigma_at_zero);
    Ok((
        t.multiply_by_constant(inverse),
        r.multiply_by_constant(inverse),
    ))
}

/// Chien search: collect the locator roots, which must account for its
/// entire degree.
fn find_error_roots(locator: &Poly) -> Result<Vec<u16>, CorrectError> {
    let locator_degree = locator.degree();
    let mut roots = Vec::with_capacity(locator_degree);
    for x in 1..field::MOD {
        if roots.len() >= locator_degree {
            break;
        }
        if locator.evaluate_at(x) == 0 {
            roots.push(x);
        }
    }
    if roots.len() == locator_degree {
        Ok(roots)
    } else {
        Err(CorrectError::Unrecoverable)
    }
}

fn formal_derivative(locator: &Poly) -> Poly {
    let degree = locator.degree();
    let mut coefficients = vec![0u16; degree];
    for i in 1..=degree {
        coefficients[degree - i] = field::multiply((i % field::MOD as usize) as u16, locator.coefficient(i));
    }
    Poly::new(coefficients)
}
