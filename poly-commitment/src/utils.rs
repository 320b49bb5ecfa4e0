//! Coefficient-vector helpers shared by the opening argument.

use ark_ff::{Field, PrimeField};
use plonkish_utils::{batch_invert_nonzero, ExtendedDensePolynomial};
use ark_poly::univariate::DensePolynomial;

/// `1, x, x^2, ...`
pub fn powers<F: Field>(x: F) -> impl Iterator<Item = F> {
    std::iter::successors(Some(F::one()), move |power| Some(*power * x))
}

/// Evaluates `Π (z - root)` over `roots`.
pub fn evaluate_vanishing_polynomial<F: Field>(roots: &[F], z: F) -> F {
    roots.iter().fold(F::one(), |acc, root| acc * (z - root))
}

/// Evaluates a polynomial given by its coefficients.
pub fn eval_polynomial<F: Field>(coeffs: &[F], x: F) -> F {
    DensePolynomial::eval_polynomial(coeffs, x)
}

/// Divides `a(X)` by `X - b`, dropping the remainder `a(b)`.
pub fn kate_division<F: Field>(a: &[F], b: F) -> Vec<F> {
    if a.is_empty() {
        return vec![];
    }
    let mut quotient = vec![F::zero(); a.len() - 1];
    let mut carry = F::zero();
    for (q, coeff) in quotient.iter_mut().rev().zip(a.iter().rev()) {
        let lead = *coeff + carry;
        *q = lead;
        carry = lead * b;
    }
    quotient
}

/// Divides `poly` by `Π (X - root)`, assuming it vanishes on every root.
pub fn div_by_vanishing<F: Field>(poly: Vec<F>, roots: &[F]) -> Vec<F> {
    roots
        .iter()
        .fold(poly, |poly, root| kate_division(&poly, *root))
}

/// `acc += scale * other`, growing `acc` if needed.
pub fn add_scaled<F: Field>(acc: &mut Vec<F>, other: &[F], scale: F) {
    if acc.len() < other.len() {
        acc.resize(other.len(), F::zero());
    }
    for (a, o) in acc.iter_mut().zip(other.iter()) {
        *a += scale * o;
    }
}

/// Coefficients of the unique polynomial of degree `< points.len()` taking
/// `evals[i]` at `points[i]`.
///
/// # Panics
///
/// Panics if two points are equal.
pub fn lagrange_interpolate<F: PrimeField>(points: &[F], evals: &[F]) -> Vec<F> {
    assert_eq!(points.len(), evals.len());
    if points.len() == 1 {
        return vec![evals[0]];
    }

    // (x_j - x_k)^-1 for every j != k
    let mut denoms: Vec<F> = points
        .iter()
        .enumerate()
        .flat_map(|(j, x_j)| {
            points
                .iter()
                .enumerate()
                .filter(move |(k, _)| *k != j)
                .map(move |(_, x_k)| *x_j - x_k)
        })
        .collect();
    batch_invert_nonzero(&mut denoms);

    let mut result = vec![F::zero(); points.len()];
    for (j, (denoms, eval)) in denoms
        .chunks(points.len() - 1)
        .zip(evals.iter())
        .enumerate()
    {
        // Π_{k != j} (X - x_k) / (x_j - x_k)
        let mut basis = vec![F::one()];
        for (x_k, denom) in points
            .iter()
            .enumerate()
            .filter(|(k, _)| *k != j)
            .map(|(_, x_k)| x_k)
            .zip(denoms.iter())
        {
            let mut next = vec![F::zero(); basis.len() + 1];
            for (i, coeff) in basis.iter().enumerate() {
                next[i] -= *coeff * x_k * denom;
                next[i + 1] += *coeff * denom;
            }
            basis = next;
        }
        for (r, b) in result.iter_mut().zip(basis) {
            *r += b * eval;
        }
    }
    result
}
