//! This adds a few utility functions for the [DensePolynomial] arkworks type.

use ark_ff::Field;
use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial};

/// An extension for the [DensePolynomial] type.
pub trait ExtendedDensePolynomial<F: Field> {
    /// `eval_polynomial(coeffs, x)` evaluates a polynomial given its
    /// coefficients `coeffs` and a point `x`.
    fn eval_polynomial(coeffs: &[F], x: F) -> F;

    /// Splits the polynomial into pieces of `size` coefficients each, padding
    /// the last piece with zeros.
    fn split(&self, size: usize, pieces: usize) -> Vec<Self>
    where
        Self: Sized;

    /// Folds `pieces` into `Σ scale^i · pieces[i]`, processing from the last
    /// piece to the first one.
    fn fold(pieces: &[Self], scale: F) -> Self
    where
        Self: Sized;
}

impl<F: Field> ExtendedDensePolynomial<F> for DensePolynomial<F> {
    fn eval_polynomial(coeffs: &[F], x: F) -> F {
        // this uses https://en.wikipedia.org/wiki/Horner%27s_method
        let mut res = F::zero();
        for c in coeffs.iter().rev() {
            res *= &x;
            res += c;
        }
        res
    }

    fn split(&self, size: usize, pieces: usize) -> Vec<Self> {
        let mut coeffs = self.coeffs.clone();
        coeffs.resize(size * pieces, F::zero());
        coeffs
            .chunks(size)
            .map(|chunk| DensePolynomial { coeffs: chunk.to_vec() })
            .collect()
    }

    fn fold(pieces: &[Self], scale: F) -> Self {
        let len = pieces.iter().map(|p| p.coeffs.len()).max().unwrap_or(0);
        let mut acc = vec![F::zero(); len];
        for piece in pieces.iter().rev() {
            for a in acc.iter_mut() {
                *a *= scale;
            }
            for (a, c) in acc.iter_mut().zip(piece.coeffs.iter()) {
                *a += c;
            }
        }
        DensePolynomial::from_coefficients_vec(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::{One, Zero};
    use ark_poly::Polynomial;

    #[test]
    fn test_eval() {
        let zero = Fr::zero();
        let one = Fr::one();
        // 1 + x^2 + x^4 + x^6
        let coeffs = [one, zero, one, zero, one, zero, one, zero];
        let two = Fr::from(2u64);
        let expected = Fr::from(1u64 + 4 + 16 + 64);
        assert_eq!(DensePolynomial::eval_polynomial(&coeffs, two), expected);
    }

    #[test]
    fn test_split_then_fold() {
        let coeffs: Vec<Fr> = (1..=10u64).map(Fr::from).collect();
        let p = DensePolynomial::from_coefficients_vec(coeffs);
        let x = Fr::from(7u64);
        let pieces = p.split(4, 3);
        assert_eq!(pieces.len(), 3);
        assert!(pieces.iter().all(|piece| piece.coeffs.len() == 4));

        let xn = x.pow([4u64]);
        let folded = DensePolynomial::fold(&pieces, xn);
        assert_eq!(folded.evaluate(&x), p.evaluate(&x));
    }
}
