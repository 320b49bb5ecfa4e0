//! This module describes the evaluation domains used by the polynomials of
//! a circuit: the base domain of `n = 2^k` rows, and an extended domain,
//! shifted by `zeta`, large enough to hold the quotient polynomial.

use crate::{circuits::query::Rotation, error::DomainCreationError};
use ark_ff::batch_inversion;
use ark_poly::{
    univariate::DensePolynomial, EvaluationDomain, Evaluations, Radix2EvaluationDomain as D,
};
use plonkish_utils::{batch_invert_nonzero, math::extended_log2, radix2_domain, CircuitField};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationDomains<F: CircuitField> {
    k: u32,
    extended_k: u32,
    /// Degree of the quotient polynomial in multiples of `n`
    quotient_poly_degree: usize,

    #[serde_as(as = "plonkish_utils::serialization::SerdeAs")]
    d1: D<F>, // size n
    #[serde_as(as = "plonkish_utils::serialization::SerdeAs")]
    extended: D<F>, // size 2^extended_k, evaluated on the coset zeta * <omega>

    #[serde_as(as = "plonkish_utils::serialization::SerdeAs")]
    zeta: F,
    #[serde_as(as = "plonkish_utils::serialization::SerdeAs")]
    zeta_inv: F,

    /// `1 / (X^n - 1)` on the extended coset, which takes only
    /// `extended_size / n` distinct values
    #[serde_as(as = "Vec<plonkish_utils::serialization::SerdeAs>")]
    t_evaluations_inv: Vec<F>,
}

impl<F: CircuitField> EvaluationDomains<F> {
    /// Creates the domains of a circuit of `2^k` rows whose constraints have
    /// degree `degree`.
    pub fn create(k: u32, degree: usize) -> Result<Self, DomainCreationError> {
        // quotient_poly_degree * n is the degree of h(X)
        let quotient_poly_degree = degree.saturating_sub(1).max(1);
        let extended_k = extended_log2(k, quotient_poly_degree);

        let n = 1usize << k;
        let d1 = radix2_domain::<F>(n).ok_or(DomainCreationError::DomainConstructionFailed(
            "d1".to_string(),
            n,
        ))?;
        let extended_size = 1usize << extended_k;
        let extended = radix2_domain::<F>(extended_size).ok_or(
            DomainCreationError::DomainConstructionFailed("extended".to_string(), extended_size),
        )?;

        // both generators are powers of the same root of unity
        assert_eq!(
            extended.group_gen.pow([1u64 << (extended_k - k)]),
            d1.group_gen
        );

        // a cube root of unity, so that zeta^n != 1 for every power of two n
        let zeta = F::ZETA;
        let zeta_inv = zeta.square();

        // (zeta * omega_ext^i)^n - 1 = zeta^n * (omega_ext^n)^i - 1, where
        // omega_ext^n has order extended_size / n
        let zeta_n = zeta.pow([n as u64]);
        let omega_ext_n = extended.group_gen.pow([n as u64]);
        let mut t_evaluations_inv: Vec<F> = std::iter::successors(Some(zeta_n), |acc| {
            Some(*acc * omega_ext_n)
        })
        .take(extended_size / n)
        .map(|value| value - F::one())
        .collect();
        batch_invert_nonzero(&mut t_evaluations_inv);

        Ok(EvaluationDomains {
            k,
            extended_k,
            quotient_poly_degree,
            d1,
            extended,
            zeta,
            zeta_inv,
            t_evaluations_inv,
        })
    }

    pub fn k(&self) -> u32 {
        self.k
    }

    pub fn extended_k(&self) -> u32 {
        self.extended_k
    }

    pub fn n(&self) -> usize {
        self.d1.size()
    }

    pub fn extended_size(&self) -> usize {
        self.extended.size()
    }

    pub fn quotient_poly_degree(&self) -> usize {
        self.quotient_poly_degree
    }

    pub fn d1(&self) -> &D<F> {
        &self.d1
    }

    pub fn extended(&self) -> &D<F> {
        &self.extended
    }

    /// The coset shift of the extended domain
    pub fn zeta(&self) -> F {
        self.zeta
    }

    pub fn omega(&self) -> F {
        self.d1.group_gen
    }

    pub fn omega_inv(&self) -> F {
        self.d1.group_gen_inv
    }

    pub fn extended_omega(&self) -> F {
        self.extended.group_gen
    }

    /// Step, in extended rows, corresponding to one row of the base domain
    pub fn rotation_scale(&self) -> i32 {
        (self.extended.size() / self.d1.size()) as i32
    }

    /// Wraps a column of `n` evaluations.
    pub fn lagrange_from_vec(&self, values: Vec<F>) -> Evaluations<F, D<F>> {
        assert_eq!(values.len(), self.n());
        Evaluations::from_vec_and_domain(values, self.d1)
    }

    /// Wraps a column of evaluations over the extended coset.
    pub fn extended_from_vec(&self, values: Vec<F>) -> Evaluations<F, D<F>> {
        assert_eq!(values.len(), self.extended_size());
        Evaluations::from_vec_and_domain(values, self.extended)
    }

    /// Interpolates a column over the base domain.
    pub fn lagrange_to_coeff(&self, evals: Evaluations<F, D<F>>) -> DensePolynomial<F> {
        assert_eq!(evals.evals.len(), self.n());
        evals.interpolate()
    }

    /// Evaluates a polynomial over the extended coset `zeta * <omega_ext>`.
    pub fn coeff_to_extended(&self, poly: &DensePolynomial<F>) -> Evaluations<F, D<F>> {
        assert!(poly.coeffs.len() <= self.extended_size());
        let mut coeffs = poly.coeffs.clone();
        distribute_powers(&mut coeffs, self.zeta);
        let evals = self.extended.fft(&coeffs);
        Evaluations::from_vec_and_domain(evals, self.extended)
    }

    /// Interpolates evaluations over the extended coset, keeping the
    /// `n * quotient_poly_degree` coefficients of a quotient polynomial.
    pub fn extended_to_coeff(&self, evals: Evaluations<F, D<F>>) -> Vec<F> {
        assert_eq!(evals.evals.len(), self.extended_size());
        let mut coeffs = self.extended.ifft(&evals.evals);
        distribute_powers(&mut coeffs, self.zeta_inv);
        coeffs.truncate(self.n() * self.quotient_poly_degree);
        coeffs
    }

    /// Divides evaluations over the extended coset by `X^n - 1`.
    pub fn divide_by_vanishing_poly(&self, mut evals: Evaluations<F, D<F>>) -> Evaluations<F, D<F>> {
        assert_eq!(evals.evals.len(), self.extended_size());
        let t = &self.t_evaluations_inv;
        evals
            .evals
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, eval)| *eval *= t[i % t.len()]);
        evals
    }

    /// Returns `x * omega^rotation`.
    pub fn rotate_omega(&self, x: F, rotation: Rotation) -> F {
        if rotation.0 >= 0 {
            x * self.d1.group_gen.pow([rotation.0 as u64])
        } else {
            x * self.d1.group_gen_inv.pow([rotation.0.unsigned_abs() as u64])
        }
    }

    /// Evaluates the Lagrange basis polynomials `l_i(X)` at `x`, for `i` in
    /// `rotations`, given `xn = x^n`. Negative indices wrap around.
    pub fn l_i_range<I>(&self, x: F, xn: F, rotations: I) -> Vec<F>
    where
        I: IntoIterator<Item = i32> + Clone,
    {
        let mut results: Vec<F> = rotations
            .clone()
            .into_iter()
            .map(|rotation| x - self.rotate_omega(F::one(), Rotation(rotation)))
            .collect();
        batch_inversion(&mut results);

        // l_i(x) = omega^i (x^n - 1) / (n (x - omega^i))
        let common = (xn - F::one()) * self.d1.size_inv;
        rotations
            .into_iter()
            .zip(results.iter_mut())
            .for_each(|(rotation, result)| {
                *result = self.rotate_omega(*result * common, Rotation(rotation));
            });
        results
    }
}

/// Multiplies the `i`-th coefficient by `g^i`.
fn distribute_powers<F: CircuitField>(coeffs: &mut [F], g: F) {
    let mut power = F::one();
    for coeff in coeffs.iter_mut() {
        *coeff *= power;
        power *= g;
    }
}
