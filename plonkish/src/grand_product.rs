//! The grand product argument shared by the permutation and lookup
//! arguments.
//!
//! A grand product column `z` starts from `last_z` (1 for the first column)
//! and accumulates the ratio `numerator[i] / denominator[i]` row by row:
//!
//! ```text
//! z[0]   = last_z
//! z[i+1] = z[i] * numerator[i] / denominator[i],  0 <= i < n - blinding_factors - 1
//! ```
//!
//! The last `blinding_factors` rows carry no constraint and are filled by the
//! [Blinder]. The row `n - blinding_factors - 1`, `l_last`, holds the final
//! value, which chains several columns together.

use crate::{
    blinder::{BlindedPolynomial, Blinder},
    circuits::domains::EvaluationDomains,
    error::ProverError,
};
use plonkish_utils::CircuitField;
use plonkish_utils::par_batch_invert_nonzero;
use poly_commitment::PolynomialCommitmentScheme;
use rand_core::RngCore;

/// The ratios of a single grand product column.
///
/// `denominator` overwrites the rows of the given slice with the
/// denominators. `numerator` multiplies the numerators into the inverted
/// denominators.
///
/// # Panics
///
/// Panics if a denominator is zero.
pub fn ratios<F: CircuitField>(
    n: usize,
    numerator: impl FnOnce(&mut [F]),
    denominator: impl FnOnce(&mut [F]),
) -> Vec<F> {
    let mut grand_product = vec![F::zero(); n];
    denominator(&mut grand_product);
    par_batch_invert_nonzero(&mut grand_product);
    numerator(&mut grand_product);
    grand_product
}

/// The ratios of a grand product spanning `num_cols` columns.
///
/// Both callbacks are called once per column index and multiply that
/// column's factors into the rows of the given slice.
///
/// # Panics
///
/// Panics if a denominator is zero.
pub fn ratios_excessive<F: CircuitField>(
    n: usize,
    num_cols: usize,
    numerator: impl Fn(usize, &mut [F]),
    denominator: impl Fn(usize, &mut [F]),
) -> Vec<F> {
    let mut grand_product = vec![F::one(); n];
    for column in 0..num_cols {
        denominator(column, &mut grand_product);
    }
    par_batch_invert_nonzero(&mut grand_product);
    for column in 0..num_cols {
        numerator(column, &mut grand_product);
    }
    grand_product
}

/// Runs the recurrence over `ratios`, starting from `last_z`, and updates
/// `last_z` to the value at row `n - blinding_factors - 1`. The blinding
/// rows are left at zero.
pub fn create_polynomial<F: CircuitField>(
    ratios: &[F],
    last_z: &mut F,
    blinding_factors: usize,
) -> Vec<F> {
    let n = ratios.len();
    assert!(n > blinding_factors, "the column is shorter than its blinding rows");
    let last_row = n - blinding_factors - 1;

    let mut z = vec![F::zero(); n];
    z[0] = *last_z;
    for i in 0..last_row {
        z[i + 1] = z[i] * ratios[i];
    }
    *last_z = z[last_row];
    z
}

/// A committed grand product column.
pub struct CommittedGrandProduct<F: CircuitField, C> {
    pub commitment: C,
    pub blinded: BlindedPolynomial<F>,
}

/// Blinds `z`, then commits to it and interpolates it.
pub fn commit<F, P, R>(
    params: &P,
    domains: &EvaluationDomains<F>,
    blinder: &mut Blinder<'_, R>,
    mut z: Vec<F>,
) -> Result<CommittedGrandProduct<F, P::Commitment>, ProverError>
where
    F: CircuitField,
    P: PolynomialCommitmentScheme<F>,
    R: RngCore,
{
    blinder.blind(&mut z, false);
    let evals = domains.lagrange_from_vec(z);
    let commitment = params.commit_lagrange(&evals)?;
    let blind = blinder.random();
    let poly = domains.lagrange_to_coeff(evals);
    Ok(CommittedGrandProduct {
        commitment,
        blinded: BlindedPolynomial::new(poly, blind),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::{Field, One, UniformRand, Zero};
    use plonkish_utils::tests::make_test_rng;

    #[test]
    fn test_recurrence() {
        let mut rng = make_test_rng(None);
        let n = 16;
        let blinding_factors = 5;
        let numerators: Vec<Fr> = (0..n).map(|_| Fr::rand(&mut rng)).collect();
        let denominators: Vec<Fr> = (0..n).map(|_| Fr::rand(&mut rng)).collect();

        let ratios = ratios(
            n,
            |values| {
                for (value, numerator) in values.iter_mut().zip(numerators.iter()) {
                    *value *= numerator;
                }
            },
            |values| values.copy_from_slice(&denominators),
        );
        let mut last_z = Fr::one();
        let z = create_polynomial(&ratios, &mut last_z, blinding_factors);

        assert_eq!(z[0], Fr::one());
        for i in 0..n - blinding_factors - 1 {
            assert_eq!(z[i + 1] * denominators[i], z[i] * numerators[i]);
        }
        assert_eq!(last_z, z[n - blinding_factors - 1]);
        assert!(z[n - blinding_factors..].iter().all(|v| v.is_zero()));
    }

    #[test]
    fn test_chained_columns() {
        let n = 8;
        let blinding_factors = 2;
        // a ratio of 2 on every row, over two columns: 4 per row
        let ratios = ratios_excessive(
            n,
            2,
            |_, values| values.iter_mut().for_each(|v| *v *= Fr::from(6u64)),
            |_, values| values.iter_mut().for_each(|v| *v *= Fr::from(3u64)),
        );
        assert!(ratios.iter().all(|r| *r == Fr::from(4u64)));

        let mut last_z = Fr::one();
        let first = create_polynomial(&ratios, &mut last_z, blinding_factors);
        assert_eq!(last_z, Fr::from(4u64).pow([5u64]));
        let second = create_polynomial(&ratios, &mut last_z, blinding_factors);
        assert_eq!(second[0], first[n - blinding_factors - 1]);
        assert_eq!(last_z, Fr::from(4u64).pow([10u64]));
    }

    #[test]
    #[should_panic(expected = "zero")]
    fn test_zero_denominator() {
        ratios::<Fr>(
            4,
            |_| {},
            |values| {
                values.fill(Fr::one());
                values[1] = Fr::from(0u64);
            },
        );
    }
}
