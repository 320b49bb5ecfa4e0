//! Keys of the permutation argument: the `sigma` polynomials.

use crate::{
    circuits::domains::EvaluationDomains,
    permutation::{cycle_store::Assembly, delta},
};
use plonkish_utils::CircuitField;
use ark_poly::{univariate::DensePolynomial, Evaluations, Radix2EvaluationDomain as D};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use poly_commitment::{CommitmentError, PolynomialCommitmentScheme};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Commitments to the `sigma` polynomials, one per column.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "C: CanonicalSerialize + CanonicalDeserialize")]
pub struct VerifyingKey<C> {
    #[serde_as(as = "Vec<plonkish_utils::serialization::SerdeAs>")]
    commitments: Vec<C>,
}

impl<C> VerifyingKey<C> {
    pub fn commitments(&self) -> &[C] {
        &self.commitments
    }
}

/// The `sigma` polynomials in Lagrange, coefficient and extended form.
#[derive(Clone, Debug)]
pub struct ProvingKey<F: CircuitField> {
    pub(crate) permutations: Vec<Evaluations<F, D<F>>>,
    pub(crate) polys: Vec<DensePolynomial<F>>,
    pub(crate) cosets: Vec<Evaluations<F, D<F>>>,
}

impl<F: CircuitField> ProvingKey<F> {
    pub fn permutations(&self) -> &[Evaluations<F, D<F>>] {
        &self.permutations
    }

    pub fn polys(&self) -> &[DensePolynomial<F>] {
        &self.polys
    }

    pub fn cosets(&self) -> &[Evaluations<F, D<F>>] {
        &self.cosets
    }
}

impl Assembly {
    /// `sigma_i(omega^j) = delta^c * omega^r` where `(c, r)` is the cell
    /// following `(i, j)` in its cycle.
    fn permutation_values<F: CircuitField>(&self, domains: &EvaluationDomains<F>) -> Vec<Vec<F>> {
        let n = domains.n();
        let omega = domains.omega();

        let mut omega_powers = Vec::with_capacity(n);
        let mut power = F::one();
        for _ in 0..n {
            omega_powers.push(power);
            power *= omega;
        }

        let delta = delta::<F>();
        let mut delta_powers = Vec::with_capacity(self.columns().len());
        let mut power = F::one();
        for _ in 0..self.columns().len() {
            delta_powers.push(power);
            power *= delta;
        }

        self.mapping()
            .par_iter()
            .map(|column| {
                column
                    .iter()
                    .map(|&(c, r)| delta_powers[c] * omega_powers[r])
                    .collect()
            })
            .collect()
    }

    pub fn build_vk<F, P>(
        &self,
        params: &P,
        domains: &EvaluationDomains<F>,
    ) -> Result<VerifyingKey<P::Commitment>, CommitmentError>
    where
        F: CircuitField,
        P: PolynomialCommitmentScheme<F>,
    {
        let commitments = self
            .permutation_values(domains)
            .into_iter()
            .map(|values| params.commit_lagrange(&domains.lagrange_from_vec(values)))
            .collect::<Result<_, _>>()?;
        Ok(VerifyingKey { commitments })
    }

    pub fn build_pk<F: CircuitField>(&self, domains: &EvaluationDomains<F>) -> ProvingKey<F> {
        let permutations: Vec<_> = self
            .permutation_values(domains)
            .into_iter()
            .map(|values| domains.lagrange_from_vec(values))
            .collect();
        let polys: Vec<_> = permutations
            .iter()
            .map(|evals| domains.lagrange_to_coeff(evals.clone()))
            .collect();
        let cosets = polys
            .iter()
            .map(|poly| domains.coeff_to_extended(poly))
            .collect();
        ProvingKey {
            permutations,
            polys,
            cosets,
        }
    }
}
