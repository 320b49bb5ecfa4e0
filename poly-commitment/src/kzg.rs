//! KZG commitments ([KZG10](https://www.iacr.org/archive/asiacrypt2010/6477178/6477178.pdf))
//! over a pairing friendly curve, opened with [crate::shplonk].
//!
//! The parameters hold the powers `[s^i]_1` of a secret `s`, the Lagrange
//! basis `[L_i(s)]_1` of the base domain, and `[1]_2`, `[s]_2` for the final
//! pairing check.

use crate::{
    shplonk,
    transcript::{TranscriptRead, TranscriptWrite},
    CommitmentCurve, CommitmentError, Msm, PolynomialCommitmentScheme, ProverQuery, VerifierQuery,
};
use ark_ec::{pairing::Pairing, CurveGroup, Group, VariableBaseMSM};
use ark_ff::{One, PrimeField};
use ark_poly::{
    univariate::DensePolynomial, EvaluationDomain, Evaluations, Radix2EvaluationDomain as D,
};
use plonkish_utils::{radix2_domain, serialization::SerdeAs, CircuitField};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct KzgParams<E: Pairing> {
    pub k: u32,
    pub n: usize,
    /// `[s^i]_1` for `i < n`
    #[serde_as(as = "Vec<SerdeAs>")]
    pub g: Vec<E::G1Affine>,
    /// `[L_i(s)]_1` for the Lagrange basis of the domain of size `n`
    #[serde_as(as = "Vec<SerdeAs>")]
    pub g_lagrange: Vec<E::G1Affine>,
    #[serde_as(as = "SerdeAs")]
    pub g2: E::G2Affine,
    #[serde_as(as = "SerdeAs")]
    pub s_g2: E::G2Affine,
}

impl<E: Pairing> KzgParams<E> {
    /// Creates parameters for polynomials of up to `2^k` coefficients.
    ///
    /// # Safety
    ///
    /// The method is annotated as unsafe because the caller chooses the
    /// toxic waste `s`: anybody knowing it can forge openings. Only use it
    /// for tests and benchmarks.
    pub unsafe fn unsafe_setup(k: u32, s: E::ScalarField) -> Result<Self, CommitmentError>
    where
        E::ScalarField: CircuitField,
    {
        let n = 1usize << k;
        let domain =
            radix2_domain::<E::ScalarField>(n).ok_or(CommitmentError::InvalidDomainSize(n))?;

        let mut powers = Vec::with_capacity(n);
        let mut current = E::ScalarField::one();
        for _ in 0..n {
            powers.push(current);
            current *= s;
        }

        let g1 = E::G1::generator();
        let g_proj: Vec<E::G1> = powers.par_iter().map(|power| g1 * power).collect();
        let g = E::G1::normalize_batch(&g_proj);

        let lagrange = domain.evaluate_all_lagrange_coefficients(s);
        let g_lagrange_proj: Vec<E::G1> = lagrange.par_iter().map(|l| g1 * l).collect();
        let g_lagrange = E::G1::normalize_batch(&g_lagrange_proj);

        let g2 = E::G2::generator();
        let s_g2 = (g2 * s).into_affine();

        log::debug!("kzg parameters created for 2^{k} coefficients");

        Ok(Self {
            k,
            n,
            g,
            g_lagrange,
            g2: g2.into_affine(),
            s_g2,
        })
    }

    /// Computes `Σ scalar_i · base_i`.
    pub fn eval_msm(&self, msm: &Msm<E::ScalarField, E::G1Affine>) -> E::G1 {
        let (bases, scalars): (Vec<_>, Vec<_>) = msm
            .terms()
            .iter()
            .map(|(scalar, base)| (*base, scalar.into_bigint()))
            .unzip();
        E::G1::msm_bigint(&bases, &scalars)
    }

    /// Checks `e(left, [s]_2) == e(right, [1]_2)`.
    pub fn pairing_check(&self, left: E::G1Affine, right: E::G1) -> bool {
        let lhs = [
            E::G1Prepared::from(left),
            E::G1Prepared::from((-right).into_affine()),
        ];
        let rhs = [
            E::G2Prepared::from(self.s_g2),
            E::G2Prepared::from(self.g2),
        ];
        match E::final_exponentiation(E::multi_miller_loop(lhs, rhs)) {
            Some(res) => res.0 == E::TargetField::one(),
            None => false,
        }
    }
}

impl<E: Pairing> PolynomialCommitmentScheme<E::ScalarField> for KzgParams<E>
where
    E::G1Affine: CommitmentCurve,
{
    type Commitment = E::G1Affine;

    const QUERY_INSTANCE: bool = false;

    fn k(&self) -> u32 {
        self.k
    }

    fn n(&self) -> usize {
        self.n
    }

    fn commit(
        &self,
        poly: &DensePolynomial<E::ScalarField>,
    ) -> Result<Self::Commitment, CommitmentError> {
        if poly.coeffs.len() > self.n {
            return Err(CommitmentError::PolynomialTooLarge(poly.coeffs.len(), self.n));
        }
        let scalars: Vec<_> = poly.coeffs.iter().map(|c| c.into_bigint()).collect();
        Ok(E::G1::msm_bigint(&self.g[..scalars.len()], &scalars).into_affine())
    }

    fn commit_lagrange(
        &self,
        evals: &Evaluations<E::ScalarField, D<E::ScalarField>>,
    ) -> Result<Self::Commitment, CommitmentError> {
        if evals.evals.len() != self.n {
            return Err(CommitmentError::PolynomialTooLarge(evals.evals.len(), self.n));
        }
        let scalars: Vec<_> = evals.evals.iter().map(|e| e.into_bigint()).collect();
        Ok(E::G1::msm_bigint(&self.g_lagrange, &scalars).into_affine())
    }

    fn create_opening_proof<T: TranscriptWrite<E::ScalarField, Self::Commitment>>(
        &self,
        queries: &[ProverQuery<'_, E::ScalarField>],
        transcript: &mut T,
    ) -> Result<(), CommitmentError> {
        shplonk::create_proof(self, queries, transcript)
    }

    fn verify_opening_proof<T: TranscriptRead<E::ScalarField, Self::Commitment>>(
        &self,
        queries: &[VerifierQuery<'_, E::ScalarField, Self::Commitment>],
        transcript: &mut T,
    ) -> Result<bool, CommitmentError> {
        shplonk::verify_proof(self, queries, transcript)
    }
}
