//! Prover side of the vanishing argument.

use crate::{
    blinder::{BlindedPolynomial, Blinder},
    circuits::domains::EvaluationDomains,
    error::ProverError,
};
use plonkish_utils::CircuitField;
use ark_poly::{univariate::DensePolynomial, Evaluations, Polynomial, Radix2EvaluationDomain as D};
use plonkish_utils::ExtendedDensePolynomial;
use poly_commitment::{transcript::TranscriptWrite, PolynomialCommitmentScheme, ProverQuery};
use rand_core::RngCore;

/// A random polynomial of degree `n - 1`, committed before `y` is
/// squeezed. It masks the evaluation of `h` at `x`.
pub struct Committed<F: CircuitField> {
    random_poly: BlindedPolynomial<F>,
}

/// The pieces of `h`, each of `n` coefficients.
pub struct Constructed<F: CircuitField> {
    h_pieces: Vec<DensePolynomial<F>>,
    h_blinds: Vec<F>,
    committed: Committed<F>,
}

pub struct Evaluated<F: CircuitField> {
    h_poly: DensePolynomial<F>,
    h_blind: F,
    committed: Committed<F>,
}

pub fn commit<F, P, R, T>(
    params: &P,
    domains: &EvaluationDomains<F>,
    blinder: &mut Blinder<'_, R>,
    transcript: &mut T,
) -> Result<Committed<F>, ProverError>
where
    F: CircuitField,
    P: PolynomialCommitmentScheme<F>,
    R: RngCore,
    T: TranscriptWrite<F, P::Commitment>,
{
    let coeffs = (0..domains.n()).map(|_| blinder.random()).collect();
    let random_poly = DensePolynomial { coeffs };
    let random_blind = blinder.random();
    let commitment = params.commit(&random_poly)?;
    transcript.write_point(commitment)?;

    Ok(Committed {
        random_poly: BlindedPolynomial::new(random_poly, random_blind),
    })
}

impl<F: CircuitField> Committed<F> {
    /// Divides the circuit column by `X^n - 1`, splits the quotient into
    /// `quotient_poly_degree` pieces and writes their commitments.
    pub fn construct<P, R, T>(
        self,
        params: &P,
        domains: &EvaluationDomains<F>,
        circuit_column: Evaluations<F, D<F>>,
        blinder: &mut Blinder<'_, R>,
        transcript: &mut T,
    ) -> Result<Constructed<F>, ProverError>
    where
        P: PolynomialCommitmentScheme<F>,
        R: RngCore,
        T: TranscriptWrite<F, P::Commitment>,
    {
        let h_evals = domains.divide_by_vanishing_poly(circuit_column);
        let h_poly = DensePolynomial {
            coeffs: domains.extended_to_coeff(h_evals),
        };
        let h_pieces = h_poly.split(domains.n(), domains.quotient_poly_degree());
        let h_blinds: Vec<F> = h_pieces.iter().map(|_| blinder.random()).collect();

        for piece in h_pieces.iter() {
            transcript.write_point(params.commit(piece)?)?;
        }

        Ok(Constructed {
            h_pieces,
            h_blinds,
            committed: self,
        })
    }
}

impl<F: CircuitField> Constructed<F> {
    /// Collapses the pieces into `h_0 + x^n h_1 + ... ` and writes the
    /// evaluation of the random polynomial at `x`.
    pub fn evaluate<C, T: TranscriptWrite<F, C>>(
        self,
        x: F,
        xn: F,
        transcript: &mut T,
    ) -> Result<Evaluated<F>, ProverError> {
        let h_poly = DensePolynomial::fold(&self.h_pieces, xn);
        let h_blind = self
            .h_blinds
            .iter()
            .rev()
            .fold(F::zero(), |acc, blind| acc * xn + blind);

        let random_eval = self.committed.random_poly.poly.evaluate(&x);
        transcript.write_scalar(random_eval)?;

        Ok(Evaluated {
            h_poly,
            h_blind,
            committed: self.committed,
        })
    }
}

impl<F: CircuitField> Evaluated<F> {
    pub fn open(&self, x: F) -> [ProverQuery<'_, F>; 2] {
        [
            ProverQuery::new(x, &self.h_poly, self.h_blind),
            ProverQuery::new(
                x,
                &self.committed.random_poly.poly,
                self.committed.random_poly.blind,
            ),
        ]
    }
}
