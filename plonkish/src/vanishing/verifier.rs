//! Verifier side of the vanishing argument.

use crate::error::VerifyError;
use plonkish_utils::CircuitField;
use poly_commitment::{CommitmentError, Msm, VerifierQuery};

/// The commitments and evaluation of the vanishing argument, as read from
/// the proof.
pub struct Evaluated<'a, F, C> {
    pub random_poly_commitment: &'a C,
    pub h_commitments: &'a [C],
    pub random_eval: F,
}

/// The vanishing argument once the expected value of `h(x)` is known.
pub struct PartiallyEvaluated<'a, F, C> {
    random_poly_commitment: &'a C,
    random_eval: F,
    h_commitment: Msm<F, C>,
    expected_h_eval: F,
}

impl<'a, F: CircuitField, C: Copy> Evaluated<'a, F, C> {
    /// Folds the constraint evaluations with `y` and divides the result by
    /// `x^n - 1` to get the value `h(x)` must open to. The commitment to
    /// `h` is collapsed with powers of `x^n` the same way the prover
    /// collapsed the pieces.
    pub fn verify(
        &self,
        expressions: impl Iterator<Item = F>,
        y: F,
        xn: F,
    ) -> Result<PartiallyEvaluated<'a, F, C>, VerifyError> {
        let folded = expressions.fold(F::zero(), |h_eval, value| h_eval * y + value);
        let vanishing = (xn - F::one())
            .inverse()
            .ok_or(VerifyError::Commitment(CommitmentError::DegenerateChallenge))?;
        let expected_h_eval = folded * vanishing;

        let h_commitment = self.h_commitments.iter().rev().fold(Msm::new(), |mut acc, commitment| {
            acc.scale(xn);
            acc.append_term(F::one(), *commitment);
            acc
        });

        Ok(PartiallyEvaluated {
            random_poly_commitment: self.random_poly_commitment,
            random_eval: self.random_eval,
            h_commitment,
            expected_h_eval,
        })
    }
}

impl<'a, F: CircuitField, C> PartiallyEvaluated<'a, F, C> {
    pub fn expected_h_eval(&self) -> F {
        self.expected_h_eval
    }

    pub fn queries(&self, x: F) -> [VerifierQuery<'_, F, C>; 2] {
        [
            VerifierQuery::new_msm(&self.h_commitment, x, self.expected_h_eval),
            VerifierQuery::new_commitment(self.random_poly_commitment, x, self.random_eval),
        ]
    }
}
