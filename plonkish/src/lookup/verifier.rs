//! Verifier side of the lookup argument.

use crate::{
    circuits::expr::Expression,
    lookup::Argument,
    vanishing::evaluator::VanishingVerificationEvaluator,
};
use plonkish_utils::CircuitField;
use poly_commitment::VerifierQuery;

/// The commitments and evaluations of one lookup, as read from the proof.
pub struct Evaluated<'a, F, C> {
    pub permuted_input_commitment: &'a C,
    pub permuted_table_commitment: &'a C,
    pub product_commitment: &'a C,
    pub product_eval: F,
    pub product_next_eval: F,
    pub permuted_input_eval: F,
    pub permuted_input_inv_eval: F,
    pub permuted_table_eval: F,
}

impl<'a, F: CircuitField, C> Evaluated<'a, F, C> {
    /// The values at `x` of the five lookup constraints, with
    /// `active = 1 - (l_last + l_blind)`:
    ///
    /// - `l_0 * (1 - z)`
    /// - `l_last * (z^2 - z)`
    /// - `active * (z(omega x) (A' + beta) (S' + gamma) - z (A + beta) (S + gamma))`
    /// - `l_0 * (A' - S')`
    /// - `active * (A' - S') * (A' - A'(omega^-1 x))`
    #[allow(clippy::too_many_arguments)]
    pub fn expressions(
        &self,
        argument: &Argument<F>,
        evaluator: &VanishingVerificationEvaluator<'_, F>,
        l_0: F,
        l_last: F,
        l_blind: F,
        theta: F,
        beta: F,
        gamma: F,
    ) -> [F; 5] {
        let active = F::one() - (l_last + l_blind);

        let compress = |expressions: &[Expression<F>]| {
            expressions
                .iter()
                .map(|expr| expr.evaluate(evaluator))
                .fold(F::zero(), |acc, eval| acc * theta + eval)
        };
        let left = self.product_next_eval
            * (self.permuted_input_eval + beta)
            * (self.permuted_table_eval + gamma);
        let right = self.product_eval
            * (compress(argument.input_expressions()) + beta)
            * (compress(argument.table_expressions()) + gamma);

        let input_minus_table = self.permuted_input_eval - self.permuted_table_eval;
        [
            l_0 * (F::one() - self.product_eval),
            l_last * (self.product_eval.square() - self.product_eval),
            active * (left - right),
            l_0 * input_minus_table,
            active
                * input_minus_table
                * (self.permuted_input_eval - self.permuted_input_inv_eval),
        ]
    }

    pub fn queries(&self, x: F, x_inv: F, x_next: F) -> [VerifierQuery<'a, F, C>; 5] {
        [
            VerifierQuery::new_commitment(self.product_commitment, x, self.product_eval),
            VerifierQuery::new_commitment(self.permuted_input_commitment, x, self.permuted_input_eval),
            VerifierQuery::new_commitment(self.permuted_table_commitment, x, self.permuted_table_eval),
            VerifierQuery::new_commitment(
                self.permuted_input_commitment,
                x_inv,
                self.permuted_input_inv_eval,
            ),
            VerifierQuery::new_commitment(self.product_commitment, x_next, self.product_next_eval),
        ]
    }
}
