//! Verifier side of the permutation argument.
//!
//! With `z_i` the product of chunk `i` and `active = 1 - (l_last + l_blind)`,
//! the verifier checks at `x`:
//!
//! - `l_0 * (1 - z_0) = 0`
//! - `l_last * (z_last^2 - z_last) = 0` for the last product
//! - `l_0 * (z_i - z_{i-1}(omega^last x)) = 0` for `i > 0`
//! - `active * (z_i(omega x) * prod(v + beta s + gamma) - z_i * prod(v + beta delta^j x + gamma)) = 0`

use crate::{
    circuits::{
        column::Any,
        constraint_system::ConstraintSystem,
        query::Rotation,
    },
    permutation::{delta, keygen::VerifyingKey},
};
use plonkish_utils::CircuitField;
use poly_commitment::VerifierQuery;

/// The commitments and evaluations of the products of one circuit, as read
/// from the proof.
pub struct Evaluated<'a, F, C> {
    pub product_commitments: &'a [C],
    pub product_evals: &'a [F],
    pub product_next_evals: &'a [F],
    /// One per product but the last
    pub product_last_evals: &'a [F],
}

/// The opened values the permutation constraints are evaluated on.
pub struct Openings<'a, F> {
    pub advice_evals: &'a [F],
    pub fixed_evals: &'a [F],
    pub instance_evals: &'a [F],
    /// Evaluations of the `sigma` polynomials at `x`
    pub common_evals: &'a [F],
}

/// Lagrange basis values at `x`.
#[derive(Clone, Copy, Debug)]
pub struct Boundaries<F> {
    pub l_0: F,
    pub l_last: F,
    pub l_blind: F,
}

impl<'a, F: CircuitField, C> Evaluated<'a, F, C> {
    /// The values of the permutation constraints at `x`, in the order the
    /// prover folds them.
    #[allow(clippy::too_many_arguments)]
    pub fn expressions(
        &self,
        cs: &ConstraintSystem<F>,
        openings: &Openings<'_, F>,
        boundaries: Boundaries<F>,
        beta: F,
        gamma: F,
        x: F,
    ) -> Vec<F> {
        let chunk_len = cs.degree() - 2;
        let Boundaries {
            l_0,
            l_last,
            l_blind,
        } = boundaries;
        let mut expressions = vec![];

        let (Some(first), Some(last)) = (self.product_evals.first(), self.product_evals.last())
        else {
            return expressions;
        };

        // the first product starts at 1
        expressions.push(l_0 * (F::one() - first));
        // the last product ends at 0 or 1
        expressions.push(l_last * (last.square() - last));
        // each product starts where the previous one ended
        for (eval, previous_last) in self.product_evals[1..]
            .iter()
            .zip(self.product_last_evals.iter())
        {
            expressions.push(l_0 * (*eval - previous_last));
        }

        let active = F::one() - (l_last + l_blind);
        let delta = delta::<F>();
        for (chunk_index, ((columns, sigmas), (eval, next_eval))) in cs
            .permutation()
            .columns()
            .chunks(chunk_len)
            .zip(openings.common_evals.chunks(chunk_len))
            .zip(self.product_evals.iter().zip(self.product_next_evals.iter()))
            .enumerate()
        {
            let values: Vec<F> = columns
                .iter()
                .map(|column| {
                    let index = cs.get_any_query_index(*column, Rotation::cur());
                    match column.column_type() {
                        Any::Advice(_) => openings.advice_evals[index],
                        Any::Fixed => openings.fixed_evals[index],
                        Any::Instance => openings.instance_evals[index],
                        Any::Unresolved => unreachable!("permutation columns are resolved"),
                    }
                })
                .collect();

            let mut left = *next_eval;
            for (value, sigma) in values.iter().zip(sigmas.iter()) {
                left *= *value + beta * sigma + gamma;
            }

            let mut right = *eval;
            let mut current_delta = beta * x * delta.pow([(chunk_index * chunk_len) as u64]);
            for value in values.iter() {
                right *= *value + current_delta + gamma;
                current_delta *= delta;
            }

            expressions.push(active * (left - right));
        }

        expressions
    }

    pub fn queries(&self, x: F, x_next: F, x_last: F) -> Vec<VerifierQuery<'a, F, C>> {
        let sets = self.product_commitments.len();
        let mut queries = Vec::with_capacity(3 * sets);
        for ((commitment, eval), next_eval) in self
            .product_commitments
            .iter()
            .zip(self.product_evals.iter())
            .zip(self.product_next_evals.iter())
        {
            queries.push(VerifierQuery::new_commitment(commitment, x, *eval));
            queries.push(VerifierQuery::new_commitment(commitment, x_next, *next_eval));
        }
        for (commitment, last_eval) in self.product_commitments[..sets.saturating_sub(1)]
            .iter()
            .zip(self.product_last_evals.iter())
            .rev()
        {
            queries.push(VerifierQuery::new_commitment(commitment, x_last, *last_eval));
        }
        queries
    }
}

/// Queries of the `sigma` polynomials at `x`.
pub fn common_queries<'a, F: CircuitField, C>(
    vk: &'a VerifyingKey<C>,
    common_evals: &[F],
    x: F,
) -> Vec<VerifierQuery<'a, F, C>> {
    vk.commitments()
        .iter()
        .zip(common_evals.iter())
        .map(|(commitment, eval)| VerifierQuery::new_commitment(commitment, x, *eval))
        .collect()
}
