//! Evaluation of gate and lookup expressions on the values opened at `x`.

use crate::circuits::{
    expr::Evaluator,
    query::{AdviceQuery, Challenge, FixedQuery, InstanceQuery, Selector},
};
use ark_ff::Field;

/// Resolves queries against the evaluations read from the proof, indexed
/// by query index.
///
/// # Panics
///
/// Evaluating an expression that still contains a [Selector] panics. Key
/// generation replaces every selector with a fixed column, so only
/// expressions taken from a [crate::keys::VerifyingKey] may be evaluated.
pub struct VanishingVerificationEvaluator<'a, F> {
    fixed_evals: &'a [F],
    advice_evals: &'a [F],
    instance_evals: &'a [F],
    challenges: &'a [F],
}

impl<'a, F> VanishingVerificationEvaluator<'a, F> {
    pub fn new(
        fixed_evals: &'a [F],
        advice_evals: &'a [F],
        instance_evals: &'a [F],
        challenges: &'a [F],
    ) -> Self {
        VanishingVerificationEvaluator {
            fixed_evals,
            advice_evals,
            instance_evals,
            challenges,
        }
    }
}

impl<'a, F: Field> Evaluator<F> for VanishingVerificationEvaluator<'a, F> {
    type Output = F;

    fn constant(&self, value: F) -> F {
        value
    }

    fn selector(&self, _: Selector) -> F {
        panic!("virtual selectors are removed during optimization")
    }

    fn fixed(&self, query: FixedQuery) -> F {
        self.fixed_evals[query.index()]
    }

    fn advice(&self, query: AdviceQuery) -> F {
        self.advice_evals[query.index()]
    }

    fn instance(&self, query: InstanceQuery) -> F {
        self.instance_evals[query.index()]
    }

    fn challenge(&self, challenge: Challenge) -> F {
        self.challenges[challenge.index()]
    }

    fn negated(&self, a: F) -> F {
        -a
    }

    fn sum(&self, a: F, b: F) -> F {
        a + b
    }

    fn product(&self, a: F, b: F) -> F {
        a * b
    }

    fn scaled(&self, a: F, scalar: F) -> F {
        a * scalar
    }
}
