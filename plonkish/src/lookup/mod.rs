//! The lookup argument: every row of the compressed input expressions must
//! appear among the rows of the compressed table expressions.
//!
//! Input and table expressions are compressed with the challenge `theta`,
//! `A = sum_k theta^(m-1-k) a_k`, then permuted into `A'` and `S'` such that
//! each `A'` row either equals the `S'` row or repeats the previous `A'`
//! row. A grand product shows that `(A', S')` is a permutation of `(A, S)`.

use crate::circuits::{expr::Expression, query::Selector};
use ark_ff::Field;
use std::cmp::max;

pub mod prover;
pub mod verifier;

#[derive(Clone, Debug)]
pub struct Argument<F> {
    name: String,
    input_expressions: Vec<Expression<F>>,
    table_expressions: Vec<Expression<F>>,
}

impl<F: Field> Argument<F> {
    /// Creates a lookup of each input expression into the table expression
    /// paired with it.
    pub fn new(name: &str, table_map: Vec<(Expression<F>, Expression<F>)>) -> Self {
        let (input_expressions, table_expressions) = table_map.into_iter().unzip();
        Argument {
            name: name.to_string(),
            input_expressions,
            table_expressions,
        }
    }

    /// Degree of the lookup constraints:
    /// `(1 - (l_last + l_blind)) * z(omega X) * (A'(X) + beta) * (S'(X) + gamma)`
    /// has degree 4, and
    /// `(1 - (l_last + l_blind)) * z(X) * (A(X) + beta) * (S(X) + gamma)`
    /// has degree `2 + input_degree + table_degree`.
    pub fn required_degree(&self) -> usize {
        assert_eq!(self.input_expressions.len(), self.table_expressions.len());

        let input_degree = self
            .input_expressions
            .iter()
            .map(Expression::degree)
            .fold(1, max);
        let table_degree = self
            .table_expressions
            .iter()
            .map(Expression::degree)
            .fold(1, max);

        max(4, 2 + input_degree + table_degree)
    }

    pub(crate) fn replace_selectors(&mut self, replacement: &impl Fn(Selector) -> Expression<F>) {
        for expr in self
            .input_expressions
            .iter_mut()
            .chain(self.table_expressions.iter_mut())
        {
            *expr = expr.replace_selectors(replacement);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input_expressions(&self) -> &[Expression<F>] {
        &self.input_expressions
    }

    pub fn table_expressions(&self) -> &[Expression<F>] {
        &self.table_expressions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::query::{AdviceQuery, FixedQuery, Rotation};
    use ark_bn254::Fr;

    #[test]
    fn test_required_degree() {
        let a = Expression::<Fr>::Advice(AdviceQuery {
            index: 0,
            column_index: 0,
            rotation: Rotation::cur(),
            phase: 0,
        });
        let t = Expression::<Fr>::Fixed(FixedQuery {
            index: 0,
            column_index: 0,
            rotation: Rotation::cur(),
        });
        let argument = Argument::new("plain", vec![(a.clone(), t.clone())]);
        assert_eq!(argument.required_degree(), 4);
        assert_eq!(argument.name(), "plain");

        let argument = Argument::new("squared", vec![(a.clone() * a.clone(), t)]);
        assert_eq!(argument.required_degree(), 5);
    }
}
