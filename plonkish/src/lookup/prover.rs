//! Prover side of the lookup argument.

use crate::{
    blinder::{BlindedPolynomial, Blinder},
    circuits::{
        domains::EvaluationDomains,
        expr::{Evaluator, Expression},
        query::{AdviceQuery, Challenge, FixedQuery, InstanceQuery, Rotation, Selector},
    },
    error::ProverError,
    grand_product,
    lookup::Argument,
    table::RefTable,
};
use plonkish_utils::CircuitField;
use ark_poly::{Evaluations, Polynomial, Radix2EvaluationDomain as D};
use poly_commitment::{transcript::TranscriptWrite, PolynomialCommitmentScheme, ProverQuery};
use rand_core::RngCore;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// The compressed and permuted columns of a lookup, committed.
pub struct Permuted<F: CircuitField, C> {
    compressed_input: Vec<F>,
    compressed_table: Vec<F>,
    permuted_input: Vec<F>,
    permuted_table: Vec<F>,
    pub permuted_input_commitment: C,
    pub permuted_table_commitment: C,
    permuted_input_poly: BlindedPolynomial<F>,
    permuted_table_poly: BlindedPolynomial<F>,
}

/// A lookup with its grand product committed.
pub struct Committed<F: CircuitField, C> {
    pub permuted_input_commitment: C,
    pub permuted_table_commitment: C,
    pub product_commitment: C,
    pub permuted_input: BlindedPolynomial<F>,
    pub permuted_table: BlindedPolynomial<F>,
    pub product: BlindedPolynomial<F>,
    pub permuted_input_coset: Evaluations<F, D<F>>,
    pub permuted_table_coset: Evaluations<F, D<F>>,
    pub product_coset: Evaluations<F, D<F>>,
}

/// Evaluates an expression on one row of Lagrange columns.
struct RowEvaluator<'a, F: CircuitField> {
    table: RefTable<'a, Evaluations<F, D<F>>>,
    challenges: &'a [F],
    row: usize,
    n: usize,
}

impl<'a, F: CircuitField> RowEvaluator<'a, F> {
    fn rotated(&self, rotation: Rotation) -> usize {
        (self.row as i64 + rotation.0 as i64).rem_euclid(self.n as i64) as usize
    }
}

impl<'a, F: CircuitField> Evaluator<F> for RowEvaluator<'a, F> {
    type Output = F;

    fn constant(&self, value: F) -> F {
        value
    }

    fn selector(&self, _: Selector) -> F {
        panic!("selectors are replaced by fixed columns before proving")
    }

    fn fixed(&self, query: FixedQuery) -> F {
        self.table.fixed_columns()[query.column_index()].evals[self.rotated(query.rotation())]
    }

    fn advice(&self, query: AdviceQuery) -> F {
        self.table.advice_columns()[query.column_index()].evals[self.rotated(query.rotation())]
    }

    fn instance(&self, query: InstanceQuery) -> F {
        self.table.instance_columns()[query.column_index()].evals[self.rotated(query.rotation())]
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

/// `sum_k theta^(m-1-k) expr_k` on every row.
fn compress_expressions<F: CircuitField>(
    expressions: &[Expression<F>],
    table: RefTable<'_, Evaluations<F, D<F>>>,
    challenges: &[F],
    theta: F,
    n: usize,
) -> Vec<F> {
    (0..n)
        .into_par_iter()
        .map(|row| {
            let evaluator = RowEvaluator {
                table,
                challenges,
                row,
                n,
            };
            expressions
                .iter()
                .fold(F::zero(), |acc, expr| acc * theta + expr.evaluate(&evaluator))
        })
        .collect()
}

/// Sorts the compressed input and arranges the compressed table so that
/// each distinct input value first appears next to the same table value.
/// Only the usable rows are permuted; the columns are then padded back to
/// `n` rows with zeros, left for the blinder.
pub fn permute_expression_pair<F: CircuitField>(
    input: &[F],
    table: &[F],
    usable_rows: usize,
) -> Result<(Vec<F>, Vec<F>), ProverError> {
    let n = input.len();

    let mut permuted_input = input[..usable_rows].to_vec();
    permuted_input.sort();

    let mut leftover_table = table[..usable_rows]
        .iter()
        .fold(BTreeMap::new(), |mut acc, value| {
            *acc.entry(*value).or_insert(0usize) += 1;
            acc
        });
    let mut permuted_table = vec![F::zero(); usable_rows];

    let mut repeated_input_rows = vec![];
    for row in 0..usable_rows {
        let value = permuted_input[row];
        if row == 0 || value != permuted_input[row - 1] {
            permuted_table[row] = value;
            match leftover_table.get_mut(&value) {
                Some(count) if *count > 0 => *count -= 1,
                _ => return Err(ProverError::ValueNotInTable(row)),
            }
        } else {
            repeated_input_rows.push(row);
        }
    }

    // the remaining table values fill the rows of repeated inputs
    for (value, count) in leftover_table.iter() {
        for _ in 0..*count {
            match repeated_input_rows.pop() {
                Some(row) => permuted_table[row] = *value,
                None => unreachable!("as many leftover table values as repeated inputs"),
            }
        }
    }
    assert!(repeated_input_rows.is_empty());

    permuted_input.resize(n, F::zero());
    permuted_table.resize(n, F::zero());
    Ok((permuted_input, permuted_table))
}

/// Compresses the expressions of the lookup with `theta`, permutes them and
/// writes the commitments to the permuted input and table.
#[allow(clippy::too_many_arguments)]
pub fn commit_permuted<F, P, R, T>(
    argument: &Argument<F>,
    params: &P,
    domains: &EvaluationDomains<F>,
    table: RefTable<'_, Evaluations<F, D<F>>>,
    challenges: &[F],
    theta: F,
    blinder: &mut Blinder<'_, R>,
    transcript: &mut T,
) -> Result<Permuted<F, P::Commitment>, ProverError>
where
    F: CircuitField,
    P: PolynomialCommitmentScheme<F>,
    R: RngCore,
    T: TranscriptWrite<F, P::Commitment>,
{
    let n = domains.n();
    let usable_rows = n - (blinder.blinding_factors() + 1);

    let compressed_input =
        compress_expressions(argument.input_expressions(), table, challenges, theta, n);
    let compressed_table =
        compress_expressions(argument.table_expressions(), table, challenges, theta, n);

    let (mut permuted_input, mut permuted_table) =
        permute_expression_pair(&compressed_input, &compressed_table, usable_rows)?;
    blinder.blind(&mut permuted_input, true);
    blinder.blind(&mut permuted_table, true);

    let mut commit_values = |values: &[F]| -> Result<_, ProverError> {
        let evals = domains.lagrange_from_vec(values.to_vec());
        let poly = domains.lagrange_to_coeff(evals.clone());
        let blind = blinder.random();
        let commitment = params.commit_lagrange(&evals)?;
        Ok((BlindedPolynomial::new(poly, blind), commitment))
    };
    let (permuted_input_poly, permuted_input_commitment) = commit_values(&permuted_input)?;
    let (permuted_table_poly, permuted_table_commitment) = commit_values(&permuted_table)?;

    transcript.write_point(permuted_input_commitment)?;
    transcript.write_point(permuted_table_commitment)?;

    log::trace!("committed the permuted columns of lookup {}", argument.name());
    Ok(Permuted {
        compressed_input,
        compressed_table,
        permuted_input,
        permuted_table,
        permuted_input_commitment,
        permuted_table_commitment,
        permuted_input_poly,
        permuted_table_poly,
    })
}

impl<F: CircuitField, C: Copy> Permuted<F, C> {
    /// Commits to the grand product
    ///
    /// ```text
    /// z(omega X) = z(X) * (A(X) + beta) (S(X) + gamma) / ((A'(X) + beta) (S'(X) + gamma))
    /// ```
    pub fn commit_product<P, R, T>(
        self,
        params: &P,
        domains: &EvaluationDomains<F>,
        beta: F,
        gamma: F,
        blinder: &mut Blinder<'_, R>,
        transcript: &mut T,
    ) -> Result<Committed<F, C>, ProverError>
    where
        P: PolynomialCommitmentScheme<F, Commitment = C>,
        R: RngCore,
        T: TranscriptWrite<F, C>,
    {
        let n = domains.n();
        let ratios = grand_product::ratios(
            n,
            |acc| {
                acc.par_iter_mut().enumerate().for_each(|(row, acc)| {
                    *acc *= (self.compressed_input[row] + beta)
                        * (self.compressed_table[row] + gamma);
                })
            },
            |acc| {
                acc.par_iter_mut().enumerate().for_each(|(row, acc)| {
                    *acc = (self.permuted_input[row] + beta) * (self.permuted_table[row] + gamma);
                })
            },
        );
        let mut last_z = F::one();
        let z = grand_product::create_polynomial(&ratios, &mut last_z, blinder.blinding_factors());
        let committed = grand_product::commit(params, domains, blinder, z)?;
        transcript.write_point(committed.commitment)?;

        Ok(Committed {
            permuted_input_commitment: self.permuted_input_commitment,
            permuted_table_commitment: self.permuted_table_commitment,
            product_commitment: committed.commitment,
            permuted_input_coset: domains.coeff_to_extended(&self.permuted_input_poly.poly),
            permuted_table_coset: domains.coeff_to_extended(&self.permuted_table_poly.poly),
            product_coset: domains.coeff_to_extended(&committed.blinded.poly),
            permuted_input: self.permuted_input_poly,
            permuted_table: self.permuted_table_poly,
            product: committed.blinded,
        })
    }
}

impl<F: CircuitField, C> Committed<F, C> {
    /// Writes the evaluations of the product at `x` and `omega x`, of the
    /// permuted input at `x` and `omega^-1 x`, and of the permuted table at
    /// `x`.
    pub fn evaluate<T: TranscriptWrite<F, C>>(
        &self,
        domains: &EvaluationDomains<F>,
        x: F,
        transcript: &mut T,
    ) -> Result<(), ProverError> {
        let x_inv = domains.rotate_omega(x, Rotation::prev());
        let x_next = domains.rotate_omega(x, Rotation::next());

        for eval in [
            self.product.poly.evaluate(&x),
            self.product.poly.evaluate(&x_next),
            self.permuted_input.poly.evaluate(&x),
            self.permuted_input.poly.evaluate(&x_inv),
            self.permuted_table.poly.evaluate(&x),
        ] {
            transcript.write_scalar(eval)?;
        }
        Ok(())
    }

    pub fn open(&self, domains: &EvaluationDomains<F>, x: F) -> [ProverQuery<'_, F>; 5] {
        let x_inv = domains.rotate_omega(x, Rotation::prev());
        let x_next = domains.rotate_omega(x, Rotation::next());
        [
            ProverQuery::new(x, &self.product.poly, self.product.blind),
            ProverQuery::new(x, &self.permuted_input.poly, self.permuted_input.blind),
            ProverQuery::new(x, &self.permuted_table.poly, self.permuted_table.blind),
            ProverQuery::new(x_inv, &self.permuted_input.poly, self.permuted_input.blind),
            ProverQuery::new(x_next, &self.product.poly, self.product.blind),
        ]
    }
}
