//! Prover side of the permutation argument.

use crate::{
    blinder::{BlindedPolynomial, Blinder},
    circuits::{domains::EvaluationDomains, query::Rotation},
    error::ProverError,
    grand_product,
    permutation::{keygen::ProvingKey, table_store::PermutationTableStore},
};
use plonkish_utils::CircuitField;
use ark_poly::{Evaluations, Polynomial, Radix2EvaluationDomain as D};
use poly_commitment::{transcript::TranscriptWrite, PolynomialCommitmentScheme, ProverQuery};
use rand_core::RngCore;
use rayon::prelude::*;

/// The grand product of one chunk of columns.
pub struct CommittedSet<F: CircuitField, C> {
    pub commitment: C,
    pub product: BlindedPolynomial<F>,
    /// The product over the extended coset
    pub coset: Evaluations<F, D<F>>,
}

pub struct Committed<F: CircuitField, C> {
    pub sets: Vec<CommittedSet<F, C>>,
}

/// Commits to one grand product per chunk of the store, writing each
/// commitment to the transcript. The products are chained: each starts
/// where the previous one ended, and the first starts at 1.
///
/// For the chunk holding columns `v_j` with `sigma` columns `s_j` and
/// labels `id_j`, the ratio on each row is
///
/// ```text
/// prod_j (v_j + beta * id_j + gamma) / prod_j (v_j + beta * s_j + gamma)
/// ```
pub fn commit<F, P, R, T>(
    params: &P,
    domains: &EvaluationDomains<F>,
    store: &PermutationTableStore<'_, F>,
    beta: F,
    gamma: F,
    blinder: &mut Blinder<'_, R>,
    transcript: &mut T,
) -> Result<Committed<F, P::Commitment>, ProverError>
where
    F: CircuitField,
    P: PolynomialCommitmentScheme<F>,
    R: RngCore,
    T: TranscriptWrite<F, P::Commitment>,
{
    let n = domains.n();
    let blinding_factors = blinder.blinding_factors();

    let mut last_z = F::one();
    let mut sets = Vec::with_capacity(store.num_chunks());
    for chunk in 0..store.num_chunks() {
        let values = store.get_value_columns(chunk);
        let permuted = store.get_permuted_columns(chunk);
        let unpermuted = store.get_unpermuted_columns(chunk);

        let ratios = grand_product::ratios_excessive(
            n,
            values.len(),
            |column, acc| {
                let (values, labels) = (&values[column].evals, &unpermuted[column].evals);
                acc.par_iter_mut()
                    .enumerate()
                    .for_each(|(row, acc)| *acc *= values[row] + beta * labels[row] + gamma);
            },
            |column, acc| {
                let (values, sigmas) = (&values[column].evals, &permuted[column].evals);
                acc.par_iter_mut()
                    .enumerate()
                    .for_each(|(row, acc)| *acc *= values[row] + beta * sigmas[row] + gamma);
            },
        );
        let z = grand_product::create_polynomial(&ratios, &mut last_z, blinding_factors);
        let committed = grand_product::commit(params, domains, blinder, z)?;
        transcript.write_point(committed.commitment)?;

        let coset = domains.coeff_to_extended(&committed.blinded.poly);
        sets.push(CommittedSet {
            commitment: committed.commitment,
            product: committed.blinded,
            coset,
        });
    }

    log::trace!("committed {} permutation products", sets.len());
    Ok(Committed { sets })
}

impl<F: CircuitField, C> Committed<F, C> {
    /// Writes, for each product, its evaluations at `x` and `omega x`, and
    /// for all but the last product its evaluation at the last usable row
    /// relative to `x`.
    pub fn evaluate<T: TranscriptWrite<F, C>>(
        &self,
        domains: &EvaluationDomains<F>,
        x: F,
        blinding_factors: usize,
        transcript: &mut T,
    ) -> Result<(), ProverError> {
        let x_next = domains.rotate_omega(x, Rotation::next());
        let x_last = domains.rotate_omega(x, last_rotation(blinding_factors));

        let mut sets = self.sets.iter().peekable();
        while let Some(set) = sets.next() {
            transcript.write_scalar(set.product.poly.evaluate(&x))?;
            transcript.write_scalar(set.product.poly.evaluate(&x_next))?;
            if sets.peek().is_some() {
                transcript.write_scalar(set.product.poly.evaluate(&x_last))?;
            }
        }
        Ok(())
    }

    pub fn open(
        &self,
        domains: &EvaluationDomains<F>,
        x: F,
        blinding_factors: usize,
    ) -> impl Iterator<Item = ProverQuery<'_, F>> + '_ {
        let x_next = domains.rotate_omega(x, Rotation::next());
        let x_last = domains.rotate_omega(x, last_rotation(blinding_factors));

        self.sets
            .iter()
            .flat_map(move |set| {
                [
                    ProverQuery::new(x, &set.product.poly, set.product.blind),
                    ProverQuery::new(x_next, &set.product.poly, set.product.blind),
                ]
            })
            .chain(
                self.sets
                    .iter()
                    .rev()
                    .skip(1)
                    .map(move |set| ProverQuery::new(x_last, &set.product.poly, set.product.blind)),
            )
    }
}

impl<F: CircuitField> ProvingKey<F> {
    /// Writes the evaluations of the `sigma` polynomials at `x`.
    pub fn evaluate<C, T: TranscriptWrite<F, C>>(
        &self,
        x: F,
        transcript: &mut T,
    ) -> Result<(), ProverError> {
        for poly in self.polys.iter() {
            transcript.write_scalar(poly.evaluate(&x))?;
        }
        Ok(())
    }

    pub fn open(&self, x: F) -> impl Iterator<Item = ProverQuery<'_, F>> + '_ {
        self.polys
            .iter()
            .map(move |poly| ProverQuery::new(x, poly, F::zero()))
    }
}

/// The rotation of the last usable row, where a product hands its final
/// value to the next one.
pub(crate) fn last_rotation(blinding_factors: usize) -> Rotation {
    Rotation(-((blinding_factors + 1) as i32))
}
