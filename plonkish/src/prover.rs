//! Proof creation.

use crate::{
    argument_data::ArgumentData,
    blinder::Blinder,
    circuits::assignment::Circuit,
    error::ProverError,
    keys::ProvingKey,
    lookup,
    permutation::{
        self,
        table_store::{PermutationTableStore, UnpermutedTable},
    },
    vanishing::{self, ExtendedCircuit},
};
use plonkish_utils::CircuitField;
use ark_poly::{univariate::DensePolynomial, Evaluations, Polynomial, Radix2EvaluationDomain as D};
use poly_commitment::{transcript::TranscriptWrite, PolynomialCommitmentScheme, ProverQuery};
use rand_core::RngCore;
use rayon::prelude::*;

/// Creates a proof for `circuits`, each with its own instance columns, and
/// writes it to `transcript`.
pub fn create_proof<F, P, Circ, R, T>(
    params: &P,
    pk: &ProvingKey<F, P::Commitment>,
    circuits: &[Circ],
    instances: &[&[&[F]]],
    mut rng: R,
    transcript: &mut T,
) -> Result<(), ProverError>
where
    F: CircuitField,
    P: PolynomialCommitmentScheme<F>,
    Circ: Circuit<F>,
    R: RngCore,
    T: TranscriptWrite<F, P::Commitment>,
{
    let vk = pk.vk();
    let cs = vk.cs();
    let domains = vk.domains();
    let blinding_factors = cs.blinding_factors();
    let mut blinder = Blinder::new(&mut rng, blinding_factors);

    vk.hash_into(transcript)?;

    let mut argument_data =
        ArgumentData::create(params, pk, circuits, instances, &mut blinder, transcript)?;
    log::debug!("committed the advice of {} circuits", circuits.len());

    let theta = transcript.squeeze_challenge();

    let tables = argument_data.export_column_tables(pk.fixed_values())?;
    let mut permuted_vec = Vec::with_capacity(tables.len());
    for table in tables.iter() {
        let mut permuted = Vec::with_capacity(cs.lookups().len());
        for argument in cs.lookups() {
            permuted.push(lookup::prover::commit_permuted(
                argument,
                params,
                domains,
                *table,
                argument_data.challenges(),
                theta,
                &mut blinder,
                transcript,
            )?);
        }
        permuted_vec.push(permuted);
    }
    log::debug!("committed the permuted lookup columns");

    let beta = transcript.squeeze_challenge();
    let gamma = transcript.squeeze_challenge();

    let columns = cs.permutation().columns();
    let unpermuted = UnpermutedTable::construct(columns.len(), *domains.d1(), F::one());
    let mut permutations_committed = Vec::with_capacity(tables.len());
    for table in tables.iter() {
        let store = PermutationTableStore::new(
            columns,
            *table,
            pk.permutation().permutations(),
            &unpermuted,
            cs.degree() - 2,
        );
        permutations_committed.push(permutation::prover::commit(
            params,
            domains,
            &store,
            beta,
            gamma,
            &mut blinder,
            transcript,
        )?);
    }
    drop(tables);

    let mut lookups_committed = Vec::with_capacity(permuted_vec.len());
    for permuted in permuted_vec {
        let mut committed = Vec::with_capacity(permuted.len());
        for permuted in permuted {
            committed.push(permuted.commit_product(
                params,
                domains,
                beta,
                gamma,
                &mut blinder,
                transcript,
            )?);
        }
        lookups_committed.push(committed);
    }
    log::debug!("committed the permutation and lookup products");

    let vanishing = vanishing::prover::commit(params, domains, &mut blinder, transcript)?;
    let y = transcript.squeeze_challenge();

    argument_data.transform_advice(domains);
    let to_cosets = |polys: &[DensePolynomial<F>]| -> Vec<Evaluations<F, D<F>>> {
        polys
            .par_iter()
            .map(|poly| domains.coeff_to_extended(poly))
            .collect()
    };
    let advice_cosets_vec: Vec<_> = argument_data
        .advice_polys_vec()
        .iter()
        .map(|polys| to_cosets(polys))
        .collect();
    let instance_cosets_vec: Vec<_> = argument_data
        .instance_polys_vec()
        .iter()
        .map(|polys| to_cosets(polys))
        .collect();
    let extended_circuits: Vec<_> = advice_cosets_vec
        .iter()
        .zip(instance_cosets_vec.iter())
        .zip(permutations_committed.iter().zip(lookups_committed.iter()))
        .map(|((advice_cosets, instance_cosets), (permutation, lookups))| ExtendedCircuit {
            advice_cosets,
            instance_cosets,
            permutation,
            lookups,
        })
        .collect();
    let circuit_column = pk.vanishing_argument().build_extended_circuit_column(
        pk,
        beta,
        gamma,
        theta,
        y,
        argument_data.challenges(),
        &extended_circuits,
    );
    drop(extended_circuits);
    drop(advice_cosets_vec);
    drop(instance_cosets_vec);

    let vanishing = vanishing.construct(params, domains, circuit_column, &mut blinder, transcript)?;
    log::debug!("committed the quotient pieces");

    let x = transcript.squeeze_challenge();
    let xn = x.pow([domains.n() as u64]);

    if P::QUERY_INSTANCE {
        for instance_polys in argument_data.instance_polys_vec() {
            for (column, at) in cs.instance_queries() {
                let point = domains.rotate_omega(x, *at);
                transcript.write_scalar(instance_polys[column.index()].evaluate(&point))?;
            }
        }
    }
    for advice_polys in argument_data.advice_polys_vec() {
        for (column, at) in cs.advice_queries() {
            let point = domains.rotate_omega(x, *at);
            transcript.write_scalar(advice_polys[column.index()].evaluate(&point))?;
        }
    }
    for (column, at) in cs.fixed_queries() {
        let point = domains.rotate_omega(x, *at);
        transcript.write_scalar(pk.fixed_polys()[column.index()].evaluate(&point))?;
    }
    let vanishing = vanishing.evaluate(x, xn, transcript)?;
    pk.permutation().evaluate(x, transcript)?;
    for permutation in permutations_committed.iter() {
        permutation.evaluate(domains, x, blinding_factors, transcript)?;
    }
    for lookups in lookups_committed.iter() {
        for lookup in lookups {
            lookup.evaluate(domains, x, transcript)?;
        }
    }
    log::debug!("wrote the evaluations at x");

    let mut queries: Vec<ProverQuery<'_, F>> = vec![];
    for (circuit, (permutation, lookups)) in permutations_committed
        .iter()
        .zip(lookups_committed.iter())
        .enumerate()
    {
        if P::QUERY_INSTANCE {
            let instance_polys = &argument_data.instance_polys_vec()[circuit];
            for (column, at) in cs.instance_queries() {
                queries.push(ProverQuery::new(
                    domains.rotate_omega(x, *at),
                    &instance_polys[column.index()],
                    F::zero(),
                ));
            }
        }
        let advice_polys = &argument_data.advice_polys_vec()[circuit];
        let advice_blinds = &argument_data.advice_blinds_vec()[circuit];
        for (column, at) in cs.advice_queries() {
            queries.push(ProverQuery::new(
                domains.rotate_omega(x, *at),
                &advice_polys[column.index()],
                advice_blinds[column.index()],
            ));
        }
        queries.extend(permutation.open(domains, x, blinding_factors));
        for lookup in lookups {
            queries.extend(lookup.open(domains, x));
        }
    }
    for (column, at) in cs.fixed_queries() {
        queries.push(ProverQuery::new(
            domains.rotate_omega(x, *at),
            &pk.fixed_polys()[column.index()],
            F::zero(),
        ));
    }
    queries.extend(pk.permutation().open(x));
    queries.extend(vanishing.open(x));

    params.create_opening_proof(&queries, transcript)?;
    log::debug!("created a proof with {} opening queries", queries.len());
    Ok(())
}
