//! Proof verification.

use crate::{
    circuits::query::Rotation,
    error::VerifyError,
    keys::VerifyingKey,
    lookup,
    permutation::{
        self,
        verifier::{Boundaries, Openings},
    },
    proof::Proof,
    vanishing::{self, VanishingVerificationEvaluator},
};
use plonkish_utils::CircuitField;
use poly_commitment::{transcript::TranscriptRead, PolynomialCommitmentScheme, VerifierQuery};

/// Reads a proof for circuits with the given instance columns, checks it,
/// and returns what was read.
pub fn verify_proof<F, P, T>(
    params: &P,
    vk: &VerifyingKey<F, P::Commitment>,
    instances: &[&[&[F]]],
    transcript: &mut T,
) -> Result<Proof<F, P::Commitment>, VerifyError>
where
    F: CircuitField,
    P: PolynomialCommitmentScheme<F>,
    T: TranscriptRead<F, P::Commitment>,
{
    let cs = vk.cs();
    let domains = vk.domains();
    let n = domains.n();
    let blinding_factors = cs.blinding_factors();
    let usable_rows = n - (blinding_factors + 1);

    for instance in instances.iter() {
        if instance.len() != cs.num_instance_columns()
            || instance.iter().any(|values| values.len() > usable_rows)
        {
            return Err(VerifyError::InvalidInstances);
        }
    }

    vk.hash_into(transcript)?;

    let mut instance_commitments_vec = Vec::with_capacity(instances.len());
    if P::QUERY_INSTANCE {
        for instance in instances.iter() {
            let mut commitments = Vec::with_capacity(instance.len());
            for values in instance.iter() {
                let mut column = vec![F::zero(); n];
                column[..values.len()].copy_from_slice(values);
                let commitment = params.commit_lagrange(&domains.lagrange_from_vec(column))?;
                transcript.common_point(commitment)?;
                commitments.push(commitment);
            }
            instance_commitments_vec.push(commitments);
        }
    } else {
        for value in instances
            .iter()
            .flat_map(|instance| instance.iter())
            .flat_map(|values| values.iter())
        {
            transcript.common_scalar(*value)?;
        }
    }

    let mut proof = Proof::read(vk, instances.len(), P::QUERY_INSTANCE, transcript)?;
    log::debug!("read a proof of {} circuits", instances.len());

    let x = proof.x;
    let xn = x.pow([n as u64]);

    if !P::QUERY_INSTANCE {
        // The instance polynomials are sums of Lagrange basis polynomials
        let (min_rotation, max_rotation) = cs
            .instance_queries()
            .iter()
            .fold((0, 0), |(min, max), (_, rotation)| {
                (min.min(rotation.0), max.max(rotation.0))
            });
        let max_instance_len = instances
            .iter()
            .flat_map(|instance| instance.iter().map(|values| values.len()))
            .max()
            .unwrap_or_default();
        let l_i_s = domains.l_i_range(
            x,
            xn,
            -max_rotation..max_instance_len as i32 + min_rotation.abs(),
        );
        proof.instance_evals_vec = instances
            .iter()
            .map(|instance| {
                cs.instance_queries()
                    .iter()
                    .map(|(column, rotation)| {
                        let values = instance[column.index()];
                        let offset = (max_rotation - rotation.0) as usize;
                        values
                            .iter()
                            .zip(l_i_s[offset..].iter())
                            .fold(F::zero(), |acc, (value, l)| acc + *value * l)
                    })
                    .collect()
            })
            .collect();
    }

    let l_evals = domains.l_i_range(x, xn, (-((blinding_factors + 1) as i32))..=0);
    let boundaries = Boundaries {
        l_last: l_evals[0],
        l_blind: l_evals[1..=blinding_factors]
            .iter()
            .fold(F::zero(), |acc, eval| acc + eval),
        l_0: l_evals[blinding_factors + 1],
    };

    let proof = proof;
    let permutations: Vec<_> = (0..instances.len())
        .map(|circuit| permutation::verifier::Evaluated {
            product_commitments: &proof.permutation_product_commitments_vec[circuit],
            product_evals: &proof.permutation_product_evals_vec[circuit],
            product_next_evals: &proof.permutation_product_next_evals_vec[circuit],
            product_last_evals: &proof.permutation_product_last_evals_vec[circuit],
        })
        .collect();
    let lookups: Vec<Vec<_>> = (0..instances.len())
        .map(|circuit| {
            (0..cs.lookups().len())
                .map(|index| lookup::verifier::Evaluated {
                    permuted_input_commitment: &proof.lookup_permuted_input_commitments_vec
                        [circuit][index],
                    permuted_table_commitment: &proof.lookup_permuted_table_commitments_vec
                        [circuit][index],
                    product_commitment: &proof.lookup_product_commitments_vec[circuit][index],
                    product_eval: proof.lookup_product_evals_vec[circuit][index],
                    product_next_eval: proof.lookup_product_next_evals_vec[circuit][index],
                    permuted_input_eval: proof.lookup_permuted_input_evals_vec[circuit][index],
                    permuted_input_inv_eval: proof.lookup_permuted_input_inv_evals_vec[circuit]
                        [index],
                    permuted_table_eval: proof.lookup_permuted_table_evals_vec[circuit][index],
                })
                .collect()
        })
        .collect();

    // Every constraint of every circuit, in the order the prover folded them
    let mut expressions = vec![];
    for (circuit, (permutation, lookups)) in permutations.iter().zip(lookups.iter()).enumerate() {
        let evaluator = VanishingVerificationEvaluator::new(
            &proof.fixed_evals,
            &proof.advice_evals_vec[circuit],
            &proof.instance_evals_vec[circuit],
            &proof.challenges,
        );
        for gate in cs.gates() {
            expressions.extend(gate.polynomials().iter().map(|poly| poly.evaluate(&evaluator)));
        }

        let openings = Openings {
            advice_evals: &proof.advice_evals_vec[circuit],
            fixed_evals: &proof.fixed_evals,
            instance_evals: &proof.instance_evals_vec[circuit],
            common_evals: &proof.common_permutation_evals,
        };
        expressions.extend(permutation.expressions(
            cs,
            &openings,
            boundaries,
            proof.beta,
            proof.gamma,
            x,
        ));

        for (lookup, argument) in lookups.iter().zip(cs.lookups()) {
            expressions.extend(lookup.expressions(
                argument,
                &evaluator,
                boundaries.l_0,
                boundaries.l_last,
                boundaries.l_blind,
                proof.theta,
                proof.beta,
                proof.gamma,
            ));
        }
    }

    let vanishing = vanishing::verifier::Evaluated {
        random_poly_commitment: &proof.vanishing_random_poly_commitment,
        h_commitments: &proof.vanishing_h_poly_commitments,
        random_eval: proof.vanishing_random_eval,
    }
    .verify(expressions.into_iter(), proof.y, xn)?;

    let x_next = domains.rotate_omega(x, Rotation::next());
    let x_prev = domains.rotate_omega(x, Rotation::prev());
    let x_last = domains.rotate_omega(x, permutation::prover::last_rotation(blinding_factors));

    let mut queries: Vec<VerifierQuery<'_, F, P::Commitment>> = vec![];
    for (circuit, (permutation, lookups)) in permutations.iter().zip(lookups.iter()).enumerate() {
        if P::QUERY_INSTANCE {
            for ((column, at), eval) in cs
                .instance_queries()
                .iter()
                .zip(proof.instance_evals_vec[circuit].iter())
            {
                queries.push(VerifierQuery::new_commitment(
                    &instance_commitments_vec[circuit][column.index()],
                    domains.rotate_omega(x, *at),
                    *eval,
                ));
            }
        }
        for ((column, at), eval) in cs
            .advice_queries()
            .iter()
            .zip(proof.advice_evals_vec[circuit].iter())
        {
            queries.push(VerifierQuery::new_commitment(
                &proof.advices_commitments_vec[circuit][column.index()],
                domains.rotate_omega(x, *at),
                *eval,
            ));
        }
        queries.extend(permutation.queries(x, x_next, x_last));
        for lookup in lookups {
            queries.extend(lookup.queries(x, x_prev, x_next));
        }
    }
    for ((column, at), eval) in cs.fixed_queries().iter().zip(proof.fixed_evals.iter()) {
        queries.push(VerifierQuery::new_commitment(
            &vk.fixed_commitments()[column.index()],
            domains.rotate_omega(x, *at),
            *eval,
        ));
    }
    queries.extend(permutation::verifier::common_queries(
        vk.permutation(),
        &proof.common_permutation_evals,
        x,
    ));
    queries.extend(vanishing.queries(x));

    let valid = params.verify_opening_proof(&queries, transcript)?;
    log::debug!("verified the opening proof: {valid}");
    if !valid {
        return Err(VerifyError::OpenProof);
    }

    drop(queries);
    drop(vanishing);
    drop(lookups);
    drop(permutations);
    Ok(proof)
}
