//! The proof record: every commitment, challenge and evaluation of a proof
//! in the order they appear in the transcript.

use crate::keys::VerifyingKey;
use plonkish_utils::CircuitField;
use poly_commitment::transcript::TranscriptRead;
use std::io;

/// The vectors suffixed `_vec` hold one entry per circuit.
#[derive(Clone, Debug, PartialEq)]
pub struct Proof<F, C> {
    /// Advice commitments, indexed by column
    pub advices_commitments_vec: Vec<Vec<C>>,
    pub challenges: Vec<F>,
    pub theta: F,
    pub lookup_permuted_input_commitments_vec: Vec<Vec<C>>,
    pub lookup_permuted_table_commitments_vec: Vec<Vec<C>>,
    pub beta: F,
    pub gamma: F,
    pub permutation_product_commitments_vec: Vec<Vec<C>>,
    pub lookup_product_commitments_vec: Vec<Vec<C>>,
    pub vanishing_random_poly_commitment: C,
    pub y: F,
    pub vanishing_h_poly_commitments: Vec<C>,
    pub x: F,
    /// Read from the transcript when the commitment scheme queries instance
    /// columns, computed by the verifier otherwise
    pub instance_evals_vec: Vec<Vec<F>>,
    pub advice_evals_vec: Vec<Vec<F>>,
    pub fixed_evals: Vec<F>,
    pub vanishing_random_eval: F,
    pub common_permutation_evals: Vec<F>,
    pub permutation_product_evals_vec: Vec<Vec<F>>,
    pub permutation_product_next_evals_vec: Vec<Vec<F>>,
    pub permutation_product_last_evals_vec: Vec<Vec<F>>,
    pub lookup_product_evals_vec: Vec<Vec<F>>,
    pub lookup_product_next_evals_vec: Vec<Vec<F>>,
    pub lookup_permuted_input_evals_vec: Vec<Vec<F>>,
    pub lookup_permuted_input_inv_evals_vec: Vec<Vec<F>>,
    pub lookup_permuted_table_evals_vec: Vec<Vec<F>>,
}

impl<F: CircuitField, C: Copy + std::fmt::Debug> Proof<F, C> {
    /// Reads a proof of `num_circuits` circuits, squeezing the challenges
    /// as they come. The instances must already be absorbed.
    pub fn read<T: TranscriptRead<F, C>>(
        vk: &VerifyingKey<F, C>,
        num_circuits: usize,
        query_instance: bool,
        transcript: &mut T,
    ) -> io::Result<Self> {
        let cs = vk.cs();

        let mut advices = vec![vec![None; cs.num_advice_columns()]; num_circuits];
        let mut challenges = vec![F::zero(); cs.num_challenges()];
        for phase in cs.phases() {
            for commitments in advices.iter_mut() {
                for (column, column_phase) in cs.advice_column_phase().iter().enumerate() {
                    if *column_phase == phase {
                        commitments[column] = Some(transcript.read_point()?);
                    }
                }
            }
            for (index, challenge_phase) in cs.challenge_phase().iter().enumerate() {
                if *challenge_phase == phase {
                    challenges[index] = transcript.squeeze_challenge();
                }
            }
        }
        let advices_commitments_vec = advices
            .into_iter()
            .map(|commitments| {
                commitments
                    .into_iter()
                    .map(|commitment| match commitment {
                        Some(commitment) => commitment,
                        None => unreachable!("every advice column belongs to a phase"),
                    })
                    .collect()
            })
            .collect();

        let theta = transcript.squeeze_challenge();

        let num_lookups = cs.lookups().len();
        let mut lookup_permuted_input_commitments_vec = Vec::with_capacity(num_circuits);
        let mut lookup_permuted_table_commitments_vec = Vec::with_capacity(num_circuits);
        for _ in 0..num_circuits {
            let mut inputs = Vec::with_capacity(num_lookups);
            let mut tables = Vec::with_capacity(num_lookups);
            for _ in 0..num_lookups {
                inputs.push(transcript.read_point()?);
                tables.push(transcript.read_point()?);
            }
            lookup_permuted_input_commitments_vec.push(inputs);
            lookup_permuted_table_commitments_vec.push(tables);
        }

        let beta = transcript.squeeze_challenge();
        let gamma = transcript.squeeze_challenge();

        let num_products = cs
            .permutation()
            .columns()
            .len()
            .div_ceil(cs.degree() - 2);
        let permutation_product_commitments_vec = (0..num_circuits)
            .map(|_| transcript.read_n_points(num_products))
            .collect::<io::Result<Vec<_>>>()?;
        let lookup_product_commitments_vec = (0..num_circuits)
            .map(|_| transcript.read_n_points(num_lookups))
            .collect::<io::Result<Vec<_>>>()?;

        let vanishing_random_poly_commitment = transcript.read_point()?;
        let y = transcript.squeeze_challenge();
        let vanishing_h_poly_commitments =
            transcript.read_n_points(vk.domains().quotient_poly_degree())?;
        let x = transcript.squeeze_challenge();

        let instance_evals_vec = if query_instance {
            (0..num_circuits)
                .map(|_| transcript.read_n_scalars(cs.instance_queries().len()))
                .collect::<io::Result<Vec<_>>>()?
        } else {
            vec![]
        };
        let advice_evals_vec = (0..num_circuits)
            .map(|_| transcript.read_n_scalars(cs.advice_queries().len()))
            .collect::<io::Result<Vec<_>>>()?;
        let fixed_evals = transcript.read_n_scalars(cs.fixed_queries().len())?;
        let vanishing_random_eval = transcript.read_scalar()?;
        let common_permutation_evals =
            transcript.read_n_scalars(cs.permutation().columns().len())?;

        let mut permutation_product_evals_vec = Vec::with_capacity(num_circuits);
        let mut permutation_product_next_evals_vec = Vec::with_capacity(num_circuits);
        let mut permutation_product_last_evals_vec = Vec::with_capacity(num_circuits);
        for _ in 0..num_circuits {
            let mut evals = Vec::with_capacity(num_products);
            let mut next_evals = Vec::with_capacity(num_products);
            let mut last_evals = Vec::with_capacity(num_products.saturating_sub(1));
            for product in 0..num_products {
                evals.push(transcript.read_scalar()?);
                next_evals.push(transcript.read_scalar()?);
                if product + 1 < num_products {
                    last_evals.push(transcript.read_scalar()?);
                }
            }
            permutation_product_evals_vec.push(evals);
            permutation_product_next_evals_vec.push(next_evals);
            permutation_product_last_evals_vec.push(last_evals);
        }

        let mut lookup_product_evals_vec = Vec::with_capacity(num_circuits);
        let mut lookup_product_next_evals_vec = Vec::with_capacity(num_circuits);
        let mut lookup_permuted_input_evals_vec = Vec::with_capacity(num_circuits);
        let mut lookup_permuted_input_inv_evals_vec = Vec::with_capacity(num_circuits);
        let mut lookup_permuted_table_evals_vec = Vec::with_capacity(num_circuits);
        for _ in 0..num_circuits {
            let mut product_evals = Vec::with_capacity(num_lookups);
            let mut product_next_evals = Vec::with_capacity(num_lookups);
            let mut input_evals = Vec::with_capacity(num_lookups);
            let mut input_inv_evals = Vec::with_capacity(num_lookups);
            let mut table_evals = Vec::with_capacity(num_lookups);
            for _ in 0..num_lookups {
                product_evals.push(transcript.read_scalar()?);
                product_next_evals.push(transcript.read_scalar()?);
                input_evals.push(transcript.read_scalar()?);
                input_inv_evals.push(transcript.read_scalar()?);
                table_evals.push(transcript.read_scalar()?);
            }
            lookup_product_evals_vec.push(product_evals);
            lookup_product_next_evals_vec.push(product_next_evals);
            lookup_permuted_input_evals_vec.push(input_evals);
            lookup_permuted_input_inv_evals_vec.push(input_inv_evals);
            lookup_permuted_table_evals_vec.push(table_evals);
        }

        Ok(Proof {
            advices_commitments_vec,
            challenges,
            theta,
            lookup_permuted_input_commitments_vec,
            lookup_permuted_table_commitments_vec,
            beta,
            gamma,
            permutation_product_commitments_vec,
            lookup_product_commitments_vec,
            vanishing_random_poly_commitment,
            y,
            vanishing_h_poly_commitments,
            x,
            instance_evals_vec,
            advice_evals_vec,
            fixed_evals,
            vanishing_random_eval,
            common_permutation_evals,
            permutation_product_evals_vec,
            permutation_product_next_evals_vec,
            permutation_product_last_evals_vec,
            lookup_product_evals_vec,
            lookup_product_next_evals_vec,
            lookup_permuted_input_evals_vec,
            lookup_permuted_input_inv_evals_vec,
            lookup_permuted_table_evals_vec,
        })
    }
}
