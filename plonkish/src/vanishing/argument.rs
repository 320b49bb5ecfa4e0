//! Construction of the circuit polynomial `h(X) (X^n - 1)` over the
//! extended coset.

use crate::{
    circuits::{constraint_system::ConstraintSystem, expr::Expression},
    keys::ProvingKey,
    lookup,
    permutation::{
        self,
        table_store::{PermutationTableStore, UnpermutedTable},
    },
    table::RefTable,
    vanishing::graph_evaluator::{
        get_rotation_idx, Calculation, EvaluationInput, GraphEvaluator, ValueSource,
    },
};
use plonkish_utils::CircuitField;
use ark_poly::{Evaluations, Radix2EvaluationDomain as D};
use rayon::prelude::*;

/// The compiled custom gates, and for each lookup the graph computing
/// `(A(X) + beta) (S(X) + gamma)` from the compressed input and table.
#[derive(Clone, Debug)]
pub struct VanishingArgument<F> {
    custom_gates: GraphEvaluator<F>,
    lookups: Vec<GraphEvaluator<F>>,
}

/// The extended columns and committed arguments of one circuit.
pub struct ExtendedCircuit<'a, F: CircuitField, C> {
    pub advice_cosets: &'a [Evaluations<F, D<F>>],
    pub instance_cosets: &'a [Evaluations<F, D<F>>],
    pub permutation: &'a permutation::prover::Committed<F, C>,
    pub lookups: &'a [lookup::prover::Committed<F, C>],
}

impl<F: CircuitField> VanishingArgument<F> {
    pub fn create(cs: &ConstraintSystem<F>) -> Self {
        let mut custom_gates = GraphEvaluator::default();
        let parts: Vec<_> = cs
            .gates()
            .iter()
            .flat_map(|gate| gate.polynomials().iter())
            .map(|poly| custom_gates.add_expression(poly))
            .collect();
        custom_gates.add_calculation(Calculation::Horner(
            ValueSource::PreviousValue,
            parts,
            ValueSource::Y,
        ));

        let lookups = cs
            .lookups()
            .iter()
            .map(|lookup| {
                let mut graph = GraphEvaluator::default();
                let mut compress = |expressions: &[Expression<F>]| {
                    let parts = expressions
                        .iter()
                        .map(|expr| graph.add_expression(expr))
                        .collect();
                    graph.add_calculation(Calculation::Horner(
                        ValueSource::ZERO,
                        parts,
                        ValueSource::Theta,
                    ))
                };
                let compressed_input = compress(lookup.input_expressions());
                let compressed_table = compress(lookup.table_expressions());

                let left = graph.add_calculation(Calculation::Add(compressed_input, ValueSource::Beta));
                let right =
                    graph.add_calculation(Calculation::Add(compressed_table, ValueSource::Gamma));
                graph.add_calculation(Calculation::Mul(left, right));
                graph
            })
            .collect();

        VanishingArgument {
            custom_gates,
            lookups,
        }
    }

    pub fn custom_gates(&self) -> &GraphEvaluator<F> {
        &self.custom_gates
    }

    pub fn lookups(&self) -> &[GraphEvaluator<F>] {
        &self.lookups
    }

    /// Evaluates, on every row of the extended coset, all the constraints
    /// of all the circuits folded with `y`: for each circuit its custom
    /// gates, then its permutation constraints, then its lookup
    /// constraints. The verifier folds the same expressions in the same
    /// order.
    #[allow(clippy::too_many_arguments)]
    pub fn build_extended_circuit_column<C: Sync>(
        &self,
        pk: &ProvingKey<F, C>,
        beta: F,
        gamma: F,
        theta: F,
        y: F,
        challenges: &[F],
        circuits: &[ExtendedCircuit<'_, F, C>],
    ) -> Evaluations<F, D<F>> {
        let domains = pk.vk().domains();
        let cs = pk.vk().cs();
        let size = domains.extended_size();
        let rot_scale = domains.rotation_scale();
        let isize = size as i32;
        let blinding_factors = cs.blinding_factors();
        let last_rotation = permutation::prover::last_rotation(blinding_factors);
        let chunk_width = cs.degree() - 2;

        let l0 = &pk.l0().evals;
        let l_last = &pk.l_last().evals;
        let l_active_row = &pk.l_active_row().evals;

        let columns = cs.permutation().columns();
        let unpermuted =
            UnpermutedTable::construct(columns.len(), *domains.extended(), domains.zeta());

        let num_threads = rayon::current_num_threads();
        let chunk_size = size.div_ceil(num_threads).max(1);

        let mut values = vec![F::zero(); size];
        for circuit in circuits {
            let input = EvaluationInput {
                table: RefTable::new(pk.fixed_cosets(), circuit.advice_cosets, circuit.instance_cosets),
                challenges,
                beta,
                gamma,
                theta,
                y,
                rot_scale,
                isize,
            };

            values
                .par_chunks_mut(chunk_size)
                .enumerate()
                .for_each(|(chunk, values)| {
                    let mut data = self.custom_gates.instance();
                    for (i, value) in values.iter_mut().enumerate() {
                        let idx = chunk * chunk_size + i;
                        *value = self.custom_gates.evaluate(&mut data, &input, *value, idx);
                    }
                });

            let sets = &circuit.permutation.sets;
            if let (Some(first_set), Some(last_set)) = (sets.first(), sets.last()) {
                let store = PermutationTableStore::new(
                    columns,
                    input.table,
                    pk.permutation().cosets(),
                    &unpermuted,
                    chunk_width,
                );
                let chunks: Vec<_> = (0..store.num_chunks())
                    .map(|chunk| {
                        (
                            store.get_value_columns(chunk),
                            store.get_permuted_columns(chunk),
                            store.get_unpermuted_columns(chunk),
                        )
                    })
                    .collect();

                values
                    .par_chunks_mut(chunk_size)
                    .enumerate()
                    .for_each(|(chunk, values)| {
                        for (i, value) in values.iter_mut().enumerate() {
                            let idx = chunk * chunk_size + i;
                            let r_next = get_rotation_idx(idx, 1, rot_scale, isize);
                            let r_last = get_rotation_idx(idx, last_rotation.0, rot_scale, isize);

                            // l_0(X) (1 - z_0(X))
                            let first = first_set.coset.evals[idx];
                            *value = *value * y + (F::one() - first) * l0[idx];

                            // l_last(X) (z_l(X)^2 - z_l(X))
                            let last = last_set.coset.evals[idx];
                            *value = *value * y + (last.square() - last) * l_last[idx];

                            // l_0(X) (z_i(X) - z_{i-1}(omega^last X))
                            for (previous, set) in sets.iter().zip(sets.iter().skip(1)) {
                                *value = *value * y
                                    + (set.coset.evals[idx] - previous.coset.evals[r_last])
                                        * l0[idx];
                            }

                            // l_active(X) (z_i(omega X) prod_j (v_j + beta s_j + gamma)
                            //   - z_i(X) prod_j (v_j + beta id_j + gamma))
                            for (set, (values, permuted, unpermuted)) in sets.iter().zip(chunks.iter())
                            {
                                let mut left = set.coset.evals[r_next];
                                for (v, s) in values.iter().zip(permuted.iter()) {
                                    left *= v.evals[idx] + beta * s.evals[idx] + gamma;
                                }
                                let mut right = set.coset.evals[idx];
                                for (v, id) in values.iter().zip(unpermuted.iter()) {
                                    right *= v.evals[idx] + beta * id.evals[idx] + gamma;
                                }
                                *value = *value * y + (left - right) * l_active_row[idx];
                            }
                        }
                    });
            }

            for (graph, lookup) in self.lookups.iter().zip(circuit.lookups.iter()) {
                let product = &lookup.product_coset.evals;
                let permuted_input = &lookup.permuted_input_coset.evals;
                let permuted_table = &lookup.permuted_table_coset.evals;

                values
                    .par_chunks_mut(chunk_size)
                    .enumerate()
                    .for_each(|(chunk, values)| {
                        let mut data = graph.instance();
                        for (i, value) in values.iter_mut().enumerate() {
                            let idx = chunk * chunk_size + i;
                            let table_value = graph.evaluate(&mut data, &input, F::zero(), idx);
                            let r_next = get_rotation_idx(idx, 1, rot_scale, isize);
                            let r_prev = get_rotation_idx(idx, -1, rot_scale, isize);
                            let a_minus_s = permuted_input[idx] - permuted_table[idx];

                            // l_0(X) (1 - z(X))
                            *value = *value * y + (F::one() - product[idx]) * l0[idx];
                            // l_last(X) (z(X)^2 - z(X))
                            *value = *value * y
                                + (product[idx].square() - product[idx]) * l_last[idx];
                            // l_active(X) (z(omega X) (A'(X) + beta) (S'(X) + gamma)
                            //   - z(X) (A(X) + beta) (S(X) + gamma))
                            *value = *value * y
                                + (product[r_next]
                                    * (permuted_input[idx] + beta)
                                    * (permuted_table[idx] + gamma)
                                    - product[idx] * table_value)
                                    * l_active_row[idx];
                            // l_0(X) (A'(X) - S'(X))
                            *value = *value * y + a_minus_s * l0[idx];
                            // l_active(X) (A'(X) - S'(X)) (A'(X) - A'(omega^-1 X))
                            *value = *value * y
                                + a_minus_s
                                    * (permuted_input[idx] - permuted_input[r_prev])
                                    * l_active_row[idx];
                        }
                    });
            }
        }

        domains.extended_from_vec(values)
    }
}
