//! The per-circuit witness of a proof: instance and advice columns, in
//! Lagrange form until the advice is transformed to coefficient form.

use crate::{
    blinder::Blinder,
    circuits::{
        assignment::Circuit, constraint_system::ConstraintSystem, domains::EvaluationDomains,
    },
    error::{ProverError, SynthesisError},
    keys::ProvingKey,
    synthesizer::WitnessCollection,
    table::RefTable,
};
use plonkish_utils::CircuitField;
use ark_poly::{univariate::DensePolynomial, Evaluations, Radix2EvaluationDomain as D};
use poly_commitment::{transcript::TranscriptWrite, PolynomialCommitmentScheme};
use rand_core::RngCore;
use std::collections::HashMap;

pub struct ArgumentData<F: CircuitField, C> {
    advice_columns_vec: Vec<Vec<Evaluations<F, D<F>>>>,
    advice_polys_vec: Vec<Vec<DensePolynomial<F>>>,
    advice_blinds_vec: Vec<Vec<F>>,
    instance_columns_vec: Vec<Vec<Evaluations<F, D<F>>>>,
    instance_polys_vec: Vec<Vec<DensePolynomial<F>>>,
    /// Only set when the commitment scheme queries instance columns
    instance_commitments_vec: Vec<Vec<C>>,
    challenges: Vec<F>,
    advice_transformed: bool,
}

impl<F: CircuitField, C: Copy> ArgumentData<F, C> {
    /// Absorbs the instances, then synthesizes, blinds and commits the
    /// advice columns phase by phase, squeezing the challenges of each
    /// phase once all the circuits committed their columns of that phase.
    pub fn create<P, Circ, R, T>(
        params: &P,
        pk: &ProvingKey<F, C>,
        circuits: &[Circ],
        instances: &[&[&[F]]],
        blinder: &mut Blinder<'_, R>,
        transcript: &mut T,
    ) -> Result<Self, ProverError>
    where
        P: PolynomialCommitmentScheme<F, Commitment = C>,
        Circ: Circuit<F>,
        R: RngCore,
        T: TranscriptWrite<F, C>,
    {
        let cs = pk.vk().cs();
        let domains = pk.vk().domains();
        let n = domains.n();
        let usable_rows = n - (cs.blinding_factors() + 1);

        if circuits.len() != instances.len() {
            return Err(ProverError::InvalidInstances);
        }
        for instance in instances.iter() {
            if instance.len() != cs.num_instance_columns() {
                return Err(ProverError::InvalidInstances);
            }
        }

        let mut instance_values_vec = Vec::with_capacity(instances.len());
        let mut instance_columns_vec = Vec::with_capacity(instances.len());
        let mut instance_polys_vec = Vec::with_capacity(instances.len());
        let mut instance_commitments_vec = Vec::with_capacity(instances.len());
        for instance in instances.iter() {
            let values = instance
                .iter()
                .map(|values| {
                    if values.len() > usable_rows {
                        return Err(SynthesisError::InstanceTooLarge);
                    }
                    let mut column = vec![F::zero(); n];
                    column[..values.len()].copy_from_slice(values);
                    Ok(column)
                })
                .collect::<Result<Vec<_>, _>>()?;
            let columns: Vec<_> = values
                .iter()
                .map(|values| domains.lagrange_from_vec(values.clone()))
                .collect();

            let mut commitments = vec![];
            if P::QUERY_INSTANCE {
                for column in columns.iter() {
                    let commitment = params.commit_lagrange(column)?;
                    transcript.common_point(commitment)?;
                    commitments.push(commitment);
                }
            } else {
                for value in instance.iter().flat_map(|values| values.iter()) {
                    transcript.common_scalar(*value)?;
                }
            }

            instance_polys_vec.push(
                columns
                    .iter()
                    .map(|column| domains.lagrange_to_coeff(column.clone()))
                    .collect(),
            );
            instance_values_vec.push(values);
            instance_columns_vec.push(columns);
            instance_commitments_vec.push(commitments);
        }

        let mut meta = ConstraintSystem::default();
        let config = Circ::configure(&mut meta);

        let num_advice_columns = cs.num_advice_columns();
        let mut advice_values_vec = vec![vec![vec![]; num_advice_columns]; circuits.len()];
        let mut advice_blinds_vec = vec![vec![F::zero(); num_advice_columns]; circuits.len()];
        let mut challenges = HashMap::<usize, F>::with_capacity(cs.num_challenges());

        for phase in cs.phases() {
            let column_indices: Vec<usize> = cs
                .advice_column_phase()
                .iter()
                .enumerate()
                .filter(|(_, column_phase)| **column_phase == phase)
                .map(|(index, _)| index)
                .collect();

            for ((circuit, instance_values), (advice_values, advice_blinds)) in circuits
                .iter()
                .zip(instance_values_vec.iter())
                .zip(advice_values_vec.iter_mut().zip(advice_blinds_vec.iter_mut()))
            {
                let mut witness = WitnessCollection::new(
                    domains.k(),
                    phase,
                    num_advice_columns,
                    instance_values,
                    &challenges,
                    usable_rows,
                );
                circuit.synthesize(config.clone(), &mut witness)?;
                let mut advice = witness.into_advice();

                for &index in column_indices.iter() {
                    let mut values = std::mem::take(&mut advice[index]);
                    blinder.blind(&mut values, true);
                    let column = domains.lagrange_from_vec(values.clone());
                    transcript.write_point(params.commit_lagrange(&column)?)?;
                    advice_values[index] = values;
                    advice_blinds[index] = blinder.random();
                }
            }

            for (index, challenge_phase) in cs.challenge_phase().iter().enumerate() {
                if *challenge_phase == phase {
                    let existing = challenges.insert(index, transcript.squeeze_challenge());
                    assert!(existing.is_none(), "challenge {index} squeezed twice");
                }
            }
            log::trace!("committed the advice columns of phase {phase}");
        }

        let challenges = (0..cs.num_challenges())
            .map(|index| match challenges.get(&index) {
                Some(challenge) => *challenge,
                None => unreachable!("every challenge is usable after a phase"),
            })
            .collect();

        let advice_columns_vec = advice_values_vec
            .into_iter()
            .map(|columns| {
                columns
                    .into_iter()
                    .map(|values| domains.lagrange_from_vec(values))
                    .collect()
            })
            .collect();

        Ok(ArgumentData {
            advice_columns_vec,
            advice_polys_vec: vec![],
            advice_blinds_vec,
            instance_columns_vec,
            instance_polys_vec,
            instance_commitments_vec,
            challenges,
            advice_transformed: false,
        })
    }
}

impl<F: CircuitField, C> ArgumentData<F, C> {
    pub fn num_circuits(&self) -> usize {
        self.advice_blinds_vec.len()
    }

    pub fn challenges(&self) -> &[F] {
        &self.challenges
    }

    pub fn advice_blinds_vec(&self) -> &[Vec<F>] {
        &self.advice_blinds_vec
    }

    pub fn instance_polys_vec(&self) -> &[Vec<DensePolynomial<F>>] {
        &self.instance_polys_vec
    }

    pub fn instance_commitments_vec(&self) -> &[Vec<C>] {
        &self.instance_commitments_vec
    }

    pub fn advice_polys_vec(&self) -> &[Vec<DensePolynomial<F>>] {
        &self.advice_polys_vec
    }

    pub fn advice_transformed(&self) -> bool {
        self.advice_transformed
    }

    /// Interpolates the advice columns and releases their Lagrange form.
    pub fn transform_advice(&mut self, domains: &EvaluationDomains<F>) {
        if self.advice_transformed {
            return;
        }
        self.advice_polys_vec = std::mem::take(&mut self.advice_columns_vec)
            .into_iter()
            .map(|columns| {
                columns
                    .into_iter()
                    .map(|column| domains.lagrange_to_coeff(column))
                    .collect()
            })
            .collect();
        self.advice_transformed = true;
    }

    /// The Lagrange tables of the circuits, `(fixed, advice, instance)`.
    pub fn export_column_tables<'a>(
        &'a self,
        fixed_columns: &'a [Evaluations<F, D<F>>],
    ) -> Result<Vec<RefTable<'a, Evaluations<F, D<F>>>>, ProverError> {
        if self.advice_transformed {
            return Err(ProverError::AdviceColumnsReleased);
        }
        Ok(self
            .advice_columns_vec
            .iter()
            .zip(self.instance_columns_vec.iter())
            .map(|(advice, instance)| RefTable::new(fixed_columns, advice, instance))
            .collect())
    }

    /// The coefficient tables of the circuits, `(fixed, advice, instance)`.
    ///
    /// # Panics
    ///
    /// Panics if the advice columns were not transformed yet.
    pub fn export_poly_tables<'a>(
        &'a self,
        fixed_polys: &'a [DensePolynomial<F>],
    ) -> Vec<RefTable<'a, DensePolynomial<F>>> {
        assert!(
            self.advice_transformed,
            "the advice columns must be transformed before exporting polynomials"
        );
        self.advice_polys_vec
            .iter()
            .zip(self.instance_polys_vec.iter())
            .map(|(advice, instance)| RefTable::new(fixed_polys, advice, instance))
            .collect()
    }
}
