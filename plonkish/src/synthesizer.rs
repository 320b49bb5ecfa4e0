//! Witness generation: the [Assignment] backend used while proving.

use crate::{
    circuits::{
        assignment::Assignment,
        column::{Advice, Any, Column, Fixed, Instance},
        query::{Challenge, Selector},
        value::Value,
    },
    error::SynthesisError,
};
use ark_ff::Field;
use std::{collections::HashMap, ops::Range};

/// Collects the advice cells of one phase. Cells of other phases, fixed
/// cells, selectors and copies are ignored: they were fixed at key
/// generation.
#[derive(Debug)]
pub struct WitnessCollection<'a, F> {
    k: u32,
    current_phase: u8,
    advice: Vec<Vec<F>>,
    /// Instance columns, padded to `n` rows
    instances: &'a [Vec<F>],
    /// The challenges squeezed in earlier phases
    challenges: &'a HashMap<usize, F>,
    usable_rows: Range<usize>,
}

impl<'a, F: Field> WitnessCollection<'a, F> {
    pub fn new(
        k: u32,
        current_phase: u8,
        num_advice_columns: usize,
        instances: &'a [Vec<F>],
        challenges: &'a HashMap<usize, F>,
        usable_rows: usize,
    ) -> Self {
        let n = 1 << k;
        WitnessCollection {
            k,
            current_phase,
            advice: vec![vec![F::zero(); n]; num_advice_columns],
            instances,
            challenges,
            usable_rows: 0..usable_rows,
        }
    }

    /// The advice columns, indexed by column. Columns of other phases are
    /// left at zero.
    pub fn into_advice(self) -> Vec<Vec<F>> {
        self.advice
    }
}

impl<'a, F: Field> Assignment<F> for WitnessCollection<'a, F> {
    fn enable_selector(&mut self, _: &Selector, _: usize) -> Result<(), SynthesisError> {
        Ok(())
    }

    fn query_instance(&self, column: Column<Instance>, row: usize) -> Result<Value<F>, SynthesisError> {
        if !self.usable_rows.contains(&row) {
            return Err(SynthesisError::NotEnoughRowsAvailable { current_k: self.k });
        }
        self.instances
            .get(column.index())
            .and_then(|column| column.get(row))
            .map(|value| Value::known(*value))
            .ok_or(SynthesisError::BoundsFailure)
    }

    fn assign_advice(
        &mut self,
        column: Column<Advice>,
        row: usize,
        to: Value<F>,
    ) -> Result<(), SynthesisError> {
        if column.column_type().phase() != self.current_phase {
            return Ok(());
        }
        if !self.usable_rows.contains(&row) {
            return Err(SynthesisError::NotEnoughRowsAvailable { current_k: self.k });
        }
        let cell = self
            .advice
            .get_mut(column.index())
            .and_then(|column| column.get_mut(row))
            .ok_or(SynthesisError::BoundsFailure)?;
        *cell = to.assign()?;
        Ok(())
    }

    fn assign_fixed(&mut self, _: Column<Fixed>, _: usize, _: Value<F>) -> Result<(), SynthesisError> {
        Ok(())
    }

    fn copy(&mut self, _: Column<Any>, _: usize, _: Column<Any>, _: usize) -> Result<(), SynthesisError> {
        Ok(())
    }

    fn fill_from_row(&mut self, _: Column<Fixed>, _: usize, _: Value<F>) -> Result<(), SynthesisError> {
        Ok(())
    }

    fn get_challenge(&self, challenge: Challenge) -> Value<F> {
        match self.challenges.get(&challenge.index()) {
            Some(value) => Value::known(*value),
            None => Value::unknown(),
        }
    }
}
