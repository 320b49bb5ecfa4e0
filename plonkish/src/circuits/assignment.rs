//! How circuits lay out their witness: the [Assignment] backend written to by
//! [Circuit::synthesize], and [AssignedCell] for copy constraints.

use crate::{
    circuits::{
        column::{Advice, Any, Column, Fixed, Instance},
        constraint_system::ConstraintSystem,
        query::{Challenge, Selector},
        value::Value,
    },
    error::SynthesisError,
};
use ark_ff::Field;

/// The backend a circuit writes its cells to. Key generation records fixed
/// cells, selectors and copies; proving records advice cells.
pub trait Assignment<F: Field> {
    fn enable_selector(&mut self, selector: &Selector, row: usize) -> Result<(), SynthesisError>;

    /// The value of an instance cell, unknown during key generation.
    fn query_instance(
        &self,
        column: Column<Instance>,
        row: usize,
    ) -> Result<Value<F>, SynthesisError>;

    fn assign_advice(
        &mut self,
        column: Column<Advice>,
        row: usize,
        to: Value<F>,
    ) -> Result<(), SynthesisError>;

    fn assign_fixed(
        &mut self,
        column: Column<Fixed>,
        row: usize,
        to: Value<F>,
    ) -> Result<(), SynthesisError>;

    /// Constrains two cells to be equal.
    fn copy(
        &mut self,
        left_column: Column<Any>,
        left_row: usize,
        right_column: Column<Any>,
        right_row: usize,
    ) -> Result<(), SynthesisError>;

    /// Assigns `to` to every usable row of `column` starting at `row`.
    fn fill_from_row(
        &mut self,
        column: Column<Fixed>,
        row: usize,
        to: Value<F>,
    ) -> Result<(), SynthesisError>;

    /// The value of a challenge, unknown until its phase is committed.
    fn get_challenge(&self, challenge: Challenge) -> Value<F>;
}

/// A circuit: a configuration of the constraint system and a way to fill
/// its cells.
pub trait Circuit<F: Field> {
    type Config: Clone;

    fn configure(meta: &mut ConstraintSystem<F>) -> Self::Config;

    fn synthesize<A: Assignment<F>>(
        &self,
        config: Self::Config,
        assignment: &mut A,
    ) -> Result<(), SynthesisError>;
}

/// An advice cell together with the value written to it.
#[derive(Clone, Copy, Debug)]
pub struct AssignedCell<F> {
    value: Value<F>,
    column: Column<Advice>,
    row: usize,
}

impl<F: Field> AssignedCell<F> {
    /// Assigns `value` to the advice cell at (`column`, `row`).
    pub fn assign<A: Assignment<F>>(
        assignment: &mut A,
        column: Column<Advice>,
        row: usize,
        value: Value<F>,
    ) -> Result<Self, SynthesisError> {
        assignment.assign_advice(column, row, value)?;
        Ok(AssignedCell { value, column, row })
    }

    /// Assigns the value of an instance cell to an advice cell and constrains
    /// both to be equal.
    pub fn assign_from_instance<A: Assignment<F>>(
        assignment: &mut A,
        instance: Column<Instance>,
        instance_row: usize,
        column: Column<Advice>,
        row: usize,
    ) -> Result<Self, SynthesisError> {
        let value = assignment.query_instance(instance, instance_row)?;
        let cell = Self::assign(assignment, column, row, value)?;
        assignment.copy(column.into(), row, instance.into(), instance_row)?;
        Ok(cell)
    }

    /// Copies this cell into (`column`, `row`), constraining both to be
    /// equal.
    pub fn copy_advice<A: Assignment<F>>(
        &self,
        assignment: &mut A,
        column: Column<Advice>,
        row: usize,
    ) -> Result<Self, SynthesisError> {
        let cell = Self::assign(assignment, column, row, self.value)?;
        assignment.copy(column.into(), row, self.column.into(), self.row)?;
        Ok(cell)
    }

    /// Constrains this cell to equal an instance cell.
    pub fn constrain_instance<A: Assignment<F>>(
        &self,
        assignment: &mut A,
        instance: Column<Instance>,
        instance_row: usize,
    ) -> Result<(), SynthesisError> {
        assignment.copy(self.column.into(), self.row, instance.into(), instance_row)
    }

    pub fn value(&self) -> Value<F> {
        self.value
    }

    pub fn column(&self) -> Column<Advice> {
        self.column
    }

    pub fn row(&self) -> usize {
        self.row
    }
}
