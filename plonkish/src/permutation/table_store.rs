//! Chunked access to the columns taking part in the permutation argument.

use crate::{
    circuits::column::{Any, Column},
    permutation::delta,
    table::RefTable,
};
use plonkish_utils::CircuitField;
use ark_poly::{EvaluationDomain, Evaluations, Radix2EvaluationDomain as D};
use rayon::prelude::*;

/// The identity labels `delta^c * shift * omega^r`, one column per
/// permutation column `c`, over a domain of generator `omega`. With a shift
/// of 1 over the base domain these are the labels of the cells; over the
/// extended domain the shift is the coset shift.
#[derive(Clone, Debug)]
pub struct UnpermutedTable<F: CircuitField> {
    columns: Vec<Evaluations<F, D<F>>>,
}

impl<F: CircuitField> UnpermutedTable<F> {
    pub fn construct(num_columns: usize, domain: D<F>, shift: F) -> Self {
        let omega = domain.group_gen;
        let mut first_column = Vec::with_capacity(domain.size());
        let mut label = shift;
        for _ in 0..domain.size() {
            first_column.push(label);
            label *= omega;
        }

        let delta = delta::<F>();
        let mut columns = Vec::with_capacity(num_columns);
        let mut column = first_column;
        for _ in 0..num_columns {
            let next = column.par_iter().map(|label| *label * delta).collect();
            columns.push(Evaluations::from_vec_and_domain(column, domain));
            column = next;
        }
        UnpermutedTable { columns }
    }

    pub fn columns(&self) -> &[Evaluations<F, D<F>>] {
        &self.columns
    }
}

/// The value, permuted and unpermuted columns of the permutation argument,
/// split in chunks of `chunk_width` columns. The last chunk may be shorter.
#[derive(Clone, Copy)]
pub struct PermutationTableStore<'a, F: CircuitField> {
    columns: &'a [Column<Any>],
    table: RefTable<'a, Evaluations<F, D<F>>>,
    permuted_columns: &'a [Evaluations<F, D<F>>],
    unpermuted_table: &'a UnpermutedTable<F>,
    chunk_width: usize,
}

impl<'a, F: CircuitField> PermutationTableStore<'a, F> {
    pub fn new(
        columns: &'a [Column<Any>],
        table: RefTable<'a, Evaluations<F, D<F>>>,
        permuted_columns: &'a [Evaluations<F, D<F>>],
        unpermuted_table: &'a UnpermutedTable<F>,
        chunk_width: usize,
    ) -> Self {
        assert!(chunk_width > 0, "chunks must hold at least one column");
        assert_eq!(columns.len(), permuted_columns.len());
        assert!(unpermuted_table.columns().len() >= columns.len());
        PermutationTableStore {
            columns,
            table,
            permuted_columns,
            unpermuted_table,
            chunk_width,
        }
    }

    pub fn chunk_width(&self) -> usize {
        self.chunk_width
    }

    pub fn num_chunks(&self) -> usize {
        self.columns.len().div_ceil(self.chunk_width)
    }

    fn chunk_range(&self, chunk: usize) -> std::ops::Range<usize> {
        let start = chunk * self.chunk_width;
        let end = std::cmp::min(start + self.chunk_width, self.columns.len());
        start..end
    }

    /// The values of the columns of `chunk`.
    pub fn get_value_columns(&self, chunk: usize) -> Vec<&'a Evaluations<F, D<F>>> {
        self.table.get_columns(&self.columns[self.chunk_range(chunk)])
    }

    /// The `sigma` columns of `chunk`.
    pub fn get_permuted_columns(&self, chunk: usize) -> Vec<&'a Evaluations<F, D<F>>> {
        self.permuted_columns[self.chunk_range(chunk)].iter().collect()
    }

    /// The identity labels of the columns of `chunk`.
    pub fn get_unpermuted_columns(&self, chunk: usize) -> Vec<&'a Evaluations<F, D<F>>> {
        self.unpermuted_table.columns()[self.chunk_range(chunk)]
            .iter()
            .collect()
    }
}
