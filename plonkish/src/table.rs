//! Borrowed views over the fixed, advice and instance columns of a circuit.

use crate::circuits::column::{Any, Column};

/// The columns of a circuit in one representation `T` (Lagrange
/// evaluations, coefficients or extended evaluations), borrowed.
#[derive(Debug)]
pub struct RefTable<'a, T> {
    fixed_columns: &'a [T],
    advice_columns: &'a [T],
    instance_columns: &'a [T],
}

impl<'a, T> Clone for RefTable<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for RefTable<'a, T> {}

impl<'a, T> RefTable<'a, T> {
    pub fn new(fixed_columns: &'a [T], advice_columns: &'a [T], instance_columns: &'a [T]) -> Self {
        RefTable {
            fixed_columns,
            advice_columns,
            instance_columns,
        }
    }

    pub fn fixed_columns(&self) -> &'a [T] {
        self.fixed_columns
    }

    pub fn advice_columns(&self) -> &'a [T] {
        self.advice_columns
    }

    pub fn instance_columns(&self) -> &'a [T] {
        self.instance_columns
    }

    /// # Panics
    ///
    /// Panics if the column kind is unresolved.
    pub fn get_column(&self, column: Column<Any>) -> &'a T {
        match column.column_type() {
            Any::Fixed => &self.fixed_columns[column.index()],
            Any::Advice(_) => &self.advice_columns[column.index()],
            Any::Instance => &self.instance_columns[column.index()],
            Any::Unresolved => panic!("a column of unresolved kind has no values"),
        }
    }

    pub fn get_columns(&self, columns: &[Column<Any>]) -> Vec<&'a T> {
        columns.iter().map(|column| self.get_column(*column)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::column::{Advice, Fixed, Instance};

    #[test]
    fn test_get_column() {
        let fixed = vec![vec![1], vec![2]];
        let advice = vec![vec![3]];
        let instance = vec![vec![4]];
        let table = RefTable::new(&fixed, &advice, &instance);
        assert_eq!(table.get_column(Column::new(1, Fixed).into()), &vec![2]);
        assert_eq!(table.get_column(Column::new(0, Advice::new(0)).into()), &vec![3]);
        assert_eq!(
            table.get_columns(&[
                Column::new(0, Instance).into(),
                Column::new(0, Fixed).into()
            ]),
            vec![&vec![4], &vec![1]]
        );
    }

    #[test]
    #[should_panic(expected = "unresolved")]
    fn test_unresolved_column() {
        let columns: Vec<Vec<u8>> = vec![];
        let table = RefTable::new(&columns, &columns, &columns);
        table.get_column(Column::new(0, Any::Unresolved));
    }
}
