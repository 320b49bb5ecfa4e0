//! The permutation argument, enforcing the copy constraints between cells
//! of equality-enabled columns.
//!
//! Every cell is labelled `delta^c * omega^r` for column `c` and row `r`.
//! Copy constraints form cycles of cells, encoded by the permutation
//! `sigma` mapping each cell to the next one of its cycle. The prover shows,
//! with one grand product per chunk of columns, that the multiset of
//! `(value, label)` pairs is invariant under `sigma`.

use crate::circuits::column::{Any, Column};
use plonkish_utils::CircuitField;

pub mod cycle_store;
pub mod keygen;
pub mod prover;
pub mod table_store;
pub mod verifier;

pub use cycle_store::Assembly;
pub use keygen::{ProvingKey, VerifyingKey};

/// The columns taking part in the permutation, in the order they were
/// enabled.
#[derive(Clone, Debug, Default)]
pub struct Argument {
    columns: Vec<Column<Any>>,
}

impl Argument {
    pub(crate) fn add_column(&mut self, column: Column<Any>) {
        if !self.columns.contains(&column) {
            self.columns.push(column);
        }
    }

    /// The permutation constraints have degree 3:
    /// `(1 - (l_last + l_blind)) * z(omega X) * (v(X) + beta s(X) + gamma)`
    /// for a chunk of a single column.
    pub fn required_degree(&self) -> usize {
        3
    }

    pub fn columns(&self) -> &[Column<Any>] {
        &self.columns
    }
}

/// `delta = g^(2^s)` for the multiplicative generator `g` and the
/// two-adicity `s` of the field. Its powers generate cosets of the domain
/// disjoint from each other, one per column.
pub fn delta<F: CircuitField>() -> F {
    F::DELTA
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::column::{Advice, Instance};
    use ark_bn254::Fr;
    use ark_ff::{FftField, Field, One, PrimeField};
    use plonkish_utils::FieldHelpers;

    #[test]
    fn test_delta_order() {
        let delta = delta::<Fr>();
        assert_ne!(delta, Fr::one());
        // delta^T = 1 for the odd part T of p - 1
        let t = Fr::TRACE;
        assert_eq!(delta.pow(t), Fr::one());
    }

    #[test]
    fn test_delta_is_derived_from_seven() {
        let mut expected = Fr::from(7u64);
        for _ in 0..Fr::TWO_ADICITY {
            expected.square_in_place();
        }
        assert_eq!(delta::<Fr>(), expected);
        // label of the first row of the fourth permutation column
        assert_eq!(
            delta::<Fr>().pow([3u64]),
            Fr::from_hex("0x18afdf23e9bd9302673fc1e076a492d4d65bd18ebc4d854ed189139bab313e52")
                .unwrap()
        );
    }

    #[test]
    fn test_columns_are_deduplicated() {
        let mut argument = Argument::default();
        let a: Column<Any> = Column::new(0, Advice::new(0)).into();
        let i: Column<Any> = Column::new(0, Instance).into();
        argument.add_column(a);
        argument.add_column(i);
        argument.add_column(a);
        assert_eq!(argument.columns(), &[a, i]);
    }
}
