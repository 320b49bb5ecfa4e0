//! Column keys.
//!
//! A column is identified by its kind and its index among the columns of
//! that kind. Columns are totally ordered: instance columns first, then
//! advice columns by phase, then fixed columns, and by index within a kind.

use crate::error::SynthesisError;
use std::{
    cmp::Ordering,
    fmt::{self, Debug},
};

/// The kind of a column.
pub trait ColumnType: 'static + Sized + Copy + Debug + PartialEq + Eq + Into<Any> {}

/// An advice column, assigned by the prover during the given phase.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Advice {
    pub(crate) phase: u8,
}

impl Advice {
    pub fn new(phase: u8) -> Self {
        Self { phase }
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }
}

/// A fixed column, assigned at key generation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Fixed;

/// An instance column, holding public inputs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Instance;

/// Any kind of column.
///
/// `Unresolved` stands for a column whose kind is not known yet. Such a
/// column cannot be queried or ordered.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub enum Any {
    Advice(Advice),
    Fixed,
    Instance,
    Unresolved,
}

// Column kinds print as bare names, with the phase of advice columns past
// the first one. Verifying keys are pinned through this rendering.
impl Debug for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Phase(u8);
        impl Debug for Phase {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple("Phase").field(&self.0).finish()
            }
        }

        let mut debug_struct = f.debug_struct("Advice");
        if self.phase != 0 {
            debug_struct.field("phase", &Phase(self.phase));
        }
        debug_struct.finish()
    }
}

impl Debug for Any {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Any::Advice(advice) => advice.fmt(f),
            Any::Fixed => f.write_str("Fixed"),
            Any::Instance => f.write_str("Instance"),
            Any::Unresolved => f.write_str("Unresolved"),
        }
    }
}

impl Any {
    pub fn advice() -> Self {
        Any::Advice(Advice::default())
    }
}

impl Ord for Any {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Any::Unresolved, _) | (_, Any::Unresolved) => {
                panic!("a column of unresolved kind cannot be compared")
            }
            (Any::Instance, Any::Instance) | (Any::Fixed, Any::Fixed) => Ordering::Equal,
            (Any::Advice(lhs), Any::Advice(rhs)) => lhs.phase.cmp(&rhs.phase),
            // Instance < Advice < Fixed
            (Any::Instance, _) | (Any::Advice(_), Any::Fixed) => Ordering::Less,
            (_, Any::Instance) | (Any::Fixed, Any::Advice(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Any {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl ColumnType for Advice {}
impl ColumnType for Fixed {}
impl ColumnType for Instance {}
impl ColumnType for Any {}

impl From<Advice> for Any {
    fn from(advice: Advice) -> Any {
        Any::Advice(advice)
    }
}

impl From<Fixed> for Any {
    fn from(_: Fixed) -> Any {
        Any::Fixed
    }
}

impl From<Instance> for Any {
    fn from(_: Instance) -> Any {
        Any::Instance
    }
}

/// A column of a given kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Column<C: ColumnType> {
    index: usize,
    column_type: C,
}

impl<C: ColumnType> Column<C> {
    pub fn new(index: usize, column_type: C) -> Self {
        Column { index, column_type }
    }

    /// Index of the column among the columns of the same kind
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn column_type(&self) -> &C {
        &self.column_type
    }
}

impl<C: ColumnType> Ord for Column<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs: Any = self.column_type.into();
        match lhs.cmp(&other.column_type.into()) {
            Ordering::Equal => self.index.cmp(&other.index),
            order => order,
        }
    }
}

impl<C: ColumnType> PartialOrd for Column<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<Column<Advice>> for Column<Any> {
    fn from(column: Column<Advice>) -> Column<Any> {
        Column::new(column.index, Any::Advice(column.column_type))
    }
}

impl From<Column<Fixed>> for Column<Any> {
    fn from(column: Column<Fixed>) -> Column<Any> {
        Column::new(column.index, Any::Fixed)
    }
}

impl From<Column<Instance>> for Column<Any> {
    fn from(column: Column<Instance>) -> Column<Any> {
        Column::new(column.index, Any::Instance)
    }
}

impl TryFrom<Column<Any>> for Column<Advice> {
    type Error = SynthesisError;

    fn try_from(column: Column<Any>) -> Result<Self, Self::Error> {
        match column.column_type {
            Any::Advice(advice) => Ok(Column::new(column.index, advice)),
            _ => Err(SynthesisError::ColumnNotInPermutation(column)),
        }
    }
}

impl TryFrom<Column<Any>> for Column<Fixed> {
    type Error = SynthesisError;

    fn try_from(column: Column<Any>) -> Result<Self, Self::Error> {
        match column.column_type {
            Any::Fixed => Ok(Column::new(column.index, Fixed)),
            _ => Err(SynthesisError::ColumnNotInPermutation(column)),
        }
    }
}

impl TryFrom<Column<Any>> for Column<Instance> {
    type Error = SynthesisError;

    fn try_from(column: Column<Any>) -> Result<Self, Self::Error> {
        match column.column_type {
            Any::Instance => Ok(Column::new(column.index, Instance)),
            _ => Err(SynthesisError::ColumnNotInPermutation(column)),
        }
    }
}
