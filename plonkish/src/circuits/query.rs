//! Rotations, queries, selectors and challenges.

/// A row offset relative to the current row. Rotations wrap around the
/// evaluation domain.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rotation(pub i32);

impl Rotation {
    pub const fn cur() -> Rotation {
        Rotation(0)
    }

    pub const fn prev() -> Rotation {
        Rotation(-1)
    }

    pub const fn next() -> Rotation {
        Rotation(1)
    }
}

/// A query to a fixed column. `index` is the position of the
/// (column, rotation) pair among the fixed queries of the constraint system.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct FixedQuery {
    pub(crate) index: usize,
    pub(crate) column_index: usize,
    pub(crate) rotation: Rotation,
}

/// A query to an advice column.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct AdviceQuery {
    pub(crate) index: usize,
    pub(crate) column_index: usize,
    pub(crate) rotation: Rotation,
    pub(crate) phase: u8,
}

/// A query to an instance column.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct InstanceQuery {
    pub(crate) index: usize,
    pub(crate) column_index: usize,
    pub(crate) rotation: Rotation,
}

macro_rules! query_accessors {
    ($query:ty) => {
        impl $query {
            pub fn index(&self) -> usize {
                self.index
            }

            pub fn column_index(&self) -> usize {
                self.column_index
            }

            pub fn rotation(&self) -> Rotation {
                self.rotation
            }
        }
    };
}

query_accessors!(FixedQuery);
query_accessors!(AdviceQuery);
query_accessors!(InstanceQuery);

impl AdviceQuery {
    pub fn phase(&self) -> u8 {
        self.phase
    }
}

/// A selector, turned into a fixed column at key generation.
///
/// A simple selector may only appear as a multiplicative factor of a whole
/// gate, which allows several of them to share a fixed column. A complex
/// selector may appear anywhere, including in lookups.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Selector(pub(crate) usize, pub(crate) bool);

impl Selector {
    pub fn simple(index: usize) -> Self {
        Selector(index, true)
    }

    pub fn complex(index: usize) -> Self {
        Selector(index, false)
    }

    pub fn index(&self) -> usize {
        self.0
    }

    pub fn is_simple(&self) -> bool {
        self.1
    }
}

/// A challenge squeezed from the transcript after the advice columns of
/// `phase` are committed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Challenge {
    pub(crate) index: usize,
    pub(crate) phase: u8,
}

impl Challenge {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }
}
