//! This module implements the error types of the proof system.

use crate::circuits::column::{Any, Column};
use poly_commitment::error::CommitmentError;
use thiserror::Error;

/// Errors that can arise while a circuit assigns its cells
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("the circuit does not fit in 2^{current_k} rows")]
    NotEnoughRowsAvailable { current_k: u32 },

    #[error("column {0:?} must be equality-enabled to be part of a copy constraint")]
    ColumnNotInPermutation(Column<Any>),

    #[error("out of bounds access to a column")]
    BoundsFailure,

    #[error("an unknown value was assigned")]
    UnknownValue,

    #[error("the instance column is larger than the usable rows")]
    InstanceTooLarge,
}

/// Errors that can arise when preparing the setup
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("the circuit could not be synthesized: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("the domain could not be constructed: {0}")]
    DomainCreation(#[from] DomainCreationError),

    #[error("the parameters support {0} rows but the circuit requires {1}")]
    NotEnoughRows(usize, usize),

    #[error("commitment failed: {0}")]
    Commitment(#[from] CommitmentError),
}

/// Errors that can arise when creating a proof
#[derive(Error, Debug)]
pub enum ProverError {
    #[error("the number of instance columns does not match the circuit")]
    InvalidInstances,

    #[error("the witness could not be synthesized: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("the lookup failed to find a match in the table: row={0}")]
    ValueNotInTable(usize),

    #[error("the advice columns were already released in favour of their polynomials")]
    AdviceColumnsReleased,

    #[error("commitment failed: {0}")]
    Commitment(#[from] CommitmentError),

    #[error("could not write to the transcript: {0}")]
    Transcript(#[from] std::io::Error),
}

/// Errors that can arise when verifying a proof
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("the number of instance columns does not match the circuit")]
    InvalidInstances,

    #[error("the proof could not be read: {0}")]
    Transcript(#[from] std::io::Error),

    #[error("commitment failed: {0}")]
    Commitment(#[from] CommitmentError),

    #[error("the opening proof failed to verify")]
    OpenProof,
}

/// Errors that can arise when creating the evaluation domains
#[derive(Error, Debug, Clone)]
pub enum DomainCreationError {
    #[error("could not compute the size of domain for {0}")]
    DomainSizeFailed(usize),

    #[error("construction of domain {0} for size {1} failed")]
    DomainConstructionFailed(String, usize),
}
