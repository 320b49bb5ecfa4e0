//! Utilities extending arkworks for the plonkish proof system.

pub mod circuit_field;
pub mod dense_polynomial;
pub mod field_helpers;
pub mod math;
pub mod serialization;

pub use circuit_field::{radix2_domain, CircuitField};
pub use dense_polynomial::ExtendedDensePolynomial;
pub use field_helpers::{batch_invert_nonzero, par_batch_invert_nonzero, FieldHelpers};
