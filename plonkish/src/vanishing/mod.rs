//! The vanishing argument: all the constraints of all the circuits, folded
//! with the challenge `y`, vanish on the usable rows, which is shown by
//! committing to their quotient `h(X)` by `X^n - 1`.

mod argument;
pub mod evaluator;
pub mod graph_evaluator;
pub mod prover;
pub mod verifier;

pub use argument::{ExtendedCircuit, VanishingArgument};
pub use evaluator::VanishingVerificationEvaluator;
