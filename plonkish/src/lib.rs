#![doc = include_str!("../README.md")]

pub use plonkish_utils;
pub use poly_commitment;

pub mod argument_data;
pub mod blinder;
pub mod circuits;
pub mod error;
pub mod grand_product;
pub mod keygen;
pub mod keys;
pub mod lookup;
pub mod permutation;
pub mod proof;
pub mod prover;
pub mod synthesizer;
pub mod table;
pub mod vanishing;
pub mod verifier;

#[cfg(test)]
mod tests;
