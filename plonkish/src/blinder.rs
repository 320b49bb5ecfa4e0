//! Blinding of witness columns.
//!
//! The last `blinding_factors` rows of every committed witness column are
//! filled with randomness, so that openings reveal nothing about the
//! witness. Those rows are excluded from the constraints by `l_active_row`.

use ark_ff::{Field, UniformRand};
use ark_poly::univariate::DensePolynomial;
use rand_core::RngCore;

/// A polynomial in coefficient form with the blinding scalar used to commit
/// it.
#[derive(Clone, Debug)]
pub struct BlindedPolynomial<F: Field> {
    pub poly: DensePolynomial<F>,
    pub blind: F,
}

impl<F: Field> BlindedPolynomial<F> {
    pub fn new(poly: DensePolynomial<F>, blind: F) -> Self {
        Self { poly, blind }
    }
}

pub struct Blinder<'a, R: RngCore> {
    rng: &'a mut R,
    blinding_factors: usize,
}

impl<'a, R: RngCore> Blinder<'a, R> {
    pub fn new(rng: &'a mut R, blinding_factors: usize) -> Self {
        Blinder {
            rng,
            blinding_factors,
        }
    }

    pub fn blinding_factors(&self) -> usize {
        self.blinding_factors
    }

    /// Fills the last `blinding_factors` rows of `evals` with random values,
    /// and the row before them too if `include_last_row` is set. Returns
    /// `false`, leaving `evals` untouched, if the column is too short.
    pub fn blind<F: Field>(&mut self, evals: &mut [F], include_last_row: bool) -> bool {
        let count = self.blinding_factors + usize::from(include_last_row);
        if evals.len() < count {
            return false;
        }
        let start = evals.len() - count;
        for eval in evals[start..].iter_mut() {
            *eval = F::rand(self.rng);
        }
        true
    }

    /// A fresh random scalar.
    pub fn random<F: UniformRand>(&mut self) -> F {
        F::rand(self.rng)
    }

    pub fn rng(&mut self) -> &mut R {
        self.rng
    }
}
