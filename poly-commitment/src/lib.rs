//! Polynomial commitment schemes used by the `plonkish` proof system.
//!
//! The scheme is consumed through [PolynomialCommitmentScheme]: the proof
//! system commits to polynomials (in coefficient or Lagrange form) and, once
//! all the evaluation points are known, hands a list of queries to the scheme
//! which writes (or reads and checks) a multi-point opening proof through a
//! [transcript::TranscriptWrite] (resp. [transcript::TranscriptRead]).

pub mod commitment;
pub mod error;
pub mod kzg;
pub mod shplonk;
pub mod transcript;
pub mod utils;

pub use commitment::CommitmentCurve;
pub use error::CommitmentError;

use ark_ff::PrimeField;
use ark_poly::{univariate::DensePolynomial, Evaluations, Radix2EvaluationDomain as D};
use transcript::{TranscriptRead, TranscriptWrite};

/// A commitment scheme able to commit to polynomials and to prove/verify
/// openings of many polynomials at many points at once.
pub trait PolynomialCommitmentScheme<F: PrimeField>: Sync {
    type Commitment: CommitmentCurve;

    /// Whether instance columns are committed and opened like advice columns.
    /// When false, the verifier evaluates instance polynomials itself.
    const QUERY_INSTANCE: bool;

    /// log2 of the largest supported polynomial size
    fn k(&self) -> u32;

    /// Largest supported number of coefficients
    fn n(&self) -> usize;

    /// Commits to a polynomial in coefficient form.
    fn commit(&self, poly: &DensePolynomial<F>) -> Result<Self::Commitment, CommitmentError>;

    /// Commits to a polynomial given by its evaluations over the base domain.
    fn commit_lagrange(
        &self,
        evals: &Evaluations<F, D<F>>,
    ) -> Result<Self::Commitment, CommitmentError>;

    /// Writes an opening proof for every query to the transcript.
    fn create_opening_proof<T: TranscriptWrite<F, Self::Commitment>>(
        &self,
        queries: &[ProverQuery<'_, F>],
        transcript: &mut T,
    ) -> Result<(), CommitmentError>;

    /// Reads an opening proof from the transcript and checks it against the
    /// queries. Returns `Ok(false)` when the proof is well formed but wrong.
    fn verify_opening_proof<T: TranscriptRead<F, Self::Commitment>>(
        &self,
        queries: &[VerifierQuery<'_, F, Self::Commitment>],
        transcript: &mut T,
    ) -> Result<bool, CommitmentError>;
}

/// A polynomial known to the prover, opened at `point`.
#[derive(Debug, Clone, Copy)]
pub struct ProverQuery<'a, F: PrimeField> {
    pub point: F,
    pub poly: &'a DensePolynomial<F>,
    /// Blinding used when committing `poly`.
    pub blind: F,
}

impl<'a, F: PrimeField> ProverQuery<'a, F> {
    pub fn new(point: F, poly: &'a DensePolynomial<F>, blind: F) -> Self {
        Self { point, poly, blind }
    }
}

/// A linear combination of commitments, resolved by the commitment scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct Msm<F, C> {
    terms: Vec<(F, C)>,
}

impl<F, C> Default for Msm<F, C> {
    fn default() -> Self {
        Self { terms: vec![] }
    }
}

impl<F: PrimeField, C: Copy> Msm<F, C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_term(&mut self, scalar: F, base: C) {
        self.terms.push((scalar, base));
    }

    pub fn add_msm(&mut self, other: &Self) {
        self.terms.extend(other.terms.iter().copied());
    }

    pub fn scale(&mut self, factor: F) {
        for (scalar, _) in self.terms.iter_mut() {
            *scalar *= factor;
        }
    }

    pub fn terms(&self) -> &[(F, C)] {
        &self.terms
    }
}

/// What a verifier query opens: a commitment read from the proof or a
/// combination of them. Equality is by reference, so that the same
/// commitment queried at several points is recognised as one polynomial.
#[derive(Debug, Clone, Copy)]
pub enum CommitmentReference<'a, F, C> {
    Commitment(&'a C),
    Msm(&'a Msm<F, C>),
}

impl<'a, F, C> PartialEq for CommitmentReference<'a, F, C> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Commitment(a), Self::Commitment(b)) => std::ptr::eq(*a, *b),
            (Self::Msm(a), Self::Msm(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }
}

/// A commitment claimed to open to `eval` at `point`.
#[derive(Debug, Clone, Copy)]
pub struct VerifierQuery<'a, F, C> {
    pub point: F,
    pub commitment: CommitmentReference<'a, F, C>,
    pub eval: F,
}

impl<'a, F, C> VerifierQuery<'a, F, C> {
    pub fn new_commitment(commitment: &'a C, point: F, eval: F) -> Self {
        Self {
            point,
            commitment: CommitmentReference::Commitment(commitment),
            eval,
        }
    }

    pub fn new_msm(msm: &'a Msm<F, C>, point: F, eval: F) -> Self {
        Self {
            point,
            commitment: CommitmentReference::Msm(msm),
            eval,
        }
    }
}
