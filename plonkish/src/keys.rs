//! Proving and verifying keys.

use crate::{
    circuits::{constraint_system::ConstraintSystem, domains::EvaluationDomains},
    permutation,
    vanishing::VanishingArgument,
};
use ark_poly::{univariate::DensePolynomial, Evaluations, Radix2EvaluationDomain as D};
use plonkish_utils::CircuitField;
use poly_commitment::{
    transcript::{Blake2bState, Transcript},
    CommitmentCurve,
};
use std::io;

mod pinned;

pub use pinned::PinnedVerificationKey;

/// Blake2b personalisation of the verifying key hash
pub const VERIFYING_KEY_PERSONALIZATION: &[u8; 16] = b"Halo2-Verify-Key";

/// What the verifier knows about a circuit.
#[derive(Clone, Debug)]
pub struct VerifyingKey<F: CircuitField, C> {
    domains: EvaluationDomains<F>,
    fixed_commitments: Vec<C>,
    permutation: permutation::VerifyingKey<C>,
    /// The constraint system with its selectors turned into fixed columns
    cs: ConstraintSystem<F>,
    cs_degree: usize,
    /// Hash of the pinned key, absorbed first into every transcript
    transcript_repr: F,
    /// Activations of the selectors as synthesized at key generation
    selectors: Vec<Vec<bool>>,
    compress_selectors: bool,
}

impl<F: CircuitField, C: CommitmentCurve> VerifyingKey<F, C> {
    pub(crate) fn from_parts(
        domains: EvaluationDomains<F>,
        fixed_commitments: Vec<C>,
        permutation: permutation::VerifyingKey<C>,
        cs: ConstraintSystem<F>,
        selectors: Vec<Vec<bool>>,
        compress_selectors: bool,
    ) -> Self {
        let cs_degree = cs.degree();
        let mut vk = VerifyingKey {
            domains,
            fixed_commitments,
            permutation,
            cs,
            cs_degree,
            transcript_repr: F::zero(),
            selectors,
            compress_selectors,
        };

        let pinned = format!("{:?}", vk.pinned());
        let mut hasher = Blake2bState::new(VERIFYING_KEY_PERSONALIZATION);
        hasher.update(&(pinned.len() as u64).to_le_bytes());
        hasher.update(pinned.as_bytes());
        vk.transcript_repr = F::from_le_bytes_mod_order(&hasher.finalize());
        log::debug!("verifying key pinned to {} bytes", pinned.len());

        vk
    }

    /// The parts of the key that determine the circuit. Their `Debug`
    /// rendering is hashed into [VerifyingKey::transcript_repr].
    pub fn pinned(&self) -> PinnedVerificationKey<'_, F, C> {
        PinnedVerificationKey {
            k: self.domains.k(),
            extended_k: self.domains.extended_k(),
            omega: self.domains.omega(),
            cs: &self.cs,
            fixed_commitments: &self.fixed_commitments,
            permutation: &self.permutation,
        }
    }

    /// Absorbs the key into the transcript.
    pub fn hash_into<T: Transcript<F, C>>(&self, transcript: &mut T) -> io::Result<()> {
        transcript.common_scalar(self.transcript_repr)
    }
}

impl<F: CircuitField, C> VerifyingKey<F, C> {
    pub fn domains(&self) -> &EvaluationDomains<F> {
        &self.domains
    }

    pub fn fixed_commitments(&self) -> &[C] {
        &self.fixed_commitments
    }

    pub fn permutation(&self) -> &permutation::VerifyingKey<C> {
        &self.permutation
    }

    pub fn cs(&self) -> &ConstraintSystem<F> {
        &self.cs
    }

    pub fn cs_degree(&self) -> usize {
        self.cs_degree
    }

    pub fn transcript_repr(&self) -> F {
        self.transcript_repr
    }

    pub fn selectors(&self) -> &[Vec<bool>] {
        &self.selectors
    }

    /// Whether simple selectors were combined into shared fixed columns
    pub fn compress_selectors(&self) -> bool {
        self.compress_selectors
    }
}

/// What the prover knows about a circuit.
#[derive(Clone, Debug)]
pub struct ProvingKey<F: CircuitField, C> {
    vk: VerifyingKey<F, C>,
    /// `l_0(X)` over the extended coset
    l0: Evaluations<F, D<F>>,
    /// `l_last(X)`, 1 on the last usable row
    l_last: Evaluations<F, D<F>>,
    /// `1 - (l_last(X) + l_blind(X))`
    l_active_row: Evaluations<F, D<F>>,
    fixed_values: Vec<Evaluations<F, D<F>>>,
    fixed_polys: Vec<DensePolynomial<F>>,
    fixed_cosets: Vec<Evaluations<F, D<F>>>,
    permutation: permutation::ProvingKey<F>,
    vanishing_argument: VanishingArgument<F>,
}

impl<F: CircuitField, C> ProvingKey<F, C> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        vk: VerifyingKey<F, C>,
        l0: Evaluations<F, D<F>>,
        l_last: Evaluations<F, D<F>>,
        l_active_row: Evaluations<F, D<F>>,
        fixed_values: Vec<Evaluations<F, D<F>>>,
        fixed_polys: Vec<DensePolynomial<F>>,
        fixed_cosets: Vec<Evaluations<F, D<F>>>,
        permutation: permutation::ProvingKey<F>,
    ) -> Self {
        let vanishing_argument = VanishingArgument::create(vk.cs());
        ProvingKey {
            vk,
            l0,
            l_last,
            l_active_row,
            fixed_values,
            fixed_polys,
            fixed_cosets,
            permutation,
            vanishing_argument,
        }
    }

    pub fn vk(&self) -> &VerifyingKey<F, C> {
        &self.vk
    }

    pub fn l0(&self) -> &Evaluations<F, D<F>> {
        &self.l0
    }

    pub fn l_last(&self) -> &Evaluations<F, D<F>> {
        &self.l_last
    }

    pub fn l_active_row(&self) -> &Evaluations<F, D<F>> {
        &self.l_active_row
    }

    pub fn fixed_values(&self) -> &[Evaluations<F, D<F>>] {
        &self.fixed_values
    }

    pub fn fixed_polys(&self) -> &[DensePolynomial<F>] {
        &self.fixed_polys
    }

    pub fn fixed_cosets(&self) -> &[Evaluations<F, D<F>>] {
        &self.fixed_cosets
    }

    pub fn permutation(&self) -> &permutation::ProvingKey<F> {
        &self.permutation
    }

    pub fn vanishing_argument(&self) -> &VanishingArgument<F> {
        &self.vanishing_argument
    }
}
