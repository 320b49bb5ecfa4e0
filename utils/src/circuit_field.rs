//! Field constants fixing the evaluation domains and the cosets labelling
//! permutation columns.
//!
//! arkworks derives its roots of unity from the generator chosen in the
//! field definition, which is not always the one other halo2 provers use.
//! Domains built through [radix2_domain] are generated by
//! [CircuitField::ROOT_OF_UNITY] instead, so that keys and proofs agree with
//! theirs byte for byte.

use ark_ff::{MontFp, PrimeField};
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain as D};

/// Writing `p - 1 = 2^S * T` with `T` odd, and `g` the multiplicative
/// generator:
pub trait CircuitField: PrimeField {
    /// `g`
    const MULTIPLICATIVE_GENERATOR: Self;

    /// `g^T`, a primitive `2^S`-th root of unity
    const ROOT_OF_UNITY: Self;

    /// `g^(2^S)`. Its powers times the domain are disjoint cosets.
    const DELTA: Self;

    /// `g^((p - 1) / 3)`, the coset shift of extended domains
    const ZETA: Self;
}

impl CircuitField for ark_bn254::Fr {
    const MULTIPLICATIVE_GENERATOR: Self = MontFp!("7");

    const ROOT_OF_UNITY: Self =
        MontFp!("1748695177688661943023146337482803886740723238769601073607632802312037301404");

    const DELTA: Self =
        MontFp!("4131629893567559867359510883348571134090853742863529169391034518566172092834");

    const ZETA: Self = MontFp!("4407920970296243842393367215006156084916469457145843978461");
}

/// The subgroup of order `size` (rounded up to a power of two), generated by
/// a power of [CircuitField::ROOT_OF_UNITY].
pub fn radix2_domain<F: CircuitField>(size: usize) -> Option<D<F>> {
    let mut domain = D::<F>::new(size)?;
    let log_size = domain.log_size_of_group;
    let group_gen = F::ROOT_OF_UNITY.pow([1u64 << (F::TWO_ADICITY - log_size)]);
    domain.group_gen = group_gen;
    domain.group_gen_inv = group_gen.inverse()?;
    Some(domain)
}
