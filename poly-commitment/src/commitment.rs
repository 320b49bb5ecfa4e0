//! Curve points as they appear in proofs and transcripts.
//!
//! A point is written as the little-endian bytes of `x`, with the parity of
//! `y` stored in the top bit of the last byte. The point at infinity is
//! written as zeros. This needs a spare bit in the encoding of the base
//! field, which every pairing friendly curve used here has.

use ark_ec::{
    short_weierstrass::{Affine, SWCurveConfig},
    AffineRepr,
};
use ark_ff::{BigInteger, PrimeField};

/// Represents additional information that a curve needs in order to be
/// written to proofs and absorbed by transcripts.
pub trait CommitmentCurve: AffineRepr {
    type Base: PrimeField;

    /// Size of a compressed point in bytes
    const COMPRESSED_SIZE: usize;

    /// Affine coordinates, `None` for the point at infinity.
    fn to_coordinates(&self) -> Option<(Self::Base, Self::Base)>;

    fn to_compressed(&self) -> Vec<u8>;

    /// Decodes a compressed point, rejecting non-canonical encodings and
    /// points outside of the prime order subgroup.
    fn from_compressed(bytes: &[u8]) -> Option<Self>;
}

impl<P: SWCurveConfig> CommitmentCurve for Affine<P>
where
    P::BaseField: PrimeField,
{
    type Base = P::BaseField;

    const COMPRESSED_SIZE: usize = ((P::BaseField::MODULUS_BIT_SIZE + 7) / 8) as usize;

    fn to_coordinates(&self) -> Option<(Self::Base, Self::Base)> {
        if self.infinity {
            None
        } else {
            Some((self.x, self.y))
        }
    }

    fn to_compressed(&self) -> Vec<u8> {
        match self.to_coordinates() {
            None => vec![0; Self::COMPRESSED_SIZE],
            Some((x, y)) => {
                let mut bytes = x.into_bigint().to_bytes_le();
                bytes.resize(Self::COMPRESSED_SIZE, 0);
                if y.into_bigint().is_odd() {
                    bytes[Self::COMPRESSED_SIZE - 1] |= 0x80;
                }
                bytes
            }
        }
    }

    fn from_compressed(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::COMPRESSED_SIZE {
            return None;
        }
        let mut x_bytes = bytes.to_vec();
        let y_is_odd = x_bytes[Self::COMPRESSED_SIZE - 1] >> 7 == 1;
        x_bytes[Self::COMPRESSED_SIZE - 1] &= 0x7f;

        if x_bytes.iter().all(|byte| *byte == 0) {
            return (!y_is_odd).then(Self::zero);
        }

        let x = P::BaseField::from_le_bytes_mod_order(&x_bytes);
        let mut canonical = x.into_bigint().to_bytes_le();
        canonical.resize(Self::COMPRESSED_SIZE, 0);
        if canonical != x_bytes {
            return None;
        }

        let (y0, y1) = Self::get_ys_from_x_unchecked(x)?;
        let y = if y0.into_bigint().is_odd() == y_is_odd {
            y0
        } else {
            y1
        };
        let point = Self::new_unchecked(x, y);
        point
            .is_in_correct_subgroup_assuming_on_curve()
            .then_some(point)
    }
}
