use ark_ff::{BigInteger, Field, PrimeField};
use ark_serialize::CanonicalDeserialize;
use num_bigint::BigUint;
use rayon::prelude::*;
use thiserror::Error;

// Field helpers error
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FieldHelpersError {
    #[error("failed to deserialize field bytes")]
    DeserializeBytes,
    #[error("failed to decode hex")]
    DecodeHex,
    #[error("the value is not smaller than the field modulus")]
    NonCanonical,
}
pub type Result<T> = std::result::Result<T, FieldHelpersError>;

/// Field element helpers
pub trait FieldHelpers<F> {
    /// Deserialize from canonical little-endian bytes
    fn from_bytes(bytes: &[u8]) -> Result<F>;

    /// Deserialize from a big-endian hex string, with or without `0x`
    fn from_hex(hex: &str) -> Result<F>;

    /// Serialize to canonical little-endian bytes
    fn to_bytes(self) -> Vec<u8>;

    /// Serialize to a `0x`-prefixed big-endian hex string
    fn to_hex(self) -> String;

    /// Get the modulus as `BigUint`
    fn modulus_biguint() -> BigUint
    where
        F: PrimeField,
    {
        BigUint::from_bytes_le(&F::MODULUS.to_bytes_le())
    }
}

impl<F: PrimeField> FieldHelpers<F> for F {
    fn from_bytes(bytes: &[u8]) -> Result<F> {
        F::deserialize_compressed(bytes).map_err(|_| FieldHelpersError::DeserializeBytes)
    }

    fn from_hex(hex: &str) -> Result<F> {
        let digits = hex.strip_prefix("0x").unwrap_or(hex);
        if digits.is_empty() {
            return Err(FieldHelpersError::DecodeHex);
        }
        let value =
            BigUint::parse_bytes(digits.as_bytes(), 16).ok_or(FieldHelpersError::DecodeHex)?;
        if value >= F::modulus_biguint() {
            return Err(FieldHelpersError::NonCanonical);
        }
        Ok(F::from_le_bytes_mod_order(&value.to_bytes_le()))
    }

    fn to_bytes(self) -> Vec<u8> {
        self.into_bigint().to_bytes_le()
    }

    fn to_hex(self) -> String {
        format!("0x{}", hex::encode(self.into_bigint().to_bytes_be()))
    }
}

/// Inverts every element of `values` in place using a single field inversion
/// (forward prefix products, one inversion, backward distribution).
///
/// # Panics
///
/// Panics if any element is zero. A zero here means the witness or the key
/// is malformed and no proof may be produced from it.
pub fn batch_invert_nonzero<F: Field>(values: &mut [F]) {
    let mut prefix = Vec::with_capacity(values.len());
    let mut acc = F::one();
    for value in values.iter() {
        prefix.push(acc);
        acc *= value;
    }

    let mut inv = match acc.inverse() {
        Some(inv) => inv,
        None => panic!("batch inversion encountered a zero element"),
    };

    for (value, prefix) in values.iter_mut().zip(prefix).rev() {
        let next = inv * *value;
        *value = inv * prefix;
        inv = next;
    }
}

/// Same as [batch_invert_nonzero], splitting the work across the rayon pool.
pub fn par_batch_invert_nonzero<F: Field>(values: &mut [F]) {
    let chunk = std::cmp::max(values.len() / rayon::current_num_threads(), 1024);
    values.par_chunks_mut(chunk).for_each(batch_invert_nonzero);
}
