//! Serde adapters for [arkworks](http://arkworks.rs/) types implementing
//! [CanonicalSerialize] and [CanonicalDeserialize].
//!
//! Annotate fields with `#[serde_as(as = "plonkish_utils::serialization::SerdeAs")]`,
//! or containers of such types with `#[serde_as(as = "Vec<SerdeAs>")]`.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde_with::{Bytes, DeserializeAs, SerializeAs};

/// Serializes through the compressed canonical encoding, and validates the
/// decoded value on the way back.
pub struct SerdeAs;

impl<T> SerializeAs<T> for SerdeAs
where
    T: CanonicalSerialize,
{
    fn serialize_as<S>(val: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut bytes = Vec::with_capacity(val.compressed_size());
        val.serialize_compressed(&mut bytes)
            .map_err(serde::ser::Error::custom)?;
        Bytes::serialize_as(&bytes, serializer)
    }
}

impl<'de, T> DeserializeAs<'de, T> for SerdeAs
where
    T: CanonicalDeserialize,
{
    fn deserialize_as<D>(deserializer: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes: Vec<u8> = Bytes::deserialize_as(deserializer)?;
        let mut reader = &bytes[..];
        let val = T::deserialize_compressed(&mut reader).map_err(serde::de::Error::custom)?;
        if !reader.is_empty() {
            return Err(serde::de::Error::custom(format!(
                "{} trailing bytes after canonical value",
                reader.len()
            )));
        }
        Ok(val)
    }
}
