//! The always-empty `extensions` vector.
//!
//! Transactions and a few operations end with a vector of future
//! extensions. No extension type is defined on the chain, so the vector is
//! always empty: it encodes as a single `0x00` count byte and as `[]` in
//! JSON. Decoding a non-empty vector fails rather than silently dropping
//! data the signer would have committed to.

use serde::de::{Error as _, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::codec::{write_varint, CodecError, Reader};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Extensions;

impl Extensions {
    pub fn write_to(&self, out: &mut Vec<u8>) {
        write_varint(out, 0);
    }

    pub fn read_from(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        match reader.read_varint()? {
            0 => Ok(Self),
            n => Err(CodecError::malformed(format!(
                "{} extension(s) present; none are supported",
                n
            ))),
        }
    }
}

impl Serialize for Extensions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_seq(Some(0))?.end()
    }
}

impl<'de> Deserialize<'de> for Extensions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EmptySeq;

        impl<'de> Visitor<'de> for EmptySeq {
            type Value = Extensions;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an empty extensions array")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Extensions, A::Error> {
                match seq.next_element::<serde::de::IgnoredAny>()? {
                    None => Ok(Extensions),
                    Some(_) => Err(A::Error::custom("extensions are not supported")),
                }
            }
        }

        deserializer.deserialize_seq(EmptySeq)
    }
}
