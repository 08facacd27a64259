// SPDX-FileCopyrightText: © 2023 Foundation Devices, Inc. <hello@foundationdevices.com>
// SPDX-License-Identifier: GPL-3.0-or-later

//! A simplified output descriptor: a flat M-of-N set of elliptic-curve keys
//! plus an engraved title.
//!
//! This stands in for the originating project's arena-allocated, recursive
//! output-descriptor terminal grammar (script hash / witness script hash /
//! taproot / cosigner, each possibly nesting another terminal). This crate
//! only ever plans shares for flat multisig, so a recursive terminal tree
//! and its arena are unnecessary; `OutputDescriptor` models the
//! `Multisig`/`SortedMultisig` terminal directly.

use minicbor::data::Type;
use minicbor::decode::Error as DecodeError;
use minicbor::encode::{Error as EncodeError, Write};
use minicbor::{Decode, Decoder, Encode, Encoder};

/// A single elliptic-curve key, as embedded in an [`OutputDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    /// The curve type. [`Key::SECP256K1`] unless stated otherwise.
    pub curve: u64,
    /// Whether `data` holds a private key.
    pub is_private: bool,
    /// The key material.
    pub data: Vec<u8>,
}

impl Key {
    /// `secp256k1` curve type, the implicit default.
    pub const SECP256K1: u64 = 0;

    /// Construct a public `secp256k1` key from its encoded bytes.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            curve: Self::SECP256K1,
            is_private: false,
            data: data.into(),
        }
    }
}

impl<C> Encode<C> for Key {
    fn encode<W: Write>(&self, e: &mut Encoder<W>, _ctx: &mut C) -> Result<(), EncodeError<W::Error>> {
        let is_not_default_curve = self.curve != Self::SECP256K1;
        let len = u64::from(is_not_default_curve) + u64::from(self.is_private) + 1;
        e.map(len)?;

        if is_not_default_curve {
            e.u8(1)?.u64(self.curve)?;
        }
        if self.is_private {
            e.u8(2)?.bool(self.is_private)?;
        }
        e.u8(3)?.bytes(&self.data)?;

        Ok(())
    }
}

impl<'b, C> Decode<'b, C> for Key {
    fn decode(d: &mut Decoder<'b>, _ctx: &mut C) -> Result<Self, DecodeError> {
        let mut curve = Self::SECP256K1;
        let mut is_private = false;
        let mut data = None;

        let mut len = d.map()?;
        loop {
            match len {
                Some(0) => break,
                Some(n) => len = Some(n - 1),
                None => {
                    if d.datatype()? == Type::Break {
                        break;
                    }
                }
            }

            match d.u32()? {
                1 => curve = d.u64()?,
                2 => is_private = d.bool()?,
                3 => data = Some(d.bytes()?.to_vec()),
                _ => return Err(DecodeError::message("unknown key map entry")),
            }
        }

        Ok(Self {
            curve,
            is_private,
            data: data.ok_or_else(|| DecodeError::message("key data is missing"))?,
        })
    }
}

/// An M-of-N multisig output descriptor.
///
/// `title` is engraved on the plates but deliberately excluded from
/// [`encode`](Self::encode) — it never crosses the fountain/UR wire format,
/// and equality between descriptors ([`eq_ignoring_title`](Self::eq_ignoring_title))
/// ignores it too.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputDescriptor {
    /// The minimum number of signers required (`M`).
    pub threshold: u8,
    /// The co-signer keys, in plate order (`N = keys.len()`).
    pub keys: Vec<Key>,
    /// The engraved title. Not part of the encoded payload.
    pub title: String,
}

impl OutputDescriptor {
    /// Construct a new descriptor.
    ///
    /// # Panics
    ///
    /// Panics if `threshold` is zero, greater than `keys.len()`, or if
    /// `keys` is empty or has more than 255 entries.
    pub fn new(threshold: u8, keys: Vec<Key>, title: impl Into<String>) -> Self {
        assert!(!keys.is_empty(), "a descriptor needs at least one key");
        assert!(keys.len() <= u8::MAX as usize, "too many keys");
        assert!(threshold >= 1, "threshold must be at least one");
        assert!(
            usize::from(threshold) <= keys.len(),
            "threshold cannot exceed the number of keys"
        );

        Self {
            threshold,
            keys,
            title: title.into(),
        }
    }

    /// Number of keys (`N`).
    pub fn n(&self) -> u8 {
        self.keys.len() as u8
    }

    /// Canonical CBOR encoding of the descriptor, excluding the title.
    pub fn encode(&self) -> Vec<u8> {
        minicbor::to_vec(self).expect("descriptor encoding is infallible")
    }

    /// Decode a descriptor previously produced by [`encode`](Self::encode).
    ///
    /// The returned descriptor has an empty `title`, since the title is not
    /// part of the encoded payload; callers that need to compare against an
    /// original descriptor should use [`eq_ignoring_title`](Self::eq_ignoring_title).
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        minicbor::decode(bytes)
    }

    /// Structural equality that ignores the engraved title.
    pub fn eq_ignoring_title(&self, other: &Self) -> bool {
        self.threshold == other.threshold && self.keys == other.keys
    }
}

impl<C> Encode<C> for OutputDescriptor {
    fn encode<W: Write>(&self, e: &mut Encoder<W>, ctx: &mut C) -> Result<(), EncodeError<W::Error>> {
        e.map(2)?;
        e.u8(1)?.u8(self.threshold)?;
        e.u8(2)?.array(self.keys.len() as u64)?;
        for key in &self.keys {
            key.encode(e, ctx)?;
        }
        Ok(())
    }
}

impl<'b, C> Decode<'b, C> for OutputDescriptor {
    fn decode(d: &mut Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        let mut threshold = None;
        let mut keys = None;

        let mut len = d.map()?;
        loop {
            match len {
                Some(0) => break,
                Some(n) => len = Some(n - 1),
                None => {
                    if d.datatype()? == Type::Break {
                        break;
                    }
                }
            }

            match d.u32()? {
                1 => threshold = Some(d.u8()?),
                2 => {
                    let array_len = d
                        .array()?
                        .ok_or_else(|| DecodeError::message("keys array must have a known length"))?;
                    let mut decoded = Vec::with_capacity(array_len as usize);
                    for _ in 0..array_len {
                        decoded.push(Key::decode(d, ctx)?);
                    }
                    keys = Some(decoded);
                }
                _ => return Err(DecodeError::message("unknown output descriptor map entry")),
            }
        }

        let threshold = threshold.ok_or_else(|| DecodeError::message("threshold is missing"))?;
        let keys = keys.ok_or_else(|| DecodeError::message("keys are missing"))?;

        if keys.is_empty() {
            return Err(DecodeError::message("descriptor has no keys"));
        }
        if usize::from(threshold) > keys.len() || threshold == 0 {
            return Err(DecodeError::message("invalid threshold"));
        }

        Ok(Self {
            threshold,
            keys,
            title: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(n: usize) -> OutputDescriptor {
        let keys = (0..n)
            .map(|i| Key::new(vec![i as u8; 33]))
            .collect();
        OutputDescriptor::new(2.min(n as u8).max(1), keys, "My Wallet")
    }

    #[test]
    fn encode_decode_round_trips_ignoring_title() {
        let desc = sample(3);
        let bytes = desc.encode();
        let decoded = OutputDescriptor::decode(&bytes).unwrap();

        assert_eq!(decoded.title, "");
        assert!(desc.eq_ignoring_title(&decoded));
        assert_ne!(desc, decoded);
    }

    #[test]
    #[should_panic]
    fn threshold_cannot_exceed_key_count() {
        let keys = vec![Key::new(vec![1; 33])];
        OutputDescriptor::new(2, keys, "");
    }

    #[test]
    fn decode_rejects_empty_keys_array() {
        // map(2) { 1: threshold(1), 2: array(0) }
        const BYTES: &[u8] = &[0xA2, 0x01, 0x01, 0x02, 0x80];
        assert!(OutputDescriptor::decode(BYTES).is_err());
    }
}
