// SPDX-FileCopyrightText: © 2023 Foundation Devices, Inc. <hello@foundationdevices.com>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Fountain fragment primitives: the payload checksum and the deterministic
//! search for the sequence number that encodes a chosen set of parts.

use std::collections::BTreeSet;

use plate_ur::fountain::chooser::FragmentChooser;

use crate::error::NoEncoding;
use crate::fragment::FragmentSet;

const CRC32: crc::Crc<u32> = crc::Crc::<u32>::new(&crc::CRC_32_ISO_HDLC);

/// Upper bound on how many candidate sequence numbers [`seq_num_for`] probes
/// before giving up. Chosen empirically against the densest supported
/// scheme (3-of-5); ordinary combined fragments resolve within a few hundred
/// probes.
const MAX_PROBES: u32 = 1 << 20;

/// The fountain-layer CRC-32 (ISO-HDLC) over the canonical encoded payload.
///
/// Must match bit-exactly what the UR/fountain codec computes internally, so
/// that third-party UR decoders accept the fragments this crate emits.
pub fn checksum(payload: &[u8]) -> u32 {
    CRC32.checksum(payload)
}

/// Finds the smallest sequence number `s >= seq_len + 1` whose deterministic
/// fountain part-selection chooses exactly `parts`.
///
/// Singletons resolve without a search: sequence numbers `1..=seq_len`
/// always designate the singleton `{s - 1}`.
pub fn seq_num_for(seq_len: u32, checksum: u32, parts: &FragmentSet) -> Result<u32, NoEncoding> {
    if parts.is_singleton() {
        let only = parts.iter().next().expect("singleton has one part");
        return Ok(only as u32 + 1);
    }

    let target = parts.as_set();
    let mut chooser = FragmentChooser::new();
    for probe in 0..MAX_PROBES {
        let s = seq_len + 1 + probe;
        let candidate: BTreeSet<usize> = chooser.choose_fragments(s, seq_len, checksum);
        if &candidate == target {
            return Ok(s);
        }
    }

    Err(NoEncoding {
        seq_len,
        probes: MAX_PROBES,
    })
}

/// Nominal fragment length for splitting a `payload_len`-byte payload into
/// exactly `seq_len` equal (last one padded) parts.
pub(crate) fn fragment_length_for(payload_len: usize, seq_len: u32) -> usize {
    div_ceil(payload_len, seq_len as usize)
}

fn div_ceil(a: usize, b: usize) -> usize {
    let d = a / b;
    let r = a % b;
    if r > 0 {
        d + 1
    } else {
        d
    }
}

fn xor_into(v1: &mut [u8], v2: &[u8]) {
    for (x1, &x2) in v1.iter_mut().zip(v2.iter()) {
        *x1 ^= x2;
    }
}

/// Build the byte payload a fragment carrying `parts` should transmit: the
/// XOR of the payload slices at each part index, zero-padded to
/// `fragment_length` for the final (possibly short) part.
pub(crate) fn build_part_data(payload: &[u8], fragment_length: usize, parts: &FragmentSet) -> Vec<u8> {
    let mut data = vec![0u8; fragment_length];
    for index in parts.iter() {
        let start = index * fragment_length;
        let end = (start + fragment_length).min(payload.len());
        let slice = &payload[start..end];
        xor_into(&mut data[..slice.len()], slice);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_matches_reference_vectors() {
        assert_eq!(checksum(b"Hello, world!"), 0xebe6_c6e6);
        assert_eq!(checksum(b"Wolf"), 0x598c_84dc);
    }

    #[test]
    fn singleton_resolves_without_search() {
        let checksum = checksum(b"irrelevant for singletons");
        for p in 0..6 {
            let s = seq_num_for(6, checksum, &FragmentSet::singleton(p)).unwrap();
            assert_eq!(s, p as u32 + 1);
        }
    }

    #[test]
    fn combined_fragment_round_trips_through_the_chooser() {
        let checksum = checksum(b"some payload bytes");
        let seq_len = 6;
        let target = FragmentSet::new([0, 2, 4]);

        let s = seq_num_for(seq_len, checksum, &target).unwrap();
        assert!(s > seq_len);

        let mut chooser = FragmentChooser::new();
        let chosen: BTreeSet<usize> = chooser.choose_fragments(s, seq_len, checksum);
        assert_eq!(&chosen, target.as_set());
    }
}
