// SPDX-FileCopyrightText: © 2023 Foundation Devices, Inc. <hello@foundationdevices.com>
// SPDX-License-Identifier: GPL-3.0-or-later

//! The share planner: turns `(threshold, plate count, plate index)` into the
//! UR fragment strings engraved on one plate.

use plate_ur::fountain::part::Part;
use plate_ur::UR;

use crate::descriptor::OutputDescriptor;
use crate::fountain;
use crate::fragment::FragmentSet;

const UR_TYPE: &str = "crypto-output";

/// The assignment scheme the planner selects for a given `(M, N)`.
///
/// A closed enum matched once in [`plan`], so a new scheme is an addition (a
/// new arm) rather than an edit to existing branching logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheme {
    /// `M <= 1`: every plate recovers alone.
    Trivial,
    /// `N - M <= 1`: singletons plus one combined "extra" plate.
    NearFull,
    /// `(M, N) == (2, 4)`.
    TwoOfFour,
    /// `(M, N) == (3, 5)`.
    ThreeOfFive,
    /// Every other `(M, N)`: every plate carries the whole payload.
    Fallback,
}

impl Scheme {
    fn select(m: u8, n: u8) -> Self {
        if m <= 1 {
            Scheme::Trivial
        } else if n - m <= 1 {
            Scheme::NearFull
        } else if (m, n) == (2, 4) {
            Scheme::TwoOfFour
        } else if (m, n) == (3, 5) {
            Scheme::ThreeOfFive
        } else {
            Scheme::Fallback
        }
    }
}

/// Plans the fountain fragment sets for plate `key_idx` of an `M`-of-`N` wallet.
///
/// Returns the common sequence length and the fragment sets that plate
/// should carry, in engraving order.
///
/// # Panics
///
/// Panics if `n == 0`, `m` is zero or greater than `n`, or `key_idx >= n`.
pub fn plan(m: u8, n: u8, key_idx: u8) -> (u32, Vec<FragmentSet>) {
    assert!(n >= 1, "n must be at least one");
    assert!(m >= 1 && m <= n, "m must be between one and n");
    assert!(key_idx < n, "key_idx must be less than n");

    let scheme = Scheme::select(m, n);
    log::debug!("planning plate {key_idx} of {m}-of-{n} with scheme {scheme:?}");

    match scheme {
        Scheme::Trivial => (1, vec![FragmentSet::singleton(0)]),

        Scheme::NearFull => {
            let m = usize::from(m);
            let key_idx = usize::from(key_idx);
            let shares = if key_idx < m {
                vec![FragmentSet::singleton(key_idx)]
            } else {
                vec![FragmentSet::new(0..m)]
            };
            (m as u32, shares)
        }

        Scheme::TwoOfFour => {
            let shares = match key_idx {
                0 => vec![FragmentSet::singleton(0), FragmentSet::singleton(1)],
                1 => vec![FragmentSet::singleton(2), FragmentSet::singleton(3)],
                2 => vec![FragmentSet::new([0, 2]), FragmentSet::new([1, 3])],
                3 => vec![FragmentSet::new([0, 1, 2]), FragmentSet::new([1, 2, 3])],
                _ => unreachable!("scheme (c) only applies to n == 4"),
            };
            (4, shares)
        }

        Scheme::ThreeOfFive => {
            let k = usize::from(key_idx);
            let prev = (k + 5 - 1) % 5;
            let next = (k + 1) % 5;
            let shares = vec![FragmentSet::singleton(k), FragmentSet::new([5, prev, next])];
            (6, shares)
        }

        Scheme::Fallback => {
            if m > 1 {
                log::warn!("falling back to the whole-payload scheme for unsupported {m}-of-{n}");
            }
            (1, vec![FragmentSet::singleton(0)])
        }
    }
}

/// Plans and encodes the UR fragment strings for plate `key_idx`.
///
/// Every returned string is upper-case (required by the downstream QR
/// encoder's alphanumeric mode) and, combined with the fragments of enough
/// other plates, recovers `desc` — see [`crate::verifier::is_recoverable`].
pub fn plan_fragments(desc: &OutputDescriptor, key_idx: u8) -> Vec<String> {
    let payload = desc.encode();
    let checksum = fountain::checksum(&payload);
    let (seq_len, shares) = plan(desc.threshold, desc.n(), key_idx);
    let fragment_length = fountain::fragment_length_for(payload.len(), seq_len);

    shares
        .iter()
        .map(|parts| {
            let data = fountain::build_part_data(&payload, fragment_length, parts);
            let sequence = fountain::seq_num_for(seq_len, checksum, parts)
                .expect("a scheme-generated fragment set always resolves to a sequence number");
            ur_encode(&data, sequence, seq_len, payload.len(), checksum)
        })
        .collect()
}

fn ur_encode(data: &[u8], sequence: u32, sequence_count: u32, message_length: usize, checksum: u32) -> String {
    let part = Part {
        sequence,
        sequence_count,
        message_length,
        checksum,
        data,
    };
    let ur = UR::MultiPartDeserialized {
        ur_type: UR_TYPE,
        fragment: part,
    };
    ur.to_string().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Key;
    use crate::verifier::is_recoverable;

    fn keys(n: usize) -> Vec<Key> {
        (0..n).map(|i| Key::new(vec![i as u8; 33])).collect()
    }

    #[test]
    fn one_of_one_recovers_from_a_single_fragment() {
        let (seq_len, shares) = plan(1, 1, 0);
        assert_eq!(seq_len, 1);
        assert_eq!(shares, vec![FragmentSet::singleton(0)]);
    }

    #[test]
    fn two_of_three_assigns_singletons_and_one_combined_plate() {
        let (seq_len, _) = plan(2, 3, 0);
        assert_eq!(seq_len, 2);
        assert_eq!(plan(2, 3, 0).1, vec![FragmentSet::singleton(0)]);
        assert_eq!(plan(2, 3, 1).1, vec![FragmentSet::singleton(1)]);
        assert_eq!(plan(2, 3, 2).1, vec![FragmentSet::new([0, 1])]);
    }

    #[test]
    fn two_of_four_matches_the_pinned_fragment_table() {
        assert_eq!(plan(2, 4, 0).1, vec![FragmentSet::singleton(0), FragmentSet::singleton(1)]);
        assert_eq!(plan(2, 4, 1).1, vec![FragmentSet::singleton(2), FragmentSet::singleton(3)]);
        assert_eq!(plan(2, 4, 2).1, vec![FragmentSet::new([0, 2]), FragmentSet::new([1, 3])]);
        assert_eq!(
            plan(2, 4, 3).1,
            vec![FragmentSet::new([0, 1, 2]), FragmentSet::new([1, 2, 3])]
        );
    }

    #[test]
    fn three_of_five_matches_the_pinned_fragment_table() {
        assert_eq!(plan(3, 5, 0).1, vec![FragmentSet::singleton(0), FragmentSet::new([5, 4, 1])]);
        assert_eq!(plan(3, 5, 1).1, vec![FragmentSet::singleton(1), FragmentSet::new([5, 0, 2])]);
        assert_eq!(plan(3, 5, 4).1, vec![FragmentSet::singleton(4), FragmentSet::new([5, 3, 0])]);
    }

    #[test]
    fn fallback_two_of_seven_uses_the_whole_payload_scheme() {
        let (seq_len, shares) = plan(2, 7, 3);
        assert_eq!(seq_len, 1);
        assert_eq!(shares, vec![FragmentSet::singleton(0)]);
    }

    #[test]
    fn unsupported_two_of_five_falls_back_with_seq_len_one() {
        let (seq_len, _) = plan(2, 5, 0);
        assert_eq!(seq_len, 1);
    }

    #[test]
    fn fragment_counts_match_the_chosen_scheme() {
        assert_eq!(plan(1, 5, 2).1.len(), 1);
        assert_eq!(plan(2, 3, 1).1.len(), 1);
        assert_eq!(plan(2, 4, 0).1.len(), 2);
        assert_eq!(plan(3, 5, 0).1.len(), 2);
        assert_eq!(plan(2, 7, 0).1.len(), 1);
    }

    #[test]
    fn plan_fragments_is_uppercase_and_deterministic() {
        let desc = OutputDescriptor::new(2, keys(4), "My Wallet");
        let first = plan_fragments(&desc, 2);
        let second = plan_fragments(&desc, 2);
        assert_eq!(first, second);
        for fragment in &first {
            assert!(fragment.chars().all(|c| c.is_ascii_uppercase() || !c.is_ascii_alphabetic()));
        }
    }

    #[test]
    fn every_supported_scheme_is_recoverable() {
        for (m, n) in [(1, 1), (2, 3), (2, 4), (3, 5)] {
            let desc = OutputDescriptor::new(m, keys(n as usize), "Wallet");
            assert!(is_recoverable(&desc).unwrap(), "{m}-of-{n} should be recoverable");
        }
    }

    #[test]
    fn fallback_schemes_are_still_recoverable() {
        let desc = OutputDescriptor::new(2, keys(7), "Wallet");
        assert!(is_recoverable(&desc).unwrap());
    }
}
