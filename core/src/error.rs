// SPDX-FileCopyrightText: © 2023 Foundation Devices, Inc. <hello@foundationdevices.com>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error types surfaced by this crate.

use core::fmt;

/// The planned fragments for a descriptor do not fit within a plate's safe
/// engraving area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptorTooLarge {
    /// Number of fragments that were attempted to fit.
    pub fragment_count: usize,
    /// Width of the plate's safe inner rectangle, in plate millimetres.
    pub safe_width: f32,
    /// Height of the plate's safe inner rectangle, in plate millimetres.
    pub safe_height: f32,
}

impl fmt::Display for DescriptorTooLarge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fragments do not fit within the {:.1}x{:.1}mm safe area",
            self.fragment_count, self.safe_width, self.safe_height
        )
    }
}

impl std::error::Error for DescriptorTooLarge {}

/// The fountain sequence-number search exceeded its probe bound.
///
/// This indicates a defect in the caller's `(seq_len, parts)` pair, not a
/// transient failure; the fountain chooser is surjective onto every non-empty
/// subset of `{0,...,seq_len-1}`, so a valid pair always resolves well within
/// the bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoEncoding {
    /// The sequence length the search was run against.
    pub seq_len: u32,
    /// How many candidate sequence numbers were probed before giving up.
    pub probes: u32,
}

impl fmt::Display for NoEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no sequence number encodes the requested fragment after {} probes (seq_len {})",
            self.probes, self.seq_len
        )
    }
}

impl std::error::Error for NoEncoding {}

/// [`crate::is_recoverable`] was asked to verify a descriptor with more keys
/// than the coalition enumeration can bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooManyPlates {
    /// The number of keys in the descriptor.
    pub n: usize,
    /// The maximum number of plates the verifier will enumerate coalitions for.
    pub max: usize,
}

impl fmt::Display for TooManyPlates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "descriptor has {} keys, exceeding the verifier's limit of {}",
            self.n, self.max
        )
    }
}

impl std::error::Error for TooManyPlates {}
