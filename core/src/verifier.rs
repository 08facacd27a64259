// SPDX-FileCopyrightText: © 2023 Foundation Devices, Inc. <hello@foundationdevices.com>
// SPDX-License-Identifier: GPL-3.0-or-later

//! The recoverability verifier: mechanically proves a plan is correct by
//! exhaustively simulating every `M`-of-`N` plate coalition.

use plate_ur::{Decoder, UR};

use crate::descriptor::OutputDescriptor;
use crate::error::TooManyPlates;
use crate::planner::plan_fragments;

/// Largest plate count the coalition enumeration will attempt. Keeps `2^N`
/// bounded; realistic wallets never approach this.
const MAX_PLATES: usize = 16;

/// Confirms that every `M`-of-`N` coalition of plates recovers `desc`
/// bit-exactly, by planning every plate's fragments and replaying every
/// valid coalition through a fresh UR decoder.
///
/// # Errors
///
/// Returns [`TooManyPlates`] if `desc` has more than [`MAX_PLATES`] keys.
pub fn is_recoverable(desc: &OutputDescriptor) -> Result<bool, TooManyPlates> {
    let n = usize::from(desc.n());
    let m = usize::from(desc.threshold);

    if n > MAX_PLATES {
        return Err(TooManyPlates { n, max: MAX_PLATES });
    }

    let shares: Vec<Vec<String>> = (0..n as u8).map(|k| plan_fragments(desc, k)).collect();

    for coalition in coalitions(n, m) {
        log::debug!("verifying coalition {coalition:?}");
        if !recovers(desc, &shares, &coalition) {
            log::warn!("coalition {coalition:?} failed to recover the descriptor");
            return Ok(false);
        }
    }

    Ok(true)
}

/// Every `m`-element subset of `0..n`, represented as the set of plate
/// indices. Assumes `n <= MAX_PLATES`, so `1 << n` never overflows `u32`.
fn coalitions(n: usize, m: usize) -> impl Iterator<Item = Vec<usize>> {
    let upper = (1u32 << n) - 1;
    (1..=upper).filter(move |c| c.count_ones() as usize == m).map(move |c| {
        (0..n).filter(|&bit| c & (1 << bit) != 0).collect::<Vec<usize>>()
    })
}

fn recovers(desc: &OutputDescriptor, shares: &[Vec<String>], coalition: &[usize]) -> bool {
    let mut decoder = Decoder::default();

    for &plate in coalition {
        for fragment in &shares[plate] {
            let lowered = fragment.to_ascii_lowercase();
            let Ok(ur) = UR::parse(&lowered) else {
                return false;
            };
            if decoder.receive(ur).is_err() {
                return false;
            }
        }
    }

    let Ok(Some(message)) = decoder.message() else {
        return false;
    };

    let Ok(decoded) = OutputDescriptor::decode(message) else {
        return false;
    };

    let mut decoded = decoded;
    decoded.title = desc.title.clone();
    decoded == *desc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Key;

    fn keys(n: usize) -> Vec<Key> {
        (0..n).map(|i| Key::new(vec![i as u8; 33])).collect()
    }

    #[test]
    fn two_of_four_recovers_from_the_non_trivial_coalition() {
        let desc = OutputDescriptor::new(2, keys(4), "Wallet");
        let shares: Vec<Vec<String>> = (0..4u8).map(|k| plan_fragments(&desc, k)).collect();
        assert!(recovers(&desc, &shares, &[2, 3]));
    }

    #[test]
    fn three_of_five_recovers_from_an_all_combined_coalition() {
        let desc = OutputDescriptor::new(3, keys(5), "Wallet");
        let shares: Vec<Vec<String>> = (0..5u8).map(|k| plan_fragments(&desc, k)).collect();
        assert!(recovers(&desc, &shares, &[0, 2, 4]));
    }

    #[test]
    fn title_is_ignored_by_recoverability() {
        let desc = OutputDescriptor::new(2, keys(3), "Engraved Title");
        assert!(is_recoverable(&desc).unwrap());
    }

    #[test]
    fn too_many_plates_is_rejected_before_enumeration() {
        let desc = OutputDescriptor::new(1, keys(17), "Wallet");
        assert_eq!(is_recoverable(&desc), Err(TooManyPlates { n: 17, max: MAX_PLATES }));
    }

    #[test]
    fn fewer_than_m_plates_cannot_recover() {
        let desc = OutputDescriptor::new(2, keys(4), "Wallet");
        let shares: Vec<Vec<String>> = (0..4u8).map(|k| plan_fragments(&desc, k)).collect();
        assert!(!recovers(&desc, &shares, &[0]));
    }
}
