// SPDX-FileCopyrightText: © 2023 Foundation Devices, Inc. <hello@foundationdevices.com>
// SPDX-License-Identifier: GPL-3.0-or-later

//! The plate size boundary: an approximate check that a planned fragment
//! count fits a plate's safe engraving area.

use crate::error::DescriptorTooLarge;

/// Margin, in plate millimetres, reserved outside the safe engraving
/// rectangle.
const OUTER_MARGIN: f32 = 3.0;

/// Margin, in plate millimetres, reserved inside the safe engraving
/// rectangle.
const INNER_MARGIN: f32 = 10.0;

/// Approximate vertical footprint, in millimetres, of one engraved fragment
/// line (font height plus line spacing).
const MM_PER_FRAGMENT_LINE: f32 = 4.5;

/// Checks that `fragment_count` fragments fit within a plate of the given
/// physical dimensions.
///
/// This approximates the rendered footprint from the fragment count alone;
/// it does not perform font rasterization, which is the engraving layout
/// engine's responsibility.
pub fn fits_plate(plate_width: f32, plate_height: f32, fragment_count: usize) -> Result<(), DescriptorTooLarge> {
    let safe_width = plate_width - 2.0 * (OUTER_MARGIN + INNER_MARGIN);
    let safe_height = plate_height - 2.0 * (OUTER_MARGIN + INNER_MARGIN);

    let needed_height = fragment_count as f32 * MM_PER_FRAGMENT_LINE;

    if safe_width <= 0.0 || safe_height <= 0.0 || needed_height > safe_height {
        return Err(DescriptorTooLarge {
            fragment_count,
            safe_width: safe_width.max(0.0),
            safe_height: safe_height.max(0.0),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_handful_of_fragments_fits_a_standard_plate() {
        assert!(fits_plate(85.6, 54.0, 2).is_ok());
    }

    #[test]
    fn too_many_fragments_do_not_fit() {
        assert!(fits_plate(85.6, 54.0, 100).is_err());
    }

    #[test]
    fn a_plate_smaller_than_the_margins_never_fits() {
        assert!(fits_plate(10.0, 10.0, 1).is_err());
    }
}
