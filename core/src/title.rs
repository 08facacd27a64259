// SPDX-FileCopyrightText: © 2023 Foundation Devices, Inc. <hello@foundationdevices.com>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Engraved-title bounding: uppercasing, glyph-availability filtering and
//! length truncation for the text stamped alongside a plate's fragments.

/// A font able to report which upper-case glyphs it can render.
///
/// Implemented by the engraving layout engine's font; this crate only needs
/// the availability query.
pub trait GlyphFace {
    /// Returns `true` if `c` (already upper-cased) can be rendered.
    fn supports(&self, c: char) -> bool;
}

/// Fixed physical constraint of the smallest supported plate.
const MAX_TITLE_GLYPHS: usize = 18;

/// Upper-cases `s`, discards code points `face` cannot render, and truncates
/// to [`MAX_TITLE_GLYPHS`] glyphs.
pub fn bound_title(face: &impl GlyphFace, s: &str) -> String {
    s.chars()
        .flat_map(char::to_uppercase)
        .filter(|c| face.supports(*c))
        .take(MAX_TITLE_GLYPHS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RejectsAccents;

    impl GlyphFace for RejectsAccents {
        fn supports(&self, c: char) -> bool {
            c.is_ascii()
        }
    }

    #[test]
    fn drops_unsupported_glyphs_and_truncates() {
        let face = RejectsAccents;
        let bounded = bound_title(&face, "Ünicode naïve café-1234567890ABCDEFGHIJ");
        assert_eq!(bounded, "NICODE NAVE CAF-12");
        assert_eq!(bounded.chars().count(), 18);
    }

    #[test]
    fn is_idempotent() {
        let face = RejectsAccents;
        let once = bound_title(&face, "a title with, some! punctuation");
        let twice = bound_title(&face, &once);
        assert_eq!(once, twice);
        assert!(once.chars().count() <= MAX_TITLE_GLYPHS);
    }

    #[test]
    fn short_titles_pass_through_uppercased() {
        let face = RejectsAccents;
        assert_eq!(bound_title(&face, "my wallet"), "MY WALLET");
    }
}
