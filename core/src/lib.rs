// SPDX-FileCopyrightText: © 2023 Foundation Devices, Inc. <hello@foundationdevices.com>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Share-assignment and fragment-encoding core for a physical multisig
//! wallet seed-backup system.
//!
//! Given a multisig [`OutputDescriptor`] replicated across `N` metal plates,
//! [`plan_fragments`] decides which fountain-coded UR fragments to engrave on
//! each plate so that any `M` of the `N` plates recover the descriptor.
//! [`is_recoverable`] mechanically proves that property by simulating every
//! `M`-of-`N` coalition.
//!
//! The core is a pure, synchronous library: no I/O, no ambient runtime, no
//! configuration. See [`fits_plate`] and [`bound_title`] for the two
//! remaining boundary checks an engraving consumer needs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod descriptor;
pub mod error;
pub mod fragment;
pub mod geometry;
pub mod title;

mod fountain;
mod planner;
mod verifier;

pub use descriptor::{Key, OutputDescriptor};
pub use error::{DescriptorTooLarge, NoEncoding, TooManyPlates};
pub use fragment::FragmentSet;
pub use geometry::fits_plate;
pub use planner::{plan, plan_fragments};
pub use title::{bound_title, GlyphFace};
pub use verifier::is_recoverable;
