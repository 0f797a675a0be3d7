//! Test data shared between the typeset-fonts crates.
//!
//! Everything here is built in code from big-endian scalars; there are no
//! checked in binaries.

pub mod bebuffer;
pub mod cff;
pub mod cmap;
pub mod gpos;
pub mod gsub;
pub mod layout;
pub mod sfnt;
