//! Common [scalar data types][data types] used in font files
//!
//! [data types]: https://docs.microsoft.com/en-us/typography/opentype/spec/otff#data-types

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

mod bbox;
mod fixed;
mod glyph_id;
mod offset;
mod pen;
mod raw;
mod tag;

#[cfg(all(test, feature = "serde"))]
mod serde_test;

pub use bbox::BoundingBox;
pub use fixed::Fixed;
pub use glyph_id::GlyphId;
pub use offset::{Nullable, Offset, Offset16, Offset32};
pub use pen::{Pen, PenCommand};
pub use raw::{BigEndian, FixedSize, Scalar};
pub use tag::Tag;

/// The header tag for a font collection file.
pub const TTC_HEADER_TAG: Tag = Tag::new(b"ttcf");

/// The SFNT version for fonts containing TrueType outlines.
pub const TT_SFNT_VERSION: u32 = 0x00010000;
/// The SFNT version used by some legacy Apple fonts containing TrueType outlines.
pub const TRUE_SFNT_VERSION: u32 = 0x74727565;
/// The SFNT version for fonts containing CFF outlines.
pub const CFF_SFNT_VERSION: u32 = 0x4F54544F;
