//! The [maxp](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) table

use types::Tag;

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// Version 0.5, used by fonts with CFF outlines.
pub const VERSION_0_5: u32 = 0x00005000;
/// Version 1.0, used by fonts with TrueType outlines.
pub const VERSION_1_0: u32 = 0x00010000;

/// The [maxp](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp)
/// (maximum profile) table.
///
/// Only the fields common to both versions are decoded; the version 1.0
/// limits are for hinting and bytecode interpreters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maxp {
    pub version: u32,
    /// The number of glyphs in the font.
    pub num_glyphs: u16,
}

impl TopLevelTable for Maxp {
    const TAG: Tag = Tag::new(b"maxp");
}

impl<'a> FontRead<'a> for Maxp {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: u32 = cursor.read()?;
        let num_glyphs = cursor.read()?;
        match version {
            VERSION_0_5 => (),
            // thirteen more u16 limits
            VERSION_1_0 => cursor.read_array::<u8>(26).map(|_| ())?,
            other => return Err(ReadError::InvalidFormat(other.into())),
        }
        Ok(Maxp {
            version,
            num_glyphs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::bebuffer::BeBuffer;

    #[test]
    fn version_0_5() {
        let buf = BeBuffer::new().push(VERSION_0_5).push(132u16);
        let maxp = Maxp::read(FontData::new(&buf)).unwrap();
        assert_eq!(maxp.num_glyphs, 132);
    }

    #[test]
    fn version_1_0_requires_full_header() {
        let short = BeBuffer::new().push(VERSION_1_0).push(7u16);
        assert_eq!(
            Maxp::read(FontData::new(&short)),
            Err(ReadError::OutOfBounds)
        );
        let full = short.extend([0u16; 13]);
        assert_eq!(Maxp::read(FontData::new(&full)).unwrap().num_glyphs, 7);
    }

    #[test]
    fn unknown_version() {
        let buf = BeBuffer::new().push(0x00020000u32).push(1u16);
        assert_eq!(
            Maxp::read(FontData::new(&buf)),
            Err(ReadError::InvalidFormat(0x20000))
        );
    }
}
