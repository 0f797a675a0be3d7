//! The [loca (Index to Location)][loca] table
//!
//! [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca

use std::ops::Range;

use types::{BigEndian, GlyphId, Tag};

use crate::{FontData, FontReadWithArgs, ReadArgs, ReadError, TopLevelTable};

/// The [loca] table: the location of each glyph in the `glyf` table.
///
/// Short offsets are stored divided by two.
///
/// [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca
#[derive(Clone, Debug)]
pub enum Loca<'a> {
    Short(&'a [BigEndian<u16>]),
    Long(&'a [BigEndian<u32>]),
}

impl TopLevelTable for Loca<'_> {
    const TAG: Tag = Tag::new(b"loca");
}

impl<'a> Loca<'a> {
    pub fn read(data: FontData<'a>, is_long: bool) -> Result<Self, ReadError> {
        Self::read_with_args(data, &is_long)
    }

    /// The number of glyphs with a location.
    pub fn len(&self) -> usize {
        match self {
            Loca::Short(offsets) => offsets.len().saturating_sub(1),
            Loca::Long(offsets) => offsets.len().saturating_sub(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The byte offset into `glyf` stored at `index`.
    pub fn get_raw(&self, index: usize) -> Option<u32> {
        match self {
            Loca::Short(offsets) => offsets.get(index).map(|x| x.get() as u32 * 2),
            Loca::Long(offsets) => offsets.get(index).map(|x| x.get()),
        }
    }

    /// The range of the glyph's data in the `glyf` table.
    ///
    /// Returns `Ok(None)` for a glyph with no outline. Glyph ids past the end
    /// of the table and decreasing offsets are errors.
    pub fn glyph_range(&self, gid: GlyphId) -> Result<Option<Range<usize>>, ReadError> {
        let index = gid.to_u32() as usize;
        let start = self.get_raw(index).ok_or(ReadError::OutOfBounds)?;
        let end = self.get_raw(index + 1).ok_or(ReadError::OutOfBounds)?;
        match start.cmp(&end) {
            std::cmp::Ordering::Equal => Ok(None),
            std::cmp::Ordering::Less => Ok(Some(start as usize..end as usize)),
            std::cmp::Ordering::Greater => {
                Err(ReadError::MalformedData("loca offsets are not increasing"))
            }
        }
    }
}

impl ReadArgs for Loca<'_> {
    type Args = bool;
}

impl<'a> FontReadWithArgs<'a> for Loca<'a> {
    fn read_with_args(data: FontData<'a>, is_long: &bool) -> Result<Self, ReadError> {
        if *is_long {
            data.read_array(0..data.len() / 4 * 4).map(Loca::Long)
        } else {
            data.read_array(0..data.len() / 2 * 2).map(Loca::Short)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::bebuffer::BeBuffer;

    #[test]
    fn short_offsets_are_doubled() {
        let buf = BeBuffer::new().extend([0u16, 10, 10, 25]);
        let loca = Loca::read(FontData::new(&buf), false).unwrap();
        assert_eq!(loca.len(), 3);
        assert_eq!(loca.glyph_range(GlyphId::new(0)), Ok(Some(0..20)));
        assert_eq!(loca.glyph_range(GlyphId::new(1)), Ok(None));
        assert_eq!(loca.glyph_range(GlyphId::new(2)), Ok(Some(20..50)));
        assert_eq!(
            loca.glyph_range(GlyphId::new(3)),
            Err(ReadError::OutOfBounds)
        );
    }

    #[test]
    fn long_offsets() {
        let buf = BeBuffer::new().extend([0u32, 36, 12]);
        let loca = Loca::read(FontData::new(&buf), true).unwrap();
        assert_eq!(loca.get_raw(1), Some(36));
        assert_eq!(loca.glyph_range(GlyphId::new(0)), Ok(Some(0..36)));
        assert!(matches!(
            loca.glyph_range(GlyphId::new(1)),
            Err(ReadError::MalformedData(_))
        ));
    }
}
