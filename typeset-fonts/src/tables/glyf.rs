//! The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table

use types::{BoundingBox, GlyphId, Tag};

use super::loca::Loca;
use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table.
///
/// Glyph data is located through the [`Loca`] table.
#[derive(Clone, Debug)]
pub struct Glyf<'a> {
    data: FontData<'a>,
}

/// The header shared by simple and composite glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphHeader {
    /// Negative for a composite glyph.
    pub number_of_contours: i16,
    pub bounds: BoundingBox<i16>,
}

impl GlyphHeader {
    pub fn is_composite(&self) -> bool {
        self.number_of_contours < 0
    }
}

impl TopLevelTable for Glyf<'_> {
    const TAG: Tag = Tag::new(b"glyf");
}

impl<'a> FontRead<'a> for Glyf<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Glyf { data })
    }
}

impl<'a> Glyf<'a> {
    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }

    /// Reads the header of the glyph at `gid`.
    ///
    /// Glyphs without an outline (such as a space) have no header and
    /// return `Ok(None)`.
    pub fn glyph_header(
        &self,
        loca: &Loca<'a>,
        gid: GlyphId,
    ) -> Result<Option<GlyphHeader>, ReadError> {
        let Some(range) = loca.glyph_range(gid)? else {
            return Ok(None);
        };
        let data = self.data.slice(range).ok_or(ReadError::OutOfBounds)?;
        GlyphHeader::read(data).map(Some)
    }
}

impl<'a> FontRead<'a> for GlyphHeader {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let number_of_contours = cursor.read()?;
        let bounds = BoundingBox {
            x_min: cursor.read()?,
            y_min: cursor.read()?,
            x_max: cursor.read()?,
            y_max: cursor.read()?,
        };
        Ok(GlyphHeader {
            number_of_contours,
            bounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::bebuffer::BeBuffer;

    #[test]
    fn headers_through_loca() {
        // a one contour glyph followed by a composite; glyph 1 is empty
        let glyf = BeBuffer::new()
            .extend([1i16, 10, -20, 300, 700])
            .extend([0u16; 3])
            .extend([-1i16, 0, 0, 40, 50])
            .extend([0u16; 3]);
        let loca = BeBuffer::new().extend([0u16, 8, 8, 16]);
        let loca = Loca::read(FontData::new(&loca), false).unwrap();
        let glyf = Glyf::read(FontData::new(&glyf)).unwrap();
        let header = glyf
            .glyph_header(&loca, GlyphId::new(0))
            .unwrap()
            .unwrap();
        assert_eq!(header.number_of_contours, 1);
        assert_eq!(
            header.bounds,
            BoundingBox {
                x_min: 10,
                y_min: -20,
                x_max: 300,
                y_max: 700
            }
        );
        assert!(!header.is_composite());
        assert_eq!(glyf.glyph_header(&loca, GlyphId::new(1)), Ok(None));
        let composite = glyf
            .glyph_header(&loca, GlyphId::new(2))
            .unwrap()
            .unwrap();
        assert!(composite.is_composite());
        assert_eq!(composite.bounds.y_max, 50);
    }

    #[test]
    fn truncated_glyph() {
        let glyf = BeBuffer::new().extend([1i16, 10, -20]);
        let loca = BeBuffer::new().extend([0u16, 3]);
        let loca = Loca::read(FontData::new(&loca), false).unwrap();
        let glyf = Glyf::read(FontData::new(&glyf)).unwrap();
        assert_eq!(
            glyf.glyph_header(&loca, GlyphId::new(0)),
            Err(ReadError::OutOfBounds)
        );
    }
}
