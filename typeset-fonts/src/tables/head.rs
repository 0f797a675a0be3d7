//! The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head) table

use types::{BoundingBox, Fixed, Tag};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// The magic number stored in every `head` table.
pub const MAGIC_NUMBER: u32 = 0x5F0F3CF5;

/// The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head)
/// (font header) table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Head {
    pub major_version: u16,
    pub minor_version: u16,
    pub font_revision: Fixed,
    pub flags: u16,
    /// Valid range is from 16 to 16384.
    pub units_per_em: u16,
    /// The union of all glyph bounding boxes.
    pub bounds: BoundingBox<i16>,
    pub mac_style: u16,
    pub lowest_rec_ppem: u16,
    /// 0 for short (`Offset16`) `loca` offsets, 1 for long (`Offset32`).
    pub index_to_loc_format: i16,
}

impl TopLevelTable for Head {
    const TAG: Tag = Tag::new(b"head");
}

impl<'a> FontRead<'a> for Head {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let major_version = cursor.read()?;
        let minor_version = cursor.read()?;
        let font_revision = cursor.read()?;
        // checksumAdjustment
        cursor.advance::<u32>();
        let magic: u32 = cursor.read()?;
        if magic != MAGIC_NUMBER {
            return Err(ReadError::MalformedData("head magic number mismatch"));
        }
        let flags = cursor.read()?;
        let units_per_em = cursor.read()?;
        // created and modified timestamps
        cursor.advance_by(16);
        let bounds = BoundingBox {
            x_min: cursor.read()?,
            y_min: cursor.read()?,
            x_max: cursor.read()?,
            y_max: cursor.read()?,
        };
        let mac_style = cursor.read()?;
        let lowest_rec_ppem = cursor.read()?;
        // fontDirectionHint
        cursor.advance::<i16>();
        let index_to_loc_format = cursor.read()?;
        if !matches!(index_to_loc_format, 0 | 1) {
            return Err(ReadError::InvalidFormat(index_to_loc_format.into()));
        }
        Ok(Head {
            major_version,
            minor_version,
            font_revision,
            flags,
            units_per_em,
            bounds,
            mac_style,
            lowest_rec_ppem,
            index_to_loc_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::bebuffer::BeBuffer;

    fn head_data(magic: u32, loc_format: i16) -> BeBuffer {
        BeBuffer::new()
            .extend([1u16, 0u16])
            .push(Fixed::from_f64(2.5))
            .extend([42u32, magic])
            .extend([16u16, 2048]) // flags, upm
            .extend([0u32; 4]) // created, modified
            .extend([-100i16, -50, 400, 711])
            .extend([0u16, 12]) // mac_style, ppem
            .extend([2i16, loc_format, 0])
    }

    #[test]
    fn smoke_test() {
        let buf = head_data(MAGIC_NUMBER, 1);
        let head = Head::read(FontData::new(&buf)).unwrap();
        assert_eq!((head.major_version, head.minor_version), (1, 0));
        assert_eq!(head.font_revision, Fixed::from_f64(2.5));
        assert_eq!(head.units_per_em, 2048);
        assert_eq!(head.bounds.y_min, -50);
        assert_eq!(head.bounds.y_max, 711);
        assert_eq!(head.lowest_rec_ppem, 12);
        assert_eq!(head.index_to_loc_format, 1);
    }

    #[test]
    fn bad_magic() {
        let buf = head_data(0xDEADBEEF, 0);
        assert!(matches!(
            Head::read(FontData::new(&buf)),
            Err(ReadError::MalformedData(_))
        ));
    }

    #[test]
    fn bad_loca_format() {
        let buf = head_data(MAGIC_NUMBER, 2);
        assert_eq!(
            Head::read(FontData::new(&buf)),
            Err(ReadError::InvalidFormat(2))
        );
    }
}
