//! [Class Definition](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#class-definition-table) tables

use types::{BigEndian, GlyphId};

use super::read_u16s;
use crate::{FontData, FontRead, ReadError};

/// Assigns glyphs to classes; glyphs that are not listed are in class 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassDef {
    Format1(ClassDefFormat1),
    Format2(ClassDefFormat2),
}

/// Class definition format 1: a class for each glyph in a contiguous run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassDefFormat1 {
    start_glyph_id: GlyphId,
    class_value_array: Vec<u16>,
}

/// Class definition format 2: ranges of glyphs sharing a class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassDefFormat2 {
    class_range_records: Vec<ClassRangeRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassRangeRecord {
    pub start_glyph_id: GlyphId,
    pub end_glyph_id: GlyphId,
    pub class: u16,
}

impl ClassDef {
    pub fn format(&self) -> u16 {
        match self {
            ClassDef::Format1(_) => 1,
            ClassDef::Format2(_) => 2,
        }
    }

    /// Get the class for this glyph id
    pub fn get(&self, gid: GlyphId) -> u16 {
        match self {
            ClassDef::Format1(table) => table.get(gid),
            ClassDef::Format2(table) => table.get(gid),
        }
    }
}

impl ClassDefFormat1 {
    pub fn start_glyph_id(&self) -> GlyphId {
        self.start_glyph_id
    }

    pub fn class_value_array(&self) -> &[u16] {
        &self.class_value_array
    }

    /// Get the class for this glyph id
    pub fn get(&self, gid: GlyphId) -> u16 {
        gid.to_u16()
            .checked_sub(self.start_glyph_id.to_u16())
            .and_then(|idx| self.class_value_array.get(idx as usize))
            .copied()
            .unwrap_or(0)
    }
}

impl ClassDefFormat2 {
    pub fn class_range_records(&self) -> &[ClassRangeRecord] {
        &self.class_range_records
    }

    /// Get the class for this glyph id
    pub fn get(&self, gid: GlyphId) -> u16 {
        self.class_range_records
            .binary_search_by(|rec| {
                if rec.end_glyph_id < gid {
                    std::cmp::Ordering::Less
                } else if rec.start_glyph_id > gid {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .map(|idx| self.class_range_records[idx].class)
            .unwrap_or(0)
    }
}

impl<'a> FontRead<'a> for ClassDef {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        match format {
            1 => {
                let start_glyph_id = cursor.read()?;
                let count: u16 = cursor.read()?;
                let class_value_array = read_u16s(&mut cursor, count as usize)?;
                Ok(ClassDef::Format1(ClassDefFormat1 {
                    start_glyph_id,
                    class_value_array,
                }))
            }
            2 => {
                let count: u16 = cursor.read()?;
                let class_range_records: Vec<_> = cursor
                    .read_array::<BigEndian<u16>>(count as usize * 3)?
                    .chunks_exact(3)
                    .map(|rec| ClassRangeRecord {
                        start_glyph_id: GlyphId::new(rec[0].get()),
                        end_glyph_id: GlyphId::new(rec[1].get()),
                        class: rec[2].get(),
                    })
                    .collect();
                let mut prev_end = None;
                for rec in &class_range_records {
                    if rec.start_glyph_id > rec.end_glyph_id
                        || prev_end.is_some_and(|end| rec.start_glyph_id <= end)
                    {
                        return Err(ReadError::MalformedData(
                            "class ranges are unsorted or overlap",
                        ));
                    }
                    prev_end = Some(rec.end_glyph_id);
                }
                Ok(ClassDef::Format2(ClassDefFormat2 {
                    class_range_records,
                }))
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::bebuffer::BeBuffer;

    #[test]
    fn format1() {
        let buf = BeBuffer::new()
            .push(1u16)
            .push(GlyphId::new(10))
            .push(3u16)
            .extend([1u16, 0, 2]);
        let class_def = ClassDef::read(FontData::new(&buf)).unwrap();
        assert_eq!(class_def.get(GlyphId::new(9)), 0);
        assert_eq!(class_def.get(GlyphId::new(10)), 1);
        assert_eq!(class_def.get(GlyphId::new(11)), 0);
        assert_eq!(class_def.get(GlyphId::new(12)), 2);
        assert_eq!(class_def.get(GlyphId::new(13)), 0);
    }

    #[test]
    fn format2() {
        let buf = BeBuffer::new()
            .push(2u16)
            .push(2u16)
            .extend([20u16, 29, 4])
            .extend([40u16, 40, 1]);
        let class_def = ClassDef::read(FontData::new(&buf)).unwrap();
        assert_eq!(class_def.get(GlyphId::new(19)), 0);
        assert_eq!(class_def.get(GlyphId::new(20)), 4);
        assert_eq!(class_def.get(GlyphId::new(29)), 4);
        assert_eq!(class_def.get(GlyphId::new(30)), 0);
        assert_eq!(class_def.get(GlyphId::new(40)), 1);
    }

    #[test]
    fn format2_unsorted_is_rejected() {
        let buf = BeBuffer::new()
            .push(2u16)
            .push(2u16)
            .extend([40u16, 40, 1])
            .extend([20u16, 29, 4]);
        assert!(ClassDef::read(FontData::new(&buf)).is_err());
    }
}
