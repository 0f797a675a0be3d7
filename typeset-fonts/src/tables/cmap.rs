//! The [cmap](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap) table

use types::{BigEndian, GlyphId, Tag};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// The [cmap](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap)
/// (character to glyph index mapping) table.
#[derive(Clone, Debug)]
pub struct Cmap<'a> {
    data: FontData<'a>,
    version: u16,
    encoding_records: Vec<EncodingRecord>,
}

/// Identifies a subtable by platform and platform-specific encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodingRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    /// Offset from the start of the cmap table to the subtable.
    pub subtable_offset: u32,
}

/// A decoded cmap subtable.
///
/// Formats 2, 8, 10, 13 and 14 are recognized but not interpreted.
#[derive(Clone, Debug)]
pub enum CmapSubtable<'a> {
    Format0(Cmap0<'a>),
    Format4(Cmap4<'a>),
    Format6(Cmap6<'a>),
    Format12(Cmap12<'a>),
    Other(u16),
}

/// Format 0: byte encoding table.
#[derive(Clone, Debug)]
pub struct Cmap0<'a> {
    glyph_id_array: &'a [u8],
}

/// Format 4: segment mapping to delta values.
#[derive(Clone, Debug)]
pub struct Cmap4<'a> {
    end_code: &'a [BigEndian<u16>],
    start_code: &'a [BigEndian<u16>],
    id_delta: &'a [BigEndian<i16>],
    id_range_offsets: &'a [BigEndian<u16>],
    glyph_id_array: &'a [BigEndian<u16>],
}

/// Format 6: trimmed table mapping.
#[derive(Clone, Debug)]
pub struct Cmap6<'a> {
    first_code: u16,
    glyph_id_array: &'a [BigEndian<u16>],
}

/// Format 12: segmented coverage.
#[derive(Clone, Debug)]
pub struct Cmap12<'a> {
    groups: &'a [BigEndian<u32>],
}

/// A range of characters mapped to consecutive glyphs in a [`Cmap12`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequentialMapGroup {
    pub start_char_code: u32,
    pub end_char_code: u32,
    pub start_glyph_id: u32,
}

impl TopLevelTable for Cmap<'_> {
    const TAG: Tag = Tag::new(b"cmap");
}

impl<'a> FontRead<'a> for Cmap<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version = cursor.read()?;
        let num_tables: u16 = cursor.read()?;
        let encoding_records = cursor
            .read_array::<BigEndian<u16>>(num_tables as usize * 4)?
            .chunks_exact(4)
            .map(|rec| EncodingRecord {
                platform_id: rec[0].get(),
                encoding_id: rec[1].get(),
                subtable_offset: (rec[2].get() as u32) << 16 | rec[3].get() as u32,
            })
            .collect();
        Ok(Cmap {
            data,
            version,
            encoding_records,
        })
    }
}

impl<'a> Cmap<'a> {
    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn encoding_records(&self) -> &[EncodingRecord] {
        &self.encoding_records
    }

    /// Returns the subtable for the given platform and encoding, if the
    /// table has one.
    pub fn subtable(
        &self,
        platform_id: u16,
        encoding_id: u16,
    ) -> Result<Option<CmapSubtable<'a>>, ReadError> {
        self.encoding_records
            .iter()
            .find(|rec| rec.platform_id == platform_id && rec.encoding_id == encoding_id)
            .map(|rec| rec.subtable(self.data))
            .transpose()
    }

    /// Maps a character code through the subtable for the given platform and
    /// encoding.
    ///
    /// Returns `Ok(None)` when there is no such subtable or the subtable
    /// doesn't map the code.
    pub fn map(
        &self,
        char_code: u32,
        platform_id: u16,
        encoding_id: u16,
    ) -> Result<Option<GlyphId>, ReadError> {
        Ok(self
            .subtable(platform_id, encoding_id)?
            .and_then(|subtable| subtable.map(char_code)))
    }

    /// Map a codepoint to a nominal glyph identifier
    ///
    /// This uses the first subtable that provides a mapping; subtables that
    /// fail to parse are skipped.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        self.encoding_records
            .iter()
            .filter_map(|rec| rec.subtable(self.data).ok())
            .find_map(|subtable| subtable.map(codepoint))
    }
}

impl EncodingRecord {
    /// Resolves the subtable against the data of the cmap table.
    pub fn subtable<'a>(&self, cmap_data: FontData<'a>) -> Result<CmapSubtable<'a>, ReadError> {
        let data = cmap_data
            .split_off(self.subtable_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        CmapSubtable::read(data)
    }
}

impl<'a> CmapSubtable<'a> {
    pub fn format(&self) -> u16 {
        match self {
            CmapSubtable::Format0(_) => 0,
            CmapSubtable::Format4(_) => 4,
            CmapSubtable::Format6(_) => 6,
            CmapSubtable::Format12(_) => 12,
            CmapSubtable::Other(format) => *format,
        }
    }

    /// Maps a character code to a glyph; unmapped codes and uninterpreted
    /// formats give `None`.
    pub fn map(&self, char_code: u32) -> Option<GlyphId> {
        match self {
            CmapSubtable::Format0(sub) => sub.map_codepoint(char_code),
            CmapSubtable::Format4(sub) => sub.map_codepoint(char_code),
            CmapSubtable::Format6(sub) => sub.map_codepoint(char_code),
            CmapSubtable::Format12(sub) => sub.map_codepoint(char_code),
            CmapSubtable::Other(_) => None,
        }
    }
}

impl<'a> FontRead<'a> for CmapSubtable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            0 => {
                let glyph_id_array = data.read_array(6..262)?;
                Ok(CmapSubtable::Format0(Cmap0 { glyph_id_array }))
            }
            4 => Cmap4::read(data).map(CmapSubtable::Format4),
            6 => {
                let mut cursor = data.cursor();
                // format, length, language
                cursor.advance_by(6);
                let first_code = cursor.read()?;
                let entry_count: u16 = cursor.read()?;
                let glyph_id_array = cursor.read_array(entry_count as usize)?;
                Ok(CmapSubtable::Format6(Cmap6 {
                    first_code,
                    glyph_id_array,
                }))
            }
            12 => {
                let mut cursor = data.cursor();
                // format, reserved, length, language
                cursor.advance_by(12);
                let num_groups: u32 = cursor.read()?;
                let groups = cursor.read_array(num_groups as usize * 3)?;
                Ok(CmapSubtable::Format12(Cmap12 { groups }))
            }
            2 | 8 | 10 | 13 | 14 => {
                log::debug!("cmap subtable format {format} is not interpreted");
                Ok(CmapSubtable::Other(format))
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl Cmap0<'_> {
    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId> {
        let glyph = *self.glyph_id_array.get(usize::try_from(codepoint).ok()?)?;
        (glyph != 0).then(|| GlyphId::new(glyph.into()))
    }
}

impl<'a> Cmap4<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        // format, length, language
        cursor.advance_by(6);
        let seg_count_x2: u16 = cursor.read()?;
        if seg_count_x2 % 2 != 0 {
            return Err(ReadError::MalformedData("cmap4 segCountX2 is odd"));
        }
        let seg_count = seg_count_x2 as usize / 2;
        // searchRange, entrySelector, rangeShift
        cursor.advance_by(6);
        let end_code = cursor.read_array(seg_count)?;
        cursor.advance::<u16>();
        let start_code = cursor.read_array(seg_count)?;
        let id_delta = cursor.read_array(seg_count)?;
        let id_range_offsets = cursor.read_array(seg_count)?;
        // the glyph id array fills the rest of the subtable; the length field
        // is unreliable in the wild
        let remaining = cursor.remaining_bytes() / 2;
        let glyph_id_array = cursor.read_array(remaining)?;
        Ok(Cmap4 {
            end_code,
            start_code,
            id_delta,
            id_range_offsets,
            glyph_id_array,
        })
    }

    pub fn seg_count(&self) -> usize {
        self.end_code.len()
    }

    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId> {
        let codepoint = u16::try_from(codepoint).ok()?;
        let mut lo = 0;
        let mut hi = self.seg_count();
        while lo < hi {
            let i = (lo + hi) / 2;
            let start_code = self.start_code.get(i)?.get();
            if codepoint < start_code {
                hi = i;
            } else if codepoint > self.end_code.get(i)?.get() {
                lo = i + 1;
            } else {
                return self.lookup_glyph_id(codepoint, i, start_code);
            }
        }
        None
    }

    fn lookup_glyph_id(&self, codepoint: u16, index: usize, start_code: u16) -> Option<GlyphId> {
        let delta = self.id_delta.get(index)?.get();
        let range_offset = self.id_range_offsets.get(index)?.get() as usize;
        if range_offset == 0 {
            return Some(GlyphId::new(codepoint.wrapping_add_signed(delta)));
        }
        // the offset is relative to the idRangeOffset entry itself
        let offset = (range_offset / 2 + (codepoint - start_code) as usize)
            .checked_sub(self.id_range_offsets.len() - index)?;
        let glyph = self.glyph_id_array.get(offset)?.get();
        (glyph != 0).then(|| GlyphId::new(glyph.wrapping_add_signed(delta)))
    }
}

impl Cmap6<'_> {
    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId> {
        let index = codepoint.checked_sub(self.first_code as u32)?;
        let glyph = self.glyph_id_array.get(index as usize)?.get();
        (glyph != 0).then(|| GlyphId::new(glyph))
    }
}

impl Cmap12<'_> {
    pub fn num_groups(&self) -> usize {
        self.groups.len() / 3
    }

    pub fn group(&self, index: usize) -> Option<SequentialMapGroup> {
        let raw = self.groups.get(index * 3..index * 3 + 3)?;
        Some(SequentialMapGroup {
            start_char_code: raw[0].get(),
            end_char_code: raw[1].get(),
            start_glyph_id: raw[2].get(),
        })
    }

    /// Maps a codepoint to a nominal glyph identifier.
    ///
    /// Glyph ids beyond 65535 are treated as unmapped.
    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId> {
        let mut lo = 0;
        let mut hi = self.num_groups();
        while lo < hi {
            let i = (lo + hi) / 2;
            let group = self.group(i)?;
            if codepoint < group.start_char_code {
                hi = i;
            } else if codepoint > group.end_char_code {
                lo = i + 1;
            } else {
                let glyph = group
                    .start_glyph_id
                    .checked_add(codepoint - group.start_char_code)?;
                return u16::try_from(glyph).ok().map(GlyphId::new);
            }
        }
        None
    }
}
