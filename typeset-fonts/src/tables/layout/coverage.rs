//! [Coverage](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-table) tables

use types::{BigEndian, GlyphId};

use super::read_glyph_ids;
use crate::{FontData, FontRead, ReadError};

/// A set of glyphs, each mapped to a dense index.
///
/// Coverage indices select the row of a subtable's per-glyph data. Both
/// formats are validated when read, so indices always form the contiguous
/// range `0..len()` and glyphs are strictly increasing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoverageTable {
    Format1(CoverageFormat1),
    Format2(CoverageFormat2),
}

/// Coverage format 1: an explicit list of glyphs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoverageFormat1 {
    glyph_array: Vec<GlyphId>,
}

/// Coverage format 2: ranges of consecutive glyphs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoverageFormat2 {
    range_records: Vec<RangeRecord>,
}

/// A range of glyphs in a [`CoverageFormat2`] table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeRecord {
    /// First glyph ID in the range
    pub start_glyph_id: GlyphId,
    /// Last glyph ID in the range
    pub end_glyph_id: GlyphId,
    /// Coverage index of the first glyph in the range
    pub start_coverage_index: u16,
}

impl RangeRecord {
    /// The number of glyphs in this range.
    pub fn len(&self) -> usize {
        (self.end_glyph_id.to_u16() - self.start_glyph_id.to_u16()) as usize + 1
    }

    fn iter(&self) -> impl Iterator<Item = GlyphId> {
        (self.start_glyph_id.to_u16()..=self.end_glyph_id.to_u16()).map(GlyphId::new)
    }
}

impl CoverageTable {
    pub fn format(&self) -> u16 {
        match self {
            CoverageTable::Format1(_) => 1,
            CoverageTable::Format2(_) => 2,
        }
    }

    /// If this glyph is in the coverage table, returns its index
    pub fn index_of(&self, gid: GlyphId) -> Option<u16> {
        match self {
            CoverageTable::Format1(sub) => sub.index_of(gid),
            CoverageTable::Format2(sub) => sub.index_of(gid),
        }
    }

    /// Iterate over the glyphs in this table, in increasing order.
    pub fn glyphs(&self) -> impl Iterator<Item = GlyphId> + '_ {
        let (iter1, iter2) = match self {
            CoverageTable::Format1(sub) => (Some(sub.glyph_array.iter().copied()), None),
            CoverageTable::Format2(sub) => (None, Some(sub.iter())),
        };
        iter1
            .into_iter()
            .flatten()
            .chain(iter2.into_iter().flatten())
    }

    /// The number of glyphs covered.
    pub fn len(&self) -> usize {
        match self {
            CoverageTable::Format1(sub) => sub.glyph_array.len(),
            CoverageTable::Format2(sub) => sub.range_records.iter().map(RangeRecord::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CoverageFormat1 {
    pub fn glyph_array(&self) -> &[GlyphId] {
        &self.glyph_array
    }

    /// If this glyph is in the coverage table, returns its index
    pub fn index_of(&self, gid: GlyphId) -> Option<u16> {
        self.glyph_array
            .binary_search(&gid)
            .ok()
            .map(|idx| idx as u16)
    }
}

impl CoverageFormat2 {
    pub fn range_records(&self) -> &[RangeRecord] {
        &self.range_records
    }

    /// If this glyph is in the coverage table, returns its index
    pub fn index_of(&self, gid: GlyphId) -> Option<u16> {
        self.range_records
            .binary_search_by(|rec| {
                if rec.end_glyph_id < gid {
                    std::cmp::Ordering::Less
                } else if rec.start_glyph_id > gid {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .ok()
            .map(|idx| {
                let rec = &self.range_records[idx];
                rec.start_coverage_index + gid.to_u16() - rec.start_glyph_id.to_u16()
            })
    }

    fn iter(&self) -> impl Iterator<Item = GlyphId> + '_ {
        self.range_records.iter().flat_map(RangeRecord::iter)
    }
}

impl<'a> FontRead<'a> for CoverageTable {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        let count: u16 = cursor.read()?;
        match format {
            1 => {
                let glyph_array = read_glyph_ids(&mut cursor, count as usize)?;
                if glyph_array.windows(2).any(|pair| pair[0] >= pair[1]) {
                    return Err(ReadError::MalformedData(
                        "coverage glyphs are not strictly increasing",
                    ));
                }
                Ok(CoverageTable::Format1(CoverageFormat1 { glyph_array }))
            }
            2 => {
                let raw = cursor.read_array::<BigEndian<u16>>(count as usize * 3)?;
                let range_records: Vec<_> = raw
                    .chunks_exact(3)
                    .map(|rec| RangeRecord {
                        start_glyph_id: GlyphId::new(rec[0].get()),
                        end_glyph_id: GlyphId::new(rec[1].get()),
                        start_coverage_index: rec[2].get(),
                    })
                    .collect();
                validate_ranges(&range_records)?;
                Ok(CoverageTable::Format2(CoverageFormat2 { range_records }))
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

fn validate_ranges(ranges: &[RangeRecord]) -> Result<(), ReadError> {
    let mut next_index = 0usize;
    let mut prev_end: Option<GlyphId> = None;
    for range in ranges {
        if range.start_glyph_id > range.end_glyph_id {
            return Err(ReadError::MalformedData("coverage range has start > end"));
        }
        if prev_end.is_some_and(|end| range.start_glyph_id <= end) {
            return Err(ReadError::MalformedData(
                "coverage ranges overlap or are out of order",
            ));
        }
        if range.start_coverage_index as usize != next_index {
            return Err(ReadError::MalformedData(
                "coverage range indices are not contiguous",
            ));
        }
        next_index += range.len();
        prev_end = Some(range.end_glyph_id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::bebuffer::BeBuffer;

    fn format2(ranges: &[(u16, u16, u16)]) -> BeBuffer {
        let mut buf = BeBuffer::new().push(2u16).push(ranges.len() as u16);
        for (start, end, index) in ranges {
            buf = buf.push(*start).push(*end).push(*index);
        }
        buf
    }

    #[test]
    fn format1_indices_are_positions() {
        let buf = BeBuffer::new().push(1u16).push(3u16).extend([5u16, 9, 200]);
        let coverage = CoverageTable::read(FontData::new(&buf)).unwrap();
        let glyphs: Vec<_> = coverage.glyphs().map(GlyphId::to_u16).collect();
        assert_eq!(glyphs, [5, 9, 200]);
        for (i, gid) in coverage.glyphs().enumerate() {
            assert_eq!(coverage.index_of(gid), Some(i as u16));
        }
        assert_eq!(coverage.index_of(GlyphId::new(6)), None);
        assert_eq!(coverage.len(), 3);
    }

    #[test]
    fn format2_expands_ranges() {
        let buf = format2(&[(10, 12, 0), (20, 21, 3)]);
        let coverage = CoverageTable::read(FontData::new(&buf)).unwrap();
        let glyphs: Vec<_> = coverage.glyphs().map(GlyphId::to_u16).collect();
        assert_eq!(glyphs, [10, 11, 12, 20, 21]);
        assert_eq!(coverage.index_of(GlyphId::new(11)), Some(1));
        assert_eq!(coverage.index_of(GlyphId::new(21)), Some(4));
        assert_eq!(coverage.index_of(GlyphId::new(13)), None);
        assert_eq!(coverage.index_of(GlyphId::new(9)), None);
        assert_eq!(coverage.len(), 5);
    }

    #[test]
    fn unsorted_format1_is_rejected() {
        let buf = BeBuffer::new().push(1u16).push(2u16).extend([9u16, 5]);
        assert!(matches!(
            CoverageTable::read(FontData::new(&buf)),
            Err(ReadError::MalformedData(_))
        ));
        let dupes = BeBuffer::new().push(1u16).push(2u16).extend([5u16, 5]);
        assert!(CoverageTable::read(FontData::new(&dupes)).is_err());
    }

    #[test]
    fn bad_format2_is_rejected() {
        for ranges in [
            // overlapping
            &[(10, 12, 0), (12, 14, 3)][..],
            // out of order
            &[(20, 21, 0), (10, 12, 2)],
            // gap in indices
            &[(10, 12, 0), (20, 21, 4)],
            // start > end
            &[(12, 10, 0)],
        ] {
            let buf = format2(ranges);
            assert!(
                matches!(
                    CoverageTable::read(FontData::new(&buf)),
                    Err(ReadError::MalformedData(_))
                ),
                "{ranges:?}"
            );
        }
    }

    #[test]
    fn unknown_format() {
        let buf = BeBuffer::new().push(3u16).push(0u16);
        assert_eq!(
            CoverageTable::read(FontData::new(&buf)),
            Err(ReadError::InvalidFormat(3))
        );
    }
}
