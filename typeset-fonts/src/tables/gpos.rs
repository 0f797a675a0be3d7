//! the [GPOS] table
//!
//! [GPOS]: https://docs.microsoft.com/en-us/typography/opentype/spec/gpos

#[path = "./value_record.rs"]
mod value_record;

use types::{GlyphId, Offset16, Tag};

pub use value_record::{ValueFormat, ValueRecord};

use super::layout::{ClassDef, CoverageTable, LayoutTable, Lookup, LookupSubtable};
use crate::{
    font_data::Cursor, FontData, FontRead, FontReadWithArgs, ReadArgs, ReadError, ResolveOffset,
    TopLevelTable,
};

#[cfg(test)]
#[path = "../tests/test_gpos.rs"]
mod tests;

/// The `GPOS` table.
pub type Gpos = LayoutTable<PositioningSubtable>;

/// A `GPOS` lookup.
pub type PositioningLookup = Lookup<PositioningSubtable>;

impl TopLevelTable for Gpos {
    const TAG: Tag = Tag::new(b"GPOS");
}

/// The type of a `GPOS` lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Single,
    Pair,
    Cursive,
    MarkToBase,
    MarkToLigature,
    MarkToMark,
    Contextual,
    ChainContextual,
    Extension,
    Unknown(u16),
}

impl From<u16> for LookupKind {
    fn from(lookup_type: u16) -> Self {
        match lookup_type {
            1 => LookupKind::Single,
            2 => LookupKind::Pair,
            3 => LookupKind::Cursive,
            4 => LookupKind::MarkToBase,
            5 => LookupKind::MarkToLigature,
            6 => LookupKind::MarkToMark,
            7 => LookupKind::Contextual,
            8 => LookupKind::ChainContextual,
            9 => LookupKind::Extension,
            other => LookupKind::Unknown(other),
        }
    }
}

/// A subtable of any `GPOS` lookup type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PositioningSubtable {
    Single(SinglePos),
    Pair(PairPos),
    /// A subtable of a lookup type that is not interpreted.
    Other { lookup_type: u16, format: u16 },
}

impl PositioningSubtable {
    /// The subtable's declared format.
    pub fn format(&self) -> u16 {
        match self {
            PositioningSubtable::Single(SinglePos::Format1(_)) => 1,
            PositioningSubtable::Single(SinglePos::Format2(_)) => 2,
            PositioningSubtable::Pair(PairPos::Format1(_)) => 1,
            PositioningSubtable::Pair(PairPos::Format2(_)) => 2,
            PositioningSubtable::Other { format, .. } => *format,
        }
    }
}

impl LookupSubtable for PositioningSubtable {
    const EXTENSION_TYPE: u16 = 9;
    type Kind = LookupKind;

    fn read_subtable(lookup_type: u16, data: FontData) -> Result<Self, ReadError> {
        match lookup_type {
            1 => SinglePos::read(data).map(Self::Single),
            2 => PairPos::read(data).map(Self::Pair),
            3..=8 => {
                let format = data.read_at(0)?;
                log::warn!("GPOS lookup type {lookup_type} (format {format}) is not interpreted");
                Ok(Self::Other {
                    lookup_type,
                    format,
                })
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl Lookup<PositioningSubtable> {
    /// The adjustment for `gid` from the first covering single positioning
    /// subtable.
    pub fn single_adjustment(&self, gid: GlyphId) -> Option<&ValueRecord> {
        self.subtables().iter().find_map(|sub| match sub {
            PositioningSubtable::Single(single) => single.value_record(gid),
            _ => None,
        })
    }

    /// The adjustment for the pair (`first`, `second`) from the first pair
    /// positioning subtable that defines one.
    pub fn pair_adjustment(&self, first: GlyphId, second: GlyphId) -> Option<&PairValue> {
        self.subtables().iter().find_map(|sub| match sub {
            PositioningSubtable::Pair(pair) => pair.adjustment(first, second),
            _ => None,
        })
    }
}

/// A [Single Adjustment](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#lookup-type-1-single-adjustment-positioning-subtable) subtable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinglePos {
    Format1(SinglePosFormat1),
    Format2(SinglePosFormat2),
}

/// Single positioning format 1: one value shared by every covered glyph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinglePosFormat1 {
    coverage: CoverageTable,
    value_record: ValueRecord,
}

/// Single positioning format 2: a value per covered glyph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinglePosFormat2 {
    coverage: CoverageTable,
    value_records: Vec<ValueRecord>,
}

impl SinglePos {
    pub fn coverage(&self) -> &CoverageTable {
        match self {
            SinglePos::Format1(sub) => &sub.coverage,
            SinglePos::Format2(sub) => &sub.coverage,
        }
    }

    /// The adjustment for `gid`, or `None` if it is not covered.
    pub fn value_record(&self, gid: GlyphId) -> Option<&ValueRecord> {
        match self {
            SinglePos::Format1(sub) => sub
                .coverage
                .index_of(gid)
                .map(|_| &sub.value_record),
            SinglePos::Format2(sub) => {
                let idx = sub.coverage.index_of(gid)?;
                sub.value_records.get(idx as usize)
            }
        }
    }
}

impl<'a> FontRead<'a> for SinglePos {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        let coverage_offset: Offset16 = cursor.read()?;
        let value_format: ValueFormat = cursor.read()?;
        let coverage = coverage_offset.resolve(data)?;
        match format {
            1 => Ok(SinglePos::Format1(SinglePosFormat1 {
                coverage,
                value_record: read_value_record(&mut cursor, value_format)?,
            })),
            2 => {
                let count: u16 = cursor.read()?;
                let value_records = (0..count)
                    .map(|_| read_value_record(&mut cursor, value_format))
                    .collect::<Result<_, _>>()?;
                Ok(SinglePos::Format2(SinglePosFormat2 {
                    coverage,
                    value_records,
                }))
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

fn read_value_record(cursor: &mut Cursor, format: ValueFormat) -> Result<ValueRecord, ReadError> {
    let data = cursor.remaining().ok_or(ReadError::OutOfBounds)?;
    let record = ValueRecord::read(data, format)?;
    cursor.advance_by(format.record_byte_len());
    Ok(record)
}

/// The two value records applied to a pair of glyphs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairValue {
    value_record1: ValueRecord,
    value_record2: ValueRecord,
}

impl PairValue {
    /// The adjustment for the first glyph, if the subtable's format has any
    /// fields for it.
    pub fn value_record1(&self) -> Option<&ValueRecord> {
        (!self.value_record1.is_empty()).then_some(&self.value_record1)
    }

    /// The adjustment for the second glyph, if the subtable's format has any
    /// fields for it.
    pub fn value_record2(&self) -> Option<&ValueRecord> {
        (!self.value_record2.is_empty()).then_some(&self.value_record2)
    }

    fn read(cursor: &mut Cursor, formats: (ValueFormat, ValueFormat)) -> Result<Self, ReadError> {
        Ok(PairValue {
            value_record1: read_value_record(cursor, formats.0)?,
            value_record2: read_value_record(cursor, formats.1)?,
        })
    }
}

/// A [Pair Adjustment](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#lookup-type-2-pair-adjustment-positioning-subtable) subtable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PairPos {
    Format1(PairPosFormat1),
    Format2(PairPosFormat2),
}

/// Pair positioning format 1: adjustments for explicit glyph pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairPosFormat1 {
    coverage: CoverageTable,
    value_format1: ValueFormat,
    value_format2: ValueFormat,
    pair_sets: Vec<PairSet>,
}

/// Pair positioning format 2: adjustments for pairs of glyph classes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairPosFormat2 {
    coverage: CoverageTable,
    value_format1: ValueFormat,
    value_format2: ValueFormat,
    class_def1: ClassDef,
    class_def2: ClassDef,
    class1_count: u16,
    class2_count: u16,
    // class1_count rows of class2_count values
    class_records: Vec<PairValue>,
}

/// The pairs that begin with one covered glyph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PairSet {
    pair_value_records: Vec<PairValueRecord>,
}

/// A second glyph and the values applied to the pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairValueRecord {
    pub second_glyph: GlyphId,
    pub value: PairValue,
}

impl PairPos {
    pub fn coverage(&self) -> &CoverageTable {
        match self {
            PairPos::Format1(sub) => &sub.coverage,
            PairPos::Format2(sub) => &sub.coverage,
        }
    }

    /// The (first, second) value formats.
    pub fn value_formats(&self) -> (ValueFormat, ValueFormat) {
        match self {
            PairPos::Format1(sub) => (sub.value_format1, sub.value_format2),
            PairPos::Format2(sub) => (sub.value_format1, sub.value_format2),
        }
    }

    /// The adjustment for the pair (`first`, `second`).
    pub fn adjustment(&self, first: GlyphId, second: GlyphId) -> Option<&PairValue> {
        match self {
            PairPos::Format1(sub) => sub.adjustment(first, second),
            PairPos::Format2(sub) => sub.adjustment(first, second),
        }
    }
}

impl PairPosFormat1 {
    pub fn pair_sets(&self) -> &[PairSet] {
        &self.pair_sets
    }

    pub fn adjustment(&self, first: GlyphId, second: GlyphId) -> Option<&PairValue> {
        let idx = self.coverage.index_of(first)?;
        self.pair_sets.get(idx as usize)?.get(second)
    }
}

impl PairSet {
    /// Records in table order, which is sorted by second glyph.
    pub fn pair_value_records(&self) -> &[PairValueRecord] {
        &self.pair_value_records
    }

    pub fn get(&self, second: GlyphId) -> Option<&PairValue> {
        self.pair_value_records
            .binary_search_by_key(&second, |rec| rec.second_glyph)
            .ok()
            .map(|idx| &self.pair_value_records[idx].value)
    }
}

impl PairPosFormat2 {
    pub fn class_def1(&self) -> &ClassDef {
        &self.class_def1
    }

    pub fn class_def2(&self) -> &ClassDef {
        &self.class_def2
    }

    pub fn class1_count(&self) -> u16 {
        self.class1_count
    }

    pub fn class2_count(&self) -> u16 {
        self.class2_count
    }

    /// The values for a pair of classes.
    pub fn class_pair(&self, class1: u16, class2: u16) -> Option<&PairValue> {
        if class1 >= self.class1_count || class2 >= self.class2_count {
            return None;
        }
        let idx = class1 as usize * self.class2_count as usize + class2 as usize;
        self.class_records.get(idx)
    }

    /// The first glyph must be covered; either glyph may be in class 0.
    pub fn adjustment(&self, first: GlyphId, second: GlyphId) -> Option<&PairValue> {
        self.coverage.index_of(first)?;
        self.class_pair(self.class_def1.get(first), self.class_def2.get(second))
    }
}

impl<'a> FontRead<'a> for PairPos {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        let coverage_offset: Offset16 = cursor.read()?;
        let value_format1: ValueFormat = cursor.read()?;
        let value_format2: ValueFormat = cursor.read()?;
        let coverage = coverage_offset.resolve(data)?;
        let formats = (value_format1, value_format2);
        match format {
            1 => {
                let count: u16 = cursor.read()?;
                let pair_sets: Vec<PairSet> = (0..count)
                    .map(|_| {
                        let offset: Offset16 = cursor.read()?;
                        offset.resolve_with_args(data, &formats)
                    })
                    .collect::<Result<_, ReadError>>()?;
                Ok(PairPos::Format1(PairPosFormat1 {
                    coverage,
                    value_format1,
                    value_format2,
                    pair_sets,
                }))
            }
            2 => {
                let class_def1_offset: Offset16 = cursor.read()?;
                let class_def2_offset: Offset16 = cursor.read()?;
                let class1_count: u16 = cursor.read()?;
                let class2_count: u16 = cursor.read()?;
                let class_records = (0..class1_count as usize * class2_count as usize)
                    .map(|_| PairValue::read(&mut cursor, formats))
                    .collect::<Result<_, _>>()?;
                Ok(PairPos::Format2(PairPosFormat2 {
                    coverage,
                    value_format1,
                    value_format2,
                    class_def1: class_def1_offset.resolve(data)?,
                    class_def2: class_def2_offset.resolve(data)?,
                    class1_count,
                    class2_count,
                    class_records,
                }))
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl ReadArgs for PairSet {
    type Args = (ValueFormat, ValueFormat);
}

impl<'a> FontReadWithArgs<'a> for PairSet {
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let count: u16 = cursor.read()?;
        let pair_value_records: Vec<_> = (0..count)
            .map(|_| {
                let second_glyph = cursor.read()?;
                let value = PairValue::read(&mut cursor, *args)?;
                Ok::<_, ReadError>(PairValueRecord {
                    second_glyph,
                    value,
                })
            })
            .collect::<Result<_, _>>()?;
        if pair_value_records
            .windows(2)
            .any(|pair| pair[0].second_glyph >= pair[1].second_glyph)
        {
            return Err(ReadError::MalformedData(
                "pair set is not sorted by second glyph",
            ));
        }
        Ok(PairSet { pair_value_records })
    }
}
