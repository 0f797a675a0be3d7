//! the [GSUB] table
//!
//! [GSUB]: https://docs.microsoft.com/en-us/typography/opentype/spec/gsub

use types::{GlyphId, Offset16, Tag};

use super::layout::{
    read_glyph_ids, read_offset_array, CoverageTable, LayoutTable, Lookup, LookupSubtable,
};
use crate::{FontData, FontRead, ReadError, ResolveOffset, TopLevelTable};

#[cfg(test)]
#[path = "../tests/test_gsub.rs"]
mod tests;

/// The `GSUB` table.
pub type Gsub = LayoutTable<SubstitutionSubtable>;

/// A `GSUB` lookup.
pub type SubstitutionLookup = Lookup<SubstitutionSubtable>;

impl TopLevelTable for Gsub {
    const TAG: Tag = Tag::new(b"GSUB");
}

/// The type of a `GSUB` lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Single,
    Multiple,
    Alternate,
    Ligature,
    Contextual,
    ChainContextual,
    Extension,
    ReverseChainSingle,
    Unknown(u16),
}

impl From<u16> for LookupKind {
    fn from(lookup_type: u16) -> Self {
        match lookup_type {
            1 => LookupKind::Single,
            2 => LookupKind::Multiple,
            3 => LookupKind::Alternate,
            4 => LookupKind::Ligature,
            5 => LookupKind::Contextual,
            6 => LookupKind::ChainContextual,
            7 => LookupKind::Extension,
            8 => LookupKind::ReverseChainSingle,
            other => LookupKind::Unknown(other),
        }
    }
}

/// A subtable of any `GSUB` lookup type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubstitutionSubtable {
    Single(SingleSubst),
    Multiple(MultipleSubstFormat1),
    Alternate(AlternateSubstFormat1),
    Ligature(LigatureSubstFormat1),
    /// A subtable of a lookup type that is not interpreted.
    Other { lookup_type: u16, format: u16 },
}

impl SubstitutionSubtable {
    /// The subtable's declared format.
    pub fn format(&self) -> u16 {
        match self {
            SubstitutionSubtable::Single(SingleSubst::Format1(_)) => 1,
            SubstitutionSubtable::Single(SingleSubst::Format2(_)) => 2,
            SubstitutionSubtable::Multiple(_)
            | SubstitutionSubtable::Alternate(_)
            | SubstitutionSubtable::Ligature(_) => 1,
            SubstitutionSubtable::Other { format, .. } => *format,
        }
    }

    pub fn coverage(&self) -> Option<&CoverageTable> {
        match self {
            SubstitutionSubtable::Single(SingleSubst::Format1(sub)) => Some(&sub.coverage),
            SubstitutionSubtable::Single(SingleSubst::Format2(sub)) => Some(&sub.coverage),
            SubstitutionSubtable::Multiple(sub) => Some(&sub.coverage),
            SubstitutionSubtable::Alternate(sub) => Some(&sub.coverage),
            SubstitutionSubtable::Ligature(sub) => Some(&sub.coverage),
            SubstitutionSubtable::Other { .. } => None,
        }
    }
}

impl LookupSubtable for SubstitutionSubtable {
    const EXTENSION_TYPE: u16 = 7;
    type Kind = LookupKind;

    fn read_subtable(lookup_type: u16, data: FontData) -> Result<Self, ReadError> {
        match lookup_type {
            1 => SingleSubst::read(data).map(Self::Single),
            2 => MultipleSubstFormat1::read(data).map(Self::Multiple),
            3 => AlternateSubstFormat1::read(data).map(Self::Alternate),
            4 => LigatureSubstFormat1::read(data).map(Self::Ligature),
            5 | 6 | 8 => {
                let format = data.read_at(0)?;
                log::warn!("GSUB lookup type {lookup_type} (format {format}) is not interpreted");
                Ok(Self::Other {
                    lookup_type,
                    format,
                })
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl Lookup<SubstitutionSubtable> {
    /// Apply the first single substitution subtable that covers `gid`.
    pub fn substitute_single(&self, gid: GlyphId) -> Option<GlyphId> {
        self.subtables().iter().find_map(|sub| match sub {
            SubstitutionSubtable::Single(single) => single.substitute(gid),
            _ => None,
        })
    }

    /// The replacement sequence for `gid` from the first covering multiple
    /// substitution subtable.
    pub fn sequence(&self, gid: GlyphId) -> Option<&[GlyphId]> {
        self.subtables().iter().find_map(|sub| match sub {
            SubstitutionSubtable::Multiple(multiple) => multiple.sequence(gid),
            _ => None,
        })
    }

    /// The alternates for `gid` from the first covering alternate subtable.
    pub fn alternates(&self, gid: GlyphId) -> Option<&[GlyphId]> {
        self.subtables().iter().find_map(|sub| match sub {
            SubstitutionSubtable::Alternate(alternate) => alternate.alternates(gid),
            _ => None,
        })
    }

    /// Match a ligature at the start of `glyphs` using the first subtable that
    /// produces one.
    pub fn ligature(&self, glyphs: &[GlyphId]) -> Option<LigatureMatch> {
        self.subtables().iter().find_map(|sub| match sub {
            SubstitutionSubtable::Ligature(ligature) => ligature.apply(glyphs),
            _ => None,
        })
    }
}

/// A [Single Substitution](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#lookuptype-1-single-substitution-subtable) subtable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SingleSubst {
    Format1(SingleSubstFormat1),
    Format2(SingleSubstFormat2),
}

/// Single substitution format 1: a delta added to the glyph id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleSubstFormat1 {
    coverage: CoverageTable,
    delta_glyph_id: i16,
}

/// Single substitution format 2: an explicit substitute per covered glyph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleSubstFormat2 {
    coverage: CoverageTable,
    substitute_glyph_ids: Vec<GlyphId>,
}

impl SingleSubst {
    pub fn coverage(&self) -> &CoverageTable {
        match self {
            SingleSubst::Format1(sub) => &sub.coverage,
            SingleSubst::Format2(sub) => &sub.coverage,
        }
    }

    /// The substitute for `gid`, or `None` if it is not covered.
    pub fn substitute(&self, gid: GlyphId) -> Option<GlyphId> {
        match self {
            SingleSubst::Format1(sub) => sub.substitute(gid),
            SingleSubst::Format2(sub) => sub.substitute(gid),
        }
    }
}

impl SingleSubstFormat1 {
    pub fn delta_glyph_id(&self) -> i16 {
        self.delta_glyph_id
    }

    /// The delta is applied modulo 65536.
    pub fn substitute(&self, gid: GlyphId) -> Option<GlyphId> {
        self.coverage.index_of(gid)?;
        Some(GlyphId::new(
            gid.to_u16().wrapping_add_signed(self.delta_glyph_id),
        ))
    }
}

impl SingleSubstFormat2 {
    pub fn substitute_glyph_ids(&self) -> &[GlyphId] {
        &self.substitute_glyph_ids
    }

    pub fn substitute(&self, gid: GlyphId) -> Option<GlyphId> {
        let idx = self.coverage.index_of(gid)?;
        self.substitute_glyph_ids.get(idx as usize).copied()
    }
}

impl<'a> FontRead<'a> for SingleSubst {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        let coverage_offset: Offset16 = cursor.read()?;
        let coverage = coverage_offset.resolve(data)?;
        match format {
            1 => Ok(SingleSubst::Format1(SingleSubstFormat1 {
                coverage,
                delta_glyph_id: cursor.read()?,
            })),
            2 => {
                let count: u16 = cursor.read()?;
                Ok(SingleSubst::Format2(SingleSubstFormat2 {
                    coverage,
                    substitute_glyph_ids: read_glyph_ids(&mut cursor, count as usize)?,
                }))
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

/// Reads the common `format, coverageOffset` header of format-1-only
/// subtables.
fn read_format1_header<'a>(
    data: FontData<'a>,
    cursor: &mut crate::font_data::Cursor<'a>,
) -> Result<CoverageTable, ReadError> {
    let format: u16 = cursor.read()?;
    if format != 1 {
        return Err(ReadError::InvalidFormat(format.into()));
    }
    let coverage_offset: Offset16 = cursor.read()?;
    coverage_offset.resolve(data)
}

/// A [Multiple Substitution](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#lookuptype-2-multiple-substitution-subtable) subtable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultipleSubstFormat1 {
    coverage: CoverageTable,
    sequences: Vec<Sequence>,
}

/// Output glyphs for one covered glyph of a multiple substitution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sequence {
    substitute_glyph_ids: Vec<GlyphId>,
}

impl MultipleSubstFormat1 {
    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn sequence(&self, gid: GlyphId) -> Option<&[GlyphId]> {
        let idx = self.coverage.index_of(gid)?;
        self.sequences
            .get(idx as usize)
            .map(|seq| seq.substitute_glyph_ids.as_slice())
    }
}

impl Sequence {
    pub fn substitute_glyph_ids(&self) -> &[GlyphId] {
        &self.substitute_glyph_ids
    }
}

impl<'a> FontRead<'a> for MultipleSubstFormat1 {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let coverage = read_format1_header(data, &mut cursor)?;
        let sequences = read_offset_array(data, &mut cursor)?;
        Ok(MultipleSubstFormat1 {
            coverage,
            sequences,
        })
    }
}

impl<'a> FontRead<'a> for Sequence {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let count: u16 = cursor.read()?;
        Ok(Sequence {
            substitute_glyph_ids: read_glyph_ids(&mut cursor, count as usize)?,
        })
    }
}

/// An [Alternate Substitution](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#lookuptype-3-alternate-substitution-subtable) subtable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlternateSubstFormat1 {
    coverage: CoverageTable,
    alternate_sets: Vec<AlternateSet>,
}

/// The alternates available for one covered glyph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlternateSet {
    alternate_glyph_ids: Vec<GlyphId>,
}

impl AlternateSubstFormat1 {
    pub fn alternate_sets(&self) -> &[AlternateSet] {
        &self.alternate_sets
    }

    /// All alternates for `gid`, in table order.
    ///
    /// Choosing among them is left to the caller.
    pub fn alternates(&self, gid: GlyphId) -> Option<&[GlyphId]> {
        let idx = self.coverage.index_of(gid)?;
        self.alternate_sets
            .get(idx as usize)
            .map(|set| set.alternate_glyph_ids.as_slice())
    }
}

impl AlternateSet {
    pub fn alternate_glyph_ids(&self) -> &[GlyphId] {
        &self.alternate_glyph_ids
    }
}

impl<'a> FontRead<'a> for AlternateSubstFormat1 {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let coverage = read_format1_header(data, &mut cursor)?;
        let alternate_sets = read_offset_array(data, &mut cursor)?;
        Ok(AlternateSubstFormat1 {
            coverage,
            alternate_sets,
        })
    }
}

impl<'a> FontRead<'a> for AlternateSet {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let count: u16 = cursor.read()?;
        Ok(AlternateSet {
            alternate_glyph_ids: read_glyph_ids(&mut cursor, count as usize)?,
        })
    }
}

/// A [Ligature Substitution](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#lookuptype-4-ligature-substitution-subtable) subtable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LigatureSubstFormat1 {
    coverage: CoverageTable,
    ligature_sets: Vec<LigatureSet>,
}

/// The ligatures that begin with one covered glyph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LigatureSet {
    ligatures: Vec<Ligature>,
}

/// One row of a [`LigatureSet`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ligature {
    ligature_glyph: GlyphId,
    component_glyph_ids: Vec<GlyphId>,
}

/// The result of matching a ligature against a glyph sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LigatureMatch {
    /// The glyph that replaces the matched input.
    pub glyph: GlyphId,
    /// The number of input glyphs consumed, including the first glyph.
    pub consumed: usize,
}

impl LigatureSubstFormat1 {
    pub fn coverage(&self) -> &CoverageTable {
        &self.coverage
    }

    pub fn ligature_sets(&self) -> &[LigatureSet] {
        &self.ligature_sets
    }

    /// The ligatures beginning with `first`, if it is covered.
    pub fn ligature_set(&self, first: GlyphId) -> Option<&LigatureSet> {
        let idx = self.coverage.index_of(first)?;
        self.ligature_sets.get(idx as usize)
    }

    /// Match a ligature at the start of `glyphs`.
    pub fn apply(&self, glyphs: &[GlyphId]) -> Option<LigatureMatch> {
        let (first, rest) = glyphs.split_first()?;
        let ligature = self.ligature_set(*first)?.find(rest)?;
        Some(LigatureMatch {
            glyph: ligature.ligature_glyph,
            consumed: 1 + ligature.component_glyph_ids.len(),
        })
    }
}

impl LigatureSet {
    pub fn ligatures(&self) -> &[Ligature] {
        &self.ligatures
    }

    /// Find the first ligature, in table order, whose components match the
    /// start of `following`: the glyphs after the one that selected this set.
    ///
    /// Rows are not reordered by length; a font that lists a shorter row
    /// first will never match its longer rows. A row with a component count
    /// of one stores no components and matches any `following`, including an
    /// empty one. Otherwise an empty `following` matches nothing.
    pub fn find(&self, following: &[GlyphId]) -> Option<&Ligature> {
        self.ligatures
            .iter()
            .find(|lig| following.starts_with(&lig.component_glyph_ids))
    }
}

impl Ligature {
    pub fn ligature_glyph(&self) -> GlyphId {
        self.ligature_glyph
    }

    /// Components after the first glyph.
    pub fn component_glyph_ids(&self) -> &[GlyphId] {
        &self.component_glyph_ids
    }
}

impl<'a> FontRead<'a> for LigatureSubstFormat1 {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let coverage = read_format1_header(data, &mut cursor)?;
        let ligature_sets = read_offset_array(data, &mut cursor)?;
        Ok(LigatureSubstFormat1 {
            coverage,
            ligature_sets,
        })
    }
}

impl<'a> FontRead<'a> for LigatureSet {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        Ok(LigatureSet {
            ligatures: read_offset_array(data, &mut cursor)?,
        })
    }
}

impl<'a> FontRead<'a> for Ligature {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let ligature_glyph = cursor.read()?;
        let component_count: u16 = cursor.read()?;
        // the count includes the first glyph, which is not stored
        let stored = component_count
            .checked_sub(1)
            .ok_or(ReadError::MalformedData("ligature with no components"))?;
        Ok(Ligature {
            ligature_glyph,
            component_glyph_ids: read_glyph_ids(&mut cursor, stored as usize)?,
        })
    }
}
