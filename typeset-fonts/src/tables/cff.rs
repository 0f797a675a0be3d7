//! The [CFF](https://learn.microsoft.com/en-us/typography/opentype/spec/cff) table

use std::ops::Range;

use types::{Fixed, GlyphId, Tag};

use super::postscript::{
    charstring::{self, CharString},
    dict::{self, Entry},
    Error, FdSelect, Index, Latin1String, StringId,
};
use crate::{FontData, FontRead, FontReadWithArgs, ReadError, TopLevelTable};

/// The [Compact Font Format](https://learn.microsoft.com/en-us/typography/opentype/spec/cff) table.
///
/// The font set is decoded eagerly: every Top DICT, Private DICT and
/// FDSelect is parsed when the table is read. Charstrings themselves are
/// decoded on demand.
#[derive(Clone, Debug)]
pub struct Cff<'a> {
    major: u8,
    minor: u8,
    names: Index<'a>,
    strings: Index<'a>,
    global_subrs: Index<'a>,
    fonts: Vec<CffFont<'a>>,
}

/// A single font in a CFF font set.
#[derive(Clone, Debug)]
pub struct CffFont<'a> {
    full_name: Option<StringId>,
    family_name: Option<StringId>,
    charstrings: Index<'a>,
    kind: FontKind<'a>,
}

#[derive(Clone, Debug)]
enum FontKind<'a> {
    /// A name-keyed font with a single Private DICT.
    Sid(PrivateDict<'a>),
    /// A CID-keyed font that selects a Private DICT per glyph.
    Cid {
        fd_array: Vec<PrivateDict<'a>>,
        fd_select: FdSelect<'a>,
    },
}

/// The parts of a Private DICT needed to decode charstrings.
#[derive(Clone, Debug, Default)]
pub struct PrivateDict<'a> {
    subrs: Option<Index<'a>>,
    default_width_x: Fixed,
    nominal_width_x: Fixed,
}

impl<'a> PrivateDict<'a> {
    /// The local subroutines, if the DICT has a `Subrs` entry.
    pub fn subrs(&self) -> Option<Index<'a>> {
        self.subrs
    }

    pub fn default_width_x(&self) -> Fixed {
        self.default_width_x
    }

    pub fn nominal_width_x(&self) -> Fixed {
        self.nominal_width_x
    }

    /// Reads the Private DICT at `range` of the table.
    ///
    /// The `Subrs` offset is relative to the start of the Private DICT.
    fn read(table_data: FontData<'a>, range: Range<usize>) -> Result<Self, Error> {
        let dict_data = table_data
            .slice(range.clone())
            .ok_or(ReadError::OutOfBounds)?;
        let mut private = Self::default();
        for entry in dict::entries(dict_data.as_bytes()) {
            match entry? {
                Entry::SubrsOffset(offset) => {
                    let subrs_data = range
                        .start
                        .checked_add(offset)
                        .and_then(|start| table_data.split_off(start))
                        .ok_or(ReadError::OutOfBounds)?;
                    private.subrs = Some(Index::new(subrs_data.as_bytes())?);
                }
                Entry::DefaultWidthX(width) => private.default_width_x = width,
                Entry::NominalWidthX(width) => private.nominal_width_x = width,
                _ => {}
            }
        }
        Ok(private)
    }
}

impl<'a> CffFont<'a> {
    /// The string identifier of the `FullName` entry.
    pub fn full_name(&self) -> Option<StringId> {
        self.full_name
    }

    /// The string identifier of the `FamilyName` entry.
    pub fn family_name(&self) -> Option<StringId> {
        self.family_name
    }

    pub fn charstrings(&self) -> Index<'a> {
        self.charstrings
    }

    pub fn num_glyphs(&self) -> u32 {
        self.charstrings.count()
    }

    /// Returns true for a CID-keyed font.
    pub fn is_cid(&self) -> bool {
        matches!(self.kind, FontKind::Cid { .. })
    }

    /// All Private DICTs of the font: one for a name-keyed font, one per
    /// Font DICT for a CID-keyed font.
    pub fn private_dicts(&self) -> &[PrivateDict<'a>] {
        match &self.kind {
            FontKind::Sid(private) => std::slice::from_ref(private),
            FontKind::Cid { fd_array, .. } => fd_array,
        }
    }

    /// The Private DICT that applies to the given glyph.
    pub fn private_dict(&self, glyph_id: GlyphId) -> Result<&PrivateDict<'a>, Error> {
        match &self.kind {
            FontKind::Sid(private) => Ok(private),
            FontKind::Cid { fd_array, fd_select } => {
                let fd = fd_select
                    .font_index(glyph_id)
                    .ok_or(Error::InvalidFontIndex(glyph_id.to_u32()))?;
                fd_array
                    .get(fd as usize)
                    .ok_or(Error::InvalidFontIndex(fd as u32))
            }
        }
    }

    fn read(
        table_data: FontData<'a>,
        top_dict: &[u8],
        strings: &Index<'a>,
    ) -> Result<Self, Error> {
        let mut full_name = None;
        let mut family_name = None;
        let mut charstrings = None;
        let mut private_range = None;
        let mut fd_array_offset = None;
        let mut fd_select_offset = None;
        let mut is_cid = false;
        let mut charstring_type = 2;
        for entry in dict::entries(top_dict) {
            match entry? {
                Entry::FullName(id) => full_name = Some(id),
                Entry::FamilyName(id) => family_name = Some(id),
                Entry::CharstringsOffset(offset) => {
                    let data = table_data
                        .split_off(offset)
                        .ok_or(ReadError::OutOfBounds)?;
                    charstrings = Some(Index::new(data.as_bytes())?);
                }
                Entry::PrivateDictRange(range) => private_range = Some(range),
                Entry::FdArrayOffset(offset) => fd_array_offset = Some(offset),
                Entry::FdSelectOffset(offset) => fd_select_offset = Some(offset),
                Entry::Ros { .. } => is_cid = true,
                Entry::CharstringType(ty) => charstring_type = ty,
                _ => {}
            }
        }
        if charstring_type != 2 {
            return Err(Error::UnsupportedCharstringType(charstring_type));
        }
        let charstrings = charstrings.ok_or(Error::MissingCharstrings)?;
        let kind = if is_cid {
            let (Some(fd_array_offset), Some(fd_select_offset)) =
                (fd_array_offset, fd_select_offset)
            else {
                return Err(Error::MissingPrivateDict);
            };
            let fd_array_data = table_data
                .split_off(fd_array_offset)
                .ok_or(ReadError::OutOfBounds)?;
            let font_dicts = Index::new(fd_array_data.as_bytes())?;
            let fd_array = font_dicts
                .iter()
                .map(|font_dict| {
                    let range = dict::entries(font_dict?)
                        .find_map(|entry| match entry {
                            Ok(Entry::PrivateDictRange(range)) => Some(Ok(range)),
                            Err(e) => Some(Err(e)),
                            _ => None,
                        })
                        .ok_or(Error::MissingPrivateDict)??;
                    PrivateDict::read(table_data, range)
                })
                .collect::<Result<Vec<_>, _>>()?;
            let fd_select_data = table_data
                .split_off(fd_select_offset)
                .ok_or(ReadError::OutOfBounds)?;
            let num_glyphs = charstrings.count() as u16;
            let fd_select = FdSelect::read_with_args(fd_select_data, &num_glyphs)?;
            FontKind::Cid { fd_array, fd_select }
        } else {
            let range = private_range.ok_or(Error::MissingPrivateDict)?;
            FontKind::Sid(PrivateDict::read(table_data, range)?)
        };
        if let Some(name) = family_name.and_then(|id| id.resolve(strings).ok()) {
            log::debug!(
                "CFF font '{name}': {} glyphs, cid: {is_cid}",
                charstrings.count()
            );
        }
        Ok(Self {
            full_name,
            family_name,
            charstrings,
            kind,
        })
    }
}

impl<'a> Cff<'a> {
    pub fn major(&self) -> u8 {
        self.major
    }

    pub fn minor(&self) -> u8 {
        self.minor
    }

    /// Returns the name index.
    ///
    /// This contains the PostScript names of all fonts in the font set.
    pub fn names(&self) -> Index<'a> {
        self.names
    }

    /// Returns the PostScript name for the font in the font set at the
    /// given index.
    pub fn name(&self, index: usize) -> Option<Latin1String<'a>> {
        self.names.get(index).ok().map(Latin1String::new)
    }

    /// Returns the string index.
    pub fn strings(&self) -> Index<'a> {
        self.strings
    }

    /// Returns the associated string for the given identifier.
    pub fn string(&self, id: StringId) -> Option<Latin1String<'a>> {
        id.resolve(&self.strings).ok()
    }

    /// Returns the global subroutine index.
    pub fn global_subrs(&self) -> Index<'a> {
        self.global_subrs
    }

    pub fn fonts(&self) -> &[CffFont<'a>] {
        &self.fonts
    }

    pub fn font(&self, index: usize) -> Result<&CffFont<'a>, Error> {
        self.fonts
            .get(index)
            .ok_or(Error::InvalidFontIndex(index as u32))
    }

    /// Decodes the charstring for a glyph of the font at `font_index`.
    pub fn charstring(&self, font_index: usize, glyph_id: GlyphId) -> Result<CharString, Error> {
        let font = self.font(font_index)?;
        let data = font.charstrings.get(glyph_id.to_u32() as usize)?;
        let private = font.private_dict(glyph_id)?;
        charstring::decode(data, self.global_subrs, private.subrs)
    }

    /// Decodes the body of a local subroutine on its own.
    ///
    /// `index` is the unbiased position in the INDEX. A trailing `return`
    /// appears in the output.
    pub fn local_subroutine(
        &self,
        private: &PrivateDict<'a>,
        index: usize,
    ) -> Result<CharString, Error> {
        let subrs = private.subrs.ok_or(Error::MissingSubroutines)?;
        charstring::decode(subrs.get(index)?, self.global_subrs, Some(subrs))
    }

    /// Decodes the body of a global subroutine on its own.
    pub fn global_subroutine(
        &self,
        private: Option<&PrivateDict<'a>>,
        index: usize,
    ) -> Result<CharString, Error> {
        let data = self.global_subrs.get(index)?;
        charstring::decode(data, self.global_subrs, private.and_then(|p| p.subrs))
    }

    fn parse(data: FontData<'a>) -> Result<Self, Error> {
        let mut cursor = data.cursor();
        let major: u8 = cursor.read()?;
        let minor: u8 = cursor.read()?;
        let header_size: u8 = cursor.read()?;
        let _off_size: u8 = cursor.read()?;
        if major != 1 {
            return Err(ReadError::InvalidFormat(major as i64).into());
        }
        let mut rest = data
            .split_off(header_size as usize)
            .ok_or(ReadError::OutOfBounds)?
            .as_bytes();
        let mut next_index = || -> Result<Index<'a>, Error> {
            let index = Index::new(rest)?;
            rest = rest.get(index.size_in_bytes()..).ok_or(ReadError::OutOfBounds)?;
            Ok(index)
        };
        let names = next_index()?;
        let top_dicts = next_index()?;
        let strings = next_index()?;
        let global_subrs = next_index()?;
        if names.count() != top_dicts.count() {
            return Err(ReadError::MalformedData("CFF name and Top DICT counts differ").into());
        }
        let fonts = top_dicts
            .iter()
            .map(|top_dict| CffFont::read(data, top_dict?, &strings))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "CFF {major}.{minor}: {} fonts, {} global subroutines",
            fonts.len(),
            global_subrs.count()
        );
        Ok(Self {
            major,
            minor,
            names,
            strings,
            global_subrs,
            fonts,
        })
    }
}

impl TopLevelTable for Cff<'_> {
    const TAG: Tag = Tag::new(b"CFF ");
}

impl<'a> FontRead<'a> for Cff<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Self::parse(data)?)
    }
}

#[cfg(test)]
mod tests {
    use font_test_data::cff as fixtures;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tables::postscript::{Command, Operator};

    fn read_simple() -> Cff<'static> {
        Cff::read(FontData::new(fixtures::simple_cff())).unwrap()
    }

    #[test]
    fn font_set_structure() {
        let cff = read_simple();
        assert_eq!((cff.major(), cff.minor()), (1, 0));
        assert_eq!(cff.fonts().len(), 1);
        assert_eq!(cff.name(0).unwrap(), "CMR10");
        let font = cff.font(0).unwrap();
        assert!(!font.is_cid());
        assert_eq!(font.num_glyphs(), fixtures::NUM_GLYPHS as u32);
        let family = cff.string(font.family_name().unwrap()).unwrap();
        assert_eq!(family, "Computer Modern");
        let private = font.private_dict(GlyphId::new(1)).unwrap();
        assert_eq!(private.subrs().unwrap().count(), 2);
        assert_eq!(private.default_width_x(), Fixed::from_i32(500));
        assert_eq!(private.nominal_width_x(), Fixed::from_i32(600));
        assert_eq!(cff.font(1).err(), Some(Error::InvalidFontIndex(1)));
    }

    #[test]
    fn local_subroutine_is_stable() {
        let cff = read_simple();
        let private = &cff.font(0).unwrap().private_dicts()[0];
        let first = cff.local_subroutine(private, 0).unwrap();
        let commands = first.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].operator, Operator::VhCurveTo);
        assert_eq!(commands[0].operands.len(), 16);
        assert_eq!(commands[1], Command::new(Operator::Return, []));
        for _ in 0..3 {
            assert_eq!(cff.local_subroutine(private, 0).unwrap(), first);
        }
    }

    #[test]
    fn glyph_charstrings() {
        let cff = read_simple();
        let font = cff.font(0).unwrap();
        let private = font.private_dict(GlyphId::new(1)).unwrap();
        let glyph = cff.charstring(0, GlyphId::new(1)).unwrap();
        assert_eq!(glyph.commands()[0].operator, Operator::RMoveTo);
        assert_eq!(glyph.commands()[1].operator, Operator::VhCurveTo);
        assert_eq!(glyph.commands().last().unwrap().operator, Operator::EndChar);
        assert_eq!(
            glyph.advance_width(private.default_width_x(), private.nominal_width_x()),
            Fixed::from_i32(500)
        );
        // the broken glyph doesn't affect its neighbours
        assert_eq!(
            cff.charstring(0, GlyphId::new(fixtures::BROKEN_GLYPH)),
            Err(Error::NestingDepthExceeded)
        );
        assert!(cff.charstring(0, GlyphId::new(fixtures::BROKEN_GLYPH + 1)).is_ok());
        assert!(cff.charstring(0, GlyphId::new(fixtures::NUM_GLYPHS)).is_err());
    }

    #[test]
    fn cid_keyed_font() {
        let data = fixtures::cid_cff();
        let cff = Cff::read(FontData::new(&data)).unwrap();
        let font = cff.font(0).unwrap();
        assert!(font.is_cid());
        assert_eq!(font.private_dicts().len(), 2);
        assert_eq!(
            font.private_dict(GlyphId::new(0)).unwrap().default_width_x(),
            Fixed::from_i32(100)
        );
        assert_eq!(
            font.private_dict(GlyphId::new(1)).unwrap().default_width_x(),
            Fixed::from_i32(200)
        );
        // glyph 1 calls a local subroutine that only its Font DICT has
        let glyph = cff.charstring(0, GlyphId::new(1)).unwrap();
        assert_eq!(glyph.commands()[1].operator, Operator::RLineTo);
        assert_eq!(
            cff.charstring(0, GlyphId::new(0)),
            Err(Error::MissingSubroutines)
        );
    }

    #[test]
    fn reject_bad_headers() {
        let mut data = fixtures::simple_cff().to_vec();
        data[0] = 2;
        assert_eq!(
            Cff::read(FontData::new(&data)).err(),
            Some(ReadError::InvalidFormat(2))
        );
        assert!(Cff::read(FontData::new(&data[..3])).is_err());
    }
}
