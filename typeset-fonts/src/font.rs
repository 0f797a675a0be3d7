//! A font opened for typesetting

use types::{BoundingBox, Fixed, GlyphId};

use crate::{
    tables::{
        cff::Cff,
        gpos::{Gpos, PositioningLookup},
        gsub::{Gsub, SubstitutionLookup},
        postscript::{self, CharString},
    },
    FontRef, LayoutTag, ReadError, TableProvider, TagKind, TagRegistry,
};

/// A font whose layout tables and CFF structure have been decoded.
///
/// All structural decoding happens in the constructors; afterwards the font
/// is immutable. Charstrings are decoded on demand.
///
/// Every script, language system and feature tag found in `GSUB` and `GPOS`
/// is registered with the font's [`TagRegistry`] when the font is opened.
pub struct Font<'a> {
    font_ref: FontRef<'a>,
    registry: &'a TagRegistry,
    num_glyphs: u16,
    family_name: Option<String>,
    gsub: Option<Gsub>,
    gpos: Option<Gpos>,
    cff: Option<Cff<'a>>,
}

impl<'a> Font<'a> {
    /// Opens a single font, using the global tag registry.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        Self::with_registry(data, 0, TagRegistry::global())
    }

    /// Opens the font at `index` of a collection, or a single font if
    /// `index` is 0.
    pub fn from_index(data: &'a [u8], index: u32) -> Result<Self, ReadError> {
        Self::with_registry(data, index, TagRegistry::global())
    }

    /// Opens a font that registers its tags with `registry`.
    pub fn with_registry(
        data: &'a [u8],
        index: u32,
        registry: &'a TagRegistry,
    ) -> Result<Self, ReadError> {
        let font_ref = FontRef::from_index(data, index)?;
        let num_glyphs = font_ref.maxp()?.num_glyphs;
        let family_name = match font_ref.optional_table::<crate::tables::name::Name>()? {
            Some(name) => name.family_name()?,
            None => None,
        };
        let gsub: Option<Gsub> = font_ref.optional_table()?;
        let gpos: Option<Gpos> = font_ref.optional_table()?;
        let cff: Option<Cff> = font_ref.optional_table()?;
        let layout_tags = gsub
            .iter()
            .flat_map(|gsub| gsub.layout_tags())
            .chain(gpos.iter().flat_map(|gpos| gpos.layout_tags()));
        for tag in layout_tags {
            registry.register(tag);
        }
        log::debug!(
            "opened font '{}': {num_glyphs} glyphs, GSUB: {}, GPOS: {}, CFF: {}",
            family_name.as_deref().unwrap_or_default(),
            gsub.is_some(),
            gpos.is_some(),
            cff.is_some(),
        );
        Ok(Font {
            font_ref,
            registry,
            num_glyphs,
            family_name,
            gsub,
            gpos,
            cff,
        })
    }

    /// The underlying table provider.
    pub fn font_ref(&self) -> &FontRef<'a> {
        &self.font_ref
    }

    pub fn registry(&self) -> &'a TagRegistry {
        self.registry
    }

    /// The number of glyphs, from `maxp`.
    pub fn num_glyphs(&self) -> u16 {
        self.num_glyphs
    }

    /// The family name from the `name` table, if it has one.
    pub fn family_name(&self) -> Option<&str> {
        self.family_name.as_deref()
    }

    pub fn gsub(&self) -> Option<&Gsub> {
        self.gsub.as_ref()
    }

    pub fn gpos(&self) -> Option<&Gpos> {
        self.gpos.as_ref()
    }

    pub fn cff(&self) -> Option<&Cff<'a>> {
        self.cff.as_ref()
    }

    /// The `GSUB` lookups for a feature under a script and language system,
    /// all given as text.
    ///
    /// Tags are normalized the way the registry normalizes them: shorter text
    /// is padded with spaces. Nothing is registered by a query. With no
    /// language the script's default language system is used. Returns an
    /// empty list if anything fails to resolve.
    pub fn substitution_lookups(
        &self,
        script: &str,
        language: Option<&str>,
        feature: &str,
    ) -> Vec<&SubstitutionLookup> {
        let Some(gsub) = self.gsub.as_ref() else {
            return Vec::new();
        };
        let (script, language, feature) = self.resolve_tags(script, language, feature);
        gsub.find_lookup(script, language, feature)
    }

    /// The `GPOS` lookups for a feature under a script and language system.
    ///
    /// See [`substitution_lookups`](Self::substitution_lookups).
    pub fn positioning_lookups(
        &self,
        script: &str,
        language: Option<&str>,
        feature: &str,
    ) -> Vec<&PositioningLookup> {
        let Some(gpos) = self.gpos.as_ref() else {
            return Vec::new();
        };
        let (script, language, feature) = self.resolve_tags(script, language, feature);
        gpos.find_lookup(script, language, feature)
    }

    fn resolve_tags(
        &self,
        script: &str,
        language: Option<&str>,
        feature: &str,
    ) -> (types::Tag, Option<types::Tag>, types::Tag) {
        (
            LayoutTag::from_text(script, TagKind::Script).tag(),
            language.map(|language| LayoutTag::from_text(language, TagKind::Language).tag()),
            LayoutTag::from_text(feature, TagKind::Feature).tag(),
        )
    }

    /// Decodes the charstring of a glyph of the first font in the `CFF`
    /// table.
    ///
    /// Returns `Ok(None)` if the font has no `CFF` table. A glyph that fails
    /// to decode doesn't affect any other glyph.
    pub fn charstring(&self, gid: GlyphId) -> Result<Option<CharString>, postscript::Error> {
        self.cff
            .as_ref()
            .map(|cff| cff.charstring(0, gid))
            .transpose()
    }

    /// The advance width of a CFF glyph, or `None` if it can't be decoded.
    pub fn advance_width(&self, gid: GlyphId) -> Option<Fixed> {
        let cff = self.cff.as_ref()?;
        let decoded = cff.font(0).and_then(|font| {
            let private = font.private_dict(gid)?;
            let charstring = cff.charstring(0, gid)?;
            Ok(charstring.advance_width(private.default_width_x(), private.nominal_width_x()))
        });
        match decoded {
            Ok(width) => Some(width),
            Err(e) => {
                log::warn!("failed to decode glyph {gid}: {e}");
                None
            }
        }
    }

    /// The control box of a CFF glyph's outline, or `None` if it has no
    /// outline or can't be decoded.
    pub fn outline_bounds(&self, gid: GlyphId) -> Option<BoundingBox<f32>> {
        match self.charstring(gid).and_then(|cs| cs.map(|cs| cs.bounds()).transpose()) {
            Ok(bounds) => bounds.flatten(),
            Err(e) => {
                log::warn!("failed to decode glyph {gid}: {e}");
                None
            }
        }
    }

    /// The bounding box of the TrueType glyph that `char_code` maps to
    /// through the cmap subtable for the given platform and encoding.
    ///
    /// Returns `Ok(None)` if there is no such subtable, the code is unmapped
    /// or the glyph has no outline. Missing or malformed `cmap`, `loca`,
    /// `glyf` or `head` tables are errors.
    pub fn glyph_bounds(
        &self,
        char_code: u32,
        platform_id: u16,
        encoding_id: u16,
    ) -> Result<Option<BoundingBox<i16>>, ReadError> {
        let Some(gid) = self
            .font_ref
            .cmap()?
            .map(char_code, platform_id, encoding_id)?
        else {
            return Ok(None);
        };
        let loca = self.font_ref.loca(None)?;
        let glyf = self.font_ref.glyf()?;
        Ok(glyf
            .glyph_header(&loca, gid)?
            .map(|header| header.bounds))
    }
}

#[cfg(test)]
mod tests {
    use font_test_data::{cff as cff_data, gsub as gsub_data, sfnt};
    use types::{Tag, CFF_SFNT_VERSION};

    use super::*;
    use crate::tables::{gsub::LookupKind, postscript::Operator};

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn end_to_end_cff_font() {
        init_logging();
        let data = sfnt::cff_font();
        let registry = TagRegistry::new();
        let font = Font::with_registry(&data, 0, &registry).unwrap();
        assert_eq!(font.num_glyphs(), 132);
        assert_eq!(font.family_name(), Some("Computer Modern"));
        let liga = font.substitution_lookups("latn", None, "liga");
        assert_eq!(liga.len(), 1);
        assert_eq!(liga[0].kind(), LookupKind::Ligature);
        assert_eq!(liga[0].subtables().len(), 1);
        assert_eq!(liga[0].subtables()[0].format(), 1);
    }

    #[test]
    fn tags_are_registered_on_open() {
        let data = sfnt::cff_font();
        let registry = TagRegistry::new();
        assert!(!registry.contains_tag("TRK", TagKind::Language));
        let _font = Font::with_registry(&data, 0, &registry).unwrap();
        assert!(registry.contains_tag("TRK", TagKind::Language));
        assert!(registry.contains_tag("cpsp", TagKind::Feature));
    }

    #[test]
    fn textual_tags_are_padded() {
        let data = sfnt::cff_font();
        let registry = TagRegistry::new();
        let font = Font::with_registry(&data, 0, &registry).unwrap();
        let trk = font.substitution_lookups("latn", Some("TRK"), "liga");
        let expected = [gsub_data::TRK_LIGA_LOOKUP, gsub_data::LIGA_LOOKUP]
            .map(|ix| font.gsub().unwrap().lookup(ix).unwrap());
        assert_eq!(trk, expected);
        // unknown language falls back to the default
        assert_eq!(font.substitution_lookups("latn", Some("XYZ"), "liga").len(), 1);
        assert!(font.substitution_lookups("cyrl", None, "liga").is_empty());
        assert!(font.substitution_lookups("latn", None, "c2sc").is_empty());
    }

    #[test]
    fn queries_do_not_register_tags() {
        let data = sfnt::cff_font();
        let registry = TagRegistry::new();
        let font = Font::with_registry(&data, 0, &registry).unwrap();
        let counts = |registry: &TagRegistry| {
            [TagKind::Script, TagKind::Language, TagKind::Feature].map(|kind| registry.len(kind))
        };
        let before = counts(&registry);
        for i in 0..20 {
            let script = format!("q{i:03}");
            assert!(font.substitution_lookups(&script, Some("QQQ"), "zzzz").is_empty());
            assert!(font.positioning_lookups(&script, None, "kern").is_empty());
        }
        assert_eq!(counts(&registry), before);
        assert!(!registry.contains_tag("q001", TagKind::Script));
        assert!(!registry.contains_tag("QQQ", TagKind::Language));
        assert!(!registry.contains_tag("zzzz", TagKind::Feature));
    }

    #[test]
    fn positioning() {
        let data = sfnt::cff_font();
        let font = Font::new(&data).unwrap();
        let kern = font.positioning_lookups("latn", None, "kern");
        assert_eq!(kern.len(), 1);
        let value = kern[0]
            .pair_adjustment(GlyphId::new(14), GlyphId::new(36))
            .and_then(|pair| pair.value_record1())
            .unwrap();
        assert_eq!(value.x_advance(), 77);
    }

    #[test]
    fn charstrings() {
        let data = sfnt::cff_font();
        let font = Font::new(&data).unwrap();
        let glyph = font.charstring(GlyphId::new(1)).unwrap().unwrap();
        assert_eq!(glyph.commands()[0].operator, Operator::RMoveTo);
        assert_eq!(
            font.charstring(GlyphId::new(cff_data::BROKEN_GLYPH)),
            Err(postscript::Error::NestingDepthExceeded)
        );
        assert_eq!(font.advance_width(GlyphId::new(1)), Some(Fixed::from_i32(500)));
        assert_eq!(font.advance_width(GlyphId::new(cff_data::BROKEN_GLYPH)), None);
        // width operand 20 over nominal 600
        assert_eq!(font.advance_width(GlyphId::new(3)), Some(Fixed::from_i32(620)));
        let bounds = font.outline_bounds(GlyphId::new(3)).unwrap();
        assert_eq!(
            (bounds.x_min, bounds.y_min, bounds.x_max, bounds.y_max),
            (10.0, 10.0, 110.0, 110.0)
        );
        assert_eq!(font.outline_bounds(GlyphId::new(0)), None);
    }

    #[test]
    fn truetype_bounds() {
        let data = sfnt::truetype_font();
        let font = Font::new(&data).unwrap();
        assert_eq!(font.num_glyphs(), sfnt::TRUETYPE_NUM_GLYPHS);
        assert_eq!(font.family_name(), Some(sfnt::FAMILY_NAME));
        assert!(font.gsub().is_none());
        assert!(font.substitution_lookups("latn", None, "liga").is_empty());
        assert_eq!(font.charstring(GlyphId::new(1)), Ok(None));
        let a = font.glyph_bounds('A' as u32, 3, 1).unwrap().unwrap();
        assert_eq!((a.x_min, a.y_min, a.x_max, a.y_max), (10, 0, 640, 720));
        // space has no outline
        assert_eq!(font.glyph_bounds(' ' as u32, 3, 1), Ok(None));
        // unmapped, and only mapped in the full repertoire subtable
        assert_eq!(font.glyph_bounds('B' as u32, 3, 1), Ok(None));
        assert_eq!(font.glyph_bounds(0x1F600, 3, 1), Ok(None));
        let emoji = font.glyph_bounds(0x1F600, 3, 10).unwrap().unwrap();
        assert_eq!(emoji.x_max, 900);
        // no such subtable
        assert_eq!(font.glyph_bounds('A' as u32, 1, 0), Ok(None));
    }

    #[test]
    fn cff_font_has_no_glyf() {
        let data = sfnt::cff_font();
        let font = Font::new(&data).unwrap();
        assert_eq!(
            font.glyph_bounds('A' as u32, 3, 1),
            Err(ReadError::TableIsMissing(Tag::new(b"loca")))
        );
    }

    #[test]
    fn missing_maxp_is_an_error() {
        let tables: Vec<_> = sfnt::cff_font_tables()
            .into_iter()
            .filter(|(tag, _)| *tag != Tag::new(b"maxp"))
            .collect();
        let data = sfnt::sfnt(CFF_SFNT_VERSION, &tables);
        assert_eq!(
            Font::new(&data).err(),
            Some(ReadError::TableIsMissing(Tag::new(b"maxp")))
        );
    }

    #[test]
    fn malformed_layout_table_fails_open() {
        let tables: Vec<_> = sfnt::cff_font_tables()
            .into_iter()
            .map(|(tag, data)| {
                if tag == Tag::new(b"GSUB") {
                    (tag, data[..12].to_vec())
                } else {
                    (tag, data)
                }
            })
            .collect();
        let data = sfnt::sfnt(CFF_SFNT_VERSION, &tables);
        assert!(Font::new(&data).is_err());
    }

    #[test]
    fn fonts_in_a_collection() {
        let data = sfnt::collection(&[
            (types::TT_SFNT_VERSION, sfnt::truetype_font_tables()),
            (CFF_SFNT_VERSION, sfnt::cff_font_tables()),
        ]);
        let tt = Font::from_index(&data, 0).unwrap();
        assert_eq!(tt.num_glyphs(), sfnt::TRUETYPE_NUM_GLYPHS);
        let cff = Font::from_index(&data, 1).unwrap();
        assert_eq!(cff.num_glyphs(), cff_data::NUM_GLYPHS);
        assert!(cff.gpos().is_some());
        assert_eq!(
            Font::from_index(&data, 2).err(),
            Some(ReadError::InvalidCollectionIndex(2))
        );
    }
}
