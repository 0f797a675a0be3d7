//! GSUB subtables and a complete GSUB table

use font_types::Tag;

use crate::layout::{
    extension, layout_table, FeatureDef, LangSysDef, LookupDef, ScriptDef,
};

// example 2 from the OpenType spec
#[rustfmt::skip]
pub static SINGLESUBSTFORMAT1_TABLE: &[u8] = &[
    0x00, 0x01, // format 1
    0x00, 0x06, // coverage offset
    0x00, 0xC0, // delta glyph id 192
    // coverage format 2
    0x00, 0x02, 0x00, 0x01,
    0x00, 0x4E, 0x00, 0x58, 0x00, 0x00, // glyphs 78..=88, start index 0
];

/// A negative delta that wraps below glyph 0.
#[rustfmt::skip]
pub static SINGLESUBSTFORMAT1_WRAPPING: &[u8] = &[
    0x00, 0x01,
    0x00, 0x06,
    0xFF, 0xFB, // delta -5
    0x00, 0x01, 0x00, 0x02,
    0x00, 0x02, 0x00, 0x0A, // glyphs 2 and 10
];

// example 3 from the OpenType spec
#[rustfmt::skip]
pub static SINGLESUBSTFORMAT2_TABLE: &[u8] = &[
    0x00, 0x02, // format 2
    0x00, 0x0E, // coverage offset
    0x00, 0x04, // glyph count
    0x01, 0x31, 0x01, 0x35, 0x01, 0x3E, 0x01, 0x43, // 305, 309, 318, 323
    // coverage format 1
    0x00, 0x01, 0x00, 0x04,
    0x00, 0x3C, 0x00, 0x40, 0x00, 0x4B, 0x00, 0x4F, // 60, 64, 75, 79
];

// example 4 from the OpenType spec
#[rustfmt::skip]
pub static MULTIPLESUBSTFORMAT1_TABLE: &[u8] = &[
    0x00, 0x01, // format 1
    0x00, 0x10, // coverage offset
    0x00, 0x01, // sequence count
    0x00, 0x08, // sequence offset
    // sequence
    0x00, 0x03, 0x00, 0x1A, 0x00, 0x1A, 0x00, 0x1D,
    // coverage format 1
    0x00, 0x01, 0x00, 0x01, 0x00, 0xF1,
];

// example 5 from the OpenType spec
#[rustfmt::skip]
pub static ALTERNATESUBSTFORMAT1_TABLE: &[u8] = &[
    0x00, 0x01, // format 1
    0x00, 0x08, // coverage offset
    0x00, 0x01, // alternate set count
    0x00, 0x0E, // alternate set offset
    // coverage format 1
    0x00, 0x01, 0x00, 0x01, 0x00, 0x3A,
    // alternate set
    0x00, 0x02, 0x00, 0xC9, 0x00, 0xCA,
];

/// Ligatures beginning with glyph 105 ("f"), the longest listed first:
/// f f i -> 17, f l -> 16, f f -> 14.
#[rustfmt::skip]
pub static LIGATURESUBSTFORMAT1_TABLE: &[u8] = &[
    0x00, 0x01, // format 1
    0x00, 0x24, // coverage offset
    0x00, 0x01, // ligature set count
    0x00, 0x08, // ligature set offset
    // ligature set
    0x00, 0x03, // ligature count
    0x00, 0x08, 0x00, 0x10, 0x00, 0x16,
    // ffi
    0x00, 0x11, 0x00, 0x03, 0x00, 0x69, 0x00, 0x6C,
    // fl
    0x00, 0x10, 0x00, 0x02, 0x00, 0x6F,
    // ff
    0x00, 0x0E, 0x00, 0x02, 0x00, 0x69,
    // coverage format 1
    0x00, 0x01, 0x00, 0x01, 0x00, 0x69,
];

/// Indices of the lookups in [`gsub_table`].
pub const LIGA_LOOKUP: u16 = 0;
pub const SALT_LOOKUP: u16 = 1;
pub const SMCP_LOOKUP: u16 = 2;
pub const TRK_LIGA_LOOKUP: u16 = 3;

/// A GSUB table with `DFLT` and `latn` scripts.
///
/// - `DFLT` default: `liga`
/// - `latn` default: `liga`, `salt`, `smcp`
/// - `latn`/`TRK `: a second `liga` feature followed by the first one, with
///   `salt` as the required feature
///
/// The `smcp` lookup is stored behind an extension subtable and the Turkish
/// `liga` lookup uses a mark filtering set.
pub fn gsub_table() -> Vec<u8> {
    let liga = Tag::new(b"liga");
    let scripts = [
        ScriptDef {
            tag: Tag::new(b"DFLT"),
            default_lang_sys: Some(LangSysDef {
                required_feature: None,
                features: &[0],
            }),
            lang_sys: &[],
        },
        ScriptDef {
            tag: Tag::new(b"latn"),
            default_lang_sys: Some(LangSysDef {
                required_feature: None,
                features: &[0, 1, 2],
            }),
            lang_sys: &[(
                Tag::new(b"TRK "),
                LangSysDef {
                    required_feature: Some(1),
                    features: &[3, 0],
                },
            )],
        },
    ];
    let features = [
        FeatureDef {
            tag: liga,
            lookups: &[LIGA_LOOKUP],
        },
        FeatureDef {
            tag: Tag::new(b"salt"),
            lookups: &[SALT_LOOKUP],
        },
        FeatureDef {
            tag: Tag::new(b"smcp"),
            lookups: &[SMCP_LOOKUP],
        },
        FeatureDef {
            tag: liga,
            lookups: &[TRK_LIGA_LOOKUP],
        },
    ];
    let mut trk_liga = LookupDef::new(1, &[SINGLESUBSTFORMAT1_WRAPPING]);
    trk_liga.lookup_flag = 0x0010;
    trk_liga.mark_filtering_set = Some(0);
    let lookups = [
        LookupDef::new(4, &[LIGATURESUBSTFORMAT1_TABLE]),
        LookupDef::new(3, &[ALTERNATESUBSTFORMAT1_TABLE]),
        LookupDef::new(7, &[extension(1, SINGLESUBSTFORMAT2_TABLE).as_slice()]),
        trk_liga,
    ];
    layout_table(&scripts, &features, &lookups)
}
