//! GPOS subtables and a complete GPOS table

use font_types::Tag;

use crate::layout::{extension, layout_table, FeatureDef, LangSysDef, LookupDef, ScriptDef};

#[rustfmt::skip]
pub static SINGLEPOSFORMAT1: &[u8] = &[
    0x00, 0x01, // format 1
    0x00, 0x08, // coverage offset
    0x00, 0x02, // value format: y placement
    0xFF, 0xB0, // -80
    // coverage format 2
    0x00, 0x02, 0x00, 0x01,
    0x00, 0x2E, 0x00, 0x33, 0x00, 0x00, // glyphs 46..=51
];

#[rustfmt::skip]
pub static SINGLEPOSFORMAT2: &[u8] = &[
    0x00, 0x02, // format 2
    0x00, 0x14, // coverage offset
    0x00, 0x05, // value format: x placement, x advance
    0x00, 0x03, // value count
    0x00, 0x32, 0x00, 0x64, // 50, 100
    0x00, 0x50, 0x00, 0x96, // 80, 150
    0x00, 0x0A, 0x00, 0x1E, // 10, 30
    // coverage format 1
    0x00, 0x01, 0x00, 0x03,
    0x00, 0x4D, 0x00, 0x4F, 0x00, 0x7D, // 77, 79, 125
];

/// Glyph pairs: (14, 36) -> 77, (14, 40) -> -20, (20, 14) -> -10, all on
/// the x advance of the first glyph.
#[rustfmt::skip]
pub static PAIRPOSFORMAT1: &[u8] = &[
    0x00, 0x01, // format 1
    0x00, 0x1E, // coverage offset
    0x00, 0x04, // value format 1: x advance
    0x00, 0x00, // value format 2: none
    0x00, 0x02, // pair set count
    0x00, 0x0E, 0x00, 0x18,
    // pair set for glyph 14
    0x00, 0x02,
    0x00, 0x24, 0x00, 0x4D, // 36: 77
    0x00, 0x28, 0xFF, 0xEC, // 40: -20
    // pair set for glyph 20
    0x00, 0x01,
    0x00, 0x0E, 0xFF, 0xF6, // 14: -10
    // coverage format 1
    0x00, 0x01, 0x00, 0x02, 0x00, 0x0E, 0x00, 0x14,
];

/// Class pairs: 68 is in first class 1, 124 in first class 2; 92 is in
/// second class 1, 114 in second class 2.
///
/// (68, 92) -> -83, (124, 114) -> -27, and 68 followed by any glyph in
/// second class 0 -> -5.
#[rustfmt::skip]
pub static PAIRPOSFORMAT2: &[u8] = &[
    0x00, 0x02, // format 2
    0x00, 0x22, // coverage offset
    0x00, 0x04, // value format 1: x advance
    0x00, 0x00, // value format 2: none
    0x00, 0x2A, // class def 1 offset
    0x00, 0x3A, // class def 2 offset
    0x00, 0x03, // class 1 count
    0x00, 0x03, // class 2 count
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // class 1 = 0
    0xFF, 0xFB, 0xFF, 0xAD, 0x00, 0x00, // class 1 = 1: -5, -83, 0
    0x00, 0x00, 0x00, 0x00, 0xFF, 0xE5, // class 1 = 2: 0, 0, -27
    // coverage format 1
    0x00, 0x01, 0x00, 0x02, 0x00, 0x44, 0x00, 0x7C,
    // class def 1, format 2
    0x00, 0x02, 0x00, 0x02,
    0x00, 0x44, 0x00, 0x44, 0x00, 0x01,
    0x00, 0x7C, 0x00, 0x7C, 0x00, 0x02,
    // class def 2, format 2
    0x00, 0x02, 0x00, 0x02,
    0x00, 0x5C, 0x00, 0x5C, 0x00, 0x01,
    0x00, 0x72, 0x00, 0x72, 0x00, 0x02,
];

/// A GPOS table whose `latn` `kern` feature has one pair lookup holding the
/// glyph pair subtable followed by the class pair subtable, behind
/// extensions.
///
/// A second lookup for `mark` is of type 4 and is kept uninterpreted.
pub fn gpos_table() -> Vec<u8> {
    let scripts = [ScriptDef {
        tag: Tag::new(b"latn"),
        default_lang_sys: Some(LangSysDef {
            required_feature: None,
            features: &[0, 1, 2],
        }),
        lang_sys: &[],
    }];
    let features = [
        FeatureDef {
            tag: Tag::new(b"kern"),
            lookups: &[0],
        },
        FeatureDef {
            tag: Tag::new(b"mark"),
            lookups: &[1],
        },
        FeatureDef {
            tag: Tag::new(b"cpsp"),
            lookups: &[2],
        },
    ];
    let mark_to_base: &[u8] = &[0x00, 0x01];
    let lookups = [
        LookupDef::new(
            9,
            &[
                extension(2, PAIRPOSFORMAT1).as_slice(),
                extension(2, PAIRPOSFORMAT2).as_slice(),
            ],
        ),
        LookupDef::new(4, &[mark_to_base]),
        LookupDef::new(1, &[SINGLEPOSFORMAT1, SINGLEPOSFORMAT2]),
    ];
    layout_table(&scripts, &features, &lookups)
}
