//! Complete fonts and the small tables they are made of

use font_types::{Tag, CFF_SFNT_VERSION, TTC_HEADER_TAG, TT_SFNT_VERSION};

use crate::{bebuffer::BeBuffer, cff, cmap, gpos, gsub};

/// Family name of [`cff_font`] and [`truetype_font`].
pub const FAMILY_NAME: &str = "Computer Modern";
/// Units per em of [`cff_font`] and [`truetype_font`].
pub const UNITS_PER_EM: u16 = 1000;

/// Writes a table directory followed by the tables, each padded to four
/// bytes. Tables are sorted by tag.
///
/// `base` is the position of the directory in the file, for fonts in a
/// collection.
pub fn sfnt_at(base: usize, sfnt_version: u32, tables: &[(Tag, Vec<u8>)]) -> Vec<u8> {
    let mut tables: Vec<_> = tables.iter().collect();
    tables.sort_by_key(|(tag, _)| *tag);
    let num_tables = tables.len() as u16;
    let mut entry_selector = 0u16;
    while 1u32 << (entry_selector + 1) <= num_tables as u32 {
        entry_selector += 1;
    }
    let search_range = (1u16 << entry_selector) * 16;
    let mut directory = BeBuffer::new()
        .push(sfnt_version)
        .push(num_tables)
        .push(search_range)
        .push(entry_selector)
        .push(num_tables * 16 - search_range);
    let mut offset = base + 12 + 16 * tables.len();
    let mut body = BeBuffer::new();
    for (tag, data) in tables {
        directory = directory
            .push(*tag)
            .push(0u32)
            .push(offset as u32)
            .push(data.len() as u32);
        body = body.extend_bytes(data).align_to(4);
        offset = base + 12 + 16 * num_tables as usize + body.len();
    }
    directory.extend_bytes(&body).into_vec()
}

pub fn sfnt(sfnt_version: u32, tables: &[(Tag, Vec<u8>)]) -> Vec<u8> {
    sfnt_at(0, sfnt_version, tables)
}

/// A TrueType collection holding the given fonts, each described by its
/// sfnt version and tables.
pub fn collection(fonts: &[(u32, Vec<(Tag, Vec<u8>)>)]) -> Vec<u8> {
    let header_len = 12 + 4 * fonts.len();
    let mut header = BeBuffer::new()
        .push(TTC_HEADER_TAG)
        .push(1u16)
        .push(0u16)
        .push(fonts.len() as u32);
    let mut body = Vec::new();
    for (sfnt_version, tables) in fonts {
        let base = header_len + body.len();
        header = header.push(base as u32);
        body.extend(sfnt_at(base, *sfnt_version, tables));
    }
    header.extend_bytes(&body).into_vec()
}

/// A version 1.0 `head` table.
pub fn head_table(units_per_em: u16, index_to_loc_format: i16) -> Vec<u8> {
    BeBuffer::new()
        .extend([1u16, 0])
        .push(0x00010000u32) // fontRevision
        .extend([0u32, 0x5F0F3CF5])
        .extend([0u16, units_per_em])
        .extend([0u32; 4]) // created, modified
        .extend([0i16, -250, 1000, 750])
        .extend([0u16, 8]) // macStyle, lowestRecPPEM
        .extend([2i16, index_to_loc_format, 0])
        .into_vec()
}

/// A version 0.5 `maxp` table.
pub fn maxp_table(num_glyphs: u16) -> Vec<u8> {
    BeBuffer::new()
        .push(0x00005000u32)
        .push(num_glyphs)
        .into_vec()
}

/// A version 1.0 `maxp` table, as TrueType fonts require.
pub fn maxp_table_v1(num_glyphs: u16) -> Vec<u8> {
    BeBuffer::new()
        .push(0x00010000u32)
        .push(num_glyphs)
        .extend([0u16; 13])
        .into_vec()
}

/// A format 0 `name` table from `(platform, encoding, name id, string)`
/// entries.
///
/// Strings for platform 1 are written one byte per char (Latin-1), all
/// others as UTF-16BE.
pub fn name_table(entries: &[(u16, u16, u16, &str)]) -> Vec<u8> {
    let storage_offset = 6 + 12 * entries.len();
    let mut header = BeBuffer::new()
        .push(0u16)
        .push(entries.len() as u16)
        .push(storage_offset as u16);
    let mut storage = Vec::new();
    for (platform, encoding, name_id, string) in entries {
        let bytes: Vec<u8> = if *platform == 1 {
            string.chars().map(|c| c as u32 as u8).collect()
        } else {
            string.encode_utf16().flat_map(u16::to_be_bytes).collect()
        };
        header = header
            .extend([*platform, *encoding, 0x409, *name_id])
            .push(bytes.len() as u16)
            .push(storage.len() as u16);
        storage.extend(bytes);
    }
    header.extend_bytes(&storage).into_vec()
}

/// The tables of [`cff_font`].
pub fn cff_font_tables() -> Vec<(Tag, Vec<u8>)> {
    vec![
        (Tag::new(b"CFF "), cff::simple_cff().to_vec()),
        (Tag::new(b"GPOS"), gpos::gpos_table()),
        (Tag::new(b"GSUB"), gsub::gsub_table()),
        (Tag::new(b"cmap"), cmap::simple_cmap()),
        (Tag::new(b"head"), head_table(UNITS_PER_EM, 0)),
        (Tag::new(b"maxp"), maxp_table(cff::NUM_GLYPHS)),
        (
            Tag::new(b"name"),
            name_table(&[(1, 0, 1, FAMILY_NAME), (3, 1, 1, FAMILY_NAME)]),
        ),
    ]
}

/// An OpenType font with CFF outlines.
///
/// It has [`cff::NUM_GLYPHS`] glyphs, the layout tables from
/// [`gsub::gsub_table`] and [`gpos::gpos_table`], and the family name
/// [`FAMILY_NAME`].
pub fn cff_font() -> Vec<u8> {
    sfnt(CFF_SFNT_VERSION, &cff_font_tables())
}

/// Number of glyphs in [`truetype_font`].
pub const TRUETYPE_NUM_GLYPHS: u16 = 4;

/// The tables of [`truetype_font`].
pub fn truetype_font_tables() -> Vec<(Tag, Vec<u8>)> {
    // glyph 0: .notdef box, 1: 'A', 2: space (empty), 3: a composite for
    // U+1F600
    let glyf = BeBuffer::new()
        .extend([1i16, 50, 0, 450, 700])
        .extend([0u16; 3])
        .extend([2i16, 10, 0, 640, 720])
        .extend([0u16; 3])
        .extend([-1i16, -20, -200, 900, 800])
        .extend([0u16; 3]);
    let loca = BeBuffer::new().extend([0u32, 16, 32, 32, 48]);
    let bmp = cmap::cmap4(&[
        cmap::Segment::Delta {
            start: 0x20,
            end: 0x20,
            delta: -30,
        },
        cmap::Segment::Delta {
            start: 0x41,
            end: 0x41,
            delta: -64,
        },
    ]);
    let full = cmap::cmap12(&[(0x20, 0x20, 2), (0x41, 0x41, 1), (0x1F600, 0x1F600, 3)]);
    let cmap = cmap::cmap_table(&[(3, 1, bmp.as_slice()), (3, 10, full.as_slice())]);
    vec![
        (Tag::new(b"cmap"), cmap),
        (Tag::new(b"glyf"), glyf.into_vec()),
        (Tag::new(b"head"), head_table(UNITS_PER_EM, 1)),
        (Tag::new(b"loca"), loca.into_vec()),
        (Tag::new(b"maxp"), maxp_table_v1(TRUETYPE_NUM_GLYPHS)),
        (
            Tag::new(b"name"),
            name_table(&[
                (3, 1, 1, "Computer Modern TT"),
                (3, 1, 16, FAMILY_NAME),
            ]),
        ),
    ]
}

/// A TrueType font with four glyphs, long `loca` offsets and a cmap mapping
/// space, `A` and U+1F600 (the latter only in the (3, 10) subtable).
pub fn truetype_font() -> Vec<u8> {
    sfnt(TT_SFNT_VERSION, &truetype_font_tables())
}
