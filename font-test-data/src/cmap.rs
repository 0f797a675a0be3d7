//! cmap subtables and tables
//!
//! <https://learn.microsoft.com/en-us/typography/opentype/spec/cmap>

use crate::{be_buffer, bebuffer::BeBuffer};

/// A segment of a format 4 subtable.
#[derive(Clone, Copy, Debug)]
pub enum Segment<'a> {
    /// `start..=end` maps to `code + delta`, modulo 65536.
    Delta { start: u16, end: u16, delta: i16 },
    /// Consecutive codes from `start` map to the given glyphs through the
    /// glyph id array. A 0 entry is unmapped.
    Glyphs { start: u16, glyphs: &'a [u16] },
}

impl Segment<'_> {
    fn start(&self) -> u16 {
        match self {
            Segment::Delta { start, .. } | Segment::Glyphs { start, .. } => *start,
        }
    }

    fn end(&self) -> u16 {
        match self {
            Segment::Delta { end, .. } => *end,
            Segment::Glyphs { start, glyphs } => start + glyphs.len() as u16 - 1,
        }
    }
}

fn search_params(count: u16, unit_size: u16) -> (u16, u16, u16) {
    let mut entry_selector = 0u16;
    while 1u32 << (entry_selector + 1) <= count as u32 {
        entry_selector += 1;
    }
    let search_range = (1u16 << entry_selector) * unit_size;
    (search_range, entry_selector, count * unit_size - search_range)
}

/// A format 4 subtable.
///
/// The required final segment for 0xFFFF is appended.
pub fn cmap4(segments: &[Segment]) -> Vec<u8> {
    let seg_count = segments.len() as u16 + 1;
    let (search_range, entry_selector, range_shift) = search_params(seg_count, 2);
    let mut glyph_id_array = Vec::new();
    let mut range_offsets = Vec::new();
    for (i, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Delta { .. } => range_offsets.push(0u16),
            Segment::Glyphs { glyphs, .. } => {
                // relative to the position of this idRangeOffset entry
                let offset = (seg_count - i as u16) * 2 + glyph_id_array.len() as u16 * 2;
                range_offsets.push(offset);
                glyph_id_array.extend_from_slice(glyphs);
            }
        }
    }
    range_offsets.push(0);
    let delta = |segment: &Segment| match segment {
        Segment::Delta { delta, .. } => *delta,
        Segment::Glyphs { .. } => 0,
    };
    let length = 16 + 8 * seg_count + 2 * glyph_id_array.len() as u16;
    be_buffer!(
        4u16, length, 0u16,
        seg_count * 2, search_range, entry_selector, range_shift
    )
    .extend(segments.iter().map(Segment::end).chain([0xFFFF]))
    .push(0u16)
    .extend(segments.iter().map(Segment::start).chain([0xFFFF]))
    .extend(segments.iter().map(delta).chain([1]))
    .extend(range_offsets)
    .extend(glyph_id_array)
    .into_vec()
}

/// A format 12 subtable from `(start_char, end_char, start_glyph)` groups.
pub fn cmap12(groups: &[(u32, u32, u32)]) -> Vec<u8> {
    let length = 16 + 12 * groups.len() as u32;
    let mut buf = be_buffer! { 12u16, 0u16, length, 0u32, groups.len() as u32 };
    for (start, end, glyph) in groups {
        buf = buf.extend([*start, *end, *glyph]);
    }
    buf.into_vec()
}

/// A format 0 subtable mapping `code` to `glyphs[code]` for the first
/// `glyphs.len()` codes.
pub fn cmap0(glyphs: &[u8]) -> Vec<u8> {
    let mut array = [0u8; 256];
    array[..glyphs.len()].copy_from_slice(glyphs);
    be_buffer!(0u16, 262u16, 0u16).extend(array).into_vec()
}

/// A format 6 subtable mapping codes from `first_code` to `glyphs`.
pub fn cmap6(first_code: u16, glyphs: &[u16]) -> Vec<u8> {
    let length = 10 + 2 * glyphs.len() as u16;
    be_buffer!(6u16, length, 0u16, first_code, glyphs.len() as u16)
        .extend(glyphs.iter().copied())
        .into_vec()
}

/// A cmap table with one encoding record per `(platform, encoding,
/// subtable)` entry. Records must be given in sorted order.
pub fn cmap_table(records: &[(u16, u16, &[u8])]) -> Vec<u8> {
    let header_len = 4 + 8 * records.len();
    let mut buf = BeBuffer::new().push(0u16).push(records.len() as u16);
    let mut offset = header_len as u32;
    for (platform, encoding, subtable) in records {
        buf = buf.push(*platform).push(*encoding).push(offset);
        offset += subtable.len() as u32;
    }
    records
        .iter()
        .fold(buf, |buf, (_, _, subtable)| buf.extend_bytes(subtable))
        .into_vec()
}

/// Glyphs mapped by [`simple_cmap`].
pub const LATIN_CAPITALS: std::ops::RangeInclusive<u16> = 0x41..=0x5A;
/// The first glyph of the dashes segment.
pub const EN_DASH_GLYPH: u16 = 100;

/// A cmap with Unicode BMP subtables for platforms 0 and 3 and a full
/// repertoire subtable for (3, 10).
///
/// - `A`..=`Z` map to glyphs 1..=26
/// - U+2013 maps to 100, U+2014 is unmapped, U+2015 maps to 101
/// - (3, 10) additionally maps U+1F600..=U+1F602 to 120..=122
pub fn simple_cmap() -> Vec<u8> {
    let bmp = cmap4(&[
        Segment::Delta {
            start: *LATIN_CAPITALS.start(),
            end: *LATIN_CAPITALS.end(),
            delta: -64,
        },
        Segment::Glyphs {
            start: 0x2013,
            glyphs: &[EN_DASH_GLYPH, 0, EN_DASH_GLYPH + 1],
        },
    ]);
    let full = cmap12(&[
        (0x41, 0x5A, 1),
        (0x2013, 0x2013, 100),
        (0x2015, 0x2015, 101),
        (0x1F600, 0x1F602, 120),
    ]);
    cmap_table(&[
        (0, 3, bmp.as_slice()),
        (3, 1, bmp.as_slice()),
        (3, 10, full.as_slice()),
    ])
}
