//! CFF font sets built from charstrings written in Type 2 notation

use std::{ops::Range, sync::OnceLock};

use crate::bebuffer::BeBuffer;

/// Number of glyphs in [`simple_cff`].
pub const NUM_GLYPHS: u16 = 132;

/// A glyph in [`simple_cff`] whose charstring calls a subroutine that calls
/// itself.
pub const BROKEN_GLYPH: u16 = 2;

/// Operands of the `vhcurveto` in local subroutine 0 of [`simple_cff`].
pub const SUBR0_CURVE: [i32; 16] = [
    -10, 20, 30, 40, 50, 60, 70, -80, 90, 100, -100, 90, 80, 70, 60, 50,
];

/// Encodes an integer charstring or DICT operand in the shortest form
/// shared by both formats.
pub fn int_operand(value: i32) -> Vec<u8> {
    match value {
        -107..=107 => vec![(value + 139) as u8],
        108..=1131 => {
            let v = value - 108;
            vec![(v >> 8) as u8 + 247, v as u8]
        }
        -1131..=-108 => {
            let v = -value - 108;
            vec![(v >> 8) as u8 + 251, v as u8]
        }
        _ => {
            let [hi, lo] = (value as i16).to_be_bytes();
            vec![28, hi, lo]
        }
    }
}

/// A DICT operand in the fixed size five byte encoding, for offsets.
fn long_operand(value: i32) -> Vec<u8> {
    let mut bytes = vec![29];
    bytes.extend(value.to_be_bytes());
    bytes
}

/// Serializes an INDEX using the smallest offset size that fits.
pub fn index(objects: &[Vec<u8>]) -> Vec<u8> {
    if objects.is_empty() {
        return vec![0, 0];
    }
    let data_len: usize = objects.iter().map(Vec::len).sum();
    let off_size: u8 = match data_len + 1 {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x10000..=0xFFFFFF => 3,
        _ => 4,
    };
    let mut buf = BeBuffer::new()
        .push(objects.len() as u16)
        .push(off_size)
        .into_vec();
    let mut offset = 1u32;
    let write_offset = |buf: &mut Vec<u8>, offset: u32| {
        buf.extend(&offset.to_be_bytes()[4 - off_size as usize..]);
    };
    write_offset(&mut buf, offset);
    for object in objects {
        offset += object.len() as u32;
        write_offset(&mut buf, offset);
    }
    for object in objects {
        buf.extend(object);
    }
    buf
}

fn charstring(operands_and_operators: &[&[i32]], operators: &[&[u8]]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for (operands, operator) in operands_and_operators.iter().zip(operators) {
        for operand in *operands {
            bytes.extend(int_operand(*operand));
        }
        bytes.extend(*operator);
    }
    bytes
}

const RMOVETO: &[u8] = &[21];
const HMOVETO: &[u8] = &[22];
const RLINETO: &[u8] = &[5];
const VHCURVETO: &[u8] = &[30];
const CALLSUBR: &[u8] = &[10];
const RETURN: &[u8] = &[11];
const ENDCHAR: &[u8] = &[14];

/// A name-keyed font set with one font, "CMR10", family "Computer Modern".
///
/// - glyph 0 is `endchar`
/// - glyph 1 moves, calls local subroutine 0 and ends
/// - glyph [`BROKEN_GLYPH`] calls local subroutine 1, which recurses forever
/// - every other glyph draws a small box with an explicit width of 20 over
///   nominal
///
/// The Private DICT has `defaultWidthX` 500 and `nominalWidthX` 600.
pub fn simple_cff() -> &'static [u8] {
    static DATA: OnceLock<Vec<u8>> = OnceLock::new();
    DATA.get_or_init(build_simple_cff)
}

fn build_simple_cff() -> Vec<u8> {
    let mut charstrings = Vec::with_capacity(NUM_GLYPHS as usize);
    for gid in 0..NUM_GLYPHS {
        charstrings.push(match gid {
            0 => ENDCHAR.to_vec(),
            1 => charstring(
                &[&[0, 0], &[-107], &[]],
                &[RMOVETO, CALLSUBR, ENDCHAR],
            ),
            BROKEN_GLYPH => charstring(&[&[-106], &[]], &[CALLSUBR, ENDCHAR]),
            _ => charstring(
                &[&[20, 10, 10], &[100, 0, 0, 100, -100, 0], &[]],
                &[RMOVETO, RLINETO, ENDCHAR],
            ),
        });
    }
    let subrs = vec![
        charstring(&[&SUBR0_CURVE, &[]], &[VHCURVETO, RETURN]),
        charstring(&[&[-106]], &[CALLSUBR]),
    ];
    let strings = vec![
        b"Computer Modern".to_vec(),
        b"Computer Modern Roman".to_vec(),
    ];
    let private = [int_operand(500), vec![20], int_operand(600), vec![21]].concat();
    build_font_set(
        b"CMR10",
        &strings,
        |layout| {
            [
                int_operand(391),
                vec![3],
                int_operand(392),
                vec![2],
                long_operand(layout.charstrings as i32),
                vec![17],
                long_operand(layout.private.len() as i32),
                long_operand(layout.private.start as i32),
                vec![18],
            ]
            .concat()
        },
        &index(&charstrings),
        vec![(private, Some(index(&subrs)))],
    )
}

/// A CID-keyed font set with two glyphs and two Font DICTs.
///
/// Glyph 0 uses Font DICT 0 (`defaultWidthX` 100, no local subroutines),
/// glyph 1 uses Font DICT 1 (`defaultWidthX` 200, one local subroutine that
/// draws a line). Both glyphs call local subroutine 0.
pub fn cid_cff() -> Vec<u8> {
    let glyph = charstring(&[&[0], &[-107], &[]], &[HMOVETO, CALLSUBR, ENDCHAR]);
    let charstrings = index(&[glyph.clone(), glyph]);
    let subrs = index(&[charstring(&[&[5, 6], &[]], &[RLINETO, RETURN])]);
    let private0 = [int_operand(100), vec![20]].concat();
    let private1 = [int_operand(200), vec![20]].concat();
    let strings = vec![b"Adobe".to_vec(), b"Identity".to_vec()];
    build_font_set(
        b"CIDFont",
        &strings,
        |layout| {
            [
                int_operand(391),
                int_operand(392),
                int_operand(0),
                vec![12, 30],
                long_operand(layout.charstrings as i32),
                vec![17],
                long_operand(layout.fd_array as i32),
                vec![12, 36],
                long_operand(layout.fd_select as i32),
                vec![12, 37],
            ]
            .concat()
        },
        &charstrings,
        vec![(private0, None), (private1, Some(subrs))],
    )
}

/// Where the pieces following the fixed header INDEXes are placed.
struct Layout {
    charstrings: usize,
    /// The first Private DICT.
    private: Range<usize>,
    /// Start of the FDSelect and FDArray, if the font is CID-keyed.
    fd_select: usize,
    fd_array: usize,
}

/// Lays out a font set with a single font.
///
/// With more than one Private DICT the font is CID-keyed: an FDSelect
/// (format 0, glyph n uses Font DICT n) and an FDArray are written after
/// the charstrings. A `Subrs` entry is appended to each Private DICT that
/// has local subroutines, which directly follow the DICT.
fn build_font_set(
    name: &[u8],
    strings: &[Vec<u8>],
    top_dict: impl Fn(&Layout) -> Vec<u8>,
    charstrings: &[u8],
    privates: Vec<(Vec<u8>, Option<Vec<u8>>)>,
) -> Vec<u8> {
    let header = [1u8, 0, 4, 4];
    let names = index(&[name.to_vec()]);
    let strings = index(strings);
    let global_subrs = index(&[]);
    let is_cid = privates.len() > 1;
    // offsets in the top DICT are always five bytes, so its size is known
    // before the layout is
    let top_dict_len = top_dict(&Layout {
        charstrings: 0,
        private: 0..0,
        fd_select: 0,
        fd_array: 0,
    })
    .len();
    let charstrings_start = header.len()
        + names.len()
        + index(&[vec![0; top_dict_len]]).len()
        + strings.len()
        + global_subrs.len();
    // each entry is the DICT followed by its subroutines, and the DICT size
    let (privates, private_lens): (Vec<Vec<u8>>, Vec<usize>) = privates
        .into_iter()
        .map(|(mut dict, subrs)| {
            if let Some(subrs) = subrs {
                let subrs_offset = dict.len() + 6;
                dict.extend(long_operand(subrs_offset as i32));
                dict.push(19);
                let len = dict.len();
                dict.extend(subrs);
                (dict, len)
            } else {
                let len = dict.len();
                (dict, len)
            }
        })
        .unzip();
    let mut pos = charstrings_start + charstrings.len();
    let mut fd_select = Vec::new();
    let fd_select_start = pos;
    let mut fd_array = 0;
    let mut font_dicts_len = 0;
    if is_cid {
        fd_select.push(0u8);
        fd_select.extend(0..privates.len() as u8);
        fd_array = pos + fd_select.len();
        // each Font DICT holds a single Private entry of two long operands
        font_dicts_len = index(&vec![vec![0; 11]; privates.len()]).len();
    }
    pos += fd_select.len() + font_dicts_len;
    let mut private_ranges = Vec::new();
    for (dict, len) in privates.iter().zip(&private_lens) {
        private_ranges.push(pos..pos + len);
        pos += dict.len();
    }
    let mut font_dicts = Vec::new();
    if is_cid {
        let dicts: Vec<Vec<u8>> = private_ranges
            .iter()
            .map(|range| {
                [
                    long_operand(range.len() as i32),
                    long_operand(range.start as i32),
                    vec![18],
                ]
                .concat()
            })
            .collect();
        font_dicts = index(&dicts);
    }
    let layout = Layout {
        charstrings: charstrings_start,
        private: private_ranges.first().cloned().unwrap_or(0..0),
        fd_select: fd_select_start,
        fd_array,
    };
    let top_dicts = index(&[top_dict(&layout)]);
    [
        &header[..],
        &names,
        &top_dicts,
        &strings,
        &global_subrs,
        charstrings,
        &fd_select,
        &font_dicts,
        &privates.concat(),
    ]
    .concat()
}
