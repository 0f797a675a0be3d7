//! Parsing for CFF FDSelect tables.

use types::GlyphId;

use crate::{FontData, FontReadWithArgs, ReadArgs, ReadError};

/// Maps glyphs to the Font DICT (and so the Private DICT and local
/// subroutines) of a CID-keyed font.
///
/// Reading requires the number of glyphs in the font.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FdSelect<'a> {
    /// One font index per glyph.
    Format0 { fds: &'a [u8] },
    /// Ranges of glyphs sharing a font index, terminated by a sentinel glyph.
    Format3 {
        ranges: Vec<FdRange>,
        sentinel: u16,
    },
}

/// A range record in a format 3 FDSelect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FdRange {
    pub first: u16,
    pub fd: u8,
}

impl FdSelect<'_> {
    pub fn format(&self) -> u8 {
        match self {
            Self::Format0 { .. } => 0,
            Self::Format3 { .. } => 3,
        }
    }

    /// Returns the associated font DICT index for the given glyph identifier.
    pub fn font_index(&self, glyph_id: GlyphId) -> Option<u8> {
        match self {
            Self::Format0 { fds } => fds.get(glyph_id.to_u16() as usize).copied(),
            Self::Format3 { ranges, sentinel } => {
                let gid = glyph_id.to_u16();
                if gid >= *sentinel {
                    return None;
                }
                let ix = match ranges.binary_search_by(|range| range.first.cmp(&gid)) {
                    Ok(ix) => ix,
                    Err(ix) => ix.checked_sub(1)?,
                };
                Some(ranges.get(ix)?.fd)
            }
        }
    }
}

impl ReadArgs for FdSelect<'_> {
    type Args = u16;
}

impl<'a> FontReadWithArgs<'a> for FdSelect<'a> {
    fn read_with_args(data: FontData<'a>, num_glyphs: &u16) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u8 = cursor.read()?;
        match format {
            0 => Ok(Self::Format0 {
                fds: cursor.read_array(*num_glyphs as usize)?,
            }),
            3 => {
                let n_ranges: u16 = cursor.read()?;
                let mut ranges = Vec::with_capacity(n_ranges as usize);
                for _ in 0..n_ranges {
                    let first: u16 = cursor.read()?;
                    let fd: u8 = cursor.read()?;
                    ranges.push(FdRange { first, fd });
                }
                let sentinel: u16 = cursor.read()?;
                cursor.finish()?;
                let sorted = ranges
                    .windows(2)
                    .all(|pair| pair[0].first < pair[1].first);
                if !sorted || ranges.first().is_some_and(|range| range.first != 0) {
                    return Err(ReadError::MalformedData("FDSelect ranges out of order"));
                }
                Ok(Self::Format3 { ranges, sentinel })
            }
            other => Err(ReadError::InvalidFormat(other as i64)),
        }
    }
}
