//! Parsing for PostScript INDEX objects.
//!
//! See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=12>

use super::Error;
use crate::{FontData, ReadError};

/// An array of variable-sized objects.
///
/// Empty indices (a lone zero count) are represented by the default value.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Index<'a> {
    count: u16,
    off_size: u8,
    offsets: &'a [u8],
    data: &'a [u8],
}

impl<'a> Index<'a> {
    /// Creates a new index from the given data.
    ///
    /// Trailing bytes beyond the end of the last object are ignored, so the
    /// data may extend past the end of the index.
    pub fn new(data: &'a [u8]) -> Result<Self, Error> {
        let mut cursor = FontData::new(data).cursor();
        let count: u16 = cursor.read()?;
        if count == 0 {
            return Ok(Self::default());
        }
        let off_size: u8 = cursor.read()?;
        if !(1..=4).contains(&off_size) {
            return Err(Error::InvalidIndexOffsetSize(off_size));
        }
        let offsets_len = (count as usize + 1) * off_size as usize;
        let offsets = cursor.read_array::<u8>(offsets_len)?;
        let data = cursor.remaining().unwrap_or_default().as_bytes();
        let mut index = Self {
            count,
            off_size,
            offsets,
            data,
        };
        let data_len = index.get_offset(count as usize)?;
        index.data = data.get(..data_len).ok_or(ReadError::OutOfBounds)?;
        Ok(index)
    }

    /// Returns the number of objects in the index.
    pub fn count(&self) -> u32 {
        self.count as u32
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Computes a bias that is added to a subroutine operator in a
    /// charstring.
    ///
    /// See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=25>
    pub fn subr_bias(&self) -> i32 {
        let count = self.count();
        if count < 1240 {
            107
        } else if count < 33900 {
            1131
        } else {
            32768
        }
    }

    /// Returns the total size in bytes of the index table.
    pub fn size_in_bytes(&self) -> usize {
        // 2 byte count + 1 byte off_size
        const HEADER_SIZE: usize = 3;
        // An empty CFF index contains only a 2 byte count field
        const EMPTY_SIZE: usize = 2;
        match self.count {
            0 => EMPTY_SIZE,
            _ => HEADER_SIZE + self.offsets.len() + self.data.len(),
        }
    }

    /// Returns the offset of the object at the given index.
    pub fn get_offset(&self, index: usize) -> Result<usize, Error> {
        read_offset(index, self.count as usize, self.off_size, self.offsets)
    }

    /// Returns the data for the object at the given index.
    pub fn get(&self, index: usize) -> Result<&'a [u8], Error> {
        let start = self.get_offset(index)?;
        let end = self.get_offset(index + 1)?;
        self.data
            .get(start..end)
            .ok_or(ReadError::OutOfBounds.into())
    }

    /// Returns an iterator over the objects in the index.
    pub fn iter(&self) -> impl Iterator<Item = Result<&'a [u8], Error>> + '_ {
        (0..self.count as usize).map(|ix| self.get(ix))
    }
}

/// Reads an offset which is encoded as a variable sized integer.
fn read_offset(
    index: usize,
    count: usize,
    offset_size: u8,
    offset_data: &[u8],
) -> Result<usize, Error> {
    // There are count + 1 entries in the offset array and offsets are
    // relative to the byte preceding the object data, so the first one
    // is always 1.
    if index > count {
        Err(ReadError::OutOfBounds)?;
    }
    if !(1..=4).contains(&offset_size) {
        return Err(Error::InvalidIndexOffsetSize(offset_size));
    }
    let start = index * offset_size as usize;
    let bytes = offset_data
        .get(start..start + offset_size as usize)
        .ok_or(ReadError::OutOfBounds)?;
    bytes
        .iter()
        .fold(0usize, |acc, byte| (acc << 8) | *byte as usize)
        .checked_sub(1)
        .ok_or(Error::ZeroOffset)
}

#[cfg(test)]
mod tests {
    use font_test_data::bebuffer::BeBuffer;

    use super::*;

    /// Builds an INDEX holding `count` objects of increasing length, where
    /// object `i` is `i + 1` copies of the byte `i`.
    fn make_index(count: u16, off_size: u8) -> BeBuffer {
        let mut buf = BeBuffer::new().push(count).push(off_size);
        let mut offset = 1u32;
        let mut objects = Vec::new();
        for i in 0..=count as u32 {
            buf = push_offset(buf, offset, off_size);
            if i < count as u32 {
                offset += i + 1;
                objects.extend(std::iter::repeat(i as u8).take(i as usize + 1));
            }
        }
        buf.extend(objects)
    }

    fn push_offset(buf: BeBuffer, offset: u32, off_size: u8) -> BeBuffer {
        let bytes = offset.to_be_bytes();
        buf.extend(bytes[4 - off_size as usize..].iter().copied())
    }

    #[test]
    fn read_each_offset_size() {
        for off_size in 1..=4 {
            let buf = make_index(5, off_size);
            let index = Index::new(&buf).unwrap();
            assert_eq!(index.count(), 5);
            assert_eq!(index.size_in_bytes(), buf.len());
            for i in 0..5 {
                let object = index.get(i).unwrap();
                assert_eq!(object.len(), i + 1);
                assert!(object.iter().all(|b| *b as usize == i));
            }
            assert!(index.get(5).is_err());
        }
    }

    #[test]
    fn empty_index() {
        let buf = BeBuffer::new().push(0u16).push(0xFFu8);
        let index = Index::new(&buf).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.size_in_bytes(), 2);
        assert_eq!(index.subr_bias(), 107);
        assert!(index.get(0).is_err());
    }

    #[test]
    fn invalid_offset_size() {
        let buf = BeBuffer::new().push(1u16).push(5u8).extend([0u8; 12]);
        assert_eq!(Index::new(&buf), Err(Error::InvalidIndexOffsetSize(5)));
    }

    #[test]
    fn zero_offset() {
        let buf = BeBuffer::new()
            .push(1u16)
            .push(1u8)
            .extend([0u8, 2])
            .push(0xAAu8);
        assert_eq!(Index::new(&buf).unwrap().get(0), Err(Error::ZeroOffset));
    }

    #[test]
    fn truncated_data() {
        let mut buf = make_index(3, 2).to_vec();
        buf.pop();
        assert!(Index::new(&buf).is_err());
    }

    #[test]
    fn subr_bias_thresholds() {
        let make = |count| Index {
            count,
            ..Default::default()
        };
        assert_eq!(make(1239).subr_bias(), 107);
        assert_eq!(make(1240).subr_bias(), 1131);
        assert_eq!(make(33899).subr_bias(), 1131);
        assert_eq!(make(33900).subr_bias(), 32768);
    }
}
