//! raw font bytes

use std::ops::{Range, RangeBounds};

use bytemuck::AnyBitPattern;
use types::{FixedSize, Scalar};

use crate::read::ReadError;

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that provides convenience methods
/// for parsing and validating that data.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

/// A cursor for validating bytes during parsing.
///
/// Reads advance the cursor even when they fail, so the first error is the
/// one that gets reported.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> FontData<'a> {
    /// Empty data, useful for some tests and examples
    pub const EMPTY: FontData<'static> = FontData { bytes: &[] };

    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns self[pos..]
    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(|bytes| FontData { bytes })
    }

    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(|bytes| FontData { bytes })
    }

    /// Read a scalar at the provided location in the data.
    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        let end = offset
            .checked_add(T::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        self.bytes
            .get(offset..end)
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    fn check_in_bounds(&self, offset: usize) -> Result<(), ReadError> {
        self.bytes
            .get(..offset)
            .ok_or(ReadError::OutOfBounds)
            .map(|_| ())
    }

    /// Interpret the bytes in `range` as a slice of some type `T`.
    ///
    /// `T` is generally `u8` or [`BigEndian<_>`](types::BigEndian).
    pub fn read_array<T: AnyBitPattern + FixedSize>(
        &self,
        range: Range<usize>,
    ) -> Result<&'a [T], ReadError> {
        let bytes = self.bytes.get(range).ok_or(ReadError::OutOfBounds)?;
        if bytes.len() % std::mem::size_of::<T>() != 0 {
            return Err(ReadError::InvalidArrayLen);
        };
        bytemuck::try_cast_slice(bytes).map_err(|_| ReadError::InvalidArrayLen)
    }

    pub(crate) fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    /// Return the data as a byte slice
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> Cursor<'a> {
    pub(crate) fn advance<T: Scalar>(&mut self) {
        self.pos = self.pos.saturating_add(T::RAW_BYTE_LEN);
    }

    pub(crate) fn advance_by(&mut self, n_bytes: usize) {
        self.pos = self.pos.saturating_add(n_bytes);
    }

    pub(crate) fn read<T: Scalar>(&mut self) -> Result<T, ReadError> {
        let temp = self.data.read_at(self.pos);
        self.advance::<T>();
        temp
    }

    pub(crate) fn read_array<T: AnyBitPattern + FixedSize>(
        &mut self,
        n_elem: usize,
    ) -> Result<&'a [T], ReadError> {
        let len = n_elem
            .checked_mul(T::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        let end = self.pos.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        let temp = self.data.read_array(self.pos..end);
        self.pos = end;
        temp
    }

    /// The data that has not yet been consumed.
    pub(crate) fn remaining(&self) -> Option<FontData<'a>> {
        self.data.split_off(self.pos)
    }

    // used when handling fields with an implicit length, which must be at the
    // end of a table.
    pub(crate) fn remaining_bytes(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Confirm that everything read so far was in bounds.
    pub(crate) fn finish(self) -> Result<(), ReadError> {
        self.data.check_in_bounds(self.pos)
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for FontData<'a> {
    fn from(src: &'a [u8]) -> FontData<'a> {
        FontData::new(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::BigEndian;

    #[test]
    fn cursor_reads_in_order() {
        let data = FontData::new(&[0, 1, 0, 2, 0xff, 0xfe, 9]);
        let mut cursor = data.cursor();
        assert_eq!(cursor.read::<u16>().unwrap(), 1);
        assert_eq!(cursor.read::<u16>().unwrap(), 2);
        assert_eq!(cursor.read::<i16>().unwrap(), -2);
        assert_eq!(cursor.remaining_bytes(), 1);
        assert!(cursor.read::<u16>().is_err());
        assert!(cursor.finish().is_err());
    }

    #[test]
    fn arrays() {
        let data = FontData::new(&[0, 1, 0, 2, 0, 3]);
        let array: &[BigEndian<u16>] = data.read_array(0..6).unwrap();
        assert_eq!(array.iter().map(|x| x.get()).collect::<Vec<_>>(), [1, 2, 3]);
        assert!(matches!(
            data.read_array::<BigEndian<u16>>(0..5),
            Err(ReadError::InvalidArrayLen)
        ));
        assert!(matches!(
            data.read_array::<BigEndian<u16>>(4..8),
            Err(ReadError::OutOfBounds)
        ));
    }
}
