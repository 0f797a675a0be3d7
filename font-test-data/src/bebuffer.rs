//! small utilities for building big-endian test data

use std::collections::HashMap;

use font_types::Scalar;

/// A convenience type for generating a buffer of big-endian bytes.
#[derive(Debug, Clone, Default)]
pub struct BeBuffer {
    data: Vec<u8>,
    tagged_locations: HashMap<String, usize>,
}

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// The current length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer contains zero bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return a reference to the contents of the buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Write any scalar to this buffer.
    pub fn push(mut self, item: impl Scalar) -> Self {
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write a scalar and remember its position so it can be patched later
    /// with [`write_at`](Self::write_at).
    pub fn push_with_tag(mut self, item: impl Scalar, tag: &str) -> Self {
        self.tagged_locations
            .insert(tag.to_string(), self.data.len());
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write multiple scalars into the buffer
    pub fn extend<T: Scalar>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            self.data.extend(item.to_raw().as_ref());
        }
        self
    }

    /// Append raw bytes.
    pub fn extend_bytes(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    /// Pad with zeros to a multiple of `alignment` bytes.
    pub fn align_to(mut self, alignment: usize) -> Self {
        while self.data.len() % alignment != 0 {
            self.data.push(0);
        }
        self
    }

    pub fn offset_for(&self, tag: &str) -> usize {
        // panic on unrecognized tags
        self.tagged_locations.get(tag).copied().unwrap()
    }

    pub fn write_at(&mut self, tag: &str, item: impl Scalar) {
        let offset = self.offset_for(tag);
        let raw = item.to_raw();
        let new_data: &[u8] = raw.as_ref();
        let data = &mut self.data[offset..];
        if data.len() < new_data.len() {
            panic!("not enough room left in buffer for the requested write.");
        }
        data[..new_data.len()].copy_from_slice(new_data);
    }
}

impl std::ops::Deref for BeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl From<BeBuffer> for Vec<u8> {
    fn from(value: BeBuffer) -> Self {
        value.data
    }
}

/// Build a [`BeBuffer`] from a comma separated list of scalars.
///
/// A bracketed list is written element by element:
///
/// ```
/// # use font_test_data::be_buffer;
/// let buf = be_buffer! { 1u16, [2u8, 3], -1i16 };
/// assert_eq!(buf.as_slice(), &[0, 1, 2, 3, 0xff, 0xff]);
/// ```
#[macro_export]
macro_rules! be_buffer {
    ($($items:tt)*) => {
        $crate::be_buffer_add!($crate::bebuffer::BeBuffer::new(), $($items)*)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! be_buffer_add {
    ($buf:expr $(,)?) => {
        $buf
    };
    ($buf:expr, [$($array:expr),* $(,)?] $($rest:tt)*) => {
        $crate::be_buffer_add!($buf.extend([$($array),*]) $($rest)*)
    };
    ($buf:expr, $item:expr $(, $($rest:tt)*)?) => {
        $crate::be_buffer_add!($buf.push($item) $(, $($rest)*)?)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_and_builder_agree() {
        let from_macro = be_buffer! { 1u16, [2u8, 3], -1i16, 0x01020304u32 };
        let built = BeBuffer::new()
            .push(1u16)
            .extend([2u8, 3])
            .push(-1i16)
            .push(0x01020304u32);
        assert_eq!(from_macro.as_slice(), built.as_slice());
        assert_eq!(from_macro.len(), 10);
    }

    #[test]
    fn patch_tagged_location() {
        let mut buf = BeBuffer::new()
            .push(1u8)
            .push_with_tag(0u16, "offset")
            .push(9u8);
        buf.write_at("offset", 0xABCDu16);
        assert_eq!(buf.as_slice(), &[1, 0xAB, 0xCD, 9]);
        assert_eq!(buf.offset_for("offset"), 1);
    }
}
