//! Offsets to tables

/// A trait for the different offset representations.
pub trait Offset: Sized + Copy {
    /// Returns this offset as a `usize`, or `None` if it is `0`.
    fn non_null(self) -> Option<usize>;
}

macro_rules! impl_offset {
    ($name:ident, $bits:literal, $rawty:ty) => {
        #[doc = concat!("A", stringify!($bits), "-bit offset to a table.")]
        ///
        /// Specific offset fields may or may not permit NULL values; however we
        /// assume that errors are possible, and expect the caller to handle
        /// the `None` case.
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name($rawty);

        impl $name {
            /// Create a new offset.
            pub const fn new(raw: $rawty) -> Self {
                Self(raw)
            }

            /// Return `true` if this offset is null.
            pub const fn is_null(self) -> bool {
                self.0 == 0
            }

            /// The offset as a `u32`.
            pub const fn to_u32(self) -> u32 {
                self.0 as u32
            }
        }

        crate::newtype_scalar!($name, <$rawty as crate::raw::Scalar>::Raw);

        impl Offset for $name {
            fn non_null(self) -> Option<usize> {
                match self.0 {
                    0 => None,
                    other => Some(other as usize),
                }
            }
        }
    };
}

impl_offset!(Offset16, 16, u16);
impl_offset!(Offset32, 32, u32);

/// An offset of a given width for which NULL (zero) is a valid value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Nullable<T>(T);

impl<T: Offset> Nullable<T> {
    /// Wrap an offset that may legitimately be null.
    pub const fn new(offset: T) -> Self {
        Self(offset)
    }

    /// Return a reference to the inner offset.
    #[inline]
    pub fn offset(&self) -> &T {
        &self.0
    }

    /// Returns the offset as a `usize`, or `None` if it is null.
    pub fn non_null(self) -> Option<usize> {
        self.0.non_null()
    }
}

impl<T: Offset + crate::raw::Scalar> crate::raw::Scalar for Nullable<T> {
    type Raw = T::Raw;

    fn to_raw(self) -> Self::Raw {
        self.0.to_raw()
    }

    fn from_raw(raw: Self::Raw) -> Self {
        Self(T::from_raw(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scalar;

    #[test]
    fn null_offsets() {
        assert_eq!(Offset16::new(0).non_null(), None);
        assert_eq!(Offset16::new(12).non_null(), Some(12));
        assert_eq!(Offset32::read(&[0, 1, 0, 0]).unwrap().non_null(), Some(65536));
        assert_eq!(Nullable::new(Offset16::new(0)).non_null(), None);
    }
}
