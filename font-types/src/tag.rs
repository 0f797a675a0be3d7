use std::fmt::{Debug, Display, Formatter};

/// An OpenType tag.
///
/// A tag is four bytes, conventionally printable ASCII padded with trailing
/// spaces. Fonts in the wild break that rule, so any four bytes are accepted
/// when reading.
///
/// Tags order bytewise, which is the order table directories and the
/// registered tag lists are sorted in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Construct a `Tag` from raw bytes.
    pub const fn new(src: &[u8; 4]) -> Tag {
        Tag(*src)
    }

    /// Create a tag from arbitrary text, truncating to four bytes or padding
    /// with trailing spaces.
    ///
    /// This never fails: it is the normalization applied to user-supplied tag
    /// text before it is compared against tags read from a font.
    pub fn from_str_lossy(src: &str) -> Self {
        let mut raw = [b' '; 4];
        for (dst, byte) in raw.iter_mut().zip(src.bytes()) {
            *dst = byte;
        }
        Tag(raw)
    }

    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0
    }
}

impl crate::raw::Scalar for Tag {
    type Raw = [u8; 4];

    fn to_raw(self) -> Self::Raw {
        self.0
    }

    fn from_raw(raw: Self::Raw) -> Self {
        Tag(raw)
    }
}

impl PartialEq<[u8; 4]> for Tag {
    fn eq(&self, other: &[u8; 4]) -> bool {
        &self.0 == other
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            if (0x20..=0x7E).contains(&byte) {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "{{0x{byte:02X}}}")?;
            }
        }
        Ok(())
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag({self})")
    }
}

// tags are serialized as their text
#[cfg(feature = "serde")]
impl serde::Serialize for Tag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Tag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str> as serde::Deserialize>::deserialize(deserializer)?;
        if s.len() > 4 {
            return Err(serde::de::Error::invalid_length(s.len(), &"at most four bytes"));
        }
        Ok(Tag::from_str_lossy(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lossy_normalization() {
        assert_eq!(Tag::from_str_lossy("liga"), Tag::new(b"liga"));
        assert_eq!(Tag::from_str_lossy("ss01x"), Tag::new(b"ss01"));
        assert_eq!(Tag::from_str_lossy("ka"), Tag::new(b"ka  "));
        assert_eq!(Tag::from_str_lossy(""), Tag::new(b"    "));
    }

    #[test]
    fn ordering_is_bytewise() {
        assert!(Tag::new(b"DFLT") < Tag::new(b"dflt"));
        assert!(Tag::new(b"TRK ") < Tag::new(b"TRKX"));
        assert_eq!(Tag::new(b"cmap"), *b"cmap");
    }

    #[test]
    fn display() {
        let bad_tag = Tag::new(&[0x19, b'z', b'-', b'X']);
        assert_eq!(bad_tag.to_string(), "{0x19}z-X");
        assert_eq!(Tag::new(b"DFLT").to_string(), "DFLT");
        assert_eq!(format!("{:?}", Tag::new(b"latn")), "Tag(latn)");
    }
}
