//! The lookup flag type.
//!
//! This is kind-of-but-not-quite-exactly a bit enumeration, and so we implement
//! it manually.

/// The [LookupFlag](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#lookupFlag) bit enumeration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LookupFlag(u16);

impl LookupFlag {
    pub const RIGHT_TO_LEFT: u16 = 0x0001;
    pub const IGNORE_BASE_GLYPHS: u16 = 0x0002;
    pub const IGNORE_LIGATURES: u16 = 0x0004;
    pub const IGNORE_MARKS: u16 = 0x0008;
    pub const USE_MARK_FILTERING_SET: u16 = 0x0010;
    const MARK_ATTACHMENT_TYPE_MASK: u16 = 0xFF00;

    /// Construct a LookupFlag from a raw value, discarding reserved bits
    pub fn from_bits_truncate(bits: u16) -> Self {
        const RESERVED: u16 = 0x00E0;
        Self(bits & !RESERVED)
    }

    /// Raw transmutation to u16.
    pub fn to_bits(self) -> u16 {
        self.0
    }

    /// Only meaningful for cursive attachment: the last glyph of a sequence
    /// is positioned on the baseline.
    pub fn right_to_left(self) -> bool {
        (self.0 & Self::RIGHT_TO_LEFT) != 0
    }

    /// If set, skips over base glyphs
    pub fn ignore_base_glyphs(self) -> bool {
        (self.0 & Self::IGNORE_BASE_GLYPHS) != 0
    }

    /// If set, skips over ligatures
    pub fn ignore_ligatures(self) -> bool {
        (self.0 & Self::IGNORE_LIGATURES) != 0
    }

    /// If set, skips over all combining marks
    pub fn ignore_marks(self) -> bool {
        (self.0 & Self::IGNORE_MARKS) != 0
    }

    /// If set, the lookup table is followed by a MarkFilteringSet field.
    pub fn use_mark_filtering_set(self) -> bool {
        (self.0 & Self::USE_MARK_FILTERING_SET) != 0
    }

    /// If not zero, skips over all marks of attachment type different from specified.
    pub fn mark_attachment_type(self) -> Option<u16> {
        match (self.0 & Self::MARK_ATTACHMENT_TYPE_MASK) >> 8 {
            0 => None,
            class => Some(class),
        }
    }
}

impl types::Scalar for LookupFlag {
    type Raw = <u16 as types::Scalar>::Raw;
    fn to_raw(self) -> Self::Raw {
        self.0.to_raw()
    }
    fn from_raw(raw: Self::Raw) -> Self {
        Self::from_bits_truncate(u16::from_raw(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_bits() {
        let flag = LookupFlag::from_bits_truncate(0x0309);
        assert!(flag.right_to_left());
        assert!(flag.ignore_marks());
        assert!(!flag.ignore_ligatures());
        assert!(!flag.use_mark_filtering_set());
        assert_eq!(flag.mark_attachment_type(), Some(3));
    }

    #[test]
    fn reserved_bits_are_dropped() {
        let flag = LookupFlag::from_bits_truncate(0x00F0);
        assert_eq!(flag.to_bits(), 0x0010);
        assert_eq!(flag.mark_attachment_type(), None);
    }
}
