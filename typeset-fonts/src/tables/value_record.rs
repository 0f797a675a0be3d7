//! A GPOS ValueRecord

use std::ops::BitOr;

use types::{FixedSize, Nullable, Offset16};

use crate::{FontData, FontReadWithArgs, ReadArgs, ReadError};

/// The [ValueFormat](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#value-record)
/// flags, describing which fields are present in a [`ValueRecord`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueFormat(u16);

impl ValueFormat {
    pub const X_PLACEMENT: Self = ValueFormat(0x0001);
    pub const Y_PLACEMENT: Self = ValueFormat(0x0002);
    pub const X_ADVANCE: Self = ValueFormat(0x0004);
    pub const Y_ADVANCE: Self = ValueFormat(0x0008);
    pub const X_PLACEMENT_DEVICE: Self = ValueFormat(0x0010);
    pub const Y_PLACEMENT_DEVICE: Self = ValueFormat(0x0020);
    pub const X_ADVANCE_DEVICE: Self = ValueFormat(0x0040);
    pub const Y_ADVANCE_DEVICE: Self = ValueFormat(0x0080);

    /// A mask with all the device/variation index bits set
    pub const ANY_DEVICE_OR_VARIDX: Self = ValueFormat(0x0010 | 0x0020 | 0x0040 | 0x0080);

    const ALL: u16 = 0x00FF;

    /// Construct flags from a raw value, discarding reserved bits.
    pub fn from_bits_truncate(bits: u16) -> Self {
        ValueFormat(bits & Self::ALL)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Return the number of bytes required to store a [`ValueRecord`] in this format.
    #[inline]
    pub fn record_byte_len(self) -> usize {
        self.0.count_ones() as usize * u16::RAW_BYTE_LEN
    }
}

impl BitOr for ValueFormat {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        ValueFormat(self.0 | rhs.0)
    }
}

impl types::Scalar for ValueFormat {
    type Raw = <u16 as types::Scalar>::Raw;
    fn to_raw(self) -> Self::Raw {
        self.0.to_raw()
    }
    fn from_raw(raw: Self::Raw) -> Self {
        Self::from_bits_truncate(u16::from_raw(raw))
    }
}

/// A Positioning ValueRecord.
///
/// Fields missing from the record's format are `None`; the plain accessors
/// report them as zero. Device table offsets are kept as they were read and
/// are not resolved.
#[derive(Clone, Default, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueRecord {
    pub x_placement: Option<i16>,
    pub y_placement: Option<i16>,
    pub x_advance: Option<i16>,
    pub y_advance: Option<i16>,
    pub x_placement_device: Nullable<Offset16>,
    pub y_placement_device: Nullable<Offset16>,
    pub x_advance_device: Nullable<Offset16>,
    pub y_advance_device: Nullable<Offset16>,
    format: ValueFormat,
}

// the format is redundant with the fields, so it doesn't take part in equality
impl PartialEq for ValueRecord {
    fn eq(&self, other: &Self) -> bool {
        self.x_placement == other.x_placement
            && self.y_placement == other.y_placement
            && self.x_advance == other.x_advance
            && self.y_advance == other.y_advance
            && self.x_placement_device == other.x_placement_device
            && self.y_placement_device == other.y_placement_device
            && self.x_advance_device == other.x_advance_device
            && self.y_advance_device == other.y_advance_device
    }
}

impl ValueRecord {
    pub fn read(data: FontData, format: ValueFormat) -> Result<Self, ReadError> {
        let mut this = ValueRecord {
            format,
            ..Default::default()
        };
        let mut cursor = data.cursor();

        if format.contains(ValueFormat::X_PLACEMENT) {
            this.x_placement = Some(cursor.read()?);
        }
        if format.contains(ValueFormat::Y_PLACEMENT) {
            this.y_placement = Some(cursor.read()?);
        }
        if format.contains(ValueFormat::X_ADVANCE) {
            this.x_advance = Some(cursor.read()?);
        }
        if format.contains(ValueFormat::Y_ADVANCE) {
            this.y_advance = Some(cursor.read()?);
        }
        if format.contains(ValueFormat::X_PLACEMENT_DEVICE) {
            this.x_placement_device = cursor.read()?;
        }
        if format.contains(ValueFormat::Y_PLACEMENT_DEVICE) {
            this.y_placement_device = cursor.read()?;
        }
        if format.contains(ValueFormat::X_ADVANCE_DEVICE) {
            this.x_advance_device = cursor.read()?;
        }
        if format.contains(ValueFormat::Y_ADVANCE_DEVICE) {
            this.y_advance_device = cursor.read()?;
        }
        cursor.finish()?;
        Ok(this)
    }

    /// The format this record was read with.
    pub fn format(&self) -> ValueFormat {
        self.format
    }

    pub fn x_placement(&self) -> i16 {
        self.x_placement.unwrap_or_default()
    }

    pub fn y_placement(&self) -> i16 {
        self.y_placement.unwrap_or_default()
    }

    pub fn x_advance(&self) -> i16 {
        self.x_advance.unwrap_or_default()
    }

    pub fn y_advance(&self) -> i16 {
        self.y_advance.unwrap_or_default()
    }

    /// `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.format.is_empty()
    }
}

impl ReadArgs for ValueRecord {
    type Args = ValueFormat;
}

impl<'a> FontReadWithArgs<'a> for ValueRecord {
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError> {
        ValueRecord::read(data, *args)
    }
}

impl std::fmt::Debug for ValueRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut f = f.debug_struct("ValueRecord");
        self.x_placement.map(|x| f.field("x_placement", &x));
        self.y_placement.map(|y| f.field("y_placement", &y));
        self.x_advance.map(|x| f.field("x_advance", &x));
        self.y_advance.map(|y| f.field("y_advance", &y));
        for (name, device) in [
            ("x_placement_device", self.x_placement_device),
            ("y_placement_device", self.y_placement_device),
            ("x_advance_device", self.x_advance_device),
            ("y_advance_device", self.y_advance_device),
        ] {
            if let Some(offset) = device.non_null() {
                f.field(name, &offset);
            }
        }
        f.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::bebuffer::BeBuffer;

    #[test]
    fn sanity_check_format_const() {
        let format = ValueFormat::X_ADVANCE_DEVICE
            | ValueFormat::Y_ADVANCE_DEVICE
            | ValueFormat::Y_PLACEMENT_DEVICE
            | ValueFormat::X_PLACEMENT_DEVICE;
        assert_eq!(format, ValueFormat::ANY_DEVICE_OR_VARIDX);
        assert_eq!(format.record_byte_len(), 4 * 2);
    }

    #[test]
    fn unset_fields_are_zero() {
        let buf = BeBuffer::new().push(-40i16).push(0x22u16);
        let format = ValueFormat::X_ADVANCE | ValueFormat::Y_ADVANCE_DEVICE;
        let record = ValueRecord::read(FontData::new(&buf), format).unwrap();
        assert_eq!(record.x_advance, Some(-40));
        assert_eq!(record.x_placement, None);
        assert_eq!(record.x_placement(), 0);
        assert_eq!(record.y_advance(), 0);
        assert_eq!(record.y_advance_device.non_null(), Some(0x22));
        assert!(record.x_advance_device.non_null().is_none());
    }

    #[test]
    fn truncated_record() {
        let buf = BeBuffer::new().push(1i16);
        let format = ValueFormat::X_PLACEMENT | ValueFormat::X_ADVANCE;
        assert!(ValueRecord::read(FontData::new(&buf), format).is_err());
    }
}
