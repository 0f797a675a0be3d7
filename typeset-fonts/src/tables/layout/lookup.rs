//! Lookups and the lookup list

use types::{BigEndian, Offset, Offset16, Offset32};

use super::{read_offset_array, LookupFlag};
use crate::{FontData, FontRead, ReadError};

/// A subtable type stored in a [`Lookup`].
///
/// This is implemented by the `GSUB` and `GPOS` subtable enums, and lets the
/// shared lookup code dispatch on the lookup type.
pub trait LookupSubtable: Sized {
    /// The lookup type used for extension subtables (7 in GSUB, 9 in GPOS).
    const EXTENSION_TYPE: u16;

    /// A typed view of the lookup type.
    type Kind: From<u16> + Copy + std::fmt::Debug;

    /// Read a subtable of the given (non-extension) lookup type.
    fn read_subtable(lookup_type: u16, data: FontData) -> Result<Self, ReadError>;
}

/// The [LookupList](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#lookup-list-table) table.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupList<T> {
    lookups: Vec<Lookup<T>>,
}

impl<T> LookupList<T> {
    pub fn lookups(&self) -> &[Lookup<T>] {
        &self.lookups
    }

    pub fn get(&self, index: u16) -> Option<&Lookup<T>> {
        self.lookups.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.lookups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty()
    }
}

impl<'a, T: LookupSubtable> FontRead<'a> for LookupList<T> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let lookups = read_offset_array(data, &mut cursor)?;
        Ok(LookupList { lookups })
    }
}

/// A [Lookup](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#lookup-table) table.
///
/// Extension subtables are unwrapped when the lookup is read: `lookup_type`
/// is the type of the wrapped subtables, and `subtables` holds them directly.
#[derive(Clone, Debug, PartialEq)]
pub struct Lookup<T> {
    lookup_type: u16,
    is_extension: bool,
    lookup_flag: LookupFlag,
    subtables: Vec<T>,
    mark_filtering_set: Option<u16>,
}

impl<T: LookupSubtable> Lookup<T> {
    /// The lookup type, after resolving extensions.
    pub fn lookup_type(&self) -> u16 {
        self.lookup_type
    }

    pub fn kind(&self) -> T::Kind {
        self.lookup_type.into()
    }

    /// `true` if the subtables were stored behind extension subtables.
    pub fn is_extension(&self) -> bool {
        self.is_extension
    }

    pub fn lookup_flag(&self) -> LookupFlag {
        self.lookup_flag
    }

    /// Subtables in table order.
    pub fn subtables(&self) -> &[T] {
        &self.subtables
    }

    /// Index into the GDEF mark glyph sets, if the lookup flag requests one.
    pub fn mark_filtering_set(&self) -> Option<u16> {
        self.mark_filtering_set
    }
}

impl<'a, T: LookupSubtable> FontRead<'a> for Lookup<T> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let lookup_type: u16 = cursor.read()?;
        let lookup_flag: LookupFlag = cursor.read()?;
        let count: u16 = cursor.read()?;
        let offsets = cursor.read_array::<BigEndian<Offset16>>(count as usize)?;
        let mark_filtering_set = if lookup_flag.use_mark_filtering_set() {
            Some(cursor.read()?)
        } else {
            None
        };
        cursor.finish()?;

        let is_extension = lookup_type == T::EXTENSION_TYPE;
        let mut resolved_type = (!is_extension).then_some(lookup_type);
        let subtables = offsets
            .iter()
            .map(|offset| {
                let subtable_data = offset
                    .get()
                    .non_null()
                    .ok_or(ReadError::NullOffset)
                    .and_then(|off| data.split_off(off).ok_or(ReadError::OutOfBounds))?;
                if !is_extension {
                    return T::read_subtable(lookup_type, subtable_data);
                }
                let (extension_type, wrapped) = read_extension(subtable_data)?;
                if extension_type == T::EXTENSION_TYPE {
                    return Err(ReadError::MalformedData("extension wraps an extension"));
                }
                if resolved_type.is_some_and(|ty| ty != extension_type) {
                    return Err(ReadError::MalformedData(
                        "extension subtables have different lookup types",
                    ));
                }
                resolved_type = Some(extension_type);
                T::read_subtable(extension_type, wrapped)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Lookup {
            lookup_type: resolved_type.unwrap_or(lookup_type),
            is_extension,
            lookup_flag,
            subtables,
            mark_filtering_set,
        })
    }
}

/// Read an extension subtable (format 1), returning the wrapped type and data.
fn read_extension(data: FontData) -> Result<(u16, FontData), ReadError> {
    let mut cursor = data.cursor();
    let format: u16 = cursor.read()?;
    if format != 1 {
        return Err(ReadError::InvalidFormat(format.into()));
    }
    let extension_type: u16 = cursor.read()?;
    let offset: Offset32 = cursor.read()?;
    let wrapped = offset
        .non_null()
        .ok_or(ReadError::NullOffset)
        .and_then(|off| data.split_off(off).ok_or(ReadError::OutOfBounds))?;
    Ok((extension_type, wrapped))
}
