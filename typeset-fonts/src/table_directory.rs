//! The [table directory](https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory)
//! and [collection header](https://learn.microsoft.com/en-us/typography/opentype/spec/otff#ttc-header).

use types::{BigEndian, Tag};

use crate::{FontData, FontRead, ReadError};

/// The OpenType table directory.
#[derive(Clone, Debug)]
pub struct TableDirectory<'a> {
    sfnt_version: u32,
    table_records: Vec<TableRecord>,
    data: FontData<'a>,
}

/// A record in the table directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableRecord {
    /// Table identifier.
    pub tag: Tag,
    /// Checksum for the table.
    pub checksum: u32,
    /// Offset from the beginning of the font data.
    pub offset: u32,
    /// Length of the table.
    pub length: u32,
}

impl<'a> TableDirectory<'a> {
    /// The version of the sfnt container; one of the `*_SFNT_VERSION` constants
    /// for valid fonts.
    pub fn sfnt_version(&self) -> u32 {
        self.sfnt_version
    }

    /// Number of tables.
    pub fn num_tables(&self) -> u16 {
        self.table_records.len() as u16
    }

    /// Table records, in the order they appear in the font.
    pub fn table_records(&self) -> &[TableRecord] {
        &self.table_records
    }

    /// The bytes this directory was read from.
    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }

    pub(crate) fn is_sorted(&self) -> bool {
        self.table_records
            .windows(2)
            .all(|pair| pair[0].tag < pair[1].tag)
    }
}

impl<'a> FontRead<'a> for TableDirectory<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let sfnt_version: u32 = cursor.read()?;
        let num_tables: u16 = cursor.read()?;
        // searchRange, entrySelector, rangeShift
        cursor.advance_by(6);
        let table_records = (0..num_tables)
            .map(|_| {
                Ok::<_, ReadError>(TableRecord {
                    tag: cursor.read()?,
                    checksum: cursor.read()?,
                    offset: cursor.read()?,
                    length: cursor.read()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        cursor.finish()?;
        Ok(TableDirectory {
            sfnt_version,
            table_records,
            data,
        })
    }
}

/// The header of a TrueType collection file.
#[derive(Clone, Debug)]
pub struct TtcHeader<'a> {
    ttc_tag: Tag,
    major_version: u16,
    minor_version: u16,
    table_directory_offsets: &'a [BigEndian<u32>],
}

impl<'a> TtcHeader<'a> {
    /// Font Collection ID string: "ttcf"
    pub fn ttc_tag(&self) -> Tag {
        self.ttc_tag
    }

    /// Major and minor version of the TTC Header.
    pub fn version(&self) -> (u16, u16) {
        (self.major_version, self.minor_version)
    }

    /// Number of fonts in TTC.
    pub fn num_fonts(&self) -> u32 {
        self.table_directory_offsets.len() as u32
    }

    /// Array of offsets to the table directory for each font, from the
    /// beginning of the file.
    pub fn table_directory_offsets(&self) -> &'a [BigEndian<u32>] {
        self.table_directory_offsets
    }
}

impl<'a> FontRead<'a> for TtcHeader<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let ttc_tag = cursor.read()?;
        let major_version = cursor.read()?;
        let minor_version = cursor.read()?;
        let num_fonts: u32 = cursor.read()?;
        let table_directory_offsets = cursor.read_array(num_fonts as usize)?;
        Ok(TtcHeader {
            ttc_tag,
            major_version,
            minor_version,
            table_directory_offsets,
        })
    }
}
