//! The [name (Naming)](https://docs.microsoft.com/en-us/typography/opentype/spec/name) table

use types::{BigEndian, Tag};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// Name ID of the font family name.
pub const FAMILY_NAME: u16 = 1;
/// Name ID of the typographic family name, preferred over [`FAMILY_NAME`]
/// when present.
pub const TYPOGRAPHIC_FAMILY_NAME: u16 = 16;

/// The [name (Naming)](https://docs.microsoft.com/en-us/typography/opentype/spec/name) table.
#[derive(Clone, Debug)]
pub struct Name<'a> {
    version: u16,
    name_records: Vec<NameRecord>,
    string_data: FontData<'a>,
}

/// An entry in the name table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NameRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    pub length: u16,
    /// Offset from the start of the string storage.
    pub string_offset: u16,
}

/// The encoding of a name string, determined by its platform and encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    Utf16Be,
    /// Only the ASCII range is decoded; other bytes become U+FFFD.
    MacRoman,
    Unknown,
}

impl Encoding {
    pub fn new(platform_id: u16, encoding_id: u16) -> Encoding {
        match (platform_id, encoding_id) {
            (0, _) => Encoding::Utf16Be,
            (1, 0) => Encoding::MacRoman,
            (3, 0 | 1 | 10) => Encoding::Utf16Be,
            _ => Encoding::Unknown,
        }
    }
}

impl TopLevelTable for Name<'_> {
    const TAG: Tag = Tag::new(b"name");
}

impl<'a> FontRead<'a> for Name<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: u16 = cursor.read()?;
        if version > 1 {
            return Err(ReadError::InvalidFormat(version.into()));
        }
        let count: u16 = cursor.read()?;
        let storage_offset: u16 = cursor.read()?;
        let name_records = cursor
            .read_array::<BigEndian<u16>>(count as usize * 6)?
            .chunks_exact(6)
            .map(|rec| NameRecord {
                platform_id: rec[0].get(),
                encoding_id: rec[1].get(),
                language_id: rec[2].get(),
                name_id: rec[3].get(),
                length: rec[4].get(),
                string_offset: rec[5].get(),
            })
            .collect();
        let string_data = data
            .split_off(storage_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(Name {
            version,
            name_records,
            string_data,
        })
    }
}

impl<'a> Name<'a> {
    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn name_records(&self) -> &[NameRecord] {
        &self.name_records
    }

    /// Decodes the string of a record.
    ///
    /// Returns `Ok(None)` if the record's encoding is not supported.
    pub fn string(&self, record: &NameRecord) -> Result<Option<String>, ReadError> {
        let start = record.string_offset as usize;
        let bytes = self
            .string_data
            .as_bytes()
            .get(start..start + record.length as usize)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(match Encoding::new(record.platform_id, record.encoding_id) {
            Encoding::Utf16Be => Some(decode_utf16_be(bytes)),
            Encoding::MacRoman => Some(
                bytes
                    .iter()
                    .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
                    .collect(),
            ),
            Encoding::Unknown => None,
        })
    }

    /// Returns the first decodable string with the given name ID.
    pub fn find(&self, name_id: u16) -> Result<Option<String>, ReadError> {
        for record in self.name_records.iter().filter(|rec| rec.name_id == name_id) {
            if let Some(string) = self.string(record)? {
                return Ok(Some(string));
            }
        }
        Ok(None)
    }

    /// The family name: the typographic family name if present, otherwise
    /// the legacy family name.
    pub fn family_name(&self) -> Result<Option<String>, ReadError> {
        match self.find(TYPOGRAPHIC_FAMILY_NAME)? {
            Some(name) => Ok(Some(name)),
            None => self.find(FAMILY_NAME),
        }
    }
}

fn decode_utf16_be(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

#[cfg(test)]
mod tests {
    use font_test_data::sfnt::name_table;

    use super::*;

    #[test]
    fn typographic_family_is_preferred() {
        let data = name_table(&[
            (3, 1, FAMILY_NAME, "CMR"),
            (3, 1, TYPOGRAPHIC_FAMILY_NAME, "Computer Modern"),
        ]);
        let name = Name::read(FontData::new(&data)).unwrap();
        assert_eq!(name.name_records().len(), 2);
        assert_eq!(name.family_name().unwrap().as_deref(), Some("Computer Modern"));
    }

    #[test]
    fn legacy_family_and_mac_roman() {
        let data = name_table(&[(1, 0, FAMILY_NAME, "Caf\u{e9}"), (3, 1, 4, "Full")]);
        let name = Name::read(FontData::new(&data)).unwrap();
        // the Mac Roman record is written as Latin-1 by the builder; the
        // byte above ASCII is replaced
        assert_eq!(name.family_name().unwrap().as_deref(), Some("Caf\u{FFFD}"));
        assert_eq!(name.find(4).unwrap().as_deref(), Some("Full"));
        assert_eq!(name.find(6).unwrap(), None);
    }

    #[test]
    fn unknown_encodings_are_skipped() {
        let data = name_table(&[(2, 0, FAMILY_NAME, "ISO"), (0, 3, FAMILY_NAME, "Uni")]);
        let name = Name::read(FontData::new(&data)).unwrap();
        assert_eq!(name.family_name().unwrap().as_deref(), Some("Uni"));
    }

    #[test]
    fn string_out_of_bounds() {
        let mut data = name_table(&[(3, 1, FAMILY_NAME, "Family")]);
        data.truncate(data.len() - 2);
        let name = Name::read(FontData::new(&data)).unwrap();
        assert_eq!(name.family_name(), Err(ReadError::OutOfBounds));
    }
}
