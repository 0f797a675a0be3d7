//! Reading the OpenType tables a typesetter needs
//!
//! This crate parses the advanced-typography tables of an OpenType or
//! TrueType font (`GSUB` and `GPOS`), the Type 2 charstrings stored in a `CFF`
//! table, and enough of the TrueType tables (`cmap`, `loca`, `glyf`) to report
//! glyph bounding boxes.
//!
//! The layout tables and the CFF structure are decoded once, eagerly, when a
//! [`Font`] is opened; structural errors are reported at that point.
//! Charstrings are interpreted on demand, one glyph at a time.
//!
//! Script, language system and feature tags are canonicalized through the
//! [`TagRegistry`].
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use typeset_fonts::Font;
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! let font = Font::new(&font_bytes).expect("failed to read font data");
//! for lookup in font.substitution_lookups("latn", None, "liga") {
//!     println!("{:?} with {} subtables", lookup.kind(), lookup.subtables().len());
//! }
//! ```
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod font;
mod font_data;
mod offset;
mod read;
mod table_directory;
mod table_provider;
pub mod tag_registry;
pub mod tables;

pub use font::Font;
pub use font_data::FontData;
pub use offset::{ResolveNullableOffset, ResolveOffset};
pub use read::{FontRead, FontReadWithArgs, ReadArgs, ReadError};
pub use table_directory::{TableDirectory, TableRecord, TtcHeader};
pub use table_provider::{TableProvider, TopLevelTable};
pub use tag_registry::{LayoutTag, RegisteredTag, TagKind, TagRegistry};

/// Public re-export of the font-types crate.
pub extern crate font_types as types;

use types::{Tag, CFF_SFNT_VERSION, TRUE_SFNT_VERSION, TTC_HEADER_TAG, TT_SFNT_VERSION};

/// Reference to the content of a font collection file.
#[derive(Clone)]
pub struct CollectionRef<'a> {
    data: FontData<'a>,
    header: TtcHeader<'a>,
}

impl<'a> CollectionRef<'a> {
    /// Creates a new reference to a font collection.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        let header = TtcHeader::read(data)?;
        if header.ttc_tag() != TTC_HEADER_TAG {
            Err(ReadError::InvalidTtc(header.ttc_tag()))
        } else {
            Ok(Self { data, header })
        }
    }

    /// Returns the number of fonts in the collection.
    pub fn len(&self) -> u32 {
        self.header.num_fonts()
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the font in the collection at the specified index.
    pub fn get(&self, index: u32) -> Result<FontRef<'a>, ReadError> {
        let offset = self
            .header
            .table_directory_offsets()
            .get(index as usize)
            .ok_or(ReadError::InvalidCollectionIndex(index))?
            .get() as usize;
        let table_dir_data = self.data.slice(offset..).ok_or(ReadError::OutOfBounds)?;
        FontRef::with_table_directory(
            self.data,
            TableDirectory::read(table_dir_data)?,
            Some(index),
        )
    }

    /// Every font in the collection, in header order.
    pub fn fonts(&self) -> impl Iterator<Item = Result<FontRef<'a>, ReadError>> + '_ {
        (0..self.len()).map(|index| self.get(index))
    }
}

/// Reference to an in-memory font.
///
/// This is a simple implementation of the [`TableProvider`] trait backed
/// by a borrowed slice containing font data.
#[derive(Clone)]
pub struct FontRef<'a> {
    data: FontData<'a>,
    table_directory: TableDirectory<'a>,
    ttc_index: Option<u32>,
    // fonts are required to have a sorted directory, but not all of them do
    table_directory_sorted: bool,
}

impl<'a> FontRef<'a> {
    /// Creates a new reference to an in-memory font backed by the given data.
    ///
    /// The data must be a single font (not a font collection) and must begin
    /// with a table directory to be considered valid.
    ///
    /// To load a font from a font collection, use [`FontRef::from_index`] instead.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        Self::with_table_directory(data, TableDirectory::read(data)?, None)
    }

    /// Opens the font at `index` in a collection file, or the single font in
    /// any other file, for which `index` must be 0.
    pub fn from_index(data: &'a [u8], index: u32) -> Result<Self, ReadError> {
        let is_collection = FontData::new(data).read_at::<Tag>(0) == Ok(TTC_HEADER_TAG);
        if is_collection {
            CollectionRef::new(data)?.get(index)
        } else if index == 0 {
            Self::new(data)
        } else {
            Err(ReadError::InvalidCollectionIndex(index))
        }
    }

    /// Returns the underlying font data.
    ///
    /// For TrueType collection files, this is the entire file.
    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    /// If the font is in a TrueType collection (ttc) file, returns the index
    /// of the font in that collection.
    pub fn ttc_index(&self) -> Option<u32> {
        self.ttc_index
    }

    /// Returns the associated table directory.
    pub fn table_directory(&self) -> &TableDirectory<'a> {
        &self.table_directory
    }

    /// Returns the data for the table with the specified tag, if present.
    ///
    /// A record with a zero offset is treated as absent.
    pub fn table_data(&self, tag: Tag) -> Option<FontData<'a>> {
        let records = self.table_directory.table_records();
        let record = if self.table_directory_sorted {
            let idx = records.binary_search_by_key(&tag, |rec| rec.tag).ok()?;
            records.get(idx)?
        } else {
            records.iter().find(|rec| rec.tag == tag)?
        };
        let start = match record.offset as usize {
            0 => return None,
            start => start,
        };
        self.data
            .slice(start..start.checked_add(record.length as usize)?)
    }

    fn with_table_directory(
        data: FontData<'a>,
        table_directory: TableDirectory<'a>,
        ttc_index: Option<u32>,
    ) -> Result<Self, ReadError> {
        let sfnt_version = table_directory.sfnt_version();
        if ![TT_SFNT_VERSION, CFF_SFNT_VERSION, TRUE_SFNT_VERSION].contains(&sfnt_version) {
            return Err(ReadError::InvalidSfnt(sfnt_version));
        }
        let table_directory_sorted = table_directory.is_sorted();
        Ok(FontRef {
            data,
            table_directory,
            ttc_index,
            table_directory_sorted,
        })
    }
}

impl<'a> TableProvider<'a> for FontRef<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>> {
        self.table_data(tag)
    }
}

#[cfg(test)]
#[path = "tests/test_font_ref.rs"]
mod tests;
