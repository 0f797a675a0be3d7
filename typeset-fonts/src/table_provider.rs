//! a trait for things that can serve font tables

use types::Tag;

use crate::{
    tables::{self, cff::Cff, gpos::Gpos, gsub::Gsub},
    FontData, FontRead, FontReadWithArgs, ReadError,
};

/// A table that has an associated tag.
///
/// This is true of top-level tables, but not their various subtables.
pub trait TopLevelTable {
    /// The table's tag.
    const TAG: Tag;
}

/// An interface for accessing tables from a font (or font-like object)
pub trait TableProvider<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>>;

    fn expect_data_for_tag(&self, tag: Tag) -> Result<FontData<'a>, ReadError> {
        self.data_for_tag(tag).ok_or(ReadError::TableIsMissing(tag))
    }

    /// Read a top-level table, returning `Ok(None)` if it is not present.
    fn optional_table<T: TopLevelTable + FontRead<'a>>(&self) -> Result<Option<T>, ReadError> {
        self.data_for_tag(T::TAG).map(T::read).transpose()
    }

    fn head(&self) -> Result<tables::head::Head, ReadError> {
        self.expect_data_for_tag(tables::head::Head::TAG)
            .and_then(FontRead::read)
    }

    fn maxp(&self) -> Result<tables::maxp::Maxp, ReadError> {
        self.expect_data_for_tag(tables::maxp::Maxp::TAG)
            .and_then(FontRead::read)
    }

    fn name(&self) -> Result<tables::name::Name<'a>, ReadError> {
        self.expect_data_for_tag(tables::name::Name::TAG)
            .and_then(FontRead::read)
    }

    fn cmap(&self) -> Result<tables::cmap::Cmap<'a>, ReadError> {
        self.expect_data_for_tag(tables::cmap::Cmap::TAG)
            .and_then(FontRead::read)
    }

    fn loca(&self, is_long: Option<bool>) -> Result<tables::loca::Loca<'a>, ReadError> {
        let is_long = match is_long {
            Some(is_long) => is_long,
            None => self.head()?.index_to_loc_format == 1,
        };
        self.expect_data_for_tag(tables::loca::Loca::TAG)
            .and_then(|data| FontReadWithArgs::read_with_args(data, &is_long))
    }

    fn glyf(&self) -> Result<tables::glyf::Glyf<'a>, ReadError> {
        self.expect_data_for_tag(tables::glyf::Glyf::TAG)
            .and_then(FontRead::read)
    }

    fn gsub(&self) -> Result<Gsub, ReadError> {
        self.expect_data_for_tag(Gsub::TAG).and_then(FontRead::read)
    }

    fn gpos(&self) -> Result<Gpos, ReadError> {
        self.expect_data_for_tag(Gpos::TAG).and_then(FontRead::read)
    }

    fn cff(&self) -> Result<Cff<'a>, ReadError> {
        self.expect_data_for_tag(Cff::TAG).and_then(FontRead::read)
    }
}
