//! OpenType Layout common table formats
//!
//! `GSUB` and `GPOS` share one structure: a [`ScriptList`] naming the language
//! systems a font supports, a [`FeatureList`] of tagged features and a
//! [`LookupList`] holding the rules themselves. [`LayoutTable`] is generic over
//! the subtable type so the two tables share all of the parsing and query
//! code.

#[path = "./layout/class_def.rs"]
mod class_def;
#[path = "./layout/coverage.rs"]
mod coverage;
#[path = "./layout/feature.rs"]
mod feature;
#[path = "./layout/lookup.rs"]
mod lookup;
#[path = "./lookupflag.rs"]
mod lookupflag;
#[path = "./layout/script.rs"]
mod script;

pub use class_def::{ClassDef, ClassDefFormat1, ClassDefFormat2, ClassRangeRecord};
pub use coverage::{CoverageFormat1, CoverageFormat2, CoverageTable, RangeRecord};
pub use feature::{Feature, FeatureList};
pub use lookup::{Lookup, LookupList, LookupSubtable};
pub use lookupflag::LookupFlag;
pub use script::{LangSys, LangSysRecord, Script, ScriptList};

use types::{BigEndian, GlyphId, Offset16, Offset32, Tag};

use crate::{offset::ResolveOffset, FontData, FontRead, ReadError};

#[cfg(test)]
#[path = "../tests/test_layout.rs"]
mod tests;

/// A `GSUB` or `GPOS` table.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutTable<T> {
    major_version: u16,
    minor_version: u16,
    script_list: ScriptList,
    feature_list: FeatureList,
    lookup_list: LookupList<T>,
    feature_variations_offset: Option<Offset32>,
}

impl<T> LayoutTable<T> {
    /// The (major, minor) version of the table; either 1.0 or 1.1
    pub fn version(&self) -> (u16, u16) {
        (self.major_version, self.minor_version)
    }

    pub fn script_list(&self) -> &ScriptList {
        &self.script_list
    }

    pub fn feature_list(&self) -> &FeatureList {
        &self.feature_list
    }

    pub fn lookup_list(&self) -> &LookupList<T> {
        &self.lookup_list
    }

    /// The offset to the `FeatureVariations` table, present in version 1.1.
    ///
    /// Feature variations are not decoded.
    pub fn feature_variations_offset(&self) -> Option<Offset32> {
        self.feature_variations_offset
    }

    /// Find a script by tag.
    pub fn find_script(&self, script: Tag) -> Option<&Script> {
        self.script_list.get(script)
    }

    /// Find the language system for `script` and `language`.
    ///
    /// If `language` is `None` or is not defined for the script, the script's
    /// default language system is returned. Returns `None` if the script is
    /// missing, or if the fallback is needed and the script has no default.
    pub fn find_lang_sys(&self, script: Tag, language: Option<Tag>) -> Option<&LangSys> {
        let script = self.find_script(script)?;
        language
            .and_then(|language| script.lang_sys(language))
            .or(script.default_lang_sys())
    }

    /// Collect every lookup reachable from `feature` under the given script
    /// and language system.
    ///
    /// Lookups are returned in the order their indices appear in the matching
    /// features, which are in turn visited in the language system's order. A
    /// language system that references the same feature tag more than once
    /// contributes the lookups of every match, without removing duplicates.
    ///
    /// Any failure to resolve (missing script, missing language with no
    /// default, no matching feature) produces an empty list.
    pub fn find_lookup(
        &self,
        script: Tag,
        language: Option<Tag>,
        feature: Tag,
    ) -> Vec<&Lookup<T>> {
        let Some(lang_sys) = self.find_lang_sys(script, language) else {
            return Vec::new();
        };
        lang_sys
            .feature_indices()
            .iter()
            .filter_map(|idx| self.feature_list.get(*idx))
            .filter(|record| record.tag() == feature)
            .flat_map(|record| record.lookup_indices().iter())
            .filter_map(|idx| self.lookup_list.get(*idx))
            .collect()
    }

    /// Returns the lookup at `index` in the lookup list.
    pub fn lookup(&self, index: u16) -> Option<&Lookup<T>> {
        self.lookup_list.get(index)
    }

    /// Every script, language system and feature tag named in the table.
    pub fn layout_tags(&self) -> impl Iterator<Item = crate::LayoutTag> + '_ {
        use crate::LayoutTag;
        let scripts = self.script_list.scripts().iter().flat_map(|script| {
            std::iter::once(LayoutTag::Script(script.tag())).chain(
                script
                    .lang_sys_records()
                    .iter()
                    .map(|record| LayoutTag::Language(record.tag())),
            )
        });
        let features = self
            .feature_list
            .features()
            .iter()
            .map(|feature| LayoutTag::Feature(feature.tag()));
        scripts.chain(features)
    }
}

impl<'a, T: LookupSubtable> FontRead<'a> for LayoutTable<T> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let major_version: u16 = cursor.read()?;
        let minor_version: u16 = cursor.read()?;
        if major_version != 1 || minor_version > 1 {
            return Err(ReadError::InvalidFormat(
                ((major_version as i64) << 16) | minor_version as i64,
            ));
        }
        let script_list_offset: Offset16 = cursor.read()?;
        let feature_list_offset: Offset16 = cursor.read()?;
        let lookup_list_offset: Offset16 = cursor.read()?;
        let feature_variations_offset = if minor_version >= 1 {
            Some(cursor.read::<Offset32>()?).filter(|offset| !offset.is_null())
        } else {
            None
        };
        cursor.finish()?;
        let script_list = script_list_offset.resolve(data)?;
        let feature_list = feature_list_offset.resolve(data)?;
        let lookup_list = lookup_list_offset.resolve(data)?;
        Ok(LayoutTable {
            major_version,
            minor_version,
            script_list,
            feature_list,
            lookup_list,
            feature_variations_offset,
        })
    }
}

/// Read an array of `u16` values into a `Vec`.
pub(crate) fn read_u16s(
    cursor: &mut crate::font_data::Cursor,
    count: usize,
) -> Result<Vec<u16>, ReadError> {
    Ok(cursor
        .read_array::<BigEndian<u16>>(count)?
        .iter()
        .map(BigEndian::get)
        .collect())
}

/// Read an array of glyph ids into a `Vec`.
pub(crate) fn read_glyph_ids(
    cursor: &mut crate::font_data::Cursor,
    count: usize,
) -> Result<Vec<GlyphId>, ReadError> {
    Ok(cursor
        .read_array::<BigEndian<GlyphId>>(count)?
        .iter()
        .map(BigEndian::get)
        .collect())
}

/// Read a count-prefixed array of `Offset16` values and resolve each of them
/// relative to `data`.
pub(crate) fn read_offset_array<'a, T: FontRead<'a>>(
    data: FontData<'a>,
    cursor: &mut crate::font_data::Cursor<'a>,
) -> Result<Vec<T>, ReadError> {
    let count: u16 = cursor.read()?;
    cursor
        .read_array::<BigEndian<Offset16>>(count as usize)?
        .iter()
        .map(|offset| offset.get().resolve(data))
        .collect()
}
