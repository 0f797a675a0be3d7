//! Scripts and language systems

use types::{Nullable, Offset16, Tag};

use super::read_u16s;
use crate::{offset::ResolveNullableOffset, FontData, FontRead, ReadError, ResolveOffset};

/// The [ScriptList](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#script-list-table-and-script-record) table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptList {
    scripts: Vec<Script>,
}

impl ScriptList {
    /// Scripts in table order.
    pub fn scripts(&self) -> &[Script] {
        &self.scripts
    }

    /// Returns the first script with the given tag.
    pub fn get(&self, tag: Tag) -> Option<&Script> {
        self.scripts.iter().find(|script| script.tag == tag)
    }
}

impl<'a> FontRead<'a> for ScriptList {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let count: u16 = cursor.read()?;
        let scripts = (0..count)
            .map(|_| {
                let tag: Tag = cursor.read()?;
                let offset: Offset16 = cursor.read()?;
                let mut script: Script = offset.resolve(data)?;
                script.tag = tag;
                Ok::<_, ReadError>(script)
            })
            .collect::<Result<_, _>>()?;
        Ok(ScriptList { scripts })
    }
}

/// A [Script](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#script-table-and-language-system-record) table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script {
    tag: Tag,
    default_lang_sys: Option<LangSys>,
    lang_sys_records: Vec<LangSysRecord>,
}

impl Script {
    /// The tag from this script's record in the script list.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn default_lang_sys(&self) -> Option<&LangSys> {
        self.default_lang_sys.as_ref()
    }

    pub fn lang_sys_records(&self) -> &[LangSysRecord] {
        &self.lang_sys_records
    }

    /// Returns the language system with the given tag, ignoring the default.
    pub fn lang_sys(&self, tag: Tag) -> Option<&LangSys> {
        self.lang_sys_records
            .iter()
            .find(|record| record.tag == tag)
            .map(|record| &record.lang_sys)
    }
}

impl<'a> FontRead<'a> for Script {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let default_offset: Nullable<Offset16> = cursor.read()?;
        let count: u16 = cursor.read()?;
        let default_lang_sys = default_offset.resolve(data).transpose()?;
        let lang_sys_records = (0..count)
            .map(|_| {
                let tag: Tag = cursor.read()?;
                let offset: Offset16 = cursor.read()?;
                Ok::<_, ReadError>(LangSysRecord {
                    tag,
                    lang_sys: offset.resolve(data)?,
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Script {
            tag: Tag::default(),
            default_lang_sys,
            lang_sys_records,
        })
    }
}

/// A tagged language system within a [`Script`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LangSysRecord {
    tag: Tag,
    lang_sys: LangSys,
}

impl LangSysRecord {
    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn lang_sys(&self) -> &LangSys {
        &self.lang_sys
    }
}

/// A [Language System](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#language-system-table) table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LangSys {
    required_feature_index: Option<u16>,
    feature_indices: Vec<u16>,
}

impl LangSys {
    const NO_REQUIRED_FEATURE: u16 = 0xFFFF;

    /// Index of a feature required for this language system, if any.
    pub fn required_feature_index(&self) -> Option<u16> {
        self.required_feature_index
    }

    /// Indices into the feature list, in table order.
    pub fn feature_indices(&self) -> &[u16] {
        &self.feature_indices
    }
}

impl<'a> FontRead<'a> for LangSys {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        // lookupOrderOffset, reserved
        cursor.advance::<Offset16>();
        let required: u16 = cursor.read()?;
        let count: u16 = cursor.read()?;
        let feature_indices = read_u16s(&mut cursor, count as usize)?;
        Ok(LangSys {
            required_feature_index: (required != Self::NO_REQUIRED_FEATURE).then_some(required),
            feature_indices,
        })
    }
}
