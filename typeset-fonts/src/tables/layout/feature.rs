//! Features

use types::{Nullable, Offset16, Tag};

use super::read_u16s;
use crate::{FontData, FontRead, ReadError, ResolveOffset};

/// The [FeatureList](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#feature-list-table) table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeatureList {
    features: Vec<Feature>,
}

impl FeatureList {
    /// Features in table order.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Returns the feature at `index`.
    pub fn get(&self, index: u16) -> Option<&Feature> {
        self.features.get(index as usize)
    }
}

impl<'a> FontRead<'a> for FeatureList {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let count: u16 = cursor.read()?;
        let features = (0..count)
            .map(|_| {
                let tag: Tag = cursor.read()?;
                let offset: Offset16 = cursor.read()?;
                let mut feature: Feature = offset.resolve(data)?;
                feature.tag = tag;
                Ok::<_, ReadError>(feature)
            })
            .collect::<Result<_, _>>()?;
        Ok(FeatureList { features })
    }
}

/// A [Feature](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#feature-table) table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Feature {
    tag: Tag,
    feature_params_offset: Nullable<Offset16>,
    lookup_indices: Vec<u16>,
}

impl Feature {
    /// The tag from this feature's record in the feature list.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Offset to the feature parameters, relative to the start of the feature.
    ///
    /// Parameters are not decoded.
    pub fn feature_params_offset(&self) -> Nullable<Offset16> {
        self.feature_params_offset
    }

    /// Indices into the lookup list, in table order.
    pub fn lookup_indices(&self) -> &[u16] {
        &self.lookup_indices
    }
}

impl<'a> FontRead<'a> for Feature {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let feature_params_offset = cursor.read()?;
        let count: u16 = cursor.read()?;
        let lookup_indices = read_u16s(&mut cursor, count as usize)?;
        Ok(Feature {
            tag: Tag::default(),
            feature_params_offset,
            lookup_indices,
        })
    }
}
