//! Builders for the common OpenType layout structures.
//!
//! Offsets are computed from the serialized size of each child, which is
//! placed immediately after its parent's header.

use font_types::Tag;

use crate::bebuffer::BeBuffer;

/// A language system: an optional required feature plus feature indices.
#[derive(Clone, Copy, Debug, Default)]
pub struct LangSysDef<'a> {
    pub required_feature: Option<u16>,
    pub features: &'a [u16],
}

#[derive(Clone, Copy, Debug)]
pub struct ScriptDef<'a> {
    pub tag: Tag,
    pub default_lang_sys: Option<LangSysDef<'a>>,
    pub lang_sys: &'a [(Tag, LangSysDef<'a>)],
}

#[derive(Clone, Copy, Debug)]
pub struct FeatureDef<'a> {
    pub tag: Tag,
    pub lookups: &'a [u16],
}

#[derive(Clone, Debug)]
pub struct LookupDef {
    pub lookup_type: u16,
    pub lookup_flag: u16,
    pub subtables: Vec<Vec<u8>>,
    pub mark_filtering_set: Option<u16>,
}

impl LookupDef {
    pub fn new(lookup_type: u16, subtables: &[&[u8]]) -> Self {
        Self {
            lookup_type,
            lookup_flag: 0,
            subtables: subtables.iter().map(|sub| sub.to_vec()).collect(),
            mark_filtering_set: None,
        }
    }
}

/// A complete `GSUB` or `GPOS` table, version 1.0.
pub fn layout_table(
    scripts: &[ScriptDef],
    features: &[FeatureDef],
    lookups: &[LookupDef],
) -> Vec<u8> {
    let script_list = script_list(scripts);
    let feature_list = feature_list(features);
    let lookup_list = lookup_list(lookups);
    let header_len = 10u16;
    let feature_list_offset = header_len + script_list.len() as u16;
    let lookup_list_offset = feature_list_offset + feature_list.len() as u16;
    BeBuffer::new()
        .push(1u16)
        .push(0u16)
        .push(header_len)
        .push(feature_list_offset)
        .push(lookup_list_offset)
        .extend_bytes(&script_list)
        .extend_bytes(&feature_list)
        .extend_bytes(&lookup_list)
        .into_vec()
}

/// Wraps `subtable` in a format 1 extension subtable.
pub fn extension(lookup_type: u16, subtable: &[u8]) -> Vec<u8> {
    BeBuffer::new()
        .push(1u16)
        .push(lookup_type)
        .push(8u32)
        .extend_bytes(subtable)
        .into_vec()
}

/// Writes `header` followed by `children`, with `offsets` patched to point
/// at each child.
fn with_children(header_len: usize, header: BeBuffer, children: &[Vec<u8>]) -> BeBuffer {
    debug_assert_eq!(header.len(), header_len);
    children
        .iter()
        .fold(header, |buf, child| buf.extend_bytes(child))
}

fn child_offsets(header_len: usize, children: &[Vec<u8>]) -> Vec<u16> {
    children
        .iter()
        .scan(header_len, |pos, child| {
            let offset = *pos as u16;
            *pos += child.len();
            Some(offset)
        })
        .collect()
}

fn lang_sys(def: &LangSysDef) -> Vec<u8> {
    BeBuffer::new()
        .push(0u16)
        .push(def.required_feature.unwrap_or(0xFFFF))
        .push(def.features.len() as u16)
        .extend(def.features.iter().copied())
        .into_vec()
}

fn script(def: &ScriptDef) -> Vec<u8> {
    let header_len = 4 + 6 * def.lang_sys.len();
    let mut children: Vec<Vec<u8>> = def.default_lang_sys.iter().map(lang_sys).collect();
    children.extend(def.lang_sys.iter().map(|(_, ls)| lang_sys(ls)));
    let offsets = child_offsets(header_len, &children);
    let mut offsets = offsets.into_iter();
    let default_offset = match def.default_lang_sys {
        Some(_) => offsets.next().unwrap_or_default(),
        None => 0,
    };
    let mut header = BeBuffer::new()
        .push(default_offset)
        .push(def.lang_sys.len() as u16);
    for ((tag, _), offset) in def.lang_sys.iter().zip(offsets) {
        header = header.push(*tag).push(offset);
    }
    with_children(header_len, header, &children).into_vec()
}

fn script_list(scripts: &[ScriptDef]) -> Vec<u8> {
    let header_len = 2 + 6 * scripts.len();
    let children: Vec<_> = scripts.iter().map(script).collect();
    let mut header = BeBuffer::new().push(scripts.len() as u16);
    for (def, offset) in scripts.iter().zip(child_offsets(header_len, &children)) {
        header = header.push(def.tag).push(offset);
    }
    with_children(header_len, header, &children).into_vec()
}

fn feature_list(features: &[FeatureDef]) -> Vec<u8> {
    let header_len = 2 + 6 * features.len();
    let children: Vec<_> = features
        .iter()
        .map(|def| {
            BeBuffer::new()
                .push(0u16)
                .push(def.lookups.len() as u16)
                .extend(def.lookups.iter().copied())
                .into_vec()
        })
        .collect();
    let mut header = BeBuffer::new().push(features.len() as u16);
    for (def, offset) in features.iter().zip(child_offsets(header_len, &children)) {
        header = header.push(def.tag).push(offset);
    }
    with_children(header_len, header, &children).into_vec()
}

fn lookup(def: &LookupDef) -> Vec<u8> {
    let header_len =
        6 + 2 * def.subtables.len() + 2 * def.mark_filtering_set.is_some() as usize;
    let header = BeBuffer::new()
        .push(def.lookup_type)
        .push(def.lookup_flag)
        .push(def.subtables.len() as u16)
        .extend(child_offsets(header_len, &def.subtables));
    let header = match def.mark_filtering_set {
        Some(set) => header.push(set),
        None => header,
    };
    with_children(header_len, header, &def.subtables).into_vec()
}

fn lookup_list(lookups: &[LookupDef]) -> Vec<u8> {
    let header_len = 2 + 2 * lookups.len();
    let children: Vec<_> = lookups.iter().map(lookup).collect();
    let header = BeBuffer::new()
        .push(lookups.len() as u16)
        .extend(child_offsets(header_len, &children));
    with_children(header_len, header, &children).into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_follow_headers() {
        let lookups = [LookupDef::new(1, &[&[0xAA, 0xBB], &[0xCC]])];
        let list = lookup_list(&lookups);
        // count, offset to the single lookup
        assert_eq!(&list[..4], &[0, 1, 0, 4]);
        // type, flag, count, offsets to two subtables after a 10 byte header
        assert_eq!(&list[4..14], &[0, 1, 0, 0, 0, 2, 0, 10, 0, 12]);
        assert_eq!(&list[14..], &[0xAA, 0xBB, 0xCC]);
    }
}
