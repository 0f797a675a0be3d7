use font_test_data::{bebuffer::BeBuffer, gsub as test_data, layout::extension};

use super::*;
use crate::{tables::gsub::SubstitutionSubtable, LayoutTag};

type Gsub = LayoutTable<SubstitutionSubtable>;

fn gsub() -> Gsub {
    let data = test_data::gsub_table();
    Gsub::read(FontData::new(&data)).unwrap()
}

fn lookup_indices(table: &Gsub, lookups: &[&Lookup<SubstitutionSubtable>]) -> Vec<u16> {
    lookups
        .iter()
        .map(|lookup| {
            table
                .lookup_list()
                .lookups()
                .iter()
                .position(|candidate| std::ptr::eq(candidate, *lookup))
                .unwrap() as u16
        })
        .collect()
}

#[test]
fn header() {
    let table = gsub();
    assert_eq!(table.version(), (1, 0));
    assert_eq!(table.feature_variations_offset(), None);
    assert_eq!(table.script_list().scripts().len(), 2);
    assert_eq!(table.feature_list().features().len(), 4);
    assert_eq!(table.lookup_list().len(), 4);
}

#[test]
fn unsupported_version() {
    let mut data = test_data::gsub_table();
    data[3] = 2;
    assert_eq!(
        Gsub::read(FontData::new(&data)),
        Err(ReadError::InvalidFormat(0x0001_0002))
    );
}

#[test]
fn find_script() {
    let table = gsub();
    let dflt = table.find_script(Tag::new(b"DFLT")).unwrap();
    assert_eq!(dflt.tag(), Tag::new(b"DFLT"));
    assert!(dflt.lang_sys_records().is_empty());
    let latn = table.find_script(Tag::new(b"latn")).unwrap();
    assert_eq!(latn.lang_sys_records().len(), 1);
    assert!(table.find_script(Tag::new(b"cyrl")).is_none());
}

#[test]
fn find_lang_sys_falls_back_to_default() {
    let table = gsub();
    let latn = Tag::new(b"latn");
    let trk = table.find_lang_sys(latn, Some(Tag::new(b"TRK "))).unwrap();
    assert_eq!(trk.required_feature_index(), Some(1));
    assert_eq!(trk.feature_indices(), &[3, 0]);

    let default = table.find_lang_sys(latn, None).unwrap();
    assert_eq!(default.required_feature_index(), None);
    assert_eq!(default.feature_indices(), &[0, 1, 2]);
    assert_eq!(
        table.find_lang_sys(latn, Some(Tag::new(b"DEU "))),
        Some(default)
    );
    assert!(table.find_lang_sys(Tag::new(b"cyrl"), None).is_none());
}

#[test]
fn find_lookup() {
    let table = gsub();
    let latn = Tag::new(b"latn");
    let liga = Tag::new(b"liga");

    let lookups = table.find_lookup(latn, Some(Tag::new(b"TRK ")), liga);
    assert_eq!(
        lookup_indices(&table, &lookups),
        [test_data::TRK_LIGA_LOOKUP, test_data::LIGA_LOOKUP]
    );

    let lookups = table.find_lookup(latn, None, liga);
    assert_eq!(lookup_indices(&table, &lookups), [test_data::LIGA_LOOKUP]);

    let lookups = table.find_lookup(Tag::new(b"DFLT"), Some(Tag::new(b"TRK ")), liga);
    assert_eq!(lookup_indices(&table, &lookups), [test_data::LIGA_LOOKUP]);

    // the required feature is not consulted
    assert!(table
        .find_lookup(latn, Some(Tag::new(b"TRK ")), Tag::new(b"salt"))
        .is_empty());
    assert!(table.find_lookup(latn, None, Tag::new(b"kern")).is_empty());
    assert!(table.find_lookup(Tag::new(b"grek"), None, liga).is_empty());
}

#[test]
fn extension_lookup_is_unwrapped() {
    let table = gsub();
    let smcp = table.lookup(test_data::SMCP_LOOKUP).unwrap();
    assert!(smcp.is_extension());
    assert_eq!(smcp.lookup_type(), 1);
    assert_eq!(smcp.subtables().len(), 1);

    let liga = table.lookup(test_data::LIGA_LOOKUP).unwrap();
    assert!(!liga.is_extension());
    assert_eq!(liga.lookup_type(), 4);
    assert!(table.lookup(4).is_none());
}

#[test]
fn mark_filtering_set() {
    let table = gsub();
    let trk_liga = table.lookup(test_data::TRK_LIGA_LOOKUP).unwrap();
    assert_eq!(trk_liga.lookup_flag().to_bits(), 0x0010);
    assert!(trk_liga.lookup_flag().use_mark_filtering_set());
    assert_eq!(trk_liga.mark_filtering_set(), Some(0));

    let liga = table.lookup(test_data::LIGA_LOOKUP).unwrap();
    assert_eq!(liga.mark_filtering_set(), None);
}

#[test]
fn extension_types_must_agree() {
    let single = extension(1, test_data::SINGLESUBSTFORMAT1_TABLE);
    let alternate = extension(3, test_data::ALTERNATESUBSTFORMAT1_TABLE);
    let data = BeBuffer::new()
        .extend([7u16, 0, 2])
        .push(10u16)
        .push(10 + single.len() as u16)
        .extend_bytes(&single)
        .extend_bytes(&alternate);
    assert!(matches!(
        Lookup::<SubstitutionSubtable>::read(FontData::new(&data)),
        Err(ReadError::MalformedData(_))
    ));
}

#[test]
fn layout_tags_in_table_order() {
    let table = gsub();
    let tags: Vec<_> = table.layout_tags().collect();
    assert_eq!(
        tags,
        [
            LayoutTag::Script(Tag::new(b"DFLT")),
            LayoutTag::Script(Tag::new(b"latn")),
            LayoutTag::Language(Tag::new(b"TRK ")),
            LayoutTag::Feature(Tag::new(b"liga")),
            LayoutTag::Feature(Tag::new(b"salt")),
            LayoutTag::Feature(Tag::new(b"smcp")),
            LayoutTag::Feature(Tag::new(b"liga")),
        ]
    );
}
