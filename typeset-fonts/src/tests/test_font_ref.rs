use font_test_data::{cff, sfnt};

use super::*;

#[test]
fn table_directory_lookup() {
    let data = sfnt::cff_font();
    let font = FontRef::new(&data).unwrap();
    assert_eq!(font.table_directory().sfnt_version(), CFF_SFNT_VERSION);
    assert_eq!(font.table_directory().num_tables(), 7);
    assert_eq!(font.ttc_index(), None);

    let cff_data = font.table_data(Tag::new(b"CFF ")).unwrap();
    assert_eq!(cff_data.as_bytes(), cff::simple_cff());
    assert!(font.table_data(Tag::new(b"glyf")).is_none());
}

#[test]
fn provided_tables() {
    let data = sfnt::cff_font();
    let font = FontRef::new(&data).unwrap();
    let head = font.head().unwrap();
    assert_eq!(head.units_per_em, sfnt::UNITS_PER_EM);
    assert_eq!(font.maxp().unwrap().num_glyphs, cff::NUM_GLYPHS);
    assert_eq!(
        font.name().unwrap().family_name().unwrap().as_deref(),
        Some(sfnt::FAMILY_NAME)
    );
    assert_eq!(
        font.glyf().map(|_| ()),
        Err(ReadError::TableIsMissing(Tag::new(b"glyf")))
    );
    assert!(font.optional_table::<tables::gsub::Gsub>().unwrap().is_some());
}

#[test]
fn unsorted_directory() {
    let mut data = sfnt::truetype_font();
    // swap the first two table records
    let (first, second) = data[12..44].split_at_mut(16);
    first.swap_with_slice(second);
    let font = FontRef::new(&data).unwrap();
    assert!(!font.table_directory().is_sorted());
    assert!(font.table_data(Tag::new(b"cmap")).is_some());
    assert!(font.table_data(Tag::new(b"glyf")).is_some());
}

#[test]
fn collection() {
    let data = sfnt::collection(&[
        (CFF_SFNT_VERSION, sfnt::cff_font_tables()),
        (TT_SFNT_VERSION, sfnt::truetype_font_tables()),
    ]);
    let collection = CollectionRef::new(&data).unwrap();
    assert_eq!(collection.len(), 2);
    let second = collection.get(1).unwrap();
    assert_eq!(second.ttc_index(), Some(1));
    assert_eq!(
        second.maxp().unwrap().num_glyphs,
        sfnt::TRUETYPE_NUM_GLYPHS
    );
    assert!(matches!(
        collection.get(2),
        Err(ReadError::InvalidCollectionIndex(2))
    ));

    assert_eq!(collection.fonts().filter(Result::is_ok).count(), 2);
    assert!(FontRef::from_index(&data, 0).unwrap().cff().is_ok());
}

#[test]
fn single_font_index() {
    let data = sfnt::truetype_font();
    assert!(FontRef::from_index(&data, 0).is_ok());
    assert!(matches!(
        FontRef::from_index(&data, 1),
        Err(ReadError::InvalidCollectionIndex(1))
    ));
}

#[test]
fn invalid_sfnt_version() {
    let mut data = sfnt::truetype_font();
    data[..4].copy_from_slice(b"wOFF");
    assert!(matches!(
        FontRef::new(&data),
        Err(ReadError::InvalidSfnt(0x774F4646))
    ));
    assert!(CollectionRef::new(&data).is_err());
}
