use super::*;
use font_test_data::gpos as test_data;

fn x_advance(value: Option<&PairValue>) -> Option<i16> {
    value
        .and_then(PairValue::value_record1)
        .map(ValueRecord::x_advance)
}

#[test]
fn singleposformat1() {
    // https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-2-singleposformat1-subtable
    let table = SinglePos::read(test_data::SINGLEPOSFORMAT1.into()).unwrap();
    assert_eq!(table.coverage().len(), 6);
    let record = table.value_record(GlyphId::new(46)).unwrap();
    assert_eq!(record.format(), ValueFormat::Y_PLACEMENT);
    assert_eq!(record.y_placement(), -80);
    assert_eq!(record.x_advance(), 0);
    assert_eq!(table.value_record(GlyphId::new(51)), Some(record));
    assert_eq!(table.value_record(GlyphId::new(52)), None);
}

#[test]
fn singleposformat2() {
    // https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-3-singleposformat2-subtable
    let table = SinglePos::read(test_data::SINGLEPOSFORMAT2.into()).unwrap();
    let adjust = |gid: u16| {
        table
            .value_record(GlyphId::new(gid))
            .map(|rec| (rec.x_placement(), rec.x_advance()))
    };
    assert_eq!(adjust(77), Some((50, 100)));
    assert_eq!(adjust(79), Some((80, 150)));
    assert_eq!(adjust(125), Some((10, 30)));
    assert_eq!(adjust(78), None);
}

#[test]
fn pairposformat1() {
    let table = PairPos::read(test_data::PAIRPOSFORMAT1.into()).unwrap();
    assert_eq!(
        table.value_formats(),
        (ValueFormat::X_ADVANCE, ValueFormat::default())
    );
    let adjust = |first: u16, second: u16| {
        x_advance(table.adjustment(GlyphId::new(first), GlyphId::new(second)))
    };
    assert_eq!(adjust(14, 36), Some(77));
    assert_eq!(adjust(14, 40), Some(-20));
    assert_eq!(adjust(20, 14), Some(-10));
    assert_eq!(adjust(14, 37), None);
    assert_eq!(adjust(36, 14), None);

    let pair = table.adjustment(GlyphId::new(14), GlyphId::new(36)).unwrap();
    assert!(pair.value_record2().is_none());
}

#[test]
fn pair_set_must_be_sorted() {
    // two records with second glyphs 40 then 36
    let data = [0u8, 2, 0, 40, 0, 1, 0, 36, 0, 2];
    let formats = (ValueFormat::X_ADVANCE, ValueFormat::default());
    assert!(matches!(
        PairSet::read_with_args(FontData::new(&data), &formats),
        Err(ReadError::MalformedData(_))
    ));
}

#[test]
fn pairposformat2() {
    let table = PairPos::read(test_data::PAIRPOSFORMAT2.into()).unwrap();
    let PairPos::Format2(format2) = &table else {
        panic!("expected format 2, got {table:?}");
    };
    assert_eq!(format2.class1_count(), 3);
    assert_eq!(format2.class2_count(), 3);
    assert_eq!(format2.class_def1().get(GlyphId::new(68)), 1);
    assert_eq!(format2.class_def2().get(GlyphId::new(114)), 2);
    assert!(format2.class_pair(3, 0).is_none());

    let adjust = |first: u16, second: u16| {
        x_advance(table.adjustment(GlyphId::new(first), GlyphId::new(second)))
    };
    assert_eq!(adjust(68, 92), Some(-83));
    assert_eq!(adjust(124, 114), Some(-27));
    // the second glyph is in class 0
    assert_eq!(adjust(68, 7), Some(-5));
    // the first glyph is not covered
    assert_eq!(adjust(92, 68), None);
}

#[test]
fn lookups_in_gpos_table() {
    let data = test_data::gpos_table();
    let gpos = Gpos::read(FontData::new(&data)).unwrap();

    let kern = gpos.lookup(0).unwrap();
    assert!(kern.is_extension());
    assert_eq!(kern.kind(), LookupKind::Pair);
    assert_eq!(kern.subtables().len(), 2);
    // glyph pairs are consulted before classes
    let pair = |first: u16, second: u16| {
        x_advance(kern.pair_adjustment(GlyphId::new(first), GlyphId::new(second)))
    };
    assert_eq!(pair(14, 36), Some(77));
    assert_eq!(pair(68, 92), Some(-83));
    assert_eq!(pair(1, 2), None);

    let mark = gpos.lookup(1).unwrap();
    assert_eq!(mark.kind(), LookupKind::MarkToBase);
    assert_eq!(
        mark.subtables(),
        &[PositioningSubtable::Other {
            lookup_type: 4,
            format: 1
        }]
    );

    let cpsp = gpos.lookup(2).unwrap();
    assert_eq!(cpsp.kind(), LookupKind::Single);
    assert_eq!(
        cpsp.single_adjustment(GlyphId::new(48))
            .map(ValueRecord::y_placement),
        Some(-80)
    );
    assert_eq!(
        cpsp.single_adjustment(GlyphId::new(125))
            .map(ValueRecord::x_advance),
        Some(30)
    );
    assert_eq!(cpsp.pair_adjustment(GlyphId::new(14), GlyphId::new(36)), None);
}
