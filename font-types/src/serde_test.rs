//! ensure serde is working as expected

use super::*;

#[test]
fn test_serde() {
    #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Eq)]
    struct MyTypes {
        fixed: Fixed,
        gid: GlyphId,
        offset: Offset16,
        tag: Tag,
        bbox: BoundingBox<i16>,
    }

    let my_instance = MyTypes {
        fixed: Fixed::from_f64(521.5),
        gid: GlyphId::new(69),
        offset: Offset16::new(42),
        tag: Tag::new(b"liga"),
        bbox: BoundingBox {
            x_min: -10,
            y_min: -200,
            x_max: 500,
            y_max: 700,
        },
    };

    let dumped = serde_json::to_string(&my_instance).unwrap();
    assert!(dumped.contains("\"liga\""));
    let loaded: MyTypes = serde_json::from_str(&dumped).unwrap();
    assert_eq!(my_instance, loaded)
}
