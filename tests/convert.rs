use std::collections::BTreeMap;

use dcbor::{
    decode_tagged, CborDecode, CborEncode, CborError, CborTagged, ErrorCode, Item, Map, TAG_DATE,
};
use half::f16;

#[test]
fn integers_round_trip_through_items() {
    assert_eq!(u8::from_item(&Item::from(255)).unwrap(), 255);
    assert_eq!(i8::from_item(&Item::from(-128)).unwrap(), -128);
    assert_eq!(u64::from_item(&Item::Unsigned(u64::MAX)).unwrap(), u64::MAX);
    assert_eq!(i64::from_item(&Item::from(i64::MIN)).unwrap(), i64::MIN);
    assert_eq!(
        i128::from_item(&Item::Negative(u64::MAX)).unwrap(),
        -18_446_744_073_709_551_616
    );
    assert_eq!(u128::from_item(&Item::Unsigned(7)).unwrap(), 7);
    assert_eq!(isize::from_item(&(-3_isize).to_item()).unwrap(), -3);
}

#[test]
fn integers_out_of_range_are_rejected() {
    let err = u8::from_item(&Item::from(256)).unwrap_err();
    assert_eq!(err.code, ErrorCode::IntegerOutOfRange);
    assert!(err.is_conversion());
    assert_eq!(err.offset, 0);

    assert_eq!(
        u64::from_item(&Item::from(-1)).unwrap_err().code,
        ErrorCode::IntegerOutOfRange
    );
    assert_eq!(
        i64::from_item(&Item::Negative(u64::MAX)).unwrap_err().code,
        ErrorCode::IntegerOutOfRange
    );
    assert_eq!(
        u128::from_item(&Item::from(-1)).unwrap_err().code,
        ErrorCode::IntegerOutOfRange
    );
}

#[test]
fn wrong_types_are_rejected() {
    assert_eq!(
        u32::from_item(&Item::text("1")).unwrap_err(),
        CborError::wrong_type()
    );
    assert_eq!(
        String::from_item(&Item::bytes(b"a".to_vec())).unwrap_err().code,
        ErrorCode::WrongType
    );
    assert_eq!(
        bool::from_item(&Item::NULL).unwrap_err().code,
        ErrorCode::WrongType
    );
    assert_eq!(
        Vec::<u8>::from_item(&Item::array([1, 2])).unwrap_err().code,
        ErrorCode::WrongType
    );
}

#[test]
fn integer_item_constructor_covers_full_range() {
    assert_eq!(Item::integer(-18_446_744_073_709_551_616).unwrap(), Item::Negative(u64::MAX));
    assert_eq!(Item::integer(18_446_744_073_709_551_615).unwrap(), Item::Unsigned(u64::MAX));
    assert_eq!(
        Item::integer(18_446_744_073_709_551_616).unwrap_err().code,
        ErrorCode::IntegerOutOfRange
    );
    assert_eq!(
        Item::integer(-18_446_744_073_709_551_617).unwrap_err().code,
        ErrorCode::IntegerOutOfRange
    );
}

#[test]
fn floats_convert_from_floats_and_exact_integers() {
    assert_eq!(f64::from_item(&Item::from(1.5)).unwrap(), 1.5);
    assert_eq!(f64::from_item(&Item::from(42)).unwrap(), 42.0);
    assert_eq!(f64::from_item(&Item::from(-1)).unwrap(), -1.0);
    assert_eq!(f32::from_item(&Item::from(2_345_678.25)).unwrap(), 2_345_678.25);
    assert_eq!(
        f16::from_item(&Item::from(1.5)).unwrap(),
        f16::from_f32(1.5)
    );
    assert!(f64::from_item(&Item::from(f64::NAN)).unwrap().is_nan());

    // 2^53 + 1 has no exact double.
    assert_eq!(
        f64::from_item(&Item::Unsigned((1 << 53) + 1)).unwrap_err().code,
        ErrorCode::IntegerOutOfRange
    );
    assert_eq!(
        f32::from_item(&Item::from(1.2)).unwrap_err().code,
        ErrorCode::WrongType
    );
    assert_eq!(
        f64::from_item(&Item::text("1.5")).unwrap_err().code,
        ErrorCode::WrongType
    );
}

#[test]
fn float_encoding_collapses_integers() {
    assert_eq!(2.0_f64.to_item(), Item::Unsigned(2));
    assert_eq!((-0.0_f32).to_item(), Item::Unsigned(0));
    assert_eq!(f16::from_f32(-3.0).to_item(), Item::Negative(2));
    assert_eq!(0.5_f64.to_cbor_data(), [0xf9, 0x38, 0x00]);
}

#[test]
fn strings_bytes_and_options() {
    assert_eq!("hi".to_item(), Item::text("hi"));
    assert_eq!(String::from("hi").to_cbor_data(), [0x62, 0x68, 0x69]);
    assert_eq!(vec![1_u8, 2].to_item(), Item::bytes(vec![1_u8, 2]));
    assert_eq!(Vec::<u8>::from_cbor_data(&[0x42, 0x01, 0x02]).unwrap(), [1, 2]);
    assert_eq!(None::<u32>.to_item(), Item::NULL);
    assert_eq!(Some(5_u32).to_item(), Item::from(5));
    assert_eq!(Option::<u32>::from_item(&Item::NULL).unwrap(), None);
    assert_eq!(Option::<u32>::from_item(&Item::from(5)).unwrap(), Some(5));
}

#[test]
fn vectors_encode_as_arrays() {
    let v: Vec<u16> = vec![1, 2, 300];
    assert_eq!(v.to_cbor_data(), [0x83, 0x01, 0x02, 0x19, 0x01, 0x2c]);
    assert_eq!(Vec::<u16>::from_cbor_data(&v.to_cbor_data()).unwrap(), v);

    let nested: Vec<Vec<String>> = vec![vec!["a".into()], vec![]];
    assert_eq!(nested.to_item().to_string(), r#"[["a"], []]"#);
    assert_eq!(Vec::<Vec<String>>::from_item(&nested.to_item()).unwrap(), nested);
}

#[test]
fn btree_maps_encode_in_canonical_order() {
    let mut m = BTreeMap::new();
    m.insert("aa".to_string(), 1_u32);
    m.insert("z".to_string(), 2_u32);
    // BTreeMap order is "aa" < "z"; canonical order puts the shorter encoding first.
    assert_eq!(m.to_item().to_string(), r#"{"z": 2, "aa": 1}"#);
    let back = BTreeMap::<String, u32>::from_cbor_data(&m.to_cbor_data()).unwrap();
    assert_eq!(back, m);
}

#[test]
fn items_and_maps_convert_to_themselves() {
    let item = Item::array([Item::from(1), Item::tagged(2, "x")]);
    assert_eq!(Item::from_item(&item).unwrap(), item);
    assert_eq!(CborEncode::to_cbor_data(&item), item.to_cbor_data());

    let map: Map = [(1, "a")].into_iter().collect();
    assert_eq!(Map::from_item(&Item::Map(map.clone())).unwrap(), map);
    assert_eq!(
        Map::from_item(&Item::from(1)).unwrap_err().code,
        ErrorCode::WrongType
    );
}

#[derive(Debug, PartialEq)]
struct Timestamp(i64);

impl CborTagged for Timestamp {
    const TAG: u64 = TAG_DATE;

    fn to_untagged_item(&self) -> Item {
        Item::from(self.0)
    }

    fn from_untagged_item(item: &Item) -> Result<Self, CborError> {
        i64::from_item(item).map(Self)
    }
}

#[test]
fn tagged_types_check_their_tag() {
    let ts = Timestamp(-100);
    let item = ts.to_tagged_item();
    assert_eq!(item.hex(), "c13863");
    assert_eq!(Timestamp::from_tagged_item(&item).unwrap(), ts);
    assert_eq!(decode_tagged::<Timestamp>(&item.to_cbor_data()).unwrap(), ts);

    let err = Timestamp::from_tagged_item(&Item::tagged(2, -100)).unwrap_err();
    assert_eq!(
        err.code,
        ErrorCode::WrongTag {
            expected: 1,
            encountered: 2
        }
    );
    assert_eq!(
        err.to_string(),
        "cbor conversion error: wrong tag: expected 1, encountered 2"
    );
    assert_eq!(
        Timestamp::from_tagged_item(&Item::from(-100)).unwrap_err().code,
        ErrorCode::WrongType
    );
}

#[test]
fn item_accessors() {
    let item = Item::tagged(24, Item::array([Item::from(true), Item::NULL]));
    let (tag, inner) = item.as_tagged().unwrap();
    assert_eq!(tag, 24);
    let elems = inner.as_array().unwrap();
    assert_eq!(elems[0].as_bool(), Some(true));
    assert!(elems[1].is_null());
    assert_eq!(item.expect_tagged(24).unwrap(), inner);
    assert_eq!(Item::from(-5).as_integer(), Some(-5));
    assert_eq!(Item::from(5).as_unsigned(), Some(5));
    assert_eq!(Item::from(-5).as_unsigned(), None);
    assert_eq!(Item::text("t").as_text(), Some("t"));
    assert_eq!(Item::bytes(vec![9_u8]).as_bytes(), Some(&[9_u8][..]));
    assert_eq!(Item::from(-2).as_f64(), Some(-2.0));
    assert!(Item::from(1).as_map().is_none());
}
