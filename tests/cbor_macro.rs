use dcbor::{cbor, Item, Map};

#[test]
fn cbor_macro_builds_scalars() {
    assert_eq!(cbor!(null), Item::NULL);
    assert_eq!(cbor!(true), Item::TRUE);
    assert_eq!(cbor!(false), Item::FALSE);
    assert_eq!(cbor!(42), Item::Unsigned(42));
    assert_eq!(cbor!(-7), Item::Negative(6));
    assert_eq!(cbor!(1.5), Item::from(1.5));
    assert_eq!(cbor!("text"), Item::text("text"));
    assert_eq!(cbor!(b"raw"), Item::bytes(b"raw".to_vec()));
}

#[test]
fn cbor_macro_builds_arrays() {
    let v = cbor!([1, -2, "three", [true, null], {}]);
    assert_eq!(v.to_string(), r#"[1, -2, "three", [true, null], {}]"#);
    assert_eq!(cbor!([]), Item::Array(Vec::new()));
    assert_eq!(cbor!([1, 2,]), Item::array([1, 2]));
}

#[test]
fn cbor_macro_sorts_map_keys() {
    let v = cbor!({
        false: 8,
        [-1]: 7,
        [100]: 6,
        "aa": 5,
        z: 4,
        -1: 3,
        100: 2,
        10: 1,
    });
    assert_eq!(v.hex(), "a80a011864022003617a046261610581186406812007f408");
}

#[test]
fn cbor_macro_accepts_expression_keys_and_values() {
    let key = String::from("k");
    let value = vec![1_u8, 2, 3];
    let v = cbor!({ (key.clone()): (value.clone()), (1 + 1): (Item::tagged(1, 0)) });

    let mut expected = Map::new();
    expected.insert(key, value);
    expected.insert(2, Item::tagged(1, 0));
    assert_eq!(v, Item::Map(expected));
}

#[test]
fn cbor_macro_last_duplicate_key_wins() {
    let v = cbor!({ a: 1, a: 2 });
    assert_eq!(v.to_string(), r#"{"a": 2}"#);
}

#[test]
fn cbor_macro_nests_maps() {
    let v = cbor!({ outer: { inner: [null] } });
    assert_eq!(v.to_string(), r#"{"outer": {"inner": [null]}}"#);
    assert_eq!(v.hex(), "a1656f75746572a165696e6e657281f6");
}
