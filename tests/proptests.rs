// Property-based tests for canonical encode/decode roundtrips.
//
// Sizes and depths stay small to keep CI fast.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;

use dcbor::{decode, validate_canonical, DecodeLimits, Item, Map, Simple};

fn arb_float() -> impl Strategy<Value = f64> {
    // NaN never equals itself; it is covered by the canonical-bytes property instead.
    any::<f64>().prop_filter("exclude NaN", |f| !f.is_nan())
}

fn arb_leaf() -> impl Strategy<Value = Item> {
    prop_oneof![
        any::<u64>().prop_map(Item::Unsigned),
        any::<u64>().prop_map(Item::Negative),
        proptest::collection::vec(any::<u8>(), 0..64).prop_map(Item::ByteString),
        ".{0,24}".prop_map(Item::TextString),
        any::<bool>().prop_map(Item::from),
        Just(Item::NULL),
        arb_float().prop_map(Item::float),
    ]
}

fn arb_item() -> impl Strategy<Value = Item> {
    arb_leaf().prop_recursive(4, 256, 10, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..12).prop_map(Item::Array),
            proptest::collection::vec((inner.clone(), inner.clone()), 0..12)
                .prop_map(|pairs| Item::Map(pairs.into_iter().collect::<Map>())),
            (any::<u64>(), inner).prop_map(|(tag, item)| Item::tagged(tag, item)),
        ]
    })
}

proptest! {
    #[test]
    fn encode_decode_roundtrip(item in arb_item()) {
        let bytes = item.to_cbor_data();
        let back = decode(&bytes).unwrap();
        prop_assert_eq!(&back, &item);
        prop_assert_eq!(back.to_cbor_data(), bytes);
    }

    #[test]
    fn validation_agrees_with_decode(item in arb_item()) {
        let bytes = item.to_cbor_data();
        let canon = validate_canonical(&bytes, DecodeLimits::for_bytes(bytes.len())).unwrap();
        prop_assert_eq!(canon.as_bytes(), bytes.as_slice());
    }

    #[test]
    fn floats_encode_in_shortest_exact_form(v in any::<f64>()) {
        let item = Item::float(v);
        let bytes = item.to_cbor_data();
        let back = decode(&bytes).unwrap();
        if v.is_nan() {
            prop_assert_eq!(bytes, vec![0xf9, 0x7e, 0x00]);
        } else {
            prop_assert_eq!(back.as_f64().unwrap(), v);
            if let Item::Simple(Simple::Float(_)) = back {
                prop_assert!(v.fract() != 0.0 || v.is_infinite() || v.abs() >= 9.0e18);
            }
        }
    }

    #[test]
    fn map_keys_are_strictly_increasing(pairs in proptest::collection::vec((arb_leaf(), arb_leaf()), 0..24)) {
        let map: Map = pairs.into_iter().collect();
        let encoded: Vec<Vec<u8>> = map.keys().map(Item::to_cbor_data).collect();
        for w in encoded.windows(2) {
            prop_assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn arbitrary_input_never_panics(data in proptest::collection::vec(any::<u8>(), 0..64)) {
        if let Ok(item) = decode(&data) {
            prop_assert_eq!(item.to_cbor_data(), data);
        }
    }
}
