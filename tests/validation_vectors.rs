use dcbor::{decode, decode_with_limits, validate_canonical, DecodeLimits, ErrorCode, Item};

fn bytes(hex: &str) -> Vec<u8> {
    hex::decode(hex).unwrap()
}

fn assert_invalid(hex: &str, code: ErrorCode) -> usize {
    let data = bytes(hex);
    let err = decode(&data).unwrap_err();
    assert_eq!(err.code, code, "input {hex}");
    let v_err = validate_canonical(&data, DecodeLimits::default()).unwrap_err();
    assert_eq!(v_err, err);
    err.offset
}

#[test]
fn rejects_overlong_integers() {
    assert_eq!(assert_invalid("1817", ErrorCode::NonCanonicalNumeric), 0);
    assert_eq!(assert_invalid("190017", ErrorCode::NonCanonicalNumeric), 0);
    assert_eq!(assert_invalid("1a0000ffff", ErrorCode::NonCanonicalNumeric), 0);
    assert_eq!(
        assert_invalid("1b00000000ffffffff", ErrorCode::NonCanonicalNumeric),
        0
    );
    assert_eq!(assert_invalid("3817", ErrorCode::NonCanonicalNumeric), 0);
    // Overlong lengths and tags use the same rule.
    assert_eq!(assert_invalid("5801ff", ErrorCode::NonCanonicalNumeric), 0);
    assert_eq!(assert_invalid("d80100", ErrorCode::NonCanonicalNumeric), 0);
    assert_eq!(assert_invalid("8218170a", ErrorCode::NonCanonicalNumeric), 1);
}

#[test]
fn rejects_non_canonical_floats() {
    for hex in [
        "fb3ff8000000000000",
        "f94a00",
        "f97e01",
        "faffc00001",
        "fb7ff9100000000001",
        "fa7f800000",
        "fb7ff0000000000000",
        "f98000",
        "fa3fc00000",
    ] {
        assert_eq!(assert_invalid(hex, ErrorCode::NonCanonicalNumeric), 0);
    }
}

#[test]
fn accepts_canonical_floats() {
    assert_eq!(decode(&bytes("f93e00")).unwrap(), Item::from(1.5));
    assert_eq!(decode(&bytes("fa4a0f2b39")).unwrap(), Item::from(2_345_678.25));
    assert_eq!(decode(&bytes("fb3ff3333333333333")).unwrap(), Item::from(1.2));
    assert_eq!(decode(&bytes("f97c00")).unwrap(), Item::from(f64::INFINITY));
    let nan = decode(&bytes("f97e00")).unwrap();
    assert!(nan.as_f64().unwrap().is_nan());
}

#[test]
fn accepts_full_integer_range() {
    assert_eq!(
        decode(&bytes("1bffffffffffffffff")).unwrap(),
        Item::Unsigned(u64::MAX)
    );
    assert_eq!(
        decode(&bytes("3bffffffffffffffff")).unwrap(),
        Item::Negative(u64::MAX)
    );
    assert_eq!(decode(&bytes("3903e7")).unwrap(), Item::from(-1000));
}

#[test]
fn rejects_trailing_bytes() {
    let data = bytes("0001");
    let err = decode(&data).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnusedData(1));
    assert_eq!(err.offset, 1);
    assert_eq!(
        err.to_string(),
        "cbor decode error at 1: 1 unused bytes after top-level item"
    );

    assert_eq!(
        decode(&bytes("6548656c6c6f0000")).unwrap_err().code,
        ErrorCode::UnusedData(2)
    );
}

#[test]
fn rejects_misordered_and_duplicate_keys() {
    let offset = assert_invalid(
        "a8f4080a011864022003617a046261610581186406812007",
        ErrorCode::MisorderedMapKey,
    );
    assert_eq!(offset, 3);

    let offset = assert_invalid(
        "a90a011864022003617a046261610581186406812007f408f408",
        ErrorCode::DuplicateMapKey,
    );
    assert_eq!(offset, 24);
}

#[test]
fn rejects_truncated_input() {
    assert_eq!(assert_invalid("", ErrorCode::Underrun), 0);
    assert_eq!(assert_invalid("1901", ErrorCode::Underrun), 1);
    assert_eq!(assert_invalid("431122", ErrorCode::Underrun), 1);
    assert_eq!(assert_invalid("8201", ErrorCode::Underrun), 2);
    assert_eq!(assert_invalid("a101", ErrorCode::Underrun), 2);
    assert_eq!(assert_invalid("c1", ErrorCode::Underrun), 1);
}

#[test]
fn huge_declared_counts_fail_without_allocating() {
    assert_eq!(assert_invalid("9b0000000100000000", ErrorCode::Underrun), 9);
    assert_eq!(assert_invalid("bb0000000100000000", ErrorCode::Underrun), 9);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn rejects_length_that_overflows_the_cursor() {
    assert_eq!(
        assert_invalid("5bffffffffffffffff", ErrorCode::LengthOverflow),
        9
    );
}

#[test]
fn rejects_reserved_and_indefinite_headers() {
    assert_eq!(assert_invalid("1c", ErrorCode::BadHeaderValue(28)), 0);
    assert_eq!(assert_invalid("5f", ErrorCode::BadHeaderValue(31)), 0);
    assert_eq!(assert_invalid("9f01ff", ErrorCode::BadHeaderValue(31)), 0);
    assert_eq!(assert_invalid("ff", ErrorCode::BadHeaderValue(31)), 0);
    assert_eq!(assert_invalid("8101fc", ErrorCode::UnusedData(1)), 2);
}

#[test]
fn rejects_invalid_text() {
    assert_eq!(assert_invalid("62fffe", ErrorCode::InvalidString), 1);
    assert_eq!(assert_invalid("8162c328", ErrorCode::InvalidString), 2);
}

#[test]
fn rejects_unsupported_simple_values() {
    assert_eq!(assert_invalid("f0", ErrorCode::InvalidSimple), 0);
    assert_eq!(assert_invalid("f7", ErrorCode::InvalidSimple), 0);
    assert_eq!(assert_invalid("f8ff", ErrorCode::InvalidSimple), 0);
    assert_eq!(assert_invalid("f810", ErrorCode::NonCanonicalNumeric), 0);
}

#[test]
fn enforces_depth_limit() {
    let data = bytes("81818101");
    let shallow = DecodeLimits::default().with_max_depth(2);
    let err = decode_with_limits(&data, shallow).unwrap_err();
    assert_eq!(err.code, ErrorCode::DepthLimitExceeded);
    assert_eq!(err.offset, 2);

    let deep_enough = DecodeLimits::default().with_max_depth(3);
    assert!(decode_with_limits(&data, deep_enough).is_ok());

    let tags = bytes("c1c1c100");
    assert_eq!(
        decode_with_limits(&tags, shallow).unwrap_err().code,
        ErrorCode::DepthLimitExceeded
    );
}

#[test]
fn enforces_input_size_limit() {
    let data = bytes("1818");
    let err = decode_with_limits(&data, DecodeLimits::for_bytes(1)).unwrap_err();
    assert_eq!(err.code, ErrorCode::InputTooLarge);
    assert_eq!(err.offset, 0);
    assert!(decode_with_limits(&data, DecodeLimits::for_bytes(2)).is_ok());
}

#[test]
fn accepts_tagged_and_string_inputs() {
    assert_eq!(
        decode(&bytes("c16548656c6c6f")).unwrap(),
        Item::tagged(1, "Hello")
    );
    assert_eq!(
        decode(&bytes("43112233")).unwrap(),
        Item::bytes(vec![0x11_u8, 0x22, 0x33])
    );
    assert_eq!(decode(&bytes("6548656c6c6f")).unwrap(), Item::text("Hello"));
    assert_eq!(decode(&bytes("00")).unwrap(), Item::from(-0.0));
}
