#![no_main]

use libfuzzer_sys::fuzz_target;

use dcbor::{decode_with_limits, validate_canonical, DecodeLimits};

fn fuzz_limits(input_len: usize) -> DecodeLimits {
    DecodeLimits::for_bytes(input_len.min(1 << 20)).with_max_depth(64)
}

fuzz_target!(|data: &[u8]| {
    let limits = fuzz_limits(data.len());
    match decode_with_limits(data, limits) {
        Ok(item) => {
            // Anything the decoder accepts is already canonical.
            assert_eq!(item.to_cbor_data(), data);

            let canon = validate_canonical(data, limits).expect("validate after decode");
            assert_eq!(canon.sha256(), item.sha256());
        }
        Err(err) => {
            assert!(validate_canonical(data, limits).is_err(), "{err}");
        }
    }
});
