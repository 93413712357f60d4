#![no_main]

use libfuzzer_sys::fuzz_target;

use dcbor::{decode_with_limits, DecodeLimits, TagsStore};

fuzz_target!(|data: &[u8]| {
    let limits = DecodeLimits::for_bytes(data.len().min(1 << 16)).with_max_depth(32);
    if let Ok(item) = decode_with_limits(data, limits) {
        let tags = TagsStore::with_known_tags();
        let _ = item.diagnostic_opt(true, Some(&tags));
        let _ = item.hex_opt(true, Some(&tags));
        assert_eq!(item.diagnostic(), item.to_string());
    }
});
