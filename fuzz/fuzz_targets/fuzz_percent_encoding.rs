#![no_main]

use httpy::url::{FORM_SAFE, URL_SAFE, percent_decode, percent_decode_bytes, percent_encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let encoded = percent_encode(data, FORM_SAFE, true);
    assert!(encoded.is_ascii());
    if !data.contains(&b'%') {
        assert_eq!(percent_decode_bytes(&encoded, true), data);
    }

    let encoded = percent_encode(data, URL_SAFE, false);
    assert!(!encoded.contains(' '));
    if !data.contains(&b'%') && !data.contains(&b' ') {
        assert_eq!(percent_decode_bytes(&encoded, false), data);
    }

    if let Ok(s) = std::str::from_utf8(data) {
        let _ = percent_decode(s, true);
        let _ = percent_decode(s, false);
    }
});
