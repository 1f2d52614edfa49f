#![no_main]

use httpy::url::{Url, query_to_map};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(url) = Url::parse(s) {
        assert!(url.path().starts_with('/'));
        assert!(!url.domain().is_empty());
        let _ = url.target();
        let _ = url.to_string();
        let _ = query_to_map(url.query());
    }
});
