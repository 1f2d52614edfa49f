#![no_main]

use httpy::{Request, RequestDecoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // 一括デコード
    let _ = Request::decode(data);

    // データを分割して feed (ストリーミングシナリオ)
    let mut decoder = RequestDecoder::new();
    for chunk in data.chunks(17) {
        if decoder.feed(chunk).is_err() {
            return;
        }
        if decoder.read_headers().is_err() {
            return;
        }
    }
    decoder.mark_eof();
    if let Ok(Some(_)) = decoder.read_body() {
        assert!(decoder.into_message().is_some());
    }
});
