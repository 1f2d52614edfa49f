#![no_main]

use httpy::{ReadState, ResponseDecoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = ResponseDecoder::new();
    let mut last = decoder.state();

    for chunk in data.chunks(23) {
        if decoder.feed(chunk).is_err() {
            return;
        }
        let Ok(line) = decoder.read_start_line() else {
            return;
        };
        let line = line.cloned();
        if decoder.read_headers().is_err() {
            return;
        }

        // 状態は後戻りせず、通過済みのスタートラインは変わらない
        assert!(decoder.state() >= last);
        last = decoder.state();
        if let Some(line) = line {
            assert_eq!(decoder.read_start_line(), Ok(Some(&line)));
        }
    }

    decoder.mark_eof();
    if let Ok(Some(_)) = decoder.read_body() {
        assert_eq!(decoder.state(), ReadState::Done);
    }
});
