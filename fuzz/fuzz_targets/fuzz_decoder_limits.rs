#![no_main]

use arbitrary::Arbitrary;
use httpy::{DecoderLimits, Error, ResponseDecoder};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    max_buffer_size: u16,
    max_headers_count: u8,
    max_header_line_size: u16,
    max_body_size: u16,
    chunks: Vec<Vec<u8>>,
}

fuzz_target!(|input: Input| {
    let limits = DecoderLimits {
        max_buffer_size: input.max_buffer_size as usize,
        max_headers_count: input.max_headers_count as usize,
        max_header_line_size: input.max_header_line_size as usize,
        max_body_size: input.max_body_size as usize,
    };
    let mut decoder = ResponseDecoder::with_limits(limits.clone());

    for chunk in &input.chunks {
        match decoder.feed(chunk) {
            Ok(()) => {}
            Err(Error::BufferOverflow { size, limit }) | Err(Error::BodyTooLarge { size, limit }) => {
                assert!(size > limit);
                return;
            }
            Err(e) => panic!("unexpected feed error: {e}"),
        }
        match decoder.read_headers() {
            Ok(Some(headers)) => assert!(headers.len() <= limits.max_headers_count),
            Ok(None) => {}
            Err(_) => return,
        }
    }

    decoder.mark_eof();
    if let Ok(Some(body)) = decoder.read_body() {
        assert!(body.len() <= limits.max_body_size);
    }
});
