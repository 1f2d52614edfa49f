#![no_main]

use httpy::{Request, Response};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // デコードできた場合、再エンコードしてデコードすると同じメッセージになる
    if let Ok(response) = Response::decode(data) {
        let encoded = response.encode();
        assert_eq!(Response::decode(&encoded).as_ref(), Ok(&response));
    }

    if let Ok(request) = Request::decode(data) {
        let encoded = request.encode();
        assert_eq!(Request::decode(&encoded).as_ref(), Ok(&request));
    }
});
