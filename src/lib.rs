//! # httpy
//!
//! 依存なしの最小 HTTP/1.1 クライアントコア (Sans I/O)
//!
//! ## 特徴
//!
//! - **依存なし**: 標準ライブラリのみ使用
//! - **Sans I/O**: I/O を完全に分離した設計
//! - **Connection: close**: 1 接続 1 交換、ボディは接続が閉じるまで読み取る
//!
//! ## 使い方
//!
//! ### リクエストの組み立て
//!
//! ```rust
//! use httpy::url::Url;
//! use httpy::{Method, Request, RequestLine};
//!
//! let url = Url::parse("http://example.com:8080/search?q=rust").unwrap();
//!
//! let line = RequestLine::new(Method::Get.as_str(), &url.target()).unwrap();
//! let mut request = Request::new(line);
//! request.headers.host(url.domain(), url.port(), false).unwrap();
//! request.headers.connection("close", false).unwrap();
//!
//! assert_eq!(
//!     request.encode(),
//!     b"GET /search?q=rust HTTP/1.1\r\nHost: example.com:8080\r\nConnection: close\r\n\r\n"
//! );
//! ```
//!
//! ### レスポンスの読み取り
//!
//! ```rust
//! use httpy::ResponseDecoder;
//!
//! let mut decoder = ResponseDecoder::new();
//! decoder.feed(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nHello").unwrap();
//! decoder.mark_eof();
//! decoder.read_body().unwrap();
//!
//! let response = decoder.into_message().unwrap();
//! assert_eq!(response.status_code(), 200);
//! assert_eq!(response.headers.get("Content-Type"), Some("text/plain"));
//! assert_eq!(response.body, b"Hello");
//! ```

mod decoder;
mod error;
mod headers;
mod limits;
mod message;
mod method;
pub mod status;
pub mod url;

pub use decoder::{MessageDecoder, ReadState, RequestDecoder, ResponseDecoder};
pub use error::Error;
pub use headers::Headers;
pub use limits::DecoderLimits;
pub use message::{HTTP_VERSION, Message, Request, RequestLine, Response, StartLine, StatusLine};
pub use method::Method;
