//! HTTP メッセージデコーダーモジュール
//!
//! Sans I/O 設計に基づくインクリメンタルデコーダーを提供。
//! 受信したバイト列を `feed()` で投入し、スタートライン、ヘッダー、ボディの順に読み進める。
//!
//! ## 使い方
//!
//! ```rust
//! use httpy::{ReadState, ResponseDecoder};
//!
//! let mut decoder = ResponseDecoder::new();
//! decoder.feed(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nhel").unwrap();
//!
//! let status = decoder.read_start_line().unwrap().unwrap();
//! assert_eq!(status.status_code(), 200);
//!
//! let headers = decoder.read_headers().unwrap().unwrap();
//! assert_eq!(headers.get("Content-Type"), Some("text/plain"));
//!
//! // ボディは接続が閉じるまで続く
//! decoder.feed(b"lo").unwrap();
//! assert!(decoder.read_body().unwrap().is_none());
//! decoder.mark_eof();
//! assert_eq!(decoder.read_body().unwrap(), Some(&b"hello"[..]));
//! assert_eq!(decoder.state(), ReadState::Done);
//! ```

mod line;
mod message;
mod state;

pub use message::{MessageDecoder, RequestDecoder, ResponseDecoder};
pub use state::ReadState;
