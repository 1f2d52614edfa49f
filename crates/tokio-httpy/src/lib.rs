//! tokio_httpy - Tokio integration for httpy
//!
//! tokio と tokio-rustls を使用した非同期 HTTP/1.1 クライアントライブラリ。
//!
//! ## 特徴
//!
//! - **httpy ベース**: Sans I/O ライブラリのデコーダーをストリームで駆動する
//! - **非同期 I/O**: 接続、送信、受信をそれぞれタイムアウト付きで待機する
//! - **TLS 対応**: https の場合は tokio-rustls で接続をラップする
//! - **1 接続 1 交換**: 接続は再利用せず、常に `Connection: close` で送信する
//!
//! ## 使い方
//!
//! ```ignore
//! use tokio_httpy::{Client, ResponseExt};
//!
//! let client = Client::new();
//!
//! // GET
//! let response = client.get("http://example.com/path").await?;
//! println!("{}", response.text()?);
//!
//! // JSON を送信
//! let response = client.post("http://example.com/api")
//!     .json_text("{\"key\": \"value\"}")
//!     .await?;
//!
//! // 複数の交換を並行に実行
//! let results = tokio_httpy::fetch_all([
//!     client.get("http://example.com/a").into_future(),
//!     client.get("http://example.com/b").into_future(),
//! ]).await;
//! ```

pub mod blocking;
pub mod client;
pub mod error;
pub mod reader;
pub mod response_ext;
pub mod transport;

pub use blocking::BlockingClient;
pub use client::{Client, Exchange, RequestBuilder, fetch_all};
pub use error::{Error, Result};
pub use reader::ResponseReader;
pub use response_ext::{JsonError, ResponseExt};
pub use transport::{Transport, default_tls_config};

// httpy の型を re-export
pub use httpy::{Method, Request, Response};
