//! 同期 API
//!
//! 呼び出し側が所有するカレントスレッドランタイム上で交換を実行する。
//! 作成、使用、`shutdown` のライフサイクルは呼び出し側が管理する。
//!
//! ```ignore
//! use tokio_httpy::{BlockingClient, Client};
//!
//! let client = BlockingClient::new(Client::new())?;
//! let response = client.get("http://example.com/")?;
//! let response = client.fetch(client.client().post("http://example.com/").form([("a", "1")]))?;
//! client.shutdown();
//! ```
//!
//! tokio ランタイムの内部から呼び出すとパニックする。

use std::future::{Future, IntoFuture};

use httpy::Response;
use tokio::runtime::Runtime;

use crate::client::{Client, RequestBuilder, fetch_all};
use crate::error::Result;

/// 同期クライアント
pub struct BlockingClient {
    client: Client,
    runtime: Runtime,
}

impl BlockingClient {
    /// ランタイムを作成してクライアントを包む
    pub fn new(client: Client) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self { client, runtime })
    }

    /// リクエストの組み立てに使うクライアント
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// GET リクエストを送信
    pub fn get(&self, url: &str) -> Result<Response> {
        self.fetch(self.client.get(url))
    }

    /// POST リクエストを送信
    pub fn post(&self, url: &str) -> Result<Response> {
        self.fetch(self.client.post(url))
    }

    /// PUT リクエストを送信
    pub fn put(&self, url: &str) -> Result<Response> {
        self.fetch(self.client.put(url))
    }

    /// DELETE リクエストを送信
    pub fn delete(&self, url: &str) -> Result<Response> {
        self.fetch(self.client.delete(url))
    }

    /// HEAD リクエストを送信
    pub fn head(&self, url: &str) -> Result<Response> {
        self.fetch(self.client.head(url))
    }

    /// 組み立て済みのリクエストを送信してレスポンスを受信
    pub fn fetch(&self, request: RequestBuilder<'_>) -> Result<Response> {
        self.runtime.block_on(request.into_future())
    }

    /// 複数のリクエストを並行に実行し、入力と同じ順序で結果を返す
    pub fn fetch_all<'a, I>(&self, requests: I) -> Vec<Result<Response>>
    where
        I: IntoIterator<Item = RequestBuilder<'a>>,
    {
        let futures = requests.into_iter().map(IntoFuture::into_future);
        self.runtime.block_on(fetch_all(futures))
    }

    /// 任意の Future を完了まで実行
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// ランタイムを停止する
    pub fn shutdown(self) {
        self.runtime.shutdown_background();
    }
}
