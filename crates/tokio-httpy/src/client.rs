//! HTTP/HTTPS クライアント
//!
//! 1 回の交換ごとに接続を作り、`Connection: close` でリクエストを送信し、
//! 接続が閉じられるまでレスポンスを読み取る。
//!
//! ## 使い方
//!
//! ```ignore
//! use tokio_httpy::Client;
//!
//! let client = Client::new();
//!
//! // GET
//! let response = client.get("http://example.com/path").await?;
//!
//! // クエリパラメータとヘッダー
//! let response = client.get("http://example.com/search")
//!     .params([("q", "rust")])
//!     .header("User-Agent", "my-app")
//!     .await?;
//!
//! // フォーム送信
//! let response = client.post("http://example.com/form")
//!     .form([("a", "1"), ("b", "x y")])
//!     .await?;
//!
//! // ヘッダーだけ読み取る
//! let mut reader = client.get("http://example.com/large").build()?.fetch(false).await?;
//! let status = reader.read_start_line().await?.status_code();
//! reader.close().await;
//! ```

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use httpy::url::{Url, map_to_query};
use httpy::{DecoderLimits, Headers, Method, Request, RequestLine, Response};
use rustls::ClientConfig;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::reader::ResponseReader;
use crate::transport::{Transport, default_tls_config};

const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// 呼び出し側が上書きできないヘッダー
const FRAMING_HEADERS: [&str; 2] = ["Connection", "Content-Length"];

/// HTTP クライアント
///
/// タイムアウト、TLS 設定、デコーダーの制限を保持するハンドル。
/// 接続は保持しないため、複製して複数のタスクから使用できる。
#[derive(Clone)]
pub struct Client {
    connect_timeout: Duration,
    read_timeout: Duration,
    write_timeout: Duration,
    tls_config: Option<Arc<ClientConfig>>,
    limits: DecoderLimits,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// 新しいクライアントを作成
    pub fn new() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(60),
            write_timeout: Duration::from_secs(30),
            tls_config: None,
            limits: DecoderLimits::default(),
        }
    }

    /// TLS 設定を指定 (HTTPS 用)
    ///
    /// 指定しない場合は OS のルート証明書ストアを使用する。
    pub fn tls_config(mut self, config: Arc<ClientConfig>) -> Self {
        self.tls_config = Some(config);
        self
    }

    /// 接続タイムアウトを設定 (TLS ハンドシェイクを含む)
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// 読み取りタイムアウトを設定 (1 回の読み込みごと)
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// 書き込みタイムアウトを設定
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// レスポンスデコーダーの制限を設定
    pub fn limits(mut self, limits: DecoderLimits) -> Self {
        self.limits = limits;
        self
    }

    /// GET リクエストを作成
    pub fn get(&self, url: &str) -> RequestBuilder<'_> {
        self.request(Method::Get, url)
    }

    /// POST リクエストを作成
    pub fn post(&self, url: &str) -> RequestBuilder<'_> {
        self.request(Method::Post, url)
    }

    /// PUT リクエストを作成
    pub fn put(&self, url: &str) -> RequestBuilder<'_> {
        self.request(Method::Put, url)
    }

    /// DELETE リクエストを作成
    pub fn delete(&self, url: &str) -> RequestBuilder<'_> {
        self.request(Method::Delete, url)
    }

    /// HEAD リクエストを作成
    pub fn head(&self, url: &str) -> RequestBuilder<'_> {
        self.request(Method::Head, url)
    }

    /// 任意のメソッドでリクエストを作成
    ///
    /// 文字列のメソッド名は `Method::from_str` で検証してから渡す。
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder<'_> {
        RequestBuilder {
            client: self,
            method,
            url: url.to_string(),
            params: Vec::new(),
            headers: Vec::new(),
            data: None,
            json: None,
            auth: None,
        }
    }
}

/// リクエストビルダー
///
/// Client のメソッド (get, post など) から取得し、パラメータやボディを追加してから
/// `.await` でリクエストを送信する。
/// 検証はすべて [`RequestBuilder::build`] で行い、失敗した場合は I/O を行わない。
pub struct RequestBuilder<'a> {
    client: &'a Client,
    method: Method,
    url: String,
    params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    data: Option<Vec<u8>>,
    json: Option<String>,
    auth: Option<(String, String)>,
}

impl<'a> RequestBuilder<'a> {
    /// クエリパラメータを追加
    ///
    /// URL の既存のクエリに `&` で連結する。エンコードは行わない。
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in params {
            self.params
                .push((key.as_ref().to_string(), value.as_ref().to_string()));
        }
        self
    }

    /// ヘッダーを追加
    ///
    /// 自動で設定されるヘッダー (Host など) と同じ名前の場合は値を上書きする。
    /// ボディは接続が閉じるまで読み取るため、`Connection` と `Content-Length` は上書きできず、
    /// 指定した場合は [`RequestBuilder::build`] が `Error::Http(httpy::Error::ValueType)` を返す。
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// フォームデータをボディに設定
    ///
    /// plus モードでエンコードし、`Content-Type: application/x-www-form-urlencoded` を設定する。
    pub fn form<I, K, V>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.data = Some(map_to_query(data, true).into_bytes());
        self
    }

    /// エンコード済みのフォームデータをボディに設定
    pub fn data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// 値を JSON にシリアライズしてボディに設定
    ///
    /// `Content-Type: application/json` を設定する。フォームデータが指定されている場合は無視される。
    pub fn json<T: nojson::DisplayJson>(mut self, value: T) -> Self {
        self.json = Some(nojson::Json(value).to_string());
        self
    }

    /// JSON テキストをそのままボディに設定
    pub fn json_text(mut self, text: &str) -> Self {
        self.json = Some(text.to_string());
        self
    }

    /// Basic 認証を設定
    ///
    /// 指定しない場合は URL に含まれる認証情報を使用する。
    pub fn auth(mut self, user: &str, password: &str) -> Self {
        self.auth = Some((user.to_string(), password.to_string()));
        self
    }

    /// URL とリクエストを検証して交換を作成
    pub fn build(self) -> Result<Exchange> {
        let url = Url::parse(&self.url)?.with_params(
            self.params
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
        let line = RequestLine::new(self.method.as_str(), &url.target())?;
        let mut request = Request::new(line);

        let headers = &mut request.headers;
        headers.host(url.domain(), url.port(), false)?;
        headers.connection("close", false)?;

        // 空のフォームデータは指定なしとして扱う
        let data = self.data.filter(|data| !data.is_empty());
        match (data, self.json) {
            (Some(data), _) => {
                headers.content_type(CONTENT_TYPE_FORM)?;
                request.body = data;
            }
            (None, Some(json)) => {
                headers.content_type(CONTENT_TYPE_JSON)?;
                request.body = json.into_bytes();
            }
            (None, None) => {}
        }
        request.headers.content_length(request.body.len())?;

        let credentials = self.auth.or_else(|| {
            url.credentials()
                .map(|c| (c.user().to_string(), c.password().to_string()))
        });
        if let Some((user, password)) = credentials {
            request.headers.auth(&user, &password)?;
        }

        for (name, value) in &self.headers {
            if FRAMING_HEADERS
                .iter()
                .any(|framing| name.eq_ignore_ascii_case(framing))
            {
                return Err(httpy::Error::ValueType(format!(
                    "{} is managed by the client",
                    name
                ))
                .into());
            }
            request.headers.add(name, value, true)?;
        }

        Ok(Exchange {
            client: self.client.clone(),
            url,
            request,
            transport: None,
            sent: false,
        })
    }

    async fn send(self) -> Result<Response> {
        self.build()?.fetch(true).await?.into_response().await
    }
}

impl<'a> IntoFuture for RequestBuilder<'a> {
    type Output = Result<Response>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send + 'a>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.send())
    }
}

/// 1 回の交換
///
/// 1 つのリクエストと 1 つの接続を所有する。
/// `connect` -> `send` -> `receive` の順に呼び出す (`fetch` はこれをまとめたもの)。
pub struct Exchange {
    client: Client,
    url: Url,
    request: Request,
    transport: Option<Transport>,
    sent: bool,
}

impl Exchange {
    /// 接続先 URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// 送信するリクエスト
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// 送信前にヘッダーを変更する
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.request.headers
    }

    /// 接続を確立 (https の場合は TLS でラップする)
    pub async fn connect(&mut self) -> Result<()> {
        if self.transport.is_some() {
            return Err(Error::InvalidState("already connected"));
        }
        let tls_config = if self.url.is_secure() {
            Some(
                self.client
                    .tls_config
                    .clone()
                    .unwrap_or_else(default_tls_config),
            )
        } else {
            None
        };
        let (domain, port) = self.url.host();
        let transport =
            Transport::connect(domain, port, tls_config, self.client.connect_timeout).await?;
        self.transport = Some(transport);
        Ok(())
    }

    /// リクエストを送信
    pub async fn send(&mut self) -> Result<()> {
        let transport = self
            .transport
            .as_mut()
            .ok_or(Error::InvalidState("not connected"))?;
        if self.sent {
            return Err(Error::InvalidState("request already sent"));
        }
        let bytes = self.request.encode();
        log::debug!(
            "sending {} {} ({} bytes)",
            self.request.method(),
            self.request.path(),
            bytes.len()
        );
        let timeout = self.client.write_timeout;
        tokio::time::timeout(timeout, async {
            transport.write_all(&bytes).await?;
            transport.flush().await
        })
        .await??;
        self.sent = true;
        Ok(())
    }

    /// レスポンスを受信
    ///
    /// ステータスラインとヘッダーは常に読み取る。
    /// `read_body` が true の場合はボディまで読み取り、接続を閉じる。
    /// false の場合は接続を開いたまま返すため、呼び出し側で `read_body` か `close` を呼ぶ。
    pub async fn receive(self, read_body: bool) -> Result<ResponseReader<Transport>> {
        if !self.sent {
            return Err(Error::InvalidState("request not sent"));
        }
        let transport = self
            .transport
            .ok_or(Error::InvalidState("not connected"))?;
        let mut reader =
            ResponseReader::new(transport, self.client.limits, self.client.read_timeout);
        reader.read_headers().await?;
        if read_body {
            reader.read_body().await?;
        }
        Ok(reader)
    }

    /// 接続、送信、受信をまとめて行う
    pub async fn fetch(mut self, read_body: bool) -> Result<ResponseReader<Transport>> {
        self.connect().await?;
        self.send().await?;
        self.receive(read_body).await
    }
}

/// 複数の交換を同じタスク上で並行に実行する
///
/// 結果は入力と同じ順序で返す。失敗した交換があっても他の交換は中断しない。
///
/// ```ignore
/// let client = Client::new();
/// let results = tokio_httpy::fetch_all([
///     client.get("http://example.com/a").into_future(),
///     client.get("http://example.com/b").into_future(),
/// ])
/// .await;
/// ```
pub async fn fetch_all<I>(futures: I) -> Vec<<I::Item as Future>::Output>
where
    I: IntoIterator,
    I::Item: Future,
{
    futures::future::join_all(futures).await
}
