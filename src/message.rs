//! HTTP メッセージ (リクエスト / レスポンス) のモデルとエンコード
//!
//! リクエストとレスポンスはスタートラインの形だけが異なるため、
//! [`Message`] をスタートライン型でパラメーター化し、エンコードとデコードを共有する。

use core::fmt;

use crate::decoder::MessageDecoder;
use crate::error::Error;
use crate::headers::Headers;
use crate::limits::DecoderLimits;
use crate::status::StatusClass;

/// クライアントが送信する HTTP バージョン
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// スタートライン
///
/// `Display` は `"{a} {b} {c}"` 形式の 1 行 (CRLF なし) を出力する。
pub trait StartLine: fmt::Display + Sized {
    /// 受信した 1 行 (改行なし) をパース
    fn parse(line: &str) -> Result<Self, Error>;
}

/// 空白で最大 3 つのトークンに分割する (3 つ目は残り全体)
fn split_tokens(line: &str) -> Vec<&str> {
    let mut tokens = Vec::with_capacity(3);
    let mut rest = line.trim();
    while !rest.is_empty() && tokens.len() < 2 {
        match rest.find(char::is_whitespace) {
            Some(pos) => {
                tokens.push(&rest[..pos]);
                rest = rest[pos..].trim_start();
            }
            None => {
                tokens.push(rest);
                rest = "";
            }
        }
    }
    if !rest.is_empty() {
        tokens.push(rest);
    }
    tokens
}

/// 空白や改行を含まない 1 トークンか確認
fn validate_token(name: &str, value: &str) -> Result<(), Error> {
    if value.is_empty() || value.contains(char::is_whitespace) {
        return Err(Error::ValueType(format!("invalid {}: {:?}", name, value)));
    }
    Ok(())
}

/// リクエストライン (METHOD SP PATH SP VERSION)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: String,
    path: String,
    version: String,
}

impl RequestLine {
    /// HTTP/1.1 のリクエストラインを作成
    pub fn new(method: &str, path: &str) -> Result<Self, Error> {
        Self::with_version(method, path, HTTP_VERSION)
    }

    /// カスタムバージョンでリクエストラインを作成
    pub fn with_version(method: &str, path: &str, version: &str) -> Result<Self, Error> {
        validate_token("method", method)?;
        validate_token("path", path)?;
        validate_token("version", version)?;
        Ok(Self {
            method: method.to_string(),
            path: path.to_string(),
            version: version.to_string(),
        })
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl StartLine for RequestLine {
    fn parse(line: &str) -> Result<Self, Error> {
        let tokens = split_tokens(line);
        match tokens[..] {
            [method, path, version] => Ok(Self {
                method: method.to_string(),
                path: path.to_string(),
                version: version.to_string(),
            }),
            _ => Err(Error::Parse(format!("invalid request line: {:?}", line))),
        }
    }
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.method, self.path, self.version)
    }
}

/// ステータスライン (VERSION SP CODE SP REASON)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    version: String,
    status_code: u16,
    reason_phrase: String,
}

impl StatusLine {
    /// HTTP/1.1 のステータスラインを作成
    pub fn new(status_code: u16, reason_phrase: &str) -> Result<Self, Error> {
        Self::with_version(HTTP_VERSION, status_code, reason_phrase)
    }

    /// カスタムバージョンでステータスラインを作成
    pub fn with_version(
        version: &str,
        status_code: u16,
        reason_phrase: &str,
    ) -> Result<Self, Error> {
        validate_token("version", version)?;
        if reason_phrase.contains(['\r', '\n']) {
            return Err(Error::ValueType(format!(
                "invalid reason phrase: {:?}",
                reason_phrase
            )));
        }
        Ok(Self {
            version: version.to_string(),
            status_code,
            reason_phrase: reason_phrase.to_string(),
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn reason_phrase(&self) -> &str {
        &self.reason_phrase
    }
}

impl StartLine for StatusLine {
    /// ステータスコードはここで一度だけ整数に変換する
    fn parse(line: &str) -> Result<Self, Error> {
        let tokens = split_tokens(line);
        let (version, code, reason) = match tokens[..] {
            [version, code] => (version, code, ""),
            [version, code, reason] => (version, code, reason),
            _ => return Err(Error::Parse(format!("invalid status line: {:?}", line))),
        };
        let status_code = code
            .parse()
            .map_err(|_| Error::Parse(format!("invalid status code: {:?}", code)))?;
        Ok(Self {
            version: version.to_string(),
            status_code,
            reason_phrase: reason.to_string(),
        })
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.version, self.status_code, self.reason_phrase
        )
    }
}

/// HTTP メッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message<L> {
    /// スタートライン
    pub start_line: L,
    /// ヘッダー
    pub headers: Headers,
    /// ボディ
    pub body: Vec<u8>,
}

/// HTTP リクエスト
pub type Request = Message<RequestLine>;

/// HTTP レスポンス
pub type Response = Message<StatusLine>;

impl<L: StartLine> Message<L> {
    /// ヘッダーとボディが空のメッセージを作成
    pub fn new(start_line: L) -> Self {
        Self {
            start_line,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// ボディを設定 (ビルダーパターン)
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// バイト列にエンコード
    ///
    /// `STARTLINE CRLF (NAME: VALUE CRLF)* CRLF BODY`
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        buf.extend_from_slice(self.start_line.to_string().as_bytes());
        buf.extend_from_slice(b"\r\n");

        for (name, value) in self.headers.iter() {
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(value.as_bytes());
            buf.extend_from_slice(b"\r\n");
        }

        buf.extend_from_slice(b"\r\n");
        buf.extend_from_slice(&self.body);

        buf
    }

    /// 完結したバイト列からデコード
    ///
    /// 入力の終端を接続の終了とみなし、残りをすべてボディとする。
    pub fn decode(input: &[u8]) -> Result<Self, Error> {
        let mut decoder = MessageDecoder::<L>::with_limits(DecoderLimits::unlimited());
        decoder.feed(input)?;
        decoder.mark_eof();
        decoder.read_body()?;
        decoder.into_message().ok_or(Error::UnexpectedEof)
    }
}

impl Request {
    pub fn method(&self) -> &str {
        self.start_line.method()
    }

    pub fn path(&self) -> &str {
        self.start_line.path()
    }

    pub fn version(&self) -> &str {
        self.start_line.version()
    }
}

impl Response {
    pub fn version(&self) -> &str {
        self.start_line.version()
    }

    pub fn status_code(&self) -> u16 {
        self.start_line.status_code()
    }

    pub fn reason_phrase(&self) -> &str {
        self.start_line.reason_phrase()
    }

    /// ステータスコードの分類
    pub fn status_class(&self) -> Option<StatusClass> {
        StatusClass::of(self.status_code())
    }

    /// ステータスコードが成功 (2xx) か確認
    pub fn is_success(&self) -> bool {
        self.status_class() == Some(StatusClass::Successful)
    }

    /// ステータスコードがリダイレクト (3xx) か確認
    pub fn is_redirect(&self) -> bool {
        self.status_class() == Some(StatusClass::Redirection)
    }

    /// ステータスコードがクライアントエラー (4xx) か確認
    pub fn is_client_error(&self) -> bool {
        self.status_class() == Some(StatusClass::ClientError)
    }

    /// ステータスコードがサーバーエラー (5xx) か確認
    pub fn is_server_error(&self) -> bool {
        self.status_class() == Some(StatusClass::ServerError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tokens() {
        assert_eq!(split_tokens("GET / HTTP/1.1"), vec!["GET", "/", "HTTP/1.1"]);
        assert_eq!(
            split_tokens("HTTP/1.1 404 Not  Found"),
            vec!["HTTP/1.1", "404", "Not  Found"]
        );
        assert_eq!(split_tokens("  HTTP/1.1\t200  "), vec!["HTTP/1.1", "200"]);
        assert!(split_tokens("").is_empty());
    }

    #[test]
    fn test_encode_request() {
        let mut request = Request::new(RequestLine::new("POST", "/submit").unwrap());
        request.headers.add("Host", "example.com", false).unwrap();
        request.headers.content_length(5).unwrap();
        let request = request.with_body("hello");

        assert_eq!(
            request.encode(),
            b"POST /submit HTTP/1.1\r\nHost: example.com\r\nContent-Length: 5\r\n\r\nhello"
        );
    }

    #[test]
    fn test_encode_response_without_headers() {
        let response = Response::new(StatusLine::new(204, "No Content").unwrap());
        assert_eq!(response.encode(), b"HTTP/1.1 204 No Content\r\n\r\n");
    }

    #[test]
    fn test_decode_request() {
        let request = Request::decode(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();
        assert_eq!(request.method(), "GET");
        assert_eq!(request.path(), "/");
        assert_eq!(request.version(), "HTTP/1.1");
        assert_eq!(request.headers.get("Host"), Some("example.com"));
        assert_eq!(request.headers.len(), 1);
        assert!(request.body.is_empty());
    }

    #[test]
    fn test_decode_response() {
        let response =
            Response::decode(b"HTTP/1.1 404 Not Found\r\nX-A:  1 \r\n\r\nmissing").unwrap();
        assert_eq!(response.status_code(), 404);
        assert_eq!(response.reason_phrase(), "Not Found");
        assert_eq!(response.headers.get("X-A"), Some("1"));
        assert_eq!(response.body, b"missing");
        assert!(response.is_client_error());
        assert!(!response.is_success());
    }

    #[test]
    fn test_decode_invalid_status_code() {
        assert!(matches!(
            Response::decode(b"HTTP/1.1 abc OK\r\n\r\n"),
            Err(Error::Parse(_))
        ));
        assert!(matches!(
            Response::decode(b"HTTP/1.1\r\n\r\n"),
            Err(Error::Parse(_))
        ));
        assert!(matches!(
            Request::decode(b"GET /\r\n\r\n"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_roundtrip() {
        let raw: &[u8] =
            b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nX-Empty: \r\n\r\nbody\r\nmore";
        assert_eq!(Response::decode(raw).unwrap().encode(), raw);
    }

    #[test]
    fn test_invalid_start_line_values() {
        assert!(matches!(
            RequestLine::new("GET", "/a b"),
            Err(Error::ValueType(_))
        ));
        assert!(matches!(RequestLine::new("", "/"), Err(Error::ValueType(_))));
        assert!(matches!(
            StatusLine::new(200, "OK\r\nX: y"),
            Err(Error::ValueType(_))
        ));
    }
}
