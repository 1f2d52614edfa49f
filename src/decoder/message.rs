//! HTTP メッセージデコーダー

use crate::error::Error;
use crate::headers::Headers;
use crate::limits::DecoderLimits;
use crate::message::{Message, RequestLine, StartLine, StatusLine};

use super::line::{find_line, line_to_string, parse_header_line};
use super::state::ReadState;

/// HTTP メッセージデコーダー (Sans I/O)
///
/// 受信したバイト列を `feed()` で投入し、`read_start_line()` / `read_headers()` /
/// `read_body()` で状態を進める。各メソッドはデータ不足の場合 `Ok(None)` を返す。
///
/// 既に通過した状態の読み取りを再度呼び出すと、入力を消費せずに
/// 前回の結果を返す。ボディを要求するとヘッダーの読み取りを先に済ませる。
///
/// ボディは接続が閉じるまでのすべてのバイト列であり、
/// `mark_eof()` を呼ぶまで `read_body()` は完了しない。
#[derive(Debug)]
pub struct MessageDecoder<L> {
    buf: Vec<u8>,
    state: ReadState,
    eof: bool,
    start_line: Option<L>,
    headers: Headers,
    body: Vec<u8>,
    limits: DecoderLimits,
}

/// リクエストデコーダー
pub type RequestDecoder = MessageDecoder<RequestLine>;

/// レスポンスデコーダー
pub type ResponseDecoder = MessageDecoder<StatusLine>;

impl<L: StartLine> Default for MessageDecoder<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: StartLine> MessageDecoder<L> {
    /// 新しいデコーダーを作成
    pub fn new() -> Self {
        Self::with_limits(DecoderLimits::default())
    }

    /// 制限付きでデコーダーを作成
    pub fn with_limits(limits: DecoderLimits) -> Self {
        Self {
            buf: Vec::new(),
            state: ReadState::Opened,
            eof: false,
            start_line: None,
            headers: Headers::new(),
            body: Vec::new(),
            limits,
        }
    }

    /// 制限設定を取得
    pub fn limits(&self) -> &DecoderLimits {
        &self.limits
    }

    /// 現在の読み取り状態
    pub fn state(&self) -> ReadState {
        self.state
    }

    /// 接続終了が通知済みか
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// 受信データを追加
    ///
    /// ヘッダーまではバッファに、以降はボディに直接追加する。
    pub fn feed(&mut self, data: &[u8]) -> Result<(), Error> {
        if self.state >= ReadState::InBody {
            return self.append_body(data);
        }
        let new_size = self.buf.len() + data.len();
        if new_size > self.limits.max_buffer_size {
            return Err(Error::BufferOverflow {
                size: new_size,
                limit: self.limits.max_buffer_size,
            });
        }
        self.buf.extend_from_slice(data);
        Ok(())
    }

    /// 接続終了を通知
    ///
    /// 以降、改行で終わっていない残りのデータは最後の行として扱い、
    /// ボディはその時点までのデータで確定する。
    pub fn mark_eof(&mut self) {
        self.eof = true;
    }

    /// スタートラインを読み取る
    ///
    /// スタートラインを受信する前に接続が閉じられた場合は `Error::UnexpectedEof` を返す。
    pub fn read_start_line(&mut self) -> Result<Option<&L>, Error> {
        if self.state == ReadState::Opened {
            let Some(line) = self.take_line()? else {
                if self.eof {
                    return Err(Error::UnexpectedEof);
                }
                return Ok(None);
            };
            self.start_line = Some(L::parse(&line)?);
            self.state = ReadState::InHeaders;
        }
        Ok(self.start_line.as_ref())
    }

    /// ヘッダーを読み取る
    ///
    /// 空行で終了する。空行の前に接続が閉じられた場合は、それまでのヘッダーで確定する。
    /// 同じ名前のヘッダーが複数ある場合は後のものが優先される。
    pub fn read_headers(&mut self) -> Result<Option<&Headers>, Error> {
        if self.read_start_line()?.is_none() {
            return Ok(None);
        }
        while self.state == ReadState::InHeaders {
            match self.take_line()? {
                Some(line) if line.is_empty() => self.enter_body()?,
                Some(line) => {
                    let (name, value) = parse_header_line(&line)?;
                    if !self.headers.contains(name)
                        && self.headers.len() >= self.limits.max_headers_count
                    {
                        return Err(Error::TooManyHeaders {
                            count: self.headers.len() + 1,
                            limit: self.limits.max_headers_count,
                        });
                    }
                    self.headers.add(name, value, true)?;
                }
                None if self.eof => self.enter_body()?,
                None => return Ok(None),
            }
        }
        Ok(Some(&self.headers))
    }

    /// ボディを読み取る
    ///
    /// 接続終了が通知されるまでは `Ok(None)` を返す。
    pub fn read_body(&mut self) -> Result<Option<&[u8]>, Error> {
        if self.read_headers()?.is_none() {
            return Ok(None);
        }
        if self.state == ReadState::InBody {
            if !self.eof {
                return Ok(None);
            }
            self.state = ReadState::Done;
        }
        Ok(Some(&self.body))
    }

    /// 読み取り済みのスタートライン
    pub fn start_line(&self) -> Option<&L> {
        self.start_line.as_ref()
    }

    /// 読み取り済みのヘッダー (ヘッダー読み取り中は途中まで)
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// 受信済みのボディ (`Done` になるまでは途中まで)
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// 完了したメッセージを取り出す (`Done` 以外は None)
    pub fn into_message(self) -> Option<Message<L>> {
        if self.state != ReadState::Done {
            return None;
        }
        let start_line = self.start_line?;
        Some(Message {
            start_line,
            headers: self.headers,
            body: self.body,
        })
    }

    /// バッファから 1 行取り出す (改行なし)
    fn take_line(&mut self) -> Result<Option<String>, Error> {
        let limit = self.limits.max_header_line_size;
        match find_line(&self.buf) {
            Some(pos) => {
                if pos > limit {
                    return Err(Error::HeaderLineTooLong { size: pos, limit });
                }
                let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
                line.pop();
                line_to_string(line).map(Some)
            }
            None => {
                if self.buf.len() > limit {
                    return Err(Error::HeaderLineTooLong {
                        size: self.buf.len(),
                        limit,
                    });
                }
                if self.eof && !self.buf.is_empty() {
                    let line = std::mem::take(&mut self.buf);
                    return line_to_string(line).map(Some);
                }
                Ok(None)
            }
        }
    }

    /// ヘッダー終了後、バッファの残りをボディに移す
    fn enter_body(&mut self) -> Result<(), Error> {
        self.state = ReadState::InBody;
        let rest = std::mem::take(&mut self.buf);
        self.append_body(&rest)
    }

    fn append_body(&mut self, data: &[u8]) -> Result<(), Error> {
        let new_size = self.body.len() + data.len();
        if new_size > self.limits.max_body_size {
            return Err(Error::BodyTooLarge {
                size: new_size,
                limit: self.limits.max_body_size,
            });
        }
        self.body.extend_from_slice(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_in_one_feed() {
        let mut decoder = ResponseDecoder::new();
        decoder
            .feed(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nhello")
            .unwrap();
        assert_eq!(decoder.state(), ReadState::Opened);

        let line = decoder.read_start_line().unwrap().unwrap();
        assert_eq!(line.status_code(), 200);
        assert_eq!(decoder.state(), ReadState::InHeaders);

        let headers = decoder.read_headers().unwrap().unwrap();
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(decoder.state(), ReadState::InBody);

        // 接続が閉じるまでボディは確定しない
        assert_eq!(decoder.read_body().unwrap(), None);
        decoder.mark_eof();
        assert_eq!(decoder.read_body().unwrap(), Some(&b"hello"[..]));
        assert_eq!(decoder.state(), ReadState::Done);

        let response = decoder.into_message().unwrap();
        assert_eq!(response.body, b"hello");
    }

    #[test]
    fn test_partial_lines() {
        let mut decoder = RequestDecoder::new();
        decoder.feed(b"GET / HT").unwrap();
        assert!(decoder.read_start_line().unwrap().is_none());
        decoder.feed(b"TP/1.1\r\nHost: a").unwrap();
        assert_eq!(decoder.read_start_line().unwrap().unwrap().method(), "GET");
        assert!(decoder.read_headers().unwrap().is_none());
        decoder.feed(b"\r\n\r\n").unwrap();
        assert_eq!(
            decoder.read_headers().unwrap().unwrap().get("Host"),
            Some("a")
        );
    }

    #[test]
    fn test_read_body_forces_headers() {
        let mut decoder = ResponseDecoder::new();
        decoder.feed(b"HTTP/1.1 200 OK\r\nA: 1\r\n\r\nxyz").unwrap();
        decoder.mark_eof();
        assert_eq!(decoder.read_body().unwrap(), Some(&b"xyz"[..]));
        assert_eq!(decoder.headers().get("A"), Some("1"));
        assert_eq!(decoder.start_line().unwrap().reason_phrase(), "OK");
    }

    #[test]
    fn test_reads_are_idempotent() {
        let mut decoder = ResponseDecoder::new();
        decoder.feed(b"HTTP/1.1 200 OK\r\n\r\n").unwrap();
        decoder.read_headers().unwrap().unwrap();

        // ボディに入った後のデータはスタートライン / ヘッダーとして読まれない
        decoder.feed(b"HTTP/1.1 500 Oops\r\nB: 2\r\n\r\n").unwrap();
        assert_eq!(decoder.read_start_line().unwrap().unwrap().status_code(), 200);
        assert!(decoder.read_headers().unwrap().unwrap().is_empty());

        decoder.mark_eof();
        assert_eq!(
            decoder.read_body().unwrap(),
            Some(&b"HTTP/1.1 500 Oops\r\nB: 2\r\n\r\n"[..])
        );
        assert_eq!(
            decoder.read_body().unwrap(),
            Some(&b"HTTP/1.1 500 Oops\r\nB: 2\r\n\r\n"[..])
        );
        assert_eq!(decoder.state(), ReadState::Done);
    }

    #[test]
    fn test_bare_lf_lines() {
        let mut decoder = ResponseDecoder::new();
        decoder.feed(b"HTTP/1.0 200 OK\nA: 1\n\nbody").unwrap();
        decoder.mark_eof();
        decoder.read_body().unwrap();
        let response = decoder.into_message().unwrap();
        assert_eq!(response.version(), "HTTP/1.0");
        assert_eq!(response.headers.get("A"), Some("1"));
        assert_eq!(response.body, b"body");
    }

    #[test]
    fn test_eof_before_start_line() {
        let mut decoder = ResponseDecoder::new();
        decoder.mark_eof();
        assert_eq!(decoder.read_start_line(), Err(Error::UnexpectedEof));
    }

    #[test]
    fn test_eof_in_headers_ends_headers() {
        let mut decoder = ResponseDecoder::new();
        decoder.feed(b"HTTP/1.1 200 OK\r\nA: 1\r\nB: 2").unwrap();
        assert!(decoder.read_headers().unwrap().is_none());
        decoder.mark_eof();
        let headers = decoder.read_headers().unwrap().unwrap();
        assert_eq!(headers.get("B"), Some("2"));
        assert_eq!(decoder.read_body().unwrap(), Some(&b""[..]));
    }

    #[test]
    fn test_duplicate_header_last_wins() {
        let mut decoder = ResponseDecoder::new();
        decoder.feed(b"HTTP/1.1 200 OK\r\nA: 1\r\nB: 2\r\nA: 3\r\n\r\n").unwrap();
        let headers = decoder.read_headers().unwrap().unwrap();
        let entries: Vec<_> = headers.iter().collect();
        assert_eq!(entries, vec![("A", "3"), ("B", "2")]);
    }

    #[test]
    fn test_invalid_header_line() {
        let mut decoder = ResponseDecoder::new();
        decoder.feed(b"HTTP/1.1 200 OK\r\nbroken\r\n\r\n").unwrap();
        assert!(matches!(decoder.read_headers(), Err(Error::Parse(_))));
    }

    #[test]
    fn test_limits() {
        let limits = DecoderLimits {
            max_buffer_size: 32,
            ..DecoderLimits::default()
        };
        let mut decoder = ResponseDecoder::with_limits(limits);
        assert!(matches!(
            decoder.feed(&[b'a'; 33]),
            Err(Error::BufferOverflow { size: 33, limit: 32 })
        ));

        let limits = DecoderLimits {
            max_header_line_size: 8,
            ..DecoderLimits::default()
        };
        let mut decoder = ResponseDecoder::with_limits(limits);
        decoder.feed(b"HTTP/1.1 200 OK\r\n").unwrap();
        assert!(matches!(
            decoder.read_start_line(),
            Err(Error::HeaderLineTooLong { .. })
        ));

        let limits = DecoderLimits {
            max_headers_count: 1,
            ..DecoderLimits::default()
        };
        let mut decoder = ResponseDecoder::with_limits(limits);
        decoder.feed(b"HTTP/1.1 200 OK\r\nA: 1\r\nB: 2\r\n\r\n").unwrap();
        assert!(matches!(
            decoder.read_headers(),
            Err(Error::TooManyHeaders { count: 2, limit: 1 })
        ));

        let limits = DecoderLimits {
            max_body_size: 4,
            ..DecoderLimits::default()
        };
        let mut decoder = ResponseDecoder::with_limits(limits);
        decoder.feed(b"HTTP/1.1 200 OK\r\n\r\nabc").unwrap();
        decoder.read_headers().unwrap().unwrap();
        assert!(matches!(
            decoder.feed(b"de"),
            Err(Error::BodyTooLarge { size: 5, limit: 4 })
        ));
    }

    #[test]
    fn test_into_message_requires_done() {
        let mut decoder = ResponseDecoder::new();
        decoder.feed(b"HTTP/1.1 200 OK\r\n\r\n").unwrap();
        decoder.read_headers().unwrap().unwrap();
        assert!(decoder.into_message().is_none());
    }
}
