//! Response 拡張トレイト
//!
//! httpy::Response にボディを読み取るためのメソッドを追加する。

use std::string::FromUtf8Error;

use httpy::Response;

/// Response 拡張トレイト
pub trait ResponseExt {
    /// ボディを UTF-8 文字列として取得
    fn text(&self) -> Result<String, FromUtf8Error>;

    /// ボディのバイト列への参照を取得
    fn bytes(&self) -> &[u8];

    /// ボディを JSON としてパースして型 T に変換
    ///
    /// パースに失敗した場合は、シングルクォートをダブルクォートに置き換えて一度だけ再試行する。
    fn json<T>(&self) -> Result<T, JsonError>
    where
        for<'text, 'raw> T:
            TryFrom<nojson::RawJsonValue<'text, 'raw>, Error = nojson::JsonParseError>;
}

impl ResponseExt for Response {
    fn text(&self) -> Result<String, FromUtf8Error> {
        String::from_utf8(self.body.clone())
    }

    fn bytes(&self) -> &[u8] {
        &self.body
    }

    fn json<T>(&self) -> Result<T, JsonError>
    where
        for<'text, 'raw> T:
            TryFrom<nojson::RawJsonValue<'text, 'raw>, Error = nojson::JsonParseError>,
    {
        let text = std::str::from_utf8(&self.body).map_err(JsonError::Utf8)?;
        match parse_json(text) {
            Ok(value) => Ok(value),
            Err(e) if text.contains('\'') => {
                log::warn!("invalid JSON body, retrying with single quotes replaced: {}", e);
                parse_json(&text.replace('\'', "\"")).map_err(JsonError::Parse)
            }
            Err(e) => Err(JsonError::Parse(e)),
        }
    }
}

fn parse_json<T>(text: &str) -> Result<T, nojson::JsonParseError>
where
    for<'text, 'raw> T: TryFrom<nojson::RawJsonValue<'text, 'raw>, Error = nojson::JsonParseError>,
{
    let raw = nojson::RawJson::parse(text)?;
    let value: T = raw.value().try_into()?;
    Ok(value)
}

/// JSON パースエラー
#[derive(Debug)]
pub enum JsonError {
    /// UTF-8 デコードエラー
    Utf8(std::str::Utf8Error),
    /// JSON パースエラー
    Parse(nojson::JsonParseError),
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonError::Utf8(e) => write!(f, "UTF-8 decode error: {}", e),
            JsonError::Parse(e) => write!(f, "JSON parse error: {}", e),
        }
    }
}

impl std::error::Error for JsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JsonError::Utf8(e) => Some(e),
            JsonError::Parse(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpy::StatusLine;

    fn response(body: &[u8]) -> Response {
        Response::new(StatusLine::new(200, "OK").unwrap()).with_body(body)
    }

    #[test]
    fn test_text() {
        assert_eq!(response(b"hello").text().unwrap(), "hello");
        assert!(response(&[0xFF]).text().is_err());
        assert_eq!(response(b"abc").bytes(), b"abc");
    }

    #[test]
    fn test_json() {
        let values: Vec<u32> = response(b"[1, 2, 3]").json().unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_json_single_quote_fallback() {
        let values: Vec<String> = response(b"['a', 'b']").json().unwrap();
        assert_eq!(values, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_json_errors() {
        assert!(matches!(
            response(b"not json").json::<Vec<u32>>(),
            Err(JsonError::Parse(_))
        ));
        assert!(matches!(
            response(b"['a', 1").json::<Vec<String>>(),
            Err(JsonError::Parse(_))
        ));
        assert!(matches!(
            response(&[0xFF]).json::<Vec<u32>>(),
            Err(JsonError::Utf8(_))
        ));
    }
}
