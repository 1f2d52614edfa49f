use std::fmt;

use crate::url::UrlError;

/// httpy のエラー
///
/// 構築時の検証エラーとデコード時のパースエラーをまとめて表す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// 不正な URL
    Url(UrlError),
    /// サポートしていないスキーム (http / https 以外)
    Protocol(String),
    /// サポートしていないメソッド
    Method(String),
    /// replace なしで既存のヘッダーを追加しようとした
    DuplicateHeader(String),
    /// ヘッダー / スタートラインに使えない値
    ValueType(String),
    /// スタートラインまたはヘッダー行のパースエラー
    Parse(String),
    /// スタートラインを受信する前にストリームが閉じられた
    UnexpectedEof,
    /// バッファサイズ超過
    BufferOverflow { size: usize, limit: usize },
    /// ヘッダー数超過
    TooManyHeaders { count: usize, limit: usize },
    /// ヘッダー行が長すぎる
    HeaderLineTooLong { size: usize, limit: usize },
    /// ボディサイズ超過
    BodyTooLarge { size: usize, limit: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Url(e) => write!(f, "invalid URL: {}", e),
            Error::Protocol(scheme) => write!(f, "unsupported protocol: {}", scheme),
            Error::Method(method) => write!(f, "unsupported method: {}", method),
            Error::DuplicateHeader(name) => write!(f, "duplicate header: {}", name),
            Error::ValueType(msg) => write!(f, "invalid value: {}", msg),
            Error::Parse(msg) => write!(f, "parse error: {}", msg),
            Error::UnexpectedEof => write!(f, "unexpected end of stream"),
            Error::BufferOverflow { size, limit } => {
                write!(f, "buffer overflow: {} > {}", size, limit)
            }
            Error::TooManyHeaders { count, limit } => {
                write!(f, "too many headers: {} > {}", count, limit)
            }
            Error::HeaderLineTooLong { size, limit } => {
                write!(f, "header line too long: {} > {}", size, limit)
            }
            Error::BodyTooLarge { size, limit } => {
                write!(f, "body too large: {} > {}", size, limit)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Url(e) => Some(e),
            _ => None,
        }
    }
}

impl From<UrlError> for Error {
    fn from(e: UrlError) -> Self {
        match e {
            // スキームの不一致は URL の形式ではなくプロトコルの問題として扱う
            UrlError::UnsupportedScheme(scheme) => Error::Protocol(scheme),
            e => Error::Url(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_scheme_becomes_protocol_error() {
        let e: Error = UrlError::UnsupportedScheme("ftp".to_string()).into();
        assert_eq!(e, Error::Protocol("ftp".to_string()));

        let e: Error = UrlError::MissingScheme.into();
        assert_eq!(e, Error::Url(UrlError::MissingScheme));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Error::DuplicateHeader("Host".to_string()).to_string(),
            "duplicate header: Host"
        );
        assert_eq!(
            Error::BodyTooLarge { size: 11, limit: 10 }.to_string(),
            "body too large: 11 > 10"
        );
    }
}
