//! ヘッダーコンテナ
//!
//! 挿入順を保持し、キーの一意性を保証するヘッダーの集合。
//! 書き込みはすべて [`Headers::add`] を経由するため、重複チェックを迂回できない。
//!
//! キーは与えられた通りに比較する (大文字小文字を区別する)。
//! 大文字小文字を区別しない検索には [`Headers::get_ignore_ascii_case`] を使う。
//!
//! ```rust
//! use httpy::Headers;
//!
//! let mut headers = Headers::new();
//! headers.host("example.com", 8080, false).unwrap();
//! headers.connection("close", false).unwrap();
//! headers.auth("bob", "secret").unwrap();
//!
//! assert_eq!(headers.get("Host"), Some("example.com:8080"));
//! assert_eq!(headers.get("Authorization"), Some("Basic Ym9iOnNlY3JldA=="));
//! assert!(headers.add("Host", "other", false).is_err());
//! ```

use crate::error::Error;

/// ヘッダーコンテナ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// ヘッダーを追加
    ///
    /// `key` が既に存在し `replace` が false の場合は `Error::DuplicateHeader` を返す。
    /// `replace` が true の場合は値を置き換え、元の位置を保つ。
    ///
    /// 名前が空、または名前 / 値に CR / LF が含まれる場合は `Error::ValueType` を返す。
    pub fn add(&mut self, key: &str, value: &str, replace: bool) -> Result<(), Error> {
        validate(key, value)?;
        if let Some((_, v)) = self.entries.iter_mut().find(|(k, _)| k == key) {
            if !replace {
                return Err(Error::DuplicateHeader(key.to_string()));
            }
            *v = value.to_string();
            return Ok(());
        }
        self.entries.push((key.to_string(), value.to_string()));
        Ok(())
    }

    /// Host ヘッダー (ポートが 80 / 443 の場合はドメインのみ)
    pub fn host(&mut self, domain: &str, port: u16, replace: bool) -> Result<(), Error> {
        let value = if port == 80 || port == 443 {
            domain.to_string()
        } else {
            format!("{}:{}", domain, port)
        };
        self.add("Host", &value, replace)
    }

    /// Connection ヘッダー
    pub fn connection(&mut self, value: &str, replace: bool) -> Result<(), Error> {
        self.add("Connection", value, replace)
    }

    /// Content-Type ヘッダー
    pub fn content_type(&mut self, value: &str) -> Result<(), Error> {
        self.add("Content-Type", value, false)
    }

    /// Content-Length ヘッダー
    pub fn content_length(&mut self, length: usize) -> Result<(), Error> {
        self.add("Content-Length", &length.to_string(), false)
    }

    /// Basic 認証の Authorization ヘッダー
    pub fn auth(&mut self, user: &str, password: &str) -> Result<(), Error> {
        let credentials = format!("{}:{}", user, password);
        let value = format!("Basic {}", base64_encode(credentials.as_bytes()));
        self.add("Authorization", &value, false)
    }

    /// ヘッダーを取得 (キーは完全一致)
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// ヘッダーを取得 (大文字小文字を区別しない)
    pub fn get_ignore_ascii_case(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// ヘッダーを削除して値を返す
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 挿入順にイテレート
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn validate(key: &str, value: &str) -> Result<(), Error> {
    if key.is_empty() {
        return Err(Error::ValueType("empty header name".to_string()));
    }
    if key.contains(':') || key.contains(['\r', '\n']) {
        return Err(Error::ValueType(format!("invalid header name: {:?}", key)));
    }
    if value.contains(['\r', '\n']) {
        return Err(Error::ValueType(format!(
            "invalid header value for {}: {:?}",
            key, value
        )));
    }
    Ok(())
}

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Base64 エンコード (RFC 4648、パディングあり)
fn base64_encode(input: &[u8]) -> String {
    let mut result = String::with_capacity(input.len().div_ceil(3) * 4);

    for chunk in input.chunks(3) {
        let b0 = chunk[0];
        let b1 = chunk.get(1).copied().unwrap_or(0);
        let b2 = chunk.get(2).copied().unwrap_or(0);

        let n = ((b0 as u32) << 16) | ((b1 as u32) << 8) | (b2 as u32);

        result.push(BASE64_ALPHABET[(n >> 18 & 0x3F) as usize] as char);
        result.push(BASE64_ALPHABET[(n >> 12 & 0x3F) as usize] as char);
        if chunk.len() > 1 {
            result.push(BASE64_ALPHABET[(n >> 6 & 0x3F) as usize] as char);
        } else {
            result.push('=');
        }
        if chunk.len() > 2 {
            result.push(BASE64_ALPHABET[(n & 0x3F) as usize] as char);
        } else {
            result.push('=');
        }
    }

    result
}
