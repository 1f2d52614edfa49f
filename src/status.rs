//! ステータスコードとステータスフレーズの対応表
//!
//! ```rust
//! use httpy::status::{reason_phrase, status_code, StatusClass};
//!
//! assert_eq!(reason_phrase(404), Some("Not Found"));
//! assert_eq!(status_code("Bad Gateway"), Some(502));
//! assert_eq!(StatusClass::of(503), Some(StatusClass::ServerError));
//! ```

/// ステータスコードの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// 1xx
    Informational,
    /// 2xx
    Successful,
    /// 3xx
    Redirection,
    /// 4xx
    ClientError,
    /// 5xx
    ServerError,
}

impl StatusClass {
    /// ステータスコードの分類 (100..600 以外は None)
    pub fn of(code: u16) -> Option<Self> {
        match code {
            100..200 => Some(StatusClass::Informational),
            200..300 => Some(StatusClass::Successful),
            300..400 => Some(StatusClass::Redirection),
            400..500 => Some(StatusClass::ClientError),
            500..600 => Some(StatusClass::ServerError),
            _ => None,
        }
    }

    /// 分類に属する既知のステータスコード
    pub fn codes(&self) -> impl Iterator<Item = (u16, &'static str)> {
        let class = *self;
        STATUS_CODES
            .iter()
            .copied()
            .filter(move |(code, _)| StatusClass::of(*code) == Some(class))
    }
}

const STATUS_CODES: &[(u16, &str)] = &[
    (100, "Continue"),
    (101, "Switching Protocols"),
    (102, "Processing"),
    (103, "Early Hints"),
    (200, "OK"),
    (201, "Created"),
    (202, "Accepted"),
    (203, "Non-Authoritative Information"),
    (204, "No Content"),
    (205, "Reset Content"),
    (206, "Partial Content"),
    (207, "Multi-Status"),
    (208, "Already Reported"),
    (226, "IM Used"),
    (300, "Multiple Choices"),
    (301, "Moved Permanently"),
    (302, "Found"),
    (303, "See Other"),
    (304, "Not Modified"),
    (305, "Use Proxy"),
    (307, "Temporary Redirect"),
    (308, "Permanent Redirect"),
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (402, "Payment Required"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (405, "Method Not Allowed"),
    (406, "Not Acceptable"),
    (407, "Proxy Authentication Required"),
    (408, "Request Timeout"),
    (409, "Conflict"),
    (410, "Gone"),
    (411, "Length Required"),
    (412, "Precondition Failed"),
    (413, "Payload Too Large"),
    (414, "URI Too Long"),
    (415, "Unsupported Media Type"),
    (416, "Range Not Satisfiable"),
    (417, "Expectation Failed"),
    (418, "I'm a teapot"),
    (421, "Misdirected Request"),
    (422, "Unprocessable Entity"),
    (423, "Locked"),
    (424, "Failed Dependency"),
    (425, "Too Early"),
    (426, "Upgrade Required"),
    (428, "Precondition Required"),
    (429, "Too Many Requests"),
    (431, "Request Header Fields Too Large"),
    (451, "Unavailable For Legal Reasons"),
    (500, "Internal Server Error"),
    (501, "Not Implemented"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
    (504, "Gateway Timeout"),
    (505, "HTTP Version Not Supported"),
    (506, "Variant Also Negotiates"),
    (507, "Insufficient Storage"),
    (508, "Loop Detected"),
    (510, "Not Extended"),
    (511, "Network Authentication Required"),
];

/// ステータスコードに対応するステータスフレーズ
pub fn reason_phrase(code: u16) -> Option<&'static str> {
    STATUS_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, phrase)| *phrase)
}

/// ステータスフレーズに対応するステータスコード (完全一致)
pub fn status_code(phrase: &str) -> Option<u16> {
    STATUS_CODES
        .iter()
        .find(|(_, p)| *p == phrase)
        .map(|(code, _)| *code)
}
