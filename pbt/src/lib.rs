//! PBT テスト共通ユーティリティ

use proptest::prelude::*;

// ========================================
// トークン生成
// ========================================

/// ヘッダー名やメソッドに使える 1 文字
pub fn token_char() -> impl Strategy<Value = char> {
    prop_oneof![
        prop::char::range('a', 'z'),
        prop::char::range('A', 'Z'),
        prop::char::range('0', '9'),
        Just('-'),
        Just('_'),
        Just('.'),
    ]
}

/// 1 文字以上のトークン
pub fn token(max_len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(token_char(), 1..=max_len)
        .prop_map(|chars| chars.into_iter().collect())
}

/// 前後に空白を持たないヘッダー値 (空文字列を含む)
pub fn header_value() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[!-~]([ -~]{0,30}[!-~])?"]
}

/// キーが一意なヘッダーの列
pub fn unique_headers() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::btree_map(token(16), header_value(), 0..8)
        .prop_map(|map| map.into_iter().collect())
}
