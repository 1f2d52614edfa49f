//! URL とパーセントエンコーディングのプロパティテスト (url.rs)

use httpy::url::{
    FORM_SAFE, QueryMap, Scheme, URL_SAFE, Url, UrlError, map_to_query, percent_decode,
    percent_decode_bytes, percent_encode, query_to_map,
};
use proptest::prelude::*;

// ========================================
// Strategy 定義
// ========================================

fn scheme() -> impl Strategy<Value = Scheme> {
    prop_oneof![Just(Scheme::Http), Just(Scheme::Https)]
}

fn domain() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,16}(\\.[a-z0-9]{1,16}){0,3}"
}

fn path() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "/[a-zA-Z0-9/_.-]{0,32}"]
}

fn query() -> impl Strategy<Value = String> {
    "[a-z0-9=&]{0,24}"
}

/// `%` を含まないバイト列
fn bytes_without_percent() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>().prop_filter("no %", |b| *b != b'%'), 0..64)
}

// ========================================
// URL パース
// ========================================

proptest! {
    #[test]
    fn parse_components(
        scheme in scheme(),
        domain in domain(),
        port in proptest::option::of(1u16..),
        path in path(),
        query in query(),
    ) {
        let mut raw = format!("{}://{}", scheme, domain);
        if let Some(port) = port {
            raw.push_str(&format!(":{}", port));
        }
        raw.push_str(&path);
        if !query.is_empty() {
            raw.push('?');
            raw.push_str(&query);
        }

        let url = Url::parse(&raw).unwrap();
        prop_assert_eq!(url.scheme(), scheme);
        prop_assert_eq!(url.domain(), domain.as_str());
        prop_assert_eq!(url.port(), port.unwrap_or(scheme.default_port()));
        prop_assert!(url.path().starts_with('/'));
        if !path.is_empty() {
            prop_assert_eq!(url.path(), path.as_str());
        }
        prop_assert_eq!(url.query(), query.as_str());
        prop_assert!(url.credentials().is_none());
    }

    #[test]
    fn parse_without_separator_fails(raw in "[^:]*(:[^/][^:]*)?") {
        prop_assume!(!raw.contains("://"));
        prop_assert_eq!(Url::parse(&raw), Err(UrlError::MissingScheme));
    }

    #[test]
    fn parse_unsupported_scheme_fails(scheme in "[a-z]{1,8}", domain in domain()) {
        prop_assume!(scheme != "http" && scheme != "https");
        let raw = format!("{}://{}/", scheme, domain);
        prop_assert_eq!(Url::parse(&raw), Err(UrlError::UnsupportedScheme(scheme)));
    }

    #[test]
    fn display_reparses(
        scheme in scheme(),
        domain in domain(),
        port in 1u16..,
        path in path(),
        query in query(),
    ) {
        let raw = format!("{}://{}:{}{}?{}", scheme, domain, port, path, query);
        let url = Url::parse(&raw).unwrap();
        prop_assert_eq!(Url::parse(&url.to_string()).unwrap(), url);
    }
}

// ========================================
// パーセントエンコーディング
// ========================================

proptest! {
    #[test]
    fn plus_mode_roundtrip(input in bytes_without_percent()) {
        let encoded = percent_encode(&input, FORM_SAFE, true);
        prop_assert_eq!(percent_decode_bytes(&encoded, true), input);
    }

    /// 空白は `+` になり、非 plus モードのデコードでは戻らない
    #[test]
    fn url_mode_roundtrip_without_spaces(
        input in bytes_without_percent().prop_filter("no space", |b| !b.contains(&b' '))
    ) {
        let encoded = percent_encode(&input, URL_SAFE, false);
        prop_assert_eq!(percent_decode_bytes(&encoded, false), input);
    }

    /// 安全な文字の指定に ASCII 以外が含まれていても結果は ASCII のまま戻せる
    #[test]
    fn any_extra_safe_roundtrip(input in "[^% ]{0,32}", extra_safe in "[^%]{0,8}") {
        let encoded = percent_encode(input.as_bytes(), &extra_safe, false);
        prop_assert!(encoded.is_ascii());
        prop_assert_eq!(percent_decode(&encoded, false).unwrap(), input);
    }

    #[test]
    fn encoded_is_ascii_without_spaces(input in proptest::collection::vec(any::<u8>(), 0..64)) {
        let encoded = percent_encode(&input, "", false);
        prop_assert!(encoded.is_ascii());
        prop_assert!(!encoded.contains(' '));
    }

    #[test]
    fn existing_escapes_pass_through(byte in any::<u8>()) {
        let escaped = format!("%{:02X}", byte);
        prop_assert_eq!(percent_encode(escaped.as_bytes(), "", false), escaped.clone());
        prop_assert_eq!(percent_decode_bytes(&escaped, false), vec![byte]);
    }

    #[test]
    fn decode_utf8(input in "[^%]{0,32}") {
        let encoded = percent_encode(input.as_bytes(), FORM_SAFE, true);
        prop_assert_eq!(percent_decode(&encoded, true).unwrap(), input);
    }
}

// ========================================
// クエリ文字列
// ========================================

proptest! {
    #[test]
    fn form_query_roundtrip(
        params in proptest::collection::btree_map("[^%]{1,12}", "[^%]{0,12}", 0..6)
    ) {
        let query = map_to_query(&params, true);
        let map = query_to_map(&query);
        prop_assert_eq!(map.len(), params.len());

        let decoded: Vec<(String, String)> = map
            .iter()
            .map(|(k, v)| (percent_decode(k, true).unwrap(), percent_decode(v, true).unwrap()))
            .collect();
        let expected: Vec<(String, String)> = params.into_iter().collect();
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn query_map_last_write_wins(
        pairs in proptest::collection::vec(("[a-c]", "[a-z0-9]{0,4}"), 0..12)
    ) {
        let query = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        let map = query_to_map(&query);

        let mut expected = QueryMap::new();
        for (k, v) in &pairs {
            expected.insert(k, v);
        }
        prop_assert_eq!(&map, &expected);
        for (k, v) in &map {
            let last = pairs.iter().rev().find(|(key, _)| key == k).map(|(_, v)| v.as_str());
            prop_assert_eq!(Some(v), last);
        }
    }
}

#[test]
fn space_becomes_plus_in_both_modes() {
    assert_eq!(percent_encode(b"a b", "", false), "a+b");
    assert_eq!(percent_encode(b"a b", "", true), "a+b");
    assert_eq!(percent_encode(b"a+b", URL_SAFE, true), "a%2Bb");
}
