use crate::error::Error;

/// 行末 (LF) の位置を探す
pub(crate) fn find_line(buf: &[u8]) -> Option<usize> {
    buf.iter().position(|&b| b == b'\n')
}

/// 行末の CR を取り除いて UTF-8 文字列にする
pub(crate) fn line_to_string(mut line: Vec<u8>) -> Result<String, Error> {
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    String::from_utf8(line).map_err(|e| Error::Parse(format!("invalid UTF-8: {e}")))
}

/// ヘッダー行をパース
///
/// 最初の `:` で名前と値に分割し、値の前後の空白を取り除く。
/// 名前の大文字小文字はそのまま保持する。
pub(crate) fn parse_header_line(line: &str) -> Result<(&str, &str), Error> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| Error::Parse(format!("invalid header line: missing colon: {:?}", line)))?;
    if name.is_empty() {
        return Err(Error::Parse(
            "invalid header line: empty name".to_string(),
        ));
    }
    Ok((name, value.trim()))
}
