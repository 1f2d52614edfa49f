//! 読み取り状態の定義

/// 読み取り状態
///
/// `Opened < InHeaders < InBody < Done` の順にのみ進む。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReadState {
    /// スタートライン待ち
    Opened,
    /// スタートライン読み取り済み、ヘッダー待ち
    InHeaders,
    /// ヘッダー読み取り済み、ボディ読み取り中
    InBody,
    /// 完了
    Done,
}
