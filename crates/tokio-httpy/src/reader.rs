//! ストリームに結び付いたレスポンスリーダー
//!
//! [`httpy::ResponseDecoder`] の各読み取りを、データが足りるまでストリームから
//! 読み込みながら進める。既に通過した状態の読み取りは入力を消費せずに前回の結果を返す。

use std::time::Duration;

use httpy::{DecoderLimits, Headers, ReadState, Response, ResponseDecoder, StatusLine};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};

const READ_BUFFER_SIZE: usize = 8192;

/// レスポンスリーダー
///
/// ボディを最後まで読み取るとストリームを閉じる。
/// ボディを読まずに終了する場合は [`ResponseReader::close`] を呼ぶ。
pub struct ResponseReader<S> {
    stream: Option<S>,
    decoder: ResponseDecoder,
    read_timeout: Duration,
    buf: Vec<u8>,
}

impl<S> ResponseReader<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// ストリームからレスポンスを読み取るリーダーを作成
    pub fn new(stream: S, limits: DecoderLimits, read_timeout: Duration) -> Self {
        Self {
            stream: Some(stream),
            decoder: ResponseDecoder::with_limits(limits),
            read_timeout,
            buf: vec![0; READ_BUFFER_SIZE],
        }
    }

    /// 現在の読み取り状態
    pub fn state(&self) -> ReadState {
        self.decoder.state()
    }

    /// ストリームが閉じられているか
    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// ステータスラインを読み取る
    pub async fn read_start_line(&mut self) -> Result<&StatusLine> {
        while self.decoder.read_start_line()?.is_none() {
            self.fill().await?;
        }
        self.decoder
            .start_line()
            .ok_or(Error::InvalidState("status line is not decoded"))
    }

    /// ヘッダーを読み取る (ステータスラインが未読なら先に読む)
    pub async fn read_headers(&mut self) -> Result<&Headers> {
        while self.decoder.read_headers()?.is_none() {
            self.fill().await?;
        }
        Ok(self.decoder.headers())
    }

    /// 接続が閉じられるまでボディを読み取り、ストリームを閉じる
    pub async fn read_body(&mut self) -> Result<&[u8]> {
        while self.decoder.read_body()?.is_none() {
            self.fill().await?;
        }
        self.close().await;
        Ok(self.decoder.body())
    }

    /// ボディまで読み取ってレスポンスを取り出す
    pub async fn into_response(mut self) -> Result<Response> {
        self.read_body().await?;
        self.decoder
            .into_message()
            .ok_or(Error::InvalidState("response is not complete"))
    }

    /// ストリームを閉じる
    ///
    /// 閉じた後にデータが必要な読み取りを行うと `Error::ConnectionClosed` を返す。
    pub async fn close(&mut self) {
        let Some(mut stream) = self.stream.take() else {
            return;
        };
        log::debug!("closing connection");
        // 相手が先に閉じている場合は失敗することがある
        if let Err(e) = stream.shutdown().await {
            log::debug!("shutdown failed: {}", e);
        }
    }

    /// ストリームから 1 回読み込んでデコーダーに投入する
    async fn fill(&mut self) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::ConnectionClosed)?;
        let n = tokio::time::timeout(self.read_timeout, stream.read(&mut self.buf)).await??;
        if n == 0 {
            log::debug!("peer closed the connection");
            self.decoder.mark_eof();
        } else {
            log::trace!("read {} bytes", n);
            self.decoder.feed(&self.buf[..n])?;
        }
        Ok(())
    }
}
