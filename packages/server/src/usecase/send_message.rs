//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - チャット行の生成、履歴への追加、送信者以外へのブロードキャスト、ログへの追記
//!
//! ### なぜこのテストが必要か
//! - チャット行は送信時点の名前とタイムスタンプで一度だけ作られる
//! - ログへの追記の失敗がチャットの配信に影響しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - 異常系：空のメッセージ、ログへの追記失敗
//! - エッジケース：送信者のみが接続している場合（ブロードキャスト対象なし）

use std::sync::Arc;

use tcp_chat_shared::time::{Clock, format_chat_timestamp};

use crate::domain::{ChatLine, ChatLogSink, ConnectionId, MessageBroadcaster};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Broadcaster（履歴とブロードキャストの抽象化）
    broadcaster: Arc<dyn MessageBroadcaster>,
    /// LogSink（チャットログの永続化の抽象化）
    log_sink: Arc<dyn ChatLogSink>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        broadcaster: Arc<dyn MessageBroadcaster>,
        log_sink: Arc<dyn ChatLogSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            broadcaster,
            log_sink,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `from` - 送信者の接続 ID
    /// * `body` - メッセージ本文
    ///
    /// # Returns
    ///
    /// * `Ok(ChatLine)` - 履歴に追加され、ブロードキャストされたチャット行
    /// * `Err(SendMessageError)` - 送信失敗
    pub async fn execute(
        &self,
        from: &ConnectionId,
        body: &str,
    ) -> Result<ChatLine, SendMessageError> {
        if body.trim().is_empty() {
            return Err(SendMessageError::EmptyMessage);
        }

        // 1. 履歴への追加とブロードキャスト（送信者の現在の名前を使う）
        let timestamp = format_chat_timestamp(&self.clock.now());
        let line = self
            .broadcaster
            .publish_chat(from, &timestamp, body)
            .await
            .map_err(|_| SendMessageError::NotConnected)?;

        // 2. ログへの追記（ベストエフォート）
        if let Err(e) = self.log_sink.append(&line).await {
            tracing::error!("{}", e);
        }

        Ok(line)
    }
}
