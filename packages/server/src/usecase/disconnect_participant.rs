//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 参加者の削除と退出通知
//!
//! ### なぜこのテストが必要か
//! - 退出通知は Registry から削除した後に送る（本人には届かない）
//! - 同じ参加者の削除が二重に通知されないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と通知
//! - エッジケース：最後の参加者の切断（通知対象なし）
//! - 異常系：既に削除された参加者の切断

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DeliveryReport, MessageBroadcaster, ParticipantName, ParticipantRegistry,
    ParticipantSummary, SystemNotice,
};

use super::error::DisconnectError;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    registry: Arc<dyn ParticipantRegistry>,
    broadcaster: Arc<dyn MessageBroadcaster>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        registry: Arc<dyn ParticipantRegistry>,
        broadcaster: Arc<dyn MessageBroadcaster>,
    ) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(ParticipantSummary)` - 削除された参加者（削除時点の名前を含む）
    /// * `Err(DisconnectError)` - 既に登録されていない
    pub async fn execute(&self, id: &ConnectionId) -> Result<ParticipantSummary, DisconnectError> {
        self.registry
            .remove(id)
            .await
            .ok_or(DisconnectError::NotConnected)
    }

    /// 参加者が left したことを残りの参加者全員にブロードキャスト
    ///
    /// 退出した参加者は既に Registry にいないため、除外指定は不要。
    pub async fn broadcast_participant_left(&self, name: &ParticipantName) -> DeliveryReport {
        let notice = SystemNotice::Left(name.clone()).to_string();
        self.broadcaster.broadcast_except(&notice, None).await
    }

    /// 残りの参加者数を取得
    pub async fn count_remaining_participants(&self) -> usize {
        self.registry.count().await
    }
}
