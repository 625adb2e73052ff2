//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 名前の検証、重複チェック、人数上限、履歴の再生、参加通知
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：重複した名前での参加を防ぐ
//! - 拒否されたハンドシェイクが Room の状態を変えないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加者の接続
//! - 異常系：空の名前、重複した名前、Room の容量超過

use std::sync::Arc;

use tcp_chat_shared::time::Clock;

use crate::domain::{
    ConnectionId, DeliveryReport, JoinOrder, MessageBroadcaster, Participant, ParticipantName,
    ParticipantRegistry, PusherChannel, RegistryError, SystemNotice, Timestamp,
};

use super::error::ConnectError;

/// 参加が完了した参加者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedParticipant {
    pub id: ConnectionId,
    pub name: ParticipantName,
    pub join_order: JoinOrder,
    /// 再生した履歴の行数
    pub replayed: usize,
}

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Registry（参加者レジストリの抽象化）
    registry: Arc<dyn ParticipantRegistry>,
    /// Broadcaster（ブロードキャストの抽象化）
    broadcaster: Arc<dyn MessageBroadcaster>,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(
        registry: Arc<dyn ParticipantRegistry>,
        broadcaster: Arc<dyn MessageBroadcaster>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            broadcaster,
            clock,
        }
    }

    /// 新しい接続を受け付ける余地があるか（accept 時の事前チェック）
    pub async fn has_capacity(&self) -> bool {
        self.registry.has_capacity().await
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `id` - 接続の識別子
    /// * `proposed_name` - クライアントが送ってきた名前（trim 前）
    /// * `sender` - 参加者の送信キュー
    ///
    /// # Returns
    ///
    /// * `Ok(JoinedParticipant)` - 参加成功（履歴は送信キューに再生済み）
    /// * `Err(ConnectError)` - 参加失敗（Room は変化しない）
    pub async fn execute(
        &self,
        id: ConnectionId,
        proposed_name: &str,
        sender: PusherChannel,
    ) -> Result<JoinedParticipant, ConnectError> {
        // 1. 名前の検証
        let name = ParticipantName::new(proposed_name).map_err(|_| ConnectError::EmptyName)?;

        // 2. Registry に追加（重複チェック・上限チェック・履歴の再生を含む）
        let connected_at = Timestamp::new(self.clock.now().timestamp_millis());
        let participant = Participant::new(id, name.clone(), connected_at, sender);
        let receipt = self
            .registry
            .add(participant)
            .await
            .map_err(|e| match e {
                RegistryError::NameTaken(name) => ConnectError::DuplicateName(name),
                RegistryError::AtCapacity(_) => ConnectError::CapacityExceeded,
                other => ConnectError::Registry(other),
            })?;

        Ok(JoinedParticipant {
            id,
            name,
            join_order: receipt.join_order,
            replayed: receipt.replayed,
        })
    }

    /// 参加者が join したことを他の参加者にブロードキャスト
    pub async fn broadcast_participant_joined(
        &self,
        joined: &JoinedParticipant,
    ) -> DeliveryReport {
        let notice = SystemNotice::Joined(joined.name.clone()).to_string();
        self.broadcaster
            .broadcast_except(&notice, Some(&joined.id))
            .await
    }
}
