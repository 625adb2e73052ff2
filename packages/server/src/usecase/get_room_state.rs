//! UseCase: Room の状態取得

use std::sync::Arc;

use crate::domain::{ChatLine, MessageBroadcaster, ParticipantRegistry, RoomSnapshot};

/// Room の状態取得のユースケース（管理用 API から利用）
pub struct GetRoomStateUseCase {
    registry: Arc<dyn ParticipantRegistry>,
    broadcaster: Arc<dyn MessageBroadcaster>,
}

impl GetRoomStateUseCase {
    pub fn new(
        registry: Arc<dyn ParticipantRegistry>,
        broadcaster: Arc<dyn MessageBroadcaster>,
    ) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    /// 参加者一覧と履歴件数を取得
    pub async fn execute(&self) -> RoomSnapshot {
        self.registry.room_snapshot().await
    }

    /// 履歴全体を取得
    pub async fn history(&self) -> Vec<ChatLine> {
        self.broadcaster.history().await
    }
}
