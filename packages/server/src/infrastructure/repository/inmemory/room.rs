//! InMemory Chat Room 実装
//!
//! ドメイン層が定義する `ParticipantRegistry` と `MessageBroadcaster` の両方を、
//! 1 つの Mutex で保護した `Room` 集約の上に実装します。
//!
//! 参加者一覧と履歴は同じロックで保護されるため、
//! - 名前の重複チェックと追加
//! - 履歴への追加とブロードキャスト
//! - 参加と履歴の再生
//!
//! はそれぞれ他の操作と交錯しません。ブロードキャストは送信キューに積むだけなので、
//! 遅いソケットがロックを保持し続けることはありません。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatLine, ConnectionId, DeliveryReport, JoinReceipt, MessageBroadcaster, Participant,
    ParticipantRegistry, ParticipantSummary, RegistryError, Renamed, Room, RoomSnapshot,
};

/// インメモリ Chat Room 実装
pub struct InMemoryChatRoom {
    room: Mutex<Room>,
}

impl InMemoryChatRoom {
    /// 新しい InMemoryChatRoom を作成
    pub fn new(room: Room) -> Self {
        Self {
            room: Mutex::new(room),
        }
    }
}

impl Default for InMemoryChatRoom {
    fn default() -> Self {
        Self::new(Room::default())
    }
}

fn log_delivery_failures(report: &DeliveryReport) {
    for error in &report.failed {
        tracing::warn!("Failed to deliver line: {}, skipping", error);
    }
}

#[async_trait]
impl ParticipantRegistry for InMemoryChatRoom {
    async fn add(&self, participant: Participant) -> Result<JoinReceipt, RegistryError> {
        let mut room = self.room.lock().await;
        let receipt = room.join(participant)?;
        tracing::debug!(
            "Participant #{} added ({} / {}), replayed {} history lines",
            receipt.join_order.value(),
            room.len(),
            room.capacity(),
            receipt.replayed
        );
        Ok(receipt)
    }

    async fn remove(&self, id: &ConnectionId) -> Option<ParticipantSummary> {
        let mut room = self.room.lock().await;
        let removed = room.remove_participant(id).map(|p| p.summary());
        if removed.is_none() {
            tracing::debug!("Connection '{}' was already removed", id);
        }
        removed
    }

    async fn rename(&self, id: &ConnectionId, new_name: &str) -> Result<Renamed, RegistryError> {
        let mut room = self.room.lock().await;
        room.rename_participant(id, new_name)
    }

    async fn snapshot(&self) -> Vec<ParticipantSummary> {
        let room = self.room.lock().await;
        room.snapshot()
    }

    async fn room_snapshot(&self) -> RoomSnapshot {
        let room = self.room.lock().await;
        room.room_snapshot()
    }

    async fn count(&self) -> usize {
        let room = self.room.lock().await;
        room.len()
    }

    async fn has_capacity(&self) -> bool {
        let room = self.room.lock().await;
        !room.is_full()
    }
}

#[async_trait]
impl MessageBroadcaster for InMemoryChatRoom {
    async fn broadcast_except(
        &self,
        line: &str,
        excluded: Option<&ConnectionId>,
    ) -> DeliveryReport {
        let room = self.room.lock().await;
        let report = room.broadcast_except(line, excluded);
        log_delivery_failures(&report);
        report
    }

    async fn publish_chat(
        &self,
        from: &ConnectionId,
        timestamp: &str,
        body: &str,
    ) -> Result<ChatLine, RegistryError> {
        let mut room = self.room.lock().await;
        let (line, report) = room.publish_chat(from, timestamp, body)?;
        log_delivery_failures(&report);
        tracing::debug!("Chat line delivered to {} participants", report.delivered);
        Ok(line)
    }

    async fn history(&self) -> Vec<ChatLine> {
        let room = self.room.lock().await;
        room.history().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::{ConnectionIdFactory, HistoryBuffer, ParticipantName, Timestamp};
    use tokio::sync::mpsc::{self, Receiver};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryChatRoom の参加者操作と配信
    // - 並行アクセス時の名前の一意性と人数上限
    //
    // 【なぜこのテストが必要か】
    // - 全てのセッションタスクが同じ InMemoryChatRoom を共有する
    // - チェックと追加が同じクリティカルセクションで行われることを保証する
    //
    // 【どのようなシナリオをテストするか】
    // 1. 同じ名前での同時参加
    // 2. 上限を超える同時参加
    // 3. 履歴の順序と参加時の再生
    // ========================================

    fn new_participant(name: &str) -> (Participant, Receiver<String>) {
        let (tx, rx) = mpsc::channel(16);
        let participant = Participant::new(
            ConnectionIdFactory::generate(),
            ParticipantName::new(name).unwrap(),
            Timestamp::new(0),
            tx,
        );
        (participant, rx)
    }

    #[tokio::test]
    async fn test_concurrent_joins_with_same_name_admit_exactly_one() {
        // テスト項目: 同じ名前で同時に参加しても 1 人だけが追加される
        // given (前提条件):
        let chat_room = Arc::new(InMemoryChatRoom::new(Room::new(100)));

        // when (操作):
        let mut handles = Vec::new();
        for _ in 0..32 {
            let chat_room = chat_room.clone();
            handles.push(tokio::spawn(async move {
                let (participant, rx) = new_participant("alice");
                (chat_room.add(participant).await, rx)
            }));
        }
        let mut admitted = 0;
        let mut receivers = Vec::new();
        for handle in handles {
            let (result, rx) = handle.await.unwrap();
            if result.is_ok() {
                admitted += 1;
            } else {
                assert_eq!(result, Err(RegistryError::NameTaken("alice".to_string())));
            }
            receivers.push(rx);
        }

        // then (期待する結果):
        assert_eq!(admitted, 1);
        assert_eq!(chat_room.count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_joins_never_exceed_capacity() {
        // テスト項目: 上限を超える数の参加が同時に起きても上限を超えない
        // given (前提条件):
        let chat_room = Arc::new(InMemoryChatRoom::new(Room::new(10)));

        // when (操作):
        let mut handles = Vec::new();
        for i in 0..25 {
            let chat_room = chat_room.clone();
            handles.push(tokio::spawn(async move {
                let (participant, rx) = new_participant(&format!("user{}", i));
                (chat_room.add(participant).await, rx)
            }));
        }
        let mut receivers = Vec::new();
        let mut rejected = 0;
        for handle in handles {
            let (result, rx) = handle.await.unwrap();
            if let Err(e) = result {
                assert_eq!(e, RegistryError::AtCapacity(10));
                rejected += 1;
            }
            receivers.push(rx);
        }

        // then (期待する結果):
        assert_eq!(chat_room.count().await, 10);
        assert_eq!(rejected, 15);
        assert!(!chat_room.has_capacity().await);
    }

    #[tokio::test]
    async fn test_history_replay_matches_broadcast_order() {
        // テスト項目: 参加時に再生される履歴はブロードキャストされた順序と一致する
        // given (前提条件):
        let chat_room = InMemoryChatRoom::default();
        let (alice, mut alice_rx) = new_participant("alice");
        let (bob, _bob_rx) = new_participant("bob");
        let bob_id = bob.id;
        chat_room.add(alice).await.unwrap();
        chat_room.add(bob).await.unwrap();

        let mut published = Vec::new();
        for i in 0..5 {
            let line = chat_room
                .publish_chat(&bob_id, "2024-01-02 03:04:05", &format!("message {}", i))
                .await
                .unwrap();
            published.push(line.into_string());
        }

        // when (操作):
        let (charlie, mut charlie_rx) = new_participant("charlie");
        let receipt = chat_room.add(charlie).await.unwrap();

        // then (期待する結果):
        assert_eq!(receipt.replayed, 5);
        let mut replayed = String::new();
        while let Ok(chunk) = charlie_rx.try_recv() {
            replayed.push_str(&chunk);
        }
        assert_eq!(replayed, published.concat());

        let mut live = Vec::new();
        while let Ok(line) = alice_rx.try_recv() {
            live.push(line);
        }
        assert_eq!(live, published);
    }

    #[tokio::test]
    async fn test_limited_history_replays_only_retained_lines() {
        // テスト項目: 上限付きの履歴では保持されている行だけが再生される
        // given (前提条件):
        let chat_room = InMemoryChatRoom::new(Room::with_history(10, HistoryBuffer::with_limit(2)));
        let (alice, _alice_rx) = new_participant("alice");
        let alice_id = alice.id;
        chat_room.add(alice).await.unwrap();
        for body in ["one", "two", "three"] {
            chat_room.publish_chat(&alice_id, "t", body).await.unwrap();
        }

        // when (操作):
        let (bob, mut bob_rx) = new_participant("bob");
        chat_room.add(bob).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            bob_rx.try_recv().unwrap(),
            "[t][alice]: two\n[t][alice]: three\n"
        );
        assert!(bob_rx.try_recv().is_err());
        assert_eq!(chat_room.history().await.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_then_broadcast_does_not_reach_removed_participant() {
        // テスト項目: 削除後のブロードキャストは削除された参加者に届かない
        // given (前提条件):
        let chat_room = InMemoryChatRoom::default();
        let (alice, mut alice_rx) = new_participant("alice");
        let (bob, mut bob_rx) = new_participant("bob");
        let alice_id = alice.id;
        chat_room.add(alice).await.unwrap();
        chat_room.add(bob).await.unwrap();

        // when (操作):
        let removed = chat_room.remove(&alice_id).await.unwrap();
        let report = chat_room
            .broadcast_except("alice has left the chat...\n", None)
            .await;

        // then (期待する結果):
        assert_eq!(removed.name.as_str(), "alice");
        assert_eq!(report.delivered, 1);
        assert!(alice_rx.try_recv().is_err());
        assert_eq!(bob_rx.try_recv().unwrap(), "alice has left the chat...\n");
        assert!(chat_room.remove(&alice_id).await.is_none());
    }

    #[tokio::test]
    async fn test_room_snapshot_reports_capacity_and_history() {
        // テスト項目: Room のスナップショットに上限・参加者・履歴件数が含まれる
        // given (前提条件):
        let chat_room = InMemoryChatRoom::new(Room::new(3));
        let (alice, _rx) = new_participant("alice");
        let alice_id = alice.id;
        chat_room.add(alice).await.unwrap();
        chat_room.publish_chat(&alice_id, "t", "hello").await.unwrap();

        // when (操作):
        let snapshot = chat_room.room_snapshot().await;

        // then (期待する結果):
        assert_eq!(snapshot.capacity, 3);
        assert_eq!(snapshot.participants.len(), 1);
        assert_eq!(snapshot.participants[0].id, alice_id);
        assert_eq!(snapshot.history_len, 1);
    }
}
