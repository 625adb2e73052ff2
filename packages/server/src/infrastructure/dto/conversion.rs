//! Conversion logic between domain entities and DTOs.

use tcp_chat_shared::time::timestamp_to_local_rfc3339;

use crate::domain::{ChatLine, ParticipantSummary, RoomSnapshot};
use crate::infrastructure::dto::http as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<ParticipantSummary> for dto::ParticipantDto {
    fn from(model: ParticipantSummary) -> Self {
        Self {
            connection_id: model.id.to_string(),
            name: model.name.into_string(),
            join_order: model.join_order.value(),
            connected_at: timestamp_to_local_rfc3339(model.connected_at.value()),
        }
    }
}

impl From<RoomSnapshot> for dto::RoomStateDto {
    fn from(model: RoomSnapshot) -> Self {
        Self {
            capacity: model.capacity,
            participant_count: model.participants.len(),
            participants: model.participants.into_iter().map(Into::into).collect(),
            history_len: model.history_len,
        }
    }
}

impl From<Vec<ChatLine>> for dto::HistoryDto {
    fn from(model: Vec<ChatLine>) -> Self {
        Self {
            lines: model.into_iter().map(ChatLine::into_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionIdFactory, JoinOrder, ParticipantName, Timestamp};

    #[test]
    fn test_room_snapshot_to_dto() {
        // テスト項目: Room のスナップショットが DTO に変換される
        // given (前提条件):
        let id = ConnectionIdFactory::generate();
        let snapshot = RoomSnapshot {
            capacity: 10,
            participants: vec![ParticipantSummary {
                id,
                name: ParticipantName::new("alice").unwrap(),
                join_order: JoinOrder::new(1),
                connected_at: Timestamp::new(1672498800000),
            }],
            history_len: 3,
        };

        // when (操作):
        let dto: dto::RoomStateDto = snapshot.into();

        // then (期待する結果):
        assert_eq!(dto.capacity, 10);
        assert_eq!(dto.participant_count, 1);
        assert_eq!(dto.history_len, 3);
        assert_eq!(dto.participants[0].connection_id, id.to_string());
        assert_eq!(dto.participants[0].name, "alice");
        assert_eq!(dto.participants[0].join_order, 1);
        assert!(dto.participants[0].connected_at.is_some());
    }

    #[test]
    fn test_history_to_dto_keeps_order() {
        // テスト項目: 履歴が順序を保ったまま DTO に変換される
        // given (前提条件):
        let alice = ParticipantName::new("alice").unwrap();
        let lines = vec![
            ChatLine::compose("t", &alice, "one"),
            ChatLine::compose("t", &alice, "two"),
        ];

        // when (操作):
        let dto: dto::HistoryDto = lines.into();

        // then (期待する結果):
        assert_eq!(dto.lines, vec!["[t][alice]: one\n", "[t][alice]: two\n"]);
    }
}
