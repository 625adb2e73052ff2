//! HTTP API 用の DTO

use serde::{Deserialize, Serialize};

/// 参加者の詳細
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub connection_id: String,
    pub name: String,
    pub join_order: u64,
    /// RFC 3339（ローカルタイム）
    pub connected_at: Option<String>,
}

/// Room の状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStateDto {
    pub capacity: usize,
    pub participant_count: usize,
    pub participants: Vec<ParticipantDto>,
    pub history_len: usize,
}

/// チャット履歴
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryDto {
    pub lines: Vec<String>,
}
