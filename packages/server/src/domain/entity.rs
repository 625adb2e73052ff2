//! Entity 定義

use std::fmt;

use tokio::sync::mpsc::error::TrySendError;

use super::{
    error::DeliveryError,
    message_pusher::PusherChannel,
    value_object::{ConnectionId, JoinOrder, ParticipantName, Timestamp},
};

/// チャットルームの参加者
///
/// Room に追加された時点で Room が所有する。セッションは自分の
/// ConnectionId だけを保持し、参加者の状態は Room を経由して参照する。
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: ConnectionId,
    pub name: ParticipantName,
    pub join_order: JoinOrder,
    pub connected_at: Timestamp,
    outbound: PusherChannel,
}

impl Participant {
    /// 新しい参加者を作成
    ///
    /// `join_order` は Room への追加時に採番される。
    pub fn new(
        id: ConnectionId,
        name: ParticipantName,
        connected_at: Timestamp,
        outbound: PusherChannel,
    ) -> Self {
        Self {
            id,
            name,
            join_order: JoinOrder::new(0),
            connected_at,
            outbound,
        }
    }

    /// 参加者の送信キューに 1 件を積む
    ///
    /// キューが満杯の場合は待たずに `DeliveryError::QueueFull` を返す。
    pub fn deliver(&self, text: &str) -> Result<(), DeliveryError> {
        self.outbound
            .try_send(text.to_string())
            .map_err(|e| match e {
                TrySendError::Full(_) => DeliveryError::QueueFull(self.id),
                TrySendError::Closed(_) => DeliveryError::ChannelClosed(self.id),
            })
    }

    /// 送信キューを含まない参加者情報
    pub fn summary(&self) -> ParticipantSummary {
        ParticipantSummary {
            id: self.id,
            name: self.name.clone(),
            join_order: self.join_order,
            connected_at: self.connected_at,
        }
    }
}

/// 参加者のスナップショット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantSummary {
    pub id: ConnectionId,
    pub name: ParticipantName,
    pub join_order: JoinOrder,
    pub connected_at: Timestamp,
}

/// フォーマット済みのチャット行
///
/// `[<timestamp>][<name>]: <body>\n` の形式で一度だけ生成され、以後は不変。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine(String);

impl ChatLine {
    pub fn compose(timestamp: &str, sender: &ParticipantName, body: &str) -> Self {
        Self(format!("[{}][{}]: {}\n", timestamp, sender, body))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ChatLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// システム通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemNotice {
    Joined(ParticipantName),
    Left(ParticipantName),
    Renamed {
        previous: ParticipantName,
        current: ParticipantName,
    },
}

impl fmt::Display for SystemNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemNotice::Joined(name) => writeln!(f, "{} has joined the chat...", name),
            SystemNotice::Left(name) => writeln!(f, "{} has left the chat...", name),
            SystemNotice::Renamed { previous, current } => {
                writeln!(f, "{} changed their name to {}.", previous, current)
            }
        }
    }
}

/// 参加完了の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinReceipt {
    pub join_order: JoinOrder,
    /// 新しい参加者に再生した履歴の行数
    pub replayed: usize,
}

/// 名前変更の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renamed {
    pub previous: ParticipantName,
    pub current: ParticipantName,
}

impl Renamed {
    /// 現在の名前と同じ名前への変更か
    pub fn is_noop(&self) -> bool {
        self.previous == self.current
    }
}

/// ブロードキャストの配信結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: Vec<DeliveryError>,
}

/// Room 全体のスナップショット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub capacity: usize,
    pub participants: Vec<ParticipantSummary>,
    pub history_len: usize,
}
