//! ドメイン層
//!
//! チャットルームの参加者・履歴・通知に関するモデルと、
//! 上位層が依存するインターフェース（trait）を定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

pub mod entity;
pub mod error;
pub mod history;
pub mod log_sink;
pub mod message_pusher;
pub mod repository;
pub mod room;
pub mod value_object;

pub use entity::{
    ChatLine, DeliveryReport, JoinReceipt, Participant, ParticipantSummary, Renamed,
    RoomSnapshot, SystemNotice,
};
pub use error::{DeliveryError, LogSinkError, RegistryError, ValueObjectError};
pub use history::HistoryBuffer;
pub use log_sink::ChatLogSink;
pub use message_pusher::{
    MessageBroadcaster, OUTBOUND_QUEUE_CAPACITY, PusherChannel, PusherReceiver, outbound_queue,
};
pub use repository::ParticipantRegistry;
pub use room::{DEFAULT_PARTICIPANT_CAPACITY, Room};
pub use value_object::{ConnectionId, ConnectionIdFactory, JoinOrder, ParticipantName, Timestamp};
