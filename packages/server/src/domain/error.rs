//! ドメイン層のエラー定義

use std::path::PathBuf;

use thiserror::Error;

use super::value_object::ConnectionId;

/// Value Object の生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("name cannot be empty")]
    EmptyName,
}

/// 参加者レジストリの操作エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("name cannot be empty")]
    NameEmpty,

    #[error("name '{0}' is already in use")]
    NameTaken(String),

    #[error("room is at capacity ({0} participants)")]
    AtCapacity(usize),

    #[error("connection '{0}' is not registered")]
    NotRegistered(ConnectionId),
}

/// 参加者の送信キューへの配信エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("outbound queue of connection '{0}' is closed")]
    ChannelClosed(ConnectionId),

    #[error("outbound queue of connection '{0}' is full")]
    QueueFull(ConnectionId),
}

/// チャットログの永続化エラー
#[derive(Debug, Error)]
pub enum LogSinkError {
    #[error("failed to append chat line to '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
