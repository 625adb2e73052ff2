//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::RegistryError;

/// 参加（ハンドシェイク）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("name cannot be empty")]
    EmptyName,

    #[error("name '{0}' is already in use")]
    DuplicateName(String),

    #[error("chat room is full")]
    CapacityExceeded,

    #[error("unexpected registry error: {0}")]
    Registry(RegistryError),
}

/// 切断のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisconnectError {
    #[error("participant is not connected")]
    NotConnected,
}

/// 名前変更のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
    #[error("name cannot be empty")]
    EmptyName,

    #[error("name '{0}' is already in use")]
    DuplicateName(String),

    #[error("participant is not connected")]
    NotConnected,
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("message cannot be empty")]
    EmptyMessage,

    #[error("participant is not connected")]
    NotConnected,
}
