//! ChatLogSink trait 定義

use async_trait::async_trait;

use super::{ChatLine, LogSinkError};

/// チャット行の永続化先
///
/// ベストエフォート。失敗はチャットの配信に影響させない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatLogSink: Send + Sync {
    async fn append(&self, line: &ChatLine) -> Result<(), LogSinkError>;
}
