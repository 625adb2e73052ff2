//! UseCase: 参加者の名前変更
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RenameParticipantUseCase::execute() メソッド
//! - 名前変更通知の配信ポリシー（本人を含めるか）
//!
//! ### なぜこのテストが必要か
//! - 他の参加者が使っている名前への変更は失敗し、両者の名前が変わらないことを保証
//! - 通知を本人に送るかどうかは明示的な設定で決まる
//!
//! ### どのような状況を想定しているか
//! - 正常系：名前変更と通知（本人を除く / 全員）
//! - 異常系：空の名前、使用中の名前
//! - エッジケース：現在の名前と同じ名前への変更（通知なし）

use std::{fmt, str::FromStr, sync::Arc};

use crate::domain::{
    ConnectionId, MessageBroadcaster, ParticipantRegistry, RegistryError, Renamed, SystemNotice,
};

use super::error::RenameError;

/// 名前変更通知を誰に送るか
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenameNoticePolicy {
    /// 名前を変更した本人以外の参加者
    #[default]
    OthersOnly,
    /// 本人を含む全ての参加者
    Everyone,
}

impl FromStr for RenameNoticePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "others" => Ok(Self::OthersOnly),
            "everyone" => Ok(Self::Everyone),
            other => Err(format!(
                "unknown rename notice policy '{}' (expected 'others' or 'everyone')",
                other
            )),
        }
    }
}

impl fmt::Display for RenameNoticePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OthersOnly => f.write_str("others"),
            Self::Everyone => f.write_str("everyone"),
        }
    }
}

/// 名前変更のユースケース
pub struct RenameParticipantUseCase {
    registry: Arc<dyn ParticipantRegistry>,
    broadcaster: Arc<dyn MessageBroadcaster>,
    policy: RenameNoticePolicy,
}

impl RenameParticipantUseCase {
    /// 新しい RenameParticipantUseCase を作成
    pub fn new(
        registry: Arc<dyn ParticipantRegistry>,
        broadcaster: Arc<dyn MessageBroadcaster>,
        policy: RenameNoticePolicy,
    ) -> Self {
        Self {
            registry,
            broadcaster,
            policy,
        }
    }

    /// 名前変更を実行し、成功した場合は通知をブロードキャスト
    ///
    /// 現在の名前と同じ名前への変更は成功扱いだが通知しない。
    pub async fn execute(&self, id: &ConnectionId, new_name: &str) -> Result<Renamed, RenameError> {
        let renamed = self
            .registry
            .rename(id, new_name)
            .await
            .map_err(|e| match e {
                RegistryError::NameEmpty => RenameError::EmptyName,
                RegistryError::NameTaken(name) => RenameError::DuplicateName(name),
                RegistryError::AtCapacity(_) | RegistryError::NotRegistered(_) => {
                    RenameError::NotConnected
                }
            })?;

        if renamed.is_noop() {
            return Ok(renamed);
        }

        let notice = SystemNotice::Renamed {
            previous: renamed.previous.clone(),
            current: renamed.current.clone(),
        }
        .to_string();
        let excluded = match self.policy {
            RenameNoticePolicy::OthersOnly => Some(id),
            RenameNoticePolicy::Everyone => None,
        };
        self.broadcaster.broadcast_except(&notice, excluded).await;

        Ok(renamed)
    }
}
