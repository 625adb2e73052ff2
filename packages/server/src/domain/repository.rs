//! Repository trait 定義
//!
//! ドメイン層が必要とする参加者レジストリのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    ConnectionId, JoinReceipt, Participant, ParticipantSummary, RegistryError, Renamed,
    RoomSnapshot,
};

/// 参加者レジストリ
///
/// 全ての操作は同じレジストリに対する他の全ての操作と直列化される。
/// 内部のコレクションやロックは公開しない。
/// エラー型は全ての操作で共通のため、`add` が重複・上限以外の理由で失敗する実装もありうる。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParticipantRegistry: Send + Sync {
    /// 参加者を追加し、履歴を新しい参加者の送信キューに再生する
    ///
    /// 名前の重複チェック・人数上限チェック・追加は 1 つのクリティカルセクションで行う。
    async fn add(&self, participant: Participant) -> Result<JoinReceipt, RegistryError>;

    /// 参加者を削除（存在しなければ `None`）
    async fn remove(&self, id: &ConnectionId) -> Option<ParticipantSummary>;

    /// 参加者の名前を変更
    async fn rename(&self, id: &ConnectionId, new_name: &str) -> Result<Renamed, RegistryError>;

    /// 参加順に並んだ参加者のスナップショットを取得
    async fn snapshot(&self) -> Vec<ParticipantSummary>;

    /// 参加者と履歴件数を含む Room 全体のスナップショットを取得
    async fn room_snapshot(&self) -> RoomSnapshot;

    /// 接続中の参加者数を取得
    async fn count(&self) -> usize;

    /// 参加者を追加する余地があるか
    async fn has_capacity(&self) -> bool;
}
