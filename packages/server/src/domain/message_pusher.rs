//! MessageBroadcaster trait 定義

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ChatLine, ConnectionId, DeliveryReport, RegistryError};

/// 送信キュー 1 本あたりに積める件数
///
/// 読み取りをやめた接続のキューはこの件数で頭打ちになり、以後の配信は
/// `DeliveryError::QueueFull` としてスキップされる。
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// 参加者ごとの送信キュー（送信側）
///
/// 受信側は接続ごとの書き込みタスクが保持し、ソケットへ順に書き出す。
pub type PusherChannel = mpsc::Sender<String>;

/// 参加者ごとの送信キュー（受信側）
pub type PusherReceiver = mpsc::Receiver<String>;

/// 上限付きの送信キューを作成
pub fn outbound_queue() -> (PusherChannel, PusherReceiver) {
    mpsc::channel(OUTBOUND_QUEUE_CAPACITY)
}

/// ブロードキャストエンジン
#[async_trait]
pub trait MessageBroadcaster: Send + Sync {
    /// `excluded` 以外の全参加者に `line` を配信
    ///
    /// 除外は名前ではなく ConnectionId で判定する。配信失敗はスキップして続行する。
    async fn broadcast_except(&self, line: &str, excluded: Option<&ConnectionId>)
    -> DeliveryReport;

    /// チャット行を作成して履歴に追加し、送信者以外に配信
    async fn publish_chat(
        &self,
        from: &ConnectionId,
        timestamp: &str,
        body: &str,
    ) -> Result<ChatLine, RegistryError>;

    /// 履歴全体のスナップショットを取得
    async fn history(&self) -> Vec<ChatLine>;
}
