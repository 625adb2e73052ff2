//! TCP 書き込みタスク
//!
//! ## 責務
//!
//! - 参加者ごとの送信キュー（`PusherReceiver`）を積まれた順にソケットへ書き出す
//! - 書き込みのたびに flush する
//!
//! ## 設計ノート
//!
//! ブロードキャストは送信キューに積むだけで、実際の書き込みは接続ごとのこのタスクが行う。
//! 書き込みに失敗するとタスクは終了し、受信側が破棄されるため、以後のキューへの
//! 配信は `DeliveryError::ChannelClosed` になる。書き込みが詰まってキューが
//! 上限に達した場合の配信は `DeliveryError::QueueFull` になる。参加者の削除は
//! 読み込みループの終了時にだけ行われる。

use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    task::JoinHandle,
};

use crate::domain::PusherReceiver;

/// テキストを書き込んで flush する
pub async fn write_text<W>(writer: &mut W, text: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(text.as_bytes()).await?;
    writer.flush().await
}

/// Spawns a task that drains the outbound queue into the connection's write half.
///
/// The task ends when every sender of the queue has been dropped (after which the
/// write half is shut down) or when a write fails.
///
/// # Arguments
///
/// * `rx` - Outbound queue of one participant
/// * `writer` - Write half of the participant's connection
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
pub fn pusher_loop<W>(mut rx: PusherReceiver, mut writer: W) -> JoinHandle<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if let Err(e) = write_text(&mut writer, &text).await {
                tracing::warn!("Failed to write to connection: {}", e);
                return;
            }
        }
        if let Err(e) = writer.shutdown().await {
            tracing::debug!("Failed to shut down connection writer: {}", e);
        }
    })
}
