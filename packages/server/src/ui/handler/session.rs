//! TCP session handlers.
//!
//! One session task per accepted connection: the join handshake, then the read
//! loop, then cleanup. Outbound lines are written by the participant's own
//! `pusher_loop` task once the participant has joined.

use std::{net::SocketAddr, sync::Arc};

use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader},
    net::TcpStream,
};

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, PusherChannel, outbound_queue},
    infrastructure::{
        dto::text::{ClientLine, ErrorNotice, NAME_PROMPT},
        message_pusher::{pusher_loop, write_text},
    },
    ui::{banner::WELCOME_BANNER, state::AppState},
    usecase::{ConnectError, RenameError, SendMessageError},
};

/// Longest accepted input line in bytes, `\n` excluded.
///
/// A peer that sends more than this without a newline is disconnected.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Handle one accepted TCP connection until the peer disconnects.
pub async fn handle_connection(stream: TcpStream, peer: SocketAddr, state: Arc<AppState>) {
    if let Err(e) = stream.set_nodelay(true) {
        tracing::debug!("Failed to set TCP_NODELAY for {}: {}", peer, e);
    }
    let (read_half, write_half) = stream.into_split();
    handle_session(BufReader::new(read_half), write_half, peer.to_string(), state).await;
}

/// Run the handshake and read loop over any line-oriented byte stream.
///
/// # Arguments
///
/// * `reader` - Buffered read half of the connection
/// * `writer` - Write half of the connection (handed to `pusher_loop` after joining)
/// * `peer` - Peer label used in logs
/// * `state` - Shared application state
pub async fn handle_session<R, W>(mut reader: R, mut writer: W, peer: String, state: Arc<AppState>)
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    // 1. バナーと名前の入力プロンプトを送信
    if let Err(e) = send_greeting(&mut writer).await {
        tracing::debug!("Connection {} closed before handshake: {}", peer, e);
        return;
    }

    // 2. 名前を 1 行読む（入力前の切断と長すぎる行は空の名前として扱う）
    let proposed_name = read_line(&mut reader).await.unwrap_or_default();

    // 3. Registry に参加（履歴は送信キューへ再生される）
    let id = ConnectionIdFactory::generate();
    let (tx, rx) = outbound_queue();
    let joined = match state
        .connect_participant_usecase
        .execute(id, &proposed_name, tx.clone())
        .await
    {
        Ok(joined) => joined,
        Err(e) => {
            tracing::warn!("Rejected handshake from {}: {}", peer, e);
            reject(&mut writer, &e).await;
            return;
        }
    };
    tracing::info!(
        "{} joined from {} ({} history lines replayed)",
        joined.name,
        peer,
        joined.replayed
    );

    // 4. 書き込みタスクを起動し、参加通知をブロードキャスト
    let pusher = pusher_loop(rx, writer);
    state
        .connect_participant_usecase
        .broadcast_participant_joined(&joined)
        .await;

    // 5. 読み込みループ
    read_loop(&mut reader, &id, &tx, &state).await;

    // 6. Registry から削除してから退出通知をブロードキャスト
    match state.disconnect_participant_usecase.execute(&id).await {
        Ok(left) => {
            state
                .disconnect_participant_usecase
                .broadcast_participant_left(&left.name)
                .await;
            tracing::info!(
                "{} left ({} participants remaining)",
                left.name,
                state
                    .disconnect_participant_usecase
                    .count_remaining_participants()
                    .await
            );
        }
        Err(e) => tracing::warn!("Cleanup for {} found nothing to remove: {}", peer, e),
    }

    // 7. 送信キューを閉じ、残りの行を書き出してから接続を閉じる
    drop(tx);
    if let Err(e) = pusher.await {
        tracing::error!("Pusher task for {} failed: {}", peer, e);
    }
}

async fn send_greeting<W>(writer: &mut W) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    write_text(writer, WELCOME_BANNER).await?;
    write_text(writer, NAME_PROMPT).await
}

/// Notice sent to a peer whose handshake was rejected.
///
/// `ConnectError::Registry` covers registry failures other than a taken name or a
/// full room. The in-memory registry never produces one on add, but other
/// `ParticipantRegistry` implementations may.
fn rejection_notice(error: &ConnectError) -> ErrorNotice {
    match error {
        ConnectError::EmptyName => ErrorNotice::EmptyName,
        ConnectError::DuplicateName(_) => ErrorNotice::NameInUse,
        ConnectError::CapacityExceeded => ErrorNotice::ChatFull,
        ConnectError::Registry(_) => ErrorNotice::JoinFailed,
    }
}

/// Write the rejection notice and close the connection.
async fn reject<W>(writer: &mut W, error: &ConnectError)
where
    W: AsyncWrite + Unpin,
{
    if let Err(e) = write_text(writer, rejection_notice(error).as_str()).await {
        tracing::debug!("Failed to write rejection notice: {}", e);
    }
    if let Err(e) = writer.shutdown().await {
        tracing::debug!("Failed to shut down rejected connection: {}", e);
    }
}

async fn read_loop<R>(reader: &mut R, id: &ConnectionId, tx: &PusherChannel, state: &AppState)
where
    R: AsyncBufRead + Unpin,
{
    while let Some(line) = read_line(reader).await {
        match ClientLine::parse(&line) {
            ClientLine::Empty => {}
            ClientLine::Rename(new_name) => {
                match state.rename_participant_usecase.execute(id, new_name).await {
                    Ok(renamed) => {
                        tracing::info!("{} renamed to {}", renamed.previous, renamed.current)
                    }
                    Err(RenameError::EmptyName) => reply(tx, ErrorNotice::EmptyName),
                    Err(RenameError::DuplicateName(_)) => reply(tx, ErrorNotice::NameInUse),
                    Err(RenameError::NotConnected) => break,
                }
            }
            ClientLine::Chat(body) => match state.send_message_usecase.execute(id, body).await {
                Ok(chat) => tracing::debug!("Broadcast: {}", chat.as_str().trim_end()),
                Err(SendMessageError::EmptyMessage) => {}
                Err(SendMessageError::NotConnected) => break,
            },
        }
    }
}

/// Queue an error notice for this connection only.
fn reply(tx: &PusherChannel, notice: ErrorNotice) {
    if let Err(e) = tx.try_send(notice.as_str().to_string()) {
        tracing::debug!("Dropping notice: {}", e);
    }
}

/// Read one line without its terminator.
///
/// `None` on end of stream, on read error, or when the line exceeds `MAX_LINE_BYTES`.
async fn read_line<R>(reader: &mut R) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut limited = (&mut *reader).take(MAX_LINE_BYTES as u64 + 1);
    match limited.read_until(b'\n', &mut buf).await {
        Ok(0) => None,
        Ok(_) if buf.len() > MAX_LINE_BYTES && buf.last() != Some(&b'\n') => {
            tracing::warn!("Input line exceeds {} bytes; closing connection", MAX_LINE_BYTES);
            None
        }
        Ok(_) => {
            if buf.last() == Some(&b'\n') {
                buf.pop();
            }
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
            Some(String::from_utf8_lossy(&buf).into_owned())
        }
        Err(e) => {
            tracing::debug!("Read error: {}", e);
            None
        }
    }
}
