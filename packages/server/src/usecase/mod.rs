//! UseCase 層
//!
//! セッションタスクが呼び出すアプリケーションの操作を定義します。

mod connect_participant;
mod disconnect_participant;
mod error;
mod get_room_state;
mod rename_participant;
mod send_message;

pub use connect_participant::{ConnectParticipantUseCase, JoinedParticipant};
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, DisconnectError, RenameError, SendMessageError};
pub use get_room_state::GetRoomStateUseCase;
pub use rename_participant::{RenameNoticePolicy, RenameParticipantUseCase};
pub use send_message::SendMessageUseCase;
