//! Dependency wiring shared by the binary and the integration tests.

use std::sync::Arc;

use tcp_chat_shared::time::Clock;

use crate::{
    config::ServerConfig,
    domain::{ChatLogSink, HistoryBuffer, MessageBroadcaster, ParticipantRegistry, Room},
    infrastructure::repository::InMemoryChatRoom,
    ui::Server,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetRoomStateUseCase,
        RenameParticipantUseCase, SendMessageUseCase,
    },
};

/// A fully wired server together with its room.
pub struct Application {
    pub room: Arc<InMemoryChatRoom>,
    pub server: Server,
}

impl Application {
    /// Wire the room, use cases and server for `config`.
    pub fn build(
        config: &ServerConfig,
        clock: Arc<dyn Clock>,
        log_sink: Arc<dyn ChatLogSink>,
    ) -> Self {
        // Initialize dependencies in order:
        // 1. Repository
        // 2. UseCases
        // 3. Server

        // 1. Create Repository (in-memory room guarding participants and history)
        let history = match config.history_limit {
            Some(limit) => HistoryBuffer::with_limit(limit),
            None => HistoryBuffer::unbounded(),
        };
        let room = Arc::new(InMemoryChatRoom::new(Room::with_history(
            config.max_participants,
            history,
        )));
        tracing::info!(
            "Room created (capacity: {}, history limit: {}, rename notice: {})",
            config.max_participants,
            config
                .history_limit
                .map_or_else(|| "none".to_string(), |n| n.to_string()),
            config.rename_notice
        );
        let registry: Arc<dyn ParticipantRegistry> = room.clone();
        let broadcaster: Arc<dyn MessageBroadcaster> = room.clone();

        // 2. Create UseCases
        let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
            registry.clone(),
            broadcaster.clone(),
            clock.clone(),
        ));
        let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
            registry.clone(),
            broadcaster.clone(),
        ));
        let rename_participant_usecase = Arc::new(RenameParticipantUseCase::new(
            registry.clone(),
            broadcaster.clone(),
            config.rename_notice,
        ));
        let send_message_usecase = Arc::new(SendMessageUseCase::new(
            broadcaster.clone(),
            log_sink,
            clock,
        ));
        let get_room_state_usecase = Arc::new(GetRoomStateUseCase::new(registry, broadcaster));

        // 3. Create Server
        let server = Server::new(
            connect_participant_usecase,
            disconnect_participant_usecase,
            rename_participant_usecase,
            send_message_usecase,
            get_room_state_usecase,
        );

        Self { room, server }
    }
}
