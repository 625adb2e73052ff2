//! Server execution logic.

use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::{
    config::ServerConfig,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetRoomStateUseCase,
        RenameParticipantUseCase, SendMessageUseCase,
    },
};

use super::{
    handler::{admin_router, handle_connection},
    state::AppState,
};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// TCP chat server
///
/// This struct owns the shared state and provides methods to run the accept loop.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_participant_usecase,
///     disconnect_participant_usecase,
///     rename_participant_usecase,
///     send_message_usecase,
///     get_room_state_usecase,
/// );
/// server.run(&ServerConfig::new(8989)).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `connect_participant_usecase` - UseCase for the join handshake
    /// * `disconnect_participant_usecase` - UseCase for participant disconnection
    /// * `rename_participant_usecase` - UseCase for `/rename`
    /// * `send_message_usecase` - UseCase for chat messages
    /// * `get_room_state_usecase` - UseCase for the admin API
    pub fn new(
        connect_participant_usecase: Arc<ConnectParticipantUseCase>,
        disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
        rename_participant_usecase: Arc<RenameParticipantUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        get_room_state_usecase: Arc<GetRoomStateUseCase>,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                connect_participant_usecase,
                disconnect_participant_usecase,
                rename_participant_usecase,
                send_message_usecase,
                get_room_state_usecase,
            }),
        }
    }

    /// Run the TCP chat server
    ///
    /// Binds the chat listener (and the admin API when configured) and serves
    /// connections until the process exits.
    ///
    /// # Errors
    ///
    /// Returns an error if either listener fails to bind.
    pub async fn run(&self, config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = config.listen_addr();
        let listener = bind(&bind_addr).await?;
        tracing::info!("Server started on port {}", listener.local_addr()?.port());

        if let Some(admin_addr) = &config.admin_addr {
            let admin_listener = bind(admin_addr).await?;
            tracing::info!(
                "Admin API listening on http://{}",
                admin_listener.local_addr()?
            );
            let app = self.admin_router();
            tokio::spawn(async move {
                if let Err(e) = axum::serve(admin_listener, app).await {
                    tracing::error!("Admin API stopped: {}", e);
                }
            });
        }

        self.serve(listener).await;
        Ok(())
    }

    /// Accept connections forever, spawning one session task per connection.
    pub async fn serve(&self, listener: TcpListener) {
        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::warn!("Connection error: {}", e);
                    continue;
                }
            };

            if !self.state.connect_participant_usecase.has_capacity().await {
                tracing::warn!("Chat is full. Closing connection from {}", peer);
                drop(stream);
                continue;
            }

            tracing::debug!("Accepted connection from {}", peer);
            tokio::spawn(handle_connection(stream, peer, self.state.clone()));
        }
    }

    /// Read-only admin API over the same shared state.
    pub fn admin_router(&self) -> Router {
        admin_router(self.state.clone())
    }
}

async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })
}
