//! TCP chat server implementation.

pub mod banner;
mod handler;
mod server;
pub mod state;

pub use handler::{MAX_LINE_BYTES, admin_router, handle_connection, handle_session};
pub use server::{Server, ServerError};
