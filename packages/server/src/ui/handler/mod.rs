//! Connection and HTTP handlers.

mod http;
mod session;

pub use http::admin_router;
pub use session::{MAX_LINE_BYTES, handle_connection, handle_session};
