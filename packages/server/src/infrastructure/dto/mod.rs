//! Data Transfer Objects.
//!
//! - `text`: line-oriented wire protocol spoken over the chat TCP connection
//! - `http`: JSON bodies of the admin HTTP API

pub mod conversion;
pub mod http;
pub mod text;
