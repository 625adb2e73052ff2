//! Utilities shared by the tcp-chat binaries and libraries.

pub mod logger;
pub mod time;
