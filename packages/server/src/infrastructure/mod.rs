//! Infrastructure 層
//!
//! ドメイン層が定義する trait の具体的な実装と、外部とのデータ表現（DTO）。

pub mod dto;
pub mod log_sink;
pub mod message_pusher;
pub mod repository;
