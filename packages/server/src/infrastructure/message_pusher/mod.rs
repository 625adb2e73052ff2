//! メッセージ送信（書き込み）の実装
//!
//! ## 実装
//!
//! - `tcp`: TCP ストリームの書き込み側へ送信キューを書き出す実装

pub mod tcp;

pub use tcp::{pusher_loop, write_text};
