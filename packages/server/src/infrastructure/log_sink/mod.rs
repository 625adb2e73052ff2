//! チャットログの永続化実装

pub mod file;

pub use file::FileChatLogSink;
