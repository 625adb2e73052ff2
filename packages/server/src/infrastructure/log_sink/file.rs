//! ファイルへの追記によるチャットログ実装

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};

use crate::domain::{ChatLine, ChatLogSink, LogSinkError};

/// Appends every accepted chat line to a text file.
///
/// The file is opened in append mode for each line, so it may be rotated or
/// removed externally while the server runs. Appends are serialized.
pub struct FileChatLogSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileChatLogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append_line(&self, line: &ChatLine) -> std::io::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_str().as_bytes()).await?;
        file.flush().await
    }
}

#[async_trait]
impl ChatLogSink for FileChatLogSink {
    async fn append(&self, line: &ChatLine) -> Result<(), LogSinkError> {
        self.append_line(line)
            .await
            .map_err(|source| LogSinkError::Io {
                path: self.path.clone(),
                source,
            })
    }
}
