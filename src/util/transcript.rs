use crate::core::Error;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Per-session append-only chat history.
///
/// Failures after open are logged and swallowed; the chat protocol never
/// sees them.
pub struct Transcript {
    file: File,
    name: String,
}

impl Transcript {
    pub async fn open(dir: &str, name: &str) -> Result<Self, Error> {
        fs::create_dir_all(dir).await?;

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(history_path(dir, name))
            .await?;

        Ok(Self {
            file,
            name: name.to_owned(),
        })
    }

    /// Append one accepted line with its capture timestamp
    pub async fn append(&mut self, timestamp: &str, line: &str) {
        let record = format!("{} {}\n", timestamp, line);
        let written = async {
            self.file.write_all(record.as_bytes()).await?;
            self.file.flush().await
        };
        if let Err(e) = written.await {
            tracing::error!("failed to write transcript for {}: {}", self.name, e);
        }
    }
}

// Client-chosen names must stay inside the storage directory
fn history_path(dir: &str, name: &str) -> PathBuf {
    let flat: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '.') { '_' } else { c })
        .collect();
    Path::new(dir).join(format!("{}.txt", flat))
}

// ========================// tests //======================== //
