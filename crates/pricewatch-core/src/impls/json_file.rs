//! JSON ファイルによる SnapshotStore 実装
//!
//! 旧 `data_old.json` と同じレイアウト（コード → レコード、4 スペースインデント）。
//! 書き込みは一時ファイル → rename で行う。

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::domain::Snapshot;
use crate::ports::{SnapshotError, SnapshotStore};

pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.clone(),
            source,
        }
    }

    async fn write_atomically(&self, bytes: &[u8]) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        let tmp = tmp_path(&self.path);
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))
    }
}

#[async_trait]
impl SnapshotStore for JsonFileSnapshotStore {
    async fn load(&self) -> Result<Snapshot, SnapshotError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| SnapshotError::Corrupt {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no snapshot yet, creating an empty one");
                self.write_atomically(b"{}").await?;
                Ok(Snapshot::new())
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        let bytes = encode(snapshot)?;
        self.write_atomically(&bytes).await?;
        tracing::debug!(path = %self.path.display(), records = snapshot.len(), "snapshot saved");
        Ok(())
    }
}

fn encode(snapshot: &Snapshot) -> Result<Vec<u8>, SnapshotError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    snapshot.serialize(&mut ser).map_err(SnapshotError::Encode)?;
    Ok(buf)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
