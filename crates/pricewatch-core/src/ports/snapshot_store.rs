//! SnapshotStore port - 前回スナップショットの永続化
//!
//! # 設計原則
//! - 永続状態はこれだけ（フラットファイル 1 つ）
//! - save は全置換（マージしない）
//! - ファイルが無いのはエラーではない（空として扱う）

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Snapshot;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt snapshot at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the last persisted snapshot (empty if none exists yet).
    async fn load(&self) -> Result<Snapshot, SnapshotError>;

    /// Replace the persisted snapshot.
    async fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError>;
}
