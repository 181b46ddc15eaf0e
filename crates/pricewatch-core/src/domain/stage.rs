//! Stage - 1 サイクルの状態
//!
//! 状態遷移（直線、ループなし）:
//! Fetch → LoadSnapshot → Detect → (Notify | SkipNotify) → Persist → Done
//!
//! どの段階で失敗しても Failed に落ちる。

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStage {
    Fetch,
    LoadSnapshot,
    Detect,
    Notify,
    SkipNotify,
    Export,
    Persist,
    Done,
    Failed,
}

impl CycleStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::LoadSnapshot => "load_snapshot",
            Self::Detect => "detect",
            Self::Notify => "notify",
            Self::SkipNotify => "skip_notify",
            Self::Export => "export",
            Self::Persist => "persist",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
