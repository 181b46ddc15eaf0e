//! Behaviour switches that used to be separate code paths.

use serde::{Deserialize, Serialize};

use crate::domain::ChangeReport;

/// When the text report is sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotifyMode {
    /// Only when at least one price changed; lists changes only.
    #[default]
    OnChange,
    /// Every cycle; lists changes and unchanged items.
    Always,
}

impl NotifyMode {
    pub fn should_notify(self, report: &ChangeReport) -> bool {
        match self {
            Self::OnChange => report.has_changes(),
            Self::Always => true,
        }
    }

    pub fn lists_unchanged(self) -> bool {
        matches!(self, Self::Always)
    }
}

/// When the spreadsheet is generated and sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportMode {
    #[default]
    OnChange,
    Always,
    Never,
}

impl ExportMode {
    pub fn should_export(self, report: &ChangeReport) -> bool {
        match self {
            Self::OnChange => report.has_changes(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// What to do when the vendor answers 200 with no `data`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyDataPolicy {
    /// Drop the code from the batch (and therefore from the next snapshot).
    Skip,
    /// Emit an `"N/A"` record so the code stays tracked.
    #[default]
    NotAvailable,
}
