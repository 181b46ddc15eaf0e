//! In-memory implementations of the ports (tests and local experiments).
//!
//! - `ScriptedPriceSource`: canned vendor answers per code, counts calls.
//! - `InMemorySnapshotStore`: keeps the snapshot in a Mutex, can refuse loads
//!   or saves.
//! - `RecordingChannel`: records every delivery, can fail the first N attempts.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::{Price, ProductCode, Snapshot};
use crate::ports::{
    DeliveryError, Document, MessageFormat, NotificationChannel, PriceSource, ProductListing,
    SnapshotError, SnapshotStore, VendorError,
};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// What the fake vendor answers for one code.
#[derive(Debug, Clone)]
pub enum ScriptedAnswer {
    Listing(ProductListing),
    /// HTTP 200 with an empty `data` array.
    Empty,
    /// Non-200 status.
    Status(u16),
    /// Connection-level failure.
    Unreachable,
}

#[derive(Default)]
pub struct ScriptedPriceSource {
    answers: Mutex<HashMap<ProductCode, ScriptedAnswer>>,
    calls: AtomicUsize,
}

impl ScriptedPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(self, code: &str, answer: ScriptedAnswer) -> Self {
        lock(&self.answers).insert(ProductCode::new(code), answer);
        self
    }

    pub fn listing(self, code: &str, name: &str, price: Price) -> Self {
        self.answer(
            code,
            ScriptedAnswer::Listing(ProductListing {
                name: name.to_string(),
                price,
            }),
        )
    }

    /// Change the answer for later cycles.
    pub fn set(&self, code: &str, answer: ScriptedAnswer) {
        lock(&self.answers).insert(ProductCode::new(code), answer);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PriceSource for ScriptedPriceSource {
    async fn lookup(&self, code: &ProductCode) -> Result<Option<ProductListing>, VendorError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let answer = lock(&self.answers).get(code).cloned();
        match answer {
            Some(ScriptedAnswer::Listing(listing)) => Ok(Some(listing)),
            Some(ScriptedAnswer::Empty) => Ok(None),
            Some(ScriptedAnswer::Status(status)) => Err(VendorError::Status { status }),
            Some(ScriptedAnswer::Unreachable) => {
                Err(VendorError::Transport("connection refused".to_string()))
            }
            None => Err(VendorError::Status { status: 404 }),
        }
    }
}

#[derive(Default)]
pub struct InMemorySnapshotStore {
    snapshot: Mutex<Snapshot>,
    saves: AtomicUsize,
    corrupt: bool,
    read_only: bool,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            ..Self::default()
        }
    }

    /// Every `load` fails as if the backing file were unparseable.
    pub fn corrupt() -> Self {
        Self {
            corrupt: true,
            ..Self::default()
        }
    }

    /// Loads work, every `save` fails with an I/O error.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    pub fn current(&self) -> Snapshot {
        lock(&self.snapshot).clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn load(&self) -> Result<Snapshot, SnapshotError> {
        if self.corrupt {
            return Err(SnapshotError::Corrupt {
                path: PathBuf::from("<memory>"),
                source: serde::de::Error::custom("expected a JSON object"),
            });
        }
        Ok(self.current())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        if self.read_only {
            return Err(SnapshotError::Io {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        *lock(&self.snapshot) = snapshot.clone();
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// One successful delivery seen by `RecordingChannel`.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Message { text: String, format: MessageFormat },
    Document { file_name: String, caption: String },
}

#[derive(Default)]
pub struct RecordingChannel {
    delivered: Mutex<Vec<Delivery>>,
    attempts: AtomicUsize,
    remaining_failures: AtomicU32,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the first `n` delivery attempts (messages and documents alike).
    pub fn failing_first(n: u32) -> Self {
        Self {
            remaining_failures: AtomicU32::new(n),
            ..Self::default()
        }
    }

    pub fn always_failing() -> Self {
        Self::failing_first(u32::MAX)
    }

    pub fn delivered(&self) -> Vec<Delivery> {
        lock(&self.delivered).clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.delivered()
            .into_iter()
            .filter_map(|d| match d {
                Delivery::Message { text, .. } => Some(text),
                Delivery::Document { .. } => None,
            })
            .collect()
    }

    pub fn documents(&self) -> Vec<String> {
        self.delivered()
            .into_iter()
            .filter_map(|d| match d {
                Delivery::Document { file_name, .. } => Some(file_name),
                Delivery::Message { .. } => None,
            })
            .collect()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }

    fn attempt(&self) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        let left = self.remaining_failures.load(Ordering::Relaxed);
        if left > 0 {
            self.remaining_failures.fetch_sub(1, Ordering::Relaxed);
            return Err(DeliveryError::Rejected {
                status: 502,
                body: format!("intentional failure (left={left})"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    async fn send_message(&self, text: &str, format: MessageFormat) -> Result<(), DeliveryError> {
        self.attempt()?;
        lock(&self.delivered).push(Delivery::Message {
            text: text.to_string(),
            format,
        });
        Ok(())
    }

    async fn send_document(
        &self,
        document: &Document,
        caption: &str,
    ) -> Result<(), DeliveryError> {
        self.attempt()?;
        lock(&self.delivered).push(Delivery::Document {
            file_name: document.file_name.clone(),
            caption: caption.to_string(),
        });
        Ok(())
    }
}
