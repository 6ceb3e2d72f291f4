//! Bill store abstraction.
//!
//! [`RemoteBillsClient`] is the only way components reach persisted bills.
//! Two backends ship with the crate: an in-memory mock seeded with fixture
//! bills, and a JSON file used by the command line.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::fixtures;
use crate::model::BillRecord;

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait RemoteBillsClient: Send + Sync {
    /// Persist a new bill.
    async fn submit(&self, record: BillRecord) -> StoreResult<()>;

    /// All bills visible to the current user, in storage order.
    async fn list(&self) -> StoreResult<Vec<BillRecord>>;
}

// ==========================================
// In-memory mock
// ==========================================

#[derive(Debug, Default)]
pub struct MockBillsStore {
    bills: Mutex<Vec<BillRecord>>,
    submitted: Mutex<Vec<BillRecord>>,
    failure: Mutex<Option<StoreError>>,
}

impl MockBillsStore {
    pub fn new(bills: Vec<BillRecord>) -> Self {
        Self {
            bills: Mutex::new(bills),
            ..Self::default()
        }
    }

    pub fn with_fixtures() -> Self {
        Self::new(fixtures::bills())
    }

    /// A store whose every call fails with `error`.
    pub fn failing(error: StoreError) -> Self {
        let store = Self::default();
        store.fail_with(Some(error));
        store
    }

    pub fn fail_with(&self, error: Option<StoreError>) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = error;
        }
    }

    /// Records received by `submit`, including rejected ones.
    pub fn submitted(&self) -> Vec<BillRecord> {
        self.submitted.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn check(&self) -> StoreResult<()> {
        let failure = self
            .failure
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        match failure.as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteBillsClient for MockBillsStore {
    async fn submit(&self, record: BillRecord) -> StoreResult<()> {
        self.submitted
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .push(record.clone());
        self.check()?;
        self.bills
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .push(record);
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<BillRecord>> {
        self.check()?;
        let bills = self
            .bills
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(bills.clone())
    }
}

// ==========================================
// JSON file store
// ==========================================

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> StoreResult<Vec<BillRecord>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| StoreError::Backend(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }
}

#[async_trait]
impl RemoteBillsClient for JsonFileStore {
    async fn submit(&self, record: BillRecord) -> StoreResult<()> {
        let mut bills = self.read_all().await?;
        bills.push(record);

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        let json =
            serde_json::to_string_pretty(&bills).map_err(|e| StoreError::Backend(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        tracing::info!(path = %self.path.display(), count = bills.len(), "bill saved");
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<BillRecord>> {
        self.read_all().await
    }
}
