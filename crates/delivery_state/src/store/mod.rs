//! Record store adapter
//!
//! [`TabularStore`] is the raw capability a spreadsheet backend offers: list
//! every row, write a run of cells. [`RecordStore`] layers the delivery
//! semantics on top of it: identifier matching, the delivered flag, and the
//! timestamped "mark delivered" write.

mod memory;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::{DeliveryError, Result, StoreError};
use crate::identifier::{normalize, Identifier};
use crate::record::{parse_delivered_flag, Record, RowLocator, SheetLayout, SheetRow};

pub use memory::MemorySheet;

/// Format written into the timestamp column.
pub const DELIVERED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Value written into the delivered column.
pub const DELIVERED_TRUE: &str = "TRUE";

/// Backend holding the rows. Implemented by the Sheets client and by
/// [`MemorySheet`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// All data rows in stored order. The header row is not included.
    async fn list_rows(&self) -> std::result::Result<Vec<SheetRow>, StoreError>;

    /// Write `values` into consecutive cells of `locator`'s row, starting at
    /// the 1-based `first_column`.
    async fn write_cells(
        &self,
        locator: RowLocator,
        first_column: u32,
        values: Vec<String>,
    ) -> std::result::Result<(), StoreError>;
}

/// Lookup and update of delivery records on top of a [`TabularStore`].
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn TabularStore>,
    layout: SheetLayout,
    timeout: Option<Duration>,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn TabularStore>) -> Self {
        Self {
            backend,
            layout: SheetLayout::default(),
            timeout: None,
        }
    }

    pub fn with_layout(mut self, layout: SheetLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Bound every backend round trip. Elapsed calls count as store failures.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// First row whose identifier cell normalizes to `id`.
    pub async fn find_by_identifier(&self, id: &Identifier) -> Result<Record> {
        let rows = self
            .bounded(self.backend.list_rows())
            .await
            .map_err(|e| {
                warn!("Failed to list rows while looking up {}: {}", id, e);
                DeliveryError::StoreUnavailable(e.0)
            })?;

        debug!("Scanning {} rows for {}", rows.len(), id);

        rows.iter()
            .find(|row| {
                normalize(row.get(&self.layout.identifier_header))
                    .map(|candidate| &candidate == id)
                    .unwrap_or(false)
            })
            .map(|row| self.to_record(id, row))
            .ok_or(DeliveryError::NotFound)
    }

    /// Re-resolve `id` against the current sheet and flag it as delivered now.
    ///
    /// Flag and timestamp go out in a single write.
    pub async fn mark_delivered(&self, id: &Identifier) -> Result<()> {
        let record = self.find_by_identifier(id).await?;
        let stamp = chrono::Local::now().format(DELIVERED_AT_FORMAT).to_string();

        self.bounded(self.backend.write_cells(
            record.locator,
            self.layout.delivered_column,
            vec![DELIVERED_TRUE.to_string(), stamp.clone()],
        ))
        .await
        .map_err(|e| {
            warn!("Failed to mark {} delivered at {}: {}", id, record.locator, e);
            DeliveryError::UpdateFailed(e.0)
        })?;

        info!("Marked {} delivered at {} ({})", id, record.locator, stamp);
        Ok(())
    }

    fn to_record(&self, id: &Identifier, row: &SheetRow) -> Record {
        let delivered_column = self.layout.delivered_column;
        let delivered_at = row.cell(delivered_column + 1).trim();
        Record {
            identifier: id.clone(),
            display_name: row.get(&self.layout.name_header).to_string(),
            delivered: parse_delivered_flag(row.cell(delivered_column)),
            delivered_at: (!delivered_at.is_empty()).then(|| delivered_at.to_string()),
            locator: row.locator,
        }
    }

    async fn bounded<T, F>(&self, call: F) -> std::result::Result<T, StoreError>
    where
        F: Future<Output = std::result::Result<T, StoreError>>,
    {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| Err(StoreError::new(format!("timed out after {:?}", limit)))),
            None => call.await,
        }
    }
}
