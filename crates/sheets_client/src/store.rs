//! The worksheet as a [`TabularStore`]

use async_trait::async_trait;
use delivery_state::{RowLocator, SheetRow, StoreError, TabularStore};

use crate::client::SheetsClient;

#[async_trait]
impl TabularStore for SheetsClient {
    async fn list_rows(&self) -> Result<Vec<SheetRow>, StoreError> {
        let values = self
            .get_values()
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;
        Ok(rows_from_values(values))
    }

    async fn write_cells(
        &self,
        locator: RowLocator,
        first_column: u32,
        values: Vec<String>,
    ) -> Result<(), StoreError> {
        self.update_row(locator.row(), first_column, values)
            .await
            .map_err(|e| StoreError::new(e.to_string()))
    }
}

/// First row is the header; each following row keeps its cells in column
/// order and keyed by header. Blank headers are not keyed.
pub fn rows_from_values(values: Vec<Vec<String>>) -> Vec<SheetRow> {
    let mut rows = values.into_iter();
    let Some(headers) = rows.next() else {
        return Vec::new();
    };

    rows.enumerate()
        .map(|(index, cells)| {
            SheetRow::from_cells(RowLocator::from_data_index(index), &headers, cells)
        })
        .collect()
}
