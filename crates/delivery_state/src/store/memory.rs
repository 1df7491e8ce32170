//! In-memory sheet

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::TabularStore;
use crate::error::StoreError;
use crate::record::{RowLocator, SheetRow};

/// A sheet held in memory: a header row plus data rows, addressed the same
/// way as the real spreadsheet (row 2 is the first data row, columns are
/// 1-based).
#[derive(Debug, Default)]
pub struct MemorySheet {
    headers: Vec<String>,
    rows: RwLock<Vec<Vec<String>>>,
    writes: AtomicUsize,
    offline: AtomicBool,
}

impl MemorySheet {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            ..Default::default()
        }
    }

    /// `DNI | Nombre | Entregado | Fecha` sheet filled from
    /// `(identifier, name, delivered)` tuples.
    pub fn with_rows(rows: Vec<(&str, &str, bool)>) -> Self {
        let sheet = Self::new(
            ["DNI", "Nombre", "Entregado", "Fecha"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
        );
        for (identifier, name, delivered) in rows {
            let flag = if delivered { "TRUE" } else { "FALSE" };
            sheet.push_row(vec![identifier, name, flag, ""]);
        }
        sheet
    }

    pub fn push_row(&self, cells: Vec<&str>) {
        self.rows
            .write()
            .push(cells.into_iter().map(str::to_string).collect());
    }

    /// Number of successful `write_cells` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail, as if the backend were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn cell(&self, locator: RowLocator, header: &str) -> Option<String> {
        let column = self.headers.iter().position(|h| h == header)?;
        let index = (locator.row() as usize).checked_sub(2)?;
        self.rows.read().get(index)?.get(column).cloned()
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::new("sheet offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl TabularStore for MemorySheet {
    async fn list_rows(&self) -> Result<Vec<SheetRow>, StoreError> {
        self.check_online()?;

        let rows = self.rows.read();
        Ok(rows
            .iter()
            .enumerate()
            .map(|(index, cells)| {
                SheetRow::from_cells(
                    RowLocator::from_data_index(index),
                    &self.headers,
                    cells.clone(),
                )
            })
            .collect())
    }

    async fn write_cells(
        &self,
        locator: RowLocator,
        first_column: u32,
        values: Vec<String>,
    ) -> Result<(), StoreError> {
        self.check_online()?;
        if first_column == 0 {
            return Err(StoreError::new("columns are 1-based"));
        }

        let mut rows = self.rows.write();
        let row = (locator.row() as usize)
            .checked_sub(2)
            .and_then(|index| rows.get_mut(index))
            .ok_or_else(|| StoreError::new(format!("{} does not exist", locator)))?;

        let start = first_column as usize - 1;
        if row.len() < start + values.len() {
            row.resize(start + values.len(), String::new());
        }
        for (offset, value) in values.into_iter().enumerate() {
            row[start + offset] = value;
        }

        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
