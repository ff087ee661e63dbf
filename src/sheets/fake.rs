use crate::sheets::cell::CellRef;
use crate::sheets::error::SheetError;
use crate::sheets::sheet::SheetService;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A fake in-memory implementation of the SheetService trait for testing.
/// Worksheets exist once a roster has been set for them; cell writes are
/// recorded in a flat grid keyed by A1 reference.
#[derive(Clone)]
pub struct FakeSheet {
    rosters: Arc<RwLock<HashMap<String, Vec<String>>>>,
    cells: Arc<RwLock<HashMap<(String, String), String>>>,
    aligned: Arc<RwLock<Vec<(String, String)>>>,
    fail_writes: Arc<RwLock<bool>>,
}

impl FakeSheet {
    /// Create a new FakeSheet with no worksheets
    pub fn new() -> Self {
        FakeSheet {
            rosters: Arc::new(RwLock::new(HashMap::new())),
            cells: Arc::new(RwLock::new(HashMap::new())),
            aligned: Arc::new(RwLock::new(Vec::new())),
            fail_writes: Arc::new(RwLock::new(false)),
        }
    }

    /// Define a worksheet and the names in its first column, top to bottom
    pub fn fake_set_roster(&self, sheet: &str, names: &[&str]) {
        let mut rosters = self.rosters.write().unwrap();
        rosters.insert(
            sheet.to_string(),
            names.iter().map(|name| name.to_string()).collect(),
        );
    }

    /// The value written at a cell, if any
    pub fn fake_cell(&self, sheet: &str, cell: &CellRef) -> Option<String> {
        let cells = self.cells.read().unwrap();
        cells.get(&(sheet.to_string(), cell.to_string())).cloned()
    }

    /// Every (worksheet, A1) coordinate that was right-aligned, in order
    pub fn fake_alignments(&self) -> Vec<(String, String)> {
        self.aligned.read().unwrap().clone()
    }

    /// Number of cell writes recorded so far
    pub fn fake_write_count(&self) -> usize {
        self.cells.read().unwrap().len()
    }

    /// Simulate write failures. While enabled, write_cell and align_right
    /// return errors and record nothing.
    pub fn fake_fail_writes(&self, fail: bool) {
        *self.fail_writes.write().unwrap() = fail;
    }
}

impl Default for FakeSheet {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SheetService for FakeSheet {
    async fn first_column(&self, sheet: &str) -> Result<Vec<String>, SheetError> {
        let rosters = self.rosters.read().unwrap();
        rosters
            .get(sheet)
            .cloned()
            .ok_or_else(|| SheetError::UnknownSheet(sheet.to_string()))
    }

    async fn write_cell(
        &self,
        sheet: &str,
        cell: &CellRef,
        value: &str,
    ) -> Result<(), SheetError> {
        if *self.fail_writes.read().unwrap() {
            return Err(SheetError::Request("Simulated write failure".to_string()));
        }

        let mut cells = self.cells.write().unwrap();
        cells.insert((sheet.to_string(), cell.to_string()), value.to_string());
        Ok(())
    }

    async fn align_right(&self, sheet: &str, cell: &CellRef) -> Result<(), SheetError> {
        if *self.fail_writes.read().unwrap() {
            return Err(SheetError::Request("Simulated write failure".to_string()));
        }

        let mut aligned = self.aligned.write().unwrap();
        aligned.push((sheet.to_string(), cell.to_string()));
        Ok(())
    }
}
