use crate::sheets::cell::CellRef;
use crate::sheets::error::SheetError;
use async_trait::async_trait;
use std::sync::Arc;

/// SheetService trait defining the interface to the external tabular
/// service. The service is addressed by worksheet name plus cell
/// coordinate; it knows nothing about students or questions.
#[async_trait]
pub trait SheetService: Send + Sync + 'static {
    /// The full first column of a worksheet, used as the roster for row
    /// resolution. Position in the returned vector is the 1-indexed row
    /// minus one.
    async fn first_column(&self, sheet: &str) -> Result<Vec<String>, SheetError>;

    /// Write a single value at a coordinate. Values starting with `=` are
    /// interpreted as formulas by the service.
    async fn write_cell(&self, sheet: &str, cell: &CellRef, value: &str)
        -> Result<(), SheetError>;

    /// Right-align the contents of a cell.
    async fn align_right(&self, sheet: &str, cell: &CellRef) -> Result<(), SheetError>;
}

/// Implementation of SheetService trait for Arc<T> where T implements
/// SheetService, so one client can be shared between the recorder and tests.
#[async_trait]
impl<T: SheetService + ?Sized> SheetService for Arc<T> {
    async fn first_column(&self, sheet: &str) -> Result<Vec<String>, SheetError> {
        (**self).first_column(sheet).await
    }

    async fn write_cell(
        &self,
        sheet: &str,
        cell: &CellRef,
        value: &str,
    ) -> Result<(), SheetError> {
        (**self).write_cell(sheet, cell, value).await
    }

    async fn align_right(&self, sheet: &str, cell: &CellRef) -> Result<(), SheetError> {
        (**self).align_right(sheet, cell).await
    }
}
