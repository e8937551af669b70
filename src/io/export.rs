use std::io::Write;
use std::path::Path;

use crate::application::{AppError, LedgerService};
use crate::domain::{COLUMN_COUNT, LedgerKind, LedgerRecord};
use crate::storage::read_records;

/// Exporter for handing ledger files to the outside world.
///
/// Exports are the stored bytes, unchanged, so a downloaded file is exactly
/// what the ledger holds.
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Copy a ledger's raw bytes to `writer`. Returns the number of bytes written.
    pub fn write_raw<W: Write>(&self, kind: LedgerKind, writer: W) -> Result<usize, AppError> {
        let bytes = self.service.export_bytes(kind)?;
        self.write_bytes(kind, &bytes, writer)
    }

    /// Write bytes already taken from a ledger of `kind` to `writer`.
    pub fn write_bytes<W: Write>(
        &self,
        kind: LedgerKind,
        bytes: &[u8],
        mut writer: W,
    ) -> Result<usize, AppError> {
        writer
            .write_all(bytes)
            .and_then(|_| writer.flush())
            .map_err(|source| AppError::ExportWrite { kind, source })?;

        tracing::debug!(kind = %kind, bytes = bytes.len(), "exported ledger");
        Ok(bytes.len())
    }

    /// Number of records in an export of `kind`.
    pub fn record_count(&self, kind: LedgerKind) -> Result<usize, AppError> {
        match kind {
            LedgerKind::Invoices => self.service.store().invoices().len(),
            LedgerKind::Expenses => self.service.store().expenses().len(),
        }
    }
}

/// Parse previously exported bytes back into records.
pub fn parse_export<R: LedgerRecord>(
    bytes: &[u8],
    columns: &[String; COLUMN_COUNT],
) -> Result<Vec<R>, AppError> {
    let label = R::KIND.export_file_name();
    read_records(bytes, columns, Path::new(&label))
}
