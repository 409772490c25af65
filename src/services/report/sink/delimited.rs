use csv::{Writer, WriterBuilder};

use super::{ExportError, TabularSink};
use crate::services::report::columns::Column;
use crate::services::report::rows::Cell;

/// Tab-separated text download.
pub(crate) struct CsvSink {
    writer: Writer<Vec<u8>>,
}

impl CsvSink {
    pub(crate) fn new() -> Self {
        let writer = WriterBuilder::new().delimiter(b'\t').flexible(false).from_writer(Vec::new());
        Self { writer }
    }
}

impl TabularSink for CsvSink {
    type Output = Vec<u8>;

    fn write_header(&mut self, columns: &[Column]) -> Result<(), ExportError> {
        self.writer.write_record(columns.iter().map(|column| column.header.as_str()))?;
        Ok(())
    }

    fn write_row(&mut self, cells: &[Cell]) -> Result<(), ExportError> {
        self.writer.write_record(cells.iter().map(Cell::plain_text))?;
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        self.writer.into_inner().map_err(|err| ExportError::Io(err.into_error()))
    }
}
