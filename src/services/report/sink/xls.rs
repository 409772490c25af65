use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};

use super::{ExportError, TabularSink};
use crate::services::report::columns::Column;
use crate::services::report::rows::Cell;

/// Excel workbook with a single sheet.
pub(crate) struct XlsSink {
    sheet_title: String,
    worksheet: Worksheet,
    next_row: u32,
}

impl XlsSink {
    pub(crate) fn new(sheet_title: &str) -> Self {
        Self { sheet_title: sheet_title.to_string(), worksheet: Worksheet::new(), next_row: 0 }
    }
}

impl TabularSink for XlsSink {
    type Output = Vec<u8>;

    fn write_header(&mut self, columns: &[Column]) -> Result<(), ExportError> {
        let header = Format::new().set_bold().set_align(FormatAlign::Center);
        for (index, column) in columns.iter().enumerate() {
            self.worksheet.write_string_with_format(
                self.next_row,
                index as u16,
                column.header.as_str(),
                &header,
            )?;
        }
        self.next_row += 1;
        Ok(())
    }

    fn write_row(&mut self, cells: &[Cell]) -> Result<(), ExportError> {
        for (index, cell) in cells.iter().enumerate() {
            let col = index as u16;
            match cell {
                Cell::Number(value) => {
                    self.worksheet.write_number(self.next_row, col, *value)?;
                }
                Cell::Empty => {}
                other => {
                    self.worksheet.write_string(self.next_row, col, other.plain_text())?;
                }
            }
        }
        self.next_row += 1;
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>, ExportError> {
        self.worksheet.set_name(self.sheet_title.as_str())?;
        let mut workbook = Workbook::new();
        workbook.push_worksheet(self.worksheet);
        Ok(workbook.save_to_buffer()?)
    }
}
