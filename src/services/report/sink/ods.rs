use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{ExportError, TabularSink};
use crate::services::report::columns::Column;
use crate::services::report::rows::Cell;

const MIMETYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";

const MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest:manifest xmlns:manifest="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0" manifest:version="1.2">
 <manifest:file-entry manifest:full-path="/" manifest:media-type="application/vnd.oasis.opendocument.spreadsheet"/>
 <manifest:file-entry manifest:full-path="content.xml" manifest:media-type="text/xml"/>
</manifest:manifest>
"#;

/// OpenDocument spreadsheet with a single sheet.
pub(crate) struct OdsSink {
    sheet_title: String,
    rows: String,
}

impl OdsSink {
    pub(crate) fn new(sheet_title: &str) -> Self {
        Self { sheet_title: sheet_title.to_string(), rows: String::new() }
    }

    fn content_xml(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0" office:version="1.2">
<office:automatic-styles>
<style:style style:name="header" style:family="table-cell"><style:paragraph-properties fo:text-align="center"/><style:text-properties fo:font-weight="bold"/></style:style>
</office:automatic-styles>
<office:body><office:spreadsheet><table:table table:name="{}">{}</table:table></office:spreadsheet></office:body>
</office:document-content>
"#,
            escape_xml(&self.sheet_title),
            self.rows
        )
    }
}

impl TabularSink for OdsSink {
    type Output = Vec<u8>;

    fn write_header(&mut self, columns: &[Column]) -> Result<(), ExportError> {
        self.rows.push_str("<table:table-row>");
        for column in columns {
            self.rows.push_str(&format!(
                r#"<table:table-cell table:style-name="header" office:value-type="string"><text:p>{}</text:p></table:table-cell>"#,
                escape_xml(&column.header)
            ));
        }
        self.rows.push_str("</table:table-row>");
        Ok(())
    }

    fn write_row(&mut self, cells: &[Cell]) -> Result<(), ExportError> {
        self.rows.push_str("<table:table-row>");
        for cell in cells {
            let text = escape_xml(&cell.plain_text());
            match cell {
                Cell::Number(value) => self.rows.push_str(&format!(
                    r#"<table:table-cell office:value-type="float" office:value="{value}"><text:p>{text}</text:p></table:table-cell>"#
                )),
                _ => self.rows.push_str(&format!(
                    r#"<table:table-cell office:value-type="string"><text:p>{text}</text:p></table:table-cell>"#
                )),
            }
        }
        self.rows.push_str("</table:table-row>");
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        // mimetype goes first and uncompressed so readers can sniff the type.
        let stored = FileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file("mimetype", stored)?;
        zip.write_all(MIMETYPE.as_bytes())?;

        let deflated = FileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file("META-INF/manifest.xml", deflated)?;
        zip.write_all(MANIFEST.as_bytes())?;
        zip.start_file("content.xml", deflated)?;
        zip.write_all(self.content_xml().as_bytes())?;

        Ok(zip.finish()?.into_inner())
    }
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            ch if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') => {}
            ch => escaped.push(ch),
        }
    }
    escaped
}
