mod delimited;
mod html;
mod ods;
mod xls;

use thiserror::Error;

use crate::services::report::columns::Column;
use crate::services::report::rows::Cell;
use crate::services::report::OutputMode;

pub(crate) use self::delimited::CsvSink;
pub(crate) use self::html::HtmlTableSink;
pub(crate) use self::ods::OdsSink;
pub(crate) use self::xls::XlsSink;

#[derive(Debug, Error)]
pub(crate) enum ExportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("ods packaging failed: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("xlsx export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("export i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination of report rows: the on-screen table or a download.
pub(crate) trait TabularSink {
    type Output;

    fn write_header(&mut self, columns: &[Column]) -> Result<(), ExportError>;

    fn write_row(&mut self, cells: &[Cell]) -> Result<(), ExportError>;

    fn finish(self) -> Result<Self::Output, ExportError>;
}

/// A file download being assembled.
pub(crate) enum DownloadSink {
    Csv(CsvSink),
    Ods(OdsSink),
    Xls(XlsSink),
}

impl DownloadSink {
    /// `None` for the HTML output, which never downloads.
    pub(crate) fn for_output(output: OutputMode, sheet_title: &str) -> Option<Self> {
        match output {
            OutputMode::Html => None,
            OutputMode::Csv => Some(Self::Csv(CsvSink::new())),
            OutputMode::Ods => Some(Self::Ods(OdsSink::new(sheet_title))),
            OutputMode::Xls => Some(Self::Xls(XlsSink::new(sheet_title))),
        }
    }
}

impl TabularSink for DownloadSink {
    type Output = Vec<u8>;

    fn write_header(&mut self, columns: &[Column]) -> Result<(), ExportError> {
        match self {
            Self::Csv(sink) => sink.write_header(columns),
            Self::Ods(sink) => sink.write_header(columns),
            Self::Xls(sink) => sink.write_header(columns),
        }
    }

    fn write_row(&mut self, cells: &[Cell]) -> Result<(), ExportError> {
        match self {
            Self::Csv(sink) => sink.write_row(cells),
            Self::Ods(sink) => sink.write_row(cells),
            Self::Xls(sink) => sink.write_row(cells),
        }
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        match self {
            Self::Csv(sink) => sink.finish(),
            Self::Ods(sink) => sink.finish(),
            Self::Xls(sink) => sink.finish(),
        }
    }
}

/// Download name: course short name and activity name, reduced to safe characters.
pub(crate) fn download_filename(course_shortname: &str, activity_name: &str, extension: &str) -> String {
    let raw = format!("{course_shortname} {activity_name}");
    let mut cleaned = String::with_capacity(raw.len());
    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() || matches!(ch, ' ' | '-' | '_' | '.' | '(' | ')') {
            cleaned.push(ch);
        }
    }
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let cleaned = cleaned.trim_matches('.');
    let stem = if cleaned.is_empty() { "report" } else { cleaned };
    format!("{stem}.{extension}")
}
