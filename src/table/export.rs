use anyhow::Context;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use time::Date;
use crate::helpers::date_format::iso_date;

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Header line followed by one line per row, every field quoted.
pub fn build_csv<R, F>(headers: &[&str], rows: R) -> anyhow::Result<Vec<u8>>
where
    R: IntoIterator<Item = Vec<F>>,
    F: AsRef<[u8]>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(headers)
        .context("Failed to write csv header")?;
    for row in rows {
        writer.write_record(&row).context("Failed to write csv row")?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush csv output: {}", e.error()))
}

pub fn export_filename(stem: &str, today: Date) -> String {
    format!("{}-{}.csv", stem, iso_date(today))
}

pub struct CsvExport {
    pub filename: String,
    pub body: Vec<u8>,
}

impl IntoResponse for CsvExport {
    fn into_response(self) -> Response {
        (
            [
                (CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", self.filename),
                ),
            ],
            self.body,
        )
            .into_response()
    }
}
