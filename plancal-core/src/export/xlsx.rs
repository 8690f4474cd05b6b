use std::path::Path;

use rust_xlsxwriter::{Workbook, XlsxError};
use snafu::ResultExt;
use tracing::*;

use crate::{
    consts::XLSX_HEADERS,
    error::{PlancalError, XlsxSnafu},
    event::Event,
};

const SHEET_NAME: &str = "Planning";

/// One header row, then one row of plain text cells per event.
fn build_workbook(events: &[Event]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in XLSX_HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (idx, event) in events.iter().enumerate() {
        let row = idx as u32 + 1;
        let cells = [
            event.date.format("%Y-%m-%d").to_string(),
            event.start.format("%H:%M").to_string(),
            event.end.format("%H:%M").to_string(),
            event.title.clone(),
            event.description.clone(),
        ];
        for (col, cell) in cells.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            worksheet.write_string(row, col as u16, cell)?;
        }
    }

    Ok(workbook)
}

pub fn to_xlsx_bytes(events: &[Event]) -> Result<Vec<u8>, PlancalError> {
    build_workbook(events)
        .and_then(|mut workbook| workbook.save_to_buffer())
        .context(XlsxSnafu { path: "<memory>" })
}

pub fn write_xlsx(events: &[Event], path: &Path) -> Result<(), PlancalError> {
    let path_name = path.to_string_lossy();

    build_workbook(events)
        .and_then(|mut workbook| workbook.save(path))
        .context(XlsxSnafu { path: path_name.as_ref() })?;

    info!("wrote {} events to {}", events.len(), path_name);
    Ok(())
}
