use crate::error::{Result, StageError};
use crate::table::{Table, ORGANIZATION_COLUMN};
use std::io::Cursor;
use tracing::info;
use umya_spreadsheet::reader;

/// The registry export is much wider than we need; only these 0-indexed
/// columns are loaded, in this order.
pub const LOADED_COLUMNS: [usize; 11] = [0, 1, 8, 9, 11, 12, 13, 15, 19, 23, 24];

/// Zero-based index of the header row in the sheet; everything above it is
/// export preamble and is skipped.
pub const HEADER_ROW: usize = 2;

/// Canonical label for the first loaded column.
pub const ORGANIZATION_LABEL: &str = "Organization";

/// Parse downloaded XLSX bytes into a [`Table`].
///
/// Every cell is taken as text; empty cells become `None`. Rows with no
/// value in any loaded column are dropped.
pub fn from_xlsx_bytes(bytes: &[u8]) -> Result<Table> {
    let book = reader::xlsx::read_reader(Cursor::new(bytes), true).map_err(|err| {
        StageError::Parse {
            message: err.to_string(),
        }
    })?;
    let sheet = book.get_sheet(&0).ok_or_else(|| StageError::Parse {
        message: "workbook has no sheets".to_string(),
    })?;

    // umya coordinates are 1-based (col, row).
    let header_row = (HEADER_ROW + 1) as u32;
    let highest_row = sheet.get_highest_row();
    if highest_row < header_row {
        return Err(StageError::Parse {
            message: format!("sheet ends at row {highest_row}, before the header row {header_row}"),
        });
    }

    let mut headers: Vec<String> = LOADED_COLUMNS
        .iter()
        .map(|&col| sheet.get_value(((col + 1) as u32, header_row)))
        .collect();
    headers[ORGANIZATION_COLUMN] = ORGANIZATION_LABEL.to_string();

    let mut rows = Vec::new();
    for row in (header_row + 1)..=highest_row {
        let cells: Vec<Option<String>> = LOADED_COLUMNS
            .iter()
            .map(|&col| {
                let value = sheet.get_value(((col + 1) as u32, row));
                if value.is_empty() {
                    None
                } else {
                    Some(value)
                }
            })
            .collect();
        if cells.iter().all(Option::is_none) {
            continue;
        }
        rows.push(cells);
    }

    info!(rows = rows.len(), "workbook loaded");
    Ok(Table { headers, rows })
}

/// Build an export-shaped workbook in memory: two preamble rows, a header on
/// row 3, then `rows` data rows across 25 raw columns. Shared by the loader
/// and pipeline tests.
#[cfg(test)]
pub(crate) fn workbook_bytes(rows: &[Vec<(usize, &str)>]) -> Vec<u8> {
    use umya_spreadsheet::writer;

    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();

    sheet.get_cell_mut((1, 1)).set_value_string("Registry export");
    sheet.get_cell_mut((1, 2)).set_value_string("generated for tests");
    for col in 0..25usize {
        sheet
            .get_cell_mut(((col + 1) as u32, 3))
            .set_value_string(format!("col{col}"));
    }
    for (i, cells) in rows.iter().enumerate() {
        let row = (i + 4) as u32;
        for &(col, value) in cells {
            sheet
                .get_cell_mut(((col + 1) as u32, row))
                .set_value_string(value);
        }
    }

    let mut buffer = Cursor::new(Vec::new());
    writer::xlsx::write_writer(&book, &mut buffer).unwrap();
    buffer.into_inner()
}
