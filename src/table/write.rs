use crate::error::{Result, StageError};
use crate::table::Table;
use std::path::Path;
use tracing::info;
use umya_spreadsheet::writer;

/// Serialize the table to `path` as XLSX: header row first, then data rows,
/// no index column. Missing cells stay blank.
pub fn write_xlsx(table: &Table, path: &Path) -> Result<()> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).ok_or_else(|| StageError::Write {
        path: path.to_path_buf(),
        message: "new workbook has no sheet".to_string(),
    })?;

    for (col, header) in table.headers.iter().enumerate() {
        sheet
            .get_cell_mut(((col + 1) as u32, 1))
            .set_value_string(header);
    }
    for (r, row) in table.rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            if let Some(value) = cell {
                sheet
                    .get_cell_mut(((col + 1) as u32, (r + 2) as u32))
                    .set_value_string(value);
            }
        }
    }

    writer::xlsx::write(&book, path).map_err(|err| StageError::Write {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    info!(rows = table.rows.len(), path = %path.display(), "output written");
    Ok(())
}
