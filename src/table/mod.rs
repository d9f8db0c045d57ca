pub mod filter;
pub mod load;
pub mod normalize;
pub mod write;

/// Zero-based position of the organization-name column within the loaded
/// subset (the renamed first column).
pub const ORGANIZATION_COLUMN: usize = 0;

/// Zero-based position of the ОКПД-2 classification-code column within the
/// loaded subset.
pub const CODE_COLUMN: usize = 5;

/// An all-text table: one header per loaded column, one `Option<String>` per
/// cell. `None` marks a cell that was empty or absent in the workbook, which
/// matters for filtering (missing codes never match).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
