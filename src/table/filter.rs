use crate::error::{Result, StageError};
use crate::table::{Table, CODE_COLUMN};
use regex::Regex;
use tracing::info;

/// Join code fragments into one alternation. Fragments are deliberately not
/// escaped: they are regex sub-patterns, exactly as the original tool treats
/// them, so `28.41` also matches `28941`.
pub fn code_pattern(codes: &[String]) -> String {
    codes.join("|")
}

/// Keep only rows whose classification-code cell contains a match for any of
/// the supplied fragments. Matching is unanchored and case-sensitive; rows
/// with no code value are dropped.
pub fn filter_by_codes(table: Table, codes: &[String]) -> Result<Table> {
    let pattern = code_pattern(codes);
    let re = Regex::new(&pattern).map_err(|source| StageError::FilterPattern {
        pattern: pattern.clone(),
        source,
    })?;

    let total = table.rows.len();
    let rows: Vec<_> = table
        .rows
        .into_iter()
        .filter(|row| {
            row.get(CODE_COLUMN)
                .and_then(Option::as_deref)
                .is_some_and(|code| re.is_match(code))
        })
        .collect();

    info!(kept = rows.len(), total, pattern = %pattern, "rows filtered");
    Ok(Table {
        headers: table.headers,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_codes(codes: &[Option<&str>]) -> Table {
        Table {
            headers: (0..11).map(|i| format!("h{i}")).collect(),
            rows: codes
                .iter()
                .map(|code| {
                    let mut row: Vec<Option<String>> = vec![None; 11];
                    row[0] = Some("org".to_string());
                    row[CODE_COLUMN] = code.map(str::to_string);
                    row
                })
                .collect(),
        }
    }

    #[test]
    fn joins_fragments_verbatim() {
        let codes = vec!["28.41".to_string(), "26.20.40.150".to_string()];
        assert_eq!(code_pattern(&codes), "28.41|26.20.40.150");
    }

    #[test]
    fn keeps_containing_matches_and_drops_missing() {
        let table = table_with_codes(&[Some("28.41.11"), Some("99.99"), None]);
        let codes = vec!["28.41".to_string(), "26.20.40.150".to_string()];

        let filtered = filter_by_codes(table, &codes).unwrap();
        assert_eq!(filtered.rows.len(), 1);
        assert_eq!(filtered.rows[0][CODE_COLUMN].as_deref(), Some("28.41.11"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let table = table_with_codes(&[Some("ABC.1"), Some("abc.1")]);
        let codes = vec!["abc".to_string()];

        let filtered = filter_by_codes(table, &codes).unwrap();
        assert_eq!(filtered.rows.len(), 1);
        assert_eq!(filtered.rows[0][CODE_COLUMN].as_deref(), Some("abc.1"));
    }

    #[test]
    fn unbalanced_fragment_is_fatal() {
        let table = table_with_codes(&[Some("28.41")]);
        let codes = vec!["28.41(".to_string()];

        let err = filter_by_codes(table, &codes).unwrap_err();
        assert!(matches!(err, StageError::FilterPattern { .. }));
    }
}
