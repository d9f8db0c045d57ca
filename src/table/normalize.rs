use crate::config::ReplacementRule;
use crate::error::{Result, StageError};
use crate::table::{Table, ORGANIZATION_COLUMN};
use regex::RegexBuilder;
use tracing::info;

/// Rewrite the organization column in place, one rule at a time.
///
/// Rules run in ruleset order as case-insensitive regexes over every value,
/// replacing all occurrences; each rule sees the previous rule's output.
/// A rule whose pattern does not compile aborts the run before any file is
/// written.
pub fn apply_replacements(table: &mut Table, rules: &[ReplacementRule]) -> Result<()> {
    for rule in rules {
        let re = RegexBuilder::new(&rule.pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| StageError::ReplacementPattern {
                pattern: rule.pattern.clone(),
                source,
            })?;

        for row in &mut table.rows {
            if let Some(Some(name)) = row.get_mut(ORGANIZATION_COLUMN) {
                let rewritten = re.replace_all(name, rule.replacement.as_str());
                if let std::borrow::Cow::Owned(owned) = rewritten {
                    *name = owned;
                }
            }
        }
    }

    info!(rules = rules.len(), "organization names normalized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, replacement: &str) -> ReplacementRule {
        ReplacementRule {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }

    fn table_with_names(names: &[&str]) -> Table {
        Table {
            headers: (0..11).map(|i| format!("h{i}")).collect(),
            rows: names
                .iter()
                .map(|name| {
                    let mut row: Vec<Option<String>> = vec![None; 11];
                    row[ORGANIZATION_COLUMN] = Some((*name).to_string());
                    row
                })
                .collect(),
        }
    }

    #[test]
    fn replaces_case_insensitively() {
        let mut table = table_with_names(&["ооо ромашка"]);
        apply_replacements(&mut table, &[rule("ООО", "LLC")]).unwrap();
        assert_eq!(table.rows[0][0].as_deref(), Some("LLC ромашка"));
    }

    #[test]
    fn rules_apply_in_order() {
        // The second rule acts on the first rule's output.
        let mut table = table_with_names(&["AO plant"]);
        let rules = [rule("AO", "JSC"), rule("JSC plant", "JSC factory")];
        apply_replacements(&mut table, &rules).unwrap();
        assert_eq!(table.rows[0][0].as_deref(), Some("JSC factory"));
    }

    #[test]
    fn ruleset_is_idempotent_on_normalized_values() {
        let rules = [rule("ООО", "LLC"), rule(r"\s+", " ")];
        let mut table = table_with_names(&["ооо   ромашка"]);
        apply_replacements(&mut table, &rules).unwrap();
        let once = table.rows[0][0].clone();

        apply_replacements(&mut table, &rules).unwrap();
        assert_eq!(table.rows[0][0], once);
        assert_eq!(once.as_deref(), Some("LLC ромашка"));
    }

    #[test]
    fn missing_names_are_left_alone() {
        let mut table = table_with_names(&["x"]);
        table.rows[0][ORGANIZATION_COLUMN] = None;
        apply_replacements(&mut table, &[rule("x", "y")]).unwrap();
        assert_eq!(table.rows[0][ORGANIZATION_COLUMN], None);
    }

    #[test]
    fn invalid_rule_pattern_is_fatal() {
        let mut table = table_with_names(&["org"]);
        let err = apply_replacements(&mut table, &[rule("(", "x")]).unwrap_err();
        assert!(matches!(err, StageError::ReplacementPattern { .. }));
    }
}
