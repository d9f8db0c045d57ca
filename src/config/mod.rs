use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs};
use tracing::error;

/// One ordered entry of the replacement ruleset. Rules are applied in the
/// order they appear in `replacements.json`, so a later rule sees the output
/// of every earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementRule {
    pub pattern: String,
    pub replacement: String,
}

/// Shape of `replacements.json`. serde_json's `preserve_order` feature keeps
/// the map in file order, which is what makes the ruleset ordered.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(rename = "REPLACEMENTS", default)]
    replacements: serde_json::Map<String, Value>,
}

/// Default config location: `replacements.json` next to the executable,
/// falling back to the current directory when the executable path is opaque.
pub fn default_path() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_default()
        .join("replacements.json")
}

/// Load the replacement ruleset from `path`.
///
/// Any failure degrades to an empty ruleset after logging what went wrong
/// (missing file, malformed content, or other I/O error). The caller treats
/// an empty ruleset as fatal before doing anything else.
pub fn load_replacements(path: &Path) -> Vec<ReplacementRule> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            error!("replacement config not found: {}", path.display());
            return Vec::new();
        }
        Err(err) => {
            error!("could not read replacement config {}: {err}", path.display());
            return Vec::new();
        }
    };

    match parse_replacements(&raw) {
        Ok(rules) => rules,
        Err(err) => {
            error!("replacement config {} is malformed: {err:#}", path.display());
            Vec::new()
        }
    }
}

/// Parse the config body: a JSON object whose `REPLACEMENTS` key maps regex
/// patterns to replacement strings. Key order is preserved.
fn parse_replacements(raw: &str) -> Result<Vec<ReplacementRule>> {
    let config: ConfigFile = serde_json::from_str(raw).context("invalid JSON")?;

    let mut rules = Vec::with_capacity(config.replacements.len());
    for (pattern, replacement) in config.replacements {
        let Some(replacement) = replacement.as_str() else {
            bail!("replacement for `{pattern}` is not a string");
        };
        rules.push(ReplacementRule {
            pattern,
            replacement: replacement.to_string(),
        });
    }
    Ok(rules)
}
