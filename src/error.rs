use std::path::PathBuf;
use thiserror::Error;

/// One tagged failure per pipeline stage. Every variant is fatal: the driver
/// logs the message and stops without touching later stages, so no partial
/// output file is ever written.
#[derive(Debug, Error)]
pub enum StageError {
    /// The replacement ruleset could not be used (missing, malformed, or empty).
    #[error("no usable replacement rules ({reason}); aborting")]
    Config { reason: String },

    /// The interactive parameters failed validation.
    #[error("invalid input: {reason}")]
    Input { reason: String },

    /// The download URL did not parse.
    #[error("invalid download URL `{url}`: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The GET request itself failed (DNS, TLS, connection reset, ...).
    #[error("download failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("server answered {status} for `{url}`")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Reading the response body broke mid-stream.
    #[error("reading response body: {source}")]
    Body {
        #[source]
        source: std::io::Error,
    },

    /// The downloaded bytes are not a workbook we can read.
    #[error("workbook parse failed: {message}")]
    Parse { message: String },

    /// The joined code fragments are not a valid regex.
    #[error("filter pattern `{pattern}` is not a valid regex: {source}")]
    FilterPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A replacement rule's pattern is not a valid regex.
    #[error("replacement pattern `{pattern}` is not a valid regex: {source}")]
    ReplacementPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Serializing the filtered table to disk failed.
    #[error("writing `{path}`: {message}")]
    Write { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, StageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_stage_detail() {
        let err = StageError::Config {
            reason: "config file not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no usable replacement rules (config file not found); aborting"
        );

        let err = StageError::Write {
            path: PathBuf::from("out.xlsx"),
            message: "permission denied".to_string(),
        };
        assert_eq!(err.to_string(), "writing `out.xlsx`: permission denied");
    }
}
