use crate::error::{Result, StageError};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Source of interactive answers. The pipeline only ever asks line-shaped
/// questions, so a single method is enough; tests swap in [`Scripted`] to run
/// without a terminal.
pub trait InputSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;
}

/// Prompts on stdout and reads one line from stdin.
#[derive(Debug, Default)]
pub struct Stdin;

impl InputSource for Stdin {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        let mut out = io::stdout().lock();
        out.write_all(prompt.as_bytes())?;
        out.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}

/// Canned answers, consumed front to back. Used in tests.
#[derive(Debug, Default)]
pub struct Scripted {
    answers: VecDeque<String>,
}

impl Scripted {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputSource for Scripted {
    fn read_line(&mut self, _prompt: &str) -> io::Result<String> {
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer left"))
    }
}

/// Validated parameters for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParams {
    pub url: String,
    pub codes: Vec<String>,
}

const URL_PROMPT: &str = "Download URL (the registry's 'valid entries only (XLSX)' link): ";
const CODES_PROMPT: &str = "OKPD-2 code(s) to filter by, comma-separated: ";

/// Ask for the download URL and the code list. An empty URL or an empty code
/// line is fatal; individual codes are trimmed but otherwise passed through
/// verbatim (they become regex sub-patterns later).
pub fn collect_params(source: &mut dyn InputSource) -> Result<RunParams> {
    let url = source
        .read_line(URL_PROMPT)
        .map_err(|err| StageError::Input {
            reason: format!("could not read URL: {err}"),
        })?
        .trim()
        .to_string();
    if url.is_empty() {
        return Err(StageError::Input {
            reason: "URL must not be empty".to_string(),
        });
    }

    let codes_line = source
        .read_line(CODES_PROMPT)
        .map_err(|err| StageError::Input {
            reason: format!("could not read code list: {err}"),
        })?
        .trim()
        .to_string();
    if codes_line.is_empty() {
        return Err(StageError::Input {
            reason: "at least one OKPD-2 code is required".to_string(),
        });
    }

    let codes = codes_line
        .split(',')
        .map(|code| code.trim().to_string())
        .collect();

    Ok(RunParams { url, codes })
}
