use crate::error::{Result, StageError};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use std::io::Read;
use tracing::{debug, info};
use url::Url;

/// Bytes pulled off the socket per read, matching the progress granularity of
/// the original export tool.
const CHUNK_SIZE: usize = 1024;

/// Build the one client a run needs. No request timeout: a stalled registry
/// server blocks the run rather than failing it.
pub fn client() -> Result<Client> {
    Client::builder()
        .timeout(None)
        .build()
        .map_err(|source| StageError::Transport { source })
}

/// Stream `url_str` fully into memory with a byte progress bar.
///
/// Non-success statuses are fatal. The connection is released when the
/// response is dropped, on success and on every error path alike.
pub fn download(client: &Client, url_str: &str) -> Result<Vec<u8>> {
    let url = Url::parse(url_str).map_err(|source| StageError::Url {
        url: url_str.to_string(),
        source,
    })?;

    let response = client
        .get(url.as_str())
        .send()
        .map_err(|source| StageError::Transport { source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(StageError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    // Content-Length drives the progress display only; 0 means unknown.
    let total = response.content_length().unwrap_or(0);
    debug!(total, "response headers received");

    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("downloading {bytes}/{total_bytes} ({bytes_per_sec})")
            .expect("progress template should be valid"),
    );

    let mut response = response;
    let mut buffer = Vec::new();
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        let n = response
            .read(&mut chunk)
            .map_err(|source| StageError::Body { source })?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
        bar.inc(n as u64);
    }
    bar.finish_and_clear();

    info!(bytes = buffer.len(), "download complete");
    Ok(buffer)
}

#[cfg(test)]
pub(crate) mod test_server {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve exactly one HTTP response on a random local port and return the
    /// URL to request. The listener thread exits after the first request.
    pub fn serve_once(status_line: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request);
            let header = format!(
                "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            // The client may hang up early (e.g. after a status-only check).
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(&body);
        });

        format!("http://{addr}/export.xlsx")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downloads_full_body() {
        let body: Vec<u8> = (0..3000u32).map(|i| (i % 251) as u8).collect();
        let url = test_server::serve_once("HTTP/1.1 200 OK", body.clone());

        let client = client().unwrap();
        let fetched = download(&client, &url).unwrap();
        assert_eq!(fetched, body);
    }

    #[test]
    fn non_success_status_is_fatal() {
        let url = test_server::serve_once("HTTP/1.1 404 Not Found", b"gone".to_vec());

        let client = client().unwrap();
        let err = download(&client, &url).unwrap_err();
        assert!(matches!(err, StageError::HttpStatus { status, .. } if status.as_u16() == 404));
    }

    #[test]
    fn unparseable_url_is_fatal() {
        let client = client().unwrap();
        let err = download(&client, "not a url").unwrap_err();
        assert!(matches!(err, StageError::Url { .. }));
    }
}
