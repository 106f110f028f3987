//! Loading a manifest from disk or over HTTP.
//!
//! Both transports end in the same place: the body is parsed as JSON and
//! normalized (see [`crate::types::normalize`]). Only transport failures and
//! invalid JSON are errors; a well-formed document with the wrong shape loads
//! as an empty or partial manifest.
//!
//! HTTP loads carry a `v=<unix millis>` query parameter so that no cache
//! between here and the origin can hand back an old manifest.

use crate::types::Manifest;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("HTTP {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid manifest JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where a manifest comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    File(PathBuf),
    Url(String),
}

impl ManifestSource {
    pub fn file(path: impl AsRef<Path>) -> Self {
        ManifestSource::File(path.as_ref().to_path_buf())
    }
}

impl FromStr for ManifestSource {
    type Err = std::convert::Infallible;

    /// `http://` and `https://` are URLs, anything else is a path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(ManifestSource::Url(s.to_string()))
        } else {
            Ok(ManifestSource::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestSource::File(path) => write!(f, "{}", path.display()),
            ManifestSource::Url(url) => f.write_str(url),
        }
    }
}

/// Fetch and parse a manifest.
pub fn load(source: &ManifestSource) -> Result<Manifest, LoadError> {
    let body = match source {
        ManifestSource::File(path) => {
            std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?
        }
        ManifestSource::Url(url) => fetch(&cache_busted(url, chrono::Utc::now().timestamp_millis()))?,
    };
    parse(&body)
}

/// Parse manifest JSON, logging any shape problems.
pub fn parse(body: &str) -> Result<Manifest, LoadError> {
    Ok(Manifest::from_json(body)?.into_manifest_logged())
}

fn fetch(url: &str) -> Result<String, LoadError> {
    log::debug!("GET {url}");
    match ureq::get(url).call() {
        Ok(response) => response
            .into_string()
            .map_err(|e| LoadError::Transport(e.to_string())),
        Err(ureq::Error::Status(code, _)) => Err(LoadError::Status(code)),
        Err(ureq::Error::Transport(t)) => Err(LoadError::Transport(t.to_string())),
    }
}

/// Append `v=<stamp>` to `url`, respecting an existing query string and fragment.
pub fn cache_busted(url: &str, stamp: i64) -> String {
    let (base, fragment) = match url.split_once('#') {
        Some((b, f)) => (b, Some(f)),
        None => (url, None),
    };
    let sep = if base.contains('?') { '&' } else { '?' };
    match fragment {
        Some(f) => format!("{base}{sep}v={stamp}#{f}"),
        None => format!("{base}{sep}v={stamp}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};
    use tempfile::TempDir;

    /// Answer one request on a local port with `status` and `body`.
    ///
    /// Returns the server's base URL and a handle yielding the request line.
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                let n = reader.read_line(&mut header).unwrap();
                if n == 0 || header == "\r\n" {
                    break;
                }
            }
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
            request_line
        });
        (base, handle)
    }

    #[test]
    fn http_404_is_status_error() {
        let (base, server) = serve_once("404 Not Found", "not here");
        let source: ManifestSource = format!("{base}/data/manifest.json").parse().unwrap();

        let result = load(&source);
        assert!(matches!(result, Err(LoadError::Status(404))), "got {result:?}");

        let request_line = server.join().unwrap();
        assert!(
            request_line.starts_with("GET /data/manifest.json?v="),
            "request line: {request_line:?}"
        );
    }

    #[test]
    fn http_200_loads_manifest() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"categories":{"icons":{"total":2,"groups":{"root":["icons/a.png","icons/b.svg"]}}}}"#,
        );
        let manifest = load(&ManifestSource::Url(format!("{base}/m.json?x=1"))).unwrap();
        assert_eq!(manifest.item_count(), 2);

        let request_line = server.join().unwrap();
        assert!(request_line.starts_with("GET /m.json?x=1&v="), "request line: {request_line:?}");
    }

    #[test]
    fn http_200_with_html_body_is_json_error() {
        let (base, server) = serve_once("200 OK", "<html>maintenance</html>");
        let result = load(&ManifestSource::Url(format!("{base}/data/manifest.json")));
        assert!(matches!(result, Err(LoadError::Json(_))), "got {result:?}");
        server.join().unwrap();
    }

    #[test]
    fn source_from_str_detects_urls() {
        assert_eq!(
            "https://example.com/data/manifest.json".parse::<ManifestSource>().unwrap(),
            ManifestSource::Url("https://example.com/data/manifest.json".into())
        );
        assert_eq!(
            "data/manifest.json".parse::<ManifestSource>().unwrap(),
            ManifestSource::file("data/manifest.json")
        );
    }

    #[test]
    fn cache_busting_query_separator() {
        assert_eq!(cache_busted("/data/manifest.json", 5), "/data/manifest.json?v=5");
        assert_eq!(cache_busted("/m.json?x=1", 5), "/m.json?x=1&v=5");
        assert_eq!(cache_busted("/m.json#top", 5), "/m.json?v=5#top");
    }

    #[test]
    fn loads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("manifest.json");
        fs::write(
            &path,
            r#"{"categories":{"icons":{"total":1,"groups":{"root":["icons/a.png"]}}}}"#,
        )
        .unwrap();

        let manifest = load(&ManifestSource::file(&path)).unwrap();
        assert_eq!(manifest.item_count(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load(&ManifestSource::file(tmp.path().join("nope.json")));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn invalid_json_is_load_error() {
        assert!(matches!(parse("<html>404</html>"), Err(LoadError::Json(_))));
    }

    #[test]
    fn wrong_shape_is_not_an_error() {
        let manifest = parse(r#"{"hello":"world"}"#).unwrap();
        assert!(manifest.categories.is_empty());
    }

    #[test]
    fn status_error_message() {
        assert_eq!(LoadError::Status(404).to_string(), "HTTP 404");
    }
}
