use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use fmmap::{MmapFile, MmapFileExt};
use url::Url;

/// Why an external document could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
  /// DNS, connection, timeout or server-side failures.
  #[error("{0}")]
  Retryable(String),
  #[error("{0}")]
  Fatal(String),
}

impl FetchError {
  #[must_use]
  pub fn is_retryable(&self) -> bool {
    matches!(self, Self::Retryable(_))
  }
}

/// Source of documents referenced through external `$ref`s.
pub trait ExternalFetcher: Send + Sync {
  fn fetch(&self, document: &str) -> Result<Vec<u8>, FetchError>;
}

/// Reads documents relative to the directory of the root document.
#[derive(Debug, Clone)]
pub struct FileFetcher {
  base_dir: PathBuf,
}

impl FileFetcher {
  #[must_use]
  pub fn new(base_dir: impl Into<PathBuf>) -> Self {
    Self {
      base_dir: base_dir.into(),
    }
  }
}

impl ExternalFetcher for FileFetcher {
  fn fetch(&self, document: &str) -> Result<Vec<u8>, FetchError> {
    let path = self.base_dir.join(Path::new(document));
    let file = MmapFile::open(&path).map_err(|err| FetchError::Fatal(format!("cannot read {}: {err}", path.display())))?;
    Ok(file.as_slice().to_vec())
  }
}

/// Fetches `http(s)` documents with a bounded timeout.
///
/// The blocking client is built per fetch, so this fetcher must not be used
/// from inside an async runtime worker.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
  timeout: Duration,
}

impl HttpFetcher {
  #[must_use]
  pub fn new(timeout: Duration) -> Self {
    Self { timeout }
  }
}

fn classify_request_error(err: &reqwest::Error) -> FetchError {
  if err.is_timeout() || err.is_connect() {
    FetchError::Retryable(err.to_string())
  } else {
    FetchError::Fatal(err.to_string())
  }
}

impl ExternalFetcher for HttpFetcher {
  fn fetch(&self, document: &str) -> Result<Vec<u8>, FetchError> {
    let client = reqwest::blocking::Client::builder()
      .timeout(self.timeout)
      .build()
      .map_err(|err| FetchError::Fatal(err.to_string()))?;

    let response = client.get(document).send().map_err(|err| classify_request_error(&err))?;
    let status = response.status();
    if status.is_server_error() {
      return Err(FetchError::Retryable(format!("{document} answered {status}")));
    }
    if !status.is_success() {
      return Err(FetchError::Fatal(format!("{document} answered {status}")));
    }

    response
      .bytes()
      .map(|bytes| bytes.to_vec())
      .map_err(|err| classify_request_error(&err))
  }
}

/// Routes URLs to [`HttpFetcher`] (when remote fetching is allowed) and
/// everything else to [`FileFetcher`].
#[derive(Debug, Clone)]
pub struct DefaultFetcher {
  files: FileFetcher,
  http: Option<HttpFetcher>,
}

impl DefaultFetcher {
  #[must_use]
  pub fn new(base_dir: impl Into<PathBuf>, remote_timeout: Option<Duration>) -> Self {
    Self {
      files: FileFetcher::new(base_dir),
      http: remote_timeout.map(HttpFetcher::new),
    }
  }
}

impl ExternalFetcher for DefaultFetcher {
  fn fetch(&self, document: &str) -> Result<Vec<u8>, FetchError> {
    let Ok(url) = Url::parse(document) else {
      return self.files.fetch(document);
    };
    match (url.scheme(), &self.http) {
      ("http" | "https", Some(http)) => http.fetch(url.as_str()),
      ("http" | "https", None) => Err(FetchError::Fatal(format!(
        "remote reference to {document} requires remote fetching to be enabled"
      ))),
      (scheme, _) => Err(FetchError::Fatal(format!("unsupported scheme '{scheme}' in {document}"))),
    }
  }
}
