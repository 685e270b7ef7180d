use std::fmt;

use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Body of a non-2xx response, decoded as JSON when it is JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
  Json(Value),
  Text(String),
  Empty,
}

impl ErrorBody {
  #[must_use]
  pub fn from_bytes(bytes: &[u8]) -> Self {
    if bytes.iter().all(u8::is_ascii_whitespace) {
      return Self::Empty;
    }
    match serde_json::from_slice(bytes) {
      Ok(value) => Self::Json(value),
      Err(_) => Self::Text(String::from_utf8_lossy(bytes).into_owned()),
    }
  }
}

impl fmt::Display for ErrorBody {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Json(value) => write!(f, "{value}"),
      Self::Text(text) => f.write_str(text),
      Self::Empty => f.write_str("<empty body>"),
    }
  }
}

/// The server answered, but not with a success status.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("server responded with {status}: {body}")]
pub struct ApiError {
  pub status: StatusCode,
  pub body: ErrorBody,
}

/// The request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
  #[error("connection failed: {0}")]
  Connect(String),
  #[error("request timed out: {0}")]
  Timeout(String),
  #[error("request failed: {0}")]
  Other(String),
}

impl TransportError {
  #[must_use]
  pub const fn is_retryable(&self) -> bool {
    matches!(self, Self::Connect(_) | Self::Timeout(_))
  }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for TransportError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_timeout() {
      Self::Timeout(err.to_string())
    } else if err.is_connect() {
      Self::Connect(err.to_string())
    } else {
      Self::Other(err.to_string())
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
  #[error(transparent)]
  Api(#[from] ApiError),
  #[error(transparent)]
  Transport(#[from] TransportError),
  #[error("failed to decode response at '{path}': {source}")]
  Decode {
    path: String,
    #[source]
    source: serde_json::Error,
  },
  #[error("failed to encode request: {0}")]
  Encode(#[from] serde_json::Error),
  #[error("invalid request: {0}")]
  InvalidRequest(String),
}

impl ClientError {
  #[must_use]
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      Self::Api(err) => Some(err.status),
      _ => None,
    }
  }

  #[must_use]
  pub fn is_retryable(&self) -> bool {
    match self {
      Self::Transport(err) => err.is_retryable(),
      Self::Api(err) => err.status.is_server_error() || err.status == StatusCode::TOO_MANY_REQUESTS,
      _ => false,
    }
  }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for ClientError {
  fn from(err: reqwest::Error) -> Self {
    Self::Transport(err.into())
  }
}

/// Decodes a JSON payload, reporting the path of the first offending value.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ClientError> {
  let deserializer = &mut serde_json::Deserializer::from_slice(bytes);
  serde_path_to_error::deserialize(deserializer).map_err(|err| ClientError::Decode {
    path: err.path().to_string(),
    source: err.into_inner(),
  })
}
