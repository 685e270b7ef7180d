use http::header::{ACCEPT, CONTENT_TYPE, COOKIE};
use reqwest::RequestBuilder;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
  ApiError, AuthScheme, ClientError, Credential, ErrorBody, Method, PairRule, Placement, RequestParts, TransportError,
  encode_cookies, encode_query, encode_query_key, error::decode_json, percent_encode_query_component,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Shared state behind every generated client: the base URL, the pooled
/// `reqwest` client and the optional credential.
///
/// Pooled connections are released when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct ClientCore {
  base_url: String,
  http: reqwest::Client,
  credential: Option<Credential>,
}

impl ClientCore {
  pub fn new(base_url: &str, credential: Option<Credential>) -> Result<Self, ClientError> {
    let http = reqwest::Client::builder()
      .build()
      .map_err(|err| ClientError::Transport(TransportError::from(err)))?;
    Ok(Self::with_http_client(base_url, http, credential))
  }

  #[must_use]
  pub fn with_http_client(base_url: &str, http: reqwest::Client, credential: Option<Credential>) -> Self {
    Self {
      base_url: base_url.trim_end_matches('/').to_string(),
      http,
      credential,
    }
  }

  #[must_use]
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Builds a request for `path` (already expanded) carrying the collected
  /// parameters and, when one of `schemes` fits, the credential.
  pub fn prepare(&self, method: Method, path: &str, mut parts: RequestParts, schemes: &[AuthScheme]) -> RequestBuilder {
    let placement = self.credential.as_ref().and_then(|credential| credential.placement(schemes));

    match placement {
      Some(Placement::Query { name, value }) => {
        parts.query.push((encode_query_key(name), percent_encode_query_component(value)));
      }
      Some(Placement::Cookie { name, value }) => {
        parts.cookies.push((encode_query_key(name), percent_encode_query_component(value)));
      }
      _ => {}
    }

    let mut url = format!("{}{path}", self.base_url);
    if !parts.query.is_empty() {
      url.push('?');
      url.push_str(&encode_query(&parts.query));
    }

    let mut builder = self.http.request(method, url);
    for (name, value) in &parts.headers {
      builder = builder.header(name.as_str(), value.as_str());
    }
    if !parts.cookies.is_empty() {
      builder = builder.header(COOKIE, encode_cookies(&parts.cookies));
    }

    match placement {
      Some(Placement::Bearer(token)) => builder.bearer_auth(token),
      Some(Placement::Basic { username, password }) => builder.basic_auth(username, password),
      Some(Placement::Header { name, value }) => builder.header(name, value),
      _ => builder,
    }
  }

  pub fn json_body<T: Serialize + ?Sized>(
    builder: RequestBuilder,
    body: &T,
    content_type: &str,
  ) -> Result<RequestBuilder, ClientError> {
    let bytes = serde_json::to_vec(body)?;
    Ok(builder.header(CONTENT_TYPE, content_type).body(bytes))
  }

  pub fn form_body<T: Serialize + ?Sized>(builder: RequestBuilder, body: &T) -> Result<RequestBuilder, ClientError> {
    let value = serde_json::to_value(body)?;
    if !value.is_object() {
      return Err(ClientError::InvalidRequest(
        "form bodies must serialize to an object".to_string(),
      ));
    }
    let encoded = encode_query(&PairRule::ObjectEntries.pairs("", &value));
    Ok(builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE).body(encoded))
  }

  #[must_use]
  pub fn raw_body(builder: RequestBuilder, body: impl Into<reqwest::Body>, content_type: &str) -> RequestBuilder {
    builder.header(CONTENT_TYPE, content_type).body(body)
  }

  pub async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
    let bytes = Self::execute(builder.header(ACCEPT, "application/json")).await?;
    decode_json(&bytes)
  }

  pub async fn send_text(builder: RequestBuilder) -> Result<String, ClientError> {
    let bytes = Self::execute(builder).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
  }

  pub async fn send_bytes(builder: RequestBuilder) -> Result<Vec<u8>, ClientError> {
    Self::execute(builder).await
  }

  pub async fn send_empty(builder: RequestBuilder) -> Result<(), ClientError> {
    Self::execute(builder).await.map(|_| ())
  }

  async fn execute(builder: RequestBuilder) -> Result<Vec<u8>, ClientError> {
    let response = builder.send().await?;
    let status = response.status();
    let bytes = response.bytes().await?.to_vec();
    if status.is_success() {
      Ok(bytes)
    } else {
      Err(
        ApiError {
          status,
          body: ErrorBody::from_bytes(&bytes),
        }
        .into(),
      )
    }
  }
}
