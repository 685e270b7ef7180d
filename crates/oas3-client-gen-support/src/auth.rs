use std::fmt;

/// A secret supplied when the client is constructed.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
  Bearer(String),
  Basic { username: String, password: Option<String> },
  ApiKey(String),
}

impl Credential {
  #[must_use]
  pub fn bearer(token: impl Into<String>) -> Self {
    Self::Bearer(token.into())
  }

  #[must_use]
  pub fn basic(username: impl Into<String>, password: Option<String>) -> Self {
    Self::Basic {
      username: username.into(),
      password,
    }
  }

  #[must_use]
  pub fn api_key(key: impl Into<String>) -> Self {
    Self::ApiKey(key.into())
  }

  /// First scheme in `schemes` this credential can satisfy, and where it goes.
  #[must_use]
  pub fn placement(&self, schemes: &[AuthScheme]) -> Option<Placement<'_>> {
    schemes.iter().find_map(|scheme| match (self, *scheme) {
      (Self::Bearer(token), AuthScheme::Bearer) => Some(Placement::Bearer(token)),
      (Self::Basic { username, password }, AuthScheme::Basic) => Some(Placement::Basic {
        username,
        password: password.as_deref(),
      }),
      (Self::ApiKey(key), AuthScheme::ApiKeyHeader(name)) => Some(Placement::Header { name, value: key }),
      (Self::ApiKey(key), AuthScheme::ApiKeyQuery(name)) => Some(Placement::Query { name, value: key }),
      (Self::ApiKey(key), AuthScheme::ApiKeyCookie(name)) => Some(Placement::Cookie { name, value: key }),
      _ => None,
    })
  }
}

impl fmt::Debug for Credential {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Bearer(_) => f.write_str("Credential::Bearer(<redacted>)"),
      Self::Basic { username, .. } => write!(f, "Credential::Basic {{ username: {username:?}, password: <redacted> }}"),
      Self::ApiKey(_) => f.write_str("Credential::ApiKey(<redacted>)"),
    }
  }
}

/// A security scheme declared by the API, as emitted into generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthScheme {
  Bearer,
  Basic,
  ApiKeyHeader(&'static str),
  ApiKeyQuery(&'static str),
  ApiKeyCookie(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement<'a> {
  Bearer(&'a str),
  Basic { username: &'a str, password: Option<&'a str> },
  Header { name: &'static str, value: &'a str },
  Query { name: &'static str, value: &'a str },
  Cookie { name: &'static str, value: &'a str },
}
