use strum::Display;

/// Broad classification of a [`GenerationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
  #[strum(to_string = "spec parse error")]
  SpecParse,
  #[strum(to_string = "unresolved reference")]
  UnresolvedReference,
  #[strum(to_string = "schema composition error")]
  SchemaComposition,
  #[strum(to_string = "unsupported schema")]
  UnsupportedSchema,
  #[strum(to_string = "code emission error")]
  CodeEmission,
}

/// Every failure the generator can report. All of them are fatal for the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
  #[error("invalid OpenAPI document{}: {message}", located(location.as_deref()))]
  SpecParse { message: String, location: Option<String> },

  #[error("unresolved reference '{reference}'{}: {message}", located(referrer.as_deref()))]
  UnresolvedReference {
    reference: String,
    referrer: Option<String>,
    message: String,
    retryable: bool,
  },

  #[error("cannot compose schema '{schema}'{}: {message}", field.as_deref().map(|f| format!(" (field '{f}')")).unwrap_or_default())]
  SchemaComposition {
    schema: String,
    field: Option<String>,
    message: String,
  },

  #[error("unsupported schema at '{schema}': {message}")]
  UnsupportedSchema { schema: String, message: String },

  #[error("failed to emit '{artifact}': {message}")]
  CodeEmission { artifact: String, message: String },
}

fn located(path: Option<&str>) -> String {
  path.map(|p| format!(" at '{p}'")).unwrap_or_default()
}

impl GenerationError {
  pub(crate) fn spec_parse(message: impl Into<String>, location: impl Into<String>) -> Self {
    Self::SpecParse {
      message: message.into(),
      location: Some(location.into()),
    }
  }

  pub(crate) fn unresolved(reference: impl Into<String>, referrer: Option<String>, message: impl Into<String>) -> Self {
    Self::UnresolvedReference {
      reference: reference.into(),
      referrer,
      message: message.into(),
      retryable: false,
    }
  }

  pub(crate) fn composition(schema: impl Into<String>, field: Option<&str>, message: impl Into<String>) -> Self {
    Self::SchemaComposition {
      schema: schema.into(),
      field: field.map(str::to_string),
      message: message.into(),
    }
  }

  pub(crate) fn unsupported(schema: impl Into<String>, message: impl Into<String>) -> Self {
    Self::UnsupportedSchema {
      schema: schema.into(),
      message: message.into(),
    }
  }

  pub(crate) fn emission(artifact: impl Into<String>, message: impl Into<String>) -> Self {
    Self::CodeEmission {
      artifact: artifact.into(),
      message: message.into(),
    }
  }

  #[must_use]
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::SpecParse { .. } => ErrorKind::SpecParse,
      Self::UnresolvedReference { .. } => ErrorKind::UnresolvedReference,
      Self::SchemaComposition { .. } => ErrorKind::SchemaComposition,
      Self::UnsupportedSchema { .. } => ErrorKind::UnsupportedSchema,
      Self::CodeEmission { .. } => ErrorKind::CodeEmission,
    }
  }

  /// Schema or document path the error originated from, when known.
  #[must_use]
  pub fn path(&self) -> Option<&str> {
    match self {
      Self::SpecParse { location, .. } => location.as_deref(),
      Self::UnresolvedReference { referrer, reference, .. } => referrer.as_deref().or(Some(reference.as_str())),
      Self::SchemaComposition { schema, .. } | Self::UnsupportedSchema { schema, .. } => Some(schema),
      Self::CodeEmission { .. } => None,
    }
  }

  /// Only failed network fetches of external documents are worth retrying.
  #[must_use]
  pub fn is_retryable(&self) -> bool {
    matches!(self, Self::UnresolvedReference { retryable: true, .. })
  }
}

pub type Result<T, E = GenerationError> = std::result::Result<T, E>;
