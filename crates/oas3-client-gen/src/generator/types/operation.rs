use std::fmt;

use http::Method;
use strum::Display;

use super::{content::ContentCategory, model::TypeRef};
use crate::generator::loader::{
  document::{ParameterLocation, ParameterStyle, SecurityRequirement},
  pointer::Pointer,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
  Literal(String),
  Param(String),
}

/// A path such as `/pets/{petId}/toys` split into literal and templated parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
  raw: String,
  segments: Vec<PathSegment>,
}

impl PathTemplate {
  #[must_use]
  pub fn parse(raw: &str) -> Self {
    let mut segments = vec![];
    let mut rest = raw;

    while let Some(open) = rest.find('{') {
      let Some(close) = rest[open..].find('}').map(|i| open + i) else {
        break;
      };
      if open > 0 {
        segments.push(PathSegment::Literal(rest[..open].to_string()));
      }
      segments.push(PathSegment::Param(rest[open + 1..close].to_string()));
      rest = &rest[close + 1..];
    }
    if !rest.is_empty() {
      segments.push(PathSegment::Literal(rest.to_string()));
    }

    Self {
      raw: raw.to_string(),
      segments,
    }
  }

  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.raw
  }

  #[must_use]
  pub fn segments(&self) -> &[PathSegment] {
    &self.segments
  }

  /// Template parameter names in order of appearance.
  pub fn parameters(&self) -> impl Iterator<Item = &str> {
    self.segments.iter().filter_map(|segment| match segment {
      PathSegment::Param(name) => Some(name.as_str()),
      PathSegment::Literal(_) => None,
    })
  }
}

impl fmt::Display for PathTemplate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.raw)
  }
}

/// Shape of a parameter value, which decides how styles expand it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ValueShape {
  Scalar,
  Array,
  Object,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
  pub name: String,
  pub location: ParameterLocation,
  pub style: ParameterStyle,
  pub explode: bool,
  pub required: bool,
  pub ty: TypeRef,
  pub shape: ValueShape,
  pub docs: Option<String>,
  pub deprecated: bool,
}

impl Parameter {
  /// Default style per location.
  #[must_use]
  pub fn default_style(location: ParameterLocation) -> ParameterStyle {
    match location {
      ParameterLocation::Query | ParameterLocation::Cookie => ParameterStyle::Form,
      ParameterLocation::Path | ParameterLocation::Header => ParameterStyle::Simple,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody {
  pub ty: TypeRef,
  pub content_type: String,
  pub category: ContentCategory,
  pub required: bool,
  pub docs: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusKey {
  Code(u16),
  /// `2XX` style ranges, holding the leading digit.
  Class(u8),
  Default,
}

impl StatusKey {
  #[must_use]
  pub fn parse(raw: &str) -> Option<Self> {
    if raw.eq_ignore_ascii_case("default") {
      return Some(Self::Default);
    }
    let bytes = raw.as_bytes();
    match bytes {
      [first @ b'1'..=b'5', b'X' | b'x', b'X' | b'x'] => Some(Self::Class(first - b'0')),
      [b'1'..=b'5', b'0'..=b'9', b'0'..=b'9'] => raw.parse().ok().map(Self::Code),
      _ => None,
    }
  }

  #[must_use]
  pub fn is_success(self) -> bool {
    match self {
      Self::Code(code) => (200..300).contains(&code),
      Self::Class(class) => class == 2,
      Self::Default => false,
    }
  }
}

impl fmt::Display for StatusKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Code(code) => write!(f, "{code}"),
      Self::Class(class) => write!(f, "{class}XX"),
      Self::Default => f.write_str("default"),
    }
  }
}

/// Decoded body of one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBody {
  pub ty: TypeRef,
  pub content_type: String,
  pub category: ContentCategory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
  pub status: StatusKey,
  pub docs: Option<String>,
  pub body: Option<ResponseBody>,
}

/// What a successful call returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuccessType {
  Empty,
  Json(TypeRef),
  Text,
  Bytes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
  pub id: String,
  pub source: Pointer,
  pub method: Method,
  pub path: PathTemplate,
  pub summary: Option<String>,
  pub docs: Option<String>,
  pub deprecated: bool,
  pub parameters: Vec<Parameter>,
  pub request_body: Option<RequestBody>,
  pub responses: Vec<Response>,
  pub success: SuccessType,
  /// Effective requirements: the operation's own, or the document's.
  pub security: Vec<SecurityRequirement>,
}
