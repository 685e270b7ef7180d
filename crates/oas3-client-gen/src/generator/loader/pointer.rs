use std::fmt;

use percent_encoding::percent_decode_str;
use url::{ParseError, Url};

use crate::error::{GenerationError, Result};

const COMPONENT_SCHEMAS: &str = "/components/schemas/";

/// Canonical location of a JSON value: `<document>#<fragment>`.
///
/// The root document is the empty string, so local pointers render as
/// `#/components/schemas/Pet`. External documents are normalized relative
/// paths or absolute URLs. Fragments keep `~0`/`~1` escapes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pointer {
  document: String,
  fragment: String,
}

impl Pointer {
  #[must_use]
  pub fn root() -> Self {
    Self::new("", "")
  }

  pub(crate) fn new(document: impl Into<String>, fragment: impl Into<String>) -> Self {
    Self {
      document: document.into(),
      fragment: fragment.into(),
    }
  }

  /// Pointer to `#/components/schemas/<name>` in the root document.
  #[must_use]
  pub fn component(name: &str) -> Self {
    Self::root().child("components").child("schemas").child(name)
  }

  /// Normalizes a raw `$ref` found in `base_document`.
  pub fn parse_ref(raw: &str, base_document: &str) -> Result<Self> {
    let (location, fragment) = raw.split_once('#').unwrap_or((raw, ""));

    let fragment = percent_decode_str(fragment)
      .decode_utf8()
      .map_err(|_| GenerationError::unresolved(raw, None, "fragment is not valid UTF-8"))?
      .into_owned();
    if !fragment.is_empty() && !fragment.starts_with('/') {
      return Err(GenerationError::unresolved(
        raw,
        None,
        "only JSON pointer fragments are supported",
      ));
    }

    let document = if location.is_empty() {
      base_document.to_string()
    } else {
      join_document(base_document, location)?
    };

    Ok(Self::new(document, fragment))
  }

  #[must_use]
  pub fn child(&self, segment: &str) -> Self {
    let escaped = segment.replace('~', "~0").replace('/', "~1");
    Self::new(self.document.clone(), format!("{}/{escaped}", self.fragment))
  }

  #[must_use]
  pub fn document(&self) -> &str {
    &self.document
  }

  #[must_use]
  pub fn fragment(&self) -> &str {
    &self.fragment
  }

  #[must_use]
  pub fn is_external(&self) -> bool {
    !self.document.is_empty()
  }

  /// Unescaped segments of the fragment.
  pub fn segments(&self) -> impl Iterator<Item = String> + '_ {
    self
      .fragment
      .split('/')
      .skip(1)
      .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
  }

  /// The last unescaped segment, if any.
  #[must_use]
  pub fn last_segment(&self) -> Option<String> {
    self.segments().last()
  }

  /// Key under `components/schemas` when this pointer names a component
  /// schema directly, in any document.
  #[must_use]
  pub fn component_name(&self) -> Option<String> {
    let rest = self.fragment.strip_prefix(COMPONENT_SCHEMAS)?;
    (!rest.is_empty() && !rest.contains('/')).then(|| rest.replace("~1", "/").replace("~0", "~"))
  }
}

impl fmt::Display for Pointer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}#{}", self.document, self.fragment)
  }
}

/// Resolves `relative` against `base`. URLs follow RFC 3986 via [`Url::join`];
/// file documents stay relative paths with `.` and `..` folded away.
fn join_document(base: &str, relative: &str) -> Result<String> {
  let invalid =
    |err: ParseError| GenerationError::unresolved(relative, None, format!("invalid document location: {err}"));

  match Url::parse(relative) {
    Ok(url) => return Ok(url.into()),
    Err(ParseError::RelativeUrlWithoutBase) => {}
    Err(err) => return Err(invalid(err)),
  }

  if let Ok(base) = Url::parse(base) {
    return base.join(relative).map(Into::into).map_err(invalid);
  }

  if relative.starts_with('/') {
    return Ok(normalize_path(relative));
  }
  Ok(normalize_path(&format!("{}{relative}", directory_of(base))))
}

fn directory_of(path: &str) -> &str {
  path.rfind('/').map_or("", |i| &path[..=i])
}

fn normalize_path(path: &str) -> String {
  let absolute = path.starts_with('/');
  let mut stack: Vec<&str> = vec![];

  for segment in path.split('/') {
    match segment {
      "" | "." => {}
      ".." => {
        if stack.last().is_some_and(|last| *last != "..") {
          stack.pop();
        } else if !absolute {
          stack.push("..");
        }
      }
      other => stack.push(other),
    }
  }

  let joined = stack.join("/");
  if absolute { format!("/{joined}") } else { joined }
}
