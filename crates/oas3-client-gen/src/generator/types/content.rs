use mediatype::MediaType;

use crate::generator::loader::MediaSource;

/// How a body is put on the wire and read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub enum ContentCategory {
  #[default]
  Json,
  FormUrlEncoded,
  Text,
  Binary,
}

impl ContentCategory {
  #[must_use]
  pub fn from_content_type(content_type: &str) -> Self {
    let Some(media) = MediaType::parse(content_type).ok() else {
      return Self::Binary;
    };

    let suffix = media.suffix.as_ref().map(mediatype::Name::as_str);

    match (media.ty.as_str(), media.subty.as_str(), suffix) {
      ("application", "json", _) | (_, _, Some("json")) => Self::Json,
      ("application", "x-www-form-urlencoded", _) => Self::FormUrlEncoded,
      ("text", _, _) => Self::Text,
      ("application", "xml" | "yaml" | "x-yaml" | "javascript", _) => Self::Text,
      _ => Self::Binary,
    }
  }

  #[must_use]
  pub const fn is_json(self) -> bool {
    matches!(self, Self::Json)
  }
}

/// Prefers the first JSON media type, falling back to the first declared one.
pub(crate) fn select_media(contents: &[MediaSource]) -> Option<&MediaSource> {
  contents
    .iter()
    .find(|media| ContentCategory::from_content_type(&media.content_type).is_json())
    .or_else(|| contents.first())
}
