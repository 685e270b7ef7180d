//! Runtime pieces shared by every client emitted by `oas3-client-gen`.
//!
//! Generated code leans on this crate for parameter encoding, credential
//! placement, discriminated unions and the HTTP round trip, so the emitted
//! modules stay small and only describe the API surface.

pub mod auth;
#[cfg(feature = "reqwest")]
pub mod client;
pub mod error;
pub mod params;

pub use auth::{AuthScheme, Credential, Placement};
#[cfg(feature = "reqwest")]
pub use client::ClientCore;
pub use error::{ApiError, ClientError, ErrorBody, TransportError};
pub use http::Method;
pub use params::{Delimiter, PairRule, RequestParts, SegmentRule};
pub use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

#[doc(hidden)]
pub use serde as __serde;
#[doc(hidden)]
pub use serde_json as __serde_json;

/// Declares a union that picks its variant by reading a discriminator property
/// before decoding the payload.
///
/// A payload whose discriminator is missing or carries a value that is not
/// listed is rejected instead of being coerced into some variant. Serializing
/// writes the variant's discriminator value when the payload does not carry
/// the property itself.
#[macro_export]
macro_rules! discriminated_enum {
  (
    $(#[$meta:meta])*
    $vis:vis enum $name:ident {
      discriminator: $disc_field:literal,
      variants: [
        $(($disc_value:literal, $variant:ident($variant_type:ty))),* $(,)?
      ] $(,)?
    }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, PartialEq)]
    $vis enum $name {
      $($variant($variant_type),)*
    }

    impl $name {
      $vis const DISCRIMINATOR_FIELD: &'static str = $disc_field;

      /// Discriminator value carried by this variant.
      $vis fn discriminator_value(&self) -> &'static str {
        match self {
          $(Self::$variant(_) => $disc_value,)*
        }
      }
    }

    impl $crate::__serde::Serialize for $name {
      fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
      where
        S: $crate::__serde::Serializer,
      {
        let mut value = match self {
          $(Self::$variant(v) => $crate::__serde_json::to_value(v),)*
        }
        .map_err(<S::Error as $crate::__serde::ser::Error>::custom)?;

        if let Some(object) = value.as_object_mut() {
          object
            .entry(Self::DISCRIMINATOR_FIELD)
            .or_insert_with(|| $crate::__serde_json::Value::from(self.discriminator_value()));
        }
        $crate::__serde::Serialize::serialize(&value, serializer)
      }
    }

    impl<'de> $crate::__serde::Deserialize<'de> for $name {
      fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
      where
        D: $crate::__serde::Deserializer<'de>,
      {
        let value = <$crate::__serde_json::Value as $crate::__serde::Deserialize>::deserialize(deserializer)?;

        match value.get(Self::DISCRIMINATOR_FIELD).and_then(|v| v.as_str()) {
          $(
            Some($disc_value) =>
              $crate::__serde_json::from_value(value)
                .map(Self::$variant)
                .map_err(<D::Error as $crate::__serde::de::Error>::custom),
          )*
          None => Err(<D::Error as $crate::__serde::de::Error>::missing_field(Self::DISCRIMINATOR_FIELD)),
          Some(other) => Err(<D::Error as $crate::__serde::de::Error>::custom(format!(
            "unknown discriminator value '{}' for field '{}'",
            other, Self::DISCRIMINATOR_FIELD
          ))),
        }
      }
    }
  };
}

pub const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

#[inline]
#[must_use]
pub fn percent_encode_path_segment(segment: &str) -> String {
  utf8_percent_encode(segment, PATH_ENCODE_SET).to_string()
}

pub const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Query keys keep `[` and `]` readable so `deepObject` keys stay recognisable.
pub const QUERY_KEY_ENCODE_SET: &AsciiSet = &QUERY_ENCODE_SET.remove(b'[').remove(b']');

#[inline]
#[must_use]
pub fn percent_encode_query_component(component: &str) -> String {
  utf8_percent_encode(component, QUERY_ENCODE_SET).to_string()
}

/// Encodes a query key, keeping `[` and `]` for `deepObject` keys.
#[inline]
#[must_use]
pub fn encode_query_key(key: &str) -> String {
  utf8_percent_encode(key, QUERY_KEY_ENCODE_SET).to_string()
}

/// Joins ordered, already encoded key/value pairs into a query string without
/// the leading `?`.
#[must_use]
pub fn encode_query(pairs: &[(String, String)]) -> String {
  pairs
    .iter()
    .map(|(key, value)| format!("{key}={value}"))
    .collect::<Vec<_>>()
    .join("&")
}

/// Joins already encoded cookie pairs into a single `Cookie` header value.
#[must_use]
pub fn encode_cookies(pairs: &[(String, String)]) -> String {
  pairs
    .iter()
    .map(|(key, value)| format!("{key}={value}"))
    .collect::<Vec<_>>()
    .join("; ")
}
