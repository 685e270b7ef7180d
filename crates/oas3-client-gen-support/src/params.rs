use serde::Serialize;
use serde_json::Value;

use crate::{ClientError, encode_query_key, percent_encode_path_segment, percent_encode_query_component};

/// Separator used when several values share one parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
  Comma,
  Space,
  Pipe,
}

impl Delimiter {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Comma => ",",
      Self::Space => " ",
      Self::Pipe => "|",
    }
  }

  /// The separator as it appears inside an encoded query value.
  #[must_use]
  pub const fn encoded(self) -> &'static str {
    match self {
      Self::Comma => ",",
      Self::Space => "%20",
      Self::Pipe => "|",
    }
  }
}

/// How a query or cookie value becomes ordered `(key, value)` pairs.
///
/// Pairs come out percent-encoded. Every item, object key and object value is
/// encoded on its own before delimiters are placed, so a delimiter inside a
/// value never reads as a separator. `null` values and empty arrays produce no
/// pairs at all, so optional parameters can be passed straight through as
/// `Option<T>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairRule {
  /// `key=value`
  Single,
  /// `key=a&key=b`
  RepeatKey,
  /// `key=a<d>b`
  Join(Delimiter),
  /// `k1=v1&k2=v2`, keyed by the object's own properties
  ObjectEntries,
  /// `key=k1<d>v1<d>k2<d>v2`
  ObjectJoin(Delimiter),
  /// `key[k1]=v1&key[k2][nested]=v2`
  DeepObject,
}

impl PairRule {
  #[must_use]
  pub fn pairs(self, name: &str, value: &Value) -> Vec<(String, String)> {
    let mut out = vec![];
    self.push_pairs(name, value, &mut out);
    out
  }

  fn push_pairs(self, name: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match (self, value) {
      (_, Value::Null) => {}
      (_, Value::Array(items)) if items.is_empty() => {}
      (Self::RepeatKey, Value::Array(items)) => {
        for item in items.iter().filter(|item| !item.is_null()) {
          push(out, name, encode_item(item));
        }
      }
      (Self::Single, Value::Array(items)) => push(out, name, join_items(items, Delimiter::Comma)),
      (Self::Join(delimiter), Value::Array(items)) => push(out, name, join_items(items, delimiter)),
      (Self::ObjectEntries, Value::Object(entries)) => {
        for (key, entry) in entries {
          Self::Single.push_pairs(key, entry, out);
        }
      }
      (Self::ObjectJoin(delimiter), Value::Object(entries)) => {
        let joined = entries
          .iter()
          .filter(|(_, entry)| !entry.is_null())
          .flat_map(|(key, entry)| [percent_encode_query_component(key), encode_item(entry)])
          .collect::<Vec<_>>()
          .join(delimiter.encoded());
        push(out, name, joined);
      }
      (Self::DeepObject, Value::Object(entries)) => {
        for (key, entry) in entries {
          let nested = format!("{name}[{key}]");
          match entry {
            Value::Object(_) => Self::DeepObject.push_pairs(&nested, entry, out),
            _ => Self::RepeatKey.push_pairs(&nested, entry, out),
          }
        }
      }
      (_, other) => push(out, name, encode_item(other)),
    }
  }
}

fn push(out: &mut Vec<(String, String)>, name: &str, encoded_value: String) {
  out.push((encode_query_key(name), encoded_value));
}

/// RFC 6570 expansion used for path segments and header values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentRule {
  Simple { explode: bool },
  Label { explode: bool },
  Matrix { explode: bool },
}

impl SegmentRule {
  /// Expands `value` for a path, percent-encoding every name and value.
  #[must_use]
  pub fn render_path(self, name: &str, value: &Value) -> String {
    self.render(name, value, &percent_encode_path_segment)
  }

  /// Expands `value` for a header, leaving values untouched.
  #[must_use]
  pub fn render_header(self, name: &str, value: &Value) -> String {
    self.render(name, value, &|raw: &str| raw.to_string())
  }

  fn render(self, name: &str, value: &Value, encode: &dyn Fn(&str) -> String) -> String {
    let (prefix, explode) = match self {
      Self::Simple { explode } => ("", explode),
      Self::Label { explode } => (".", explode),
      Self::Matrix { explode } => (";", explode),
    };
    let named = matches!(self, Self::Matrix { .. });
    let name = encode(name);

    match value {
      Value::Null => {
        if named {
          format!("{prefix}{name}")
        } else {
          prefix.to_string()
        }
      }
      Value::Array(items) => {
        let values = items
          .iter()
          .filter(|item| !item.is_null())
          .map(|item| encode(&scalar_text(item)))
          .collect::<Vec<_>>();
        match (named, explode) {
          (true, true) => values.iter().map(|v| format!(";{name}={v}")).collect(),
          (true, false) => format!(";{name}={}", values.join(",")),
          (false, true) => format!("{prefix}{}", values.join(if prefix.is_empty() { "," } else { prefix })),
          (false, false) => format!("{prefix}{}", values.join(",")),
        }
      }
      Value::Object(entries) => {
        let entries = entries
          .iter()
          .filter(|(_, entry)| !entry.is_null())
          .map(|(key, entry)| (encode(key), encode(&scalar_text(entry))))
          .collect::<Vec<_>>();
        if explode {
          let separator = if prefix.is_empty() { "," } else { prefix };
          let joined = entries
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(separator);
          format!("{prefix}{joined}")
        } else {
          let joined = entries
            .iter()
            .flat_map(|(k, v)| [k.as_str(), v.as_str()])
            .collect::<Vec<_>>()
            .join(",");
          if named {
            format!(";{name}={joined}")
          } else {
            format!("{prefix}{joined}")
          }
        }
      }
      scalar => {
        let text = encode(&scalar_text(scalar));
        if named {
          format!(";{name}={text}")
        } else {
          format!("{prefix}{text}")
        }
      }
    }
  }
}

fn scalar_text(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    Value::Null => String::new(),
    other => other.to_string(),
  }
}

fn encode_item(value: &Value) -> String {
  percent_encode_query_component(&scalar_text(value))
}

fn join_items(items: &[Value], delimiter: Delimiter) -> String {
  items
    .iter()
    .filter(|item| !item.is_null())
    .map(encode_item)
    .collect::<Vec<_>>()
    .join(delimiter.encoded())
}

/// Query, header and cookie values collected for one request, in call order.
/// Query and cookie pairs are stored percent-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParts {
  pub query: Vec<(String, String)>,
  pub headers: Vec<(String, String)>,
  pub cookies: Vec<(String, String)>,
}

impl RequestParts {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  pub fn query<T: Serialize + ?Sized>(&mut self, name: &str, rule: PairRule, value: &T) -> Result<&mut Self, ClientError> {
    let value = serde_json::to_value(value)?;
    self.query.extend(rule.pairs(name, &value));
    Ok(self)
  }

  pub fn header<T: Serialize + ?Sized>(
    &mut self,
    name: &str,
    rule: SegmentRule,
    value: &T,
  ) -> Result<&mut Self, ClientError> {
    let value = serde_json::to_value(value)?;
    if !value.is_null() {
      self.headers.push((name.to_string(), rule.render_header(name, &value)));
    }
    Ok(self)
  }

  pub fn cookie<T: Serialize + ?Sized>(&mut self, name: &str, rule: PairRule, value: &T) -> Result<&mut Self, ClientError> {
    let value = serde_json::to_value(value)?;
    self.cookies.extend(rule.pairs(name, &value));
    Ok(self)
  }
}

/// Expands a single path template variable.
pub fn path_segment<T: Serialize + ?Sized>(name: &str, rule: SegmentRule, value: &T) -> Result<String, ClientError> {
  let value = serde_json::to_value(value)?;
  Ok(rule.render_path(name, &value))
}
