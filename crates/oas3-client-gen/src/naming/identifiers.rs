use std::{
  collections::{BTreeSet, HashSet},
  sync::LazyLock,
};

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

pub(crate) static FORBIDDEN_IDENTIFIERS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "async", "await", "dyn", "try", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "gen", "self", "Self",
  ]
  .into_iter()
  .collect()
});

// Names the generated modules refer to unqualified.
static RESERVED_TYPE_NAMES: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "Box", "Client", "Clone", "Copy", "Debug", "Default", "Display", "Err", "None", "Ok", "Option", "PartialEq",
    "Result", "Self", "Send", "Some", "String", "Sync", "Type", "Vec",
  ]
  .into_iter()
  .collect()
});

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

/// Transliterates to ASCII, replaces runs of invalid characters with `_` and
/// trims the result.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

/// Splits a PascalCase word on case boundaries, keeping acronyms together
/// (`"XMLParser"` -> `["XML", "Parser"]`).
pub(crate) fn split_pascal_case(name: &str) -> Vec<String> {
  let chars: Vec<char> = name.chars().collect();
  let mut words = vec![];
  let mut current = String::new();

  for (i, &ch) in chars.iter().enumerate() {
    if ch.is_uppercase() && !current.is_empty() {
      let prev_is_lower = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
      let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
      if prev_is_lower || next_is_lower {
        words.push(std::mem::take(&mut current));
      }
    }
    current.push(ch);
  }

  if !current.is_empty() {
    words.push(current);
  }
  words
}

fn capitalize(word: &str) -> String {
  let mut chars = word.chars();
  chars.next().map_or_else(String::new, |first| {
    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
  })
}

/// Appends a numeric suffix, starting at `2`, until the name is unused.
pub(crate) fn ensure_unique(base_name: &str, used_names: &BTreeSet<String>) -> String {
  if !used_names.contains(base_name) {
    return base_name.to_string();
  }
  (2..)
    .map(|i| format!("{base_name}{i}"))
    .find(|candidate| !used_names.contains(candidate))
    .unwrap_or_else(|| base_name.to_string())
}

/// Converts a string into a valid Rust field or method name (`snake_case`).
///
/// Keywords become raw identifiers, `self` becomes `self_`, a leading `-`
/// becomes `negative_`, and a leading digit is prefixed with `_`.
pub(crate) fn to_field_name(name: &str) -> String {
  let (negative, rest) = name.strip_prefix('-').map_or((false, name), |stripped| (true, stripped));

  let mut ident = sanitize(rest).to_snake_case();
  if ident.is_empty() {
    return "_".to_string();
  }
  if negative {
    ident = format!("negative_{ident}");
  }
  if ident == "self" {
    return "self_".to_string();
  }
  if FORBIDDEN_IDENTIFIERS.contains(ident.as_str()) {
    return format!("r#{ident}");
  }
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, '_');
  }
  ident
}

/// Converts a string into a valid Rust type or variant name (`PascalCase`).
///
/// Names that already look like PascalCase or camelCase keep their casing.
/// Separated names are split into words, including case boundaries inside each
/// part, and every word is capitalized.
pub(crate) fn to_type_name(name: &str) -> String {
  let mut ident = to_pascal_case(name);
  if RESERVED_TYPE_NAMES.contains(ident.as_str()) {
    ident.push_str("Model");
  }
  ident
}

/// PascalCase form of `name` without the reserved-name check, for building
/// compound names out of several parts.
pub(crate) fn to_pascal_case(name: &str) -> String {
  let (negative, rest) = name.strip_prefix('-').map_or((false, name), |stripped| (true, stripped));
  let ascii = any_ascii(rest);

  let has_separators = ascii.contains(|c: char| !c.is_ascii_alphanumeric());
  let has_upper = ascii.chars().any(|c| c.is_ascii_uppercase());
  let has_lower = ascii.chars().any(|c| c.is_ascii_lowercase());

  let mut ident = if !has_separators && has_upper && has_lower {
    let mut chars = ascii.chars();
    chars
      .next()
      .map_or_else(String::new, |first| first.to_ascii_uppercase().to_string() + chars.as_str())
  } else {
    ascii
      .split(|c: char| !c.is_ascii_alphanumeric())
      .filter(|part| !part.is_empty())
      .flat_map(split_pascal_case)
      .map(|word| capitalize(&word))
      .collect()
  };

  if ident.is_empty() {
    return "Unnamed".to_string();
  }
  if negative {
    ident = format!("Negative{ident}");
  }
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, 'T');
  }
  ident
}

/// Operation id used when the document does not declare one: `<method>_<path>`.
pub(crate) fn synthesize_operation_id(method: &str, path: &str) -> String {
  let id = format!("{}_{}", method.to_ascii_lowercase(), sanitize(path));
  id.trim_end_matches('_').to_string()
}
