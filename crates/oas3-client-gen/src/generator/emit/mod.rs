//! Rendering: the type graph is lowered into a language-neutral [`ClientIr`]
//! and handed to a [`Backend`], which turns it into source files.

use indexmap::IndexMap;

pub mod rust;

#[cfg(test)]
mod tests;

pub use self::rust::{RustBackend, Visibility};
use crate::{
  error::Result,
  generator::{
    loader::document::{ParameterLocation, SecuritySchemeObject, SecuritySchemeType},
    metrics::GenerationWarning,
    planner::{SerializationPlan, plan_operation},
    types::{Definition, Operation, TypeGraph},
  },
};

/// A language backend. Rendering is pure: the same IR always yields the same
/// artifacts, byte for byte.
pub trait Backend {
  fn name(&self) -> &'static str;

  fn render(&self, ir: &ClientIr) -> Result<Artifacts>;
}

/// Rendered files, keyed by file name, in the order the backend produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts {
  files: IndexMap<String, String>,
}

impl Artifacts {
  pub fn insert(&mut self, name: impl Into<String>, contents: String) {
    self.files.insert(name.into(), contents);
  }

  #[must_use]
  pub fn get(&self, name: &str) -> Option<&str> {
    self.files.get(name).map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.files.iter().map(|(name, contents)| (name.as_str(), contents.as_str()))
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.files.keys().map(String::as_str)
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.files.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }
}

impl IntoIterator for Artifacts {
  type Item = (String, String);
  type IntoIter = indexmap::map::IntoIter<String, String>;

  fn into_iter(self) -> Self::IntoIter {
    self.files.into_iter()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiMetadata {
  pub title: String,
  pub version: String,
  pub description: Option<String>,
  /// URL of the first declared server.
  pub base_url: Option<String>,
}

/// Where a credential goes for one declared security scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthKind {
  Bearer,
  Basic,
  ApiKeyHeader(String),
  ApiKeyQuery(String),
  ApiKeyCookie(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityScheme {
  pub name: String,
  pub kind: AuthKind,
  pub docs: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationIr {
  pub operation: Operation,
  pub plans: Vec<SerializationPlan>,
  /// Names of the supported schemes any of which authorizes this operation,
  /// in requirement order.
  pub auth: Vec<String>,
}

/// Everything a backend needs, already planned and ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientIr {
  pub package_name: String,
  pub metadata: ApiMetadata,
  pub definitions: Vec<Definition>,
  pub operations: Vec<OperationIr>,
  pub security_schemes: Vec<SecurityScheme>,
}

impl ClientIr {
  /// Plans every operation and maps the declared security schemes. Schemes
  /// the runtime cannot apply are reported, not fatal.
  pub fn lower(graph: &TypeGraph, package_name: &str) -> Result<(Self, Vec<GenerationWarning>)> {
    let mut warnings = vec![];

    let security_schemes: Vec<SecurityScheme> = graph
      .security_schemes
      .iter()
      .filter_map(|(name, scheme)| security_scheme(name, scheme, &mut warnings))
      .collect();

    let mut undeclared: Vec<String> = vec![];
    let mut operations = Vec::with_capacity(graph.operations.len());
    for operation in &graph.operations {
      let plans = plan_operation(operation)?;

      let mut auth: Vec<String> = vec![];
      for name in operation.security.iter().flat_map(|requirement| requirement.keys()) {
        if security_schemes.iter().any(|scheme| &scheme.name == name) {
          if !auth.contains(name) {
            auth.push(name.clone());
          }
        } else if !graph.security_schemes.contains_key(name) && !undeclared.contains(name) {
          undeclared.push(name.clone());
        }
      }

      operations.push(OperationIr {
        operation: operation.clone(),
        plans,
        auth,
      });
    }

    warnings.extend(undeclared.into_iter().map(|scheme| GenerationWarning::SecuritySchemeSkipped {
      scheme,
      reason: "it is required but never declared".to_string(),
    }));

    let ir = Self {
      package_name: package_name.to_string(),
      metadata: ApiMetadata {
        title: graph.info.title.clone(),
        version: graph.info.version.clone(),
        description: graph.info.description.clone(),
        base_url: graph.servers.first().map(|server| server.url.clone()),
      },
      definitions: graph.definitions().to_vec(),
      operations,
      security_schemes,
    };
    Ok((ir, warnings))
  }

  #[must_use]
  pub fn security_scheme(&self, name: &str) -> Option<&SecurityScheme> {
    self.security_schemes.iter().find(|scheme| scheme.name == name)
  }
}

fn security_scheme(
  name: &str,
  scheme: &SecuritySchemeObject,
  warnings: &mut Vec<GenerationWarning>,
) -> Option<SecurityScheme> {
  let kind = match scheme.scheme_type {
    SecuritySchemeType::Http => match scheme.scheme.as_deref().map(str::to_ascii_lowercase).as_deref() {
      Some("bearer") => AuthKind::Bearer,
      Some("basic") => AuthKind::Basic,
      Some(other) => return skipped(name, warnings, format!("HTTP scheme '{other}' has no runtime support")),
      None => return skipped(name, warnings, "HTTP scheme is missing its 'scheme' field".to_string()),
    },
    SecuritySchemeType::ApiKey => {
      let Some(key) = scheme.name.clone() else {
        return skipped(name, warnings, "API key scheme is missing its 'name' field".to_string());
      };
      match scheme.location {
        Some(ParameterLocation::Header) => AuthKind::ApiKeyHeader(key),
        Some(ParameterLocation::Query) => AuthKind::ApiKeyQuery(key),
        Some(ParameterLocation::Cookie) => AuthKind::ApiKeyCookie(key),
        Some(ParameterLocation::Path) | None => {
          return skipped(name, warnings, "API keys can only be sent in a header, query or cookie".to_string());
        }
      }
    }
    SecuritySchemeType::OAuth2 | SecuritySchemeType::OpenIdConnect => {
      let kind = if scheme.scheme_type == SecuritySchemeType::OAuth2 {
        "oauth2"
      } else {
        "openIdConnect"
      };
      warnings.push(GenerationWarning::SecuritySchemeApproximated {
        scheme: name.to_string(),
        kind: kind.to_string(),
        applied: "a bearer token obtained out of band".to_string(),
      });
      AuthKind::Bearer
    }
    SecuritySchemeType::MutualTls => {
      return skipped(name, warnings, "client certificates belong to the HTTP client configuration".to_string());
    }
  };

  Some(SecurityScheme {
    name: name.to_string(),
    kind,
    docs: scheme.description.clone(),
  })
}

fn skipped(name: &str, warnings: &mut Vec<GenerationWarning>, reason: String) -> Option<SecurityScheme> {
  warnings.push(GenerationWarning::SecuritySchemeSkipped {
    scheme: name.to_string(),
    reason,
  });
  None
}
