//! Spec loading: bytes in, a validated document plus a map of classified
//! schema nodes keyed by canonical pointer out.

use std::collections::{HashMap, VecDeque};

use http::Method;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub mod document;
pub mod fetch;
pub mod pointer;
pub mod schema;

#[cfg(test)]
mod tests;

use self::{
  document::{
    Document, HTTP_METHODS, Info, MediaTypeObject, OperationObject, ParameterLocation, ParameterObject, ParameterStyle,
    RefOr, RequestBodyObject, ResponseObject, SecurityRequirement, SecuritySchemeObject, Server,
  },
  fetch::ExternalFetcher,
  pointer::Pointer,
  schema::{SchemaNode, classify},
};
use crate::error::{GenerationError, Result};

const MAX_REF_HOPS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Option<Self> {
    match ext.to_ascii_lowercase().as_str() {
      "yaml" | "yml" => Some(Self::Yaml),
      "json" => Some(Self::Json),
      _ => None,
    }
  }

  /// JSON documents start with `{`; anything else is treated as YAML.
  #[must_use]
  pub fn sniff(bytes: &[u8]) -> Self {
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
      Some(b'{') => Self::Json,
      _ => Self::Yaml,
    }
  }

  /// Picks the format from the file extension, sniffing the bytes otherwise.
  #[must_use]
  pub fn detect(name: &str, bytes: &[u8]) -> Self {
    name
      .rsplit_once('.')
      .and_then(|(_, ext)| Self::from_extension(ext))
      .unwrap_or_else(|| Self::sniff(bytes))
  }
}

/// A parameter as declared, after `$ref` resolution and path-level merging.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSource {
  pub pointer: Pointer,
  pub name: String,
  pub location: ParameterLocation,
  pub required: bool,
  pub deprecated: bool,
  pub description: Option<String>,
  pub style: Option<ParameterStyle>,
  pub explode: Option<bool>,
  pub schema: Option<Pointer>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
  pub content_type: String,
  pub schema: Option<Pointer>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodySource {
  pub pointer: Pointer,
  pub required: bool,
  pub description: Option<String>,
  pub contents: Vec<MediaSource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSource {
  pub status: String,
  pub description: Option<String>,
  pub contents: Vec<MediaSource>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationSource {
  pub pointer: Pointer,
  pub path: String,
  pub method: Method,
  pub operation_id: Option<String>,
  pub summary: Option<String>,
  pub description: Option<String>,
  pub deprecated: bool,
  pub parameters: Vec<ParameterSource>,
  pub request_body: Option<BodySource>,
  pub responses: Vec<ResponseSource>,
  pub security: Option<Vec<SecurityRequirement>>,
}

/// Output of the loader. Every pointer reachable from a node is present in
/// `nodes`.
#[derive(Debug, Clone)]
pub struct LoadedSpec {
  pub openapi: String,
  pub info: Info,
  pub servers: Vec<Server>,
  pub nodes: IndexMap<Pointer, SchemaNode>,
  pub components: Vec<Pointer>,
  pub operations: Vec<OperationSource>,
  pub security_schemes: IndexMap<String, SecuritySchemeObject>,
  pub security: Vec<SecurityRequirement>,
}

impl LoadedSpec {
  #[must_use]
  pub fn node(&self, pointer: &Pointer) -> Option<&SchemaNode> {
    self.nodes.get(pointer)
  }

  /// Operation schemas in document order, then component schemas.
  #[must_use]
  pub fn roots(&self) -> Vec<Pointer> {
    let mut roots = vec![];
    for operation in &self.operations {
      roots.extend(operation.parameters.iter().filter_map(|p| p.schema.clone()));
      if let Some(body) = &operation.request_body {
        roots.extend(body.contents.iter().filter_map(|m| m.schema.clone()));
      }
      for response in &operation.responses {
        roots.extend(response.contents.iter().filter_map(|m| m.schema.clone()));
      }
    }
    roots.extend(self.components.iter().cloned());
    roots
  }
}

/// Parses raw bytes into the ordered JSON value model.
pub fn parse_document(bytes: &[u8], format: SpecFormat) -> Result<Value> {
  match format {
    SpecFormat::Json => serde_json::from_slice(bytes).map_err(|err| {
      GenerationError::spec_parse(
        format!("invalid JSON: {err}"),
        format!("line {}, column {}", err.line(), err.column()),
      )
    }),
    SpecFormat::Yaml => {
      let yaml: serde_yaml::Value = serde_yaml::from_slice(bytes).map_err(|err| {
        let location = err
          .location()
          .map_or_else(|| "/".to_string(), |l| format!("line {}, column {}", l.line(), l.column()));
        GenerationError::spec_parse(format!("invalid YAML: {err}"), location)
      })?;
      yaml_to_json(yaml, "")
    }
  }
}

fn yaml_to_json(value: serde_yaml::Value, at: &str) -> Result<Value> {
  Ok(match value {
    serde_yaml::Value::Null => Value::Null,
    serde_yaml::Value::Bool(b) => Value::Bool(b),
    serde_yaml::Value::Number(n) => {
      if let Some(i) = n.as_i64() {
        Value::from(i)
      } else if let Some(u) = n.as_u64() {
        Value::from(u)
      } else {
        n.as_f64()
          .and_then(serde_json::Number::from_f64)
          .map_or(Value::Null, Value::Number)
      }
    }
    serde_yaml::Value::String(s) => Value::String(s),
    serde_yaml::Value::Sequence(items) => Value::Array(
      items
        .into_iter()
        .enumerate()
        .map(|(i, item)| yaml_to_json(item, &format!("{at}/{i}")))
        .collect::<Result<_>>()?,
    ),
    serde_yaml::Value::Mapping(mapping) => {
      let mut object = serde_json::Map::with_capacity(mapping.len());
      for (key, item) in mapping {
        let key = match key {
          serde_yaml::Value::String(s) => s,
          serde_yaml::Value::Number(n) => n.to_string(),
          serde_yaml::Value::Bool(b) => b.to_string(),
          _ => return Err(GenerationError::spec_parse("mapping keys must be scalars", at.to_string())),
        };
        let child = format!("{at}/{key}");
        object.insert(key, yaml_to_json(item, &child)?);
      }
      Value::Object(object)
    }
    serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value, at)?,
  })
}

fn path_location(base: &Pointer, path: &serde_path_to_error::Path) -> String {
  path
    .iter()
    .fold(base.clone(), |pointer, segment| match segment {
      serde_path_to_error::Segment::Seq { index } => pointer.child(&index.to_string()),
      serde_path_to_error::Segment::Map { key } => pointer.child(key),
      serde_path_to_error::Segment::Enum { variant } => pointer.child(variant),
      serde_path_to_error::Segment::Unknown => pointer,
    })
    .to_string()
}

fn decode<T: DeserializeOwned>(value: Value, at: &Pointer) -> Result<T> {
  serde_path_to_error::deserialize(value).map_err(|err| {
    let location = path_location(at, err.path());
    GenerationError::spec_parse(err.into_inner().to_string(), location)
  })
}

/// Documents seen during one load, fetched lazily and cached for the run.
struct DocumentStore<'a> {
  documents: HashMap<String, Value>,
  fetcher: &'a dyn ExternalFetcher,
}

impl<'a> DocumentStore<'a> {
  fn new(root: Value, fetcher: &'a dyn ExternalFetcher) -> Self {
    Self {
      documents: HashMap::from([(String::new(), root)]),
      fetcher,
    }
  }

  fn lookup(&mut self, pointer: &Pointer, referrer: Option<&Pointer>) -> Result<&Value> {
    let document = pointer.document();
    if !self.documents.contains_key(document) {
      tracing::debug!(document, "fetching external document");
      let bytes = self.fetcher.fetch(document).map_err(|err| GenerationError::UnresolvedReference {
        reference: pointer.to_string(),
        referrer: referrer.map(ToString::to_string),
        message: err.to_string(),
        retryable: err.is_retryable(),
      })?;
      let value = parse_document(&bytes, SpecFormat::detect(document, &bytes))?;
      self.documents.insert(document.to_string(), value);
    }

    self
      .documents
      .get(document)
      .and_then(|value| value.pointer(pointer.fragment()))
      .ok_or_else(|| {
        GenerationError::unresolved(
          pointer.to_string(),
          referrer.map(ToString::to_string),
          "no value exists at this location",
        )
      })
  }

  /// Follows `$ref` chains starting at `item` and decodes the final object.
  fn resolve<T: DeserializeOwned>(&mut self, item: RefOr<T>, at: Pointer) -> Result<(T, Pointer)> {
    let reference = match item {
      RefOr::Item(value) => return Ok((value, at)),
      RefOr::Ref { reference } => reference,
    };

    let mut target = Pointer::parse_ref(&reference, at.document())?;
    for _ in 0..MAX_REF_HOPS {
      let value = self.lookup(&target, Some(&at))?.clone();
      match value.get("$ref").and_then(Value::as_str) {
        Some(next) => target = Pointer::parse_ref(next, target.document())?,
        None => return decode(value, &target).map(|decoded| (decoded, target)),
      }
    }

    Err(GenerationError::unresolved(
      reference,
      Some(at.to_string()),
      "reference chain is cyclic or too long",
    ))
  }
}

/// Loads and validates an OpenAPI 3.x document.
pub struct SpecLoader<'a> {
  fetcher: &'a dyn ExternalFetcher,
}

impl<'a> SpecLoader<'a> {
  #[must_use]
  pub fn new(fetcher: &'a dyn ExternalFetcher) -> Self {
    Self { fetcher }
  }

  pub fn load(&self, bytes: &[u8], format: SpecFormat) -> Result<LoadedSpec> {
    let root = parse_document(bytes, format)?;
    let openapi = validate_root(&root)?;
    let document: Document = decode(root.clone(), &Pointer::root())?;

    let mut store = DocumentStore::new(root, self.fetcher);
    let mut queue = VecDeque::new();

    let components = document
      .components
      .as_ref()
      .map(|c| c.schemas.keys().map(|name| Pointer::component(name)).collect::<Vec<_>>())
      .unwrap_or_default();
    queue.extend(components.iter().map(|pointer| (pointer.clone(), None)));

    let operations = self.collect_operations(&document, &mut store)?;
    for operation in &operations {
      let parameter_schemas = operation.parameters.iter().filter_map(|p| p.schema.clone());
      let body_schemas = operation
        .request_body
        .iter()
        .flat_map(|body| body.contents.iter().filter_map(|m| m.schema.clone()));
      let response_schemas = operation
        .responses
        .iter()
        .flat_map(|response| response.contents.iter().filter_map(|m| m.schema.clone()));
      queue.extend(
        parameter_schemas
          .chain(body_schemas)
          .chain(response_schemas)
          .map(|pointer| (pointer, Some(operation.pointer.clone()))),
      );
    }

    let nodes = walk_schemas(&mut store, queue)?;

    let mut security_schemes = IndexMap::new();
    if let Some(components) = &document.components {
      let base = Pointer::root().child("components").child("securitySchemes");
      for (name, scheme) in &components.security_schemes {
        let (scheme, _) = store.resolve(scheme.clone(), base.child(name))?;
        security_schemes.insert(name.clone(), scheme);
      }
    }

    tracing::debug!(
      nodes = nodes.len(),
      operations = operations.len(),
      components = components.len(),
      "document loaded"
    );

    Ok(LoadedSpec {
      openapi,
      info: document.info,
      servers: document.servers,
      nodes,
      components,
      operations,
      security_schemes,
      security: document.security.unwrap_or_default(),
    })
  }

  fn collect_operations(&self, document: &Document, store: &mut DocumentStore<'_>) -> Result<Vec<OperationSource>> {
    let mut operations = vec![];
    let Some(paths) = &document.paths else {
      return Ok(operations);
    };

    for (path, raw_item) in paths {
      let item_pointer = Pointer::root().child("paths").child(path);
      let item: RefOr<serde_json::Map<String, Value>> = decode(raw_item.clone(), &item_pointer)?;
      let (item, item_pointer) = store.resolve(item, item_pointer)?;

      let shared: Vec<RefOr<ParameterObject>> = match item.get("parameters") {
        Some(raw) => decode(raw.clone(), &item_pointer.child("parameters"))?,
        None => vec![],
      };
      let shared = resolve_parameters(store, shared, &item_pointer.child("parameters"))?;

      for (key, raw_operation) in &item {
        if !HTTP_METHODS.contains(&key.as_str()) {
          continue;
        }
        let pointer = item_pointer.child(key);
        let operation: OperationObject = decode(raw_operation.clone(), &pointer)?;
        let method = Method::from_bytes(key.to_ascii_uppercase().as_bytes())
          .map_err(|_| GenerationError::spec_parse(format!("invalid HTTP method '{key}'"), pointer.to_string()))?;
        operations.push(build_operation(store, path, method, pointer, operation, &shared)?);
      }
    }

    Ok(operations)
  }
}

fn validate_root(root: &Value) -> Result<String> {
  let Some(map) = root.as_object() else {
    return Err(GenerationError::spec_parse("document root must be a mapping", "/"));
  };

  let openapi = match map.get("openapi") {
    Some(Value::String(version)) => version.clone(),
    Some(_) => return Err(GenerationError::spec_parse("`openapi` must be a version string", "/openapi")),
    None => {
      let message = if map.contains_key("swagger") {
        "Swagger 2.0 documents are not supported"
      } else {
        "missing `openapi` version"
      };
      return Err(GenerationError::spec_parse(message, "/openapi"));
    }
  };

  let mut parts = openapi.split('.');
  let major = parts.next().unwrap_or_default();
  let minor = parts.next().unwrap_or_default();
  if major != "3" {
    return Err(GenerationError::spec_parse(
      format!("unsupported OpenAPI version '{openapi}'"),
      "/openapi",
    ));
  }

  let info = map
    .get("info")
    .and_then(Value::as_object)
    .ok_or_else(|| GenerationError::spec_parse("missing `info` object", "/info"))?;
  for field in ["title", "version"] {
    if !info.get(field).is_some_and(Value::is_string) {
      return Err(GenerationError::spec_parse(
        format!("`info.{field}` is required"),
        format!("/info/{field}"),
      ));
    }
  }

  if minor == "0" && !map.contains_key("paths") {
    return Err(GenerationError::spec_parse("`paths` is required for OpenAPI 3.0", "/paths"));
  }

  Ok(openapi)
}

fn resolve_parameters(
  store: &mut DocumentStore<'_>,
  parameters: Vec<RefOr<ParameterObject>>,
  base: &Pointer,
) -> Result<Vec<ParameterSource>> {
  parameters
    .into_iter()
    .enumerate()
    .map(|(i, parameter)| {
      let (parameter, pointer) = store.resolve(parameter, base.child(&i.to_string()))?;
      Ok(parameter_source(parameter, pointer))
    })
    .collect()
}

fn parameter_source(parameter: ParameterObject, pointer: Pointer) -> ParameterSource {
  let schema = if parameter.schema.is_some() {
    Some(pointer.child("schema"))
  } else {
    parameter
      .content
      .iter()
      .find(|(_, media)| media.schema.is_some())
      .map(|(content_type, _)| pointer.child("content").child(content_type).child("schema"))
  };

  ParameterSource {
    name: parameter.name,
    location: parameter.location,
    required: parameter.required || parameter.location == ParameterLocation::Path,
    deprecated: parameter.deprecated,
    description: parameter.description,
    style: parameter.style,
    explode: parameter.explode,
    schema,
    pointer,
  }
}

fn media_sources(content: &IndexMap<String, MediaTypeObject>, pointer: &Pointer) -> Vec<MediaSource> {
  content
    .iter()
    .map(|(content_type, media)| MediaSource {
      content_type: content_type.clone(),
      schema: media
        .schema
        .as_ref()
        .map(|_| pointer.child("content").child(content_type).child("schema")),
    })
    .collect()
}

fn build_operation(
  store: &mut DocumentStore<'_>,
  path: &str,
  method: Method,
  pointer: Pointer,
  operation: OperationObject,
  shared: &[ParameterSource],
) -> Result<OperationSource> {
  let own = resolve_parameters(store, operation.parameters, &pointer.child("parameters"))?;

  let mut parameters: Vec<ParameterSource> = shared.to_vec();
  for parameter in own {
    match parameters
      .iter_mut()
      .find(|existing| existing.name == parameter.name && existing.location == parameter.location)
    {
      Some(existing) => *existing = parameter,
      None => parameters.push(parameter),
    }
  }

  let request_body = match operation.request_body {
    Some(body) => {
      let (body, body_pointer): (RequestBodyObject, Pointer) = store.resolve(body, pointer.child("requestBody"))?;
      Some(BodySource {
        contents: media_sources(&body.content, &body_pointer),
        pointer: body_pointer,
        required: body.required,
        description: body.description,
      })
    }
    None => None,
  };

  let mut responses = vec![];
  let responses_pointer = pointer.child("responses");
  for (status, response) in operation.responses {
    let (response, response_pointer): (ResponseObject, Pointer) =
      store.resolve(response, responses_pointer.child(&status))?;
    responses.push(ResponseSource {
      contents: media_sources(&response.content, &response_pointer),
      status,
      description: response.description,
    });
  }

  Ok(OperationSource {
    pointer,
    path: path.to_string(),
    method,
    operation_id: operation.operation_id,
    summary: operation.summary,
    description: operation.description,
    deprecated: operation.deprecated,
    parameters,
    request_body,
    responses,
    security: operation.security,
  })
}

fn walk_schemas(
  store: &mut DocumentStore<'_>,
  mut queue: VecDeque<(Pointer, Option<Pointer>)>,
) -> Result<IndexMap<Pointer, SchemaNode>> {
  let mut nodes: IndexMap<Pointer, SchemaNode> = IndexMap::new();

  while let Some((pointer, referrer)) = queue.pop_front() {
    if nodes.contains_key(&pointer) {
      continue;
    }
    let value = store.lookup(&pointer, referrer.as_ref())?.clone();
    for node in classify(&pointer, &value)? {
      for target in node.kind.references() {
        if !nodes.contains_key(target) {
          queue.push_back((target.clone(), Some(node.id.clone())));
        }
      }
      nodes.insert(node.id.clone(), node);
    }
  }

  Ok(nodes)
}
