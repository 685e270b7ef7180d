use super::{
  TypeGraph,
  arena::TypeArena,
  content::{ContentCategory, select_media},
  mapper::TypeMapper,
  model::{Definition, ModelDefinition, Primitive, Tagging, TypeRef, TypeTarget, UnionKind, VariantSet},
  operation::{
    Operation, Parameter, PathTemplate, RequestBody, Response, ResponseBody, StatusKey, SuccessType, ValueShape,
  },
};
use crate::{
  error::{GenerationError, Result},
  generator::{
    compose::positional_variants,
    loader::{
      MediaSource, OperationSource, ParameterSource,
      document::{ParameterLocation, ParameterStyle},
      pointer::Pointer,
      schema::SchemaKind,
    },
    metrics::GenerationWarning,
    resolver::{ResolutionContext, ResolvedGraph},
  },
  naming::identifiers::to_pascal_case,
};

const MAX_SHAPE_DEPTH: usize = 16;

/// Collects composed definitions into an arena and converts every operation.
pub struct TypeGraphBuilder<'g, 'a> {
  graph: &'g ResolvedGraph<'a>,
}

/// An operation whose 2xx responses decode into more than one type.
struct PendingSuccess {
  operation: usize,
  types: Vec<TypeRef>,
}

impl<'g, 'a> TypeGraphBuilder<'g, 'a> {
  #[must_use]
  pub fn new(graph: &'g ResolvedGraph<'a>) -> Self {
    Self { graph }
  }

  #[tracing::instrument(skip_all, name = "build")]
  pub fn build(&self, definitions: Vec<Definition>, ctx: &mut ResolutionContext) -> Result<TypeGraph> {
    let spec = self.graph.spec;
    let mut operations = Vec::with_capacity(spec.operations.len());
    let mut pending = vec![];
    let mut warnings = vec![];

    {
      let mapper = TypeMapper::new(self.graph, &ctx.names);
      for (index, (source, id)) in spec.operations.iter().zip(&self.graph.operation_ids).enumerate() {
        let (operation, success_types) = self.operation(&mapper, source, id, &mut warnings)?;
        if success_types.len() > 1 {
          pending.push(PendingSuccess {
            operation: index,
            types: success_types,
          });
        }
        operations.push(operation);
      }
    }
    ctx.warnings.extend(warnings);

    let mut definitions = definitions;
    for PendingSuccess { operation, types } in pending {
      let target: &mut Operation = &mut operations[operation];
      let name = ctx.names.reserve(&format!("{}Success", to_pascal_case(&target.id)));
      definitions.push(Definition::Model(ModelDefinition {
        name: name.clone(),
        source: target.source.clone(),
        docs: Some(format!("Successful responses of `{}`.", target.id)),
        fields: vec![],
        bases: vec![],
        variants: Some(VariantSet {
          kind: UnionKind::OneOf,
          tagging: Tagging::Positional,
          variants: positional_variants(types),
        }),
        additional: None,
        forward_declared: false,
      }));
      target.success = SuccessType::Json(TypeRef::named(name, false));
    }

    let definitions = collect_arena(definitions)?;
    let graph = TypeGraph::new(
      definitions,
      operations,
      spec.security_schemes.clone(),
      spec.info.clone(),
      spec.servers.clone(),
    );

    tracing::debug!(
      definitions = graph.definitions().len(),
      operations = graph.operations.len(),
      "type graph built"
    );
    Ok(graph)
  }

  fn operation(
    &self,
    mapper: &TypeMapper<'_, 'a>,
    source: &OperationSource,
    id: &str,
    warnings: &mut Vec<GenerationWarning>,
  ) -> Result<(Operation, Vec<TypeRef>)> {
    let spec = self.graph.spec;
    let path = PathTemplate::parse(&source.path);

    let mut parameters = source
      .parameters
      .iter()
      .map(|parameter| self.parameter(mapper, parameter))
      .collect::<Result<Vec<_>>>()?;

    let undeclared: Vec<String> = path
      .parameters()
      .filter(|name| {
        !parameters
          .iter()
          .any(|p| p.location == ParameterLocation::Path && p.name == *name)
      })
      .map(str::to_string)
      .collect();
    for name in undeclared {
      warnings.push(GenerationWarning::UndeclaredPathParameter {
        operation_id: id.to_string(),
        name: name.clone(),
      });
      parameters.push(Parameter {
        name,
        location: ParameterLocation::Path,
        style: ParameterStyle::Simple,
        explode: false,
        required: true,
        ty: TypeRef::primitive(Primitive::String),
        shape: ValueShape::Scalar,
        docs: None,
        deprecated: false,
      });
    }

    let request_body = match &source.request_body {
      Some(body) => select_media(&body.contents)
        .map(|media| {
          let (ty, category) = self.media(mapper, media, id, "the request body", warnings)?;
          Ok::<_, GenerationError>(RequestBody {
            ty,
            content_type: media.content_type.clone(),
            category,
            required: body.required,
            docs: body.description.clone(),
          })
        })
        .transpose()?,
      None => None,
    };

    let mut responses = Vec::with_capacity(source.responses.len());
    for response in &source.responses {
      let status = StatusKey::parse(&response.status).ok_or_else(|| {
        GenerationError::spec_parse(
          format!("invalid response status '{}'", response.status),
          source.pointer.child("responses").child(&response.status).to_string(),
        )
      })?;
      let body = match select_media(&response.contents) {
        Some(media) if status.is_success() => {
          let target = format!("the {status} response");
          let (ty, category) = self.media(mapper, media, id, &target, warnings)?;
          Some(ResponseBody {
            ty,
            content_type: media.content_type.clone(),
            category,
          })
        }
        Some(media) => {
          let category = ContentCategory::from_content_type(&media.content_type);
          let ty = match (&media.schema, category) {
            (Some(schema), ContentCategory::Json) => mapper.root(schema)?,
            _ => TypeRef::any(),
          };
          Some(ResponseBody {
            ty,
            content_type: media.content_type.clone(),
            category,
          })
        }
        None => None,
      };
      responses.push(Response {
        status,
        docs: response.description.clone(),
        body,
      });
    }

    let (success, success_types) = success_type(&responses);

    let operation = Operation {
      id: id.to_string(),
      source: source.pointer.clone(),
      method: source.method.clone(),
      path,
      summary: source.summary.clone(),
      docs: source.description.clone(),
      deprecated: source.deprecated,
      parameters,
      request_body,
      responses,
      success,
      security: source.security.clone().unwrap_or_else(|| spec.security.clone()),
    };
    Ok((operation, success_types))
  }

  fn parameter(&self, mapper: &TypeMapper<'_, 'a>, source: &ParameterSource) -> Result<Parameter> {
    let style = source.style.unwrap_or_else(|| Parameter::default_style(source.location));
    let (ty, shape) = match &source.schema {
      Some(schema) => (mapper.root(schema)?, value_shape(mapper, schema, 0)?),
      None => (TypeRef::primitive(Primitive::String), ValueShape::Scalar),
    };

    Ok(Parameter {
      name: source.name.clone(),
      location: source.location,
      style,
      explode: source.explode.unwrap_or(style == ParameterStyle::Form),
      required: source.required,
      ty,
      shape,
      docs: source.description.clone(),
      deprecated: source.deprecated,
    })
  }

  fn media(
    &self,
    mapper: &TypeMapper<'_, 'a>,
    media: &MediaSource,
    id: &str,
    target: &str,
    warnings: &mut Vec<GenerationWarning>,
  ) -> Result<(TypeRef, ContentCategory)> {
    let category = ContentCategory::from_content_type(&media.content_type);
    if !category.is_json() {
      warnings.push(GenerationWarning::NonJsonContent {
        operation_id: id.to_string(),
        target: target.to_string(),
        content_type: media.content_type.clone(),
      });
    }

    let ty = match (category, &media.schema) {
      (ContentCategory::Json | ContentCategory::FormUrlEncoded, Some(schema)) => mapper.root(schema)?,
      (ContentCategory::Json, None) => TypeRef::any(),
      (ContentCategory::FormUrlEncoded, None) => TypeRef::map(TypeRef::any()),
      (ContentCategory::Text, _) => TypeRef::primitive(Primitive::String),
      (ContentCategory::Binary, _) => TypeRef::primitive(Primitive::Bytes),
    };
    Ok((ty, category))
  }
}

/// The success type of an operation, plus the distinct JSON types behind it
/// when a synthesized union is needed.
fn success_type(responses: &[Response]) -> (SuccessType, Vec<TypeRef>) {
  let bodies: Vec<&ResponseBody> = responses
    .iter()
    .filter(|response| response.status.is_success())
    .filter_map(|response| response.body.as_ref())
    .collect();

  let mut json: Vec<TypeRef> = vec![];
  for body in bodies.iter().filter(|body| body.category.is_json()) {
    if !json.iter().any(|seen| seen.same_shape(&body.ty)) {
      json.push(body.ty.clone());
    }
  }

  match json.as_slice() {
    [] => {}
    [single] => return (SuccessType::Json(single.clone()), vec![]),
    _ => return (SuccessType::Empty, json),
  }

  let success = match bodies.first().map(|body| body.category) {
    Some(ContentCategory::Text) => SuccessType::Text,
    Some(ContentCategory::Binary | ContentCategory::FormUrlEncoded) => SuccessType::Bytes,
    Some(ContentCategory::Json) | None => SuccessType::Empty,
  };
  (success, vec![])
}

/// How the value of a parameter schema is laid out, which decides how its
/// style expands it.
fn value_shape(mapper: &TypeMapper<'_, '_>, pointer: &Pointer, depth: usize) -> Result<ValueShape> {
  if depth > MAX_SHAPE_DEPTH {
    return Ok(ValueShape::Scalar);
  }
  let target = mapper.follow(pointer)?;
  Ok(match &mapper.node(&target)?.kind {
    SchemaKind::Object(_) | SchemaKind::AllOf { .. } => ValueShape::Object,
    SchemaKind::Array { .. } => ValueShape::Array,
    SchemaKind::OneOf(union) | SchemaKind::AnyOf(union) => {
      let mut shapes = vec![];
      for member in &union.members {
        shapes.push(value_shape(mapper, member, depth + 1)?);
      }
      match shapes.first() {
        Some(&first) if shapes.iter().all(|&shape| shape == first) => first,
        _ => ValueShape::Scalar,
      }
    }
    SchemaKind::Primitive { .. } | SchemaKind::Enum { .. } | SchemaKind::Any | SchemaKind::Ref(_) => {
      ValueShape::Scalar
    }
  })
}

/// Declares every definition in order. Forward-declared names are reserved at
/// their position and filled once all other definitions are in place.
fn collect_arena(definitions: Vec<Definition>) -> Result<Vec<Definition>> {
  let mut arena = TypeArena::default();
  let mut deferred = vec![];
  let mut references = vec![];

  for definition in definitions {
    for name in referenced_names(&definition) {
      references.push((definition.source().clone(), name));
    }
    if definition.forward_declared() {
      arena.reserve(definition.name());
      deferred.push(definition);
    } else {
      arena.define(definition)?;
    }
  }
  for definition in deferred {
    arena.define(definition)?;
  }

  if let Some((source, name)) = references.into_iter().find(|(_, name)| !arena.is_reserved(name)) {
    return Err(GenerationError::unresolved(
      name,
      Some(source.to_string()),
      "type is referenced but never declared",
    ));
  }
  arena.finish()
}

fn referenced_names(definition: &Definition) -> Vec<String> {
  let mut types: Vec<&TypeRef> = vec![];
  match definition {
    Definition::Model(model) => {
      types.extend(model.fields.iter().map(|field| &field.ty));
      types.extend(model.additional.iter());
      if let Some(variants) = &model.variants {
        types.extend(variants.variants.iter().map(|variant| &variant.ty));
      }
    }
    Definition::Alias(alias) => types.push(&alias.ty),
    Definition::Enum(_) => {}
  }

  let mut names = vec![];
  while let Some(ty) = types.pop() {
    match &ty.target {
      TypeTarget::Named { name, .. } => names.push(name.clone()),
      TypeTarget::Array(inner) | TypeTarget::Map(inner) => types.push(inner),
      TypeTarget::Primitive(_) | TypeTarget::Any => {}
    }
  }
  names
}
