use std::collections::BTreeSet;

use oas3_client_gen_support::{Delimiter, PairRule, SegmentRule};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use super::{
  Visibility, auth::const_names, doc_lines, docs, inner_docs,
  types::{TypeRenderer, mentions_named},
};
use crate::{
  error::{GenerationError, Result},
  generator::{
    emit::{ClientIr, OperationIr},
    loader::document::ParameterLocation,
    planner::{SerializationPlan, WireRule},
    types::{
      content::ContentCategory,
      operation::{Operation, PathSegment, RequestBody, SuccessType},
    },
  },
  naming::identifiers::{ensure_unique, to_field_name},
};

/// Locals every method declares; parameters must not shadow them.
const LOCALS: &[&str] = &["parts", "request"];

pub(super) fn render(ir: &ClientIr, vis: Visibility) -> Result<TokenStream> {
  let header = inner_docs(&["HTTP client with one method per operation.".to_string()]);
  let vis_tokens = vis.to_tokens();

  let auth_names = const_names(ir);
  let mut method_names = BTreeSet::from(["new".to_string(), "base_url".to_string()]);
  let methods = ir
    .operations
    .iter()
    .map(|operation| {
      let name = ensure_unique(&method_name(&operation.operation.id), &method_names);
      method_names.insert(name.clone());
      method(ir, operation, &name, &auth_names, &vis_tokens)
    })
    .collect::<Result<Vec<_>>>()?;

  let uses_models = ir.operations.iter().any(|op| uses_models(&op.operation));
  let uses_auth = ir.operations.iter().any(|op| !op.auth.is_empty());
  let models_import = uses_models.then(|| quote! { use super::models; });
  let auth_import = uses_auth.then(|| quote! { use super::auth; });

  let default_base_url = ir.metadata.base_url.as_ref().map(|url| {
    quote! {
      /// First server URL declared by the API.
      #vis_tokens const DEFAULT_BASE_URL: &'static str = #url;
    }
  });
  let client_docs = docs(&doc_lines([format!(
    "Client for {} (version {}).",
    ir.metadata.title, ir.metadata.version
  )
  .as_str()]));

  Ok(quote! {
    #header

    use oas3_client_gen_support as support;

    use super::errors::Result;
    #auth_import
    #models_import

    #client_docs
    #[derive(Debug, Clone)]
    #vis_tokens struct Client {
      core: support::ClientCore,
    }

    impl Client {
      #default_base_url

      /// Creates a client for `base_url`. The credential is only sent to
      /// operations whose security schemes accept it.
      #vis_tokens fn new(base_url: &str, credential: Option<support::Credential>) -> Result<Self> {
        Ok(Self {
          core: support::ClientCore::new(base_url, credential)?,
        })
      }

      #vis_tokens fn base_url(&self) -> &str {
        self.core.base_url()
      }

      #(#methods)*
    }
  })
}

fn method_name(operation_id: &str) -> String {
  match to_field_name(operation_id).as_str() {
    "_" => "call".to_string(),
    name => name.to_string(),
  }
}

fn uses_models(operation: &Operation) -> bool {
  operation.parameters.iter().any(|p| mentions_named(&p.ty))
    || operation.request_body.as_ref().is_some_and(|body| mentions_named(&body.ty))
    || matches!(&operation.success, SuccessType::Json(ty) if mentions_named(ty))
}

/// A parameter with the identifier of its argument.
struct Argument<'p> {
  plan: &'p SerializationPlan,
  ident: Ident,
}

fn method(
  ir: &ClientIr,
  op: &OperationIr,
  name: &str,
  auth_names: &[String],
  vis: &TokenStream,
) -> Result<TokenStream> {
  let operation = &op.operation;
  let types = TypeRenderer::qualified();
  let method_ident = format_ident!("{}", name);

  let mut taken: BTreeSet<String> = LOCALS.iter().map(|local| (*local).to_string()).collect();
  let mut path_args = vec![];
  for param in operation.path.parameters() {
    let plan = op
      .plans
      .iter()
      .find(|plan| plan.parameter.location == ParameterLocation::Path && plan.parameter.name == param)
      .ok_or_else(|| {
        GenerationError::emission(
          "client.rs",
          format!("operation '{}' has no plan for path parameter '{param}'", operation.id),
        )
      })?;
    path_args.push(argument(plan, &mut taken));
  }
  let other_args: Vec<Argument<'_>> = op
    .plans
    .iter()
    .filter(|plan| plan.parameter.location != ParameterLocation::Path)
    .map(|plan| argument(plan, &mut taken))
    .collect();
  let body_ident = operation
    .request_body
    .as_ref()
    .map(|_| format_ident!("{}", ensure_unique("body", &taken)));

  let mut params = vec![];
  for arg in path_args.iter().chain(&other_args) {
    let ident = &arg.ident;
    let ty = types.argument(&arg.plan.parameter.ty, arg.plan.parameter.required);
    params.push(quote! { #ident: #ty });
  }
  if let (Some(body), Some(ident)) = (&operation.request_body, &body_ident) {
    let ty = types.argument(&body.ty, body.required);
    params.push(quote! { #ident: #ty });
  }

  let parts = other_args.iter().map(|arg| {
    let ident = &arg.ident;
    let wire = &arg.plan.parameter.name;
    let rule = rule_tokens(arg.plan.rule);
    let call = match arg.plan.parameter.location {
      ParameterLocation::Query => quote! { query },
      ParameterLocation::Header => quote! { header },
      ParameterLocation::Cookie | ParameterLocation::Path => quote! { cookie },
    };
    quote! { parts.#call(#wire, #rule, &#ident)?; }
  });
  let parts_binding = if other_args.is_empty() {
    quote! { let parts = support::RequestParts::new(); }
  } else {
    quote! { let mut parts = support::RequestParts::new(); }
  };

  let path = path_expr(operation, &path_args);
  let http_method = format_ident!("{}", operation.method.as_str());
  let schemes = op.auth.iter().filter_map(|scheme| {
    let index = ir.security_schemes.iter().position(|known| &known.name == scheme)?;
    let ident = format_ident!("{}", auth_names[index]);
    Some(quote! { auth::#ident })
  });

  let body = match (&operation.request_body, &body_ident) {
    (Some(body), Some(ident)) => body_statement(body, ident),
    _ => quote! {},
  };

  let (returned, send) = match &operation.success {
    SuccessType::Empty => (quote! { () }, quote! { send_empty }),
    SuccessType::Json(ty) => (types.returned(ty), quote! { send_json }),
    SuccessType::Text => (quote! { String }, quote! { send_text }),
    SuccessType::Bytes => (quote! { Vec<u8> }, quote! { send_bytes }),
  };

  let docs = docs(&method_docs(operation, &path_args, &other_args));
  let deprecated = operation.deprecated.then(|| quote! { #[deprecated] });

  Ok(quote! {
    #docs
    #deprecated
    #vis async fn #method_ident(&self, #(#params),*) -> Result<#returned> {
      #parts_binding
      #(#parts)*
      let request = self.core.prepare(support::Method::#http_method, #path, parts, &[#(#schemes),*]);
      #body
      support::ClientCore::#send(request).await
    }
  })
}

fn argument<'p>(plan: &'p SerializationPlan, taken: &mut BTreeSet<String>) -> Argument<'p> {
  let base = match to_field_name(&plan.parameter.name).as_str() {
    "_" => "value".to_string(),
    ident => ident.to_string(),
  };
  let ident = ensure_unique(&base, taken);
  taken.insert(ident.clone());
  Argument {
    plan,
    ident: format_ident!("{}", ident),
  }
}

/// The request path, expanding template variables in template order.
fn path_expr(operation: &Operation, path_args: &[Argument<'_>]) -> TokenStream {
  if path_args.is_empty() {
    let raw = operation.path.as_str();
    return quote! { #raw };
  }

  let mut template = String::new();
  let mut values = vec![];
  let mut args = path_args.iter();
  for segment in operation.path.segments() {
    match segment {
      PathSegment::Literal(text) => template.push_str(&text.replace('{', "{{").replace('}', "}}")),
      PathSegment::Param(_) => {
        template.push_str("{}");
        if let Some(arg) = args.next() {
          let ident = &arg.ident;
          let wire = &arg.plan.parameter.name;
          let rule = rule_tokens(arg.plan.rule);
          values.push(quote! { support::params::path_segment(#wire, #rule, &#ident)? });
        }
      }
    }
  }
  quote! { &format!(#template, #(#values),*) }
}

fn body_statement(body: &RequestBody, ident: &Ident) -> TokenStream {
  let content_type = &body.content_type;
  let attach = match body.category {
    ContentCategory::Json => quote! { support::ClientCore::json_body(request, &#ident, #content_type)? },
    ContentCategory::FormUrlEncoded => quote! { support::ClientCore::form_body(request, &#ident)? },
    ContentCategory::Text => quote! { support::ClientCore::raw_body(request, #ident.to_owned(), #content_type) },
    ContentCategory::Binary => quote! { support::ClientCore::raw_body(request, #ident.to_vec(), #content_type) },
  };

  if body.required && !body.ty.nullable {
    quote! { let request = #attach; }
  } else {
    quote! {
      let request = match #ident {
        Some(#ident) => #attach,
        None => request,
      };
    }
  }
}

fn rule_tokens(rule: WireRule) -> TokenStream {
  match rule {
    WireRule::Pairs(rule) => {
      let rule = match rule {
        PairRule::Single => quote! { Single },
        PairRule::RepeatKey => quote! { RepeatKey },
        PairRule::Join(delimiter) => {
          let delimiter = delimiter_tokens(delimiter);
          quote! { Join(#delimiter) }
        }
        PairRule::ObjectEntries => quote! { ObjectEntries },
        PairRule::ObjectJoin(delimiter) => {
          let delimiter = delimiter_tokens(delimiter);
          quote! { ObjectJoin(#delimiter) }
        }
        PairRule::DeepObject => quote! { DeepObject },
      };
      quote! { support::PairRule::#rule }
    }
    WireRule::Segment(rule) => {
      let (style, explode) = match rule {
        SegmentRule::Simple { explode } => (quote! { Simple }, explode),
        SegmentRule::Label { explode } => (quote! { Label }, explode),
        SegmentRule::Matrix { explode } => (quote! { Matrix }, explode),
      };
      quote! { support::SegmentRule::#style { explode: #explode } }
    }
  }
}

fn delimiter_tokens(delimiter: Delimiter) -> TokenStream {
  match delimiter {
    Delimiter::Comma => quote! { support::Delimiter::Comma },
    Delimiter::Space => quote! { support::Delimiter::Space },
    Delimiter::Pipe => quote! { support::Delimiter::Pipe },
  }
}

fn method_docs(operation: &Operation, path_args: &[Argument<'_>], other_args: &[Argument<'_>]) -> Vec<String> {
  let mut lines = doc_lines(operation.summary.as_deref().into_iter().chain(operation.docs.as_deref()));
  if !lines.is_empty() {
    lines.push(String::new());
  }
  lines.push(format!("`{} {}`", operation.method, operation.path));

  let described: Vec<String> = path_args
    .iter()
    .chain(other_args)
    .filter_map(|arg| {
      let docs = arg.plan.parameter.docs.as_deref()?;
      let summary = docs.lines().next().unwrap_or_default().trim();
      Some(format!("- `{}`: {summary}", arg.ident))
    })
    .collect();
  if !described.is_empty() {
    lines.push(String::new());
    lines.push("# Arguments".to_string());
    lines.push(String::new());
    lines.extend(described);
  }

  let errors: Vec<String> = operation
    .responses
    .iter()
    .filter(|response| !response.status.is_success())
    .map(|response| match response.docs.as_deref().and_then(|docs| docs.lines().next()) {
      Some(summary) => format!("- `{}`: {}", response.status, summary.trim()),
      None => format!("- `{}`", response.status),
    })
    .collect();
  if !errors.is_empty() {
    lines.push(String::new());
    lines.push("# Errors".to_string());
    lines.push(String::new());
    lines.extend(errors);
  }
  lines
}
