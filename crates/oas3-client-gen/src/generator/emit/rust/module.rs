use proc_macro2::TokenStream;
use quote::quote;

use super::{Visibility, doc_lines, inner_docs};
use crate::generator::emit::ClientIr;

pub(super) fn render_errors(vis: Visibility) -> TokenStream {
  let header = inner_docs(&["Errors returned by client calls.".to_string()]);
  let vis = vis.to_tokens();

  quote! {
    #header

    #vis use oas3_client_gen_support::{ApiError, ClientError, ErrorBody, TransportError};

    /// Result of every client call.
    #vis type Result<T, E = ClientError> = std::result::Result<T, E>;

    /// Decodes the JSON body of a non-2xx response into one of the declared
    /// error models. Returns `None` when the body is not JSON or has another
    /// shape.
    #vis fn error_body<T: serde::de::DeserializeOwned>(error: &ApiError) -> Option<T> {
      match &error.body {
        ErrorBody::Json(value) => serde_json::from_value(value.clone()).ok(),
        ErrorBody::Text(_) | ErrorBody::Empty => None,
      }
    }
  }
}

/// The module root: generation header, submodules and the main re-exports.
pub(super) fn render_mod(ir: &ClientIr, vis: Visibility) -> TokenStream {
  let meta = &ir.metadata;
  let mut lines = vec![
    "AUTO-GENERATED CODE - DO NOT EDIT!".to_string(),
    String::new(),
    format!("{} (version {})", meta.title, meta.version),
    format!("Generated by `oas3-client-gen` for the `{}` package.", ir.package_name),
  ];
  if let Some(description) = &meta.description {
    lines.push(String::new());
    lines.extend(doc_lines([description.as_str()]));
  }
  let header = inner_docs(&lines);
  let vis = vis.to_tokens();

  quote! {
    #header

    #vis mod auth;
    #vis mod client;
    #vis mod errors;
    #vis mod models;

    #vis use self::{
      client::Client,
      errors::{ClientError, Result},
    };
  }
}
