use std::collections::BTreeSet;

use inflections::Inflect;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::{Visibility, doc_lines, docs, inner_docs};
use crate::{
  generator::emit::{AuthKind, ClientIr, SecurityScheme},
  naming::identifiers::{FORBIDDEN_IDENTIFIERS, ensure_unique, sanitize},
};

/// One constant per supported scheme, named after the scheme.
pub(super) fn render(ir: &ClientIr, vis: Visibility) -> TokenStream {
  let header = inner_docs(&["Security schemes declared by the API.".to_string()]);
  let vis = vis.to_tokens();

  let names = const_names(ir);
  let schemes = ir.security_schemes.iter().zip(&names).map(|(scheme, name)| {
    let ident = format_ident!("{}", name);
    let value = scheme_tokens(scheme);
    let docs = docs(&doc_lines(
      scheme.docs.as_deref().into_iter().chain([format!("Declared as `{}`.", scheme.name).as_str()]),
    ));
    quote! {
      #docs
      #vis const #ident: AuthScheme = #value;
    }
  });

  quote! {
    #header

    #vis use oas3_client_gen_support::{AuthScheme, Credential};

    #(#schemes)*
  }
}

fn scheme_tokens(scheme: &SecurityScheme) -> TokenStream {
  match &scheme.kind {
    AuthKind::Bearer => quote! { AuthScheme::Bearer },
    AuthKind::Basic => quote! { AuthScheme::Basic },
    AuthKind::ApiKeyHeader(name) => quote! { AuthScheme::ApiKeyHeader(#name) },
    AuthKind::ApiKeyQuery(name) => quote! { AuthScheme::ApiKeyQuery(#name) },
    AuthKind::ApiKeyCookie(name) => quote! { AuthScheme::ApiKeyCookie(#name) },
  }
}

/// Constant names for `ir.security_schemes`, in the same order.
pub(super) fn const_names(ir: &ClientIr) -> Vec<String> {
  let mut taken = BTreeSet::new();
  ir.security_schemes
    .iter()
    .map(|scheme| {
      let name = ensure_unique(&const_name(&scheme.name), &taken);
      taken.insert(name.clone());
      name
    })
    .collect()
}

/// `SCREAMING_SNAKE_CASE` form of a scheme name.
fn const_name(scheme: &str) -> String {
  let mut ident = sanitize(scheme).to_constant_case();
  if ident.is_empty() {
    ident = "SCHEME".to_string();
  }
  if ident.starts_with(|c: char| c.is_ascii_digit()) || FORBIDDEN_IDENTIFIERS.contains(ident.as_str()) {
    ident.insert(0, '_');
  }
  ident
}
