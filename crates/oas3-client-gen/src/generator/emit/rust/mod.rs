//! Rust backend: one module per concern, rendered through `quote` and
//! formatted with `prettyplease`.

use proc_macro2::TokenStream;
use quote::quote;
use strum::{Display, EnumString};

mod auth;
mod client;
mod models;
mod module;
mod types;

use super::{Artifacts, Backend, ClientIr};
use crate::error::{GenerationError, Result};

/// Visibility of every generated item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Visibility {
  #[default]
  Public,
  Crate,
}

impl Visibility {
  #[must_use]
  pub fn parse(s: &str) -> Option<Self> {
    s.parse().ok()
  }

  pub(crate) fn to_tokens(self) -> TokenStream {
    match self {
      Visibility::Public => quote! { pub },
      Visibility::Crate => quote! { pub(crate) },
    }
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RustBackend {
  visibility: Visibility,
}

impl RustBackend {
  #[must_use]
  pub fn new(visibility: Visibility) -> Self {
    Self { visibility }
  }
}

impl Backend for RustBackend {
  fn name(&self) -> &'static str {
    "rust"
  }

  #[tracing::instrument(skip_all, name = "render", fields(backend = "rust"))]
  fn render(&self, ir: &ClientIr) -> Result<Artifacts> {
    let vis = self.visibility;
    let mut artifacts = Artifacts::default();

    artifacts.insert("models.rs", unparse("models.rs", models::render(ir, vis)?)?);
    artifacts.insert("client.rs", unparse("client.rs", client::render(ir, vis)?)?);
    artifacts.insert("errors.rs", unparse("errors.rs", module::render_errors(vis))?);
    artifacts.insert("auth.rs", unparse("auth.rs", auth::render(ir, vis))?);
    artifacts.insert("mod.rs", unparse("mod.rs", module::render_mod(ir, vis))?);

    tracing::debug!(files = artifacts.len(), "rendered rust client");
    Ok(artifacts)
  }
}

fn unparse(artifact: &str, code: TokenStream) -> Result<String> {
  let tree: syn::File = syn::parse2(code).map_err(|err| GenerationError::emission(artifact, err.to_string()))?;
  Ok(prettyplease::unparse(&tree))
}

/// Doc attributes for a block of free text. Bare code fences are marked as
/// `text` so rustdoc does not compile API examples as doctests.
pub(crate) fn doc_lines<'a>(blocks: impl IntoIterator<Item = &'a str>) -> Vec<String> {
  let mut lines = vec![];
  for block in blocks {
    if !lines.is_empty() {
      lines.push(String::new());
    }
    let mut in_fence = false;
    for line in block.trim().lines() {
      let line = line.trim_end();
      if line.trim_start().starts_with("```") {
        let fence = line.trim_start();
        if !in_fence && fence == "```" {
          lines.push(format!("{line}text"));
        } else {
          lines.push(line.to_string());
        }
        in_fence = !in_fence;
      } else {
        lines.push(line.to_string());
      }
    }
  }
  lines
}

pub(crate) fn docs(lines: &[String]) -> TokenStream {
  let attrs = lines.iter().map(|line| {
    let text = if line.is_empty() { String::new() } else { format!(" {line}") };
    quote! { #[doc = #text] }
  });
  quote! { #(#attrs)* }
}

pub(crate) fn inner_docs(lines: &[String]) -> TokenStream {
  let attrs = lines.iter().map(|line| {
    let text = if line.is_empty() { String::new() } else { format!(" {line}") };
    quote! { #![doc = #text] }
  });
  quote! { #(#attrs)* }
}
