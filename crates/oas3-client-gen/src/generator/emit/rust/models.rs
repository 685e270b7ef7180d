use std::collections::BTreeSet;

use itertools::Itertools;
use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};

use super::{Visibility, doc_lines, docs, inner_docs, types::TypeRenderer};
use crate::{
  error::{GenerationError, Result},
  generator::{
    emit::ClientIr,
    types::model::{
      AliasDefinition, Definition, EnumDefinition, EnumValues, FieldDef, ModelDefinition, Tagging, VariantSet,
      VariantTag,
    },
  },
  naming::identifiers::{ensure_unique, to_field_name, to_type_name},
};

const SUPPORT_CRATE: &str = "oas3_client_gen_support";

pub(super) fn render(ir: &ClientIr, vis: Visibility) -> Result<TokenStream> {
  let header = inner_docs(&[format!("Types exchanged with the {} API.", ir.metadata.title)]);

  let mut items = Vec::with_capacity(ir.definitions.len());
  let mut uses_derive = false;
  for definition in &ir.definitions {
    let (item, derived) = match definition {
      Definition::Model(model) => model_item(model, vis)?,
      Definition::Enum(def) => (enum_item(def, vis), true),
      Definition::Alias(def) => alias_item(def, vis),
    };
    uses_derive |= derived;
    items.push(item);
  }

  let imports = if uses_derive {
    quote! { use serde::{Deserialize, Serialize}; }
  } else {
    quote! {}
  };

  Ok(quote! {
    #header
    #![allow(clippy::large_enum_variant)]

    #imports

    #(#items)*
  })
}

/// Returns the item and whether it relies on the serde derives.
fn model_item(model: &ModelDefinition, vis: Visibility) -> Result<(TokenStream, bool)> {
  match &model.variants {
    Some(variants) if model.fields.is_empty() && model.additional.is_none() => {
      Ok(union_item(model, variants, vis))
    }
    Some(_) => Err(GenerationError::emission(
      "models.rs",
      format!("model '{}' mixes properties with a union", model.name),
    )),
    None => Ok((struct_item(model, vis), true)),
  }
}

fn model_docs(model: &ModelDefinition) -> TokenStream {
  let bases = (!model.bases.is_empty())
    .then(|| format!("Composed from {}.", model.bases.iter().map(|base| format!("`{base}`")).join(", ")));
  docs(&doc_lines(model.docs.as_deref().into_iter().chain(bases.as_deref())))
}

fn struct_item(model: &ModelDefinition, vis: Visibility) -> TokenStream {
  let name = format_ident!("{}", model.name);
  let docs = model_docs(model);
  let vis = vis.to_tokens();
  let types = TypeRenderer::local();

  let mut taken = BTreeSet::new();
  let mut fields: Vec<TokenStream> = model
    .fields
    .iter()
    .map(|field| field_item(field, &vis, types, &mut taken))
    .collect();

  if let Some(additional) = &model.additional {
    let ident = format_ident!("{}", ensure_unique("additional_properties", &taken));
    let values = types.value(additional);
    fields.push(quote! {
      #[doc = " Properties not declared by the schema."]
      #[serde(flatten)]
      #vis #ident: std::collections::BTreeMap<String, #values>
    });
  }

  quote! {
    #docs
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #vis struct #name {
      #(#fields),*
    }
  }
}

fn field_item(field: &FieldDef, vis: &TokenStream, types: TypeRenderer, taken: &mut BTreeSet<String>) -> TokenStream {
  let ident_text = ensure_unique(&field_ident(&field.name), taken);
  taken.insert(ident_text.clone());
  let ident = format_ident!("{}", ident_text);

  let mut serde_attrs = vec![];
  if field.flatten {
    serde_attrs.push(quote! { flatten });
  } else {
    if ident_text.trim_start_matches("r#") != field.name {
      let wire = &field.name;
      serde_attrs.push(quote! { rename = #wire });
    }
    if !field.required {
      serde_attrs.push(quote! { default, skip_serializing_if = "Option::is_none" });
    }
  }
  let serde_attrs = if serde_attrs.is_empty() {
    quote! {}
  } else {
    quote! { #[serde(#(#serde_attrs),*)] }
  };

  let mut notes = vec![];
  if let Some(default) = &field.default {
    notes.push(format!("Defaults to `{default}`."));
  }
  if field.deprecated {
    notes.push("Deprecated.".to_string());
  }
  let notes = notes.join(" ");
  let docs = docs(&doc_lines(
    field.docs.as_deref().into_iter().chain((!notes.is_empty()).then_some(notes.as_str())),
  ));

  let ty = types.field(&field.ty, field.required || field.flatten);
  quote! {
    #docs
    #serde_attrs
    #vis #ident: #ty
  }
}

fn field_ident(name: &str) -> String {
  match to_field_name(name).as_str() {
    "_" => "field".to_string(),
    ident => ident.to_string(),
  }
}

fn union_item(model: &ModelDefinition, set: &VariantSet, vis: Visibility) -> (TokenStream, bool) {
  let name = format_ident!("{}", model.name);
  let docs = model_docs(model);
  let vis = vis.to_tokens();
  let types = TypeRenderer::local();

  match &set.tagging {
    Tagging::Discriminated { property } => {
      let support = format_ident!("{}", SUPPORT_CRATE);
      let variants = set.variants.iter().map(|variant| {
        let ident = format_ident!("{}", variant.name);
        let ty = types.value(&variant.ty);
        let value = match &variant.tag {
          VariantTag::Discriminator(value) => value.clone(),
          VariantTag::Position(_) => variant.name.clone(),
        };
        quote! { (#value, #ident(#ty)) }
      });
      let item = quote! {
        #support::discriminated_enum! {
          #docs
          #vis enum #name {
            discriminator: #property,
            variants: [
              #(#variants),*
            ],
          }
        }
      };
      (item, false)
    }
    Tagging::Positional => {
      let variants = set.variants.iter().map(|variant| {
        let ident = format_ident!("{}", variant.name);
        let ty = types.value(&variant.ty);
        quote! { #ident(#ty) }
      });
      let item = quote! {
        #docs
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(untagged)]
        #vis enum #name {
          #(#variants),*
        }
      };
      (item, true)
    }
  }
}

fn enum_item(def: &EnumDefinition, vis: Visibility) -> TokenStream {
  let name = format_ident!("{}", def.name);
  let docs = docs(&doc_lines(def.docs.as_deref()));
  let vis = vis.to_tokens();

  match &def.values {
    EnumValues::String(values) => {
      let idents = variant_idents(values.iter().map(String::as_str));
      let variants = values.iter().zip(&idents).map(|(value, ident)| {
        let rename = (ident != value).then(|| quote! { #[serde(rename = #value)] });
        let ident = format_ident!("{}", ident);
        quote! { #rename #ident }
      });
      let arms = values.iter().zip(&idents).map(|(value, ident)| {
        let ident = format_ident!("{}", ident);
        quote! { Self::#ident => #value }
      });

      quote! {
        #docs
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #vis enum #name {
          #(#variants),*
        }

        impl #name {
          /// Value as it appears on the wire.
          #vis fn as_str(self) -> &'static str {
            match self {
              #(#arms),*
            }
          }
        }

        impl std::fmt::Display for #name {
          fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.as_str())
          }
        }
      }
    }
    EnumValues::Integer(values) => {
      let labels: Vec<String> = values.iter().map(|&value| integer_label(value)).collect();
      let idents = variant_idents(labels.iter().map(String::as_str));
      let idents: Vec<_> = idents.iter().map(|ident| format_ident!("{}", ident)).collect();
      let literals: Vec<TokenStream> = values.iter().map(|&value| integer_literal(value)).collect();
      let unknown = format!("unknown {} value {{other}}", def.name);

      quote! {
        #docs
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        #vis enum #name {
          #(#idents),*
        }

        impl From<#name> for i64 {
          fn from(value: #name) -> Self {
            match value {
              #(#name::#idents => #literals),*
            }
          }
        }

        impl TryFrom<i64> for #name {
          type Error = String;

          fn try_from(value: i64) -> Result<Self, Self::Error> {
            match value {
              #(#literals => Ok(Self::#idents),)*
              other => Err(format!(#unknown)),
            }
          }
        }
      }
    }
  }
}

fn variant_idents<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
  let mut taken = BTreeSet::new();
  values
    .map(|value| {
      let ident = ensure_unique(&to_type_name(value), &taken);
      taken.insert(ident.clone());
      ident
    })
    .collect()
}

fn integer_label(value: i64) -> String {
  if value < 0 {
    format!("value_minus_{}", value.unsigned_abs())
  } else {
    format!("value_{value}")
  }
}

fn integer_literal(value: i64) -> TokenStream {
  let literal = Literal::u64_unsuffixed(value.unsigned_abs());
  if value < 0 {
    quote! { -#literal }
  } else {
    quote! { #literal }
  }
}

/// Returns the item and whether it relies on the serde derives.
fn alias_item(def: &AliasDefinition, vis: Visibility) -> (TokenStream, bool) {
  let name = format_ident!("{}", def.name);
  let docs = docs(&doc_lines(def.docs.as_deref()));
  let vis = vis.to_tokens();
  let ty = TypeRenderer::local().value(&def.ty);

  if def.forward_declared {
    let item = quote! {
      #docs
      #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
      #[serde(transparent)]
      #vis struct #name(#vis #ty);
    };
    (item, true)
  } else {
    (quote! { #docs #vis type #name = #ty; }, false)
  }
}

