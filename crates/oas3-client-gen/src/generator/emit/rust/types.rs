use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::generator::types::model::{Primitive, TypeRef, TypeTarget};

/// Spells out [`TypeRef`]s, optionally qualifying named types with the
/// `models` module.
#[derive(Debug, Clone, Copy)]
pub(super) struct TypeRenderer {
  qualified: bool,
}

impl TypeRenderer {
  /// For code inside `models.rs`.
  pub(super) const fn local() -> Self {
    Self { qualified: false }
  }

  /// For code that reaches the models through `super::models`.
  pub(super) const fn qualified() -> Self {
    Self { qualified: true }
  }

  pub(super) fn name(self, name: &str) -> TokenStream {
    let ident = format_ident!("{}", name);
    if self.qualified {
      quote! { models::#ident }
    } else {
      quote! { #ident }
    }
  }

  /// A stored value, such as an alias target or union payload.
  pub(super) fn value(self, ty: &TypeRef) -> TokenStream {
    self.wrapped(ty, true)
  }

  /// A struct field. Optional fields become `Option`, as do nullable ones.
  pub(super) fn field(self, ty: &TypeRef, required: bool) -> TokenStream {
    let inner = self.target(ty, true);
    if required && !ty.nullable {
      inner
    } else {
      quote! { Option<#inner> }
    }
  }

  /// What a client method hands back. Cycles are irrelevant at the top level.
  pub(super) fn returned(self, ty: &TypeRef) -> TokenStream {
    self.wrapped(ty, false)
  }

  /// A method argument, borrowed where the value is not `Copy`.
  pub(super) fn argument(self, ty: &TypeRef, required: bool) -> TokenStream {
    let base = match &ty.target {
      TypeTarget::Primitive(Primitive::String) => quote! { &str },
      TypeTarget::Primitive(Primitive::Bytes) => quote! { &[u8] },
      TypeTarget::Primitive(primitive) => primitive_tokens(*primitive),
      TypeTarget::Array(items) => {
        let items = self.wrapped(items, false);
        quote! { &[#items] }
      }
      TypeTarget::Named { .. } | TypeTarget::Any | TypeTarget::Map(_) => {
        let target = self.target(ty, false);
        quote! { &#target }
      }
    };
    if required && !ty.nullable {
      base
    } else {
      quote! { Option<#base> }
    }
  }

  fn wrapped(self, ty: &TypeRef, boxed: bool) -> TokenStream {
    let target = self.target(ty, boxed);
    if ty.nullable {
      quote! { Option<#target> }
    } else {
      target
    }
  }

  /// `boxed` allows an indirect reference to be boxed; collections already
  /// store their items on the heap.
  fn target(self, ty: &TypeRef, boxed: bool) -> TokenStream {
    match &ty.target {
      TypeTarget::Named { name, indirect } => {
        let path = self.name(name);
        if *indirect && boxed {
          quote! { Box<#path> }
        } else {
          path
        }
      }
      TypeTarget::Primitive(primitive) => primitive_tokens(*primitive),
      TypeTarget::Any => quote! { serde_json::Value },
      TypeTarget::Array(items) => {
        let items = self.wrapped(items, false);
        quote! { Vec<#items> }
      }
      TypeTarget::Map(values) => {
        let values = self.wrapped(values, false);
        quote! { std::collections::BTreeMap<String, #values> }
      }
    }
  }
}

pub(super) fn primitive_tokens(primitive: Primitive) -> TokenStream {
  match primitive {
    Primitive::String => quote! { String },
    Primitive::I32 => quote! { i32 },
    Primitive::I64 => quote! { i64 },
    Primitive::F32 => quote! { f32 },
    Primitive::F64 => quote! { f64 },
    Primitive::Bool => quote! { bool },
    Primitive::Null => quote! { () },
    Primitive::Bytes => quote! { Vec<u8> },
  }
}

/// Whether `ty` mentions a declared type anywhere.
pub(super) fn mentions_named(ty: &TypeRef) -> bool {
  match &ty.target {
    TypeTarget::Named { .. } => true,
    TypeTarget::Array(inner) | TypeTarget::Map(inner) => mentions_named(inner),
    TypeTarget::Primitive(_) | TypeTarget::Any => false,
  }
}
