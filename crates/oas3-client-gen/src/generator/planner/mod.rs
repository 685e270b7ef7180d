//! Chooses how each parameter value is put on the wire.
//!
//! Planning is pure: the same `(location, style, explode, shape)` always
//! yields the same rule, and the rule is executed at runtime by the support
//! crate.

use oas3_client_gen_support::{Delimiter, PairRule, SegmentRule};


use crate::{
  error::{GenerationError, Result},
  generator::{
    loader::{
      document::{ParameterLocation, ParameterStyle},
      pointer::Pointer,
    },
    types::operation::{Operation, Parameter, ValueShape},
  },
};

/// The runtime rule for one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireRule {
  /// Query and cookie values expand into `(key, value)` pairs.
  Pairs(PairRule),
  /// Path and header values expand into a single string.
  Segment(SegmentRule),
}

/// A style that cannot carry the parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
  #[error("style '{style}' cannot serialize {shape} values")]
  Shape { style: ParameterStyle, shape: ValueShape },
  #[error("style '{style}' is not valid for {location} parameters")]
  Location {
    style: ParameterStyle,
    location: ParameterLocation,
  },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SerializationPlan {
  pub parameter: Parameter,
  pub rule: WireRule,
}

/// Maps a parameter's style to its wire rule, rejecting combinations that
/// OpenAPI does not define.
pub fn rule_for(
  location: ParameterLocation,
  style: ParameterStyle,
  explode: bool,
  shape: ValueShape,
) -> std::result::Result<WireRule, PlanError> {
  use ParameterLocation as L;
  use ParameterStyle as S;
  use ValueShape as V;

  let rule = match (location, style, shape) {
    (L::Query | L::Cookie, S::Form, V::Scalar) => WireRule::Pairs(PairRule::Single),
    (L::Query | L::Cookie, S::Form, V::Array) if explode => WireRule::Pairs(PairRule::RepeatKey),
    (L::Query | L::Cookie, S::Form, V::Array) => WireRule::Pairs(PairRule::Join(Delimiter::Comma)),
    (L::Query | L::Cookie, S::Form, V::Object) if explode => WireRule::Pairs(PairRule::ObjectEntries),
    (L::Query | L::Cookie, S::Form, V::Object) => WireRule::Pairs(PairRule::ObjectJoin(Delimiter::Comma)),

    (L::Query, S::SpaceDelimited | S::PipeDelimited, V::Array) if explode => WireRule::Pairs(PairRule::RepeatKey),
    (L::Query, S::SpaceDelimited, V::Array) => WireRule::Pairs(PairRule::Join(Delimiter::Space)),
    (L::Query, S::PipeDelimited, V::Array) => WireRule::Pairs(PairRule::Join(Delimiter::Pipe)),
    (L::Query, S::SpaceDelimited, V::Object) if !explode => WireRule::Pairs(PairRule::ObjectJoin(Delimiter::Space)),
    (L::Query, S::PipeDelimited, V::Object) if !explode => WireRule::Pairs(PairRule::ObjectJoin(Delimiter::Pipe)),
    (L::Query, S::DeepObject, V::Object) => WireRule::Pairs(PairRule::DeepObject),

    (L::Path | L::Header, S::Simple, _) => WireRule::Segment(SegmentRule::Simple { explode }),
    (L::Path, S::Label, _) => WireRule::Segment(SegmentRule::Label { explode }),
    (L::Path, S::Matrix, _) => WireRule::Segment(SegmentRule::Matrix { explode }),

    (L::Query, S::SpaceDelimited | S::PipeDelimited | S::DeepObject, _) => {
      return Err(PlanError::Shape { style, shape });
    }
    _ => return Err(PlanError::Location { style, location }),
  };
  Ok(rule)
}

/// Plans one parameter of the operation declared at `source`.
pub fn plan(source: &Pointer, parameter: &Parameter) -> Result<SerializationPlan> {
  let rule = rule_for(parameter.location, parameter.style, parameter.explode, parameter.shape).map_err(|err| {
    GenerationError::unsupported(source.to_string(), format!("parameter '{}': {err}", parameter.name))
  })?;
  Ok(SerializationPlan {
    parameter: parameter.clone(),
    rule,
  })
}

/// Plans every parameter of `operation`, in declaration order.
pub fn plan_operation(operation: &Operation) -> Result<Vec<SerializationPlan>> {
  operation
    .parameters
    .iter()
    .map(|parameter| plan(&operation.source, parameter))
    .collect()
}
