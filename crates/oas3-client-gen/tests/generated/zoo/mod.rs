//! AUTO-GENERATED CODE - DO NOT EDIT!
//!
//! Zoo (version 2.1.0)
//! Generated by `oas3-client-gen` for the `zoo` package.
pub mod auth;
pub mod client;
pub mod errors;
pub mod models;
pub use self::{client::Client, errors::{ClientError, Result}};
