//! AUTO-GENERATED CODE - DO NOT EDIT!
//!
//! Swagger Petstore (version 1.0.0)
//! Generated by `oas3-client-gen` for the `petstore` package.
//!
//! A sample API that uses a petstore as an example.
pub mod auth;
pub mod client;
pub mod errors;
pub mod models;
pub use self::{client::Client, errors::{ClientError, Result}};
