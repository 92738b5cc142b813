//! # `protoapi_codegen`
//!
//! Generates Rust HTTP clients for RPC services annotated with HTTP rules
//! (`google.api.http`). Generated modules depend on the `protoapi` runtime
//! crate.
//!
//! The pipeline has three stages:
//!
//! 1. [`binding`] classifies request fields into path, query and body and
//!    renders the route, query and body fragments of each method;
//! 2. [`request`] turns those fragments into a method body;
//! 3. [`frame`] assembles traits, client types and constructors of every
//!    service into one module.
//!
//! [`plugin::generate`] runs all three for a set of files.
//!
//! ```ignore
//! // build.rs
//! let files = protoapi_codegen::generate(&descriptors, &Config::default())?;
//! for file in files {
//!     std::fs::write(out_dir.join(&file.name), file.content)?;
//! }
//! ```

pub mod binding;
pub mod body;
pub mod config;
pub mod data;
pub mod error;
pub mod frame;
mod fragment;
pub mod names;
pub mod plugin;
pub mod request;

pub use binding::{
    resolve, resolve_file, FieldKind, FileDescriptor, HttpRule, MessageField, MethodDescriptor,
    ServiceDescriptor,
};
pub use body::BodyEncoding;
pub use config::{BindingOptions, Config};
pub use data::{CodeData, FileData, Method, Service, Verb};
pub use error::{Error, Result};
pub use frame::build_frame;
pub use plugin::{generate, GeneratedFile};
pub use request::build_request_code;
