//! # `protoapi`: runtime for generated HTTP clients
//!
//! `protoapi_codegen` turns RPC services annotated with HTTP rules into Rust
//! client modules. Every generated module depends on this crate, and only
//! through fully qualified `::protoapi::` paths.
//!
//! ## What generated code relies on
//!
//! * [`Options`] and [`ClientOption`]: configuration fixed when a client is
//!   constructed (base address, transport, hooks), optionally overridden per call.
//! * [`RequestHook`] and [`ResponseHook`]: the only extension points. Auth,
//!   retries and tracing are injected here, generated code calls the hooks
//!   unconditionally.
//! * [`CallContext`]: deadline and cancellation of a single call.
//! * [`Params`] and [`multipart::Writer`]: body and query accumulators the
//!   generated fragments populate from request fields.
//!
//! ## Example
//!
//! ```ignore
//! let shelves = library_v1::new_shelves_service([protoapi::with_addr("http://localhost:8080")]);
//! let shelf = shelves
//!     .get_shelf(&CallContext::background(), &GetShelfRequest { shelf: "1".into() }, &[])
//!     .await?;
//! ```

mod context;
mod error;
pub mod hook;
pub mod multipart;
mod options;
mod params;
mod request;

pub use async_trait::async_trait;
pub use paths;
pub use reqwest;
pub use serde;
pub use serde_json;
pub use tokio_util::sync::CancellationToken;

pub use context::CallContext;
pub use error::{ClientError, Result};
pub use hook::{Decode, JsonResponse, RequestHook, ResponseHook, SendRequest};
pub use options::{
    with_addr, with_client, with_request_hook, with_response_hook, ClientOption, Options,
};
pub use params::Params;
pub use request::{header_value, new_request, Body, Method, Request, Response};
