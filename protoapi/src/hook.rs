//! Request execution and response decoding hooks.
//!
//! Generated methods build a [`Request`] and hand it to the configured
//! [`RequestHook`], then pass the raw [`Response`] to the configured
//! [`ResponseHook`]. Both hooks get the call's [`CallContext`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::context::CallContext;
use crate::error::{ClientError, Result};
use crate::request::{Request, Response};

/// Executes a built request against a transport.
#[async_trait]
pub trait RequestHook: Send + Sync {
    async fn execute(
        &self,
        ctx: &CallContext,
        client: &reqwest::Client,
        req: Request,
    ) -> Result<Response>;
}

/// Decodes a raw response into the typed response value.
#[async_trait]
pub trait ResponseHook: Send + Sync {
    async fn decode(&self, ctx: &CallContext, resp: Response, out: &mut dyn Decode) -> Result<()>;
}

/// Response values a [`ResponseHook`] can populate.
pub trait Decode: Send {
    fn decode_json(&mut self, bytes: &[u8]) -> serde_json::Result<()>;
}

impl<T: DeserializeOwned + Send> Decode for T {
    fn decode_json(&mut self, bytes: &[u8]) -> serde_json::Result<()> {
        *self = serde_json::from_slice(bytes)?;
        Ok(())
    }
}

/// Default request hook: sends through the client, honoring the context.
#[derive(Debug, Clone, Copy, Default)]
pub struct SendRequest;

#[async_trait]
impl RequestHook for SendRequest {
    async fn execute(
        &self,
        ctx: &CallContext,
        client: &reqwest::Client,
        req: Request,
    ) -> Result<Response> {
        let method = req.method().clone();
        let url = req.url().clone();
        tracing::debug!(%method, %url, "sending request");

        let resp = ctx
            .run(async { client.execute(req).await.map_err(ClientError::from) })
            .await?;

        tracing::debug!(%method, %url, status = resp.status().as_u16(), "received response");

        Ok(resp)
    }
}

/// Default response hook.
///
/// Non-success statuses become [`ClientError::Status`], an empty body leaves
/// the target untouched, anything else is decoded as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResponse;

#[async_trait]
impl ResponseHook for JsonResponse {
    async fn decode(&self, ctx: &CallContext, resp: Response, out: &mut dyn Decode) -> Result<()> {
        let status = resp.status();
        let bytes = ctx
            .run(async { resp.bytes().await.map_err(ClientError::from) })
            .await?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        if bytes.is_empty() {
            return Ok(());
        }

        out.decode_json(&bytes).map_err(ClientError::Decode)
    }
}
