use std::fmt::Debug;
use std::sync::Arc;

use crate::context::CallContext;
use crate::error::Result;
use crate::hook::{Decode, JsonResponse, RequestHook, ResponseHook, SendRequest};
use crate::request::{Request, Response};

/// Configuration of a generated client.
///
/// Built once when the client is constructed and never mutated afterwards.
/// Each call works on a copy merged with its per-call overrides, so calls
/// sharing a client never race on configuration.
#[derive(Clone)]
pub struct Options {
    addr: String,
    client: reqwest::Client,
    request_hook: Arc<dyn RequestHook>,
    response_hook: Arc<dyn ResponseHook>,
}

impl Options {
    /// Apply `opts` in order on top of the defaults.
    pub fn new(opts: impl IntoIterator<Item = ClientOption>) -> Self {
        let mut options = Self::default();
        for opt in opts {
            opt.apply(&mut options);
        }
        options
    }

    /// Copy of these options with per-call `overrides` applied in order.
    pub fn merged(&self, overrides: &[ClientOption]) -> Self {
        let mut options = self.clone();
        for opt in overrides {
            opt.apply(&mut options);
        }
        options
    }

    /// Base address, without trailing slash. Empty until configured.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn set_addr(&mut self, addr: impl Into<String>) {
        let addr = addr.into();
        self.addr = addr.trim_end_matches('/').to_owned();
    }

    /// Transport handed to the request hook.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub async fn do_request(
        &self,
        ctx: &CallContext,
        client: &reqwest::Client,
        req: Request,
    ) -> Result<Response> {
        self.request_hook.execute(ctx, client, req).await
    }

    pub async fn do_response(
        &self,
        ctx: &CallContext,
        resp: Response,
        out: &mut dyn Decode,
    ) -> Result<()> {
        self.response_hook.decode(ctx, resp, out).await
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            addr: String::new(),
            client: reqwest::Client::new(),
            request_hook: Arc::new(SendRequest),
            response_hook: Arc::new(JsonResponse),
        }
    }
}

impl Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("addr", &self.addr)
            .finish_non_exhaustive()
    }
}

/// A single configuration change, applied to [`Options`] in call order.
#[derive(Clone)]
pub struct ClientOption(Arc<dyn Fn(&mut Options) + Send + Sync>);

impl ClientOption {
    pub fn new(apply: impl Fn(&mut Options) + Send + Sync + 'static) -> Self {
        Self(Arc::new(apply))
    }

    pub fn apply(&self, options: &mut Options) {
        (self.0)(options)
    }
}

impl Debug for ClientOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ClientOption")
    }
}

/// Override the base address.
pub fn with_addr(addr: impl Into<String>) -> ClientOption {
    let addr = addr.into();
    ClientOption::new(move |options| options.set_addr(addr.clone()))
}

/// Override the transport.
pub fn with_client(client: reqwest::Client) -> ClientOption {
    ClientOption::new(move |options| options.client = client.clone())
}

/// Override the function executing built requests.
pub fn with_request_hook(hook: impl RequestHook + 'static) -> ClientOption {
    let hook: Arc<dyn RequestHook> = Arc::new(hook);
    ClientOption::new(move |options| options.request_hook = hook.clone())
}

/// Override the function decoding raw responses.
pub fn with_response_hook(hook: impl ResponseHook + 'static) -> ClientOption {
    let hook: Arc<dyn ResponseHook> = Arc::new(hook);
    ClientOption::new(move |options| options.response_hook = hook.clone())
}
