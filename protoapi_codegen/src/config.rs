use quote::ToTokens;

use crate::body::BodyEncoding;
use crate::error::{Error, Result};

/// Generator configuration.
#[derive(Clone)]
pub struct Config {
    /// Path generated code reaches the runtime crate through.
    pub runtime: syn::Path,
    /// Body encoding used when neither options nor field shape pick one.
    pub default_encoding: BodyEncoding,
    /// Pretty-print output. Otherwise tokens are written as is.
    pub format: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runtime: syn::parse_quote!(::protoapi),
            default_encoding: BodyEncoding::Json,
            format: true,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("runtime", &self.runtime.to_token_stream().to_string())
            .field("default_encoding", &self.default_encoding)
            .field("format", &self.format)
            .finish()
    }
}

impl Config {
    /// Parse a comma-separated `key=value` plugin parameter, e.g.
    /// `runtime=crate::rt,encoding=form,format=false`.
    ///
    /// Keys not present keep their default.
    pub fn from_parameter(param: &str) -> Result<Self> {
        let mut config = Self::default();

        for pair in param.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| Error::InvalidParameter(pair.to_owned()))?;

            match key.trim() {
                "runtime" => {
                    config.runtime = syn::parse_str(value.trim())
                        .map_err(|source| Error::parse("runtime path", source))?;
                }
                "encoding" => {
                    config.default_encoding = value
                        .trim()
                        .parse()
                        .map_err(|_| Error::InvalidParameter(pair.to_owned()))?;
                }
                "format" => {
                    config.format = value
                        .trim()
                        .parse()
                        .map_err(|_| Error::InvalidParameter(pair.to_owned()))?;
                }
                _ => return Err(Error::InvalidParameter(pair.to_owned())),
            }
        }

        Ok(config)
    }
}

/// Binding options attached to a service or a method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindingOptions {
    /// Body encoding override.
    pub encoding: Option<BodyEncoding>,
}

impl BindingOptions {
    pub fn new(encoding: BodyEncoding) -> Self {
        Self {
            encoding: Some(encoding),
        }
    }

    /// Fill options not set here from `defaults`.
    pub fn merge(mut self, defaults: &Self) -> Self {
        self.encoding = self.encoding.or(defaults.encoding);

        self
    }
}
