//! Body encoding strategies.
//!
//! Each strategy wraps one caller supplied fragment and produces statements
//! that leave a `body` binding and push exactly one `Content-Type` onto
//! `headers`. Which strategy applies is decided by the binding resolver, the
//! renderers here never look at message contents.

use quote::quote;

use crate::error::Result;
use crate::fragment;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyEncoding {
    /// No body.
    None,
    /// Fragment populates `body_forms`, a `Params` accumulator.
    Form,
    /// Fragment writes parts through `body_forms`, a multipart writer.
    Multipart,
    /// Fragment is an expression serialized with `serde_json`.
    Json,
    /// Fragment is an expression already holding the body bytes.
    Bytes,
}

impl BodyEncoding {
    /// Content type sent with bodies of this encoding.
    ///
    /// Raw bytes are sent as `application/json`.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Form => Some(FORM_CONTENT_TYPE),
            Self::Multipart => Some(MULTIPART_CONTENT_TYPE),
            Self::Json | Self::Bytes => Some(JSON_CONTENT_TYPE),
        }
    }

    /// Render body statements around `fragment`.
    pub fn render(&self, fragment: &str, rt: &syn::Path) -> Result<String> {
        let tokens = match self {
            Self::None => return Ok(String::new()),
            Self::Form => form(fragment, rt)?,
            Self::Multipart => multipart(fragment, rt)?,
            Self::Json => json(fragment, rt)?,
            Self::Bytes => bytes(fragment, rt)?,
        };

        tracing::debug!(encoding = ?self, "rendered body");

        Ok(tokens.to_string())
    }
}

impl std::str::FromStr for BodyEncoding {
    type Err = ParseEncodingError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "form" | FORM_CONTENT_TYPE => Ok(Self::Form),
            "multipart" | MULTIPART_CONTENT_TYPE => Ok(Self::Multipart),
            "json" | JSON_CONTENT_TYPE => Ok(Self::Json),
            "bytes" => Ok(Self::Bytes),
            _ => Err(ParseEncodingError),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseEncodingError;

impl std::fmt::Display for ParseEncodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("unknown or unsupported body encoding")
    }
}

impl std::error::Error for ParseEncodingError {}

fn form(fragment: &str, rt: &syn::Path) -> Result<proc_macro2::TokenStream> {
    let stmts = fragment::stmts(fragment, "form body fragment")?;

    Ok(quote! {
        let mut body_forms = #rt::Params::new();
        #(#stmts)*
        let body = #rt::Body::from(body_forms.encode());
        headers.push(("Content-Type", ::std::string::String::from(#FORM_CONTENT_TYPE)));
    })
}

/// The writer lives in its own block and hands its form over on every way out
/// of the fragment, `?` included.
fn multipart(fragment: &str, rt: &syn::Path) -> Result<proc_macro2::TokenStream> {
    let stmts = fragment::stmts(fragment, "multipart body fragment")?;

    Ok(quote! {
        let mut body_form = ::std::option::Option::None;
        {
            let mut body_forms = #rt::multipart::Writer::new(&mut body_form);
            #(#stmts)*
        }
        let encoded = #rt::multipart::encode(body_form.unwrap_or_default()).await?;
        let body = encoded.body;
        headers.push(("Content-Type", encoded.content_type));
    })
}

fn json(fragment: &str, rt: &syn::Path) -> Result<proc_macro2::TokenStream> {
    let expr = fragment::expr(fragment, "json body fragment")?;

    Ok(quote! {
        let bs = #rt::serde_json::to_vec(&#expr).map_err(#rt::ClientError::Encode)?;
        let body = #rt::Body::from(bs);
        headers.push(("Content-Type", ::std::string::String::from(#JSON_CONTENT_TYPE)));
    })
}

fn bytes(fragment: &str, rt: &syn::Path) -> Result<proc_macro2::TokenStream> {
    let expr = fragment::expr(fragment, "bytes body fragment")?;

    Ok(quote! {
        let body = #rt::Body::from((#expr).clone());
        headers.push(("Content-Type", ::std::string::String::from(#JSON_CONTENT_TYPE)));
    })
}
