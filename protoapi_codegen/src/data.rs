//! Inputs of the file and method renderers.
//!
//! Everything here is plain data computed ahead of rendering: names, type
//! names and Rust source fragments. Renderers never look further than these
//! records.

use quote::quote;

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileData {
    /// Generator version written into the header banner.
    pub version: String,
    /// Source file the services were declared in.
    pub source: String,
    /// Name of the generated module.
    pub package: String,
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub name: String,
    /// Package the fallback base address is derived from (`https://{package}`).
    pub package: String,
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub comment: String,
    /// Request type, relative to the parent of the generated module.
    pub req_type: String,
    /// Response type, relative to the parent of the generated module.
    pub res_type: String,
    /// Rendered method body, see [`crate::request::build_request_code`].
    pub req_code: String,
}

/// Fragments making up one method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeData {
    pub service: String,
    pub verb: Verb,
    /// Statements leaving the fully substituted URL in `raw_url`.
    pub route: String,
    /// Statements populating `params`. May be empty.
    pub query: String,
    /// Statements leaving `body` and pushing the content type onto
    /// `headers`. Empty when the request has no body.
    pub body: String,
}

/// HTTP method of a binding rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Runtime constant for this verb.
    pub(crate) fn to_tokens(self, rt: &syn::Path) -> proc_macro2::TokenStream {
        let id = quote::format_ident!("{}", self.as_str());
        quote! { #rt::Method::#id }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Verb {
    type Err = ParseVerbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get" | "GET" => Ok(Self::Get),
            "post" | "POST" => Ok(Self::Post),
            "put" | "PUT" => Ok(Self::Put),
            "patch" | "PATCH" => Ok(Self::Patch),
            "delete" | "DELETE" => Ok(Self::Delete),
            _ => Err(ParseVerbError),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseVerbError;

impl std::fmt::Display for ParseVerbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("unknown or unsupported HTTP method")
    }
}

impl std::error::Error for ParseVerbError {}
