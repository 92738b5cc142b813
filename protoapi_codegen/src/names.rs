use quote::format_ident;

use crate::error::{Error, Result};

/// Names of items generated for one service.
pub struct Names {
    trait_id: syn::Ident,
    client_id: syn::Ident,
    constructor_id: syn::Ident,
}

impl Names {
    pub fn new(service: &str) -> Result<Self> {
        let service_id = ident(service)?;

        let trait_id = format_ident!("{}Service", service_id);
        let client_id = format_ident!("{}ServiceClient", service_id);

        let constructor_id = {
            let snake = stringcase::snake_case(&format!("{service}Service"));
            format_ident!("new_{}", snake)
        };

        Ok(Self {
            trait_id,
            client_id,
            constructor_id,
        })
    }

    pub fn trait_id(&self) -> &syn::Ident {
        &self.trait_id
    }

    pub fn client_id(&self) -> &syn::Ident {
        &self.client_id
    }

    pub fn constructor_id(&self) -> &syn::Ident {
        &self.constructor_id
    }
}

/// Parse `name` as an identifier, falling back to a raw identifier for keywords.
pub fn ident(name: &str) -> Result<syn::Ident> {
    syn::parse_str::<syn::Ident>(name)
        .or_else(|_| syn::parse_str::<syn::Ident>(&format!("r#{name}")))
        .map_err(|_| Error::InvalidIdent(name.to_owned()))
}

/// Snake case method identifier for an RPC method name.
pub fn method_id(name: &str) -> Result<syn::Ident> {
    ident(&stringcase::snake_case(name))
}

/// Module name for a package, e.g. `library.v1` to `library_v1`.
pub fn module_name(package: &str) -> String {
    package.replace(['.', '-'], "_")
}

/// Rust path of a fully qualified message name, relative to the parent of the
/// module generated for `package`.
///
/// Messages of `package` are referenced by name. Nested messages and messages
/// of other packages follow the layout of `prost`: outer messages become
/// snake case modules, package components are kept.
pub fn type_path(full_name: &str, package: &str) -> String {
    let name = full_name.trim_start_matches('.');
    let local = (!package.is_empty())
        .then(|| name.strip_prefix(package).and_then(|rest| rest.strip_prefix('.')))
        .flatten()
        .unwrap_or(name);

    let mut parts: Vec<String> = local.split('.').map(str::to_owned).collect();
    let last = parts.len() - 1;

    for part in &mut parts[..last] {
        if part.starts_with(char::is_uppercase) {
            *part = stringcase::snake_case(part);
        }
    }

    parts.join("::")
}

/// Parse a type name produced by [`type_path`].
pub fn parse_type(name: &str) -> Result<syn::Type> {
    syn::parse_str(name).map_err(|_| Error::InvalidType(name.to_owned()))
}
