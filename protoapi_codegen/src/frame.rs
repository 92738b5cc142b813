//! Generated file assembly.
//!
//! One module per file: for every service a client trait, a private client
//! type holding the constructed options and a constructor returning the trait
//! object. Method bodies are the pre-rendered request code of each method.

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::quote;

use crate::config::Config;
use crate::data::{FileData, Method, Service};
use crate::error::{Error, Result};
use crate::fragment;
use crate::names::{self, Names};

pub const GENERATOR: &str = "protoc-gen-protoapi";

/// Render the complete source of one generated file.
///
/// Either the whole text is returned or nothing: the first malformed fragment
/// or name aborts the file.
#[tracing::instrument(skip_all, fields(source = %data.source))]
pub fn build_frame(data: &FileData, config: &Config) -> Result<String> {
    render(data, config).inspect_err(|err| tracing::error!(%err, "failed to render file"))
}

fn render(data: &FileData, config: &Config) -> Result<String> {
    let module_id = names::ident(&data.package)?;

    let mut scope = Scope::default();
    let services = data
        .services
        .iter()
        .map(|service| service_items(service, &config.runtime, &mut scope))
        .collect::<Result<Vec<_>>>()?;

    let tokens = quote! {
        pub mod #module_id {
            #![allow(unused_mut, unused_variables, clippy::all)]

            #[allow(unused_imports)]
            use super::*;

            #(#services)*
        }
    };

    let file: syn::File = syn::parse2(tokens.clone()).map_err(Error::Syntax)?;

    let code = if config.format {
        prettyplease::unparse(&file)
    } else {
        tokens.to_string()
    };

    Ok(format!("{}\n{}", header(data), code))
}

fn header(data: &FileData) -> String {
    format!(
        "// Code generated by {GENERATOR} (version={}). DO NOT EDIT.\n// source: {}\n",
        data.version, data.source
    )
}

/// Identifiers taken in one generated scope.
#[derive(Default)]
struct Scope(HashSet<String>);

impl Scope {
    fn claim(&mut self, id: &syn::Ident) -> Result<()> {
        let name = id.to_string();
        if self.0.insert(name.clone()) {
            Ok(())
        } else {
            Err(Error::DuplicateIdent(name))
        }
    }
}

fn service_items(service: &Service, rt: &syn::Path, scope: &mut Scope) -> Result<TokenStream> {
    let names = Names::new(&service.name)?;
    let trait_id = names.trait_id();
    let client_id = names.client_id();
    let constructor_id = names.constructor_id();

    for id in [trait_id, client_id, constructor_id] {
        scope.claim(id)?;
    }

    let trait_doc = format!(" Client API for {} service", service.name);
    let default_addr = format!("https://{}", service.package);

    let mut method_scope = Scope::default();
    let methods = service
        .methods
        .iter()
        .map(|method| MethodItems::new(method, rt, &mut method_scope))
        .collect::<Result<Vec<_>>>()?;

    let decls = methods.iter().map(|m| &m.decl);
    let impls = methods.iter().map(|m| &m.implementation);

    tracing::debug!(service = %service.name, methods = methods.len(), "rendered service");

    Ok(quote! {
        #[doc = #trait_doc]
        #[#rt::async_trait]
        pub trait #trait_id: ::std::marker::Send + ::std::marker::Sync {
            #(#decls)*
        }

        struct #client_id {
            opts: #rt::Options,
        }

        pub fn #constructor_id(
            opts: impl ::std::iter::IntoIterator<Item = #rt::ClientOption>,
        ) -> ::std::boxed::Box<dyn #trait_id> {
            let mut opt = #rt::Options::new(opts);
            if opt.addr().is_empty() {
                opt.set_addr(#default_addr);
            }

            ::std::boxed::Box::new(#client_id { opts: opt })
        }

        #[#rt::async_trait]
        impl #trait_id for #client_id {
            #(#impls)*
        }
    })
}

struct MethodItems {
    decl: TokenStream,
    implementation: TokenStream,
}

impl MethodItems {
    fn new(method: &Method, rt: &syn::Path, scope: &mut Scope) -> Result<Self> {
        let id = names::method_id(&method.name)?;
        scope.claim(&id)?;
        let req_ty = names::parse_type(&method.req_type)?;
        let res_ty = names::parse_type(&method.res_type)?;

        let what = format!("request code of `{}`", method.name);
        let body = fragment::stmts(&method.req_code, &what)?;

        let doc = if method.comment.trim().is_empty() {
            format!(" {}", method.name)
        } else {
            format!(" {} {}", method.name, method.comment.trim())
        };

        let sig = quote! {
            async fn #id(
                &self,
                ctx: &#rt::CallContext,
                req: &#req_ty,
                opts: &[#rt::ClientOption],
            ) -> #rt::Result<#res_ty>
        };

        Ok(Self {
            decl: quote! {
                #[doc = #doc]
                #sig;
            },
            implementation: quote! {
                #sig {
                    let mut res = <#res_ty as ::std::default::Default>::default();
                    #(#body)*
                }
            },
        })
    }
}
