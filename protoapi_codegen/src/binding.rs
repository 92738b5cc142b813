//! HTTP rule resolution.
//!
//! Classifies request fields into path, query and body according to the
//! `google.api.http` rules and renders the matching fragments:
//!
//! * every variable of the path template binds a request field;
//! * body `*` sends every other field in the body and leaves the query empty;
//! * body `field` sends that field in the body and every other non-path field
//!   in the query;
//! * no body sends every non-path field in the query.

use std::collections::HashSet;

use proc_macro2::TokenStream;
use protoapi_paths::PathTemplate;
use quote::quote;

use crate::body::BodyEncoding;
use crate::config::{BindingOptions, Config};
use crate::data::{CodeData, FileData, Method, Service, Verb};
use crate::error::{Error, Result};
use crate::names;
use crate::request::build_request_code;

/// A source file with its services, as handed over by the descriptor parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDescriptor {
    pub name: String,
    pub package: String,
    pub services: Vec<ServiceDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub name: String,
    /// Package of the service. The file's package applies when empty.
    pub package: String,
    pub options: BindingOptions,
    pub methods: Vec<MethodDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub comment: String,
    /// Fully qualified request message name, e.g. `.library.v1.GetShelfRequest`.
    pub input_type: String,
    /// Fully qualified response message name.
    pub output_type: String,
    /// Top-level fields of the request message.
    pub input_fields: Vec<MessageField>,
    pub rule: HttpRule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageField {
    pub name: String,
    pub kind: FieldKind,
}

impl MessageField {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Shape of a request field, as far as binding is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Singular value with a `Display` representation.
    Scalar,
    /// `Option` of a scalar.
    Optional,
    /// `Vec` of a scalar.
    Repeated,
    /// `Vec<u8>`.
    Bytes,
    /// Nested message.
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRule {
    pub verb: Verb,
    pub path: String,
    /// Body selector: empty, `*` or a top-level field name.
    pub body: String,
    pub options: BindingOptions,
}

impl HttpRule {
    pub fn new(verb: Verb, path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
            body: body.into(),
            options: BindingOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BindingOptions) -> Self {
        self.options = options;
        self
    }
}

enum BodySelection<'m> {
    None,
    Rest(Vec<&'m MessageField>),
    Field(&'m MessageField),
}

/// Resolve the fragments of one method.
pub fn resolve(
    service: &ServiceDescriptor,
    method: &MethodDescriptor,
    config: &Config,
) -> Result<CodeData> {
    let rt = &config.runtime;
    let rule = &method.rule;

    let template = PathTemplate::new(&rule.path).map_err(|source| Error::PathTemplate {
        method: method.name.clone(),
        template: rule.path.clone(),
        source,
    })?;

    let field = |name: &str| {
        method
            .input_fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::UnknownField {
                method: method.name.clone(),
                message: method.input_type.clone(),
                field: name.to_owned(),
            })
    };

    let mut path_fields = HashSet::new();
    for capture in template.captures() {
        path_fields.insert(field(capture.root_field())?.name.as_str());
    }

    let unbound = method
        .input_fields
        .iter()
        .filter(|f| !path_fields.contains(f.name.as_str()));

    let (selection, query_fields): (_, Vec<_>) = match rule.body.as_str() {
        "" => (BodySelection::None, unbound.collect()),
        "*" => (BodySelection::Rest(unbound.collect()), vec![]),
        name => {
            let body_field = field(name)?;
            let rest = unbound.filter(|f| f.name != body_field.name).collect();
            (BodySelection::Field(body_field), rest)
        }
    };

    let encoding = choose_encoding(&selection, &rule.options, &service.options, config);
    tracing::debug!(method = %method.name, ?encoding, "resolved body encoding");

    let route = route_fragment(&template, rt)?;
    let query = pairs_fragment(&method.name, "params", &query_fields)?;
    let body = match (&selection, encoding) {
        (BodySelection::None, _) | (_, BodyEncoding::None) => String::new(),
        (selection, encoding) => {
            let inner = body_fragment(&method.name, selection, encoding)?;
            encoding.render(&inner, rt)?
        }
    };

    Ok(CodeData {
        service: service.name.clone(),
        verb: rule.verb,
        route: route.to_string(),
        query,
        body,
    })
}

/// Resolve every service of `file` into renderable data.
pub fn resolve_file(file: &FileDescriptor, config: &Config) -> Result<FileData> {
    let services = file
        .services
        .iter()
        .map(|service| resolve_service(file, service, config))
        .collect::<Result<Vec<_>>>()?;

    let package = if file.package.is_empty() {
        let stem = std::path::Path::new(&file.name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&file.name);
        names::module_name(stem)
    } else {
        names::module_name(&file.package)
    };

    Ok(FileData {
        version: env!("CARGO_PKG_VERSION").to_owned(),
        source: file.name.clone(),
        package,
        services,
    })
}

fn resolve_service(
    file: &FileDescriptor,
    service: &ServiceDescriptor,
    config: &Config,
) -> Result<Service> {
    let package = if service.package.is_empty() {
        &file.package
    } else {
        &service.package
    };

    let methods = service
        .methods
        .iter()
        .map(|method| {
            let code = resolve(service, method, config)?;

            Ok(Method {
                name: method.name.clone(),
                comment: method.comment.clone(),
                req_type: names::type_path(&method.input_type, package),
                res_type: names::type_path(&method.output_type, package),
                req_code: build_request_code(&code, &config.runtime)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Service {
        name: service.name.clone(),
        package: package.clone(),
        methods,
    })
}

fn choose_encoding(
    selection: &BodySelection,
    method: &BindingOptions,
    service: &BindingOptions,
    config: &Config,
) -> BodyEncoding {
    if matches!(selection, BodySelection::None) {
        return BodyEncoding::None;
    }

    let inferred = match selection {
        BodySelection::Field(field) if field.kind == FieldKind::Bytes => Some(BodyEncoding::Bytes),
        _ => None,
    };

    let encoding = method
        .merge(service)
        .merge(&BindingOptions { encoding: inferred })
        .encoding
        .unwrap_or(config.default_encoding);

    match (selection, encoding) {
        // Raw bytes need a single field to send.
        (BodySelection::Rest(_), BodyEncoding::Bytes) => BodyEncoding::Json,
        _ => encoding,
    }
}

/// Statements leaving `raw_url`: the base address followed by the template
/// with every capture replaced by its escaped field value.
fn route_fragment(template: &PathTemplate, rt: &syn::Path) -> Result<TokenStream> {
    let pattern = format!("{{}}{}", template.format_pattern());

    let args = template
        .captures()
        .map(|capture| {
            let path = capture
                .field_path()
                .map(names::ident)
                .collect::<Result<Vec<_>>>()?;

            Ok(if capture.is_multi_segment() {
                quote!(#rt::paths::escape_path(&req.#(#path).*))
            } else {
                quote!(#rt::paths::escape_segment(&req.#(#path).*))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(quote! {
        let raw_url = ::std::format!(#pattern, opt.addr() #(, #args)*);
    })
}

/// Statements appending `fields` to the `target` accumulator. Fields without
/// a textual representation are skipped.
fn pairs_fragment(method: &str, target: &str, fields: &[&MessageField]) -> Result<String> {
    let target = names::ident(target)?;
    let mut stmts = TokenStream::new();

    for field in fields {
        let id = names::ident(&field.name)?;
        let key = &field.name;

        stmts.extend(match field.kind {
            FieldKind::Scalar => quote! {
                #target.append(#key, &req.#id);
            },
            FieldKind::Optional => quote! {
                if let ::std::option::Option::Some(v) = &req.#id {
                    #target.append(#key, v);
                }
            },
            FieldKind::Repeated => quote! {
                #target.append_all(#key, &req.#id);
            },
            FieldKind::Bytes | FieldKind::Message => {
                tracing::debug!(method, field = %field.name, kind = ?field.kind, "skipped field without textual form");
                continue;
            }
        });
    }

    Ok(stmts.to_string())
}

fn multipart_fragment(method: &str, fields: &[&MessageField]) -> Result<String> {
    let mut stmts = TokenStream::new();

    for field in fields {
        let id = names::ident(&field.name)?;
        let key = &field.name;

        stmts.extend(match field.kind {
            FieldKind::Scalar => quote! {
                body_forms.write_field(#key, &req.#id);
            },
            FieldKind::Optional => quote! {
                if let ::std::option::Option::Some(v) = &req.#id {
                    body_forms.write_field(#key, v);
                }
            },
            FieldKind::Repeated => quote! {
                for v in &req.#id {
                    body_forms.write_field(#key, v);
                }
            },
            FieldKind::Bytes => quote! {
                body_forms.write_file(#key, #key, &req.#id);
            },
            FieldKind::Message => {
                tracing::debug!(method, field = %field.name, "skipped message field in multipart body");
                continue;
            }
        });
    }

    Ok(stmts.to_string())
}

/// Fragment handed to the body strategy.
fn body_fragment(method: &str, selection: &BodySelection, encoding: BodyEncoding) -> Result<String> {
    let fields = match selection {
        BodySelection::None => return Ok(String::new()),
        BodySelection::Rest(fields) => fields.clone(),
        BodySelection::Field(field) => vec![*field],
    };

    match (encoding, selection) {
        (BodyEncoding::None, _) => Ok(String::new()),
        (BodyEncoding::Json | BodyEncoding::Bytes, BodySelection::Field(field)) => {
            let id = names::ident(&field.name)?;
            Ok(quote!(req.#id).to_string())
        }
        (BodyEncoding::Json | BodyEncoding::Bytes, _) => Ok(quote!(req).to_string()),
        (BodyEncoding::Form, _) => pairs_fragment(method, "body_forms", &fields),
        (BodyEncoding::Multipart, _) => multipart_fragment(method, &fields),
    }
}
