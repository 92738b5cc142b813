use thiserror::Error;

/// Fatal generation errors. Any of these aborts generation of the whole file.
#[derive(Debug, Error)]
pub enum Error {
    /// A code fragment didn't parse as Rust.
    #[error("malformed {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: syn::Error,
    },

    /// A binding rule references a field the request message doesn't have.
    #[error("method `{method}` references unknown field `{field}` of `{message}`")]
    UnknownField {
        method: String,
        message: String,
        field: String,
    },

    #[error("invalid path template `{template}` of method `{method}`: {source}")]
    PathTemplate {
        method: String,
        template: String,
        #[source]
        source: protoapi_paths::path_template::Error,
    },

    #[error("`{0}` is not a valid identifier")]
    InvalidIdent(String),

    /// Two distinct names map to the same generated item.
    #[error("generated identifier `{0}` is used more than once")]
    DuplicateIdent(String),

    #[error("`{0}` is not a valid type")]
    InvalidType(String),

    /// Unrecognized generator parameter.
    #[error("invalid parameter `{0}`")]
    InvalidParameter(String),

    /// Assembled file is not valid Rust.
    #[error("generated file is not valid Rust: {0}")]
    Syntax(#[source] syn::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn parse(what: impl Into<String>, source: syn::Error) -> Self {
        Self::Parse {
            what: what.into(),
            source,
        }
    }
}
