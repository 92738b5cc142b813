use syn::parse::Parser;

use crate::error::{Error, Result};

/// Parse a statement fragment. Empty text yields no statements.
pub(crate) fn stmts(src: &str, what: &str) -> Result<Vec<syn::Stmt>> {
    syn::Block::parse_within
        .parse_str(src)
        .map_err(|source| Error::parse(what, source))
}

/// Parse an expression fragment.
pub(crate) fn expr(src: &str, what: &str) -> Result<syn::Expr> {
    syn::parse_str(src).map_err(|source| Error::parse(what, source))
}
