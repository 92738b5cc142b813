use std::fmt::Display;

use url::{form_urlencoded, Url};

/// Ordered key/value accumulator.
///
/// Backs both query strings (`params` in generated code) and
/// `application/x-www-form-urlencoded` bodies (`body_forms`). Repeated keys are
/// kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Params already present in the query of `url`.
    pub fn from_url(url: &Url) -> Self {
        Self {
            pairs: url.query_pairs().into_owned().collect(),
        }
    }

    pub fn append(&mut self, key: &str, value: impl Display) {
        self.pairs.push((key.to_owned(), value.to_string()));
    }

    /// Append one pair per element of `values`.
    pub fn append_all<I>(&mut self, key: &str, values: I)
    where
        I: IntoIterator,
        I::Item: Display,
    {
        for value in values {
            self.append(key, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Standard form encoding of all pairs.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.pairs)
            .finish()
    }

    /// Replace the query of `url` with these params. An empty set clears it.
    pub fn encode_into(&self, url: &mut Url) {
        if self.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&self.encode()));
        }
    }
}
