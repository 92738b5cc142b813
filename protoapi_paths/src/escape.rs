//! Percent-encoding of values substituted into path templates.
//!
//! Generated clients call these on every captured field value, so that
//! user-controlled strings can't alter the shape of the request path.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt::Display;

/// Unreserved characters of RFC 3986 stay as is.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const PATH: &AsciiSet = &SEGMENT.remove(b'/');

/// Escape value of a single-segment capture (`{shelf}`).
///
/// Slashes are encoded, so the value always occupies exactly one segment.
pub fn escape_segment(value: impl Display) -> String {
    utf8_percent_encode(&value.to_string(), SEGMENT).to_string()
}

/// Escape value of a multi-segment capture (`{name=shelves/*}`).
///
/// Slashes are kept, everything else is encoded as in [`escape_segment`].
pub fn escape_path(value: impl Display) -> String {
    utf8_percent_encode(&value.to_string(), PATH).to_string()
}
