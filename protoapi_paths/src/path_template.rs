use std::fmt::Display;

type Result<T> = std::result::Result<T, Error>;

/// Parsed HTTP rule path template, e.g. `/v1/{name=shelves/*}/books:publish`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathTemplate<'s> {
    segments: Vec<Segment<'s>>,
    verb: Option<&'s str>,
}

impl<'s> PathTemplate<'s> {
    /// Parse path template, normalizing repeated and trailing slashes in the process.
    pub fn new(expr: &'s str) -> Result<Self> {
        let (expr, verb) = split_verb(expr)?;
        let mut segments = vec![];

        for seg in split_segments(expr)? {
            if seg.is_empty() {
                continue;
            }

            if let Some(capture) = get_capture(seg)? {
                segments.push(Segment::Capture(capture));
            } else {
                segments.push(Segment::Static(assert_url_segment(seg)?));
            }
        }

        Ok(Self { segments, verb })
    }

    /// Get captures of this template in template order.
    pub fn captures(&self) -> impl Iterator<Item = &Capture<'s>> {
        self.segments.iter().filter_map(|seg| match seg {
            Segment::Capture(capture) => Some(capture),
            Segment::Static(_) => None,
        })
    }

    /// Render template as a `format!` pattern with a `{}` placeholder per capture.
    ///
    /// Static segments are already valid path substrings, so the output never
    /// contains braces other than the placeholders.
    pub fn format_pattern(&self) -> String {
        let mut output = String::new();

        for seg in &self.segments {
            output.push('/');
            match seg {
                Segment::Static(seg) => output.push_str(seg),
                Segment::Capture(_) => output.push_str("{}"),
            }
        }

        if output.is_empty() {
            output.push('/');
        }

        if let Some(verb) = self.verb {
            output.push(':');
            output.push_str(verb);
        }

        output
    }
}

/// A segment of path template.
#[derive(Debug, Clone, PartialEq)]
enum Segment<'s> {
    /// A static segment (valid, percent-encoded path substring).
    Static(&'s str),
    /// A variable, substituted with a request field value.
    Capture(Capture<'s>),
}

/// Template variable: `{field}` or `{field.path=pattern/*}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture<'s> {
    field: &'s str,
    pattern: Option<&'s str>,
}

impl<'s> Capture<'s> {
    /// Components of the dotted field path.
    pub fn field_path(&self) -> impl Iterator<Item = &'s str> {
        self.field.split('.')
    }

    /// Top-level field of the bound message.
    pub fn root_field(&self) -> &'s str {
        self.field.split('.').next().unwrap_or(self.field)
    }

    /// Whether the substituted value may span several path segments.
    pub fn is_multi_segment(&self) -> bool {
        self.pattern
            .is_some_and(|pattern| pattern.contains('/') || pattern.contains("**"))
    }
}

/// An error type for parsing path templates.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    UnclosedCapture,
    /// Captures can't contain other captures.
    NestedCapture,
    /// Capture field path wasn't a dot-separated list of valid Rust idents.
    InvalidIdent,
    /// Capture pattern was empty or contained an invalid segment.
    InvalidPattern,
    /// Static segment or verb contained invalid URL path character.
    InvalidPathChar,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnclosedCapture => write!(f, "unclosed capture"),
            Self::NestedCapture => write!(f, "captures can't be nested"),
            Self::InvalidIdent => write!(f, "capture field should be a dot-separated path of idents"),
            Self::InvalidPattern => write!(
                f,
                "capture pattern should be a non-empty list of `*`, `**` or static segments"
            ),
            Self::InvalidPathChar => write!(
                f,
                "static segments of template should be valid url path substrings"
            ),
        }
    }
}

impl std::error::Error for Error {}

fn is_valid_ident(segment: &str) -> bool {
    segment.starts_with(|ch| char::is_alphabetic(ch) || ch == '_')
        && segment.chars().all(|ch| ch.is_alphanumeric() || ch == '_')
}

fn assert_field_path(path: &str) -> Result<&str> {
    if path.split('.').all(is_valid_ident) {
        Ok(path)
    } else {
        Err(Error::InvalidIdent)
    }
}

fn assert_pattern(pattern: &str) -> Result<&str> {
    let valid = pattern.split('/').all(|seg| {
        matches!(seg, "*" | "**") || (!seg.is_empty() && seg.chars().all(is_valid_url_path_char))
    });

    if valid {
        Ok(pattern)
    } else {
        Err(Error::InvalidPattern)
    }
}

/// Split `:verb` suffix off the last segment, ignoring colons inside captures.
fn split_verb(expr: &str) -> Result<(&str, Option<&str>)> {
    let mut depth = 0usize;
    let mut colon = None;

    for (idx, ch) in expr.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '/' if depth == 0 => colon = None,
            ':' if depth == 0 && colon.is_none() => colon = Some(idx),
            _ => {}
        }
    }

    match colon {
        Some(idx) => {
            let verb = &expr[idx + 1..];
            if verb.is_empty() {
                return Err(Error::InvalidPathChar);
            }

            Ok((&expr[..idx], Some(assert_url_segment(verb)?)))
        }
        None => Ok((expr, None)),
    }
}

/// Split on slashes outside of captures.
fn split_segments(expr: &str) -> Result<Vec<&str>> {
    let mut segments = vec![];
    let mut in_capture = false;
    let mut start = 0;

    for (idx, ch) in expr.char_indices() {
        match ch {
            '{' if in_capture => return Err(Error::NestedCapture),
            '{' => in_capture = true,
            '}' if !in_capture => return Err(Error::UnclosedCapture),
            '}' => in_capture = false,
            '/' if !in_capture => {
                segments.push(&expr[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }

    if in_capture {
        return Err(Error::UnclosedCapture);
    }

    segments.push(&expr[start..]);

    Ok(segments)
}

fn get_capture(seg: &str) -> Result<Option<Capture<'_>>> {
    let capture_start = seg.starts_with('{');
    let capture_end = seg.ends_with('}');

    if capture_start ^ capture_end {
        return Err(Error::UnclosedCapture);
    }

    if !(capture_start && capture_end) {
        return Ok(None);
    }

    let inner = &seg[1..seg.len() - 1];
    let (field, pattern) = match inner.split_once('=') {
        Some((field, pattern)) => (field, Some(assert_pattern(pattern)?)),
        None => (inner, None),
    };

    Ok(Some(Capture {
        field: assert_field_path(field)?,
        pattern,
    }))
}

fn is_valid_url_path_char(ch: char) -> bool {
    matches!(ch,
        'A'..='Z'
        | 'a'..='z'
        | '0'..='9'
        | '-'
        | '.'
        | '_'
        | '~'
        | '!'
        | '$'
        | '&'
        | '\''
        | '('
        | ')'
        | '*'
        | '+'
        | ','
        | ';'
        | '='
        | ':'
        | '@'
    )
}

fn assert_url_segment(seg: &str) -> Result<&str> {
    if seg.chars().all(is_valid_url_path_char) {
        Ok(seg)
    } else {
        Err(Error::InvalidPathChar)
    }
}
