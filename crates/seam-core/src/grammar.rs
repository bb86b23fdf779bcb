//! Parser for the invocation mini-language carried in binding attributes.
//!
//! ```text
//! attribute_value := invocation (";" invocation)*
//! invocation      := method_name (":" param_list)?
//! param_list      := param ("," param)*
//! ```
//!
//! Whitespace around separators and tokens is insignificant. Parameters are
//! literal strings; nothing is evaluated.

/// Separates invocations within one attribute value.
pub const INVOCATION_SEPARATOR: char = ';';

/// Separates a method name from its parameter list.
pub const PARAMS_SEPARATOR: char = ':';

/// Separates parameters from each other.
pub const PARAM_SEPARATOR: char = ',';

/// One `method(params...)` call decoded from an attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Trimmed method name, never empty.
    pub method: String,
    /// Trimmed literal parameters, left to right.
    pub params: Vec<String>,
}

impl Invocation {
    /// Creates an invocation from a method name and parameters.
    pub fn new<I, S>(method: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method: method.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }
}

/// Decodes an attribute value into its ordered invocations.
///
/// Entries whose method name is empty after trimming are dropped. Only the
/// first `:` of an entry splits the method from its parameters, so later
/// colons stay inside parameter text. A parameter section that is blank
/// yields no parameters, while blank entries between commas are kept.
pub fn parse_invocations(value: &str) -> Vec<Invocation> {
    value
        .split(INVOCATION_SEPARATOR)
        .filter_map(parse_invocation)
        .collect()
}

/// Decodes a single `;`-free entry, returning `None` when it has no method.
pub fn parse_invocation(entry: &str) -> Option<Invocation> {
    let (method, params) = match entry.split_once(PARAMS_SEPARATOR) {
        Some((method, params)) => (method.trim(), parse_params(params)),
        None => (entry.trim(), Vec::new()),
    };

    if method.is_empty() {
        return None;
    }

    Some(Invocation {
        method: method.to_string(),
        params,
    })
}

fn parse_params(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    raw.split(PARAM_SEPARATOR)
        .map(|param| param.trim().to_string())
        .collect()
}
