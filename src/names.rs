//! Name/alias resolution: wire names → target identifiers.
//!
//! Segments are split on `_` and `-`; inner capitals survive (`userId` stays
//! `userId`), everything that is not ASCII alphanumeric is dropped.
use once_cell::sync::Lazy;
use regex::Regex;

static NON_IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// type names and enum values
    Pascal,
    /// field names
    Camel,
}

pub fn to_identifier(raw: &str, case: Case) -> String {
    let mut out = String::with_capacity(raw.len());
    for segment in raw.split(['_', '-']) {
        let segment = NON_IDENT.replace_all(segment, "");
        let mut chars = segment.chars();
        let Some(first) = chars.next() else { continue };
        let first = if case == Case::Camel && out.is_empty() {
            first.to_ascii_lowercase()
        } else {
            first.to_ascii_uppercase()
        };
        out.push(first);
        out.extend(chars);
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, if case == Case::Camel { 'v' } else { 'V' });
    }
    out
}

pub fn pascal(raw: &str) -> String { to_identifier(raw, Case::Pascal) }

pub fn camel(raw: &str) -> String { to_identifier(raw, Case::Camel) }

/// True when converting `raw` lost information.
pub fn needs_alias(raw: &str, identifier: &str) -> bool { raw != identifier }

/// `(identifier, alias)` where the alias is only set for a lossy conversion.
pub fn resolve(raw: &str, case: Case) -> (String, Option<String>) {
    let identifier = to_identifier(raw, case);
    let alias = needs_alias(raw, &identifier).then(|| raw.to_string());
    (identifier, alias)
}
